pub mod ledger;
pub mod play;

pub use ledger::{write_history, write_leaderboard, write_run_summary};
pub use play::PlayMode;
