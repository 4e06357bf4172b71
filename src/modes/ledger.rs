//! Plain-text reports over the checkpoint ledger

use std::io::Write;

use anyhow::{Context, Result};

use crate::game::{Checkpoint, RunState};
use crate::persistence::Ledger;

/// Print the best runs, highest score first
pub fn write_leaderboard<W: Write>(out: &mut W, ledger: &Ledger, limit: usize) -> Result<()> {
    let entries = ledger.leaderboard(limit);

    writeln!(out, "--- Top {} Best Runs ---", limit).context("Failed to write leaderboard")?;
    if entries.is_empty() {
        writeln!(out, "No runs saved yet.").context("Failed to write leaderboard")?;
    }
    for (i, entry) in entries.iter().enumerate() {
        writeln!(
            out,
            "{}. {}: {} points, Level {}, at {}",
            i + 1,
            entry.player,
            entry.score,
            entry.level,
            entry.saved_at.format("%Y-%m-%d %H:%M:%S")
        )
        .context("Failed to write leaderboard")?;
    }

    Ok(())
}

/// Print every checkpoint saved for a player, oldest first
pub fn write_history<W: Write>(out: &mut W, ledger: &Ledger, player: &str) -> Result<()> {
    let history = ledger.history(player);

    if history.is_empty() {
        writeln!(out, "{} has never played.", player).context("Failed to write history")?;
        return Ok(());
    }

    writeln!(out, "--- Checkpoints for {} ---", player).context("Failed to write history")?;
    for sample in history {
        writeln!(
            out,
            "{}  score {:>4}  level {:>3}",
            sample.saved_at.format("%Y-%m-%d %H:%M:%S"),
            sample.score,
            sample.level
        )
        .context("Failed to write history")?;
    }
    if let Some(best) = ledger.best(player) {
        writeln!(out, "Best: {} points, Level {}", best.score, best.level)
            .context("Failed to write history")?;
    }

    Ok(())
}

/// Print the end-of-run summary, set against the run that came before
pub fn write_run_summary<W: Write>(
    out: &mut W,
    player: &str,
    previous: Option<Checkpoint>,
    state: RunState,
) -> Result<()> {
    let greeting = match previous {
        Some(last) => writeln!(
            out,
            "Welcome back, {}! Your last score: {}, Level: {}",
            player,
            last.score(),
            last.level()
        ),
        None => writeln!(out, "First run for {}, starting from 0.", player),
    };
    greeting.context("Failed to write run summary")?;

    writeln!(out, "Game over! Score: {}, Level: {}", state.score, state.level)
        .context("Failed to write run summary")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample_ledger() -> Ledger {
        let mut ledger = Ledger::new();
        let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        ledger.record("ana", Checkpoint::new(6, 1), t0);
        ledger.record("bo", Checkpoint::new(11, 2), t0);
        ledger.record("ana", Checkpoint::new(2, 0), t0);
        ledger
    }

    #[test]
    fn test_leaderboard_output() {
        let mut out = Vec::new();
        write_leaderboard(&mut out, &sample_ledger(), 10).unwrap();
        let text = String::from_utf8(out).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "--- Top 10 Best Runs ---");
        assert_eq!(lines[1], "1. bo: 11 points, Level 2, at 2024-03-01 12:00:00");
        assert_eq!(lines[2], "2. ana: 6 points, Level 1, at 2024-03-01 12:00:00");
    }

    #[test]
    fn test_empty_leaderboard() {
        let mut out = Vec::new();
        write_leaderboard(&mut out, &Ledger::new(), 5).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("No runs saved yet."));
    }

    #[test]
    fn test_history_output() {
        let mut out = Vec::new();
        write_history(&mut out, &sample_ledger(), "ana").unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text.lines().count(), 4);
        assert!(text.ends_with("Best: 6 points, Level 1\n"));
    }

    #[test]
    fn test_history_unknown_player() {
        let mut out = Vec::new();
        write_history(&mut out, &sample_ledger(), "cy").unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "cy has never played.\n");
    }

    #[test]
    fn test_run_summary_returning_player() {
        let mut state = RunState::new(10);
        state.score = 9;
        state.level = 1;

        let mut out = Vec::new();
        write_run_summary(&mut out, "ana", Some(Checkpoint::new(6, 1)), state).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Welcome back, ana! Your last score: 6, Level: 1\nGame over! Score: 9, Level: 1\n"
        );
    }

    #[test]
    fn test_run_summary_first_run() {
        let mut out = Vec::new();
        write_run_summary(&mut out, "cy", None, RunState::new(10)).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("First run for cy, starting from 0.\n"));
        assert!(text.ends_with("Game over! Score: 0, Level: 0\n"));
    }
}
