//! Interactive terminal play
//!
//! # Controls
//!
//! - Arrows / WASD: Turn
//! - P: Save a checkpoint and keep playing
//! - Q/Esc: Quit (saves a final checkpoint)

use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{Interval, MissedTickBehavior, interval};

use crate::game::{GameError, GameLoop};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::RunMetrics;
use crate::persistence::CheckpointStore;
use crate::render::Renderer;

pub struct PlayMode<S: CheckpointStore> {
    game: GameLoop<S>,
    metrics: RunMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    /// Error that ended the run and must reach the caller
    fatal: Option<anyhow::Error>,
}

impl<S: CheckpointStore> PlayMode<S> {
    pub fn new(game: GameLoop<S>) -> Self {
        Self {
            game,
            metrics: RunMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
            fatal: None,
        }
    }

    pub fn game(&self) -> &GameLoop<S> {
        &self.game
    }

    pub fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result?;
        match self.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Game ticks follow the run's speed
        let mut tick_timer = pacing(self.game.state().tick_interval());

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    if self.game.is_running() {
                        self.update_game(&mut tick_timer)?;
                    }
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    let snapshot = self.game.snapshot();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot, &self.metrics, self.game.player());
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.request_quit();
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Turn(direction) => {
                    self.game.turn(direction);
                }
                KeyAction::Save => {
                    if self.game.is_running() {
                        let outcome = self.game.save();
                        self.metrics.on_save(&outcome);
                    }
                }
                KeyAction::Quit => self.request_quit(),
                KeyAction::None => {}
            }
        }
    }

    fn request_quit(&mut self) {
        if self.game.is_running() {
            let outcome = self.game.quit();
            self.metrics.on_save(&outcome);
            self.metrics.finish();
            if let Err(err) = outcome {
                self.fatal = Some(anyhow::Error::new(err).context("Final checkpoint was not saved"));
            }
        }
        self.should_quit = true;
    }

    fn update_game(&mut self, tick_timer: &mut Interval) -> Result<()> {
        let speed_before = self.game.state().speed;

        match self.game.advance() {
            Ok(step) => {
                self.metrics.on_step(&step);
                if !step.terminated() {
                    self.renderer.on_tick();
                }
            }
            Err(err @ GameError::PersistenceFailure(_)) => {
                let outcome = Err(err);
                self.metrics.on_save(&outcome);
                self.metrics.finish();
                if let Err(err) = outcome {
                    self.fatal =
                        Some(anyhow::Error::new(err).context("Final checkpoint was not saved"));
                }
            }
            Err(GameError::NoSpaceAvailable) => {
                self.metrics.on_save(&Ok(self.game.checkpoint()));
                self.metrics.finish();
                self.fatal = Some(anyhow::anyhow!("Board is full, no room left for food"));
            }
            Err(err @ GameError::BoardFullUnsaved(_)) => {
                let outcome = Err(err);
                self.metrics.on_save(&outcome);
                self.metrics.finish();
                if let Err(err) = outcome {
                    self.fatal = Some(
                        anyhow::Error::new(err)
                            .context("Board is full and the final checkpoint was not saved"),
                    );
                }
            }
            Err(err) => return Err(err).context("Game tick failed"),
        }

        let speed = self.game.state().speed;
        if speed != speed_before {
            *tick_timer = pacing(self.game.state().tick_interval());
            tick_timer.reset();
        }

        Ok(())
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

/// Tick timer that skips missed ticks instead of bursting to catch up
fn pacing(period: Duration) -> Interval {
    let mut timer = interval(period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
    timer
}
