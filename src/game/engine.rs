use std::collections::HashSet;

use super::{
    checkpoint::Checkpoint,
    config::GameConfig,
    direction::Direction,
    error::GameError,
    food::{Food, FoodSpawner},
    state::{GameOverReason, Phase, Position, RunState, Snake},
};
use crate::persistence::CheckpointStore;

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Food eaten this step
    pub ate_food: Option<Food>,
    /// Whether the score landed on a level boundary
    pub leveled_up: bool,
    /// Whether uneaten food ran out of time and was replaced
    pub food_expired: bool,
    /// Set once the run is over
    pub game_over: Option<GameOverReason>,
    /// Checkpoint persisted when this step ended the run
    pub final_checkpoint: Option<Checkpoint>,
}

impl StepResult {
    fn moved() -> Self {
        Self {
            ate_food: None,
            leveled_up: false,
            food_expired: false,
            game_over: None,
            final_checkpoint: None,
        }
    }

    fn ended(reason: GameOverReason, checkpoint: Option<Checkpoint>) -> Self {
        Self {
            game_over: Some(reason),
            final_checkpoint: checkpoint,
            ..Self::moved()
        }
    }

    pub fn terminated(&self) -> bool {
        self.game_over.is_some()
    }
}

/// Owned copy of everything a presentation layer needs after a tick
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub grid_width: usize,
    pub grid_height: usize,
    pub snake: Vec<Position>,
    pub direction: Direction,
    /// After a board-full end this is the item just eaten, under the head
    pub food: Food,
    pub state: RunState,
    pub phase: Phase,
    pub previous: Option<Checkpoint>,
    pub ticks: u64,
}

/// A single run of the game for one player
///
/// The loop owns the snake, the food and the run state. It is driven one
/// tick at a time by [`GameLoop::advance`]; direction changes requested
/// with [`GameLoop::turn`] are buffered and applied at the start of the
/// next tick. Checkpoints go to the injected store on [`GameLoop::save`]
/// and exactly once when the run ends.
pub struct GameLoop<S: CheckpointStore> {
    config: GameConfig,
    player: String,
    store: S,
    spawner: FoodSpawner,
    snake: Snake,
    food: Food,
    run: RunState,
    phase: Phase,
    pending_direction: Option<Direction>,
    previous: Option<Checkpoint>,
    ticks: u64,
}

impl<S: CheckpointStore> GameLoop<S> {
    /// Start a run with an entropy-seeded spawner
    pub fn new(config: GameConfig, player: impl Into<String>, store: S) -> Result<Self, GameError> {
        let spawner = FoodSpawner::new(&config)?;
        Self::with_spawner(config, player, store, spawner)
    }

    /// Start a run with the default seed snake and a given spawner
    pub fn with_spawner(
        config: GameConfig,
        player: impl Into<String>,
        store: S,
        mut spawner: FoodSpawner,
    ) -> Result<Self, GameError> {
        config.validate().map_err(GameError::InvalidConfig)?;

        let snake = Snake::new(
            Position::new(config.start_x, config.start_y),
            Direction::Right,
            config.initial_snake_length,
        );
        let food = spawner.spawn(&snake.occupancy())?;

        Self::from_parts(config, player, store, spawner, snake, food)
    }

    /// Start a run from an explicit snake and food
    pub fn from_parts(
        config: GameConfig,
        player: impl Into<String>,
        store: S,
        spawner: FoodSpawner,
        snake: Snake,
        food: Food,
    ) -> Result<Self, GameError> {
        config.validate().map_err(GameError::InvalidConfig)?;
        check_layout(&config, &snake, &food).map_err(GameError::InvalidConfig)?;

        let player = player.into();
        let previous = store.load_checkpoint(&player)?;
        match previous {
            Some(last) => tracing::info!(
                player = %player,
                last_score = last.score(),
                last_level = last.level(),
                "welcome back"
            ),
            None => tracing::info!(player = %player, "first run for player"),
        }

        Ok(Self {
            run: RunState::new(config.initial_speed),
            config,
            player,
            store,
            spawner,
            snake,
            food,
            phase: Phase::Running,
            pending_direction: None,
            previous,
            ticks: 0,
        })
    }

    /// Request a direction change for the next tick
    ///
    /// A reversal of the current direction is ignored, as is any request
    /// once the run is over. Returns whether the request was accepted.
    pub fn turn(&mut self, direction: Direction) -> bool {
        if !self.is_running() {
            return false;
        }
        if self.snake.direction().is_opposite(direction) {
            tracing::trace!(?direction, "reversal ignored");
            return false;
        }
        self.pending_direction = Some(direction);
        true
    }

    /// Execute one tick
    ///
    /// Hitting a wall or the body ends the run and persists the final
    /// checkpoint; a failure to persist it is returned as an error with the
    /// run already over. Once over, further calls report the same outcome
    /// without touching the store.
    pub fn advance(&mut self) -> Result<StepResult, GameError> {
        if let Phase::GameOver(reason) = self.phase {
            return Ok(StepResult::ended(reason, None));
        }

        if let Some(direction) = self.pending_direction.take() {
            self.snake.set_direction(direction);
        }

        let new_head = self.snake.head().moved_in_direction(self.snake.direction());

        if !new_head.is_within(self.config.grid_width, self.config.grid_height) {
            let checkpoint = self.finish(GameOverReason::Wall)?;
            return Ok(StepResult::ended(GameOverReason::Wall, Some(checkpoint)));
        }

        if self.snake.blocks(new_head) {
            let checkpoint = self.finish(GameOverReason::SelfCollision)?;
            return Ok(StepResult::ended(
                GameOverReason::SelfCollision,
                Some(checkpoint),
            ));
        }

        self.ticks += 1;
        let mut result = StepResult::moved();
        let ate_food = new_head == self.food.position;
        self.snake.advance(new_head, ate_food);

        if ate_food {
            let eaten = self.food;
            self.run.score += eaten.weight;

            // Modulo, not a running threshold: a jump from 3 to 6 skips level.
            if self.run.score % self.config.level_step == 0 {
                self.run.level += 1;
                self.run.speed += 1;
                result.leveled_up = true;
                tracing::debug!(
                    score = self.run.score,
                    level = self.run.level,
                    speed = self.run.speed,
                    "level up"
                );
            }

            result.ate_food = Some(eaten);
            self.food = self.respawn_food()?;
        } else if self.food.tick_down() {
            tracing::trace!(position = ?self.food.position, "food expired");
            result.food_expired = true;
            self.food = self.respawn_food()?;
        }

        Ok(result)
    }

    /// Persist a checkpoint of the current score and level
    ///
    /// A store failure is returned but leaves the run going.
    pub fn save(&mut self) -> Result<Checkpoint, GameError> {
        if !self.is_running() {
            return Err(GameError::NotRunning);
        }

        let checkpoint = self.checkpoint();
        match self.store.save_checkpoint(&self.player, checkpoint) {
            Ok(()) => {
                tracing::info!(
                    player = %self.player,
                    score = checkpoint.score(),
                    level = checkpoint.level(),
                    "progress saved"
                );
                Ok(checkpoint)
            }
            Err(err) => {
                tracing::warn!(player = %self.player, error = %err, "save failed, run continues");
                Err(err.into())
            }
        }
    }

    /// End the run at the player's request, persisting the final checkpoint
    pub fn quit(&mut self) -> Result<Checkpoint, GameError> {
        if !self.is_running() {
            return Err(GameError::NotRunning);
        }
        self.finish(GameOverReason::Quit)
    }

    /// Place the next food item, ending the run when the board is full
    ///
    /// A full board is returned as `NoSpaceAvailable` once the final
    /// checkpoint is stored, or as `BoardFullUnsaved` when storing it failed.
    fn respawn_food(&mut self) -> Result<Food, GameError> {
        match self.spawner.spawn(&self.snake.occupancy()) {
            Err(GameError::NoSpaceAvailable) => match self.finish(GameOverReason::BoardFull) {
                Ok(_) => Err(GameError::NoSpaceAvailable),
                Err(GameError::PersistenceFailure(err)) => Err(GameError::BoardFullUnsaved(err)),
                Err(err) => Err(err),
            },
            other => other,
        }
    }

    fn finish(&mut self, reason: GameOverReason) -> Result<Checkpoint, GameError> {
        self.phase = Phase::GameOver(reason);
        self.run.alive = false;
        self.pending_direction = None;

        let checkpoint = self.checkpoint();
        tracing::info!(
            player = %self.player,
            score = checkpoint.score(),
            level = checkpoint.level(),
            reason = reason.describe(),
            "game over"
        );

        self.store
            .save_checkpoint(&self.player, checkpoint)
            .map_err(|err| {
                tracing::error!(player = %self.player, error = %err, "final checkpoint failed");
                GameError::from(err)
            })?;
        Ok(checkpoint)
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint::new(self.run.score, self.run.level)
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    /// Current food item
    ///
    /// Once the board fills up no new item can be placed, so this keeps
    /// returning the one just eaten, which now lies under the head.
    pub fn food(&self) -> &Food {
        &self.food
    }

    pub fn state(&self) -> RunState {
        self.run
    }

    pub fn direction(&self) -> Direction {
        self.snake.direction()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Checkpoint found in the store when the run started
    pub fn previous(&self) -> Option<Checkpoint> {
        self.previous
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    /// Completed moves so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid_width: self.config.grid_width,
            grid_height: self.config.grid_height,
            snake: self.snake.segments().to_vec(),
            direction: self.snake.direction(),
            food: self.food,
            state: self.run,
            phase: self.phase,
            previous: self.previous,
            ticks: self.ticks,
        }
    }
}

fn check_layout(config: &GameConfig, snake: &Snake, food: &Food) -> Result<(), String> {
    let (width, height) = (config.grid_width, config.grid_height);

    if let Some(pos) = snake.segments().iter().find(|pos| !pos.is_within(width, height)) {
        return Err(format!("snake segment {:?} is off the {}x{} grid", pos, width, height));
    }

    let distinct: HashSet<Position> = snake.occupancy();
    if distinct.len() != snake.len() {
        return Err("snake segments overlap".to_string());
    }

    if !food.position.is_within(width, height) || distinct.contains(&food.position) {
        return Err(format!("food at {:?} is off the grid or under the snake", food.position));
    }

    Ok(())
}
