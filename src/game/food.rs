use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::GameConfig;
use super::error::GameError;
use super::state::Position;

/// Display color of a food item; has no effect on the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoodColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// A piece of food on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Food {
    pub position: Position,
    /// Points awarded when eaten
    pub weight: u32,
    /// Ticks left before the food is replaced
    pub remaining_ticks: u32,
    pub color: FoodColor,
}

impl Food {
    pub fn new(position: Position, weight: u32, remaining_ticks: u32) -> Self {
        Self {
            position,
            weight,
            remaining_ticks,
            color: FoodColor {
                r: 255,
                g: 255,
                b: 255,
            },
        }
    }

    /// Count one tick down, returning true once the food has expired
    pub(crate) fn tick_down(&mut self) -> bool {
        self.remaining_ticks = self.remaining_ticks.saturating_sub(1);
        self.remaining_ticks == 0
    }
}

/// Places food on free cells of the grid
pub struct FoodSpawner {
    width: usize,
    height: usize,
    weights: (u32, u32),
    ticks: (u32, u32),
    attempts: usize,
    rng: StdRng,
}

impl FoodSpawner {
    /// Create a spawner seeded from the operating system
    ///
    /// Fails with `InvalidConfig` on an empty grid or an inverted weight or
    /// expiry range.
    pub fn new(config: &GameConfig) -> Result<Self, GameError> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create a spawner with a fixed seed
    pub fn seeded(config: &GameConfig, seed: u64) -> Result<Self, GameError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &GameConfig, rng: StdRng) -> Result<Self, GameError> {
        config.validate_food().map_err(GameError::InvalidConfig)?;

        Ok(Self {
            width: config.grid_width,
            height: config.grid_height,
            weights: (config.food_weight_min, config.food_weight_max),
            ticks: (config.food_ticks_min, config.food_ticks_max),
            attempts: config.spawn_attempts,
            rng,
        })
    }

    /// Spawn food on a cell not in `occupied`
    ///
    /// Random draws are tried first; once the attempt budget is spent the
    /// free cells are enumerated and one is picked uniformly, so a nearly
    /// full grid still terminates.
    pub fn spawn(&mut self, occupied: &HashSet<Position>) -> Result<Food, GameError> {
        let covered = occupied
            .iter()
            .filter(|pos| pos.is_within(self.width, self.height))
            .count();
        if covered >= self.width * self.height {
            return Err(GameError::NoSpaceAvailable);
        }

        let position = match self.draw_free(occupied) {
            Some(pos) => pos,
            None => self.scan_free(occupied)?,
        };

        Ok(Food {
            position,
            weight: self.rng.gen_range(self.weights.0..=self.weights.1),
            remaining_ticks: self.rng.gen_range(self.ticks.0..=self.ticks.1),
            color: FoodColor {
                r: self.rng.gen_range(128..=255),
                g: self.rng.gen_range(128..=255),
                b: self.rng.gen_range(128..=255),
            },
        })
    }

    fn draw_free(&mut self, occupied: &HashSet<Position>) -> Option<Position> {
        for _ in 0..self.attempts {
            let x = self.rng.gen_range(0..self.width) as i32;
            let y = self.rng.gen_range(0..self.height) as i32;
            let pos = Position::new(x, y);

            if !occupied.contains(&pos) {
                return Some(pos);
            }
        }
        None
    }

    fn scan_free(&mut self, occupied: &HashSet<Position>) -> Result<Position, GameError> {
        let free: Vec<Position> = (0..self.height as i32)
            .flat_map(|y| (0..self.width as i32).map(move |x| Position::new(x, y)))
            .filter(|pos| !occupied.contains(pos))
            .collect();

        if free.is_empty() {
            return Err(GameError::NoSpaceAvailable);
        }
        Ok(free[self.rng.gen_range(0..free.len())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_cells_except(config: &GameConfig, keep: &[Position]) -> HashSet<Position> {
        let mut cells = HashSet::new();
        for y in 0..config.grid_height as i32 {
            for x in 0..config.grid_width as i32 {
                let pos = Position::new(x, y);
                if !keep.contains(&pos) {
                    cells.insert(pos);
                }
            }
        }
        cells
    }

    #[test]
    fn test_spawn_avoids_occupied() {
        let config = GameConfig::small();
        let mut spawner = FoodSpawner::seeded(&config, 7).unwrap();
        let occupied: HashSet<Position> = (0..10).map(|x| Position::new(x, 4)).collect();

        for _ in 0..200 {
            let food = spawner.spawn(&occupied).unwrap();
            assert!(!occupied.contains(&food.position));
            assert!(food.position.is_within(10, 10));
        }
    }

    #[test]
    fn test_spawn_attribute_ranges() {
        let config = GameConfig::small();
        let mut spawner = FoodSpawner::seeded(&config, 11).unwrap();
        let empty = HashSet::new();

        for _ in 0..200 {
            let food = spawner.spawn(&empty).unwrap();
            assert!((1..=3).contains(&food.weight));
            assert!((30..=60).contains(&food.remaining_ticks));
            assert!(food.color.r >= 128 && food.color.g >= 128 && food.color.b >= 128);
        }
    }

    #[test]
    fn test_spawn_finds_last_free_cell() {
        let config = GameConfig::small();
        let mut spawner = FoodSpawner::seeded(&config, 3).unwrap();
        let last = Position::new(9, 9);
        let occupied = all_cells_except(&config, &[last]);

        let food = spawner.spawn(&occupied).unwrap();
        assert_eq!(food.position, last);
    }

    #[test]
    fn test_spawn_with_zero_attempts_scans() {
        let config = GameConfig {
            spawn_attempts: 0,
            ..GameConfig::small()
        };
        let mut spawner = FoodSpawner::seeded(&config, 5).unwrap();
        let free = [Position::new(0, 0), Position::new(3, 7)];
        let occupied = all_cells_except(&config, &free);

        let food = spawner.spawn(&occupied).unwrap();
        assert!(free.contains(&food.position));
    }

    #[test]
    fn test_spawn_full_grid() {
        let config = GameConfig::small();
        let mut spawner = FoodSpawner::seeded(&config, 1).unwrap();
        let occupied = all_cells_except(&config, &[]);

        assert!(matches!(
            spawner.spawn(&occupied),
            Err(GameError::NoSpaceAvailable)
        ));
    }

    #[test]
    fn test_out_of_bounds_cells_do_not_count() {
        let config = GameConfig::new(2, 1);
        let mut spawner = FoodSpawner::seeded(&config, 9).unwrap();
        let occupied: HashSet<Position> =
            [Position::new(0, 0), Position::new(-1, 0), Position::new(5, 5)]
                .into_iter()
                .collect();

        let food = spawner.spawn(&occupied).unwrap();
        assert_eq!(food.position, Position::new(1, 0));
    }

    #[test]
    fn test_same_seed_same_food() {
        let config = GameConfig::default();
        let empty = HashSet::new();
        let a = FoodSpawner::seeded(&config, 42).unwrap().spawn(&empty).unwrap();
        let b = FoodSpawner::seeded(&config, 42).unwrap().spawn(&empty).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_inverted_ranges_rejected() {
        let config = GameConfig {
            food_weight_min: 5,
            food_weight_max: 2,
            ..GameConfig::small()
        };
        assert!(matches!(
            FoodSpawner::seeded(&config, 1),
            Err(GameError::InvalidConfig(_))
        ));

        let config = GameConfig {
            food_ticks_min: 60,
            food_ticks_max: 30,
            ..GameConfig::small()
        };
        assert!(matches!(
            FoodSpawner::new(&config),
            Err(GameError::InvalidConfig(_))
        ));

        let config = GameConfig::new(0, 10);
        assert!(FoodSpawner::seeded(&config, 1).is_err());
    }

    #[test]
    fn test_tick_down() {
        let mut food = Food::new(Position::new(1, 1), 1, 2);
        assert!(!food.tick_down());
        assert!(food.tick_down());
        assert_eq!(food.remaining_ticks, 0);
    }
}
