//! Headless snake environment.
//!
//! Implements the per-step loop: turn → advance → collide → eat or shrink.
//! Rendering and input handling live outside this crate.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::arbiter::TickContext;
use crate::grid::{Action, Cell, Direction, GridGeometry};

/// Rewards and limits for the simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvConfig {
    /// Reward for reaching the target.
    pub food_reward: f64,
    /// Reward on death or starvation (negative).
    pub death_penalty: f64,
    /// A game ends after `starvation_factor × body length` steps.
    pub starvation_factor: u32,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            food_reward: 10.0,
            death_penalty: -10.0,
            starvation_factor: 100,
        }
    }
}

/// Invalid snake placement.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnvironmentError {
    #[error("Snake body must have at least one cell")]
    EmptyBody,

    #[error("Cell {0} is outside the grid")]
    OutOfBounds(Cell),
}

/// Result of a single environment step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepResult {
    pub reward: f64,
    /// The game ended this step.
    pub done: bool,
    /// Targets eaten this game.
    pub score: u32,
    /// Steps taken this game.
    pub steps: u32,
}

/// Single-snake grid game with seeded target placement.
///
/// # Lifecycle
///
/// 1. Call [`SnakeEnvironment::new`] with geometry, configuration and seed.
/// 2. Read [`SnakeEnvironment::tick_context`] and pick an action.
/// 3. Call [`SnakeEnvironment::step`] until `done`, then [`SnakeEnvironment::reset`].
#[derive(Debug)]
pub struct SnakeEnvironment {
    config: EnvConfig,
    geometry: GridGeometry,
    body: Vec<Cell>,
    heading: Direction,
    food: Cell,
    score: u32,
    steps: u32,
    games_played: u32,
    rng: StdRng,
}

impl SnakeEnvironment {
    /// Creates an environment and starts the first game.
    pub fn new(geometry: GridGeometry, config: EnvConfig, seed: u64) -> Self {
        let mut env = Self {
            config,
            geometry,
            body: Vec::new(),
            heading: Direction::Right,
            food: Cell::new(0, 0),
            score: 0,
            steps: 0,
            games_played: 0,
            rng: StdRng::seed_from_u64(seed),
        };
        env.reset();
        env
    }

    /// Starts a new game: three-cell body at the centre, heading right.
    pub fn reset(&mut self) {
        let head = self.geometry.centre();
        let step = self.geometry.step();
        self.body = vec![head, Cell::new(head.x - step, head.y), Cell::new(head.x - 2 * step, head.y)];
        self.heading = Direction::Right;
        self.score = 0;
        self.steps = 0;
        self.place_food();
    }

    /// Replaces the snake, e.g. to start from a known layout.
    pub fn place_snake(&mut self, body: Vec<Cell>, heading: Direction) -> Result<(), EnvironmentError> {
        if body.is_empty() {
            return Err(EnvironmentError::EmptyBody);
        }
        if let Some(cell) = body.iter().find(|c| !self.geometry.contains(c)) {
            return Err(EnvironmentError::OutOfBounds(*cell));
        }
        self.body = body;
        self.heading = heading;
        if self.body.contains(&self.food) {
            self.place_food();
        }
        Ok(())
    }

    /// Moves the target to `cell`.
    pub fn place_food_at(&mut self, cell: Cell) -> Result<(), EnvironmentError> {
        if !self.geometry.contains(&cell) {
            return Err(EnvironmentError::OutOfBounds(cell));
        }
        self.food = cell;
        Ok(())
    }

    /// Immutable snapshot for the next decision.
    pub fn tick_context(&self) -> TickContext<'_> {
        TickContext {
            occupants: &self.body,
            target: self.food,
            heading: self.heading,
            games_played: self.games_played,
        }
    }

    /// Applies `action` and advances one step.
    pub fn step(&mut self, action: Action) -> StepResult {
        self.steps += 1;
        self.heading = self.heading.apply(action);
        let head = self.geometry.neighbour(&self.body[0], self.heading);
        self.body.insert(0, head);

        let starved = self.steps > self.config.starvation_factor * self.body.len() as u32;
        if self.is_collision(&head) || starved {
            return self.finish(self.config.death_penalty, starved);
        }

        let mut reward = 0.0;
        if head == self.food {
            self.score += 1;
            reward = self.config.food_reward;
            if !self.place_food() {
                tracing::info!(score = self.score, "Grid filled");
                return self.finish(reward, false);
            }
        } else {
            self.body.pop();
        }

        StepResult {
            reward,
            done: false,
            score: self.score,
            steps: self.steps,
        }
    }

    /// Returns `true` if `cell` is off the grid or on the body behind the head.
    pub fn is_collision(&self, cell: &Cell) -> bool {
        !self.geometry.contains(cell) || self.body.iter().skip(1).any(|c| c == cell)
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    pub fn body(&self) -> &[Cell] {
        &self.body
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    pub fn food(&self) -> Cell {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Completed games, monotonically increasing.
    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    fn finish(&mut self, reward: f64, starved: bool) -> StepResult {
        self.games_played += 1;
        tracing::info!(
            game = self.games_played,
            score = self.score,
            steps = self.steps,
            starved,
            "Game over"
        );
        StepResult {
            reward,
            done: true,
            score: self.score,
            steps: self.steps,
        }
    }

    /// Places the target on a random free cell; `false` when none is free.
    fn place_food(&mut self) -> bool {
        let free: Vec<Cell> = (0..self.geometry.rows())
            .flat_map(|r| (0..self.geometry.cols()).map(move |c| (c, r)))
            .map(|(c, r)| self.geometry.cell(c, r))
            .filter(|cell| !self.body.contains(cell))
            .collect();
        if free.is_empty() {
            return false;
        }
        self.food = free[self.rng.gen_range(0..free.len())];
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> SnakeEnvironment {
        let g = GridGeometry::from_pixels(640, 480, 20).unwrap();
        SnakeEnvironment::new(g, EnvConfig::default(), 42)
    }

    #[test]
    fn reset_places_snake_at_centre() {
        let env = env();
        assert_eq!(
            env.body(),
            &[Cell::new(320, 240), Cell::new(300, 240), Cell::new(280, 240)]
        );
        assert_eq!(env.heading(), Direction::Right);
        assert!(!env.body().contains(&env.food()));
        assert!(env.geometry().contains(&env.food()));
    }

    #[test]
    fn straight_step_moves_head() {
        let mut env = env();
        env.place_food_at(Cell::new(0, 0)).unwrap();
        let result = env.step(Action::Straight);
        assert!(!result.done);
        assert_eq!(result.reward, 0.0);
        assert_eq!(env.body()[0], Cell::new(340, 240));
        assert_eq!(env.body().len(), 3);
    }

    #[test]
    fn eating_grows_and_scores() {
        let mut env = env();
        env.place_food_at(Cell::new(340, 240)).unwrap();
        let result = env.step(Action::Straight);
        assert_eq!(result.reward, 10.0);
        assert_eq!(result.score, 1);
        assert_eq!(env.body().len(), 4);
        assert_ne!(env.food(), Cell::new(340, 240));
    }

    #[test]
    fn wall_collision_ends_game() {
        let mut env = env();
        env.place_snake(vec![Cell::new(620, 0), Cell::new(600, 0)], Direction::Right)
            .unwrap();
        let result = env.step(Action::Straight);
        assert!(result.done);
        assert_eq!(result.reward, -10.0);
        assert_eq!(env.games_played(), 1);
    }

    #[test]
    fn self_collision_ends_game() {
        let mut env = env();
        let body = vec![
            Cell::new(100, 100),
            Cell::new(80, 100),
            Cell::new(80, 120),
            Cell::new(100, 120),
            Cell::new(120, 120),
            Cell::new(140, 120),
            Cell::new(140, 140),
        ];
        env.place_snake(body, Direction::Up).unwrap();
        env.place_food_at(Cell::new(0, 0)).unwrap();
        // Right from up enters (120, 100), which is free; turning right again
        // heads down into (120, 120), still part of the body.
        assert!(!env.step(Action::TurnRight).done);
        assert!(env.step(Action::TurnRight).done);
    }

    #[test]
    fn starvation_ends_game() {
        let g = GridGeometry::new(4, 4, 20).unwrap();
        let config = EnvConfig {
            starvation_factor: 1,
            ..EnvConfig::default()
        };
        let mut env = SnakeEnvironment::new(g, config, 0);
        env.place_snake(vec![Cell::new(0, 0)], Direction::Right).unwrap();
        env.place_food_at(Cell::new(60, 60)).unwrap();
        // The budget is one step per cell of the grown body (2 cells).
        assert!(!env.step(Action::Straight).done);
        assert!(!env.step(Action::Straight).done);
        let result = env.step(Action::Straight);
        assert!(result.done);
        assert_eq!(result.steps, 3);
    }

    #[test]
    fn place_snake_validates() {
        let mut env = env();
        assert_eq!(
            env.place_snake(vec![], Direction::Up),
            Err(EnvironmentError::EmptyBody)
        );
        assert_eq!(
            env.place_snake(vec![Cell::new(640, 0)], Direction::Up),
            Err(EnvironmentError::OutOfBounds(Cell::new(640, 0)))
        );
    }

    #[test]
    fn tick_context_reflects_state() {
        let env = env();
        let tick = env.tick_context();
        assert_eq!(tick.head(), env.body()[0]);
        assert_eq!(tick.target(), env.food());
        assert_eq!(tick.heading(), Direction::Right);
        assert_eq!(tick.games_played(), 0);
    }

    #[test]
    fn same_seed_same_food() {
        assert_eq!(env().food(), env().food());
    }
}
