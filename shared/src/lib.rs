use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const DEFAULT_GRID_WIDTH: u32 = 20;
pub const DEFAULT_GRID_HEIGHT: u32 = 20;
pub const DEFAULT_CELL_SIZE: u32 = 20;
pub const TICK_INTERVAL_MS: u64 = 150;

pub const STATUS_SUCCESS: &str = "success";

pub const START_PATH: &str = "/api/game/start";
pub const PAUSE_PATH: &str = "/api/game/pause";
pub const RESTART_PATH: &str = "/api/game/restart";
pub const DIRECTION_PATH: &str = "/api/game/direction";
pub const UPDATE_PATH: &str = "/api/game/update";
pub const STATE_PATH: &str = "/api/game/state";
pub const HIGHSCORE_PATH: &str = "/api/game/highscore";

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    #[default]
    Idle,
    Playing,
    Paused,
    GameOver,
}

impl Lifecycle {
    /// Lifecycles in which the server guarantees a non-empty snake.
    pub fn has_snake(&self) -> bool {
        !matches!(self, Lifecycle::Idle)
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Lifecycle::Idle => "idle",
            Lifecycle::Playing => "playing",
            Lifecycle::Paused => "paused",
            Lifecycle::GameOver => "game_over",
        };
        f.write_str(name)
    }
}

/// A grid cell, encoded on the wire as `[x, y]`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell(pub i32, pub i32);

impl Cell {
    pub fn x(&self) -> i32 {
        self.0
    }

    pub fn y(&self) -> i32 {
        self.1
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GameSnapshot {
    pub snake_body: Vec<Cell>,
    pub food_position: Option<Cell>,
    pub direction: Direction,
    pub score: u32,
    #[serde(rename = "highscore")]
    pub high_score: u32,
    #[serde(rename = "game_state")]
    pub lifecycle: Lifecycle,
    pub grid_width: u32,
    pub grid_height: u32,
    pub cell_size: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("grid dimensions must be positive (got {width}x{height}, cell {cell_size})")]
    EmptyGrid {
        width: u32,
        height: u32,
        cell_size: u32,
    },
    #[error("snake body is empty while {0}")]
    MissingSnake(Lifecycle),
    #[error("segment {index} at ({x}, {y}) lies outside the grid")]
    OutOfBounds { index: usize, x: i32, y: i32 },
}

impl GameSnapshot {
    /// The snapshot a fresh client shows before the server has said anything.
    pub fn idle(grid_width: u32, grid_height: u32, cell_size: u32, high_score: u32) -> Self {
        Self {
            snake_body: Vec::new(),
            food_position: None,
            direction: Direction::Right,
            score: 0,
            high_score,
            lifecycle: Lifecycle::Idle,
            grid_width,
            grid_height,
            cell_size,
        }
    }

    pub fn head(&self) -> Option<Cell> {
        self.snake_body.first().copied()
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        (
            self.grid_width * self.cell_size,
            self.grid_height * self.cell_size,
        )
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.0 >= 0
            && cell.1 >= 0
            && (cell.0 as u32) < self.grid_width
            && (cell.1 as u32) < self.grid_height
    }

    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.grid_width == 0 || self.grid_height == 0 || self.cell_size == 0 {
            return Err(SnapshotError::EmptyGrid {
                width: self.grid_width,
                height: self.grid_height,
                cell_size: self.cell_size,
            });
        }

        if self.lifecycle.has_snake() && self.snake_body.is_empty() {
            return Err(SnapshotError::MissingSnake(self.lifecycle));
        }

        for (index, cell) in self.snake_body.iter().enumerate() {
            if !self.contains(*cell) {
                return Err(SnapshotError::OutOfBounds {
                    index,
                    x: cell.0,
                    y: cell.1,
                });
            }
        }

        Ok(())
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self::idle(DEFAULT_GRID_WIDTH, DEFAULT_GRID_HEIGHT, DEFAULT_CELL_SIZE, 0)
    }
}

/// Response envelope shared by every game endpoint.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Envelope {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_state: Option<GameSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highscore: Option<u32>,
}

impl Envelope {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }

    pub fn with_snapshot(snapshot: GameSnapshot) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            message: None,
            game_state: Some(snapshot),
            highscore: None,
        }
    }

    pub fn with_highscore(highscore: u32) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            message: None,
            game_state: None,
            highscore: Some(highscore),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: Some(message.into()),
            game_state: None,
            highscore: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct DirectionRequest {
    pub direction: Direction,
}
