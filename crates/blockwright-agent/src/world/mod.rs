//! World service access: typed blocks, the [`WorldApi`] seam, and the HTTP client.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

mod client;
mod retry;


pub use client::HttpWorldClient;
pub use retry::{backoff_delay, BreakerState, CircuitBreaker};

/// Longest lifetime the world service accepts for a placed block, in seconds.
pub const MAX_DURATION: i64 = 50;
pub const MIN_DURATION: i64 = 1;
pub const DEFAULT_DURATION: i64 = MAX_DURATION;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl Point {
    pub fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Block types the world understands. `air` clears a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockId {
    Red,
    White,
    Purple,
    Yellow,
    Pink,
    Orange,
    Blue,
    Brown,
    Cyan,
    Lime,
    Magenta,
    Gray,
    LightGray,
    LightBlue,
    Green,
    Black,
    #[serde(rename = "air")]
    Air,
}

impl BlockId {
    pub const ALL: [BlockId; 17] = [
        BlockId::Red,
        BlockId::White,
        BlockId::Purple,
        BlockId::Yellow,
        BlockId::Pink,
        BlockId::Orange,
        BlockId::Blue,
        BlockId::Brown,
        BlockId::Cyan,
        BlockId::Lime,
        BlockId::Magenta,
        BlockId::Gray,
        BlockId::LightGray,
        BlockId::LightBlue,
        BlockId::Green,
        BlockId::Black,
        BlockId::Air,
    ];

    /// Wire name, as sent in `info.type_id`.
    pub fn as_str(self) -> &'static str {
        match self {
            BlockId::Red => "RED",
            BlockId::White => "WHITE",
            BlockId::Purple => "PURPLE",
            BlockId::Yellow => "YELLOW",
            BlockId::Pink => "PINK",
            BlockId::Orange => "ORANGE",
            BlockId::Blue => "BLUE",
            BlockId::Brown => "BROWN",
            BlockId::Cyan => "CYAN",
            BlockId::Lime => "LIME",
            BlockId::Magenta => "MAGENTA",
            BlockId::Gray => "GRAY",
            BlockId::LightGray => "LIGHT_GRAY",
            BlockId::LightBlue => "LIGHT_BLUE",
            BlockId::Green => "GREEN",
            BlockId::Black => "BLACK",
            BlockId::Air => "air",
        }
    }
}

/// Clamp a requested lifetime into `MIN_DURATION..=MAX_DURATION`; `None`
/// means the default. Out-of-range values are reduced, never rejected.
pub fn clamp_duration(requested: Option<i64>) -> i64 {
    let Some(requested) = requested else {
        return DEFAULT_DURATION;
    };
    let clamped = requested.clamp(MIN_DURATION, MAX_DURATION);
    if clamped != requested {
        tracing::warn!(
            event = "ValueClamped",
            field = "duration",
            requested,
            clamped,
            "duration out of range, clamped"
        );
    }
    clamped
}

/// A placement request. The duration is clamped on construction, so every
/// `Block` that reaches a [`WorldApi`] is already in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub point: Point,
    pub block_id: BlockId,
    duration: i64,
}

impl Block {
    pub fn new(point: Point, block_id: BlockId, duration: Option<i64>) -> Self {
        Self {
            point,
            block_id,
            duration: clamp_duration(duration),
        }
    }

    pub fn duration(&self) -> i64 {
        self.duration
    }
}

/// One cell of the known world. Extra fields the service adds (such as
/// `pub_key`) are dropped on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldEntry {
    pub point: Point,
    #[serde(default)]
    pub info: Value,
}

pub type WorldSnapshot = Vec<WorldEntry>;

/// Successful mutation; `response` is the service's body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ack {
    pub response: String,
}

#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error("world service unreachable: {0}")]
    Network(String),

    #[error("world service returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("world service circuit open, retry in {}s", .retry_in.as_secs())]
    CircuitOpen { retry_in: Duration },

    #[error("unexpected world service response: {0}")]
    Decode(String),
}

impl WorldError {
    /// Stable tag for the tool-result JSON.
    pub fn kind(&self) -> &'static str {
        match self {
            WorldError::Network(_) => "network",
            WorldError::HttpStatus { .. } => "http_status",
            WorldError::CircuitOpen { .. } => "circuit_open",
            WorldError::Decode(_) => "decode",
        }
    }

    /// Connection failures, timeouts, 429 and 5xx are worth another attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            WorldError::Network(_) => true,
            WorldError::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            WorldError::CircuitOpen { .. } | WorldError::Decode(_) => false,
        }
    }
}

/// Everything the agent can do to the world.
#[async_trait]
pub trait WorldApi: Send + Sync {
    async fn get_world_state(&self) -> Result<WorldSnapshot, WorldError>;

    async fn set_block(&self, block: Block) -> Result<Ack, WorldError>;

    /// Equivalent to placing `air`. Removing an empty cell succeeds.
    async fn remove_block(&self, point: Point) -> Result<Ack, WorldError>;
}
