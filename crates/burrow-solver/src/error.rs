//! Error types shared across the crate.

use std::fmt;

use thiserror::Error;

use crate::burrow::Cost;

/// Misuse of the decrease-key queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    /// `insert` was called with a key that is already queued
    #[error("key is already queued; use decrease_key instead")]
    DuplicateKey,
    /// `extract_min` was called on an empty queue
    #[error("queue is empty")]
    EmptyQueue,
}

/// A burrow layout or configuration that cannot exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BurrowError {
    #[error("layout must have 1..={max} rooms and depth 1..={max}, got {rooms} rooms of depth {depth}")]
    InvalidLayout { rooms: usize, depth: usize, max: usize },

    #[error("hallway has {found} cells, layout needs {expected}")]
    HallwayLength { expected: usize, found: usize },

    #[error("expected {expected} rooms, found {found}")]
    RoomCount { expected: usize, found: usize },

    #[error("room {room} has {found} cells, layout depth is {expected}")]
    RoomDepth { room: usize, expected: usize, found: usize },

    #[error("token {symbol} has no room in a {rooms}-room layout")]
    UnknownToken { symbol: char, rooms: usize },

    #[error("room {room} has a token above an empty cell at depth {depth}")]
    FloatingToken { room: usize, depth: usize },

    #[error("unfold row has {found} tokens, layout has {expected} rooms")]
    UnfoldWidth { expected: usize, found: usize },
}

/// Failure to read a textual burrow diagram.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("diagram has no hallway line")]
    MissingHallway,

    #[error("diagram has no room rows below the hallway")]
    MissingRooms,

    #[error("hallway has {found} cells but {rooms} rooms need {expected}")]
    HallwayLength { rooms: usize, expected: usize, found: usize },

    #[error("line {line} does not match the room columns of the first room row")]
    RoomRow { line: usize },

    #[error("unrecognized symbol '{symbol}' at line {line} column {column}")]
    UnknownSymbol { symbol: char, line: usize, column: usize },

    #[error(transparent)]
    Burrow(#[from] BurrowError),
}

/// Which search budget ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetReason {
    /// More than this many states were expanded
    Expansions(usize),
    /// Every remaining state costs more than this
    Cost(Cost),
}

impl fmt::Display for BudgetReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BudgetReason::Expansions(limit) => write!(f, "expansion limit {} reached", limit),
            BudgetReason::Cost(limit) => write!(f, "no solution costs {} or less", limit),
        }
    }
}

/// Why a search ended without an answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    /// Every reachable state was explored and none was the goal
    #[error("goal is unreachable ({explored} states explored)")]
    Unsolvable { explored: usize },

    #[error("search budget exceeded after {expanded} expansions: {reason}")]
    BudgetExceeded { expanded: usize, reason: BudgetReason },

    #[error("priority queue: {0}")]
    Queue(#[from] QueueError),
}
