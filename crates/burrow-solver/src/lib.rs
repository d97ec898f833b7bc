//! Minimum-energy solver for the amphipod burrow puzzle.
//!
//! Tokens start in side rooms off a single hallway and must be sorted so
//! that room `i` holds only rank-`i` tokens. The crate searches the implicit
//! state graph with Dijkstra's algorithm over a decrease-key heap, expanding
//! states through a move generator with forced-move pruning.

pub mod burrow;
pub mod diagram;
pub mod error;
pub mod moves;
pub mod pruning;
pub mod queue;
pub mod solver;

// Re-export main types
pub use burrow::{BurrowState, Cell, Cost, Layout, Location, Token, UNFOLDED_ROWS};
pub use diagram::parse_diagram;
pub use error::{BudgetReason, BurrowError, ParseError, QueueError, SolveError};
pub use moves::{Move, MoveKind, MoveList};
pub use pruning::{legal_moves, PruningMode};
pub use queue::DecreaseKeyQueue;
pub use solver::{solve, solve_with, Search, SearchStats, SearchStatus, Solution, SolverConfig};
