//! Forced-move pruning.
//!
//! Whenever some hallway token can finish its journey, only those moves are
//! expanded. The optimal cost is the same with or without pruning.

use crate::burrow::BurrowState;
use crate::moves::{hallway_to_room_moves, room_to_hallway_moves, MoveList};

/// How much of the move set to expand from each state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PruningMode {
    /// Expand only hallway-to-room moves when any exist
    #[default]
    ForcedMoves,
    /// Expand both move families from every state
    Disabled,
}

/// Moves to expand from `state`.
pub fn legal_moves(state: &BurrowState, mode: PruningMode) -> MoveList {
    let mut moves = hallway_to_room_moves(state);
    if mode == PruningMode::ForcedMoves && !moves.is_empty() {
        return moves;
    }
    moves.extend(room_to_hallway_moves(state));
    moves
}
