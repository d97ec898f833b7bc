//! Move generation.
//!
//! A token only ever makes two kinds of move: out of a room onto a stoppable
//! hallway cell, or from the hallway straight into its home room. There are
//! no hallway-to-hallway moves; a token that has stopped in the hallway stays
//! put until its room is ready and its path is clear.

use serde::Serialize;
use smallvec::SmallVec;

use crate::burrow::{BurrowState, Cell, Cost, Location, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MoveKind {
    HallwayToRoom,
    RoomToHallway,
}

/// One token relocation and the energy it costs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    pub kind: MoveKind,
    pub token: Token,
    pub from: Location,
    pub to: Location,
    pub cost: Cost,
}

pub type MoveList = SmallVec<[Move; 32]>;

/// True if every hallway cell after `from`, up to and including `to`, is empty.
fn path_is_clear(hallway: &[Cell], from: usize, to: usize) -> bool {
    let span = if from < to {
        &hallway[from + 1..=to]
    } else if from > to {
        &hallway[to..from]
    } else {
        &hallway[..0]
    };
    span.iter().all(Option::is_none)
}

/// Hallway tokens that can walk straight into their home room.
///
/// The room must hold no foreign tokens and the hallway between the token
/// and the entrance must be empty. The token drops to the deepest free cell.
pub fn hallway_to_room_moves(state: &BurrowState) -> MoveList {
    let layout = state.layout();
    let hallway = state.hallway();
    let mut moves = MoveList::new();

    for (cell, occupant) in hallway.iter().enumerate() {
        let token = match occupant {
            Some(token) => *token,
            None => continue,
        };
        let room = token.home();
        if !state.accepts(room) {
            continue;
        }
        let depth = match state.free_slot(room) {
            Some(depth) => depth,
            None => continue,
        };
        let entrance = layout.entrance(room);
        if !path_is_clear(hallway, cell, entrance) {
            continue;
        }

        let steps = cell.abs_diff(entrance) + depth + 1;
        moves.push(Move {
            kind: MoveKind::HallwayToRoom,
            token,
            from: Location::Hallway(cell),
            to: Location::Room { room, depth },
            cost: steps as Cost * token.weight(),
        });
    }

    moves
}

/// Entrance-most room tokens stepping out to every reachable stop.
///
/// The token scans outward left and right from its entrance, stopping at the
/// first occupied cell in each direction and skipping entrance cells.
pub fn room_to_hallway_moves(state: &BurrowState) -> MoveList {
    let layout = state.layout();
    let hallway = state.hallway();
    let mut moves = MoveList::new();

    for room in 0..layout.rooms() {
        let (depth, token) = match state.room_top(room) {
            Some(top) => top,
            None => continue,
        };
        let entrance = layout.entrance(room);
        if hallway[entrance].is_some() {
            continue;
        }

        let mut push = |cell: usize| {
            let steps = depth + 1 + entrance.abs_diff(cell);
            moves.push(Move {
                kind: MoveKind::RoomToHallway,
                token,
                from: Location::Room { room, depth },
                to: Location::Hallway(cell),
                cost: steps as Cost * token.weight(),
            });
        };

        for cell in (0..entrance).rev() {
            if hallway[cell].is_some() {
                break;
            }
            if !layout.is_transit(cell) {
                push(cell);
            }
        }
        for cell in entrance + 1..hallway.len() {
            if hallway[cell].is_some() {
                break;
            }
            if !layout.is_transit(cell) {
                push(cell);
            }
        }
    }

    moves
}
