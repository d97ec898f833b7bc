//! Burrow topology and the hashable search state.
//!
//! The hallway is a row of `2K + 3` cells with room `i` opening below cell
//! `2 + 2i`. A state is one flat cell vector: hallway first, then every room
//! entrance-first, so two states describing the same configuration compare
//! and hash equal however they were reached.

use std::fmt;

use serde::Serialize;
use smallvec::SmallVec;

use crate::error::BurrowError;
use crate::moves::Move;

/// Energy, in units of the cheapest token's single step.
pub type Cost = u64;

/// One cell of the burrow, empty or holding a token.
pub type Cell = Option<Token>;

/// Rows inserted by [`BurrowState::unfold_standard`], entrance-most first.
pub const UNFOLDED_ROWS: [&str; 2] = ["DCBA", "DBAC"];

/// A token type, identified by its rank.
///
/// Rank `r` belongs in room `r` and pays `10^r` per step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "char")]
pub struct Token(u8);

impl Token {
    pub const fn new(rank: u8) -> Self {
        Token(rank)
    }

    pub fn rank(self) -> usize {
        self.0 as usize
    }

    /// Room this token must end up in.
    pub fn home(self) -> usize {
        self.rank()
    }

    /// Energy per step.
    pub fn weight(self) -> Cost {
        10u64.pow(self.0 as u32)
    }

    pub fn symbol(self) -> char {
        (b'A' + self.0) as char
    }

    /// Parse a token letter (`A` is rank 0).
    pub fn from_symbol(symbol: char) -> Option<Self> {
        let max = b'A' + Layout::MAX as u8;
        match symbol {
            'A'..='Z' if (symbol as u8) < max => Some(Token(symbol as u8 - b'A')),
            _ => None,
        }
    }
}

impl From<Token> for char {
    fn from(token: Token) -> char {
        token.symbol()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Shape of a burrow: room count `K` and uniform room depth `R`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Layout {
    rooms: u8,
    depth: u8,
}

impl Layout {
    /// Upper bound on both room count and depth.
    pub const MAX: usize = 8;

    pub fn new(rooms: usize, depth: usize) -> Result<Self, BurrowError> {
        if !(1..=Self::MAX).contains(&rooms) || !(1..=Self::MAX).contains(&depth) {
            return Err(BurrowError::InvalidLayout {
                rooms,
                depth,
                max: Self::MAX,
            });
        }
        Ok(Self {
            rooms: rooms as u8,
            depth: depth as u8,
        })
    }

    pub fn rooms(self) -> usize {
        self.rooms as usize
    }

    pub fn depth(self) -> usize {
        self.depth as usize
    }

    pub fn hallway_len(self) -> usize {
        2 * self.rooms() + 3
    }

    /// Hallway cell directly above room `room`.
    pub fn entrance(self, room: usize) -> usize {
        2 + 2 * room
    }

    /// Entrance cells may be crossed but never stopped on.
    pub fn is_transit(self, cell: usize) -> bool {
        cell >= 2 && cell % 2 == 0 && (cell - 2) / 2 < self.rooms()
    }

    pub fn cell_count(self) -> usize {
        self.hallway_len() + self.rooms() * self.depth()
    }

    fn room_offset(self, room: usize) -> usize {
        self.hallway_len() + room * self.depth()
    }

    /// Flat index of a location.
    pub fn index(self, location: Location) -> usize {
        match location {
            Location::Hallway(cell) => cell,
            Location::Room { room, depth } => self.room_offset(room) + depth,
        }
    }
}

/// A cell address. Room depth 0 is the cell just below the entrance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Location {
    Hallway(usize),
    Room { room: usize, depth: usize },
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Hallway(cell) => write!(f, "hallway {}", cell),
            Location::Room { room, depth } => write!(f, "room {} depth {}", room, depth),
        }
    }
}

/// A full burrow configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BurrowState {
    layout: Layout,
    cells: SmallVec<[Cell; 32]>,
}

impl BurrowState {
    /// Build a state from hallway cells and rooms listed entrance-first.
    pub fn from_parts(
        layout: Layout,
        hallway: &[Cell],
        rooms: &[Vec<Cell>],
    ) -> Result<Self, BurrowError> {
        if hallway.len() != layout.hallway_len() {
            return Err(BurrowError::HallwayLength {
                expected: layout.hallway_len(),
                found: hallway.len(),
            });
        }
        if rooms.len() != layout.rooms() {
            return Err(BurrowError::RoomCount {
                expected: layout.rooms(),
                found: rooms.len(),
            });
        }

        let mut cells: SmallVec<[Cell; 32]> = SmallVec::with_capacity(layout.cell_count());
        cells.extend_from_slice(hallway);

        for (room, contents) in rooms.iter().enumerate() {
            if contents.len() != layout.depth() {
                return Err(BurrowError::RoomDepth {
                    room,
                    expected: layout.depth(),
                    found: contents.len(),
                });
            }
            // empties must all sit above the first token
            let mut seen_token = false;
            for (depth, cell) in contents.iter().enumerate() {
                match cell {
                    Some(_) => seen_token = true,
                    None if seen_token => {
                        return Err(BurrowError::FloatingToken { room, depth });
                    }
                    None => {}
                }
            }
            cells.extend_from_slice(contents);
        }

        if let Some(token) = cells.iter().flatten().find(|t| t.rank() >= layout.rooms()) {
            return Err(BurrowError::UnknownToken {
                symbol: token.symbol(),
                rooms: layout.rooms(),
            });
        }

        Ok(Self { layout, cells })
    }

    /// Empty hallway, each room full, rooms listed entrance-first.
    pub fn with_full_rooms(rooms: &[Vec<Token>]) -> Result<Self, BurrowError> {
        let depth = rooms.first().map_or(0, Vec::len);
        let layout = Layout::new(rooms.len(), depth)?;
        let hallway = vec![None; layout.hallway_len()];
        let rooms: Vec<Vec<Cell>> = rooms
            .iter()
            .map(|room| room.iter().copied().map(Some).collect())
            .collect();
        Self::from_parts(layout, &hallway, &rooms)
    }

    /// Every room filled with its own token type, hallway empty.
    pub fn goal(layout: Layout) -> Self {
        let mut cells: SmallVec<[Cell; 32]> = SmallVec::with_capacity(layout.cell_count());
        cells.resize(layout.hallway_len(), None);
        for room in 0..layout.rooms() {
            for _ in 0..layout.depth() {
                cells.push(Some(Token(room as u8)));
            }
        }
        Self { layout, cells }
    }

    pub fn is_goal(&self) -> bool {
        self.hallway().iter().all(Option::is_none)
            && (0..self.layout.rooms()).all(|room| {
                self.room(room)
                    .iter()
                    .all(|cell| cell.map_or(false, |t| t.home() == room))
            })
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn hallway(&self) -> &[Cell] {
        &self.cells[..self.layout.hallway_len()]
    }

    /// Cells of one room, entrance-first.
    pub fn room(&self, room: usize) -> &[Cell] {
        let start = self.layout.room_offset(room);
        &self.cells[start..start + self.layout.depth()]
    }

    pub fn cell(&self, location: Location) -> Cell {
        self.cells[self.layout.index(location)]
    }

    /// Entrance-most token of a room and its depth.
    pub fn room_top(&self, room: usize) -> Option<(usize, Token)> {
        self.room(room)
            .iter()
            .enumerate()
            .find_map(|(depth, cell)| cell.map(|token| (depth, token)))
    }

    /// Deepest empty cell of a room.
    pub fn free_slot(&self, room: usize) -> Option<usize> {
        self.room(room).iter().rposition(Option::is_none)
    }

    /// True when the room holds nothing but its own token type.
    pub fn accepts(&self, room: usize) -> bool {
        self.room(room)
            .iter()
            .flatten()
            .all(|token| token.home() == room)
    }

    /// Number of tokens of each rank, indexed by rank.
    pub fn token_counts(&self) -> SmallVec<[usize; 8]> {
        let mut counts: SmallVec<[usize; 8]> = SmallVec::new();
        counts.resize(self.layout.rooms(), 0);
        for token in self.cells.iter().flatten() {
            counts[token.rank()] += 1;
        }
        counts
    }

    /// State after performing `mv`.
    pub fn apply(&self, mv: &Move) -> Self {
        let mut next = self.clone();
        let from = self.layout.index(mv.from);
        let to = self.layout.index(mv.to);
        debug_assert_eq!(next.cells[from], Some(mv.token));
        debug_assert_eq!(next.cells[to], None);
        next.cells[from] = None;
        next.cells[to] = Some(mv.token);
        next
    }

    /// Insert extra room rows directly below the entrance-most row.
    ///
    /// Each row lists one token per room.
    pub fn unfold(&self, rows: &[Vec<Token>]) -> Result<Self, BurrowError> {
        let rooms = self.layout.rooms();
        if let Some(row) = rows.iter().find(|row| row.len() != rooms) {
            return Err(BurrowError::UnfoldWidth {
                expected: rooms,
                found: row.len(),
            });
        }
        let layout = Layout::new(rooms, self.layout.depth() + rows.len())?;

        let unfolded: Vec<Vec<Cell>> = (0..rooms)
            .map(|room| {
                let cells = self.room(room);
                let mut out = Vec::with_capacity(layout.depth());
                out.push(cells[0]);
                out.extend(rows.iter().map(|row| Some(row[room])));
                out.extend_from_slice(&cells[1..]);
                out
            })
            .collect();

        Self::from_parts(layout, self.hallway(), &unfolded)
    }

    /// Unfold with [`UNFOLDED_ROWS`]; only fits four-room burrows.
    pub fn unfold_standard(&self) -> Result<Self, BurrowError> {
        let rows: Vec<Vec<Token>> = UNFOLDED_ROWS
            .iter()
            .map(|row| row.chars().filter_map(Token::from_symbol).collect())
            .collect();
        self.unfold(&rows)
    }
}
