//! Text diagrams of a burrow.
//!
//! ```text
//! #############
//! #...........#
//! ###B#C#B#D###
//!   #A#D#C#A#
//!   #########
//! ```
//!
//! The first line with open cells is the hallway. Every following line with
//! open cells is one room row, entrance-most first. `#` and spaces are walls.

use std::fmt;

use crate::burrow::{BurrowState, Cell, Layout, Token};
use crate::error::ParseError;

fn is_open(ch: char) -> bool {
    ch == '.' || ch.is_ascii_alphabetic()
}

fn read_cell(ch: char, line: usize, column: usize) -> Result<Cell, ParseError> {
    match ch {
        '.' => Ok(None),
        _ => Token::from_symbol(ch)
            .map(Some)
            .ok_or(ParseError::UnknownSymbol {
                symbol: ch,
                line: line + 1,
                column: column + 1,
            }),
    }
}

/// Open cells of one line as `(column, cell)`.
fn open_cells(text: &str, line: usize) -> Result<Vec<(usize, Cell)>, ParseError> {
    let mut cells = Vec::new();
    for (column, ch) in text.chars().enumerate() {
        match ch {
            '#' | ' ' => {}
            _ if is_open(ch) => cells.push((column, read_cell(ch, line, column)?)),
            _ => {
                return Err(ParseError::UnknownSymbol {
                    symbol: ch,
                    line: line + 1,
                    column: column + 1,
                })
            }
        }
    }
    Ok(cells)
}

/// Parse a burrow diagram.
pub fn parse_diagram(input: &str) -> Result<BurrowState, ParseError> {
    let lines: Vec<&str> = input.lines().map(str::trim_end).collect();

    let hallway_line = lines
        .iter()
        .position(|line| line.chars().any(is_open))
        .ok_or(ParseError::MissingHallway)?;
    let hallway_cells = open_cells(lines[hallway_line], hallway_line)?;
    let origin = match hallway_cells.first() {
        Some(&(column, _)) => column,
        None => return Err(ParseError::MissingHallway),
    };
    let hallway: Vec<Cell> = hallway_cells.iter().map(|&(_, cell)| cell).collect();

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    let mut room_columns: Vec<usize> = Vec::new();
    for (line, text) in lines.iter().enumerate().skip(hallway_line + 1) {
        let cells = open_cells(text, line)?;
        if cells.is_empty() {
            break;
        }
        let columns: Vec<usize> = cells.iter().map(|&(column, _)| column).collect();
        if room_columns.is_empty() {
            // room i sits under hallway cell 2 + 2i
            let expected: Vec<usize> = (0..columns.len()).map(|i| origin + 2 + 2 * i).collect();
            if columns != expected {
                return Err(ParseError::RoomRow { line: line + 1 });
            }
            room_columns = columns;
        } else if columns != room_columns {
            return Err(ParseError::RoomRow { line: line + 1 });
        }
        rows.push(cells.into_iter().map(|(_, cell)| cell).collect());
    }
    if rows.is_empty() {
        return Err(ParseError::MissingRooms);
    }

    let layout = Layout::new(room_columns.len(), rows.len())?;
    if hallway.len() != layout.hallway_len() {
        return Err(ParseError::HallwayLength {
            rooms: layout.rooms(),
            expected: layout.hallway_len(),
            found: hallway.len(),
        });
    }

    let rooms: Vec<Vec<Cell>> = (0..layout.rooms())
        .map(|room| rows.iter().map(|row| row[room]).collect())
        .collect();
    Ok(BurrowState::from_parts(layout, &hallway, &rooms)?)
}

fn symbol(cell: Cell) -> char {
    cell.map_or('.', Token::symbol)
}

impl fmt::Display for BurrowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let layout = self.layout();
        let width = layout.hallway_len() + 2;

        writeln!(f, "{}", "#".repeat(width))?;
        let hallway: String = self.hallway().iter().map(|&cell| symbol(cell)).collect();
        writeln!(f, "#{}#", hallway)?;

        for depth in 0..layout.depth() {
            let row: String = (0..layout.rooms())
                .map(|room| format!("#{}", symbol(self.room(room)[depth])))
                .collect();
            if depth == 0 {
                writeln!(f, "##{}###", row)?;
            } else {
                writeln!(f, "  {}#", row)?;
            }
        }
        write!(f, "  {}", "#".repeat(2 * layout.rooms() + 1))
    }
}
