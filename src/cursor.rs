//! Hardware cursor addressing.
//!
//! The CRTC holds the cursor as one linear offset `row * WIDTH + col`. It
//! accepts offsets up to twice the visible area; anything at or past
//! `SCREEN_CELLS` lands off-screen, so the cursor disappears. The console
//! hides the cursor by adding exactly one screen of cells to the offset and
//! shows it again by subtracting it, keeping the logical position intact.
//!
//! Software tracks visibility as a flag and only meets the doubled encoding
//! here, at the port boundary.

use crate::constants::vga::{BUFFER_HEIGHT, BUFFER_WIDTH, SCREEN_CELLS};
use crate::error::ConsoleError;

/// A logical (on-screen) cell coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const ORIGIN: Position = Position { row: 0, col: 0 };

    pub const fn new(row: usize, col: usize) -> Position {
        Position { row, col }
    }

    /// Bounds-check against the visible grid.
    pub fn checked(row: usize, col: usize) -> Result<Position, ConsoleError> {
        if row < BUFFER_HEIGHT && col < BUFFER_WIDTH {
            Ok(Position { row, col })
        } else {
            Err(ConsoleError::OutOfBounds { row, col })
        }
    }

    pub const fn is_last_row(self) -> bool {
        self.row == BUFFER_HEIGHT - 1
    }

    pub const fn is_last_col(self) -> bool {
        self.col == BUFFER_WIDTH - 1
    }
}

/// The cursor location register pair.
///
/// `set`/`get` each stand for a full index-then-data exchange; an
/// implementation shared with interrupt context must make that exchange
/// atomic.
pub trait CursorPort {
    fn set(&mut self, offset: u16);
    fn get(&mut self) -> u16;
}

impl<T: CursorPort + ?Sized> CursorPort for &mut T {
    fn set(&mut self, offset: u16) {
        (**self).set(offset)
    }

    fn get(&mut self) -> u16 {
        (**self).get()
    }
}

/// Raw register value for a logical position.
pub fn encode(pos: Position, visible: bool) -> u16 {
    let mut offset = pos.row * BUFFER_WIDTH + pos.col;
    if !visible {
        offset += SCREEN_CELLS;
    }
    offset as u16
}

/// Logical position and visibility for a raw register value.
///
/// Offsets beyond the doubled range carry no meaning for this console and
/// decode as a visible cursor at the origin.
pub fn decode(offset: u16) -> (Position, bool) {
    let offset = usize::from(offset);
    if offset >= 2 * SCREEN_CELLS {
        return (Position::ORIGIN, true);
    }
    let visible = offset < SCREEN_CELLS;
    let logical = if visible { offset } else { offset - SCREEN_CELLS };
    (Position::new(logical / BUFFER_WIDTH, logical % BUFFER_WIDTH), visible)
}

/// Cursor register kept in memory, for running the console off-hardware.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryCursorPort {
    offset: u16,
    writes: usize,
}

impl MemoryCursorPort {
    pub const fn new() -> MemoryCursorPort {
        MemoryCursorPort { offset: 0, writes: 0 }
    }

    /// Start from a register value as if firmware had left it there.
    pub const fn with_offset(offset: u16) -> MemoryCursorPort {
        MemoryCursorPort { offset, writes: 0 }
    }

    pub fn offset(&self) -> u16 {
        self.offset
    }

    /// Number of `set` calls seen so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl CursorPort for MemoryCursorPort {
    fn set(&mut self, offset: u16) {
        self.offset = offset;
        self.writes += 1;
    }

    fn get(&mut self) -> u16 {
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visible_offsets_are_row_major() {
        assert_eq!(encode(Position::new(0, 0), true), 0);
        assert_eq!(encode(Position::new(1, 2), true), 82);
        assert_eq!(encode(Position::new(24, 79), true), 1999);
    }

    #[test]
    fn hidden_offsets_add_one_screen() {
        assert_eq!(encode(Position::new(0, 0), false), 2000);
        assert_eq!(encode(Position::new(24, 79), false), 3999);
        assert_eq!(decode(2000 + 82), (Position::new(1, 2), false));
    }

    #[test]
    fn decode_inverts_encode_at_the_edges() {
        for &pos in &[Position::ORIGIN, Position::new(24, 0), Position::new(12, 79)] {
            for &visible in &[true, false] {
                assert_eq!(decode(encode(pos, visible)), (pos, visible));
            }
        }
    }

    #[test]
    fn out_of_range_offset_decodes_to_origin() {
        assert_eq!(decode(4000), (Position::ORIGIN, true));
        assert_eq!(decode(u16::MAX), (Position::ORIGIN, true));
    }

    #[test]
    fn checked_rejects_off_screen_coordinates() {
        assert!(Position::checked(24, 79).is_ok());
        assert_eq!(
            Position::checked(25, 0),
            Err(ConsoleError::OutOfBounds { row: 25, col: 0 })
        );
        assert!(Position::checked(0, 80).is_err());
    }
}
