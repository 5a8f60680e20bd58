//! Text console: logical writes, cursor and scrolling on top of a
//! [`CellStore`] and a [`CursorPort`].

use core::fmt;

use log::debug;

use crate::constants::vga::{BUFFER_HEIGHT, BUFFER_WIDTH};
use crate::cursor::{self, CursorPort, Position};
use crate::error::ConsoleError;
use crate::vga_buffer::{CellStore, ColorCode, ScreenChar};

pub struct Console<S, P> {
    cells: S,
    port: P,
    cursor: Position,
    visible: bool,
    color: ColorCode,
}

impl<S: CellStore, P: CursorPort> Console<S, P> {
    /// Take over a grid and cursor register, keeping whatever cursor
    /// position (and visibility) the register already holds.
    pub fn new(cells: S, mut port: P) -> Console<S, P> {
        let raw = port.get();
        let (cursor, visible) = cursor::decode(raw);
        debug!("console: cursor register {:#06x} -> {:?}, visible={}", raw, cursor, visible);
        Console {
            cells,
            port,
            cursor,
            visible,
            color: ColorCode::default(),
        }
    }

    pub fn cells(&self) -> &S {
        &self.cells
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    /// Print one byte at the cursor and return it.
    ///
    /// `\n` moves to the start of the next line (scrolling on the last
    /// line), `\r` to the start of this line, `\b` erases the previous cell,
    /// `\t` prints a single space. Every other byte is drawn as-is in the
    /// current color; writing into the last column wraps like `\n`.
    pub fn putbyte(&mut self, ch: u8) -> u8 {
        let at = self.cursor;
        match ch {
            b'\n' => self.next_line_from(at.row),
            b'\r' => self.move_cursor(Position::new(at.row, 0)),
            b'\x08' => self.erase_before(at),
            b'\t' => {
                self.putbyte(b' ');
            }
            _ => {
                self.cells.write(at.row, at.col, ScreenChar::new(ch, self.color));
                if at.is_last_col() {
                    self.next_line_from(at.row);
                } else {
                    self.move_cursor(Position::new(at.row, at.col + 1));
                }
            }
        }
        ch
    }

    /// Print every byte of `s` through [`putbyte`](Self::putbyte).
    pub fn putbytes(&mut self, s: &[u8]) -> Result<(), ConsoleError> {
        if s.is_empty() {
            return Err(ConsoleError::EmptyWrite);
        }
        for &byte in s {
            self.putbyte(byte);
        }
        Ok(())
    }

    /// Move to column 0 of the line after `at`, scrolling the whole screen
    /// up one row when `at` is on the last line.
    pub fn nextline(&mut self, at: Position) -> Result<(), ConsoleError> {
        let at = Position::checked(at.row, at.col)?;
        self.next_line_from(at.row);
        Ok(())
    }

    /// Blank the cell before `at` and leave the cursor on it. At column 0
    /// this is the last cell of the previous row; at the origin nothing
    /// happens.
    pub fn backspace(&mut self, at: Position) -> Result<(), ConsoleError> {
        let at = Position::checked(at.row, at.col)?;
        self.erase_before(at);
        Ok(())
    }

    pub fn set_term_color(&mut self, color: ColorCode) -> Result<(), ConsoleError> {
        if !color.is_legal() {
            return Err(ConsoleError::IllegalColor(color.raw()));
        }
        self.color = color;
        Ok(())
    }

    pub fn get_term_color(&self) -> ColorCode {
        self.color
    }

    /// Move the cursor without changing whether it is shown.
    pub fn set_cursor(&mut self, row: usize, col: usize) -> Result<(), ConsoleError> {
        let pos = Position::checked(row, col)?;
        self.move_cursor(pos);
        Ok(())
    }

    /// Logical cursor position, regardless of visibility.
    pub fn get_cursor(&self) -> Position {
        self.cursor
    }

    pub fn is_cursor_visible(&self) -> bool {
        self.visible
    }

    pub fn hide_cursor(&mut self) {
        if self.visible {
            self.visible = false;
            self.sync_cursor();
        }
    }

    pub fn show_cursor(&mut self) {
        if !self.visible {
            self.visible = true;
            self.sync_cursor();
        }
    }

    /// Blank every cell in the current color and home the cursor.
    /// A hidden cursor stays hidden.
    pub fn clear_console(&mut self) {
        for row in 0..BUFFER_HEIGHT {
            self.clear_row(row);
        }
        self.move_cursor(Position::ORIGIN);
    }

    pub fn draw_char(
        &mut self,
        row: usize,
        col: usize,
        ch: u8,
        color: ColorCode,
    ) -> Result<(), ConsoleError> {
        let pos = Position::checked(row, col)?;
        if !color.is_legal() {
            return Err(ConsoleError::IllegalColor(color.raw()));
        }
        self.cells.write(pos.row, pos.col, ScreenChar::new(ch, color));
        Ok(())
    }

    pub fn get_char(&self, row: usize, col: usize) -> Result<u8, ConsoleError> {
        let pos = Position::checked(row, col)?;
        Ok(self.cells.read(pos.row, pos.col).ascii_character)
    }

    pub fn get_char_color(&self, row: usize, col: usize) -> Result<ColorCode, ConsoleError> {
        let pos = Position::checked(row, col)?;
        Ok(self.cells.read(pos.row, pos.col).color_code)
    }

    /// Formatted output through `putbyte`; never fails.
    pub fn print_fmt(&mut self, args: fmt::Arguments) {
        let _ = fmt::Write::write_fmt(self, args);
    }

    fn next_line_from(&mut self, row: usize) {
        if row == BUFFER_HEIGHT - 1 {
            self.scroll_up();
            self.move_cursor(Position::new(row, 0));
        } else {
            self.move_cursor(Position::new(row + 1, 0));
        }
    }

    fn erase_before(&mut self, at: Position) {
        let target = match (at.row, at.col) {
            (0, 0) => return,
            (row, 0) => Position::new(row - 1, BUFFER_WIDTH - 1),
            (row, col) => Position::new(row, col - 1),
        };
        self.cells.write(target.row, target.col, ScreenChar::blank(self.color));
        self.move_cursor(target);
    }

    fn scroll_up(&mut self) {
        for row in 1..BUFFER_HEIGHT {
            for col in 0..BUFFER_WIDTH {
                let character = self.cells.read(row, col);
                self.cells.write(row - 1, col, character);
            }
        }
        self.clear_row(BUFFER_HEIGHT - 1);
    }

    fn clear_row(&mut self, row: usize) {
        let blank = ScreenChar::blank(self.color);
        for col in 0..BUFFER_WIDTH {
            self.cells.write(row, col, blank);
        }
    }

    fn move_cursor(&mut self, pos: Position) {
        self.cursor = pos;
        self.sync_cursor();
    }

    fn sync_cursor(&mut self) {
        self.port.set(cursor::encode(self.cursor, self.visible));
    }
}

impl<S: CellStore, P: CursorPort> fmt::Write for Console<S, P> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            self.putbyte(byte);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::vga::SCREEN_CELLS;
    use crate::cursor::MemoryCursorPort;
    use crate::vga_buffer::{Color, MemoryCellStore};

    type TestConsole = Console<MemoryCellStore, MemoryCursorPort>;

    const LAST_ROW: usize = BUFFER_HEIGHT - 1;
    const LAST_COL: usize = BUFFER_WIDTH - 1;

    fn console() -> TestConsole {
        let mut con = Console::new(MemoryCellStore::new(), MemoryCursorPort::new());
        con.clear_console();
        con
    }

    fn fill_rows(con: &mut TestConsole) {
        for row in 0..BUFFER_HEIGHT {
            let ch = b'A' + row as u8;
            for col in 0..BUFFER_WIDTH {
                con.draw_char(row, col, ch, ColorCode::from_raw(row as u8)).unwrap();
            }
        }
    }

    #[test]
    fn new_adopts_cursor_register() {
        let hidden = MemoryCursorPort::with_offset((SCREEN_CELLS + 3 * BUFFER_WIDTH + 4) as u16);
        let con = Console::new(MemoryCellStore::new(), hidden);
        assert_eq!(con.get_cursor(), Position::new(3, 4));
        assert!(!con.is_cursor_visible());
    }

    #[test]
    fn putbytes_with_embedded_newline() {
        let mut con = console();
        con.putbytes(b"AB\nCD").unwrap();
        assert_eq!(con.get_char(0, 0), Ok(b'A'));
        assert_eq!(con.get_char(0, 1), Ok(b'B'));
        assert_eq!(con.get_char(1, 0), Ok(b'C'));
        assert_eq!(con.get_char(1, 1), Ok(b'D'));
        assert_eq!(con.get_cursor(), Position::new(1, 2));
        assert_eq!(con.port().offset(), (BUFFER_WIDTH + 2) as u16);
    }

    #[test]
    fn putbytes_rejects_empty_input() {
        let mut con = console();
        con.set_cursor(4, 4).unwrap();
        let writes = con.port().writes();
        assert_eq!(con.putbytes(b""), Err(ConsoleError::EmptyWrite));
        assert_eq!(con.get_cursor(), Position::new(4, 4));
        assert_eq!(con.port().writes(), writes);
    }

    #[test]
    fn putbyte_returns_its_input_for_every_byte() {
        let mut con = console();
        for byte in [0u8, 0x7f, 0xfe, 0xff, b'x'] {
            assert_eq!(con.putbyte(byte), byte);
        }
        assert_eq!(con.get_char(0, 2), Ok(0xfe));
    }

    #[test]
    fn putbyte_uses_term_color() {
        let mut con = console();
        let color = ColorCode::new(Color::Yellow, Color::Black);
        con.set_term_color(color).unwrap();
        con.putbyte(b'k');
        assert_eq!(con.get_char_color(0, 0), Ok(color));
    }

    #[test]
    fn newline_moves_down_without_scrolling() {
        let mut con = console();
        fill_rows(&mut con);
        con.set_cursor(5, 17).unwrap();
        con.putbyte(b'\n');
        assert_eq!(con.get_cursor(), Position::new(6, 0));
        assert_eq!(con.get_char(0, 0), Ok(b'A'));
    }

    #[test]
    fn newline_on_last_row_scrolls_everything_up() {
        let mut con = console();
        fill_rows(&mut con);
        let color = ColorCode::new(Color::White, Color::Blue);
        con.set_term_color(color).unwrap();
        con.set_cursor(LAST_ROW, 40).unwrap();

        con.putbyte(b'\n');

        assert_eq!(con.get_cursor(), Position::new(LAST_ROW, 0));
        for row in 0..LAST_ROW {
            let expected = b'A' + row as u8 + 1;
            assert_eq!(con.get_char(row, 0), Ok(expected));
            assert_eq!(con.get_char(row, LAST_COL), Ok(expected));
            assert_eq!(con.get_char_color(row, 3), Ok(ColorCode::from_raw(row as u8 + 1)));
        }
        for col in 0..BUFFER_WIDTH {
            assert_eq!(con.get_char(LAST_ROW, col), Ok(b' '));
            assert_eq!(con.get_char_color(LAST_ROW, col), Ok(color));
        }
    }

    #[test]
    fn carriage_return_stays_on_line() {
        let mut con = console();
        con.set_cursor(LAST_ROW, 30).unwrap();
        con.putbyte(b'\r');
        assert_eq!(con.get_cursor(), Position::new(LAST_ROW, 0));
        con.putbytes(b"xy\rz").unwrap();
        assert_eq!(con.get_char(LAST_ROW, 0), Ok(b'z'));
        assert_eq!(con.get_char(LAST_ROW, 1), Ok(b'y'));
    }

    #[test]
    fn tab_is_one_space() {
        let mut con = console();
        con.putbytes(b"a\tb").unwrap();
        assert_eq!(con.get_char(0, 1), Ok(b' '));
        assert_eq!(con.get_char(0, 2), Ok(b'b'));
        assert_eq!(con.get_cursor(), Position::new(0, 3));
    }

    #[test]
    fn full_line_wraps_like_newline() {
        let mut con = console();
        let line = [b'#'; BUFFER_WIDTH];
        con.set_cursor(3, 0).unwrap();
        con.putbytes(&line).unwrap();
        assert_eq!(con.get_cursor(), Position::new(4, 0));
        con.putbyte(b'!');
        assert_eq!(con.get_char(3, LAST_COL), Ok(b'#'));
        assert_eq!(con.get_char(4, 0), Ok(b'!'));
    }

    #[test]
    fn full_last_line_wraps_with_scroll() {
        let mut con = console();
        let line = [b'=' ; BUFFER_WIDTH];
        con.set_cursor(LAST_ROW, 0).unwrap();
        con.putbytes(&line).unwrap();
        assert_eq!(con.get_cursor(), Position::new(LAST_ROW, 0));
        assert_eq!(con.get_char(LAST_ROW - 1, 0), Ok(b'='));
        assert_eq!(con.get_char(LAST_ROW - 1, LAST_COL), Ok(b'='));
        assert_eq!(con.get_char(LAST_ROW, 0), Ok(b' '));
    }

    #[test]
    fn backspace_at_origin_is_a_no_op() {
        let mut con = console();
        con.draw_char(0, 0, b'q', ColorCode::default()).unwrap();
        let writes = con.port().writes();
        con.putbyte(b'\x08');
        assert_eq!(con.get_cursor(), Position::ORIGIN);
        assert_eq!(con.get_char(0, 0), Ok(b'q'));
        assert_eq!(con.port().writes(), writes);
    }

    #[test]
    fn backspace_mid_line_erases_previous_cell() {
        let mut con = console();
        con.putbytes(b"abc\x08").unwrap();
        assert_eq!(con.get_cursor(), Position::new(0, 2));
        assert_eq!(con.get_char(0, 2), Ok(b' '));
        assert_eq!(con.get_char(0, 1), Ok(b'b'));
    }

    #[test]
    fn backspace_at_line_start_erases_previous_row_end() {
        let mut con = console();
        fill_rows(&mut con);
        con.set_cursor(7, 0).unwrap();
        con.backspace(con.get_cursor()).unwrap();
        assert_eq!(con.get_cursor(), Position::new(6, LAST_COL));
        assert_eq!(con.get_char(6, LAST_COL), Ok(b' '));
        assert_eq!(con.get_char(6, LAST_COL - 1), Ok(b'G'));
        assert_eq!(con.get_char(7, 0), Ok(b'H'));
    }

    #[test]
    fn explicit_position_operations_validate() {
        let mut con = console();
        let off = Position::new(BUFFER_HEIGHT, 0);
        assert!(con.nextline(off).is_err());
        assert!(con.backspace(off).is_err());
        assert_eq!(con.get_cursor(), Position::ORIGIN);

        con.nextline(Position::new(10, 33)).unwrap();
        assert_eq!(con.get_cursor(), Position::new(11, 0));
    }

    #[test]
    fn illegal_color_is_rejected() {
        let mut con = console();
        let before = con.get_term_color();
        assert_eq!(
            con.set_term_color(ColorCode::from_raw(0x90)),
            Err(ConsoleError::IllegalColor(0x90))
        );
        assert_eq!(con.get_term_color(), before);
        assert!(con.draw_char(0, 0, b'x', ColorCode::from_raw(0xFF)).is_err());
        assert_eq!(con.get_char(0, 0), Ok(b' '));
    }

    #[test]
    fn out_of_range_cells_are_errors() {
        let mut con = console();
        assert!(con.draw_char(BUFFER_HEIGHT, 0, b'x', ColorCode::default()).is_err());
        assert!(con.get_char(0, BUFFER_WIDTH).is_err());
        assert!(con.get_char_color(BUFFER_HEIGHT, BUFFER_WIDTH).is_err());
        assert!(con.set_cursor(BUFFER_HEIGHT, 0).is_err());
        assert_eq!(con.get_cursor(), Position::ORIGIN);
    }

    #[test]
    fn draw_char_leaves_cursor_alone() {
        let mut con = console();
        con.set_cursor(2, 2).unwrap();
        con.draw_char(20, 70, b'@', ColorCode::from_raw(0x70)).unwrap();
        assert_eq!(con.get_cursor(), Position::new(2, 2));
        assert_eq!(con.get_char(20, 70), Ok(b'@'));
        assert_eq!(con.get_char_color(20, 70), Ok(ColorCode::from_raw(0x70)));
    }

    #[test]
    fn hide_then_show_round_trips_position() {
        let mut con = console();
        con.set_cursor(9, 31).unwrap();
        con.hide_cursor();
        assert_eq!(con.port().offset(), (SCREEN_CELLS + 9 * BUFFER_WIDTH + 31) as u16);
        assert_eq!(con.get_cursor(), Position::new(9, 31));
        con.show_cursor();
        assert_eq!(con.port().offset(), (9 * BUFFER_WIDTH + 31) as u16);
        assert_eq!(con.get_cursor(), Position::new(9, 31));
    }

    #[test]
    fn hide_and_show_are_idempotent() {
        let mut con = console();
        con.show_cursor();
        let writes = con.port().writes();
        con.show_cursor();
        assert_eq!(con.port().writes(), writes);

        con.hide_cursor();
        let hidden = con.port().offset();
        con.hide_cursor();
        assert_eq!(con.port().offset(), hidden);
        assert_eq!(con.port().writes(), writes + 1);
    }

    #[test]
    fn set_cursor_while_hidden_stays_hidden() {
        let mut con = console();
        con.hide_cursor();
        con.set_cursor(20, 5).unwrap();
        assert_eq!(con.get_cursor(), Position::new(20, 5));
        assert!(!con.is_cursor_visible());
        assert_eq!(con.port().offset(), (SCREEN_CELLS + 20 * BUFFER_WIDTH + 5) as u16);

        let writes = con.port().writes();
        con.show_cursor();
        assert_eq!(con.port().writes(), writes + 1);
        assert_eq!(con.port().offset(), (20 * BUFFER_WIDTH + 5) as u16);
    }

    #[test]
    fn writing_while_hidden_keeps_cursor_hidden() {
        let mut con = console();
        con.hide_cursor();
        con.putbytes(b"hi\nthere").unwrap();
        assert!(!con.is_cursor_visible());
        assert_eq!(con.port().offset(), (SCREEN_CELLS + BUFFER_WIDTH + 5) as u16);
    }

    #[test]
    fn clear_console_blanks_in_current_color_and_keeps_hidden() {
        let mut con = console();
        fill_rows(&mut con);
        let color = ColorCode::new(Color::Black, Color::LightGray);
        con.set_term_color(color).unwrap();
        con.set_cursor(12, 12).unwrap();
        con.hide_cursor();

        con.clear_console();

        assert_eq!(con.get_cursor(), Position::ORIGIN);
        assert!(!con.is_cursor_visible());
        assert_eq!(con.port().offset(), SCREEN_CELLS as u16);
        for row in [0, 12, LAST_ROW] {
            assert_eq!(con.cells().row_bytes(row), [b' '; BUFFER_WIDTH]);
            assert_eq!(con.get_char_color(row, LAST_COL), Ok(color));
        }
    }

    #[test]
    fn fmt_write_goes_through_putbyte() {
        let mut con = console();
        con.print_fmt(format_args!("moves:\n{}", 42));
        assert_eq!(&con.cells().row_bytes(0)[..6], b"moves:");
        assert_eq!(&con.cells().row_bytes(1)[..2], b"42");
        assert_eq!(con.get_cursor(), Position::new(1, 2));
    }
}
