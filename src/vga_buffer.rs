//! Character + attribute grid behind the console.
//!
//! [`CellStore`] is the seam between the console state machine and the
//! memory it draws into: [`VgaBuffer`] is the real text buffer at
//! `0xb8000`, [`MemoryCellStore`] is an ordinary array used off-hardware.

use volatile::Volatile;
use crate::constants::vga::{BUFFER_HEIGHT, BUFFER_WIDTH};

#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Color {
    Black = 0,
    Blue = 1,
    Green = 2,
    Cyan = 3,
    Red = 4,
    Magenta = 5,
    Brown = 6,
    LightGray = 7,
    DarkGray = 8,
    LightBlue = 9,
    LightGreen = 10,
    LightCyan = 11,
    LightRed = 12,
    Pink = 13,
    Yellow = 14,
    White = 15,
}

/// Packed attribute byte: foreground in the low nibble, background in the
/// high nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct ColorCode(u8);

impl ColorCode {
    /// Highest attribute byte the console accepts.
    pub const MAX_LEGAL: u8 = 0x8F;

    pub const fn new(foreground: Color, background: Color) -> ColorCode {
        ColorCode((foreground as u8) | ((background as u8) << 4))
    }

    /// Wrap a raw attribute byte without checking it.
    pub const fn from_raw(raw: u8) -> ColorCode {
        ColorCode(raw)
    }

    pub const fn raw(self) -> u8 {
        self.0
    }

    pub const fn foreground(self) -> u8 {
        self.0 & 0x0F
    }

    pub const fn background(self) -> u8 {
        self.0 >> 4
    }

    /// Whether this attribute belongs to the set the console will draw with.
    pub const fn is_legal(self) -> bool {
        self.0 <= Self::MAX_LEGAL
    }
}

impl Default for ColorCode {
    fn default() -> Self {
        ColorCode::new(Color::White, Color::Black)
    }
}

/// One text cell as laid out in video memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct ScreenChar {
    pub ascii_character: u8,
    pub color_code: ColorCode,
}

impl ScreenChar {
    pub const fn new(ascii_character: u8, color_code: ColorCode) -> ScreenChar {
        ScreenChar { ascii_character, color_code }
    }

    pub const fn blank(color_code: ColorCode) -> ScreenChar {
        ScreenChar::new(b' ', color_code)
    }
}

/// Storage for a `BUFFER_HEIGHT x BUFFER_WIDTH` grid of cells.
///
/// Callers guarantee `row < BUFFER_HEIGHT` and `col < BUFFER_WIDTH`;
/// implementations may panic otherwise.
pub trait CellStore {
    fn write(&mut self, row: usize, col: usize, cell: ScreenChar);
    fn read(&self, row: usize, col: usize) -> ScreenChar;
}

impl<T: CellStore + ?Sized> CellStore for &mut T {
    fn write(&mut self, row: usize, col: usize, cell: ScreenChar) {
        (**self).write(row, col, cell)
    }

    fn read(&self, row: usize, col: usize) -> ScreenChar {
        (**self).read(row, col)
    }
}

/// The memory-mapped VGA text buffer.
#[repr(transparent)]
pub struct VgaBuffer {
    chars: [[Volatile<ScreenChar>; BUFFER_WIDTH]; BUFFER_HEIGHT],
}

impl VgaBuffer {
    /// Map the text buffer living at `addr`.
    ///
    /// # Safety
    ///
    /// `addr` must point to `BUFFER_HEIGHT * BUFFER_WIDTH * 2` bytes that stay
    /// valid for the rest of the program and are not aliased elsewhere.
    pub unsafe fn at(addr: usize) -> &'static mut VgaBuffer {
        &mut *(addr as *mut VgaBuffer)
    }
}

impl CellStore for VgaBuffer {
    fn write(&mut self, row: usize, col: usize, cell: ScreenChar) {
        self.chars[row][col].write(cell);
    }

    fn read(&self, row: usize, col: usize) -> ScreenChar {
        self.chars[row][col].read()
    }
}

/// Software-backed grid with the same geometry as the VGA buffer.
#[derive(Clone)]
pub struct MemoryCellStore {
    chars: [[ScreenChar; BUFFER_WIDTH]; BUFFER_HEIGHT],
}

impl MemoryCellStore {
    pub const fn new() -> MemoryCellStore {
        MemoryCellStore {
            chars: [[ScreenChar::new(0, ColorCode::from_raw(0)); BUFFER_WIDTH]; BUFFER_HEIGHT],
        }
    }

    /// Characters of one row, for assertions and debugging.
    pub fn row_bytes(&self, row: usize) -> [u8; BUFFER_WIDTH] {
        let mut out = [0u8; BUFFER_WIDTH];
        for (col, cell) in self.chars[row].iter().enumerate() {
            out[col] = cell.ascii_character;
        }
        out
    }
}

impl Default for MemoryCellStore {
    fn default() -> Self {
        MemoryCellStore::new()
    }
}

impl CellStore for MemoryCellStore {
    fn write(&mut self, row: usize, col: usize, cell: ScreenChar) {
        self.chars[row][col] = cell;
    }

    fn read(&self, row: usize, col: usize) -> ScreenChar {
        self.chars[row][col]
    }
}
