/// System-wide constants to avoid magic numbers

/// VGA text mode constants
pub mod vga {
    /// VGA text buffer physical address
    pub const BUFFER_ADDR: usize = 0xb8000;

    /// VGA text mode dimensions
    pub const BUFFER_HEIGHT: usize = 25;
    pub const BUFFER_WIDTH: usize = 80;

    /// Number of cursor offsets on one screen. The CRTC accepts twice this;
    /// the upper half parks the cursor off-screen.
    pub const SCREEN_CELLS: usize = BUFFER_HEIGHT * BUFFER_WIDTH;

    /// CRTC index/data ports
    pub const CRTC_INDEX_PORT: u16 = 0x3D4;
    pub const CRTC_DATA_PORT: u16 = 0x3D5;

    /// Cursor location registers
    pub const CURSOR_LOCATION_HIGH: u8 = 0x0E;
    pub const CURSOR_LOCATION_LOW: u8 = 0x0F;
}

/// PS/2 Keyboard controller constants
pub mod keyboard {
    /// PS/2 keyboard data port
    pub const DATA_PORT: u16 = 0x60;

    /// Scancodes buffered between the keyboard interrupt and the game loop
    pub const SCANCODE_QUEUE_SIZE: usize = 1024;
}

/// Interrupt constants
pub mod interrupts {
    /// PIC (Programmable Interrupt Controller) offset
    /// We remap PIC interrupts to start at 32 to avoid conflicts with CPU exceptions
    pub const PIC_1_OFFSET: u8 = 32;
    pub const PIC_2_OFFSET: u8 = PIC_1_OFFSET + 8;

    /// Master PIC data (mask) port
    pub const PIC_1_DATA_PORT: u16 = 0x21;

    /// Mask with only IRQ0 (timer) and IRQ1 (keyboard) enabled
    pub const PIC_1_MASK: u8 = !0b0000_0011;
    pub const PIC_2_MASK: u8 = 0xFF;
    pub const PIC_2_DATA_PORT: u16 = 0xA1;
}

/// Programmable interval timer (8253/8254) constants
pub mod timer {
    pub const MODE_PORT: u16 = 0x43;
    pub const CHANNEL0_PORT: u16 = 0x40;

    /// Channel 0, lobyte/hibyte, square wave generator
    pub const SQUARE_WAVE: u8 = 0x36;

    /// PIT input clock in Hz
    pub const BASE_RATE: u32 = 1_193_182;

    /// Timer interrupts per second
    pub const TICKS_PER_SECOND: u32 = 100;

    pub const DIVISOR: u16 = (BASE_RATE / TICKS_PER_SECOND) as u16;
}

/// Serial port used for log output
pub mod serial {
    pub const COM1: u16 = 0x3F8;
}

/// Lights Out rules
pub mod game {
    /// Side length of the light grid
    pub const GRID_SIZE: usize = 5;

    /// Random toggles applied to a clear board to build a new puzzle
    pub const SCRAMBLE_DEPTH: usize = 10;

    /// Label of the top-left square
    pub const FIRST_LABEL: char = 'a';
    /// Label of the bottom-right square
    pub const LAST_LABEL: char = 'y';
}
