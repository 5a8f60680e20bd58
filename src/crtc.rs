use x86_64::instructions::interrupts::without_interrupts;
use x86_64::instructions::port::Port;

use lightsout::constants::vga::{
    CRTC_DATA_PORT, CRTC_INDEX_PORT, CURSOR_LOCATION_HIGH, CURSOR_LOCATION_LOW,
};
use lightsout::CursorPort;

/// Cursor location registers of the VGA CRT controller.
///
/// Each byte is an index write followed by a data transfer. Interrupts are
/// masked for the whole exchange so nothing can re-select the index in
/// between.
pub struct CrtcCursorPort {
    index: Port<u8>,
    data: Port<u8>,
}

impl CrtcCursorPort {
    pub const fn new() -> CrtcCursorPort {
        CrtcCursorPort {
            index: Port::new(CRTC_INDEX_PORT),
            data: Port::new(CRTC_DATA_PORT),
        }
    }
}

impl CursorPort for CrtcCursorPort {
    fn set(&mut self, offset: u16) {
        without_interrupts(|| unsafe {
            self.index.write(CURSOR_LOCATION_LOW);
            self.data.write((offset & 0xFF) as u8);
            self.index.write(CURSOR_LOCATION_HIGH);
            self.data.write((offset >> 8) as u8);
        });
    }

    fn get(&mut self) -> u16 {
        without_interrupts(|| unsafe {
            self.index.write(CURSOR_LOCATION_LOW);
            let low = self.data.read();
            self.index.write(CURSOR_LOCATION_HIGH);
            let high = self.data.read();
            u16::from(low) | (u16::from(high) << 8)
        })
    }
}
