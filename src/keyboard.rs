use pc_keyboard::{layouts, DecodedKey, HandleControl, Keyboard, ScancodeSet1};

use crate::input_queue::InputQueue;

/// Turns raw set-1 scancodes into characters, tracking modifier state
/// across calls.
pub struct KeyDecoder {
    keyboard: Keyboard<layouts::Us104Key, ScancodeSet1>,
}

impl KeyDecoder {
    pub const fn new() -> KeyDecoder {
        KeyDecoder {
            keyboard: Keyboard::new(
                ScancodeSet1::new(),
                layouts::Us104Key,
                HandleControl::Ignore,
            ),
        }
    }

    /// Feed one scancode. Yields a character only when it completes a
    /// key-down event that maps to one; releases, modifiers, partial
    /// multi-byte sequences and non-character keys yield `None`.
    pub fn decode(&mut self, scancode: u8) -> Option<char> {
        if let Ok(Some(key_event)) = self.keyboard.add_byte(scancode) {
            if let Some(DecodedKey::Unicode(c)) = self.keyboard.process_keyevent(key_event) {
                return Some(c);
            }
        }
        None
    }
}

impl Default for KeyDecoder {
    fn default() -> Self {
        KeyDecoder::new()
    }
}

/// Pop at most one scancode and decode it. Never blocks; `None` means no
/// character is available right now.
pub fn readchar<const N: usize>(queue: &InputQueue<N>, decoder: &mut KeyDecoder) -> Option<char> {
    let scancode = queue.dequeue()?;
    decoder.decode(scancode)
}
