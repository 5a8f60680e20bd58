//! Text console, keyboard input queue and the Lights Out game that runs on
//! them.
//!
//! Everything here is hardware-agnostic: video memory and the cursor
//! register sit behind [`vga_buffer::CellStore`] and [`cursor::CursorPort`],
//! so the same code drives the VGA text buffer in the kernel and plain
//! memory under `cargo test`.

#![cfg_attr(not(test), no_std)]

pub mod console;
pub mod constants;
pub mod cursor;
pub mod error;
pub mod game;
pub mod input_queue;
pub mod keyboard;
pub mod paint;
pub mod ticks;
pub mod vga_buffer;

pub use console::Console;
pub use cursor::{CursorPort, Position};
pub use error::ConsoleError;
pub use input_queue::InputQueue;
pub use keyboard::{readchar, KeyDecoder};
pub use vga_buffer::{CellStore, Color, ColorCode, ScreenChar};
