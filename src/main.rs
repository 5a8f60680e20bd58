#![no_std]
#![no_main]
#![feature(abi_x86_interrupt)]

mod crtc;
mod interrupts;
mod serial;

use core::panic::PanicInfo;

use lazy_static::lazy_static;
use log::{error, info, LevelFilter};
use spin::Mutex;
use x86_64::instructions::interrupts::{self as cpu_interrupts, without_interrupts};

use lightsout::constants::vga::BUFFER_ADDR;
use lightsout::game::Game;
use lightsout::ticks::{GameClock, TickCounter};
use lightsout::vga_buffer::VgaBuffer;
use lightsout::{paint, readchar, Console, InputQueue, KeyDecoder};

use crate::crtc::CrtcCursorPort;

pub type KernelConsole = Console<&'static mut VgaBuffer, CrtcCursorPort>;

/// Scancodes queued by the keyboard interrupt
pub static INPUT: InputQueue = InputQueue::new();
/// Timer interrupts since boot
pub static TICKS: TickCounter = TickCounter::new();
/// Play time of the current board
pub static CLOCK: GameClock = GameClock::new();

lazy_static! {
    pub static ref CONSOLE: Mutex<KernelConsole> = Mutex::new(Console::new(
        unsafe { VgaBuffer::at(BUFFER_ADDR) },
        CrtcCursorPort::new(),
    ));
}

/// Run `f` on the console. The lock is only ever held by the foreground
/// with interrupts masked, so the timer path never finds it taken.
pub fn with_console<R>(f: impl FnOnce(&mut KernelConsole) -> R) -> R {
    without_interrupts(|| f(&mut *CONSOLE.lock()))
}

#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => ($crate::_print(format_args!($($arg)*)));
}

#[macro_export]
macro_rules! println {
    () => ($crate::print!("\n"));
    ($($arg:tt)*) => ($crate::print!("{}\n", format_args!($($arg)*)));
}

#[doc(hidden)]
pub fn _print(args: core::fmt::Arguments) {
    without_interrupts(|| {
        if let Some(mut console) = CONSOLE.try_lock() {
            console.print_fmt(args);
        }
    });
}

/// Timer callback: advance the game clock and repaint the seconds display.
fn tick(total: u32) {
    if let Some(seconds) = CLOCK.on_tick(total) {
        if let Some(mut console) = CONSOLE.try_lock() {
            // errors here only mean an off-screen layout; nothing to recover
            let _ = paint::update_time(&mut *console, seconds);
        }
    }
}

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    cpu_interrupts::disable();
    error!("{}", info);
    println!("{}", info);
    loop {
        x86_64::instructions::hlt();
    }
}

#[no_mangle]
pub extern "C" fn _start() -> ! {
    if serial::init(LevelFilter::Debug).is_err() {
        println!("logger already installed");
    }
    info!("lightsout: starting");

    lazy_static::initialize(&CONSOLE);
    TICKS.install(tick);
    interrupts::init();

    let mut game = Game::new();
    let mut decoder = KeyDecoder::new();

    if let Err(err) = with_console(|console| game.start(console, &CLOCK)) {
        error!("title screen: {}", err);
    }

    loop {
        match readchar(&INPUT, &mut decoder) {
            Some(ch) => {
                if let Err(err) = with_console(|console| game.handle_key(ch, console, &CLOCK)) {
                    error!("key {:?}: {}", ch, err);
                }
            }
            None => {
                // Sleep only if nothing arrived since the last check.
                cpu_interrupts::disable();
                if INPUT.is_empty() {
                    cpu_interrupts::enable_and_hlt();
                } else {
                    cpu_interrupts::enable();
                }
            }
        }
    }
}
