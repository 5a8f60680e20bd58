//! COM1 log sink.

use core::fmt;

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use spin::Mutex;
use x86_64::instructions::interrupts::without_interrupts;
use x86_64::instructions::port::Port;

use lightsout::constants::serial::COM1;

/// Line status: transmit holding register empty
const LSR_THR_EMPTY: u8 = 0x20;

struct SerialPort {
    base: u16,
    ready: bool,
}

impl SerialPort {
    const fn new(base: u16) -> SerialPort {
        SerialPort { base, ready: false }
    }

    fn port(&self, offset: u16) -> Port<u8> {
        Port::new(self.base + offset)
    }

    /// 115200 baud, 8N1, FIFOs on, interrupts off.
    fn init(&mut self) {
        unsafe {
            self.port(1).write(0x00);
            self.port(3).write(0x80);
            self.port(0).write(0x01);
            self.port(1).write(0x00);
            self.port(3).write(0x03);
            self.port(2).write(0xC7);
            self.port(4).write(0x0B);
        }
        self.ready = true;
    }

    fn write_byte(&mut self, byte: u8) {
        if !self.ready {
            return;
        }
        let mut line_status = self.port(5);
        while unsafe { line_status.read() } & LSR_THR_EMPTY == 0 {
            core::hint::spin_loop();
        }
        unsafe { self.port(0).write(byte) };
    }
}

impl fmt::Write for SerialPort {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            if byte == b'\n' {
                self.write_byte(b'\r');
            }
            self.write_byte(byte);
        }
        Ok(())
    }
}

static SERIAL: Mutex<SerialPort> = Mutex::new(SerialPort::new(COM1));

struct SerialLogger;

impl Log for SerialLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        without_interrupts(|| {
            use fmt::Write;
            let mut port = SERIAL.lock();
            let _ = writeln!(port, "[{:>5}] {}", record.level(), record.args());
        });
    }

    fn flush(&self) {}
}

static LOGGER: SerialLogger = SerialLogger;

/// Bring up COM1 and route the `log` facade to it.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    without_interrupts(|| SERIAL.lock().init());
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}
