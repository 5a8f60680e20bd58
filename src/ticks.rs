//! Timer tick accounting.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use spin::Once;

use crate::constants::timer::TICKS_PER_SECOND;

/// Callback run from the timer interrupt with the running tick total.
pub type Tickback = fn(u32);

/// Counts timer interrupts since boot.
pub struct TickCounter {
    ticks: AtomicU32,
    tickback: Once<Tickback>,
}

impl TickCounter {
    pub const fn new() -> TickCounter {
        TickCounter {
            ticks: AtomicU32::new(0),
            tickback: Once::new(),
        }
    }

    /// Install the per-tick callback. Only the first installation sticks.
    pub fn install(&self, tickback: Tickback) -> bool {
        let mut installed = false;
        self.tickback.call_once(|| {
            installed = true;
            tickback
        });
        installed
    }

    /// Record one timer interrupt and run the callback, if any.
    pub fn tick(&self) -> u32 {
        let total = self.ticks.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
        if let Some(tickback) = self.tickback.get() {
            tickback(total);
        }
        total
    }

    pub fn total(&self) -> u32 {
        self.ticks.load(Ordering::Relaxed)
    }
}

impl Default for TickCounter {
    fn default() -> Self {
        TickCounter::new()
    }
}

/// Elapsed play time, advanced from the timer interrupt while a game is
/// running.
pub struct GameClock {
    total_ticks: AtomicU32,
    game_ticks: AtomicU32,
    running: AtomicBool,
}

impl GameClock {
    pub const fn new() -> GameClock {
        GameClock {
            total_ticks: AtomicU32::new(0),
            game_ticks: AtomicU32::new(0),
            running: AtomicBool::new(false),
        }
    }

    /// Tick handler body. Returns the elapsed game seconds whenever a whole
    /// second has just completed.
    pub fn on_tick(&self, total: u32) -> Option<u32> {
        self.total_ticks.store(total, Ordering::Relaxed);
        if !self.running.load(Ordering::Acquire) {
            return None;
        }
        let elapsed = self.game_ticks.fetch_add(1, Ordering::Relaxed) + 1;
        if elapsed % TICKS_PER_SECOND == 0 {
            Some(elapsed / TICKS_PER_SECOND)
        } else {
            None
        }
    }

    pub fn pause(&self) {
        self.running.store(false, Ordering::Release);
    }

    pub fn resume(&self) {
        self.running.store(true, Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn reset(&self) {
        self.game_ticks.store(0, Ordering::Relaxed);
    }

    pub fn game_ticks(&self) -> u32 {
        self.game_ticks.load(Ordering::Relaxed)
    }

    pub fn seconds(&self) -> u32 {
        self.game_ticks() / TICKS_PER_SECOND
    }

    /// Ticks since boot as last reported by the timer.
    pub fn total_ticks(&self) -> u32 {
        self.total_ticks.load(Ordering::Relaxed)
    }
}

impl Default for GameClock {
    fn default() -> Self {
        GameClock::new()
    }
}
