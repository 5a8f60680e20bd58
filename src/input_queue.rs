//! Scancode FIFO between the keyboard interrupt and the game loop.
//!
//! Single producer (the keyboard handler), single consumer (the foreground
//! loop). Neither side blocks or locks. The producer owns `head`, the
//! consumer owns `tail`; both are free-running counters, so `head - tail` is
//! the number of codes written since the consumer last caught up.
//!
//! When the producer laps the consumer the oldest codes are overwritten. Every
//! slot carries the sequence number it was written for, which lets the
//! consumer tell a live code from a recycled slot and skip ahead to the
//! oldest code still held. Lost codes are counted in [`InputQueue::overruns`].

use core::sync::atomic::{AtomicUsize, Ordering};

use log::warn;

use crate::constants::keyboard::SCANCODE_QUEUE_SIZE;

const CODE_BITS: u32 = 8;
const SEQ_MASK: usize = usize::MAX >> CODE_BITS;

#[allow(clippy::declare_interior_mutable_const)]
const EMPTY_SLOT: AtomicUsize = AtomicUsize::new(0);

pub struct InputQueue<const N: usize = SCANCODE_QUEUE_SIZE> {
    slots: [AtomicUsize; N],
    head: AtomicUsize,
    tail: AtomicUsize,
    overruns: AtomicUsize,
}

impl<const N: usize> InputQueue<N> {
    pub const fn new() -> Self {
        assert!(N > 0, "input queue needs at least one slot");
        InputQueue {
            slots: [EMPTY_SLOT; N],
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            overruns: AtomicUsize::new(0),
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Queue a scancode. Producer side only; O(1), never blocks or fails.
    /// A full queue loses its oldest unread code.
    pub fn enqueue(&self, code: u8) {
        let head = self.head.load(Ordering::Relaxed);
        let stamp = ((head & SEQ_MASK) << CODE_BITS) | usize::from(code);
        self.slots[head % N].store(stamp, Ordering::Release);
        self.head.store(head.wrapping_add(1), Ordering::Release);
    }

    /// Oldest unread scancode, or `None` if everything has been consumed.
    /// Consumer side only.
    pub fn dequeue(&self) -> Option<u8> {
        let mut tail = self.tail.load(Ordering::Relaxed);
        loop {
            let head = self.head.load(Ordering::Acquire);
            let pending = head.wrapping_sub(tail);
            if pending == 0 {
                return None;
            }
            if pending > N {
                let lost = pending - N;
                self.overruns.fetch_add(lost, Ordering::Relaxed);
                warn!("input queue overrun: {} scancodes dropped", lost);
                tail = head.wrapping_sub(N);
            }

            let stamp = self.slots[tail % N].load(Ordering::Acquire);
            if stamp >> CODE_BITS == tail & SEQ_MASK {
                self.tail.store(tail.wrapping_add(1), Ordering::Release);
                return Some(stamp as u8);
            }
            // The producer recycled this slot after we read `head`.
            core::hint::spin_loop();
        }
    }

    /// Unread codes still recoverable.
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        head.wrapping_sub(tail).min(N)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Codes overwritten before the consumer reached them.
    pub fn overruns(&self) -> usize {
        self.overruns.load(Ordering::Relaxed)
    }
}

impl<const N: usize> Default for InputQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}
