//! Monotonic time source
//!
//! All firmware timing is done on a free-running 32-bit microsecond counter.
//! The counter wraps after ~71 minutes, so elapsed time must always be
//! computed with [`elapsed_usec`] (wrapping subtraction) and never by
//! comparing two raw timestamps.

use core::cell::Cell;

/// Microseconds elapsed from `since` to `now`, correct across one wrap
#[inline]
pub const fn elapsed_usec(now: u32, since: u32) -> u32 {
    now.wrapping_sub(since)
}

/// Monotonic microsecond counter
pub trait Clock {
    /// Current counter value in microseconds
    fn now_usec(&self) -> u32;

    /// Microseconds elapsed since an earlier reading
    fn usec_since(&self, since: u32) -> u32 {
        elapsed_usec(self.now_usec(), since)
    }
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_usec(&self) -> u32 {
        (**self).now_usec()
    }
}

/// Clock that only moves when told to
///
/// Stands in for the hardware timer on the host. Shared by reference, so a
/// test can keep advancing it while a controller holds `&ManualClock`.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u32>,
}

impl ManualClock {
    /// Create a clock reading `start` microseconds
    pub const fn new(start: u32) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    /// Move the clock forward, wrapping like the hardware counter
    pub fn advance(&self, usec: u32) {
        self.now.set(self.now.get().wrapping_add(usec));
    }

    /// Move the clock forward by whole milliseconds
    pub fn advance_ms(&self, ms: u32) {
        self.advance(ms.wrapping_mul(1000));
    }

    /// Jump to an absolute counter value
    pub fn set(&self, usec: u32) {
        self.now.set(usec);
    }
}

impl Clock for ManualClock {
    fn now_usec(&self) -> u32 {
        self.now.get()
    }
}
