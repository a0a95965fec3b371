//! Button dispatcher
//!
//! Polls every registered button, but only while there is something to do:
//! an edge interrupt raises the shared [`WakeFlag`], and the flag stays
//! raised for as long as any button reports itself busy. While idle, a call
//! to [`ButtonDispatcher::update`] costs a single atomic load.

use core::sync::atomic::{AtomicBool, Ordering};

use heapless::Vec;
use tactus_hal::time::elapsed_usec;
use tactus_hal::Clock;

use super::POLL_INTERVAL_USEC;

/// Something the dispatcher can poll
pub trait PollButton {
    /// Sample once and advance; returns whether polling has to continue
    fn poll(&mut self, now_usec: u32, sequence: &mut EventSequence) -> bool;
}

impl<T: PollButton + ?Sized> PollButton for &mut T {
    fn poll(&mut self, now_usec: u32, sequence: &mut EventSequence) -> bool {
        (**self).poll(now_usec, sequence)
    }
}

/// Source of interaction sequence numbers
///
/// Numbers start at 1 and skip 0 on wrap; 0 means "no interaction".
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EventSequence {
    next: u32,
}

impl Default for EventSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSequence {
    /// Create a sequence starting at 1
    pub const fn new() -> Self {
        Self { next: 1 }
    }

    /// Hand out the next sequence number
    pub fn next(&mut self) -> u32 {
        let event = self.next;
        self.next = match self.next.wrapping_add(1) {
            0 => 1,
            n => n,
        };
        event
    }
}

/// "Needs attention" flag set from interrupt context
///
/// Only plain loads and stores are used, so it works on cores without
/// atomic read-modify-write instructions.
#[derive(Debug)]
pub struct WakeFlag {
    raised: AtomicBool,
}

impl Default for WakeFlag {
    fn default() -> Self {
        Self::new()
    }
}

impl WakeFlag {
    /// Create a raised flag, so the first pass scans every button
    pub const fn new() -> Self {
        Self {
            raised: AtomicBool::new(true),
        }
    }

    /// Request a scan; safe to call from an interrupt handler
    pub fn raise(&self) {
        self.raised.store(true, Ordering::Release);
    }

    /// Check if a scan is requested
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }

    fn clear(&self) {
        self.raised.store(false, Ordering::Release);
    }
}

/// Dispatcher has no room for another button
#[derive(Debug)]
pub struct RegisterError<B> {
    /// The button that was not registered
    pub button: B,
}

/// Polls a fixed-capacity set of buttons
///
/// `'a` is the lifetime of the wake flag, usually `'static` so the same
/// flag can be raised from the pin interrupt handler.
pub struct ButtonDispatcher<'a, B, C, const N: usize> {
    clock: C,
    wake: &'a WakeFlag,
    /// Time of the last scan
    last_usec: Option<u32>,
    sequence: EventSequence,
    buttons: Vec<B, N>,
}

impl<'a, B: PollButton, C: Clock, const N: usize> ButtonDispatcher<'a, B, C, N> {
    /// Create an empty dispatcher
    pub fn new(clock: C, wake: &'a WakeFlag) -> Self {
        Self {
            clock,
            wake,
            last_usec: None,
            sequence: EventSequence::new(),
            buttons: Vec::new(),
        }
    }

    /// Add a button; buttons stay registered for the dispatcher's lifetime
    ///
    /// Returns the button's index.
    pub fn register(&mut self, button: B) -> Result<usize, RegisterError<B>> {
        let index = self.buttons.len();
        self.buttons.push(button).map_err(|button| {
            warn!("button dispatcher full ({} buttons)", N);
            RegisterError { button }
        })?;
        self.wake.raise();
        Ok(index)
    }

    /// Simulate a pin interrupt
    pub fn interrupt(&self) {
        self.wake.raise();
    }

    /// Check if the next update will scan
    pub fn is_busy(&self) -> bool {
        self.wake.is_raised()
    }

    /// Poll the buttons if requested and due
    ///
    /// Call on every superloop iteration. Returns whether further scans are
    /// pending.
    pub fn update(&mut self) -> bool {
        if !self.wake.is_raised() {
            return false;
        }

        // Limit the frequency of pin checks during state transitions
        let now = self.clock.now_usec();
        if let Some(last) = self.last_usec {
            if elapsed_usec(now, last) < POLL_INTERVAL_USEC {
                return true;
            }
        }
        self.last_usec = Some(now);

        // An interrupt during the scan raises the flag again and is kept
        self.wake.clear();

        let mut busy = false;
        for button in self.buttons.iter_mut() {
            if button.poll(now, &mut self.sequence) {
                busy = true;
            }
        }

        if busy {
            self.wake.raise();
        }

        busy
    }

    /// Number of registered buttons
    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    /// Check if no button is registered
    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    /// Get a registered button
    pub fn button(&self, index: usize) -> Option<&B> {
        self.buttons.get(index)
    }

    /// Get mutable access to a registered button
    pub fn button_mut(&mut self, index: usize) -> Option<&mut B> {
        self.buttons.get_mut(index)
    }

    /// All registered buttons
    pub fn buttons(&self) -> &[B] {
        &self.buttons
    }
}
