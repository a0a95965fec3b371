//! Per-button state machine

use tactus_hal::time::elapsed_usec;
use tactus_hal::InputPin;

use super::dispatcher::{EventSequence, PollButton};
use super::DEBOUNCE_USEC;
use crate::config::ButtonConfig;
use crate::traits::ButtonHandler;

/// Button states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Released, waiting for an interrupt
    #[default]
    Idle,
    /// Pressed, waiting for the contacts to settle
    WaitDown,
    /// Pressed
    Down,
    /// Pressed longer than the hold time
    Hold,
    /// Released, waiting for a further click
    Up,
    /// Sequence finished, clear on the next poll
    Reset,
}

/// How the button is physically wired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressedTo {
    /// Button connects the pin to voltage; reads high when pressed
    Voltage,
    /// Button connects the pin to ground; reads low when pressed
    Ground,
}

/// Pull resistor the platform has to enable on the pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    Up,
    Down,
    None,
}

/// A debounced button with click counting and long-press detection
pub struct Button<P, H> {
    pin: P,
    pressed_to: PressedTo,
    push_pull: bool,
    config: ButtonConfig,
    handler: H,
    state: State,
    clicks: u8,
    /// Time of the last press/release transition
    usec: u32,
    /// Sequence number of the running interaction, 0 while idle
    event: u32,
    /// Needs polling without waiting for the next interrupt
    busy: bool,
}

impl<P: InputPin, H: ButtonHandler> Button<P, H> {
    /// Create a button
    ///
    /// Without `push_pull` the internal pull resistor opposite to
    /// `pressed_to` has to be enabled, see [`Button::pull`].
    pub fn new(pin: P, pressed_to: PressedTo, push_pull: bool, config: ButtonConfig, handler: H) -> Self {
        Self {
            pin,
            pressed_to,
            push_pull,
            config,
            handler,
            state: State::Idle,
            clicks: 0,
            usec: 0,
            event: 0,
            busy: false,
        }
    }

    /// Pull resistor required by the wiring
    pub fn pull(&self) -> Pull {
        match (self.push_pull, self.pressed_to) {
            (true, _) => Pull::None,
            (false, PressedTo::Voltage) => Pull::Down,
            (false, PressedTo::Ground) => Pull::Up,
        }
    }

    /// Current state
    pub fn state(&self) -> State {
        self.state
    }

    /// Sequence number of the running interaction, 0 while idle
    pub fn event(&self) -> u32 {
        self.event
    }

    /// Clicks counted so far in the running interaction
    pub fn clicks(&self) -> u8 {
        self.clicks
    }

    /// Check if the button needs polling without an interrupt
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Get access to the event handler
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Get mutable access to the event handler
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    fn is_pressed(&mut self) -> bool {
        match self.pressed_to {
            PressedTo::Voltage => self.pin.is_high(),
            PressedTo::Ground => self.pin.is_low(),
        }
    }

    /// Sample the pin once and advance one step
    ///
    /// Returns whether the button needs to be polled again without waiting
    /// for the next interrupt.
    pub fn poll(&mut self, now_usec: u32, sequence: &mut EventSequence) -> bool {
        let down = self.is_pressed();

        match self.state {
            State::Idle => {
                if down {
                    self.state = State::WaitDown;
                    self.usec = now_usec;
                    self.event = sequence.next();
                    self.busy = true;
                }
            }

            State::WaitDown => {
                if elapsed_usec(now_usec, self.usec) < DEBOUNCE_USEC {
                    return self.busy;
                }

                if down {
                    self.state = State::Down;
                    self.handler.handle_down(self.event);
                } else {
                    // Bounce
                    self.state = State::Reset;
                }
            }

            State::Down => {
                if down {
                    if !self.config.detects_hold() {
                        // Wait for the release interrupt
                        self.busy = false;
                        return self.busy;
                    }

                    if elapsed_usec(now_usec, self.usec) < self.config.hold_usec {
                        return self.busy;
                    }

                    self.state = State::Hold;
                    self.handler.handle_hold(self.event, self.clicks);
                    return self.busy;
                }

                self.state = State::Up;
                self.usec = now_usec;
                self.busy = true;
            }

            State::Hold => {
                if down {
                    self.busy = false;
                    return self.busy;
                }

                self.state = State::Reset;
                self.handler.handle_release(self.event);
                self.handler.handle_up(self.event);
                self.busy = true;
            }

            State::Up => {
                if self.config.counts_clicks() {
                    if down {
                        self.state = State::Down;
                        self.clicks = self.clicks.saturating_add(1);
                        self.usec = now_usec;
                        return self.busy;
                    }

                    if elapsed_usec(now_usec, self.usec) < self.config.click_usec {
                        return self.busy;
                    }
                }

                // Last click of this sequence
                self.handler.handle_click(self.event, self.clicks);
                self.handler.handle_up(self.event);
                self.state = State::Reset;
            }

            State::Reset => {
                self.state = State::Idle;
                self.clicks = 0;
                self.event = 0;
                self.busy = false;
            }
        }

        self.busy
    }
}

impl<P: InputPin, H: ButtonHandler> PollButton for Button<P, H> {
    fn poll(&mut self, now_usec: u32, sequence: &mut EventSequence) -> bool {
        Button::poll(self, now_usec, sequence)
    }
}
