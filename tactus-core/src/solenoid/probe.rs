//! Background resistance probe
//!
//! Runs only while no port is driving and the main rail is off. One port is
//! energized through the probe divider at a time, cycling through all of
//! them:
//!
//! ```text
//!   Init ──► Settle (200ms) ──► Measure (10ms) ──► next port ──► Measure ...
//!                                    ▲                 │ indicators blanked
//!                                    └──── Sleep (1s) ◄┘
//! ```
//!
//! Settling lets moving plungers come to rest; a moving plunger changes
//! the magnetic field and disturbs the reading. The measurement delay lets
//! the field build up, otherwise the reading reflects the charging current
//! rather than the coil resistance.

/// Rest time after power-off before the first measurement
pub const SETTLE_USEC: u32 = 200 * 1000;

/// Time a port is energized before its divider is sampled
pub const MEASURE_USEC: u32 = 10 * 1000;

/// Pause between measurements while the indicators are blanked
pub const SLEEP_USEC: u32 = 1000 * 1000;

/// Duty cycle of the port under test; the rail is off, the divider limits
/// the current
pub const PROBE_DUTY: f32 = 1.0;

/// Completed passes over all ports needed before triggers are accepted
pub const READY_CYCLES: u8 = 10;

/// Probe state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProbeState {
    /// Start over with a settle period
    #[default]
    Init,
    /// Waiting for mechanical movement to stop
    Settle { since: u32 },
    /// Port under test is energized
    Measure { since: u32 },
    /// Slowed down while idle
    Sleep { since: u32 },
}

/// Probe progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Probe {
    pub(crate) state: ProbeState,
    /// Port to measure next
    pub(crate) port: usize,
    pub(crate) cycle: u8,
    pub(crate) ready: bool,
}

impl Probe {
    /// Create an unqualified probe
    pub const fn new() -> Self {
        Self {
            state: ProbeState::Init,
            port: 0,
            cycle: 0,
            ready: false,
        }
    }

    pub fn state(&self) -> ProbeState {
        self.state
    }

    /// Port under test
    pub fn port(&self) -> usize {
        self.port
    }

    /// Completed passes since qualification started
    pub fn cycle(&self) -> u8 {
        self.cycle
    }

    /// Check if every port has been qualified
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Stop a running measurement
    ///
    /// Returns the port that was energized, if any.
    pub(crate) fn preempt(&mut self) -> Option<usize> {
        if self.state == ProbeState::Init {
            return None;
        }

        self.state = ProbeState::Init;
        Some(self.port)
    }

    /// Move on to the next port
    ///
    /// Returns true when the pass just completed qualified all ports.
    pub(crate) fn next_port(&mut self, ports: usize) -> bool {
        self.port += 1;
        if self.port < ports {
            return false;
        }

        self.port = 0;
        if self.ready {
            return false;
        }

        self.cycle = self.cycle.saturating_add(1);
        if self.cycle > READY_CYCLES {
            self.ready = true;
            return true;
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_after_passes() {
        let mut probe = Probe::new();

        let mut passes = 0;
        loop {
            let qualified = probe.next_port(2) || probe.next_port(2);
            passes += 1;
            if qualified {
                break;
            }
            assert!(!probe.is_ready());
        }

        assert_eq!(passes, READY_CYCLES as u32 + 1);
        assert!(probe.is_ready());
        assert_eq!(probe.port(), 0);

        // Further passes do not count
        probe.next_port(2);
        assert!(!probe.next_port(2));
        assert_eq!(probe.cycle(), READY_CYCLES + 1);
    }

    #[test]
    fn test_preempt() {
        let mut probe = Probe::new();
        assert_eq!(probe.preempt(), None);

        probe.next_port(3);
        probe.state = ProbeState::Measure { since: 5 };
        assert_eq!(probe.preempt(), Some(1));
        assert_eq!(probe.state(), ProbeState::Init);
        assert_eq!(probe.preempt(), None);
    }
}
