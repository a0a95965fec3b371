//! Adaptive solenoid power controller
//!
//! Converts a requested power into a PWM duty cycle using the measured coil
//! resistance and the present supply voltage, so pulses stay consistent
//! across supplies and solenoid types. Longer pulses drop to a holding
//! power after the peak window. Pulses can be ramped in and out to move the
//! plungers with less noise.

use micromath::F32Ext;
use tactus_hal::time::elapsed_usec;
use tactus_hal::Clock;
use tactus_protocol::status::{PortReport, SolenoidReport, MAX_REPORT_PORTS};

use super::coil::CoilState;
use super::port::{DriverState, Pulse, SolenoidPort, Step};
use super::probe::{Probe, ProbeState, MEASURE_USEC, PROBE_DUTY, SETTLE_USEC, SLEEP_USEC};
use super::trigger::{PulseRequest, TriggerOutcome, TriggerRejection};
use crate::config::SolenoidConfig;
use crate::safety::{CurrentMonitor, CurrentStatus};
use crate::traits::{Indicator, PowerState, SolenoidHardware};

/// Minimum time between control ticks
pub const TICK_USEC: u32 = 1000;

/// The rail stays on this long after the last pulse
pub const POWER_HOLD_USEC: u32 = 200 * 1000;

/// Inactivity before the port indicators are switched off
pub const BLANK_USEC: u32 = 60 * 1000 * 1000;

/// Solenoid controller for `N` ports
pub struct SolenoidController<H, C, const N: usize> {
    config: SolenoidConfig,
    hardware: H,
    clock: C,
    /// Time of the last control tick
    loop_usec: Option<u32>,
    /// Time the rail was last switched on, `None` while switched off
    power_usec: Option<u32>,
    /// Time of the last activity, `None` once the indicators are blanked
    activity_usec: Option<u32>,
    probe: Probe,
    current: CurrentMonitor,
    ports: [SolenoidPort; N],
}

impl<H: SolenoidHardware, C: Clock, const N: usize> SolenoidController<H, C, N> {
    /// Create a controller; call [`reset`](Self::reset) before the first
    /// update
    ///
    /// `config` must pass [`SolenoidConfig::validate`].
    pub fn new(config: SolenoidConfig, hardware: H, clock: C) -> Self {
        debug_assert!(config.validate().is_ok());

        Self {
            config,
            hardware,
            clock,
            loop_usec: None,
            power_usec: None,
            activity_usec: None,
            probe: Probe::new(),
            current: CurrentMonitor::new(config.current),
            ports: [SolenoidPort::new(); N],
        }
    }

    /// Switch everything off and start qualifying the ports again
    pub fn reset(&mut self) {
        self.hardware.set_power(PowerState::Off);

        self.loop_usec = None;
        self.power_usec = None;
        self.activity_usec = Some(self.clock.now_usec());
        self.probe = Probe::new();
        self.current.reset();

        for port in 0..N {
            self.ports[port] = SolenoidPort::new();
            self.hardware.set_pwm_duty(port, 0.0);
            self.update_indicator(port, false);
        }
    }

    /// Run one control tick
    ///
    /// Call on every superloop iteration, at least once per millisecond;
    /// calls within the same millisecond return immediately.
    pub fn update(&mut self) {
        let now = self.clock.now_usec();
        if let Some(last) = self.loop_usec {
            if elapsed_usec(now, last) < TICK_USEC {
                return;
            }
        }
        self.loop_usec = Some(now);

        if let Some(since) = self.activity_usec {
            if elapsed_usec(now, since) > BLANK_USEC {
                self.activity_usec = None;
                for port in 0..N {
                    self.update_indicator(port, false);
                }
            }
        }

        let mut busy = false;
        for port in 0..N {
            if self.ports[port].is_idle() {
                continue;
            }
            busy = true;

            match self.ports[port].step(now, &self.config) {
                Step::Unchanged => {}
                Step::Duty(duty) => self.hardware.set_pwm_duty(port, duty),
                Step::Release => self.release_port(port),
            }
        }

        let amps = self.hardware.read_current();
        if self.current.update(amps) == CurrentStatus::OverCurrent {
            self.trip();
            return;
        }

        // The rail is still powered, the divider cannot be read
        if busy {
            return;
        }

        // Delay the switch-off, bursts of triggers would toggle the rail
        if let Some(since) = self.power_usec {
            if elapsed_usec(now, since) < POWER_HOLD_USEC {
                return;
            }
            self.hardware.set_power(PowerState::Off);
            self.power_usec = None;
        }

        self.step_probe(now);
    }

    /// Start, replace or stop a pulse on a port
    ///
    /// A request with zero power or duration stops the port, fading out if
    /// the request asks for it.
    pub fn trigger(&mut self, port: usize, request: PulseRequest) -> TriggerOutcome {
        if port >= N {
            return self.reject(port, TriggerRejection::InvalidPort);
        }

        if !self.probe.is_ready() {
            return self.reject(port, TriggerRejection::NotReady);
        }

        if request.is_release() {
            if request.fade_out && self.ports[port].begin_fade_out(&self.config.fade) {
                return TriggerOutcome::FadingOut;
            }
            self.release_port(port);
            return TriggerOutcome::Released;
        }

        if self.ports[port].coil_state() != CoilState::Connected {
            return self.reject(port, TriggerRejection::NotConnected);
        }

        if self.current.is_over_limit() {
            return self.reject(port, TriggerRejection::OverCurrent);
        }

        let supply = self.hardware.read_voltage();
        if supply.is_nan() || supply <= 0.0 {
            return self.reject(port, TriggerRejection::NoSupply);
        }

        // The probe shares the rail
        if let Some(probed) = self.probe.preempt() {
            self.release_port(probed);
        }

        let now = self.clock.now_usec();

        // Wake up blanked indicators
        if self.activity_usec.is_none() {
            for i in 0..N {
                self.update_indicator(i, true);
            }
        }
        self.activity_usec = Some(now);

        if !self.hardware.set_power(PowerState::On) {
            warn!("power rail did not switch on");
            return TriggerOutcome::Rejected(TriggerRejection::PowerUnavailable);
        }
        self.power_usec = Some(now);

        let pulse = Pulse {
            start_usec: now,
            peak_usec: now,
            duration_usec: (request.seconds * 1_000_000.0) as u32,
            fade_in: request.fade_in,
            fade_out: request.fade_out,
            target: duty_for_watts(request.watts, self.ports[port].coil().ohms(), supply),
            delta: 0.0,
        };
        if let Some(duty) = self.ports[port].start(pulse, &self.config.fade) {
            self.hardware.set_pwm_duty(port, duty);
        }

        self.hardware.set_indicator(Indicator::Power {
            port,
            watts: request.watts,
        });

        TriggerOutcome::Accepted
    }

    /// Filtered supply current in amperes
    pub fn current(&self) -> f32 {
        self.current.current()
    }

    /// Measured coil resistance: -1 when open or unknown, 0 when shorted
    pub fn resistance(&self, port: usize) -> f32 {
        self.ports.get(port).map_or(-1.0, |p| p.coil().ohms())
    }

    /// Check if every port has been qualified and triggers are accepted
    pub fn is_ready(&self) -> bool {
        self.probe.is_ready()
    }

    /// Check if any port is driving a pulse
    pub fn is_busy(&self) -> bool {
        self.ports.iter().any(|p| !p.is_idle())
    }

    /// Current duty cycle of a port
    pub fn duty(&self, port: usize) -> f32 {
        self.ports.get(port).map_or(0.0, |p| p.duty())
    }

    pub fn driver_state(&self, port: usize) -> Option<DriverState> {
        self.ports.get(port).map(|p| p.state())
    }

    pub fn coil_state(&self, port: usize) -> Option<CoilState> {
        self.ports.get(port).map(|p| p.coil_state())
    }

    pub fn port(&self, port: usize) -> Option<&SolenoidPort> {
        self.ports.get(port)
    }

    pub fn probe(&self) -> &Probe {
        &self.probe
    }

    /// Check if the port indicators are switched off after inactivity
    pub fn is_blanked(&self) -> bool {
        self.activity_usec.is_none()
    }

    pub fn config(&self) -> &SolenoidConfig {
        &self.config
    }

    /// Get access to the hardware
    pub fn hardware(&self) -> &H {
        &self.hardware
    }

    /// Get mutable access to the hardware
    pub fn hardware_mut(&mut self) -> &mut H {
        &mut self.hardware
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Status snapshot for protocol replies
    pub fn report(&self) -> SolenoidReport {
        let mut report = SolenoidReport {
            current: self.current(),
            ready: self.is_ready(),
            ..SolenoidReport::default()
        };

        for (i, port) in self.ports.iter().enumerate().take(MAX_REPORT_PORTS) {
            let entry = PortReport {
                port: i as u8,
                resistance: port.coil().ohms(),
                duty: port.duty(),
                active: !port.is_idle(),
            };
            if report.ports.push(entry).is_err() {
                break;
            }
        }

        report
    }

    fn reject(&self, port: usize, reason: TriggerRejection) -> TriggerOutcome {
        debug!("trigger on port {} rejected: {}", port, reason);
        TriggerOutcome::Rejected(reason)
    }

    /// Release every port and force the ports to be qualified again
    fn trip(&mut self) {
        warn!("over-current: {}A, switching off", self.current.current());

        for port in 0..N {
            self.release_port(port);
        }

        // Shorted ports get isolated by the new qualification
        self.probe = Probe::new();

        self.hardware.set_power(PowerState::Off);
        self.power_usec = None;
        self.hardware.set_indicator(Indicator::OverCurrent);
    }

    fn release_port(&mut self, port: usize) {
        self.ports[port].release();
        self.hardware.set_pwm_duty(port, 0.0);
        self.update_indicator(port, false);
    }

    fn step_probe(&mut self, now: u32) {
        if N == 0 {
            return;
        }

        match self.probe.state {
            ProbeState::Init => {
                self.probe.state = ProbeState::Settle { since: now };

                if !self.probe.ready {
                    self.probe.cycle = 0;
                    self.hardware.set_indicator(Indicator::Initialize);
                }
            }

            ProbeState::Settle { since } => {
                if elapsed_usec(now, since) < SETTLE_USEC {
                    return;
                }

                self.hardware.set_pwm_duty(self.probe.port, PROBE_DUTY);
                self.probe.state = ProbeState::Measure { since: now };
            }

            ProbeState::Measure { since } => {
                if elapsed_usec(now, since) < MEASURE_USEC {
                    return;
                }

                let port = self.probe.port;
                self.measure_resistance(port, now);
                self.hardware.set_pwm_duty(port, 0.0);

                if self.probe.next_port(N) {
                    info!("all {} ports qualified", N);
                    self.hardware.set_indicator(Indicator::Ready);
                }

                // Slow down while idle
                if self.activity_usec.is_none() {
                    self.probe.state = ProbeState::Sleep { since: now };
                    return;
                }

                self.hardware.set_pwm_duty(self.probe.port, PROBE_DUTY);
                self.probe.state = ProbeState::Measure { since: now };
            }

            ProbeState::Sleep { since } => {
                if elapsed_usec(now, since) < SLEEP_USEC {
                    return;
                }

                self.hardware.set_pwm_duty(self.probe.port, PROBE_DUTY);
                self.probe.state = ProbeState::Measure { since: now };
            }
        }
    }

    fn measure_resistance(&mut self, port: usize, now: u32) {
        let volts = self.hardware.read_probe_voltage();
        let range = self.config.resistance;

        let coil = self.ports[port].coil_mut();
        if coil.update(volts, &range) {
            debug!("port {} coil {} ({} ohms)", port, coil.state(), coil.raw_resistance());
            // Wake up the indicators
            self.activity_usec = Some(now);
        }

        self.update_indicator(port, false);
    }

    fn update_indicator(&mut self, port: usize, force: bool) {
        let indicator = if !force && self.activity_usec.is_none() {
            Indicator::Off { port }
        } else {
            let coil = self.ports[port].coil();
            match coil.state() {
                CoilState::NotConnected => Indicator::Off { port },
                CoilState::Connected => Indicator::Resistance {
                    port,
                    level: 1.0 - coil.ohms() / self.config.resistance.max,
                },
                CoilState::ShortCircuit => Indicator::ShortCircuit { port },
            }
        };

        self.hardware.set_indicator(indicator);
    }
}

/// Duty cycle delivering `watts` into `ohms` from `supply` volts
///
/// `V = √(P·R)`, limited to the supply.
pub fn duty_for_watts(watts: f32, ohms: f32, supply: f32) -> f32 {
    let volts = sqrt(watts * ohms);
    if volts.is_infinite() || volts >= supply {
        return 1.0;
    }

    volts / supply
}

fn sqrt(x: f32) -> f32 {
    if x.is_nan() || x <= 0.0 {
        return 0.0;
    }
    if x.is_infinite() {
        return x;
    }

    // Refine the fast approximation
    let mut root = F32Ext::sqrt(x);
    for _ in 0..2 {
        root = 0.5 * (root + x / root);
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::Vec;
    use tactus_hal::ManualClock;

    fn close(a: f32, b: f32, tolerance: f32) -> bool {
        let d = a - b;
        d < tolerance && d > -tolerance
    }

    #[derive(Default)]
    struct Board {
        power: Option<PowerState>,
        refuse_power: bool,
        voltage: f32,
        current: f32,
        probe_volts: [f32; 2],
        duty: [f32; 2],
        indicators: Vec<Indicator, 256>,
    }

    impl Board {
        fn new() -> Self {
            Self {
                voltage: 12.0,
                probe_volts: [0.8, 3.3],
                ..Self::default()
            }
        }

        fn saw(&self, indicator: Indicator) -> bool {
            self.indicators.iter().any(|i| *i == indicator)
        }
    }

    impl SolenoidHardware for Board {
        fn set_power(&mut self, state: PowerState) -> bool {
            if state == PowerState::On && self.refuse_power {
                return false;
            }
            self.power = Some(state);
            true
        }

        fn read_voltage(&mut self) -> f32 {
            self.voltage
        }

        fn read_current(&mut self) -> f32 {
            self.current
        }

        fn read_probe_voltage(&mut self) -> f32 {
            // Only the energized port is connected to the divider
            match self.duty.iter().position(|d| *d > 0.0) {
                Some(port) => self.probe_volts[port],
                None => 3.3,
            }
        }

        fn set_pwm_duty(&mut self, port: usize, duty: f32) {
            self.duty[port] = duty;
        }

        fn set_indicator(&mut self, indicator: Indicator) {
            // Keep the latest entries
            if self.indicators.is_full() {
                self.indicators.remove(0);
            }
            let _ = self.indicators.push(indicator);
        }
    }

    type Controller<'a> = SolenoidController<Board, &'a ManualClock, 2>;

    fn run(controller: &mut Controller<'_>, clock: &ManualClock, ms: u32) {
        for _ in 0..ms {
            clock.advance_ms(1);
            controller.update();
        }
    }

    fn qualified(clock: &ManualClock) -> Controller<'_> {
        let mut controller = SolenoidController::new(SolenoidConfig::default(), Board::new(), clock);
        controller.reset();
        run(&mut controller, clock, 1000);
        assert!(controller.is_ready());
        controller
    }

    #[test]
    fn test_duty_for_watts() {
        assert!(close(duty_for_watts(5.0, 20.0, 12.0), 10.0 / 12.0, 0.001));
        assert!(close(duty_for_watts(2.0, 8.0, 12.0), 4.0 / 12.0, 0.001));
        assert_eq!(duty_for_watts(100.0, 20.0, 12.0), 1.0);
        assert_eq!(duty_for_watts(5.0, 0.0, 12.0), 0.0);
    }

    #[test]
    fn test_duty_for_watts_overflow() {
        assert_eq!(duty_for_watts(f32::INFINITY, 20.0, 12.0), 1.0);
        assert_eq!(duty_for_watts(1.0e38, 20.0, 12.0), 1.0);
        assert_eq!(duty_for_watts(f32::MAX, f32::MAX, 12.0), 1.0);
    }

    #[test]
    fn test_trigger_unbounded_power() {
        let clock = ManualClock::new(0);
        let mut controller = qualified(&clock);

        assert_eq!(
            controller.trigger(0, PulseRequest::new(f32::INFINITY, 0.1)),
            TriggerOutcome::Accepted
        );
        assert_eq!(controller.duty(0), 1.0);
        assert_eq!(controller.hardware().duty[0], 1.0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic]
    fn test_new_rejects_invalid_config() {
        let clock = ManualClock::new(0);
        let mut config = SolenoidConfig::default();
        config.fade.in_sec = f32::NAN;
        let _: Controller<'_> = SolenoidController::new(config, Board::new(), &clock);
    }

    #[test]
    fn test_reset_switches_off() {
        let clock = ManualClock::new(0);
        let mut board = Board::new();
        board.duty = [0.5, 0.5];
        let mut controller: Controller<'_> = SolenoidController::new(SolenoidConfig::default(), board, &clock);
        controller.reset();

        assert_eq!(controller.hardware().power, Some(PowerState::Off));
        assert_eq!(controller.hardware().duty, [0.0, 0.0]);
        assert_eq!(controller.resistance(0), -1.0);
        assert!(!controller.is_ready());
        assert!(controller.hardware().saw(Indicator::Off { port: 1 }));
    }

    #[test]
    fn test_qualification() {
        let clock = ManualClock::new(0);
        let controller = qualified(&clock);

        assert!(close(controller.resistance(0), 20.0, 0.01));
        assert_eq!(controller.resistance(1), -1.0);
        assert_eq!(controller.coil_state(0), Some(CoilState::Connected));
        assert!(controller.hardware().saw(Indicator::Initialize));
        assert!(controller.hardware().saw(Indicator::Ready));
    }

    #[test]
    fn test_rate_limit() {
        let clock = ManualClock::new(0);
        let mut controller = qualified(&clock);
        assert_eq!(controller.trigger(0, PulseRequest::new(5.0, 0.01)), TriggerOutcome::Accepted);

        // Several calls within one millisecond count as one tick
        clock.advance(999);
        for _ in 0..5 {
            controller.update();
        }
        clock.advance(1);
        controller.update();
        assert_eq!(controller.driver_state(0), Some(DriverState::Peak));

        run(&mut controller, &clock, 9);
        assert_eq!(controller.driver_state(0), Some(DriverState::Idle));
    }

    #[test]
    fn test_trigger_not_ready() {
        let clock = ManualClock::new(0);
        let mut controller: Controller<'_> = SolenoidController::new(SolenoidConfig::default(), Board::new(), &clock);
        controller.reset();
        run(&mut controller, &clock, 300);

        assert_eq!(
            controller.trigger(0, PulseRequest::new(5.0, 0.1)),
            TriggerOutcome::Rejected(TriggerRejection::NotReady)
        );
        assert_eq!(
            controller.trigger(0, PulseRequest::release()),
            TriggerOutcome::Rejected(TriggerRejection::NotReady)
        );
        assert_eq!(controller.driver_state(0), Some(DriverState::Idle));
    }

    #[test]
    fn test_trigger_rejections() {
        let clock = ManualClock::new(0);
        let mut controller = qualified(&clock);

        assert_eq!(
            controller.trigger(2, PulseRequest::new(5.0, 0.1)),
            TriggerOutcome::Rejected(TriggerRejection::InvalidPort)
        );
        assert_eq!(
            controller.trigger(1, PulseRequest::new(5.0, 0.1)),
            TriggerOutcome::Rejected(TriggerRejection::NotConnected)
        );

        controller.hardware_mut().voltage = 0.0;
        assert_eq!(
            controller.trigger(0, PulseRequest::new(5.0, 0.1)),
            TriggerOutcome::Rejected(TriggerRejection::NoSupply)
        );

        controller.hardware_mut().voltage = 12.0;
        controller.hardware_mut().refuse_power = true;
        assert_eq!(
            controller.trigger(0, PulseRequest::new(5.0, 0.1)),
            TriggerOutcome::Rejected(TriggerRejection::PowerUnavailable)
        );
        assert_eq!(controller.driver_state(0), Some(DriverState::Idle));
    }

    #[test]
    fn test_trigger_preempts_probe() {
        let clock = ManualClock::new(0);
        let mut controller = qualified(&clock);
        assert!(matches!(controller.probe().state(), ProbeState::Measure { .. }));
        let probed = controller.probe().port();

        controller.trigger(0, PulseRequest::new(5.0, 0.1));
        assert_eq!(controller.probe().state(), ProbeState::Init);
        assert_eq!(controller.hardware().power, Some(PowerState::On));
        if probed != 0 {
            assert_eq!(controller.hardware().duty[probed], 0.0);
        }
        assert!(close(controller.duty(0), 10.0 / 12.0, 0.001));
        assert!(controller.hardware().saw(Indicator::Power { port: 0, watts: 5.0 }));
    }

    #[test]
    fn test_release_request() {
        let clock = ManualClock::new(0);
        let mut controller = qualified(&clock);
        controller.trigger(0, PulseRequest::new(5.0, 1.0).fade_out(true));
        run(&mut controller, &clock, 5);

        assert_eq!(
            controller.trigger(0, PulseRequest::release().fade_out(true)),
            TriggerOutcome::FadingOut
        );
        assert_eq!(controller.driver_state(0), Some(DriverState::FadeOut));

        assert_eq!(controller.trigger(0, PulseRequest::release()), TriggerOutcome::Released);
        assert_eq!(controller.driver_state(0), Some(DriverState::Idle));
        assert_eq!(controller.hardware().duty[0], 0.0);
    }

    #[test]
    fn test_power_hold_off() {
        let clock = ManualClock::new(0);
        let mut controller = qualified(&clock);
        controller.trigger(0, PulseRequest::new(5.0, 0.01));

        run(&mut controller, &clock, 20);
        assert_eq!(controller.driver_state(0), Some(DriverState::Idle));
        assert_eq!(controller.hardware().power, Some(PowerState::On));

        run(&mut controller, &clock, 200);
        assert_eq!(controller.hardware().power, Some(PowerState::Off));
        assert!(matches!(controller.probe().state(), ProbeState::Settle { .. }));
    }

    #[test]
    fn test_over_current_trip() {
        let clock = ManualClock::new(0);
        let mut controller = qualified(&clock);
        controller.trigger(0, PulseRequest::new(5.0, 1.0));
        run(&mut controller, &clock, 2);

        // 0.001 · 5000A = 5A filtered
        controller.hardware_mut().current = 5000.0;
        run(&mut controller, &clock, 1);

        assert_eq!(controller.driver_state(0), Some(DriverState::Idle));
        assert_eq!(controller.hardware().duty, [0.0, 0.0]);
        assert_eq!(controller.hardware().power, Some(PowerState::Off));
        assert!(!controller.is_ready());
        assert!(controller.hardware().saw(Indicator::OverCurrent));
        assert!(controller.current() > 3.0);
    }

    #[test]
    fn test_indicator_blanking() {
        let clock = ManualClock::new(0);
        let mut controller = qualified(&clock);

        run(&mut controller, &clock, 60 * 1000);
        assert!(controller.is_blanked());
        assert!(controller.hardware().saw(Indicator::Off { port: 0 }));
        assert!(matches!(
            controller.probe().state(),
            ProbeState::Sleep { .. } | ProbeState::Measure { .. }
        ));

        controller.trigger(0, PulseRequest::new(5.0, 0.1));
        assert!(!controller.is_blanked());
        assert!(controller
            .hardware()
            .indicators
            .iter()
            .any(|i| matches!(i, Indicator::Resistance { port: 0, .. })));
    }

    #[test]
    fn test_report() {
        let clock = ManualClock::new(0);
        let mut controller = qualified(&clock);
        controller.trigger(0, PulseRequest::new(5.0, 0.5));

        let report = controller.report();
        assert!(report.ready);
        assert_eq!(report.ports.len(), 2);
        assert_eq!(report.active_ports(), 1);
        assert_eq!(report.connected_ports(), 1);
        assert_eq!(report.ports[1].resistance, -1.0);
    }
}
