// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tick-level simulation of the phase control.
//!
//! The interrupt sources are modeled as pending flags, like the
//! hardware interrupt flag registers.
//! Pending handlers are dispatched in fixed priority order
//! (zero crossing, compare match, overflow) and each one runs to completion.

use crate::{
    config::PhaseConfig,
    delay::CommandedDelay,
    gate::Gate,
    phase::PhaseControl,
    ticks::Ticks,
    timer::HalfCycleTimer,
};

const FLAG_COMPARE: u8 = 1 << 0;
const FLAG_OVERFLOW: u8 = 1 << 1;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TimerEvent {
    CompareMatch,
    Overflow,
}

/// Counter model with one compare register.
///
/// The compare match flag is raised when the count is incremented onto
/// the compare value. A count loaded by software does not match.
/// Stopping the timer disarms the interrupts.
/// Starting it discards stale flags.
#[derive(Clone, Debug)]
pub struct SimTimer {
    modulus: u32,
    count: u32,
    compare: u16,
    running: bool,
    flags: u8,
}

impl SimTimer {
    pub const fn new(modulus: u32) -> Self {
        Self {
            modulus,
            count: 0,
            compare: 0,
            running: false,
            flags: 0,
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn compare(&self) -> u16 {
        self.compare
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance by one timer clock.
    pub fn tick(&mut self) {
        if !self.running {
            return;
        }
        self.count += 1;
        if self.count >= self.modulus {
            self.count = 0;
            self.flags |= FLAG_OVERFLOW;
        } else if self.count == self.compare as u32 {
            self.flags |= FLAG_COMPARE;
        }
    }

    /// Take the highest priority pending and armed interrupt.
    pub fn take_irq(&mut self) -> Option<TimerEvent> {
        if !self.running {
            None
        } else if self.flags & FLAG_COMPARE != 0 {
            self.flags &= !FLAG_COMPARE;
            Some(TimerEvent::CompareMatch)
        } else if self.flags & FLAG_OVERFLOW != 0 {
            self.flags &= !FLAG_OVERFLOW;
            Some(TimerEvent::Overflow)
        } else {
            None
        }
    }
}

impl HalfCycleTimer for SimTimer {
    fn start(&mut self) {
        self.flags = 0;
        self.running = true;
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn set_compare(&mut self, compare: Ticks) {
        self.compare = compare.get();
    }

    fn set_count(&mut self, count: u16) {
        self.count = (count as u32).checked_rem(self.modulus).unwrap_or(0);
    }
}

/// Gate output model.
#[derive(Clone, Debug, Default)]
pub struct SimGate {
    level: bool,
    rising_edges: u32,
}

impl SimGate {
    pub const fn new() -> Self {
        Self {
            level: false,
            rising_edges: 0,
        }
    }

    pub fn level(&self) -> bool {
        self.level
    }

    pub fn rising_edges(&self) -> u32 {
        self.rising_edges
    }
}

impl Gate for SimGate {
    fn set_gate(&mut self, on: bool) {
        if on && !self.level {
            self.rising_edges += 1;
        }
        self.level = on;
    }
}

/// Gate activity during one mains half-cycle.
///
/// All times are in ticks after the zero crossing.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct HalfwaveTrace {
    /// First tick with the gate on.
    pub gate_on: Option<u32>,
    /// First tick with the gate off again.
    pub gate_off: Option<u32>,
    /// Number of ticks with the gate on.
    pub gate_ticks: u32,
    /// Length of the half-cycle.
    pub length: u32,
}

impl HalfwaveTrace {
    /// Number of ticks the TRIAC conducts.
    /// Once triggered it conducts until the next zero crossing.
    pub fn conduction_ticks(&self) -> u32 {
        match self.gate_on {
            Some(on) => self.length.saturating_sub(on),
            None => 0,
        }
    }

    /// Conducting share of the half-cycle, in 1/1000.
    pub fn conduction_permille(&self) -> u32 {
        if self.length == 0 {
            0
        } else {
            self.conduction_ticks() * 1000 / self.length
        }
    }
}

/// Phase control running on [SimTimer] and [SimGate].
pub struct Simulator<'a> {
    phase: PhaseControl<'a, SimTimer, SimGate>,
    zero_cross_pending: bool,
    now: u32,
}

impl<'a> Simulator<'a> {
    pub fn new(delay: &'a CommandedDelay, config: PhaseConfig) -> Self {
        let timer = SimTimer::new(config.modulus);
        Self {
            phase: PhaseControl::new(timer, SimGate::new(), delay, config),
            zero_cross_pending: false,
            now: 0,
        }
    }

    /// Number of simulated ticks.
    pub fn now(&self) -> u32 {
        self.now
    }

    pub fn phase(&self) -> &PhaseControl<'a, SimTimer, SimGate> {
        &self.phase
    }

    pub fn gate_level(&self) -> bool {
        self.phase.gate().level()
    }

    fn dispatch(&mut self) {
        loop {
            if self.zero_cross_pending {
                self.zero_cross_pending = false;
                self.phase.on_zero_cross();
                continue;
            }
            match self.phase.timer_mut().take_irq() {
                Some(TimerEvent::CompareMatch) => self.phase.on_compare_match(),
                Some(TimerEvent::Overflow) => self.phase.on_overflow(),
                None => break,
            }
        }
    }

    /// Advance by one tick, optionally with a zero crossing edge,
    /// and run all pending handlers.
    /// Returns the gate level for this tick.
    pub fn step(&mut self, zero_cross: bool) -> bool {
        self.now = self.now.wrapping_add(1);
        self.phase.timer_mut().tick();
        if zero_cross {
            self.zero_cross_pending = true;
        }
        self.dispatch();
        self.gate_level()
    }

    /// Advance by one tick.
    pub fn tick(&mut self) -> bool {
        self.step(false)
    }

    /// Run one half-cycle that starts with a zero crossing.
    pub fn run_halfwave(&mut self) -> HalfwaveTrace {
        let length = self.phase.config().halfwave.get() as u32;
        let mut trace = HalfwaveTrace {
            length,
            ..Default::default()
        };
        for t in 0..length {
            let level = self.step(t == 0);
            if level {
                trace.gate_ticks += 1;
                if trace.gate_on.is_none() {
                    trace.gate_on = Some(t);
                }
            } else if trace.gate_on.is_some() && trace.gate_off.is_none() {
                trace.gate_off = Some(t);
            }
        }
        trace
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        config::MAINS_60HZ,
        phase::PhaseState,
        ramp::DelayRamp,
    };

    #[test]
    fn test_scenario_100() {
        let delay = CommandedDelay::new(Ticks(100));
        let mut sim = Simulator::new(&delay, MAINS_60HZ);

        assert!(!sim.step(true));
        assert_eq!(sim.phase().timer().count(), 0);
        assert!(sim.phase().timer().is_running());

        for _ in 1..100 {
            assert!(!sim.tick());
        }
        assert!(sim.tick());
        assert_eq!(sim.phase().state(), PhaseState::GateOn);
        assert_eq!(sim.phase().timer().count(), 65532);

        for _ in 0..3 {
            assert!(sim.tick());
        }
        assert!(!sim.tick());
        assert_eq!(sim.phase().state(), PhaseState::Idle);
        assert!(!sim.phase().timer().is_running());
    }

    #[test]
    fn test_scenario_100_trace() {
        let delay = CommandedDelay::new(Ticks(100));
        let mut sim = Simulator::new(&delay, MAINS_60HZ);
        let trace = sim.run_halfwave();

        assert_eq!(trace.gate_on, Some(100));
        assert_eq!(trace.gate_off, Some(104));
        assert_eq!(trace.gate_ticks, 4);
        assert_eq!(MAINS_60HZ.micros_from_ticks(Ticks(100)), 1600);
        assert_eq!(MAINS_60HZ.micros_from_ticks(Ticks(104)), 1664);
        assert_eq!(
            MAINS_60HZ.micros_from_ticks(Ticks(trace.gate_ticks as u16)),
            64
        );
        assert_eq!(sim.phase().gate().rising_edges(), 1);
        assert!(!sim.phase().timer().is_running());
    }

    #[test]
    fn test_pulse_shape() {
        let pulse = MAINS_60HZ.pulse_width.get() as u32;
        let length = MAINS_60HZ.halfwave.get() as u32;
        for d in 1..=(length - pulse) {
            let delay = CommandedDelay::new(Ticks(d as u16));
            let mut sim = Simulator::new(&delay, MAINS_60HZ);
            let trace = sim.run_halfwave();
            assert_eq!(trace.gate_on, Some(d));
            assert_eq!(trace.gate_ticks, pulse);
            if d + pulse < length {
                assert_eq!(trace.gate_off, Some(d + pulse));
            }
        }
    }

    #[test]
    fn test_zero_delay() {
        let delay = CommandedDelay::new(Ticks::ZERO);
        let mut sim = Simulator::new(&delay, MAINS_60HZ);
        let trace = sim.run_halfwave();
        assert_eq!(trace.gate_on, Some(0));
        assert_eq!(trace.gate_off, Some(4));
        assert_eq!(trace.gate_ticks, 4);
        assert_eq!(trace.conduction_permille(), 1000);
    }

    #[test]
    fn test_max_delay() {
        let delay = CommandedDelay::new(MAINS_60HZ.max_delay());
        let mut sim = Simulator::new(&delay, MAINS_60HZ);

        // Single zero crossing. Nothing restarts the timer.
        sim.step(true);
        let mut t = 0;
        while !sim.tick() {
            t += 1;
            assert!(t < 65536);
        }
        assert_eq!(sim.now(), 1 + 65531);
        let mut high = 1;
        while sim.tick() {
            high += 1;
        }
        assert_eq!(high, 4);
        assert!(!sim.phase().timer().is_running());
    }

    #[test]
    fn test_repeated_halfwaves() {
        let delay = CommandedDelay::new(Ticks(300));
        let mut sim = Simulator::new(&delay, MAINS_60HZ);
        for _ in 0..10 {
            let trace = sim.run_halfwave();
            assert_eq!(trace.gate_on, Some(300));
            assert_eq!(trace.gate_ticks, 4);
        }
        assert_eq!(sim.phase().gate().rising_edges(), 10);
        assert_eq!(sim.now(), 10 * 521);
    }

    #[test]
    fn test_delay_change_next_halfwave() {
        let delay = CommandedDelay::new(Ticks(300));
        let mut sim = Simulator::new(&delay, MAINS_60HZ);

        sim.step(true);
        for _ in 0..10 {
            sim.tick();
        }
        delay.store(Ticks(200));
        let mut on = None;
        for t in 11..521 {
            if sim.tick() && on.is_none() {
                on = Some(t);
            }
        }
        assert_eq!(on, Some(300));

        let trace = sim.run_halfwave();
        assert_eq!(trace.gate_on, Some(200));
    }

    #[test]
    fn test_restart_on_repeated_zero_cross() {
        let delay = CommandedDelay::new(Ticks(100));
        let mut sim = Simulator::new(&delay, MAINS_60HZ);

        sim.step(true);
        for _ in 0..49 {
            assert!(!sim.tick());
        }
        // Bounce: second edge 50 ticks later.
        sim.step(true);
        assert_eq!(sim.phase().timer().count(), 0);
        for _ in 1..100 {
            assert!(!sim.tick());
        }
        assert!(sim.tick());
        assert_eq!(sim.now(), 151);
    }

    #[test]
    fn test_zero_cross_during_pulse() {
        let delay = CommandedDelay::new(Ticks(100));
        let mut sim = Simulator::new(&delay, MAINS_60HZ);

        sim.step(true);
        for _ in 1..=101 {
            sim.tick();
        }
        assert!(sim.gate_level());

        // Gate is forced off and timing restarts.
        assert!(!sim.step(true));
        assert_eq!(sim.phase().state(), PhaseState::Counting);
        for _ in 1..100 {
            assert!(!sim.tick());
        }
        assert!(sim.tick());
    }

    #[test]
    fn test_missed_compare() {
        // Delay beyond the half-cycle: every zero crossing restarts
        // the timer before the compare point. The gate stays off.
        let delay = CommandedDelay::new(Ticks(1000));
        let mut sim = Simulator::new(&delay, MAINS_60HZ);
        for _ in 0..5 {
            let trace = sim.run_halfwave();
            assert_eq!(trace.gate_on, None);
            assert_eq!(trace.conduction_ticks(), 0);
        }
        assert_eq!(sim.phase().gate().rising_edges(), 0);
    }

    #[test]
    fn test_missed_zero_cross() {
        let delay = CommandedDelay::new(Ticks(100));
        let mut sim = Simulator::new(&delay, MAINS_60HZ);
        let trace = sim.run_halfwave();
        assert_eq!(trace.gate_ticks, 4);

        // No further zero crossing: no further pulse.
        for _ in 0..2000 {
            assert!(!sim.tick());
        }
        assert_eq!(sim.phase().state(), PhaseState::Idle);
        assert_eq!(sim.phase().gate().rising_edges(), 1);
    }

    #[test]
    fn test_power_monotonic() {
        let mut prev = u32::MAX;
        for d in 0..=530 {
            let delay = CommandedDelay::new(Ticks(d));
            let mut sim = Simulator::new(&delay, MAINS_60HZ);
            let trace = sim.run_halfwave();
            let conduction = trace.conduction_ticks();
            if d < 521 {
                assert!(conduction < prev);
            } else {
                assert_eq!(conduction, 0);
            }
            prev = conduction;
        }
    }

    #[test]
    fn test_ramp() {
        let delay = CommandedDelay::new(Ticks(483));
        let mut sim = Simulator::new(&delay, MAINS_60HZ);
        let mut ramp = DelayRamp::new(Ticks(483), Ticks(65));

        let mut prev = sim.run_halfwave().conduction_ticks();
        for _ in 0..(483 - 65) {
            delay.store(ramp.advance());
            let trace = sim.run_halfwave();
            assert_eq!(trace.gate_on, Some(ramp.current().get() as u32));
            let conduction = trace.conduction_ticks();
            assert!(conduction > prev);
            prev = conduction;
        }
        assert_eq!(ramp.current(), Ticks(65));
        assert_eq!(prev, 521 - 65);

        delay.store(ramp.advance());
        let trace = sim.run_halfwave();
        assert_eq!(trace.gate_on, Some(483));
        assert_eq!(trace.conduction_permille(), 72);
    }

    #[test]
    fn test_invalid_modulus() {
        let mut timer = SimTimer::new(0);
        timer.set_count(5);
        assert_eq!(timer.count(), 0);

        let config = PhaseConfig {
            modulus: 0,
            tick_us: 16,
            pulse_width: Ticks(4),
            halfwave: Ticks(10),
        };
        assert!(config.check().is_err());
        let delay = CommandedDelay::new(Ticks(3));
        let mut sim = Simulator::new(&delay, config);
        let trace = sim.run_halfwave();
        assert_eq!(trace.gate_on, None);
        assert!(!sim.gate_level());
        assert_eq!(sim.phase().state(), PhaseState::Idle);
    }
}

// vim: ts=4 sw=4 expandtab
