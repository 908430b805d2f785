// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{config::PhaseConfig, delay::CommandedDelay, gate::Gate, timer::HalfCycleTimer};

/// Per half-cycle state.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum PhaseState {
    /// Timer stopped, gate off. Waiting for the zero crossing.
    Idle,
    /// Timer running towards the commanded delay. Gate off.
    Counting,
    /// Gate on. Timer running towards the overflow.
    GateOn,
}

/// The phase control timing engine.
///
/// Owns the timer and the gate. Nothing else may touch them.
/// The three `on_*` handlers must be called from the corresponding
/// interrupt service routines. They must not preempt each other.
pub struct PhaseControl<'a, T, G> {
    timer: T,
    gate: G,
    delay: &'a CommandedDelay,
    config: PhaseConfig,
    state: PhaseState,
}

impl<'a, T: HalfCycleTimer, G: Gate> PhaseControl<'a, T, G> {
    /// Take ownership of the timer and the gate.
    /// The timer is stopped and the gate is switched off.
    pub fn new(mut timer: T, mut gate: G, delay: &'a CommandedDelay, config: PhaseConfig) -> Self {
        timer.stop();
        timer.reset();
        gate.set_gate(false);
        Self {
            timer,
            gate,
            delay,
            config,
            state: PhaseState::Idle,
        }
    }

    /// Mains zero crossing (rising edge of the detector).
    ///
    /// Latches the commanded delay and restarts the timer from zero.
    pub fn on_zero_cross(&mut self) {
        if self.state == PhaseState::GateOn {
            // Double zero crossing. The previous pulse did not end.
            self.gate.set_gate(false);
        }

        let delay = self.delay.load();
        self.timer.set_compare(delay);
        self.timer.reset();
        self.state = PhaseState::Counting;

        // The counter does not match on the count it was loaded with.
        if delay.is_zero() {
            self.begin_pulse();
        }

        self.timer.start();
    }

    /// Timer compare match: the commanded delay has elapsed.
    pub fn on_compare_match(&mut self) {
        if self.state == PhaseState::Counting {
            self.begin_pulse();
        }
    }

    /// Timer overflow: the gate pulse is over.
    pub fn on_overflow(&mut self) {
        self.gate.set_gate(false);
        self.timer.stop();
        self.state = PhaseState::Idle;
    }

    fn begin_pulse(&mut self) {
        self.gate.set_gate(true);
        self.timer.set_count(self.config.pulse_start_count());
        self.state = PhaseState::GateOn;
    }

    #[inline]
    pub fn state(&self) -> PhaseState {
        self.state
    }

    #[inline]
    pub fn config(&self) -> &PhaseConfig {
        &self.config
    }

    #[inline]
    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// The simulation advances the counter like the hardware clock would.
    #[inline]
    pub(crate) fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    #[inline]
    pub fn gate(&self) -> &G {
        &self.gate
    }

    /// Give back the timer and the gate.
    pub fn release(self) -> (T, G) {
        (self.timer, self.gate)
    }
}


// vim: ts=4 sw=4 expandtab
