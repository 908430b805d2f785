// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{
    debug::Debug,
    triac::{halfwave_seq, set_delay},
};
use avr_context::{MainCtx, MainCtxCell};
use triac_phase::{DelayRamp, Ticks};

/// Longest delay of the sweep. 7.7 ms after the zero crossing.
pub const DELAY_DIMMEST: Ticks = Ticks(483);
/// Shortest delay of the sweep. 1.0 ms after the zero crossing.
pub const DELAY_BRIGHTEST: Ticks = Ticks(65);

pub struct System {
    ramp: MainCtxCell<DelayRamp>,
    seq: MainCtxCell<u8>,
}

impl System {
    pub const fn new() -> Self {
        Self {
            ramp: MainCtxCell::new(DelayRamp::new(DELAY_DIMMEST, DELAY_BRIGHTEST)),
            seq: MainCtxCell::new(0),
        }
    }

    pub fn init(&self, m: &MainCtx<'_>) {
        self.seq.set(m, halfwave_seq());
        let ramp = self.ramp.get(m);
        set_delay(ramp.current());
        Debug::Delay.log_u16(ramp.current().get());
    }

    /// Step the sweep once per mains half-cycle.
    pub fn run(&self, m: &MainCtx<'_>) {
        let seq = halfwave_seq();
        if seq == self.seq.get(m) {
            return;
        }
        self.seq.set(m, seq);

        let mut ramp = self.ramp.get(m);
        let delay = ramp.advance();
        self.ramp.set(m, ramp);

        // Latched by the next zero crossing.
        set_delay(delay);

        Debug::Delay.log_u16(delay.get());
        Debug::Halfwaves.log_u8(seq);
    }
}

// vim: ts=4 sw=4 expandtab
