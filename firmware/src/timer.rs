// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![allow(unused_unsafe)]

use crate::hw::mcu;
use triac_phase::{HalfCycleTimer, MAINS_60HZ, PhaseConfig, Ticks};

/// Phase control timing.
/// TC1 with prescaler 256 at 16 MHz: 16 us per tick, 16 bit counter.
pub const PHASE_CONFIG: PhaseConfig = MAINS_60HZ;

const _: () = assert!(PHASE_CONFIG.check().is_ok());
const _: () = assert!(PHASE_CONFIG.tick_us == 16);
const _: () = assert!(PHASE_CONFIG.modulus == 1 << 16);

const TIMSK1_TOIE1: u8 = 1 << 0;
const TIMSK1_OCIE1A: u8 = 1 << 1;
const TIFR1_TOV1: u8 = 1 << 0;
const TIFR1_OCF1A: u8 = 1 << 1;
/// Reset the prescaler shared by Timer0 and Timer1.
const GTCCR_PSRSYNC: u8 = 1 << 0;

/// Timer/Counter 1 as the half-cycle timer.
///
/// Timer0 is unused. It is held here only for its GTCCR access,
/// because it shares the prescaler with Timer1.
#[allow(non_snake_case)]
pub struct Timer1 {
    TC1: mcu::TC1,
    TC0: mcu::TC0,
}

impl Timer1 {
    pub fn new(tc1: mcu::TC1, tc0: mcu::TC0) -> Self {
        // Timer 1 configuration:
        // Normal mode (WGM=0), TOP = 0xFFFF.
        // No pin toggle.
        // Clock stopped. Interrupts disarmed.
        tc1.tccr1b().write(|w| w);
        tc1.tccr1a().write(|w| w);
        tc1.tccr1c().write(|w| w);
        // SAFETY: Raw register values. TC1 is not in use yet.
        unsafe {
            tc1.timsk1().write(|w| w.bits(0));
            tc1.tifr1().write(|w| w.bits(TIFR1_TOV1 | TIFR1_OCF1A));
            tc1.tcnt1().write(|w| w.set(0));
            tc1.ocr1a().write(|w| w.set(0xFFFF));
        }
        tc0.tccr0b().write(|w| w);
        Self { TC1: tc1, TC0: tc0 }
    }
}

impl HalfCycleTimer for Timer1 {
    fn start(&mut self) {
        // SAFETY: Raw register values. We own TC1.
        unsafe {
            // Discard flags of the previous half-cycle.
            self.TC1.tifr1().write(|w| w.bits(TIFR1_TOV1 | TIFR1_OCF1A));
            self.TC1.timsk1().write(|w| w.bits(TIMSK1_OCIE1A | TIMSK1_TOIE1));
        }
        // The prescaler runs freely. Restart it, so that the first
        // count comes one full tick after the start.
        // SAFETY: Raw register value. Timer0 is unused.
        unsafe {
            self.TC0.gtccr().write(|w| w.bits(GTCCR_PSRSYNC));
        }
        // CS: 256 -> 16 us per timer tick.
        self.TC1.tccr1b().write(|w| w.cs1().prescale_256());
    }

    fn stop(&mut self) {
        // CS: no clock.
        self.TC1.tccr1b().write(|w| w);
        // SAFETY: Raw register value. We own TC1.
        unsafe {
            self.TC1.timsk1().write(|w| w.bits(0));
        }
    }

    fn set_compare(&mut self, compare: Ticks) {
        // SAFETY: Any 16 bit value is a valid compare value.
        unsafe {
            self.TC1.ocr1a().write(|w| w.set(compare.get()));
        }
    }

    fn set_count(&mut self, count: u16) {
        // SAFETY: Any 16 bit value is a valid count.
        unsafe {
            self.TC1.tcnt1().write(|w| w.set(count));
        }
    }
}

// vim: ts=4 sw=4 expandtab
