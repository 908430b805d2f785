// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{
    hw::{Mutex, mcu},
    ports::{GATE_BIT, PORTB},
    system::DELAY_DIMMEST,
    timer::{PHASE_CONFIG, Timer1},
};
use avr_atomic::AvrAtomic;
use avr_context::{InitCtx, InitCtxCell, IrqCtx};
use core::cell::RefCell;
use triac_phase::{CommandedDelay, Gate, PhaseControl, Ticks};

/// TRIAC gate drive on PB1.
pub struct GatePin;

impl Gate for GatePin {
    #[inline(always)]
    fn set_gate(&mut self, on: bool) {
        PORTB.set(GATE_BIT, on);
    }
}

type Phase = PhaseControl<'static, Timer1, GatePin>;

/// Phase delay for the next half-cycles.
/// Written by main context. Latched at each zero crossing.
pub static COMMANDED_DELAY: CommandedDelay = CommandedDelay::new(DELAY_DIMMEST);

/// Counts zero crossings. Wraps.
static HALFWAVE_SEQ: AvrAtomic<u8> = AvrAtomic::new();

// SAFETY: Is initialized when constructing the MainCtx.
//         Only the ISRs borrow the content afterwards.
static PHASE: InitCtxCell<Mutex<RefCell<Phase>>> = unsafe { InitCtxCell::uninit() };

pub fn triac_init(c: &InitCtx, tc1: mcu::TC1, tc0: mcu::TC0) {
    let timer = Timer1::new(tc1, tc0);
    let phase = PhaseControl::new(timer, GatePin, &COMMANDED_DELAY, PHASE_CONFIG);
    PHASE.init(c, Mutex::new(RefCell::new(phase)));
}

/// Run one phase handler. ISRs don't nest, so the borrow never conflicts.
#[inline(always)]
fn with_phase(c: &IrqCtx, f: impl FnOnce(&mut Phase)) {
    f(&mut PHASE.borrow(c.cs()).borrow_mut());
}

/// Sequence number of the current half-cycle.
#[inline]
pub fn halfwave_seq() -> u8 {
    HALFWAVE_SEQ.load()
}

/// Command the phase delay of the following half-cycles.
#[inline]
pub fn set_delay(delay: Ticks) {
    COMMANDED_DELAY.store(delay);
}

pub fn irq_handler_int0(c: &IrqCtx) {
    with_phase(c, |p| p.on_zero_cross());
    HALFWAVE_SEQ.store(HALFWAVE_SEQ.load().wrapping_add(1));
}

pub fn irq_handler_timer1_compa(c: &IrqCtx) {
    with_phase(c, |p| p.on_compare_match());
}

pub fn irq_handler_timer1_ovf(c: &IrqCtx) {
    with_phase(c, |p| p.on_overflow());
}

// vim: ts=4 sw=4 expandtab
