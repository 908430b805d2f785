// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![allow(unused_unsafe)]

use crate::{
    debug,
    hw::{CriticalSection, Mutex, mcu},
};
use avr_context::{InitCtx, InitCtxCell, IrqCtx};
use core::cell::Cell;

const FCPU: u32 = 16_000_000;
const BAUD: u32 = 19_200;
const UBRR: u16 = ((FCPU + BAUD * 8) / (BAUD * 16) - 1) as u16;
const _: () = assert!(UBRR == 51);

const UCSR0B_TXEN0: u8 = 1 << 3;
const UCSR0B_TXCIE0: u8 = 1 << 6;
/// Asynchronous, no parity, 1 stop bit, 8 data bits.
const UCSR0C_8N1: u8 = 0x06;

#[allow(non_snake_case)]
pub struct Dp {
    pub USART0: mcu::USART0,
}

// SAFETY: Is initialized when constructing the MainCtx.
pub static DP: InitCtxCell<Dp> = unsafe { InitCtxCell::uninit() };

/// A byte is in the transmitter.
static BUSY: Mutex<Cell<bool>> = Mutex::new(Cell::new(false));

impl Dp {
    pub fn setup(&self, _c: &InitCtx) {
        // SAFETY: Raw register values. Called with interrupts disabled. Ensured by &InitCtx.
        unsafe {
            self.USART0.ubrr0().write(|w| w.set(UBRR));
            self.USART0.ucsr0a().write(|w| w.bits(0));
            self.USART0.ucsr0c().write(|w| w.bits(UCSR0C_8N1));
            self.USART0
                .ucsr0b()
                .write(|w| w.bits(UCSR0B_TXEN0 | UCSR0B_TXCIE0));
        }
    }
}

pub fn irq_handler_usart_tx(c: &IrqCtx) {
    BUSY.borrow(c.cs()).set(false);
    debug::tx_complete_callback(c);
}

/// Start transmission of one byte.
/// Returns false, if the transmitter is still busy.
pub fn uart_tx_cs(cs: CriticalSection<'_>, data: u8) -> bool {
    let busy = BUSY.borrow(cs);
    if busy.get() {
        false
    } else {
        busy.set(true);
        // SAFETY: Any byte can be sent.
        unsafe {
            DP.USART0.udr0().write(|w| w.set(data));
        }
        true
    }
}

// vim: ts=4 sw=4 expandtab
