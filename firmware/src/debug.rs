// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Debug value table.
//!
//! The values are streamed round robin over the UART as `[id, lo, hi]` frames.
//! Each round ends with the sync frame `[0xFF, 0xFF, 0xFF]`.

#![cfg_attr(not(feature = "debug"), allow(dead_code))]

use crate::hw::{Mutex, interrupt};
#[cfg(feature = "debug")]
use crate::uart::uart_tx_cs;
#[cfg(feature = "debug")]
use avr_context::{IrqCtx, MainCtx};
use core::cell::Cell;

#[derive(Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum Debug {
    Delay,
    Halfwaves,
    MinStack,
}
const NRVALUES: usize = 3;

const INDEXSHIFT: usize = 2;
const INDEXMASK: u8 = (1 << INDEXSHIFT) - 1;
const SYNC: u8 = 0xFF;

static VALUES: Mutex<[Cell<u16>; NRVALUES]> =
    Mutex::new([Cell::new(0), Cell::new(0), Cell::new(0)]);
static INDEX: Mutex<Cell<u8>> = Mutex::new(Cell::new(0));

/// Send the next byte of the frame stream.
#[cfg(feature = "debug")]
pub fn tx_complete_callback(c: &IrqCtx) {
    let cs = c.cs();
    let index = INDEX.borrow(cs).get();
    let id = index >> INDEXSHIFT;
    let txindex = index & INDEXMASK;

    let value = if id < NRVALUES as u8 {
        VALUES.borrow(cs)[id as usize].get()
    } else {
        u16::from_le_bytes([SYNC, SYNC])
    };

    let data = match txindex {
        0 => {
            if id < NRVALUES as u8 {
                id
            } else {
                SYNC
            }
        }
        1 => value as u8,
        _ => (value >> 8) as u8,
    };

    if uart_tx_cs(cs, data) {
        let next = if txindex < 2 {
            index + 1
        } else if id >= NRVALUES as u8 {
            0
        } else {
            (id + 1) << INDEXSHIFT
        };
        INDEX.borrow(cs).set(next);
    }
}

impl Debug {
    pub fn log_u16(&self, value: u16) {
        interrupt::free(|cs| {
            let id = *self as usize;
            let values = VALUES.borrow(cs);
            if id < values.len() {
                values[id].set(value);
            }
        });
    }

    pub fn log_u8(&self, value: u8) {
        self.log_u16(value.into())
    }
}

/// Kick off the frame stream with the first id byte.
/// All further bytes are sent from the TX complete interrupt.
#[cfg(feature = "debug")]
pub fn debug_init(m: &MainCtx<'_>) {
    let cs = m.cs();
    if uart_tx_cs(cs, 0) {
        INDEX.borrow(cs).set(1);
    }
}

// vim: ts=4 sw=4 expandtab
