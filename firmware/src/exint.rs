// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::hw::mcu;
use avr_context::{InitCtx, InitCtxCell};

/// ISC01=1, ISC00=1: INT0 on the rising edge.
const EICRA_INT0_RISING: u8 = 0x03;
const EIMSK_INT0: u8 = 1 << 0;
const EIFR_INTF0: u8 = 1 << 0;

#[allow(non_snake_case)]
pub struct ExInt {
    pub EXINT: mcu::EXINT,
}

// SAFETY: Is initialized when constructing the MainCtx.
pub static EXINT: InitCtxCell<ExInt> = unsafe { InitCtxCell::uninit() };

impl ExInt {
    /// Route the zero crossing detector (PD2) to INT0.
    pub fn setup(&self, _: &InitCtx) {
        // SAFETY: Raw register values. Interrupts are disabled. Ensured by &InitCtx.
        unsafe {
            self.EXINT.eicra().write(|w| w.bits(EICRA_INT0_RISING));
            // Drop an edge seen before the sense control was configured.
            self.EXINT.eifr().write(|w| w.bits(EIFR_INTF0));
            self.EXINT.eimsk().write(|w| w.bits(EIMSK_INT0));
        }
    }
}

// vim: ts=4 sw=4 expandtab
