// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::hw::mcu;
use avr_context::{InitCtx, InitCtxCell};

/// Gate drive output. Active high.
pub const GATE_BIT: u8 = 1; // PB1

const fn bit(n: u8) -> u8 {
    1 << n
}

macro_rules! impl_port {
    ($struct:ident, $name:ident, $port:ident, $pin:ident, $ddr:ident) => {
        #[allow(non_snake_case)]
        pub struct $struct {
            pub $name: mcu::$name,
        }

        // SAFETY: Is initialized when constructing the MainCtx.
        pub static $name: InitCtxCell<$struct> = unsafe { InitCtxCell::uninit() };

        impl $struct {
            /// Write the output latch and the direction register.
            /// `out` bits of input pins switch on the pull-up.
            fn configure(&self, out: u8, ddr: u8) {
                // SAFETY: Any bit pattern is a valid port configuration.
                unsafe {
                    self.$name.$port().write(|w| w.bits(out));
                    self.$name.$ddr().write(|w| w.bits(ddr));
                }
            }

            #[inline(always)]
            #[allow(dead_code)]
            pub fn get(&self, n: u8) -> bool {
                self.$name.$pin().read().bits() & bit(n) != 0
            }

            /// Read-modify-write of one output bit.
            /// Must not race with another writer of the same port.
            #[inline(always)]
            pub fn set(&self, n: u8, value: bool) {
                self.$name.$port().modify(|r, w| {
                    let out = if value {
                        r.bits() | bit(n)
                    } else {
                        r.bits() & !bit(n)
                    };
                    // SAFETY: Any bit pattern is a valid output latch value.
                    unsafe { w.bits(out) }
                });
            }
        }
    };
}

impl_port!(PortB, PORTB, portb, pinb, ddrb);
impl_port!(PortD, PORTD, portd, pind, ddrd);

impl PortB {
    pub fn setup(&self, _: &InitCtx) {
        // PB0, PB2: unused, pull-up
        // PB1: gate, output low
        // PB3..PB5: ISP, PB5 also drives the LED
        // PB6, PB7: crystal
        self.configure(bit(0) | bit(2), bit(GATE_BIT) | bit(5));
    }
}

impl PortD {
    pub fn setup(&self, _: &InitCtx) {
        // PD0: RXD, pull-up
        // PD1: TXD, output idle high
        // PD2: zero crossing detector, INT0, floating
        // PD3..PD7: unused, pull-up
        self.configure(!bit(2), bit(1));
    }
}

// vim: ts=4 sw=4 expandtab
