// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![no_std]
#![no_main]
#![feature(abi_avr_interrupt)]
#![feature(asm_experimental_arch)]

mod debug;
mod exint;
mod hw;
mod ports;
mod system;
mod timer;
mod triac;
#[cfg(feature = "debug")]
mod uart;

use crate::{
    debug::Debug,
    exint::{EXINT, ExInt},
    hw::{Peripherals, interrupt, mcu, unwrap_option},
    ports::{PORTB, PORTD, PortB, PortD},
    system::System,
    triac::triac_init,
};
use avr_context::{InitCtx, MainCtx};
use avr_stack::estimate_unused_stack_space;

static SYSTEM: System = System::new();

fn wdt_init() {
    // SAFETY: The asm code only accesses the WDT registers
    //         which are not accessed from anywhere else in the program.
    unsafe {
        // Enable WDT with timeout 64 ms
        core::arch::asm!(
            "ldi {tmp}, 0x18", // WDCE=1, WDE=1
            "sts {WDTCSR}, {tmp}",
            "ldi {tmp}, 0x0A", // WDE=1, WDP2=0, WDP1=1, WDP0=0
            "sts {WDTCSR}, {tmp}",
            tmp = out(reg_upper) _,
            WDTCSR = const 0x60,
            options(nostack, preserves_flags)
        );
    }
}

fn wdt_poke(_wp: &mcu::WDT) {
    avr_device::asm::wdr();
}

#[avr_device::entry]
fn main() -> ! {
    wdt_init();

    let dp = unwrap_option(Peripherals::take());

    let init_static_vars = |ctx: &InitCtx| {
        PORTB.init(ctx, PortB { PORTB: dp.PORTB });
        PORTD.init(ctx, PortD { PORTD: dp.PORTD });
        PORTB.setup(ctx);
        PORTD.setup(ctx);

        EXINT.init(ctx, ExInt { EXINT: dp.EXINT });
        EXINT.setup(ctx);
        triac_init(ctx, dp.TC1, dp.TC0);

        #[cfg(feature = "debug")]
        {
            uart::DP.init(ctx, uart::Dp { USART0: dp.USART0 });
            uart::DP.setup(ctx);
        }
    };

    // # SAFETY
    //
    // This is the context handle for the main() function.
    // Holding a reference to this object proves that the holder
    // is running in main() context.
    let m = unsafe { MainCtx::new_with_init(init_static_vars) };

    SYSTEM.init(&m);
    #[cfg(feature = "debug")]
    debug::debug_init(&m);

    // SAFETY: This must be after construction of MainCtx
    //         and after initialization of the InitCtxCell statics.
    unsafe { interrupt::enable() };

    loop {
        SYSTEM.run(&m);
        Debug::MinStack.log_u16(estimate_unused_stack_space());
        wdt_poke(&dp.WDT);
    }
}

// vim: ts=4 sw=4 expandtab
