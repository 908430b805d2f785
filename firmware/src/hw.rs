// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

pub use atmega::{self as mcu, Peripherals};
pub use avr_device::atmega328p as atmega;
pub use avr_device::interrupt::{self, CriticalSection, Mutex};

use avr_context::IrqCtx;

macro_rules! define_isr {
    ($name:ident, $handler:path) => {
        #[avr_device::interrupt(atmega328p)]
        fn $name() {
            // SAFETY: We are inside of an interrupt handler.
            // Therefore, it is safe to construct an `IrqCtx`.
            let c = unsafe { IrqCtx::new() };
            $handler(&c);
        }
    };
}

define_isr!(INT0, crate::triac::irq_handler_int0);
define_isr!(TIMER1_COMPA, crate::triac::irq_handler_timer1_compa);
define_isr!(TIMER1_OVF, crate::triac::irq_handler_timer1_ovf);
#[cfg(feature = "debug")]
define_isr!(USART_TX, crate::uart::irq_handler_usart_tx);

/// `Option::unwrap` without the panic path.
/// `None` resets the system.
#[inline(always)]
pub fn unwrap_option<T>(value: Option<T>) -> T {
    match value {
        Some(value) => value,
        None => reset_system(),
    }
}

/// Spin until the watchdog bites.
#[inline(always)]
#[allow(clippy::empty_loop)]
pub fn reset_system() -> ! {
    // Only the main loop pokes the watchdog.
    loop {}
}

#[inline(always)]
#[panic_handler]
fn panic(_: &core::panic::PanicInfo) -> ! {
    reset_system();
}

// vim: ts=4 sw=4 expandtab
