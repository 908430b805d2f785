// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::ticks::Ticks;
use portable_atomic::{AtomicU16, Ordering};

/// The commanded gate delay after the zero crossing.
///
/// This is the only value shared between the caller (main context)
/// and the zero crossing handler (interrupt context).
/// Loads and stores are single-word atomic, so the handler never sees a torn value.
/// On AVR this is a short interrupt-disabled section.
///
/// A stored value takes effect at the next zero crossing.
/// The value is not validated. See [crate::PhaseConfig::delay_is_valid].
pub struct CommandedDelay(AtomicU16);

impl CommandedDelay {
    pub const fn new(delay: Ticks) -> Self {
        Self(AtomicU16::new(delay.0))
    }

    #[inline]
    pub fn store(&self, delay: Ticks) {
        self.0.store(delay.0, Ordering::Relaxed);
    }

    #[inline]
    pub fn load(&self) -> Ticks {
        Ticks(self.0.load(Ordering::Relaxed))
    }
}


// vim: ts=4 sw=4 expandtab
