// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::ticks::Ticks;

/// The half-cycle timer.
///
/// A free-running counter with a fixed prescaler, one compare register
/// and an overflow at the configured modulus.
/// Implementations only write peripheral state. They never wait.
pub trait HalfCycleTimer {
    /// Start counting at the configured tick rate
    /// and arm the compare match and overflow interrupts.
    fn start(&mut self);

    /// Stop counting and disarm the compare match and overflow interrupts.
    fn stop(&mut self);

    /// Program the count at which the compare match interrupt fires.
    fn set_compare(&mut self, compare: Ticks);

    /// Load the counter.
    fn set_count(&mut self, count: u16);

    /// Set the count to zero. The run state is not changed.
    #[inline]
    fn reset(&mut self) {
        self.set_count(0);
    }
}

// vim: ts=4 sw=4 expandtab
