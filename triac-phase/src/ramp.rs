// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::ticks::Ticks;

/// Falling delay sweep.
///
/// Each step shortens the delay by one tick (more power).
/// After `end` the sweep starts over at `start`.
#[derive(Copy, Clone, Debug)]
pub struct DelayRamp {
    start: Ticks,
    end: Ticks,
    current: Ticks,
}

impl DelayRamp {
    pub const fn new(start: Ticks, end: Ticks) -> Self {
        Self {
            start,
            end,
            current: start,
        }
    }

    #[inline]
    pub fn current(&self) -> Ticks {
        self.current
    }

    /// Step to the next delay and return it.
    pub fn advance(&mut self) -> Ticks {
        self.current = if self.current <= self.end {
            self.start
        } else {
            self.current - Ticks(1)
        };
        self.current
    }
}


// vim: ts=4 sw=4 expandtab
