// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

use derive_more::{Add, AddAssign, Sub, SubAssign};

/// A number of hardware timer ticks.
#[derive(
    Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default, Debug, Add, AddAssign, Sub, SubAssign,
)]
#[repr(transparent)]
pub struct Ticks(pub u16);

impl Ticks {
    pub const ZERO: Ticks = Ticks(0);

    #[inline]
    pub const fn new(ticks: u16) -> Self {
        Ticks(ticks)
    }

    #[inline]
    pub const fn get(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl From<u16> for Ticks {
    #[inline]
    fn from(ticks: u16) -> Self {
        Ticks(ticks)
    }
}

impl From<Ticks> for u16 {
    #[inline]
    fn from(ticks: Ticks) -> Self {
        ticks.0
    }
}


// vim: ts=4 sw=4 expandtab
