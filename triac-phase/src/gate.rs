// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// The TRIAC gate drive output.
pub trait Gate {
    /// Drive the gate. `true` triggers the TRIAC.
    fn set_gate(&mut self, on: bool);
}

// vim: ts=4 sw=4 expandtab
