// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mains zero crossing synchronized TRIAC phase control.
//!
//! One hardware timer and three interrupt sources produce one gate pulse
//! per mains half-cycle:
//!
//! - The zero crossing restarts the timer from zero.
//! - The compare match turns the gate on after the commanded delay
//!   and moves the counter to `modulus - pulse_width`.
//! - The overflow turns the gate off and stops the timer.
//!
//! The platform provides the timer ([HalfCycleTimer]) and the gate pin ([Gate])
//! and calls the [PhaseControl] handlers from its interrupt service routines.
//! The [sim] module drives the same handlers from an explicit event queue.

#![no_std]

mod config;
mod delay;
mod gate;
mod phase;
mod ramp;
pub mod sim;
mod ticks;
mod timer;

pub use crate::{
    config::{ConfigError, MAINS_60HZ, PhaseConfig},
    delay::CommandedDelay,
    gate::Gate,
    phase::{PhaseControl, PhaseState},
    ramp::DelayRamp,
    ticks::Ticks,
    timer::HalfCycleTimer,
};

// vim: ts=4 sw=4 expandtab
