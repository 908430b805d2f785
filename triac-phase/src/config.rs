// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::ticks::Ticks;

/// Largest supported counter modulus (16 bit counter).
const MAX_MODULUS: u32 = 1 << 16;

/// 60 Hz mains, 16 bit counter at 16 us per tick, 64 us gate pulse.
///
/// This gives a pulse width of 4 ticks and a half-cycle of 521 ticks.
pub const MAINS_60HZ: PhaseConfig = PhaseConfig::new(MAX_MODULUS, 16, 60, 64);

/// Timing constants of the phase control.
///
/// These are fixed at build time.
/// They derive from the mains frequency and the minimum TRIAC latch time.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct PhaseConfig {
    /// Counter modulus. The counter wraps from `modulus - 1` to zero.
    pub modulus: u32,
    /// Duration of one timer tick, in microseconds.
    pub tick_us: u32,
    /// Gate pulse length.
    pub pulse_width: Ticks,
    /// Duration of one mains half-cycle.
    pub halfwave: Ticks,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ConfigError {
    /// The tick duration is zero.
    ZeroTick,
    /// The half-cycle is zero ticks long.
    ZeroHalfwave,
    /// The modulus is not in `2..=65536`.
    Modulus,
    /// The pulse width is zero or not shorter than the modulus.
    PulseWidth,
    /// The pulse does not fit into one half-cycle.
    PulseExceedsHalfwave,
    /// The counter wraps before the half-cycle plus pulse is over.
    HalfwaveExceedsCounter,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            Self::ZeroTick => "tick duration is zero",
            Self::ZeroHalfwave => "half-cycle duration is zero",
            Self::Modulus => "counter modulus out of range",
            Self::PulseWidth => "pulse width out of range",
            Self::PulseExceedsHalfwave => "pulse does not fit into the half-cycle",
            Self::HalfwaveExceedsCounter => "half-cycle does not fit into the counter range",
        };
        f.write_str(msg)
    }
}

const fn div_round(a: u32, b: u32) -> u32 {
    (a + b / 2) / b
}

const fn div_ceil(a: u32, b: u32) -> u32 {
    a.div_ceil(b)
}

const fn sat_u16(v: u32) -> u16 {
    if v > u16::MAX as u32 {
        u16::MAX
    } else {
        v as u16
    }
}

impl PhaseConfig {
    /// Derive the timing constants.
    ///
    /// `pulse_us` is rounded up to full ticks.
    /// The half-cycle is rounded to the nearest tick.
    pub const fn new(modulus: u32, tick_us: u32, mains_hz: u32, pulse_us: u32) -> Self {
        let (pulse_width, halfwave) = if tick_us == 0 || mains_hz == 0 {
            (0, 0)
        } else {
            (
                div_ceil(pulse_us, tick_us),
                div_round(1_000_000, 2 * mains_hz * tick_us),
            )
        };
        Self {
            modulus,
            tick_us,
            pulse_width: Ticks(sat_u16(pulse_width)),
            halfwave: Ticks(sat_u16(halfwave)),
        }
    }

    /// Validate the constants.
    pub const fn check(&self) -> Result<(), ConfigError> {
        let pw = self.pulse_width.0 as u32;
        let hw = self.halfwave.0 as u32;
        if self.tick_us == 0 {
            Err(ConfigError::ZeroTick)
        } else if hw == 0 {
            Err(ConfigError::ZeroHalfwave)
        } else if self.modulus < 2 || self.modulus > MAX_MODULUS {
            Err(ConfigError::Modulus)
        } else if pw == 0 || pw >= self.modulus {
            Err(ConfigError::PulseWidth)
        } else if pw >= hw {
            Err(ConfigError::PulseExceedsHalfwave)
        } else if hw >= self.modulus - pw {
            Err(ConfigError::HalfwaveExceedsCounter)
        } else {
            Ok(())
        }
    }

    /// The count that is loaded on compare match,
    /// so that the overflow fires `pulse_width` ticks later.
    ///
    /// Only meaningful if [Self::check] passes.
    #[inline]
    pub const fn pulse_start_count(&self) -> u16 {
        self.modulus.saturating_sub(self.pulse_width.0 as u32) as u16
    }

    /// The largest valid commanded delay.
    ///
    /// Only meaningful if [Self::check] passes.
    #[inline]
    pub const fn max_delay(&self) -> Ticks {
        Ticks(self.pulse_start_count().saturating_sub(1))
    }

    #[inline]
    pub const fn delay_is_valid(&self, delay: Ticks) -> bool {
        delay.0 < self.pulse_start_count()
    }

    /// Convert microseconds into ticks (truncating).
    #[inline]
    pub const fn ticks_from_micros(&self, us: u32) -> Ticks {
        Ticks(sat_u16(us / self.tick_us))
    }

    #[inline]
    pub const fn micros_from_ticks(&self, ticks: Ticks) -> u32 {
        ticks.0 as u32 * self.tick_us
    }
}

#[cfg(test)]
mod test {
    use super::*;

    extern crate std;
    use std::string::ToString;

    #[test]
    fn test_mains_60hz() {
        assert_eq!(MAINS_60HZ.check(), Ok(()));
        assert_eq!(MAINS_60HZ.modulus, 65536);
        assert_eq!(MAINS_60HZ.tick_us, 16);
        assert_eq!(MAINS_60HZ.pulse_width, Ticks(4));
        assert_eq!(MAINS_60HZ.halfwave, Ticks(521));
        assert_eq!(MAINS_60HZ.pulse_start_count(), 65532);
        assert_eq!(MAINS_60HZ.max_delay(), Ticks(65531));
        assert!(MAINS_60HZ.delay_is_valid(Ticks(0)));
        assert!(MAINS_60HZ.delay_is_valid(Ticks(65531)));
        assert!(!MAINS_60HZ.delay_is_valid(Ticks(65532)));
    }

    #[test]
    fn test_50hz() {
        let c = PhaseConfig::new(1 << 16, 16, 50, 64);
        assert_eq!(c.check(), Ok(()));
        assert_eq!(c.halfwave, Ticks(625));
    }

    #[test]
    fn test_pulse_round_up() {
        let c = PhaseConfig::new(1 << 16, 16, 60, 65);
        assert_eq!(c.pulse_width, Ticks(5));
    }

    #[test]
    fn test_conversions() {
        assert_eq!(MAINS_60HZ.ticks_from_micros(1600), Ticks(100));
        assert_eq!(MAINS_60HZ.ticks_from_micros(1615), Ticks(100));
        assert_eq!(MAINS_60HZ.micros_from_ticks(Ticks(104)), 1664);
    }

    #[test]
    fn test_check() {
        let c = PhaseConfig::new(1 << 16, 0, 60, 64);
        assert_eq!(c.check(), Err(ConfigError::ZeroTick));

        let c = PhaseConfig::new(1 << 16, 16, 0, 64);
        assert_eq!(c.check(), Err(ConfigError::ZeroHalfwave));

        let c = PhaseConfig::new((1 << 16) + 1, 16, 60, 64);
        assert_eq!(c.check(), Err(ConfigError::Modulus));

        let c = PhaseConfig::new(1 << 16, 16, 60, 0);
        assert_eq!(c.check(), Err(ConfigError::PulseWidth));

        let c = PhaseConfig::new(1 << 16, 16, 60, 9000);
        assert_eq!(c.check(), Err(ConfigError::PulseExceedsHalfwave));

        // 8 bit counter: 521 ticks do not fit.
        let c = PhaseConfig::new(1 << 8, 16, 60, 64);
        assert_eq!(c.check(), Err(ConfigError::HalfwaveExceedsCounter));

        // 8 bit counter at 64 us per tick: 130 ticks fit.
        let c = PhaseConfig::new(1 << 8, 64, 60, 64);
        assert_eq!(c.check(), Ok(()));
        assert_eq!(c.halfwave, Ticks(130));
        assert_eq!(c.pulse_start_count(), 255);
    }

    #[test]
    fn test_invalid_config_helpers() {
        let c = PhaseConfig::new(1 << 16, 16, 60, 0);
        assert_eq!(c.check(), Err(ConfigError::PulseWidth));
        assert_eq!(c.max_delay(), Ticks(0));

        let c = PhaseConfig {
            modulus: 2,
            tick_us: 16,
            pulse_width: Ticks(5),
            halfwave: Ticks(1),
        };
        assert_eq!(c.check(), Err(ConfigError::PulseWidth));
        assert_eq!(c.pulse_start_count(), 0);
        assert_eq!(c.max_delay(), Ticks(0));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(ConfigError::ZeroTick.to_string(), "tick duration is zero");
        assert_eq!(
            ConfigError::HalfwaveExceedsCounter.to_string(),
            "half-cycle does not fit into the counter range"
        );
        let c = PhaseConfig::new(256, 16, 60, 64);
        assert_eq!(
            c.check().map_err(|e| e.to_string()),
            Err("half-cycle does not fit into the counter range".to_string())
        );
    }
}

// vim: ts=4 sw=4 expandtab
