//! Pattern speed and its mapping to an update period.
//!
//! Every pattern is paced by the same mapping, so speed 50 feels the same
//! on a chase as on a rainbow.

use embassy_time::Duration;
use log::warn;

/// Slowest speed
pub const MIN_SPEED: u8 = 1;
/// Fastest speed
pub const MAX_SPEED: u8 = 100;

/// Update period at [`MIN_SPEED`], in milliseconds
pub const SLOWEST_PERIOD_MS: u64 = 20;
/// Update period at [`MAX_SPEED`], in milliseconds
pub const FASTEST_PERIOD_MS: u64 = 1;

/// Pattern speed in `1..=100`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Speed(u8);

impl Speed {
    pub const SLOWEST: Self = Self(MIN_SPEED);
    pub const FASTEST: Self = Self(MAX_SPEED);

    /// Create a speed, clamping out-of-range values
    pub fn new(value: u8) -> Self {
        let clamped = value.clamp(MIN_SPEED, MAX_SPEED);
        if clamped != value {
            warn!("speed: {} is out of range, clamped to {}", value, clamped);
        }
        Self(clamped)
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// Update period for this speed
    pub fn period(self) -> Duration {
        speed_to_period(self.0)
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self(50)
    }
}

impl From<u8> for Speed {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}

/// Map a speed in `1..=100` to an update period
///
/// Linear from 20 ms at speed 1 down to 1 ms at speed 100, rounded to the
/// nearest millisecond. Out-of-range speeds are clamped.
pub const fn speed_to_period(speed: u8) -> Duration {
    let speed = if speed < MIN_SPEED {
        MIN_SPEED
    } else if speed > MAX_SPEED {
        MAX_SPEED
    } else {
        speed
    };
    let steps = (speed - MIN_SPEED) as u64;
    let span = SLOWEST_PERIOD_MS - FASTEST_PERIOD_MS;
    let range = (MAX_SPEED - MIN_SPEED) as u64;
    let reduction = (steps * span + range / 2) / range;

    Duration::from_millis(SLOWEST_PERIOD_MS - reduction)
}
