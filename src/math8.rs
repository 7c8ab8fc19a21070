use core::f32::consts::TAU;

use embassy_time::{Duration, Instant};

/// Scale an 8-bit value by a factor (0-255 = 0.0-1.0)
///
/// Uses integer math for efficiency on embedded systems.
#[inline]
#[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
pub const fn scale8(value: u8, scale: u8) -> u8 {
    ((value as u16 * (1 + scale as u16)) >> 8) as u8
}

/// Blend two 8-bit values
#[inline]
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
pub const fn blend8(a: u8, b: u8, amount_of_b: u8) -> u8 {
    let delta = b as i16 - a as i16;

    let mut partial: u32 = (a as u32) << 16; // a * 65536
    partial = partial.wrapping_add(
        (delta as u32)
            .wrapping_mul(amount_of_b as u32)
            .wrapping_mul(257),
    ); // (b - a) * amount_of_b * 257
    partial = partial.wrapping_add(0x8000); // + 32768 for rounding

    (partial >> 16) as u8
}

/// Calculate progress (0-255) based on elapsed time and duration
///
/// A zero duration is already complete.
#[allow(clippy::cast_possible_truncation)]
#[inline]
pub const fn progress8(elapsed: Duration, duration: Duration) -> u8 {
    if duration.as_millis() == 0 || elapsed.as_millis() >= duration.as_millis() {
        return 255;
    }

    ((elapsed.as_millis() * 255) / duration.as_millis()) as u8
}

/// Time elapsed between `since` and `now`, zero if `since` lies in the future
#[inline]
pub fn elapsed_since(now: Instant, since: Instant) -> Duration {
    now.checked_duration_since(since)
        .unwrap_or(Duration::from_millis(0))
}

/// Smooth periodic wave between `low` and `high`
///
/// `beats_per_minute` may be fractional so that slow envelopes can be
/// derived from faster ones.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn beatsin8(beats_per_minute: f32, low: u8, high: u8, now: Instant) -> u8 {
    let (low, high) = if low <= high { (low, high) } else { (high, low) };
    let beats = now.as_millis() as f32 * beats_per_minute / 60_000.0;
    let phase = beats - libm::floorf(beats);
    // Shifted so the wave starts at its midpoint and rises
    let wave = (libm::sinf(phase * TAU) + 1.0) * 0.5;
    let span = f32::from(high - low);

    low + libm::roundf(wave * span) as u8
}

/// Fractional part of a value, always in `[0, 1)`
#[inline]
pub fn fract(value: f32) -> f32 {
    value - libm::floorf(value)
}
