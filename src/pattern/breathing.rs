//! Breathing pattern
//!
//! Brightness follows a sine envelope between a minimum and a maximum
//! while the base color drifts through the palette four times slower.

use super::{Pattern, RenderParams};
use crate::{
    canvas::Canvas,
    color::scale_color,
    math8::beatsin8,
    speed::Speed,
};

/// Default floor: 70% brightness
const DEFAULT_MIN_BRIGHTNESS: u8 = 142;
const DEFAULT_MAX_BRIGHTNESS: u8 = 255;

/// Ratio between the breathing rate and the palette drift rate
const PALETTE_DRIFT_DIVISOR: f32 = 4.0;

#[derive(Debug, Clone)]
pub struct BreathingPattern {
    min_brightness: u8,
    max_brightness: u8,
}

impl Default for BreathingPattern {
    fn default() -> Self {
        Self {
            min_brightness: DEFAULT_MIN_BRIGHTNESS,
            max_brightness: DEFAULT_MAX_BRIGHTNESS,
        }
    }
}

impl BreathingPattern {
    /// Set the brightness range of the envelope
    #[must_use]
    pub fn with_brightness(mut self, min: u8, max: u8) -> Self {
        self.min_brightness = min.min(max);
        self.max_brightness = max.max(min);
        self
    }
}

/// Breaths per minute for a speed
fn breaths_per_minute(speed: Speed) -> f32 {
    (f32::from(speed.get()) / 4.0).max(1.0)
}

impl Pattern for BreathingPattern {
    fn render<const LEDS: usize>(
        &self,
        params: &RenderParams<'_>,
        _cursor: &mut u32,
        canvas: &mut Canvas<'_, LEDS>,
    ) {
        let bpm = breaths_per_minute(params.speed);
        let brightness = beatsin8(bpm, self.min_brightness, self.max_brightness, params.now);
        let drift = beatsin8(bpm / PALETTE_DRIFT_DIVISOR, 0, 255, params.now);
        let base = params.palette.interpolate(f32::from(drift) / 255.0);
        let color = scale_color(base, brightness);

        for &strip in params.targets.as_slice() {
            canvas.fill(strip, color);
        }
    }
}
