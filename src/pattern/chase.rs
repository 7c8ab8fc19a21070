//! Color chase pattern
//!
//! All targets form one continuous ribbon, in target order. Each palette
//! color occupies a band of LEDs and the bands sweep along the ribbon,
//! wrapping from the last color back to the first.

use super::{Pattern, RenderParams};
use crate::{canvas::Canvas, speed::Speed};

/// LEDs per palette color
const DEFAULT_BAND_LEDS: u16 = 10;
/// Bands used for the hue sweep of an empty palette
const FALLBACK_BANDS: usize = 16;

#[derive(Debug, Clone)]
pub struct ColorChasePattern {
    band_leds: u16,
}

impl Default for ColorChasePattern {
    fn default() -> Self {
        Self {
            band_leds: DEFAULT_BAND_LEDS,
        }
    }
}

impl ColorChasePattern {
    /// Set the number of LEDs each palette color occupies
    #[must_use]
    pub fn with_band_leds(mut self, band_leds: u16) -> Self {
        self.band_leds = band_leds.max(1);
        self
    }

    /// Ribbon distance after which the colors repeat
    fn ribbon_period(&self, palette_len: usize) -> usize {
        let bands = if palette_len == 0 {
            FALLBACK_BANDS
        } else {
            palette_len
        };
        bands * usize::from(self.band_leds)
    }
}

/// Cursor advance per recompute, faster speeds also take larger steps
pub(crate) const fn chase_step(speed: Speed) -> u32 {
    1 + (speed.get() as u32 - 1) / 33
}

impl Pattern for ColorChasePattern {
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    fn render<const LEDS: usize>(
        &self,
        params: &RenderParams<'_>,
        cursor: &mut u32,
        canvas: &mut Canvas<'_, LEDS>,
    ) {
        let period = self.ribbon_period(params.palette.len());
        let offset = *cursor as usize % period;

        // Claimed or yielded strips still occupy their stretch of ribbon
        let mut ribbon_position = 0;
        for &strip in params.targets.as_slice() {
            let start = ribbon_position;
            canvas.paint(strip, |index, _| {
                let position = (start + index + offset) % period;
                params
                    .palette
                    .sample_cyclic(position as f32 / period as f32)
            });
            ribbon_position += canvas.strip_len(strip);
        }

        *cursor = ((offset as u32) + chase_step(params.speed)) % period as u32;
    }
}
