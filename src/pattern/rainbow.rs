//! Rainbow patterns
//!
//! Both variants ignore the palette and sweep the full hue circle; the
//! hue origin advances by one step per recompute.
//! - `RainbowPattern`: hue changes along each strip
//! - `HorizontalRainbowPattern`: one hue per strip, changing across strips

use super::{Pattern, RenderParams};
use crate::{canvas::Canvas, color::hue_color};

/// Hue sweep along each target strip
#[derive(Debug, Clone, Copy, Default)]
pub struct RainbowPattern;

/// Solid hue per target strip, offset by its position in the target list
#[derive(Debug, Clone, Copy, Default)]
pub struct HorizontalRainbowPattern;

/// Hue at `index` of `count` evenly spaced steps starting at `origin`
#[allow(clippy::cast_possible_truncation)]
fn spread_hue(origin: u8, index: usize, count: usize) -> u8 {
    let step = (index * 255 / count.max(1)) as u8;
    origin.wrapping_add(step)
}

#[allow(clippy::cast_possible_truncation)]
fn advance_origin(cursor: &mut u32) -> u8 {
    let origin = (*cursor % 256) as u8;
    *cursor = u32::from(origin.wrapping_add(1));
    origin
}

impl Pattern for RainbowPattern {
    fn render<const LEDS: usize>(
        &self,
        params: &RenderParams<'_>,
        cursor: &mut u32,
        canvas: &mut Canvas<'_, LEDS>,
    ) {
        let origin = advance_origin(cursor);
        for &strip in params.targets.as_slice() {
            let len = canvas.strip_len(strip);
            canvas.paint(strip, |index, _| hue_color(spread_hue(origin, index, len)));
        }
    }
}

impl Pattern for HorizontalRainbowPattern {
    fn render<const LEDS: usize>(
        &self,
        params: &RenderParams<'_>,
        cursor: &mut u32,
        canvas: &mut Canvas<'_, LEDS>,
    ) {
        let origin = advance_origin(cursor);
        let count = params.targets.len();
        for (position, &strip) in params.targets.as_slice().iter().enumerate() {
            canvas.fill(strip, hue_color(spread_hue(origin, position, count)));
        }
    }
}
