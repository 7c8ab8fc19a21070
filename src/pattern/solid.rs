//! Solid fill pattern
//!
//! Fills every target LED with the first palette color, black when the
//! palette is empty.

use super::{Pattern, RenderParams};
use crate::{canvas::Canvas, color::BLACK};

#[derive(Debug, Clone, Copy, Default)]
pub struct SolidPattern;

impl Pattern for SolidPattern {
    fn render<const LEDS: usize>(
        &self,
        params: &RenderParams<'_>,
        _cursor: &mut u32,
        canvas: &mut Canvas<'_, LEDS>,
    ) {
        let color = params.palette.first().unwrap_or(BLACK);
        for &strip in params.targets.as_slice() {
            canvas.fill(strip, color);
        }
    }
}
