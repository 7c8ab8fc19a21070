//! Pinwheel pattern
//!
//! Target strips are placed on a 2-D plane. Every LED takes the palette
//! color found at its angle around the center of the arrangement, and the
//! whole wheel rotates by one degree per recompute.

use core::f32::consts::TAU;

use super::{Pattern, RenderParams};
use crate::{
    canvas::Canvas,
    color::{BLACK, scale_color},
    math8::fract,
    strip::StripId,
};

/// Brightness lost between the center and the farthest LED
const FALLOFF_DEPTH: f32 = 200.0;
/// Brightness floor with falloff enabled
const FALLOFF_FLOOR: u8 = 50;

/// Direction in which a strip's LEDs run on the plane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementAxis {
    Horizontal,
    Vertical,
}

/// Position of one strip on the plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StripPlacement {
    pub strip: StripId,
    /// Coordinates of LED 0
    pub x: f32,
    pub y: f32,
    pub axis: PlacementAxis,
}

/// How target strips are arranged on the plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PinwheelLayout {
    /// Target `k` is a horizontal row at `y = k * pitch`
    Rows { pitch: f32 },
    /// Target `k` is a vertical column at `x = k * pitch`
    Columns { pitch: f32 },
    /// Fixed placement per strip id
    Table(&'static [StripPlacement]),
}

impl Default for PinwheelLayout {
    fn default() -> Self {
        Self::Rows { pitch: 1.0 }
    }
}

impl PinwheelLayout {
    /// Placement of the target at `position` in the target list
    #[allow(clippy::cast_precision_loss)]
    fn place(&self, position: usize, strip: StripId) -> Option<StripPlacement> {
        match *self {
            Self::Rows { pitch } => Some(StripPlacement {
                strip,
                x: 0.0,
                y: position as f32 * pitch,
                axis: PlacementAxis::Horizontal,
            }),
            Self::Columns { pitch } => Some(StripPlacement {
                strip,
                x: position as f32 * pitch,
                y: 0.0,
                axis: PlacementAxis::Vertical,
            }),
            Self::Table(table) => table.iter().find(|entry| entry.strip == strip).copied(),
        }
    }
}

impl StripPlacement {
    #[allow(clippy::cast_precision_loss)]
    fn led_position(&self, index: usize) -> (f32, f32) {
        match self.axis {
            PlacementAxis::Horizontal => (self.x + index as f32, self.y),
            PlacementAxis::Vertical => (self.x, self.y + index as f32),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PinwheelPattern {
    layout: PinwheelLayout,
    falloff: bool,
}

impl PinwheelPattern {
    pub fn new(layout: PinwheelLayout) -> Self {
        Self {
            layout,
            falloff: false,
        }
    }

    /// Dim LEDs with their distance from the center
    #[must_use]
    pub fn with_falloff(mut self, falloff: bool) -> Self {
        self.falloff = falloff;
        self
    }

    pub fn layout(&self) -> &PinwheelLayout {
        &self.layout
    }
}

/// Axis-aligned bounds of every placed LED
struct Bounds {
    min_x: f32,
    max_x: f32,
    min_y: f32,
    max_y: f32,
}

impl Bounds {
    fn center(&self) -> (f32, f32) {
        (
            (self.min_x + self.max_x) * 0.5,
            (self.min_y + self.max_y) * 0.5,
        )
    }

    fn radius(&self) -> f32 {
        let half_width = (self.max_x - self.min_x) * 0.5;
        let half_height = (self.max_y - self.min_y) * 0.5;
        libm::sqrtf(half_width * half_width + half_height * half_height)
    }
}

impl PinwheelPattern {
    fn bounds<const LEDS: usize>(
        &self,
        params: &RenderParams<'_>,
        canvas: &Canvas<'_, LEDS>,
    ) -> Option<Bounds> {
        let mut bounds: Option<Bounds> = None;
        for (position, &strip) in params.targets.as_slice().iter().enumerate() {
            let len = canvas.strip_len(strip);
            let Some(placement) = self.layout.place(position, strip) else {
                continue;
            };
            if len == 0 {
                continue;
            }
            let (x0, y0) = placement.led_position(0);
            let (x1, y1) = placement.led_position(len - 1);
            let b = bounds.get_or_insert(Bounds {
                min_x: x0,
                max_x: x0,
                min_y: y0,
                max_y: y0,
            });
            b.min_x = b.min_x.min(x0).min(x1);
            b.max_x = b.max_x.max(x0).max(x1);
            b.min_y = b.min_y.min(y0).min(y1);
            b.max_y = b.max_y.max(y0).max(y1);
        }
        bounds
    }
}

impl Pattern for PinwheelPattern {
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn render<const LEDS: usize>(
        &self,
        params: &RenderParams<'_>,
        cursor: &mut u32,
        canvas: &mut Canvas<'_, LEDS>,
    ) {
        let rotation = *cursor % 360;
        *cursor = (rotation + 1) % 360;

        let Some(bounds) = self.bounds(params, canvas) else {
            for &strip in params.targets.as_slice() {
                canvas.fill(strip, BLACK);
            }
            return;
        };
        let (center_x, center_y) = bounds.center();
        let max_radius = bounds.radius();
        let turn = rotation as f32 / 360.0;

        for (position, &strip) in params.targets.as_slice().iter().enumerate() {
            let Some(placement) = self.layout.place(position, strip) else {
                canvas.fill(strip, BLACK);
                continue;
            };
            canvas.paint(strip, |index, _| {
                let (x, y) = placement.led_position(index);
                let (dx, dy) = (x - center_x, y - center_y);
                let angle = libm::atan2f(dy, dx) / TAU;
                let color = params.palette.sample_cyclic(fract(angle + turn));
                if !self.falloff || max_radius <= 0.0 {
                    return color;
                }
                let distance = libm::sqrtf(dx * dx + dy * dy);
                let dimming = (distance * FALLOFF_DEPTH / max_radius) as u8;
                scale_color(color, 255u8.saturating_sub(dimming).max(FALLOFF_FLOOR))
            });
        }
    }
}
