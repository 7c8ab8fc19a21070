//! Color palettes used as interpolation endpoints by every pattern.

use heapless::Vec;
use log::warn;

use crate::{
    color::{Rgb, blend_colors, hue_color},
    error::ConfigError,
    math8::fract,
};

/// Maximum number of colors a palette can hold
pub const MAX_PALETTE_SIZE: usize = 16;

/// Ordered list of colors
///
/// An empty palette is valid and means "full spectrum": sampling it
/// sweeps the hue circle instead of reading colors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgb, MAX_PALETTE_SIZE>,
}

impl Palette {
    /// Create an empty (full spectrum) palette
    pub const fn new() -> Self {
        Self { colors: Vec::new() }
    }

    /// Create a palette from a list of colors
    ///
    /// Fails if there are more than [`MAX_PALETTE_SIZE`] colors.
    pub fn from_colors(colors: &[Rgb]) -> Result<Self, ConfigError> {
        let colors = Vec::from_slice(colors).map_err(|()| ConfigError::PaletteOverflow {
            len: colors.len(),
        })?;
        Ok(Self { colors })
    }

    /// Create a palette, dropping colors past the capacity
    pub fn truncated(colors: &[Rgb]) -> Self {
        if colors.len() > MAX_PALETTE_SIZE {
            warn!(
                "palette: {} colors given, keeping the first {}",
                colors.len(),
                MAX_PALETTE_SIZE
            );
        }
        let mut palette = Self::new();
        for color in colors.iter().take(MAX_PALETTE_SIZE) {
            let _ = palette.colors.push(*color);
        }
        palette
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// First color of the palette, if any
    pub fn first(&self) -> Option<Rgb> {
        self.colors.first().copied()
    }

    /// Sample the palette at `position` in `[0, 1]`
    ///
    /// Position 0 is the first color, position 1 the last one; values in
    /// between blend the two adjacent entries linearly. An empty palette
    /// returns the hue at `position` on the color wheel.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn interpolate(&self, position: f32) -> Rgb {
        let position = if position.is_nan() {
            0.0
        } else {
            position.clamp(0.0, 1.0)
        };

        match self.colors.len() {
            0 => hue_color((position * 255.0) as u8),
            1 => self.colors[0],
            len => {
                let last = len - 1;
                let scaled = position * last as f32;
                let index = libm::floorf(scaled) as usize;
                if index >= last {
                    return self.colors[last];
                }
                let amount = ((scaled - index as f32) * 255.0) as u8;
                blend_colors(self.colors[index], self.colors[index + 1], amount)
            }
        }
    }

    /// Sample the palette as a closed loop
    ///
    /// Unlike [`Palette::interpolate`] the last color blends back into the
    /// first one, so a position sweeping past 1 never produces a seam.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn sample_cyclic(&self, position: f32) -> Rgb {
        let position = if position.is_finite() {
            fract(position)
        } else {
            0.0
        };

        match self.colors.len() {
            0 => hue_color((position * 256.0) as u8),
            1 => self.colors[0],
            len => {
                let scaled = position * len as f32;
                let index = (libm::floorf(scaled) as usize).min(len - 1);
                let next = (index + 1) % len;
                let amount = ((scaled - index as f32) * 255.0) as u8;
                blend_colors(self.colors[index], self.colors[next], amount)
            }
        }
    }
}
