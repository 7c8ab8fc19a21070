//! Cross-fade coefficients for patterns that start or are superseded.

use embassy_time::Duration;

use crate::{
    color::{Rgb, blend_colors, fade_to_black_by},
    math8::progress8,
};

/// How a freshly computed color is combined with the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blend {
    /// Write the computed color as is
    Replace,
    /// Pattern is entering: `lerp(existing, computed, progress)`
    FadeIn(u8),
    /// Pattern is exiting: computed color dimmed by `progress`
    FadeOut(u8),
}

impl Blend {
    /// Fade-in blend for a transition that has run for `elapsed`
    ///
    /// A zero duration is complete on the first frame.
    pub const fn fade_in(elapsed: Duration, duration: Duration) -> Self {
        match progress8(elapsed, duration) {
            255 => Self::Replace,
            progress => Self::FadeIn(progress),
        }
    }

    /// Fade-out blend for a transition that has run for `elapsed`
    pub const fn fade_out(elapsed: Duration, duration: Duration) -> Self {
        Self::FadeOut(progress8(elapsed, duration))
    }

    /// Combine `computed` with the color already in the buffer
    #[inline]
    pub fn apply(self, existing: Rgb, computed: Rgb) -> Rgb {
        match self {
            Self::Replace => computed,
            Self::FadeIn(progress) => blend_colors(existing, computed, progress),
            Self::FadeOut(progress) => fade_to_black_by(computed, progress),
        }
    }
}
