//! Write access to the frame buffer for one pattern during one frame.
//!
//! The canvas owns the two rules every renderer must follow: strips the
//! pattern does not hold (or that a flashbulb has claimed) are left
//! untouched, and transition blending is applied to every written LED.

use heapless::Vec;
use log::warn;

use crate::{
    color::Rgb,
    frame::FrameBuffer,
    strip::{StripId, StripSet},
    transition::Blend,
};

/// Strip groups that can fade out at their own pace
pub const MAX_FADE_GROUPS: usize = 8;

pub struct Canvas<'a, const LEDS: usize> {
    frame: &'a mut FrameBuffer<LEDS>,
    writable: StripSet,
    blend: Blend,
    fade_outs: Vec<(StripSet, Blend), MAX_FADE_GROUPS>,
}

impl<'a, const LEDS: usize> Canvas<'a, LEDS> {
    /// Canvas writing to `writable` strips without blending
    pub fn new(frame: &'a mut FrameBuffer<LEDS>, writable: StripSet) -> Self {
        Self {
            frame,
            writable,
            blend: Blend::Replace,
            fade_outs: Vec::new(),
        }
    }

    /// Blend every write with `blend`
    #[must_use]
    pub fn with_blend(mut self, blend: Blend) -> Self {
        self.blend = blend;
        self
    }

    /// Use `blend` instead on the given strips
    ///
    /// Can be repeated for groups fading at different progress. Groups
    /// past [`MAX_FADE_GROUPS`] keep the main blend.
    #[must_use]
    pub fn with_fade_out(mut self, strips: StripSet, blend: Blend) -> Self {
        if self.fade_outs.push((strips, blend)).is_err() {
            warn!("canvas: too many fade groups, strips {:?} not faded", strips);
        }
        self
    }

    /// Whether writes to the strip reach the buffer
    pub const fn is_writable(&self, strip: StripId) -> bool {
        self.writable.contains(strip)
    }

    /// Length of a strip, whether writable or not
    ///
    /// Unknown strips have length zero.
    pub fn strip_len(&self, strip: StripId) -> usize {
        self.frame.strip_len(strip)
    }

    /// Compute every LED of a strip
    ///
    /// The closure receives the logical LED index and the color currently
    /// in the buffer, and returns the pattern color. Blending is applied
    /// on top.
    pub fn paint(&mut self, strip: StripId, mut color_at: impl FnMut(usize, Rgb) -> Rgb) {
        if !self.is_writable(strip) {
            return;
        }
        let blend = self
            .fade_outs
            .iter()
            .find(|(strips, _)| strips.contains(strip))
            .map_or(self.blend, |&(_, blend)| blend);
        self.frame.update_strip(strip, |index, existing| {
            blend.apply(existing, color_at(index, existing))
        });
    }

    /// Fill a strip with one color
    pub fn fill(&mut self, strip: StripId, color: Rgb) {
        self.paint(strip, |_, _| color);
    }
}
