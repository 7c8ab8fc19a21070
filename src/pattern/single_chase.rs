//! Single chase pattern
//!
//! A short bright window travels along one target strip at a time; every
//! other target is black. After the window leaves a strip (plus a gap the
//! size of the window) it enters the next strip in the list.

use super::{Pattern, RenderParams};
use crate::{
    canvas::Canvas,
    color::{BLACK, WHITE},
};

const DEFAULT_WINDOW_LEDS: u16 = 10;

#[derive(Debug, Clone)]
pub struct SingleChasePattern {
    window: u16,
}

impl Default for SingleChasePattern {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW_LEDS,
        }
    }
}

impl SingleChasePattern {
    /// Set the width of the lit window
    #[must_use]
    pub fn with_window(mut self, window: u16) -> Self {
        self.window = window.max(1);
        self
    }
}

impl Pattern for SingleChasePattern {
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    fn render<const LEDS: usize>(
        &self,
        params: &RenderParams<'_>,
        cursor: &mut u32,
        canvas: &mut Canvas<'_, LEDS>,
    ) {
        let window = usize::from(self.window);
        let stride = |len: usize| if len == 0 { 0 } else { len + window };
        let cycle: usize = params
            .targets
            .as_slice()
            .iter()
            .map(|&strip| stride(canvas.strip_len(strip)))
            .sum();
        if cycle == 0 {
            return;
        }

        let position = *cursor as usize % cycle;
        let mut strip_start = 0;
        for &strip in params.targets.as_slice() {
            let span = stride(canvas.strip_len(strip));
            let lit = (strip_start..strip_start + span).contains(&position);
            let head = position.wrapping_sub(strip_start);
            canvas.paint(strip, |index, _| {
                if !lit || index < head || index >= head + window {
                    return BLACK;
                }
                if params.palette.is_empty() {
                    WHITE
                } else {
                    let offset = (index - head) as f32 / window as f32;
                    params.palette.interpolate(offset)
                }
            });
            strip_start += span;
        }

        *cursor = ((position + 1) % cycle) as u32;
    }
}
