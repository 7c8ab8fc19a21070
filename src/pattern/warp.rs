//! Warp pattern
//!
//! One target strip at a time shows the palette spread along its length,
//! every other target is dark. The lit strip hops through the target list,
//! starting slowly and reaching full speed after a warm-up.

use embassy_time::Duration;

use super::{Pattern, RenderParams};
use crate::{
    canvas::Canvas,
    color::{BLACK, WHITE, fade_to_black_by},
    speed::Speed,
};

/// Initial speed during warm-up, in permille of nominal
const WARM_UP_FLOOR_PERMILLE: u64 = 100;
/// Fade applied each hop to the strip that was just lit
const PREVIOUS_STRIP_FADE: u8 = 200;

#[derive(Debug, Clone, Default)]
pub struct WarpPattern {
    warm_up: Duration,
    fade_previous: bool,
}

impl WarpPattern {
    pub fn new(warm_up: Duration, fade_previous: bool) -> Self {
        Self {
            warm_up,
            fade_previous,
        }
    }

    /// Fraction of nominal speed reached after `elapsed`, in permille
    fn speed_permille(&self, elapsed: Duration) -> u64 {
        let warm_up = self.warm_up.as_millis();
        if warm_up == 0 || elapsed.as_millis() >= warm_up {
            return 1000;
        }
        (elapsed.as_millis() * 1000 / warm_up).max(WARM_UP_FLOOR_PERMILLE)
    }
}

impl Pattern for WarpPattern {
    fn interval(&self, speed: Speed, elapsed: Duration) -> Duration {
        let period = speed.period().as_millis();
        Duration::from_millis(period * 1000 / self.speed_permille(elapsed))
    }

    #[allow(clippy::cast_possible_truncation)]
    fn render<const LEDS: usize>(
        &self,
        params: &RenderParams<'_>,
        cursor: &mut u32,
        canvas: &mut Canvas<'_, LEDS>,
    ) {
        let count = params.targets.len();
        if count == 0 {
            return;
        }
        let lit = *cursor as usize % count;
        let previous = (lit + count - 1) % count;
        let colors = params.palette.colors();

        for (position, &strip) in params.targets.as_slice().iter().enumerate() {
            if position == lit {
                let len = canvas.strip_len(strip);
                canvas.paint(strip, |index, _| {
                    if colors.is_empty() {
                        return WHITE;
                    }
                    let slot = (index * colors.len() / len).min(colors.len() - 1);
                    colors[slot]
                });
            } else if self.fade_previous && position == previous && count > 1 {
                canvas.paint(strip, |_, existing| {
                    fade_to_black_by(existing, PREVIOUS_STRIP_FADE)
                });
            } else {
                canvas.fill(strip, BLACK);
            }
        }

        *cursor = ((lit + 1) % count) as u32;
    }
}
