//! Frame scheduling and timing utilities.
//!
//! Provides portable frame pacing without async/await or platform-specific timers.
//! The caller is responsible for sleeping/waiting between frames.

use embassy_time::{Duration, Instant};

use crate::{Composer, OutputDriver};

/// Default target frame rate (90 FPS).
pub const DEFAULT_FPS: u32 = 90;

/// Default frame duration based on target FPS.
pub const DEFAULT_FRAME_DURATION: Duration = Duration::from_millis(1000 / DEFAULT_FPS as u64);

/// Result of a frame tick operation.
#[derive(Debug, Clone, Copy)]
pub struct FrameResult {
    /// The deadline for the next frame.
    pub next_deadline: Instant,
    /// How long to wait until the next frame (may be zero if behind schedule).
    pub sleep_duration: Duration,
    /// Whether the frame was pushed to the outputs.
    pub committed: bool,
}

/// Portable frame scheduler that manages timing without async.
///
/// Renders one composer frame per tick and pushes it to the output driver
/// only when something changed. Falling more than two frames behind
/// resets the schedule instead of rendering a catch-up burst.
///
/// # Usage
///
/// ```ignore
/// let mut scheduler = FrameScheduler::new(composer, driver);
///
/// loop {
///     let result = scheduler.tick(Instant::now());
///     sleep(result.sleep_duration);
/// }
/// ```
pub struct FrameScheduler<'a, O: OutputDriver, const LEDS: usize, const SIZE: usize> {
    output: O,
    composer: Composer<'a, LEDS, SIZE>,
    next_frame: Instant,
    frame_duration: Duration,
}

impl<'a, O: OutputDriver, const LEDS: usize, const SIZE: usize> FrameScheduler<'a, O, LEDS, SIZE> {
    /// Uses [`DEFAULT_FRAME_DURATION`] (90 FPS).
    pub fn new(composer: Composer<'a, LEDS, SIZE>, driver: O) -> Self {
        Self::with_frame_duration(composer, driver, DEFAULT_FRAME_DURATION)
    }

    pub fn with_frame_duration(
        composer: Composer<'a, LEDS, SIZE>,
        driver: O,
        frame_duration: Duration,
    ) -> Self {
        Self {
            output: driver,
            composer,
            next_frame: Instant::from_millis(0),
            frame_duration,
        }
    }

    /// Render one frame and return timing information.
    ///
    /// The caller is responsible for waiting until `next_deadline` before
    /// calling `tick` again.
    pub fn tick(&mut self, now: Instant) -> FrameResult {
        let max_drift = self.frame_duration.as_millis() * 2;
        if now.as_millis() > self.next_frame.as_millis() + max_drift {
            self.next_frame = now;
        }

        let committed = self.composer.tick(now);
        if committed {
            self.output.commit(&self.composer.frame().outputs());
        }

        self.next_frame += self.frame_duration;

        let sleep_duration = self
            .next_frame
            .checked_duration_since(now)
            .unwrap_or(Duration::from_millis(0));

        FrameResult {
            next_deadline: self.next_frame,
            sleep_duration,
            committed,
        }
    }

    pub fn composer(&self) -> &Composer<'a, LEDS, SIZE> {
        &self.composer
    }

    pub fn composer_mut(&mut self) -> &mut Composer<'a, LEDS, SIZE> {
        &mut self.composer
    }

    pub fn output(&self) -> &O {
        &self.output
    }
}
