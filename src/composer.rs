//! Composer - the per-frame orchestrator
//!
//! Owns the frame buffer, the pattern queue and the flashbulb overlay, and
//! runs them in a fixed order every frame: triggers are drained, patterns
//! render, then the overlay renders on top.

use embassy_time::{Duration, Instant};
use log::warn;

use crate::{
    color::Rgb,
    error::ConfigError,
    flashbulb::{FlashBulbId, FlashBulbOverlay, FlashBulbTimings},
    frame::FrameBuffer,
    scheduler::{PatternSpec, Scheduler},
    strip::{StripId, StripList},
    topology::TopologyConfig,
    trigger::{FlashTrigger, TriggerReceiver},
};

/// Configuration for the composer
#[derive(Debug, Clone, Copy)]
pub struct ComposerConfig<'a> {
    pub topology: TopologyConfig<'a>,
    pub flashbulb: FlashBulbTimings,
    /// Restart the program loop after this long
    pub loop_duration: Option<Duration>,
    /// Start the program loop on the first frame
    pub autostart: bool,
}

impl<'a> ComposerConfig<'a> {
    /// Default timings, no loop, autostart
    pub fn new(topology: TopologyConfig<'a>) -> Self {
        Self {
            topology,
            flashbulb: FlashBulbTimings::default(),
            loop_duration: None,
            autostart: true,
        }
    }
}

/// Frame composer for `LEDS` physical LEDs fed by a trigger queue of `SIZE`
pub struct Composer<'a, const LEDS: usize, const SIZE: usize> {
    triggers: Option<TriggerReceiver<'a, SIZE>>,
    frame: FrameBuffer<LEDS>,
    scheduler: Scheduler,
    overlay: FlashBulbOverlay<LEDS>,
}

impl<'a, const LEDS: usize, const SIZE: usize> Composer<'a, LEDS, SIZE> {
    /// Create a composer without a trigger queue
    pub fn new(config: &ComposerConfig<'_>) -> Self {
        Self {
            triggers: None,
            frame: FrameBuffer::new(&config.topology),
            scheduler: Scheduler::new(config.loop_duration, config.autostart),
            overlay: FlashBulbOverlay::new(config.flashbulb),
        }
    }

    /// Create a composer that drains `triggers` every frame
    pub fn with_triggers(config: &ComposerConfig<'_>, triggers: TriggerReceiver<'a, SIZE>) -> Self {
        let mut composer = Self::new(config);
        composer.triggers = Some(triggers);
        composer
    }

    /// Queue a pattern, returns its index
    pub fn add_pattern(&mut self, spec: PatternSpec) -> Result<usize, ConfigError> {
        self.scheduler.push(spec)
    }

    /// Register a flashbulb event on a fixed strip set
    pub fn add_flashbulb(&mut self, targets: StripList) -> Result<FlashBulbId, ConfigError> {
        self.overlay.register(targets)
    }

    /// Trigger a registered flashbulb event
    pub fn trigger_flashbulb(&mut self, id: FlashBulbId, now: Instant) -> Result<(), ConfigError> {
        self.overlay.trigger(id, now, &self.frame)
    }

    /// Flash an arbitrary strip set
    pub fn trigger_strips(&mut self, targets: &StripList, now: Instant) -> Option<FlashBulbId> {
        self.overlay.trigger_strips(targets, now, &self.frame)
    }

    pub fn start(&mut self, now: Instant) {
        self.scheduler.start(now);
    }

    pub fn stop(&mut self, now: Instant) {
        self.scheduler.stop(now);
    }

    pub fn stop_pattern(&mut self, index: usize, now: Instant) -> Result<(), ConfigError> {
        self.scheduler.stop_pattern(index, now)
    }

    /// Remove every pattern and blank the buffer
    pub fn clear(&mut self) {
        self.scheduler.clear();
        self.overlay.clear_base();
        self.frame.clear();
    }

    /// Render one frame, returns whether anything was written
    ///
    /// `now` is the only clock every component sees during the frame.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.frame.begin_frame();
        self.process_triggers(now);

        let claimed = self.overlay.claimed(now);
        self.scheduler.tick(now, &mut self.frame, claimed);
        let painted = self.frame.written();
        self.overlay.render(now, &mut self.frame, painted);

        self.frame.is_dirty()
    }

    fn process_triggers(&mut self, now: Instant) {
        let Some(triggers) = self.triggers else {
            return;
        };
        for trigger in triggers.drain() {
            match trigger {
                FlashTrigger::Registered(id) => {
                    if let Err(err) = self.overlay.trigger(id, now, &self.frame) {
                        warn!("composer: trigger dropped: {}", err);
                    }
                }
                FlashTrigger::Strips(targets) => {
                    self.overlay.trigger_strips(&targets, now, &self.frame);
                }
            }
        }
    }

    pub fn frame(&self) -> &FrameBuffer<LEDS> {
        &self.frame
    }

    /// Color of logical LED `index` of a strip
    pub fn led(&self, strip: StripId, index: usize) -> Option<Rgb> {
        self.frame.get(strip, index)
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    pub fn overlay(&self) -> &FlashBulbOverlay<LEDS> {
        &self.overlay
    }
}
