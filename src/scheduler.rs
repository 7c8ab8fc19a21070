//! Pattern queue and lifecycle
//!
//! The scheduler owns every queued pattern and advances it through
//! `Pending → Entering → Active → Exiting` once per frame. Patterns are
//! activated when their delay since the loop start elapses; a pattern that
//! activates on strips another live pattern holds takes those strips over,
//! and the older pattern fades out on them only.

use embassy_time::{Duration, Instant};
use heapless::Vec;
use log::{debug, info, warn};

use crate::{
    canvas::{Canvas, MAX_FADE_GROUPS},
    color::{BLACK, Palette},
    error::ConfigError,
    frame::FrameBuffer,
    math8::{elapsed_since, progress8},
    pattern::{PatternKind, RenderParams},
    speed::Speed,
    strip::{StripList, StripSet},
    transition::Blend,
};

/// Maximum number of patterns in the queue
pub const MAX_QUEUED_PATTERNS: usize = 10;

/// A pattern together with where, when and how it runs
#[derive(Debug, Clone)]
pub struct PatternSpec {
    pub kind: PatternKind,
    pub palette: Palette,
    pub targets: StripList,
    pub speed: Speed,
    /// Delay after the loop start before the pattern activates
    pub activation_delay: Duration,
    /// Length of the fade in, and of the fade out when superseded
    pub transition: Duration,
}

impl PatternSpec {
    /// Pattern starting immediately, without transition, at default speed
    pub fn new(kind: PatternKind, targets: StripList) -> Self {
        Self {
            kind,
            palette: Palette::new(),
            targets,
            speed: Speed::default(),
            activation_delay: Duration::from_millis(0),
            transition: Duration::from_millis(0),
        }
    }

    #[must_use]
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    #[must_use]
    pub fn with_speed(mut self, speed: Speed) -> Self {
        self.speed = speed;
        self
    }

    #[must_use]
    pub fn with_activation_delay(mut self, delay: Duration) -> Self {
        self.activation_delay = delay;
        self
    }

    #[must_use]
    pub fn with_transition(mut self, transition: Duration) -> Self {
        self.transition = transition;
        self
    }
}

/// Lifecycle phase of a queued pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for activation, or finished
    Pending,
    /// Fading in over the buffer contents
    Entering,
    /// Rendering at full strength
    Active,
    /// Fading out on the strips it is handing over
    Exiting,
}

impl Phase {
    /// Whether the pattern renders in this phase
    pub const fn is_live(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Strips a pattern started handing over at the same time
#[derive(Debug, Clone, Copy)]
struct Exit {
    strips: StripSet,
    started_at: Instant,
}

#[derive(Debug)]
struct ScheduledPattern {
    spec: PatternSpec,
    phase: Phase,
    phase_start: Instant,
    activated_at: Instant,
    cursor: u32,
    last_update: Option<Instant>,
    /// Strips the pattern currently renders on
    owned: StripSet,
    /// Owned strips the pattern is fading out of, each group on its own clock
    exits: Vec<Exit, MAX_FADE_GROUPS>,
    activated_this_loop: bool,
}

impl ScheduledPattern {
    fn new(spec: PatternSpec) -> Self {
        Self {
            spec,
            phase: Phase::Pending,
            phase_start: Instant::from_ticks(0),
            activated_at: Instant::from_ticks(0),
            cursor: 0,
            last_update: None,
            owned: StripSet::EMPTY,
            exits: Vec::new(),
            activated_this_loop: false,
        }
    }

    fn enter(&mut self, now: Instant) {
        if !self.phase.is_live() {
            self.cursor = 0;
        }
        self.phase = Phase::Entering;
        self.phase_start = now;
        self.activated_at = now;
        self.last_update = None;
        self.owned = self.spec.targets.set();
        self.exits.clear();
        self.activated_this_loop = true;
    }

    /// Strips the pattern is fading out of
    fn yielding(&self) -> StripSet {
        self.exits
            .iter()
            .fold(StripSet::EMPTY, |strips, exit| strips.union(exit.strips))
    }

    /// Start fading out of `strips`, returns whether any were held
    ///
    /// Strips already fading keep their own start time.
    fn yield_strips(&mut self, strips: StripSet, now: Instant) -> bool {
        let overlap = self.owned.intersection(strips).difference(self.yielding());
        if overlap.is_empty() {
            return false;
        }
        self.phase = Phase::Exiting;
        let full = self.exits.is_full();
        if let Some(last) = self.exits.last_mut()
            && (last.started_at == now || full)
        {
            last.strips = last.strips.union(overlap);
            return true;
        }
        let exit = Exit {
            strips: overlap,
            started_at: now,
        };
        // Capacity was checked above
        let _ = self.exits.push(exit);
        true
    }

    /// Progress of the current phase transition
    fn transition_progress(&self, now: Instant) -> u8 {
        progress8(elapsed_since(now, self.phase_start), self.spec.transition)
    }

    /// Blend of the strips the pattern is not fading out of
    ///
    /// Measured from the activation, so a hand-over that starts while the
    /// pattern is still entering does not cut its fade in short.
    fn blend(&self, now: Instant) -> Blend {
        Blend::fade_in(elapsed_since(now, self.activated_at), self.spec.transition)
    }

    /// Drop exit groups whose fade is over and return their strips
    fn finish_exits(&mut self, now: Instant) -> StripSet {
        let transition = self.spec.transition;
        let mut done = StripSet::EMPTY;
        self.exits.retain(|exit| {
            let finished = progress8(elapsed_since(now, exit.started_at), transition) == 255;
            if finished {
                done = done.union(exit.strips);
            }
            !finished
        });
        self.owned = self.owned.difference(done);
        done
    }
}

/// Pattern queue
pub struct Scheduler {
    patterns: Vec<ScheduledPattern, MAX_QUEUED_PATTERNS>,
    loop_duration: Option<Duration>,
    loop_start: Option<Instant>,
    running: bool,
    autostart: bool,
}

impl Scheduler {
    /// Create an empty queue
    ///
    /// With `autostart` the loop starts on the first tick. With a
    /// `loop_duration` activation delays are re-armed every time it elapses.
    pub const fn new(loop_duration: Option<Duration>, autostart: bool) -> Self {
        Self {
            patterns: Vec::new(),
            loop_duration,
            loop_start: None,
            running: false,
            autostart,
        }
    }

    /// Append a pattern to the queue and return its index
    pub fn push(&mut self, spec: PatternSpec) -> Result<usize, ConfigError> {
        if spec.targets.is_empty() {
            warn!("scheduler: pattern {} has no targets", spec.kind.id().as_str());
            return Err(ConfigError::NoTargets);
        }
        let index = self.patterns.len();
        self.patterns
            .push(ScheduledPattern::new(spec))
            .map_err(|_| {
                warn!("scheduler: queue is full, pattern dropped");
                ConfigError::QueueFull
            })?;
        Ok(index)
    }

    /// Start (or restart) the program loop
    pub fn start(&mut self, now: Instant) {
        info!("scheduler: starting {} patterns", self.patterns.len());
        self.running = true;
        self.rearm(now);
    }

    /// Stop activating patterns and fade every live pattern out
    pub fn stop(&mut self, now: Instant) {
        info!("scheduler: stopping");
        self.running = false;
        for pattern in &mut self.patterns {
            let owned = pattern.owned;
            pattern.yield_strips(owned, now);
        }
    }

    /// Fade one pattern out of all its strips
    pub fn stop_pattern(&mut self, index: usize, now: Instant) -> Result<(), ConfigError> {
        let pattern = self
            .patterns
            .get_mut(index)
            .ok_or(ConfigError::UnknownPattern { index })?;
        let owned = pattern.owned;
        if pattern.yield_strips(owned, now) {
            debug!("scheduler: pattern {} exiting", index);
        }
        Ok(())
    }

    /// Remove every pattern
    ///
    /// The buffer is left as is. With autostart the loop restarts on the
    /// next tick.
    pub fn clear(&mut self) {
        self.patterns.clear();
        self.running = false;
        self.loop_start = None;
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub const fn is_running(&self) -> bool {
        self.running
    }

    pub fn phase(&self, index: usize) -> Option<Phase> {
        self.patterns.get(index).map(|pattern| pattern.phase)
    }

    pub fn pattern(&self, index: usize) -> Option<&PatternSpec> {
        self.patterns.get(index).map(|pattern| &pattern.spec)
    }

    /// Strips a pattern currently renders on
    pub fn strips(&self, index: usize) -> Option<StripSet> {
        self.patterns.get(index).map(|pattern| pattern.owned)
    }

    /// Strips held by any live pattern
    pub fn live_strips(&self) -> StripSet {
        self.patterns
            .iter()
            .filter(|pattern| pattern.phase.is_live())
            .fold(StripSet::EMPTY, |strips, pattern| strips.union(pattern.owned))
    }

    /// Advance every pattern and render the ones that are due
    ///
    /// Strips in `claimed` are not written.
    pub fn tick<const LEDS: usize>(
        &mut self,
        now: Instant,
        frame: &mut FrameBuffer<LEDS>,
        claimed: StripSet,
    ) {
        if self.autostart && self.loop_start.is_none() {
            self.start(now);
        }
        self.restart_loop_if_due(now);
        self.activate_due(now);
        self.finish_transitions(now, frame, claimed);
        self.render(now, frame, claimed);
    }

    fn rearm(&mut self, now: Instant) {
        self.loop_start = Some(now);
        for pattern in &mut self.patterns {
            pattern.activated_this_loop = false;
        }
    }

    fn restart_loop_if_due(&mut self, now: Instant) {
        let (Some(start), Some(duration)) = (self.loop_start, self.loop_duration) else {
            return;
        };
        if !self.running || elapsed_since(now, start) < duration {
            return;
        }
        info!("scheduler: loop restarted");
        self.rearm(now);
    }

    fn activate_due(&mut self, now: Instant) {
        let Some(start) = self.loop_start else {
            return;
        };
        if !self.running {
            return;
        }
        let elapsed = elapsed_since(now, start);
        for index in 0..self.patterns.len() {
            let pattern = &self.patterns[index];
            if pattern.activated_this_loop || elapsed < pattern.spec.activation_delay {
                continue;
            }
            self.activate(index, now);
        }
    }

    fn activate(&mut self, index: usize, now: Instant) {
        let targets = self.patterns[index].spec.targets.set();
        for (other, pattern) in self.patterns.iter_mut().enumerate() {
            if other == index || !pattern.phase.is_live() {
                continue;
            }
            if pattern.yield_strips(targets, now) {
                debug!("scheduler: pattern {} yields to pattern {}", other, index);
            }
        }
        self.patterns[index].enter(now);
        debug!("scheduler: pattern {} entering", index);
    }

    fn finish_transitions<const LEDS: usize>(
        &mut self,
        now: Instant,
        frame: &mut FrameBuffer<LEDS>,
        claimed: StripSet,
    ) {
        let mut released = StripSet::EMPTY;
        for (index, pattern) in self.patterns.iter_mut().enumerate() {
            match pattern.phase {
                Phase::Entering if pattern.transition_progress(now) == 255 => {
                    pattern.phase = Phase::Active;
                    pattern.phase_start = now;
                    debug!("scheduler: pattern {} active", index);
                }
                Phase::Exiting => {
                    let done = pattern.finish_exits(now);
                    if done.is_empty() {
                        continue;
                    }
                    released = released.union(done);
                    if pattern.owned.is_empty() {
                        pattern.phase = Phase::Pending;
                        pattern.exits.clear();
                        debug!("scheduler: pattern {} stopped", index);
                    } else if pattern.exits.is_empty() {
                        pattern.phase = Phase::Active;
                        pattern.phase_start = now;
                        debug!("scheduler: pattern {} active on remaining strips", index);
                    } else {
                        debug!("scheduler: pattern {} handed over strips {:?}", index, done);
                    }
                }
                Phase::Pending | Phase::Entering | Phase::Active => {}
            }
        }

        let orphaned = released
            .difference(self.live_strips())
            .difference(claimed);
        for strip in orphaned.iter() {
            frame.fill_strip(strip, BLACK);
        }
    }

    /// Live patterns, oldest activation first
    fn render_order(&self) -> Vec<usize, MAX_QUEUED_PATTERNS> {
        let mut order: Vec<usize, MAX_QUEUED_PATTERNS> = (0..self.patterns.len())
            .filter(|&index| self.patterns[index].phase.is_live())
            .collect();
        order.sort_unstable_by_key(|&index| (self.patterns[index].activated_at, index));
        order
    }

    fn render<const LEDS: usize>(
        &mut self,
        now: Instant,
        frame: &mut FrameBuffer<LEDS>,
        claimed: StripSet,
    ) {
        for index in self.render_order() {
            let pattern = &mut self.patterns[index];
            let elapsed = elapsed_since(now, pattern.activated_at);
            let interval = pattern.spec.kind.interval(pattern.spec.speed, elapsed);
            if let Some(last) = pattern.last_update
                && elapsed_since(now, last) < interval
            {
                continue;
            }
            pattern.last_update = Some(now);

            let writable = pattern.owned.difference(claimed);
            let mut canvas = Canvas::new(frame, writable).with_blend(pattern.blend(now));
            for exit in &pattern.exits {
                let elapsed = elapsed_since(now, exit.started_at);
                canvas = canvas.with_fade_out(
                    exit.strips,
                    Blend::fade_out(elapsed, pattern.spec.transition),
                );
            }
            let params = RenderParams {
                targets: &pattern.spec.targets,
                palette: &pattern.spec.palette,
                speed: pattern.spec.speed,
                now,
                elapsed,
            };
            pattern.spec.kind.render(&params, &mut pattern.cursor, &mut canvas);
        }
    }
}
