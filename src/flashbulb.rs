//! FlashBulb overlay
//!
//! A flashbulb event takes over a set of strips: full white for a short
//! hold, a linear fade to black, then a blend from black back to whatever
//! the patterns underneath are showing. Each phase is derived from the time
//! since the trigger, so nothing needs to happen between frames.
//!
//! Patterns keep rendering underneath during the last phase only; while
//! an event flashes or fades, its strips are claimed and patterns skip
//! them.

use embassy_time::{Duration, Instant};
use heapless::Vec;
use log::{info, warn};

use crate::{
    color::{BLACK, Rgb, WHITE, blend_colors},
    error::ConfigError,
    frame::FrameBuffer,
    math8::{elapsed_since, progress8},
    strip::{StripId, StripList, StripSet},
};

/// Maximum number of flashbulb events
pub const MAX_FLASHBULBS: usize = 5;

/// Phase durations of a flashbulb event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashBulbTimings {
    /// Full white
    pub hold: Duration,
    /// White to black
    pub fade_to_black: Duration,
    /// Black to the underlying pattern
    pub transition_back: Duration,
}

impl Default for FlashBulbTimings {
    fn default() -> Self {
        Self {
            hold: Duration::from_millis(100),
            fade_to_black: Duration::from_millis(5000),
            transition_back: Duration::from_millis(2000),
        }
    }
}

impl FlashBulbTimings {
    /// State of an event `elapsed` after its trigger
    pub fn state_at(&self, elapsed: Duration) -> FlashBulbState {
        if elapsed < self.hold {
            return FlashBulbState::Flash;
        }
        let elapsed = elapsed - self.hold;
        if elapsed < self.fade_to_black {
            return FlashBulbState::FadeToBlack(progress8(elapsed, self.fade_to_black));
        }
        let elapsed = elapsed - self.fade_to_black;
        if elapsed < self.transition_back {
            return FlashBulbState::TransitionBack(progress8(elapsed, self.transition_back));
        }
        FlashBulbState::Inactive
    }
}

/// Flashbulb event state, fading phases carry their progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashBulbState {
    Inactive,
    Flash,
    FadeToBlack(u8),
    TransitionBack(u8),
}

impl FlashBulbState {
    /// Whether patterns must leave the event's strips alone
    pub const fn claims(self) -> bool {
        matches!(self, Self::Flash | Self::FadeToBlack(_))
    }

    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Inactive)
    }

    /// Same phase, ignoring progress
    const fn same_phase(self, other: Self) -> bool {
        matches!(
            (self, other),
            (Self::Inactive, Self::Inactive)
                | (Self::Flash, Self::Flash)
                | (Self::FadeToBlack(_), Self::FadeToBlack(_))
                | (Self::TransitionBack(_), Self::TransitionBack(_))
        )
    }
}

/// Handle of a registered flashbulb event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashBulbId(u8);

impl FlashBulbId {
    pub const fn from_index(index: u8) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// One flashbulb event
pub struct FlashBulbEvent {
    targets: StripList,
    state: FlashBulbState,
    started_at: Instant,
    /// Registered explicitly, never reused for other strips
    pinned: bool,
}

impl FlashBulbEvent {
    fn new(targets: StripList, pinned: bool) -> Self {
        Self {
            targets,
            state: FlashBulbState::Inactive,
            started_at: Instant::from_ticks(0),
            pinned,
        }
    }

    pub fn targets(&self) -> &StripList {
        &self.targets
    }

    pub const fn state(&self) -> FlashBulbState {
        self.state
    }

    pub const fn started_at(&self) -> Instant {
        self.started_at
    }

    fn current_state(&self, timings: &FlashBulbTimings, now: Instant) -> FlashBulbState {
        if !self.state.is_active() {
            return FlashBulbState::Inactive;
        }
        timings.state_at(elapsed_since(now, self.started_at))
    }

    fn trigger(&mut self, now: Instant) {
        self.state = FlashBulbState::Flash;
        self.started_at = now;
    }

    fn render<const LEDS: usize>(
        &self,
        state: FlashBulbState,
        frame: &mut FrameBuffer<LEDS>,
        base: &[Rgb; LEDS],
    ) {
        match state {
            FlashBulbState::Flash => self.fill(frame, WHITE),
            FlashBulbState::FadeToBlack(progress) => {
                self.fill(frame, blend_colors(WHITE, BLACK, progress));
            }
            FlashBulbState::TransitionBack(progress) => self.restore(frame, base, progress),
            FlashBulbState::Inactive => self.restore(frame, base, 255),
        }
    }

    fn restore<const LEDS: usize>(
        &self,
        frame: &mut FrameBuffer<LEDS>,
        base: &[Rgb; LEDS],
        progress: u8,
    ) {
        for &strip in self.targets.as_slice() {
            restore_strip(frame, base, strip, progress);
        }
    }

    fn fill<const LEDS: usize>(&self, frame: &mut FrameBuffer<LEDS>, color: Rgb) {
        for &strip in self.targets.as_slice() {
            frame.fill_strip(strip, color);
        }
    }
}

/// All flashbulb events, rendered on top of the patterns
///
/// The overlay keeps one copy of the frame as the patterns last left it.
/// Every event blends back toward that copy, so an event never restores
/// output of its own or of another event.
pub struct FlashBulbOverlay<const LEDS: usize> {
    timings: FlashBulbTimings,
    events: Vec<FlashBulbEvent, MAX_FLASHBULBS>,
    /// Pattern colors at buffer positions
    base: [Rgb; LEDS],
    /// Strips an ad-hoc event let go of before finishing
    released: StripSet,
}

impl<const LEDS: usize> FlashBulbOverlay<LEDS> {
    pub const fn new(timings: FlashBulbTimings) -> Self {
        Self {
            timings,
            events: Vec::new(),
            base: [BLACK; LEDS],
            released: StripSet::EMPTY,
        }
    }

    pub const fn timings(&self) -> &FlashBulbTimings {
        &self.timings
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn event(&self, id: FlashBulbId) -> Option<&FlashBulbEvent> {
        self.events.get(id.index())
    }

    /// State of an event after its last render
    pub fn state(&self, id: FlashBulbId) -> Option<FlashBulbState> {
        self.event(id).map(FlashBulbEvent::state)
    }

    /// Whether any event is running
    pub fn is_active(&self) -> bool {
        self.events.iter().any(|event| event.state.is_active())
    }

    /// Forget the saved pattern colors
    pub fn clear_base(&mut self) {
        self.base = [BLACK; LEDS];
    }

    /// Register an event on a fixed strip set
    pub fn register(&mut self, targets: StripList) -> Result<FlashBulbId, ConfigError> {
        if targets.is_empty() {
            warn!("flashbulb: refusing to register an event without targets");
            return Err(ConfigError::NoTargets);
        }
        self.insert(FlashBulbEvent::new(targets, true))
    }

    fn insert(&mut self, event: FlashBulbEvent) -> Result<FlashBulbId, ConfigError> {
        #[allow(clippy::cast_possible_truncation)]
        let id = FlashBulbId(self.events.len() as u8);
        self.events.push(event).map_err(|_| {
            warn!("flashbulb: all {} events are registered", MAX_FLASHBULBS);
            ConfigError::FlashBulbsFull
        })?;
        Ok(id)
    }

    /// Trigger a registered event
    ///
    /// A running event restarts from the flash.
    pub fn trigger(
        &mut self,
        id: FlashBulbId,
        now: Instant,
        frame: &FrameBuffer<LEDS>,
    ) -> Result<(), ConfigError> {
        let targets = self
            .events
            .get(id.index())
            .ok_or(ConfigError::UnknownFlashBulb { id: id.index() })?
            .targets
            .set();
        if !has_known_strip(targets, frame) {
            warn!("flashbulb: event {} has no known strips, ignored", id.index());
            return Ok(());
        }
        self.capture(targets, frame);
        if let Some(event) = self.events.get_mut(id.index()) {
            event.trigger(now);
        }
        info!("flashbulb: event {} flash", id.index());
        Ok(())
    }

    /// Trigger a flash on an arbitrary strip set
    ///
    /// Retriggers an event on the same strips if there is one, otherwise
    /// reuses a finished ad-hoc event or adds a new one. When every slot is
    /// busy the ad-hoc event that started earliest is cut short. Returns
    /// `None` when nothing was triggered.
    pub fn trigger_strips(
        &mut self,
        targets: &StripList,
        now: Instant,
        frame: &FrameBuffer<LEDS>,
    ) -> Option<FlashBulbId> {
        let set = targets.set();
        if !has_known_strip(set, frame) {
            warn!("flashbulb: trigger without known strips ignored");
            return None;
        }
        let id = self
            .find(|event| event.targets.set() == set)
            .or_else(|| self.find(|event| !event.pinned && !event.state.is_active()))
            .or_else(|| self.insert(FlashBulbEvent::new(targets.clone(), false)).ok())
            .or_else(|| self.oldest_ad_hoc())?;

        let event = self.events.get_mut(id.index())?;
        if event.targets.set() != set {
            if event.state.is_active() {
                warn!("flashbulb: event {} cut short for a new trigger", id.index());
                self.released = self.released.union(event.targets.set().difference(set));
            }
            event.targets = targets.clone();
        }
        self.capture(set, frame);
        if let Some(event) = self.events.get_mut(id.index()) {
            event.trigger(now);
        }
        info!("flashbulb: event {} flash", id.index());
        Some(id)
    }

    /// Save strips no running event covers, their buffer content is
    /// still what the patterns left there
    fn capture(&mut self, strips: StripSet, frame: &FrameBuffer<LEDS>) {
        let covered = self.covered();
        for strip in strips.difference(covered).iter() {
            frame.copy_strip_into(strip, &mut self.base);
        }
    }

    /// Strips of every running event
    fn covered(&self) -> StripSet {
        self.events
            .iter()
            .filter(|event| event.state.is_active())
            .fold(StripSet::EMPTY, |strips, event| {
                strips.union(event.targets.set())
            })
    }

    #[allow(clippy::cast_possible_truncation)]
    fn find(&self, matches: impl Fn(&FlashBulbEvent) -> bool) -> Option<FlashBulbId> {
        self.events
            .iter()
            .position(matches)
            .map(|index| FlashBulbId(index as u8))
    }

    #[allow(clippy::cast_possible_truncation)]
    fn oldest_ad_hoc(&self) -> Option<FlashBulbId> {
        self.events
            .iter()
            .enumerate()
            .filter(|(_, event)| !event.pinned)
            .min_by_key(|(_, event)| event.started_at)
            .map(|(index, _)| FlashBulbId(index as u8))
    }

    /// Strips patterns must skip at `now`
    pub fn claimed(&self, now: Instant) -> StripSet {
        self.events
            .iter()
            .filter(|event| event.current_state(&self.timings, now).claims())
            .fold(StripSet::EMPTY, |strips, event| {
                strips.union(event.targets.set())
            })
    }

    /// Render every running event, in registration order
    ///
    /// Must run after the patterns have rendered the frame. `painted` is
    /// the set of strips the patterns wrote this frame.
    pub fn render(&mut self, now: Instant, frame: &mut FrameBuffer<LEDS>, painted: StripSet) {
        for strip in painted.iter() {
            frame.copy_strip_into(strip, &mut self.base);
        }

        let orphaned = self.released.difference(self.covered());
        for strip in orphaned.difference(painted).iter() {
            restore_strip(frame, &self.base, strip, 255);
        }
        self.released = StripSet::EMPTY;

        for (index, event) in self.events.iter_mut().enumerate() {
            if !event.state.is_active() {
                continue;
            }
            let state = event.current_state(&self.timings, now);
            if !state.same_phase(event.state) {
                log_phase(index, state);
            }
            event.render(state, frame, &self.base);
            event.state = state;
        }
    }
}

/// Blend a strip from black toward its saved pattern colors
fn restore_strip<const LEDS: usize>(
    frame: &mut FrameBuffer<LEDS>,
    base: &[Rgb; LEDS],
    strip: StripId,
    progress: u8,
) {
    let Some(region) = frame.resolve(strip) else {
        return;
    };
    frame.update_strip(strip, |index, _| {
        let color = region.led_index(index).map_or(BLACK, |led| base[led]);
        blend_colors(BLACK, color, progress)
    });
}

fn has_known_strip<const LEDS: usize>(targets: StripSet, frame: &FrameBuffer<LEDS>) -> bool {
    targets.iter().any(|strip| frame.strip_len(strip) > 0)
}

fn log_phase(index: usize, state: FlashBulbState) {
    match state {
        FlashBulbState::Flash => info!("flashbulb: event {} flash", index),
        FlashBulbState::FadeToBlack(_) => info!("flashbulb: event {} fade to black", index),
        FlashBulbState::TransitionBack(_) => info!("flashbulb: event {} transition back", index),
        FlashBulbState::Inactive => info!("flashbulb: event {} complete", index),
    }
}
