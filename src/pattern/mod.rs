//! Pattern system with compile-time known pattern variants
//!
//! All patterns are stored in an enum to avoid heap allocations.
//! Each pattern implements the `Pattern` trait and is a pure function of
//! its targets, palette, speed, time and a pattern-local cursor.

mod breathing;
mod chase;
mod pinwheel;
mod rainbow;
mod single_chase;
mod solid;
mod warp;

pub use breathing::BreathingPattern;
pub use chase::ColorChasePattern;
pub use pinwheel::{PinwheelLayout, PinwheelPattern, PlacementAxis, StripPlacement};
pub use rainbow::{HorizontalRainbowPattern, RainbowPattern};
pub use single_chase::SingleChasePattern;
pub use solid::SolidPattern;
pub use warp::WarpPattern;

use embassy_time::{Duration, Instant};

use crate::{canvas::Canvas, color::Palette, speed::Speed, strip::StripList};

const PATTERN_NAME_SOLID: &str = "solid";
const PATTERN_NAME_COLOR_CHASE: &str = "color_chase";
const PATTERN_NAME_SINGLE_CHASE: &str = "single_chase";
const PATTERN_NAME_RAINBOW: &str = "rainbow";
const PATTERN_NAME_RAINBOW_HORIZONTAL: &str = "rainbow_horizontal";
const PATTERN_NAME_BREATHING: &str = "breathing";
const PATTERN_NAME_PINWHEEL: &str = "pinwheel";
const PATTERN_NAME_WARP: &str = "warp";

const PATTERN_ID_SOLID: u8 = 0;
const PATTERN_ID_COLOR_CHASE: u8 = 1;
const PATTERN_ID_SINGLE_CHASE: u8 = 2;
const PATTERN_ID_RAINBOW: u8 = 3;
const PATTERN_ID_RAINBOW_HORIZONTAL: u8 = 4;
const PATTERN_ID_BREATHING: u8 = 5;
const PATTERN_ID_PINWHEEL: u8 = 6;
const PATTERN_ID_WARP: u8 = 7;

/// Inputs shared by every renderer for one frame
#[derive(Debug, Clone, Copy)]
pub struct RenderParams<'a> {
    /// Strips the pattern runs on, in order
    pub targets: &'a StripList,
    pub palette: &'a Palette,
    pub speed: Speed,
    /// Frame time
    pub now: Instant,
    /// Time since the pattern was activated
    pub elapsed: Duration,
}

pub trait Pattern {
    /// Minimum time between two recomputes
    ///
    /// Between recomputes the buffer is left untouched.
    fn interval(&self, speed: Speed, _elapsed: Duration) -> Duration {
        speed.period()
    }

    /// Render one recompute and advance the cursor
    fn render<const LEDS: usize>(
        &self,
        params: &RenderParams<'_>,
        cursor: &mut u32,
        canvas: &mut Canvas<'_, LEDS>,
    );
}

/// Pattern kind together with its parameters
#[derive(Debug, Clone)]
pub enum PatternKind {
    /// First palette color on every LED
    Solid(SolidPattern),
    /// Palette band sweeping along all targets as one ribbon
    ColorChase(ColorChasePattern),
    /// Short window travelling through the targets one strip at a time
    SingleChase(SingleChasePattern),
    /// Hue sweep along each strip
    Rainbow(RainbowPattern),
    /// One hue per strip, sweeping across strips
    RainbowHorizontal(HorizontalRainbowPattern),
    /// Sine brightness envelope over a drifting palette color
    Breathing(BreathingPattern),
    /// Palette sampled by angle around a shared center
    Pinwheel(PinwheelPattern),
    /// Palette shown on one strip at a time, accelerating
    Warp(WarpPattern),
}

/// Known pattern ids that can be requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum PatternId {
    Solid = PATTERN_ID_SOLID,
    ColorChase = PATTERN_ID_COLOR_CHASE,
    SingleChase = PATTERN_ID_SINGLE_CHASE,
    Rainbow = PATTERN_ID_RAINBOW,
    RainbowHorizontal = PATTERN_ID_RAINBOW_HORIZONTAL,
    Breathing = PATTERN_ID_BREATHING,
    Pinwheel = PATTERN_ID_PINWHEEL,
    Warp = PATTERN_ID_WARP,
}

impl PatternId {
    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            PATTERN_ID_SOLID => Self::Solid,
            PATTERN_ID_COLOR_CHASE => Self::ColorChase,
            PATTERN_ID_SINGLE_CHASE => Self::SingleChase,
            PATTERN_ID_RAINBOW => Self::Rainbow,
            PATTERN_ID_RAINBOW_HORIZONTAL => Self::RainbowHorizontal,
            PATTERN_ID_BREATHING => Self::Breathing,
            PATTERN_ID_PINWHEEL => Self::Pinwheel,
            PATTERN_ID_WARP => Self::Warp,
            _ => return None,
        })
    }

    /// Pattern with default parameters
    pub fn to_kind(self) -> PatternKind {
        match self {
            Self::Solid => PatternKind::Solid(SolidPattern),
            Self::ColorChase => PatternKind::ColorChase(ColorChasePattern::default()),
            Self::SingleChase => PatternKind::SingleChase(SingleChasePattern::default()),
            Self::Rainbow => PatternKind::Rainbow(RainbowPattern),
            Self::RainbowHorizontal => PatternKind::RainbowHorizontal(HorizontalRainbowPattern),
            Self::Breathing => PatternKind::Breathing(BreathingPattern::default()),
            Self::Pinwheel => PatternKind::Pinwheel(PinwheelPattern::default()),
            Self::Warp => PatternKind::Warp(WarpPattern::default()),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Solid => PATTERN_NAME_SOLID,
            Self::ColorChase => PATTERN_NAME_COLOR_CHASE,
            Self::SingleChase => PATTERN_NAME_SINGLE_CHASE,
            Self::Rainbow => PATTERN_NAME_RAINBOW,
            Self::RainbowHorizontal => PATTERN_NAME_RAINBOW_HORIZONTAL,
            Self::Breathing => PATTERN_NAME_BREATHING,
            Self::Pinwheel => PATTERN_NAME_PINWHEEL,
            Self::Warp => PATTERN_NAME_WARP,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            PATTERN_NAME_SOLID => Some(Self::Solid),
            PATTERN_NAME_COLOR_CHASE => Some(Self::ColorChase),
            PATTERN_NAME_SINGLE_CHASE => Some(Self::SingleChase),
            PATTERN_NAME_RAINBOW => Some(Self::Rainbow),
            PATTERN_NAME_RAINBOW_HORIZONTAL => Some(Self::RainbowHorizontal),
            PATTERN_NAME_BREATHING => Some(Self::Breathing),
            PATTERN_NAME_PINWHEEL => Some(Self::Pinwheel),
            PATTERN_NAME_WARP => Some(Self::Warp),
            _ => None,
        }
    }
}

impl PatternKind {
    /// Get the pattern ID for external observation
    pub const fn id(&self) -> PatternId {
        match self {
            Self::Solid(_) => PatternId::Solid,
            Self::ColorChase(_) => PatternId::ColorChase,
            Self::SingleChase(_) => PatternId::SingleChase,
            Self::Rainbow(_) => PatternId::Rainbow,
            Self::RainbowHorizontal(_) => PatternId::RainbowHorizontal,
            Self::Breathing(_) => PatternId::Breathing,
            Self::Pinwheel(_) => PatternId::Pinwheel,
            Self::Warp(_) => PatternId::Warp,
        }
    }

    /// Minimum time between two recomputes
    pub fn interval(&self, speed: Speed, elapsed: Duration) -> Duration {
        match self {
            Self::Solid(pattern) => pattern.interval(speed, elapsed),
            Self::ColorChase(pattern) => pattern.interval(speed, elapsed),
            Self::SingleChase(pattern) => pattern.interval(speed, elapsed),
            Self::Rainbow(pattern) => pattern.interval(speed, elapsed),
            Self::RainbowHorizontal(pattern) => pattern.interval(speed, elapsed),
            Self::Breathing(pattern) => pattern.interval(speed, elapsed),
            Self::Pinwheel(pattern) => pattern.interval(speed, elapsed),
            Self::Warp(pattern) => pattern.interval(speed, elapsed),
        }
    }

    /// Render the pattern
    pub fn render<const LEDS: usize>(
        &self,
        params: &RenderParams<'_>,
        cursor: &mut u32,
        canvas: &mut Canvas<'_, LEDS>,
    ) {
        match self {
            Self::Solid(pattern) => pattern.render(params, cursor, canvas),
            Self::ColorChase(pattern) => pattern.render(params, cursor, canvas),
            Self::SingleChase(pattern) => pattern.render(params, cursor, canvas),
            Self::Rainbow(pattern) => pattern.render(params, cursor, canvas),
            Self::RainbowHorizontal(pattern) => pattern.render(params, cursor, canvas),
            Self::Breathing(pattern) => pattern.render(params, cursor, canvas),
            Self::Pinwheel(pattern) => pattern.render(params, cursor, canvas),
            Self::Warp(pattern) => pattern.render(params, cursor, canvas),
        }
    }
}
