#![no_std]

pub mod canvas;
pub mod color;
pub mod composer;
pub mod error;
pub mod flashbulb;
pub mod frame;
pub mod frame_scheduler;
pub mod installation;
#[cfg(feature = "esp32-log")]
pub mod logger;
pub mod math8;
pub mod pattern;
pub mod scheduler;
pub mod sensor;
pub mod speed;
pub mod strip;
pub mod topology;
pub mod transition;
pub mod trigger;

pub use canvas::Canvas;
pub use composer::{Composer, ComposerConfig};
pub use error::ConfigError;
pub use flashbulb::{FlashBulbId, FlashBulbOverlay, FlashBulbState, FlashBulbTimings, MAX_FLASHBULBS};
pub use frame::FrameBuffer;
pub use frame_scheduler::{FrameResult, FrameScheduler};
pub use pattern::{PatternId, PatternKind};
pub use scheduler::{MAX_QUEUED_PATTERNS, PatternSpec, Phase, Scheduler};
pub use sensor::{SensorMapping, SensorOutcome, SensorRouter};
pub use speed::Speed;
pub use strip::{MAX_STRIPS, StripId, StripList, StripSet};
pub use topology::{StripConfig, StripTopology, TopologyConfig};
pub use transition::Blend;
pub use trigger::{FlashTrigger, TriggerQueue, TriggerReceiver, TriggerSender};

pub use color::{Hsv, Palette, Rgb};
pub use embassy_time::{Duration, Instant};

/// Abstract LED driver trait
///
/// Implement this trait to support different hardware platforms.
/// The frame scheduler is generic over this trait.
pub trait OutputDriver {
    /// Push one frame to the hardware, one LED slice per physical output
    fn commit(&mut self, outputs: &[&[Rgb]]);
}
