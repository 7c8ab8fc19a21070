use core::fmt;

use crate::StripId;

/// Setup-time configuration problems.
///
/// None of these are fatal: the composer logs them and drops or clamps the
/// offending entry, so the frame loop keeps running with whatever is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Strip id is not below the strip capacity
    StripOutOfRange { strip: usize },
    /// Strip refers to an output that does not exist
    OutputOutOfRange { strip: StripId, output: u8 },
    /// Strip does not fit inside its output
    StripExceedsOutput { strip: StripId },
    /// Strip shares LEDs with another strip on the same output
    StripOverlap { strip: StripId, other: StripId },
    /// Total LED count of the outputs is larger than the frame buffer
    BufferTooSmall { required: usize, available: usize },
    /// More outputs than the topology can describe
    TooManyOutputs { len: usize },
    /// Palette has more colors than it can hold
    PaletteOverflow { len: usize },
    /// Target list has more strips than it can hold
    TargetOverflow { len: usize },
    /// Strip listed twice in the same target list
    DuplicateTarget { strip: StripId },
    /// Target list without a single usable strip
    NoTargets,
    /// Pattern queue is at capacity
    QueueFull,
    /// Flashbulb table is at capacity
    FlashBulbsFull,
    /// Sensor table is at capacity
    SensorsFull,
    /// No pattern at the given queue index
    UnknownPattern { index: usize },
    /// No flashbulb registered under the given id
    UnknownFlashBulb { id: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StripOutOfRange { strip } => write!(f, "strip {strip} is out of range"),
            Self::OutputOutOfRange { strip, output } => {
                write!(f, "strip {strip} refers to missing output {output}")
            }
            Self::StripExceedsOutput { strip } => {
                write!(f, "strip {strip} does not fit its output")
            }
            Self::StripOverlap { strip, other } => {
                write!(f, "strip {strip} overlaps strip {other}")
            }
            Self::BufferTooSmall {
                required,
                available,
            } => write!(
                f,
                "outputs need {required} LEDs, frame buffer holds {available}"
            ),
            Self::TooManyOutputs { len } => write!(f, "{len} outputs exceed the output capacity"),
            Self::PaletteOverflow { len } => write!(f, "{len} colors exceed the palette capacity"),
            Self::TargetOverflow { len } => write!(f, "{len} strips exceed the target capacity"),
            Self::DuplicateTarget { strip } => write!(f, "strip {strip} is targeted twice"),
            Self::NoTargets => write!(f, "no usable target strips"),
            Self::QueueFull => write!(f, "pattern queue is full"),
            Self::FlashBulbsFull => write!(f, "flashbulb table is full"),
            Self::SensorsFull => write!(f, "sensor table is full"),
            Self::UnknownPattern { index } => write!(f, "no pattern at index {index}"),
            Self::UnknownFlashBulb { id } => write!(f, "no flashbulb with id {id}"),
        }
    }
}
