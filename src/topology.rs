//! Strip topology: the single source of truth for where each logical
//! strip lives in LED memory.
//!
//! Every physical output is a contiguous run of the frame buffer, outputs
//! are laid out back to back in declaration order. A strip is a window
//! into its output, optionally wired in reverse.

use heapless::Vec;
use log::warn;

use crate::{
    error::ConfigError,
    strip::{MAX_STRIPS, StripId},
};

/// Maximum number of physical outputs
pub const MAX_OUTPUTS: usize = 8;

/// Placement of one logical strip on a physical output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripConfig {
    /// Index of the physical output driving this strip
    pub output: u8,
    /// First LED of the strip, relative to the start of the output
    pub offset: u16,
    /// Number of LEDs
    pub len: u16,
    /// LED 0 is wired at the far end
    pub reversed: bool,
}

/// Static wiring description supplied at startup
#[derive(Debug, Clone, Copy)]
pub struct TopologyConfig<'a> {
    /// LED count of each physical output
    pub outputs: &'a [u16],
    /// Strips, indexed by strip id
    pub strips: &'a [StripConfig],
}

/// Resolved location of a strip in the frame buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripRegion {
    pub output: usize,
    /// Absolute index of the first LED in the frame buffer
    pub start: usize,
    pub len: usize,
    pub reversed: bool,
}

impl StripRegion {
    /// Absolute buffer index of logical LED `index`
    ///
    /// Returns `None` past the end of the strip.
    #[inline]
    pub const fn led_index(self, index: usize) -> Option<usize> {
        if index >= self.len {
            return None;
        }
        let index = if self.reversed {
            self.len - 1 - index
        } else {
            index
        };
        Some(self.start + index)
    }

    /// Buffer range covered by the strip
    pub const fn range(self) -> core::ops::Range<usize> {
        self.start..self.start + self.len
    }
}

/// Output location in the frame buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputRegion {
    pub start: usize,
    pub len: usize,
}

/// Immutable strip table built once at startup
#[derive(Debug, Clone, Default)]
pub struct StripTopology {
    outputs: Vec<OutputRegion, MAX_OUTPUTS>,
    strips: Vec<Option<StripRegion>, MAX_STRIPS>,
}

impl StripTopology {
    /// Validate a wiring description against a frame buffer of `capacity`
    /// LEDs.
    ///
    /// Invalid entries are logged and dropped: outputs that do not fit the
    /// buffer, strips on missing outputs, strips that overflow their output
    /// or overlap an earlier strip. Dropped strips resolve to `None`, so
    /// patterns targeting them skip just that strip.
    pub fn new(config: &TopologyConfig<'_>, capacity: usize) -> Self {
        let mut topology = Self::default();

        if config.outputs.len() > MAX_OUTPUTS {
            warn!(
                "topology: {}",
                ConfigError::TooManyOutputs {
                    len: config.outputs.len()
                }
            );
        }
        let mut start = 0;
        for &len in config.outputs.iter().take(MAX_OUTPUTS) {
            let len = usize::from(len);
            let region = if start + len > capacity {
                warn!(
                    "topology: {}",
                    ConfigError::BufferTooSmall {
                        required: start + len,
                        available: capacity,
                    }
                );
                OutputRegion { start, len: 0 }
            } else {
                OutputRegion { start, len }
            };
            start += region.len;
            let _ = topology.outputs.push(region);
        }

        if config.strips.len() > MAX_STRIPS {
            warn!(
                "topology: {}",
                ConfigError::StripOutOfRange {
                    strip: config.strips.len() - 1
                }
            );
        }
        for (id, strip) in config.strips.iter().take(MAX_STRIPS).enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let id = id as StripId;
            let region = match topology.place(id, strip) {
                Ok(region) => Some(region),
                Err(err) => {
                    warn!("topology: dropping strip {}: {}", id, err);
                    None
                }
            };
            let _ = topology.strips.push(region);
        }

        topology
    }

    fn place(&self, id: StripId, strip: &StripConfig) -> Result<StripRegion, ConfigError> {
        let output = self
            .outputs
            .get(usize::from(strip.output))
            .ok_or(ConfigError::OutputOutOfRange {
                strip: id,
                output: strip.output,
            })?;
        let offset = usize::from(strip.offset);
        let len = usize::from(strip.len);
        if len == 0 || offset + len > output.len {
            return Err(ConfigError::StripExceedsOutput { strip: id });
        }

        let region = StripRegion {
            output: usize::from(strip.output),
            start: output.start + offset,
            len,
            reversed: strip.reversed,
        };
        for (other_id, other) in self.strips.iter().enumerate() {
            let Some(other) = other else {
                continue;
            };
            if other.start < region.start + region.len && region.start < other.start + other.len {
                #[allow(clippy::cast_possible_truncation)]
                let other = other_id as StripId;
                return Err(ConfigError::StripOverlap { strip: id, other });
            }
        }

        Ok(region)
    }

    /// Resolve a strip to its buffer region
    ///
    /// Unknown or dropped strips resolve to `None`.
    #[inline]
    pub fn resolve(&self, strip: StripId) -> Option<StripRegion> {
        self.strips.get(usize::from(strip)).copied().flatten()
    }

    /// Number of LEDs on a strip, zero for unknown strips
    pub fn strip_len(&self, strip: StripId) -> usize {
        self.resolve(strip).map_or(0, |region| region.len)
    }

    /// Number of strip slots, including dropped ones
    pub fn strip_count(&self) -> usize {
        self.strips.len()
    }

    pub fn outputs(&self) -> &[OutputRegion] {
        &self.outputs
    }

    /// Total LEDs used by all outputs
    pub fn total_leds(&self) -> usize {
        self.outputs.iter().map(|output| output.len).sum()
    }
}
