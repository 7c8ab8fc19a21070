//! Shared frame buffer
//!
//! One color per physical LED, outputs stored back to back. All LED access
//! goes through the topology, so a bad strip id can never reach memory it
//! does not own.

use heapless::Vec;

use crate::{
    color::{BLACK, Rgb},
    strip::{StripId, StripSet},
    topology::{MAX_OUTPUTS, StripRegion, StripTopology, TopologyConfig},
};

/// Frame buffer for `LEDS` physical LEDs
pub struct FrameBuffer<const LEDS: usize> {
    topology: StripTopology,
    leds: [Rgb; LEDS],
    /// Strips written since the last [`FrameBuffer::begin_frame`]
    written: StripSet,
}

impl<const LEDS: usize> FrameBuffer<LEDS> {
    /// Create a black frame buffer for the given wiring
    pub fn new(config: &TopologyConfig<'_>) -> Self {
        Self::with_topology(StripTopology::new(config, LEDS))
    }

    /// Create a black frame buffer from an already validated topology
    ///
    /// The topology must have been built for at most `LEDS` LEDs; strips
    /// that still do not fit are treated as missing.
    pub fn with_topology(topology: StripTopology) -> Self {
        Self {
            topology,
            leds: [BLACK; LEDS],
            written: StripSet::EMPTY,
        }
    }

    pub fn topology(&self) -> &StripTopology {
        &self.topology
    }

    /// Resolve a strip, rejecting regions outside the buffer
    #[inline]
    pub fn resolve(&self, strip: StripId) -> Option<StripRegion> {
        self.topology
            .resolve(strip)
            .filter(|region| region.start + region.len <= LEDS)
    }

    /// Number of LEDs on a strip, zero for unknown strips
    pub fn strip_len(&self, strip: StripId) -> usize {
        self.resolve(strip).map_or(0, |region| region.len)
    }

    /// Read logical LED `index` of a strip
    pub fn get(&self, strip: StripId, index: usize) -> Option<Rgb> {
        let led = self.resolve(strip)?.led_index(index)?;
        Some(self.leds[led])
    }

    /// Mutable access to logical LED `index` of a strip
    ///
    /// Reversed strips are addressed from their far end. Out-of-range
    /// strips or indices give `None`.
    pub fn led_at(&mut self, strip: StripId, index: usize) -> Option<&mut Rgb> {
        let led = self.resolve(strip)?.led_index(index)?;
        self.written.insert(strip);
        Some(&mut self.leds[led])
    }

    /// Fill a whole strip with one color
    pub fn fill_strip(&mut self, strip: StripId, color: Rgb) {
        let Some(region) = self.resolve(strip) else {
            return;
        };
        self.leds[region.range()].fill(color);
        self.written.insert(strip);
    }

    /// Rewrite every LED of a strip in logical order
    ///
    /// The closure receives the logical index and the current color.
    pub fn update_strip(&mut self, strip: StripId, mut update: impl FnMut(usize, Rgb) -> Rgb) {
        let Some(region) = self.resolve(strip) else {
            return;
        };
        for index in 0..region.len {
            if let Some(led) = region.led_index(index) {
                self.leds[led] = update(index, self.leds[led]);
            }
        }
        self.written.insert(strip);
    }

    /// Copy the raw LEDs of a strip into `snapshot` at the same positions
    pub(crate) fn copy_strip_into(&self, strip: StripId, snapshot: &mut [Rgb; LEDS]) {
        if let Some(region) = self.resolve(strip) {
            snapshot[region.range()].copy_from_slice(&self.leds[region.range()]);
        }
    }

    /// Start a new frame: forget which strips were written
    pub fn begin_frame(&mut self) {
        self.written = StripSet::EMPTY;
    }

    /// Strips written since the frame started
    pub const fn written(&self) -> StripSet {
        self.written
    }

    /// Whether anything was written since the frame started
    pub const fn is_dirty(&self) -> bool {
        !self.written.is_empty()
    }

    /// Paint every LED black
    pub fn clear(&mut self) {
        self.leds.fill(BLACK);
        #[allow(clippy::cast_possible_truncation)]
        let strips = 0..self.topology.strip_count() as StripId;
        self.written = strips.collect();
    }

    /// Raw LED memory, outputs back to back
    pub fn leds(&self) -> &[Rgb] {
        &self.leds
    }

    /// LED slices of every physical output, in output order
    pub fn outputs(&self) -> Vec<&[Rgb], MAX_OUTPUTS> {
        self.topology
            .outputs()
            .iter()
            .map(|output| {
                self.leds
                    .get(output.start..output.start + output.len)
                    .unwrap_or(&[])
            })
            .collect()
    }
}
