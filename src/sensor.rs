//! Sensor adapter
//!
//! Maps sensor ids to the strips they light up and rate-limits every
//! sensor independently. A sensor that fires again within the debounce
//! interval is ignored.

use embassy_time::{Duration, Instant};
use heapless::Vec;
use log::{debug, warn};

use crate::{
    error::ConfigError,
    math8::elapsed_since,
    strip::{StripId, StripList},
    trigger::{FlashTrigger, TriggerSender},
};

/// Maximum number of sensors
pub const MAX_SENSORS: usize = 16;
/// Maximum number of strips a single sensor lights up
pub const MAX_SENSOR_STRIPS: usize = 4;
/// Minimum time between two triggers of the same sensor
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_secs(15);

/// Static description of one sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorMapping<'a> {
    pub sensor: u8,
    pub strips: &'a [StripId],
    pub enabled: bool,
}

/// What happened to a sensor event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorOutcome {
    /// A flashbulb trigger was queued
    Triggered,
    /// Ignored, the sensor may fire again after `remaining`
    Debounced { remaining: Duration },
    /// Sensor is unknown or disabled
    Unknown,
    /// Trigger queue was full, the event was dropped
    QueueFull,
}

#[derive(Debug)]
struct SensorEntry {
    sensor: u8,
    targets: StripList,
    enabled: bool,
    last_trigger: Option<Instant>,
}

/// Routes sensor events to flashbulb triggers
pub struct SensorRouter<'a, const SIZE: usize> {
    sender: TriggerSender<'a, SIZE>,
    sensors: Vec<SensorEntry, MAX_SENSORS>,
    debounce: Duration,
}

impl<'a, const SIZE: usize> SensorRouter<'a, SIZE> {
    /// Create a router posting into `sender`
    ///
    /// Mappings that are invalid or do not fit are logged and skipped.
    pub fn new(sender: TriggerSender<'a, SIZE>, mappings: &[SensorMapping<'_>]) -> Self {
        let mut router = Self {
            sender,
            sensors: Vec::new(),
            debounce: DEFAULT_DEBOUNCE,
        };
        for mapping in mappings {
            if let Err(err) = router.add(mapping) {
                warn!("sensor {}: skipped: {}", mapping.sensor, err);
            }
        }
        router
    }

    #[must_use]
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Add a sensor mapping
    pub fn add(&mut self, mapping: &SensorMapping<'_>) -> Result<(), ConfigError> {
        if mapping.strips.len() > MAX_SENSOR_STRIPS {
            return Err(ConfigError::TargetOverflow {
                len: mapping.strips.len(),
            });
        }
        let targets = StripList::from_slice(mapping.strips)?;
        if targets.is_empty() {
            return Err(ConfigError::NoTargets);
        }
        let entry = SensorEntry {
            sensor: mapping.sensor,
            targets,
            enabled: mapping.enabled,
            last_trigger: None,
        };
        match self.sensors.iter_mut().find(|e| e.sensor == mapping.sensor) {
            Some(existing) => *existing = entry,
            None => self
                .sensors
                .push(entry)
                .map_err(|_| ConfigError::SensorsFull)?,
        }
        Ok(())
    }

    /// Enable or disable a sensor, returns whether it exists
    pub fn set_enabled(&mut self, sensor: u8, enabled: bool) -> bool {
        self.entry_mut(sensor)
            .map(|entry| entry.enabled = enabled)
            .is_some()
    }

    /// Strips a sensor lights up
    pub fn targets(&self, sensor: u8) -> Option<&StripList> {
        self.sensors
            .iter()
            .find(|entry| entry.sensor == sensor)
            .map(|entry| &entry.targets)
    }

    /// Handle a sensor event at `now`
    pub fn handle(&mut self, sensor: u8, now: Instant) -> SensorOutcome {
        let debounce = self.debounce;
        let sender = self.sender;
        let Some(entry) = self.entry_mut(sensor).filter(|entry| entry.enabled) else {
            debug!("sensor {}: unknown or disabled", sensor);
            return SensorOutcome::Unknown;
        };

        if let Some(last) = entry.last_trigger {
            let elapsed = elapsed_since(now, last);
            if elapsed < debounce {
                let remaining = debounce - elapsed;
                debug!(
                    "sensor {}: debounced, {} ms remaining",
                    sensor,
                    remaining.as_millis()
                );
                return SensorOutcome::Debounced { remaining };
            }
        }

        if sender
            .try_send(FlashTrigger::Strips(entry.targets.clone()))
            .is_err()
        {
            warn!("sensor {}: trigger queue full, event dropped", sensor);
            return SensorOutcome::QueueFull;
        }
        entry.last_trigger = Some(now);
        SensorOutcome::Triggered
    }

    fn entry_mut(&mut self, sensor: u8) -> Option<&mut SensorEntry> {
        self.sensors.iter_mut().find(|entry| entry.sensor == sensor)
    }
}
