//! Strip identifiers and the two ways of grouping them: ordered target
//! lists and unordered bit sets.

use heapless::Vec;
use log::warn;

use crate::error::ConfigError;

/// Logical strip identifier
pub type StripId = u8;

/// Maximum number of logical strips (and of strips in one target list)
pub const MAX_STRIPS: usize = 22;

const _: () = assert!(MAX_STRIPS <= u32::BITS as usize);

/// Unordered set of strips, one bit per strip id
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StripSet(u32);

impl StripSet {
    pub const EMPTY: Self = Self(0);

    pub const fn contains(self, strip: StripId) -> bool {
        (strip as usize) < MAX_STRIPS && self.0 & (1 << strip) != 0
    }

    pub const fn with(self, strip: StripId) -> Self {
        if (strip as usize) < MAX_STRIPS {
            Self(self.0 | (1 << strip))
        } else {
            self
        }
    }

    pub fn insert(&mut self, strip: StripId) {
        *self = self.with(strip);
    }

    pub fn remove(&mut self, strip: StripId) {
        if (strip as usize) < MAX_STRIPS {
            self.0 &= !(1 << strip);
        }
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate strip ids in ascending order
    #[allow(clippy::cast_possible_truncation)]
    pub fn iter(self) -> impl Iterator<Item = StripId> {
        (0..MAX_STRIPS as StripId).filter(move |strip| self.contains(*strip))
    }
}

impl FromIterator<StripId> for StripSet {
    fn from_iter<I: IntoIterator<Item = StripId>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

/// Ordered list of unique, in-range strip ids
///
/// Order matters: chases run along the list and warp steps through it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StripList {
    strips: Vec<StripId, MAX_STRIPS>,
    set: StripSet,
}

impl StripList {
    pub const fn new() -> Self {
        Self {
            strips: Vec::new(),
            set: StripSet::EMPTY,
        }
    }

    /// Build a list, rejecting anything invalid
    pub fn from_slice(strips: &[StripId]) -> Result<Self, ConfigError> {
        if strips.len() > MAX_STRIPS {
            return Err(ConfigError::TargetOverflow { len: strips.len() });
        }
        let mut list = Self::new();
        for &strip in strips {
            list.try_push(strip)?;
        }
        Ok(list)
    }

    /// Build a list, dropping invalid and duplicate entries with a warning
    pub fn sanitized(strips: &[StripId]) -> Self {
        let mut list = Self::new();
        for &strip in strips {
            if let Err(err) = list.try_push(strip) {
                warn!("targets: dropping strip {}: {}", strip, err);
            }
        }
        list
    }

    fn try_push(&mut self, strip: StripId) -> Result<(), ConfigError> {
        if strip as usize >= MAX_STRIPS {
            return Err(ConfigError::StripOutOfRange {
                strip: strip as usize,
            });
        }
        if self.set.contains(strip) {
            return Err(ConfigError::DuplicateTarget { strip });
        }
        self.strips
            .push(strip)
            .map_err(|_| ConfigError::TargetOverflow {
                len: self.strips.len() + 1,
            })?;
        self.set.insert(strip);
        Ok(())
    }

    pub fn as_slice(&self) -> &[StripId] {
        &self.strips
    }

    pub fn len(&self) -> usize {
        self.strips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strips.is_empty()
    }

    /// The same strips as an unordered set
    pub const fn set(&self) -> StripSet {
        self.set
    }

    pub fn contains(&self, strip: StripId) -> bool {
        self.set.contains(strip)
    }
}
