//! Density classification and the department join.
//!
//! A department's yearly case count is looked up by normalized name and
//! mapped onto a fixed color ramp. Departments without a count for the
//! selected year get [`StyleResult::UNMATCHED`].

mod legend;
mod style;

pub use legend::{LegendEntry, LEGEND, LEGEND_TITLE};
pub use style::{Rgb, StyleResult};

use crate::data::CaseTable;
use crate::error::LoadError;
use std::fmt;
use std::str::FromStr;

/// Canonical join key: surrounding whitespace removed, upper case.
pub fn normalize(name: &str) -> String {
    name.trim().to_uppercase()
}

/// A year the dataset is expected to carry
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Year(u16);

impl Year {
    pub const COUNT: usize = 6;

    pub const SUPPORTED: [Year; Self::COUNT] = [
        Year(2019),
        Year(2020),
        Year(2021),
        Year(2022),
        Year(2023),
        Year(2024),
    ];

    pub fn new(year: u16) -> Option<Self> {
        Self::SUPPORTED.iter().copied().find(|y| y.0 == year)
    }

    pub fn first() -> Self {
        Self::SUPPORTED[0]
    }

    pub fn get(self) -> u16 {
        self.0
    }

    /// Position in [`Year::SUPPORTED`]
    pub fn index(self) -> usize {
        Self::SUPPORTED
            .iter()
            .position(|y| *y == self)
            .unwrap_or(0)
    }

    /// Next supported year, wrapping around
    pub fn next(self) -> Self {
        Self::SUPPORTED[(self.index() + 1) % Self::SUPPORTED.len()]
    }

    /// Previous supported year, wrapping around
    pub fn prev(self) -> Self {
        let len = Self::SUPPORTED.len();
        Self::SUPPORTED[(self.index() + len - 1) % len]
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Year {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u16>()
            .ok()
            .and_then(Year::new)
            .ok_or_else(|| LoadError::UnsupportedYear(s.trim().to_string()))
    }
}

/// One step of the color ramp: counts strictly above `above` get `color`
#[derive(Clone, Copy, Debug)]
pub struct Tier {
    pub above: u64,
    pub color: Rgb,
}

/// Ordered threshold ramp, evaluated from the highest bound down
#[derive(Clone, Copy, Debug)]
pub struct ThresholdTable {
    tiers: &'static [Tier],
    floor: Rgb,
}

/// Case-count ramp used by the map.
///
/// Tiers must stay sorted by descending `above`.
pub const DENSITY_TIERS: ThresholdTable = ThresholdTable {
    tiers: &[
        Tier { above: 1500, color: Rgb::hex(0xFF0000) },
        Tier { above: 1000, color: Rgb::hex(0xFF5900) },
        Tier { above: 500, color: Rgb::hex(0xFF8F00) },
        Tier { above: 300, color: Rgb::hex(0xFFB600) },
        Tier { above: 100, color: Rgb::hex(0xFFE400) },
    ],
    floor: Rgb::hex(0xFFF9C1),
};

impl ThresholdTable {
    /// Index of the tier `density` falls into; `tiers().len()` means the floor.
    pub fn tier_index(&self, density: u64) -> usize {
        self.tiers
            .iter()
            .position(|t| density > t.above)
            .unwrap_or(self.tiers.len())
    }

    pub fn color_for(&self, density: u64) -> Rgb {
        self.tiers
            .get(self.tier_index(density))
            .map_or(self.floor, |t| t.color)
    }

    pub fn tiers(&self) -> &'static [Tier] {
        self.tiers
    }

    pub fn floor(&self) -> Rgb {
        self.floor
    }
}

impl Default for ThresholdTable {
    fn default() -> Self {
        DENSITY_TIERS
    }
}

/// Style for an optional case count
pub fn style_for(density: Option<u64>, thresholds: &ThresholdTable) -> StyleResult {
    match density {
        Some(d) => StyleResult::matched(thresholds.color_for(d)),
        None => StyleResult::UNMATCHED,
    }
}

/// Join `department` against the case table and classify its count for `year`
pub fn classify(
    cases: &CaseTable,
    thresholds: &ThresholdTable,
    department: &str,
    year: Year,
) -> StyleResult {
    style_for(cases.lookup(department, year), thresholds)
}
