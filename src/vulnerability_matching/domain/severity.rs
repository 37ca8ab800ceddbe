use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// Vulnerability counts per severity for one artifact or one repository
///
/// Sums saturate at `u64::MAX` instead of overflowing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    #[serde(default)]
    pub critical: u64,
    #[serde(default)]
    pub high: u64,
    #[serde(default)]
    pub medium: u64,
    #[serde(default)]
    pub low: u64,
    #[serde(default)]
    pub unknown: u64,
}

impl SeverityCounts {
    pub fn new(critical: u64, high: u64, medium: u64, low: u64, unknown: u64) -> Self {
        Self {
            critical,
            high,
            medium,
            low,
            unknown,
        }
    }

    pub fn critical(count: u64) -> Self {
        Self {
            critical: count,
            ..Self::default()
        }
    }

    pub fn total(&self) -> u64 {
        [self.high, self.medium, self.low, self.unknown]
            .into_iter()
            .fold(self.critical, u64::saturating_add)
    }
}

impl Add for SeverityCounts {
    type Output = SeverityCounts;

    fn add(mut self, rhs: SeverityCounts) -> SeverityCounts {
        self += rhs;
        self
    }
}

impl AddAssign for SeverityCounts {
    fn add_assign(&mut self, rhs: SeverityCounts) {
        self.critical = self.critical.saturating_add(rhs.critical);
        self.high = self.high.saturating_add(rhs.high);
        self.medium = self.medium.saturating_add(rhs.medium);
        self.low = self.low.saturating_add(rhs.low);
        self.unknown = self.unknown.saturating_add(rhs.unknown);
    }
}

impl std::iter::Sum for SeverityCounts {
    fn sum<I: Iterator<Item = SeverityCounts>>(iter: I) -> Self {
        iter.fold(SeverityCounts::default(), Add::add)
    }
}

impl std::fmt::Display for SeverityCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "C:{}, H:{}, M:{}, L:{}, U:{}",
            self.critical, self.high, self.medium, self.low, self.unknown
        )
    }
}
