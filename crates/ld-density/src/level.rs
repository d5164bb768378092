use core::fmt;

use serde::{Deserialize, Serialize};

/// Number of per-lane reference counts a sample is compared against.
pub const LANE_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrafficLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl TrafficLevel {
    pub const ALL: [TrafficLevel; 4] = [Self::Low, Self::Medium, Self::High, Self::VeryHigh];

    /// Level for the number of reference counts met.
    pub fn from_hits(hits: usize) -> Self {
        match hits {
            4.. => Self::VeryHigh,
            3 => Self::High,
            2 => Self::Medium,
            _ => Self::Low,
        }
    }

    /// Counts how many of the first [`LANE_COUNT`] references `sample`
    /// reaches. Absent references count as `0`.
    pub fn classify(sample: usize, references: &[usize]) -> Self {
        let hits = (0..LANE_COUNT)
            .filter(|&i| sample >= references.get(i).copied().unwrap_or(0))
            .count();
        Self::from_hits(hits)
    }
}

impl fmt::Display for TrafficLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrafficLevel::Low => "low",
            TrafficLevel::Medium => "medium",
            TrafficLevel::High => "high",
            TrafficLevel::VeryHigh => "very high",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelTiming {
    pub label: String,
    pub green_time_seconds: u32,
}

impl LevelTiming {
    fn new(label: &str, green_time_seconds: u32) -> Self {
        Self {
            label: label.to_owned(),
            green_time_seconds,
        }
    }
}

/// Green-light time per traffic level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeAllocation {
    pub low: LevelTiming,
    pub medium: LevelTiming,
    pub high: LevelTiming,
    pub very_high: LevelTiming,
}

impl Default for TimeAllocation {
    fn default() -> Self {
        Self {
            low: LevelTiming::new("Low Traffic", 15),
            medium: LevelTiming::new("Medium Traffic", 30),
            high: LevelTiming::new("High Traffic", 45),
            very_high: LevelTiming::new("Very High Traffic", 60),
        }
    }
}

impl TimeAllocation {
    pub fn timing(&self, level: TrafficLevel) -> &LevelTiming {
        match level {
            TrafficLevel::Low => &self.low,
            TrafficLevel::Medium => &self.medium,
            TrafficLevel::High => &self.high,
            TrafficLevel::VeryHigh => &self.very_high,
        }
    }
}

/// Outcome of comparing one lane sample against its references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    pub sample_pixels: usize,
    pub references: Vec<usize>,
    pub level: TrafficLevel,
    pub label: String,
    pub green_time_seconds: u32,
}

pub fn assess(sample_pixels: usize, references: &[usize], table: &TimeAllocation) -> Assessment {
    if references.len() > LANE_COUNT {
        log::warn!(
            "{} reference counts given, only the first {LANE_COUNT} are used",
            references.len()
        );
    }

    let level = TrafficLevel::classify(sample_pixels, references);
    let timing = table.timing(level);
    log::info!(
        "{sample_pixels} edge pixels: {level} traffic, {} s green",
        timing.green_time_seconds
    );

    Assessment {
        sample_pixels,
        references: references.to_vec(),
        level,
        label: timing.label.clone(),
        green_time_seconds: timing.green_time_seconds,
    }
}
