//! Traffic density from edge maps.
//!
//! The density proxy is simply the number of strong edge pixels. A lane's
//! level is decided by how many of the four per-lane reference counts the
//! sample meets or exceeds:
//!
//! | hits | level      |
//! |------|------------|
//! | 4    | very high  |
//! | 3    | high       |
//! | 2    | medium     |
//! | 0-1  | low        |
//!
//! Missing reference counts are treated as `0`, so they are always met.

mod count;
mod level;

pub use count::{count_value, density_ratio, strong_pixels};
pub use level::{Assessment, LANE_COUNT, LevelTiming, TimeAllocation, TrafficLevel, assess};
