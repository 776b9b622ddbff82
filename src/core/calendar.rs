//! World clock and time-of-day buckets
//!
//! Spawn tables are keyed by a two-way DAY/NIGHT split of the hour.

use serde::{Deserialize, Serialize};

const MINUTES_PER_DAY: f64 = 24.0 * 60.0;

/// Time of day bucket used for species selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Day,   // 06:00-18:00
    Night, // 18:00-06:00
}

impl TimeOfDay {
    pub fn from_hour(hour: f32) -> Self {
        if (6.0..18.0).contains(&hour) {
            TimeOfDay::Day
        } else {
            TimeOfDay::Night
        }
    }
}

/// Clock measured in in-game minutes, advanced by simulation seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldClock {
    minutes: f64,
    minutes_per_second: f64,
}

impl WorldClock {
    pub fn new(start_hour: f32, minutes_per_second: f64) -> Self {
        Self {
            minutes: f64::from(start_hour) * 60.0,
            minutes_per_second,
        }
    }

    pub fn advance(&mut self, delta_seconds: f32) {
        self.minutes += f64::from(delta_seconds) * self.minutes_per_second;
    }

    pub fn set_hour(&mut self, hour: f32) {
        let day_start = (self.minutes / MINUTES_PER_DAY).floor() * MINUTES_PER_DAY;
        self.minutes = day_start + f64::from(hour) * 60.0;
    }

    pub fn minutes(&self) -> f64 {
        self.minutes
    }

    pub fn current_day(&self) -> u64 {
        (self.minutes / MINUTES_PER_DAY).floor().max(0.0) as u64
    }

    /// Hour of day in [0, 24)
    pub fn hour_of_day(&self) -> f32 {
        (self.minutes.rem_euclid(MINUTES_PER_DAY) / 60.0) as f32
    }

    pub fn time_of_day(&self) -> TimeOfDay {
        TimeOfDay::from_hour(self.hour_of_day())
    }
}

impl Default for WorldClock {
    fn default() -> Self {
        // One in-game day every 24 real minutes
        Self::new(8.0, 1.0)
    }
}
