//! Circulating supply of the stake asset.

use chrono::{DateTime, TimeZone, Utc};

/// Total supply, in raw units.
pub const TOTAL_SUPPLY: u128 = 420_690_000_000_000;
/// Share released at the vesting start, in percent.
pub const INITIAL_RELEASE_PERCENT: u128 = 75;
pub const VESTING_DURATION_DAYS: i64 = 1095;

const SECONDS_PER_DAY: i64 = 86_400;

/// A fixed initial release followed by linear per-day vesting of the rest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VestingSchedule {
    pub total_supply: u128,
    pub initial_percent: u128,
    pub start: DateTime<Utc>,
    pub duration_days: i64,
}

impl VestingSchedule {
    /// The stake asset's schedule: 75% at 2024-06-26, the rest over three years.
    pub fn protocol() -> Self {
        let start = Utc
            .with_ymd_and_hms(2024, 6, 26, 0, 0, 0)
            .single()
            .unwrap_or_default();
        Self {
            total_supply: TOTAL_SUPPLY,
            initial_percent: INITIAL_RELEASE_PERCENT,
            start,
            duration_days: VESTING_DURATION_DAYS,
        }
    }

    /// Released at the start; percentages above 100 release everything.
    pub fn initial_supply(&self) -> u128 {
        let percent = self.initial_percent.min(100);
        self.total_supply / 100 * percent + self.total_supply % 100 * percent / 100
    }

    /// Whole days since the start; partial days do not count.
    pub fn elapsed_days(&self, now: DateTime<Utc>) -> i64 {
        (now - self.start).num_seconds() / SECONDS_PER_DAY
    }

    pub fn circulating_at(&self, now: DateTime<Utc>) -> u128 {
        let initial = self.initial_supply();
        let elapsed = self.elapsed_days(now);
        if elapsed < 0 {
            return initial;
        }
        if self.duration_days <= 0 || elapsed >= self.duration_days {
            return self.total_supply;
        }
        let remaining = self.total_supply.saturating_sub(initial);
        initial + remaining * elapsed as u128 / self.duration_days as u128
    }
}

impl Default for VestingSchedule {
    fn default() -> Self {
        Self::protocol()
    }
}

/// Circulating supply of the stake asset right now.
pub fn circulating_supply() -> u128 {
    VestingSchedule::protocol().circulating_at(Utc::now())
}

pub fn total_supply() -> u128 {
    TOTAL_SUPPLY
}
