//! Immutable engine configuration.
//!
//! Configuration is validated at construction and passed explicitly to each
//! component; there is no ambient global state. Invalid values fail fast with
//! [`ConfigError`] rather than defaulting in a way that could disable
//! enforcement.

use super::{ConfigError, Priority};
use chrono::{DateTime, Days, FixedOffset, NaiveTime, TimeDelta, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Per-owner caps on simultaneously active tasks, by priority band.
///
/// Only `P1` and `P2` are capped; `P3`/`P4` activations are unconstrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WipLimits {
    p1_max_today: u32,
    p2_max_today: u32,
}

impl WipLimits {
    /// Creates validated WIP limits.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroWipLimit`] when either limit is zero.
    pub const fn new(p1_max_today: u32, p2_max_today: u32) -> Result<Self, ConfigError> {
        if p1_max_today == 0 {
            return Err(ConfigError::ZeroWipLimit { priority: "P1" });
        }
        if p2_max_today == 0 {
            return Err(ConfigError::ZeroWipLimit { priority: "P2" });
        }
        Ok(Self {
            p1_max_today,
            p2_max_today,
        })
    }

    /// Returns the maximum number of active `P1` tasks per owner.
    #[must_use]
    pub const fn p1_max_today(self) -> u32 {
        self.p1_max_today
    }

    /// Returns the maximum number of active `P2` tasks per owner.
    #[must_use]
    pub const fn p2_max_today(self) -> u32 {
        self.p2_max_today
    }

    /// Returns the cap for a priority band, or `None` when unconstrained.
    #[must_use]
    pub const fn limit_for(self, priority: Priority) -> Option<u32> {
        match priority {
            Priority::P1 => Some(self.p1_max_today),
            Priority::P2 => Some(self.p2_max_today),
            Priority::P3 | Priority::P4 => None,
        }
    }
}

impl Default for WipLimits {
    /// Default caps: 3 active `P1` and 5 active `P2` tasks per owner.
    fn default() -> Self {
        Self {
            p1_max_today: 3,
            p2_max_today: 5,
        }
    }
}

/// How long a queued task may age before the archiver retires it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionPolicy {
    max_queued_age_days: u32,
}

impl RetentionPolicy {
    /// Creates a validated retention policy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroRetention`] when the threshold is zero.
    pub const fn new(max_queued_age_days: u32) -> Result<Self, ConfigError> {
        if max_queued_age_days == 0 {
            return Err(ConfigError::ZeroRetention);
        }
        Ok(Self {
            max_queued_age_days,
        })
    }

    /// Returns the retention threshold in days.
    #[must_use]
    pub const fn max_queued_age_days(self) -> u32 {
        self.max_queued_age_days
    }

    /// Returns the archival cutoff for a run starting at `now`; queued tasks
    /// created strictly before the cutoff are stale.
    #[must_use]
    pub fn cutoff(self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_days(Days::new(u64::from(self.max_queued_age_days)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

impl Default for RetentionPolicy {
    /// Default retention: 90 days.
    fn default() -> Self {
        Self {
            max_queued_age_days: 90,
        }
    }
}

/// Serde adapter for [`FixedOffset`], represented as seconds east of UTC.
mod offset_seconds {
    use chrono::FixedOffset;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        offset: &FixedOffset,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        offset.local_minus_utc().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<FixedOffset, D::Error> {
        let secs = i32::deserialize(deserializer)?;
        FixedOffset::east_opt(secs)
            .ok_or_else(|| serde::de::Error::custom("UTC offset out of range"))
    }
}

/// Once-per-day trigger time for a batch job, in a fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSchedule {
    at: NaiveTime,
    #[serde(with = "offset_seconds")]
    offset: FixedOffset,
}

impl JobSchedule {
    /// Creates a schedule firing daily at `at` local wall time in `offset`.
    #[must_use]
    pub const fn new(at: NaiveTime, offset: FixedOffset) -> Self {
        Self { at, offset }
    }

    /// Returns the scheduled local wall time.
    #[must_use]
    pub const fn at(self) -> NaiveTime {
        self.at
    }

    /// Returns the fixed UTC offset the wall time is interpreted in.
    #[must_use]
    pub const fn offset(self) -> FixedOffset {
        self.offset
    }

    /// Returns the next trigger instant strictly after `now`.
    #[must_use]
    pub fn next_run_after(self, now: DateTime<Utc>) -> DateTime<Utc> {
        let offset_secs = i64::from(self.offset.local_minus_utc());
        let shift = TimeDelta::seconds(offset_secs);
        let local_now = (now + shift).naive_utc();

        let today = local_now.date();
        let mut candidate = today.and_time(self.at);
        if candidate <= local_now {
            let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(today);
            candidate = tomorrow.and_time(self.at);
        }

        Utc.from_utc_datetime(&(candidate - shift))
    }
}
