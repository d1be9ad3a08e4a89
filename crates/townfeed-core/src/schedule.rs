//! Run scheduling under fixed-local-time policies.
//!
//! Sources run at 06:00 local civil time. The civil zone is modelled as two
//! fixed UTC offsets plus an approximate daylight-saving window (second
//! Sunday of March up to, not including, the first Sunday of November)
//! rather than a full tz database.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc, Weekday};

use crate::scraper_config::ScraperConfig;

/// Local hour at which scheduled runs fire.
pub const RUN_HOUR_LOCAL: i64 = 6;

/// Rendered by [`format_countdown`] when the target is not in the future.
pub const DUE_MARKER: &str = "due";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CivilZone {
    /// Seconds east of UTC outside the DST window.
    pub standard_offset_secs: i32,
    /// Seconds east of UTC inside the DST window.
    pub dst_offset_secs: i32,
}

/// Mountain Time: UTC-7, UTC-6 during daylight saving.
pub const MOUNTAIN: CivilZone = CivilZone {
    standard_offset_secs: -7 * 3600,
    dst_offset_secs: -6 * 3600,
};

impl CivilZone {
    /// Whether a local calendar date falls inside the DST window.
    #[must_use]
    pub fn in_dst_window(date: NaiveDate) -> bool {
        let year = date.year();
        let start = NaiveDate::from_weekday_of_month_opt(year, 3, Weekday::Sun, 2);
        let end = NaiveDate::from_weekday_of_month_opt(year, 11, Weekday::Sun, 1);
        match (start, end) {
            (Some(start), Some(end)) => date >= start && date < end,
            _ => false,
        }
    }

    /// Classifies `instant` by its standard-time local date.
    #[must_use]
    pub fn is_dst(&self, instant: DateTime<Utc>) -> bool {
        let local = instant.naive_utc() + TimeDelta::seconds(i64::from(self.standard_offset_secs));
        Self::in_dst_window(local.date())
    }

    #[must_use]
    pub fn offset_at(&self, instant: DateTime<Utc>) -> TimeDelta {
        let secs = if self.is_dst(instant) {
            self.dst_offset_secs
        } else {
            self.standard_offset_secs
        };
        TimeDelta::seconds(i64::from(secs))
    }

    #[must_use]
    pub fn to_local(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.naive_utc() + self.offset_at(instant)
    }

    /// Interprets a wall-clock time in this zone, picking the offset from the
    /// local date.
    #[must_use]
    pub fn local_to_utc(&self, local: NaiveDateTime) -> DateTime<Utc> {
        let secs = if Self::in_dst_window(local.date()) {
            self.dst_offset_secs
        } else {
            self.standard_offset_secs
        };
        to_utc(local - TimeDelta::seconds(i64::from(secs)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulePolicy {
    Daily,
    Weekly,
}

impl SchedulePolicy {
    #[must_use]
    pub fn next_after(self, zone: &CivilZone, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            SchedulePolicy::Daily => next_daily_run(zone, now),
            SchedulePolicy::Weekly => next_weekly_run(zone, now),
        }
    }
}

/// Next 06:00 local strictly after `now`.
///
/// The offset is chosen once from `now` and applied to the target as well,
/// so a target that lands across a DST transition is off by an hour for
/// that single run.
#[must_use]
pub fn next_daily_run(zone: &CivilZone, now: DateTime<Utc>) -> DateTime<Utc> {
    let offset = zone.offset_at(now);
    let local_now = now.naive_utc() + offset;
    let local_target =
        local_now.date().and_time(NaiveTime::default()) + TimeDelta::hours(RUN_HOUR_LOCAL);

    let target = to_utc(local_target - offset);
    if target > now {
        target
    } else {
        target + TimeDelta::days(1)
    }
}

/// Next Monday 06:00 local strictly after `now`.
#[must_use]
pub fn next_weekly_run(zone: &CivilZone, now: DateTime<Utc>) -> DateTime<Utc> {
    let offset = zone.offset_at(now);
    let mut target = next_daily_run(zone, now);
    while (target.naive_utc() + offset).weekday() != Weekday::Mon {
        target += TimeDelta::days(1);
    }
    target
}

/// Renders the gap to `target` as its coarsest non-zero unit: `"3d"`,
/// `"5h"` or `"12m"`, or [`DUE_MARKER`] when `target <= now`.
#[must_use]
pub fn format_countdown(target: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let gap = target - now;
    if gap <= TimeDelta::zero() {
        return DUE_MARKER.to_string();
    }
    if gap.num_days() >= 1 {
        format!("{}d", gap.num_days())
    } else if gap.num_hours() >= 1 {
        format!("{}h", gap.num_hours())
    } else {
        format!("{}m", gap.num_minutes())
    }
}

/// Renders an elapsed duration as `"2h 15m"`.
#[must_use]
pub fn format_elapsed(elapsed: TimeDelta) -> String {
    let minutes = elapsed.num_minutes().max(0);
    format!("{}h {}m", minutes / 60, minutes % 60)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Disabled,
    IntervalNotElapsed {
        elapsed: TimeDelta,
        interval_hours: i32,
    },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Disabled => write!(f, "source is disabled"),
            SkipReason::IntervalNotElapsed {
                elapsed,
                interval_hours,
            } => write!(
                f,
                "last successful run was {} ago (minimum interval {interval_hours}h)",
                format_elapsed(*elapsed)
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Proceed,
    Skip(SkipReason),
}

/// Decides whether a run may start. `force` bypasses every check.
///
/// The interval is measured from `config.last_success`, the start instant of
/// the latest successful run, so a run at exactly one interval later proceeds.
#[must_use]
pub fn check_run_gate(config: &ScraperConfig, now: DateTime<Utc>, force: bool) -> GateDecision {
    if force {
        return GateDecision::Proceed;
    }
    if !config.is_enabled {
        return GateDecision::Skip(SkipReason::Disabled);
    }
    if let Some(last) = config.last_success {
        let elapsed = now - last;
        if elapsed < TimeDelta::hours(i64::from(config.interval_hours)) {
            return GateDecision::Skip(SkipReason::IntervalNotElapsed {
                elapsed,
                interval_hours: config.interval_hours,
            });
        }
    }
    GateDecision::Proceed
}

/// A source is due when enabled and its `next_run` is unset or has passed.
#[must_use]
pub fn is_due(config: &ScraperConfig, now: DateTime<Utc>) -> bool {
    config.is_enabled && config.next_run.is_none_or(|next| next <= now)
}

fn to_utc(naive: NaiveDateTime) -> DateTime<Utc> {
    DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc)
}

#[cfg(test)]
#[path = "schedule_test.rs"]
mod tests;
