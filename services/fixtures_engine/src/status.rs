use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::types::Fixture;

/// How long after kickoff a match is still shown as live.
pub const LIVE_WINDOW_MINUTES: i64 = 120;
/// How far ahead of kickoff a same-day match is flagged as up next.
pub const UP_NEXT_WINDOW_HOURS: i64 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum MatchStatus {
    Upcoming,
    UpNext { countdown: String },
    Live,
    Finished,
}

impl MatchStatus {
    /// Upcoming, up next and live fixtures all belong on the "fixtures" tab.
    pub fn is_pending(&self) -> bool {
        !matches!(self, MatchStatus::Finished)
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchStatus::Upcoming => "upcoming",
            MatchStatus::UpNext { .. } => "upNext",
            MatchStatus::Live => "live",
            MatchStatus::Finished => "finished",
        }
    }
}

/// The zone "same calendar day" is judged in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceZone {
    /// UK civil time: GMT, or BST between the last Sundays of March and October.
    Uk,
    Fixed(FixedOffset),
}

impl Default for ReferenceZone {
    fn default() -> Self {
        ReferenceZone::Uk
    }
}

fn last_sunday(year: i32, month: u32) -> Option<NaiveDate> {
    let last_day = NaiveDate::from_ymd_opt(year, month + 1, 1)?.pred_opt()?;
    Some(last_day - Duration::days(last_day.weekday().num_days_from_sunday() as i64))
}

/// BST runs from 01:00 UTC on the last Sunday in March to 01:00 UTC on the last Sunday in October.
fn is_british_summer_time(instant: DateTime<Utc>) -> bool {
    let year = instant.year();
    let start = last_sunday(year, 3).and_then(|d| d.and_hms_opt(1, 0, 0));
    let end = last_sunday(year, 10).and_then(|d| d.and_hms_opt(1, 0, 0));
    match (start, end) {
        (Some(start), Some(end)) => instant >= start.and_utc() && instant < end.and_utc(),
        _ => false,
    }
}

impl ReferenceZone {
    pub fn offset_at(&self, instant: DateTime<Utc>) -> FixedOffset {
        match self {
            ReferenceZone::Fixed(offset) => *offset,
            ReferenceZone::Uk if is_british_summer_time(instant) => {
                FixedOffset::east_opt(3600).unwrap_or_else(|| Utc.fix())
            }
            ReferenceZone::Uk => Utc.fix(),
        }
    }

    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset_at(instant)).date_naive()
    }
}

impl fmt::Display for ReferenceZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceZone::Uk => write!(f, "uk"),
            ReferenceZone::Fixed(offset) => write!(f, "{}", offset),
        }
    }
}

impl FromStr for ReferenceZone {
    type Err = String;

    /// Accepts `uk`, `europe/london`, `utc`, or a `+HH:MM` / `-HH:MM` offset.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "uk" | "europe/london" | "gb" => return Ok(ReferenceZone::Uk),
            "utc" | "z" | "gmt" => return Ok(ReferenceZone::Fixed(Utc.fix())),
            _ => {}
        }

        let (sign, rest) = if let Some(rest) = trimmed.strip_prefix('+') {
            (1, rest)
        } else if let Some(rest) = trimmed.strip_prefix('-') {
            (-1, rest)
        } else {
            return Err(format!("Invalid reference timezone: {}", s));
        };
        let (hours, minutes) = rest
            .split_once(':')
            .ok_or_else(|| format!("Invalid reference timezone: {}", s))?;
        let hours = offset_part(hours).ok_or_else(|| format!("Invalid offset hours: {}", s))?;
        let minutes = offset_part(minutes)
            .filter(|m| *m < 60)
            .ok_or_else(|| format!("Invalid offset minutes: {}", s))?;
        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60) as i32)
            .map(ReferenceZone::Fixed)
            .ok_or_else(|| format!("Offset out of range: {}", s))
    }
}

/// Two unsigned digits of an `HH:MM` offset.
fn offset_part(part: &str) -> Option<u32> {
    if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// The evaluation instant plus the zone used for calendar-day comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    pub now: DateTime<Utc>,
    pub zone: ReferenceZone,
}

impl Clock {
    pub fn new(now: DateTime<Utc>, zone: ReferenceZone) -> Self {
        Self { now, zone }
    }

    pub fn classify(&self, kickoff_utc: DateTime<Utc>) -> MatchStatus {
        classify(kickoff_utc, self.now, self.zone)
    }

    pub fn classify_fixture(&self, fixture: &Fixture) -> MatchStatus {
        self.classify(fixture.kickoff_utc)
    }
}

/// Human-readable time to kickoff: `"1h 30m"`, or `"45m"` under an hour.
pub fn format_countdown(until_kickoff: Duration) -> String {
    let total_minutes = until_kickoff.num_minutes().max(0);
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Derive a fixture's display state from its kickoff and the evaluation time.
///
/// The boundary at exactly two hours after kickoff still counts as live.
pub fn classify(kickoff_utc: DateTime<Utc>, now: DateTime<Utc>, zone: ReferenceZone) -> MatchStatus {
    let delta = kickoff_utc - now;

    if delta <= Duration::zero() {
        return if -delta <= Duration::minutes(LIVE_WINDOW_MINUTES) {
            MatchStatus::Live
        } else {
            MatchStatus::Finished
        };
    }

    let same_day = zone.local_date(kickoff_utc) == zone.local_date(now);
    if same_day && delta <= Duration::hours(UP_NEXT_WINDOW_HOURS) {
        return MatchStatus::UpNext {
            countdown: format_countdown(delta),
        };
    }

    MatchStatus::Upcoming
}
