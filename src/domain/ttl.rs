//! The fixed TTL ladder and per-caller-class ceilings.
//!
//! A link lives for one of five durations (hour, day, week, month, year),
//! indexed by step. Each caller class is capped at a maximum step, or is
//! unbounded and may create links that never expire.

use chrono::Duration;
use std::fmt;
use std::str::FromStr;

pub const HOUR_IN_MS: i64 = 60 * 60 * 1000;
pub const DAY_IN_MS: i64 = 24 * HOUR_IN_MS;
pub const WEEK_IN_MS: i64 = 7 * DAY_IN_MS;
pub const MONTH_IN_MS: i64 = 30 * DAY_IN_MS;
pub const YEAR_IN_MS: i64 = 365 * DAY_IN_MS;

/// One rung of the TTL ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TtlStep {
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl TtlStep {
    /// All steps in ascending order; the position is the step index.
    pub const LADDER: [TtlStep; 5] = [
        TtlStep::Hour,
        TtlStep::Day,
        TtlStep::Week,
        TtlStep::Month,
        TtlStep::Year,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn duration_ms(self) -> i64 {
        match self {
            TtlStep::Hour => HOUR_IN_MS,
            TtlStep::Day => DAY_IN_MS,
            TtlStep::Week => WEEK_IN_MS,
            TtlStep::Month => MONTH_IN_MS,
            TtlStep::Year => YEAR_IN_MS,
        }
    }

    pub fn duration(self) -> Duration {
        Duration::milliseconds(self.duration_ms())
    }

    /// Presentation label ("a day", "a week", ...) as a message key.
    pub fn label(self) -> &'static str {
        match self {
            TtlStep::Hour => "anhour",
            TtlStep::Day => "aday",
            TtlStep::Week => "aweek",
            TtlStep::Month => "amonth",
            TtlStep::Year => "ayear",
        }
    }

    /// Configuration name of the step.
    pub fn name(self) -> &'static str {
        match self {
            TtlStep::Hour => "hour",
            TtlStep::Day => "day",
            TtlStep::Week => "week",
            TtlStep::Month => "month",
            TtlStep::Year => "year",
        }
    }

    /// Finds the step whose duration is exactly `ms`.
    pub fn from_duration_ms(ms: i64) -> Option<Self> {
        Self::LADDER.into_iter().find(|s| s.duration_ms() == ms)
    }
}

impl fmt::Display for TtlStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for unknown TTL step or ceiling names.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown TTL tier '{0}' (expected hour, day, week, month, year or unbounded)")]
pub struct ParseTtlError(pub String);

impl FromStr for TtlStep {
    type Err = ParseTtlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Self::LADDER
            .into_iter()
            .find(|step| step.name() == name)
            .ok_or_else(|| ParseTtlError(s.to_string()))
    }
}

/// Maximum TTL a caller class may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtlCeiling {
    /// Capped at this step (inclusive).
    Step(TtlStep),
    /// No maximum; links may never expire.
    Unbounded,
}

impl TtlCeiling {
    /// The subset of the ladder available under this ceiling.
    pub fn tiers(self) -> &'static [TtlStep] {
        match self {
            TtlCeiling::Step(step) => &TtlStep::LADDER[..=step.index()],
            TtlCeiling::Unbounded => &TtlStep::LADDER,
        }
    }

    pub fn is_unbounded(self) -> bool {
        matches!(self, TtlCeiling::Unbounded)
    }

    /// TTL applied when the caller omits one: the maximum tier, or no expiry.
    pub fn default_ttl(self) -> Option<TtlStep> {
        match self {
            TtlCeiling::Step(step) => Some(step),
            TtlCeiling::Unbounded => None,
        }
    }

    /// Returns true if `step` is within this ceiling.
    pub fn permits(self, step: TtlStep) -> bool {
        match self {
            TtlCeiling::Step(max) => step <= max,
            TtlCeiling::Unbounded => true,
        }
    }
}

impl fmt::Display for TtlCeiling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TtlCeiling::Step(step) => step.fmt(f),
            TtlCeiling::Unbounded => f.write_str("unbounded"),
        }
    }
}

impl FromStr for TtlCeiling {
    type Err = ParseTtlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unbounded" | "infinite" | "none" => Ok(TtlCeiling::Unbounded),
            _ => s.parse().map(TtlCeiling::Step),
        }
    }
}

/// TTL ceilings for both caller classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    pub temporary: TtlCeiling,
    pub registered: TtlCeiling,
}

impl TtlPolicy {
    pub fn ceiling_for(&self, privileged: bool) -> TtlCeiling {
        if privileged {
            self.registered
        } else {
            self.temporary
        }
    }
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            temporary: TtlCeiling::Step(TtlStep::Week),
            registered: TtlCeiling::Unbounded,
        }
    }
}
