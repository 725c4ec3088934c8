//! Interval value type
//!
//! A backend-legal interval literal with structural equality. Alter-field
//! decisions compare intervals structurally, so two intervals are equal iff
//! magnitude and unit match.

use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Time unit of an interval literal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl IntervalUnit {
    fn singular(self) -> &'static str {
        match self {
            IntervalUnit::Second => "second",
            IntervalUnit::Minute => "minute",
            IntervalUnit::Hour => "hour",
            IntervalUnit::Day => "day",
            IntervalUnit::Week => "week",
            IntervalUnit::Month => "month",
            IntervalUnit::Year => "year",
        }
    }
}

/// A duration expressed as magnitude + unit, e.g. "2 hours"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub amount: u32,
    pub unit: IntervalUnit,
}

impl Interval {
    pub fn new(amount: u32, unit: IntervalUnit) -> Self {
        Self { amount, unit }
    }

    /// Render to the backend interval literal body, e.g. `2 hours`.
    /// Callers quote the result through the DDL quoting chokepoint.
    pub fn as_literal(&self) -> String {
        if self.amount == 1 {
            format!("1 {}", self.unit.singular())
        } else {
            format!("{} {}s", self.amount, self.unit.singular())
        }
    }

    /// Approximate chrono duration, used only for default refresh windows.
    /// Calendar units are approximated (month = 30 days, year = 365 days).
    pub fn to_duration(&self) -> Duration {
        let amount = i64::from(self.amount);
        match self.unit {
            IntervalUnit::Second => Duration::seconds(amount),
            IntervalUnit::Minute => Duration::minutes(amount),
            IntervalUnit::Hour => Duration::hours(amount),
            IntervalUnit::Day => Duration::days(amount),
            IntervalUnit::Week => Duration::weeks(amount),
            IntervalUnit::Month => Duration::days(amount * 30),
            IntervalUnit::Year => Duration::days(amount * 365),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_literal())
    }
}

impl FromStr for Interval {
    type Err = EngineError;

    /// Parse literals of the form `"1 day"` or `"2 hours"`.
    fn from_str(s: &str) -> EngineResult<Self> {
        let mut parts = s.split_whitespace();
        let (amount, unit) = match (parts.next(), parts.next(), parts.next()) {
            (Some(amount), Some(unit), None) => (amount, unit),
            _ => {
                return Err(EngineError::Config(format!(
                    "invalid interval literal '{}'",
                    s
                )))
            }
        };
        let amount: u32 = amount
            .parse()
            .map_err(|_| EngineError::Config(format!("invalid interval magnitude '{}'", amount)))?;
        let unit = match unit.trim_end_matches('s') {
            "second" | "sec" => IntervalUnit::Second,
            "minute" | "min" => IntervalUnit::Minute,
            "hour" => IntervalUnit::Hour,
            "day" => IntervalUnit::Day,
            "week" => IntervalUnit::Week,
            "month" => IntervalUnit::Month,
            "year" => IntervalUnit::Year,
            other => {
                return Err(EngineError::Config(format!(
                    "invalid interval unit '{}'",
                    other
                )))
            }
        };
        Ok(Interval::new(amount, unit))
    }
}
