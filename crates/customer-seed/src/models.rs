use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::FromRow;
use thiserror::Error;
use time::Date;

/// One row of the `customers` table. `id` is assigned by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Customer {
    pub id: i32,
    pub name: String,
    #[sqlx(try_from = "String")]
    pub revenue: Revenue,
    pub signup_date: Date,
}

impl Customer {
    pub fn new(id: i32, name: impl Into<String>, revenue: Revenue, signup_date: Date) -> Self {
        Self {
            id,
            name: name.into(),
            revenue,
            signup_date,
        }
    }
}

/// Exact monetary amount with two fractional digits, matching `NUMERIC(10,2)`.
///
/// Stored as hundredths so that values such as `950.50` never pass through a
/// binary float.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Revenue(i64);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RevenueError {
    #[error("invalid revenue {0:?}")]
    Invalid(String),
    #[error("revenue {0:?} has more than two fractional digits")]
    TooPrecise(String),
    #[error("revenue {0:?} does not fit NUMERIC(10,2)")]
    OutOfRange(String),
}

impl Revenue {
    /// Exclusive bound in hundredths: eight integer digits.
    const LIMIT_CENTS: i64 = 10_000_000_000;

    pub fn from_cents(cents: i64) -> Result<Self, RevenueError> {
        if cents.abs() >= Self::LIMIT_CENTS {
            return Err(RevenueError::OutOfRange(format!("{cents} cents")));
        }
        Ok(Self(cents))
    }

    pub const fn cents(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Revenue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl FromStr for Revenue {
    type Err = RevenueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let (whole, frac) = digits.split_once('.').unwrap_or((digits, ""));

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && frac.is_empty()) || !all_digits(whole) || !all_digits(frac) {
            return Err(RevenueError::Invalid(s.to_string()));
        }
        if frac.len() > 2 {
            return Err(RevenueError::TooPrecise(s.to_string()));
        }

        let whole = whole.trim_start_matches('0');
        // Eight integer digits at most.
        if whole.len() > 8 {
            return Err(RevenueError::OutOfRange(s.to_string()));
        }
        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| RevenueError::Invalid(s.to_string()))?
        };
        let frac: i64 = format!("{frac:0<2}")
            .parse()
            .map_err(|_| RevenueError::Invalid(s.to_string()))?;

        let cents = whole * 100 + frac;
        Self::from_cents(if negative { -cents } else { cents })
    }
}

impl TryFrom<String> for Revenue {
    type Error = RevenueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Serialize for Revenue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Revenue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
