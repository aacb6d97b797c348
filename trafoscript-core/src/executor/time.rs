//! Time amounts: calendar periods and exact durations.
//!
//! A [`Period`] is calendar relative (a month is not a fixed number of
//! seconds) and only survives addition, subtraction and integer scaling.
//! Every other operation resolves it to a [`chrono::Duration`] using the
//! mean Gregorian lengths below, and the result stays a duration.

use std::fmt;

use chrono::Duration;
use serde::ser::SerializeStruct;

use crate::ast::TimeUnit;
use crate::error::{ScriptError, ScriptResult};

pub const SECONDS_PER_DAY: i64 = 86_400;
/// One twelfth of a mean Gregorian year.
pub const SECONDS_PER_MONTH: i64 = 2_629_746;
pub const SECONDS_PER_YEAR: i64 = 31_556_952;

/// Calendar period in years, months and days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Period {
    pub years: i32,
    pub months: i32,
    pub days: i32,
}

impl Period {
    pub fn new(years: i32, months: i32, days: i32) -> Self {
        Self {
            years,
            months,
            days,
        }
    }

    pub fn of_days(days: i32) -> Self {
        Self::new(0, 0, days)
    }

    pub fn of_weeks(weeks: i32) -> Self {
        Self::new(0, 0, weeks * 7)
    }

    pub fn of_months(months: i32) -> Self {
        Self::new(0, months, 0)
    }

    pub fn of_years(years: i32) -> Self {
        Self::new(years, 0, 0)
    }

    fn checked_add(self, other: Period) -> Option<Period> {
        Some(Period {
            years: self.years.checked_add(other.years)?,
            months: self.months.checked_add(other.months)?,
            days: self.days.checked_add(other.days)?,
        })
    }

    fn checked_sub(self, other: Period) -> Option<Period> {
        Some(Period {
            years: self.years.checked_sub(other.years)?,
            months: self.months.checked_sub(other.months)?,
            days: self.days.checked_sub(other.days)?,
        })
    }

    fn checked_scale(self, factor: i32) -> Option<Period> {
        Some(Period {
            years: self.years.checked_mul(factor)?,
            months: self.months.checked_mul(factor)?,
            days: self.days.checked_mul(factor)?,
        })
    }

    pub fn total_seconds(&self) -> i64 {
        self.years as i64 * SECONDS_PER_YEAR
            + self.months as i64 * SECONDS_PER_MONTH
            + self.days as i64 * SECONDS_PER_DAY
    }

    /// Mean length as a duration, `None` when it does not fit one.
    pub fn checked_duration(&self) -> Option<Duration> {
        Duration::try_seconds(self.total_seconds())
    }

    /// Lexicographic (years, months, days) comparison, the order used to
    /// pick a calendar window for a period.
    pub fn at_most(&self, other: &Period) -> bool {
        (self.years, self.months, self.days) <= (other.years, other.months, other.days)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Period::default() {
            return f.write_str("P0D");
        }
        f.write_str("P")?;
        if self.years != 0 {
            write!(f, "{}Y", self.years)?;
        }
        if self.months != 0 {
            write!(f, "{}M", self.months)?;
        }
        if self.days != 0 {
            write!(f, "{}D", self.days)?;
        }
        Ok(())
    }
}

/// A time amount as produced by time unit literals and time arithmetic.
#[derive(Debug, Clone, Copy)]
pub enum TimeAmount {
    Period(Period),
    Duration(Duration),
}

fn overflow() -> ScriptError {
    ScriptError::InvalidArgument("time amount out of range".to_string())
}

/// Period arithmetic result, refused when it no longer resolves to a duration.
fn resolvable(period: Option<Period>) -> ScriptResult<TimeAmount> {
    period
        .filter(|p| p.checked_duration().is_some())
        .map(TimeAmount::Period)
        .ok_or_else(overflow)
}

/// Build a duration from fractional seconds, rounding to the nanosecond.
pub fn duration_from_secs_f64(secs: f64) -> ScriptResult<Duration> {
    if !secs.is_finite() || secs.abs() >= (i64::MAX / 1_000) as f64 {
        return Err(overflow());
    }
    let whole = secs.trunc();
    let nanos = ((secs - whole) * 1e9).round() as i64;
    let seconds = Duration::try_seconds(whole as i64).ok_or_else(overflow)?;
    seconds
        .checked_add(&Duration::nanoseconds(nanos))
        .ok_or_else(overflow)
}

impl TimeAmount {
    pub fn from_unit(unit: TimeUnit) -> Self {
        match unit {
            TimeUnit::Second => TimeAmount::Duration(Duration::seconds(1)),
            TimeUnit::Minute => TimeAmount::Duration(Duration::minutes(1)),
            TimeUnit::Hour => TimeAmount::Duration(Duration::hours(1)),
            TimeUnit::Day => TimeAmount::Period(Period::of_days(1)),
            TimeUnit::Week => TimeAmount::Period(Period::of_weeks(1)),
            TimeUnit::Month => TimeAmount::Period(Period::of_months(1)),
            TimeUnit::Year => TimeAmount::Period(Period::of_years(1)),
        }
    }

    pub fn is_period(&self) -> bool {
        matches!(self, TimeAmount::Period(_))
    }

    /// Resolve to an exact duration. Periods longer than a
    /// [`chrono::Duration`] can hold are an error.
    pub fn to_duration(&self) -> ScriptResult<Duration> {
        match self {
            TimeAmount::Period(p) => p.checked_duration().ok_or_else(overflow),
            TimeAmount::Duration(d) => Ok(*d),
        }
    }

    /// Resolved length in (fractional) seconds.
    pub fn seconds(&self) -> ScriptResult<f64> {
        let d = self.to_duration()?;
        Ok(d.num_seconds() as f64 + d.subsec_nanos() as f64 / 1e9)
    }

    /// Period + Period stays a period, anything else resolves to a duration.
    pub fn checked_add(&self, other: &TimeAmount) -> ScriptResult<TimeAmount> {
        match (self, other) {
            (TimeAmount::Period(a), TimeAmount::Period(b)) => {
                resolvable(a.checked_add(*b))
            }
            _ => self
                .to_duration()?
                .checked_add(&other.to_duration()?)
                .map(TimeAmount::Duration)
                .ok_or_else(overflow),
        }
    }

    pub fn checked_sub(&self, other: &TimeAmount) -> ScriptResult<TimeAmount> {
        match (self, other) {
            (TimeAmount::Period(a), TimeAmount::Period(b)) => {
                resolvable(a.checked_sub(*b))
            }
            _ => self
                .to_duration()?
                .checked_sub(&other.to_duration()?)
                .map(TimeAmount::Duration)
                .ok_or_else(overflow),
        }
    }

    /// Integer factors keep a period a period; fractional factors resolve it.
    pub fn scale(&self, factor: f64) -> ScriptResult<TimeAmount> {
        if let TimeAmount::Period(p) = self {
            if factor.fract() == 0.0 && factor.abs() <= i32::MAX as f64 {
                return resolvable(p.checked_scale(factor as i32));
            }
        }
        duration_from_secs_f64(self.seconds()? * factor).map(TimeAmount::Duration)
    }

    /// Division always resolves to a duration.
    pub fn divide(&self, divisor: f64) -> ScriptResult<TimeAmount> {
        if divisor == 0.0 {
            return Err(ScriptError::InvalidArgument(
                "cannot divide a time amount by zero".to_string(),
            ));
        }
        duration_from_secs_f64(self.seconds()? / divisor).map(TimeAmount::Duration)
    }

    /// How many times `other` fits into `self`.
    pub fn ratio(&self, other: &TimeAmount) -> ScriptResult<f64> {
        let denominator = other.seconds()?;
        if denominator == 0.0 {
            return Err(ScriptError::InvalidArgument(
                "cannot divide by a zero time amount".to_string(),
            ));
        }
        Ok(self.seconds()? / denominator)
    }
}

impl PartialEq for TimeAmount {
    fn eq(&self, other: &Self) -> bool {
        match (self.to_duration(), other.to_duration()) {
            (Ok(a), Ok(b)) => a == b,
            _ => match (self, other) {
                (TimeAmount::Period(a), TimeAmount::Period(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl From<TimeUnit> for TimeAmount {
    fn from(unit: TimeUnit) -> Self {
        TimeAmount::from_unit(unit)
    }
}

impl fmt::Display for TimeAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeAmount::Period(p) => fmt::Display::fmt(p, f),
            TimeAmount::Duration(d) => fmt::Display::fmt(d, f),
        }
    }
}

impl serde::Serialize for TimeAmount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("TimeAmount", 3)?;
        state.serialize_field("kind", if self.is_period() { "period" } else { "duration" })?;
        state.serialize_field("iso", &self.to_string())?;
        state.serialize_field("seconds", &self.seconds().ok())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(u: TimeUnit) -> TimeAmount {
        TimeAmount::from_unit(u)
    }

    #[test]
    fn test_literal_mapping() {
        assert!(!unit(TimeUnit::Minute).is_period());
        assert!(!unit(TimeUnit::Hour).is_period());
        assert!(unit(TimeUnit::Day).is_period());
        assert!(unit(TimeUnit::Week).is_period());
        assert!(unit(TimeUnit::Month).is_period());
        assert!(unit(TimeUnit::Year).is_period());
        assert_eq!(unit(TimeUnit::Hour).seconds().unwrap(), 3600.0);
    }

    #[test]
    fn test_period_stays_period() {
        let week = unit(TimeUnit::Week);
        let sum = week.checked_add(&week).unwrap();
        let doubled = week.scale(2.0).unwrap();
        assert!(sum.is_period());
        assert!(doubled.is_period());
        assert_eq!(sum, doubled);
        assert!(matches!(sum, TimeAmount::Period(p) if p == Period::of_days(14)));
    }

    #[test]
    fn test_division_normalizes() {
        let week = unit(TimeUnit::Week);
        let halved = week.scale(4.0).unwrap().divide(2.0).unwrap();
        assert!(!halved.is_period());
        assert_eq!(halved, week.scale(2.0).unwrap());

        // once a duration, always a duration
        let again = halved.scale(2.0).unwrap().checked_add(&week).unwrap();
        assert!(!again.is_period());
        assert_eq!(again.seconds().unwrap(), 5.0 * 7.0 * 86_400.0);
    }

    #[test]
    fn test_mixed_addition_normalizes() {
        let mixed = unit(TimeUnit::Day)
            .checked_add(&unit(TimeUnit::Hour))
            .unwrap();
        assert!(!mixed.is_period());
        assert_eq!(mixed.seconds().unwrap(), 25.0 * 3600.0);
    }

    #[test]
    fn test_fractional_scale_of_period() {
        let half_day = unit(TimeUnit::Day).scale(0.5).unwrap();
        assert!(!half_day.is_period());
        assert_eq!(half_day, unit(TimeUnit::Hour).scale(12.0).unwrap());
    }

    #[test]
    fn test_equality_by_resolved_duration() {
        assert_eq!(unit(TimeUnit::Day), unit(TimeUnit::Hour).scale(24.0).unwrap());
        assert_eq!(
            unit(TimeUnit::Year),
            unit(TimeUnit::Month).scale(12.0).unwrap()
        );
    }

    #[test]
    fn test_ratio_and_zero_division() {
        assert_eq!(
            unit(TimeUnit::Week).ratio(&unit(TimeUnit::Day)).unwrap(),
            7.0
        );
        assert!(unit(TimeUnit::Week).divide(0.0).is_err());
        let zero = unit(TimeUnit::Day).scale(0.0).unwrap();
        assert!(unit(TimeUnit::Day).ratio(&zero).is_err());
    }

    #[test]
    fn test_period_order_and_display() {
        assert!(Period::of_days(7).at_most(&Period::of_weeks(1)));
        assert!(!Period::of_months(1).at_most(&Period::of_weeks(1)));
        assert!(Period::of_days(40).at_most(&Period::of_months(1)));
        assert_eq!(Period::new(1, 2, 3).to_string(), "P1Y2M3D");
        assert_eq!(Period::default().to_string(), "P0D");
    }

    #[test]
    fn test_oversized_period_is_refused() {
        let year = unit(TimeUnit::Year);
        assert!(matches!(
            year.scale(1_000_000_000.0),
            Err(ScriptError::InvalidArgument(_))
        ));
        assert!(year.scale(2_000_000_000.0).is_err());

        let huge = TimeAmount::Period(Period::of_years(i32::MAX));
        assert!(huge.to_duration().is_err());
        assert!(huge.seconds().is_err());
        assert_ne!(huge, TimeAmount::Period(Period::of_years(i32::MAX - 1)));
        assert_eq!(huge, huge);
    }

    #[test]
    fn test_duration_from_secs() {
        assert_eq!(
            duration_from_secs_f64(1.5).unwrap(),
            Duration::milliseconds(1500)
        );
        assert!(duration_from_secs_f64(f64::NAN).is_err());
        assert!(duration_from_secs_f64(f64::INFINITY).is_err());
    }
}
