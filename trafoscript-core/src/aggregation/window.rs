//! Calendar alignment helpers for fixed bins.

use chrono::{
    DateTime, Datelike, Days, Duration, FixedOffset, Months, NaiveDate, NaiveDateTime, NaiveTime,
    Timelike, Weekday,
};

use crate::executor::time::{Period, TimeAmount};

/// Calendar boundary a window of a given size is aligned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowAnchor {
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    HalfYear,
    Year,
}

impl WindowAnchor {
    /// The largest anchor the window still fits in.
    pub fn for_window(window: &TimeAmount) -> Self {
        match window {
            TimeAmount::Duration(d) => {
                if *d <= Duration::minutes(60) {
                    WindowAnchor::Hour
                } else if *d <= Duration::days(1) {
                    WindowAnchor::Day
                } else if *d <= Duration::days(7) {
                    WindowAnchor::Week
                } else if *d <= Duration::days(31) {
                    WindowAnchor::Month
                } else if *d <= Duration::days(92) {
                    WindowAnchor::Quarter
                } else if *d <= Duration::days(183) {
                    WindowAnchor::HalfYear
                } else {
                    WindowAnchor::Year
                }
            }
            TimeAmount::Period(p) => {
                if p.at_most(&Period::of_days(1)) {
                    WindowAnchor::Day
                } else if p.at_most(&Period::of_weeks(1)) {
                    WindowAnchor::Week
                } else if p.at_most(&Period::of_months(1)) {
                    WindowAnchor::Month
                } else if p.at_most(&Period::of_months(3)) {
                    WindowAnchor::Quarter
                } else if p.at_most(&Period::of_months(6)) {
                    WindowAnchor::HalfYear
                } else {
                    WindowAnchor::Year
                }
            }
        }
    }

    /// Truncate `at` down to the start of its enclosing anchor.
    pub fn floor(&self, at: NaiveDateTime, first_day_of_week: Weekday) -> NaiveDateTime {
        let date = at.date();
        let start_of = |d: NaiveDate| d.and_time(NaiveTime::MIN);
        let first_of_month = |month: u32| {
            NaiveDate::from_ymd_opt(date.year(), month, 1).unwrap_or(date)
        };

        match self {
            WindowAnchor::Hour => NaiveTime::from_hms_opt(at.hour(), 0, 0)
                .map(|t| date.and_time(t))
                .unwrap_or(at),
            WindowAnchor::Day => start_of(date),
            WindowAnchor::Week => {
                let back = (date.weekday().num_days_from_monday() + 7
                    - first_day_of_week.num_days_from_monday())
                    % 7;
                start_of(date.checked_sub_days(Days::new(back as u64)).unwrap_or(date))
            }
            WindowAnchor::Month => start_of(first_of_month(date.month())),
            WindowAnchor::Quarter => start_of(first_of_month(3 * ((date.month() - 1) / 3) + 1)),
            WindowAnchor::HalfYear => {
                start_of(first_of_month(if date.month() < 7 { 1 } else { 7 }))
            }
            WindowAnchor::Year => start_of(first_of_month(1)),
        }
    }
}

/// Start of the calendar window of size `window` that contains `at`.
pub fn beginning_of_window(
    at: DateTime<FixedOffset>,
    window: &TimeAmount,
    first_day_of_week: Weekday,
) -> DateTime<FixedOffset> {
    let floored = WindowAnchor::for_window(window).floor(at.naive_local(), first_day_of_week);
    floored
        .and_local_timezone(*at.offset())
        .single()
        .unwrap_or(at)
}

/// `at + amount`, with calendar arithmetic for periods.
pub fn advance(at: DateTime<FixedOffset>, amount: &TimeAmount) -> Option<DateTime<FixedOffset>> {
    match amount {
        TimeAmount::Duration(d) => at.checked_add_signed(*d),
        TimeAmount::Period(p) => {
            let months = p.years as i64 * 12 + p.months as i64;
            let shifted = if months >= 0 {
                at.checked_add_months(Months::new(u32::try_from(months).ok()?))?
            } else {
                at.checked_sub_months(Months::new(u32::try_from(-months).ok()?))?
            };
            if p.days >= 0 {
                shifted.checked_add_days(Days::new(p.days as u64))
            } else {
                shifted.checked_sub_days(Days::new(p.days.unsigned_abs() as u64))
            }
        }
    }
}
