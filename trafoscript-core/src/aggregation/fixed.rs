//! Fixed, calendar aligned bins.
//!
//! Bins are laid end to end from the start of the calendar window holding
//! the earliest timestamp until the window holding the latest one. Every
//! point lands in exactly one bin. Points before the configured start of
//! day count towards the previous day: windows are computed on timestamps
//! shifted back by `start_of_day`, and bin timestamps are shifted forward
//! again.

use chrono::{DateTime, Duration, FixedOffset};

use super::window::{advance, beginning_of_window};
use super::{AggregationPreferences, Bin};
use crate::error::{ScriptError, ScriptResult};
use crate::executor::time::TimeAmount;
use crate::executor::DataPoint;

pub struct FixedBinAggregator<'a> {
    window: TimeAmount,
    preferences: &'a AggregationPreferences,
    hard_start: Option<DateTime<FixedOffset>>,
    end_time: Option<DateTime<FixedOffset>>,
}

impl<'a> FixedBinAggregator<'a> {
    pub fn new(window: TimeAmount, preferences: &'a AggregationPreferences) -> ScriptResult<Self> {
        if window.to_duration()? <= Duration::zero() {
            return Err(ScriptError::InvalidArgument(
                "window must be positive".to_string(),
            ));
        }
        Ok(Self {
            window,
            preferences,
            hard_start: None,
            end_time: None,
        })
    }

    /// Start binning here even if the data begins later.
    pub fn with_hard_start(mut self, start: Option<DateTime<FixedOffset>>) -> Self {
        self.hard_start = start;
        self
    }

    /// Keep producing bins at least up to this time.
    pub fn with_end_time(mut self, end: Option<DateTime<FixedOffset>>) -> Self {
        self.end_time = end;
        self
    }

    fn shifted(&self, t: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
        t - self.preferences.start_of_day
    }

    /// Group `points` (oldest first) into bins.
    pub fn aggregate(&self, points: &[DataPoint]) -> ScriptResult<Vec<Bin>> {
        let first = points.first().map(|p| self.shifted(p.timestamp));
        let last = points.last().map(|p| self.shifted(p.timestamp));

        let earliest = match (first, self.hard_start.map(|t| self.shifted(t))) {
            (Some(a), Some(b)) => a.min(b),
            (a, b) => match a.or(b) {
                Some(t) => t,
                None => return Ok(Vec::new()),
            },
        };
        let latest = match (last, self.end_time) {
            (Some(a), Some(b)) => a.max(b),
            (a, b) => a.or(b).unwrap_or(earliest),
        };

        // Bin timestamps use the offset of the earliest point.
        let offset = *earliest.offset();
        let mut bin_start = beginning_of_window(
            earliest,
            &self.window,
            self.preferences.first_day_of_week,
        );
        let mut bins = Vec::new();
        let mut index = 0;

        while bin_start <= latest {
            let bin_end = advance(bin_start, &self.window)
                .ok_or_else(|| ScriptError::InvalidArgument("window out of range".to_string()))?;
            if bin_end <= bin_start {
                return Err(ScriptError::InvalidArgument(
                    "window must be positive".to_string(),
                ));
            }

            let taken = points[index..]
                .iter()
                .take_while(|p| self.shifted(p.timestamp) < bin_end)
                .count();
            let parents = points[index..index + taken].to_vec();
            index += taken;

            let timestamp =
                (bin_end - Duration::nanoseconds(1) + self.preferences.start_of_day)
                    .with_timezone(&offset);
            bins.push(Bin {
                timestamp,
                label: String::new(),
                parents,
            });
            bin_start = bin_end;
        }

        tracing::trace!(
            bins = bins.len(),
            points = points.len(),
            window = %self.window,
            "fixed bin aggregation"
        );
        Ok(bins)
    }
}
