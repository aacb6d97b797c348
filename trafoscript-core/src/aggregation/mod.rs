//! Windowed aggregation of point streams.
//!
//! This module contains:
//! - AggregationSelector: the reduction applied to the parents of a bin
//! - FixedBinAggregator: calendar aligned, non overlapping bins
//! - MovingAggregator: one trailing window per input point
//! - beginning_of_window: calendar anchor used to align fixed bins

mod fixed;
mod moving;
mod window;

pub use fixed::FixedBinAggregator;
pub use moving::MovingAggregator;
pub use window::{advance, beginning_of_window, WindowAnchor};

use chrono::{DateTime, Duration, FixedOffset, Weekday};
use serde::Serialize;

use crate::executor::DataPoint;

/// Reduction applied to the parent points of an aggregation bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AggregationSelector {
    Min,
    Max,
    Average,
    Sum,
    Median,
    Earliest,
    Latest,
    Count,
}

impl AggregationSelector {
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "MIN" => Some(AggregationSelector::Min),
            "MAX" => Some(AggregationSelector::Max),
            "AVERAGE" => Some(AggregationSelector::Average),
            "SUM" => Some(AggregationSelector::Sum),
            "MEDIAN" => Some(AggregationSelector::Median),
            "EARLIEST" => Some(AggregationSelector::Earliest),
            "LATEST" => Some(AggregationSelector::Latest),
            "COUNT" => Some(AggregationSelector::Count),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            AggregationSelector::Min => "MIN",
            AggregationSelector::Max => "MAX",
            AggregationSelector::Average => "AVERAGE",
            AggregationSelector::Sum => "SUM",
            AggregationSelector::Median => "MEDIAN",
            AggregationSelector::Earliest => "EARLIEST",
            AggregationSelector::Latest => "LATEST",
            AggregationSelector::Count => "COUNT",
        }
    }

    /// SUM and COUNT have a natural value for an empty bin, the others do not.
    pub fn keeps_empty_bins(&self) -> bool {
        matches!(self, AggregationSelector::Sum | AggregationSelector::Count)
    }

    /// Reduce `parents` (oldest first) to one value. `None` means the bin
    /// has no defensible value and should be dropped.
    pub fn reduce(&self, parents: &[DataPoint]) -> Option<f64> {
        if parents.is_empty() {
            return if self.keeps_empty_bins() { Some(0.0) } else { None };
        }

        let values = parents.iter().map(|p| p.value);
        let reduced = match self {
            AggregationSelector::Min => values.fold(f64::INFINITY, f64::min),
            AggregationSelector::Max => values.fold(f64::NEG_INFINITY, f64::max),
            AggregationSelector::Sum => values.sum(),
            AggregationSelector::Average => values.sum::<f64>() / parents.len() as f64,
            AggregationSelector::Count => parents.len() as f64,
            AggregationSelector::Earliest => parents[0].value,
            AggregationSelector::Latest => parents[parents.len() - 1].value,
            AggregationSelector::Median => {
                let mut sorted: Vec<f64> = values.collect();
                sorted.sort_by(|a, b| a.total_cmp(b));
                let mid = sorted.len() / 2;
                if sorted.len() % 2 == 0 {
                    (sorted[mid - 1] + sorted[mid]) / 2.0
                } else {
                    sorted[mid]
                }
            }
        };
        Some(reduced)
    }
}

impl std::fmt::Display for AggregationSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

/// How calendar windows are laid out. Passed to every aggregator call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationPreferences {
    /// Weekly windows start on this day
    pub first_day_of_week: Weekday,
    /// Points before this time of day count towards the previous day
    pub start_of_day: Duration,
}

impl Default for AggregationPreferences {
    fn default() -> Self {
        Self {
            first_day_of_week: Weekday::Mon,
            start_of_day: Duration::zero(),
        }
    }
}

/// Points grouped under one output timestamp, before reduction.
#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    pub timestamp: DateTime<FixedOffset>,
    pub label: String,
    pub parents: Vec<DataPoint>,
}

/// Reduce every bin with `selector`. Bins without a value are dropped unless
/// a `fallback` is given.
pub fn reduce_bins(
    bins: &[Bin],
    selector: AggregationSelector,
    fallback: Option<f64>,
) -> Vec<DataPoint> {
    bins.iter()
        .filter_map(|bin| {
            selector
                .reduce(&bin.parents)
                .or(fallback)
                .map(|value| DataPoint::new(bin.timestamp, value, bin.label.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn points(values: &[f64]) -> Vec<DataPoint> {
        let offset = FixedOffset::east_opt(0).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                DataPoint::new(
                    offset.with_ymd_and_hms(2024, 1, 1, i as u32, 0, 0).unwrap(),
                    *v,
                    "",
                )
            })
            .collect()
    }

    #[test]
    fn test_keywords_round_trip() {
        for word in ["MIN", "MAX", "AVERAGE", "SUM", "MEDIAN", "EARLIEST", "LATEST", "COUNT"] {
            let selector = AggregationSelector::from_keyword(word).unwrap();
            assert_eq!(selector.keyword(), word);
        }
        assert_eq!(AggregationSelector::from_keyword("average"), None);
    }

    #[test]
    fn test_reduce() {
        let parents = points(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(AggregationSelector::Min.reduce(&parents), Some(1.0));
        assert_eq!(AggregationSelector::Max.reduce(&parents), Some(4.0));
        assert_eq!(AggregationSelector::Sum.reduce(&parents), Some(10.0));
        assert_eq!(AggregationSelector::Average.reduce(&parents), Some(2.5));
        assert_eq!(AggregationSelector::Count.reduce(&parents), Some(4.0));
        assert_eq!(AggregationSelector::Earliest.reduce(&parents), Some(4.0));
        assert_eq!(AggregationSelector::Latest.reduce(&parents), Some(2.0));
    }

    #[test]
    fn test_median_even_count_averages_middle_values() {
        assert_eq!(
            AggregationSelector::Median.reduce(&points(&[4.0, 1.0, 3.0, 2.0])),
            Some(2.5)
        );
        assert_eq!(
            AggregationSelector::Median.reduce(&points(&[5.0, 1.0, 3.0])),
            Some(3.0)
        );
    }

    #[test]
    fn test_empty_bins() {
        assert_eq!(AggregationSelector::Sum.reduce(&[]), Some(0.0));
        assert_eq!(AggregationSelector::Count.reduce(&[]), Some(0.0));
        for selector in [
            AggregationSelector::Min,
            AggregationSelector::Max,
            AggregationSelector::Average,
            AggregationSelector::Median,
            AggregationSelector::Earliest,
            AggregationSelector::Latest,
        ] {
            assert_eq!(selector.reduce(&[]), None, "{}", selector);
        }
    }

    #[test]
    fn test_reduce_bins_with_fallback() {
        let full = points(&[1.0, 2.0]);
        let bins = vec![
            Bin {
                timestamp: full[0].timestamp,
                label: String::new(),
                parents: full.clone(),
            },
            Bin {
                timestamp: full[1].timestamp,
                label: String::new(),
                parents: vec![],
            },
        ];

        let dropped = reduce_bins(&bins, AggregationSelector::Average, None);
        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].value, 1.5);

        let kept = reduce_bins(&bins, AggregationSelector::Average, Some(-1.0));
        assert_eq!(kept.iter().map(|p| p.value).collect::<Vec<_>>(), vec![1.5, -1.0]);

        let summed = reduce_bins(&bins, AggregationSelector::Sum, None);
        assert_eq!(summed.iter().map(|p| p.value).collect::<Vec<_>>(), vec![3.0, 0.0]);
    }
}
