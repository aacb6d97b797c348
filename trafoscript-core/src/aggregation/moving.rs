//! Trailing window aggregation: one bin per input point.

use chrono::Duration;

use super::Bin;
use crate::error::{ScriptError, ScriptResult};
use crate::executor::time::TimeAmount;
use crate::executor::DataPoint;

pub struct MovingAggregator {
    window: Duration,
}

impl MovingAggregator {
    /// Periods are resolved to their mean length.
    pub fn new(window: &TimeAmount) -> ScriptResult<Self> {
        let window = window.to_duration()?;
        if window <= Duration::zero() {
            return Err(ScriptError::InvalidArgument(
                "window must be positive".to_string(),
            ));
        }
        Ok(Self { window })
    }

    /// For each point of `points` (oldest first), collect it together with
    /// every earlier point less than one window before it.
    pub fn aggregate(&self, points: &[DataPoint]) -> Vec<Bin> {
        let mut start = 0;
        points
            .iter()
            .enumerate()
            .map(|(end, current)| {
                while current.timestamp - points[start].timestamp >= self.window {
                    start += 1;
                }
                Bin {
                    timestamp: current.timestamp,
                    label: current.label.clone(),
                    parents: points[start..=end].to_vec(),
                }
            })
            .collect()
    }
}
