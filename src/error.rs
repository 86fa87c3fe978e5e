/*
 *  error.rs
 *
 *  micviz - directional mic debug view
 *  (c) 2020-26 Stuart Hunter
 *
 *  Unified error types for the rendering pipeline
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use thiserror::Error;

/// Unified error type for all pipeline operations
///
/// The first group are per-frame data errors. They are isolated to the
/// visual element or series they affect and never stop the widget.
/// The second group are setup or surface failures and are fatal.
#[derive(Debug, Error)]
pub enum VizError {
    /// direction or selectedDirection outside 0..=12
    #[error("direction index out of range for {field}: {index} (must be 0..=12)")]
    DirectionIndex { field: &'static str, index: i64 },

    /// Non-positive (or non-finite) value where a logarithm is required
    #[error("domain error for series '{series}': {value} is not a positive finite value")]
    Domain { series: String, value: f64 },

    /// Sample or frame time went backwards
    #[error("out of order sample: time {time} precedes last time {last}")]
    OutOfOrderSample { time: f64, last: f64 },

    /// Frame time is NaN or infinite
    #[error("frame time is not finite: {0}")]
    NonFiniteTime(f64),

    /// Series label registered twice
    #[error("series already registered: {0}")]
    DuplicateSeries(String),

    /// Sample routed to a label that was never registered
    #[error("unknown series: {0}")]
    UnknownSeries(String),

    /// Host did not provide a drawing target
    #[error("missing drawing surface: {0}")]
    MissingSurface(&'static str),

    /// Drawing target reported a failure
    #[error("drawing error: {0}")]
    Drawing(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VizError {
    /// True for errors confined to a single frame; the widget keeps rendering.
    pub fn is_frame_local(&self) -> bool {
        matches!(
            self,
            VizError::DirectionIndex { .. }
                | VizError::Domain { .. }
                | VizError::OutOfOrderSample { .. }
                | VizError::NonFiniteTime(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_local_classification() {
        assert!(VizError::DirectionIndex { field: "direction", index: 13 }.is_frame_local());
        assert!(VizError::Domain { series: "noise".into(), value: 0.0 }.is_frame_local());
        assert!(VizError::OutOfOrderSample { time: 1.0, last: 2.0 }.is_frame_local());
        assert!(VizError::NonFiniteTime(f64::NAN).is_frame_local());
        assert!(!VizError::DuplicateSeries("power".into()).is_frame_local());
        assert!(!VizError::MissingSurface("canvas").is_frame_local());
    }

    #[test]
    fn test_messages() {
        let err = VizError::DirectionIndex { field: "selectedDirection", index: -1 };
        assert_eq!(
            err.to_string(),
            "direction index out of range for selectedDirection: -1 (must be 0..=12)"
        );
    }
}
