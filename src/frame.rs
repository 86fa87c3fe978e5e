/*
 *  frame.rs
 *
 *  micviz - directional mic debug view
 *  (c) 2020-26 Stuart Hunter
 *
 *  Mic telemetry frame as delivered by the engine
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

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::VizError;
use crate::geometry::NUM_DIRECTIONS;

/// Beat detector block of a frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BeatDetector {
    #[serde(default)]
    pub tempo_bpm: f64,
    #[serde(default)]
    pub confidence: f64,
}

/// One timestamped snapshot of directional-microphone telemetry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    /// seconds, non-decreasing across frames
    pub time: f64,
    /// confidence per clock position
    pub directions: [f64; NUM_DIRECTIONS],
    pub max_confidence: f64,
    /// strongest detected direction, 12 = unknown
    pub direction: i64,
    /// beamforming selected direction, 12 = unknown
    pub selected_direction: i64,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub delay_time: f64,
    #[serde(default, deserialize_with = "truthy")]
    pub active_state: bool,
    #[serde(default)]
    pub beat_detector: BeatDetector,
    #[serde(default, deserialize_with = "truthy")]
    pub trigger_detected: bool,
    #[serde(deserialize_with = "number_or_string")]
    pub latest_power_value: f64,
    #[serde(deserialize_with = "number_or_string")]
    pub latest_noise_floor: f64,
}

impl Frame {
    /// Parse a single JSON document (one line of the feed)
    pub fn from_json(s: &str) -> Result<Self, VizError> {
        Ok(serde_json::from_str(s)?)
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            time: 0.0,
            directions: [0.0; NUM_DIRECTIONS],
            max_confidence: 1.0,
            direction: 12,
            selected_direction: 12,
            confidence: 0.0,
            delay_time: 0.0,
            active_state: false,
            beat_detector: BeatDetector::default(),
            trigger_detected: false,
            latest_power_value: 1.0,
            latest_noise_floor: 1.0,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

/// The engine sometimes stringifies power values
fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => s.trim().parse::<f64>().map_err(serde::de::Error::custom),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BoolOrNumber {
    Bool(bool),
    Number(f64),
}

/// Flags arrive as either JSON booleans or 0/1
fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match BoolOrNumber::deserialize(deserializer)? {
        BoolOrNumber::Bool(b) => b,
        BoolOrNumber::Number(n) => n != 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "time": 12.5,
        "directions": [5, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1.5],
        "maxConfidence": 10,
        "direction": 0,
        "selectedDirection": 11,
        "confidence": 4,
        "delayTime": 21,
        "activeState": 1,
        "beatDetector": { "tempo_bpm": 120.5, "confidence": 0.75 },
        "triggerDetected": false,
        "latestPowerValue": 100,
        "latestNoiseFloor": "10.0"
    }"#;

    #[test]
    fn test_parse_full_frame() {
        let f = Frame::from_json(SAMPLE).unwrap();
        assert_eq!(f.time, 12.5);
        assert_eq!(f.directions[0], 5.0);
        assert_eq!(f.directions[11], 1.5);
        assert_eq!(f.max_confidence, 10.0);
        assert_eq!(f.selected_direction, 11);
        assert!(f.active_state);
        assert!(!f.trigger_detected);
        assert_eq!(f.beat_detector.tempo_bpm, 120.5);
        assert_eq!(f.latest_power_value, 100.0);
        assert_eq!(f.latest_noise_floor, 10.0);
    }

    #[test]
    fn test_optional_fields_default() {
        let json = r#"{"time":0,"directions":[0,0,0,0,0,0,0,0,0,0,0,0],"maxConfidence":1,
            "direction":12,"selectedDirection":12,"latestPowerValue":1,"latestNoiseFloor":1}"#;
        let f = Frame::from_json(json).unwrap();
        assert!(!f.active_state);
        assert!(!f.trigger_detected);
        assert_eq!(f.beat_detector, BeatDetector::default());
    }

    #[test]
    fn test_wrong_direction_count_rejected() {
        let json = r#"{"time":0,"directions":[0,0,0],"maxConfidence":1,
            "direction":0,"selectedDirection":0,"latestPowerValue":1,"latestNoiseFloor":1}"#;
        assert!(matches!(Frame::from_json(json), Err(VizError::Json(_))));
    }

    #[test]
    fn test_bad_numeric_string_rejected() {
        let json = SAMPLE.replace(r#""10.0""#, r#""loud""#);
        assert!(Frame::from_json(&json).is_err());
    }
}
