/*
 *  series.rs
 *
 *  micviz - directional mic debug view
 *  (c) 2020-26 Stuart Hunter
 *
 *  Sliding time window sample buffer
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

use std::collections::VecDeque;
use std::collections::vec_deque::Iter;

use crate::error::VizError;

/// Default window width in seconds
pub const DEFAULT_WINDOW_SECS: f64 = 60.0;

/// One (time, value) point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub time: f64,
    pub value: f64,
}

/// Time ordered samples bounded to a window of `width` seconds.
///
/// Samples are appended at the tail and evicted from the front only.
#[derive(Debug, Clone)]
pub struct TimeSeriesBuffer {
    samples: VecDeque<Sample>,
    width: f64,
}

impl TimeSeriesBuffer {
    pub fn new(width: f64) -> Self {
        Self { samples: VecDeque::new(), width }
    }

    /// Append at the tail. Equal times are allowed, earlier times are not.
    pub fn append(&mut self, time: f64, value: f64) -> Result<(), VizError> {
        if !time.is_finite() {
            return Err(VizError::NonFiniteTime(time));
        }
        if let Some(last) = self.samples.back() {
            if time < last.time {
                return Err(VizError::OutOfOrderSample { time, last: last.time });
            }
        }
        self.samples.push_back(Sample { time, value });
        Ok(())
    }

    /// Drop samples from the front while `cutoff - earliest > width`.
    /// Returns the number evicted.
    pub fn evict_older_than(&mut self, cutoff: f64) -> usize {
        let mut evicted = 0;
        while let Some(front) = self.samples.front() {
            if cutoff - front.time > self.width {
                self.samples.pop_front();
                evicted += 1;
            } else {
                break;
            }
        }
        evicted
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    pub fn earliest(&self) -> Option<&Sample> {
        self.samples.front()
    }

    /// Read-only view, oldest first. Clone the iterator to restart it.
    pub fn all(&self) -> Iter<'_, Sample> {
        self.samples.iter()
    }

    /// Time covered between earliest and latest sample
    pub fn span(&self) -> f64 {
        match (self.earliest(), self.latest()) {
            (Some(first), Some(last)) => last.time - first.time,
            _ => 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_keeps_order() {
        let mut buf = TimeSeriesBuffer::new(DEFAULT_WINDOW_SECS);
        buf.append(0.0, 1.0).unwrap();
        buf.append(1.0, 2.0).unwrap();
        buf.append(1.0, 3.0).unwrap(); // duplicate time is fine

        assert_eq!(buf.len(), 3);
        assert_eq!(buf.earliest(), Some(&Sample { time: 0.0, value: 1.0 }));
        assert_eq!(buf.latest(), Some(&Sample { time: 1.0, value: 3.0 }));
    }

    #[test]
    fn test_out_of_order_rejected() {
        let mut buf = TimeSeriesBuffer::new(DEFAULT_WINDOW_SECS);
        buf.append(5.0, 1.0).unwrap();
        let err = buf.append(4.0, 1.0).unwrap_err();
        assert!(matches!(err, VizError::OutOfOrderSample { time, last } if time == 4.0 && last == 5.0));
        assert_eq!(buf.len(), 1);
    }

    #[test]
    fn test_non_finite_time_rejected() {
        let mut buf = TimeSeriesBuffer::new(DEFAULT_WINDOW_SECS);
        assert!(matches!(buf.append(f64::NAN, 1.0), Err(VizError::NonFiniteTime(_))));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_eviction_bounds_span() {
        let mut buf = TimeSeriesBuffer::new(DEFAULT_WINDOW_SECS);
        for t in 0..70 {
            let t = t as f64;
            buf.append(t, t).unwrap();
            buf.evict_older_than(t);
            if buf.len() >= 2 {
                assert!(buf.span() <= DEFAULT_WINDOW_SECS);
            }
        }
        assert_eq!(buf.earliest().unwrap().time, 9.0);
        assert_eq!(buf.len(), 61);
    }

    #[test]
    fn test_eviction_irregular_steps() {
        let mut buf = TimeSeriesBuffer::new(10.0);
        let times = [0.0, 0.3, 0.3, 2.9, 7.5, 10.2, 10.25, 18.0, 31.0, 31.0, 44.4];
        for &t in &times {
            buf.append(t, 0.0).unwrap();
            buf.evict_older_than(t);
            assert!(buf.span() <= 10.0);
            assert_eq!(buf.latest().unwrap().time, t);
        }
        // both 31.0 samples fall outside the window at 44.4
        assert_eq!(buf.len(), 1);
    }

    #[test]
    fn test_boundary_sample_kept() {
        let mut buf = TimeSeriesBuffer::new(60.0);
        buf.append(0.0, 0.0).unwrap();
        buf.append(60.0, 0.0).unwrap();
        assert_eq!(buf.evict_older_than(60.0), 0);
        assert_eq!(buf.evict_older_than(60.5), 1);
    }

    #[test]
    fn test_all_is_restartable() {
        let mut buf = TimeSeriesBuffer::new(60.0);
        for t in 0..5 {
            buf.append(t as f64, t as f64 * 2.0).unwrap();
        }
        let view = buf.all();
        let first: Vec<f64> = view.clone().map(|s| s.value).collect();
        let second: Vec<f64> = view.map(|s| s.value).collect();
        assert_eq!(first, second);
        assert_eq!(first, vec![0.0, 2.0, 4.0, 6.0, 8.0]);
    }
}
