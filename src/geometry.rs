/*
 *  geometry.rs
 *
 *  micviz - directional mic debug view
 *  (c) 2020-26 Stuart Hunter
 *
 *  Clock direction table
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

//! Unit vectors for the 12 clock positions plus the "unknown" direction.
//! Screen space: +x right, +y down. 12 o'clock is the robot's forward axis.

use core::ops::{Add, Mul};
use crate::error::VizError;

pub const NUM_DIRECTIONS: usize = 12;
pub const UNKNOWN_DIRECTION: u8 = NUM_DIRECTIONS as u8;

const COS_30: f32 = 0.866_025_4; // cos(30 degrees)
const SIN_30: f32 = 0.5; // sin(30 degrees)

/// 13th entry anchors the unknown direction dot at the center
const DIRECTION_VECTORS: [Vec2; NUM_DIRECTIONS + 1] = [
    Vec2::new(0.0, -1.0),      // 12 o'clock
    Vec2::new(SIN_30, -COS_30), // 1
    Vec2::new(COS_30, -SIN_30), // 2
    Vec2::new(1.0, 0.0),       // 3
    Vec2::new(COS_30, SIN_30),  // 4
    Vec2::new(SIN_30, COS_30),  // 5
    Vec2::new(0.0, 1.0),       // 6
    Vec2::new(-SIN_30, COS_30), // 7
    Vec2::new(-COS_30, SIN_30), // 8
    Vec2::new(-1.0, 0.0),      // 9
    Vec2::new(-COS_30, -SIN_30), // 10
    Vec2::new(-SIN_30, -COS_30), // 11
    Vec2::new(0.0, 0.0),       // unknown
];

/// Floating point 2D vector/point in surface coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Validated direction index, 0..=11 clock positions, 12 unknown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DirectionIndex(u8);

impl DirectionIndex {
    pub const UNKNOWN: DirectionIndex = DirectionIndex(UNKNOWN_DIRECTION);

    /// Checked constructor; `field` names the frame field for the error report.
    pub fn new(index: i64, field: &'static str) -> Result<Self, VizError> {
        if (0..=UNKNOWN_DIRECTION as i64).contains(&index) {
            Ok(DirectionIndex(index as u8))
        } else {
            Err(VizError::DirectionIndex { field, index })
        }
    }

    pub fn get(self) -> usize {
        self.0 as usize
    }

    /// Iterate the 12 clock positions (unknown excluded)
    pub fn clock_positions() -> impl Iterator<Item = DirectionIndex> {
        (0..UNKNOWN_DIRECTION).map(DirectionIndex)
    }
}

/// Unit vector for a validated direction.
pub fn vector_for(index: DirectionIndex) -> Vec2 {
    DIRECTION_VECTORS[index.get()]
}

/// Unit vector for a raw index, rejecting anything outside 0..=12.
pub fn vector_for_raw(index: i64) -> Result<Vec2, VizError> {
    DirectionIndex::new(index, "direction").map(vector_for)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_positions_are_unit_vectors() {
        for idx in DirectionIndex::clock_positions() {
            let v = vector_for(idx);
            assert!((v.length() - 1.0).abs() < 1e-6, "index {} has length {}", idx.get(), v.length());
        }
    }

    #[test]
    fn test_unknown_is_zero() {
        assert_eq!(vector_for(DirectionIndex::UNKNOWN), Vec2::new(0.0, 0.0));
        assert_eq!(vector_for_raw(12).unwrap(), Vec2::new(0.0, 0.0));
    }

    #[test]
    fn test_spacing_is_30_degrees_clockwise() {
        // clockwise on screen means the cross product of consecutive vectors is positive (y down)
        for i in 0..NUM_DIRECTIONS {
            let a = DIRECTION_VECTORS[i];
            let b = DIRECTION_VECTORS[(i + 1) % NUM_DIRECTIONS];
            let dot = a.x * b.x + a.y * b.y;
            let cross = a.x * b.y - a.y * b.x;
            assert!((dot - COS_30).abs() < 1e-5);
            assert!((cross - SIN_30).abs() < 1e-5);
        }
    }

    #[test]
    fn test_cardinal_directions() {
        assert_eq!(vector_for_raw(0).unwrap(), Vec2::new(0.0, -1.0));
        assert_eq!(vector_for_raw(3).unwrap(), Vec2::new(1.0, 0.0));
        assert_eq!(vector_for_raw(6).unwrap(), Vec2::new(0.0, 1.0));
        assert_eq!(vector_for_raw(9).unwrap(), Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(matches!(vector_for_raw(13), Err(VizError::DirectionIndex { index: 13, .. })));
        assert!(matches!(vector_for_raw(-1), Err(VizError::DirectionIndex { index: -1, .. })));
        assert!(matches!(
            DirectionIndex::new(99, "selectedDirection"),
            Err(VizError::DirectionIndex { field: "selectedDirection", index: 99 })
        ));
    }
}
