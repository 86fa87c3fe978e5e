/*
 *  clock_face.rs
 *
 *  micviz - directional mic debug view
 *  (c) 2020-26 Stuart Hunter
 *
 *  Polar clock face: confidence bars and direction markers
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

use log::{debug, warn};

use crate::color::Color;
use crate::error::VizError;
use crate::frame::Frame;
use crate::geometry::{vector_for, DirectionIndex, Vec2};
use crate::surface::{RenderSurface, ShapeStyle};

const FACE_STROKE_WIDTH: u32 = 5;
const CENTER_DOT_RADIUS: f32 = 2.0;
const BAR_WIDTH: u32 = 2;
const PRIMARY_MARKER_RADIUS: f32 = 8.0;
const SECONDARY_MARKER_RADIUS: f32 = 5.0;

/// Placement of the clock face on the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockLayout {
    pub center: Vec2,
    pub radius: f32,
}

impl Default for ClockLayout {
    fn default() -> Self {
        Self { center: Vec2::new(125.0, 125.0), radius: 100.0 }
    }
}

/// Draws the clock face and per-frame direction data
#[derive(Debug, Clone)]
pub struct ClockFaceRenderer {
    layout: ClockLayout,
}

impl ClockFaceRenderer {
    pub fn new(layout: ClockLayout) -> Self {
        Self { layout }
    }

    /// Outlined, filled circle with a small center dot. Does not clear.
    pub fn draw_face<S: RenderSurface + ?Sized>(&self, surface: &mut S) -> Result<(), VizError> {
        let ClockLayout { center, radius } = self.layout;
        surface.circle(
            center,
            radius,
            ShapeStyle::stroked(Color::Blue, FACE_STROKE_WIDTH).with_fill(Color::White),
        )?;
        surface.circle(center, CENTER_DOT_RADIUS, ShapeStyle::filled(Color::Black))
    }

    /// End point of the bar for `index` at `ratio` of the radius
    pub fn bar_end(&self, index: DirectionIndex, ratio: f32) -> Vec2 {
        self.layout.center + vector_for(index) * (ratio * self.layout.radius)
    }

    /// Marker position on the rim (center for the unknown direction)
    pub fn marker_position(&self, index: DirectionIndex) -> Vec2 {
        self.bar_end(index, 1.0)
    }

    /// Confidence bars, then the strongest-direction marker, then the
    /// beamformed-direction marker.
    ///
    /// Bad marker indices are isolated: the affected marker is skipped and
    /// the error returned in the list; everything else is still drawn.
    /// Only surface failures abort.
    pub fn draw_frame<S: RenderSurface + ?Sized>(
        &self,
        surface: &mut S,
        frame: &Frame,
    ) -> Result<Vec<VizError>, VizError> {
        let mut rejected = Vec::new();

        if frame.max_confidence > 0.0 && frame.max_confidence.is_finite() {
            for idx in DirectionIndex::clock_positions() {
                let conf = frame.directions[idx.get()];
                if conf > 0.0 {
                    let ratio = (conf / frame.max_confidence) as f32;
                    surface.line(self.layout.center, self.bar_end(idx, ratio), Color::Black, BAR_WIDTH)?;
                }
            }
        } else {
            debug!("maxConfidence {} unusable, no bars this frame", frame.max_confidence);
        }

        let markers = [
            ("direction", frame.direction, PRIMARY_MARKER_RADIUS, Color::Red),
            ("selectedDirection", frame.selected_direction, SECONDARY_MARKER_RADIUS, Color::Green),
        ];
        for (field, raw, radius, color) in markers {
            match DirectionIndex::new(raw, field) {
                Ok(idx) => {
                    surface.circle(self.marker_position(idx), radius, ShapeStyle::filled(color))?;
                }
                Err(e) => {
                    warn!("Skipping {} marker: {}", field, e);
                    rejected.push(e);
                }
            }
        }

        Ok(rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::CanvasSurface;
    use crate::surface::{DrawOp, RecordingSurface};

    fn frame_with(directions: [f64; 12], max: f64, dir: i64, sel: i64) -> Frame {
        Frame {
            directions,
            max_confidence: max,
            direction: dir,
            selected_direction: sel,
            ..Frame::default()
        }
    }

    fn close(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3
    }

    #[test]
    fn test_face_ops() {
        let renderer = ClockFaceRenderer::new(ClockLayout::default());
        let mut s = RecordingSurface::new(500, 250);
        renderer.draw_face(&mut s).unwrap();

        let circles: Vec<_> = s.circles().collect();
        assert_eq!(circles.len(), 2);
        assert!(matches!(circles[0], DrawOp::Circle { radius, style, .. }
            if *radius == 100.0 && style.stroke == Some(Color::Blue) && style.fill == Some(Color::White)));
        assert!(matches!(circles[1], DrawOp::Circle { radius, .. } if *radius == 2.0));
    }

    #[test]
    fn test_face_is_idempotent() {
        let renderer = ClockFaceRenderer::new(ClockLayout::default());
        let mut once = CanvasSurface::new(500, 250, Color::White);
        renderer.draw_face(&mut once).unwrap();

        let mut twice = CanvasSurface::new(500, 250, Color::White);
        renderer.draw_face(&mut twice).unwrap();
        renderer.draw_face(&mut twice).unwrap();

        assert_eq!(once.framebuffer(), twice.framebuffer());
    }

    #[test]
    fn test_half_length_bar() {
        let renderer = ClockFaceRenderer::new(ClockLayout::default());
        let mut s = RecordingSurface::new(500, 250);
        let mut dirs = [0.0; 12];
        dirs[0] = 5.0;
        let rejected = renderer.draw_frame(&mut s, &frame_with(dirs, 10.0, 0, 0)).unwrap();
        assert!(rejected.is_empty());

        let lines: Vec<_> = s.lines().collect();
        assert_eq!(lines.len(), 1);
        match lines[0] {
            DrawOp::Line { from, to, .. } => {
                assert!(close(*from, Vec2::new(125.0, 125.0)));
                assert!(close(*to, Vec2::new(125.0, 75.0)));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_no_bars_but_markers() {
        let renderer = ClockFaceRenderer::new(ClockLayout::default());
        let mut s = RecordingSurface::new(500, 250);
        renderer.draw_frame(&mut s, &frame_with([0.0; 12], 10.0, 3, 9)).unwrap();

        assert_eq!(s.lines().count(), 0);
        let circles: Vec<_> = s.circles().collect();
        assert_eq!(circles.len(), 2);
        assert!(matches!(circles[0], DrawOp::Circle { center, radius, style }
            if close(*center, Vec2::new(225.0, 125.0)) && *radius == 8.0 && style.fill == Some(Color::Red)));
        assert!(matches!(circles[1], DrawOp::Circle { center, radius, style }
            if close(*center, Vec2::new(25.0, 125.0)) && *radius == 5.0 && style.fill == Some(Color::Green)));
    }

    #[test]
    fn test_zero_max_confidence_skips_bars() {
        let renderer = ClockFaceRenderer::new(ClockLayout::default());
        let mut s = RecordingSurface::new(500, 250);
        let rejected = renderer.draw_frame(&mut s, &frame_with([3.0; 12], 0.0, 1, 2)).unwrap();
        assert!(rejected.is_empty());
        assert_eq!(s.lines().count(), 0);
        assert_eq!(s.circles().count(), 2);
    }

    #[test]
    fn test_unknown_direction_at_center() {
        let renderer = ClockFaceRenderer::new(ClockLayout::default());
        let mut s = RecordingSurface::new(500, 250);
        renderer.draw_frame(&mut s, &frame_with([0.0; 12], 1.0, 12, 0)).unwrap();
        let circles: Vec<_> = s.circles().collect();
        assert!(matches!(circles[0], DrawOp::Circle { center, .. } if close(*center, Vec2::new(125.0, 125.0))));
    }

    #[test]
    fn test_bad_index_isolated() {
        let renderer = ClockFaceRenderer::new(ClockLayout::default());
        let mut s = RecordingSurface::new(500, 250);
        let mut dirs = [0.0; 12];
        dirs[4] = 1.0;
        let rejected = renderer.draw_frame(&mut s, &frame_with(dirs, 1.0, 13, 6)).unwrap();

        assert_eq!(rejected.len(), 1);
        assert!(matches!(rejected[0], VizError::DirectionIndex { field: "direction", index: 13 }));
        // bar and the secondary marker survive
        assert_eq!(s.lines().count(), 1);
        let circles: Vec<_> = s.circles().collect();
        assert_eq!(circles.len(), 1);
        assert!(matches!(circles[0], DrawOp::Circle { radius, .. } if *radius == 5.0));
    }

    #[test]
    fn test_surface_failure_propagates() {
        let renderer = ClockFaceRenderer::new(ClockLayout::default());
        let mut s = RecordingSurface::new(500, 250);
        s.simulate_failure = true;
        assert!(renderer.draw_face(&mut s).is_err());
    }
}
