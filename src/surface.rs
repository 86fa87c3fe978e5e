/*
 *  surface.rs
 *
 *  micviz - directional mic debug view
 *  (c) 2020-26 Stuart Hunter
 *
 *  Drawing surface abstraction
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

use crate::color::Color;
use crate::error::VizError;
use crate::geometry::Vec2;

/// Fill/stroke description for closed shapes
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShapeStyle {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: u32,
}

impl ShapeStyle {
    pub fn filled(color: Color) -> Self {
        Self { fill: Some(color), stroke: None, stroke_width: 0 }
    }

    pub fn stroked(color: Color, width: u32) -> Self {
        Self { fill: None, stroke: Some(color), stroke_width: width }
    }

    pub fn with_fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }
}

/// Minimal 2D drawing capability the renderers need
///
/// Coordinates are surface pixels with the origin at the top-left and
/// y growing downward. Implementations decide how to rasterise; the
/// renderers never depend on a concrete graphics library.
pub trait RenderSurface {
    /// Surface dimensions as (width, height)
    fn dimensions(&self) -> (u32, u32);

    /// Reset the whole surface to its background
    fn clear(&mut self) -> Result<(), VizError>;

    /// Straight line segment
    fn line(&mut self, from: Vec2, to: Vec2, color: Color, width: u32) -> Result<(), VizError>;

    /// Circle centered on `center`
    fn circle(&mut self, center: Vec2, radius: f32, style: ShapeStyle) -> Result<(), VizError>;

    /// Text with its top-left corner at `top_left`
    fn text(&mut self, text: &str, top_left: Vec2, color: Color) -> Result<(), VizError>;
}

/// One recorded drawing call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear,
    Line { from: Vec2, to: Vec2, color: Color, width: u32 },
    Circle { center: Vec2, radius: f32, style: ShapeStyle },
    Text { text: String, top_left: Vec2, color: Color },
}

/// Surface that records every call instead of rasterising
///
/// Useful for:
/// - Unit tests of the renderers
/// - Headless runs where only the geometry matters
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    ops: Vec<DrawOp>,
    /// Simulate failures (for error testing)
    pub simulate_failure: bool,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, ops: Vec::new(), simulate_failure: false }
    }

    /// Operations recorded since the last `clear`
    pub fn ops(&self) -> &[DrawOp] {
        match self.ops.iter().rposition(|op| *op == DrawOp::Clear) {
            Some(pos) => &self.ops[pos + 1..],
            None => &self.ops,
        }
    }

    /// Every operation ever recorded, clears included
    pub fn history(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops().iter().filter(|op| matches!(op, DrawOp::Line { .. }))
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops().iter().filter(|op| matches!(op, DrawOp::Circle { .. }))
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops().iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    fn record(&mut self, op: DrawOp) -> Result<(), VizError> {
        if self.simulate_failure {
            return Err(VizError::Drawing("simulated surface failure".to_string()));
        }
        self.ops.push(op);
        Ok(())
    }
}

impl RenderSurface for RecordingSurface {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self) -> Result<(), VizError> {
        self.record(DrawOp::Clear)
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Color, width: u32) -> Result<(), VizError> {
        self.record(DrawOp::Line { from, to, color, width })
    }

    fn circle(&mut self, center: Vec2, radius: f32, style: ShapeStyle) -> Result<(), VizError> {
        self.record(DrawOp::Circle { center, radius, style })
    }

    fn text(&mut self, text: &str, top_left: Vec2, color: Color) -> Result<(), VizError> {
        self.record(DrawOp::Text { text: text.to_string(), top_left, color })
    }
}
