/*
 *  canvas.rs
 *
 *  micviz - directional mic debug view
 *  (c) 2020-26 Stuart Hunter
 *
 *  RenderSurface backed by an embedded-graphics framebuffer
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

use embedded_graphics::{
    mono_font::{ascii::FONT_10X20, MonoTextStyle},
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{Circle, Line, PrimitiveStyle, PrimitiveStyleBuilder},
    text::{Baseline, Text},
};

use crate::color::Color;
use crate::error::VizError;
use crate::geometry::Vec2;
use crate::surface::{RenderSurface, ShapeStyle};
use crate::vframebuf::VarFrameBuf;

#[inline]
pub(crate) fn to_point(v: Vec2) -> Point {
    Point::new(v.x.round() as i32, v.y.round() as i32)
}

/// Rasterising surface for the clock face and overlay
#[derive(Debug, Clone)]
pub struct CanvasSurface {
    framebuffer: VarFrameBuf<Rgb888>,
    background: Color,
}

impl CanvasSurface {
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        Self {
            framebuffer: VarFrameBuf::new(width, height, background.to_rgb888()),
            background,
        }
    }

    pub fn framebuffer(&self) -> &VarFrameBuf<Rgb888> {
        &self.framebuffer
    }

    /// Count pixels that differ from the background
    pub fn count_drawn_pixels(&self) -> usize {
        let bg = self.background.to_rgb888();
        self.framebuffer.as_slice().iter().filter(|&&p| p != bg).count()
    }
}

impl RenderSurface for CanvasSurface {
    fn dimensions(&self) -> (u32, u32) {
        (self.framebuffer.width() as u32, self.framebuffer.height() as u32)
    }

    fn clear(&mut self) -> Result<(), VizError> {
        self.framebuffer.clear_color(self.background.to_rgb888());
        Ok(())
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Color, width: u32) -> Result<(), VizError> {
        Line::new(to_point(from), to_point(to))
            .into_styled(PrimitiveStyle::with_stroke(color.to_rgb888(), width))
            .draw(&mut self.framebuffer)
            .map_err(|e| -> VizError { match e {} })?;
        Ok(())
    }

    fn circle(&mut self, center: Vec2, radius: f32, style: ShapeStyle) -> Result<(), VizError> {
        let mut builder = PrimitiveStyleBuilder::new();
        if let Some(fill) = style.fill {
            builder = builder.fill_color(fill.to_rgb888());
        }
        if let Some(stroke) = style.stroke {
            builder = builder
                .stroke_color(stroke.to_rgb888())
                .stroke_width(style.stroke_width);
        }
        let diameter = (radius * 2.0).round().max(0.0) as u32;
        Circle::with_center(to_point(center), diameter)
            .into_styled(builder.build())
            .draw(&mut self.framebuffer)
            .map_err(|e| -> VizError { match e {} })?;
        Ok(())
    }

    fn text(&mut self, text: &str, top_left: Vec2, color: Color) -> Result<(), VizError> {
        let style = MonoTextStyle::new(&FONT_10X20, color.to_rgb888());
        Text::with_baseline(text, to_point(top_left), style, Baseline::Top)
            .draw(&mut self.framebuffer)
            .map_err(|e| -> VizError { match e {} })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_restores_background() {
        let mut canvas = CanvasSurface::new(64, 32, Color::White);
        canvas
            .line(Vec2::new(0.0, 0.0), Vec2::new(20.0, 20.0), Color::Black, 2)
            .unwrap();
        assert!(canvas.count_drawn_pixels() > 0);

        canvas.clear().unwrap();
        assert_eq!(canvas.count_drawn_pixels(), 0);
    }

    #[test]
    fn test_filled_circle_center_pixel() {
        let mut canvas = CanvasSurface::new(64, 64, Color::White);
        canvas
            .circle(Vec2::new(32.0, 32.0), 8.0, ShapeStyle::filled(Color::Red))
            .unwrap();
        assert_eq!(canvas.framebuffer().pixel(32, 32), Some(Rgb888::new(255, 0, 0)));
        assert_eq!(canvas.framebuffer().pixel(0, 0), Some(Rgb888::new(255, 255, 255)));
    }

    #[test]
    fn test_text_draws_pixels() {
        let mut canvas = CanvasSurface::new(200, 40, Color::White);
        canvas.text("Confidence : ", Vec2::new(2.0, 2.0), Color::Black).unwrap();
        assert!(canvas.count_drawn_pixels() > 0);
    }

    #[test]
    fn test_to_point_rounds() {
        assert_eq!(to_point(Vec2::new(1.4, 2.6)), Point::new(1, 3));
        assert_eq!(to_point(Vec2::new(-0.6, 0.5)), Point::new(-1, 1));
    }
}
