/*
 *  plot.rs
 *
 *  micviz - directional mic debug view
 *  (c) 2020-26 Stuart Hunter
 *
 *  Line chart plotter (axes, grid, series, legend) on a framebuffer
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
    mono_font::{ascii::FONT_6X10, MonoTextStyle},
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{Line, Polyline, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};
use log::trace;
use serde::{Deserialize, Serialize};

use crate::chart::{AxisWindow, ChartSurface, SeriesPayload};
use crate::color::Color;
use crate::error::VizError;
use crate::vframebuf::VarFrameBuf;

const MARGIN_LEFT: i32 = 30;
const MARGIN_RIGHT: i32 = 10;
const MARGIN_TOP: i32 = 10;
const MARGIN_BOTTOM: i32 = 22;
const LINE_WIDTH: u32 = 2;
const LEGEND_SWATCH: u32 = 10;
const LEGEND_ROW: i32 = 14;

/// Corner the legend box is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    Ne,
    Nw,
    Se,
    Sw,
}

/// Static chart options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartOptions {
    pub show_legend: bool,
    pub legend_position: LegendPosition,
    pub y_min: f64,
    pub y_max: f64,
    pub y_ticks: Vec<f64>,
    /// number of x tick intervals
    pub x_ticks: u32,
    pub x_tick_decimals: usize,
    pub show_grid: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            show_legend: true,
            legend_position: LegendPosition::Sw,
            y_min: 0.0,
            y_max: 10.0,
            y_ticks: (0..=10).map(f64::from).collect(),
            x_ticks: 10,
            x_tick_decimals: 0,
            show_grid: true,
        }
    }
}

/// ChartSurface that rasterises into its own framebuffer
#[derive(Debug, Clone)]
pub struct PlotChart {
    framebuffer: VarFrameBuf<Rgb888>,
    options: ChartOptions,
    series: Vec<SeriesPayload>,
    axis: Option<AxisWindow>,
    redraws: usize,
}

impl PlotChart {
    pub fn new(width: u32, height: u32, options: ChartOptions) -> Self {
        Self {
            framebuffer: VarFrameBuf::new(width, height, Rgb888::WHITE),
            options,
            series: Vec::new(),
            axis: None,
            redraws: 0,
        }
    }

    pub fn framebuffer(&self) -> &VarFrameBuf<Rgb888> {
        &self.framebuffer
    }

    pub fn redraw_count(&self) -> usize {
        self.redraws
    }

    /// Count pixels of exactly `color`
    pub fn count_color(&self, color: Color) -> usize {
        let c = color.to_rgb888();
        self.framebuffer.as_slice().iter().filter(|&&p| p == c).count()
    }

    fn plot_area(&self) -> Rectangle {
        let w = self.framebuffer.width() as i32;
        let h = self.framebuffer.height() as i32;
        Rectangle::new(
            Point::new(MARGIN_LEFT, MARGIN_TOP),
            Size::new(
                (w - MARGIN_LEFT - MARGIN_RIGHT).max(1) as u32,
                (h - MARGIN_TOP - MARGIN_BOTTOM).max(1) as u32,
            ),
        )
    }

    fn map_x(&self, area: &Rectangle, axis: AxisWindow, t: f64) -> i32 {
        let span = (axis.max - axis.min).max(f64::EPSILON);
        area.top_left.x + (((t - axis.min) / span) * area.size.width as f64).round() as i32
    }

    fn map_y(&self, area: &Rectangle, v: f64) -> i32 {
        let span = (self.options.y_max - self.options.y_min).max(f64::EPSILON);
        let frac = (v - self.options.y_min) / span;
        area.top_left.y + ((1.0 - frac) * area.size.height as f64).round() as i32
    }

    fn draw_grid(&mut self, area: &Rectangle) -> Result<(), VizError> {
        let grid = PrimitiveStyle::with_stroke(Color::Grid.to_rgb888(), 1);
        let label_style = MonoTextStyle::new(&FONT_6X10, Rgb888::BLACK);
        let right = TextStyleBuilder::new().alignment(Alignment::Right).baseline(Baseline::Middle).build();
        let center = TextStyleBuilder::new().alignment(Alignment::Center).baseline(Baseline::Top).build();
        let bottom = area.top_left.y + area.size.height as i32;
        let far_right = area.top_left.x + area.size.width as i32;

        for tick in self.options.y_ticks.clone() {
            let y = self.map_y(area, tick);
            if self.options.show_grid {
                Line::new(Point::new(area.top_left.x, y), Point::new(far_right, y))
                    .into_styled(grid)
                    .draw(&mut self.framebuffer)
                    .map_err(|e| -> VizError { match e {} })?;
            }
            Text::with_text_style(&format!("{}", tick), Point::new(area.top_left.x - 4, y), label_style, right)
                .draw(&mut self.framebuffer)
                .map_err(|e| -> VizError { match e {} })?;
        }

        if let Some(axis) = self.axis {
            let n = self.options.x_ticks.max(1);
            for i in 0..=n {
                let t = axis.min + (axis.max - axis.min) * i as f64 / n as f64;
                let x = self.map_x(area, axis, t);
                if self.options.show_grid {
                    Line::new(Point::new(x, area.top_left.y), Point::new(x, bottom))
                        .into_styled(grid)
                        .draw(&mut self.framebuffer)
                        .map_err(|e| -> VizError { match e {} })?;
                }
                let label = format!("{:.*}", self.options.x_tick_decimals, t);
                Text::with_text_style(&label, Point::new(x, bottom + 3), label_style, center)
                    .draw(&mut self.framebuffer)
                    .map_err(|e| -> VizError { match e {} })?;
            }
        }

        (*area).into_styled(PrimitiveStyle::with_stroke(Rgb888::BLACK, 1))
            .draw(&mut self.framebuffer)
            .map_err(|e| -> VizError { match e {} })?;
        Ok(())
    }

    fn draw_series(&mut self, area: &Rectangle, axis: AxisWindow) -> Result<(), VizError> {
        for s in self.series.iter().filter(|s| s.show_line) {
            let points: Vec<Point> = s
                .points
                .iter()
                .map(|[t, v]| Point::new(self.map_x(area, axis, *t), self.map_y(area, *v)))
                .collect();
            let style = PrimitiveStyle::with_stroke(s.color.to_rgb888(), LINE_WIDTH);
            let mut clipped = self.framebuffer.clipped(area);
            match points.as_slice() {
                [] => {}
                // a lone sample still shows up as a dot
                [p] => Rectangle::with_center(*p, Size::new(LINE_WIDTH, LINE_WIDTH))
                    .into_styled(PrimitiveStyle::with_fill(s.color.to_rgb888()))
                    .draw(&mut clipped)
                    .map_err(|e| -> VizError { match e {} })?,
                pts => Polyline::new(pts)
                    .into_styled(style)
                    .draw(&mut clipped)
                    .map_err(|e| -> VizError { match e {} })?,
            }
        }
        Ok(())
    }

    fn draw_legend(&mut self, area: &Rectangle) -> Result<(), VizError> {
        let rows = self.series.len() as i32;
        if rows == 0 {
            return Ok(());
        }
        let text_style = MonoTextStyle::new(&FONT_6X10, Rgb888::BLACK);
        let widest = self.series.iter().map(|s| s.label.len()).max().unwrap_or(0) as i32;
        let box_w = LEGEND_SWATCH as i32 + 6 + widest * 6 + 6;
        let box_h = rows * LEGEND_ROW + 4;

        let left = area.top_left.x + 4;
        let right = area.top_left.x + area.size.width as i32 - box_w - 4;
        let top = area.top_left.y + 4;
        let bottom = area.top_left.y + area.size.height as i32 - box_h - 4;
        let origin = match self.options.legend_position {
            LegendPosition::Ne => Point::new(right, top),
            LegendPosition::Nw => Point::new(left, top),
            LegendPosition::Se => Point::new(right, bottom),
            LegendPosition::Sw => Point::new(left, bottom),
        };

        Rectangle::new(origin, Size::new(box_w as u32, box_h as u32))
            .into_styled(
                PrimitiveStyleBuilder::new()
                    .fill_color(Rgb888::WHITE)
                    .stroke_color(Rgb888::new(0xcc, 0xcc, 0xcc))
                    .stroke_width(1)
                    .build(),
            )
            .draw(&mut self.framebuffer)
            .map_err(|e| -> VizError { match e {} })?;

        for (row, s) in self.series.iter().enumerate() {
            let y = origin.y + 2 + row as i32 * LEGEND_ROW;
            let swatch = Rectangle::new(Point::new(origin.x + 3, y + 1), Size::new(LEGEND_SWATCH, LEGEND_SWATCH));
            if s.show_line {
                swatch
                    .into_styled(PrimitiveStyle::with_fill(s.color.to_rgb888()))
                    .draw(&mut self.framebuffer)
                    .map_err(|e| -> VizError { match e {} })?;
            } else {
                // struck-out empty box for hidden series
                swatch
                    .into_styled(PrimitiveStyle::with_stroke(Rgb888::BLACK, 1))
                    .draw(&mut self.framebuffer)
                    .map_err(|e| -> VizError { match e {} })?;
                let br = swatch.bottom_right().unwrap_or(swatch.top_left);
                Line::new(Point::new(swatch.top_left.x, br.y), Point::new(br.x, swatch.top_left.y))
                    .into_styled(PrimitiveStyle::with_stroke(Rgb888::BLACK, 1))
                    .draw(&mut self.framebuffer)
                    .map_err(|e| -> VizError { match e {} })?;
            }
            Text::with_baseline(
                &s.label,
                Point::new(origin.x + 3 + LEGEND_SWATCH as i32 + 4, y + 1),
                text_style,
                Baseline::Top,
            )
            .draw(&mut self.framebuffer)
            .map_err(|e| -> VizError { match e {} })?;
        }
        Ok(())
    }
}

impl ChartSurface for PlotChart {
    fn set_series(&mut self, series: &[SeriesPayload]) {
        self.series = series.to_vec();
    }

    fn set_axis_window(&mut self, window: AxisWindow) {
        self.axis = Some(window);
    }

    fn redraw(&mut self) -> Result<(), VizError> {
        self.framebuffer.clear_color(Rgb888::WHITE);
        let area = self.plot_area();
        self.draw_grid(&area)?;
        if let Some(axis) = self.axis {
            self.draw_series(&area, axis)?;
        }
        if self.options.show_legend {
            self.draw_legend(&area)?;
        }
        self.redraws += 1;
        trace!("Chart redraw #{} with {} series", self.redraws, self.series.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(show_line: bool) -> SeriesPayload {
        SeriesPayload {
            label: "Mic0 (back-left)".to_string(),
            color: Color::POWER,
            show_line,
            points: (0..30).map(|t| [t as f64, 2.0 + (t % 5) as f64]).collect(),
        }
    }

    fn chart_with(s: SeriesPayload) -> PlotChart {
        let mut chart = PlotChart::new(500, 370, ChartOptions::default());
        chart.set_series(&[s]);
        chart.set_axis_window(AxisWindow { min: -30.0, max: 30.1 });
        chart.redraw().unwrap();
        chart
    }

    #[test]
    fn test_visible_series_is_plotted() {
        let chart = chart_with(series(true));
        // line pixels plus the legend swatch
        assert!(chart.count_color(Color::POWER) > (LEGEND_SWATCH * LEGEND_SWATCH) as usize);
        assert_eq!(chart.redraw_count(), 1);
    }

    #[test]
    fn test_hidden_series_not_plotted() {
        let chart = chart_with(series(false));
        assert_eq!(chart.count_color(Color::POWER), 0);
    }

    #[test]
    fn test_no_axis_draws_frame_only() {
        let mut chart = PlotChart::new(200, 100, ChartOptions::default());
        chart.set_series(&[series(true)]);
        chart.redraw().unwrap();
        // legend swatch only
        assert_eq!(chart.count_color(Color::POWER), (LEGEND_SWATCH * LEGEND_SWATCH) as usize);
    }

    #[test]
    fn test_mapping_edges() {
        let chart = PlotChart::new(500, 370, ChartOptions::default());
        let area = chart.plot_area();
        let axis = AxisWindow { min: 0.0, max: 10.0 };
        assert_eq!(chart.map_x(&area, axis, 0.0), area.top_left.x);
        assert_eq!(chart.map_x(&area, axis, 10.0), area.top_left.x + area.size.width as i32);
        assert_eq!(chart.map_y(&area, 10.0), area.top_left.y);
        assert_eq!(chart.map_y(&area, 0.0), area.top_left.y + area.size.height as i32);
    }

    #[test]
    fn test_legend_position_parses() {
        let p: LegendPosition = serde_yaml::from_str("sw").unwrap();
        assert_eq!(p, LegendPosition::Sw);
    }
}
