/*
 *  chart.rs
 *
 *  micviz - directional mic debug view
 *  (c) 2020-26 Stuart Hunter
 *
 *  Series ownership, visibility and axis window for the power chart
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

use log::{debug, info};

use crate::color::Color;
use crate::error::VizError;
use crate::series::TimeSeriesBuffer;

/// Default right-edge pad so the newest point is never clipped
pub const DEFAULT_AXIS_PAD_SECS: f64 = 0.1;

/// Horizontal (time) axis bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisWindow {
    pub min: f64,
    pub max: f64,
}

/// A named, independently toggleable chart line
#[derive(Debug, Clone)]
pub struct Series {
    pub label: String,
    pub color: Color,
    pub visible: bool,
    pub buffer: TimeSeriesBuffer,
}

/// What the charting collaborator receives for one series
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPayload {
    pub label: String,
    pub color: Color,
    /// false keeps the legend entry but suppresses the line
    pub show_line: bool,
    pub points: Vec<[f64; 2]>,
}

/// Charting collaborator capability
///
/// The controller hands over the full series array and axis bounds, then
/// asks for a redraw. Implementations own the actual plotting.
pub trait ChartSurface {
    fn set_series(&mut self, series: &[SeriesPayload]);

    fn set_axis_window(&mut self, window: AxisWindow);

    fn redraw(&mut self) -> Result<(), VizError>;
}

/// Owns the chart series and axis state
#[derive(Debug, Clone)]
pub struct ChartController {
    series: Vec<Series>,
    window_secs: f64,
    pad_secs: f64,
    axis: Option<AxisWindow>,
}

impl ChartController {
    pub fn new(window_secs: f64, pad_secs: f64) -> Self {
        Self {
            series: Vec::new(),
            window_secs,
            pad_secs,
            axis: None,
        }
    }

    /// Add an empty series. Labels must be unique.
    pub fn register_series(
        &mut self,
        label: &str,
        color: Color,
        initially_visible: bool,
    ) -> Result<(), VizError> {
        if self.find(label).is_some() {
            return Err(VizError::DuplicateSeries(label.to_string()));
        }
        info!("Registering chart series '{}'", label);
        self.series.push(Series {
            label: label.to_string(),
            color,
            visible: initially_visible,
            buffer: TimeSeriesBuffer::new(self.window_secs),
        });
        Ok(())
    }

    /// Append to the named series and evict anything outside the window.
    ///
    /// An unregistered label is a wiring bug and reported as such.
    pub fn ingest_sample(&mut self, label: &str, time: f64, value: f64) -> Result<(), VizError> {
        let idx = self
            .find(label)
            .ok_or_else(|| VizError::UnknownSeries(label.to_string()))?;
        let buffer = &mut self.series[idx].buffer;
        buffer.append(time, value)?;
        let evicted = buffer.evict_older_than(time);
        if evicted > 0 {
            debug!("Evicted {} samples from '{}'", evicted, label);
        }
        Ok(())
    }

    /// Flip visibility; unknown labels are ignored. Returns the new state.
    pub fn toggle_visibility(&mut self, label: &str) -> Option<bool> {
        let idx = self.find(label)?;
        let series = &mut self.series[idx];
        series.visible = !series.visible;
        debug!("Series '{}' visible: {}", label, series.visible);
        Some(series.visible)
    }

    /// `[latest - W, latest + pad]`
    pub fn current_axis_window(&self, latest_time: f64) -> AxisWindow {
        let min = latest_time - self.window_secs;
        AxisWindow { min, max: min + self.window_secs + self.pad_secs }
    }

    /// Recompute and remember the axis window for the next render
    pub fn update_axis_window(&mut self, latest_time: f64) -> AxisWindow {
        let window = self.current_axis_window(latest_time);
        self.axis = Some(window);
        window
    }

    pub fn axis_window(&self) -> Option<AxisWindow> {
        self.axis
    }

    /// Series array as the collaborator sees it, hidden ones included
    pub fn payload(&self) -> Vec<SeriesPayload> {
        self.series
            .iter()
            .map(|s| SeriesPayload {
                label: s.label.clone(),
                color: s.color,
                show_line: s.visible,
                points: s.buffer.all().map(|p| [p.time, p.value]).collect(),
            })
            .collect()
    }

    /// Hand series and axis to the collaborator and redraw
    pub fn render<C: ChartSurface + ?Sized>(&self, chart: &mut C) -> Result<(), VizError> {
        chart.set_series(&self.payload());
        if let Some(axis) = self.axis {
            chart.set_axis_window(axis);
        }
        chart.redraw()
    }

    /// Legend click: look the label up, toggle, re-render.
    /// Returns false when the label is not a known series.
    pub fn on_legend_click<C: ChartSurface + ?Sized>(
        &mut self,
        label: &str,
        chart: &mut C,
    ) -> Result<bool, VizError> {
        if self.toggle_visibility(label).is_none() {
            return Ok(false);
        }
        self.render(chart)?;
        Ok(true)
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    pub fn get(&self, label: &str) -> Option<&Series> {
        self.find(label).map(|i| &self.series[i])
    }

    // linear scan, the series count is small and fixed
    fn find(&self, label: &str) -> Option<usize> {
        self.series.iter().position(|s| s.label == label)
    }
}

/// Chart collaborator that records what it was handed
#[derive(Debug, Clone, Default)]
pub struct RecordingChart {
    pub series: Vec<SeriesPayload>,
    pub axis: Option<AxisWindow>,
    pub redraw_count: usize,
}

impl ChartSurface for RecordingChart {
    fn set_series(&mut self, series: &[SeriesPayload]) {
        self.series = series.to_vec();
    }

    fn set_axis_window(&mut self, window: AxisWindow) {
        self.axis = Some(window);
    }

    fn redraw(&mut self) -> Result<(), VizError> {
        self.redraw_count += 1;
        Ok(())
    }
}
