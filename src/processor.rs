/*
 *  processor.rs
 *
 *  micviz - directional mic debug view
 *  (c) 2020-26 Stuart Hunter
 *
 *  Per-frame pipeline: clock face, chart buffers, overlay, redraw
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

use log::{debug, info, warn};
use std::time::Duration;

use crate::chart::{ChartController, ChartSurface, DEFAULT_AXIS_PAD_SECS};
use crate::clock_face::{ClockFaceRenderer, ClockLayout};
use crate::color::Color;
use crate::error::VizError;
use crate::frame::Frame;
use crate::func_timer::FunctionTimer;
use crate::overlay::{OverlayLayout, TelemetryOverlay};
use crate::series::DEFAULT_WINDOW_SECS;
use crate::surface::RenderSurface;

pub const POWER_LABEL: &str = "Mic0 (back-left)";
pub const NOISE_FLOOR_LABEL: &str = "Mic0 Floor (back-left)";

// a frame should finish well inside one 10 Hz feed interval
const FRAME_BUDGET: Duration = Duration::from_millis(50);

/// Geometry and timing of the whole view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub clock: ClockLayout,
    pub overlay: OverlayLayout,
    pub window_secs: f64,
    pub axis_pad_secs: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            canvas_width: 500,
            canvas_height: 250,
            clock: ClockLayout::default(),
            overlay: OverlayLayout::default(),
            window_secs: DEFAULT_WINDOW_SECS,
            axis_pad_secs: DEFAULT_AXIS_PAD_SECS,
        }
    }
}

/// Outcome of one frame: the isolated errors it produced
#[derive(Debug, Default)]
pub struct FrameReport {
    pub rejected: Vec<VizError>,
    /// false when the frame time was rejected and the buffers left alone
    pub chart_updated: bool,
}

impl FrameReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// log10 of a signal magnitude; non-positive input is a domain error
pub fn log_magnitude(series: &str, value: f64) -> Result<f64, VizError> {
    if value > 0.0 && value.is_finite() {
        Ok(value.log10())
    } else {
        Err(VizError::Domain { series: series.to_string(), value })
    }
}

/// Owns the widget state and drives every component once per frame
pub struct FrameProcessor<S, C> {
    surface: S,
    chart: C,
    clock: ClockFaceRenderer,
    overlay: TelemetryOverlay,
    controller: ChartController,
    last_time: Option<f64>,
    frames: u64,
}

impl<S: RenderSurface, C: ChartSurface> FrameProcessor<S, C> {
    pub fn new(surface: S, chart: C, config: &ViewConfig) -> Self {
        Self {
            surface,
            chart,
            clock: ClockFaceRenderer::new(config.clock),
            overlay: TelemetryOverlay::new(config.overlay),
            controller: ChartController::new(config.window_secs, config.axis_pad_secs),
            last_time: None,
            frames: 0,
        }
    }

    /// One-time setup: empty clock face and the two chart series
    pub fn on_init(&mut self) -> Result<(), VizError> {
        self.surface.clear()?;
        self.clock.draw_face(&mut self.surface)?;
        self.controller.register_series(POWER_LABEL, Color::POWER, true)?;
        self.controller.register_series(NOISE_FLOOR_LABEL, Color::NOISE_FLOOR, true)?;
        info!("Frame processor initialised");
        Ok(())
    }

    /// Process one frame to completion.
    ///
    /// Data problems in the frame are logged, isolated and returned in the
    /// report. An `Err` means the surface or chart itself failed.
    pub fn on_frame(&mut self, frame: &Frame) -> Result<FrameReport, VizError> {
        let _timer = FunctionTimer::with_budget("on_frame", FRAME_BUDGET);
        let mut report = FrameReport::default();
        self.frames += 1;

        let time_ok = match self.check_time(frame.time) {
            Ok(()) => true,
            Err(e) => {
                warn!("Frame {}: {}; chart update dropped", self.frames, e);
                report.rejected.push(e);
                false
            }
        };

        self.surface.clear()?;
        self.clock.draw_face(&mut self.surface)?;
        report.rejected.extend(self.clock.draw_frame(&mut self.surface, frame)?);

        if time_ok {
            self.last_time = Some(frame.time);
            let samples = [
                (POWER_LABEL, frame.latest_power_value),
                (NOISE_FLOOR_LABEL, frame.latest_noise_floor),
            ];
            for (label, raw) in samples {
                let ingested = log_magnitude(label, raw)
                    .and_then(|value| self.controller.ingest_sample(label, frame.time, value));
                match ingested {
                    Ok(()) => {}
                    Err(e) if e.is_frame_local() => {
                        warn!("Frame {}: skipping sample: {}", self.frames, e);
                        report.rejected.push(e);
                    }
                    Err(e) => return Err(e),
                }
            }
            self.controller.update_axis_window(frame.time);
            report.chart_updated = true;
        }

        self.overlay.draw(&mut self.surface, frame)?;
        self.controller.render(&mut self.chart)?;

        debug!(
            "Frame {} t={} processed ({} rejected)",
            self.frames,
            frame.time,
            report.rejected.len()
        );
        Ok(report)
    }

    /// Reserved for animation independent of data frames
    pub fn on_tick(&mut self, _delta_secs: f64) {}

    /// Toggle a series from its legend label and redraw the chart
    pub fn on_legend_click(&mut self, label: &str) -> Result<bool, VizError> {
        self.controller.on_legend_click(label, &mut self.chart)
    }

    fn check_time(&self, time: f64) -> Result<(), VizError> {
        if !time.is_finite() {
            return Err(VizError::NonFiniteTime(time));
        }
        match self.last_time {
            Some(last) if time < last => Err(VizError::OutOfOrderSample { time, last }),
            _ => Ok(()),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn chart(&self) -> &C {
        &self.chart
    }

    pub fn controller(&self) -> &ChartController {
        &self.controller
    }

    pub fn last_time(&self) -> Option<f64> {
        self.last_time
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames
    }
}
