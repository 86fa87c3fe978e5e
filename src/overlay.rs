/*
 *  overlay.rs
 *
 *  micviz - directional mic debug view
 *  (c) 2020-26 Stuart Hunter
 *
 *  Telemetry text beside the clock face
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

use arrayvec::ArrayString;
use core::fmt::Write;

use crate::color::Color;
use crate::error::VizError;
use crate::frame::Frame;
use crate::geometry::Vec2;
use crate::surface::{RenderSurface, ShapeStyle};

const VAD_DOT_RADIUS: f32 = 8.0;

/// Column and row placement of the overlay text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayLayout {
    pub label_x: f32,
    pub value_x: f32,
    pub top_y: f32,
    pub line_height: f32,
}

impl Default for OverlayLayout {
    fn default() -> Self {
        Self { label_x: 250.0, value_x: 425.0, top_y: 25.0, line_height: 25.0 }
    }
}

/// Format a telemetry number without touching the heap
pub fn format_value(v: f64) -> ArrayString<32> {
    let mut buf = ArrayString::new();
    if write!(&mut buf, "{}", v).is_err() {
        // absurdly long representation, fall back to scientific
        buf.clear();
        let _ = write!(&mut buf, "{:e}", v);
    }
    buf
}

/// Renders confidence, delay, VAD, beat detector and trigger word lines
#[derive(Debug, Clone, Default)]
pub struct TelemetryOverlay {
    layout: OverlayLayout,
}

impl TelemetryOverlay {
    pub fn new(layout: OverlayLayout) -> Self {
        Self { layout }
    }

    pub fn draw<S: RenderSurface + ?Sized>(&self, surface: &mut S, frame: &Frame) -> Result<(), VizError> {
        let OverlayLayout { label_x, value_x, line_height, .. } = self.layout;
        let mut y = self.layout.top_y;

        self.row(surface, "Confidence : ", Some(frame.confidence), y)?;

        y += line_height;
        self.row(surface, "Delay Time (ms) : ", Some(frame.delay_time), y)?;

        // voice activity dot
        y += line_height;
        self.row(surface, "Voice Detected :", None, y)?;
        let vad_color = if frame.active_state { Color::Green } else { Color::Red };
        surface.circle(
            Vec2::new(value_x + 10.0, y + 11.0),
            VAD_DOT_RADIUS,
            ShapeStyle::filled(vad_color),
        )?;

        y += 2.0 * line_height;
        self.row(surface, "Beat Detector:", None, y)?;

        y += line_height;
        self.row(surface, "tempo (bpm) : ", Some(frame.beat_detector.tempo_bpm), y)?;

        y += line_height;
        self.row(surface, "confidence : ", Some(frame.beat_detector.confidence), y)?;

        if frame.trigger_detected {
            y += line_height;
            surface.text("Trigger Word Detected", Vec2::new(label_x, y), Color::Black)?;
        }

        Ok(())
    }

    fn row<S: RenderSurface + ?Sized>(
        &self,
        surface: &mut S,
        label: &str,
        value: Option<f64>,
        y: f32,
    ) -> Result<(), VizError> {
        surface.text(label, Vec2::new(self.layout.label_x, y), Color::Black)?;
        if let Some(v) = value {
            surface.text(&format_value(v), Vec2::new(self.layout.value_x, y), Color::Black)?;
        }
        Ok(())
    }
}
