/*
 *  lib.rs
 *
 *  micviz - directional mic debug view
 *  (c) 2020-26 Stuart Hunter
 *
 *  Clock face of per-direction confidence, sliding-window power chart
 *  and telemetry overlay, driven one frame at a time
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

pub mod canvas;
pub mod chart;
pub mod clock_face;
pub mod color;
pub mod config;
pub mod error;
pub mod frame;
pub mod func_timer;
pub mod geometry;
pub mod legend;
pub mod overlay;
pub mod plot;
pub mod processor;
pub mod series;
pub mod surface;
pub mod vframebuf;
pub mod widget;

pub use chart::{AxisWindow, ChartController, ChartSurface, RecordingChart, SeriesPayload};
pub use color::Color;
pub use error::VizError;
pub use frame::Frame;
pub use geometry::{DirectionIndex, Vec2};
pub use processor::{FrameProcessor, FrameReport, ViewConfig, NOISE_FLOOR_LABEL, POWER_LABEL};
pub use surface::{RecordingSurface, RenderSurface};
pub use widget::{CanvasContainer, MicDataWidget, WidgetContainer};
