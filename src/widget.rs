/*
 *  widget.rs
 *
 *  micviz - directional mic debug view
 *  (c) 2020-26 Stuart Hunter
 *
 *  Widget lifecycle and the container that hands it surfaces
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

use log::info;

use crate::canvas::CanvasSurface;
use crate::chart::ChartSurface;
use crate::color::Color;
use crate::error::VizError;
use crate::frame::Frame;
use crate::legend::{label_markup, STYLES};
use crate::plot::{ChartOptions, PlotChart};
use crate::processor::{FrameProcessor, FrameReport, ViewConfig};
use crate::surface::RenderSurface;

/// Host side of the widget: provides the drawing surfaces on init
pub trait WidgetContainer {
    type Surface: RenderSurface;
    type Chart: ChartSurface;

    /// Canvas for the clock face and overlay
    fn attach_canvas(&mut self, width: u32, height: u32) -> Result<Self::Surface, VizError>;

    /// Chart collaborator inside the chart container
    fn attach_chart(&mut self) -> Result<Self::Chart, VizError>;
}

/// Directional mic debug widget
pub struct MicDataWidget<S, C> {
    processor: FrameProcessor<S, C>,
}

impl<S: RenderSurface, C: ChartSurface> MicDataWidget<S, C> {
    /// Attach to the container's surfaces, draw the empty face and
    /// register the chart series. Any failure here is fatal.
    pub fn init<W>(container: &mut W, config: &ViewConfig) -> Result<Self, VizError>
    where
        W: WidgetContainer<Surface = S, Chart = C>,
    {
        let surface = container.attach_canvas(config.canvas_width, config.canvas_height)?;
        let chart = container.attach_chart()?;
        let mut processor = FrameProcessor::new(surface, chart, config);
        processor.on_init()?;
        info!("Mic data widget ready ({}x{})", config.canvas_width, config.canvas_height);
        Ok(Self { processor })
    }

    pub fn on_data(&mut self, frame: &Frame) -> Result<FrameReport, VizError> {
        self.processor.on_frame(frame)
    }

    pub fn update(&mut self, delta_secs: f64) {
        self.processor.on_tick(delta_secs);
    }

    pub fn get_styles() -> &'static str {
        STYLES
    }

    pub fn on_legend_click(&mut self, label: &str) -> Result<bool, VizError> {
        self.processor.on_legend_click(label)
    }

    /// Legend labels for the current series state
    pub fn legend_markup(&self) -> Vec<String> {
        self.processor.controller().payload().iter().map(label_markup).collect()
    }

    pub fn processor(&self) -> &FrameProcessor<S, C> {
        &self.processor
    }
}

/// Offscreen container: a white canvas plus a rasterised chart
#[derive(Debug, Clone)]
pub struct CanvasContainer {
    chart_width: u32,
    chart_height: u32,
    options: ChartOptions,
}

impl CanvasContainer {
    pub fn new(chart_width: u32, chart_height: u32, options: ChartOptions) -> Self {
        Self { chart_width, chart_height, options }
    }
}

impl Default for CanvasContainer {
    fn default() -> Self {
        Self::new(500, 370, ChartOptions::default())
    }
}

impl WidgetContainer for CanvasContainer {
    type Surface = CanvasSurface;
    type Chart = PlotChart;

    fn attach_canvas(&mut self, width: u32, height: u32) -> Result<CanvasSurface, VizError> {
        if width == 0 || height == 0 {
            return Err(VizError::MissingSurface("canvas"));
        }
        Ok(CanvasSurface::new(width, height, Color::White))
    }

    fn attach_chart(&mut self) -> Result<PlotChart, VizError> {
        if self.chart_width == 0 || self.chart_height == 0 {
            return Err(VizError::MissingSurface("chart"));
        }
        Ok(PlotChart::new(self.chart_width, self.chart_height, self.options.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::RecordingChart;
    use crate::processor::POWER_LABEL;
    use crate::surface::RecordingSurface;

    struct TestContainer {
        with_chart: bool,
    }

    impl WidgetContainer for TestContainer {
        type Surface = RecordingSurface;
        type Chart = RecordingChart;

        fn attach_canvas(&mut self, width: u32, height: u32) -> Result<RecordingSurface, VizError> {
            Ok(RecordingSurface::new(width, height))
        }

        fn attach_chart(&mut self) -> Result<RecordingChart, VizError> {
            if self.with_chart {
                Ok(RecordingChart::default())
            } else {
                Err(VizError::MissingSurface("chart"))
            }
        }
    }

    #[test]
    fn test_init_uses_canvas_size() {
        let w = MicDataWidget::init(&mut TestContainer { with_chart: true }, &ViewConfig::default()).unwrap();
        assert_eq!(w.processor().surface().dimensions(), (500, 250));
    }

    #[test]
    fn test_missing_chart_is_fatal() {
        let r = MicDataWidget::init(&mut TestContainer { with_chart: false }, &ViewConfig::default());
        assert!(matches!(r, Err(VizError::MissingSurface("chart"))));
    }

    #[test]
    fn test_legend_click_updates_markup() {
        let mut w = MicDataWidget::init(&mut TestContainer { with_chart: true }, &ViewConfig::default()).unwrap();
        assert!(w.legend_markup()[0].contains("legendLabelBoxFill"));

        assert!(w.on_legend_click(POWER_LABEL).unwrap());
        assert!(w.legend_markup()[0].contains("legendLabelBoxUnused"));
        assert_eq!(w.processor().chart().redraw_count, 1);

        assert!(!w.on_legend_click("Mic7").unwrap());
        assert_eq!(w.processor().chart().redraw_count, 1);
    }

    #[test]
    fn test_canvas_container_rejects_empty_sizes() {
        let mut c = CanvasContainer::new(0, 370, ChartOptions::default());
        assert!(matches!(c.attach_chart(), Err(VizError::MissingSurface("chart"))));
        assert!(matches!(c.attach_canvas(0, 10), Err(VizError::MissingSurface("canvas"))));
    }

    #[test]
    fn test_canvas_container_end_to_end() {
        let mut w = MicDataWidget::init(&mut CanvasContainer::default(), &ViewConfig::default()).unwrap();
        let frame = Frame { time: 1.0, latest_power_value: 100.0, latest_noise_floor: 10.0, ..Frame::default() };
        assert!(w.on_data(&frame).unwrap().is_clean());
        assert!(w.processor().surface().count_drawn_pixels() > 0);
        assert_eq!(w.processor().chart().redraw_count(), 1);
        assert!(MicDataWidget::<CanvasSurface, PlotChart>::get_styles().contains(".legendLabel"));
    }
}
