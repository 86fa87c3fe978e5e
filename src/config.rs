/*
 *  config.rs
 *
 *  micviz - directional mic debug view
 *  (c) 2020-26 Stuart Hunter
 *
 *  Layered configuration: defaults, YAML file, command line
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

use clap::{ArgAction, Parser, ValueHint};
use dirs_next::home_dir;
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}, time::Duration};
use thiserror::Error;

use crate::chart::DEFAULT_AXIS_PAD_SECS;
use crate::clock_face::ClockLayout;
use crate::geometry::Vec2;
use crate::overlay::OverlayLayout;
use crate::plot::{ChartOptions, LegendPosition};
use crate::processor::ViewConfig;
use crate::series::DEFAULT_WINDOW_SECS;

const DEFAULT_TICK_MS: u64 = 100;
const DEFAULT_CHART_WIDTH: u32 = 500;
const DEFAULT_CHART_HEIGHT: u32 = 370;

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Top-level configuration. Everything optional so layers can be merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    pub log_level: Option<String>,  // "info" | "debug" | "trace"
    pub window_secs: Option<f64>,
    pub axis_pad_secs: Option<f64>,
    pub clock: Option<ClockConfig>,
    pub chart: Option<ChartConfig>,
    /// frame source, a path or "-" for stdin
    pub input: Option<String>,
    pub snapshot_dir: Option<PathBuf>,
    pub tick_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ClockConfig {
    pub center_x: Option<f32>,
    pub center_y: Option<f32>,
    pub radius: Option<f32>,
    pub canvas_width: Option<u32>,
    pub canvas_height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ChartConfig {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub y_min: Option<f64>,
    pub y_max: Option<f64>,
    pub y_ticks: Option<Vec<f64>>,
    pub x_ticks: Option<u32>,
    pub legend_position: Option<LegendPosition>,
    pub show_grid: Option<bool>,
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone, Default)]
#[command(name = "micviz", about = "Directional mic debug view", disable_help_flag = false)]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    /// JSON-lines frame source, "-" reads stdin
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub input: Option<String>,
    /// write clock.ppm and chart.ppm here on exit
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub snapshot_dir: Option<PathBuf>,
    #[arg(long)]
    pub window_secs: Option<f64>,
    #[arg(long)]
    pub axis_pad_secs: Option<f64>,
    #[arg(long)]
    pub tick_ms: Option<u64>,
    #[arg(long)]
    pub chart_width: Option<u32>,
    #[arg(long)]
    pub chart_height: Option<u32>,
    /// print the widget stylesheet and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub styles: bool,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

/// Read YAML, merge CLI overrides, validate.
pub fn load(cli: &Cli) -> Result<Config, ConfigError> {
    // 1) defaults (from `Default` impl)
    let mut cfg = Config::default();

    // 2) YAML file (explicit path or search)
    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            let y = read_yaml(p)?;
            merge(&mut cfg, y);
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        let y = read_yaml(&p)?;
        merge(&mut cfg, y);
    }

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut cfg, cli);

    // 4) Validate
    validate(&cfg)?;

    Ok(cfg)
}

/// Pretty YAML of the effective config
pub fn dump(cfg: &Config) -> Result<String, ConfigError> {
    Ok(serde_yaml::to_string(cfg)?)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/micviz/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/micviz/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/micviz.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["micviz.yaml", "config/micviz.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&s)?;
    Ok(cfg)
}

/// Shallow merge `src` into `dst`, Option-by-Option.
fn merge(dst: &mut Config, src: Config) {
    if src.log_level.is_some()      { dst.log_level = src.log_level; }
    if src.window_secs.is_some()    { dst.window_secs = src.window_secs; }
    if src.axis_pad_secs.is_some()  { dst.axis_pad_secs = src.axis_pad_secs; }
    if src.input.is_some()          { dst.input = src.input; }
    if src.snapshot_dir.is_some()   { dst.snapshot_dir = src.snapshot_dir; }
    if src.tick_ms.is_some()        { dst.tick_ms = src.tick_ms; }
    match (&mut dst.clock, src.clock) {
        (None, Some(c)) => dst.clock = Some(c),
        (Some(d), Some(s)) => merge_clock(d, s),
        _ => {}
    }
    match (&mut dst.chart, src.chart) {
        (None, Some(c)) => dst.chart = Some(c),
        (Some(d), Some(s)) => merge_chart(d, s),
        _ => {}
    }
}

fn merge_clock(dst: &mut ClockConfig, src: ClockConfig) {
    if src.center_x.is_some()       { dst.center_x = src.center_x; }
    if src.center_y.is_some()       { dst.center_y = src.center_y; }
    if src.radius.is_some()         { dst.radius = src.radius; }
    if src.canvas_width.is_some()   { dst.canvas_width = src.canvas_width; }
    if src.canvas_height.is_some()  { dst.canvas_height = src.canvas_height; }
}

fn merge_chart(dst: &mut ChartConfig, src: ChartConfig) {
    if src.width.is_some()            { dst.width = src.width; }
    if src.height.is_some()           { dst.height = src.height; }
    if src.y_min.is_some()            { dst.y_min = src.y_min; }
    if src.y_max.is_some()            { dst.y_max = src.y_max; }
    if src.y_ticks.is_some()          { dst.y_ticks = src.y_ticks; }
    if src.x_ticks.is_some()          { dst.x_ticks = src.x_ticks; }
    if src.legend_position.is_some()  { dst.legend_position = src.legend_position; }
    if src.show_grid.is_some()        { dst.show_grid = src.show_grid; }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.log_level.is_some()      { cfg.log_level = cli.log_level.clone(); }
    if cli.input.is_some()          { cfg.input = cli.input.clone(); }
    if cli.snapshot_dir.is_some()   { cfg.snapshot_dir = cli.snapshot_dir.clone(); }
    if cli.window_secs.is_some()    { cfg.window_secs = cli.window_secs; }
    if cli.axis_pad_secs.is_some()  { cfg.axis_pad_secs = cli.axis_pad_secs; }
    if cli.tick_ms.is_some()        { cfg.tick_ms = cli.tick_ms; }

    let any_chart = cli.chart_width.is_some() || cli.chart_height.is_some();
    if any_chart && cfg.chart.is_none() {
        cfg.chart = Some(ChartConfig::default());
    }
    if let Some(chart) = cfg.chart.as_mut() {
        if cli.chart_width.is_some()   { chart.width = cli.chart_width; }
        if cli.chart_height.is_some()  { chart.height = cli.chart_height; }
    }
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    let view = cfg.view_config();
    if view.clock.radius <= 0.0 {
        return Err(ConfigError::Validation("clock radius must be > 0".into()));
    }
    if view.canvas_width == 0 || view.canvas_height == 0 {
        return Err(ConfigError::Validation("clock canvas width/height must be > 0".into()));
    }
    if !(view.window_secs > 0.0) {
        return Err(ConfigError::Validation("window_secs must be > 0".into()));
    }
    if !(view.axis_pad_secs >= 0.0) {
        return Err(ConfigError::Validation("axis_pad_secs must be >= 0".into()));
    }
    let (w, h) = cfg.chart_size();
    if w == 0 || h == 0 {
        return Err(ConfigError::Validation("chart width/height must be > 0".into()));
    }
    let options = cfg.chart_options();
    if !(options.y_max > options.y_min) {
        return Err(ConfigError::Validation("chart y_max must be greater than y_min".into()));
    }
    Ok(())
}

impl Config {
    /// Canvas geometry and timing with defaults filled in
    pub fn view_config(&self) -> ViewConfig {
        let clock = self.clock.clone().unwrap_or_default();
        let layout = ClockLayout::default();
        ViewConfig {
            canvas_width: clock.canvas_width.unwrap_or(500),
            canvas_height: clock.canvas_height.unwrap_or(250),
            clock: ClockLayout {
                center: Vec2::new(
                    clock.center_x.unwrap_or(layout.center.x),
                    clock.center_y.unwrap_or(layout.center.y),
                ),
                radius: clock.radius.unwrap_or(layout.radius),
            },
            overlay: OverlayLayout::default(),
            window_secs: self.window_secs.unwrap_or(DEFAULT_WINDOW_SECS),
            axis_pad_secs: self.axis_pad_secs.unwrap_or(DEFAULT_AXIS_PAD_SECS),
        }
    }

    pub fn chart_options(&self) -> ChartOptions {
        let mut options = ChartOptions::default();
        if let Some(chart) = self.chart.as_ref() {
            if let Some(v) = chart.y_min                    { options.y_min = v; }
            if let Some(v) = chart.y_max                    { options.y_max = v; }
            if let Some(v) = chart.y_ticks.clone()          { options.y_ticks = v; }
            if let Some(v) = chart.x_ticks                  { options.x_ticks = v; }
            if let Some(v) = chart.legend_position          { options.legend_position = v; }
            if let Some(v) = chart.show_grid                { options.show_grid = v; }
        }
        options
    }

    pub fn chart_size(&self) -> (u32, u32) {
        let chart = self.chart.as_ref();
        (
            chart.and_then(|c| c.width).unwrap_or(DEFAULT_CHART_WIDTH),
            chart.and_then(|c| c.height).unwrap_or(DEFAULT_CHART_HEIGHT),
        )
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms.unwrap_or(DEFAULT_TICK_MS).max(1))
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_resolve() {
        let cfg = Config::default();
        assert!(validate(&cfg).is_ok());
        assert_eq!(cfg.view_config(), ViewConfig::default());
        assert_eq!(cfg.chart_options(), ChartOptions::default());
        assert_eq!(cfg.chart_size(), (500, 370));
        assert_eq!(cfg.tick_interval(), Duration::from_millis(100));
        assert_eq!(cfg.log_level(), "info");
    }

    #[test]
    fn test_yaml_parse() {
        let yaml = r#"
log_level: debug
window_secs: 30
clock:
  radius: 80
chart:
  legend_position: ne
  y_ticks: [0, 5, 10]
"#;
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.log_level(), "debug");
        let view = cfg.view_config();
        assert_eq!(view.window_secs, 30.0);
        assert_eq!(view.clock.radius, 80.0);
        assert_eq!(view.clock.center, Vec2::new(125.0, 125.0));
        let options = cfg.chart_options();
        assert_eq!(options.legend_position, LegendPosition::Ne);
        assert_eq!(options.y_ticks, vec![0.0, 5.0, 10.0]);
    }

    #[test]
    fn test_merge_is_field_by_field() {
        let mut dst = Config {
            window_secs: Some(10.0),
            clock: Some(ClockConfig { radius: Some(50.0), center_x: Some(60.0), ..Default::default() }),
            ..Default::default()
        };
        let src = Config {
            tick_ms: Some(40),
            clock: Some(ClockConfig { radius: Some(90.0), ..Default::default() }),
            ..Default::default()
        };
        merge(&mut dst, src);
        assert_eq!(dst.window_secs, Some(10.0));
        assert_eq!(dst.tick_ms, Some(40));
        let clock = dst.clock.unwrap();
        assert_eq!(clock.radius, Some(90.0));
        assert_eq!(clock.center_x, Some(60.0));
    }

    #[test]
    fn test_cli_overrides_win() {
        let cli = Cli::try_parse_from([
            "micviz", "--input", "-", "--window-secs", "5", "--chart-width", "640",
        ]).unwrap();
        let mut cfg = Config { window_secs: Some(60.0), ..Default::default() };
        apply_cli_overrides(&mut cfg, &cli);
        assert_eq!(cfg.input.as_deref(), Some("-"));
        assert_eq!(cfg.window_secs, Some(5.0));
        assert_eq!(cfg.chart_size(), (640, 370));
    }

    #[test]
    fn test_validation() {
        let bad = [
            Config { window_secs: Some(0.0), ..Default::default() },
            Config { axis_pad_secs: Some(-0.1), ..Default::default() },
            Config { clock: Some(ClockConfig { radius: Some(0.0), ..Default::default() }), ..Default::default() },
            Config { clock: Some(ClockConfig { canvas_width: Some(0), ..Default::default() }), ..Default::default() },
            Config { chart: Some(ChartConfig { height: Some(0), ..Default::default() }), ..Default::default() },
            Config { chart: Some(ChartConfig { y_min: Some(10.0), ..Default::default() }), ..Default::default() },
        ];
        for cfg in bad {
            assert!(matches!(validate(&cfg), Err(ConfigError::Validation(_))), "{:?}", cfg);
        }
    }

    #[test]
    fn test_missing_explicit_config_file() {
        let cli = Cli { config: Some(PathBuf::from("/nonexistent/micviz.yaml")), ..Default::default() };
        assert!(matches!(load(&cli), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_dump_roundtrips() {
        let cfg = Config { tick_ms: Some(50), ..Default::default() };
        let back: Config = serde_yaml::from_str(&dump(&cfg).unwrap()).unwrap();
        assert_eq!(back, cfg);
    }
}
