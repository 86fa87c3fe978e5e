/*
 *  main.rs
 *
 *  micviz - directional mic debug view
 *  (c) 2020-26 Stuart Hunter
 *
 *  Headless host: feeds JSON-lines frames to the widget and writes
 *  snapshots of the rendered clock face and chart
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

use std::{fs, path::Path, time::{Duration, Instant}};
use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::{debug, error, info, warn};
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::signal::unix::{signal, SignalKind};
use tokio::time::MissedTickBehavior;

use micviz::canvas::CanvasSurface;
use micviz::config::{self, Cli};
use micviz::plot::PlotChart;
use micviz::{CanvasContainer, Frame, MicDataWidget};

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

type Widget = MicDataWidget<CanvasSurface, PlotChart>;

#[derive(Debug, Default)]
struct RunStats {
    frames: u64,
    malformed: u64,
    rejected: u64,
}

/// Waits for a SIGINT, SIGTERM, or SIGHUP signal.
async fn signal_handler() -> anyhow::Result<()> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sighup = signal(SignalKind::hangup())?;

    tokio::select! {
        _ = sigint.recv() => {
            info!("SIGINT received. Initiating graceful shutdown.");
        }
        _ = sigterm.recv() => {
            info!("SIGTERM received. Initiating graceful shutdown.");
        }
        _ = sighup.recv() => {
            info!("SIGHUP received. Initiating graceful shutdown.");
        }
    }
    Ok(())
}

async fn open_input(input: Option<&str>) -> anyhow::Result<Box<dyn AsyncBufRead + Unpin + Send>> {
    match input {
        None | Some("-") => {
            info!("Reading frames from stdin");
            Ok(Box::new(BufReader::new(tokio::io::stdin())))
        }
        Some(path) => {
            let file = File::open(path)
                .await
                .with_context(|| format!("opening frame source {}", path))?;
            info!("Reading frames from {}", path);
            Ok(Box::new(BufReader::new(file)))
        }
    }
}

fn handle_line(widget: &mut Widget, line: &str, stats: &mut RunStats) -> anyhow::Result<()> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(());
    }
    let frame = match Frame::from_json(line) {
        Ok(frame) => frame,
        Err(e) => {
            warn!("Skipping malformed frame: {}", e);
            stats.malformed += 1;
            return Ok(());
        }
    };
    let report = widget.on_data(&frame)?;
    stats.frames += 1;
    stats.rejected += report.rejected.len() as u64;
    Ok(())
}

/// Frame loop: one `on_data` per input line, `update` on every tick
async fn run(
    widget: &mut Widget,
    reader: Box<dyn AsyncBufRead + Unpin + Send>,
    tick: Duration,
) -> anyhow::Result<RunStats> {
    let mut lines = reader.lines();
    let mut ticker = tokio::time::interval(tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_tick = Instant::now();
    let mut stats = RunStats::default();

    info!("Entering frame loop");
    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => handle_line(widget, &line, &mut stats)?,
                None => {
                    info!("End of frame input");
                    break;
                }
            },
            _ = ticker.tick() => {
                let now = Instant::now();
                widget.update(now.duration_since(last_tick).as_secs_f64());
                last_tick = now;
            }
        }
    }
    Ok(stats)
}

fn write_snapshots(widget: &Widget, dir: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let clock = dir.join("clock.ppm");
    widget.processor().surface().framebuffer().save_ppm(&clock)?;
    let chart = dir.join("chart.ppm");
    widget.processor().chart().framebuffer().save_ppm(&chart)?;
    info!("Snapshots written to {}", dir.display());
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.styles {
        print!("{}", Widget::get_styles());
        return Ok(());
    }

    let cfg = config::load(&cli)?;
    if cli.dump_config {
        println!("{}", config::dump(&cfg)?);
        return Ok(());
    }

    env_logger::Builder::from_env(Env::default().default_filter_or(cfg.log_level()))
        .format_timestamp_secs()
        .init();

    info!("{} - directional mic debug view", env!("CARGO_PKG_NAME"));
    info!("v.{} built {}", env!("CARGO_PKG_VERSION"), BUILD_DATE);
    debug!("Effective config: {:?}", cfg);

    let (chart_width, chart_height) = cfg.chart_size();
    let mut container = CanvasContainer::new(chart_width, chart_height, cfg.chart_options());
    let mut widget = Widget::init(&mut container, &cfg.view_config())
        .context("widget initialisation failed")?;

    let reader = open_input(cfg.input.as_deref()).await?;

    tokio::select! {
        r = signal_handler() => {
            if let Err(e) = r {
                error!("Signal handling failed: {}", e);
            }
        }
        r = run(&mut widget, reader, cfg.tick_interval()) => {
            let stats = r?;
            info!(
                "Processed {} frames ({} malformed lines, {} isolated frame errors)",
                stats.frames, stats.malformed, stats.rejected
            );
        }
    }

    if let Some(dir) = cfg.snapshot_dir.as_ref() {
        write_snapshots(&widget, dir)?;
    }

    info!("Shutdown complete");
    Ok(())
}
