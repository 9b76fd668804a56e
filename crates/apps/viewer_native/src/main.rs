//! Headless driver: mounts the engine on an in-memory surface, feeds it the
//! demo actuator and a scripted scroll/pointer/control timeline, then prints
//! a JSON report.

mod script;

use std::cell::RefCell;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use clap::Parser;
use engine::{EngineConfig, EngineEvent, HotspotConfig, HotspotScreenPosition, Mount};
use gpu::HeadlessSurface;
use runtime::inbox::Viewport;
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::script::Script;

#[derive(Parser, Debug)]
#[command(name = "viewer_native", about = "Run the scene engine headless")]
struct Args {
    /// JSON engine config; defaults are used for anything it leaves out.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value_t = 600)]
    frames: u64,
    #[arg(long, default_value_t = 60.0)]
    fps: f64,
    #[arg(long, default_value_t = 1280.0)]
    width: f64,
    #[arg(long, default_value_t = 720.0)]
    height: f64,
    #[arg(long, default_value_t = 1.0)]
    pixel_ratio: f64,
}

#[derive(Serialize)]
struct Report {
    frames: u64,
    submitted: u64,
    failed: u64,
    draws_in_last_frame: usize,
    events: Vec<EngineEvent>,
    hotspots: Vec<HotspotScreenPosition>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => match EngineConfig::load(path) {
            Ok(c) => c,
            Err(e) => {
                error!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => EngineConfig::default(),
    };
    if config.hotspots.is_empty() {
        config.hotspots = vec![
            HotspotConfig::new("rod-tip", "rod_tip"),
            HotspotConfig::new("valve-port", "valve_port"),
        ];
    }

    let viewport = Viewport::new(args.width, args.height, args.pixel_ratio);
    let surface = HeadlessSurface::new(1, 1);
    let monitor = surface.monitor();
    let mut mount = Mount::new(config, viewport, Box::new(surface));

    let latest: Rc<RefCell<Vec<HotspotScreenPosition>>> = Rc::default();
    let sink = latest.clone();
    mount
        .engine_mut()
        .set_hotspot_observer(Box::new(move |list: &[HotspotScreenPosition]| {
            sink.borrow_mut().clear();
            sink.borrow_mut().extend_from_slice(list);
        }));

    let script = Script::new(args.frames);
    let controls = mount.controls();
    let input = mount.input();
    let slot = mount.asset_slot();
    let step_s = if args.fps > 0.0 { 1.0 / args.fps } else { 0.0 };

    let mut events = Vec::new();
    for i in 0..args.frames {
        script.apply(i, &controls, &input, &slot, &viewport);
        mount.tick(i as f64 * step_s);
        for e in mount.drain_events() {
            info!(frame = e.frame_index, event = ?e.kind, "engine event");
            events.push(e.kind);
        }
    }

    let summary = mount.summary();
    let draws_in_last_frame = monitor.last_frame().map_or(0, |f| f.draw_count());
    mount.teardown();
    events.extend(mount.drain_events().into_iter().map(|e| e.kind));

    let report = Report {
        frames: summary.frames,
        submitted: summary.submitted,
        failed: summary.failed,
        draws_in_last_frame,
        events,
        hotspots: latest.borrow().clone(),
    };
    match serde_json::to_string_pretty(&report) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("cannot encode report: {e}");
            ExitCode::FAILURE
        }
    }
}
