//! Top-level wiring for the two modes.
//!
//! Each mode starts a detection thread that owns the landmark source and
//! the frame-by-frame logic, then runs the render loop on the calling
//! thread. The two sides share nothing but latest-value cells.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::Result;
use hand_gesture::{PointerMapper, TargetSpace, Zone};
use hand_landmarks::FrameSize;

use crate::config::{AppConfig, SourceConfig};
use crate::counter::{CounterController, CounterSnapshot, CounterState};
use crate::dragbox::{Arena, DragBoxController, HandSignal, PointerTracker};
use crate::frame::FrameImage;
use crate::latest::latest;
use crate::replay::JsonLinesSource;
use crate::sim::{SimInput, SimLandmarkSource};
use crate::source::{spawn_detection, LandmarkSource, StopReason};
use crate::visualizer::{Layout, Visualizer};

/// How long to wait for the detection thread after the window closes.
const JOIN_GRACE: Duration = Duration::from_millis(500);

/// Which interaction the window runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Counter,
    Boxes,
}

// ════════════════════════════════════════════════════════════════════════════
// Source selection
// ════════════════════════════════════════════════════════════════════════════

/// Build the configured source. The simulator also hands back the sender
/// the window feeds it through.
pub fn open_source(cfg: &SourceConfig) -> Result<(Box<dyn LandmarkSource>, Option<Sender<SimInput>>)> {
    if let Some(path) = &cfg.replay {
        let src = JsonLinesSource::open(path)?.mirrored(cfg.mirror);
        return Ok((Box::new(src), None));
    }
    if let Some(cmd) = &cfg.detector {
        let src = JsonLinesSource::spawn(cmd)?.mirrored(cfg.mirror);
        return Ok((Box::new(src), None));
    }
    let (tx, rx) = mpsc::channel();
    let src = SimLandmarkSource::new(
        rx,
        FrameSize::new(cfg.camera_width, cfg.camera_height),
        Duration::from_millis(cfg.sim_interval_ms),
    );
    Ok((Box::new(src), Some(tx)))
}

pub fn run(mode: Mode, cfg: &AppConfig) -> Result<()> {
    match mode {
        Mode::Counter => run_counter(cfg),
        Mode::Boxes   => run_boxes(cfg),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Counter mode
// ════════════════════════════════════════════════════════════════════════════

pub fn run_counter(cfg: &AppConfig) -> Result<()> {
    let (source, sim_tx) = open_source(&cfg.source)?;
    let layout = Layout::counter(cfg.counter.canvas_width as usize, cfg.counter.canvas_height as usize);
    let mut vis = Visualizer::new("Hand Tracker", layout, cfg.render.fps, sim_tx)?;

    let (frame_tx, frame_rx) = latest::<FrameImage>();
    let (state_tx, state_rx) = latest::<CounterState>();
    let shutdown = Arc::new(AtomicBool::new(false));

    let mut controller = CounterController::new(cfg.counter.grip, cfg.counter.armed_at_start);
    let detection = spawn_detection(source, Arc::clone(&shutdown), move |frame| {
        for zone in controller.observe_frame(&frame.hands) {
            let state = controller.state();
            log::info!("[counter] {} count: {}", zone.name(), state.count(zone));
        }
        state_tx.publish(controller.state());
        frame_tx.publish(frame.image);
    })?;

    while vis.is_open() {
        vis.poll_sim_input();
        let snap = CounterSnapshot {
            state: state_rx.read().map(|s| *s).unwrap_or_default(),
            frame: frame_rx.read(),
        };
        vis.render_counter(&snap)?;
    }

    let last = state_rx.read().map(|s| *s).unwrap_or_default();
    for zone in Zone::ALL {
        log::info!("Final {} count: {}", zone.name(), last.count(zone));
    }
    drop(vis);
    stop_detection(&shutdown, detection);
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Drag-box mode
// ════════════════════════════════════════════════════════════════════════════

pub fn run_boxes(cfg: &AppConfig) -> Result<()> {
    let b = &cfg.boxes;
    let (source, sim_tx) = open_source(&cfg.source)?;
    let layout = Layout::boxes(b.arena_width as usize, b.arena_height as usize);
    let mut vis = Visualizer::new("Hand-Controlled Box Game", layout, cfg.render.fps, sim_tx)?;

    let (frame_tx, frame_rx) = latest::<FrameImage>();
    let (hand_tx, hand_rx) = latest::<HandSignal>();
    let shutdown = Arc::new(AtomicBool::new(false));

    let arena = Arena { width: b.arena_width as f32, height: b.arena_height as f32 };
    let mapper = PointerMapper::new(TargetSpace::new(arena.width, arena.height))
        .with_flip(b.flip_x, b.flip_y);
    let mut tracker = PointerTracker::new(mapper, b.grip);
    let detection = spawn_detection(source, Arc::clone(&shutdown), move |frame| {
        if let Some(signal) = tracker.observe_frame(&frame.hands) {
            hand_tx.publish(signal);
        }
        frame_tx.publish(frame.image);
    })?;

    let mut game = DragBoxController::with_default_boxes(arena, b.box_half_size, b.grab_half_extent);
    while vis.is_open() {
        vis.poll_sim_input();
        let signal = hand_rx.read().map(|s| *s).unwrap_or_default();
        game.tick(signal);
        vis.render_boxes(&game.snapshot(signal, frame_rx.read()))?;
    }

    drop(vis);
    stop_detection(&shutdown, detection);
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Shutdown
// ════════════════════════════════════════════════════════════════════════════

/// Raise the shutdown flag and give the detection thread a moment to finish.
/// A thread still blocked on a read is left behind.
fn stop_detection(shutdown: &AtomicBool, handle: JoinHandle<StopReason>) {
    shutdown.store(true, Ordering::Release);
    let deadline = Instant::now() + JOIN_GRACE;
    while !handle.is_finished() && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(10));
    }
    if !handle.is_finished() {
        log::warn!("Detection thread still blocked on its source; not waiting for it");
        return;
    }
    match handle.join() {
        Ok(reason) => log::info!("Detection finished: {:?}", reason),
        Err(_)     => log::error!("Detection thread panicked"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::tests::{empty_frame, ScriptedSource};
    use std::path::PathBuf;

    #[test]
    fn simulator_is_the_default_source() {
        let (src, tx) = open_source(&SourceConfig::default()).unwrap();
        assert_eq!(src.name(), "simulator");
        assert!(tx.is_some());
    }

    #[test]
    fn missing_replay_file_fails_to_open() {
        let cfg = SourceConfig { replay: Some(PathBuf::from("/no/such/file.jsonl")), ..SourceConfig::default() };
        assert!(open_source(&cfg).is_err());
    }

    #[test]
    fn stop_detection_joins_finished_thread() {
        let src = ScriptedSource::frames(vec![empty_frame()]);
        let shutdown = Arc::new(AtomicBool::new(false));
        let handle = spawn_detection(Box::new(src), Arc::clone(&shutdown), |_| {}).unwrap();
        stop_detection(&shutdown, handle);
        assert!(shutdown.load(Ordering::Acquire));
    }
}
