//! Landmark sources and the detection loop that drains them.
//!
//! The detection loop is the only writer of everything the render loop
//! shows. Consumers don't need to know whether frames came from the window
//! simulator or an external detector.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};
use hand_landmarks::{FrameSize, HandObservation};

use crate::frame::FrameImage;

// ════════════════════════════════════════════════════════════════════════════
// DetectionFrame
// ════════════════════════════════════════════════════════════════════════════

/// Everything the landmark source knows about one captured frame.
#[derive(Clone, Debug)]
pub struct DetectionFrame {
    pub size:  FrameSize,
    /// Zero or more hands, in detector order.
    pub hands: Vec<HandObservation>,
    /// The frame raster with the detected skeletons drawn on it.
    pub image: FrameImage,
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkSource trait — unified interface for simulator and detectors
// ════════════════════════════════════════════════════════════════════════════

/// Anything that yields [`DetectionFrame`]s.
///
/// `next_frame` blocks until the next frame is ready. `Ok(None)` means the
/// stream ended; an error means capture failed. Either way the source is
/// dropped afterwards, which must release whatever it holds.
pub trait LandmarkSource: Send + 'static {
    fn name(&self) -> &str;
    fn next_frame(&mut self) -> Result<Option<DetectionFrame>>;
}

// ════════════════════════════════════════════════════════════════════════════
// Detection loop
// ════════════════════════════════════════════════════════════════════════════

/// Why a detection loop stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    EndOfStream,
    CaptureFailed,
    Shutdown,
}

/// Pull frames from `source` into `on_frame` until the stream ends, a read
/// fails, or `shutdown` is raised. Failures are not retried.
pub fn run_detection<F>(
    mut source: Box<dyn LandmarkSource>,
    shutdown:   &AtomicBool,
    mut on_frame: F,
) -> StopReason
where
    F: FnMut(DetectionFrame),
{
    let mut frames = 0u64;
    let reason = loop {
        if shutdown.load(Ordering::Acquire) {
            break StopReason::Shutdown;
        }
        match source.next_frame() {
            Ok(Some(frame)) => {
                frames += 1;
                log::trace!("[detect] frame {} with {} hand(s)", frames, frame.hands.len());
                on_frame(frame);
            }
            Ok(None) => break StopReason::EndOfStream,
            Err(e) => {
                log::warn!("[detect] {} failed: {:#}", source.name(), e);
                break StopReason::CaptureFailed;
            }
        }
    };
    log::info!(
        "[detect] {} stopped after {} frame(s): {:?}",
        source.name(), frames, reason
    );
    reason
}

/// Run [`run_detection`] on its own thread.
pub fn spawn_detection<F>(
    source:   Box<dyn LandmarkSource>,
    shutdown: Arc<AtomicBool>,
    on_frame: F,
) -> Result<JoinHandle<StopReason>>
where
    F: FnMut(DetectionFrame) + Send + 'static,
{
    log::info!("[detect] starting with source: {}", source.name());
    thread::Builder::new()
        .name("detection".into())
        .spawn(move || run_detection(source, &shutdown, on_frame))
        .context("Failed to spawn detection thread")
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Source replaying a fixed script of results.
    pub struct ScriptedSource {
        pub script:  VecDeque<Result<Option<DetectionFrame>>>,
        pub dropped: Arc<AtomicBool>,
    }

    impl ScriptedSource {
        pub fn frames(frames: Vec<DetectionFrame>) -> Self {
            ScriptedSource {
                script:  frames.into_iter().map(|f| Ok(Some(f))).collect(),
                dropped: Arc::new(AtomicBool::new(false)),
            }
        }
    }

    impl Drop for ScriptedSource {
        fn drop(&mut self) {
            self.dropped.store(true, Ordering::Release);
        }
    }

    impl LandmarkSource for ScriptedSource {
        fn name(&self) -> &str { "scripted" }
        fn next_frame(&mut self) -> Result<Option<DetectionFrame>> {
            self.script.pop_front().unwrap_or(Ok(None))
        }
    }

    pub fn empty_frame() -> DetectionFrame {
        DetectionFrame {
            size:  FrameSize::new(64, 48),
            hands: Vec::new(),
            image: FrameImage::blank(64, 48, 0),
        }
    }

    #[test]
    fn drains_until_end_of_stream() {
        let src = ScriptedSource::frames(vec![empty_frame(), empty_frame(), empty_frame()]);
        let mut seen = 0;
        let reason = run_detection(Box::new(src), &AtomicBool::new(false), |_| seen += 1);
        assert_eq!(reason, StopReason::EndOfStream);
        assert_eq!(seen, 3);
    }

    #[test]
    fn read_failure_ends_loop_and_releases_source() {
        let mut src = ScriptedSource::frames(vec![empty_frame()]);
        src.script.push_back(Err(anyhow::anyhow!("device unplugged")));
        src.script.push_back(Ok(Some(empty_frame())));
        let dropped = Arc::clone(&src.dropped);
        let mut seen = 0;
        let reason = run_detection(Box::new(src), &AtomicBool::new(false), |_| seen += 1);
        assert_eq!(reason, StopReason::CaptureFailed);
        assert_eq!(seen, 1);
        assert!(dropped.load(Ordering::Acquire));
    }

    #[test]
    fn shutdown_flag_stops_before_reading() {
        let src = ScriptedSource::frames(vec![empty_frame()]);
        let mut seen = 0;
        let reason = run_detection(Box::new(src), &AtomicBool::new(true), |_| seen += 1);
        assert_eq!(reason, StopReason::Shutdown);
        assert_eq!(seen, 0);
    }

    #[test]
    fn spawned_loop_joins_with_reason() {
        let src = ScriptedSource::frames(vec![empty_frame()]);
        let handle = spawn_detection(Box::new(src), Arc::new(AtomicBool::new(false)), |_| {}).unwrap();
        assert_eq!(handle.join().unwrap(), StopReason::EndOfStream);
    }
}
