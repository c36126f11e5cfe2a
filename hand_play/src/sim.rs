//! Window-driven hand simulator — the default landmark source.
//!
//! The visualizer forwards the mouse position over its camera panel and the
//! grip button state as [`SimInput`]s; this source turns them into a
//! synthetic 21-landmark hand whose index fingertip sits under the mouse and
//! whose fingers are folded while the grip is held. Everything downstream
//! runs exactly as it would for a real detector.

use std::sync::mpsc::{Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use anyhow::Result;
use hand_landmarks::{FrameSize, HandObservation, Landmark, LandmarkId, LANDMARK_COUNT};

use crate::frame::FrameImage;
use crate::source::{DetectionFrame, LandmarkSource};

const SIM_BACKGROUND: u32 = 0xFF202028;
const SIM_BONE:       u32 = 0xFFE0E0E0;
const SIM_JOINT:      u32 = 0xFFFF3030;

/// Raw input event from the simulation window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    /// Mouse over the camera panel, normalized to `0.0..=1.0`.
    Pointer { x: f32, y: f32 },
    /// Mouse left the camera panel: no hand in view.
    Absent,
    /// Grip pressed (fist) or released (open hand).
    Grip(bool),
}

// ════════════════════════════════════════════════════════════════════════════
// synthetic_hand
// ════════════════════════════════════════════════════════════════════════════

/// Build a plausible upright right hand with its index fingertip at
/// `(x, y)` (normalized).
///
/// Open: all four fingers point up, tips above their PIP knuckles, thumb
/// splayed. Closed: tips curl below the knuckles and the thumb tip tucks in
/// next to the index tip.
pub fn synthetic_hand(x: f32, y: f32, closed: bool, size: FrameSize) -> HandObservation {
    use LandmarkId::*;

    // (pip, dip, tip) heights relative to the MCP row; negative is up.
    let (pip, dip, tip) = if closed { (-0.05, -0.02, 0.01) } else { (-0.06, -0.10, -0.14) };
    let mcp_y = y - tip;
    let wrist = (x + 0.05, mcp_y + 0.12);

    let mut pts = [Landmark::default(); LANDMARK_COUNT];
    let mut put = |id: LandmarkId, px: f32, py: f32| pts[id.index()] = Landmark::new(px, py);

    put(Wrist, wrist.0, wrist.1);
    let fingers = [
        (IndexMcp,  IndexPip,  IndexDip,  IndexTip,  0.00),
        (MiddleMcp, MiddlePip, MiddleDip, MiddleTip, 0.04),
        (RingMcp,   RingPip,   RingDip,   RingTip,   0.08),
        (PinkyMcp,  PinkyPip,  PinkyDip,  PinkyTip,  0.12),
    ];
    for (m, p, d, t, dx) in fingers {
        let fx = x + dx;
        put(m, fx, mcp_y);
        put(p, fx, mcp_y + pip);
        put(d, fx, mcp_y + dip);
        put(t, fx, mcp_y + tip);
    }

    put(ThumbCmc, wrist.0 - 0.05, wrist.1 - 0.03);
    put(ThumbMcp, wrist.0 - 0.08, wrist.1 - 0.07);
    put(ThumbIp,  wrist.0 - 0.10, wrist.1 - 0.10);
    if closed {
        put(ThumbTip, x - 0.02, y + 0.02);
    } else {
        put(ThumbTip, wrist.0 - 0.12, wrist.1 - 0.13);
    }

    HandObservation::new(pts, size)
}

// ════════════════════════════════════════════════════════════════════════════
// SimLandmarkSource
// ════════════════════════════════════════════════════════════════════════════

pub struct SimLandmarkSource {
    rx:       Receiver<SimInput>,
    size:     FrameSize,
    interval: Duration,
    pointer:  Option<(f32, f32)>,
    closed:   bool,
}

impl SimLandmarkSource {
    pub fn new(rx: Receiver<SimInput>, size: FrameSize, interval: Duration) -> Self {
        SimLandmarkSource { rx, size, interval, pointer: None, closed: false }
    }

    /// Fold pending input into the simulated hand. Returns false once the
    /// window side has gone away.
    fn drain_input(&mut self) -> bool {
        loop {
            match self.rx.try_recv() {
                Ok(SimInput::Pointer { x, y }) => self.pointer = Some((x, y)),
                Ok(SimInput::Absent)           => self.pointer = None,
                Ok(SimInput::Grip(down))       => self.closed = down,
                Err(TryRecvError::Empty)        => return true,
                Err(TryRecvError::Disconnected) => return false,
            }
        }
    }

    fn render(&self) -> DetectionFrame {
        let hands: Vec<_> = self.pointer
            .map(|(x, y)| synthetic_hand(x, y, self.closed, self.size))
            .into_iter()
            .collect();
        let mut image = FrameImage::blank(
            self.size.width as usize, self.size.height as usize, SIM_BACKGROUND,
        );
        for hand in &hands {
            image.draw_skeleton(hand, SIM_BONE, SIM_JOINT);
        }
        DetectionFrame { size: self.size, hands, image }
    }
}

impl LandmarkSource for SimLandmarkSource {
    fn name(&self) -> &str { "simulator" }

    fn next_frame(&mut self) -> Result<Option<DetectionFrame>> {
        thread::sleep(self.interval);
        if !self.drain_input() {
            return Ok(None);
        }
        Ok(Some(self.render()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hand_gesture::{classify, GripRule, OpenClosed, PointerMapper, TargetSpace, Zone};
    use std::sync::mpsc;

    const VGA: FrameSize = FrameSize { width: 640, height: 480 };

    #[test]
    fn open_and_closed_hands_classify_as_such() {
        assert_eq!(classify(&synthetic_hand(0.3, 0.4, false, VGA)).state, OpenClosed::Open);
        assert_eq!(classify(&synthetic_hand(0.3, 0.4, true,  VGA)).state, OpenClosed::Closed);
    }

    #[test]
    fn pinch_rule_agrees_with_fold_rule() {
        let pinch = GripRule::Pinch { threshold_px: GripRule::DEFAULT_PINCH_PX };
        assert_eq!(pinch.evaluate(&synthetic_hand(0.5, 0.4, false, VGA)), OpenClosed::Open);
        assert_eq!(pinch.evaluate(&synthetic_hand(0.5, 0.4, true,  VGA)), OpenClosed::Closed);
    }

    #[test]
    fn index_tip_follows_the_mouse() {
        let m = PointerMapper::new(TargetSpace::new(1.0, 1.0));
        for closed in [false, true] {
            let (x, y) = m.map_observation(&synthetic_hand(0.2, 0.6, closed, VGA));
            assert!((x - 0.2).abs() < 1e-5 && (y - 0.6).abs() < 1e-5);
        }
    }

    #[test]
    fn wrist_sits_near_pointer_zone() {
        assert_eq!(classify(&synthetic_hand(0.2, 0.3, false, VGA)).zone, Zone::Left);
        assert_eq!(classify(&synthetic_hand(0.7, 0.3, false, VGA)).zone, Zone::Right);
    }

    #[test]
    fn source_tracks_input_and_ends_on_disconnect() {
        let (tx, rx) = mpsc::channel();
        let mut src = SimLandmarkSource::new(rx, VGA, Duration::ZERO);

        let frame = src.next_frame().unwrap().unwrap();
        assert!(frame.hands.is_empty());

        tx.send(SimInput::Pointer { x: 0.25, y: 0.5 }).unwrap();
        tx.send(SimInput::Grip(true)).unwrap();
        let frame = src.next_frame().unwrap().unwrap();
        assert_eq!(frame.hands.len(), 1);
        assert_eq!(classify(&frame.hands[0]).state, OpenClosed::Closed);
        assert_eq!((frame.image.width, frame.image.height), (640, 480));

        tx.send(SimInput::Absent).unwrap();
        assert!(src.next_frame().unwrap().unwrap().hands.is_empty());

        drop(tx);
        assert!(src.next_frame().unwrap().is_none());
    }
}
