//! # hand_gesture
//!
//! Per-frame interpretation of hand landmarks:
//!
//! * [`classify`] — which half of the frame a hand is in ([`Zone`]) and
//!   whether it is open or closed ([`OpenClosed`]).
//! * [`edge`] — edge-triggered Open→Closed counting per zone.
//! * [`pointer`] — linear mapping of a fingertip into another coordinate
//!   space (a game canvas, a window panel).
//!
//! ## Quick start
//!
//! ```rust
//! use hand_gesture::{classify, OpenClosed, Zone, ZoneCounters};
//! use hand_landmarks::{FrameSize, HandObservation, Landmark, LandmarkId, LANDMARK_COUNT};
//!
//! // A fist in the left half of a 640×480 frame: every fingertip sits
//! // below its PIP knuckle.
//! let mut pts = [Landmark::new(0.25, 0.5); LANDMARK_COUNT];
//! for (tip, pip) in [(LandmarkId::IndexTip, LandmarkId::IndexPip),
//!                    (LandmarkId::MiddleTip, LandmarkId::MiddlePip),
//!                    (LandmarkId::RingTip, LandmarkId::RingPip),
//!                    (LandmarkId::PinkyTip, LandmarkId::PinkyPip)] {
//!     pts[pip.index()].y = 0.50;
//!     pts[tip.index()].y = 0.55;
//! }
//! let hand = HandObservation::new(pts, FrameSize::new(640, 480));
//!
//! let c = classify(&hand);
//! assert_eq!(c.zone, Zone::Left);
//! assert_eq!(c.state, OpenClosed::Closed);
//!
//! let mut counters = ZoneCounters::default();
//! counters.observe(Zone::Left, OpenClosed::Open);
//! assert!(counters.observe(Zone::Left, c.state));
//! assert_eq!(counters.count(Zone::Left), 1);
//! ```
//!
//! ## Known limitation
//!
//! Zone classification has no hysteresis: a wrist sitting on the midline can
//! alternate between `Left` and `Right` on consecutive frames, and so can the
//! zone that receives a count.

pub mod classify;
pub mod edge;
pub mod pointer;

pub use classify::{
    classify, classify_open_closed, classify_with, classify_zone, fingers_extended,
    Classification, GripRule, OpenClosed, Zone, FINGERS,
};
pub use edge::{TrackedZoneState, ZoneCounters};
pub use pointer::{PointerMapper, TargetSpace};
