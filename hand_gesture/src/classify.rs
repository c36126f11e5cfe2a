//! Memoryless per-frame classification of one hand.

use hand_landmarks::{HandObservation, LandmarkId};
use serde::Deserialize;

// ════════════════════════════════════════════════════════════════════════════
// Zone
// ════════════════════════════════════════════════════════════════════════════

/// Which half of the camera frame a hand occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Zone {
    Left,
    Right,
}

impl Zone {
    pub const ALL: [Zone; 2] = [Zone::Left, Zone::Right];

    pub fn name(self) -> &'static str {
        match self {
            Zone::Left  => "left",
            Zone::Right => "right",
        }
    }
}

/// Zone of a hand, decided by its wrist alone: strictly left of the
/// midline is `Left`, anything else is `Right`.
pub fn classify_zone(hand: &HandObservation) -> Zone {
    let (x, _) = hand.pixel(LandmarkId::Wrist);
    if x < hand.frame_size().midline_x() { Zone::Left } else { Zone::Right }
}

// ════════════════════════════════════════════════════════════════════════════
// OpenClosed
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpenClosed {
    Open,
    Closed,
}

impl OpenClosed {
    pub fn is_closed(self) -> bool {
        self == OpenClosed::Closed
    }
}

/// The four voting fingers as `(tip, PIP knuckle)` pairs. The thumb does not
/// vote.
pub const FINGERS: [(LandmarkId, LandmarkId); 4] = [
    (LandmarkId::IndexTip,  LandmarkId::IndexPip),
    (LandmarkId::MiddleTip, LandmarkId::MiddlePip),
    (LandmarkId::RingTip,   LandmarkId::RingPip),
    (LandmarkId::PinkyTip,  LandmarkId::PinkyPip),
];

/// Number of voting fingers whose tip is above (smaller y than) its knuckle.
pub fn fingers_extended(hand: &HandObservation) -> usize {
    FINGERS
        .iter()
        .filter(|(tip, pip)| hand.get(*tip).y < hand.get(*pip).y)
        .count()
}

/// `Closed` iff no voting finger is extended.
pub fn classify_open_closed(hand: &HandObservation) -> OpenClosed {
    if fingers_extended(hand) == 0 { OpenClosed::Closed } else { OpenClosed::Open }
}

// ════════════════════════════════════════════════════════════════════════════
// GripRule — how "closed" is decided
// ════════════════════════════════════════════════════════════════════════════

/// Rule used to turn one hand into [`OpenClosed`].
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum GripRule {
    /// All four fingers folded below their knuckles.
    Fold,
    /// Thumb tip and index tip closer than `threshold_px` frame pixels.
    Pinch { threshold_px: f32 },
}

impl Default for GripRule {
    fn default() -> Self {
        GripRule::Fold
    }
}

impl GripRule {
    pub const DEFAULT_PINCH_PX: f32 = 50.0;

    pub fn evaluate(self, hand: &HandObservation) -> OpenClosed {
        match self {
            GripRule::Fold => classify_open_closed(hand),
            GripRule::Pinch { threshold_px } => {
                let (tx, ty) = hand.pixel(LandmarkId::ThumbTip);
                let (ix, iy) = hand.pixel(LandmarkId::IndexTip);
                if (tx - ix).hypot(ty - iy) < threshold_px {
                    OpenClosed::Closed
                } else {
                    OpenClosed::Open
                }
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Classification
// ════════════════════════════════════════════════════════════════════════════

/// Everything the classifier says about one hand in one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Classification {
    pub zone:  Zone,
    pub state: OpenClosed,
}

/// Classify with the finger-fold rule.
pub fn classify(hand: &HandObservation) -> Classification {
    classify_with(hand, GripRule::Fold)
}

pub fn classify_with(hand: &HandObservation, rule: GripRule) -> Classification {
    Classification {
        zone:  classify_zone(hand),
        state: rule.evaluate(hand),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
