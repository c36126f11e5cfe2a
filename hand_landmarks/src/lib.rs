//! # hand_landmarks
//!
//! The vocabulary shared by every stage of the hand-gesture pipeline:
//! named landmark ids, normalized landmark points, and the per-frame
//! [`HandObservation`] a landmark detector yields for one hand.
//!
//! Landmark numbering follows the common 21-point hand model:
//!
//! | id | name | id | name |
//! |---|---|---|---|
//! | 0 | wrist | 11 | middle DIP |
//! | 1–4 | thumb CMC, MCP, IP, tip | 12 | middle tip |
//! | 5 | index MCP | 13–16 | ring MCP, PIP, DIP, tip |
//! | 6 | index PIP | 17–20 | pinky MCP, PIP, DIP, tip |
//! | 7 | index DIP | | |
//! | 8 | index tip | | |
//! | 9 | middle MCP | | |
//! | 10 | middle PIP | | |
//!
//! Nothing outside this crate indexes landmarks by number; everything goes
//! through [`LandmarkId`].
//!
//! The [`wire`] module reads the JSON-lines format external detectors emit.

pub mod wire;

// ════════════════════════════════════════════════════════════════════════════
// LandmarkId
// ════════════════════════════════════════════════════════════════════════════

/// Number of landmarks in one hand.
pub const LANDMARK_COUNT: usize = 21;

/// Named anatomical point on a hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LandmarkId {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

impl LandmarkId {
    /// All ids in detector order.
    pub const ALL: [LandmarkId; LANDMARK_COUNT] = [
        LandmarkId::Wrist,
        LandmarkId::ThumbCmc,
        LandmarkId::ThumbMcp,
        LandmarkId::ThumbIp,
        LandmarkId::ThumbTip,
        LandmarkId::IndexMcp,
        LandmarkId::IndexPip,
        LandmarkId::IndexDip,
        LandmarkId::IndexTip,
        LandmarkId::MiddleMcp,
        LandmarkId::MiddlePip,
        LandmarkId::MiddleDip,
        LandmarkId::MiddleTip,
        LandmarkId::RingMcp,
        LandmarkId::RingPip,
        LandmarkId::RingDip,
        LandmarkId::RingTip,
        LandmarkId::PinkyMcp,
        LandmarkId::PinkyPip,
        LandmarkId::PinkyDip,
        LandmarkId::PinkyTip,
    ];

    /// Position of this landmark in a detector's output array.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(i: usize) -> Option<LandmarkId> {
        Self::ALL.get(i).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            LandmarkId::Wrist     => "wrist",
            LandmarkId::ThumbCmc  => "thumb_cmc",
            LandmarkId::ThumbMcp  => "thumb_mcp",
            LandmarkId::ThumbIp   => "thumb_ip",
            LandmarkId::ThumbTip  => "thumb_tip",
            LandmarkId::IndexMcp  => "index_mcp",
            LandmarkId::IndexPip  => "index_pip",
            LandmarkId::IndexDip  => "index_dip",
            LandmarkId::IndexTip  => "index_tip",
            LandmarkId::MiddleMcp => "middle_mcp",
            LandmarkId::MiddlePip => "middle_pip",
            LandmarkId::MiddleDip => "middle_dip",
            LandmarkId::MiddleTip => "middle_tip",
            LandmarkId::RingMcp   => "ring_mcp",
            LandmarkId::RingPip   => "ring_pip",
            LandmarkId::RingDip   => "ring_dip",
            LandmarkId::RingTip   => "ring_tip",
            LandmarkId::PinkyMcp  => "pinky_mcp",
            LandmarkId::PinkyPip  => "pinky_pip",
            LandmarkId::PinkyDip  => "pinky_dip",
            LandmarkId::PinkyTip  => "pinky_tip",
        }
    }
}

/// Bone segments used to draw a hand skeleton.
pub const HAND_CONNECTIONS: [(LandmarkId, LandmarkId); 21] = {
    use LandmarkId::*;
    [
        (Wrist, ThumbCmc), (ThumbCmc, ThumbMcp), (ThumbMcp, ThumbIp), (ThumbIp, ThumbTip),
        (Wrist, IndexMcp), (IndexMcp, IndexPip), (IndexPip, IndexDip), (IndexDip, IndexTip),
        (IndexMcp, MiddleMcp), (MiddleMcp, MiddlePip), (MiddlePip, MiddleDip), (MiddleDip, MiddleTip),
        (MiddleMcp, RingMcp), (RingMcp, RingPip), (RingPip, RingDip), (RingDip, RingTip),
        (RingMcp, PinkyMcp), (PinkyMcp, PinkyPip), (PinkyPip, PinkyDip), (PinkyDip, PinkyTip),
        (Wrist, PinkyMcp),
    ]
};

// ════════════════════════════════════════════════════════════════════════════
// Landmark / FrameSize
// ════════════════════════════════════════════════════════════════════════════

/// A 2D landmark in normalized frame coordinates (`0.0..=1.0`, y grows
/// downward).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Landmark { x, y }
    }

    /// Convert to frame-pixel coordinates.
    pub fn to_pixels(self, size: FrameSize) -> (f32, f32) {
        (self.x * size.width as f32, self.y * size.height as f32)
    }
}

/// Pixel dimensions of a camera frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameSize {
    pub width:  u32,
    pub height: u32,
}

impl FrameSize {
    pub fn new(width: u32, height: u32) -> Self {
        FrameSize { width, height }
    }

    /// Vertical line splitting the frame into its left and right zones.
    pub fn midline_x(self) -> f32 {
        self.width as f32 / 2.0
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandObservation
// ════════════════════════════════════════════════════════════════════════════

/// All 21 landmarks of one detected hand in one frame.
///
/// Observations are built fresh for every frame and are never carried across
/// frames.
#[derive(Clone, Debug, PartialEq)]
pub struct HandObservation {
    points: [Landmark; LANDMARK_COUNT],
    size:   FrameSize,
}

impl HandObservation {
    pub fn new(points: [Landmark; LANDMARK_COUNT], size: FrameSize) -> Self {
        HandObservation { points, size }
    }

    /// Build from a detector's ordered point list.
    ///
    /// Returns `None` unless exactly [`LANDMARK_COUNT`] points are given.
    pub fn from_points(points: &[Landmark], size: FrameSize) -> Option<Self> {
        let points: [Landmark; LANDMARK_COUNT] = points.try_into().ok()?;
        Some(HandObservation { points, size })
    }

    pub fn get(&self, id: LandmarkId) -> Landmark {
        self.points[id.index()]
    }

    /// Landmark position in frame pixels.
    pub fn pixel(&self, id: LandmarkId) -> (f32, f32) {
        self.get(id).to_pixels(self.size)
    }

    pub fn frame_size(&self) -> FrameSize {
        self.size
    }

    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.points
    }

    /// Mirror image of this observation (`x → 1 − x`), as seen through a
    /// horizontally flipped camera.
    pub fn mirrored(&self) -> Self {
        let mut points = self.points;
        for p in &mut points {
            p.x = 1.0 - p.x;
        }
        HandObservation { points, size: self.size }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_hand(x: f32, y: f32) -> HandObservation {
        HandObservation::new([Landmark::new(x, y); LANDMARK_COUNT], FrameSize::new(640, 480))
    }

    #[test]
    fn ids_round_trip_through_index() {
        for (i, id) in LandmarkId::ALL.iter().enumerate() {
            assert_eq!(id.index(), i);
            assert_eq!(LandmarkId::from_index(i), Some(*id));
        }
        assert_eq!(LandmarkId::from_index(LANDMARK_COUNT), None);
    }

    #[test]
    fn well_known_indices() {
        assert_eq!(LandmarkId::Wrist.index(), 0);
        assert_eq!(LandmarkId::ThumbTip.index(), 4);
        assert_eq!(LandmarkId::IndexPip.index(), 6);
        assert_eq!(LandmarkId::IndexTip.index(), 8);
        assert_eq!(LandmarkId::MiddleTip.index(), 12);
        assert_eq!(LandmarkId::RingPip.index(), 14);
        assert_eq!(LandmarkId::PinkyTip.index(), 20);
    }

    #[test]
    fn to_pixels_scales_by_frame() {
        let px = Landmark::new(0.5, 0.25).to_pixels(FrameSize::new(640, 480));
        assert_eq!(px, (320.0, 120.0));
    }

    #[test]
    fn from_points_rejects_wrong_length() {
        let size = FrameSize::new(640, 480);
        assert!(HandObservation::from_points(&[Landmark::default(); 20], size).is_none());
        assert!(HandObservation::from_points(&[Landmark::default(); 21], size).is_some());
    }

    #[test]
    fn mirrored_flips_x_only() {
        let hand = flat_hand(0.2, 0.7).mirrored();
        let w = hand.get(LandmarkId::Wrist);
        assert!((w.x - 0.8).abs() < 1e-6);
        assert_eq!(w.y, 0.7);
    }

    #[test]
    fn connections_stay_in_range() {
        for (a, b) in HAND_CONNECTIONS {
            assert_ne!(a, b);
            assert!(b.index() < LANDMARK_COUNT);
        }
    }
}
