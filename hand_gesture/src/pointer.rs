//! Fingertip → target-space mapping.
//!
//! The mapping is a plain proportional rescale of the current frame's
//! landmark. Nothing is smoothed, so detector jitter reaches the output
//! unchanged.

use hand_landmarks::{FrameSize, HandObservation, Landmark, LandmarkId};

/// Size of the surface the pointer lives on (a game arena, a panel).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetSpace {
    pub width:  f32,
    pub height: f32,
}

impl TargetSpace {
    pub fn new(width: f32, height: f32) -> Self {
        TargetSpace { width, height }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerMapper {
    target: TargetSpace,
    flip_x: bool,
    flip_y: bool,
    /// Landmark that drives the pointer.
    anchor: LandmarkId,
}

impl PointerMapper {
    pub fn new(target: TargetSpace) -> Self {
        PointerMapper { target, flip_x: false, flip_y: false, anchor: LandmarkId::IndexTip }
    }

    pub fn with_flip(mut self, flip_x: bool, flip_y: bool) -> Self {
        self.flip_x = flip_x;
        self.flip_y = flip_y;
        self
    }

    pub fn with_anchor(mut self, anchor: LandmarkId) -> Self {
        self.anchor = anchor;
        self
    }

    /// Map a frame-pixel position into target space.
    pub fn map_point(&self, (px, py): (f32, f32), frame: FrameSize) -> (f32, f32) {
        let mut x = px * self.target.width  / frame.width  as f32;
        let mut y = py * self.target.height / frame.height as f32;
        if self.flip_x { x = self.target.width  - x; }
        if self.flip_y { y = self.target.height - y; }
        (x, y)
    }

    pub fn map_landmark(&self, lm: Landmark, frame: FrameSize) -> (f32, f32) {
        self.map_point(lm.to_pixels(frame), frame)
    }

    /// Pointer position for a hand, taken from the anchor landmark
    /// (the index fingertip unless changed).
    pub fn map_observation(&self, hand: &HandObservation) -> (f32, f32) {
        self.map_landmark(hand.get(self.anchor), hand.frame_size())
    }
}
