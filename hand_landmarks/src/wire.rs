//! JSON-lines wire format for landmark detectors running outside the process.
//!
//! One frame per line:
//!
//! ```text
//! {"width":640,"height":480,"hands":[{"landmarks":[[0.51,0.80],[0.48,0.74], …]}]}
//! ```
//!
//! Points may also be written as `{"x":…,"y":…,"z":…}` objects (the `z` value
//! is ignored). Each hand must carry exactly 21 points.
//!
//! Frames larger than [`MAX_FRAME_SIDE`] on either side are rejected, and so
//! are coordinates that are not finite or fall more than [`COORD_MARGIN`]
//! outside `0.0..=1.0`.

use std::fmt;

use serde::Deserialize;

use crate::{FrameSize, HandObservation, Landmark, LANDMARK_COUNT};

/// Largest accepted frame width or height, in pixels.
pub const MAX_FRAME_SIDE: u32 = 8192;

/// How far outside the unit square a normalized coordinate may fall.
/// Detectors report landmarks a little past the frame edge when a hand is
/// partly out of view.
pub const COORD_MARGIN: f32 = 0.5;

// ════════════════════════════════════════════════════════════════════════════
// Records
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PointRecord {
    Seq(Vec<f32>),
    Object {
        x: f32,
        y: f32,
        #[serde(default)]
        #[allow(dead_code)]
        z: f32,
    },
}

#[derive(Debug, Deserialize)]
struct HandRecord {
    landmarks: Vec<PointRecord>,
}

#[derive(Debug, Deserialize)]
struct FrameRecord {
    width:  u32,
    height: u32,
    #[serde(default)]
    hands:  Vec<HandRecord>,
}

/// One decoded detector frame.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectedFrame {
    pub size:  FrameSize,
    pub hands: Vec<HandObservation>,
}

// ════════════════════════════════════════════════════════════════════════════
// WireError
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub enum WireError {
    /// The line is not valid JSON for a frame record.
    Json(serde_json::Error),
    /// Width or height is zero.
    EmptyFrame,
    /// Width or height exceeds [`MAX_FRAME_SIDE`].
    FrameTooLarge { width: u32, height: u32 },
    /// A hand has the wrong number of landmarks.
    LandmarkCount { hand: usize, found: usize },
    /// A point array has fewer than two coordinates.
    ShortPoint { hand: usize, point: usize },
    /// A coordinate is not finite or lies too far outside the frame.
    OutOfRange { hand: usize, point: usize },
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireError::Json(e) => write!(f, "malformed frame record: {}", e),
            WireError::EmptyFrame => write!(f, "frame has zero width or height"),
            WireError::FrameTooLarge { width, height } => write!(
                f, "frame {}x{} exceeds {} pixels per side", width, height, MAX_FRAME_SIDE
            ),
            WireError::LandmarkCount { hand, found } => write!(
                f, "hand {} has {} landmarks, expected {}", hand, found, LANDMARK_COUNT
            ),
            WireError::ShortPoint { hand, point } => write!(
                f, "hand {} point {} needs at least x and y", hand, point
            ),
            WireError::OutOfRange { hand, point } => write!(
                f, "hand {} point {} lies outside the frame", hand, point
            ),
        }
    }
}

impl std::error::Error for WireError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WireError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for WireError {
    fn from(e: serde_json::Error) -> Self {
        WireError::Json(e)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// parse_line
// ════════════════════════════════════════════════════════════════════════════

/// Decode one line of detector output.
pub fn parse_line(line: &str) -> Result<DetectedFrame, WireError> {
    let record: FrameRecord = serde_json::from_str(line)?;
    if record.width == 0 || record.height == 0 {
        return Err(WireError::EmptyFrame);
    }
    if record.width > MAX_FRAME_SIDE || record.height > MAX_FRAME_SIDE {
        return Err(WireError::FrameTooLarge { width: record.width, height: record.height });
    }
    let size = FrameSize::new(record.width, record.height);

    let mut hands = Vec::with_capacity(record.hands.len());
    for (h, hand) in record.hands.into_iter().enumerate() {
        if hand.landmarks.len() != LANDMARK_COUNT {
            return Err(WireError::LandmarkCount { hand: h, found: hand.landmarks.len() });
        }
        let mut points = [Landmark::default(); LANDMARK_COUNT];
        for (i, p) in hand.landmarks.into_iter().enumerate() {
            let lm = match p {
                PointRecord::Seq(v) if v.len() >= 2 => Landmark::new(v[0], v[1]),
                PointRecord::Seq(_) => return Err(WireError::ShortPoint { hand: h, point: i }),
                PointRecord::Object { x, y, .. } => Landmark::new(x, y),
            };
            if !in_range(lm.x) || !in_range(lm.y) {
                return Err(WireError::OutOfRange { hand: h, point: i });
            }
            points[i] = lm;
        }
        hands.push(HandObservation::new(points, size));
    }

    Ok(DetectedFrame { size, hands })
}

fn in_range(v: f32) -> bool {
    v.is_finite() && (-COORD_MARGIN..=1.0 + COORD_MARGIN).contains(&v)
}
