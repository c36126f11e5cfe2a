//! Drag-box mode: boxes in an arena picked up by closing the hand over them.
//!
//! One pointer and one open/closed state drive every box. Two boxes held at
//! once both follow the pointer and end up stacked; nothing prevents it.

use std::sync::Arc;

use hand_gesture::{GripRule, OpenClosed, PointerMapper};
use hand_landmarks::HandObservation;

use crate::frame::FrameImage;

pub const BOX_RED:   u32 = 0xFFFF0000;
pub const BOX_BLUE:  u32 = 0xFF0000FF;

// ════════════════════════════════════════════════════════════════════════════
// HandSignal / PointerTracker — detection side
// ════════════════════════════════════════════════════════════════════════════

/// The single hand the game listens to: where it points and whether it grips.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandSignal {
    pub pointer: (f32, f32),
    pub state:   OpenClosed,
}

impl Default for HandSignal {
    fn default() -> Self {
        HandSignal { pointer: (0.0, 0.0), state: OpenClosed::Open }
    }
}

/// Turns detection frames into [`HandSignal`]s in arena coordinates.
///
/// A frame without hands leaves the previous signal in place, so a hand that
/// drops out of view keeps its last pointer and grip.
#[derive(Debug)]
pub struct PointerTracker {
    mapper: PointerMapper,
    grip:   GripRule,
    last:   HandSignal,
}

impl PointerTracker {
    pub fn new(mapper: PointerMapper, grip: GripRule) -> Self {
        PointerTracker { mapper, grip, last: HandSignal::default() }
    }

    /// Returns the new signal when the frame held a hand (the last hand wins
    /// when there are several).
    pub fn observe_frame(&mut self, hands: &[HandObservation]) -> Option<HandSignal> {
        let hand = hands.last()?;
        self.last = HandSignal {
            pointer: self.mapper.map_observation(hand),
            state:   self.grip.evaluate(hand),
        };
        Some(self.last)
    }

    pub fn last(&self) -> HandSignal {
        self.last
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Arena / DraggableObject
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arena {
    pub width:  f32,
    pub height: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DraggableObject {
    pub position:  (f32, f32),
    pub held:      bool,
    /// Pointer is over the object this tick.
    pub targeted:  bool,
    pub half_size: f32,
    pub color:     u32,
}

impl DraggableObject {
    pub fn new(position: (f32, f32), half_size: f32, color: u32) -> Self {
        DraggableObject { position, held: false, targeted: false, half_size, color }
    }

    /// Pointer within the `±half_extent` square around the centre
    /// (edges included).
    pub fn overlaps(&self, (px, py): (f32, f32), half_extent: f32) -> bool {
        let (x, y) = self.position;
        (x - half_extent..=x + half_extent).contains(&px)
            && (y - half_extent..=y + half_extent).contains(&py)
    }

    /// Keep the whole object inside the arena.
    pub fn clamp_to(&mut self, arena: Arena) {
        let h = self.half_size;
        self.position.0 = self.position.0.clamp(h, (arena.width  - h).max(h));
        self.position.1 = self.position.1.clamp(h, (arena.height - h).max(h));
    }
}

// ════════════════════════════════════════════════════════════════════════════
// DragBoxController — render side
// ════════════════════════════════════════════════════════════════════════════

/// Render-facing view of one object.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObjectView {
    pub position:  (f32, f32),
    pub held:      bool,
    pub targeted:  bool,
    pub half_size: f32,
    pub color:     u32,
}

/// What the renderer gets once per tick.
#[derive(Clone, Debug)]
pub struct DragBoxSnapshot {
    pub pointer:     (f32, f32),
    pub hand_closed: bool,
    pub objects:     Vec<ObjectView>,
    pub frame:       Option<Arc<FrameImage>>,
}

#[derive(Debug)]
pub struct DragBoxController {
    arena:       Arena,
    objects:     Vec<DraggableObject>,
    half_extent: f32,
}

impl DragBoxController {
    pub fn new(arena: Arena, objects: Vec<DraggableObject>, half_extent: f32) -> Self {
        DragBoxController { arena, objects, half_extent }
    }

    /// Red box in the bottom-right corner, blue box in the bottom-left.
    pub fn with_default_boxes(arena: Arena, half_size: f32, half_extent: f32) -> Self {
        let inset = 2.0 * half_size;
        let objects = vec![
            DraggableObject::new((arena.width - inset, arena.height - inset), half_size, BOX_RED),
            DraggableObject::new((inset, arena.height - inset), half_size, BOX_BLUE),
        ];
        Self::new(arena, objects, half_extent)
    }

    /// Advance every object by one tick against the current hand signal.
    pub fn tick(&mut self, signal: HandSignal) {
        let closed = signal.state.is_closed();
        for obj in &mut self.objects {
            obj.targeted = obj.overlaps(signal.pointer, self.half_extent);
            if obj.targeted && closed && !obj.held {
                obj.held = true;
                log::debug!("[boxes] picked up box at {:?}", obj.position);
            }
            if obj.held {
                obj.position = signal.pointer;
                if !closed {
                    obj.held = false;
                    log::debug!("[boxes] dropped box at {:?}", obj.position);
                }
            }
            obj.clamp_to(self.arena);
        }
    }

    pub fn objects(&self) -> &[DraggableObject] {
        &self.objects
    }

    pub fn snapshot(&self, signal: HandSignal, frame: Option<Arc<FrameImage>>) -> DragBoxSnapshot {
        DragBoxSnapshot {
            pointer:     signal.pointer,
            hand_closed: signal.state.is_closed(),
            objects: self.objects.iter().map(|o| ObjectView {
                position:  o.position,
                held:      o.held,
                targeted:  o.targeted,
                half_size: o.half_size,
                color:     o.color,
            }).collect(),
            frame,
        }
    }
}
