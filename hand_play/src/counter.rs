//! Counter-display mode: one fist counter and one highlight per zone.

use std::sync::Arc;

use hand_gesture::{classify_with, GripRule, Zone, ZoneCounters};
use hand_landmarks::HandObservation;

use crate::frame::FrameImage;

/// Per-zone state published by the detection thread after every frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CounterState {
    pub left_count:        u64,
    pub right_count:       u64,
    pub left_highlighted:  bool,
    pub right_highlighted: bool,
}

impl CounterState {
    pub fn count(&self, zone: Zone) -> u64 {
        match zone {
            Zone::Left  => self.left_count,
            Zone::Right => self.right_count,
        }
    }

    pub fn highlighted(&self, zone: Zone) -> bool {
        match zone {
            Zone::Left  => self.left_highlighted,
            Zone::Right => self.right_highlighted,
        }
    }
}

/// What the renderer gets once per tick.
#[derive(Clone, Debug, Default)]
pub struct CounterSnapshot {
    pub state: CounterState,
    pub frame: Option<Arc<FrameImage>>,
}

// ════════════════════════════════════════════════════════════════════════════
// CounterController
// ════════════════════════════════════════════════════════════════════════════

/// Owns the zone counters. Runs on the detection thread so that every
/// detected frame passes through the edge detectors, however slowly the
/// renderer polls.
#[derive(Debug)]
pub struct CounterController {
    counters:    ZoneCounters,
    highlighted: [bool; 2],
    grip:        GripRule,
}

impl CounterController {
    pub fn new(grip: GripRule, armed_at_start: bool) -> Self {
        CounterController {
            counters: if armed_at_start { ZoneCounters::armed() } else { ZoneCounters::default() },
            highlighted: [false; 2],
            grip,
        }
    }

    /// Apply one detection frame. Highlights are recomputed from scratch;
    /// counters only change for zones holding a hand. Returns the zones
    /// whose count went up.
    pub fn observe_frame(&mut self, hands: &[HandObservation]) -> Vec<Zone> {
        self.highlighted = [false; 2];
        let mut fired = Vec::new();
        for hand in hands {
            let c = classify_with(hand, self.grip);
            self.highlighted[zone_slot(c.zone)] = true;
            if self.counters.observe(c.zone, c.state) {
                log::debug!(
                    "[counter] {} fist -> {}",
                    c.zone.name(), self.counters.count(c.zone)
                );
                fired.push(c.zone);
            }
        }
        fired
    }

    pub fn state(&self) -> CounterState {
        CounterState {
            left_count:        self.counters.count(Zone::Left),
            right_count:       self.counters.count(Zone::Right),
            left_highlighted:  self.highlighted[zone_slot(Zone::Left)],
            right_highlighted: self.highlighted[zone_slot(Zone::Right)],
        }
    }
}

fn zone_slot(zone: Zone) -> usize {
    match zone {
        Zone::Left  => 0,
        Zone::Right => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::synthetic_hand;
    use hand_landmarks::FrameSize;

    const VGA: FrameSize = FrameSize { width: 640, height: 480 };

    fn left(closed: bool) -> HandObservation { synthetic_hand(0.2, 0.4, closed, VGA) }
    fn right(closed: bool) -> HandObservation { synthetic_hand(0.7, 0.4, closed, VGA) }

    #[test]
    fn open_then_fist_counts_in_its_zone() {
        let mut c = CounterController::new(GripRule::Fold, false);
        c.observe_frame(&[left(false)]);
        assert_eq!(c.observe_frame(&[left(true)]), vec![Zone::Left]);
        assert!(c.observe_frame(&[left(true)]).is_empty());
        let s = c.state();
        assert_eq!((s.left_count, s.right_count), (1, 0));
        assert!(s.left_highlighted && !s.right_highlighted);
    }

    #[test]
    fn absent_zone_keeps_count_and_loses_highlight() {
        let mut c = CounterController::new(GripRule::Fold, false);
        for _ in 0..3 {
            c.observe_frame(&[left(false)]);
            c.observe_frame(&[left(true)]);
        }
        assert_eq!(c.state().left_count, 3);
        for _ in 0..10 {
            c.observe_frame(&[]);
            let s = c.state();
            assert_eq!(s.left_count, 3);
            assert!(!s.left_highlighted);
            assert!(!s.right_highlighted);
        }
    }

    #[test]
    fn two_hands_feed_two_zones() {
        let mut c = CounterController::new(GripRule::Fold, false);
        c.observe_frame(&[left(false), right(false)]);
        let fired = c.observe_frame(&[left(true), right(true)]);
        assert_eq!(fired, vec![Zone::Left, Zone::Right]);
        let s = c.state();
        for zone in Zone::ALL {
            assert_eq!(s.count(zone), 1, "{} count", zone.name());
            assert!(s.highlighted(zone), "{} highlight", zone.name());
        }
    }

    #[test]
    fn armed_controller_counts_a_first_fist() {
        let mut c = CounterController::new(GripRule::Fold, true);
        assert_eq!(c.observe_frame(&[right(true)]), vec![Zone::Right]);
    }

    #[test]
    fn hand_crossing_midline_moves_highlight() {
        let mut c = CounterController::new(GripRule::Fold, false);
        c.observe_frame(&[left(false)]);
        c.observe_frame(&[right(false)]);
        let s = c.state();
        assert!(!s.left_highlighted && s.right_highlighted);
    }
}
