//! Edge-triggered Open→Closed counting, one counter per [`Zone`].

use crate::classify::{OpenClosed, Zone};

// ════════════════════════════════════════════════════════════════════════════
// TrackedZoneState
// ════════════════════════════════════════════════════════════════════════════

/// Memory of one zone across frames.
///
/// `count` never decreases; it grows by one on each Open→Closed transition
/// and at no other time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TrackedZoneState {
    was_open: bool,
    count:    u64,
}

impl TrackedZoneState {
    /// A zone that counts a fist even if no open hand was seen first.
    pub fn armed() -> Self {
        TrackedZoneState { was_open: true, count: 0 }
    }

    /// Feed the state of the hand seen in this zone this frame.
    /// Returns true when this frame produced an increment.
    pub fn observe(&mut self, state: OpenClosed) -> bool {
        match state {
            OpenClosed::Closed if self.was_open => {
                self.count += 1;
                self.was_open = false;
                true
            }
            OpenClosed::Closed => false,
            OpenClosed::Open => {
                self.was_open = true;
                false
            }
        }
    }

    pub fn was_open(&self) -> bool { self.was_open }
    pub fn count(&self)    -> u64  { self.count }
}

// ════════════════════════════════════════════════════════════════════════════
// ZoneCounters
// ════════════════════════════════════════════════════════════════════════════

/// One [`TrackedZoneState`] per zone.
///
/// Only zones that receive an observation change; a zone with no hand this
/// frame keeps both its count and its open memory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ZoneCounters {
    left:  TrackedZoneState,
    right: TrackedZoneState,
}

impl ZoneCounters {
    pub fn armed() -> Self {
        ZoneCounters {
            left:  TrackedZoneState::armed(),
            right: TrackedZoneState::armed(),
        }
    }

    pub fn observe(&mut self, zone: Zone, state: OpenClosed) -> bool {
        self.state_mut(zone).observe(state)
    }

    pub fn count(&self, zone: Zone) -> u64 {
        self.state(zone).count()
    }

    pub fn state(&self, zone: Zone) -> &TrackedZoneState {
        match zone {
            Zone::Left  => &self.left,
            Zone::Right => &self.right,
        }
    }

    fn state_mut(&mut self, zone: Zone) -> &mut TrackedZoneState {
        match zone {
            Zone::Left  => &mut self.left,
            Zone::Right => &mut self.right,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use OpenClosed::{Closed, Open};

    /// Frame indices (1-based) at which an increment fired.
    fn increments(seq: &[OpenClosed]) -> (u64, Vec<usize>) {
        let mut z = TrackedZoneState::default();
        let fired = seq.iter().enumerate()
            .filter_map(|(i, s)| z.observe(*s).then_some(i + 1))
            .collect();
        (z.count(), fired)
    }

    #[test]
    fn open_closed_closed_open_closed_counts_twice() {
        let (count, fired) = increments(&[Open, Closed, Closed, Open, Closed]);
        assert_eq!(count, 2);
        assert_eq!(fired, vec![2, 5]);
    }

    #[test]
    fn sustained_fist_counts_once() {
        let mut seq = vec![Open];
        seq.extend(std::iter::repeat(Closed).take(50));
        assert_eq!(increments(&seq).0, 1);
    }

    #[test]
    fn fist_without_prior_open_does_not_count() {
        assert_eq!(increments(&[Closed, Closed]).0, 0);
        assert_eq!(increments(&[Closed, Open, Closed]).0, 1);
    }

    #[test]
    fn armed_state_counts_first_fist() {
        let mut z = TrackedZoneState::armed();
        assert!(z.observe(Closed));
        assert!(!z.observe(Closed));
        assert_eq!(z.count(), 1);
    }

    #[test]
    fn repeated_open_is_harmless() {
        assert_eq!(increments(&[Open, Open, Open, Closed, Open, Open]).0, 1);
    }

    #[test]
    fn zones_are_independent() {
        let mut c = ZoneCounters::default();
        c.observe(Zone::Left, Open);
        c.observe(Zone::Right, Closed);
        assert!(c.observe(Zone::Left, Closed));
        assert!(!c.observe(Zone::Right, Closed));
        assert_eq!(c.count(Zone::Left), 1);
        assert_eq!(c.count(Zone::Right), 0);
    }

    #[test]
    fn unobserved_zone_keeps_memory() {
        let mut c = ZoneCounters::default();
        for _ in 0..3 {
            c.observe(Zone::Left, Open);
            c.observe(Zone::Left, Closed);
        }
        c.observe(Zone::Left, Open);
        // Ten frames with no hand on the left: nothing is fed.
        for _ in 0..10 {
            c.observe(Zone::Right, Open);
        }
        assert_eq!(c.count(Zone::Left), 3);
        assert!(c.state(Zone::Left).was_open());
        assert!(c.observe(Zone::Left, Closed));
        assert_eq!(c.count(Zone::Left), 4);
    }
}
