//! Latest-value cells for handing data from the detection thread to the
//! render loop.
//!
//! A cell has exactly one [`LatestWriter`] and any number of
//! [`LatestReader`]s. Publishing replaces the previous value wholesale;
//! nothing is queued, and a reader that polls faster than the writer simply
//! sees the same value again.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

struct Slot<T> {
    value:   Mutex<Option<Arc<T>>>,
    version: AtomicU64,
}

impl<T> Slot<T> {
    fn lock(&self) -> MutexGuard<'_, Option<Arc<T>>> {
        // A panicking writer leaves the last complete value behind; keep
        // serving it.
        self.value.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// The single writing end of a cell. Not `Clone`.
pub struct LatestWriter<T> {
    slot: Arc<Slot<T>>,
}

/// A reading end of a cell.
pub struct LatestReader<T> {
    slot: Arc<Slot<T>>,
}

impl<T> Clone for LatestReader<T> {
    fn clone(&self) -> Self {
        LatestReader { slot: Arc::clone(&self.slot) }
    }
}

/// Create an empty cell.
pub fn latest<T>() -> (LatestWriter<T>, LatestReader<T>) {
    let slot = Arc::new(Slot { value: Mutex::new(None), version: AtomicU64::new(0) });
    (LatestWriter { slot: Arc::clone(&slot) }, LatestReader { slot })
}

impl<T> LatestWriter<T> {
    pub fn publish(&self, value: T) {
        let value = Arc::new(value);
        *self.slot.lock() = Some(value);
        self.slot.version.fetch_add(1, Ordering::Release);
    }
}

impl<T> LatestReader<T> {
    /// Most recently published value, if any. Never blocks on the writer
    /// for longer than a pointer swap.
    pub fn read(&self) -> Option<Arc<T>> {
        self.slot.lock().clone()
    }

    /// Number of values published so far.
    pub fn version(&self) -> u64 {
        self.slot.version.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn empty_until_published() {
        let (_w, r) = latest::<u32>();
        assert!(r.read().is_none());
        assert_eq!(r.version(), 0);
    }

    #[test]
    fn later_values_overwrite_earlier_ones() {
        let (w, r) = latest();
        w.publish(1);
        w.publish(2);
        w.publish(3);
        assert_eq!(*r.read().unwrap(), 3);
        assert_eq!(r.version(), 3);
    }

    #[test]
    fn stale_reads_repeat_the_value() {
        let (w, r) = latest();
        w.publish("frame");
        let a = r.read().unwrap();
        let b = r.read().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn readers_share_one_cell() {
        let (w, r1) = latest();
        let r2 = r1.clone();
        w.publish(7u8);
        assert_eq!(r1.read(), r2.read());
    }

    #[test]
    fn value_survives_writer_drop() {
        let (w, r) = latest();
        let h = thread::spawn(move || {
            for i in 0..100u32 {
                w.publish(i);
            }
        });
        h.join().unwrap();
        assert_eq!(*r.read().unwrap(), 99);
    }
}
