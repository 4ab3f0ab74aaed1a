//! Mutation counters driven by cache notifications.

use std::cell::Cell;
use std::rc::Rc;

use crate::handler::Handler;

/// Counters fed by the cache's notification stream.
///
/// `CacheStats` is a ready-made [`Handler`]: hand the cache one `Rc` clone
/// and keep another to read from. Counters use interior mutability, so the
/// reading side needs no `&mut` access.
///
/// ```
/// use std::rc::Rc;
/// use policycache::{Cache, CacheStats, MaxCount};
///
/// let stats = Rc::new(CacheStats::new());
/// let mut cache = Cache::new()
///     .with_policy(MaxCount::new(2))
///     .with_handler(Rc::clone(&stats));
///
/// cache.add("a", 1);
/// cache.add("b", 2);
/// cache.add("a", 3); // update
/// cache.add("c", 4); // evicts "b"
///
/// assert_eq!(stats.inserts(), 3);
/// assert_eq!(stats.updates(), 1);
/// assert_eq!(stats.removals(), 1);
/// assert_eq!(stats.live(), 2);
/// ```
#[derive(Debug, Default)]
pub struct CacheStats {
    inserts: Cell<u64>,
    updates: Cell<u64>,
    removals: Cell<u64>,
}

impl CacheStats {
    /// Create a zeroed counter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total first-time insertions.
    pub fn inserts(&self) -> u64 {
        self.inserts.get()
    }

    /// Total in-place value replacements.
    pub fn updates(&self) -> u64 {
        self.updates.get()
    }

    /// Total removals, whatever their cause.
    pub fn removals(&self) -> u64 {
        self.removals.get()
    }

    /// Entries currently live according to the notification stream.
    pub fn live(&self) -> u64 {
        self.inserts.get().saturating_sub(self.removals.get())
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.inserts.set(0);
        self.updates.set(0);
        self.removals.set(0);
    }

    fn record_insert(&self) {
        self.inserts.set(self.inserts.get() + 1);
    }

    fn record_update(&self) {
        self.updates.set(self.updates.get() + 1);
    }

    fn record_removal(&self) {
        self.removals.set(self.removals.get() + 1);
    }
}

impl<K, V> Handler<K, V> for Rc<CacheStats> {
    fn added(&mut self, _key: &K, old: Option<V>, _new: &V) {
        if old.is_some() {
            self.record_update();
        } else {
            self.record_insert();
        }
    }

    fn removed(&mut self, _key: K, _value: V) {
        self.record_removal();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_counts_by_kind() {
        let stats = Rc::new(CacheStats::new());
        let mut handler = Rc::clone(&stats);

        Handler::<i32, i32>::added(&mut handler, &1, None, &10);
        Handler::<i32, i32>::added(&mut handler, &1, Some(10), &20);
        Handler::<i32, i32>::removed(&mut handler, 1, 20);

        assert_eq!(stats.inserts(), 1);
        assert_eq!(stats.updates(), 1);
        assert_eq!(stats.removals(), 1);
        assert_eq!(stats.live(), 0);
    }

    #[test]
    fn test_stats_reset() {
        let stats = Rc::new(CacheStats::new());
        let mut handler = Rc::clone(&stats);

        Handler::<i32, i32>::added(&mut handler, &1, None, &10);
        stats.reset();

        assert_eq!(stats.inserts(), 0);
        assert_eq!(stats.updates(), 0);
        assert_eq!(stats.removals(), 0);
        assert_eq!(stats.live(), 0);
    }
}
