//! Change handlers: the notification side of the cache.

/// Observes cache mutations.
///
/// Both methods default to no-ops so an implementation can override only
/// the side it cares about. Calls are synchronous and arrive after the
/// cache has finished the mutation; handlers must not touch the cache that
/// is notifying them.
///
/// A handler maintaining an aggregate can pair with a policy that reads it,
/// sharing state through `Rc`:
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use policycache::{Cache, Handler, PolicyFn};
///
/// struct SizeTally(Rc<Cell<u64>>);
///
/// impl Handler<&'static str, u64> for SizeTally {
///     fn added(&mut self, _key: &&'static str, old: Option<u64>, new: &u64) {
///         self.0.set(self.0.get() - old.unwrap_or(0) + *new);
///     }
///
///     fn removed(&mut self, _key: &'static str, value: u64) {
///         self.0.set(self.0.get() - value);
///     }
/// }
///
/// let total = Rc::new(Cell::new(0));
/// let budget = Rc::clone(&total);
/// let mut cache = Cache::new()
///     .with_policy(PolicyFn(move |_: &&str, _: &u64, _: usize| budget.get() > 100))
///     .with_handler(SizeTally(Rc::clone(&total)));
///
/// cache.add("foo", 10);
/// cache.add("bar", 90);
/// cache.add("baz", 1); // total hits 101, so "foo" is evicted
/// cache.add("qux", 9);
///
/// assert_eq!(cache.len(), 3);
/// assert_eq!(total.get(), 100);
/// ```
pub trait Handler<K, V> {
    /// Called after an entry is inserted or updated.
    ///
    /// `old` is the value displaced by an update, or `None` on the first
    /// insertion of the key; ownership of a displaced value passes to the
    /// handler.
    fn added(&mut self, _key: &K, _old: Option<V>, _new: &V) {}

    /// Called after an entry is removed, whether by the eviction policy,
    /// an explicit `remove`, or `clear`. The handler takes ownership of
    /// the removed entry.
    fn removed(&mut self, _key: K, _value: V) {}
}

/// Adapter that turns an add-handling closure into a [`Handler`] whose
/// `removed` side is the no-op default.
pub struct AddedFn<F>(pub F);

impl<K, V, F> Handler<K, V> for AddedFn<F>
where
    F: FnMut(&K, Option<V>, &V),
{
    fn added(&mut self, key: &K, old: Option<V>, new: &V) {
        (self.0)(key, old, new)
    }
}

/// Adapter that turns a remove-handling closure into a [`Handler`] whose
/// `added` side is the no-op default.
pub struct RemovedFn<F>(pub F);

impl<K, V, F> Handler<K, V> for RemovedFn<F>
where
    F: FnMut(K, V),
{
    fn removed(&mut self, key: K, value: V) {
        (self.0)(key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_added_fn_forwards() {
        let mut log = Vec::new();
        {
            let mut handler = AddedFn(|key: &i32, old: Option<i32>, new: &i32| {
                log.push((*key, old, *new));
            });
            handler.added(&1, None, &10);
            handler.added(&1, Some(10), &20);
        }

        assert_eq!(log, vec![(1, None, 10), (1, Some(10), 20)]);
    }

    #[test]
    fn test_added_fn_ignores_removals() {
        let mut calls = 0u32;
        {
            let mut handler = AddedFn(|_: &i32, _: Option<i32>, _: &i32| calls += 1);
            handler.removed(1, 10);
        }

        assert_eq!(calls, 0);
    }

    #[test]
    fn test_removed_fn_forwards() {
        let mut log = Vec::new();
        {
            let mut handler = RemovedFn(|key: i32, value: i32| log.push((key, value)));
            handler.removed(1, 10);
            handler.added(&2, None, &20);
        }

        assert_eq!(log, vec![(1, 10)]);
    }
}
