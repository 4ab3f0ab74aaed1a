//! Cache engine: lookup index + recency list.

use std::collections::HashMap;
use std::hash::Hash;
use std::mem;

use ahash::RandomState;

use crate::handler::Handler;
use crate::policy::Policy;

/// Node in the recency list
struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Index and recency list, materialized on first write.
///
/// Nodes live in a slab indexed by `usize`; the map points at live slots
/// and the linked list is threaded through them. Front = most recently
/// touched, back = eviction candidate.
struct Store<K, V> {
    map: HashMap<K, usize, RandomState>,
    nodes: Vec<Option<Node<K, V>>>,
    head: Option<usize>,
    tail: Option<usize>,
    free_list: Vec<usize>,
}

impl<K, V> Store<K, V>
where
    K: Hash + Eq + Clone,
{
    fn new() -> Self {
        Self {
            map: HashMap::with_hasher(RandomState::new()),
            nodes: Vec::new(),
            head: None,
            tail: None,
            free_list: Vec::new(),
        }
    }

    fn push_front(&mut self, key: K, value: V) -> usize {
        let idx = self.alloc_node();
        self.nodes[idx] = Some(Node {
            key: key.clone(),
            value,
            prev: None,
            next: self.head,
        });

        if let Some(head_idx) = self.head {
            if let Some(head) = &mut self.nodes[head_idx] {
                head.prev = Some(idx);
            }
        }

        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }

        self.map.insert(key, idx);
        idx
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return; // Already at front
        }

        self.unlink(idx);

        if let Some(node) = &mut self.nodes[idx] {
            node.prev = None;
            node.next = self.head;
        }

        if let Some(head_idx) = self.head {
            if let Some(head) = &mut self.nodes[head_idx] {
                head.prev = Some(idx);
            }
        }

        self.head = Some(idx);
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = if let Some(node) = &self.nodes[idx] {
            (node.prev, node.next)
        } else {
            return;
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_node) = &mut self.nodes[prev_idx] {
                    prev_node.next = next;
                }
            }
            None => {
                self.head = next;
            }
        }

        match next {
            Some(next_idx) => {
                if let Some(next_node) = &mut self.nodes[next_idx] {
                    next_node.prev = prev;
                }
            }
            None => {
                self.tail = prev;
            }
        }
    }

    /// Detach the node at `idx` and return its entry.
    ///
    /// Must unlink before vacating the slot: unlink reads the node's
    /// neighbor pointers to repair head/tail.
    fn remove_index(&mut self, idx: usize) -> Option<(K, V)> {
        self.unlink(idx);
        let node = self.nodes[idx].take()?;
        self.map.remove(&node.key);
        self.free_node(idx);
        Some((node.key, node.value))
    }

    fn remove_key(&mut self, key: &K) -> Option<(K, V)> {
        let idx = self.map.get(key).copied()?;
        self.remove_index(idx)
    }

    fn alloc_node(&mut self) -> usize {
        if let Some(idx) = self.free_list.pop() {
            idx
        } else {
            let idx = self.nodes.len();
            self.nodes.push(None);
            idx
        }
    }

    fn free_node(&mut self, idx: usize) {
        self.free_list.push(idx);
    }
}

/// Policy-driven LRU cache.
///
/// Entries are kept in recency order: every `add` and every `get` hit moves
/// the touched entry to the front, so the back of the list is always the
/// least-recently-used entry. After each `add` the configured [`Policy`] is
/// asked whether that oldest entry should go; a configured [`Handler`] is
/// notified of every addition, update, and removal.
///
/// Internal storage is materialized lazily on the first write, so
/// `Cache::default()` allocates nothing, and [`Cache::clear`] returns the
/// cache to that unmaterialized state.
///
/// Policy and handler callbacks are owned by the cache and invoked
/// synchronously while it is mutably borrowed; they receive no reference
/// back into the cache, so they cannot re-enter it. The cache itself is
/// single-threaded; callers needing shared access wrap it in a lock.
pub struct Cache<K, V> {
    policy: Option<Box<dyn Policy<K, V>>>,
    handler: Option<Box<dyn Handler<K, V>>>,
    store: Option<Store<K, V>>,
}

impl<K, V> Default for Cache<K, V> {
    fn default() -> Self {
        Self {
            policy: None,
            handler: None,
            store: None,
        }
    }
}

impl<K, V> Cache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a cache with no policy and no handler.
    ///
    /// Without a policy the cache is unbounded: nothing is ever evicted,
    /// and only [`Cache::remove`] and [`Cache::clear`] shrink it.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an eviction policy.
    pub fn with_policy<P>(mut self, policy: P) -> Self
    where
        P: Policy<K, V> + 'static,
    {
        self.policy = Some(Box::new(policy));
        self
    }

    /// Attach a change handler.
    pub fn with_handler<H>(mut self, handler: H) -> Self
    where
        H: Handler<K, V> + 'static,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    /// Insert a key-value pair, then run an eviction sweep.
    ///
    /// If the key is already present its entry moves to the front and the
    /// value is replaced in place; the handler receives the displaced value.
    /// Otherwise a new front entry is created. Either way the entry counts
    /// as the most recently touched, and [`Cache::evict`] runs once before
    /// returning.
    pub fn add(&mut self, key: K, value: V) {
        let store = self.store.get_or_insert_with(Store::new);

        if let Some(&idx) = store.map.get(&key) {
            store.move_to_front(idx);
            if let Some(node) = &mut store.nodes[idx] {
                let old = mem::replace(&mut node.value, value);
                if let Some(handler) = &mut self.handler {
                    handler.added(&node.key, Some(old), &node.value);
                }
            }
        } else {
            let idx = store.push_front(key, value);
            if let Some(node) = &store.nodes[idx] {
                if let Some(handler) = &mut self.handler {
                    handler.added(&node.key, None, &node.value);
                }
            }
        }

        self.evict();
    }

    /// Look up a key, refreshing its recency on a hit.
    ///
    /// A hit moves the entry to the front of the recency order; this is the
    /// only operation besides [`Cache::add`] that reorders entries. A miss
    /// changes nothing and allocates nothing.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let store = self.store.as_mut()?;
        let idx = store.map.get(key).copied()?;
        store.move_to_front(idx);
        store.nodes[idx].as_ref().map(|node| &node.value)
    }

    /// Remove a key, returning whether it was present.
    ///
    /// The handler observes the removed entry exactly as it does for
    /// policy-driven eviction.
    pub fn remove(&mut self, key: &K) -> bool {
        let entry = match &mut self.store {
            Some(store) => store.remove_key(key),
            None => None,
        };

        match entry {
            Some((key, value)) => {
                if let Some(handler) = &mut self.handler {
                    handler.removed(key, value);
                }
                true
            }
            None => false,
        }
    }

    /// Run an eviction sweep, returning the number of entries removed.
    ///
    /// Repeatedly asks the policy about the oldest entry, passing the entry
    /// count as it stands before that removal, and removes it while the
    /// policy agrees. The sweep stops the first time the policy declines
    /// the current oldest entry; it never skips past a declined entry to
    /// test a newer one. With no policy configured this returns 0.
    ///
    /// `add` calls this automatically, but it can be called at any time,
    /// e.g. after an out-of-band condition changed what the policy would
    /// answer.
    pub fn evict(&mut self) -> usize {
        let policy = match &mut self.policy {
            Some(policy) => policy,
            None => return 0,
        };
        let store = match &mut self.store {
            Some(store) => store,
            None => return 0,
        };

        let mut removed = 0;
        while let Some(tail_idx) = store.tail {
            let should_evict = match &store.nodes[tail_idx] {
                Some(node) => policy.evict(&node.key, &node.value, store.map.len()),
                None => false,
            };
            if !should_evict {
                break;
            }

            match store.remove_index(tail_idx) {
                Some((key, value)) => {
                    if let Some(handler) = &mut self.handler {
                        handler.removed(key, value);
                    }
                    removed += 1;
                }
                None => break,
            }
        }
        removed
    }

    /// Current entry count; 0 if the cache has never been written to.
    pub fn len(&self) -> usize {
        match &self.store {
            Some(store) => store.map.len(),
            None => 0,
        }
    }

    /// Check whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every entry, notifying the handler for each.
    ///
    /// Notification order across entries is unspecified. Afterwards the
    /// internal storage is torn down; the next write re-materializes it.
    pub fn clear(&mut self) {
        if let Some(mut store) = self.store.take() {
            if let Some(handler) = &mut self.handler {
                for node in store.nodes.drain(..).flatten() {
                    handler.removed(node.key, node.value);
                }
            }
        }
    }
}
