//! Reuse pool for visual instances that are rebuilt every update.
//!
//! Instances live in a slot map owned by the pool; callers hold [`InstanceId`]
//! handles. An instance is either active (checked out) or idle (queued for
//! reuse), never both. The pool only grows.

use std::collections::VecDeque;

use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Handle to an instance owned by an [`ObjectPool`].
    pub struct InstanceId;
}

#[derive(Debug)]
struct PoolEntry<T> {
    value: T,
    active: bool,
}

/// Grow-only pool of reusable instances.
///
/// `F` creates a fresh instance whenever the idle queue is empty.
pub struct ObjectPool<T, F = fn() -> T> {
    entries: SlotMap<InstanceId, PoolEntry<T>>,
    idle: VecDeque<InstanceId>,
    factory: F,
}

impl<T: Default> ObjectPool<T> {
    /// Creates an empty pool that instantiates `T::default()`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_factory(T::default as fn() -> T)
    }
}

impl<T: Default> Default for ObjectPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, F> ObjectPool<T, F>
where
    F: FnMut() -> T,
{
    /// Creates an empty pool using `factory` to instantiate new instances.
    pub fn with_factory(factory: F) -> Self {
        Self {
            entries: SlotMap::with_key(),
            idle: VecDeque::new(),
            factory,
        }
    }

    /// Instantiates `count` idle instances up front.
    pub fn prewarm(&mut self, count: usize) {
        for _ in 0..count {
            let value = (self.factory)();
            let id = self.entries.insert(PoolEntry {
                value,
                active: false,
            });
            self.idle.push_back(id);
        }
    }

    /// Checks out an instance, reusing the oldest idle one if any.
    pub fn acquire(&mut self) -> InstanceId {
        if let Some(id) = self.idle.pop_front() {
            if let Some(entry) = self.entries.get_mut(id) {
                entry.active = true;
                return id;
            }
        }
        let value = (self.factory)();
        self.entries.insert(PoolEntry {
            value,
            active: true,
        })
    }

    /// Returns an instance to the idle queue.
    ///
    /// Releasing an instance that is already idle, or that this pool never
    /// issued, does nothing and returns `false`.
    pub fn release(&mut self, id: InstanceId) -> bool {
        match self.entries.get_mut(id) {
            Some(entry) if entry.active => {
                entry.active = false;
                self.idle.push_back(id);
                true
            }
            _ => false,
        }
    }

    /// Releases every id yielded by `ids`, returning how many were active.
    pub fn release_all<I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = InstanceId>,
    {
        ids.into_iter().filter(|&id| self.release(id)).count()
    }
}

impl<T, F> ObjectPool<T, F> {
    /// Returns the instance behind `id`, active or idle.
    #[must_use]
    pub fn get(&self, id: InstanceId) -> Option<&T> {
        self.entries.get(id).map(|entry| &entry.value)
    }

    /// Returns the instance behind `id` mutably, but only while it is active.
    pub fn get_mut(&mut self, id: InstanceId) -> Option<&mut T> {
        self.entries
            .get_mut(id)
            .filter(|entry| entry.active)
            .map(|entry| &mut entry.value)
    }

    /// Returns whether `id` is currently checked out.
    #[must_use]
    pub fn is_active(&self, id: InstanceId) -> bool {
        self.entries.get(id).is_some_and(|entry| entry.active)
    }

    /// Number of checked-out instances.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.entries.len() - self.idle.len()
    }

    /// Number of instances waiting for reuse.
    #[must_use]
    pub fn idle_count(&self) -> usize {
        self.idle.len()
    }

    /// Total number of instances ever created.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the pool has never created an instance.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T, F> std::fmt::Debug for ObjectPool<T, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectPool")
            .field("active", &self.active_count())
            .field("idle", &self.idle.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn acquire_creates_when_idle_queue_is_empty() {
        let mut pool: ObjectPool<u32> = ObjectPool::new();
        let a = pool.acquire();
        let b = pool.acquire();
        assert_ne!(a, b);
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.active_count(), 2);
    }

    #[test]
    fn active_count_is_acquired_minus_released() {
        let mut pool: ObjectPool<u32> = ObjectPool::new();
        let ids: Vec<_> = (0..7).map(|_| pool.acquire()).collect();
        for id in &ids[..3] {
            assert!(pool.release(*id));
        }
        assert_eq!(pool.active_count(), 4);
        assert_eq!(pool.idle_count(), 3);
    }

    #[test]
    fn release_is_idempotent() {
        let mut pool: ObjectPool<u32> = ObjectPool::new();
        let id = pool.acquire();
        assert!(pool.release(id));
        assert!(!pool.release(id));
        assert_eq!(pool.idle_count(), 1);
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn released_instances_are_reused_in_order() {
        let mut pool: ObjectPool<u32> = ObjectPool::new();
        let a = pool.acquire();
        let b = pool.acquire();
        assert_eq!(pool.release_all([a, b]), 2);
        assert_eq!(pool.acquire(), a);
        assert_eq!(pool.acquire(), b);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn reacquired_instance_is_never_handed_out_twice() {
        let mut pool: ObjectPool<u32> = ObjectPool::new();
        let a = pool.acquire();
        pool.release(a);
        let first = pool.acquire();
        let second = pool.acquire();
        assert_ne!(first, second);
        assert!(pool.is_active(first) && pool.is_active(second));
    }

    #[test]
    fn idle_instances_are_read_only() {
        let mut pool: ObjectPool<u32> = ObjectPool::new();
        let id = pool.acquire();
        *pool.get_mut(id).unwrap() = 9;
        pool.release(id);
        assert!(pool.get_mut(id).is_none());
        assert_eq!(pool.get(id), Some(&9));
    }

    #[test]
    fn prewarm_fills_idle_queue_from_factory() {
        let mut next = 0;
        let mut pool = ObjectPool::with_factory(move || {
            next += 1;
            next
        });
        pool.prewarm(3);
        assert_eq!(pool.idle_count(), 3);
        assert_eq!(pool.active_count(), 0);
        let id = pool.acquire();
        assert_eq!(pool.get(id), Some(&1));
        assert_eq!(pool.len(), 3);
    }
}
