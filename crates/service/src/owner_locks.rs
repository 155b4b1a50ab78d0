//! Per-owner async mutual exclusion.
//!
//! Serializes read-decide-write sequences for one owner inside this process.
//! Cross-process exclusion is left to the database transaction.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

#[derive(Default)]
pub struct OwnerLocks {
    inner: DashMap<Uuid, Arc<Mutex<()>>>,
}

/// Exclusive access to one owner. Dropping it, including when the holding
/// future is cancelled, unlocks and prunes the idle map entry.
pub struct OwnerLockGuard<'a> {
    guard: Option<OwnedMutexGuard<()>>,
    locks: &'a OwnerLocks,
    owner: Uuid,
}

impl Drop for OwnerLockGuard<'_> {
    fn drop(&mut self) {
        // 先释放互斥锁，否则 guard 自身持有的 Arc 会让计数永远大于 1
        self.guard.take();
        self.locks.prune(self.owner);
    }
}

impl OwnerLocks {
    pub fn new() -> Self { Self::default() }

    /// Wait for exclusive access to `owner`. Holding the guard blocks other
    /// callers for the same owner only.
    pub async fn acquire(&self, owner: Uuid) -> OwnerLockGuard<'_> {
        let lock = self.inner.entry(owner).or_default().clone();
        let guard = lock.lock_owned().await;
        OwnerLockGuard { guard: Some(guard), locks: self, owner }
    }

    /// Drop the entry for `owner` once nobody holds or waits on it.
    fn prune(&self, owner: Uuid) {
        self.inner.remove_if(&owner, |_, lock| Arc::strong_count(lock) == 1);
    }

    pub fn len(&self) -> usize { self.inner.len() }

    pub fn is_empty(&self) -> bool { self.inner.is_empty() }
}
