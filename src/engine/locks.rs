//! Per-member mutual exclusion
//!
//! Reading a total, applying a delta and writing it back is not atomic, so
//! every mutation of one member runs under that member's lock.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::ids::MemberKey;

#[derive(Debug, Default)]
pub struct MemberLocks {
    locks: Mutex<HashMap<MemberKey, Arc<Mutex<()>>>>,
}

impl MemberLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding `member`'s lock
    ///
    /// The entry is dropped again once no other caller holds or waits on it.
    pub fn with_member<R>(&self, member: MemberKey, f: impl FnOnce() -> R) -> R {
        let lock = Arc::clone(self.locks.lock().entry(member).or_default());
        let result = {
            let _guard = lock.lock();
            f()
        };

        // Clones are only taken under the map lock, so the count is exact here
        let mut locks = self.locks.lock();
        if Arc::strong_count(&lock) == 2 {
            locks.remove(&member);
        }
        result
    }

    /// Number of members currently locked or waiting
    pub fn len(&self) -> usize {
        self.locks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.lock().is_empty()
    }
}
