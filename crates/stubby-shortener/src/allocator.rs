use std::sync::atomic::{AtomicU64, Ordering};
use stubby_core::MAX_ID;

/// Hands out identifiers exactly once each.
///
/// The cursor is a single atomic holding the next identifier; reserving is a
/// compare-and-swap loop, so concurrent callers always observe distinct
/// values. The cursor is never persisted: it is recovered from the largest
/// identifier in the store when the store is opened.
#[derive(Debug)]
pub struct IdAllocator {
    next: AtomicU64,
}

impl IdAllocator {
    /// Creates an allocator whose first reservation returns `next`.
    pub fn starting_at(next: u64) -> Self {
        Self {
            next: AtomicU64::new(next),
        }
    }

    /// Seeds the cursor from the store contents: one past the largest
    /// persisted identifier, or `base` for an empty store.
    pub fn recover(max_persisted: Option<u64>, base: u64) -> Self {
        let next = match max_persisted {
            Some(max) => max.saturating_add(1).max(base),
            None => base,
        };
        Self::starting_at(next)
    }

    /// Reserves the next identifier. Returns `None` once [`MAX_ID`] has been
    /// handed out.
    pub fn reserve(&self) -> Option<u64> {
        self.next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |next| {
                (next <= MAX_ID).then(|| next + 1)
            })
            .ok()
    }

    /// The identifier the next reservation would return.
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::SeqCst)
    }
}
