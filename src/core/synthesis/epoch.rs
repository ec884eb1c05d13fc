use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic session token.
///
/// Every new synthesis request, `stop()` and `dispose()` advance the epoch.
/// Work tagged with an older value is stale and must be discarded where it
/// lands, whether that is an adapter response or a queued notification.
#[derive(Debug, Default)]
pub struct SessionEpoch {
    value: AtomicU64,
}

impl SessionEpoch {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn current(&self) -> u64 {
        self.value.load(Ordering::Acquire)
    }

    /// Invalidate the current epoch and return the new one.
    pub fn advance(&self) -> u64 {
        self.value.fetch_add(1, Ordering::AcqRel) + 1
    }

    #[inline]
    pub fn is_current(&self, epoch: u64) -> bool {
        self.current() == epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_advance_invalidates_previous() {
        let epoch = SessionEpoch::new();
        assert_eq!(epoch.current(), 0);

        let first = epoch.advance();
        assert!(epoch.is_current(first));

        let second = epoch.advance();
        assert!(second > first);
        assert!(!epoch.is_current(first));
        assert!(epoch.is_current(second));
    }

    #[test]
    fn test_concurrent_advances_are_unique() {
        let epoch = Arc::new(SessionEpoch::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let epoch = epoch.clone();
                std::thread::spawn(move || (0..100).map(|_| epoch.advance()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 800);
        assert_eq!(epoch.current(), 800);
    }
}
