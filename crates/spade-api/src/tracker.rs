use std::{collections::HashSet, sync::Mutex};

/// Piece CIDs this process has already tried to reserve.
///
/// Entries are never removed; the deal engine decides whether a piece is
/// still eligible, so a tracked piece is simply skipped in later listings.
#[derive(Debug, Default)]
pub struct ReservationTracker {
    attempted: Mutex<HashSet<String>>,
}

impl ReservationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, piece_cid: &str) -> bool {
        self.attempted
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains(piece_cid)
    }

    pub fn add(&self, piece_cid: &str) {
        self.attempted
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(piece_cid.to_string());
    }

    pub fn len(&self) -> usize {
        self.attempted
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn added_piece_stays_tracked() {
        let tracker = ReservationTracker::new();
        assert!(!tracker.has("baga-a"));

        tracker.add("baga-a");
        tracker.add("baga-a");

        for _ in 0..3 {
            assert!(tracker.has("baga-a"));
        }
        assert!(!tracker.has("baga-b"));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn concurrent_adds_are_not_lost() {
        let tracker = Arc::new(ReservationTracker::new());
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let tracker = Arc::clone(&tracker);
                std::thread::spawn(move || {
                    for i in 0..100 {
                        tracker.add(&format!("piece-{worker}-{i}"));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(tracker.len(), 800);
        assert!(tracker.has("piece-7-99"));
    }
}
