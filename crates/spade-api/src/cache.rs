use std::{future::Future, sync::Arc, time::Duration};

use tokio::{sync::Mutex, time::Instant};

use crate::types::Piece;

/// How long a fetched eligible piece listing is reused.
pub const DEFAULT_FRESHNESS: Duration = Duration::from_secs(10);

/// Result of [`EligibilityCache::get_or_refresh`].
#[derive(Debug, Clone)]
pub struct EligibilityListing {
    /// Pieces in the order the deal engine returned them.
    pub pieces: Arc<[Piece]>,
    pub total_count: usize,
    /// `true` when served without calling the fetcher.
    pub used_cache: bool,
}

#[derive(Debug)]
struct CachedListing {
    fetched_at: Instant,
    pieces: Arc<[Piece]>,
    total_count: usize,
}

/// Last successful eligible piece listing and when it was fetched.
///
/// Refreshes are single-flight: the state lock is held across the fetch, so
/// callers arriving during a refresh wait and then see the fresh listing.
#[derive(Debug)]
pub struct EligibilityCache {
    freshness: Duration,
    state: Mutex<Option<CachedListing>>,
}

impl Default for EligibilityCache {
    fn default() -> Self {
        Self::new(DEFAULT_FRESHNESS)
    }
}

impl EligibilityCache {
    pub fn new(freshness: Duration) -> Self {
        Self {
            freshness,
            state: Mutex::new(None),
        }
    }

    pub async fn get_or_refresh<F, Fut, E>(&self, fetch: F) -> Result<EligibilityListing, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(Vec<Piece>, usize), E>>,
    {
        self.get_or_refresh_at(Instant::now(), fetch).await
    }

    /// Serve the cached listing if it was fetched less than the freshness
    /// window before `now`, otherwise call `fetch` and store its result with
    /// `fetched_at = now`.
    ///
    /// A failed fetch leaves the previous listing in place and returns the
    /// error; stale data is never served in its stead.
    pub async fn get_or_refresh_at<F, Fut, E>(
        &self,
        now: Instant,
        fetch: F,
    ) -> Result<EligibilityListing, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(Vec<Piece>, usize), E>>,
    {
        let mut state = self.state.lock().await;

        if let Some(cached) = state.as_ref()
            && now.saturating_duration_since(cached.fetched_at) < self.freshness
        {
            return Ok(EligibilityListing {
                pieces: Arc::clone(&cached.pieces),
                total_count: cached.total_count,
                used_cache: true,
            });
        }

        let (pieces, total_count) = fetch().await?;
        let cached = state.insert(CachedListing {
            fetched_at: now,
            pieces: pieces.into(),
            total_count,
        });

        Ok(EligibilityListing {
            pieces: Arc::clone(&cached.pieces),
            total_count: cached.total_count,
            used_cache: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn piece(cid: &str) -> Piece {
        Piece {
            piece_cid: cid.to_string(),
            padded_piece_size: 34_359_738_368,
            claiming_tenant: 1,
            tenant_policy_cid: "bafypolicy".to_string(),
            sample_reserve_cmd: None,
        }
    }

    async fn counted_fetch(
        calls: &AtomicUsize,
        pieces: Vec<Piece>,
    ) -> Result<(Vec<Piece>, usize), String> {
        calls.fetch_add(1, Ordering::SeqCst);
        let total = pieces.len();
        Ok((pieces, total))
    }

    #[tokio::test(start_paused = true)]
    async fn fresh_listing_is_served_from_cache() {
        let cache = EligibilityCache::default();
        let calls = AtomicUsize::new(0);

        let first = cache
            .get_or_refresh(|| counted_fetch(&calls, vec![piece("a"), piece("b")]))
            .await
            .unwrap();
        tokio::time::advance(Duration::from_millis(9_999)).await;
        let second = cache
            .get_or_refresh(|| counted_fetch(&calls, vec![piece("c")]))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!first.used_cache);
        assert!(second.used_cache);
        assert_eq!(second.pieces, first.pieces);
        assert_eq!(second.total_count, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_listing_triggers_one_fetch() {
        let cache = EligibilityCache::default();
        let calls = AtomicUsize::new(0);

        cache
            .get_or_refresh(|| counted_fetch(&calls, vec![piece("a")]))
            .await
            .unwrap();
        tokio::time::advance(DEFAULT_FRESHNESS).await;
        let refreshed = cache
            .get_or_refresh(|| counted_fetch(&calls, vec![piece("b")]))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(!refreshed.used_cache);
        assert_eq!(refreshed.pieces[0].piece_cid, "b");
    }

    #[tokio::test(start_paused = true)]
    async fn failed_refresh_keeps_previous_listing() {
        let cache = EligibilityCache::default();
        let calls = AtomicUsize::new(0);
        let start = Instant::now();

        cache
            .get_or_refresh_at(start, || counted_fetch(&calls, vec![piece("a")]))
            .await
            .unwrap();

        let later = start + Duration::from_secs(11);
        let err = cache
            .get_or_refresh_at(later, || async {
                Err::<(Vec<Piece>, usize), _>("service down".to_string())
            })
            .await
            .unwrap_err();
        assert_eq!(err, "service down");

        // Still the original listing when evaluated inside its window.
        let cached = cache
            .get_or_refresh_at(start + Duration::from_secs(5), || {
                counted_fetch(&calls, vec![piece("b")])
            })
            .await
            .unwrap();
        assert!(cached.used_cache);
        assert_eq!(cached.pieces[0].piece_cid, "a");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_stale_reads_share_one_fetch() {
        let cache = Arc::new(EligibilityCache::default());
        let calls = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let calls = Arc::clone(&calls);
                tokio::spawn(async move {
                    cache
                        .get_or_refresh(|| async {
                            calls.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(50)).await;
                            Ok::<_, String>((vec![piece("a")], 1))
                        })
                        .await
                        .unwrap()
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
