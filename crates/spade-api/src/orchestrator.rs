use std::{sync::Arc, time::Duration};

use spade_observability as observability;

use crate::{
    cache::EligibilityCache,
    error::{ReservationError, SpadeApiError},
    error_code::ApiErrorCode,
    gateway::SpadeApi,
    tracker::ReservationTracker,
    types::{Piece, trim_cid},
};

/// Picks the next eligible piece and reserves it.
///
/// Owns the eligibility cache and the tracker of attempted pieces for the
/// lifetime of the process. Both are only updated after a remote call has
/// completed, so dropping a `reserve_next` future mid-flight leaves them as
/// they were.
pub struct ReservationOrchestrator {
    api: Arc<dyn SpadeApi>,
    cache: EligibilityCache,
    tracker: ReservationTracker,
}

impl ReservationOrchestrator {
    pub fn new(api: Arc<dyn SpadeApi>, cache_freshness: Duration) -> Self {
        Self {
            api,
            cache: EligibilityCache::new(cache_freshness),
            tracker: ReservationTracker::new(),
        }
    }

    pub fn tracker(&self) -> &ReservationTracker {
        &self.tracker
    }

    /// Reserve the first eligible piece not yet attempted by this process.
    ///
    /// Returns `Ok(None)` when the deal engine reports no eligible pieces.
    /// A piece is recorded as attempted when the reservation succeeds or
    /// when the engine rejects it as over-replicated; any other failure
    /// leaves it eligible for the next call.
    pub async fn reserve_next(&self) -> Result<Option<String>, ReservationError> {
        let listing = self
            .cache
            .get_or_refresh(|| self.fetch_eligible())
            .await
            .map_err(ReservationError::Listing)?;

        observability::record_eligible_listing(if listing.used_cache {
            "cache"
        } else {
            "remote"
        });

        if listing.total_count == 0 {
            if !listing.used_cache {
                tracing::info!("No eligible pieces at the moment");
            }
            observability::record_eligible_pieces(0, 0);
            return Ok(None);
        }

        if !listing.used_cache {
            tracing::info!(
                count = listing.total_count,
                "Found {} eligible pieces",
                listing.total_count
            );
        }

        let untried = listing
            .pieces
            .iter()
            .filter(|piece| !self.tracker.has(&piece.piece_cid))
            .count();
        observability::record_eligible_pieces(listing.total_count, untried);

        let Some(piece) = listing
            .pieces
            .iter()
            .find(|piece| !self.tracker.has(&piece.piece_cid))
        else {
            observability::record_reservation_outcome("no_untried_piece");
            return Err(ReservationError::NoUntriedPiece {
                eligible: listing.pieces.len(),
            });
        };

        let result = self.reserve(piece).await;
        observability::record_tracked_pieces(self.tracker.len());
        result
    }

    async fn fetch_eligible(&self) -> Result<(Vec<Piece>, usize), SpadeApiError> {
        let envelope = self.api.list_eligible().await?;
        let total_count = envelope.entry_count(envelope.response.len());
        Ok((envelope.response, total_count))
    }

    async fn reserve(&self, piece: &Piece) -> Result<Option<String>, ReservationError> {
        tracing::info!(
            piece_cid = %trim_cid(&piece.piece_cid),
            tenant = piece.claiming_tenant,
            padded_piece_size = piece.padded_piece_size,
            "Requesting piece reservation"
        );

        match self
            .api
            .invoke(&piece.piece_cid, &piece.tenant_policy_cid)
            .await
        {
            Ok(envelope) => {
                self.tracker.add(&piece.piece_cid);
                observability::record_reservation_outcome("reserved");
                tracing::info!(
                    piece_cid = %trim_cid(&piece.piece_cid),
                    deal_start_epoch = envelope.response.deal_start_epoch,
                    tenants = envelope.response.replication_states.len(),
                    "Successfully requested piece reservation"
                );
                Ok(Some(piece.piece_cid.clone()))
            }
            Err(source) => {
                let over_replicated = source
                    .api_error_code()
                    .is_some_and(ApiErrorCode::is_over_replication);
                if over_replicated {
                    self.tracker.add(&piece.piece_cid);
                    observability::record_reservation_outcome("over_replicated");
                } else {
                    observability::record_reservation_outcome(source.kind().as_str());
                }
                tracing::warn!(
                    piece_cid = %trim_cid(&piece.piece_cid),
                    error = %source,
                    category = ?source.api_error_code().map(ApiErrorCode::category),
                    skipped_from_now_on = over_replicated,
                    "Could not reserve piece"
                );
                Err(ReservationError::Invoke {
                    piece_cid: piece.piece_cid.clone(),
                    source,
                })
            }
        }
    }
}
