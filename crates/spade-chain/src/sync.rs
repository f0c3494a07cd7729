use crate::{ChainEpoch, ChainError};

/// Sync state as reported by the chain node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncStatus {
    pub epoch: ChainEpoch,
    pub behind: u64,
}

/// Result of a passed sync check, kept for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    pub epoch: ChainEpoch,
    pub expected_epoch: ChainEpoch,
    pub reported_behind: u64,
    pub actual_behind: u64,
}

/// Epoch the chain head should be at, given wall-clock time.
pub fn expected_epoch(genesis_timestamp: i64, block_delay_secs: u64, now_unix: i64) -> ChainEpoch {
    if block_delay_secs == 0 || now_unix <= genesis_timestamp {
        return 0;
    }
    (now_unix - genesis_timestamp) / block_delay_secs as i64
}

/// Refuse to operate when either the node's own lag estimate or the lag
/// against wall-clock time exceeds `max_behind`.
///
/// A node that is ahead of the expected epoch (clock skew) counts as zero lag.
pub fn check_sync(
    status: SyncStatus,
    expected_epoch: ChainEpoch,
    max_behind: u64,
) -> Result<SyncReport, ChainError> {
    let actual_behind = expected_epoch.saturating_sub(status.epoch).max(0) as u64;

    if status.behind > max_behind || actual_behind > max_behind {
        return Err(ChainError::OutOfSync {
            reported_behind: status.behind,
            actual_behind,
            max_behind,
        });
    }

    Ok(SyncReport {
        epoch: status.epoch,
        expected_epoch,
        reported_behind: status.behind,
        actual_behind,
    })
}
