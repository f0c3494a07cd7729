use std::fmt;

/// Rejection codes returned by the deal engine in `error_code`/`error_slug`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorCode {
    InvalidRequest,
    UnauthorizedAccess,
    SystemTemporarilyDisabled,

    OversizedPiece,
    StorageProviderSuspended,
    StorageProviderIneligibleToMine,

    StorageProviderInfoTooOld,
    StorageProviderUndialable,
    StorageProviderUnsupported,

    UnclaimedPieceCid,
    ProviderHasReplica,
    TenantsOutOfDatacap,
    TooManyReplicas,
    ProviderAboveMaxInFlight,
    /// No common rejection theme across the competing tenants
    ReplicationRulesViolation,

    /// A tenant-side check refused the reservation
    ExternalReservationRefused,
    SpUnsupported,
}

/// Coarse grouping of [`ApiErrorCode`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    MalformedRequest,
    Unauthorized,
    ServiceDisabled,
    PiecePolicyViolation,
    ProviderEligibility,
    ReplicationCapacity,
    ExternalRefusal,
}

impl ApiErrorCode {
    pub const ALL: [ApiErrorCode; 17] = [
        ApiErrorCode::InvalidRequest,
        ApiErrorCode::UnauthorizedAccess,
        ApiErrorCode::SystemTemporarilyDisabled,
        ApiErrorCode::OversizedPiece,
        ApiErrorCode::StorageProviderSuspended,
        ApiErrorCode::StorageProviderIneligibleToMine,
        ApiErrorCode::StorageProviderInfoTooOld,
        ApiErrorCode::StorageProviderUndialable,
        ApiErrorCode::StorageProviderUnsupported,
        ApiErrorCode::UnclaimedPieceCid,
        ApiErrorCode::ProviderHasReplica,
        ApiErrorCode::TenantsOutOfDatacap,
        ApiErrorCode::TooManyReplicas,
        ApiErrorCode::ProviderAboveMaxInFlight,
        ApiErrorCode::ReplicationRulesViolation,
        ApiErrorCode::ExternalReservationRefused,
        ApiErrorCode::SpUnsupported,
    ];

    pub fn code(self) -> i64 {
        match self {
            ApiErrorCode::InvalidRequest => 4400,
            ApiErrorCode::UnauthorizedAccess => 4401,
            ApiErrorCode::SystemTemporarilyDisabled => 4503,
            ApiErrorCode::OversizedPiece => 4011,
            ApiErrorCode::StorageProviderSuspended => 4012,
            ApiErrorCode::StorageProviderIneligibleToMine => 4013,
            ApiErrorCode::StorageProviderInfoTooOld => 4041,
            ApiErrorCode::StorageProviderUndialable => 4042,
            ApiErrorCode::StorageProviderUnsupported => 4043,
            ApiErrorCode::UnclaimedPieceCid => 4020,
            ApiErrorCode::ProviderHasReplica => 4021,
            ApiErrorCode::TenantsOutOfDatacap => 4022,
            ApiErrorCode::TooManyReplicas => 4023,
            ApiErrorCode::ProviderAboveMaxInFlight => 4024,
            ApiErrorCode::ReplicationRulesViolation => 4029,
            ApiErrorCode::ExternalReservationRefused => 4030,
            ApiErrorCode::SpUnsupported => 4044,
        }
    }

    /// Slug the deal engine puts in `error_slug`.
    pub fn slug(self) -> &'static str {
        match self {
            ApiErrorCode::InvalidRequest => "ErrInvalidRequest",
            ApiErrorCode::UnauthorizedAccess => "ErrUnauthorizedAccess",
            ApiErrorCode::SystemTemporarilyDisabled => "ErrSystemTemporarilyDisabled",
            ApiErrorCode::OversizedPiece => "ErrOversizedPiece",
            ApiErrorCode::StorageProviderSuspended => "ErrStorageProviderSuspended",
            ApiErrorCode::StorageProviderIneligibleToMine => "ErrStorageProviderIneligibleToMine",
            ApiErrorCode::StorageProviderInfoTooOld => "ErrStorageProviderInfoTooOld",
            ApiErrorCode::StorageProviderUndialable => "ErrStorageProviderUndialable",
            ApiErrorCode::StorageProviderUnsupported => "ErrStorageProviderUnsupported",
            ApiErrorCode::UnclaimedPieceCid => "ErrUnclaimedPieceCID",
            ApiErrorCode::ProviderHasReplica => "ErrProviderHasReplica",
            ApiErrorCode::TenantsOutOfDatacap => "ErrTenantsOutOfDatacap",
            ApiErrorCode::TooManyReplicas => "ErrTooManyReplicas",
            ApiErrorCode::ProviderAboveMaxInFlight => "ErrProviderAboveMaxInFlight",
            ApiErrorCode::ReplicationRulesViolation => "ErrReplicationRulesViolation",
            ApiErrorCode::ExternalReservationRefused => "ErrExternalReservationRefused",
            ApiErrorCode::SpUnsupported => "ErrSPUnsupported",
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|candidate| candidate.code() == code)
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|candidate| candidate.slug() == slug)
    }

    pub fn category(self) -> ErrorCategory {
        match self {
            ApiErrorCode::InvalidRequest => ErrorCategory::MalformedRequest,
            ApiErrorCode::UnauthorizedAccess => ErrorCategory::Unauthorized,
            ApiErrorCode::SystemTemporarilyDisabled => ErrorCategory::ServiceDisabled,
            ApiErrorCode::OversizedPiece | ApiErrorCode::UnclaimedPieceCid => {
                ErrorCategory::PiecePolicyViolation
            }
            ApiErrorCode::StorageProviderSuspended
            | ApiErrorCode::StorageProviderIneligibleToMine
            | ApiErrorCode::StorageProviderInfoTooOld
            | ApiErrorCode::StorageProviderUndialable
            | ApiErrorCode::StorageProviderUnsupported
            | ApiErrorCode::SpUnsupported => ErrorCategory::ProviderEligibility,
            ApiErrorCode::ProviderHasReplica
            | ApiErrorCode::TenantsOutOfDatacap
            | ApiErrorCode::TooManyReplicas
            | ApiErrorCode::ProviderAboveMaxInFlight
            | ApiErrorCode::ReplicationRulesViolation => ErrorCategory::ReplicationCapacity,
            ApiErrorCode::ExternalReservationRefused => ErrorCategory::ExternalRefusal,
        }
    }

    /// The piece already has enough replicas; asking again cannot succeed.
    pub fn is_over_replication(self) -> bool {
        self == ApiErrorCode::TooManyReplicas
    }
}

impl fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.slug(), self.code())
    }
}
