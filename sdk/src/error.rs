use thiserror::Error;

use crate::ledger::LedgerError;

pub type Result<T> = std::result::Result<T, StakingError>;

#[derive(Debug, Error)]
pub enum StakingError {
    #[error("insufficient balance for {asset_type}: required {required}, available {available}")]
    InsufficientBalance {
        asset_type: String,
        required: u128,
        available: u128,
    },

    #[error("malformed external data: {0}")]
    MalformedExternalData(String),

    #[error("reward simulation failed for position {position_id} and {asset_type}: {reason}")]
    RewardSimulationFailure {
        position_id: String,
        asset_type: String,
        reason: String,
    },

    #[error("failed to resolve staking positions: {0}")]
    PositionResolutionFailure(String),

    #[error("owner address is required to list asset records")]
    MissingOwner,

    #[error("transaction plan exceeds {limit} inputs or commands")]
    PlanTooLarge { limit: usize },

    #[error("amount {0} does not fit in a u64 argument")]
    AmountOutOfRange(u128),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl StakingError {
    pub(crate) fn malformed(what: impl std::fmt::Display) -> Self {
        StakingError::MalformedExternalData(what.to_string())
    }

    /// Malformed data keeps its variant; any other failure becomes a
    /// `PositionResolutionFailure`.
    pub(crate) fn into_resolution_failure(self) -> Self {
        match self {
            StakingError::MalformedExternalData(_) | StakingError::PositionResolutionFailure(_) => {
                self
            }
            other => StakingError::PositionResolutionFailure(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for StakingError {
    fn from(err: serde_json::Error) -> Self {
        StakingError::MalformedExternalData(err.to_string())
    }
}
