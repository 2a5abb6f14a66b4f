use thiserror::Error;

use crate::domain::error::DomainError;
use crate::domain::market::Collaborator;
use crate::domain::id::MarketName;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("failed to read address book {path}: {reason}")]
    AddressBook { path: String, reason: String },
}

/// Transaction submission errors.
///
/// Raised by the transaction submitter; the batch executor turns them into
/// per-item failures rather than propagating them.
#[derive(Error, Debug, Clone)]
pub enum ExecutionError {
    #[error("transaction reverted: {reason}")]
    TransactionReverted {
        tx_hash: Option<String>,
        reason: String,
    },

    #[error("transaction {tx_hash} not confirmed within {waited_secs}s")]
    ConfirmationTimeout { tx_hash: String, waited_secs: u64 },

    #[error("invalid state transition for position {position}: {reason}")]
    InvalidStateTransition { position: String, reason: String },

    #[error("failed to submit transaction: {0}")]
    SubmissionFailed(String),
}

/// Orchestration errors.
#[derive(Error, Debug, Clone)]
pub enum KeeperError {
    #[error("{collaborator} is not deployed")]
    CollaboratorNotDeployed { collaborator: Collaborator },

    #[error("market {market} has active positions but zero option supply")]
    ZeroNotional { market: MarketName },

    #[error("unknown market: {0}")]
    UnknownMarket(MarketName),

    #[error("global unrealized PNL refresh failed: {0}")]
    GlobalRefreshFailed(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error(transparent)]
    Keeper(#[from] KeeperError),

    #[error("chain read failed: {0}")]
    Chain(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// Whether this error must abort the whole fleet cycle.
    ///
    /// Only deployment errors (a missing global collaborator) and a failed
    /// protocol-wide refresh qualify; everything else is contained to the
    /// market or position that raised it.
    #[must_use]
    pub fn is_fatal_for_cycle(&self) -> bool {
        match self {
            Error::Keeper(KeeperError::CollaboratorNotDeployed { collaborator }) => {
                collaborator.is_global()
            }
            Error::Keeper(KeeperError::GlobalRefreshFailed(_)) => true,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_global_collaborator_is_fatal() {
        let err: Error = KeeperError::CollaboratorNotDeployed {
            collaborator: Collaborator::RiskCache,
        }
        .into();
        assert!(err.is_fatal_for_cycle());
        assert_eq!(err.to_string(), "AssetRiskCache is not deployed");
    }

    #[test]
    fn missing_option_token_is_contained() {
        let err: Error = KeeperError::CollaboratorNotDeployed {
            collaborator: Collaborator::OptionToken(MarketName::from("BAYC")),
        }
        .into();
        assert!(!err.is_fatal_for_cycle());
    }

    #[test]
    fn transaction_errors_are_contained() {
        let err: Error = ExecutionError::TransactionReverted {
            tx_hash: None,
            reason: "InvalidStateTransition".into(),
        }
        .into();
        assert!(!err.is_fatal_for_cycle());
        assert!(!Error::Chain("rpc down".into()).is_fatal_for_cycle());
    }

    #[test]
    fn global_refresh_failure_is_fatal() {
        let err: Error = KeeperError::GlobalRefreshFailed("reverted".into()).into();
        assert!(err.is_fatal_for_cycle());
    }
}
