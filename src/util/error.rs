use thiserror::Error;

/// Every failure this crate can raise while building, validating, or
/// publishing a block. Nothing is retried or logged away internally; each
/// condition surfaces to the immediate caller.
#[derive(Debug, Error)]
pub enum Error {
    /// An operation needed a field that has not been set yet. Carries the
    /// wire name of the absent field.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// A value did not parse as the expected fixed-width hex or decimal
    /// form.
    #[error("invalid {what}: {reason}")]
    InvalidFormat {
        what: &'static str,
        reason: String,
    },

    /// The work nonce fails the network threshold and is not an accepted
    /// sentinel.
    #[error("work does not meet the required difficulty")]
    InvalidWork,

    /// A signing key was not exactly 32 bytes.
    #[error("private key must be 32 bytes, got {0}")]
    InvalidKeyLength(usize),

    /// A send block already holds its maximum of eight transactions.
    #[error("send blocks hold at most eight transactions")]
    CapacityExceeded,

    /// A transaction entry was missing its target or its amount.
    #[error("transaction entry requires both a target and an amount")]
    InvalidTransaction,

    /// A proof-of-work task was cancelled before it found a nonce.
    #[error("work generation cancelled")]
    Cancelled,

    /// The delegate answered but refused the block.
    #[error("delegate rejected block: {0}")]
    Rejected(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] hyper::http::Error),

    #[error(transparent)]
    Transport(#[from] hyper::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Task(#[from] tokio::task::JoinError),
}
