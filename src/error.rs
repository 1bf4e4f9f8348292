use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed request caught before any backend call, e.g. a provider
    /// block missing its required nested config.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// The balances endpoint returned no record for a linked account.
    #[error("no balance found for account {account_id}")]
    MissingBalance { account_id: String },
    /// Backend failure, surfaced unchanged.
    #[error(transparent)]
    Backend(#[from] fuse_client::ClientError),
}
