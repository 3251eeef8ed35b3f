//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{RegionTag, RoundConfigError, RoundSummaryError};
use storage::repository::ProviderError;

/// Errors emitted by `CatalogIndex`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("region has no catalog entries: {0}")]
    UnknownRegion(RegionTag),
    #[error("failed to load catalog: {0}")]
    Load(#[from] ProviderError),
}

/// Errors emitted by quiz sessions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("invalid round configuration: {0}")]
    InvalidConfig(#[from] RoundConfigError),
    #[error("not enough items for a round: {available} available, {required} required")]
    InsufficientPool { available: usize, required: usize },
    #[error("no round has been started")]
    NotStarted,
    #[error("round already completed")]
    Completed,
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Summary(#[from] RoundSummaryError),
}
