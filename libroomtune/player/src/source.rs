use async_trait::async_trait;
use thiserror::Error;

use crate::dto::track::Track;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("No results found for {0:?}")]
    NoResultsFound(String),
    #[error("Unable to resolve {0:?}")]
    InvalidReference(String),
    #[error("Error downloading track: {0}")]
    Download(String),
}

/// Turns what a user typed into a playable [`Track`].
#[async_trait]
pub trait TrackSource: Send + Sync + 'static {
    /// Resolves `query`, which is either a direct link or free text to search for.
    async fn resolve(&self, query: &str) -> Result<Track, SourceError>;
}
