//! Port for the web-search/citation service.

use async_trait::async_trait;

/// Errors surfaced by web search adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WebSearchError {
    /// Network or protocol failure reaching the search service.
    #[error("web search transport failed: {message}")]
    Transport { message: String },
    /// The search service responded with an undecodable payload.
    #[error("web search payload invalid: {message}")]
    Decode { message: String },
}

impl WebSearchError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

/// One search result with its contextual snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub url: String,
    /// Outlet name when the provider reports one; derived from the URL host
    /// otherwise.
    pub outlet: Option<String>,
    pub snippet: Option<String>,
}

/// Port issuing one query against the search service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WebSearch: Send + Sync {
    /// Run a query and return hits in provider order.
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, WebSearchError>;
}

/// Fixture implementation returning no hits.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureWebSearch;

#[async_trait]
impl WebSearch for FixtureWebSearch {
    async fn search(&self, _query: &str) -> Result<Vec<SearchHit>, WebSearchError> {
        Ok(Vec::new())
    }
}
