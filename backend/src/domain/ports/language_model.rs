//! Port for the language-model text service.
//!
//! The adapter owns prompting and decoding; the domain sees typed requests
//! and outcomes so the compose/shorten loop can distinguish "malformed
//! output, regenerate" from "network failure, fall back" deterministically.

use async_trait::async_trait;

use crate::domain::drafts::ThemeAnalysis;
use crate::domain::location::Location;

/// Errors surfaced by language model adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LanguageModelError {
    /// Network or protocol failure reaching the model service.
    #[error("language model transport failed: {message}")]
    Transport { message: String },
    /// The model service did not answer inside the configured deadline.
    #[error("language model timed out: {message}")]
    Timeout { message: String },
    /// The model answered but the structure was not usable.
    #[error("language model output malformed: {message}")]
    Malformed { message: String },
}

impl LanguageModelError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}

/// Inputs to the theme-reduction step.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeRequest {
    pub concerns: String,
    pub personal_impact: Option<String>,
    pub location: Location,
}

/// Raw theme structure as the model produced it, before the exactly-one
/// contract is enforced by the analyzer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ThemeOutcome {
    pub themes: Vec<String>,
    pub urgency_keywords: Vec<String>,
    pub local_angle: String,
    pub search_terms: Vec<String>,
    pub confidence: f32,
}

/// Inputs to a draft composition pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposeRequest {
    pub concerns: String,
    pub personal_impact: Option<String>,
    pub theme: ThemeAnalysis,
    pub location: Location,
    /// Name for the salutation line ("Dear {name},").
    pub salutation_name: String,
    /// Full signature line the message must end with.
    pub signature: String,
    /// Short summaries of discovered sources, for grounding.
    pub source_summaries: Vec<String>,
}

/// Inputs to the single shortening pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortenRequest {
    pub message: String,
    pub salutation_name: String,
    pub signature: String,
    /// Ceiling in characters including line breaks.
    pub max_chars: usize,
}

/// Port over the structured-prompt text service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Reduce free-text concerns into a theme structure.
    async fn analyze_theme(&self, request: &ThemeRequest)
    -> Result<ThemeOutcome, LanguageModelError>;

    /// Produce a candidate printable message.
    async fn compose_draft(&self, request: &ComposeRequest)
    -> Result<String, LanguageModelError>;

    /// Re-derive a shorter message preserving the strongest point.
    async fn shorten_draft(&self, request: &ShortenRequest)
    -> Result<String, LanguageModelError>;

    /// Produce a one-sentence extractive summary of a source snippet.
    async fn summarize_source(
        &self,
        url: &str,
        snippet: &str,
        theme: &str,
    ) -> Result<String, LanguageModelError>;
}
