//! The printable-message composer.
//!
//! Every accepted message obeys a structural contract (a salutation line
//! naming the recipient, then body lines, then a signature line) and a
//! numeric contract: at most [`MESSAGE_HARD_CEILING`] characters
//! including line breaks. The ceiling is absolute; whichever path produced
//! the text (direct, shortened, or fallback), the persisted and dispatched
//! message never exceeds it.

use std::sync::Arc;

use tracing::warn;

use crate::domain::location::Location;
use crate::domain::ports::{ComposeRequest, LanguageModel, ShortenRequest};

/// Preferred length band requested from the model.
pub const MESSAGE_TARGET_MIN: usize = 275;
/// Upper edge of the preferred band.
pub const MESSAGE_TARGET_MAX: usize = 280;
/// Hard ceiling in characters, line breaks included.
pub const MESSAGE_HARD_CEILING: usize = 290;

/// Component caps that make the fallback skeleton short by construction.
const FALLBACK_NAME_CAP: usize = 40;
const FALLBACK_THEME_CAP: usize = 70;
const FALLBACK_CITY_CAP: usize = 30;
const FALLBACK_SIGNATURE_CAP: usize = 60;

/// Why the deterministic fallback replaced the model's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// The model call itself failed; the attempt is recorded as an error.
    ModelError,
    /// The model answered but violated the structural contract.
    InvalidStructure,
    /// Shortening failed or ignored the ceiling.
    OverCeiling,
}

/// Which path produced the accepted message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessagePath {
    /// First candidate fit the ceiling.
    Direct,
    /// One shortening pass brought it under the ceiling.
    Shortened,
    /// The deterministic minimal skeleton was substituted.
    Fallback(FallbackReason),
}

/// An accepted message and the path that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedMessage {
    pub text: String,
    pub path: MessagePath,
}

impl ComposedMessage {
    /// Whether the generation attempt should persist as an error.
    ///
    /// Only a failed model call counts; structural or length fallbacks are
    /// normal outcomes of the algorithm.
    pub fn is_degraded(&self) -> bool {
        matches!(self.path, MessagePath::Fallback(FallbackReason::ModelError))
    }
}

/// Character count as the contract measures it: Unicode scalars, line
/// breaks included.
pub fn message_len(text: &str) -> usize {
    text.chars().count()
}

fn truncate_chars(text: &str, cap: usize) -> String {
    text.chars().take(cap).collect()
}

/// Structural contract check: salutation line naming the recipient, at
/// least one non-empty body line, and a trailing signature line.
pub fn satisfies_structure(text: &str, salutation_name: &str, signature: &str) -> bool {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() < 3 {
        return false;
    }
    let Some(salutation) = lines.first() else {
        return false;
    };
    if !salutation.starts_with("Dear ") || !salutation.contains(salutation_name) {
        return false;
    }
    let Some(last) = lines.last() else {
        return false;
    };
    if !last.contains(signature.trim()) {
        return false;
    }
    lines
        .iter()
        .skip(1)
        .take(lines.len() - 2)
        .any(|line| !line.trim().is_empty())
}

/// Deterministic minimal message built from a fixed skeleton.
///
/// Only the theme, location, and recipient name are interpolated, each
/// capped, so the result is guaranteed under the ceiling by construction.
pub fn fallback_message(
    theme: &str,
    location: &Location,
    salutation_name: &str,
    signature: &str,
) -> String {
    let name = truncate_chars(salutation_name, FALLBACK_NAME_CAP);
    let theme = truncate_chars(theme.trim(), FALLBACK_THEME_CAP);
    let theme = if theme.is_empty() {
        "this issue".to_owned()
    } else {
        theme
    };
    let city = truncate_chars(&location.city, FALLBACK_CITY_CAP);
    let signature = truncate_chars(signature, FALLBACK_SIGNATURE_CAP);
    format!(
        "Dear {name},\nPlease act on {theme}. It touches families across {city} every day.\n{signature}"
    )
}

/// Composer owning the generate/shorten/fallback loop.
#[derive(Clone)]
pub struct DraftComposer {
    model: Arc<dyn LanguageModel>,
}

impl DraftComposer {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Produce a message satisfying both contracts. Never fails: every
    /// degradation path lands on the deterministic fallback.
    pub async fn compose(&self, request: &ComposeRequest) -> ComposedMessage {
        let fallback = |reason| ComposedMessage {
            text: fallback_message(
                &request.theme.primary_theme,
                &request.location,
                &request.salutation_name,
                &request.signature,
            ),
            path: MessagePath::Fallback(reason),
        };

        let candidate = match self.model.compose_draft(request).await {
            Ok(text) => text,
            Err(error) => {
                warn!(%error, "draft composition failed; using fallback skeleton");
                return fallback(FallbackReason::ModelError);
            }
        };

        if !satisfies_structure(&candidate, &request.salutation_name, &request.signature) {
            return fallback(FallbackReason::InvalidStructure);
        }
        if message_len(&candidate) <= MESSAGE_HARD_CEILING {
            return ComposedMessage {
                text: candidate,
                path: MessagePath::Direct,
            };
        }

        let shortened = match self
            .model
            .shorten_draft(&ShortenRequest {
                message: candidate,
                salutation_name: request.salutation_name.clone(),
                signature: request.signature.clone(),
                max_chars: MESSAGE_TARGET_MAX,
            })
            .await
        {
            Ok(text) => text,
            Err(error) => {
                warn!(%error, "shortening pass failed; using fallback skeleton");
                return fallback(FallbackReason::ModelError);
            }
        };

        if satisfies_structure(&shortened, &request.salutation_name, &request.signature)
            && message_len(&shortened) <= MESSAGE_HARD_CEILING
        {
            ComposedMessage {
                text: shortened,
                path: MessagePath::Shortened,
            }
        } else {
            fallback(FallbackReason::OverCeiling)
        }
    }
}
