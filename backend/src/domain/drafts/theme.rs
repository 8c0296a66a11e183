//! Theme reduction with a strict exactly-one-theme contract.

use serde::{Deserialize, Serialize};

use crate::domain::ports::ThemeOutcome;

/// Bounds on urgency keywords carried forward.
const MIN_URGENCY_KEYWORDS: usize = 2;
const MAX_URGENCY_KEYWORDS: usize = 3;
/// Upper bound on search terms carried forward.
const MAX_SEARCH_TERMS: usize = 4;

/// Contract violations in the model's theme structure.
///
/// Any violation is a hard error for the generation attempt; the pipeline
/// never silently substitutes a theme.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ThemeContractViolation {
    #[error("theme analysis produced no theme")]
    NoTheme,
    #[error("theme analysis produced {count} themes; exactly one is required")]
    AmbiguousThemes { count: usize },
    #[error("theme analysis produced a blank theme")]
    BlankTheme,
    #[error("theme analysis produced {count} urgency keywords; at least 2 are required")]
    TooFewUrgencyKeywords { count: usize },
    #[error("theme analysis produced no search terms")]
    NoSearchTerms,
}

/// Validated reduction of free-text concerns: one primary theme, urgency
/// keywords, a local angle, and search terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThemeAnalysis {
    pub primary_theme: String,
    /// Two to three keywords; surplus entries are dropped in model order.
    pub urgency_keywords: Vec<String>,
    pub local_angle: String,
    /// Three to four terms; surplus entries are dropped in model order.
    pub search_terms: Vec<String>,
    /// Model confidence clamped to [0, 1].
    pub confidence: f32,
}

impl ThemeAnalysis {
    /// Enforce the contract on a raw model outcome.
    ///
    /// # Errors
    ///
    /// Rejects zero or multiple themes, a blank theme, fewer than two
    /// urgency keywords, and an empty search-term list. The caller treats a
    /// violation as a failed generation attempt, never as something to
    /// paper over.
    pub fn from_outcome(outcome: ThemeOutcome) -> Result<Self, ThemeContractViolation> {
        let ThemeOutcome {
            themes,
            urgency_keywords,
            local_angle,
            search_terms,
            confidence,
        } = outcome;

        let mut themes = themes;
        let primary_theme = match themes.len() {
            0 => return Err(ThemeContractViolation::NoTheme),
            1 => themes.remove(0),
            count => return Err(ThemeContractViolation::AmbiguousThemes { count }),
        };
        let primary_theme = primary_theme.trim().to_owned();
        if primary_theme.is_empty() {
            return Err(ThemeContractViolation::BlankTheme);
        }

        let urgency_keywords: Vec<String> = urgency_keywords
            .into_iter()
            .map(|keyword| keyword.trim().to_owned())
            .filter(|keyword| !keyword.is_empty())
            .take(MAX_URGENCY_KEYWORDS)
            .collect();
        if urgency_keywords.len() < MIN_URGENCY_KEYWORDS {
            return Err(ThemeContractViolation::TooFewUrgencyKeywords {
                count: urgency_keywords.len(),
            });
        }

        let search_terms: Vec<String> = search_terms
            .into_iter()
            .map(|term| term.trim().to_owned())
            .filter(|term| !term.is_empty())
            .take(MAX_SEARCH_TERMS)
            .collect();
        if search_terms.is_empty() {
            return Err(ThemeContractViolation::NoSearchTerms);
        }

        Ok(Self {
            primary_theme,
            urgency_keywords,
            local_angle: local_angle.trim().to_owned(),
            search_terms,
            confidence: confidence.clamp(0.0, 1.0),
        })
    }
}
