//! Source discovery with credibility ranking.
//!
//! Discovery is best-effort: any upstream failure degrades to an empty
//! source list and never aborts the generation pipeline.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};
use url::Url;

use crate::domain::drafts::{DraftSource, MAX_SOURCES_PER_DRAFT, ThemeAnalysis};
use crate::domain::location::Location;
use crate::domain::ports::{LanguageModel, SearchHit, WebSearch};

/// Summary used when the model cannot produce one; sources are never
/// dropped for a missing summary, so the list length stays deterministic.
const PLACEHOLDER_SUMMARY: &str = "Additional reporting on this issue.";

/// How many search terms are queried per discovery run.
const QUERIES_PER_RUN: usize = 2;

/// Credibility band of an outlet, ordered best-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum OutletRank {
    /// Legislative and agency domains.
    Government,
    /// Wire services.
    WireService,
    /// Major national papers.
    NationalPaper,
    /// Everything else.
    Other,
}

const WIRE_SERVICES: [&str; 4] = ["apnews.com", "reuters.com", "upi.com", "afp.com"];
const NATIONAL_PAPERS: [&str; 5] = [
    "nytimes.com",
    "washingtonpost.com",
    "wsj.com",
    "usatoday.com",
    "latimes.com",
];

fn host_matches(host: &str, domain: &str) -> bool {
    host == domain || host.ends_with(&format!(".{domain}"))
}

/// Band a URL by its host. Unparsable URLs rank with the rest.
pub fn rank_url(raw: &str) -> OutletRank {
    let Some(host) = Url::parse(raw).ok().and_then(|url| {
        url.host_str().map(str::to_ascii_lowercase)
    }) else {
        return OutletRank::Other;
    };

    if host.ends_with(".gov") || host == "congress.gov" {
        return OutletRank::Government;
    }
    if WIRE_SERVICES.iter().any(|domain| host_matches(&host, domain)) {
        return OutletRank::WireService;
    }
    if NATIONAL_PAPERS.iter().any(|domain| host_matches(&host, domain)) {
        return OutletRank::NationalPaper;
    }
    OutletRank::Other
}

/// Outlet label for a hit: provider-reported name, else the URL host.
fn outlet_label(hit: &SearchHit) -> String {
    if let Some(outlet) = hit.outlet.as_deref() {
        let trimmed = outlet.trim();
        if !trimmed.is_empty() {
            return trimmed.to_owned();
        }
    }
    Url::parse(&hit.url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_owned))
        .unwrap_or_else(|| "unknown outlet".to_owned())
}

/// Discovers up to four credibility-ranked sources for a theme.
#[derive(Clone)]
pub struct SourceDiscovery {
    search: Arc<dyn WebSearch>,
    model: Arc<dyn LanguageModel>,
}

impl SourceDiscovery {
    pub fn new(search: Arc<dyn WebSearch>, model: Arc<dyn LanguageModel>) -> Self {
        Self { search, model }
    }

    /// Run discovery for one theme and location.
    ///
    /// Returns at most four sources ordered by credibility band, ties broken
    /// by discovery order. Failures degrade: search errors shrink the pool,
    /// summary errors fall back to the placeholder, and a fully failed run
    /// yields an empty list.
    pub async fn discover(&self, theme: &ThemeAnalysis, location: &Location) -> Vec<DraftSource> {
        let mut seen = HashSet::new();
        let mut hits = Vec::new();
        for term in theme.search_terms.iter().take(QUERIES_PER_RUN) {
            let query = if location.is_unknown() {
                term.clone()
            } else {
                format!("{term} {} {}", location.city, location.state)
            };
            match self.search.search(&query).await {
                Ok(results) => {
                    for hit in results {
                        if seen.insert(hit.url.clone()) {
                            hits.push(hit);
                        }
                    }
                }
                Err(error) => {
                    warn!(%query, %error, "source search failed; continuing with partial pool");
                }
            }
        }

        if hits.is_empty() {
            debug!(theme = %theme.primary_theme, "source discovery produced no hits");
            return Vec::new();
        }

        // Stable sort preserves discovery order within a credibility band.
        hits.sort_by_key(|hit| rank_url(&hit.url));
        hits.truncate(MAX_SOURCES_PER_DRAFT);

        let mut sources = Vec::with_capacity(hits.len());
        for (index, hit) in hits.iter().enumerate() {
            let summary = self.summarize(hit, theme).await;
            sources.push(DraftSource {
                ordinal: i32::try_from(index + 1).unwrap_or(i32::MAX),
                url: hit.url.clone(),
                outlet: outlet_label(hit),
                summary,
            });
        }
        sources
    }

    async fn summarize(&self, hit: &SearchHit, theme: &ThemeAnalysis) -> String {
        let Some(snippet) = hit.snippet.as_deref().filter(|s| !s.trim().is_empty()) else {
            return PLACEHOLDER_SUMMARY.to_owned();
        };
        match self
            .model
            .summarize_source(&hit.url, snippet, &theme.primary_theme)
            .await
        {
            Ok(summary) if !summary.trim().is_empty() => summary,
            Ok(_) => PLACEHOLDER_SUMMARY.to_owned(),
            Err(error) => {
                warn!(url = %hit.url, %error, "source summary failed; using placeholder");
                PLACEHOLDER_SUMMARY.to_owned()
            }
        }
    }
}
