//! DTOs for decoding web search responses.

use serde::Deserialize;

use crate::domain::ports::SearchHit;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SearchResponseDto {
    #[serde(default)]
    pub(super) results: Vec<SearchResultDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SearchResultDto {
    pub(super) url: String,
    pub(super) source: Option<String>,
    pub(super) snippet: Option<String>,
}

impl SearchResponseDto {
    pub(super) fn into_hits(self) -> Vec<SearchHit> {
        self.results
            .into_iter()
            .map(|result| SearchHit {
                url: result.url,
                outlet: result.source,
                snippet: result.snippet,
            })
            .collect()
    }
}
