//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! Each adapter is a thin translator between domain types and one external
//! system. Business logic stays in the domain services; adapters own request
//! shaping, transport error mapping, and payload decoding.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel
//! - **civic**: postal-code to jurisdiction lookup
//! - **llm**: language model completions
//! - **search**: web search for supporting sources
//! - **payments**: checkout session verification and refunds
//! - **mailvendor**: print-and-mail order submission
//! - **email**: transactional confirmation email

pub mod civic;
pub mod email;
pub mod llm;
pub mod mailvendor;
pub mod payments;
pub mod persistence;
pub mod search;

/// Compact single-line preview of an upstream error body for log and error
/// messages. Whitespace runs collapse and long bodies truncate.
pub(crate) fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
