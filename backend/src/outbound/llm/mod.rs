//! Reqwest-backed language model adapter over a chat-completion API.
//!
//! Prompting lives here, not in the domain: the domain sees typed requests
//! and outcomes, and treats a malformed completion as a failed attempt to
//! regenerate rather than a transport failure.

mod dto;

use std::fmt::Write as _;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use crate::domain::ports::{
    ComposeRequest, LanguageModel, LanguageModelError, ShortenRequest, ThemeOutcome, ThemeRequest,
};

use dto::{ChatMessageDto, ChatRequestDto, ChatResponseDto, ResponseFormatDto, ThemeJsonDto};

const THEME_TEMPERATURE: f32 = 0.2;
const COMPOSE_TEMPERATURE: f32 = 0.7;

/// Language model adapter speaking the chat-completion wire format.
pub struct LlmHttpModel {
    client: Client,
    endpoint: Url,
    api_key: String,
    model: String,
}

impl LlmHttpModel {
    /// Build an adapter using a reqwest client with an explicit request
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key,
            model,
        })
    }

    async fn complete(
        &self,
        system: String,
        user: String,
        json_output: bool,
        temperature: f32,
    ) -> Result<String, LanguageModelError> {
        let request = ChatRequestDto {
            model: &self.model,
            messages: vec![
                ChatMessageDto {
                    role: "system",
                    content: system,
                },
                ChatMessageDto {
                    role: "user",
                    content: user,
                },
            ],
            response_format: json_output.then(ResponseFormatDto::json_object),
            temperature,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        parse_content(body.as_ref())
    }
}

#[async_trait]
impl LanguageModel for LlmHttpModel {
    async fn analyze_theme(
        &self,
        request: &ThemeRequest,
    ) -> Result<ThemeOutcome, LanguageModelError> {
        let content = self
            .complete(
                theme_system_prompt(),
                theme_user_prompt(request),
                true,
                THEME_TEMPERATURE,
            )
            .await?;
        parse_theme(&content)
    }

    async fn compose_draft(&self, request: &ComposeRequest) -> Result<String, LanguageModelError> {
        let content = self
            .complete(
                compose_system_prompt(),
                compose_user_prompt(request),
                false,
                COMPOSE_TEMPERATURE,
            )
            .await?;
        require_text(content)
    }

    async fn shorten_draft(&self, request: &ShortenRequest) -> Result<String, LanguageModelError> {
        let content = self
            .complete(
                compose_system_prompt(),
                shorten_user_prompt(request),
                false,
                COMPOSE_TEMPERATURE,
            )
            .await?;
        require_text(content)
    }

    async fn summarize_source(
        &self,
        url: &str,
        snippet: &str,
        theme: &str,
    ) -> Result<String, LanguageModelError> {
        let content = self
            .complete(
                "You summarize news snippets in one factual sentence.".to_owned(),
                format!(
                    "Summarize this snippet in one sentence as it relates to \"{theme}\".\n\
                     URL: {url}\nSnippet: {snippet}"
                ),
                false,
                THEME_TEMPERATURE,
            )
            .await?;
        require_text(content)
    }
}

fn theme_system_prompt() -> String {
    "You analyze a constituent's civic concerns. Respond with a JSON object \
     holding: themes (array of short theme strings; exactly one when the \
     concerns have a single clear subject), urgencyKeywords (2-3 strings), \
     localAngle (one sentence), searchTerms (3-4 news search queries), and \
     confidence (0 to 1)."
        .to_owned()
}

fn theme_user_prompt(request: &ThemeRequest) -> String {
    let mut prompt = format!(
        "Concerns: {concerns}\nLocation: {city}, {state}",
        concerns = request.concerns,
        city = request.location.city,
        state = request.location.state,
    );
    if let Some(impact) = &request.personal_impact {
        let _ = write!(prompt, "\nPersonal impact: {impact}");
    }
    prompt
}

fn compose_system_prompt() -> String {
    "You write short, respectful advocacy postcards from a constituent to an \
     elected official. Plain text only, no markdown. Open with the given \
     salutation line and end with the given signature line."
        .to_owned()
}

fn compose_user_prompt(request: &ComposeRequest) -> String {
    let mut prompt = format!(
        "Write a postcard about \"{theme}\".\n\
         Salutation line: Dear {salutation},\n\
         Signature line: {signature}\n\
         Constituent concerns: {concerns}\n\
         Local angle: {angle}\n\
         Target 275 to 280 characters including line breaks.",
        theme = request.theme.primary_theme,
        salutation = request.salutation_name,
        signature = request.signature,
        concerns = request.concerns,
        angle = request.theme.local_angle,
    );
    if let Some(impact) = &request.personal_impact {
        let _ = write!(prompt, "\nPersonal impact: {impact}");
    }
    if !request.source_summaries.is_empty() {
        let _ = write!(
            prompt,
            "\nGround the message in these facts:\n{}",
            request.source_summaries.join("\n")
        );
    }
    prompt
}

fn shorten_user_prompt(request: &ShortenRequest) -> String {
    format!(
        "Shorten this postcard to at most {max} characters including line \
         breaks, keeping its strongest point.\n\
         Salutation line: Dear {salutation},\n\
         Signature line: {signature}\n\
         Postcard:\n{message}",
        max = request.max_chars,
        salutation = request.salutation_name,
        signature = request.signature,
        message = request.message,
    )
}

fn parse_content(body: &[u8]) -> Result<String, LanguageModelError> {
    let decoded: ChatResponseDto = serde_json::from_slice(body).map_err(|error| {
        LanguageModelError::malformed(format!("invalid completion JSON payload: {error}"))
    })?;
    decoded.into_content().map_err(LanguageModelError::malformed)
}

fn parse_theme(content: &str) -> Result<ThemeOutcome, LanguageModelError> {
    let decoded: ThemeJsonDto = serde_json::from_str(content.trim()).map_err(|error| {
        LanguageModelError::malformed(format!("theme JSON did not decode: {error}"))
    })?;
    Ok(decoded.into_outcome())
}

fn require_text(content: String) -> Result<String, LanguageModelError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(LanguageModelError::malformed("completion content was blank"));
    }
    Ok(trimmed.to_owned())
}

fn map_transport_error(error: reqwest::Error) -> LanguageModelError {
    if error.is_timeout() {
        LanguageModelError::timeout(error.to_string())
    } else {
        LanguageModelError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> LanguageModelError {
    let preview = super::body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            LanguageModelError::timeout(message)
        }
        _ => LanguageModelError::transport(message),
    }
}
