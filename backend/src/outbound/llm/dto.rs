//! DTOs for the chat-completion wire format.

use serde::{Deserialize, Serialize};

use crate::domain::ports::ThemeOutcome;

#[derive(Debug, Serialize)]
pub(super) struct ChatRequestDto<'a> {
    pub(super) model: &'a str,
    pub(super) messages: Vec<ChatMessageDto<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) response_format: Option<ResponseFormatDto>,
    pub(super) temperature: f32,
}

#[derive(Debug, Serialize)]
pub(super) struct ChatMessageDto<'a> {
    pub(super) role: &'a str,
    pub(super) content: String,
}

#[derive(Debug, Serialize)]
pub(super) struct ResponseFormatDto {
    #[serde(rename = "type")]
    pub(super) format_type: &'static str,
}

impl ResponseFormatDto {
    pub(super) fn json_object() -> Self {
        Self {
            format_type: "json_object",
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ChatResponseDto {
    #[serde(default)]
    pub(super) choices: Vec<ChatChoiceDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ChatChoiceDto {
    pub(super) message: ChatChoiceMessageDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct ChatChoiceMessageDto {
    pub(super) content: String,
}

impl ChatResponseDto {
    /// First choice's content, the only one requested.
    pub(super) fn into_content(self) -> Result<String, String> {
        self.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| "completion returned no choices".to_owned())
    }
}

/// Structured theme payload the model is prompted to emit as JSON.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ThemeJsonDto {
    #[serde(default)]
    pub(super) themes: Vec<String>,
    #[serde(default)]
    pub(super) urgency_keywords: Vec<String>,
    #[serde(default)]
    pub(super) local_angle: String,
    #[serde(default)]
    pub(super) search_terms: Vec<String>,
    #[serde(default)]
    pub(super) confidence: f32,
}

impl ThemeJsonDto {
    pub(super) fn into_outcome(self) -> ThemeOutcome {
        ThemeOutcome {
            themes: self.themes,
            urgency_keywords: self.urgency_keywords,
            local_angle: self.local_angle,
            search_terms: self.search_terms,
            confidence: self.confidence,
        }
    }
}
