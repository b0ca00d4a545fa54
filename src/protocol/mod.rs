//! Classification of streamed delta events.
//!
//! The proxy under test may answer in any of three streaming schemas: OpenAI
//! Chat Completions deltas, Anthropic content-block deltas, or OpenAI
//! Responses output-text deltas. Events arrive as untyped JSON; each is
//! matched against the three shapes in a fixed priority order and at most one
//! extraction rule applies.

use serde_json::Value;

/// A text fragment recognized in one streamed delta event, tagged with the
/// schema it was extracted under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextDelta {
    /// OpenAI Chat Completions: `choices[0].delta.content`.
    OpenAiChat(String),
    /// Anthropic: `content_block_delta` carrying a `text_delta`.
    Anthropic(String),
    /// OpenAI Responses: `response.output_text.delta`.
    OpenAiResponses(String),
}

impl TextDelta {
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            TextDelta::OpenAiChat(text)
            | TextDelta::Anthropic(text)
            | TextDelta::OpenAiResponses(text) => text,
        }
    }

    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            TextDelta::OpenAiChat(text)
            | TextDelta::Anthropic(text)
            | TextDelta::OpenAiResponses(text) => text,
        }
    }
}

/// Classify one parsed event and extract its text fragment, if any.
///
/// The three shape checks are mutually exclusive and applied first-match:
/// a non-empty `choices` array claims the event for the OpenAI Chat branch
/// even when it carries no usable content, and the `type`-tagged branches are
/// then never consulted.
#[must_use]
pub fn classify_delta(event: &Value) -> Option<TextDelta> {
    if let Some(choices) = event.get("choices").and_then(Value::as_array) {
        if let Some(first) = choices.first() {
            let content = first
                .get("delta")
                .and_then(|delta| delta.get("content"))
                .and_then(Value::as_str);
            return match content {
                Some(text) if !text.is_empty() => Some(TextDelta::OpenAiChat(text.to_string())),
                _ => None,
            };
        }
    }

    match event.get("type").and_then(Value::as_str) {
        Some("content_block_delta") => {
            let delta = event.get("delta")?;
            if delta.get("type").and_then(Value::as_str) != Some("text_delta") {
                return None;
            }
            let text = delta.get("text").and_then(Value::as_str).unwrap_or("");
            Some(TextDelta::Anthropic(text.to_string()))
        }
        Some("response.output_text.delta") => {
            let text = match event.get("delta")? {
                Value::String(text) => text.clone(),
                Value::Null => return None,
                other => other.to_string(),
            };
            Some(TextDelta::OpenAiResponses(text))
        }
        _ => None,
    }
}

/// Token usage reported by the upstream on the final streamed chunk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

/// Extract a `usage` object from a streamed event, if present.
///
/// Present only when the request asked for `stream_options.include_usage`,
/// and then typically on the last chunk before `[DONE]`.
#[must_use]
pub fn extract_usage(event: &Value) -> Option<StreamUsage> {
    let usage = event.get("usage")?.as_object()?;
    let field = |name: &str| usage.get(name).and_then(Value::as_u64).unwrap_or(0);
    Some(StreamUsage {
        prompt_tokens: field("prompt_tokens"),
        completion_tokens: field("completion_tokens"),
        total_tokens: field("total_tokens"),
    })
}
