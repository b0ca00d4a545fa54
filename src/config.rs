use serde::Serialize;

/// Name of the custom identification header sent with every probe request.
///
/// The proxy under test is expected to strip this header before forwarding
/// upstream; nothing here verifies that it actually does.
pub const CLIENT_TYPE_HEADER: &str = "Posit-Client-Type";

/// One `{role, content}` turn of the probe conversation.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    #[must_use]
    pub fn new(role: &str, content: &str) -> Self {
        Self {
            role: role.to_string(),
            content: content.to_string(),
        }
    }
}

/// Streaming options carried on the wire request.
#[derive(Debug, Clone, Serialize)]
pub struct StreamOptions {
    pub include_usage: bool,
}

/// Wire payload for the chat-completions probe request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
    pub stream_options: StreamOptions,
}

/// Configuration for one probe run.
///
/// The defaults reproduce the fixed request the probe was written around;
/// override fields to point it at a different proxy or prompt.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Target endpoint of the proxy under test.
    pub url: String,
    /// Value sent for the [`CLIENT_TYPE_HEADER`] header.
    pub client_type: String,
    pub model: String,
    pub messages: Vec<ChatMessage>,
    /// Whole-request timeout in seconds; 0 disables the timeout.
    pub timeout_secs: u64,
    /// Log level string: DEBUG, INFO, WARNING, ERROR, CRITICAL or DISABLED.
    pub log_level: String,
}

fn default_url() -> String {
    "http://localhost:8081/v1/chat/completions".to_string()
}

fn default_messages() -> Vec<ChatMessage> {
    vec![
        ChatMessage::new(
            "developer",
            "You are a helpful assistant that provides concise answers.",
        ),
        ChatMessage::new("user", "Tell me a haiku."),
    ]
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            client_type: "positron-assistant".to_string(),
            model: "gpt-4o".to_string(),
            messages: default_messages(),
            timeout_secs: 180,
            log_level: "INFO".to_string(),
        }
    }
}

impl ProbeConfig {
    /// Build the wire payload for this configuration.
    ///
    /// Streaming is always requested, with usage reporting enabled.
    #[must_use]
    pub fn request_payload(&self) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: self.messages.clone(),
            stream: true,
            stream_options: StreamOptions {
                include_usage: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_payload_shape() {
        let config = ProbeConfig::default();
        let payload = config.request_payload();
        let value = serde_json::to_value(&payload).expect("payload serializes");

        assert_eq!(value["model"], "gpt-4o");
        assert_eq!(value["stream"], true);
        assert_eq!(value["stream_options"]["include_usage"], true);

        let messages = value["messages"].as_array().expect("messages array");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "developer");
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(messages[1]["content"], "Tell me a haiku.");
    }

    #[test]
    fn test_default_endpoint() {
        let config = ProbeConfig::default();
        assert_eq!(config.url, "http://localhost:8081/v1/chat/completions");
        assert_eq!(config.client_type, "positron-assistant");
    }
}
