use crate::EntryConfig;
use effect_bridge_guest::malformed;
use effect_bridge_guest::prelude::*;
use serde::Deserialize;
use serde::Serialize;
use std::fmt;

/// Everything `relay_chat` needs, supplied by the host. The api key never lives in the guest.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// e.g. `https://api.openai.com/v1/chat/completions`
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
    pub prompt: String,
    #[serde(default)]
    pub bridge: BridgeConfig,
}

impl fmt::Debug for ChatConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatConfig")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .field("prompt", &self.prompt)
            .field("bridge", &self.bridge)
            .finish()
    }
}

impl EntryConfig for ChatConfig {
    fn bridge(&self) -> &BridgeConfig {
        &self.bridge
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub message: ChatMessage,
}

/// The part of a chat completion response we read. Anything else in it is ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatCompletion {
    pub choices: Vec<Choice>,
}

impl ChatCompletion {
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .map(|choice| choice.message.content.as_str())
    }
}

pub fn request_headers(config: &ChatConfig) -> String {
    serde_json::json!({
        "Content-Type": "application/json",
        "Authorization": format!("Bearer {}", config.api_key),
    })
    .to_string()
}

pub fn request_body(config: &ChatConfig) -> String {
    serde_json::json!({
        "model": config.model,
        "messages": [{ "role": "user", "content": config.prompt }],
    })
    .to_string()
}

/// POSTs the prompt, logs the first choice's content and returns it.
pub fn relay_chat<H: HostImports>(
    effects: &Effects<H>,
    config: &ChatConfig,
) -> Result<String, BridgeError> {
    let response = effects.perform_http(
        Method::Post,
        &config.endpoint,
        &request_headers(config),
        &request_body(config),
    )?;
    let completion: ChatCompletion = response.json()?;
    let content = completion
        .first_content()
        .ok_or_else(|| malformed!("chat completion has no choices"))?;
    effects.emit_log(LogLevel::Info, content);
    Ok(content.to_string())
}
