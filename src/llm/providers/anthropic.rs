use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use super::{build_http_client, resolve_base_url, send_json};
use crate::config::LlmConfig;
use crate::errors::{Result, StaarError};
use crate::llm::{CompletionRequest, CompletionResponse, LlmProvider, MessageRole};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicProvider {
    http_client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl AnthropicProvider {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(StaarError::configuration(
                "llm.api_key is required for the anthropic provider",
            ));
        }
        Ok(Self {
            http_client: build_http_client(config.timeout_secs)?,
            base_url: resolve_base_url(&config.base_url, DEFAULT_BASE_URL),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    pub(crate) fn build_body(model: &str, request: &CompletionRequest) -> Value {
        // Messages API 只接受 user / assistant，system 单独传
        let messages: Vec<Value> = request
            .messages
            .iter()
            .filter(|m| m.role != MessageRole::System)
            .map(|m| json!({"role": m.role.as_str(), "content": m.content}))
            .collect();

        let mut body = json!({
            "model": model,
            "messages": messages,
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
        });
        if let Some(system) = request.system_prompt.as_ref().filter(|s| !s.is_empty()) {
            body["system"] = json!(system);
        }
        body
    }

    pub(crate) fn extract_text(body: &Value) -> Result<String> {
        let blocks = body["content"]
            .as_array()
            .ok_or_else(|| StaarError::llm_response("Anthropic response has no content array"))?;

        let text: String = blocks
            .iter()
            .filter(|block| block["type"].as_str() == Some("text"))
            .filter_map(|block| block["text"].as_str())
            .collect();

        if text.trim().is_empty() {
            return Err(StaarError::llm_response(
                "Anthropic response contains no text blocks",
            ));
        }
        Ok(text)
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        let url = format!("{}/messages", self.base_url);
        let body = send_json(
            self.http_client
                .post(&url)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&Self::build_body(&self.model, request)),
        )
        .await?;

        Ok(CompletionResponse {
            text: Self::extract_text(&body)?,
            provider: self.name().to_string(),
            model: self.model.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_moves_system_to_top_level() {
        let req = CompletionRequest::single_turn("sys", "hello", 256, 0.2);
        let body = AnthropicProvider::build_body("claude-3-5-haiku-latest", &req);
        assert_eq!(body["system"], "sys");
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["max_tokens"], 256);
    }

    #[test]
    fn test_extract_text_concatenates_text_blocks() {
        let body = json!({
            "content": [
                {"type": "text", "text": "{\"questionText\":"},
                {"type": "tool_use", "id": "x", "name": "y", "input": {}},
                {"type": "text", "text": " \"x\"}"}
            ]
        });
        assert_eq!(
            AnthropicProvider::extract_text(&body).unwrap(),
            "{\"questionText\": \"x\"}"
        );
        assert!(AnthropicProvider::extract_text(&json!({"content": []})).is_err());
        assert!(AnthropicProvider::extract_text(&json!({"error": "x"})).is_err());
    }
}
