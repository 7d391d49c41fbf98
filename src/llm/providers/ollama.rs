use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use super::{build_http_client, non_empty_str, resolve_base_url, send_json};
use crate::config::LlmConfig;
use crate::errors::{Result, StaarError};
use crate::llm::{CompletionRequest, CompletionResponse, LlmProvider};

const DEFAULT_BASE_URL: &str = "http://localhost:11434";

pub struct OllamaProvider {
    http_client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl OllamaProvider {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = Some(config.api_key.trim().to_string()).filter(|k| !k.is_empty());
        Ok(Self {
            http_client: build_http_client(config.timeout_secs)?,
            base_url: resolve_base_url(&config.base_url, DEFAULT_BASE_URL),
            api_key,
            model: config.model.clone(),
        })
    }

    pub(crate) fn build_body(model: &str, request: &CompletionRequest) -> Value {
        let mut body = json!({
            "model": model,
            "prompt": request.conversation_prompt(),
            "stream": false,
            "options": {
                "temperature": request.temperature,
                "num_predict": request.max_tokens,
            },
        });
        if let Some(system) = request.system_prompt.as_ref().filter(|s| !s.is_empty()) {
            body["system"] = json!(system);
        }
        body
    }

    pub(crate) fn extract_text(body: &Value) -> Result<String> {
        non_empty_str(&body["response"])
            .ok_or_else(|| StaarError::llm_response("Ollama response has no response field"))
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        let url = format!("{}/api/generate", self.base_url);
        let mut builder = self
            .http_client
            .post(&url)
            .json(&Self::build_body(&self.model, request));
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        let body = send_json(builder).await?;

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
    fn test_body_disables_streaming() {
        let req = CompletionRequest::single_turn("sys", "go", 64, 0.3);
        let body = OllamaProvider::build_body("llama3.1", &req);
        assert_eq!(body["model"], "llama3.1");
        assert_eq!(body["stream"], false);
        assert_eq!(body["system"], "sys");
        assert_eq!(body["prompt"], "user: go");
        assert_eq!(body["options"]["num_predict"], 64);
    }

    #[test]
    fn test_extract_text() {
        assert_eq!(
            OllamaProvider::extract_text(&json!({"response": "ok", "done": true})).unwrap(),
            "ok"
        );
        assert!(OllamaProvider::extract_text(&json!({"done": true})).is_err());
    }
}
