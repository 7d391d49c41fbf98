use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use super::{build_http_client, non_empty_str, resolve_base_url, send_json};
use crate::config::LlmConfig;
use crate::errors::{Result, StaarError};
use crate::llm::{CompletionRequest, CompletionResponse, LlmProvider};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

pub struct OpenAiProvider {
    http_client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiProvider {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(StaarError::configuration(
                "llm.api_key is required for the openai provider",
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
        json!({
            "model": model,
            "messages": request.chat_messages(),
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
        })
    }

    pub(crate) fn extract_text(body: &Value) -> Result<String> {
        non_empty_str(&body["choices"][0]["message"]["content"]).ok_or_else(|| {
            StaarError::llm_response("OpenAI response has no choices[0].message.content")
        })
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = send_json(
            self.http_client
                .post(&url)
                .bearer_auth(&self.api_key)
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
    use crate::llm::ChatMessage;

    #[test]
    fn test_body_prepends_system_message() {
        let req = CompletionRequest::single_turn("sys", "question please", 300, 0.5);
        let body = OpenAiProvider::build_body("gpt-4o-mini", &req);
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "sys");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["max_tokens"], 300);

        let no_system = CompletionRequest {
            system_prompt: None,
            messages: vec![ChatMessage::user("hi")],
            max_tokens: 1,
            temperature: 0.0,
        };
        let body = OpenAiProvider::build_body("m", &no_system);
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_extract_text() {
        let body = json!({"choices": [{"message": {"role": "assistant", "content": "{\"a\":1}"}}]});
        assert_eq!(OpenAiProvider::extract_text(&body).unwrap(), "{\"a\":1}");

        let empty = json!({"choices": []});
        assert!(OpenAiProvider::extract_text(&empty).is_err());
    }
}
