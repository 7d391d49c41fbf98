use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use super::{build_http_client, non_empty_str, resolve_base_url, send_json};
use crate::config::LlmConfig;
use crate::errors::{Result, StaarError};
use crate::llm::{CompletionRequest, CompletionResponse, LlmProvider};

const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";

pub struct HuggingFaceProvider {
    http_client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl HuggingFaceProvider {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(StaarError::configuration(
                "llm.api_key is required for the huggingface provider",
            ));
        }
        Ok(Self {
            http_client: build_http_client(config.timeout_secs)?,
            base_url: resolve_base_url(&config.base_url, DEFAULT_BASE_URL),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    pub(crate) fn build_body(request: &CompletionRequest) -> Value {
        json!({
            "inputs": request.flatten_prompt(),
            "parameters": {
                "max_new_tokens": request.max_tokens,
                "temperature": request.temperature,
                "return_full_text": false,
            },
        })
    }

    pub(crate) fn extract_text(body: &Value) -> Result<String> {
        non_empty_str(&body[0]["generated_text"])
            .or_else(|| non_empty_str(&body["generated_text"]))
            .ok_or_else(|| StaarError::llm_response("HuggingFace response has no generated_text"))
    }
}

#[async_trait]
impl LlmProvider for HuggingFaceProvider {
    fn name(&self) -> &str {
        "huggingface"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        let url = format!("{}/models/{}", self.base_url, self.model);
        let body = send_json(
            self.http_client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&Self::build_body(request)),
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
    fn test_body_uses_flattened_inputs() {
        let req = CompletionRequest::single_turn("sys", "make a question", 128, 0.7);
        let body = HuggingFaceProvider::build_body(&req);
        assert_eq!(body["inputs"], "system: sys\n\nuser: make a question");
        assert_eq!(body["parameters"]["max_new_tokens"], 128);
        assert_eq!(body["parameters"]["return_full_text"], false);
    }

    #[test]
    fn test_extract_text_accepts_array_or_object() {
        let arr = json!([{"generated_text": "hello"}]);
        assert_eq!(HuggingFaceProvider::extract_text(&arr).unwrap(), "hello");
        let obj = json!({"generated_text": "world"});
        assert_eq!(HuggingFaceProvider::extract_text(&obj).unwrap(), "world");
        assert!(HuggingFaceProvider::extract_text(&json!({"error": "loading"})).is_err());
    }
}
