use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use super::{build_http_client, non_empty_str, resolve_base_url, send_json};
use crate::config::LlmConfig;
use crate::errors::{Result, StaarError};
use crate::llm::{CompletionRequest, CompletionResponse, LlmProvider};

/// 依次尝试的回复文本位置（JSON Pointer）
const TEXT_POINTERS: &[&str] = &[
    "/choices/0/message/content",
    "/choices/0/text",
    "/response",
    "/generated_text",
    "/text",
    "/content",
    "/output",
];

/// 自定义 HTTP 端点：请求体同时带 prompt 与 messages，回复按常见字段探测
pub struct CustomProvider {
    http_client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

impl CustomProvider {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(StaarError::configuration(
                "llm.base_url is required for the custom provider",
            ));
        }
        let api_key = Some(config.api_key.trim().to_string()).filter(|k| !k.is_empty());
        Ok(Self {
            http_client: build_http_client(config.timeout_secs)?,
            endpoint: resolve_base_url(&config.base_url, ""),
            api_key,
            model: config.model.clone(),
        })
    }

    pub(crate) fn build_body(model: &str, request: &CompletionRequest) -> Value {
        json!({
            "model": model,
            "prompt": request.flatten_prompt(),
            "messages": request.chat_messages(),
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
        })
    }

    pub(crate) fn extract_text(body: &Value) -> Result<String> {
        TEXT_POINTERS
            .iter()
            .find_map(|pointer| body.pointer(pointer).and_then(non_empty_str))
            .ok_or_else(|| {
                StaarError::llm_response("Custom endpoint response has no recognizable text field")
            })
    }
}

#[async_trait]
impl LlmProvider for CustomProvider {
    fn name(&self) -> &str {
        "custom"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        let mut builder = self
            .http_client
            .post(&self.endpoint)
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
