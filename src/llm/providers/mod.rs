//! 各提供商实现与共用 HTTP 辅助函数

mod anthropic;
mod custom;
mod huggingface;
mod ollama;
mod openai;

pub use anthropic::AnthropicProvider;
pub use custom::CustomProvider;
pub use huggingface::HuggingFaceProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::time::Duration;

use crate::errors::{Result, StaarError};

/// 错误信息中保留的响应体长度
const MAX_ERROR_BODY_CHARS: usize = 500;

pub(crate) fn build_http_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs.max(1)))
        .build()
        .map_err(|e| StaarError::configuration(format!("Failed to build HTTP client: {e}")))
}

/// 去掉末尾斜杠；为空时使用默认地址
pub(crate) fn resolve_base_url(configured: &str, default: &str) -> String {
    let base = configured.trim();
    let base = if base.is_empty() { default } else { base };
    base.trim_end_matches('/').to_string()
}

/// 发送请求并解析 JSON 响应；非 2xx 状态转换为带状态码的 LlmRequest 错误
pub(crate) async fn send_json(request: RequestBuilder) -> Result<Value> {
    let response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            StaarError::llm_request(format!("request timed out: {e}"))
        } else {
            StaarError::llm_request(format!("request failed: {e}"))
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let body: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
        return Err(StaarError::llm_status(status.as_u16(), &body));
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| StaarError::llm_response(format!("invalid JSON body: {e}")))
}

/// 读取非空字符串字段
pub(crate) fn non_empty_str(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
