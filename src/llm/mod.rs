//! LLM 适配层
//!
//! 统一的 `LlmProvider` trait，屏蔽 OpenAI / Anthropic / HuggingFace / Ollama /
//! 自定义 HTTP 端点之间的协议差异。提供商由配置 `llm.provider` 通过注册表选择，
//! 并统一包一层 `RetryingProvider`。

pub mod factory;
pub mod providers;
pub mod retry;
mod types;

pub use factory::create_provider;
pub use retry::RetryingProvider;
pub use types::{ChatMessage, CompletionRequest, CompletionResponse, LlmProvider, MessageRole};
