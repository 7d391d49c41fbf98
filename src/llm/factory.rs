//! 提供商注册表：按 `llm.provider` 名称构造实现

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::LlmConfig;
use crate::errors::{Result, StaarError};
use crate::llm::providers::{
    AnthropicProvider, CustomProvider, HuggingFaceProvider, OllamaProvider, OpenAiProvider,
};
use crate::llm::{LlmProvider, RetryingProvider};

pub type ProviderConstructor = fn(&LlmConfig) -> Result<Arc<dyn LlmProvider>>;

fn openai(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>> {
    Ok(Arc::new(OpenAiProvider::new(config)?))
}

fn anthropic(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>> {
    Ok(Arc::new(AnthropicProvider::new(config)?))
}

fn huggingface(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>> {
    Ok(Arc::new(HuggingFaceProvider::new(config)?))
}

fn ollama(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>> {
    Ok(Arc::new(OllamaProvider::new(config)?))
}

fn custom(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>> {
    Ok(Arc::new(CustomProvider::new(config)?))
}

static PROVIDER_REGISTRY: Lazy<HashMap<&'static str, ProviderConstructor>> = Lazy::new(|| {
    let mut registry: HashMap<&'static str, ProviderConstructor> = HashMap::new();
    registry.insert("openai", openai);
    registry.insert("anthropic", anthropic);
    registry.insert("huggingface", huggingface);
    registry.insert("ollama", ollama);
    registry.insert("custom", custom);
    registry
});

/// 已注册的提供商名称（排序后）
pub fn list_providers() -> Vec<&'static str> {
    let mut names: Vec<_> = PROVIDER_REGISTRY.keys().copied().collect();
    names.sort_unstable();
    names
}

/// 根据配置创建提供商，并包上重试层
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>> {
    let name = config.provider.trim().to_ascii_lowercase();
    let constructor = PROVIDER_REGISTRY.get(name.as_str()).ok_or_else(|| {
        StaarError::configuration(format!(
            "Unknown LLM provider '{}'. Available: {}",
            config.provider,
            list_providers().join(", ")
        ))
    })?;

    let inner = constructor(config)?;
    info!(
        "LLM provider initialized: {} (model: {}, retries: {})",
        inner.name(),
        inner.model(),
        config.max_retries
    );

    Ok(Arc::new(RetryingProvider::new(
        inner,
        config.max_retries,
        Duration::from_millis(config.retry_base_delay_ms),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(provider: &str) -> LlmConfig {
        LlmConfig {
            provider: provider.to_string(),
            model: "test-model".to_string(),
            api_key: "sk-test".to_string(),
            base_url: String::new(),
            max_tokens: 100,
            temperature: 0.5,
            timeout_secs: 5,
            max_retries: 1,
            retry_base_delay_ms: 10,
            max_batch_size: 5,
            max_concurrency: 2,
            fallback_enabled: true,
        }
    }

    #[test]
    fn test_lists_builtin_providers() {
        assert_eq!(
            list_providers(),
            vec!["anthropic", "custom", "huggingface", "ollama", "openai"]
        );
    }

    #[test]
    fn test_creates_known_providers() {
        for name in ["openai", "Anthropic", "huggingface", "ollama"] {
            let provider = create_provider(&config(name)).unwrap();
            assert_eq!(provider.name(), name.to_ascii_lowercase());
            assert_eq!(provider.model(), "test-model");
        }
    }

    #[test]
    fn test_rejects_unknown_provider_and_missing_settings() {
        assert!(create_provider(&config("gemini")).is_err());

        // custom 需要 base_url
        assert!(create_provider(&config("custom")).is_err());
        let mut custom = config("custom");
        custom.base_url = "http://localhost:9000/generate".into();
        assert!(create_provider(&custom).is_ok());

        let mut keyless = config("openai");
        keyless.api_key.clear();
        assert!(create_provider(&keyless).is_err());

        let mut keyless_ollama = config("ollama");
        keyless_ollama.api_key.clear();
        assert!(create_provider(&keyless_ollama).is_ok());
    }
}
