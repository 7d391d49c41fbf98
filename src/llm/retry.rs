use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::errors::Result;
use crate::llm::{CompletionRequest, CompletionResponse, LlmProvider};

/// 退避延迟上限（基础延迟的倍数）
const MAX_BACKOFF_MULTIPLIER: u32 = 8;

/// 对瞬时错误（网络、超时、408、429、5xx）做指数退避重试
pub struct RetryingProvider {
    inner: Arc<dyn LlmProvider>,
    max_retries: u32,
    base_delay: Duration,
}

impl RetryingProvider {
    pub fn new(inner: Arc<dyn LlmProvider>, max_retries: u32, base_delay: Duration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
        }
    }

    /// 第 attempt 次重试前的等待时间（attempt 从 0 开始）
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let multiplier = 2u32
            .saturating_pow(attempt)
            .min(MAX_BACKOFF_MULTIPLIER);
        self.base_delay * multiplier
    }
}

#[async_trait]
impl LlmProvider for RetryingProvider {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn model(&self) -> &str {
        self.inner.model()
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        let mut attempt = 0;
        loop {
            match self.inner.complete(request).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_transient_llm() && attempt < self.max_retries => {
                    let delay = self.backoff_delay(attempt);
                    warn!(
                        "LLM provider '{}' failed (attempt {}/{}): {}; retrying in {:?}",
                        self.inner.name(),
                        attempt + 1,
                        self.max_retries + 1,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::StaarError;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// 按预设顺序返回结果的桩提供商
    struct ScriptedProvider {
        script: Mutex<Vec<Result<CompletionResponse>>>,
        calls: AtomicU32,
    }

    impl ScriptedProvider {
        fn new(mut script: Vec<Result<CompletionResponse>>) -> Self {
            script.reverse();
            Self {
                script: Mutex::new(script),
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }
        fn model(&self) -> &str {
            "test"
        }
        async fn complete(&self, _request: &CompletionRequest) -> Result<CompletionResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.script
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(StaarError::llm_request("script exhausted")))
        }
    }

    fn ok() -> Result<CompletionResponse> {
        Ok(CompletionResponse {
            text: "done".into(),
            provider: "scripted".into(),
            model: "test".into(),
        })
    }

    fn request() -> CompletionRequest {
        CompletionRequest::single_turn("s", "u", 10, 0.0)
    }

    #[tokio::test]
    async fn test_retries_transient_errors_until_success() {
        let inner = Arc::new(ScriptedProvider::new(vec![
            Err(StaarError::llm_status(503, "busy")),
            Err(StaarError::llm_request("connection reset")),
            ok(),
        ]));
        let provider = RetryingProvider::new(inner.clone(), 3, Duration::from_millis(1));
        let response = provider.complete(&request()).await.unwrap();
        assert_eq!(response.text, "done");
        assert_eq!(inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_does_not_retry_permanent_errors() {
        let inner = Arc::new(ScriptedProvider::new(vec![
            Err(StaarError::llm_status(401, "bad key")),
            ok(),
        ]));
        let provider = RetryingProvider::new(inner.clone(), 3, Duration::from_millis(1));
        assert!(provider.complete(&request()).await.is_err());
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let inner = Arc::new(ScriptedProvider::new(vec![
            Err(StaarError::llm_status(429, "slow")),
            Err(StaarError::llm_status(429, "slow")),
            Err(StaarError::llm_status(429, "slow")),
            ok(),
        ]));
        let provider = RetryingProvider::new(inner.clone(), 2, Duration::from_millis(1));
        let err = provider.complete(&request()).await.unwrap_err();
        assert!(err.message().starts_with("HTTP 429"));
        assert_eq!(inner.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_backoff_is_capped() {
        let inner = Arc::new(ScriptedProvider::new(vec![]));
        let provider = RetryingProvider::new(inner, 10, Duration::from_millis(100));
        assert_eq!(provider.backoff_delay(0), Duration::from_millis(100));
        assert_eq!(provider.backoff_delay(1), Duration::from_millis(200));
        assert_eq!(provider.backoff_delay(3), Duration::from_millis(800));
        assert_eq!(provider.backoff_delay(9), Duration::from_millis(800));
    }
}
