use config::{Config, ConfigError, Environment, File};
use std::sync::OnceLock;

use super::AppConfig;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

const SUPPORTED_PROVIDERS: &[&str] = &["openai", "anthropic", "huggingface", "ollama", "custom"];

/// 必须配置 API key 的提供商
const KEYED_PROVIDERS: &[&str] = &["openai", "anthropic", "huggingface"];

impl AppConfig {
    /// 加载配置
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            // 首先加载默认配置文件
            .add_source(File::with_name("config").required(false))
            // 然后根据环境加载特定配置文件
            .add_source(
                File::with_name(&format!(
                    "config.{}",
                    std::env::var("APP_ENV").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // 最后加载环境变量覆盖
            .add_source(
                Environment::with_prefix("STAAR")
                    .separator("__")
                    .try_parsing(true),
            );

        // 支持从环境变量加载
        builder = builder
            .set_override_option("app.environment", std::env::var("APP_ENV").ok())?
            .set_override_option("app.log_level", std::env::var("RUST_LOG").ok())?
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("server.unix_socket_path", std::env::var("UNIX_SOCKET").ok())?
            .set_override_option("server.workers", std::env::var("CPU_COUNT").ok())?
            .set_override_option("jwt.secret", std::env::var("JWT_SECRET").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("cache.redis.url", std::env::var("REDIS_URL").ok())?
            .set_override_option("llm.provider", std::env::var("LLM_PROVIDER").ok())?
            .set_override_option("llm.model", std::env::var("LLM_MODEL").ok())?
            .set_override_option("llm.base_url", std::env::var("LLM_BASE_URL").ok())?
            .set_override_option(
                "llm.api_key",
                std::env::var("LLM_API_KEY")
                    .or_else(|_| std::env::var("OPENAI_API_KEY"))
                    .ok(),
            )?;

        let config = builder.build()?;
        let mut app_config: AppConfig = config.try_deserialize()?;

        // 处理工作线程数
        if app_config.server.workers == 0 {
            app_config.server.workers = num_cpus::get().min(app_config.server.max_workers);
        }

        app_config.validate()?;

        Ok(app_config)
    }

    /// 校验跨字段约束
    pub fn validate(&self) -> Result<(), ConfigError> {
        let provider = self.llm.provider.to_ascii_lowercase();
        if !SUPPORTED_PROVIDERS.contains(&provider.as_str()) {
            return Err(ConfigError::Message(format!(
                "Unsupported llm.provider '{}'. Supported: {}",
                self.llm.provider,
                SUPPORTED_PROVIDERS.join(", ")
            )));
        }
        if KEYED_PROVIDERS.contains(&provider.as_str()) && self.llm.api_key.trim().is_empty() {
            return Err(ConfigError::Message(format!(
                "llm.api_key is required for llm.provider = \"{provider}\"; \
                 set LLM_API_KEY (or STAAR__LLM__API_KEY), or switch to the ollama provider"
            )));
        }
        if provider == "custom" && self.llm.base_url.trim().is_empty() {
            return Err(ConfigError::Message(
                "llm.base_url is required when llm.provider = \"custom\"".to_string(),
            ));
        }
        if self.llm.max_batch_size == 0 || self.llm.max_concurrency == 0 {
            return Err(ConfigError::Message(
                "llm.max_batch_size and llm.max_concurrency must be at least 1".to_string(),
            ));
        }
        if self.exam.max_questions == 0 || self.exam.default_questions > self.exam.max_questions
        {
            return Err(ConfigError::Message(
                "exam.default_questions must be between 1 and exam.max_questions".to_string(),
            ));
        }
        if self.essay.max_words == 0 {
            return Err(ConfigError::Message(
                "essay.max_words must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// 获取全局配置实例
    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    /// 初始化配置 (在应用启动时调用)
    pub fn init() -> Result<(), ConfigError> {
        let config = Self::load()?;
        APP_CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("Configuration already initialized".to_string()))?;
        Ok(())
    }

    /// 检查是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }

    /// 检查是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    /// 获取服务器绑定地址
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 获取 Unix 套接字路径 (如果配置了)
    #[cfg(unix)]
    pub fn unix_socket_path(&self) -> Option<&str> {
        if self.server.unix_socket_path.is_empty() {
            None
        } else {
            Some(&self.server.unix_socket_path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::get().validate().is_ok());
    }

    #[test]
    fn test_keyed_provider_without_key_is_rejected() {
        let mut config = AppConfig::get().clone();
        config.llm.provider = "openai".to_string();
        config.llm.api_key = "  ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("llm.api_key is required"));

        config.llm.api_key = "sk-test".to_string();
        assert!(config.validate().is_ok());

        config.llm.provider = "ollama".to_string();
        config.llm.api_key = String::new();
        assert!(config.validate().is_ok());
    }
}
