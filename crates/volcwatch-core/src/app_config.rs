#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub hans_base_url: String,
    pub ambee_base_url: String,
    pub ambee_api_key: Option<String>,
    pub ambee_country: String,
    pub user_agent: String,
    /// `0` disables the per-request timeout.
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub detail_concurrency: usize,
    pub refresh_interval_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("hans_base_url", &self.hans_base_url)
            .field("ambee_base_url", &self.ambee_base_url)
            .field(
                "ambee_api_key",
                &self.ambee_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("ambee_country", &self.ambee_country)
            .field("user_agent", &self.user_agent)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("detail_concurrency", &self.detail_concurrency)
            .field("refresh_interval_secs", &self.refresh_interval_secs)
            .finish()
    }
}
