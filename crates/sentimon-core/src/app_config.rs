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

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Base URL of the sentiment REST API, e.g. `http://localhost:8000`.
    pub api_url: String,
    /// Push channel URL, e.g. `ws://localhost:8000/ws/sentiment`.
    pub ws_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Number of recent posts requested on mount (1–100).
    pub posts_limit: u32,
    /// Look-back window for the distribution snapshot, in hours (1–168).
    pub distribution_hours: u32,
    /// Additional attempts on transient REST failures. `0` disables retry.
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
}
