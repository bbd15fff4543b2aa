use std::path::PathBuf;

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
    /// Root of the store directory REST API, without a trailing slash.
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub log_level: String,
    /// JSON file backing the liked-stores key-value store.
    pub liked_stores_path: PathBuf,
}
