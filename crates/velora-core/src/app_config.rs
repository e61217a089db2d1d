use std::net::SocketAddr;

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
    pub content_api_url: String,
    pub content_api_token: Option<String>,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Prefix the rendering layer uses to resolve relative image URLs. The
    /// normalizer itself passes image URLs through unchanged.
    pub image_base_url: String,
    pub content_timeout_secs: u64,
    pub content_user_agent: String,
    pub content_max_retries: u32,
    pub content_backoff_base_secs: u64,
    pub content_refresh_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("content_api_url", &self.content_api_url)
            .field(
                "content_api_token",
                &self.content_api_token.as_ref().map(|_| "[redacted]"),
            )
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("image_base_url", &self.image_base_url)
            .field("content_timeout_secs", &self.content_timeout_secs)
            .field("content_user_agent", &self.content_user_agent)
            .field("content_max_retries", &self.content_max_retries)
            .field(
                "content_backoff_base_secs",
                &self.content_backoff_base_secs,
            )
            .field("content_refresh_secs", &self.content_refresh_secs)
            .finish()
    }
}
