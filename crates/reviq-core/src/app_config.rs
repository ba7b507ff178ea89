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
    pub provider_api_key: String,
    pub provider_base_url: String,
    pub model: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub grounding_enabled: bool,
    /// When set, competitors whose parsed distance exceeds this are dropped.
    pub compset_max_distance_km: Option<f64>,
    pub default_hotel: String,
    pub default_city: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("provider_api_key", &"[redacted]")
            .field("provider_base_url", &self.provider_base_url)
            .field("model", &self.model)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("grounding_enabled", &self.grounding_enabled)
            .field("compset_max_distance_km", &self.compset_max_distance_km)
            .field("default_hotel", &self.default_hotel)
            .field("default_city", &self.default_city)
            .finish()
    }
}
