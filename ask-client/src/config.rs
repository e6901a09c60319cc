use serde::Deserialize;
use std::time::Duration;

const DEFAULT_ENDPOINT: &str = "http://localhost:8080/ask";
const DEFAULT_TIMEOUT_SECS: u64 = 12;
const DEFAULT_COPY_FEEDBACK_MS: u64 = 2000;

#[derive(Debug, Deserialize, Clone)]
pub struct ClientSettings {
    /// Full URL of the `/ask` endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Wall-clock budget for one ask, request and body included.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// How long the copy control shows its confirmation.
    #[serde(default = "default_copy_feedback_ms")]
    pub copy_feedback_ms: u64,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_copy_feedback_ms() -> u64 {
    DEFAULT_COPY_FEEDBACK_MS
}

impl ClientSettings {
    /// Read `ASK__ENDPOINT`, `ASK__TIMEOUT_SECS` and `ASK__COPY_FEEDBACK_MS`
    /// (after `.env`), falling back to defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        config::Config::builder()
            .add_source(
                config::Environment::with_prefix("ASK")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn copy_feedback(&self) -> Duration {
        Duration::from_millis(self.copy_feedback_ms)
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            copy_feedback_ms: default_copy_feedback_ms(),
        }
    }
}
