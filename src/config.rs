use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Location of the titles CSV, either an http(s) URL or a local path
    #[serde(default = "default_dataset_url")]
    pub dataset_url: String,

    /// Append-only file receiving one line per user action
    #[serde(default = "default_action_log_path")]
    pub action_log_path: String,

    /// Maximum number of example titles returned per platform
    #[serde(default = "default_example_limit")]
    pub example_limit: usize,

    /// Seconds a session may stay unused before it is dropped
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_dataset_url() -> String {
    "https://raw.githubusercontent.com/lenalaq/platform/main/dataset_pour_analyse_clean.csv"
        .to_string()
}

fn default_action_log_path() -> String {
    "user_logs.csv".to_string()
}

fn default_example_limit() -> usize {
    5
}

fn default_session_idle_secs() -> u64 {
    30 * 60
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit set of variables
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars).map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Socket address string the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
