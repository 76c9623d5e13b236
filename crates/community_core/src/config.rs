use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the hosted identity provider.
    pub identity_base_url: String,
    /// Public (anon) API key sent with every identity request.
    pub identity_anon_key: String,
    /// Base URL of the completion service.
    pub completion_base_url: String,
    pub completion_api_key: Option<String>,
    pub model: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Seconds between confirmation-status polls while waiting.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// How many stored turns are sent as chat context.
    #[serde(default = "default_history_window")]
    pub history_window: usize,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    #[serde(default = "default_greeting")]
    pub greeting: String,
}

const CONFIG_FILE_PATH: &str = "community.toml";

fn default_temperature() -> f32 {
    0.6
}

fn default_poll_interval_secs() -> u64 {
    2
}

fn default_history_window() -> usize {
    10
}

fn default_system_prompt() -> String {
    "You are the assistant for a developer portfolio site. Answer questions \
     about the site owner's background, projects and skills. Keep responses \
     friendly, professional and concise."
        .to_string()
}

fn default_greeting() -> String {
    "Hi there! Thanks for checking out the site. Feel free to ask about the \
     projects or the tools behind them. How can I help you today?"
        .to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            identity_base_url: String::new(),
            identity_anon_key: String::new(),
            completion_base_url: String::new(),
            completion_api_key: None,
            model: None,
            temperature: default_temperature(),
            poll_interval_secs: default_poll_interval_secs(),
            history_window: default_history_window(),
            system_prompt: default_system_prompt(),
            greeting: default_greeting(),
        }
    }
}

impl Config {
    /// Load configuration: file first, then environment overrides.
    pub fn new() -> Self {
        let mut config = Config::default();

        if std::path::Path::new(CONFIG_FILE_PATH).exists() {
            if let Ok(content) = std::fs::read_to_string(CONFIG_FILE_PATH) {
                if let Ok(file_config) = toml::from_str::<Config>(&content) {
                    config = file_config;
                }
            }
        }

        if let Ok(base) = std::env::var("IDENTITY_BASE_URL") {
            config.identity_base_url = base;
        }
        if let Ok(key) = std::env::var("IDENTITY_ANON_KEY") {
            config.identity_anon_key = key;
        }
        if let Ok(base) = std::env::var("COMPLETION_BASE_URL") {
            config.completion_base_url = base;
        }
        if let Ok(key) = std::env::var("COMPLETION_API_KEY") {
            config.completion_api_key = Some(key);
        }
        if let Ok(model) = std::env::var("COMPLETION_MODEL") {
            config.model = Some(model);
        }
        if let Ok(secs) = std::env::var("VERIFICATION_POLL_SECS") {
            if let Ok(secs) = secs.trim().parse() {
                config.poll_interval_secs = secs;
            }
        }
        config
    }
}
