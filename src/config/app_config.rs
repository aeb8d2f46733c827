use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
pub struct AppConfig {
    /// Tried in order
    pub(super) endpoints: Vec<String>,
    #[serde(default = "default_ack_timeout_ms")]
    pub(super) ack_timeout_ms: u64,
    #[serde(default = "default_request_timeout_ms")]
    pub(super) request_timeout_ms: u64,
    #[serde(default)]
    pub(super) use_popup: bool,
    pub(super) popup_command: Option<String>,
    #[serde(default = "default_log_level")]
    pub(super) log_level: String,
}

impl AppConfig {
    pub fn new_default() -> AppConfig {
        AppConfig {
            endpoints: vec![
                "http://localhost:50667/static/bookmarklet.html".to_string(),
                "http://127.0.0.1:50667/static/bookmarklet.html".to_string(),
                "http://localhost:50667/api/bookmarks".to_string(),
                "http://127.0.0.1:50667/api/bookmarks".to_string(),
            ],
            ack_timeout_ms: default_ack_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            use_popup: false,
            popup_command: None,
            log_level: default_log_level(),
        }
    }
}

fn default_ack_timeout_ms() -> u64 {
    5000
}

fn default_request_timeout_ms() -> u64 {
    10000
}

fn default_log_level() -> String {
    "info".to_string()
}
