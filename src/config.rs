//! Application configuration.
//!
//! Settings live in a confy-managed TOML file. A missing or unreadable file
//! falls back to the defaults, which point at a recommendation API running on
//! the local machine.

use serde::{Deserialize, Serialize};

use crate::models::Tab;

const CONFIG_NAME: &str = "tunefinder";

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_VIDEO_SEARCH_URL: &str = "https://www.youtube.com/results?search_query=";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub version: u32,
    /// Base address of the recommendation API, without a trailing path.
    pub api_base_url: String,
    /// Prefix that the URL-encoded "name artists" query is appended to.
    pub video_search_url: String,
    /// Tab that is active when the app starts.
    pub default_tab: Tab,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            video_search_url: DEFAULT_VIDEO_SEARCH_URL.to_string(),
            default_tab: Tab::Song,
        }
    }
}

pub fn load_config() -> AppConfig {
    match confy::load(CONFIG_NAME, None) {
        Ok(cfg) => cfg,
        Err(err) => {
            tracing::warn!("failed to load config, using defaults: {err}");
            AppConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_local_api() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.api_base_url, "http://127.0.0.1:5000");
        assert_eq!(cfg.default_tab, Tab::Song);
        assert!(cfg.video_search_url.ends_with("search_query="));
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let cfg: AppConfig = toml::from_str("default_tab = \"mood\"\n")
            .expect("partial config should deserialize");
        assert_eq!(cfg.default_tab, Tab::Mood);
        assert_eq!(cfg.api_base_url, DEFAULT_API_BASE_URL);
    }
}
