use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides the configured backend origin
pub const BACKEND_URL_ENV: &str = "BUKIDMATE_BACKEND_URL";

pub const DEFAULT_GREETING: &str = "🌱 Hi, ako si BukidMate! Ako ang inyong kaagapay sa pagtatanim.\n\
Para makuha ang pinakaswak na presyo ng ani mo, pakitype lang:\n\
\n\
\"Region, Crop\"\n\
📍 Halimbawa: \"Central Luzon, Tomato\"\n\
\n\
Tara, simulan na natin! 💪🌾";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Origin of the forecasting backend
    pub backend_url: String,

    /// Delay before a follow-up bot turn is shown
    pub follow_up_delay_ms: u64,

    /// Request timeout; the HTTP client default applies when unset
    pub request_timeout_secs: Option<u64>,

    /// First bot turn shown when the chat opens; empty disables it
    pub greeting: String,

    /// UI preferences
    pub ui: UiConfig,
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub show_sidebar: bool,
    pub max_input_chars: usize,
    pub tick_rate_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            backend_url: "http://localhost:8000".to_string(),
            follow_up_delay_ms: 500,
            request_timeout_secs: None,
            greeting: DEFAULT_GREETING.to_string(),
            ui: UiConfig::default(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            show_sidebar: false,
            max_input_chars: 2000,
            tick_rate_ms: 100,
        }
    }
}

impl Config {
    /// Load `~/.bukidmate/config.toml` if present, then apply the environment
    pub fn load() -> Result<Self> {
        let path = Self::home_dir()?.join("config.toml");
        let mut config = if path.exists() {
            Self::read_file(&path)?
        } else {
            Config::default()
        };
        config.apply_env();
        Ok(config)
    }

    /// Load from an explicit path; the file must exist
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = Self::read_file(path)?;
        config.apply_env();
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            if !url.trim().is_empty() {
                self.backend_url = url;
            }
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// BukidMate home directory (`~/.bukidmate`), created on demand
    pub fn home_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        let dir = home.join(".bukidmate");
        fs::create_dir_all(&dir)
            .context("Failed to create .bukidmate directory")?;
        Ok(dir)
    }

    pub fn follow_up_delay(&self) -> Duration {
        Duration::from_millis(self.follow_up_delay_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.ui.tick_rate_ms.max(10))
    }
}
