use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    /// When enabled the application initialises the logger at debug level.
    /// Defaults to `false` when the field is missing in the settings file.
    #[serde(default)]
    pub debug_logging: bool,
    /// Delay before auto-repeat starts after the first key-down, in ms.
    #[serde(default = "default_repeat_initial_delay_ms")]
    pub repeat_initial_delay_ms: u64,
    /// Cadence of auto-repeat ticks while a key stays held, in ms.
    #[serde(default = "default_repeat_interval_ms")]
    pub repeat_interval_ms: u64,
    /// Idle period after the last interaction before the panel hides, in ms.
    #[serde(default = "default_auto_hide_grace_ms")]
    pub auto_hide_grace_ms: u64,
    /// Duration of the primary panel's entrance transition, in ms.
    #[serde(default = "default_show_duration_ms")]
    pub show_duration_ms: u64,
    /// Duration of the primary panel's exit transition, in ms.
    #[serde(default = "default_hide_duration_ms")]
    pub hide_duration_ms: u64,
    /// Duration of the secondary panel's exit transition, in ms.
    #[serde(default = "default_secondary_duration_ms")]
    pub secondary_duration_ms: u64,
    /// Key bound to "volume up" in the demo listener.
    #[serde(default = "default_raise_key")]
    pub raise_key: String,
    /// Key bound to "volume down" in the demo listener.
    #[serde(default = "default_lower_key")]
    pub lower_key: String,
}

fn default_repeat_initial_delay_ms() -> u64 {
    350
}

fn default_repeat_interval_ms() -> u64 {
    100
}

fn default_auto_hide_grace_ms() -> u64 {
    2000
}

fn default_show_duration_ms() -> u64 {
    400
}

fn default_hide_duration_ms() -> u64 {
    400
}

fn default_secondary_duration_ms() -> u64 {
    300
}

fn default_raise_key() -> String {
    "Up".into()
}

fn default_lower_key() -> String {
    "Down".into()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug_logging: false,
            repeat_initial_delay_ms: default_repeat_initial_delay_ms(),
            repeat_interval_ms: default_repeat_interval_ms(),
            auto_hide_grace_ms: default_auto_hide_grace_ms(),
            show_duration_ms: default_show_duration_ms(),
            hide_duration_ms: default_hide_duration_ms(),
            secondary_duration_ms: default_secondary_duration_ms(),
            raise_key: default_raise_key(),
            lower_key: default_lower_key(),
        }
    }
}

impl Settings {
    /// Load settings from `path`. A missing file yields the defaults so a
    /// fresh install works without any configuration.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let settings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn repeat_initial_delay(&self) -> Duration {
        Duration::from_millis(self.repeat_initial_delay_ms)
    }

    pub fn repeat_interval(&self) -> Duration {
        Duration::from_millis(self.repeat_interval_ms)
    }

    pub fn auto_hide_grace(&self) -> Duration {
        Duration::from_millis(self.auto_hide_grace_ms)
    }

    pub fn show_duration(&self) -> Duration {
        Duration::from_millis(self.show_duration_ms)
    }

    pub fn hide_duration(&self) -> Duration {
        Duration::from_millis(self.hide_duration_ms)
    }

    pub fn secondary_duration(&self) -> Duration {
        Duration::from_millis(self.secondary_duration_ms)
    }
}
