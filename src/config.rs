//! Runtime configuration and resource-path resolution.
//!
//! Everything lives beside the program: the `Audios` tree, the bundled static
//! sound, the session file and an optional `lore_radio.json` overriding any of
//! the defaults below.

use crate::catalog::ListingOrder;
use crate::error::{RadioError, Result};
use crate::session::STATE_FILE;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Optional config file name, looked up in the base directory.
pub const CONFIG_FILE: &str = "lore_radio.json";

/// Environment variable overriding the base directory.
pub const HOME_ENV: &str = "LORE_RADIO_HOME";

pub const DEFAULT_STATIC_PAUSE_MIN_MS: u64 = 300;
pub const DEFAULT_STATIC_PAUSE_MAX_MS: u64 = 600;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default = "default_audio_dir")]
    pub audio_dir: PathBuf,
    #[serde(default = "default_static_sound")]
    pub static_sound: PathBuf,
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
    #[serde(default = "default_pause_min")]
    pub static_pause_min_ms: u64,
    #[serde(default = "default_pause_max")]
    pub static_pause_max_ms: u64,
    #[serde(default)]
    pub listing_order: ListingOrder,
    /// Clear the terminal before each menu render.
    #[serde(default = "default_clear_screen")]
    pub clear_screen: bool,
}

fn default_audio_dir() -> PathBuf {
    PathBuf::from("Audios")
}

fn default_static_sound() -> PathBuf {
    PathBuf::from("assets").join("static.wav")
}

fn default_state_file() -> PathBuf {
    PathBuf::from(STATE_FILE)
}

fn default_pause_min() -> u64 {
    DEFAULT_STATIC_PAUSE_MIN_MS
}

fn default_pause_max() -> u64 {
    DEFAULT_STATIC_PAUSE_MAX_MS
}

fn default_clear_screen() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Config {
            audio_dir: default_audio_dir(),
            static_sound: default_static_sound(),
            state_file: default_state_file(),
            static_pause_min_ms: default_pause_min(),
            static_pause_max_ms: default_pause_max(),
            listing_order: ListingOrder::default(),
            clear_screen: default_clear_screen(),
        }
    }
}

impl Config {
    /// Load `lore_radio.json` from `base`, falling back to defaults when the
    /// file is absent. Relative paths are resolved against `base`.
    pub fn load_from(base: &Path) -> Result<Self> {
        let path = base.join(CONFIG_FILE);
        let config = if path.exists() {
            let data = fs::read_to_string(&path)?;
            serde_json::from_str(&data)
                .map_err(|source| RadioError::CorruptConfig { path, source })?
        } else {
            Config::default()
        };
        Ok(config.resolved(base))
    }

    fn resolved(mut self, base: &Path) -> Self {
        self.audio_dir = resolve(base, &self.audio_dir);
        self.static_sound = resolve(base, &self.static_sound);
        self.state_file = resolve(base, &self.state_file);
        if self.static_pause_min_ms > self.static_pause_max_ms {
            std::mem::swap(&mut self.static_pause_min_ms, &mut self.static_pause_max_ms);
        }
        self
    }

    /// Bounds of the blocking pause after the static burst.
    pub fn static_pause(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.static_pause_min_ms),
            Duration::from_millis(self.static_pause_max_ms),
        )
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Directory holding the program's resources.
///
/// `LORE_RADIO_HOME` wins; otherwise the directory of the executable, then the
/// current directory.
pub fn base_dir() -> PathBuf {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(home);
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            return dir.to_path_buf();
        }
    }
    PathBuf::from(".")
}
