use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPathError {
    MissingHomeDirectory,
}

const APP_DIR: &str = "invocation-surface";
const APP_CONFIG_FILE: &str = "config.json";

const DEFAULT_HIDE_DELAY_MS: u64 = 250;
const DEFAULT_SAVE_GRACE_MS: u64 = 150;

/// Title and size of a sub-editor window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSpec {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl WindowSpec {
    fn new(title: &str, width: u32, height: u32) -> Self {
        Self {
            title: title.to_string(),
            width,
            height,
        }
    }

    fn adjustment() -> Self {
        Self::new("Adjust Image", 400, 500)
    }

    fn filter() -> Self {
        Self::new("Filter Image", 400, 400)
    }
}

/// A window entry as written in `config.json`; absent fields keep the
/// defaults of the window it overrides.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WindowOverride {
    title: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

impl WindowOverride {
    fn apply(self, base: WindowSpec) -> WindowSpec {
        WindowSpec {
            title: self.title.unwrap_or(base.title),
            width: self.width.unwrap_or(base.width),
            height: self.height.unwrap_or(base.height),
        }
    }
}

fn adjustment_window<'de, D: Deserializer<'de>>(deserializer: D) -> Result<WindowSpec, D::Error> {
    WindowOverride::deserialize(deserializer).map(|o| o.apply(WindowSpec::adjustment()))
}

fn filter_window<'de, D: Deserializer<'de>>(deserializer: D) -> Result<WindowSpec, D::Error> {
    WindowOverride::deserialize(deserializer).map(|o| o.apply(WindowSpec::filter()))
}

/// Warnings shown when the other kind of edit is already open.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConflictMessages {
    pub filter_while_adjusting: String,
    pub adjust_while_filtering: String,
}

impl Default for ConflictMessages {
    fn default() -> Self {
        Self {
            filter_while_adjusting: "Finish adjusting your image before filtering.".to_string(),
            adjust_while_filtering: "Finish filtering your image before adjusting.".to_string(),
        }
    }
}

/// Surface settings from `config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub hide_delay_ms: u64,
    pub save_grace_ms: u64,
    #[serde(deserialize_with = "adjustment_window")]
    pub adjustment_window: WindowSpec,
    #[serde(deserialize_with = "filter_window")]
    pub filter_window: WindowSpec,
    pub conflict_messages: ConflictMessages,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            hide_delay_ms: DEFAULT_HIDE_DELAY_MS,
            save_grace_ms: DEFAULT_SAVE_GRACE_MS,
            adjustment_window: WindowSpec::adjustment(),
            filter_window: WindowSpec::filter(),
            conflict_messages: ConflictMessages::default(),
        }
    }
}

impl SurfaceConfig {
    pub fn hide_delay(&self) -> Duration {
        Duration::from_millis(self.hide_delay_ms)
    }

    pub fn save_grace(&self) -> Duration {
        Duration::from_millis(self.save_grace_ms)
    }
}

pub fn load_surface_config() -> SurfaceConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_surface_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_surface_config_with(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> SurfaceConfig {
    let path = match app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) {
        Ok(p) => p,
        Err(_) => return SurfaceConfig::default(),
    };
    if !path.exists() {
        return SurfaceConfig::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(?err, ?path, "failed to parse config.json; using defaults");
            SurfaceConfig::default()
        }),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read config.json; using defaults");
            SurfaceConfig::default()
        }
    }
}

pub(crate) fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn config_root(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigPathError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}
