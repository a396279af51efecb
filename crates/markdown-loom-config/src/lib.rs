use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub notes_path: PathBuf,
    #[serde(default)]
    pub editor: EditorSettings,
}

/// The `[editor]` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Pages longer than this have no folds.
    pub fold_line_limit: usize,
    pub section_title_debounce_ms: u64,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            fold_line_limit: 10_000,
            section_title_debounce_ms: 200,
        }
    }
}

impl EditorSettings {
    pub fn section_title_debounce(&self) -> Duration {
        Duration::from_millis(self.section_title_debounce_ms)
    }
}

impl Config {
    pub fn new(notes_path: PathBuf) -> Self {
        Self {
            notes_path,
            editor: EditorSettings::default(),
        }
    }

    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let Some(mut config) = read_toml::<Config>(config_path.as_ref())? else {
            return Ok(None);
        };

        // Expand shell variables and tilde in the loaded config path
        config.notes_path = Self::expand_path(&config.notes_path).unwrap_or(config.notes_path);

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        Self::load_from_path(Self::config_path())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        write_toml(config_path.as_ref(), self)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to_path(Self::config_path())
    }

    pub fn config_dir() -> PathBuf {
        PathBuf::from(shellexpand::tilde("~/.config/markdown-loom").as_ref())
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

/// `folds.toml` beside `config.toml`: which headings are folded on which
/// page. The stored type belongs to the caller.
#[derive(Debug, Clone)]
pub struct FoldStore {
    path: PathBuf,
}

impl Default for FoldStore {
    fn default() -> Self {
        Self::at(Config::config_dir().join("folds.toml"))
    }
}

impl FoldStore {
    pub fn at<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file loads as the empty state.
    pub fn load<T: DeserializeOwned + Default>(&self) -> Result<T, ConfigError> {
        Ok(read_toml(&self.path)?.unwrap_or_default())
    }

    pub fn save<T: Serialize>(&self, folds: &T) -> anyhow::Result<()> {
        write_toml(&self.path, folds)
    }
}

fn read_toml<T: DeserializeOwned>(config_path: &Path) -> Result<Option<T>, ConfigError> {
    if !config_path.exists() {
        return Ok(None);
    }

    let content =
        std::fs::read_to_string(config_path).map_err(|source| ConfigError::ConfigReadError {
            config_path: config_path.to_path_buf(),
            source,
        })?;

    toml::from_str(&content)
        .map(Some)
        .map_err(|source| ConfigError::ConfigParseError {
            config_path: config_path.to_path_buf(),
            source,
        })
}

fn write_toml<T: Serialize>(config_path: &Path, value: &T) -> anyhow::Result<()> {
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(value)?;
    std::fs::write(config_path, content)?;
    Ok(())
}
