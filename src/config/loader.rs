//! Configuration directory discovery and settings resolution.

use std::path::{Path, PathBuf};

use super::{ConfigFile, Preset, Settings};

/// Name of the application directory under the user config directory.
pub const APP_DIR_NAME: &str = "errwarn";

/// Directory names used by earlier releases, checked when
/// [`APP_DIR_NAME`] does not exist yet.
pub const LEGACY_APP_DIR_NAMES: [&str; 2] = ["ErrorWarner", "errorwarner"];

/// Name of the config file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Directory holding named soundsets inside the config directory.
pub const SOUNDSETS_DIR_NAME: &str = "soundsets";

/// Settings given on the command line, plus the preset selection.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    /// Preset requested with `-p`. Unknown presets are an error.
    pub preset: Option<String>,
    /// Preset derived from the command name. Unknown presets are ignored.
    pub derived_preset: Option<String>,
    /// Flag values, applied last.
    pub flags: Preset,
}

/// The errwarn configuration directory.
#[derive(Debug, Clone)]
pub struct ConfigDir {
    path: PathBuf,
}

impl ConfigDir {
    /// Locate the user config directory, creating it if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform has no config directory or it cannot
    /// be created.
    pub fn locate() -> Result<Self, ConfigError> {
        let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Self::locate_in(&base)
    }

    /// Locate the errwarn directory under `base`.
    ///
    /// An existing directory from an earlier release is used as is when
    /// there is no `errwarn` directory yet.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::CreateDir` if the directory cannot be created.
    pub fn locate_in(base: &Path) -> Result<Self, ConfigError> {
        let current = base.join(APP_DIR_NAME);
        if !current.is_dir() {
            let legacy = LEGACY_APP_DIR_NAMES
                .iter()
                .map(|name| base.join(name))
                .find(|path| path.is_dir());
            if let Some(path) = legacy {
                tracing::info!(path = %path.display(), "Using legacy config directory");
                return Ok(Self { path });
            }
        }
        Self::create(current)
    }

    /// Use the given directory, creating it if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::CreateDir` if the directory cannot be created.
    pub fn create(path: PathBuf) -> Result<Self, ConfigError> {
        if !path.is_dir() {
            tracing::debug!(path = %path.display(), "Creating config directory");
            std::fs::create_dir_all(&path).map_err(|e| ConfigError::CreateDir {
                path: path.clone(),
                source: e,
            })?;
        }
        Ok(Self { path })
    }

    /// Get the directory path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of `config.toml`.
    #[must_use]
    pub fn config_file(&self) -> PathBuf {
        self.path.join(CONFIG_FILE_NAME)
    }

    /// Directory of a named soundset.
    #[must_use]
    pub fn soundset_dir(&self, name: &str) -> PathBuf {
        self.path.join(SOUNDSETS_DIR_NAME).join(name)
    }

    /// Load `config.toml`, or `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Option<ConfigFile>, ConfigError> {
        let path = self.config_file();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file found");
            return Ok(None);
        }

        tracing::debug!(path = %path.display(), "Loading config file");
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Read {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content)
            .map(Some)
            .map_err(|e| ConfigError::Parse { path, source: e })
    }

    /// Resolve the final settings: default preset, then the named preset,
    /// then command-line flags.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly requested preset or the selected
    /// soundset does not exist, or the config file is invalid.
    pub fn resolve(&self, overrides: &SettingsOverrides) -> Result<Settings, ConfigError> {
        let mut settings = Settings::default();

        match self.load()? {
            None => {
                if overrides.preset.is_some() {
                    return Err(ConfigError::ConfigFileNotFound(self.config_file()));
                }
            }
            Some(config) => {
                if let Some(preset) = config.default_preset() {
                    settings.apply(preset);
                }

                if let Some(ref name) = overrides.preset {
                    let preset = config
                        .preset(name)
                        .ok_or_else(|| ConfigError::PresetNotFound(name.clone()))?;
                    tracing::debug!(preset = %name, "Applying preset");
                    settings.apply(preset);
                } else if let Some(ref name) = overrides.derived_preset {
                    if let Some(preset) = config.preset(name) {
                        tracing::debug!(preset = %name, "Applying preset for command");
                        settings.apply(preset);
                    }
                }
            }
        }

        settings.apply(&overrides.flags);

        if !settings.soundset.is_empty() && !self.soundset_dir(&settings.soundset).is_dir() {
            return Err(ConfigError::SoundsetNotFound(settings.soundset));
        }

        Ok(settings)
    }
}

/// Errors that can occur while resolving settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine the user config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Specified preset does not exist: {0}")]
    PresetNotFound(String),

    #[error("Specified soundset not found: {0}")]
    SoundsetNotFound(String),
}
