//! Configuration types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Fully resolved settings handed to the supervisor.
///
/// An empty pattern disables its category. An empty soundset means the
/// sound files directly under the configuration directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Regular expression matching error lines.
    pub error_format: String,
    /// Regular expression matching warning lines.
    pub warning_format: String,
    /// Name of the soundset directory under `soundsets/`.
    pub soundset: String,
    /// Monitor the command's stdout instead of its stderr.
    pub use_stdout: bool,
}

impl Settings {
    /// Overlay every field the preset sets.
    pub fn apply(&mut self, preset: &Preset) {
        if let Some(ref format) = preset.error_format {
            self.error_format.clone_from(format);
        }
        if let Some(ref format) = preset.warning_format {
            self.warning_format.clone_from(format);
        }
        if let Some(ref soundset) = preset.soundset {
            self.soundset.clone_from(soundset);
        }
        if let Some(stdout) = preset.stdout {
            self.use_stdout = stdout;
        }
    }
}

/// A partial set of settings, as written in a config preset or given on
/// the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preset {
    /// Error pattern; an empty string disables error matching.
    #[serde(alias = "ErrorFormat", alias = "errorformat")]
    pub error_format: Option<String>,
    /// Warning pattern; an empty string disables warning matching.
    #[serde(alias = "WarningFormat", alias = "warningformat")]
    pub warning_format: Option<String>,
    /// Soundset name.
    #[serde(alias = "Soundset")]
    pub soundset: Option<String>,
    /// Monitor stdout instead of stderr.
    #[serde(alias = "Stdout")]
    pub stdout: Option<bool>,
}

/// Contents of `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    /// Presets by name. The preset named `""` is applied to every run.
    #[serde(rename = "preset")]
    pub presets: HashMap<String, Preset>,
}

impl ConfigFile {
    /// The preset applied before any named one, if configured.
    #[must_use]
    pub fn default_preset(&self) -> Option<&Preset> {
        self.presets.get("")
    }

    /// Get a preset by name.
    #[must_use]
    pub fn preset(&self, name: &str) -> Option<&Preset> {
        self.presets.get(name)
    }
}
