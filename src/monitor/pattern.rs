//! Error and warning line classification.

use regex::Regex;

use crate::config::Settings;
use crate::sound::SoundSlot;

/// Classification of one output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    None,
    Error,
    Warning,
}

impl LineClass {
    /// Slot of the cue this line triggers, if any.
    #[must_use]
    pub fn cue_slot(self) -> Option<SoundSlot> {
        match self {
            Self::None => None,
            Self::Error => Some(SoundSlot::Error),
            Self::Warning => Some(SoundSlot::Warning),
        }
    }
}

/// Error type for pattern compilation.
#[derive(thiserror::Error, Debug)]
pub enum PatternError {
    #[error("Invalid error pattern {pattern:?}: {source}")]
    InvalidErrorPattern {
        pattern: String,
        source: regex::Error,
    },
    #[error("Invalid warning pattern {pattern:?}: {source}")]
    InvalidWarningPattern {
        pattern: String,
        source: regex::Error,
    },
}

/// Compiled error and warning patterns.
///
/// An empty pattern disables its category. When both match a line, the
/// line is an error.
#[derive(Debug, Clone, Default)]
pub struct PatternMatcher {
    error: Option<Regex>,
    warning: Option<Regex>,
}

impl PatternMatcher {
    /// Compile both patterns.
    ///
    /// # Errors
    ///
    /// Returns `PatternError` naming the first pattern that does not compile.
    pub fn new(error: &str, warning: &str) -> Result<Self, PatternError> {
        let error = compile(error).map_err(|source| PatternError::InvalidErrorPattern {
            pattern: error.to_string(),
            source,
        })?;
        let warning = compile(warning).map_err(|source| PatternError::InvalidWarningPattern {
            pattern: warning.to_string(),
            source,
        })?;
        Ok(Self { error, warning })
    }

    /// Compile the patterns named by the settings.
    ///
    /// # Errors
    ///
    /// Returns `PatternError` if either pattern is invalid.
    pub fn from_settings(settings: &Settings) -> Result<Self, PatternError> {
        Self::new(&settings.error_format, &settings.warning_format)
    }

    /// Classify one line. Errors win over warnings.
    #[must_use]
    pub fn classify(&self, line: &str) -> LineClass {
        if self.error.as_ref().is_some_and(|re| re.is_match(line)) {
            LineClass::Error
        } else if self.warning.as_ref().is_some_and(|re| re.is_match(line)) {
            LineClass::Warning
        } else {
            LineClass::None
        }
    }

    /// Whether error matching is enabled.
    #[must_use]
    pub fn has_error_pattern(&self) -> bool {
        self.error.is_some()
    }

    /// Whether warning matching is enabled.
    #[must_use]
    pub fn has_warning_pattern(&self) -> bool {
        self.warning.is_some()
    }
}

fn compile(pattern: &str) -> Result<Option<Regex>, regex::Error> {
    if pattern.is_empty() {
        Ok(None)
    } else {
        Regex::new(pattern).map(Some)
    }
}
