//! TOML configuration for the Harmonics command-line adapter.
//!
//! The file is optional; every section and field carries a default so an
//! empty file, or no file at all, yields the canonical session. Values are
//! validated eagerly so a bad preset fails at startup instead of producing
//! a confusing first frame.

use std::{fs, path::Path};

use harmonics_core::{Harmonic, TargetWave, TargetWaveKind, Term};
use harmonics_rendering::ControlPanelView;
use serde::Deserialize;
use thiserror::Error;

/// Parsed and validated configuration for one Harmonics session.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub(crate) struct Config {
    /// Window presentation settings.
    pub window: WindowConfig,
    /// Optional initial session preset.
    pub session: Option<SessionConfig>,
}

impl Config {
    /// Loads and validates a configuration file.
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Parses and validates configuration text.
    pub(crate) fn parse(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.window.validate()?;
        if let Some(session) = &self.session {
            session.validate()?;
        }
        Ok(())
    }
}

/// Window presentation settings.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub(crate) struct WindowConfig {
    /// Initial window width in pixels.
    pub width: i32,
    /// Initial window height in pixels.
    pub height: i32,
    /// Whether presentation is synchronised with the display refresh rate.
    pub vsync: bool,
}

impl WindowConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(ConfigError::InvalidWindowSize {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 960,
            height: 540,
            vsync: true,
        }
    }
}

/// Initial session preset naming the starting terms and target.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SessionConfig {
    /// Starting approximation terms, in slider order.
    #[serde(default)]
    pub terms: Vec<TermConfig>,
    /// Starting target wave.
    pub target: TargetConfig,
}

impl SessionConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        for term in &self.terms {
            term.validate()?;
        }
        self.target.validate()
    }

    /// Resolves the preset into contract types consumed by the world.
    pub(crate) fn resolve(&self) -> (Vec<Term>, TargetWave) {
        let terms = self.terms.iter().map(TermConfig::resolve).collect();
        (terms, self.target.resolve())
    }
}

/// One approximation term named by a preset.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct TermConfig {
    /// Coefficient in the range the panel sliders cover.
    pub amplitude: f32,
    /// Harmonic multiplier of the fundamental.
    pub frequency: u32,
}

impl TermConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.amplitude.is_finite()
            || self.amplitude.abs() > ControlPanelView::AMPLITUDE_LIMIT
        {
            return Err(ConfigError::InvalidAmplitude {
                amplitude: self.amplitude,
            });
        }
        if self.frequency == 0 || self.frequency > ControlPanelView::MAX_HARMONIC {
            return Err(ConfigError::InvalidFrequency {
                frequency: self.frequency,
            });
        }
        Ok(())
    }

    fn resolve(&self) -> Term {
        Term::new(self.amplitude, Harmonic::new(self.frequency))
    }
}

/// Target wave named by a preset.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub(crate) enum TargetConfig {
    /// Built-in square wave.
    Square,
    /// Built-in sawtooth wave.
    Sawtooth,
    /// Built-in triangle wave.
    Triangle,
    /// Built-in pulse wave.
    Pulse,
    /// Player-defined wave built from the named terms.
    Custom {
        /// Terms composing the custom target.
        terms: Vec<TermConfig>,
    },
}

impl TargetConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Self::Custom { terms } = self {
            if terms.is_empty() {
                return Err(ConfigError::EmptyCustomTarget);
            }
            for term in terms {
                term.validate()?;
            }
        }
        Ok(())
    }

    fn resolve(&self) -> TargetWave {
        match self {
            Self::Square => TargetWave::Square,
            Self::Sawtooth => TargetWave::Sawtooth,
            Self::Triangle => TargetWave::Triangle,
            Self::Pulse => TargetWave::Pulse,
            Self::Custom { terms } => TargetWave::Custom {
                terms: terms.iter().map(TermConfig::resolve).collect(),
            },
        }
    }

    /// Shape discriminant of the configured target.
    #[cfg(test)]
    pub(crate) fn kind(&self) -> TargetWaveKind {
        self.resolve().kind()
    }
}

/// Errors produced while loading or validating configuration.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file {path}")]
    Read {
        /// Path that failed to read.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// The configuration file was not valid TOML.
    #[error("failed to parse configuration")]
    Parse(#[from] toml::de::Error),
    /// The window dimensions must both be positive.
    #[error("window dimensions must be positive (received {width}x{height})")]
    InvalidWindowSize {
        /// Configured window width.
        width: i32,
        /// Configured window height.
        height: i32,
    },
    /// A term amplitude fell outside the slider range.
    #[error("term amplitude must be finite and within ±{limit} (received {amplitude})", limit = ControlPanelView::AMPLITUDE_LIMIT)]
    InvalidAmplitude {
        /// Configured amplitude that failed validation.
        amplitude: f32,
    },
    /// A term frequency fell outside the slider range.
    #[error("term frequency must be within 1..={max} (received {frequency})", max = ControlPanelView::MAX_HARMONIC)]
    InvalidFrequency {
        /// Configured frequency that failed validation.
        frequency: u32,
    },
    /// A custom target must name at least one term.
    #[error("custom targets must name at least one term")]
    EmptyCustomTarget,
}
