//! Host-supplied lesson configuration.
//!
//! The page passes a JSON object to [`crate::dom::LessonApp::new`]. Every
//! field is optional; an empty string means "all defaults".
//!
//! ```json
//! { "cell_size": 40, "margin": 40, "plan": "single_mirror", "log_level": "debug" }
//! ```

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::consts::{DEFAULT_CELL_SIZE_PX, DEFAULT_MARGIN_PX};
use crate::error::LessonError;
use crate::optics::LessonPlan;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LessonConfig {
    /// Pixels between adjacent lattice points.
    pub cell_size: f64,
    /// Pixels between the surface edge and the outermost lattice points.
    pub margin: f64,
    pub plan: LessonPlan,
    /// `log` level name: `error`, `warn`, `info`, `debug` or `trace`.
    pub log_level: String,
}

impl Default for LessonConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE_PX,
            margin: DEFAULT_MARGIN_PX,
            plan: LessonPlan::default(),
            log_level: "info".into(),
        }
    }
}

impl LessonConfig {
    /// Parse and validate a JSON config. Blank input yields the defaults.
    ///
    /// # Errors
    ///
    /// [`LessonError::Config`] for malformed JSON or unknown enum values,
    /// [`LessonError::InvalidConfig`] for out-of-range values.
    pub fn from_json(raw: &str) -> Result<Self, LessonError> {
        let config = if raw.trim().is_empty() { Self::default() } else { serde_json::from_str(raw)? };
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// [`LessonError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> Result<(), LessonError> {
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(LessonError::InvalidConfig(format!("cell_size must be positive, got {}", self.cell_size)));
        }
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(LessonError::InvalidConfig(format!("margin must be non-negative, got {}", self.margin)));
        }
        self.level()?;
        Ok(())
    }

    /// The configured log level.
    ///
    /// # Errors
    ///
    /// [`LessonError::InvalidConfig`] for an unknown level name.
    pub fn level(&self) -> Result<log::Level, LessonError> {
        log::Level::from_str(&self.log_level)
            .map_err(|_| LessonError::InvalidConfig(format!("unknown log_level `{}`", self.log_level)))
    }

    /// Grid ↔ screen mapping for this config.
    #[must_use]
    pub fn camera(&self) -> Camera {
        Camera { cell_size: self.cell_size, margin: self.margin, ..Camera::default() }
    }
}
