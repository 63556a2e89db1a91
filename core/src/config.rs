//! Tunable parameters for the particle field.

use crate::color::Rgb;
use crate::palette::{PaletteCursor, WATERCOLOR_ANCHORS};
use serde::{Deserialize, Serialize};

/// Errors raised while building or validating a [`FieldConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field} must be {expected}, got {value}")]
    OutOfRange {
        field: &'static str,
        expected: &'static str,
        value: f64,
    },
    #[error("{field} range is inverted: min {min} > max {max}")]
    InvertedRange {
        field: &'static str,
        min: f64,
        max: f64,
    },
    #[error("Palette needs at least 2 anchor colors, got {0}")]
    PaletteTooShort(usize),
}

/// Particle field configuration.
///
/// The defaults reproduce the watercolor trail: a white 10% veil each frame,
/// two particles per pointer move, `0.97` opacity decay and `0.2` radius growth
/// per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Alpha of the full-surface veil painted at the start of every tick.
    pub trail_fade_alpha: f32,
    /// Color of that veil.
    pub trail_color: Rgb,
    /// Radius added per tick.
    pub radius_growth: f32,
    /// Opacity multiplier per tick.
    pub opacity_decay: f32,
    /// Particles whose opacity falls below this are removed.
    pub removal_threshold: f32,
    /// Particles spawned for each pointer move.
    pub particles_per_move: u32,
    /// Palette cursor advance per spawned particle.
    pub palette_step: f64,
    /// Maximum spawn offset from the pointer on each axis.
    pub jitter: f32,
    /// Initial speed range `[min, max)` per tick.
    pub speed_range: (f32, f32),
    /// Initial radius range `[min, max)`.
    pub radius_range: (f32, f32),
    /// Initial opacity range `[min, max)`.
    pub opacity_range: (f32, f32),
    /// Palette anchors, walked cyclically.
    pub palette: Vec<Rgb>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            trail_fade_alpha: 0.1,
            trail_color: Rgb::WHITE,
            radius_growth: 0.2,
            opacity_decay: 0.97,
            removal_threshold: 0.01,
            particles_per_move: 2,
            palette_step: 0.01,
            jitter: 5.0,
            speed_range: (0.1, 0.4),
            radius_range: (5.0, 15.0),
            opacity_range: (0.6, 0.8),
            palette: WATERCOLOR_ANCHORS.to_vec(),
        }
    }
}

impl FieldConfig {
    /// Parse from JSON and validate. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: FieldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that every parameter keeps the particle lifecycle finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        in_range("trail_fade_alpha", self.trail_fade_alpha as f64, 0.0, 1.0, "within [0, 1]")?;
        // decay must be < 1 or particles never fade out
        exclusive("opacity_decay", self.opacity_decay as f64, 0.0, 1.0, "within (0, 1)")?;
        exclusive("removal_threshold", self.removal_threshold as f64, 0.0, 1.0, "within (0, 1)")?;
        in_range("radius_growth", self.radius_growth as f64, 0.0, f64::MAX, "non-negative")?;
        in_range("jitter", self.jitter as f64, 0.0, f64::MAX, "non-negative")?;
        exclusive("palette_step", self.palette_step, 0.0, f64::MAX, "positive")?;

        ordered("speed_range", self.speed_range)?;
        ordered("radius_range", self.radius_range)?;
        ordered("opacity_range", self.opacity_range)?;
        in_range("speed_range.min", self.speed_range.0 as f64, 0.0, f64::MAX, "non-negative")?;
        in_range("radius_range.min", self.radius_range.0 as f64, 0.0, f64::MAX, "non-negative")?;
        in_range("opacity_range.min", self.opacity_range.0 as f64, 0.0, 1.0, "within [0, 1]")?;
        in_range("opacity_range.max", self.opacity_range.1 as f64, 0.0, 1.0, "within [0, 1]")?;

        if self.palette.len() < 2 {
            return Err(ConfigError::PaletteTooShort(self.palette.len()));
        }
        Ok(())
    }

    /// Fresh palette cursor at 0.0 for this config.
    pub fn palette_cursor(&self) -> PaletteCursor {
        PaletteCursor::new(self.palette.clone(), self.palette_step)
    }
}

fn in_range(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
    expected: &'static str,
) -> Result<(), ConfigError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, expected, value })
    }
}

fn exclusive(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
    expected: &'static str,
) -> Result<(), ConfigError> {
    if value.is_finite() && value > min && value < max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, expected, value })
    }
}

fn ordered(field: &'static str, range: (f32, f32)) -> Result<(), ConfigError> {
    let (min, max) = (range.0 as f64, range.1 as f64);
    if !min.is_finite() || !max.is_finite() {
        return Err(ConfigError::OutOfRange {
            field,
            expected: "finite",
            value: if min.is_finite() { max } else { min },
        });
    }
    if min > max {
        return Err(ConfigError::InvertedRange { field, min, max });
    }
    Ok(())
}
