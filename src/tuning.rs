//! Game balance values
//!
//! Spawn rates and feel parameters live here rather than in code so they can be
//! adjusted from a JSON document without touching the simulation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Cap on live ambient particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 40,
            QualityPreset::Medium => 100,
            QualityPreset::High => 250,
        }
    }
}

/// Tunable simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Per-frame probability of an asteroid spawning in play mode
    pub asteroid_spawn_chance: f64,
    /// Per-frame probability of an alien spawning in play mode
    pub alien_spawn_chance: f64,
    /// Bullet speed (pixels/frame)
    pub bullet_speed: f64,
    /// Frames between alien shots
    pub alien_fire_interval: u32,
    /// Extra reach added to a target's radius for bullet hits
    pub hit_margin: f64,
    /// Live particle cap for trail emission
    pub max_particles: usize,
    /// Opacity lost by a particle each frame
    pub particle_fade: f64,
    /// Chance that each trail emission slot actually spawns a particle
    pub trail_emit_chance: f64,
    /// Wave phase advance per frame at full pointer deflection (scaled by wave speed)
    pub wave_drift: f64,
    /// Ship animation progress gained per frame when entering play mode
    pub ship_transition_step: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            asteroid_spawn_chance: 0.008,
            alien_spawn_chance: 0.006,
            bullet_speed: 8.0,
            alien_fire_interval: 60,
            hit_margin: 5.0,
            max_particles: QualityPreset::Medium.max_particles(),
            particle_fade: 0.02,
            trail_emit_chance: 0.5,
            wave_drift: 0.05,
            ship_transition_step: 0.02,
        }
    }
}

impl Tuning {
    /// Defaults with the particle cap taken from a quality preset
    pub fn for_quality(preset: QualityPreset) -> Self {
        Self::default().with_quality(preset)
    }

    /// Replace the particle cap with the preset's, keeping everything else
    pub fn with_quality(self, preset: QualityPreset) -> Self {
        Self {
            max_particles: preset.max_particles(),
            ..self
        }
    }

    /// Parse a (possibly partial) JSON tuning document and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        check_probability("asteroid_spawn_chance", self.asteroid_spawn_chance)?;
        check_probability("alien_spawn_chance", self.alien_spawn_chance)?;
        check_probability("trail_emit_chance", self.trail_emit_chance)?;

        if !self.bullet_speed.is_finite() || self.bullet_speed < 0.0 {
            return Err(TuningError::out_of_range("bullet_speed", self.bullet_speed));
        }
        if !self.hit_margin.is_finite() || self.hit_margin < 0.0 {
            return Err(TuningError::out_of_range("hit_margin", self.hit_margin));
        }
        if !self.wave_drift.is_finite() {
            return Err(TuningError::out_of_range("wave_drift", self.wave_drift));
        }
        if !(self.particle_fade > 0.0 && self.particle_fade.is_finite()) {
            return Err(TuningError::out_of_range("particle_fade", self.particle_fade));
        }
        if !(self.ship_transition_step > 0.0 && self.ship_transition_step <= 1.0) {
            return Err(TuningError::out_of_range(
                "ship_transition_step",
                self.ship_transition_step,
            ));
        }
        Ok(())
    }
}

fn check_probability(field: &'static str, value: f64) -> Result<(), TuningError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(TuningError::out_of_range(field, value))
    }
}

/// Failure to load a tuning document
#[derive(Debug)]
pub enum TuningError {
    /// Document is not valid JSON for `Tuning`
    Parse(serde_json::Error),
    /// A field holds a value the simulation cannot use
    OutOfRange { field: &'static str, value: f64 },
}

impl TuningError {
    fn out_of_range(field: &'static str, value: f64) -> Self {
        Self::OutOfRange { field, value }
    }
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid tuning document: {err}"),
            Self::OutOfRange { field, value } => {
                write!(f, "tuning value `{field}` out of range: {value}")
            }
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::OutOfRange { .. } => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
        assert_eq!(Tuning::default().max_particles, 100);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "alien_spawn_chance": 0.01 }"#).unwrap();
        assert_eq!(tuning.alien_spawn_chance, 0.01);
        assert_eq!(tuning.asteroid_spawn_chance, 0.008);
        assert_eq!(tuning.bullet_speed, 8.0);
    }

    #[test]
    fn test_out_of_range_probability() {
        let err = Tuning::from_json(r#"{ "asteroid_spawn_chance": 1.5 }"#).unwrap_err();
        match err {
            TuningError::OutOfRange { field, value } => {
                assert_eq!(field, "asteroid_spawn_chance");
                assert_eq!(value, 1.5);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_json() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
        assert!(err.to_string().starts_with("invalid tuning document"));
    }

    #[test]
    fn test_json_roundtrip_preserves_values() {
        let tuning = Tuning::for_quality(QualityPreset::High);
        let json = tuning.to_json().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), tuning);
    }

    #[test]
    fn test_quality_overrides_only_particle_cap() {
        let loaded = Tuning::from_json(r#"{ "bullet_speed": 12.0, "max_particles": 7 }"#).unwrap();
        let tuned = loaded.clone().with_quality(QualityPreset::High);
        assert_eq!(tuned.max_particles, 250);
        assert_eq!(tuned.bullet_speed, 12.0);
        assert_eq!(Tuning { max_particles: 7, ..tuned }, loaded);
    }

    #[test]
    fn test_quality_preset_names_round_trip() {
        for preset in [QualityPreset::Low, QualityPreset::Medium, QualityPreset::High] {
            assert_eq!(QualityPreset::from_str(preset.as_str()), Some(preset));
        }
    }

    #[test]
    fn test_quality_preset_parse() {
        assert_eq!(QualityPreset::from_str("MED"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::from_str("ultra"), None);
        assert_eq!(Tuning::for_quality(QualityPreset::Low).max_particles, 40);
    }
}
