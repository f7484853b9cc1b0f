use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::JOINT_COUNT;

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_foot_contact_threshold() -> i16 {
    20
}
const fn default_nominal_pose() -> [f32; JOINT_COUNT] {
    // Standing pose: hip 0.0, thigh 0.8, calf -1.5 on every leg.
    [
        0.0, 0.8, -1.5, // front right
        0.0, 0.8, -1.5, // front left
        0.0, 0.8, -1.5, // rear right
        0.0, 0.8, -1.5, // rear left
    ]
}
const fn default_action_scale() -> f32 {
    1.0
}
const fn default_position_gain() -> f32 {
    20.0
}
const fn default_damping_gain() -> f32 {
    0.5
}

// ---------------------------------------------------------------------------
// CycleMode
// ---------------------------------------------------------------------------

/// Which contact-duration update runs each tick.
///
/// The two strategies are alternatives; exactly one runs per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleMode {
    /// Count control ticks since last contact.
    #[default]
    Ticks,
    /// Track elapsed milliseconds since last contact using the sensor tick
    /// clock carried in each snapshot.
    Timestamp,
}

// ---------------------------------------------------------------------------
// ControllerConfig
// ---------------------------------------------------------------------------

/// Controller configuration.
///
/// The nominal pose and gains are fixed for the controller's lifetime; only
/// the foot-contact threshold is mutable at runtime (through the controller).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Foot-force readings strictly below this count as "no contact".
    ///
    /// Any signed value is accepted: a negative threshold legitimately means
    /// every reading classifies as contact.
    #[serde(default = "default_foot_contact_threshold")]
    pub foot_contact_threshold: i16,

    /// Reference joint configuration, fixed leg/joint order.
    #[serde(default = "default_nominal_pose")]
    pub nominal_pose: [f32; JOINT_COUNT],

    /// Multiplier applied to the raw policy output before it is added to the
    /// nominal pose. 1.0 applies the output as-is; smaller values smooth the
    /// commanded motion.
    #[serde(default = "default_action_scale")]
    pub action_scale: f32,

    /// Servo position gain (kp), identical across joints.
    #[serde(default = "default_position_gain")]
    pub position_gain: f32,

    /// Servo velocity-damping gain (kd), identical across joints.
    #[serde(default = "default_damping_gain")]
    pub damping_gain: f32,

    /// Contact-duration update strategy.
    #[serde(default)]
    pub cycle_mode: CycleMode,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            foot_contact_threshold: default_foot_contact_threshold(),
            nominal_pose: default_nominal_pose(),
            action_scale: default_action_scale(),
            position_gain: default_position_gain(),
            damping_gain: default_damping_gain(),
            cycle_mode: CycleMode::default(),
        }
    }
}

impl ControllerConfig {
    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.action_scale.is_finite() {
            return Err(ConfigError::InvalidValue {
                field: "action_scale".into(),
                message: "must be finite".into(),
            });
        }
        if !self.position_gain.is_finite() || self.position_gain < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "position_gain".into(),
                message: "must be finite and non-negative".into(),
            });
        }
        if !self.damping_gain.is_finite() || self.damping_gain < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "damping_gain".into(),
                message: "must be finite and non-negative".into(),
            });
        }
        if self.nominal_pose.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::InvalidValue {
                field: "nominal_pose".into(),
                message: "must contain only finite angles".into(),
            });
        }
        Ok(())
    }

    /// Load from TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // ---- Defaults ----

    #[test]
    fn default_values() {
        let cfg = ControllerConfig::default();
        assert_eq!(cfg.foot_contact_threshold, 20);
        assert!((cfg.action_scale - 1.0).abs() < f32::EPSILON);
        assert!((cfg.position_gain - 20.0).abs() < f32::EPSILON);
        assert!((cfg.damping_gain - 0.5).abs() < f32::EPSILON);
        assert_eq!(cfg.cycle_mode, CycleMode::Ticks);
        // Standing pose repeats per leg.
        assert!((cfg.nominal_pose[1] - 0.8).abs() < f32::EPSILON);
        assert!((cfg.nominal_pose[11] - (-1.5)).abs() < f32::EPSILON);
    }

    // ---- Validation ----

    #[test]
    fn validate_ok() {
        assert!(ControllerConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_nan_scale() {
        let cfg = ControllerConfig {
            action_scale: f32::NAN,
            ..ControllerConfig::default()
        };
        assert!(matches!(
            cfg.validate().unwrap_err(),
            ConfigError::InvalidValue { .. }
        ));
    }

    #[test]
    fn validate_rejects_negative_gain() {
        let cfg = ControllerConfig {
            position_gain: -1.0,
            ..ControllerConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_finite_pose() {
        let mut cfg = ControllerConfig::default();
        cfg.nominal_pose[3] = f32::INFINITY;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn negative_threshold_is_accepted() {
        // Resolved open question: the threshold stays unconstrained; negative
        // values mean "everything counts as contact" and are legal.
        let cfg = ControllerConfig {
            foot_contact_threshold: -100,
            ..ControllerConfig::default()
        };
        assert!(cfg.validate().is_ok());
    }

    // ---- TOML ----

    #[test]
    fn toml_deserialization() {
        let toml_str = r"
            foot_contact_threshold = 50
            action_scale = 0.25
            position_gain = 25.0
            damping_gain = 1.0
            cycle_mode = 'timestamp'
        ";
        let cfg: ControllerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.foot_contact_threshold, 50);
        assert!((cfg.action_scale - 0.25).abs() < f32::EPSILON);
        assert!((cfg.position_gain - 25.0).abs() < f32::EPSILON);
        assert_eq!(cfg.cycle_mode, CycleMode::Timestamp);
        // Unspecified fields fall back to defaults.
        assert!((cfg.nominal_pose[2] - (-1.5)).abs() < f32::EPSILON);
    }

    #[test]
    fn toml_empty_gives_defaults() {
        let cfg: ControllerConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, ControllerConfig::default());
    }

    #[test]
    fn from_file_roundtrip() {
        let dir = std::env::temp_dir().join("ambler_test_controller_config");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("controller.toml");
        std::fs::write(
            &path,
            r"
            foot_contact_threshold = 35
            action_scale = 0.5
        ",
        )
        .unwrap();

        let cfg = ControllerConfig::from_file(&path).unwrap();
        assert_eq!(cfg.foot_contact_threshold, 35);
        assert!((cfg.action_scale - 0.5).abs() < f32::EPSILON);

        let _ = std::fs::remove_file(&path);
        let _ = std::fs::remove_dir(&dir);
    }

    #[test]
    fn from_file_invalid_values_rejected() {
        let dir = std::env::temp_dir().join("ambler_test_controller_config_invalid");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.toml");
        std::fs::write(&path, "position_gain = -5.0").unwrap();

        assert!(ControllerConfig::from_file(&path).is_err());

        let _ = std::fs::remove_file(&path);
        let _ = std::fs::remove_dir(&dir);
    }

    #[test]
    fn from_file_not_found() {
        assert!(ControllerConfig::from_file("/nonexistent/controller.toml").is_err());
    }
}
