use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::segments::SegmentKind;
use crate::types::{
    DEFAULT_KEY_REPEAT, DEFAULT_SHOULDER_THRESHOLD, DEFAULT_STEP_THRESHOLD, DEFAULT_WINDOW_SIZE,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Umbral inválido `{name}`: {value} (debe ser finito y > 0)")]
    InvalidThreshold { name: &'static str, value: f32 },

    #[error("window_size debe ser mayor que 0")]
    ZeroWindow,

    #[error("El pipeline de segmentos está vacío")]
    EmptyPipeline,

    #[error("keys.repeat debe ser mayor que 0")]
    ZeroRepeat,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML inválido: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("No se pudo serializar TOML: {0}")]
    TomlSerError(#[from] toml::ser::Error),
}

/// Parámetros del motor de gestos
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Desplazamiento del centro de hombros (m) para MoveToLeft/MoveToRight
    pub shoulder_threshold: f32,
    /// Desplazamiento (m) entre pasos consecutivos para GoToLeft/GoToRight
    pub step_threshold: f32,
    /// Frames seguidos sin coincidencia antes de cerrar la ventana
    pub window_size: usize,
    /// Segmentos evaluados en orden; el primero que coincide gana
    pub pipeline: Vec<SegmentKind>,
    /// Reproduce la comparación mano izquierda vs. X de la cabeza
    pub legacy_left_hand_head_x: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            shoulder_threshold: DEFAULT_SHOULDER_THRESHOLD,
            step_threshold: DEFAULT_STEP_THRESHOLD,
            window_size: DEFAULT_WINDOW_SIZE,
            pipeline: SegmentKind::DEFAULT_PIPELINE.to_vec(),
            legacy_left_hand_head_x: false,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_threshold("shoulder_threshold", self.shoulder_threshold)?;
        check_threshold("step_threshold", self.step_threshold)?;
        if self.window_size == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        if self.pipeline.is_empty() {
            return Err(ConfigError::EmptyPipeline);
        }
        Ok(())
    }
}

fn check_threshold(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidThreshold { name, value })
    }
}

/// Parámetros de la inyección de teclas (no los usa el motor)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeysConfig {
    /// Pulsaciones de flecha por cada paso
    pub repeat: u32,
    /// Pausa entre press y release (ms)
    pub hold_ms: u64,
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            repeat: DEFAULT_KEY_REPEAT,
            hold_ms: 10,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub keys: KeysConfig,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;
        if self.keys.repeat == 0 {
            return Err(ConfigError::ZeroRepeat);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(
            config.engine.pipeline,
            vec![
                SegmentKind::StartHandsUp,
                SegmentKind::MoveToRight,
                SegmentKind::MoveToLeft
            ]
        );
    }

    #[test]
    fn partial_toml_overrides_fields() {
        let config = Config::from_toml(
            r#"
            [engine]
            shoulder_threshold = 0.3
            pipeline = ["start_hands_up", "go_to_left", "go_to_right"]

            [keys]
            repeat = 4
            "#,
        )
        .unwrap();
        assert_eq!(config.engine.shoulder_threshold, 0.3);
        assert_eq!(config.engine.step_threshold, DEFAULT_STEP_THRESHOLD);
        assert_eq!(config.engine.pipeline[1], SegmentKind::GoToLeft);
        assert_eq!(config.keys.repeat, 4);
    }

    #[test]
    fn rejects_zero_and_negative_thresholds() {
        for value in [0.0, -0.5, f32::NAN, f32::INFINITY] {
            let cfg = EngineConfig {
                shoulder_threshold: value,
                ..EngineConfig::default()
            };
            assert!(matches!(
                cfg.validate(),
                Err(ConfigError::InvalidThreshold { name: "shoulder_threshold", .. })
            ));
        }
    }

    #[test]
    fn rejects_zero_window_and_empty_pipeline() {
        let cfg = EngineConfig {
            window_size: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::ZeroWindow)));

        let cfg = EngineConfig {
            pipeline: Vec::new(),
            ..EngineConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::EmptyPipeline)));
    }

    #[test]
    fn rejects_non_numeric_threshold() {
        let err = Config::from_toml("[engine]\nshoulder_threshold = \"medio\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::TomlError(_)));
    }

    #[test]
    fn rejects_zero_repeat() {
        let err = Config::from_toml("[keys]\nrepeat = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ZeroRepeat));
    }

    #[test]
    fn save_then_load_keeps_values() {
        let path = std::env::temp_dir().join("kinemando_config_test.toml");
        let mut config = Config::default();
        config.engine.window_size = 9;
        config.save(&path).unwrap();
        let loaded = Config::load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded.engine.window_size, 9);
    }
}
