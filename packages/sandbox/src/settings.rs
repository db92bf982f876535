//! Sandbox settings file.

use physics::EngineConfig;
use std::{
    path::Path,
    fs::File,
    io::{
        BufReader,
        BufWriter,
    },
};
use serde::{Serialize, Deserialize};
use anyhow::*;


pub const SETTINGS_FILE_NAME: &'static str = "settings.json";


/// Which engine variant to run.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dimension {
    #[serde(rename = "2d")]
    Two,
    #[serde(rename = "3d")]
    Three,
}

/// Which set of bodies to simulate.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// A box dropped onto the ground.
    Drop,
    /// Two equal boxes colliding elastically.
    HeadOn,
    /// A box thrown against the world boundary.
    WallBounce,
    /// A box given a pending spin in mid-air.
    Spin,
}

/// Sandbox settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub dimension: Dimension,
    pub scenario: Scenario,
    /// Number of ticks to run.
    pub ticks: u32,
    pub fps: f32,
    /// Frame time fed to every tick, in seconds.
    pub frame_time: f32,
    pub engine: EngineConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            dimension: Dimension::Three,
            scenario: Scenario::Drop,
            ticks: 600,
            fps: 60.0,
            frame_time: 1.0 / 60.0,
            engine: EngineConfig::default(),
        }
    }
}

impl Settings {
    pub fn try_read(path: impl AsRef<Path>) -> Result<Self> {
        let settings: Self = serde_json::from_reader(BufReader::new(File::open(path)?))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings if the file exists, or use defaults if it doesn't. A
    /// file that exists but is invalid is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::try_read(path)
                .with_context(|| format!("invalid settings file {}", path.display()))
        } else {
            info!(path=%path.display(), "no settings file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        serde_json::to_writer_pretty(BufWriter::new(File::create(path)?), self)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.fps.is_finite() && self.fps > 0.0, "fps must be positive, got {}", self.fps);
        ensure!(
            self.frame_time.is_finite() && self.frame_time >= 0.0,
            "frame_time must be non-negative, got {}", self.frame_time,
        );
        self.engine.validate()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{
            "dimension": "2d",
            "scenario": "wall_bounce",
            "engine": { "gravity": 0.0 }
        }"#).unwrap();
        assert_eq!(settings.dimension, Dimension::Two);
        assert_eq!(settings.scenario, Scenario::WallBounce);
        assert_eq!(settings.ticks, 600);
        assert_eq!(settings.engine.gravity(), 0.0);
        assert_eq!(settings.engine.cell_size(), 64.0);
        settings.validate().unwrap();
    }

    #[test]
    fn out_of_range_engine_config_is_rejected() {
        let settings: Settings = serde_json::from_str(r#"{
            "engine": { "spin_decay_factor": 2.0 }
        }"#).unwrap();
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("spin_decay_factor"));
    }

    #[test]
    fn write_then_load() {
        let path = std::env::temp_dir().join(format!("sandbox-settings-{}.json", std::process::id()));
        let mut settings = Settings::default();
        settings.scenario = Scenario::Spin;
        settings.engine.set_cell_size(16.0).unwrap();
        settings.write(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn missing_file_is_default() {
        let path = std::env::temp_dir().join("sandbox-settings-does-not-exist.json");
        assert_eq!(Settings::load(&path).unwrap(), Settings::default());
    }
}
