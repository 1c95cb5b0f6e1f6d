//! JSON configuration parsing for headless mode
//!
//! Parses JSON match configurations: team compositions by school name, the
//! arena, and the simulation knobs (seed, tick length, timeout).

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::combat::economy::School;
use crate::combat::terrain::{OpenField, Terrain, WallGrid};
use glam::Vec3;

use super::runner::MAX_TEAM_SIZE;

#[derive(Debug, Error)]
pub enum HeadlessConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{0} must have 1-{MAX_TEAM_SIZE} members")]
    TeamSize(&'static str),
    #[error("unknown school: '{0}'. Valid schools: Hearth, Forge, Wander, Pact, Cadence")]
    UnknownSchool(String),
    #[error("unknown arena: '{0}'. Valid arenas: OpenField, WalledCourtyard")]
    UnknownArena(String),
    #[error("max_duration_secs must be positive")]
    BadDuration,
    #[error("tick_ms must be positive")]
    BadTick,
}

/// Headless match configuration loaded from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadlessMatchConfig {
    /// Team 1 composition (1-4 school names)
    pub team1: Vec<String>,
    /// Team 2 composition (1-4 school names)
    pub team2: Vec<String>,
    /// Arena name (default: "OpenField")
    #[serde(default = "default_arena")]
    pub arena: String,
    /// Random seed for deterministic match reproduction
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Maximum match duration in seconds (default: 300)
    #[serde(default = "default_max_duration")]
    pub max_duration_secs: f32,
    /// Fixed tick length in milliseconds (default: 50)
    #[serde(default = "default_tick_ms")]
    pub tick_ms: f32,
    /// Custom output path for the exported match log (optional)
    #[serde(default)]
    pub output_path: Option<String>,
    /// Override path for the skill book asset (optional)
    #[serde(default)]
    pub skills_path: Option<String>,
}

fn default_arena() -> String {
    "OpenField".to_string()
}

fn default_max_duration() -> f32 {
    300.0
}

fn default_tick_ms() -> f32 {
    crate::combat::constants::DEFAULT_TICK_MS
}

impl HeadlessMatchConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, HeadlessConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: HeadlessMatchConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), HeadlessConfigError> {
        if self.team1.is_empty() || self.team1.len() > MAX_TEAM_SIZE {
            return Err(HeadlessConfigError::TeamSize("team1"));
        }
        if self.team2.is_empty() || self.team2.len() > MAX_TEAM_SIZE {
            return Err(HeadlessConfigError::TeamSize("team2"));
        }

        for school_name in self.team1.iter().chain(self.team2.iter()) {
            Self::parse_school(school_name)?;
        }

        self.build_terrain()?;

        if self.max_duration_secs <= 0.0 {
            return Err(HeadlessConfigError::BadDuration);
        }
        if self.tick_ms <= 0.0 {
            return Err(HeadlessConfigError::BadTick);
        }

        Ok(())
    }

    /// Parse a school name string into School
    pub fn parse_school(name: &str) -> Result<School, HeadlessConfigError> {
        School::parse(name).ok_or_else(|| HeadlessConfigError::UnknownSchool(name.to_string()))
    }

    /// Build the arena terrain named by the config
    pub fn build_terrain(&self) -> Result<Box<dyn Terrain>, HeadlessConfigError> {
        match self.arena.as_str() {
            "OpenField" => Ok(Box::new(OpenField)),
            "WalledCourtyard" => {
                // A single tall wall across the middle of the arena.
                let mut grid = WallGrid::new();
                grid.raise_wall(Vec3::ZERO, 8.0, 2.0);
                Ok(Box::new(grid))
            }
            other => Err(HeadlessConfigError::UnknownArena(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> HeadlessMatchConfig {
        HeadlessMatchConfig {
            team1: vec!["Hearth".to_string()],
            team2: vec!["Forge".to_string()],
            arena: default_arena(),
            random_seed: Some(1),
            max_duration_secs: 300.0,
            tick_ms: 50.0,
            output_path: None,
            skills_path: None,
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_empty_team_rejected() {
        let mut config = base_config();
        config.team1.clear();
        assert!(matches!(
            config.validate(),
            Err(HeadlessConfigError::TeamSize("team1"))
        ));
    }

    #[test]
    fn test_unknown_school_rejected() {
        let mut config = base_config();
        config.team2.push("Necromancy".to_string());
        assert!(matches!(
            config.validate(),
            Err(HeadlessConfigError::UnknownSchool(_))
        ));
    }

    #[test]
    fn test_json_defaults() {
        let json = r#"{"team1": ["Hearth"], "team2": ["Pact"]}"#;
        let config: HeadlessMatchConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.arena, "OpenField");
        assert_eq!(config.max_duration_secs, 300.0);
        assert_eq!(config.tick_ms, 50.0);
        assert_eq!(config.random_seed, None);
    }
}
