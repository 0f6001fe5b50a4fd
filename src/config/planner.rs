//! Planner configuration loading from planner.toml
//!
//! Decides which sections live in local storage and which in the remote table
//! store, and carries the suggestion lists the commands offer (budget
//! categories, skills, team colors). Every field has a default, so a missing
//! file or an empty one yields a working configuration.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Where one planner section is persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// JSON files under [`StorageConfig::local_dir`]
    Local,
    /// The user-scoped database tables
    Remote,
}

/// Per-section storage selection
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Todos and their decisions (default remote)
    pub todos: StorageKind,
    /// Budget entries (default local)
    pub budget: StorageKind,
    /// Hardware inventory (default remote)
    pub hardware: StorageKind,
    /// Participants (default local)
    pub participants: StorageKind,
    /// Reservations (default local)
    pub reservations: StorageKind,
    /// Teams (default local)
    pub teams: StorageKind,
    /// Root directory for local storage; each user gets a subdirectory
    pub local_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            todos: StorageKind::Remote,
            budget: StorageKind::Local,
            hardware: StorageKind::Remote,
            participants: StorageKind::Local,
            reservations: StorageKind::Local,
            teams: StorageKind::Local,
            local_dir: PathBuf::from("data/local"),
        }
    }
}

/// A named team color and the embed color used to render it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TeamColor {
    /// Name users pick and teams store, e.g. `"Blue"`
    pub name: String,
    /// Embed color as `0xRRGGBB`
    pub hex: u32,
}

impl TeamColor {
    fn new(name: &str, hex: u32) -> Self {
        Self {
            name: name.to_string(),
            hex,
        }
    }
}

/// Configuration structure representing the entire planner.toml file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Where each section is kept
    pub storage: StorageConfig,
    /// Categories offered when recording budget entries
    pub budget_categories: Vec<String>,
    /// Skills offered alongside those already on the roster
    pub suggested_skills: Vec<String>,
    /// The team color palette, in display order
    pub team_colors: Vec<TeamColor>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        let strings = |items: &[&str]| items.iter().map(ToString::to_string).collect();
        Self {
            storage: StorageConfig::default(),
            budget_categories: strings(&[
                "Sponsorship",
                "Registration",
                "Food & Drinks",
                "Venue",
                "Prizes",
                "Hardware",
                "Marketing",
                "Transportation",
                "Other",
            ]),
            suggested_skills: strings(&[
                "Frontend",
                "Backend",
                "Design",
                "Mobile",
                "AI/ML",
                "DevOps",
                "Data Science",
                "Hardware",
                "Project Management",
                "Marketing",
            ]),
            team_colors: vec![
                TeamColor::new("Red", 0x00EF_4444),
                TeamColor::new("Blue", 0x003B_82F6),
                TeamColor::new("Green", 0x0022_C55E),
                TeamColor::new("Yellow", 0x00EA_B308),
                TeamColor::new("Purple", 0x00A8_55F7),
                TeamColor::new("Pink", 0x00EC_4899),
                TeamColor::new("Orange", 0x00F9_7316),
                TeamColor::new("Cyan", 0x0006_B6D4),
            ],
        }
    }
}

impl PlannerConfig {
    /// Palette names in configured order.
    #[must_use]
    pub fn color_names(&self) -> Vec<String> {
        self.team_colors.iter().map(|c| c.name.clone()).collect()
    }

    /// Embed color for a palette name, if configured.
    #[must_use]
    pub fn color_hex(&self, name: &str) -> Option<u32> {
        self.team_colors
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .map(|c| c.hex)
    }
}

/// Parses planner configuration from TOML text.
pub fn parse_config(contents: &str) -> Result<PlannerConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse planner.toml: {e}"),
    })
}

/// Loads planner configuration from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PlannerConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path_ref:?}: {e}"),
    })?;
    parse_config(&contents)
}

/// Loads configuration from `PLANNER_CONFIG` (default `./planner.toml`).
///
/// A missing file is not an error; defaults are used instead. `LOCAL_STORAGE_DIR`
/// overrides the configured local storage directory.
pub fn load_default_config() -> Result<PlannerConfig> {
    let path = std::env::var("PLANNER_CONFIG").unwrap_or_else(|_| "planner.toml".to_string());
    let mut config = if Path::new(&path).exists() {
        load_config(&path)?
    } else {
        info!("No planner config at {path}, using defaults");
        PlannerConfig::default()
    };

    if let Ok(dir) = std::env::var("LOCAL_STORAGE_DIR") {
        config.storage.local_dir = PathBuf::from(dir);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_partial_config_keeps_defaults() {
        let toml_str = r#"
            budget_categories = ["Food", "Venue"]

            [storage]
            budget = "remote"
            local_dir = "/tmp/planner"
        "#;

        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.budget_categories, vec!["Food", "Venue"]);
        assert_eq!(config.storage.budget, StorageKind::Remote);
        assert_eq!(config.storage.todos, StorageKind::Remote);
        assert_eq!(config.storage.teams, StorageKind::Local);
        assert_eq!(config.storage.local_dir, PathBuf::from("/tmp/planner"));
        assert_eq!(config.team_colors.len(), 8);
    }

    #[test]
    fn test_empty_config_is_default() {
        let config = parse_config("").unwrap();
        assert_eq!(config, PlannerConfig::default());
        assert_eq!(config.storage.hardware, StorageKind::Remote);
        assert_eq!(config.storage.participants, StorageKind::Local);
    }

    #[test]
    fn test_shipped_planner_toml_matches_defaults() {
        let config = parse_config(include_str!("../../planner.toml")).unwrap();
        assert_eq!(config, PlannerConfig::default());
    }

    #[test]
    fn test_team_colors_lookup() {
        let toml_str = r#"
            [[team_colors]]
            name = "Teal"
            hex = 0x14B8A6
        "#;

        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.color_names(), vec!["Teal"]);
        assert_eq!(config.color_hex("teal"), Some(0x14B8A6));
        assert_eq!(config.color_hex("Red"), None);
    }

    #[test]
    fn test_invalid_storage_kind_is_config_error() {
        let result = parse_config("[storage]\ntodos = \"cloud\"\n");
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
