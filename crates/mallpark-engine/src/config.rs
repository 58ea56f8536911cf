//! # Parking Configuration
//!
//! Size classes and malls the engine starts with.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     MALLPARK_CONFIG=/etc/mallpark/parking.toml                         │
//! │                                                                         │
//! │  2. Explicit path (--config on the console)                            │
//! │                                                                         │
//! │  3. TOML Config File in the platform config dir                        │
//! │     ~/.config/mallpark/parking.toml (Linux)                            │
//! │     ~/Library/Application Support/com.mallpark.mallpark/parking.toml   │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     SP/MP/LP size classes, no malls                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [[size_classes]]
//! id = "SP"
//! name = "Small"
//! value = 0
//! continuous_rate_cents = 2000
//!
//! [[malls]]
//! [malls.mall]
//! id = "north"
//! name = "North Mall"
//! num_entries = 3
//! return_duration_secs = 1800
//!
//! [[malls.slots]]
//! id = "N-1"
//! size_class_id = "SP"
//! distances = [1, 4, 7]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, info};

use mallpark_core::{MallConfig, MallRegistration, SizeClassTable, SlotSizeClass, SlotSpec};

use crate::error::{EngineError, EngineResult};
use crate::registry::OccupancyRegistry;

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "MALLPARK_CONFIG";

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkingConfig {
    /// Slot size classes shared by every mall.
    #[serde(default = "default_size_classes")]
    pub size_classes: Vec<SlotSizeClass>,

    /// Malls registered at startup, in order.
    #[serde(default)]
    pub malls: Vec<MallRegistration>,
}

fn default_size_classes() -> Vec<SlotSizeClass> {
    SizeClassTable::standard().iter().cloned().collect()
}

impl Default for ParkingConfig {
    fn default() -> Self {
        ParkingConfig {
            size_classes: default_size_classes(),
            malls: Vec::new(),
        }
    }
}

impl ParkingConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`MALLPARK_CONFIG`, else `config_path`, else the
    ///    platform default)
    ///
    /// A missing file is not an error; a malformed one is.
    pub fn load(config_path: Option<PathBuf>) -> EngineResult<Self> {
        let mut config = Self::default();

        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .or(config_path)
            .or_else(Self::default_config_path);

        if let Some(path) = path {
            if path.exists() {
                info!(?path, "Loading parking config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.validate()?;

        Ok(config)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> EngineResult<PathBuf> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(EngineError::NoConfigPath)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Parking config saved");
        Ok(path)
    }

    /// Validates the configuration.
    ///
    /// Each mall is built into a throwaway registry exactly as
    /// `SessionManager::register_mall` builds it, generated slot ids
    /// included, so a config that passes here builds a manager without error.
    pub fn validate(&self) -> EngineResult<()> {
        let classes = self.size_class_table()?;

        let mut mall_ids = HashSet::new();
        for registration in &self.malls {
            let mall_id = registration.mall.id.as_str();
            if !mall_ids.insert(mall_id) {
                return Err(EngineError::InvalidConfig(format!(
                    "mall '{}' is defined more than once",
                    mall_id
                )));
            }

            OccupancyRegistry::from_registration(registration.clone(), &classes)?;
        }

        Ok(())
    }

    /// Builds the size-class table.
    pub fn size_class_table(&self) -> EngineResult<SizeClassTable> {
        if self.size_classes.is_empty() {
            return Err(EngineError::InvalidConfig(
                "at least one size class is required".into(),
            ));
        }
        Ok(SizeClassTable::new(self.size_classes.clone())?)
    }

    /// A small two-mall configuration for first runs.
    pub fn sample() -> Self {
        let north = MallRegistration {
            mall: MallConfig::new("north", "North Mall"),
            slots: vec![
                SlotSpec::new("SP", vec![1, 6, 9]).with_id("N-1"),
                SlotSpec::new("SP", vec![2, 5, 8]).with_id("N-2"),
                SlotSpec::new("MP", vec![4, 2, 6]).with_id("N-3"),
                SlotSpec::new("MP", vec![7, 3, 2]).with_id("N-4"),
                SlotSpec::new("LP", vec![9, 7, 1]).with_id("N-5"),
            ],
        };

        let south = MallRegistration {
            mall: MallConfig::new("south", "South Mall").with_num_entries(4),
            slots: vec![
                SlotSpec::new("SP", vec![3, 3, 3, 3]).with_id("S-1"),
                SlotSpec::new("MP", vec![1, 5, 5, 9]).with_id("S-2"),
                SlotSpec::new("LP", vec![5, 1, 9, 5]).with_id("S-3"),
            ],
        };

        ParkingConfig {
            size_classes: default_size_classes(),
            malls: vec![north, south],
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "mallpark", "mallpark")
            .map(|dirs| dirs.config_dir().join("parking.toml"))
    }
}
