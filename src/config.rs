// Policy configuration
//
// JSON document selecting the privacy table location, the router profile and
// monitor tuning. Every field has a default so a partial file is valid.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::audio::devices::DeviceMonitorConfig;
use crate::audio::types::DeviceCategory;
use crate::error::{PolicyError, Result};

/// Product profile deciding which routers join the call chains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouterProfile {
    /// In-vehicle: calls prefer the car kit
    #[default]
    Cockpit,
    Phone,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Device privacy XML; no table is loaded when absent
    pub privacy_config_path: Option<PathBuf>,
    pub router_profile: RouterProfile,
    /// Accessory category the cockpit router keeps
    pub cockpit_category: DeviceCategory,
    pub monitor: DeviceMonitorConfig,
    /// Verbose classification traces
    pub device_debug: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            privacy_config_path: None,
            router_profile: RouterProfile::Cockpit,
            cockpit_category: DeviceCategory::BT_CAR,
            monitor: DeviceMonitorConfig::default(),
            device_debug: false,
        }
    }
}

impl PolicyConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| PolicyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}
