//! Process configuration and radio capability snapshots.
//!
//! [`RegulatoryConfig`] holds the defaults pushed to every logical interface.
//! It is usually read from a YAML document:
//!
//! ```rust
//! use regchan::RegulatoryConfig;
//!
//! let config = RegulatoryConfig::from_yaml_str(
//!     "dfs_enabled: false\nrestart_beaconing: restart24g_only\n",
//! )?;
//! assert!(!config.dfs_enabled);
//! assert!(config.indoor_chan_enabled);
//! # Ok::<(), regchan::RegulatoryError>(())
//! ```

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::types::{BandCapability, RestartBeaconing, reg_flags::band, reg_flags::srd_master_mode};
use crate::{RegulatoryError, Result};

const SRD_MASTER_MODE_ALL: u8 = srd_master_mode::SAP | srd_master_mode::P2P_GO | srd_master_mode::NAN;

/// Process-wide regulatory defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(default)]
pub struct RegulatoryConfig {
    pub dfs_enabled: bool,
    pub indoor_chan_enabled: bool,
    pub force_ssc_disable_indoor_channel: bool,
    pub band_capability: BandCapability,
    /// Bitmask over `reg_flags::srd_master_mode`
    pub enable_srd_chan_in_master_mode: u8,
    pub restart_beaconing: RestartBeaconing,
    pub en_chan_144: bool,
    pub set_fcc_channel: bool,
    /// `tracing_subscriber::EnvFilter` directive used by [`init_tracing`]
    pub log_filter: String,
}

impl Default for RegulatoryConfig {
    fn default() -> Self {
        Self {
            dfs_enabled: true,
            indoor_chan_enabled: true,
            force_ssc_disable_indoor_channel: false,
            band_capability: BandCapability::ALL,
            enable_srd_chan_in_master_mode: 0,
            restart_beaconing: RestartBeaconing::Restart,
            en_chan_144: true,
            set_fcc_channel: false,
            log_filter: "regchan=info".to_string(),
        }
    }
}

impl RegulatoryConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: RegulatoryConfig = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a YAML configuration file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| RegulatoryError::config_error(path.to_path_buf(), e))
            .with_context(|| format!("reading regulatory config {}", path.display()))?;
        let config = Self::from_yaml_str(&yaml)
            .with_context(|| format!("parsing regulatory config {}", path.display()))?;
        debug!(path = %path.display(), "Loaded regulatory config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let bands = self.band_capability.value();
        if bands == 0 || bands & !band::ALL != 0 {
            return Err(RegulatoryError::invalid_input(format!(
                "band capability {bands:#x} selects no known band"
            )));
        }
        if self.enable_srd_chan_in_master_mode & !SRD_MASTER_MODE_ALL != 0 {
            return Err(RegulatoryError::invalid_input(format!(
                "SRD master mode mask {:#x} has unknown bits",
                self.enable_srd_chan_in_master_mode
            )));
        }
        EnvFilter::try_new(&self.log_filter)
            .map_err(|e| RegulatoryError::parse_error("log filter", e.to_string()))?;
        Ok(())
    }
}

/// Frequency range and mode capabilities of one radio, read once at
/// interface creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct HardwareCapability {
    pub low_2g_freq: u32,
    pub high_2g_freq: u32,
    pub low_5g_freq: u32,
    pub high_5g_freq: u32,
    #[serde(default)]
    pub wireless_modes: u64,
}

impl Default for HardwareCapability {
    fn default() -> Self {
        Self {
            low_2g_freq: 2312,
            high_2g_freq: 2732,
            low_5g_freq: 4900,
            high_5g_freq: 5935,
            wireless_modes: 0,
        }
    }
}

impl HardwareCapability {
    pub fn validate(&self) -> Result<()> {
        if self.low_2g_freq >= self.high_2g_freq || self.low_5g_freq >= self.high_5g_freq {
            return Err(RegulatoryError::invalid_input(format!(
                "hardware frequency range is empty: 2G {}-{}, 5G {}-{}",
                self.low_2g_freq, self.high_2g_freq, self.low_5g_freq, self.high_5g_freq
            )));
        }
        Ok(())
    }
}

/// Install a `fmt` subscriber filtered by `filter`.
///
/// A subscriber installed earlier is left in place.
pub fn init_tracing(filter: &str) -> Result<()> {
    let filter = EnvFilter::try_new(filter)
        .map_err(|e| RegulatoryError::parse_error("log filter", e.to_string()))?;
    if tracing_subscriber::fmt().with_env_filter(filter).try_init().is_err() {
        debug!("Tracing subscriber already installed");
    }
    Ok(())
}
