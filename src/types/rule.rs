//! Regulatory rules and update payloads

use serde::{Deserialize, Serialize};

use super::{Alpha2, ChannelFlags, DfsRegion};
use crate::master::MAX_REG_RULES;
use crate::{RegulatoryError, Result};

/// One frequency-range rule of a regulatory domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct RegRule {
    pub start_freq: u32,
    pub end_freq: u32,
    pub max_bw: u16,
    pub reg_power: i16,
    #[serde(default)]
    pub ant_gain: u8,
    #[serde(default)]
    pub flags: ChannelFlags,
}

impl RegRule {
    pub fn new(start_freq: u32, end_freq: u32, max_bw: u16, reg_power: i16) -> Self {
        Self { start_freq, end_freq, max_bw, reg_power, ant_gain: 0, flags: ChannelFlags::NONE }
    }

    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags = ChannelFlags::new(flags);
        self
    }

    /// Whether `[center - bw/2, center + bw/2]` lies inside the rule and the
    /// rule allows `bw`.
    pub fn admits(&self, center_freq: u32, bw: u16) -> bool {
        let half = u32::from(bw) / 2;
        center_freq >= half
            && self.start_freq <= center_freq - half
            && self.end_freq >= center_freq + half
            && self.max_bw >= bw
    }
}

/// Result of a regulatory database lookup for one radio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct RegulatoryInfo {
    #[serde(default)]
    pub phy_id: u8,
    pub country_code: u16,
    pub reg_dmn_pair: u16,
    pub dfs_region: DfsRegion,
    pub alpha2: Alpha2,
    /// ETSI13 domain with SRD restrictions on 5745-5865 MHz
    #[serde(default)]
    pub etsi13: bool,
    #[serde(default)]
    pub rules_2g: Vec<RegRule>,
    #[serde(default)]
    pub rules_5g: Vec<RegRule>,
    pub min_bw_2g: u16,
    pub max_bw_2g: u16,
    pub min_bw_5g: u16,
    pub max_bw_5g: u16,
}

impl RegulatoryInfo {
    pub fn rule_count(&self) -> usize {
        self.rules_2g.len() + self.rules_5g.len()
    }

    /// Reject updates that cannot produce a master list.
    pub fn validate(&self) -> Result<()> {
        let count = self.rule_count();
        if count > MAX_REG_RULES {
            return Err(RegulatoryError::too_many_rules(count));
        }

        for rule in self.rules_2g.iter().chain(&self.rules_5g) {
            if rule.start_freq >= rule.end_freq {
                return Err(RegulatoryError::invalid_input(format!(
                    "rule {}-{} MHz has an empty range",
                    rule.start_freq, rule.end_freq
                )));
            }
        }

        if self.min_bw_2g > self.max_bw_2g || self.min_bw_5g > self.max_bw_5g {
            return Err(RegulatoryError::invalid_input(
                "region minimum bandwidth exceeds its maximum",
            ));
        }

        Ok(())
    }
}

/// Frequency range an LTE coexistence report asks the radio to avoid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct AvoidFreqRange {
    pub start_freq: u32,
    pub end_freq: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct AvoidFreqList {
    pub ranges: Vec<AvoidFreqRange>,
}

/// Avoid hint attached to the notifications of one coexistence event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct AvoidFreqIndication {
    pub ranges: AvoidFreqList,
    pub unsafe_channels: Vec<u16>,
}
