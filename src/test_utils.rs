//! Regulatory fixtures shared by unit tests, integration tests and benchmarks.
//!
//! The rule sets are simplified versions of real domains. They stay within
//! `MAX_REG_RULES` with room to spare so property tests can append rules.

#![cfg(any(test, feature = "benchmark"))]

use crate::types::{Alpha2, DfsRegion, RegRule, RegulatoryInfo, reg_flags::channel};

/// FCC domain: radar on U-NII-2A and U-NII-2C, no rule covering channel 14.
pub fn fcc_info() -> RegulatoryInfo {
    RegulatoryInfo {
        phy_id: 0,
        country_code: 840,
        reg_dmn_pair: 0x3a,
        dfs_region: DfsRegion::Fcc,
        alpha2: Alpha2::new("US").unwrap_or(Alpha2::WORLD),
        etsi13: false,
        rules_2g: vec![RegRule::new(2402, 2482, 40, 30)],
        rules_5g: vec![
            RegRule::new(5170, 5250, 80, 23),
            RegRule::new(5250, 5330, 80, 23).with_flags(channel::RADAR),
            RegRule::new(5490, 5730, 160, 23).with_flags(channel::RADAR),
            RegRule::new(5735, 5835, 80, 30),
        ],
        min_bw_2g: 20,
        max_bw_2g: 40,
        min_bw_5g: 20,
        max_bw_5g: 160,
    }
}

/// ETSI13 domain: indoor-only U-NII-1 and an SRD rule up to 5875 MHz.
pub fn etsi_info() -> RegulatoryInfo {
    RegulatoryInfo {
        phy_id: 0,
        country_code: 276,
        reg_dmn_pair: 0x37,
        dfs_region: DfsRegion::Etsi,
        alpha2: Alpha2::new("DE").unwrap_or(Alpha2::WORLD),
        etsi13: true,
        rules_2g: vec![RegRule::new(2402, 2482, 40, 20)],
        rules_5g: vec![
            RegRule::new(5170, 5250, 80, 23).with_flags(channel::INDOOR_ONLY),
            RegRule::new(5250, 5330, 80, 20).with_flags(channel::RADAR),
            RegRule::new(5490, 5710, 160, 27).with_flags(channel::RADAR),
            RegRule::new(5725, 5875, 80, 14),
        ],
        min_bw_2g: 20,
        max_bw_2g: 40,
        min_bw_5g: 20,
        max_bw_5g: 160,
    }
}

/// FCC 5 GHz rules with a 2.4 GHz rule wide enough for channel 14.
pub fn wide_open_info() -> RegulatoryInfo {
    RegulatoryInfo {
        rules_2g: vec![RegRule::new(2402, 2494, 40, 20)],
        ..fcc_info()
    }
}

/// Japan domain, 2.4 GHz only; selects the Japan table.
pub fn mkk_info() -> RegulatoryInfo {
    RegulatoryInfo {
        phy_id: 0,
        country_code: 392,
        reg_dmn_pair: 0x40,
        dfs_region: DfsRegion::Mkk,
        alpha2: Alpha2::new("JP").unwrap_or(Alpha2::WORLD),
        etsi13: false,
        rules_2g: vec![RegRule::new(2402, 2494, 40, 20)],
        rules_5g: Vec::new(),
        min_bw_2g: 20,
        max_bw_2g: 40,
        min_bw_5g: 20,
        max_bw_5g: 160,
    }
}

/// `info` retargeted at radio `phy_id`.
pub fn on_phy(info: RegulatoryInfo, phy_id: u8) -> RegulatoryInfo {
    RegulatoryInfo { phy_id, ..info }
}
