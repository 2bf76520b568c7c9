#![allow(dead_code)]

use std::sync::Arc;

use regchan::types::reg_flags::channel;
use regchan::{Alpha2, DfsRegion, Engine, HardwareCapability, Interface, RegRule, RegulatoryInfo};

pub fn init_logging() {
    let _ = tracing_subscriber::fmt::try_init();
}

pub fn fcc_info() -> RegulatoryInfo {
    RegulatoryInfo {
        phy_id: 0,
        country_code: 840,
        reg_dmn_pair: 0x3a,
        dfs_region: DfsRegion::Fcc,
        alpha2: Alpha2::new("US").unwrap(),
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

pub fn etsi_info() -> RegulatoryInfo {
    RegulatoryInfo {
        phy_id: 0,
        country_code: 276,
        reg_dmn_pair: 0x37,
        dfs_region: DfsRegion::Etsi,
        alpha2: Alpha2::new("DE").unwrap(),
        etsi13: true,
        rules_2g: vec![RegRule::new(2402, 2482, 40, 20)],
        rules_5g: vec![
            RegRule::new(5170, 5250, 80, 23).with_flags(channel::INDOOR_ONLY),
            RegRule::new(5250, 5350, 80, 20).with_flags(channel::RADAR),
            RegRule::new(5490, 5710, 160, 27).with_flags(channel::RADAR),
            RegRule::new(5725, 5875, 80, 14),
        ],
        min_bw_2g: 20,
        max_bw_2g: 40,
        min_bw_5g: 20,
        max_bw_5g: 160,
    }
}

/// Engine with radio 0 configured by `info` and one interface on it.
pub fn engine_with(info: &RegulatoryInfo) -> (Arc<Engine>, Arc<Interface>) {
    let engine = Arc::new(Engine::default());
    engine.add_radio(info.phy_id, HardwareCapability::default()).unwrap();
    engine.apply_regulatory_update(info).unwrap();
    let iface = engine.create_interface(info.phy_id).unwrap();
    (engine, iface)
}
