//! Current channel list composition.
//!
//! The current list of a logical interface is always derived from a fresh
//! copy of the radio's master list by an ordered chain of narrowing filters.
//! No filter re-enables a channel the master list disabled, so composing the
//! same inputs twice yields identical output.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::{HardwareCapability, RegulatoryConfig};
use crate::list::ChannelList;
use crate::master::MasterChannelList;
use crate::table::{
    CHAN_12_CENTER_FREQ, CHAN_13_CENTER_FREQ, CHAN_144_CENTER_FREQ, RANGE_2G, RANGE_49G,
    RANGE_5G,
};
use crate::types::{BandCapability, Channel, ChannelChange, ChannelState, reg_flags::channel};

/// Transmit power cap on channel 12 under the FCC constraint, dBm.
pub const MAX_PWR_FCC_CHAN_12: i16 = 8;
/// Transmit power cap on channel 13 under the FCC constraint, dBm.
pub const MAX_PWR_FCC_CHAN_13: i16 = 2;
/// First center frequency of the ETSI13 SRD sub-band.
pub const ETSI13_SRD_START_FREQ: u32 = 5745;
/// Last center frequency of the ETSI13 SRD sub-band.
pub const ETSI13_SRD_END_FREQ: u32 = 5865;

/// Runtime state of one logical interface that shapes its current list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct ToggleSet {
    pub dfs_enabled: bool,
    pub band_capability: BandCapability,
    pub indoor_chan_enabled: bool,
    pub set_fcc_channel: bool,
    pub en_chan_144: bool,
    pub force_ssc_disable_indoor: bool,
    pub sap_active: bool,
    /// Cached-disable list is enforced
    pub disable_cached_channels: bool,
    pub cached_channels: Vec<u16>,
    /// Channel numbers on the non-occupancy list
    pub nol: BTreeSet<u16>,
    pub nol_history: BTreeSet<u16>,
    /// Master modes allowed on ETSI13 SRD channels, see `reg_flags::srd_master_mode`
    pub srd_master_mode: u8,
    pub hw: HardwareCapability,
}

impl ToggleSet {
    /// Initial toggles of an interface created under `config` on hardware `hw`.
    pub fn from_config(config: &RegulatoryConfig, hw: HardwareCapability) -> Self {
        Self {
            dfs_enabled: config.dfs_enabled,
            band_capability: config.band_capability,
            indoor_chan_enabled: config.indoor_chan_enabled,
            set_fcc_channel: config.set_fcc_channel,
            en_chan_144: config.en_chan_144,
            force_ssc_disable_indoor: config.force_ssc_disable_indoor_channel,
            sap_active: false,
            disable_cached_channels: false,
            cached_channels: Vec::new(),
            nol: BTreeSet::new(),
            nol_history: BTreeSet::new(),
            srd_master_mode: config.enable_srd_chan_in_master_mode,
            hw,
        }
    }
}

impl Default for ToggleSet {
    fn default() -> Self {
        Self::from_config(&RegulatoryConfig::default(), HardwareCapability::default())
    }
}

/// Output of one composition pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composition {
    pub list: ChannelList,
    /// Slots whose state differs from the previous current list
    pub changes: Vec<ChannelChange>,
}

/// Compose the current list from `master` and `toggles`.
///
/// `previous` is the interface's last current list; when absent every slot
/// that is not disabled counts as changed.
pub fn compose_current_list(
    master: &MasterChannelList,
    toggles: &ToggleSet,
    previous: Option<&ChannelList>,
) -> Composition {
    let mut list = master.list.clone();
    let chans = list.channels_mut();

    apply_freq_range(chans, &toggles.hw);
    apply_band(chans, toggles.band_capability);
    apply_dfs(chans, toggles.dfs_enabled);
    apply_nol(&master.list, chans, toggles);
    apply_indoor(chans, toggles);
    apply_fcc(chans, toggles.set_fcc_channel);
    apply_chan_144(chans, toggles.en_chan_144);
    apply_cached(chans, toggles);
    apply_srd(chans, master.etsi13, toggles.srd_master_mode);

    let changes = match previous {
        Some(prev) => diff(prev, &list),
        None => list
            .iter()
            .enumerate()
            .filter(|(_, c)| c.state != ChannelState::Disable)
            .map(|(index, c)| ChannelChange {
                index,
                number: c.number,
                center_freq: c.center_freq,
                from: ChannelState::Disable,
                to: c.state,
            })
            .collect(),
    };

    Composition { list, changes }
}

/// Slots whose state differs between two lists of the same layout.
pub fn diff(previous: &ChannelList, next: &ChannelList) -> Vec<ChannelChange> {
    previous
        .iter()
        .zip(next.iter())
        .enumerate()
        .filter(|(_, (a, b))| a.state != b.state || a.center_freq != b.center_freq)
        .map(|(index, (a, b))| ChannelChange {
            index,
            number: b.number,
            center_freq: b.center_freq,
            from: a.state,
            to: b.state,
        })
        .collect()
}

/// Lowest slot fitting above `low_freq`, trimming its bandwidth when only
/// its narrowest width fits.
fn low_limit(chans: &mut [Channel], low_freq: u32) -> Option<usize> {
    for (idx, chan) in chans.iter_mut().enumerate() {
        let center = chan.center_freq;
        if center - u32::from(chan.min_bw) / 2 >= low_freq {
            if center - u32::from(chan.max_bw) / 2 < low_freq {
                let mut max_bw = chan.max_bw;
                if max_bw <= 20 {
                    max_bw = ((center - low_freq) * 2) as u16;
                }
                chan.max_bw = max_bw.max(chan.min_bw);
            }
            return Some(idx);
        }
    }
    None
}

fn high_limit(chans: &mut [Channel], high_freq: u32) -> Option<usize> {
    for (idx, chan) in chans.iter_mut().enumerate().rev() {
        let center = chan.center_freq;
        if center + u32::from(chan.min_bw) / 2 <= high_freq {
            if center + u32::from(chan.max_bw) / 2 > high_freq {
                let mut max_bw = chan.max_bw;
                if max_bw <= 20 {
                    max_bw = ((high_freq - center) * 2) as u16;
                }
                chan.max_bw = max_bw.max(chan.min_bw);
            }
            return Some(idx);
        }
    }
    None
}

fn apply_freq_range(chans: &mut [Channel], hw: &HardwareCapability) {
    let low_2g = low_limit(chans, hw.low_2g_freq);
    let low_5g = low_limit(chans, hw.low_5g_freq);
    let high_2g = high_limit(chans, hw.high_2g_freq);
    let high_5g = high_limit(chans, hw.high_5g_freq);

    let within = |idx: usize, low: Option<usize>, high: Option<usize>| match (low, high) {
        (Some(lo), Some(hi)) => lo <= idx && idx <= hi,
        _ => false,
    };

    for (idx, chan) in chans.iter_mut().enumerate() {
        if !within(idx, low_2g, high_2g) && !within(idx, low_5g, high_5g) {
            chan.disable();
        }
    }
}

fn apply_band(chans: &mut [Channel], band: BandCapability) {
    if !band.supports_2g() {
        chans[RANGE_2G].iter_mut().for_each(Channel::disable);
    }
    if !band.supports_5g() {
        chans[RANGE_49G].iter_mut().for_each(Channel::disable);
        chans[RANGE_5G].iter_mut().for_each(Channel::disable);
    }
}

fn apply_dfs(chans: &mut [Channel], dfs_enabled: bool) {
    if dfs_enabled {
        return;
    }
    for chan in chans.iter_mut().filter(|c| c.state == ChannelState::Dfs) {
        chan.disable();
    }
}

fn apply_nol(master: &ChannelList, chans: &mut [Channel], toggles: &ToggleSet) {
    let table = master.table();
    for &number in &toggles.nol_history {
        if let Some(idx) = table.index_of_channel(number) {
            chans[idx].nol_history = true;
        }
    }
    for &number in &toggles.nol {
        if let Some(idx) = table.index_of_channel(number) {
            chans[idx].nol = true;
        }
    }
    for chan in chans.iter_mut().filter(|c| c.nol) {
        chan.disable();
    }
}

fn apply_indoor(chans: &mut [Channel], toggles: &ToggleSet) {
    let indoor = |c: &&mut Channel| c.flags.has_flag(channel::INDOOR_ONLY);

    if !toggles.indoor_chan_enabled {
        for chan in chans.iter_mut().filter(indoor) {
            if chan.state != ChannelState::Disable {
                chan.make_passive();
            }
        }
    }

    if toggles.force_ssc_disable_indoor && toggles.sap_active {
        chans.iter_mut().filter(indoor).for_each(|c| c.disable());
    }
}

fn apply_fcc(chans: &mut [Channel], set_fcc_channel: bool) {
    if !set_fcc_channel {
        return;
    }
    for chan in chans.iter_mut() {
        match chan.center_freq {
            CHAN_12_CENTER_FREQ => chan.tx_power = chan.tx_power.min(MAX_PWR_FCC_CHAN_12),
            CHAN_13_CENTER_FREQ => chan.tx_power = chan.tx_power.min(MAX_PWR_FCC_CHAN_13),
            _ => {}
        }
    }
}

fn apply_chan_144(chans: &mut [Channel], en_chan_144: bool) {
    if en_chan_144 {
        return;
    }
    for chan in chans.iter_mut().filter(|c| c.center_freq == CHAN_144_CENTER_FREQ) {
        chan.disable();
    }
}

fn apply_cached(chans: &mut [Channel], toggles: &ToggleSet) {
    if !toggles.disable_cached_channels || toggles.cached_channels.is_empty() {
        return;
    }
    for chan in chans.iter_mut() {
        if chan.number.is_some_and(|n| toggles.cached_channels.contains(&n)) {
            chan.disable();
        }
    }
}

fn apply_srd(chans: &mut [Channel], etsi13: bool, srd_master_mode: u8) {
    if !etsi13 || srd_master_mode != 0 {
        return;
    }
    for chan in chans[RANGE_5G].iter_mut() {
        if chan.flags.is_disabled() || chan.number.is_none() {
            continue;
        }
        if (ETSI13_SRD_START_FREQ..=ETSI13_SRD_END_FREQ).contains(&chan.center_freq) {
            trace!(freq = chan.center_freq, "SRD channel made passive");
            chan.make_passive();
        }
    }
}
