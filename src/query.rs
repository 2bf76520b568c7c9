//! Read accessors over a channel list

use crate::bonded::channel_to_band;
use crate::compose::{ETSI13_SRD_END_FREQ, ETSI13_SRD_START_FREQ};
use crate::list::ChannelList;
use crate::table::{CHAN_12_CENTER_FREQ, CHAN_13_CENTER_FREQ, ChannelTable, RANGE_2G, RANGE_5G};
use crate::types::{
    Band, ChannelPower, ChannelState, OpMode, reg_flags::channel, reg_flags::srd_master_mode,
};

/// Channel spacing assumed when interpolating between table slots, MHz.
const CHANNEL_SPACING_MHZ: u32 = 5;

impl ChannelList {
    /// State of legacy channel `ch`; `Invalid` when the table has no such number.
    pub fn channel_state(&self, ch: u16) -> ChannelState {
        self.by_number(ch).map(|c| c.state).unwrap_or(ChannelState::Invalid)
    }

    pub fn is_dfs(&self, ch: u16) -> bool {
        self.channel_state(ch) == ChannelState::Dfs
    }

    pub fn is_disabled(&self, ch: u16) -> bool {
        self.channel_state(ch) == ChannelState::Disable
    }

    pub fn is_passive_or_disabled(&self, ch: u16) -> bool {
        matches!(self.channel_state(ch), ChannelState::Dfs | ChannelState::Disable)
    }

    /// Channel carries the radar flag, whatever its current state.
    pub fn has_dfs_attribute(&self, ch: u16) -> bool {
        self.by_number(ch).is_some_and(|c| c.flags.has_flag(channel::RADAR))
    }

    pub fn channel_reg_power(&self, ch: u16) -> Option<i16> {
        self.by_number(ch).map(|c| c.tx_power)
    }

    /// Center frequency of the slot carrying `ch`, without interpolation.
    pub fn channel_freq(&self, ch: u16) -> Option<u32> {
        self.by_number(ch).map(|c| c.center_freq)
    }

    /// Numbered channels that are neither disabled nor invalid, with power.
    pub fn channels_with_power(&self) -> Vec<ChannelPower> {
        self.iter()
            .filter(|c| c.state.is_usable())
            .filter_map(|c| {
                c.number.map(|number| ChannelPower {
                    number,
                    center_freq: c.center_freq,
                    tx_power: c.tx_power,
                })
            })
            .collect()
    }

    /// Legacy channel number of `freq`.
    ///
    /// Frequencies between two numbered slots of the same band interpolate
    /// at 5 MHz per channel number; anything else is `None`.
    pub fn freq_to_channel(&self, freq: u32) -> Option<u16> {
        if freq == 0 {
            return None;
        }
        let entries = self.table().entries();
        let idx = entries.partition_point(|e| e.center_freq < freq);
        let entry = entries.get(idx)?;

        if entry.center_freq == freq {
            return entry.number;
        }
        if idx == 0 || ChannelTable::band_of(idx - 1) != ChannelTable::band_of(idx) {
            return None;
        }

        let prev = &entries[idx - 1];
        let (Some(prev_number), Some(_)) = (prev.number, entry.number) else {
            return None;
        };
        let offset = (freq - prev.center_freq) / CHANNEL_SPACING_MHZ;
        u16::try_from(offset).ok().map(|o| prev_number + o)
    }

    /// Center frequency of legacy channel `ch`.
    ///
    /// Numbers missing from the table interpolate from the closest lower
    /// numbered 2.4 GHz or 5 GHz slot; the 4.9 GHz block is never used.
    pub fn channel_to_freq(&self, ch: u16) -> Option<u32> {
        if ch == 0 {
            return None;
        }
        let table = self.table();
        if let Some(freq) = table.index_of_channel(ch).and_then(|i| table.entry(i)) {
            return Some(freq.center_freq);
        }

        for range in [RANGE_2G, RANGE_5G] {
            let band = &table.entries()[range];
            let Some(pos) = band.iter().position(|e| e.number.is_some_and(|n| n >= ch)) else {
                continue;
            };
            let prev_number = pos.checked_sub(1).and_then(|p| band[p].number)?;
            let prev = &band[pos - 1];
            return Some(prev.center_freq + u32::from(ch - prev_number) * CHANNEL_SPACING_MHZ);
        }
        None
    }

    /// Channel lies in the ETSI13 SRD sub-band of an ETSI13 domain.
    pub fn is_etsi13_srd_channel(&self, etsi13: bool, ch: u16) -> bool {
        if !etsi13 || channel_to_band(ch) != Band::FiveG {
            return false;
        }
        self.channel_to_freq(ch)
            .is_some_and(|f| (ETSI13_SRD_START_FREQ..=ETSI13_SRD_END_FREQ).contains(&f))
    }
}

/// Whether `mode` may operate as master on ETSI13 SRD channels under `mask`.
pub fn srd_allowed_in_master_mode(mask: u8, mode: OpMode) -> bool {
    let bit = match mode {
        OpMode::Sap => srd_master_mode::SAP,
        OpMode::P2pGo => srd_master_mode::P2P_GO,
        OpMode::NanDisc => srd_master_mode::NAN,
        OpMode::Sta => return false,
    };
    mask & bit != 0
}

/// Whether the FCC channel 12/13 power constraint applies to `freq`.
pub fn fcc_constraint_applies(set_fcc_channel: bool, freq: u32) -> bool {
    set_fcc_channel && (freq == CHAN_12_CENTER_FREQ || freq == CHAN_13_CENTER_FREQ)
}
