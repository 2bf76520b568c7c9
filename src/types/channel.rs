//! Per-channel regulatory state

use serde::{Deserialize, Serialize};

use super::{ChannelFlags, ChannelState, reg_flags::channel};

/// One slot of a master or current channel list.
///
/// Invariants after every build or compose: `min_bw <= max_bw` and
/// `state == Disable` exactly when the `DISABLED` flag is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct Channel {
    pub center_freq: u32,
    /// Legacy channel number; `None` for 4.9 GHz slots not numbered in this region
    pub number: Option<u16>,
    pub min_bw: u16,
    pub max_bw: u16,
    pub state: ChannelState,
    pub flags: ChannelFlags,
    pub tx_power: i16,
    pub ant_gain: u8,
    /// On the non-occupancy list after a radar hit
    pub nol: bool,
    pub nol_history: bool,
}

impl Channel {
    /// A disabled slot carrying the table defaults.
    pub fn disabled(center_freq: u32, number: Option<u16>, min_bw: u16, max_bw: u16) -> Self {
        Self {
            center_freq,
            number,
            min_bw,
            max_bw,
            state: ChannelState::Disable,
            flags: ChannelFlags::new(channel::DISABLED),
            tx_power: 0,
            ant_gain: 0,
            nol: false,
            nol_history: false,
        }
    }

    /// Force the slot to `Disable`, keeping the flag in step.
    pub fn disable(&mut self) {
        self.state = ChannelState::Disable;
        self.flags.insert(channel::DISABLED);
    }

    /// Downgrade a usable slot to passive operation.
    pub fn make_passive(&mut self) {
        self.state = ChannelState::Dfs;
        self.flags.insert(channel::NO_IR);
    }

    pub fn is_disabled(&self) -> bool {
        self.state == ChannelState::Disable
    }
}

/// Channel number and transmit power pair used by scan power reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct ChannelPower {
    pub number: u16,
    pub center_freq: u32,
    pub tx_power: i16,
}

/// A slot whose state differs between two consecutive current lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct ChannelChange {
    pub index: usize,
    pub number: Option<u16>,
    pub center_freq: u32,
    pub from: ChannelState,
    pub to: ChannelState,
}
