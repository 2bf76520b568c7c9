//! Bonded channel state and width fallback.
//!
//! A bonded group spans adjacent 20 MHz channels four channel numbers apart.
//! Its state is the worst state of any member, further reduced to `Disable`
//! when the primary channel does not allow the requested width.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::list::ChannelList;
use crate::types::{Band, ChannelParams, ChannelState, ChannelWidth, SecondaryChannelOffset};

/// Inclusive range of primary channel numbers forming one bonded channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct BondedGroup {
    pub start_ch: u16,
    pub end_ch: u16,
}

impl BondedGroup {
    const fn new(start_ch: u16, end_ch: u16) -> Self {
        Self { start_ch, end_ch }
    }

    pub fn contains(&self, ch: u16) -> bool {
        self.start_ch <= ch && ch <= self.end_ch
    }

    /// Center channel number of the group.
    pub fn center(&self) -> u16 {
        (self.start_ch + self.end_ch) / 2
    }

    /// Member channel numbers.
    pub fn members(&self) -> impl Iterator<Item = u16> {
        (self.start_ch..=self.end_ch).step_by(4)
    }
}

pub const BONDED_40MHZ: [BondedGroup; 13] = [
    BondedGroup::new(36, 40),
    BondedGroup::new(44, 48),
    BondedGroup::new(52, 56),
    BondedGroup::new(60, 64),
    BondedGroup::new(100, 104),
    BondedGroup::new(108, 112),
    BondedGroup::new(116, 120),
    BondedGroup::new(124, 128),
    BondedGroup::new(132, 136),
    BondedGroup::new(140, 144),
    BondedGroup::new(149, 153),
    BondedGroup::new(157, 161),
    BondedGroup::new(165, 169),
];

pub const BONDED_80MHZ: [BondedGroup; 6] = [
    BondedGroup::new(36, 48),
    BondedGroup::new(52, 64),
    BondedGroup::new(100, 112),
    BondedGroup::new(116, 128),
    BondedGroup::new(132, 144),
    BondedGroup::new(149, 161),
];

pub const BONDED_160MHZ: [BondedGroup; 2] =
    [BondedGroup::new(36, 64), BondedGroup::new(100, 128)];

/// Bonded group holding `ch` at `width`. 80+80 segments use the 80 MHz table.
pub fn bonded_group(ch: u16, width: ChannelWidth) -> Option<&'static BondedGroup> {
    let groups: &'static [BondedGroup] = match width {
        ChannelWidth::W40 => &BONDED_40MHZ,
        ChannelWidth::W80 | ChannelWidth::W80P80 => &BONDED_80MHZ,
        ChannelWidth::W160 => &BONDED_160MHZ,
        _ => return None,
    };
    groups.iter().find(|g| g.contains(ch))
}

/// Band of a legacy channel number: 14 and below is 2.4 GHz.
pub fn channel_to_band(ch: u16) -> Band {
    if ch <= 14 { Band::TwoG } else { Band::FiveG }
}

/// Default 2.4 GHz secondary channel for 40 MHz operation.
pub fn default_secondary_2g(ch: u16) -> Option<u16> {
    match ch {
        1..=5 => Some(ch + 4),
        6..=13 => Some(ch - 4),
        _ => None,
    }
}

fn single_state(list: &ChannelList, ch: u16) -> ChannelState {
    list.by_number(ch).map(|c| c.state).unwrap_or(ChannelState::Invalid)
}

/// Whether the primary channel's bandwidth range admits `width`.
fn width_allowed(list: &ChannelList, ch: u16, width: ChannelWidth) -> Option<bool> {
    let chan = list.by_number(ch)?;
    if width == ChannelWidth::W5 {
        return Some(true);
    }
    let bw = width.segment_mhz();
    Some(chan.min_bw <= bw && bw <= chan.max_bw)
}

/// State of a 5 GHz operation on primary `ch` at `width`.
pub fn bonded_5g_state(list: &ChannelList, ch: u16, width: ChannelWidth) -> ChannelState {
    let state = match width {
        ChannelWidth::Max | ChannelWidth::Invalid => return ChannelState::Invalid,
        ChannelWidth::W20 | ChannelWidth::W10 | ChannelWidth::W5 => single_state(list, ch),
        _ => match bonded_group(ch, width) {
            Some(group) => group
                .members()
                .map(|member| single_state(list, member))
                .min()
                .unwrap_or(ChannelState::Invalid),
            None => ChannelState::Invalid,
        },
    };

    if matches!(state, ChannelState::Invalid | ChannelState::Disable) {
        return state;
    }

    match width_allowed(list, ch, width) {
        None => ChannelState::Invalid,
        Some(true) => state,
        Some(false) => ChannelState::Disable,
    }
}

/// State of a 2.4 GHz operation on primary `ch` at `width`; 40 MHz requires
/// `sec_ch` to be four channels above or below.
pub fn bonded_2g_state(
    list: &ChannelList,
    ch: u16,
    sec_ch: Option<u16>,
    width: ChannelWidth,
) -> ChannelState {
    if matches!(width, ChannelWidth::Max | ChannelWidth::Invalid) || width.mhz() > 40 {
        return ChannelState::Invalid;
    }

    let mut secondary = ChannelState::Enable;
    if width == ChannelWidth::W40 {
        let Some(sec) = sec_ch.filter(|&s| s.abs_diff(ch) == 4) else {
            return ChannelState::Invalid;
        };
        secondary = single_state(list, sec);
        if secondary == ChannelState::Invalid {
            return secondary;
        }
    }

    let state = single_state(list, ch).combine(secondary);
    if matches!(state, ChannelState::Invalid | ChannelState::Disable) {
        return state;
    }

    match width_allowed(list, ch, width) {
        None => ChannelState::Invalid,
        Some(true) => state,
        Some(false) => ChannelState::Disable,
    }
}

/// Bonded state dispatched by band of the primary channel.
pub fn bonded_channel_state(
    list: &ChannelList,
    ch: u16,
    width: ChannelWidth,
    sec_ch_2g: Option<u16>,
) -> ChannelState {
    match channel_to_band(ch) {
        Band::TwoG => bonded_2g_state(list, ch, sec_ch_2g, width),
        _ => bonded_5g_state(list, ch, width),
    }
}

/// Widest usable parameters at or below `requested.width` for primary `ch`.
///
/// The returned width is `Invalid` when no width is usable.
pub fn channel_params(
    list: &ChannelList,
    ch: u16,
    sec_ch_2g: Option<u16>,
    requested: ChannelParams,
) -> ChannelParams {
    let params = match channel_to_band(ch) {
        Band::TwoG => channel_params_2g(list, ch, sec_ch_2g, requested),
        _ => channel_params_5g(list, ch, requested),
    };
    debug!(
        ch,
        width = ?params.width,
        seg0 = params.center_freq_seg0,
        seg1 = params.center_freq_seg1,
        "Resolved channel parameters"
    );
    params
}

fn channel_params_5g(list: &ChannelList, ch: u16, requested: ChannelParams) -> ChannelParams {
    let mut params = requested;
    if params.width == ChannelWidth::Max {
        params.width = if params.center_freq_seg1 != 0 {
            ChannelWidth::W80P80
        } else {
            ChannelWidth::W160
        };
    }

    while params.width != ChannelWidth::Invalid {
        let mut state = bonded_5g_state(list, ch, params.width);
        if params.width == ChannelWidth::W80P80 {
            let seg1_primary = params.center_freq_seg1.saturating_sub(2);
            state = state.combine(bonded_5g_state(list, seg1_primary, ChannelWidth::W80));
        }

        if state.is_usable() {
            if params.width.is_narrow() {
                params.sec_ch_offset = SecondaryChannelOffset::NoSecondary;
                params.center_freq_seg0 = ch;
                break;
            }
            if let (Some(group), Some(pair)) =
                (bonded_group(ch, params.width), bonded_group(ch, ChannelWidth::W40))
            {
                params.sec_ch_offset = if ch == pair.start_ch {
                    SecondaryChannelOffset::LowPrimary
                } else {
                    SecondaryChannelOffset::HighPrimary
                };
                params.center_freq_seg0 = group.center();
                break;
            }
        }
        params.width = params.width.next_lower();
    }

    if params.width == ChannelWidth::W160 {
        params.center_freq_seg1 = params.center_freq_seg0;
        if let Some(half) = bonded_group(ch, ChannelWidth::W80) {
            params.center_freq_seg0 = half.center();
        }
    }

    if !matches!(params.width, ChannelWidth::W160 | ChannelWidth::W80P80) {
        params.center_freq_seg1 = 0;
    }

    params
}

fn channel_params_2g(
    list: &ChannelList,
    ch: u16,
    sec_ch_2g: Option<u16>,
    requested: ChannelParams,
) -> ChannelParams {
    let mut params = requested;
    if params.width == ChannelWidth::Max {
        params.width = ChannelWidth::W40;
    }

    let mut sec_ch = sec_ch_2g;
    if params.width.mhz() > 20 && sec_ch.is_none() {
        sec_ch = default_secondary_2g(ch);
    }

    while params.width != ChannelWidth::Invalid {
        if bonded_2g_state(list, ch, sec_ch, params.width) == ChannelState::Enable {
            match (params.width, sec_ch) {
                (ChannelWidth::W40, Some(sec)) => {
                    params.sec_ch_offset = if ch < sec {
                        SecondaryChannelOffset::LowPrimary
                    } else {
                        SecondaryChannelOffset::HighPrimary
                    };
                    params.center_freq_seg0 = (ch + sec) / 2;
                }
                _ => {
                    params.sec_ch_offset = SecondaryChannelOffset::NoSecondary;
                    params.center_freq_seg0 = ch;
                }
            }
            break;
        }
        params.width = params.width.next_lower();
    }

    params.center_freq_seg1 = 0;
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::{ToggleSet, compose_current_list};
    use crate::master::build_master_list;
    use crate::test_utils::{fcc_info, wide_open_info};

    fn current(info: &crate::types::RegulatoryInfo) -> ChannelList {
        let master = build_master_list(info).unwrap();
        compose_current_list(&master, &ToggleSet::default(), None).list
    }

    #[test]
    fn group_tables_are_consistent() {
        for group in BONDED_40MHZ.iter().chain(&BONDED_80MHZ).chain(&BONDED_160MHZ) {
            assert_eq!((group.end_ch - group.start_ch) % 4, 0);
        }
        assert_eq!(bonded_group(40, ChannelWidth::W40).unwrap().center(), 38);
        assert_eq!(bonded_group(44, ChannelWidth::W80).unwrap().center(), 42);
        assert_eq!(bonded_group(64, ChannelWidth::W160).unwrap().center(), 50);
        assert!(bonded_group(165, ChannelWidth::W80).is_none());
        assert!(bonded_group(36, ChannelWidth::W20).is_none());
    }

    #[test]
    fn group_state_is_member_minimum() {
        let list = current(&fcc_info());
        // 52-64 is radar, 36-48 is not
        assert_eq!(bonded_5g_state(&list, 36, ChannelWidth::W80), ChannelState::Enable);
        assert_eq!(bonded_5g_state(&list, 56, ChannelWidth::W80), ChannelState::Dfs);
        assert_eq!(bonded_5g_state(&list, 36, ChannelWidth::W160), ChannelState::Dfs);
        assert_eq!(bonded_5g_state(&list, 169, ChannelWidth::W40), ChannelState::Disable);
    }

    #[test]
    fn unknown_group_fails_closed() {
        let list = current(&fcc_info());
        assert_eq!(bonded_5g_state(&list, 165, ChannelWidth::W80), ChannelState::Invalid);
        assert_eq!(bonded_5g_state(&list, 37, ChannelWidth::W20), ChannelState::Invalid);
        assert_eq!(bonded_5g_state(&list, 36, ChannelWidth::Max), ChannelState::Invalid);
    }

    #[test]
    fn primary_width_bounds_are_enforced() {
        let mut info = fcc_info();
        info.max_bw_5g = 40;
        let list = current(&info);
        assert_eq!(bonded_5g_state(&list, 36, ChannelWidth::W40), ChannelState::Enable);
        assert_eq!(bonded_5g_state(&list, 36, ChannelWidth::W80), ChannelState::Disable);
        assert_eq!(bonded_5g_state(&list, 36, ChannelWidth::W5), ChannelState::Enable);
    }

    #[test]
    fn two_g_bonding() {
        let list = current(&fcc_info());
        assert_eq!(bonded_2g_state(&list, 1, Some(5), ChannelWidth::W40), ChannelState::Enable);
        assert_eq!(bonded_2g_state(&list, 1, Some(6), ChannelWidth::W40), ChannelState::Invalid);
        assert_eq!(bonded_2g_state(&list, 1, None, ChannelWidth::W40), ChannelState::Invalid);
        assert_eq!(bonded_2g_state(&list, 1, None, ChannelWidth::W80), ChannelState::Invalid);
        assert_eq!(bonded_2g_state(&list, 6, None, ChannelWidth::W20), ChannelState::Enable);
        // 14 is disabled under the FCC rules
        assert_eq!(bonded_2g_state(&list, 10, Some(14), ChannelWidth::W40), ChannelState::Disable);
    }

    #[test]
    fn out_of_range_secondary_is_invalid() {
        let list = current(&fcc_info());
        assert_eq!(
            bonded_2g_state(&list, 6, Some(u16::MAX), ChannelWidth::W40),
            ChannelState::Invalid
        );
        assert_eq!(
            bonded_channel_state(&list, 6, ChannelWidth::W40, Some(u16::MAX)),
            ChannelState::Invalid
        );
        assert_eq!(
            bonded_2g_state(&list, u16::MAX, Some(6), ChannelWidth::W40),
            ChannelState::Invalid
        );
    }

    #[test]
    fn channel_14_never_bonds() {
        let list = current(&wide_open_info());
        assert_eq!(list.by_number(14).unwrap().state, ChannelState::Enable);
        assert_eq!(bonded_2g_state(&list, 14, Some(10), ChannelWidth::W40), ChannelState::Disable);

        let params = channel_params(&list, 14, None, ChannelParams::request(ChannelWidth::W40));
        assert_eq!(params.width, ChannelWidth::W20);
        assert_eq!(params.center_freq_seg0, 14);
    }

    #[test]
    fn default_secondary_channels() {
        assert_eq!(default_secondary_2g(1), Some(5));
        assert_eq!(default_secondary_2g(5), Some(9));
        assert_eq!(default_secondary_2g(6), Some(2));
        assert_eq!(default_secondary_2g(13), Some(9));
        assert_eq!(default_secondary_2g(14), None);
    }

    #[test]
    fn params_5g_fall_back_from_max() {
        let list = current(&fcc_info());

        // 36-64 contains radar channels but DFS is usable
        let p = channel_params(&list, 36, None, ChannelParams::request(ChannelWidth::Max));
        assert_eq!(p.width, ChannelWidth::W160);
        assert_eq!(p.center_freq_seg1, 50);
        assert_eq!(p.center_freq_seg0, 42);
        assert_eq!(p.sec_ch_offset, SecondaryChannelOffset::LowPrimary);

        let p = channel_params(&list, 153, None, ChannelParams::request(ChannelWidth::Max));
        assert_eq!(p.width, ChannelWidth::W80);
        assert_eq!(p.center_freq_seg0, 155);
        assert_eq!(p.center_freq_seg1, 0);
        assert_eq!(p.sec_ch_offset, SecondaryChannelOffset::HighPrimary);

        let p = channel_params(&list, 165, None, ChannelParams::request(ChannelWidth::W80));
        assert_eq!(p.width, ChannelWidth::W20);
        assert_eq!(p.center_freq_seg0, 165);
    }

    #[test]
    fn params_80p80_combines_segments() {
        let list = current(&fcc_info());
        let p = channel_params(&list, 36, None, ChannelParams::request_80p80(106));
        assert_eq!(p.width, ChannelWidth::W80P80);
        assert_eq!(p.center_freq_seg0, 42);
        assert_eq!(p.center_freq_seg1, 106);

        // No 80 MHz group around 169, fall back to 160
        let p = channel_params(&list, 36, None, ChannelParams::request_80p80(171));
        assert_eq!(p.width, ChannelWidth::W160);
    }

    #[test]
    fn params_2g_pick_secondary() {
        let list = current(&fcc_info());
        let p = channel_params(&list, 1, None, ChannelParams::request(ChannelWidth::Max));
        assert_eq!(p.width, ChannelWidth::W40);
        assert_eq!(p.sec_ch_offset, SecondaryChannelOffset::LowPrimary);
        assert_eq!(p.center_freq_seg0, 3);

        let p = channel_params(&list, 11, None, ChannelParams::request(ChannelWidth::W40));
        assert_eq!(p.sec_ch_offset, SecondaryChannelOffset::HighPrimary);
        assert_eq!(p.center_freq_seg0, 9);
        assert_eq!(p.center_freq_seg1, 0);
    }

    #[test]
    fn band_of_channel_number() {
        assert_eq!(channel_to_band(1), Band::TwoG);
        assert_eq!(channel_to_band(14), Band::TwoG);
        assert_eq!(channel_to_band(36), Band::FiveG);
    }
}
