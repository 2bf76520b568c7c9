//! Master channel list construction.
//!
//! The master list is the regulatory-only view of a radio: every table slot
//! resolved against the rule set of the current country, before any runtime
//! filter is applied. It is rebuilt from scratch on each regulatory update
//! and is read-only afterwards.

use std::ops::Range;

use tracing::{debug, trace};

use crate::list::ChannelList;
use crate::table::{ChannelTable, RANGE_2G, RANGE_49G, RANGE_5G};
use crate::types::{
    Alpha2, ChannelState, DfsRegion, RegRule, RegulatoryInfo, reg_flags::channel,
};
use crate::{RegulatoryError, Result};

/// Maximum number of rules accepted across both bands of one update.
pub const MAX_REG_RULES: usize = 10;

/// Regulatory-only channel list of one radio and the domain it was built for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterChannelList {
    pub list: ChannelList,
    pub country: Alpha2,
    pub country_code: u16,
    pub reg_dmn_pair: u16,
    pub dfs_region: DfsRegion,
    pub etsi13: bool,
}

impl MasterChannelList {
    /// List of a radio that has not received a regulatory update yet:
    /// world domain, global table, every channel disabled.
    pub fn unconfigured() -> Self {
        Self {
            list: ChannelList::disabled(ChannelTable::for_dfs_region(DfsRegion::Undef)),
            country: Alpha2::WORLD,
            country_code: 0,
            reg_dmn_pair: 0,
            dfs_region: DfsRegion::Uninit,
            etsi13: false,
        }
    }
}

/// Rules after region clamping and 5 GHz auto-bandwidth correction, as used
/// by [`build_master_list`]. Returns `(rules_2g, rules_5g)`.
pub fn effective_rules(info: &RegulatoryInfo) -> (Vec<RegRule>, Vec<RegRule>) {
    let mut rules_2g = info.rules_2g.clone();
    let mut rules_5g = info.rules_5g.clone();

    clamp_max_bw(&mut rules_2g, info.max_bw_2g);
    clamp_max_bw(&mut rules_5g, info.max_bw_5g);
    auto_bw_correction(&mut rules_5g, info.max_bw_5g);

    (rules_2g, rules_5g)
}

/// Build the master list for a regulatory update.
///
/// Fails with `TooManyRules` or `InvalidInput` without side effects; an empty
/// rule set for a band is not an error and leaves that band disabled.
pub fn build_master_list(info: &RegulatoryInfo) -> Result<MasterChannelList> {
    if info.rule_count() > MAX_REG_RULES {
        return Err(RegulatoryError::too_many_rules(info.rule_count()));
    }
    info.validate()?;

    let table = ChannelTable::for_dfs_region(info.dfs_region);
    let mut list = ChannelList::disabled(table);
    let (rules_2g, rules_5g) = effective_rules(info);

    populate_band(&mut list, RANGE_2G, &rules_2g, info.min_bw_2g, true);
    populate_band(&mut list, RANGE_5G, &rules_5g, info.min_bw_5g, false);
    populate_band(&mut list, RANGE_49G, &rules_5g, info.min_bw_5g, false);

    let enabled = list.iter().filter(|c| c.state != ChannelState::Disable).count();
    debug!(
        phy_id = info.phy_id,
        country = %info.alpha2,
        region = ?table.region(),
        rules_2g = rules_2g.len(),
        rules_5g = rules_5g.len(),
        enabled,
        "Built master channel list"
    );

    Ok(MasterChannelList {
        list,
        country: info.alpha2,
        country_code: info.country_code,
        reg_dmn_pair: info.reg_dmn_pair,
        dfs_region: info.dfs_region,
        etsi13: info.etsi13,
    })
}

fn clamp_max_bw(rules: &mut [RegRule], max_bw: u16) {
    for rule in rules {
        rule.max_bw = rule.max_bw.min(max_bw);
    }
}

/// Widen adjacent touching rules whose combined bandwidth fits the region.
fn auto_bw_correction(rules: &mut [RegRule], max_bw: u16) {
    for i in 1..rules.len() {
        let (prev, next) = (rules[i - 1], rules[i]);
        let combined = prev.max_bw.saturating_add(next.max_bw);
        if prev.end_freq == next.start_freq && combined <= max_bw {
            rules[i - 1].max_bw = combined;
            rules[i].max_bw = combined;
        }
    }
}

fn populate_band(
    list: &mut ChannelList,
    range: Range<usize>,
    rules: &[RegRule],
    min_reg_bw: u16,
    is_2g: bool,
) {
    let table = list.table();

    for idx in range {
        let Some(entry) = table.entry(idx) else { continue };
        if entry.number.is_none() {
            continue;
        }

        let min_bw = min_reg_bw.max(entry.min_bw).max(1);
        let mut bw = entry.max_bw.min(20);
        let mut found = None;
        while bw >= min_bw {
            if let Some(rule) = rules.iter().find(|r| r.admits(entry.center_freq, bw)) {
                found = Some(rule);
                break;
            }
            bw /= 2;
        }

        let Some(rule) = found else {
            trace!(freq = entry.center_freq, "No rule admits channel");
            continue;
        };

        let chan = &mut list.channels_mut()[idx];
        chan.max_bw = bw;
        chan.flags.remove(channel::DISABLED);
        chan.tx_power = rule.reg_power;
        chan.ant_gain = rule.ant_gain;
        chan.state = ChannelState::Enable;

        if rule.flags.has_flag(channel::NO_IR) {
            chan.flags.insert(channel::NO_IR);
            chan.state = ChannelState::Dfs;
        }
        if rule.flags.has_flag(channel::RADAR) {
            chan.flags.insert(channel::RADAR);
            chan.state = ChannelState::Dfs;
        }
        if rule.flags.has_flag(channel::INDOOR_ONLY) {
            chan.flags.insert(channel::INDOOR_ONLY);
        }
        if rule.flags.has_flag(channel::NO_OFDM) {
            chan.flags.insert(channel::NO_OFDM);
        }

        chan.min_bw = min_bw;
        if bw == 20 {
            chan.max_bw = rule.max_bw.min(entry.max_bw);
        }

        if is_2g && chan.max_bw < 20 {
            chan.disable();
        }

        trace!(
            freq = chan.center_freq,
            state = ?chan.state,
            min_bw = chan.min_bw,
            max_bw = chan.max_bw,
            "Channel admitted"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{etsi_info, fcc_info};
    use proptest::prelude::*;

    fn chan(master: &MasterChannelList, number: u16) -> crate::types::Channel {
        *master.list.by_number(number).unwrap()
    }

    #[test]
    fn fcc_master_list_resolves_rules() {
        let _ = tracing_subscriber::fmt::try_init();
        let master = build_master_list(&fcc_info()).unwrap();

        let ch1 = chan(&master, 1);
        assert_eq!(ch1.state, ChannelState::Enable);
        assert_eq!((ch1.min_bw, ch1.max_bw), (20, 40));

        let ch14 = chan(&master, 14);
        assert_eq!(ch14.state, ChannelState::Disable);

        let ch52 = chan(&master, 52);
        assert_eq!(ch52.state, ChannelState::Dfs);
        assert!(ch52.flags.has_flag(channel::RADAR));

        let ch36 = chan(&master, 36);
        assert_eq!(ch36.state, ChannelState::Enable);
        assert_eq!(ch36.tx_power, 23);
    }

    #[test]
    fn empty_5g_rules_disable_5g_only() {
        let mut info = fcc_info();
        info.rules_5g.clear();
        let master = build_master_list(&info).unwrap();

        assert!(master.list.channels()[RANGE_5G].iter().all(|c| c.is_disabled()));
        assert!(master.list.channels()[RANGE_49G].iter().all(|c| c.is_disabled()));
        assert_eq!(chan(&master, 6).state, ChannelState::Enable);
    }

    #[test]
    fn too_many_rules_rejected() {
        let mut info = fcc_info();
        info.rules_5g = vec![RegRule::new(5170, 5250, 80, 23); MAX_REG_RULES];
        let err = build_master_list(&info).unwrap_err();
        assert!(matches!(err, RegulatoryError::TooManyRules { max: MAX_REG_RULES, .. }));
    }

    #[test]
    fn rules_are_clamped_to_region_max() {
        let mut info = fcc_info();
        info.max_bw_5g = 40;
        info.rules_5g = vec![RegRule::new(5170, 5250, 160, 23)];
        let master = build_master_list(&info).unwrap();
        assert_eq!(chan(&master, 36).max_bw, 40);
    }

    #[test]
    fn auto_bw_correction_merges_touching_rules() {
        let mut rules = vec![
            RegRule::new(5170, 5250, 40, 23),
            RegRule::new(5250, 5330, 40, 23),
            RegRule::new(5490, 5730, 160, 23),
        ];
        auto_bw_correction(&mut rules, 160);
        assert_eq!(rules[0].max_bw, 80);
        assert_eq!(rules[1].max_bw, 80);
        assert_eq!(rules[2].max_bw, 160);

        let mut capped = vec![RegRule::new(5170, 5250, 80, 23), RegRule::new(5250, 5330, 80, 23)];
        auto_bw_correction(&mut capped, 80);
        assert_eq!(capped[0].max_bw, 80);
        assert_eq!(capped[1].max_bw, 80);
    }

    #[test]
    fn first_matching_rule_wins() {
        let mut info = fcc_info();
        info.rules_5g = vec![
            RegRule::new(5170, 5250, 80, 17),
            RegRule::new(5170, 5330, 80, 30).with_flags(channel::RADAR),
        ];
        let master = build_master_list(&info).unwrap();
        let ch36 = chan(&master, 36);
        assert_eq!(ch36.tx_power, 17);
        assert_eq!(ch36.state, ChannelState::Enable);
        assert_eq!(chan(&master, 52).tx_power, 30);
    }

    #[test]
    fn narrow_public_safety_channels_use_5g_rules() {
        let mut info = fcc_info();
        info.min_bw_5g = 5;
        info.rules_5g.push(RegRule::new(4940, 4990, 20, 20));
        let master = build_master_list(&info).unwrap();

        let ch = master.list.by_freq(4942).unwrap();
        assert_eq!(ch.number, Some(1));
        assert_eq!(ch.state, ChannelState::Enable);
        assert_eq!((ch.min_bw, ch.max_bw), (5, 5));

        let ch20 = master.list.by_freq(4950).unwrap();
        assert_eq!((ch20.min_bw, ch20.max_bw), (10, 20));

        // Unnumbered slots are never populated
        assert!(master.list.by_freq(4912).unwrap().is_disabled());
    }

    #[test]
    fn indoor_and_no_ofdm_flags_are_copied() {
        let mut info = etsi_info();
        info.rules_2g = vec![RegRule::new(2402, 2482, 40, 20).with_flags(channel::NO_OFDM)];
        let master = build_master_list(&info).unwrap();
        assert!(chan(&master, 36).flags.has_flag(channel::INDOOR_ONLY));
        assert_eq!(chan(&master, 36).state, ChannelState::Enable);
        assert!(chan(&master, 6).flags.has_flag(channel::NO_OFDM));
    }

    #[test]
    fn unconfigured_list_is_all_disabled() {
        let master = MasterChannelList::unconfigured();
        assert!(master.list.iter().all(|c| c.is_disabled()));
        assert!(master.country.is_world());
    }

    prop_compose! {
        fn arb_info()(
            dfs_region in prop::sample::select(vec![
                DfsRegion::Fcc, DfsRegion::Etsi, DfsRegion::Mkk, DfsRegion::Cn, DfsRegion::Undef,
            ]),
            rules_5g in prop::collection::vec(
                (4900u32..5900, 10u32..400, prop::sample::select(vec![5u16, 10, 20, 40, 80, 160]), any::<u32>()),
                0..6,
            ),
            max_bw_5g in prop::sample::select(vec![20u16, 40, 80, 160]),
            min_bw_5g in prop::sample::select(vec![5u16, 10, 20]),
        ) -> RegulatoryInfo {
            let mut info = fcc_info();
            info.dfs_region = dfs_region;
            info.max_bw_5g = max_bw_5g;
            info.min_bw_5g = min_bw_5g;
            info.rules_5g = rules_5g
                .into_iter()
                .map(|(start, span, bw, flags)| {
                    RegRule::new(start, start + span, bw, 20).with_flags(flags & channel::RULE_MASK)
                })
                .collect();
            info
        }
    }

    proptest! {
        #[test]
        fn prop_master_list_invariants(info in arb_info()) {
            let master = build_master_list(&info).unwrap();
            let (rules_2g, rules_5g) = effective_rules(&info);

            for (idx, ch) in master.list.channels().iter().enumerate() {
                prop_assert!(ch.min_bw <= ch.max_bw);
                prop_assert_eq!(ch.is_disabled(), ch.flags.is_disabled());

                if ch.is_disabled() {
                    continue;
                }
                let rules = if RANGE_2G.contains(&idx) { &rules_2g } else { &rules_5g };
                let searched_bw = ch.max_bw.min(20);
                prop_assert!(
                    rules.iter().any(|r| r.admits(ch.center_freq, searched_bw)),
                    "channel {} at {} MHz has no admitting rule", idx, ch.center_freq
                );
                prop_assert!(
                    rules.iter().any(|r| r.admits(ch.center_freq, searched_bw) && r.max_bw >= ch.max_bw)
                );
            }
        }

        #[test]
        fn prop_master_build_is_deterministic(info in arb_info()) {
            let a = build_master_list(&info).unwrap();
            let b = build_master_list(&info).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
