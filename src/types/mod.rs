//! Core types for regulatory channel state.
//!
//! This module holds the data model shared by the table, master builder,
//! compositor and query layers.
//!
//! ## Overview
//!
//! - [`Channel`] is one slot of a master or current channel list
//! - [`ChannelState`] orders `Invalid < Disable < Dfs < Enable`; group state is the minimum
//! - [`ChannelFlags`] is the rule/channel flag bitset, bits live in [`reg_flags`]
//! - [`RegRule`] and [`RegulatoryInfo`] describe the input of a regulatory update
//! - [`ChannelWidth`] and [`ChannelParams`] describe bonded operation
//!
//! ## Usage Example
//!
//! ```rust
//! use regchan::types::{ChannelState, RegRule, reg_flags::channel};
//!
//! let rule = RegRule::new(5250, 5330, 80, 23).with_flags(channel::RADAR);
//! assert!(rule.admits(5260, 20));
//! assert!(!rule.admits(5240, 20));
//!
//! assert_eq!(ChannelState::Enable.combine(ChannelState::Dfs), ChannelState::Dfs);
//! ```

mod band;
mod channel;
mod country;
mod flags;
pub mod reg_flags;
mod rule;
mod state;
mod width;

// Re-export all public types
pub use band::{Band, DfsRegion, OpMode, RestartBeaconing};
pub use channel::{Channel, ChannelChange, ChannelPower};
pub use country::{
    Alpha2, DEFAULT_WORLD_REGDMN, is_us_alpha2, is_world_alpha2, is_world_country_code,
};
pub use flags::{BandCapability, ChannelFlags};
pub use rule::{AvoidFreqIndication, AvoidFreqList, AvoidFreqRange, RegRule, RegulatoryInfo};
pub use state::ChannelState;
pub use width::{ChannelParams, ChannelWidth, SecondaryChannelOffset};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RegulatoryError;
    use proptest::prelude::*;

    prop_compose! {
        fn arb_state()(idx in 0usize..4) -> ChannelState {
            [ChannelState::Invalid, ChannelState::Disable, ChannelState::Dfs, ChannelState::Enable][idx]
        }
    }

    prop_compose! {
        fn arb_rule()(
            start in 2400u32..5900,
            span in 1u32..200,
            max_bw in prop::sample::select(vec![5u16, 10, 20, 40, 80, 160]),
            power in -10i16..36,
            flags in any::<u32>(),
        ) -> RegRule {
            RegRule::new(start, start + span, max_bw, power).with_flags(flags)
        }
    }

    proptest! {
        #[test]
        fn prop_combine_is_commutative_and_never_improves(a in arb_state(), b in arb_state()) {
            let combined = a.combine(b);
            prop_assert_eq!(combined, b.combine(a));
            prop_assert!(combined <= a);
            prop_assert!(combined <= b);
        }

        #[test]
        fn prop_width_fallback_terminates(start in prop::sample::select(vec![
            ChannelWidth::Max, ChannelWidth::W80P80, ChannelWidth::W160, ChannelWidth::W80,
            ChannelWidth::W40, ChannelWidth::W20, ChannelWidth::W10, ChannelWidth::W5,
        ])) {
            let mut width = start;
            let mut steps = 0;
            while width != ChannelWidth::Invalid {
                let next = width.next_lower();
                if next != ChannelWidth::Invalid {
                    prop_assert!(next.mhz() <= width.mhz());
                }
                width = next;
                steps += 1;
                prop_assert!(steps <= 8);
            }
        }

        #[test]
        fn prop_admitted_span_lies_inside_rule(rule in arb_rule(), center in 2400u32..6000, bw in prop::sample::select(vec![5u16, 10, 20, 40])) {
            if rule.admits(center, bw) {
                let half = u32::from(bw) / 2;
                prop_assert!(rule.start_freq <= center - half);
                prop_assert!(center + half <= rule.end_freq);
                prop_assert!(rule.max_bw >= bw);
            }
        }

        #[test]
        fn prop_flag_insert_remove(bits in any::<u32>(), flag in prop::sample::select(vec![
            reg_flags::channel::DISABLED, reg_flags::channel::NO_IR, reg_flags::channel::RADAR,
            reg_flags::channel::NO_OFDM, reg_flags::channel::INDOOR_ONLY,
        ])) {
            let mut flags = ChannelFlags::new(bits);
            flags.insert(flag);
            prop_assert!(flags.has_flag(flag));
            flags.remove(flag);
            prop_assert!(!flags.has_flag(flag));
            prop_assert_eq!(flags.value() | flag, bits | flag);
        }
    }

    fn sample_info() -> RegulatoryInfo {
        RegulatoryInfo {
            phy_id: 0,
            country_code: 840,
            reg_dmn_pair: 0x3a,
            dfs_region: DfsRegion::Fcc,
            alpha2: Alpha2::new("US").unwrap(),
            etsi13: false,
            rules_2g: vec![RegRule::new(2402, 2472, 40, 30)],
            rules_5g: vec![RegRule::new(5170, 5250, 80, 23)],
            min_bw_2g: 20,
            max_bw_2g: 40,
            min_bw_5g: 20,
            max_bw_5g: 160,
        }
    }

    #[test]
    fn regulatory_info_validation() {
        assert!(sample_info().validate().is_ok());

        let mut too_many = sample_info();
        too_many.rules_5g = vec![RegRule::new(5170, 5250, 80, 23); 10];
        assert!(matches!(
            too_many.validate(),
            Err(RegulatoryError::TooManyRules { count: 11, .. })
        ));

        let mut empty_range = sample_info();
        empty_range.rules_2g[0].end_freq = empty_range.rules_2g[0].start_freq;
        assert!(matches!(empty_range.validate(), Err(RegulatoryError::InvalidInput { .. })));

        let mut no_rules = sample_info();
        no_rules.rules_2g.clear();
        no_rules.rules_5g.clear();
        assert!(no_rules.validate().is_ok());
    }

    #[test]
    fn alpha2_parsing_and_world_checks() {
        let us = Alpha2::new("us").unwrap();
        assert_eq!(us.to_string(), "US");
        assert!(is_us_alpha2(&us));
        assert!(!us.is_world());
        assert!(Alpha2::WORLD.is_world());
        assert!(Alpha2::new("USA").is_err());
        assert_eq!(us.with_table_octet(0x02).table_octet(), 0x02);

        assert!(is_world_country_code(0x60));
        assert!(is_world_country_code(0x6f));
        assert!(!is_world_country_code(0x70));
        assert!(!is_world_country_code(840));
    }

    #[test]
    fn alpha2_serializes_as_string() {
        let yaml = serde_yaml_ng::to_string(&Alpha2::new("JP").unwrap()).unwrap();
        assert_eq!(yaml.trim(), "JP");
        let parsed: Alpha2 = serde_yaml_ng::from_str("DE").unwrap();
        assert_eq!(parsed.letters(), *b"DE");
        assert!(serde_yaml_ng::from_str::<Alpha2>("D").is_err());
    }

    #[test]
    fn channel_disable_keeps_flag_in_step() {
        let mut ch = Channel::disabled(5180, Some(36), 20, 160);
        assert!(ch.is_disabled());
        assert!(ch.flags.is_disabled());

        ch.state = ChannelState::Enable;
        ch.flags.remove(reg_flags::channel::DISABLED);
        ch.make_passive();
        assert_eq!(ch.state, ChannelState::Dfs);
        assert!(ch.flags.has_flag(reg_flags::channel::NO_IR));

        ch.disable();
        assert!(ch.flags.is_disabled());
    }

    #[test]
    fn band_capability_bits() {
        assert!(BandCapability::ALL.supports_2g());
        assert!(BandCapability::ALL.supports_5g());
        assert!(!BandCapability::TWO_G_ONLY.supports_5g());
        assert!(!BandCapability::FIVE_G_ONLY.supports_2g());
        assert_eq!(BandCapability::default(), BandCapability::ALL);
    }
}
