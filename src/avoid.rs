//! LTE coexistence avoid ranges.

use tracing::{debug, warn};

use crate::list::ChannelList;
use crate::table::{MAX_5G_FREQ, MIN_5G_FREQ, NUM_CHANNELS};
use crate::types::{AvoidFreqIndication, AvoidFreqList, RestartBeaconing};

/// Ranges retained under `policy`.
///
/// `Restart24gOnly` drops every range starting in the 5 GHz band.
pub fn retained_ranges(ranges: &AvoidFreqList, policy: RestartBeaconing) -> AvoidFreqList {
    let ranges = ranges
        .ranges
        .iter()
        .filter(|r| {
            let skip = policy == RestartBeaconing::Restart24gOnly
                && (MIN_5G_FREQ..=MAX_5G_FREQ).contains(&r.start_freq);
            if skip {
                debug!(start = r.start_freq, end = r.end_freq, "Skipping 5 GHz avoid range");
            }
            !skip
        })
        .copied()
        .collect();
    AvoidFreqList { ranges }
}

/// Channel numbers of every slot centered within an avoid range.
///
/// Ranges whose endpoints do not both map to a channel number are ignored.
pub fn unsafe_channels(list: &ChannelList, ranges: &AvoidFreqList) -> Vec<u16> {
    let entries = list.table().entries();
    let mut unsafe_channels = Vec::new();

    for range in &ranges.ranges {
        let start_ch = list.freq_to_channel(range.start_freq);
        let end_ch = list.freq_to_channel(range.end_freq);
        debug!(
            start_freq = range.start_freq,
            ?start_ch,
            end_freq = range.end_freq,
            ?end_ch,
            "Avoid range"
        );
        if start_ch.is_none() || end_ch.is_none() {
            continue;
        }

        let numbers = entries
            .iter()
            .filter(|e| (range.start_freq..=range.end_freq).contains(&e.center_freq))
            .filter_map(|e| e.number);
        for number in numbers {
            if unsafe_channels.len() >= NUM_CHANNELS {
                warn!("LTE coexistence unsafe channel list full");
                return unsafe_channels;
            }
            unsafe_channels.push(number);
        }
    }

    unsafe_channels
}

/// Avoid hint for one coexistence event.
pub fn indication(
    list: &ChannelList,
    ranges: &AvoidFreqList,
    policy: RestartBeaconing,
) -> AvoidFreqIndication {
    let ranges = retained_ranges(ranges, policy);
    let unsafe_channels = unsafe_channels(list, &ranges);
    AvoidFreqIndication { ranges, unsafe_channels }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{ChannelTable, TableRegion};
    use crate::types::AvoidFreqRange;

    fn global_list() -> ChannelList {
        ChannelList::disabled(ChannelTable::get(TableRegion::Global))
    }

    fn ranges(pairs: &[(u32, u32)]) -> AvoidFreqList {
        AvoidFreqList {
            ranges: pairs
                .iter()
                .map(|&(start_freq, end_freq)| AvoidFreqRange { start_freq, end_freq })
                .collect(),
        }
    }

    #[test]
    fn channels_between_endpoints_are_unsafe() {
        let list = global_list();
        let unsafe_ch = unsafe_channels(&list, &ranges(&[(2412, 2437)]));
        assert_eq!(unsafe_ch, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn interior_endpoints_round_inward() {
        let list = global_list();
        // 2415 interpolates to channel 1, 2440 to channel 6
        let unsafe_ch = unsafe_channels(&list, &ranges(&[(2415, 2440)]));
        assert_eq!(unsafe_ch, vec![2, 3, 4, 5, 6]);
    }

    #[test]
    fn unmapped_endpoints_skip_the_range() {
        let list = global_list();
        assert!(unsafe_channels(&list, &ranges(&[(2300, 2437)])).is_empty());
        assert!(unsafe_channels(&list, &ranges(&[(6000, 6100)])).is_empty());
    }

    #[test]
    fn restart_24g_only_drops_5g_ranges() {
        let list = global_list();
        let input = ranges(&[(2412, 2422), (5180, 5240)]);

        let all = indication(&list, &input, RestartBeaconing::Restart);
        assert_eq!(all.ranges.ranges.len(), 2);
        assert_eq!(all.unsafe_channels, vec![1, 2, 3, 36, 40, 44, 48]);

        let only_2g = indication(&list, &input, RestartBeaconing::Restart24gOnly);
        assert_eq!(only_2g.ranges, ranges(&[(2412, 2422)]));
        assert_eq!(only_2g.unsafe_channels, vec![1, 2, 3]);
    }
}
