//! Static per-region channel tables.
//!
//! Every region shares the same 97 slots in ascending frequency order:
//! fourteen 2.4 GHz channels, the 4.9/5.0 GHz public-safety block and the
//! 5 GHz channels up to 5920 MHz. Regions differ only in which slots carry a
//! legacy channel number and in the default bandwidth of the 4.9 GHz block.

use std::ops::Range;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::types::{Band, DfsRegion};

/// Number of slots in every channel table.
pub const NUM_CHANNELS: usize = 97;

/// Slot range of the 2.4 GHz band.
pub const RANGE_2G: Range<usize> = 0..14;
/// Slot range of the 4.9 GHz and 5.0 GHz public-safety block.
pub const RANGE_49G: Range<usize> = 14..56;
/// Slot range of the 5 GHz band.
pub const RANGE_5G: Range<usize> = 56..NUM_CHANNELS;

/// Center frequency of channel 12, constrained under the FCC power rule.
pub const CHAN_12_CENTER_FREQ: u32 = 2467;
/// Center frequency of channel 13, constrained under the FCC power rule.
pub const CHAN_13_CENTER_FREQ: u32 = 2472;
/// Center frequency of channel 144.
pub const CHAN_144_CENTER_FREQ: u32 = 5720;

const FREQS_49G: [u32; 42] = [
    4912, 4915, 4917, 4920, 4922, 4925, 4927, 4932, 4935, 4937, 4940, 4942, 4945, 4947, 4950,
    4952, 4955, 4957, 4960, 4962, 4965, 4967, 4970, 4972, 4975, 4977, 4980, 4982, 4985, 4987,
    5032, 5035, 5037, 5040, 5042, 5045, 5047, 5052, 5055, 5057, 5060, 5080,
];

const FREQS_5G: [u32; 26] = [
    5180, 5200, 5220, 5240, 5260, 5280, 5300, 5320, 5500, 5520, 5540, 5560, 5580, 5600, 5620,
    5640, 5660, 5680, 5700, 5720, 5745, 5765, 5785, 5805, 5825, 5845,
];

/// First and last center frequency of the 5.9 GHz tail, 5 MHz apart.
const TAIL_5G: (u32, u32) = (5850, 5920);

/// Lowest 5 GHz center frequency.
pub const MIN_5G_FREQ: u32 = FREQS_5G[0];
/// Highest 5 GHz center frequency.
pub const MAX_5G_FREQ: u32 = TAIL_5G.1;

// (freq, number, min_bw, max_bw)
const US_OVERRIDES: &[(u32, u16, u16, u16)] = &[
    (4942, 1, 5, 5),
    (4945, 11, 10, 10),
    (4947, 2, 5, 5),
    (4950, 20, 10, 20),
    (4952, 3, 5, 5),
    (4955, 21, 10, 20),
    (4957, 4, 5, 5),
    (4960, 22, 10, 20),
    (4962, 5, 5, 5),
    (4965, 23, 10, 20),
    (4967, 6, 5, 5),
    (4970, 24, 10, 20),
    (4972, 7, 5, 5),
    (4975, 25, 10, 20),
    (4977, 8, 5, 5),
    (4980, 26, 10, 20),
    (4982, 9, 5, 5),
    (4985, 19, 10, 10),
    (4987, 10, 5, 5),
];

const JP_OVERRIDES: &[(u32, u16, u16, u16)] = &[
    (4912, 182, 5, 5),
    (4915, 183, 10, 10),
    (4917, 183, 5, 5),
    (4920, 184, 10, 20),
    (4922, 184, 5, 5),
    (4925, 185, 10, 10),
    (4927, 185, 5, 5),
    (4932, 186, 5, 5),
    (4935, 187, 10, 10),
    (4937, 187, 5, 5),
    (4940, 188, 10, 20),
    (4942, 188, 5, 5),
    (4945, 189, 10, 10),
    (4947, 189, 5, 5),
    (4960, 192, 20, 20),
    (4980, 196, 20, 20),
    (5032, 6, 5, 5),
    (5035, 7, 10, 10),
    (5037, 7, 5, 5),
    (5040, 8, 10, 20),
    (5042, 8, 5, 5),
    (5045, 9, 10, 10),
    (5047, 9, 5, 5),
    (5052, 10, 5, 5),
    (5055, 11, 10, 10),
    (5057, 11, 5, 5),
    (5060, 12, 20, 20),
    (5080, 16, 20, 20),
];

/// Regional variant of the channel table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum TableRegion {
    Global,
    Us,
    Eu,
    Japan,
    China,
}

impl TableRegion {
    /// Table variant used for a DFS region. Uninitialised and undefined
    /// regions fall back to the global table.
    pub fn for_dfs_region(region: DfsRegion) -> Self {
        match region {
            DfsRegion::Fcc => TableRegion::Us,
            DfsRegion::Etsi | DfsRegion::Kr => TableRegion::Eu,
            DfsRegion::Mkk => TableRegion::Japan,
            DfsRegion::Cn => TableRegion::China,
            DfsRegion::Uninit | DfsRegion::Undef => {
                warn!(?region, "No channel table for DFS region, using global table");
                TableRegion::Global
            }
        }
    }
}

/// Default values of one table slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct TableEntry {
    pub center_freq: u32,
    /// `None` when the slot has no legacy number in this region
    pub number: Option<u16>,
    pub min_bw: u16,
    pub max_bw: u16,
}

/// Immutable channel table for one region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelTable {
    region: TableRegion,
    entries: Vec<TableEntry>,
}

static GLOBAL: LazyLock<ChannelTable> = LazyLock::new(|| ChannelTable::build(TableRegion::Global));
static US: LazyLock<ChannelTable> = LazyLock::new(|| ChannelTable::build(TableRegion::Us));
static EU: LazyLock<ChannelTable> = LazyLock::new(|| ChannelTable::build(TableRegion::Eu));
static JAPAN: LazyLock<ChannelTable> = LazyLock::new(|| ChannelTable::build(TableRegion::Japan));
static CHINA: LazyLock<ChannelTable> = LazyLock::new(|| ChannelTable::build(TableRegion::China));

impl ChannelTable {
    /// Process-wide table for a region variant.
    pub fn get(region: TableRegion) -> &'static ChannelTable {
        match region {
            TableRegion::Global => &*GLOBAL,
            TableRegion::Us => &*US,
            TableRegion::Eu => &*EU,
            TableRegion::Japan => &*JAPAN,
            TableRegion::China => &*CHINA,
        }
    }

    /// Table selected by a DFS region.
    pub fn for_dfs_region(region: DfsRegion) -> &'static ChannelTable {
        Self::get(TableRegion::for_dfs_region(region))
    }

    fn build(region: TableRegion) -> Self {
        let mut entries = Vec::with_capacity(NUM_CHANNELS);

        for number in 1..=13u16 {
            let center_freq = 2407 + 5 * u32::from(number);
            entries.push(TableEntry { center_freq, number: Some(number), min_bw: 20, max_bw: 40 });
        }
        entries.push(TableEntry { center_freq: 2484, number: Some(14), min_bw: 20, max_bw: 20 });

        for center_freq in FREQS_49G {
            entries.push(TableEntry { center_freq, number: None, min_bw: 2, max_bw: 20 });
        }

        for center_freq in FREQS_5G {
            entries.push(TableEntry {
                center_freq,
                number: Some(five_g_number(center_freq)),
                min_bw: 2,
                max_bw: 160,
            });
        }

        for center_freq in (TAIL_5G.0..=TAIL_5G.1).step_by(5) {
            let number = match region {
                TableRegion::Us => Some(five_g_number(center_freq)),
                TableRegion::Eu if center_freq == 5865 || center_freq >= 5875 => {
                    Some(five_g_number(center_freq))
                }
                TableRegion::Global if center_freq == 5865 => Some(five_g_number(center_freq)),
                _ => None,
            };
            entries.push(TableEntry { center_freq, number, min_bw: 2, max_bw: 160 });
        }

        let overrides = match region {
            TableRegion::Us => US_OVERRIDES,
            TableRegion::Japan => JP_OVERRIDES,
            _ => &[],
        };
        for &(freq, number, min_bw, max_bw) in overrides {
            if let Some(entry) = entries.iter_mut().find(|e| e.center_freq == freq) {
                *entry = TableEntry { center_freq: freq, number: Some(number), min_bw, max_bw };
            }
        }

        debug_assert_eq!(entries.len(), NUM_CHANNELS);
        Self { region, entries }
    }

    pub fn region(&self) -> TableRegion {
        self.region
    }

    pub fn entries(&self) -> &[TableEntry] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&TableEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Slot holding `number`. Unnumbered slots never match; when a number
    /// repeats the lowest slot wins.
    pub fn index_of_channel(&self, number: u16) -> Option<usize> {
        self.entries.iter().position(|e| e.number == Some(number))
    }

    /// Slot whose center frequency is exactly `freq`.
    pub fn index_of_freq(&self, freq: u32) -> Option<usize> {
        self.entries.binary_search_by_key(&freq, |e| e.center_freq).ok()
    }

    /// Band of the slot at `index`.
    pub fn band_of(index: usize) -> Option<Band> {
        if RANGE_2G.contains(&index) {
            Some(Band::TwoG)
        } else if RANGE_49G.contains(&index) {
            Some(Band::FourNine)
        } else if RANGE_5G.contains(&index) {
            Some(Band::FiveG)
        } else {
            None
        }
    }
}

fn five_g_number(center_freq: u32) -> u16 {
    ((center_freq - 5000) / 5) as u16
}
