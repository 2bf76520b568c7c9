//! Channel width and bonded channel parameters

use serde::{Deserialize, Serialize};

/// Operating channel width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum ChannelWidth {
    W20,
    W40,
    W80,
    W160,
    W80P80,
    W5,
    W10,
    /// Request sentinel: widest width the channel supports
    Max,
    Invalid,
}

impl ChannelWidth {
    /// Width in MHz. 80+80 occupies 160 MHz of spectrum.
    pub fn mhz(self) -> u16 {
        match self {
            ChannelWidth::W20 => 20,
            ChannelWidth::W40 => 40,
            ChannelWidth::W80 => 80,
            ChannelWidth::W160 => 160,
            ChannelWidth::W80P80 => 160,
            ChannelWidth::W5 => 5,
            ChannelWidth::W10 => 10,
            ChannelWidth::Max => 160,
            ChannelWidth::Invalid => 0,
        }
    }

    /// Next narrower width used by fallback loops.
    ///
    /// 80+80 → 160 → 80 → 40 → 20 → 10 → 5 → invalid.
    pub fn next_lower(self) -> ChannelWidth {
        match self {
            ChannelWidth::Max => ChannelWidth::W160,
            ChannelWidth::W80P80 => ChannelWidth::W160,
            ChannelWidth::W160 => ChannelWidth::W80,
            ChannelWidth::W80 => ChannelWidth::W40,
            ChannelWidth::W40 => ChannelWidth::W20,
            ChannelWidth::W20 => ChannelWidth::W10,
            ChannelWidth::W10 => ChannelWidth::W5,
            ChannelWidth::W5 | ChannelWidth::Invalid => ChannelWidth::Invalid,
        }
    }

    /// Width at or below 20 MHz (a single table channel).
    pub fn is_narrow(self) -> bool {
        matches!(self, ChannelWidth::W20 | ChannelWidth::W10 | ChannelWidth::W5)
    }

    /// Bandwidth checked against a primary channel's `[min_bw, max_bw]`.
    ///
    /// 80+80 is two 80 MHz segments, so each is validated at 80.
    pub(crate) fn segment_mhz(self) -> u16 {
        match self {
            ChannelWidth::W80P80 => 80,
            other => other.mhz(),
        }
    }
}

/// Position of the primary channel inside a 40 MHz pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum SecondaryChannelOffset {
    #[default]
    NoSecondary,
    /// Primary is the lower 20 MHz half, secondary above
    LowPrimary,
    /// Primary is the upper 20 MHz half, secondary below
    HighPrimary,
}

/// Resolved parameters for operating on a primary channel.
///
/// Center segments are expressed as channel numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct ChannelParams {
    pub width: ChannelWidth,
    pub sec_ch_offset: SecondaryChannelOffset,
    pub center_freq_seg0: u16,
    pub center_freq_seg1: u16,
}

impl ChannelParams {
    /// Request parameters for `width`, with `seg1` set only for 80+80.
    pub fn request(width: ChannelWidth) -> Self {
        Self {
            width,
            sec_ch_offset: SecondaryChannelOffset::NoSecondary,
            center_freq_seg0: 0,
            center_freq_seg1: 0,
        }
    }

    /// Request 80+80 with the given secondary segment center channel.
    pub fn request_80p80(seg1: u16) -> Self {
        Self { center_freq_seg1: seg1, ..Self::request(ChannelWidth::W80P80) }
    }
}
