//! Bitset newtypes for channel flags and band capability

use serde::{Deserialize, Serialize};

use super::reg_flags::{band, channel};

/// Flag bitset carried by rules and channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct ChannelFlags(pub u32);

impl ChannelFlags {
    pub const NONE: ChannelFlags = ChannelFlags(0);

    /// Create a new flag set from raw bits.
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    /// Check if any bit of `flag` is set.
    pub fn has_flag(&self, flag: u32) -> bool {
        (self.0 & flag) != 0
    }

    pub fn insert(&mut self, flag: u32) {
        self.0 |= flag;
    }

    pub fn remove(&mut self, flag: u32) {
        self.0 &= !flag;
    }

    /// Flags with only the bits a rule may propagate.
    pub fn rule_bits(&self) -> Self {
        Self(self.0 & channel::RULE_MASK)
    }

    pub fn is_disabled(&self) -> bool {
        self.has_flag(channel::DISABLED)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl From<u32> for ChannelFlags {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Bands a logical interface is allowed to operate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct BandCapability(pub u8);

impl BandCapability {
    pub const ALL: BandCapability = BandCapability(band::ALL);
    pub const TWO_G_ONLY: BandCapability = BandCapability(band::BAND_2G);
    pub const FIVE_G_ONLY: BandCapability = BandCapability(band::BAND_5G);

    pub fn new(value: u8) -> Self {
        Self(value)
    }

    pub fn supports_2g(&self) -> bool {
        (self.0 & band::BAND_2G) != 0
    }

    pub fn supports_5g(&self) -> bool {
        (self.0 & band::BAND_5G) != 0
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Default for BandCapability {
    fn default() -> Self {
        Self::ALL
    }
}
