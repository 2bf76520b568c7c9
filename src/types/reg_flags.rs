//! Constants for regulatory channel and rule flag bits
//!
//! Rules and channels share one bit layout so rule flags can be copied onto
//! a channel without translation.

// Channel and rule flags
pub mod channel {
    pub const DISABLED: u32 = 0x0001; // channel unusable
    pub const NO_IR: u32 = 0x0002; // no initiating radiation, passive only
    pub const RADAR: u32 = 0x0008; // radar detection required
    pub const NO_OFDM: u32 = 0x0040;
    pub const INDOOR_ONLY: u32 = 0x0200;

    /// Bits a regulatory rule may carry onto a channel.
    pub const RULE_MASK: u32 = NO_IR | RADAR | NO_OFDM | INDOOR_ONLY;
}

// Master-mode operating modes allowed on ETSI13 SRD channels
pub mod srd_master_mode {
    pub const SAP: u8 = 0x01;
    pub const P2P_GO: u8 = 0x02;
    pub const NAN: u8 = 0x04;
}

// Radio band capability bits
pub mod band {
    pub const BAND_2G: u8 = 0x01;
    pub const BAND_5G: u8 = 0x02;
    pub const BAND_6G: u8 = 0x04; // accepted, no 6 GHz table entries
    pub const ALL: u8 = BAND_2G | BAND_5G | BAND_6G;
}
