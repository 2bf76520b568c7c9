//! Operating class tables.
//!
//! Maps (country, channel, offset) to the operating class advertised in
//! management frames, and back to the class's channel spacing.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::Alpha2;
use crate::{RegulatoryError, Result};

/// Maximum number of operating classes a radio advertises.
pub const MAX_SUPP_OPER_CLASSES: usize = 32;

// Third octet of the country string selecting a table
pub const OP_CLASS_US: u8 = 0x01;
pub const OP_CLASS_EU: u8 = 0x02;
pub const OP_CLASS_JAPAN: u8 = 0x03;
pub const OP_CLASS_GLOBAL: u8 = 0x04;

/// Primary channel position within an operating class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum OpClassOffset {
    Bw20,
    Bw40LowPrimary,
    Bw40HighPrimary,
    Bw80,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OpClass {
    pub op_class: u8,
    /// Channel spacing, MHz
    pub ch_spacing: u16,
    pub offset: OpClassOffset,
    pub channels: &'static [u16],
}

const fn class(
    op_class: u8,
    ch_spacing: u16,
    offset: OpClassOffset,
    channels: &'static [u16],
) -> OpClass {
    OpClass { op_class, ch_spacing, offset, channels }
}

use OpClassOffset::{Bw20, Bw40HighPrimary, Bw40LowPrimary, Bw80};

const CH_80MHZ_ALL: &[u16] = &[
    36, 40, 44, 48, 52, 56, 60, 64, 100, 104, 108, 112, 116, 120, 124, 128, 132, 136, 140, 144,
    149, 153, 157, 161,
];
const CH_80MHZ_NO_UPPER: &[u16] =
    &[36, 40, 44, 48, 52, 56, 60, 64, 100, 104, 108, 112, 116, 120, 124, 128];

pub static GLOBAL_OP_CLASSES: [OpClass; 17] = [
    class(81, 25, Bw20, &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13]),
    class(82, 25, Bw20, &[14]),
    class(83, 40, Bw40LowPrimary, &[1, 2, 3, 4, 5, 6, 7, 8, 9]),
    class(84, 40, Bw40HighPrimary, &[5, 6, 7, 8, 9, 10, 11, 12, 13]),
    class(115, 20, Bw20, &[36, 40, 44, 48]),
    class(116, 40, Bw40LowPrimary, &[36, 44]),
    class(117, 40, Bw40HighPrimary, &[40, 48]),
    class(118, 20, Bw20, &[52, 56, 60, 64]),
    class(119, 40, Bw40LowPrimary, &[52, 60]),
    class(120, 40, Bw40HighPrimary, &[56, 64]),
    class(121, 20, Bw20, &[100, 104, 108, 112, 116, 120, 124, 128, 132, 136, 140]),
    class(122, 40, Bw40LowPrimary, &[100, 108, 116, 124, 132]),
    class(123, 40, Bw40HighPrimary, &[104, 112, 120, 128, 136]),
    class(125, 20, Bw20, &[149, 153, 157, 161, 165, 169]),
    class(126, 40, Bw40LowPrimary, &[149, 157]),
    class(127, 40, Bw40HighPrimary, &[153, 161]),
    class(128, 80, Bw80, CH_80MHZ_ALL),
];

pub static US_OP_CLASSES: [OpClass; 16] = [
    class(1, 20, Bw20, &[36, 40, 44, 48]),
    class(2, 20, Bw20, &[52, 56, 60, 64]),
    class(4, 20, Bw20, &[100, 104, 108, 112, 116, 120, 124, 128, 132, 136, 140, 144]),
    class(5, 20, Bw20, &[149, 153, 157, 161, 165]),
    class(12, 25, Bw20, &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]),
    class(22, 40, Bw40LowPrimary, &[36, 44]),
    class(23, 40, Bw40LowPrimary, &[52, 60]),
    class(24, 40, Bw40LowPrimary, &[100, 108, 116, 124, 132]),
    class(26, 40, Bw40LowPrimary, &[149, 157]),
    class(27, 40, Bw40HighPrimary, &[40, 48]),
    class(28, 40, Bw40HighPrimary, &[56, 64]),
    class(29, 40, Bw40HighPrimary, &[104, 112, 120, 128, 136]),
    class(31, 40, Bw40HighPrimary, &[153, 161]),
    class(32, 40, Bw40LowPrimary, &[1, 2, 3, 4, 5, 6, 7]),
    class(33, 40, Bw40HighPrimary, &[5, 6, 7, 8, 9, 10, 11]),
    class(128, 80, Bw80, CH_80MHZ_ALL),
];

pub static EU_OP_CLASSES: [OpClass; 14] = [
    class(1, 20, Bw20, &[36, 40, 44, 48]),
    class(2, 20, Bw20, &[52, 56, 60, 64]),
    class(3, 20, Bw20, &[100, 104, 108, 112, 116, 120, 124, 128, 132, 136, 140]),
    class(4, 25, Bw20, &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13]),
    class(5, 40, Bw40LowPrimary, &[36, 44]),
    class(6, 40, Bw40LowPrimary, &[52, 60]),
    class(7, 40, Bw40LowPrimary, &[100, 108, 116, 124, 132]),
    class(8, 40, Bw40HighPrimary, &[40, 48]),
    class(9, 40, Bw40HighPrimary, &[56, 64]),
    class(10, 40, Bw40HighPrimary, &[104, 112, 120, 128, 136]),
    class(11, 40, Bw40LowPrimary, &[1, 2, 3, 4, 5, 6, 7, 8, 9]),
    class(12, 40, Bw40HighPrimary, &[5, 6, 7, 8, 9, 10, 11, 12, 13]),
    class(17, 20, Bw20, &[149, 153, 157, 161, 165, 169]),
    class(128, 80, Bw80, CH_80MHZ_NO_UPPER),
];

pub static JAPAN_OP_CLASSES: [OpClass; 12] = [
    class(1, 20, Bw20, &[36, 40, 44, 48]),
    class(30, 25, Bw20, &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13]),
    class(31, 25, Bw20, &[14]),
    class(32, 20, Bw20, &[52, 56, 60, 64]),
    class(34, 20, Bw20, &[100, 104, 108, 112, 116, 120, 124, 128, 132, 136, 140]),
    class(36, 40, Bw40LowPrimary, &[36, 44]),
    class(37, 40, Bw40LowPrimary, &[52, 60]),
    class(39, 40, Bw40LowPrimary, &[100, 108, 116, 124, 132]),
    class(41, 40, Bw40HighPrimary, &[40, 48]),
    class(42, 40, Bw40HighPrimary, &[56, 64]),
    class(44, 40, Bw40HighPrimary, &[104, 112, 120, 128, 136]),
    class(128, 80, Bw80, CH_80MHZ_NO_UPPER),
];

/// Operating class table for a country string.
pub fn classes_for_country(country: &Alpha2) -> &'static [OpClass] {
    match country.table_octet() {
        OP_CLASS_US => &US_OP_CLASSES,
        OP_CLASS_EU => &EU_OP_CLASSES,
        OP_CLASS_JAPAN => &JAPAN_OP_CLASSES,
        OP_CLASS_GLOBAL => &GLOBAL_OP_CLASSES,
        _ => match &country.letters() {
            b"US" => &US_OP_CLASSES,
            b"EU" => &EU_OP_CLASSES,
            b"JP" => &JAPAN_OP_CLASSES,
            _ => &GLOBAL_OP_CLASSES,
        },
    }
}

/// First operating class listing `channel` with `offset`; `None` matches any offset.
pub fn opclass_from_channel(
    country: &Alpha2,
    channel: u16,
    offset: Option<OpClassOffset>,
) -> Option<u8> {
    classes_for_country(country)
        .iter()
        .filter(|c| offset.is_none_or(|o| o == c.offset))
        .find(|c| c.channels.contains(&channel))
        .map(|c| c.op_class)
}

/// Channel spacing of `opclass` when it lists `channel`.
pub fn chanwidth_from_opclass(country: &Alpha2, channel: u16, opclass: u8) -> Option<u16> {
    classes_for_country(country)
        .iter()
        .find(|c| c.op_class == opclass && c.channels.contains(&channel))
        .map(|c| c.ch_spacing)
}

/// Channels listed by `opclass`, or `None` for an unknown class.
pub fn channels_in_opclass(country: &Alpha2, opclass: u8) -> Option<&'static [u16]> {
    let channels = classes_for_country(country)
        .iter()
        .find(|c| c.op_class == opclass)
        .map(|c| c.channels);
    if channels.is_none() {
        debug!(%country, opclass, "Unknown operating class");
    }
    channels
}

/// Operating classes currently advertised by a radio.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct SupportedOpClasses {
    classes: Vec<u8>,
}

impl SupportedOpClasses {
    pub fn set(&mut self, classes: &[u8]) -> Result<()> {
        if classes.len() > MAX_SUPP_OPER_CLASSES {
            return Err(RegulatoryError::TooManyOpClasses {
                count: classes.len(),
                max: MAX_SUPP_OPER_CLASSES,
            });
        }
        self.classes = classes.to_vec();
        Ok(())
    }

    pub fn classes(&self) -> &[u8] {
        &self.classes
    }
}
