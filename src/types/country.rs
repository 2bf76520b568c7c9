//! Country identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{RegulatoryError, Result};

/// Regulatory domain id used for the world domain family.
pub const DEFAULT_WORLD_REGDMN: u16 = 0x60;

/// Two-letter country code plus the country-string third octet.
///
/// The third octet selects the operating-class table (0x01 US, 0x02 EU,
/// 0x03 Japan, 0x04 Global); zero means "derive from the letters".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(try_from = "String", into = "String")]
pub struct Alpha2(pub [u8; 3]);

impl Alpha2 {
    /// The world domain "00".
    pub const WORLD: Alpha2 = Alpha2([b'0', b'0', 0]);

    /// Parse a two-letter code. Letters are upper-cased.
    pub fn new(code: &str) -> Result<Self> {
        let bytes = code.as_bytes();
        if bytes.len() != 2 || !bytes.iter().all(|b| b.is_ascii_alphanumeric()) {
            return Err(RegulatoryError::invalid_input(format!(
                "country code '{code}' is not two ASCII letters or digits"
            )));
        }
        Ok(Self([bytes[0].to_ascii_uppercase(), bytes[1].to_ascii_uppercase(), 0]))
    }

    /// Same country with an explicit operating-class table octet.
    pub fn with_table_octet(self, octet: u8) -> Self {
        Self([self.0[0], self.0[1], octet])
    }

    pub fn letters(&self) -> [u8; 2] {
        [self.0[0], self.0[1]]
    }

    pub fn table_octet(&self) -> u8 {
        self.0[2]
    }

    pub fn is_world(&self) -> bool {
        is_world_alpha2(self)
    }
}

impl fmt::Display for Alpha2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.0[0] as char, self.0[1] as char)
    }
}

impl TryFrom<String> for Alpha2 {
    type Error = RegulatoryError;

    fn try_from(value: String) -> Result<Self> {
        Alpha2::new(&value)
    }
}

impl From<Alpha2> for String {
    fn from(value: Alpha2) -> Self {
        value.to_string()
    }
}

/// Country code belongs to the world regulatory domain family.
pub fn is_world_country_code(code: u16) -> bool {
    (code & 0xFFF0) == DEFAULT_WORLD_REGDMN
}

pub fn is_world_alpha2(alpha2: &Alpha2) -> bool {
    alpha2.0[0] == b'0' && alpha2.0[1] == b'0'
}

pub fn is_us_alpha2(alpha2: &Alpha2) -> bool {
    alpha2.0[0] == b'U' && alpha2.0[1] == b'S'
}
