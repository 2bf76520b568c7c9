//! Bands, DFS regions and operating modes

use serde::{Deserialize, Serialize};

/// Frequency band of a channel table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum Band {
    /// 2.4 GHz
    TwoG,
    /// 4.9 GHz public safety and 5.0 GHz Japan block
    FourNine,
    /// 5 GHz
    FiveG,
}

/// DFS region reported with a regulatory update; selects the channel table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum DfsRegion {
    #[default]
    Uninit,
    Fcc,
    Etsi,
    Mkk,
    Cn,
    Kr,
    Undef,
}

/// Operating mode of a virtual interface asking about SRD channel use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum OpMode {
    Sta,
    Sap,
    P2pGo,
    NanDisc,
}

/// Beaconing restart policy applied to LTE coexistence avoid ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(rename_all = "snake_case")]
pub enum RestartBeaconing {
    DoNotRestart,
    #[default]
    Restart,
    /// Only 2.4 GHz avoid ranges are honoured
    Restart24gOnly,
}
