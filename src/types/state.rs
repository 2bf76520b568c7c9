//! Channel operating state

use serde::{Deserialize, Serialize};

/// Operating state of a channel or bonded channel group.
///
/// Variants are ordered from worst to best, so the state of a group is the
/// minimum of its members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum ChannelState {
    /// Channel number or width not known to the active table
    Invalid,
    /// Not usable
    Disable,
    /// Passive only: radar detection or no initiating radiation
    Dfs,
    /// Fully usable
    Enable,
}

impl ChannelState {
    /// Combine two states: `Invalid` if either is, otherwise the worse of the two.
    pub fn combine(self, other: ChannelState) -> ChannelState {
        if self == ChannelState::Invalid || other == ChannelState::Invalid {
            ChannelState::Invalid
        } else {
            self.min(other)
        }
    }

    /// Usable for operation, actively or passively.
    pub fn is_usable(self) -> bool {
        matches!(self, ChannelState::Enable | ChannelState::Dfs)
    }
}
