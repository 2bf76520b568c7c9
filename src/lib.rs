//! Regulatory-domain channel engine for wireless radios.
//!
//! Given a country's regulatory rules and a radio's capabilities, regchan
//! computes the state, bandwidth and transmit power of every channel the
//! radio could use, and keeps that view consistent as runtime conditions
//! change (band restriction, indoor-only mode, radar hits, LTE coexistence,
//! SAP state).
//!
//! # Features
//!
//! - **Master lists**: per-radio regulatory view rebuilt on each country change
//! - **Current lists**: per-interface view composed by an ordered filter chain
//! - **Bonded channels**: 40/80/160/80+80 MHz state and width fallback
//! - **Notifications**: callbacks, `watch` receivers and streams per interface
//! - **Async updates**: a driver task resolving countries through a [`RuleSource`]
//!
//! # Quick Start
//!
//! ```rust
//! use regchan::{Engine, HardwareCapability, RegRule, RegulatoryInfo, Alpha2, DfsRegion};
//! use regchan::types::ChannelState;
//!
//! # fn main() -> regchan::Result<()> {
//! let engine = Engine::default();
//! engine.add_radio(0, HardwareCapability::default())?;
//! let iface = engine.create_interface(0)?;
//!
//! engine.apply_regulatory_update(&RegulatoryInfo {
//!     phy_id: 0,
//!     country_code: 840,
//!     reg_dmn_pair: 0x3a,
//!     dfs_region: DfsRegion::Fcc,
//!     alpha2: Alpha2::new("US")?,
//!     etsi13: false,
//!     rules_2g: vec![RegRule::new(2402, 2472, 40, 30)],
//!     rules_5g: vec![RegRule::new(5170, 5250, 80, 23)],
//!     min_bw_2g: 20,
//!     max_bw_2g: 40,
//!     min_bw_5g: 20,
//!     max_bw_5g: 160,
//! })?;
//!
//! assert_eq!(iface.channel_state(36), ChannelState::Enable);
//! assert_eq!(iface.channel_state(149), ChannelState::Disable);
//! # Ok(())
//! # }
//! ```

// Core types and error handling
mod error;
#[cfg_attr(any(test, feature = "benchmark"), path = "test_utils.rs")]
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;

// Channel computation
pub mod bonded;
pub mod compose;
pub mod list;
pub mod master;
pub mod opclass;
pub mod query;
pub mod table;

// Runtime state and notification
pub mod avoid;
pub mod config;
pub mod engine;
pub mod interface;
pub mod notify;
pub mod radio;

// Rule sources and the async update path
pub mod driver;
pub mod provider;
pub mod providers;

// Core exports
pub use error::*;
pub use types::*;

pub use compose::{Composition, ToggleSet, compose_current_list};
pub use config::{HardwareCapability, RegulatoryConfig, init_tracing};
pub use driver::{DriverChannels, UpdateDriver, UpdateOutcome, UpdateRequest, UpdateStatus};
pub use engine::Engine;
pub use interface::Interface;
pub use list::ChannelList;
pub use master::{MAX_REG_RULES, MasterChannelList, build_master_list};
pub use notify::{CallbackHandle, ChannelChangeCallback, ChannelChangeEvent};
pub use opclass::{OpClassOffset, chanwidth_from_opclass, channels_in_opclass, opclass_from_channel};
pub use provider::RuleSource;
pub use providers::StaticRuleSource;
pub use radio::Radio;
pub use table::{ChannelTable, TableRegion};
