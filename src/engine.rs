//! Engine: radios, logical interfaces and regulatory updates.
//!
//! Lock order is interface, then radio. The radio lock is only held while
//! the master list `Arc` is cloned or swapped, and callbacks run after every
//! lock has been released.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{info, warn};

use crate::avoid;
use crate::compose::ToggleSet;
use crate::config::{HardwareCapability, RegulatoryConfig};
use crate::interface::Interface;
use crate::master::build_master_list;
use crate::notify::{CallbackHandle, ChangeNotifier, ChannelChangeCallback};
use crate::radio::Radio;
use crate::types::{Alpha2, AvoidFreqList, DfsRegion, RegulatoryInfo};
use crate::{RegulatoryError, Result};

/// Owner of every radio and logical interface of one device.
#[derive(Debug)]
pub struct Engine {
    config: RwLock<RegulatoryConfig>,
    radios: RwLock<BTreeMap<u8, Arc<Radio>>>,
    interfaces: RwLock<BTreeMap<u32, Arc<Interface>>>,
    avoid: RwLock<AvoidFreqList>,
    notifier: Arc<ChangeNotifier>,
    next_interface_id: AtomicU32,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(RegulatoryConfig::default())
    }
}

impl Engine {
    pub fn new(config: RegulatoryConfig) -> Self {
        Self {
            config: RwLock::new(config),
            radios: RwLock::new(BTreeMap::new()),
            interfaces: RwLock::new(BTreeMap::new()),
            avoid: RwLock::new(AvoidFreqList::default()),
            notifier: Arc::new(ChangeNotifier::default()),
            next_interface_id: AtomicU32::new(1),
        }
    }

    pub fn config(&self) -> RegulatoryConfig {
        self.config.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Register radio `phy_id`. Its master list starts unconfigured.
    pub fn add_radio(&self, phy_id: u8, hw: HardwareCapability) -> Result<Arc<Radio>> {
        hw.validate()?;
        let mut radios = self.radios.write().unwrap_or_else(PoisonError::into_inner);
        if radios.contains_key(&phy_id) {
            return Err(RegulatoryError::invalid_input(format!(
                "radio {phy_id} is already registered"
            )));
        }
        let radio = Arc::new(Radio::new(phy_id, hw));
        radios.insert(phy_id, radio.clone());
        info!(phy_id, "Registered radio");
        Ok(radio)
    }

    pub fn radio(&self, phy_id: u8) -> Result<Arc<Radio>> {
        self.radios
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&phy_id)
            .cloned()
            .ok_or(RegulatoryError::UnknownRadio { phy_id })
    }

    /// Create a logical interface on `phy_id` with the process defaults.
    pub fn create_interface(&self, phy_id: u8) -> Result<Arc<Interface>> {
        let radio = self.radio(phy_id)?;
        let toggles = ToggleSet::from_config(&self.config(), radio.hardware().clone());
        let id = self.next_interface_id.fetch_add(1, Ordering::Relaxed);
        let iface = Arc::new(Interface::new(id, radio, toggles, self.notifier.clone()));
        self.interfaces.write().unwrap_or_else(PoisonError::into_inner).insert(id, iface.clone());
        info!(interface = id, phy_id, "Created interface");
        Ok(iface)
    }

    pub fn interface(&self, id: u32) -> Result<Arc<Interface>> {
        self.interfaces
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
            .ok_or(RegulatoryError::UnknownInterface { id })
    }

    pub fn remove_interface(&self, id: u32) -> Result<()> {
        let removed = self.interfaces.write().unwrap_or_else(PoisonError::into_inner).remove(&id);
        if removed.is_none() {
            return Err(RegulatoryError::UnknownInterface { id });
        }
        info!(interface = id, "Removed interface");
        Ok(())
    }

    fn interfaces_snapshot(&self) -> Vec<Arc<Interface>> {
        self.interfaces.read().unwrap_or_else(PoisonError::into_inner).values().cloned().collect()
    }

    /// Build and install a master list for `info.phy_id`, then recompose
    /// every interface on that radio.
    ///
    /// On error the radio keeps its previous master list.
    pub fn apply_regulatory_update(&self, info: &RegulatoryInfo) -> Result<()> {
        let radio = self.radio(info.phy_id)?;
        let master = match build_master_list(info) {
            Ok(master) => master,
            Err(e) => {
                warn!(
                    phy_id = info.phy_id,
                    country = %info.alpha2,
                    error = %e,
                    "Rejected regulatory update, keeping previous master list"
                );
                return Err(e);
            }
        };

        radio.install(master);
        info!(
            phy_id = info.phy_id,
            country = %info.alpha2,
            dfs_region = ?info.dfs_region,
            rules = info.rule_count(),
            "Applied regulatory update"
        );

        for iface in self.interfaces_snapshot().iter().filter(|i| i.phy_id() == info.phy_id) {
            iface.recompute();
        }
        Ok(())
    }

    /// Replace the process configuration and push it to every interface.
    pub fn set_config(&self, config: RegulatoryConfig) -> Result<()> {
        config.validate()?;
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config.clone();
        let changed =
            self.interfaces_snapshot().iter().filter(|i| i.apply_config(&config)).count();
        info!(changed, "Applied regulatory config");
        Ok(())
    }

    /// Handle an LTE coexistence report: store the retained ranges and
    /// notify every interface with its unsafe channels.
    pub fn process_avoid_freq(&self, ranges: &AvoidFreqList) {
        let policy = self.config().restart_beaconing;
        let interfaces = self.interfaces_snapshot();

        *self.avoid.write().unwrap_or_else(PoisonError::into_inner) =
            avoid::retained_ranges(ranges, policy);
        info!(ranges = ranges.ranges.len(), ?policy, "Processing LTE coexistence avoid ranges");

        for iface in &interfaces {
            iface.process_avoid_freq(ranges, policy);
        }
    }

    /// Avoid ranges retained from the last coexistence report.
    pub fn avoid_freq(&self) -> AvoidFreqList {
        self.avoid.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn register_callback(&self, callback: ChannelChangeCallback) -> Result<CallbackHandle> {
        self.notifier.register(callback)
    }

    pub fn unregister_callback(&self, handle: CallbackHandle) -> Result<()> {
        self.notifier.unregister(handle)
    }

    pub fn current_country(&self, phy_id: u8) -> Result<Alpha2> {
        Ok(self.radio(phy_id)?.current_country())
    }

    pub fn dfs_region(&self, phy_id: u8) -> Result<DfsRegion> {
        Ok(self.radio(phy_id)?.dfs_region())
    }

    pub fn set_current_opclasses(&self, phy_id: u8, classes: &[u8]) -> Result<()> {
        self.radio(phy_id)?.set_current_opclasses(classes)
    }

    pub fn current_opclasses(&self, phy_id: u8) -> Result<Vec<u8>> {
        Ok(self.radio(phy_id)?.current_opclasses())
    }
}
