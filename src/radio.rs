//! Physical radio state

use std::sync::{Arc, PoisonError, RwLock};

use crate::config::HardwareCapability;
use crate::master::MasterChannelList;
use crate::opclass::SupportedOpClasses;
use crate::types::{Alpha2, DfsRegion};
use crate::Result;

/// One physical radio: its master list and advertised operating classes.
///
/// The master list is swapped as a whole on each regulatory update; readers
/// clone the `Arc` and never hold the lock while composing.
#[derive(Debug)]
pub struct Radio {
    phy_id: u8,
    hw: HardwareCapability,
    master: RwLock<Arc<MasterChannelList>>,
    opclasses: RwLock<SupportedOpClasses>,
}

impl Radio {
    pub fn new(phy_id: u8, hw: HardwareCapability) -> Self {
        Self {
            phy_id,
            hw,
            master: RwLock::new(Arc::new(MasterChannelList::unconfigured())),
            opclasses: RwLock::new(SupportedOpClasses::default()),
        }
    }

    pub fn phy_id(&self) -> u8 {
        self.phy_id
    }

    pub fn hardware(&self) -> &HardwareCapability {
        &self.hw
    }

    /// Current master list.
    pub fn master(&self) -> Arc<MasterChannelList> {
        self.master.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Replace the master list, returning the previous one.
    pub(crate) fn install(&self, master: MasterChannelList) -> Arc<MasterChannelList> {
        let mut slot = self.master.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *slot, Arc::new(master))
    }

    pub fn current_country(&self) -> Alpha2 {
        self.master().country
    }

    pub fn dfs_region(&self) -> DfsRegion {
        self.master().dfs_region
    }

    pub fn set_current_opclasses(&self, classes: &[u8]) -> Result<()> {
        self.opclasses.write().unwrap_or_else(PoisonError::into_inner).set(classes)
    }

    pub fn current_opclasses(&self) -> Vec<u8> {
        self.opclasses.read().unwrap_or_else(PoisonError::into_inner).classes().to_vec()
    }
}
