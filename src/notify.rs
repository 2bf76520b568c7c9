//! Channel change notification.
//!
//! Listeners register a callback and receive a [`CallbackHandle`]. The
//! registry has a fixed number of slots; each slot carries a generation so a
//! stale handle never removes a later registrant of the same slot.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::list::ChannelList;
use crate::types::{AvoidFreqIndication, ChannelChange};
use crate::{RegulatoryError, Result};

/// Maximum number of registered channel change callbacks.
pub const MAX_CHAN_CHANGE_CBKS: usize = 10;

/// Snapshot delivered to listeners after a current list recompute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelChangeEvent {
    pub phy_id: u8,
    pub interface_id: u32,
    pub list: Arc<ChannelList>,
    /// Slots whose state changed in this recompute
    pub changes: Vec<ChannelChange>,
    /// Present only on the notifications of an LTE coexistence event
    pub avoid: Option<AvoidFreqIndication>,
}

pub type ChannelChangeCallback = Arc<dyn Fn(&ChannelChangeEvent) + Send + Sync>;

/// Opaque registration token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct CallbackHandle(u64);

impl CallbackHandle {
    fn new(slot: usize, generation: u32) -> Self {
        Self((u64::from(generation) << 32) | slot as u64)
    }

    fn slot(self) -> usize {
        (self.0 & 0xFFFF_FFFF) as usize
    }

    fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CallbackHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.slot(), self.generation())
    }
}

#[derive(Default)]
struct Slot {
    generation: u32,
    callback: Option<ChannelChangeCallback>,
}

/// Fixed-capacity callback registry.
pub struct CallbackRegistry {
    slots: Vec<Slot>,
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::with_capacity(MAX_CHAN_CHANGE_CBKS)
    }
}

impl fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("capacity", &self.capacity())
            .field("registered", &self.len())
            .finish()
    }
}

impl CallbackRegistry {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { slots: (0..capacity).map(|_| Slot::default()).collect() }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.callback.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn register(&mut self, callback: ChannelChangeCallback) -> Result<CallbackHandle> {
        let capacity = self.capacity();
        let Some((idx, slot)) =
            self.slots.iter_mut().enumerate().find(|(_, s)| s.callback.is_none())
        else {
            warn!(capacity, "Channel change callback registry full");
            return Err(RegulatoryError::RegistryFull { capacity });
        };

        slot.generation = slot.generation.wrapping_add(1);
        slot.callback = Some(callback);
        let handle = CallbackHandle::new(idx, slot.generation);
        debug!(%handle, "Registered channel change callback");
        Ok(handle)
    }

    pub fn unregister(&mut self, handle: CallbackHandle) -> Result<()> {
        match self.slots.get_mut(handle.slot()) {
            Some(slot) if slot.generation == handle.generation() && slot.callback.is_some() => {
                slot.callback = None;
                debug!(%handle, "Unregistered channel change callback");
                Ok(())
            }
            _ => Err(RegulatoryError::UnknownHandle { handle: handle.raw() }),
        }
    }

    /// Registered callbacks, cloned so they can run without the registry lock.
    pub fn snapshot(&self) -> Vec<ChannelChangeCallback> {
        self.slots.iter().filter_map(|s| s.callback.clone()).collect()
    }
}

/// Shared registry handle used by every interface of an engine.
#[derive(Debug, Default)]
pub struct ChangeNotifier {
    registry: RwLock<CallbackRegistry>,
}

impl ChangeNotifier {
    pub fn register(&self, callback: ChannelChangeCallback) -> Result<CallbackHandle> {
        self.registry.write().unwrap_or_else(PoisonError::into_inner).register(callback)
    }

    pub fn unregister(&self, handle: CallbackHandle) -> Result<()> {
        self.registry.write().unwrap_or_else(PoisonError::into_inner).unregister(handle)
    }

    pub fn len(&self) -> usize {
        self.registry.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invoke every registered callback. The registry lock is released
    /// first so callbacks may register, unregister or query.
    pub fn dispatch(&self, event: &ChannelChangeEvent) {
        let callbacks = self.registry.read().unwrap_or_else(PoisonError::into_inner).snapshot();
        trace!(
            interface = event.interface_id,
            callbacks = callbacks.len(),
            "Dispatching channel change"
        );
        for callback in callbacks {
            callback(event);
        }
    }
}
