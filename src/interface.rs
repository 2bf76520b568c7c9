//! Logical interfaces and their runtime toggles.
//!
//! Every interface owns a [`ToggleSet`] and the current list composed from
//! its radio's master list. Setters that change a toggle recompose the list
//! and publish it on the interface's watch channel under the interface lock,
//! so the watch value always matches [`Interface::current_list`]. Registered
//! callbacks run after the lock is released.

use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, info};

use crate::avoid;
use crate::bonded;
use crate::compose::{Composition, ToggleSet, compose_current_list};
use crate::config::RegulatoryConfig;
use crate::list::ChannelList;
use crate::notify::{ChangeNotifier, ChannelChangeEvent};
use crate::query;
use crate::radio::Radio;
use crate::types::{
    AvoidFreqIndication, AvoidFreqList, BandCapability, ChannelParams, ChannelPower,
    ChannelState, ChannelWidth, OpMode, RestartBeaconing,
};

#[derive(Debug)]
struct InterfaceState {
    toggles: ToggleSet,
    current: Arc<ChannelList>,
}

/// A logical interface bound to one radio.
#[derive(Debug)]
pub struct Interface {
    id: u32,
    radio: Arc<Radio>,
    state: RwLock<InterfaceState>,
    events: watch::Sender<Arc<ChannelChangeEvent>>,
    notifier: Arc<ChangeNotifier>,
}

impl Interface {
    pub(crate) fn new(
        id: u32,
        radio: Arc<Radio>,
        toggles: ToggleSet,
        notifier: Arc<ChangeNotifier>,
    ) -> Self {
        let master = radio.master();
        let Composition { list, changes } = compose_current_list(&master, &toggles, None);
        let current = Arc::new(list);
        let initial = Arc::new(ChannelChangeEvent {
            phy_id: radio.phy_id(),
            interface_id: id,
            list: current.clone(),
            changes,
            avoid: None,
        });
        let (events, _) = watch::channel(initial);

        debug!(interface = id, phy_id = radio.phy_id(), "Created logical interface");
        Self { id, radio, state: RwLock::new(InterfaceState { toggles, current }), events, notifier }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn phy_id(&self) -> u8 {
        self.radio.phy_id()
    }

    pub fn radio(&self) -> &Arc<Radio> {
        &self.radio
    }

    /// Snapshot of the current channel list.
    pub fn current_list(&self) -> Arc<ChannelList> {
        self.state.read().unwrap_or_else(PoisonError::into_inner).current.clone()
    }

    pub fn toggles(&self) -> ToggleSet {
        self.state.read().unwrap_or_else(PoisonError::into_inner).toggles.clone()
    }

    /// Receiver holding the latest change event.
    pub fn subscribe(&self) -> watch::Receiver<Arc<ChannelChangeEvent>> {
        self.events.subscribe()
    }

    /// Change events as a stream, starting with the latest one.
    pub fn updates(&self) -> WatchStream<Arc<ChannelChangeEvent>> {
        WatchStream::new(self.subscribe())
    }

    /// Recompose the current list and publish the result.
    pub fn recompute(&self) -> Arc<ChannelChangeEvent> {
        let event = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            self.recompose(&mut state, None)
        };
        self.publish(&event);
        event
    }

    pub(crate) fn process_avoid_freq(
        &self,
        ranges: &AvoidFreqList,
        policy: RestartBeaconing,
    ) -> Arc<ChannelChangeEvent> {
        let event = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            let indication = avoid::indication(&state.current, ranges, policy);
            debug!(
                interface = self.id,
                unsafe_channels = ?indication.unsafe_channels,
                "Computed LTE coexistence unsafe channels"
            );
            self.recompose(&mut state, Some(indication))
        };
        self.publish(&event);
        event
    }

    fn recompose(
        &self,
        state: &mut InterfaceState,
        avoid: Option<AvoidFreqIndication>,
    ) -> Arc<ChannelChangeEvent> {
        let master = self.radio.master();
        let Composition { list, changes } =
            compose_current_list(&master, &state.toggles, Some(&state.current));
        debug!(
            phy_id = self.radio.phy_id(),
            interface = self.id,
            changed = changes.len(),
            "Recomputed current channel list"
        );
        state.current = Arc::new(list);

        let event = Arc::new(ChannelChangeEvent {
            phy_id: self.radio.phy_id(),
            interface_id: self.id,
            list: state.current.clone(),
            changes,
            avoid,
        });
        // Caller holds the write guard; watch order follows recompose order.
        self.events.send_replace(event.clone());
        event
    }

    fn publish(&self, event: &ChannelChangeEvent) {
        self.notifier.dispatch(event);
    }

    /// Apply `change` to the toggles; recompose and notify only when it
    /// reports a difference.
    fn update<F>(&self, toggle: &'static str, change: F) -> bool
    where
        F: FnOnce(&mut ToggleSet) -> bool,
    {
        let event = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            if !change(&mut state.toggles) {
                debug!(interface = self.id, toggle, "Toggle unchanged");
                return false;
            }
            self.recompose(&mut state, None)
        };
        info!(interface = self.id, toggle, "Runtime toggle changed");
        self.publish(&event);
        true
    }

    pub fn set_band(&self, band: BandCapability) -> bool {
        self.update("band_capability", |t| replace(&mut t.band_capability, band))
    }

    pub fn set_dfs_enabled(&self, enabled: bool) -> bool {
        self.update("dfs_enabled", |t| replace(&mut t.dfs_enabled, enabled))
    }

    pub fn set_indoor_enabled(&self, enabled: bool) -> bool {
        self.update("indoor_chan_enabled", |t| replace(&mut t.indoor_chan_enabled, enabled))
    }

    pub fn set_fcc_constraint(&self, enabled: bool) -> bool {
        self.update("set_fcc_channel", |t| replace(&mut t.set_fcc_channel, enabled))
    }

    pub fn set_channel_144(&self, enabled: bool) -> bool {
        self.update("en_chan_144", |t| replace(&mut t.en_chan_144, enabled))
    }

    pub fn set_force_ssc_disable_indoor(&self, enabled: bool) -> bool {
        self.update("force_ssc_disable_indoor", |t| {
            replace(&mut t.force_ssc_disable_indoor, enabled)
        })
    }

    pub fn set_srd_master_mode(&self, mask: u8) -> bool {
        self.update("srd_master_mode", |t| replace(&mut t.srd_master_mode, mask))
    }

    /// SAP start or stop. Also arms or disarms the cached-disable list.
    pub fn notify_sap_state(&self, sap_active: bool) -> bool {
        self.update("sap_active", |t| {
            let sap = replace(&mut t.sap_active, sap_active);
            let cached = replace(&mut t.disable_cached_channels, sap_active);
            sap || cached
        })
    }

    /// Add `channels` to or remove them from the non-occupancy list.
    pub fn update_nol(&self, channels: &[u16], nol: bool) -> bool {
        self.update("nol", |t| {
            channels.iter().fold(false, |changed, &ch| {
                let updated = if nol { t.nol.insert(ch) } else { t.nol.remove(&ch) };
                changed | updated
            })
        })
    }

    pub fn update_nol_history(&self, channels: &[u16], nol_history: bool) -> bool {
        self.update("nol_history", |t| {
            channels.iter().fold(false, |changed, &ch| {
                let updated =
                    if nol_history { t.nol_history.insert(ch) } else { t.nol_history.remove(&ch) };
                changed | updated
            })
        })
    }

    /// Remember `channels` as the list disabled while SAP runs.
    pub fn cache_channel_state(&self, channels: &[u16]) -> bool {
        self.update("cached_channels", |t| {
            if t.cached_channels == channels {
                return false;
            }
            t.cached_channels = channels.to_vec();
            true
        })
    }

    /// Stop enforcing the cached-disable list.
    pub fn restore_cached_channels(&self) -> bool {
        self.update("disable_cached_channels", |t| {
            replace(&mut t.disable_cached_channels, false)
        })
    }

    pub(crate) fn apply_config(&self, config: &RegulatoryConfig) -> bool {
        self.update("config", |t| {
            let dfs = replace(&mut t.dfs_enabled, config.dfs_enabled);
            let indoor = replace(&mut t.indoor_chan_enabled, config.indoor_chan_enabled);
            let ssc =
                replace(&mut t.force_ssc_disable_indoor, config.force_ssc_disable_indoor_channel);
            let band = replace(&mut t.band_capability, config.band_capability);
            dfs | indoor | ssc | band
        })
    }

    pub fn channel_state(&self, ch: u16) -> ChannelState {
        self.current_list().channel_state(ch)
    }

    pub fn bonded_channel_state(
        &self,
        ch: u16,
        width: ChannelWidth,
        sec_ch_2g: Option<u16>,
    ) -> ChannelState {
        bonded::bonded_channel_state(&self.current_list(), ch, width, sec_ch_2g)
    }

    pub fn channel_params(
        &self,
        ch: u16,
        sec_ch_2g: Option<u16>,
        requested: ChannelParams,
    ) -> ChannelParams {
        bonded::channel_params(&self.current_list(), ch, sec_ch_2g, requested)
    }

    pub fn channels_with_power(&self) -> Vec<ChannelPower> {
        self.current_list().channels_with_power()
    }

    pub fn freq_to_channel(&self, freq: u32) -> Option<u16> {
        self.current_list().freq_to_channel(freq)
    }

    pub fn channel_to_freq(&self, ch: u16) -> Option<u32> {
        self.current_list().channel_to_freq(ch)
    }

    pub fn is_etsi13_srd_channel(&self, ch: u16) -> bool {
        let etsi13 = self.radio.master().etsi13;
        self.current_list().is_etsi13_srd_channel(etsi13, ch)
    }

    pub fn srd_allowed_in_master_mode(&self, mode: OpMode) -> bool {
        query::srd_allowed_in_master_mode(self.toggles().srd_master_mode, mode)
    }

    pub fn fcc_constraint_applies(&self, freq: u32) -> bool {
        query::fcc_constraint_applies(self.toggles().set_fcc_channel, freq)
    }
}

/// Store `value`, reporting whether it differed.
fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HardwareCapability;
    use crate::master::build_master_list;
    use crate::test_utils::{etsi_info, fcc_info};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn interface_for(info: &crate::types::RegulatoryInfo) -> (Interface, Arc<ChangeNotifier>) {
        let radio = Arc::new(Radio::new(info.phy_id, HardwareCapability::default()));
        radio.install(build_master_list(info).unwrap());
        let notifier = Arc::new(ChangeNotifier::default());
        let iface = Interface::new(1, radio, ToggleSet::default(), notifier.clone());
        (iface, notifier)
    }

    fn counting(notifier: &ChangeNotifier) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        notifier
            .register(Arc::new(move |_: &ChannelChangeEvent| {
                counter.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();
        count
    }

    #[test]
    fn unchanged_toggle_does_not_notify() {
        let (iface, notifier) = interface_for(&fcc_info());
        let calls = counting(&notifier);

        assert!(!iface.set_dfs_enabled(true));
        assert!(!iface.set_channel_144(true));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert!(iface.set_dfs_enabled(false));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(iface.channel_state(52), ChannelState::Disable);

        assert!(iface.set_dfs_enabled(true));
        assert_eq!(iface.channel_state(52), ChannelState::Dfs);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn toggles_do_not_compound() {
        let (iface, _) = interface_for(&fcc_info());
        let pristine = iface.current_list();

        iface.set_band(BandCapability::TWO_G_ONLY);
        iface.set_channel_144(false);
        iface.set_band(BandCapability::ALL);
        iface.set_channel_144(true);

        assert_eq!(*iface.current_list(), *pristine);
    }

    #[test]
    fn nol_round_trip() {
        let (iface, _) = interface_for(&fcc_info());
        assert!(iface.update_nol(&[100], true));
        assert!(!iface.update_nol(&[100], true));
        assert_eq!(iface.channel_state(100), ChannelState::Disable);
        assert!(iface.current_list().by_number(100).unwrap().nol);

        assert!(iface.update_nol(&[100], false));
        assert_eq!(iface.channel_state(100), ChannelState::Dfs);
    }

    #[test]
    fn sap_state_arms_cached_channels() {
        let (iface, _) = interface_for(&fcc_info());
        assert!(iface.cache_channel_state(&[1, 36]));
        assert!(!iface.cache_channel_state(&[1, 36]));
        assert_eq!(iface.channel_state(36), ChannelState::Enable);

        assert!(iface.notify_sap_state(true));
        assert_eq!(iface.channel_state(1), ChannelState::Disable);
        assert_eq!(iface.channel_state(36), ChannelState::Disable);

        assert!(iface.restore_cached_channels());
        assert_eq!(iface.channel_state(36), ChannelState::Enable);
        assert!(iface.toggles().sap_active);
    }

    #[test]
    fn watch_channel_tracks_latest_event() {
        let (iface, _) = interface_for(&fcc_info());
        let rx = iface.subscribe();
        assert!(rx.borrow().changes.iter().any(|c| c.number == Some(36)));

        iface.set_band(BandCapability::FIVE_G_ONLY);
        let event = rx.borrow().clone();
        assert_eq!(event.interface_id, 1);
        assert!(event.avoid.is_none());
        assert!(event.changes.iter().all(|c| c.to == ChannelState::Disable));
        assert!(event.changes.iter().any(|c| c.number == Some(1)));
    }

    #[test]
    fn srd_queries_follow_domain_and_mask() {
        let (iface, _) = interface_for(&etsi_info());
        assert!(iface.is_etsi13_srd_channel(149));
        assert!(!iface.is_etsi13_srd_channel(36));
        assert_eq!(iface.channel_state(149), ChannelState::Dfs);
        assert!(!iface.srd_allowed_in_master_mode(OpMode::Sap));

        assert!(iface.set_srd_master_mode(crate::types::reg_flags::srd_master_mode::SAP));
        assert!(iface.srd_allowed_in_master_mode(OpMode::Sap));
        assert!(!iface.srd_allowed_in_master_mode(OpMode::P2pGo));
        assert_eq!(iface.channel_state(149), ChannelState::Enable);
    }

    #[test]
    fn fcc_power_constraint() {
        let (iface, _) = interface_for(&fcc_info());
        assert!(!iface.fcc_constraint_applies(2467));
        iface.set_fcc_constraint(true);
        assert!(iface.fcc_constraint_applies(2467));
        assert!(!iface.fcc_constraint_applies(2462));
        assert_eq!(iface.current_list().channel_reg_power(12), Some(8));
        assert_eq!(iface.current_list().channel_reg_power(11), Some(30));
    }
}
