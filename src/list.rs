//! Channel list bound to a region table

use crate::table::{ChannelTable, TableRegion};
use crate::types::Channel;

/// One channel per slot of a region table, index-aligned with the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelList {
    table: &'static ChannelTable,
    channels: Vec<Channel>,
}

impl ChannelList {
    /// Every slot disabled, carrying the table's default bandwidths.
    pub fn disabled(table: &'static ChannelTable) -> Self {
        let channels = table
            .entries()
            .iter()
            .map(|e| Channel::disabled(e.center_freq, e.number, e.min_bw, e.max_bw))
            .collect();
        Self { table, channels }
    }

    pub fn table(&self) -> &'static ChannelTable {
        self.table
    }

    pub fn region(&self) -> TableRegion {
        self.table.region()
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub(crate) fn channels_mut(&mut self) -> &mut [Channel] {
        &mut self.channels
    }

    pub fn get(&self, index: usize) -> Option<&Channel> {
        self.channels.get(index)
    }

    /// Channel carrying legacy number `number`, lowest slot first.
    pub fn by_number(&self, number: u16) -> Option<&Channel> {
        self.table.index_of_channel(number).and_then(|idx| self.channels.get(idx))
    }

    /// Channel centered exactly on `freq`.
    pub fn by_freq(&self, freq: u32) -> Option<&Channel> {
        self.table.index_of_freq(freq).and_then(|idx| self.channels.get(idx))
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Channel> {
        self.channels.iter()
    }
}
