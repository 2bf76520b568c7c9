//! Source of regulatory rule sets

use crate::Result;
use crate::types::{Alpha2, RegulatoryInfo};

/// External regulatory database.
///
/// Implementations answer a country lookup for one radio with the rule set
/// the engine turns into a master list. The database may live in firmware,
/// on disk or in memory; the engine only sees the answer.
#[async_trait::async_trait]
pub trait RuleSource: Send + 'static {
    /// Rule set for `country` on radio `phy_id`.
    ///
    /// Returns:
    /// - `Ok(Some(info))` - rules found, `info.phy_id == phy_id`
    /// - `Ok(None)` - the database has no entry for `country`
    /// - `Err(e)` - lookup failed; retried when `e.is_retryable()`
    async fn lookup(&mut self, phy_id: u8, country: &Alpha2) -> Result<Option<RegulatoryInfo>>;
}
