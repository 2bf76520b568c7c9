//! In-memory rule database

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::provider::RuleSource;
use crate::types::{Alpha2, RegulatoryInfo};
use crate::{RegulatoryError, Result};

#[derive(Debug, Default, Serialize, Deserialize)]
struct RuleDatabase {
    #[serde(default)]
    domains: Vec<RegulatoryInfo>,
}

/// Rule sets keyed by country, served from memory.
///
/// ```rust
/// use regchan::providers::StaticRuleSource;
///
/// let source = StaticRuleSource::from_yaml_str(r#"
/// domains:
///   - country_code: 840
///     reg_dmn_pair: 58
///     dfs_region: Fcc
///     alpha2: US
///     rules_2g:
///       - { start_freq: 2402, end_freq: 2472, max_bw: 40, reg_power: 30 }
///     min_bw_2g: 20
///     max_bw_2g: 40
///     min_bw_5g: 20
///     max_bw_5g: 160
/// "#)?;
/// assert_eq!(source.len(), 1);
/// # Ok::<(), regchan::RegulatoryError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticRuleSource {
    domains: BTreeMap<[u8; 2], RegulatoryInfo>,
}

impl StaticRuleSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the rule set of `info.alpha2`.
    pub fn insert(&mut self, info: RegulatoryInfo) -> Result<()> {
        info.validate()?;
        self.domains.insert(info.alpha2.letters(), info);
        Ok(())
    }

    pub fn with_domain(mut self, info: RegulatoryInfo) -> Result<Self> {
        self.insert(info)?;
        Ok(self)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let database: RuleDatabase = serde_yaml_ng::from_str(yaml)?;
        let mut source = Self::new();
        for info in database.domains {
            source.insert(info)?;
        }
        debug!(domains = source.len(), "Parsed rule database");
        Ok(source)
    }

    /// Read a YAML rule database from disk.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| RegulatoryError::config_error(path.to_path_buf(), e))
            .with_context(|| format!("reading rule database {}", path.display()))?;
        let source = Self::from_yaml_str(&yaml)
            .with_context(|| format!("parsing rule database {}", path.display()))?;
        info!(path = %path.display(), domains = source.len(), "Loaded rule database");
        Ok(source)
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn countries(&self) -> impl Iterator<Item = &Alpha2> {
        self.domains.values().map(|info| &info.alpha2)
    }
}

#[async_trait::async_trait]
impl RuleSource for StaticRuleSource {
    async fn lookup(&mut self, phy_id: u8, country: &Alpha2) -> Result<Option<RegulatoryInfo>> {
        let found = self
            .domains
            .get(&country.letters())
            .map(|info| RegulatoryInfo { phy_id, ..info.clone() });
        debug!(phy_id, %country, found = found.is_some(), "Static rule lookup");
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{etsi_info, fcc_info};
    use crate::types::RegRule;

    #[tokio::test]
    async fn lookup_sets_requesting_phy() {
        let mut source = StaticRuleSource::new()
            .with_domain(fcc_info())
            .unwrap()
            .with_domain(etsi_info())
            .unwrap();

        let us = Alpha2::new("us").unwrap();
        let info = source.lookup(2, &us).await.unwrap().unwrap();
        assert_eq!(info.phy_id, 2);
        assert_eq!(info.country_code, 840);

        let fr = Alpha2::new("FR").unwrap();
        assert!(source.lookup(0, &fr).await.unwrap().is_none());
    }

    #[test]
    fn invalid_domains_are_rejected() {
        let mut info = fcc_info();
        info.rules_5g.push(RegRule::new(5900, 5800, 80, 10));
        assert!(StaticRuleSource::new().insert(info).is_err());
    }

    #[test]
    fn yaml_database_round_trip() {
        let yaml = serde_yaml_ng::to_string(&RuleDatabase { domains: vec![fcc_info(), etsi_info()] })
            .unwrap();
        let source = StaticRuleSource::from_yaml_str(&yaml).unwrap();
        assert_eq!(source.len(), 2);
        let countries: Vec<String> = source.countries().map(|c| c.to_string()).collect();
        assert_eq!(countries, vec!["DE", "US"]);

        assert!(StaticRuleSource::from_yaml_str("domains: {").is_err());
    }
}
