// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Connector registry implementation
//!
//! Maps a catalog's declared connector type to the enrichment strategy for it.
//! Lookups are case-insensitive; unknown types simply have no strategy.

use super::traits::EntityConnector;
use std::collections::HashMap;
use std::sync::Arc;

/// Central registry for all entity connectors
pub struct ConnectorRegistry {
    /// Map of lower-cased connector type to strategy
    connectors: HashMap<String, Arc<dyn EntityConnector>>,
}

impl ConnectorRegistry {
    /// Create a registry with every built-in connector registered
    pub fn new() -> Self {
        let mut registry = Self::empty();
        super::register_all_connectors(&mut registry);
        registry
    }

    /// Create a registry without any connector
    pub fn empty() -> Self {
        Self {
            connectors: HashMap::new(),
        }
    }

    /// Register a connector under a connector type
    ///
    /// A later registration for the same type replaces the earlier one.
    ///
    /// # Arguments
    /// * `connector_type` - Connector type as the query engine reports it, any case
    /// * `connector` - Enrichment strategy for catalogs of that type
    pub fn register(&mut self, connector_type: &str, connector: Arc<dyn EntityConnector>) {
        let key = connector_type.to_ascii_lowercase();
        if self.connectors.insert(key, connector).is_some() {
            log::warn!("Replaced connector for type '{}'", connector_type);
        } else {
            log::debug!("Registered connector for type '{}'", connector_type);
        }
    }

    /// Look up the strategy for a connector type
    ///
    /// # Arguments
    /// * `connector_type` - Connector type of a catalog, matched case-insensitively
    ///
    /// # Returns
    /// * `Some(Arc<dyn EntityConnector>)` if a connector is registered for the type
    /// * `None` if the type has no connector; its catalogs are mirrored without links
    pub fn resolve(&self, connector_type: &str) -> Option<Arc<dyn EntityConnector>> {
        let connector = self
            .connectors
            .get(&connector_type.to_ascii_lowercase())
            .cloned();
        if connector.is_none() {
            log::debug!("{} type does not have a connector implemented", connector_type);
        }
        connector
    }

    pub fn has_connector(&self, connector_type: &str) -> bool {
        self.connectors
            .contains_key(&connector_type.to_ascii_lowercase())
    }

    /// Registered connector types, sorted
    pub fn connector_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.connectors.keys().cloned().collect();
        types.sort();
        types
    }
}

impl Default for ConnectorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::rdbms::RdbmsConnector;

    #[test]
    fn test_builtin_connectors() {
        let registry = ConnectorRegistry::new();
        assert_eq!(registry.connector_types(), vec!["hive", "mysql"]);
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let registry = ConnectorRegistry::new();
        assert_eq!(registry.resolve("HIVE").unwrap().name(), "hive");
        assert_eq!(registry.resolve("MySql").unwrap().name(), "mysql");
        assert!(registry.has_connector("Hive"));
    }

    #[test]
    fn test_unknown_type_has_no_connector() {
        let registry = ConnectorRegistry::new();
        assert!(registry.resolve("iceberg").is_none());
        assert!(ConnectorRegistry::empty().resolve("hive").is_none());
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = ConnectorRegistry::empty();
        registry.register("Postgres", Arc::new(RdbmsConnector::new()));
        registry.register("postgres", Arc::new(RdbmsConnector::new()));
        assert_eq!(registry.connector_types(), vec!["postgres"]);
    }
}
