// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Snapshot source
//!
//! A complete metadata snapshot held in memory, usually loaded from a JSON
//! document of the form
//!
//! ```json
//! { "catalogs": { "lake": { "connector": "hive",
//!     "schemas": { "sales": { "orders": { "id": { "data_type": "bigint" } } } } } } }
//! ```

use super::traits::SourceProvider;
use crate::error::{SyncError, SyncResult};
use crate::model::ColumnMetadata;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub type TableSnapshot = BTreeMap<String, ColumnMetadata>;
pub type SchemaSnapshot = BTreeMap<String, TableSnapshot>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub connector: String,
    #[serde(default)]
    pub schemas: BTreeMap<String, SchemaSnapshot>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotSource {
    #[serde(default)]
    pub catalogs: BTreeMap<String, CatalogSnapshot>,
}

impl SnapshotSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: impl AsRef<Path>) -> SyncResult<Self> {
        let data = std::fs::read(path.as_ref())?;
        let snapshot: SnapshotSource = serde_json::from_slice(&data)?;
        log::debug!(
            "Loaded source snapshot with {} catalogs from {:?}",
            snapshot.catalogs.len(),
            path.as_ref()
        );
        Ok(snapshot)
    }

    pub fn with_catalog(mut self, catalog: &str, connector: &str) -> Self {
        self.catalogs
            .entry(catalog.to_string())
            .or_default()
            .connector = connector.to_string();
        self
    }

    /// Add an empty schema, creating the catalog if needed
    pub fn with_schema(mut self, catalog: &str, schema: &str) -> Self {
        self.catalogs
            .entry(catalog.to_string())
            .or_default()
            .schemas
            .entry(schema.to_string())
            .or_default();
        self
    }

    /// Add a table with its columns, creating catalog and schema if needed
    pub fn with_table<I, S>(mut self, catalog: &str, schema: &str, table: &str, columns: I) -> Self
    where
        I: IntoIterator<Item = (S, ColumnMetadata)>,
        S: Into<String>,
    {
        let columns = columns.into_iter().map(|(n, c)| (n.into(), c)).collect();
        self.catalogs
            .entry(catalog.to_string())
            .or_default()
            .schemas
            .entry(schema.to_string())
            .or_default()
            .insert(table.to_string(), columns);
        self
    }

    fn catalog(&self, catalog: &str) -> SyncResult<&CatalogSnapshot> {
        self.catalogs
            .get(catalog)
            .ok_or_else(|| SyncError::Source(format!("catalog '{}' does not exist", catalog)))
    }
}

#[async_trait]
impl SourceProvider for SnapshotSource {
    async fn list_catalogs(&self) -> SyncResult<BTreeMap<String, String>> {
        Ok(self
            .catalogs
            .iter()
            .map(|(name, c)| (name.clone(), c.connector.clone()))
            .collect())
    }

    async fn list_schemas(&self, catalog: &str, filter: Option<&str>) -> SyncResult<Vec<String>> {
        Ok(self
            .catalog(catalog)?
            .schemas
            .keys()
            .filter(|name| filter.map_or(true, |f| f == name.as_str()))
            .cloned()
            .collect())
    }

    async fn list_tables(
        &self,
        catalog: &str,
        schema: &str,
        filter: Option<&str>,
    ) -> SyncResult<Vec<String>> {
        Ok(self
            .catalog(catalog)?
            .schemas
            .get(schema)
            .map(|tables| {
                tables
                    .keys()
                    .filter(|name| filter.map_or(true, |f| f == name.as_str()))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn list_columns(
        &self,
        catalog: &str,
        schema: &str,
        table: &str,
    ) -> SyncResult<BTreeMap<String, ColumnMetadata>> {
        Ok(self
            .catalog(catalog)?
            .schemas
            .get(schema)
            .and_then(|tables| tables.get(table))
            .cloned()
            .unwrap_or_default())
    }
}
