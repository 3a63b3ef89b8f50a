// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Source snapshot provider trait

use crate::error::SyncResult;
use crate::model::ColumnMetadata;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Read-only view of the query engine's metadata
///
/// Every run reads a full snapshot through this trait; nothing is cached
/// between runs.
#[async_trait]
pub trait SourceProvider: Send + Sync {
    /// Catalog name to connector type
    async fn list_catalogs(&self) -> SyncResult<BTreeMap<String, String>>;

    /// Schemas of `catalog`, optionally restricted to one name
    async fn list_schemas(&self, catalog: &str, filter: Option<&str>) -> SyncResult<Vec<String>>;

    /// Tables of `catalog.schema`, optionally restricted to one name
    async fn list_tables(
        &self,
        catalog: &str,
        schema: &str,
        filter: Option<&str>,
    ) -> SyncResult<Vec<String>>;

    /// Columns of `catalog.schema.table` keyed by column name
    async fn list_columns(
        &self,
        catalog: &str,
        schema: &str,
        table: &str,
    ) -> SyncResult<BTreeMap<String, ColumnMetadata>>;
}
