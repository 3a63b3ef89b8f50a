// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Entity connector trait definition
//!
//! A connector cross-links entities of the managed family to entities of a
//! second metadata family (for example a Hive metastore harvested by another
//! hook). Connectors look entities up; they never create them.

use crate::error::SyncResult;
use crate::model::Entity;
use crate::store::CatalogStore;
use async_trait::async_trait;

/// What a connector gets to work with while enriching one entity
pub struct EnrichContext<'a> {
    /// Store used to look up entities of the external family
    pub store: &'a dyn CatalogStore,
    /// Namespace the external family is registered under
    pub hook_namespace: &'a str,
}

/// Enrichment strategy for one connector type
///
/// Every operation runs only when the entity is about to be created and may
/// attach cross references to it. All operations default to no-ops.
#[async_trait]
pub trait EntityConnector: Send + Sync {
    /// Connector type this strategy serves (lower case)
    fn name(&self) -> &str;

    async fn enrich_catalog(
        &self,
        _ctx: &EnrichContext<'_>,
        _catalog: &str,
        _entity: &mut Entity,
    ) -> SyncResult<()> {
        Ok(())
    }

    async fn enrich_schema(
        &self,
        _ctx: &EnrichContext<'_>,
        _catalog: &str,
        _schema: &str,
        _entity: &mut Entity,
    ) -> SyncResult<()> {
        Ok(())
    }

    async fn enrich_table(
        &self,
        _ctx: &EnrichContext<'_>,
        _catalog: &str,
        _schema: &str,
        _table: &str,
        _entity: &mut Entity,
    ) -> SyncResult<()> {
        Ok(())
    }

    async fn enrich_column(
        &self,
        _ctx: &EnrichContext<'_>,
        _catalog: &str,
        _schema: &str,
        _table: &str,
        _column: &str,
        _entity: &mut Entity,
    ) -> SyncResult<()> {
        Ok(())
    }
}
