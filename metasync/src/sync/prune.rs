// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Orphan pruning
//!
//! Deletes store entities whose counterpart no longer exists in the source.
//! Children always go before their parent: the tables of an orphan schema are
//! pruned before the schema itself is deleted. A parent whose orphan children
//! could not all be deleted is kept.

use super::orphans::orphans;
use crate::error::SyncResult;
use crate::model::{EntityHeader, EntityType, Guid};
use crate::store::CatalogStore;
use serde::Serialize;
use std::ops::AddAssign;
use std::sync::Arc;

/// Number of entities deleted per level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PruneStats {
    pub catalogs: usize,
    pub schemas: usize,
    pub tables: usize,
}

impl PruneStats {
    pub fn total(&self) -> usize {
        self.catalogs + self.schemas + self.tables
    }
}

impl AddAssign for PruneStats {
    fn add_assign(&mut self, other: Self) {
        self.catalogs += other.catalogs;
        self.schemas += other.schemas;
        self.tables += other.tables;
    }
}

/// What pruning below one parent achieved
#[derive(Debug, Default)]
struct Pruned {
    stats: PruneStats,
    /// Every orphan found was deleted
    complete: bool,
}

pub struct OrphanPruner {
    store: Arc<dyn CatalogStore>,
    page_size: usize,
}

impl OrphanPruner {
    pub fn new(store: Arc<dyn CatalogStore>, page_size: usize) -> Self {
        Self { store, page_size }
    }

    /// Delete catalogs of the instance that are not among `source_catalogs`
    ///
    /// A catalog is kept while any of its orphan schemas or tables survived.
    pub async fn prune_catalogs(
        &self,
        instance: &Guid,
        source_catalogs: &[String],
    ) -> SyncResult<PruneStats> {
        let stale = self
            .find_orphans(instance, EntityType::TrinoInstance, source_catalogs)
            .await?;
        let mut stats = PruneStats::default();
        if stale.is_empty() {
            return Ok(stats);
        }

        let mut deletable = Vec::with_capacity(stale.len());
        for catalog in stale {
            log::info!("Catalog '{}' no longer exists in the source", catalog.qualified_name);
            let below = self.schemas_below(&catalog.guid, &[]).await?;
            stats += below.stats;
            if below.complete {
                deletable.push(catalog);
            } else {
                log::warn!(
                    "Keeping catalog '{}': some of its children could not be deleted",
                    catalog.qualified_name
                );
            }
        }
        stats.catalogs += self.delete(&deletable).await?.0;
        Ok(stats)
    }

    /// Delete schemas of the catalog that are not among `source_schemas`
    ///
    /// A schema is kept while any of its tables survived.
    pub async fn prune_schemas(
        &self,
        catalog: &Guid,
        source_schemas: &[String],
    ) -> SyncResult<PruneStats> {
        Ok(self.schemas_below(catalog, source_schemas).await?.stats)
    }

    /// Delete tables of the schema that are not among `source_tables`
    ///
    /// Columns go with their table.
    pub async fn prune_tables(
        &self,
        schema: &Guid,
        source_tables: &[String],
    ) -> SyncResult<PruneStats> {
        Ok(self.tables_below(schema, source_tables).await?.stats)
    }

    async fn schemas_below(&self, catalog: &Guid, source_schemas: &[String]) -> SyncResult<Pruned> {
        let stale = self
            .find_orphans(catalog, EntityType::TrinoCatalog, source_schemas)
            .await?;
        let mut pruned = Pruned {
            complete: true,
            ..Pruned::default()
        };

        let mut deletable = Vec::with_capacity(stale.len());
        for schema in stale {
            log::info!("Schema '{}' no longer exists in the source", schema.qualified_name);
            let below = self.tables_below(&schema.guid, &[]).await?;
            pruned.stats += below.stats;
            if below.complete {
                deletable.push(schema);
            } else {
                log::warn!(
                    "Keeping schema '{}': some of its tables could not be deleted",
                    schema.qualified_name
                );
                pruned.complete = false;
            }
        }

        let (deleted, complete) = self.delete(&deletable).await?;
        pruned.stats.schemas += deleted;
        pruned.complete &= complete;
        Ok(pruned)
    }

    async fn tables_below(&self, schema: &Guid, source_tables: &[String]) -> SyncResult<Pruned> {
        let stale = self
            .find_orphans(schema, EntityType::TrinoSchema, source_tables)
            .await?;
        for table in &stale {
            log::info!("Table '{}' no longer exists in the source", table.qualified_name);
        }
        let (tables, complete) = self.delete(&stale).await?;
        Ok(Pruned {
            stats: PruneStats {
                tables,
                ..PruneStats::default()
            },
            complete,
        })
    }

    async fn find_orphans(
        &self,
        parent: &Guid,
        parent_type: EntityType,
        source_names: &[String],
    ) -> SyncResult<Vec<EntityHeader>> {
        let Some(relationship) = parent_type.children_relationship() else {
            return Ok(Vec::new());
        };
        let children = self
            .store
            .children_by_relationship(parent, relationship, self.page_size)
            .await?;
        Ok(orphans(source_names, &children))
    }

    /// Deleted count, and whether every entity in `stale` was deleted
    async fn delete(&self, stale: &[EntityHeader]) -> SyncResult<(usize, bool)> {
        if stale.is_empty() {
            return Ok((0, true));
        }
        let guids: Vec<Guid> = stale.iter().map(|h| h.guid.clone()).collect();
        let summary = self.store.delete_by_ids(&guids).await?;
        if !summary.not_deleted.is_empty() {
            log::warn!(
                "{} of {} entities were not deleted",
                summary.not_deleted.len(),
                guids.len()
            );
        }
        Ok((summary.deleted_count(), summary.not_deleted.is_empty()))
    }
}
