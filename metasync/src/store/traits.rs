// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Catalog store trait definition
//!
//! The metadata-catalog service is reached only through this trait. The
//! reconciler never holds a concrete client; handles are injected as
//! `Arc<dyn CatalogStore>`.

use crate::error::SyncResult;
use crate::model::{Entity, EntityHeader, EntityType, Guid};
use async_trait::async_trait;

/// Page size used when paging through relationship children
pub const DEFAULT_PAGE_SIZE: usize = 10_000;

/// Result of a batched delete
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteSummary {
    pub deleted: Vec<Guid>,
    pub not_deleted: Vec<Guid>,
}

impl DeleteSummary {
    pub fn deleted_count(&self) -> usize {
        self.deleted.len()
    }
}

/// Operations the reconciler needs from the metadata-catalog service
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Exact lookup by type and qualified name
    ///
    /// When the store holds more than one match the first one is returned.
    async fn find_by_qualified_name(
        &self,
        type_name: EntityType,
        qualified_name: &str,
    ) -> SyncResult<Option<EntityHeader>>;

    /// Persist `entity` together with entities it refers to
    ///
    /// Referred entities are created in the same request; this is how a table
    /// and all of its columns are written at once.
    ///
    /// # Arguments
    /// * `entity` - Primary entity to create
    /// * `referred` - Entities created alongside it, such as a table's columns
    ///
    /// # Returns
    /// * `Ok(EntityHeader)` - Header of the primary entity with its assigned guid
    /// * `Err(SyncError::Store)` - The store rejected the request
    async fn create(&self, entity: Entity, referred: Vec<Entity>) -> SyncResult<EntityHeader>;

    /// One page of the children reachable through `relationship`
    ///
    /// # Arguments
    /// * `parent` - Guid of the parent entity
    /// * `relationship` - Relationship attribute of the parent, e.g. `schemas`
    /// * `offset` - Number of children to skip
    /// * `limit` - Maximum number of children returned
    async fn children_page(
        &self,
        parent: &Guid,
        relationship: &str,
        offset: usize,
        limit: usize,
    ) -> SyncResult<Vec<EntityHeader>>;

    /// Delete a single entity; `Ok(false)` when the store deleted nothing
    async fn delete_by_id(&self, guid: &Guid) -> SyncResult<bool>;

    /// All children reachable through `relationship`, paging until a short page
    async fn children_by_relationship(
        &self,
        parent: &Guid,
        relationship: &str,
        page_size: usize,
    ) -> SyncResult<Vec<EntityHeader>> {
        let page_size = page_size.max(1);
        let mut children = Vec::new();

        for page in 0.. {
            let offset = page * page_size;
            log::debug!(
                "Retrieving '{}' of {}: offset={}, page_size={}",
                relationship,
                parent,
                offset,
                page_size
            );

            let batch = self
                .children_page(parent, relationship, offset, page_size)
                .await?;
            let count = batch.len();
            children.extend(batch);

            if count < page_size {
                break;
            }
        }

        log::debug!(
            "Retrieved {} '{}' of {}",
            children.len(),
            relationship,
            parent
        );
        Ok(children)
    }

    /// Delete every id in `guids`, one call per id
    ///
    /// # Returns
    /// * `Ok(DeleteSummary)` - Ids the store deleted and ids it reported as not
    ///   deleted
    /// * `Err(SyncError)` - The first failing call; later ids are not attempted
    async fn delete_by_ids(&self, guids: &[Guid]) -> SyncResult<DeleteSummary> {
        let mut summary = DeleteSummary::default();
        if guids.is_empty() {
            log::debug!("No entity to delete");
            return Ok(summary);
        }

        for guid in guids {
            if self.delete_by_id(guid).await? {
                log::info!("Entity with guid {} is deleted", guid);
                summary.deleted.push(guid.clone());
            } else {
                log::info!("Entity with guid {} is not deleted", guid);
                summary.not_deleted.push(guid.clone());
            }
        }
        Ok(summary)
    }
}
