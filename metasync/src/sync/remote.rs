// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Per-call timeout and cancellation for remote collaborators
//!
//! [`GuardedSource`] and [`GuardedStore`] wrap injected handles so that every
//! call to the query engine or the catalog store is bounded by a timeout and
//! abandoned as soon as the run's cancellation token fires.

use crate::error::{SyncError, SyncResult};
use crate::model::{ColumnMetadata, Entity, EntityHeader, EntityType, Guid};
use crate::source::SourceProvider;
use crate::store::CatalogStore;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Timeout plus cancellation applied to one remote call
#[derive(Debug, Clone)]
pub struct CallGuard {
    timeout: Duration,
    cancel: CancellationToken,
}

impl CallGuard {
    pub fn new(timeout: Duration, cancel: CancellationToken) -> Self {
        Self { timeout, cancel }
    }

    pub async fn call<T, F>(&self, operation: &str, fut: F) -> SyncResult<T>
    where
        F: Future<Output = SyncResult<T>>,
    {
        if self.cancel.is_cancelled() {
            return Err(SyncError::Cancelled(operation.to_string()));
        }

        tokio::select! {
            _ = self.cancel.cancelled() => Err(SyncError::Cancelled(operation.to_string())),
            result = tokio::time::timeout(self.timeout, fut) => match result {
                Ok(inner) => inner,
                Err(_) => Err(SyncError::Timeout(format!(
                    "{} did not finish within {:?}",
                    operation, self.timeout
                ))),
            },
        }
    }
}

/// Source provider with every call guarded
pub struct GuardedSource {
    inner: Arc<dyn SourceProvider>,
    guard: CallGuard,
}

impl GuardedSource {
    pub fn new(inner: Arc<dyn SourceProvider>, guard: CallGuard) -> Self {
        Self { inner, guard }
    }
}

#[async_trait]
impl SourceProvider for GuardedSource {
    async fn list_catalogs(&self) -> SyncResult<BTreeMap<String, String>> {
        self.guard
            .call("list catalogs", self.inner.list_catalogs())
            .await
    }

    async fn list_schemas(&self, catalog: &str, filter: Option<&str>) -> SyncResult<Vec<String>> {
        let operation = format!("list schemas of {}", catalog);
        self.guard
            .call(&operation, self.inner.list_schemas(catalog, filter))
            .await
    }

    async fn list_tables(
        &self,
        catalog: &str,
        schema: &str,
        filter: Option<&str>,
    ) -> SyncResult<Vec<String>> {
        let operation = format!("list tables of {}.{}", catalog, schema);
        self.guard
            .call(&operation, self.inner.list_tables(catalog, schema, filter))
            .await
    }

    async fn list_columns(
        &self,
        catalog: &str,
        schema: &str,
        table: &str,
    ) -> SyncResult<BTreeMap<String, ColumnMetadata>> {
        let operation = format!("list columns of {}.{}.{}", catalog, schema, table);
        self.guard
            .call(&operation, self.inner.list_columns(catalog, schema, table))
            .await
    }
}

/// Catalog store with every call guarded
pub struct GuardedStore {
    inner: Arc<dyn CatalogStore>,
    guard: CallGuard,
}

impl GuardedStore {
    pub fn new(inner: Arc<dyn CatalogStore>, guard: CallGuard) -> Self {
        Self { inner, guard }
    }
}

#[async_trait]
impl CatalogStore for GuardedStore {
    async fn find_by_qualified_name(
        &self,
        type_name: EntityType,
        qualified_name: &str,
    ) -> SyncResult<Option<EntityHeader>> {
        let operation = format!("find {} {}", type_name, qualified_name);
        self.guard
            .call(
                &operation,
                self.inner.find_by_qualified_name(type_name, qualified_name),
            )
            .await
    }

    async fn create(&self, entity: Entity, referred: Vec<Entity>) -> SyncResult<EntityHeader> {
        let operation = format!("create {} {}", entity.type_name, entity.qualified_name);
        self.guard
            .call(&operation, self.inner.create(entity, referred))
            .await
    }

    async fn children_page(
        &self,
        parent: &Guid,
        relationship: &str,
        offset: usize,
        limit: usize,
    ) -> SyncResult<Vec<EntityHeader>> {
        let operation = format!("list {} of {}", relationship, parent);
        self.guard
            .call(
                &operation,
                self.inner.children_page(parent, relationship, offset, limit),
            )
            .await
    }

    async fn delete_by_id(&self, guid: &Guid) -> SyncResult<bool> {
        let operation = format!("delete {}", guid);
        self.guard
            .call(&operation, self.inner.delete_by_id(guid))
            .await
    }
}
