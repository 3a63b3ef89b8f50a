// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Reconciliation orchestrator
//!
//! Drives one run: selects the catalogs to process, establishes the instance
//! entity, fans catalogs out over the worker pool and, in prune mode, deletes
//! orphan catalogs of the instance concurrently with the catalog workers.

use super::pool::WorkerPool;
use super::prune::{OrphanPruner, PruneStats};
use super::remote::{CallGuard, GuardedSource, GuardedStore};
use super::report::{CatalogReport, CatalogStats, SyncReport};
use super::resolver::EntityResolver;
use super::scope::{RunMode, ScopeFilter};
use crate::config::SyncConfig;
use crate::connector::ConnectorRegistry;
use crate::error::{SyncError, SyncResult};
use crate::model::{Catalog, EntityHeader};
use crate::source::SourceProvider;
use crate::store::CatalogStore;
use chrono::Utc;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Reconciles the source's metadata into the catalog store
pub struct Reconciler {
    source: Arc<dyn SourceProvider>,
    store: Arc<dyn CatalogStore>,
    connectors: Arc<ConnectorRegistry>,
    config: Arc<SyncConfig>,
    cancel: CancellationToken,
}

impl Reconciler {
    pub fn new(
        source: Arc<dyn SourceProvider>,
        store: Arc<dyn CatalogStore>,
        connectors: Arc<ConnectorRegistry>,
        config: SyncConfig,
    ) -> Self {
        Self::with_cancellation(source, store, connectors, config, CancellationToken::new())
    }

    /// Create a reconciler whose runs stop when `cancel` fires
    pub fn with_cancellation(
        source: Arc<dyn SourceProvider>,
        store: Arc<dyn CatalogStore>,
        connectors: Arc<ConnectorRegistry>,
        config: SyncConfig,
        cancel: CancellationToken,
    ) -> Self {
        let guard = CallGuard::new(config.call_timeout(), cancel.clone());
        Self {
            source: Arc::new(GuardedSource::new(source, guard.clone())),
            store: Arc::new(GuardedStore::new(store, guard)),
            connectors,
            config: Arc::new(config),
            cancel,
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run one reconciliation
    ///
    /// Errors returned here abort the whole run (bad scope, source or store
    /// unreachable before any catalog started). Failures of individual
    /// catalogs are recorded in the report instead.
    ///
    /// # Arguments
    /// * `scope` - Catalog, schema and table to restrict the run to; the
    ///   registered catalogs when no catalog is given
    /// * `mode` - `RunMode::Prune` also deletes entities gone from the source
    ///
    /// # Returns
    /// * `Ok(SyncReport)` - Per-catalog outcomes, missing and skipped catalogs
    /// * `Err(SyncError)` - Unknown scope names, cancellation before the start,
    ///   or a failure while listing catalogs or resolving the instance
    pub async fn run(&self, scope: &ScopeFilter, mode: RunMode) -> SyncResult<SyncReport> {
        let mut report = SyncReport::new(Utc::now());
        scope.validate()?;
        log::info!("Reconciling {} ({:?})", scope, mode);

        let source_catalogs = self.source.list_catalogs().await?;
        log::info!("Found {} catalogs in the source", source_catalogs.len());

        let catalogs = match &scope.catalog {
            Some(name) => vec![self.scoped_catalog(scope, name, &source_catalogs).await?],
            None => self.registered_catalogs(&source_catalogs, &mut report),
        };
        let prune_instance = mode == RunMode::Prune && scope.catalog.is_none();

        if catalogs.is_empty() && !prune_instance {
            log::warn!("No catalogs to process");
            report.finished_at = Utc::now();
            return Ok(report);
        }

        let resolver = EntityResolver::new(Arc::clone(&self.store));
        let instance = resolver.resolve_instance(&self.config.namespace).await?.header;
        report.instance = Some(instance.clone());

        let pruner = Arc::new(OrphanPruner::new(
            Arc::clone(&self.store),
            self.config.page_size,
        ));
        let worker = Arc::new(CatalogWorker {
            source: Arc::clone(&self.source),
            resolver,
            pruner: Arc::clone(&pruner),
            instance: instance.clone(),
            mode,
        });

        let pool = WorkerPool::new(self.config.worker_limit(), self.cancel.clone());
        let create_path = pool.dispatch(
            catalogs,
            |catalog| catalog.name().to_string(),
            move |catalog| {
                let worker = Arc::clone(&worker);
                async move { worker.process_catalog(catalog).await }
            },
        );

        let source_names: Vec<String> = source_catalogs.keys().cloned().collect();
        let delete_path = async {
            if !prune_instance {
                return None;
            }
            let result = pruner.prune_catalogs(&instance.guid, &source_names).await;
            if let Err(e) = &result {
                log::error!("Pruning catalogs of instance {} failed: {}", instance.qualified_name, e);
            }
            Some(result)
        };

        let (outcomes, pruned) = tokio::join!(create_path, delete_path);

        report.catalogs = outcomes
            .into_iter()
            .map(|outcome| CatalogReport {
                catalog: outcome.label,
                result: outcome.result,
            })
            .collect();
        report.pruned_catalogs = pruned;
        report.finished_at = Utc::now();

        let failures = report.failures().len();
        if failures == 0 {
            log::info!(
                "Reconciliation of {} catalogs finished in {}ms",
                report.catalogs.len(),
                report.duration().num_milliseconds()
            );
        } else {
            log::warn!("Reconciliation finished with {} failures", failures);
        }
        Ok(report)
    }

    /// The single catalog named by the scope, validated against the source
    async fn scoped_catalog(
        &self,
        scope: &ScopeFilter,
        name: &str,
        source_catalogs: &BTreeMap<String, String>,
    ) -> SyncResult<Catalog> {
        let connector_type = source_catalogs
            .get(name)
            .ok_or_else(|| SyncError::CatalogNotFound(name.to_string()))?;

        if let Some(schema) = &scope.schema {
            let found = self.source.list_schemas(name, Some(schema)).await?;
            if found.is_empty() {
                return Err(SyncError::SchemaNotFound(format!("{}.{}", name, schema)));
            }

            if let Some(table) = &scope.table {
                let found = self.source.list_tables(name, schema, Some(table)).await?;
                if found.is_empty() {
                    return Err(SyncError::TableNotFound(format!(
                        "{}.{}.{}",
                        name, schema, table
                    )));
                }
            }
        }

        Ok(self
            .build_catalog(name, connector_type)
            .with_scope(scope.schema.clone(), scope.table.clone()))
    }

    /// Registered catalogs the source knows, in registration order
    fn registered_catalogs(
        &self,
        source_catalogs: &BTreeMap<String, String>,
        report: &mut SyncReport,
    ) -> Vec<Catalog> {
        let mut seen = HashSet::new();
        let mut catalogs = Vec::new();

        for name in &self.config.registered_catalogs {
            if !seen.insert(name.as_str()) {
                continue;
            }
            match source_catalogs.get(name) {
                Some(connector_type) => catalogs.push(self.build_catalog(name, connector_type)),
                None => {
                    log::error!("Registered catalog '{}' does not exist in the source", name);
                    report.missing.push(name.clone());
                }
            }
        }

        for name in source_catalogs.keys() {
            if !seen.contains(name.as_str()) {
                log::warn!("Catalog '{}' is not registered, skipping", name);
                report.skipped.push(name.clone());
            }
        }

        log::info!("{} catalogs selected for processing", catalogs.len());
        catalogs
    }

    fn build_catalog(&self, name: &str, connector_type: &str) -> Catalog {
        let catalog = Catalog::new(name, connector_type, &self.config.namespace);
        let Some(hook_namespace) = self.config.hook_namespace(name) else {
            return catalog;
        };

        match self.connectors.resolve(connector_type) {
            Some(connector) => {
                log::debug!(
                    "Catalog '{}' linked into '{}' through the {} connector",
                    name,
                    hook_namespace,
                    connector.name()
                );
                catalog.with_connector(hook_namespace, connector)
            }
            None => {
                log::warn!(
                    "Hook enabled for catalog '{}' but connector type '{}' is not supported",
                    name,
                    connector_type
                );
                catalog
            }
        }
    }
}

/// State shared by every catalog work item of a run
struct CatalogWorker {
    source: Arc<dyn SourceProvider>,
    resolver: EntityResolver,
    pruner: Arc<OrphanPruner>,
    instance: EntityHeader,
    mode: RunMode,
}

impl CatalogWorker {
    async fn process_catalog(&self, catalog: Catalog) -> SyncResult<CatalogStats> {
        let mut stats = CatalogStats::default();
        let name = catalog.name();

        let resolved = self.resolver.resolve_catalog(&catalog, &self.instance).await?;
        stats.catalogs.record(resolved.created);
        let catalog_entity = resolved.header;

        let schemas = self
            .source
            .list_schemas(name, catalog.schema_filter())
            .await?;
        if schemas.is_empty() {
            log::info!("No schemas found under catalog '{}'", name);
        } else {
            log::info!("Found {} schemas under catalog '{}'", schemas.len(), name);
        }

        for schema in &schemas {
            self.process_schema(&catalog, &catalog_entity, schema, &mut stats)
                .await?;
        }

        if catalog.schema_filter().is_some() || self.mode == RunMode::Prune {
            let all_schemas = match catalog.schema_filter() {
                Some(_) => self.source.list_schemas(name, None).await?,
                None => schemas,
            };
            stats.deleted += self
                .pruner
                .prune_schemas(&catalog_entity.guid, &all_schemas)
                .await?;
        }

        log::info!("Catalog '{}' reconciled", name);
        Ok(stats)
    }

    async fn process_schema(
        &self,
        catalog: &Catalog,
        catalog_entity: &EntityHeader,
        schema: &str,
        stats: &mut CatalogStats,
    ) -> SyncResult<()> {
        let name = catalog.name();
        let resolved = self
            .resolver
            .resolve_schema(catalog, catalog_entity, schema)
            .await?;
        stats.schemas.record(resolved.created);
        let schema_entity = resolved.header;

        let tables = self
            .source
            .list_tables(name, schema, catalog.table_filter())
            .await?;
        if tables.is_empty() {
            log::info!("No tables found under schema '{}.{}'", name, schema);
        } else {
            log::debug!("Found {} tables under schema '{}.{}'", tables.len(), name, schema);
        }

        for table in &tables {
            let columns = self.source.list_columns(name, schema, table).await?;
            if columns.is_empty() {
                log::info!("No columns found for table '{}.{}.{}'", name, schema, table);
            }
            let resolution = self
                .resolver
                .resolve_table(catalog, &schema_entity, schema, table, &columns)
                .await?;
            stats.tables.record(resolution.table.created);
            stats.columns.created += resolution.columns_created;
            stats.columns.existing += resolution.columns_existing;
        }

        if catalog.table_filter().is_some() || self.mode == RunMode::Prune {
            let all_tables = match catalog.table_filter() {
                Some(_) => self.source.list_tables(name, schema, None).await?,
                None => tables,
            };
            let pruned: PruneStats = self
                .pruner
                .prune_tables(&schema_entity.guid, &all_tables)
                .await?;
            stats.deleted += pruned;
        }
        Ok(())
    }
}
