//! Fixture wiring a snapshot source and a memory store into a reconciler
//!
//! The store outlives source changes, so a test can run once, edit the
//! snapshot and run again against the same store.

use metasync::config::CatalogHookConfig;
use metasync::connector::hive::HiveConnector;
use metasync::model::{ColumnMetadata, Entity, EntityType};
use metasync::store::{CatalogStore, MemoryCatalogStore, StoreCall};
use metasync::{
    ConnectorRegistry, Reconciler, RunMode, ScopeFilter, SnapshotSource, SourceProvider,
    SyncConfig, SyncReport, SyncResult,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub struct SyncFixture {
    pub store: Arc<MemoryCatalogStore>,
    pub source: SnapshotSource,
    pub config: SyncConfig,
    pub registry: Arc<ConnectorRegistry>,
}

impl SyncFixture {
    /// Fixture with every catalog of `source` registered
    pub fn new(source: SnapshotSource) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        let config = SyncConfig {
            registered_catalogs: source.catalogs.keys().cloned().collect(),
            max_workers: Some(4),
            call_timeout_secs: 5,
            ..SyncConfig::default()
        };
        Self {
            store: Arc::new(MemoryCatalogStore::new()),
            source,
            config,
            registry: Arc::new(ConnectorRegistry::new()),
        }
    }

    pub fn with_registered(mut self, catalogs: &[&str]) -> Self {
        self.config.registered_catalogs = catalogs.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_hook(mut self, catalog: &str, hook_namespace: &str) -> Self {
        self.config.catalogs.insert(
            catalog.to_string(),
            CatalogHookConfig {
                hook_enabled: true,
                hook_namespace: Some(hook_namespace.to_string()),
            },
        );
        self
    }

    pub fn with_registry(mut self, registry: ConnectorRegistry) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.config.call_timeout_secs = secs;
        self
    }

    pub fn reconciler(&self) -> Reconciler {
        self.reconciler_over(Arc::new(self.source.clone()), CancellationToken::new())
    }

    /// Reconciler reading from `source` instead of the fixture snapshot
    pub fn reconciler_over(
        &self,
        source: Arc<dyn SourceProvider>,
        cancel: CancellationToken,
    ) -> Reconciler {
        Reconciler::with_cancellation(
            source,
            self.store.clone(),
            Arc::clone(&self.registry),
            self.config.clone(),
            cancel,
        )
    }

    pub async fn try_run(&self, scope: &ScopeFilter, mode: RunMode) -> SyncResult<SyncReport> {
        self.reconciler().run(scope, mode).await
    }

    /// Run and assert the run as a whole succeeded
    pub async fn run(&self, scope: &ScopeFilter, mode: RunMode) -> SyncReport {
        let report = self
            .try_run(scope, mode)
            .await
            .expect("reconciliation run failed");
        assert!(
            report.is_success(),
            "unexpected failures: {:?}",
            report.failures()
        );
        report
    }

    /// Run over every registered catalog and forget the writes it made
    pub async fn seed(&self) {
        self.run(&ScopeFilter::all(), RunMode::Reconcile).await;
        self.store.clear_journal();
    }

    /// Created entities since the last journal reset, in call order
    pub fn creates(&self) -> Vec<(EntityType, String)> {
        self.store
            .journal()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::Create {
                    type_name,
                    qualified_name,
                    ..
                } => Some((type_name, qualified_name)),
                StoreCall::Delete { .. } => None,
            })
            .collect()
    }

    /// Deleted entities since the last journal reset, in call order
    pub fn deletes(&self) -> Vec<(EntityType, String)> {
        self.store
            .journal()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::Delete {
                    type_name,
                    qualified_name,
                } => Some((type_name, qualified_name)),
                StoreCall::Create { .. } => None,
            })
            .collect()
    }

    pub fn exists(&self, type_name: EntityType, qualified_name: &str) -> bool {
        self.store.get(type_name, qualified_name).is_some()
    }

    /// Publish a Hive table the way the Hive hook would
    pub async fn seed_hive_table(&self, hook_namespace: &str, schema: &str, table: &str) {
        let qn = HiveConnector::table_qualified_name(hook_namespace, schema, table);
        self.store
            .create(Entity::new(EntityType::HiveTable, &qn, table), Vec::new())
            .await
            .expect("failed to seed hive table");
        self.store.clear_journal();
    }
}

/// Column metadata with only a data type
pub fn col(data_type: &str) -> ColumnMetadata {
    ColumnMetadata {
        data_type: Some(data_type.to_string()),
        ..ColumnMetadata::default()
    }
}
