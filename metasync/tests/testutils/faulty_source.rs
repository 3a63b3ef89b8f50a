//! Source decorators injecting failures into one catalog

use async_trait::async_trait;
use metasync::model::ColumnMetadata;
use metasync::{SnapshotSource, SourceProvider, SyncError, SyncResult};
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub enum Fault {
    /// Listing schemas of the catalog fails
    Fail,
    /// Listing schemas of the catalog takes this long
    Stall(Duration),
    /// Listing schemas of the catalog panics
    Panic,
}

/// Snapshot source misbehaving for a single catalog
pub struct FaultySource {
    inner: SnapshotSource,
    catalog: String,
    fault: Fault,
}

impl FaultySource {
    pub fn new(inner: SnapshotSource, catalog: &str, fault: Fault) -> Self {
        Self {
            inner,
            catalog: catalog.to_string(),
            fault,
        }
    }
}

#[async_trait]
impl SourceProvider for FaultySource {
    async fn list_catalogs(&self) -> SyncResult<BTreeMap<String, String>> {
        self.inner.list_catalogs().await
    }

    async fn list_schemas(&self, catalog: &str, filter: Option<&str>) -> SyncResult<Vec<String>> {
        if catalog == self.catalog {
            match self.fault {
                Fault::Fail => {
                    return Err(SyncError::Source(format!("{} is unreachable", catalog)))
                }
                Fault::Stall(delay) => tokio::time::sleep(delay).await,
                Fault::Panic => panic!("source crashed while listing {}", catalog),
            }
        }
        self.inner.list_schemas(catalog, filter).await
    }

    async fn list_tables(
        &self,
        catalog: &str,
        schema: &str,
        filter: Option<&str>,
    ) -> SyncResult<Vec<String>> {
        self.inner.list_tables(catalog, schema, filter).await
    }

    async fn list_columns(
        &self,
        catalog: &str,
        schema: &str,
        table: &str,
    ) -> SyncResult<BTreeMap<String, ColumnMetadata>> {
        self.inner.list_columns(catalog, schema, table).await
    }
}
