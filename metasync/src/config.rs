// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Run configuration
//!
//! Loaded from a JSON document. Every field has a default, so `{}` is a valid
//! (if not very useful) configuration.

use crate::error::{SyncError, SyncResult};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// Per-catalog enrichment settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogHookConfig {
    /// Whether entities of this catalog are cross-linked through a connector
    #[serde(default)]
    pub hook_enabled: bool,
    /// Namespace of the external metadata family to link into
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hook_namespace: Option<String>,
}

/// Configuration for a reconciliation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Namespace of the query-engine instance
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Catalogs processed when the caller does not name one
    ///
    /// Accepts a JSON list or a comma-separated string.
    #[serde(default, deserialize_with = "deserialize_catalog_list")]
    pub registered_catalogs: Vec<String>,
    /// Enrichment settings keyed by catalog name
    #[serde(default)]
    pub catalogs: BTreeMap<String, CatalogHookConfig>,
    /// Upper bound on concurrent catalog workers (default: available parallelism)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_workers: Option<usize>,
    /// Timeout applied to every call to the source or the catalog store
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,
    /// Page size used when listing children in the catalog store
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_namespace() -> String {
    "cm".to_string()
}

fn default_call_timeout_secs() -> u64 {
    60
}

fn default_page_size() -> usize {
    crate::store::DEFAULT_PAGE_SIZE
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogList {
    List(Vec<String>),
    Csv(String),
}

fn deserialize_catalog_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match CatalogList::deserialize(deserializer)? {
        CatalogList::List(items) => items
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        CatalogList::Csv(csv) => parse_catalog_list(&csv),
    })
}

/// Split a comma-separated catalog list, trimming entries and dropping blanks
pub fn parse_catalog_list(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            registered_catalogs: Vec::new(),
            catalogs: BTreeMap::new(),
            max_workers: None,
            call_timeout_secs: default_call_timeout_secs(),
            page_size: default_page_size(),
        }
    }
}

impl SyncConfig {
    /// Load and validate a configuration file
    pub fn load(path: impl AsRef<Path>) -> SyncResult<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .map_err(|e| SyncError::Config(format!("cannot read {:?}: {}", path, e)))?;
        let config: SyncConfig = serde_json::from_slice(&data)
            .map_err(|e| SyncError::Config(format!("cannot parse {:?}: {}", path, e)))?;
        config.validate()?;
        log::debug!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    pub fn validate(&self) -> SyncResult<()> {
        if self.namespace.trim().is_empty() {
            return Err(SyncError::Config("namespace must not be empty".into()));
        }
        if self.call_timeout_secs == 0 {
            return Err(SyncError::Config("call_timeout_secs must be positive".into()));
        }
        if self.page_size == 0 {
            return Err(SyncError::Config("page_size must be positive".into()));
        }
        if self.max_workers == Some(0) {
            return Err(SyncError::Config("max_workers must be positive".into()));
        }
        Ok(())
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    /// Worker limit: the configured bound, else the machine's parallelism
    pub fn worker_limit(&self) -> usize {
        self.max_workers
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1)
            })
            .max(1)
    }

    /// Hook namespace for a catalog whose hook is enabled
    ///
    /// An enabled hook without a namespace cannot derive external names and is
    /// treated as disabled.
    pub fn hook_namespace(&self, catalog: &str) -> Option<&str> {
        let hook = self.catalogs.get(catalog).filter(|h| h.hook_enabled)?;
        match hook.hook_namespace.as_deref().map(str::trim) {
            Some(namespace) if !namespace.is_empty() => Some(namespace),
            _ => {
                log::warn!(
                    "Hook enabled for catalog '{}' without a hook namespace; enrichment disabled",
                    catalog
                );
                None
            }
        }
    }
}
