// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! metasync - reconcile query-engine metadata into a metadata catalog
//!
//! metasync mirrors the catalogs, schemas, tables and columns a query engine
//! reports into a metadata-catalog service, as a hierarchy of typed entities
//! identified by qualified name.
//!
//! # Features
//!
//! - **Find-or-create**: existing entities are never updated, so repeated runs
//!   over an unchanged source write nothing
//! - **Orphan pruning**: entities gone from the source are deleted, children
//!   before parents
//! - **Connectors**: per connector type cross-linking into a second metadata
//!   family (Hive), only when the external entity exists
//! - **Bounded concurrency**: one work item per catalog over a worker pool,
//!   with per-call timeouts and cancellation
//!
//! # Usage
//!
//! ```bash
//! # Reconcile every registered catalog
//! metasync --config sync.json --source snapshot.json --store store.json
//!
//! # Refresh one schema, pruning its siblings gone from the source
//! metasync --config sync.json --source snapshot.json --store store.json -c lake -s sales
//!
//! # Full cleanup every 30 minutes
//! metasync --config sync.json --source snapshot.json --store store.json \
//!     --delete-non-existing -x "*/30 * * * *"
//! ```

pub mod config;
pub mod connector;
pub mod error;
pub mod model;
pub mod schedule;
pub mod source;
pub mod store;
pub mod sync;

pub use config::SyncConfig;
pub use connector::{ConnectorRegistry, EntityConnector};
pub use error::{SyncError, SyncResult};
pub use schedule::{run_scheduled, CronSchedule};
pub use source::{SnapshotSource, SourceProvider};
pub use store::{CatalogStore, MemoryCatalogStore};
pub use sync::{Reconciler, RunMode, ScopeFilter, SyncReport};

/// metasync version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// metasync crate name
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
