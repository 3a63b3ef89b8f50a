// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Reconciliation engine
//!
//! - `reconciler`: run orchestration and catalog work items
//! - `resolver`: find-or-create of managed entities, with enrichment
//! - `prune` / `orphans`: deletion of entities gone from the source
//! - `pool`: bounded worker pool
//! - `remote`: timeout and cancellation for every remote call

pub mod orphans;
pub mod pool;
pub mod prune;
pub mod reconciler;
pub mod remote;
pub mod report;
pub mod resolver;
pub mod scope;

pub use orphans::orphans;
pub use pool::{WorkOutcome, WorkerPool};
pub use prune::{OrphanPruner, PruneStats};
pub use reconciler::Reconciler;
pub use remote::{CallGuard, GuardedSource, GuardedStore};
pub use report::{CatalogReport, CatalogStats, EntityCounts, SyncReport};
pub use resolver::{EnrichTarget, Enrichment, EntityResolver, Resolved, TableResolution};
pub use scope::{RunMode, ScopeFilter};
