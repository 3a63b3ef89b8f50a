// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Run report

use super::prune::PruneStats;
use crate::error::SyncError;
use crate::model::EntityHeader;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::ops::AddAssign;

/// Entities found and created at one level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EntityCounts {
    pub created: usize,
    pub existing: usize,
}

impl EntityCounts {
    pub fn record(&mut self, created: bool) {
        if created {
            self.created += 1;
        } else {
            self.existing += 1;
        }
    }
}

impl AddAssign for EntityCounts {
    fn add_assign(&mut self, other: Self) {
        self.created += other.created;
        self.existing += other.existing;
    }
}

/// What one catalog worker did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub catalogs: EntityCounts,
    pub schemas: EntityCounts,
    pub tables: EntityCounts,
    pub columns: EntityCounts,
    pub deleted: PruneStats,
}

impl AddAssign for CatalogStats {
    fn add_assign(&mut self, other: Self) {
        self.catalogs += other.catalogs;
        self.schemas += other.schemas;
        self.tables += other.tables;
        self.columns += other.columns;
        self.deleted += other.deleted;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogReport {
    pub catalog: String,
    pub result: Result<CatalogStats, SyncError>,
}

/// Outcome of one reconciliation run
#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub instance: Option<EntityHeader>,
    /// Per-catalog outcomes, in processing order
    pub catalogs: Vec<CatalogReport>,
    /// Registered catalogs the source does not know
    pub missing: Vec<String>,
    /// Source catalogs that are not registered
    pub skipped: Vec<String>,
    /// Outcome of pruning catalogs of the instance, when that ran
    pub pruned_catalogs: Option<Result<PruneStats, SyncError>>,
}

impl SyncReport {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            finished_at: started_at,
            instance: None,
            catalogs: Vec::new(),
            missing: Vec::new(),
            skipped: Vec::new(),
            pruned_catalogs: None,
        }
    }

    /// True when every catalog and the instance-level prune succeeded
    pub fn is_success(&self) -> bool {
        self.catalogs.iter().all(|c| c.result.is_ok())
            && !matches!(self.pruned_catalogs, Some(Err(_)))
    }

    pub fn failures(&self) -> Vec<(&str, &SyncError)> {
        let mut failures: Vec<(&str, &SyncError)> = self
            .catalogs
            .iter()
            .filter_map(|c| c.result.as_ref().err().map(|e| (c.catalog.as_str(), e)))
            .collect();
        if let Some(Err(e)) = &self.pruned_catalogs {
            failures.push(("<instance>", e));
        }
        failures
    }

    /// Sum of every successful catalog, plus catalogs pruned at instance level
    pub fn totals(&self) -> CatalogStats {
        let mut totals = CatalogStats::default();
        for stats in self.catalogs.iter().filter_map(|c| c.result.as_ref().ok()) {
            totals += *stats;
        }
        if let Some(Ok(pruned)) = &self.pruned_catalogs {
            totals.deleted += *pruned;
        }
        totals
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}
