// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Run scope and mode

use crate::error::{SyncError, SyncResult};
use std::fmt;

/// Narrows a run to one catalog, one schema or one table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeFilter {
    pub catalog: Option<String>,
    pub schema: Option<String>,
    pub table: Option<String>,
}

impl ScopeFilter {
    /// Every registered catalog
    pub fn all() -> Self {
        Self::default()
    }

    pub fn catalog(name: impl Into<String>) -> Self {
        Self {
            catalog: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// A schema needs a catalog, a table needs a schema
    pub fn validate(&self) -> SyncResult<()> {
        if self.schema.is_some() && self.catalog.is_none() {
            return Err(SyncError::InvalidScope(
                "a schema can only be given together with a catalog".into(),
            ));
        }
        if self.table.is_some() && self.schema.is_none() {
            return Err(SyncError::InvalidScope(
                "a table can only be given together with a schema".into(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for ScopeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.catalog, &self.schema, &self.table) {
            (None, _, _) => write!(f, "all registered catalogs"),
            (Some(c), None, _) => write!(f, "catalog {}", c),
            (Some(c), Some(s), None) => write!(f, "schema {}.{}", c, s),
            (Some(c), Some(s), Some(t)) => write!(f, "table {}.{}.{}", c, s, t),
        }
    }
}

/// Whether a run also deletes entities that vanished from the source
///
/// `Reconcile` still prunes siblings of a schema or table filter; `Prune`
/// additionally prunes catalogs of the instance and the full contents of every
/// processed catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunMode {
    #[default]
    Reconcile,
    Prune,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_parents() {
        assert!(ScopeFilter::all().validate().is_ok());
        assert!(ScopeFilter::catalog("c").with_schema("s").with_table("t").validate().is_ok());

        let orphan_schema = ScopeFilter {
            schema: Some("s".into()),
            ..ScopeFilter::default()
        };
        assert!(matches!(orphan_schema.validate(), Err(SyncError::InvalidScope(_))));

        let orphan_table = ScopeFilter::catalog("c").with_table("t");
        assert!(matches!(orphan_table.validate(), Err(SyncError::InvalidScope(_))));
    }

    #[test]
    fn test_display() {
        assert_eq!(ScopeFilter::all().to_string(), "all registered catalogs");
        assert_eq!(
            ScopeFilter::catalog("c").with_schema("s").to_string(),
            "schema c.s"
        );
    }
}
