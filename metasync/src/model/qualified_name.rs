// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Qualified names
//!
//! A qualified name is the dotted path of ancestor names suffixed with
//! `@<namespace>`, e.g. `hive.sales.orders@prod`. The root of a hierarchy is
//! named by the bare namespace. Qualified names are the only identity key the
//! reconciler trusts.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QualifiedName {
    namespace: String,
    path: Vec<String>,
}

impl QualifiedName {
    /// Root qualified name: the namespace itself
    pub fn root(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            path: Vec::new(),
        }
    }

    /// Extend the dotted path by one segment
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut path = self.path.clone();
        path.push(segment.into());
        Self {
            namespace: self.namespace.clone(),
            path,
        }
    }

    pub fn catalog(namespace: &str, catalog: &str) -> Self {
        Self::root(namespace).child(catalog)
    }

    pub fn schema(namespace: &str, catalog: &str, schema: &str) -> Self {
        Self::catalog(namespace, catalog).child(schema)
    }

    pub fn table(namespace: &str, catalog: &str, schema: &str, table: &str) -> Self {
        Self::schema(namespace, catalog, schema).child(table)
    }

    pub fn column(namespace: &str, catalog: &str, schema: &str, table: &str, column: &str) -> Self {
        Self::table(namespace, catalog, schema, table).child(column)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Last path segment, or the namespace for a root name
    pub fn leaf(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or(&self.namespace)
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.namespace)
        } else {
            write!(f, "{}@{}", self.path.join("."), self.namespace)
        }
    }
}
