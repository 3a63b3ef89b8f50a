// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! A source catalog selected for processing

use super::qualified_name::QualifiedName;
use crate::connector::EntityConnector;
use std::fmt;
use std::sync::Arc;

/// One catalog of the query engine, together with its processing scope and
/// the enrichment connector chosen for it (if its hook is enabled)
#[derive(Clone)]
pub struct Catalog {
    name: String,
    connector_type: String,
    instance_namespace: String,
    hook_namespace: Option<String>,
    connector: Option<Arc<dyn EntityConnector>>,
    schema_filter: Option<String>,
    table_filter: Option<String>,
}

impl Catalog {
    pub fn new(
        name: impl Into<String>,
        connector_type: impl Into<String>,
        instance_namespace: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            connector_type: connector_type.into(),
            instance_namespace: instance_namespace.into(),
            hook_namespace: None,
            connector: None,
            schema_filter: None,
            table_filter: None,
        }
    }

    /// Attach an enrichment connector linking into the family rooted at `hook_namespace`
    pub fn with_connector(
        mut self,
        hook_namespace: impl Into<String>,
        connector: Arc<dyn EntityConnector>,
    ) -> Self {
        self.hook_namespace = Some(hook_namespace.into());
        self.connector = Some(connector);
        self
    }

    /// Narrow processing to one schema and, within it, one table
    pub fn with_scope(mut self, schema: Option<String>, table: Option<String>) -> Self {
        self.schema_filter = schema;
        self.table_filter = table;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn connector_type(&self) -> &str {
        &self.connector_type
    }

    pub fn schema_filter(&self) -> Option<&str> {
        self.schema_filter.as_deref()
    }

    pub fn table_filter(&self) -> Option<&str> {
        self.table_filter.as_deref()
    }

    /// Connector and external namespace, present only when the hook is enabled
    pub fn enrichment(&self) -> Option<(&dyn EntityConnector, &str)> {
        match (&self.connector, &self.hook_namespace) {
            (Some(connector), Some(namespace)) => Some((connector.as_ref(), namespace.as_str())),
            _ => None,
        }
    }

    pub fn qualified_name(&self) -> QualifiedName {
        QualifiedName::catalog(&self.instance_namespace, &self.name)
    }

    pub fn schema_qualified_name(&self, schema: &str) -> QualifiedName {
        QualifiedName::schema(&self.instance_namespace, &self.name, schema)
    }

    pub fn table_qualified_name(&self, schema: &str, table: &str) -> QualifiedName {
        QualifiedName::table(&self.instance_namespace, &self.name, schema, table)
    }

    pub fn column_qualified_name(&self, schema: &str, table: &str, column: &str) -> QualifiedName {
        QualifiedName::column(&self.instance_namespace, &self.name, schema, table, column)
    }
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("name", &self.name)
            .field("connector_type", &self.connector_type)
            .field("instance_namespace", &self.instance_namespace)
            .field("hook_namespace", &self.hook_namespace)
            .field("connector", &self.connector.as_ref().map(|c| c.name().to_string()))
            .field("schema_filter", &self.schema_filter)
            .field("table_filter", &self.table_filter)
            .finish()
    }
}
