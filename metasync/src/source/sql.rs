// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! `information_schema` source adapter
//!
//! Builds the metadata queries the engine answers and maps their rows into
//! the source model. Statement execution is delegated to a [`QueryExecutor`].

use super::traits::SourceProvider;
use crate::error::{SyncError, SyncResult};
use crate::model::ColumnMetadata;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};

/// One result row, column label to textual value (`None` for SQL NULL)
pub type Row = HashMap<String, Option<String>>;

/// Executes a SQL statement against the query engine
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn query(&self, sql: &str) -> SyncResult<Vec<Row>>;
}

pub fn quote_identifier(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

pub fn catalogs_query() -> String {
    "SELECT catalog_name, connector_name FROM system.metadata.catalogs".to_string()
}

pub fn schemas_query(catalog: &str, filter: Option<&str>) -> String {
    let mut sql = format!(
        "SELECT schema_name FROM {}.information_schema.schemata",
        quote_identifier(catalog)
    );
    if let Some(schema) = filter {
        sql.push_str(&format!(" WHERE schema_name = {}", quote_literal(schema)));
    }
    sql
}

pub fn tables_query(catalog: &str, schema: &str, filter: Option<&str>) -> String {
    let mut sql = format!(
        "SELECT table_name FROM {}.information_schema.tables WHERE table_schema = {}",
        quote_identifier(catalog),
        quote_literal(schema)
    );
    if let Some(table) = filter {
        sql.push_str(&format!(" AND table_name = {}", quote_literal(table)));
    }
    sql
}

pub fn columns_query(catalog: &str, schema: &str, table: &str) -> String {
    format!(
        "SELECT column_name, ordinal_position, column_default, is_nullable, data_type \
         FROM {}.information_schema.columns WHERE table_schema = {} AND table_name = {}",
        quote_identifier(catalog),
        quote_literal(schema),
        quote_literal(table)
    )
}

fn text<'a>(row: &'a Row, column: &str) -> Option<&'a str> {
    row.get(column).and_then(|v| v.as_deref())
}

fn required<'a>(row: &'a Row, column: &str) -> SyncResult<&'a str> {
    text(row, column)
        .ok_or_else(|| SyncError::Source(format!("result row is missing '{}'", column)))
}

/// `YES` is nullable, any other non-empty value is not, empty means unknown
pub fn parse_nullable(value: Option<&str>) -> Option<bool> {
    match value.map(str::trim) {
        None | Some("") => None,
        Some(v) => Some(v.eq_ignore_ascii_case("YES")),
    }
}

pub fn column_from_row(row: &Row) -> SyncResult<(String, ColumnMetadata)> {
    let name = required(row, "column_name")?.to_string();
    let metadata = ColumnMetadata {
        data_type: text(row, "data_type").map(str::to_string),
        ordinal_position: text(row, "ordinal_position").and_then(|p| p.trim().parse().ok()),
        default_value: text(row, "column_default").map(str::to_string),
        is_nullable: parse_nullable(text(row, "is_nullable")),
    };
    Ok((name, metadata))
}

/// Source provider speaking to the engine through SQL
pub struct SqlSourceProvider<E: QueryExecutor> {
    executor: E,
}

impl<E: QueryExecutor> SqlSourceProvider<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    async fn single_column(&self, sql: &str, column: &str) -> SyncResult<Vec<String>> {
        self.executor
            .query(sql)
            .await?
            .iter()
            .map(|row| required(row, column).map(str::to_string))
            .collect()
    }
}

#[async_trait]
impl<E: QueryExecutor> SourceProvider for SqlSourceProvider<E> {
    async fn list_catalogs(&self) -> SyncResult<BTreeMap<String, String>> {
        let rows = self.executor.query(&catalogs_query()).await?;
        rows.iter()
            .map(|row| {
                Ok((
                    required(row, "catalog_name")?.to_string(),
                    text(row, "connector_name").unwrap_or_default().to_string(),
                ))
            })
            .collect()
    }

    async fn list_schemas(&self, catalog: &str, filter: Option<&str>) -> SyncResult<Vec<String>> {
        self.single_column(&schemas_query(catalog, filter), "schema_name")
            .await
    }

    async fn list_tables(
        &self,
        catalog: &str,
        schema: &str,
        filter: Option<&str>,
    ) -> SyncResult<Vec<String>> {
        self.single_column(&tables_query(catalog, schema, filter), "table_name")
            .await
    }

    async fn list_columns(
        &self,
        catalog: &str,
        schema: &str,
        table: &str,
    ) -> SyncResult<BTreeMap<String, ColumnMetadata>> {
        let rows = self
            .executor
            .query(&columns_query(catalog, schema, table))
            .await?;
        rows.iter().map(column_from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn row(pairs: &[(&str, Option<&str>)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
            .collect()
    }

    struct CannedExecutor {
        rows: Vec<Row>,
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl QueryExecutor for CannedExecutor {
        async fn query(&self, sql: &str) -> SyncResult<Vec<Row>> {
            self.seen.lock().push(sql.to_string());
            Ok(self.rows.clone())
        }
    }

    #[test]
    fn test_queries_quote_names() {
        assert_eq!(
            schemas_query("my\"cat", Some("o'brien")),
            "SELECT schema_name FROM \"my\"\"cat\".information_schema.schemata WHERE schema_name = 'o''brien'"
        );
        assert_eq!(
            tables_query("lake", "sales", Some("orders")),
            "SELECT table_name FROM \"lake\".information_schema.tables WHERE table_schema = 'sales' AND table_name = 'orders'"
        );
        assert!(columns_query("lake", "sales", "orders")
            .ends_with("WHERE table_schema = 'sales' AND table_name = 'orders'"));
    }

    #[test]
    fn test_nullable_is_tri_state() {
        assert_eq!(parse_nullable(Some("YES")), Some(true));
        assert_eq!(parse_nullable(Some("yes")), Some(true));
        assert_eq!(parse_nullable(Some("NO")), Some(false));
        assert_eq!(parse_nullable(Some("")), None);
        assert_eq!(parse_nullable(None), None);
    }

    #[test]
    fn test_column_row_mapping() {
        let (name, metadata) = column_from_row(&row(&[
            ("column_name", Some("id")),
            ("ordinal_position", Some("1")),
            ("column_default", None),
            ("is_nullable", Some("NO")),
            ("data_type", Some("bigint")),
        ]))
        .unwrap();

        assert_eq!(name, "id");
        assert_eq!(metadata.ordinal_position, Some(1));
        assert_eq!(metadata.default_value, None);
        assert_eq!(metadata.is_nullable, Some(false));
        assert_eq!(metadata.data_type.as_deref(), Some("bigint"));

        assert!(column_from_row(&row(&[("data_type", Some("int"))])).is_err());
    }

    #[tokio::test]
    async fn test_provider_lists_catalogs() {
        let provider = SqlSourceProvider::new(CannedExecutor {
            rows: vec![
                row(&[("catalog_name", Some("lake")), ("connector_name", Some("hive"))]),
                row(&[("catalog_name", Some("system")), ("connector_name", None)]),
            ],
            seen: Mutex::new(Vec::new()),
        });

        let catalogs = provider.list_catalogs().await.unwrap();
        assert_eq!(catalogs.get("lake").map(String::as_str), Some("hive"));
        assert_eq!(catalogs.get("system").map(String::as_str), Some(""));
        assert_eq!(provider.executor.seen.lock()[0], catalogs_query());
    }
}
