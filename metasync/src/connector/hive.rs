// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Hive connector
//!
//! Links schemas, tables and columns of a Hive-backed catalog to the
//! `hive_db`, `hive_table` and `hive_column` entities published by the Hive
//! hook. Hive names its entities without a catalog segment, so
//! `lake.sales.orders@cm` links to `sales.orders@<hook namespace>`.

use super::traits::{EnrichContext, EntityConnector};
use crate::error::SyncResult;
use crate::model::{Entity, EntityType, QualifiedName};
use async_trait::async_trait;

pub const HIVE_DB_ATTRIBUTE: &str = "hive_db";
pub const HIVE_TABLE_ATTRIBUTE: &str = "hive_table";
pub const HIVE_COLUMN_ATTRIBUTE: &str = "hive_column";

const HIVE_DB_RELATIONSHIP: &str = "trino_schema_hive_db";
const HIVE_TABLE_RELATIONSHIP: &str = "trino_schema_hive_table";
const HIVE_COLUMN_RELATIONSHIP: &str = "trino_schema_hive_column";

#[derive(Debug, Default)]
pub struct HiveConnector;

impl HiveConnector {
    pub fn new() -> Self {
        Self
    }

    pub fn db_qualified_name(hook_namespace: &str, schema: &str) -> QualifiedName {
        QualifiedName::root(hook_namespace).child(schema)
    }

    pub fn table_qualified_name(hook_namespace: &str, schema: &str, table: &str) -> QualifiedName {
        Self::db_qualified_name(hook_namespace, schema).child(table)
    }

    pub fn column_qualified_name(
        hook_namespace: &str,
        schema: &str,
        table: &str,
        column: &str,
    ) -> QualifiedName {
        Self::table_qualified_name(hook_namespace, schema, table).child(column)
    }

    /// Attach a reference to the external entity when it exists
    async fn link(
        ctx: &EnrichContext<'_>,
        entity: &mut Entity,
        type_name: EntityType,
        qualified_name: QualifiedName,
        attribute: &str,
        relationship_type: &str,
    ) -> SyncResult<()> {
        let qualified_name = qualified_name.to_string();
        match ctx
            .store
            .find_by_qualified_name(type_name, &qualified_name)
            .await?
        {
            Some(external) => {
                log::debug!(
                    "Linking {} to {} {}",
                    entity.qualified_name,
                    type_name,
                    qualified_name
                );
                entity.add_reference(attribute, relationship_type, external.object_ref());
            }
            None => {
                log::debug!(
                    "No {} '{}' found, {} stays unlinked",
                    type_name,
                    qualified_name,
                    entity.qualified_name
                );
            }
        }
        Ok(())
    }
}

#[async_trait]
impl EntityConnector for HiveConnector {
    fn name(&self) -> &str {
        "hive"
    }

    async fn enrich_schema(
        &self,
        ctx: &EnrichContext<'_>,
        _catalog: &str,
        schema: &str,
        entity: &mut Entity,
    ) -> SyncResult<()> {
        let qualified_name = Self::db_qualified_name(ctx.hook_namespace, schema);
        Self::link(
            ctx,
            entity,
            EntityType::HiveDb,
            qualified_name,
            HIVE_DB_ATTRIBUTE,
            HIVE_DB_RELATIONSHIP,
        )
        .await
    }

    async fn enrich_table(
        &self,
        ctx: &EnrichContext<'_>,
        _catalog: &str,
        schema: &str,
        table: &str,
        entity: &mut Entity,
    ) -> SyncResult<()> {
        let qualified_name = Self::table_qualified_name(ctx.hook_namespace, schema, table);
        Self::link(
            ctx,
            entity,
            EntityType::HiveTable,
            qualified_name,
            HIVE_TABLE_ATTRIBUTE,
            HIVE_TABLE_RELATIONSHIP,
        )
        .await
    }

    async fn enrich_column(
        &self,
        ctx: &EnrichContext<'_>,
        _catalog: &str,
        schema: &str,
        table: &str,
        column: &str,
        entity: &mut Entity,
    ) -> SyncResult<()> {
        let qualified_name =
            Self::column_qualified_name(ctx.hook_namespace, schema, table, column);
        Self::link(
            ctx,
            entity,
            EntityType::HiveColumn,
            qualified_name,
            HIVE_COLUMN_ATTRIBUTE,
            HIVE_COLUMN_RELATIONSHIP,
        )
        .await
    }
}
