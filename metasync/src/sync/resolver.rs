// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Find-or-create resolution of managed entities
//!
//! An entity that already exists is returned as found, without updating any
//! of its attributes. Only when an entity is about to be created does the
//! catalog's connector get a chance to enrich it. A new table is written in a
//! single request together with all of its columns.

use crate::connector::{EnrichContext, EntityConnector};
use crate::error::SyncResult;
use crate::model::{
    attr, Catalog, ColumnMetadata, Entity, EntityHeader, EntityType, ObjectRef, QualifiedName,
    BASE_TABLE,
};
use crate::store::CatalogStore;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Outcome of a find-or-create
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub header: EntityHeader,
    pub created: bool,
}

/// Outcome of resolving a table and its columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableResolution {
    pub table: Resolved,
    pub columns_created: usize,
    pub columns_existing: usize,
}

/// Which level an enrichment applies to, with the names it needs
#[derive(Debug, Clone, Copy)]
pub enum EnrichTarget<'a> {
    Catalog {
        catalog: &'a str,
    },
    Schema {
        catalog: &'a str,
        schema: &'a str,
    },
    Table {
        catalog: &'a str,
        schema: &'a str,
        table: &'a str,
    },
    Column {
        catalog: &'a str,
        schema: &'a str,
        table: &'a str,
        column: &'a str,
    },
}

/// A connector call pending on an entity about to be created
pub struct Enrichment<'a> {
    connector: &'a dyn EntityConnector,
    hook_namespace: &'a str,
    target: EnrichTarget<'a>,
}

impl<'a> Enrichment<'a> {
    /// Enrichment for `target`, present only when the catalog's hook is enabled
    pub fn for_catalog(catalog: &'a Catalog, target: EnrichTarget<'a>) -> Option<Self> {
        catalog
            .enrichment()
            .map(|(connector, hook_namespace)| Self {
                connector,
                hook_namespace,
                target,
            })
    }

    async fn apply(&self, store: &dyn CatalogStore, entity: &mut Entity) -> SyncResult<()> {
        let ctx = EnrichContext {
            store,
            hook_namespace: self.hook_namespace,
        };
        match self.target {
            EnrichTarget::Catalog { catalog } => {
                self.connector.enrich_catalog(&ctx, catalog, entity).await
            }
            EnrichTarget::Schema { catalog, schema } => {
                self.connector
                    .enrich_schema(&ctx, catalog, schema, entity)
                    .await
            }
            EnrichTarget::Table {
                catalog,
                schema,
                table,
            } => {
                self.connector
                    .enrich_table(&ctx, catalog, schema, table, entity)
                    .await
            }
            EnrichTarget::Column {
                catalog,
                schema,
                table,
                column,
            } => {
                self.connector
                    .enrich_column(&ctx, catalog, schema, table, column, entity)
                    .await
            }
        }
    }
}

/// Resolves managed entities against the catalog store
#[derive(Clone)]
pub struct EntityResolver {
    store: Arc<dyn CatalogStore>,
}

impl EntityResolver {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Return the existing entity with the draft's identity, or create the draft
    ///
    /// An entity found by type and qualified name is returned as stored; its
    /// attributes are never updated. Only a draft that is about to be created
    /// goes through the connector enrichment.
    ///
    /// # Arguments
    /// * `draft` - Entity to create when no entity with its identity exists
    /// * `enrichment` - Connector hook applied to the draft before it is created
    ///
    /// # Returns
    /// * `Ok(Resolved)` - Header of the found or created entity, with `created` set
    ///   when this call wrote it
    /// * `Err(SyncError)` - The lookup or the create failed
    pub async fn find_or_create(
        &self,
        draft: Entity,
        enrichment: Option<Enrichment<'_>>,
    ) -> SyncResult<Resolved> {
        if let Some(existing) = self
            .store
            .find_by_qualified_name(draft.type_name, &draft.qualified_name)
            .await?
        {
            log::debug!(
                "{} '{}' already exists with guid {}",
                existing.type_name,
                existing.qualified_name,
                existing.guid
            );
            return Ok(Resolved {
                header: existing,
                created: false,
            });
        }

        let mut entity = draft;
        if let Some(enrichment) = enrichment {
            enrichment.apply(self.store.as_ref(), &mut entity).await?;
        }

        let header = self.store.create(entity, Vec::new()).await?;
        log::info!(
            "Created {} '{}' with guid {}",
            header.type_name,
            header.qualified_name,
            header.guid
        );
        Ok(Resolved {
            header,
            created: true,
        })
    }

    /// The instance entity for `namespace`
    pub async fn resolve_instance(&self, namespace: &str) -> SyncResult<Resolved> {
        let draft = Entity::new(
            EntityType::TrinoInstance,
            &QualifiedName::root(namespace),
            namespace,
        );
        self.find_or_create(draft, None).await
    }

    pub async fn resolve_catalog(
        &self,
        catalog: &Catalog,
        instance: &EntityHeader,
    ) -> SyncResult<Resolved> {
        let draft = Entity::new(
            EntityType::TrinoCatalog,
            &catalog.qualified_name(),
            catalog.name(),
        )
        .with_attribute(attr::CONNECTOR_TYPE, catalog.connector_type())
        .with_parent(instance.object_ref());

        let enrichment = Enrichment::for_catalog(
            catalog,
            EnrichTarget::Catalog {
                catalog: catalog.name(),
            },
        );
        self.find_or_create(draft, enrichment).await
    }

    pub async fn resolve_schema(
        &self,
        catalog: &Catalog,
        catalog_entity: &EntityHeader,
        schema: &str,
    ) -> SyncResult<Resolved> {
        let draft = Entity::new(
            EntityType::TrinoSchema,
            &catalog.schema_qualified_name(schema),
            schema,
        )
        .with_parent(catalog_entity.object_ref());

        let enrichment = Enrichment::for_catalog(
            catalog,
            EnrichTarget::Schema {
                catalog: catalog.name(),
                schema,
            },
        );
        self.find_or_create(draft, enrichment).await
    }

    /// Resolve a table and every column the source reports for it
    ///
    /// A new table is created in one request together with all of its columns.
    /// For an existing table each column is resolved individually, so columns
    /// added to the source since the last run are created under it.
    pub async fn resolve_table(
        &self,
        catalog: &Catalog,
        schema_entity: &EntityHeader,
        schema: &str,
        table: &str,
        columns: &BTreeMap<String, ColumnMetadata>,
    ) -> SyncResult<TableResolution> {
        let qualified_name = catalog.table_qualified_name(schema, table);

        if let Some(existing) = self
            .store
            .find_by_qualified_name(EntityType::TrinoTable, &qualified_name.to_string())
            .await?
        {
            log::debug!(
                "Table '{}' already exists with guid {}",
                existing.qualified_name,
                existing.guid
            );
            let table_ref = existing.object_ref();
            let mut resolution = TableResolution {
                table: Resolved {
                    header: existing,
                    created: false,
                },
                columns_created: 0,
                columns_existing: 0,
            };

            for (column, metadata) in columns {
                let draft = column_draft(catalog, schema, table, column, metadata, &table_ref);
                let enrichment = Enrichment::for_catalog(
                    catalog,
                    EnrichTarget::Column {
                        catalog: catalog.name(),
                        schema,
                        table,
                        column,
                    },
                );
                if self.find_or_create(draft, enrichment).await?.created {
                    resolution.columns_created += 1;
                } else {
                    resolution.columns_existing += 1;
                }
            }
            return Ok(resolution);
        }

        let mut entity = Entity::new(EntityType::TrinoTable, &qualified_name, table)
            .with_attribute(attr::TABLE_TYPE, BASE_TABLE)
            .with_parent(schema_entity.object_ref());
        if let Some(enrichment) = Enrichment::for_catalog(
            catalog,
            EnrichTarget::Table {
                catalog: catalog.name(),
                schema,
                table,
            },
        ) {
            enrichment.apply(self.store.as_ref(), &mut entity).await?;
        }

        let table_ref = entity.object_ref();
        let mut column_entities = Vec::with_capacity(columns.len());
        for (column, metadata) in columns {
            let mut column_entity =
                column_draft(catalog, schema, table, column, metadata, &table_ref);
            if let Some(enrichment) = Enrichment::for_catalog(
                catalog,
                EnrichTarget::Column {
                    catalog: catalog.name(),
                    schema,
                    table,
                    column,
                },
            ) {
                enrichment
                    .apply(self.store.as_ref(), &mut column_entity)
                    .await?;
            }
            entity.owned.push(column_entity.object_ref());
            column_entities.push(column_entity);
        }

        let columns_created = column_entities.len();
        let header = self.store.create(entity, column_entities).await?;
        log::info!(
            "Created table '{}' with {} columns, guid {}",
            header.qualified_name,
            columns_created,
            header.guid
        );

        Ok(TableResolution {
            table: Resolved {
                header,
                created: true,
            },
            columns_created,
            columns_existing: 0,
        })
    }
}

fn column_draft(
    catalog: &Catalog,
    schema: &str,
    table: &str,
    column: &str,
    metadata: &ColumnMetadata,
    table_ref: &ObjectRef,
) -> Entity {
    let mut entity = Entity::new(
        EntityType::TrinoColumn,
        &catalog.column_qualified_name(schema, table, column),
        column,
    )
    .with_parent(table_ref.clone());
    metadata.apply_to(&mut entity);
    entity
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::hive::{HiveConnector, HIVE_TABLE_ATTRIBUTE};
    use crate::store::{MemoryCatalogStore, StoreCall};
    use serde_json::Value;

    async fn setup() -> (Arc<MemoryCatalogStore>, EntityResolver, EntityHeader) {
        let store = Arc::new(MemoryCatalogStore::new());
        let resolver = EntityResolver::new(store.clone());
        let instance = resolver.resolve_instance("cm").await.unwrap();
        assert!(instance.created);
        (store, resolver, instance.header)
    }

    fn columns() -> BTreeMap<String, ColumnMetadata> {
        let mut columns = BTreeMap::new();
        columns.insert(
            "id".to_string(),
            ColumnMetadata {
                data_type: Some("bigint".into()),
                ordinal_position: Some(1),
                default_value: None,
                is_nullable: Some(false),
            },
        );
        columns.insert("note".to_string(), ColumnMetadata::default());
        columns
    }

    #[tokio::test]
    async fn test_existing_entity_is_returned_unchanged() {
        let (store, resolver, instance) = setup().await;
        let catalog = Catalog::new("lake", "hive", "cm");

        let first = resolver.resolve_catalog(&catalog, &instance).await.unwrap();
        assert!(first.created);

        // Same identity, different connector type: attributes stay as first written
        let changed = Catalog::new("lake", "iceberg", "cm");
        let second = resolver.resolve_catalog(&changed, &instance).await.unwrap();
        assert!(!second.created);
        assert_eq!(second.header.guid, first.header.guid);

        let stored = store.get(EntityType::TrinoCatalog, "lake@cm").unwrap();
        assert_eq!(
            stored.entity.attribute(attr::CONNECTOR_TYPE),
            Some(&Value::from("hive"))
        );
    }

    #[tokio::test]
    async fn test_new_table_is_created_with_columns_in_one_request() {
        let (store, resolver, instance) = setup().await;
        let catalog = Catalog::new("lake", "hive", "cm");
        let cat = resolver.resolve_catalog(&catalog, &instance).await.unwrap();
        let schema = resolver
            .resolve_schema(&catalog, &cat.header, "sales")
            .await
            .unwrap();
        store.clear_journal();

        let resolution = resolver
            .resolve_table(&catalog, &schema.header, "sales", "orders", &columns())
            .await
            .unwrap();
        assert!(resolution.table.created);
        assert_eq!(resolution.columns_created, 2);

        assert_eq!(
            store.journal(),
            vec![StoreCall::Create {
                type_name: EntityType::TrinoTable,
                qualified_name: "lake.sales.orders@cm".into(),
                referred: 2,
            }]
        );

        let table = store.get(EntityType::TrinoTable, "lake.sales.orders@cm").unwrap();
        assert_eq!(table.entity.attribute(attr::TABLE_TYPE), Some(&Value::from(BASE_TABLE)));
        assert_eq!(table.entity.owned.len(), 2);

        let id = store.get(EntityType::TrinoColumn, "lake.sales.orders.id@cm").unwrap();
        assert_eq!(id.parent_guid, Some(table.guid.clone()));
        assert_eq!(id.entity.attribute(attr::IS_NULLABLE), Some(&Value::Bool(false)));

        let note = store.get(EntityType::TrinoColumn, "lake.sales.orders.note@cm").unwrap();
        assert!(note.entity.attribute(attr::IS_NULLABLE).is_none());
        assert!(note.entity.attribute(attr::DATA_TYPE).is_none());
    }

    #[tokio::test]
    async fn test_existing_table_gains_new_columns() {
        let (store, resolver, instance) = setup().await;
        let catalog = Catalog::new("lake", "hive", "cm");
        let cat = resolver.resolve_catalog(&catalog, &instance).await.unwrap();
        let schema = resolver
            .resolve_schema(&catalog, &cat.header, "sales")
            .await
            .unwrap();

        let mut initial = columns();
        initial.remove("note");
        resolver
            .resolve_table(&catalog, &schema.header, "sales", "orders", &initial)
            .await
            .unwrap();

        let resolution = resolver
            .resolve_table(&catalog, &schema.header, "sales", "orders", &columns())
            .await
            .unwrap();
        assert!(!resolution.table.created);
        assert_eq!(resolution.columns_created, 1);
        assert_eq!(resolution.columns_existing, 1);
        assert_eq!(store.count(EntityType::TrinoColumn), 2);
    }

    #[tokio::test]
    async fn test_enrichment_links_existing_external_table() {
        let (store, resolver, instance) = setup().await;
        store
            .create(
                Entity::new(
                    EntityType::HiveTable,
                    &HiveConnector::table_qualified_name("wh", "sales", "orders"),
                    "orders",
                ),
                Vec::new(),
            )
            .await
            .unwrap();

        let catalog =
            Catalog::new("lake", "hive", "cm").with_connector("wh", Arc::new(HiveConnector::new()));
        let cat = resolver.resolve_catalog(&catalog, &instance).await.unwrap();
        let schema = resolver
            .resolve_schema(&catalog, &cat.header, "sales")
            .await
            .unwrap();
        resolver
            .resolve_table(&catalog, &schema.header, "sales", "orders", &columns())
            .await
            .unwrap();

        let table = store.get(EntityType::TrinoTable, "lake.sales.orders@cm").unwrap();
        let link = table.entity.reference(HIVE_TABLE_ATTRIBUTE).unwrap();
        assert_eq!(link.target.qualified_name, "sales.orders@wh");

        // No hive_db exists, so the schema is created without a link
        let schema = store.get(EntityType::TrinoSchema, "lake.sales@cm").unwrap();
        assert!(schema.entity.references.is_empty());
        assert_eq!(store.count(EntityType::HiveDb), 0);
    }
}
