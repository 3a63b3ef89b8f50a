// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! In-memory catalog store
//!
//! Backs the integration tests and local CLI runs. State can be saved to and
//! loaded from a JSON file. Every create and delete is journaled so callers can
//! assert on the exact sequence of writes.

use super::traits::CatalogStore;
use crate::error::{SyncError, SyncResult};
use crate::model::{Entity, EntityHeader, EntityType, Guid};
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// An entity as held by the store, with its parent resolved to a guid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEntity {
    pub guid: Guid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_guid: Option<Guid>,
    pub entity: Entity,
}

impl StoredEntity {
    pub fn header(&self) -> EntityHeader {
        EntityHeader {
            guid: self.guid.clone(),
            type_name: self.entity.type_name,
            qualified_name: self.entity.qualified_name.clone(),
            name: self.entity.name().map(str::to_string),
        }
    }
}

/// A write observed by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Create {
        type_name: EntityType,
        qualified_name: String,
        referred: usize,
    },
    Delete {
        type_name: EntityType,
        qualified_name: String,
    },
}

#[derive(Default)]
struct StoreState {
    entities: BTreeMap<Guid, StoredEntity>,
    by_identity: HashMap<(EntityType, String), Guid>,
}

impl StoreState {
    fn from_entities(entities: Vec<StoredEntity>) -> Self {
        let mut state = StoreState::default();
        for stored in entities {
            state.insert(stored);
        }
        state
    }

    fn insert(&mut self, stored: StoredEntity) {
        self.by_identity
            .entry((stored.entity.type_name, stored.entity.qualified_name.clone()))
            .or_insert_with(|| stored.guid.clone());
        self.entities.insert(stored.guid.clone(), stored);
    }

    fn remove(&mut self, guid: &Guid) -> Option<StoredEntity> {
        let stored = self.entities.remove(guid)?;
        let key = (stored.entity.type_name, stored.entity.qualified_name.clone());
        if self.by_identity.get(&key) == Some(guid) {
            self.by_identity.remove(&key);
        }
        Some(stored)
    }

    fn lookup(&self, type_name: EntityType, qualified_name: &str) -> Option<&StoredEntity> {
        self.by_identity
            .get(&(type_name, qualified_name.to_string()))
            .and_then(|guid| self.entities.get(guid))
    }
}

/// In-memory catalog store
pub struct MemoryCatalogStore {
    state: RwLock<StoreState>,
    journal: Mutex<Vec<StoreCall>>,
}

impl MemoryCatalogStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            journal: Mutex::new(Vec::new()),
        }
    }

    /// Load a store previously written by [`MemoryCatalogStore::save`]
    ///
    /// A missing file yields an empty store.
    pub fn load(path: impl AsRef<Path>) -> SyncResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("No store file at {:?}, starting empty", path);
            return Ok(Self::new());
        }

        let data = std::fs::read(path)?;
        let entities: Vec<StoredEntity> = serde_json::from_slice(&data)?;
        log::debug!("Loaded {} entities from {:?}", entities.len(), path);

        Ok(Self {
            state: RwLock::new(StoreState::from_entities(entities)),
            journal: Mutex::new(Vec::new()),
        })
    }

    /// Write every stored entity to `path` as JSON
    pub fn save(&self, path: impl AsRef<Path>) -> SyncResult<()> {
        let entities: Vec<StoredEntity> = self.state.read().entities.values().cloned().collect();
        let data = serde_json::to_vec_pretty(&entities)?;
        std::fs::write(path.as_ref(), data)?;
        log::debug!("Saved {} entities to {:?}", entities.len(), path.as_ref());
        Ok(())
    }

    pub fn get(&self, type_name: EntityType, qualified_name: &str) -> Option<StoredEntity> {
        self.state.read().lookup(type_name, qualified_name).cloned()
    }

    pub fn get_by_guid(&self, guid: &Guid) -> Option<StoredEntity> {
        self.state.read().entities.get(guid).cloned()
    }

    pub fn len(&self) -> usize {
        self.state.read().entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().entities.is_empty()
    }

    /// Number of stored entities of one type
    pub fn count(&self, type_name: EntityType) -> usize {
        self.state
            .read()
            .entities
            .values()
            .filter(|s| s.entity.type_name == type_name)
            .count()
    }

    /// Writes observed since creation or the last [`MemoryCatalogStore::clear_journal`]
    pub fn journal(&self) -> Vec<StoreCall> {
        self.journal.lock().clone()
    }

    pub fn clear_journal(&self) {
        self.journal.lock().clear();
    }

    fn resolve_parent(
        state: &StoreState,
        pending: &HashMap<(EntityType, String), Guid>,
        entity: &Entity,
    ) -> SyncResult<Option<Guid>> {
        let Some(parent) = &entity.parent else {
            if entity.type_name.parent_relationship().is_some() {
                return Err(SyncError::Store(format!(
                    "{} '{}' has no parent relationship",
                    entity.type_name, entity.qualified_name
                )));
            }
            return Ok(None);
        };

        if let Some(guid) = &parent.target.guid {
            if state.entities.contains_key(guid) {
                return Ok(Some(guid.clone()));
            }
        }

        let key = (parent.target.type_name, parent.target.qualified_name.clone());
        pending
            .get(&key)
            .cloned()
            .or_else(|| state.by_identity.get(&key).cloned())
            .map(Some)
            .ok_or_else(|| {
                SyncError::Store(format!(
                    "unresolved {} reference '{}' on {} '{}'",
                    parent.target.type_name,
                    parent.target.qualified_name,
                    entity.type_name,
                    entity.qualified_name
                ))
            })
    }

    fn check_references(state: &StoreState, entity: &Entity) -> SyncResult<()> {
        for reference in &entity.references {
            let target = &reference.target;
            if state.lookup(target.type_name, &target.qualified_name).is_none() {
                return Err(SyncError::Store(format!(
                    "cross reference '{}' points at missing {} '{}'",
                    reference.attribute, target.type_name, target.qualified_name
                )));
            }
        }
        Ok(())
    }
}

impl Default for MemoryCatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn find_by_qualified_name(
        &self,
        type_name: EntityType,
        qualified_name: &str,
    ) -> SyncResult<Option<EntityHeader>> {
        Ok(self
            .state
            .read()
            .lookup(type_name, qualified_name)
            .map(StoredEntity::header))
    }

    async fn create(&self, entity: Entity, referred: Vec<Entity>) -> SyncResult<EntityHeader> {
        let mut state = self.state.write();

        // Assign guids up front so entities in one request can point at each other
        let mut pending: HashMap<(EntityType, String), Guid> = HashMap::new();
        let mut new_entities = Vec::new();
        let referred_count = referred.len();
        for candidate in std::iter::once(entity.clone()).chain(referred) {
            let key = (candidate.type_name, candidate.qualified_name.clone());
            if state.by_identity.contains_key(&key) || pending.contains_key(&key) {
                continue;
            }
            pending.insert(key, Guid::generate());
            new_entities.push(candidate);
        }

        let mut resolved = Vec::with_capacity(new_entities.len());
        for candidate in new_entities {
            let parent_guid = Self::resolve_parent(&state, &pending, &candidate)?;
            Self::check_references(&state, &candidate)?;
            let guid = pending[&(candidate.type_name, candidate.qualified_name.clone())].clone();
            resolved.push(StoredEntity {
                guid,
                parent_guid,
                entity: candidate,
            });
        }

        for stored in resolved {
            log::debug!(
                "Created {} entity: name={}, guid={}",
                stored.entity.type_name,
                stored.entity.qualified_name,
                stored.guid
            );
            state.insert(stored);
        }

        self.journal.lock().push(StoreCall::Create {
            type_name: entity.type_name,
            qualified_name: entity.qualified_name.clone(),
            referred: referred_count,
        });

        state
            .lookup(entity.type_name, &entity.qualified_name)
            .map(StoredEntity::header)
            .ok_or_else(|| {
                SyncError::Store(format!(
                    "{} '{}' missing after create",
                    entity.type_name, entity.qualified_name
                ))
            })
    }

    async fn children_page(
        &self,
        parent: &Guid,
        relationship: &str,
        offset: usize,
        limit: usize,
    ) -> SyncResult<Vec<EntityHeader>> {
        let state = self.state.read();
        let parent_entity = state
            .entities
            .get(parent)
            .ok_or_else(|| SyncError::Store(format!("entity {} not found", parent)))?;

        if parent_entity.entity.type_name.children_relationship() != Some(relationship) {
            return Err(SyncError::Store(format!(
                "{} has no relationship '{}'",
                parent_entity.entity.type_name, relationship
            )));
        }

        let mut children: Vec<&StoredEntity> = state
            .entities
            .values()
            .filter(|s| s.parent_guid.as_ref() == Some(parent))
            .collect();
        children.sort_by(|a, b| a.entity.qualified_name.cmp(&b.entity.qualified_name));

        Ok(children
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(StoredEntity::header)
            .collect())
    }

    async fn delete_by_id(&self, guid: &Guid) -> SyncResult<bool> {
        let mut state = self.state.write();
        let Some(removed) = state.remove(guid) else {
            return Ok(false);
        };

        // Columns are owned by their table and go with it
        if removed.entity.type_name == EntityType::TrinoTable {
            let owned: Vec<Guid> = state
                .entities
                .values()
                .filter(|s| s.parent_guid.as_ref() == Some(guid))
                .map(|s| s.guid.clone())
                .collect();
            for column in owned {
                state.remove(&column);
            }
        }

        self.journal.lock().push(StoreCall::Delete {
            type_name: removed.entity.type_name,
            qualified_name: removed.entity.qualified_name,
        });
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ObjectRef, QualifiedName};

    fn instance() -> Entity {
        Entity::new(EntityType::TrinoInstance, &QualifiedName::root("cm"), "cm")
    }

    fn catalog(name: &str) -> Entity {
        Entity::new(EntityType::TrinoCatalog, &QualifiedName::catalog("cm", name), name)
            .with_parent(ObjectRef::new(EntityType::TrinoInstance, "cm"))
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let store = MemoryCatalogStore::new();
        let header = store.create(instance(), vec![]).await.unwrap();

        let found = store
            .find_by_qualified_name(EntityType::TrinoInstance, "cm")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found, header);
        assert_eq!(found.name.as_deref(), Some("cm"));
        assert!(store
            .find_by_qualified_name(EntityType::TrinoCatalog, "cm")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_missing_parent() {
        let store = MemoryCatalogStore::new();
        let err = store.create(catalog("hive"), vec![]).await.unwrap_err();
        assert!(matches!(err, SyncError::Store(_)));
        assert!(store.is_empty());
        assert!(store.journal().is_empty());
    }

    #[tokio::test]
    async fn test_children_paging_is_ordered() {
        let store = MemoryCatalogStore::new();
        let root = store.create(instance(), vec![]).await.unwrap();
        for name in ["c", "a", "b"] {
            store.create(catalog(name), vec![]).await.unwrap();
        }

        let first = store.children_page(&root.guid, "catalogs", 0, 2).await.unwrap();
        let second = store.children_page(&root.guid, "catalogs", 2, 2).await.unwrap();
        let names: Vec<_> = first
            .iter()
            .chain(second.iter())
            .map(|h| h.name.clone().unwrap())
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);

        let all = store
            .children_by_relationship(&root.guid, "catalogs", 1)
            .await
            .unwrap();
        assert_eq!(all.len(), 3);

        assert!(store.children_page(&root.guid, "tables", 0, 10).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_table_removes_columns() {
        let store = MemoryCatalogStore::new();
        store.create(instance(), vec![]).await.unwrap();
        store.create(catalog("hive"), vec![]).await.unwrap();
        let schema_qn = QualifiedName::schema("cm", "hive", "s");
        store
            .create(
                Entity::new(EntityType::TrinoSchema, &schema_qn, "s")
                    .with_parent(ObjectRef::new(EntityType::TrinoCatalog, "hive@cm")),
                vec![],
            )
            .await
            .unwrap();

        let table_qn = QualifiedName::table("cm", "hive", "s", "t");
        let column = Entity::new(
            EntityType::TrinoColumn,
            &QualifiedName::column("cm", "hive", "s", "t", "id"),
            "id",
        )
        .with_parent(ObjectRef::new(EntityType::TrinoTable, table_qn.to_string()));
        let mut table = Entity::new(EntityType::TrinoTable, &table_qn, "t")
            .with_parent(ObjectRef::new(EntityType::TrinoSchema, schema_qn.to_string()));
        table.owned.push(column.object_ref());

        let header = store.create(table, vec![column]).await.unwrap();
        assert_eq!(store.count(EntityType::TrinoColumn), 1);

        assert!(store.delete_by_id(&header.guid).await.unwrap());
        assert_eq!(store.count(EntityType::TrinoColumn), 0);
        assert!(!store.delete_by_id(&header.guid).await.unwrap());
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = MemoryCatalogStore::new();
        store.create(instance(), vec![]).await.unwrap();
        store.create(catalog("hive"), vec![]).await.unwrap();
        store.save(&path).unwrap();

        let reloaded = MemoryCatalogStore::load(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
        let stored = reloaded.get(EntityType::TrinoCatalog, "hive@cm").unwrap();
        assert!(stored.parent_guid.is_some());
        assert!(reloaded.journal().is_empty());

        let missing = MemoryCatalogStore::load(dir.path().join("absent.json")).unwrap();
        assert!(missing.is_empty());
    }
}
