// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Catalog-store entities, references and headers

use super::entity_type::EntityType;
use super::qualified_name::QualifiedName;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Attribute names written by the reconciler
pub mod attr {
    pub const NAME: &str = "name";
    pub const CONNECTOR_TYPE: &str = "connectorType";
    pub const TABLE_TYPE: &str = "type";
    pub const DATA_TYPE: &str = "dataType";
    pub const ORDINAL_POSITION: &str = "ordinalPosition";
    pub const DEFAULT_VALUE: &str = "defaultValue";
    pub const IS_NULLABLE: &str = "isNullable";
}

/// Table type recorded on every table entity
pub const BASE_TABLE: &str = "BASE_TABLE";

/// Store-assigned entity identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Guid(String);

impl Guid {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pointer to an entity by identity, optionally carrying its guid
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectRef {
    pub type_name: EntityType,
    pub qualified_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<Guid>,
}

impl ObjectRef {
    pub fn new(type_name: EntityType, qualified_name: impl Into<String>) -> Self {
        Self {
            type_name,
            qualified_name: qualified_name.into(),
            guid: None,
        }
    }
}

/// Minimal view of a persisted entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityHeader {
    pub guid: Guid,
    pub type_name: EntityType,
    pub qualified_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl EntityHeader {
    pub fn object_ref(&self) -> ObjectRef {
        ObjectRef {
            type_name: self.type_name,
            qualified_name: self.qualified_name.clone(),
            guid: Some(self.guid.clone()),
        }
    }
}

/// Typed relationship from an entity to another entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Relationship attribute on the owning entity (e.g. `schema`, `hive_table`)
    pub attribute: String,
    /// Relationship type name (e.g. `trino_table_schema`)
    pub relationship_type: String,
    pub target: ObjectRef,
}

/// An entity as built by the reconciler before (or after) persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub type_name: EntityType,
    pub qualified_name: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    /// Mandatory for every type below the instance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Relationship>,
    /// Cross references into another metadata family
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Relationship>,
    /// Composite children persisted in the same create request (table columns)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub owned: Vec<ObjectRef>,
}

impl Entity {
    pub fn new(type_name: EntityType, qualified_name: &QualifiedName, name: &str) -> Self {
        let mut attributes = Map::new();
        attributes.insert(attr::NAME.to_string(), Value::String(name.to_string()));
        Self {
            type_name,
            qualified_name: qualified_name.to_string(),
            attributes,
            parent: None,
            references: Vec::new(),
            owned: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.set_attribute(key, value);
        self
    }

    pub fn set_attribute(&mut self, key: &str, value: impl Into<Value>) {
        self.attributes.insert(key.to_string(), value.into());
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn name(&self) -> Option<&str> {
        self.attributes.get(attr::NAME).and_then(Value::as_str)
    }

    /// Wire the parent relationship appropriate for this entity's type
    pub fn with_parent(mut self, parent: ObjectRef) -> Self {
        if let Some((attribute, relationship_type)) = self.type_name.parent_relationship() {
            self.parent = Some(Relationship {
                attribute: attribute.to_string(),
                relationship_type: relationship_type.to_string(),
                target: parent,
            });
        }
        self
    }

    /// Attach a typed cross reference to an existing entity
    pub fn add_reference(&mut self, attribute: &str, relationship_type: &str, target: ObjectRef) {
        self.references.retain(|r| r.attribute != attribute);
        self.references.push(Relationship {
            attribute: attribute.to_string(),
            relationship_type: relationship_type.to_string(),
            target,
        });
    }

    pub fn reference(&self, attribute: &str) -> Option<&Relationship> {
        self.references.iter().find(|r| r.attribute == attribute)
    }

    pub fn object_ref(&self) -> ObjectRef {
        ObjectRef::new(self.type_name, self.qualified_name.clone())
    }
}

/// Column metadata reported by the source
///
/// Every field is optional; an absent field is never written as an attribute.
/// `is_nullable` is tri-state: `None` when the source reported nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordinal_position: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_nullable: Option<bool>,
}

impl ColumnMetadata {
    pub fn apply_to(&self, entity: &mut Entity) {
        if let Some(data_type) = &self.data_type {
            entity.set_attribute(attr::DATA_TYPE, data_type.clone());
        }
        if let Some(position) = self.ordinal_position {
            entity.set_attribute(attr::ORDINAL_POSITION, position);
        }
        if let Some(default_value) = &self.default_value {
            entity.set_attribute(attr::DEFAULT_VALUE, default_value.clone());
        }
        if let Some(nullable) = self.is_nullable {
            entity.set_attribute(attr::IS_NULLABLE, nullable);
        }
    }
}
