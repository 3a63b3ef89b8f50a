// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Entity model and identity scheme
//!
//! The managed hierarchy is instance → catalog → schema → table → column.
//! Every entity is identified by its type plus its qualified name.

pub mod catalog;
pub mod entity;
pub mod entity_type;
pub mod qualified_name;

pub use catalog::Catalog;
pub use entity::{attr, ColumnMetadata, Entity, EntityHeader, Guid, ObjectRef, Relationship, BASE_TABLE};
pub use entity_type::EntityType;
pub use qualified_name::QualifiedName;
