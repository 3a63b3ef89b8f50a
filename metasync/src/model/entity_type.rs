// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Entity type names known to the catalog store
//!
//! The `trino_*` family is owned by the reconciler. The `hive_*` family belongs
//! to a second metadata system and is only ever looked up, never created.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Entity types understood by the reconciler
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    TrinoInstance,
    TrinoCatalog,
    TrinoSchema,
    TrinoTable,
    TrinoColumn,
    HiveDb,
    HiveTable,
    HiveColumn,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::TrinoInstance => "trino_instance",
            EntityType::TrinoCatalog => "trino_catalog",
            EntityType::TrinoSchema => "trino_schema",
            EntityType::TrinoTable => "trino_table",
            EntityType::TrinoColumn => "trino_column",
            EntityType::HiveDb => "hive_db",
            EntityType::HiveTable => "hive_table",
            EntityType::HiveColumn => "hive_column",
        }
    }

    /// Relationship attribute under which the store lists this type's children.
    ///
    /// Columns and the external family have no listed children.
    pub fn children_relationship(&self) -> Option<&'static str> {
        match self {
            EntityType::TrinoInstance => Some("catalogs"),
            EntityType::TrinoCatalog => Some("schemas"),
            EntityType::TrinoSchema => Some("tables"),
            EntityType::TrinoTable => Some("columns"),
            _ => None,
        }
    }

    /// Parent relationship attribute and relationship type name for this type.
    pub fn parent_relationship(&self) -> Option<(&'static str, &'static str)> {
        match self {
            EntityType::TrinoCatalog => Some(("instance", "trino_instance_catalog")),
            EntityType::TrinoSchema => Some(("catalog", "trino_schema_catalog")),
            EntityType::TrinoTable => Some(("schema", "trino_table_schema")),
            EntityType::TrinoColumn => Some(("table", "trino_table_columns")),
            _ => None,
        }
    }

    /// Whether entities of this type are owned by the reconciler
    pub fn is_managed(&self) -> bool {
        matches!(
            self,
            EntityType::TrinoInstance
                | EntityType::TrinoCatalog
                | EntityType::TrinoSchema
                | EntityType::TrinoTable
                | EntityType::TrinoColumn
        )
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trino_instance" => Ok(EntityType::TrinoInstance),
            "trino_catalog" => Ok(EntityType::TrinoCatalog),
            "trino_schema" => Ok(EntityType::TrinoSchema),
            "trino_table" => Ok(EntityType::TrinoTable),
            "trino_column" => Ok(EntityType::TrinoColumn),
            "hive_db" => Ok(EntityType::HiveDb),
            "hive_table" => Ok(EntityType::HiveTable),
            "hive_column" => Ok(EntityType::HiveColumn),
            other => Err(format!("unknown entity type: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_round_trips_through_from_str() {
        for ty in [
            EntityType::TrinoInstance,
            EntityType::TrinoCatalog,
            EntityType::TrinoSchema,
            EntityType::TrinoTable,
            EntityType::TrinoColumn,
            EntityType::HiveDb,
            EntityType::HiveTable,
            EntityType::HiveColumn,
        ] {
            assert_eq!(ty.to_string().parse::<EntityType>(), Ok(ty));
        }
        assert!("hive_instance".parse::<EntityType>().is_err());
    }

    #[test]
    fn test_hierarchy_relationships() {
        assert_eq!(
            EntityType::TrinoInstance.children_relationship(),
            Some("catalogs")
        );
        assert_eq!(
            EntityType::TrinoColumn.parent_relationship(),
            Some(("table", "trino_table_columns"))
        );
        assert_eq!(EntityType::TrinoInstance.parent_relationship(), None);
        assert!(!EntityType::HiveTable.is_managed());
    }
}
