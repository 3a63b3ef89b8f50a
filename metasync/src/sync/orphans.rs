// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Orphan detection

use crate::model::EntityHeader;
use std::collections::HashSet;

/// Children whose name does not appear among the source names
///
/// Children without a name attribute are never reported: an entity that cannot
/// be matched against the source is left alone.
pub fn orphans<I, S>(source_names: I, children: &[EntityHeader]) -> Vec<EntityHeader>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let names: HashSet<String> = source_names
        .into_iter()
        .map(|name| name.as_ref().to_string())
        .collect();

    children
        .iter()
        .filter(|child| match &child.name {
            Some(name) => !names.contains(name.as_str()),
            None => {
                log::debug!("Skipping unnamed child {}", child.qualified_name);
                false
            }
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntityType, Guid};

    fn header(name: Option<&str>) -> EntityHeader {
        EntityHeader {
            guid: Guid::generate(),
            type_name: EntityType::TrinoSchema,
            qualified_name: format!("c.{}@cm", name.unwrap_or("?")),
            name: name.map(str::to_string),
        }
    }

    fn names(headers: &[EntityHeader]) -> Vec<String> {
        headers.iter().filter_map(|h| h.name.clone()).collect()
    }

    #[test]
    fn test_orphans_is_set_difference() {
        let children = vec![header(Some("s1")), header(Some("s2")), header(Some("s3"))];
        let found = orphans(["s1", "s2"], &children);
        assert_eq!(names(&found), vec!["s3"]);
    }

    #[test]
    fn test_unnamed_children_are_ignored() {
        let children = vec![header(None), header(Some("gone"))];
        let found = orphans(Vec::<String>::new(), &children);
        assert_eq!(names(&found), vec!["gone"]);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_orphans_over_all_subsets() {
        let universe = ["a", "b", "c", "d"];
        for source_mask in 0u8..16 {
            for store_mask in 0u8..16 {
                let source: Vec<&str> = (0..4)
                    .filter(|i| source_mask & (1 << i) != 0)
                    .map(|i| universe[i])
                    .collect();
                let children: Vec<EntityHeader> = (0..4)
                    .filter(|i| store_mask & (1 << i) != 0)
                    .map(|i| header(Some(universe[i])))
                    .collect();

                let found = orphans(&source, &children);
                let expected: Vec<String> = (0..4)
                    .filter(|i| store_mask & (1 << i) != 0 && source_mask & (1 << i) == 0)
                    .map(|i| universe[i].to_string())
                    .collect();
                assert_eq!(names(&found), expected);
            }
        }
    }
}
