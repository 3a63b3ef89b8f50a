// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Metadata-catalog store seam
//!
//! The REST transport to the real catalog service is an external
//! collaborator; it plugs in by implementing [`CatalogStore`].

pub mod memory;
pub mod traits;

pub use memory::{MemoryCatalogStore, StoreCall, StoredEntity};
pub use traits::{CatalogStore, DeleteSummary, DEFAULT_PAGE_SIZE};
