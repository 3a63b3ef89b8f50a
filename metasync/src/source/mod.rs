// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Source snapshot providers
//!
//! The query engine is read through [`SourceProvider`]. [`SnapshotSource`]
//! serves a JSON snapshot; [`SqlSourceProvider`] issues `information_schema`
//! queries through a caller-supplied [`QueryExecutor`].

pub mod snapshot;
pub mod sql;
pub mod traits;

pub use snapshot::{CatalogSnapshot, SnapshotSource};
pub use sql::{QueryExecutor, Row, SqlSourceProvider};
pub use traits::SourceProvider;
