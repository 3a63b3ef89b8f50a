// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Pluggable entity connectors
//!
//! Adding a connector requires implementing [`EntityConnector`] and adding one
//! line to [`register_all_connectors`].

pub mod hive;
pub mod rdbms;
pub mod registry;
pub mod traits;

use std::sync::Arc;

pub use registry::ConnectorRegistry;
pub use traits::{EnrichContext, EntityConnector};

/// Register all built-in connectors
pub fn register_all_connectors(registry: &mut ConnectorRegistry) {
    registry.register("hive", Arc::new(hive::HiveConnector::new()));
    registry.register("mysql", Arc::new(rdbms::RdbmsConnector::new()));

    log::debug!("Connector registration complete");
}
