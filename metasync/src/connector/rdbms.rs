// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Relational database connector
//!
//! Registered so MySQL-backed catalogs resolve to a known strategy. There is
//! no relational metadata family to link to yet, so every operation is a no-op.

use super::traits::EntityConnector;
use async_trait::async_trait;

#[derive(Debug, Default)]
pub struct RdbmsConnector;

impl RdbmsConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EntityConnector for RdbmsConnector {
    fn name(&self) -> &str {
        "mysql"
    }
}
