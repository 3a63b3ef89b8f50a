// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Error types for metadata reconciliation

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    #[error("Catalog not found: {0}")]
    CatalogNotFound(String),

    #[error("Schema not found: {0}")]
    SchemaNotFound(String),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Invalid scope: {0}")]
    InvalidScope(String),

    #[error("Invalid schedule expression '{expression}': {reason}")]
    InvalidSchedule { expression: String, reason: String },

    #[error("Source error: {0}")]
    Source(String),

    #[error("Catalog store error: {0}")]
    Store(String),

    #[error("Remote call timed out: {0}")]
    Timeout(String),

    #[error("Cancelled: {0}")]
    Cancelled(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Worker failed: {0}")]
    Worker(String),
}

impl SyncError {
    /// Whether the error stems from caller input rather than a remote failure.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            SyncError::CatalogNotFound(_)
                | SyncError::SchemaNotFound(_)
                | SyncError::TableNotFound(_)
                | SyncError::InvalidScope(_)
                | SyncError::InvalidSchedule { .. }
        )
    }
}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::Serialization(err.to_string())
    }
}

pub type SyncResult<T> = Result<T, SyncError>;
