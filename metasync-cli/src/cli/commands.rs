// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Command-line arguments

use clap::Parser;
use metasync::{RunMode, ScopeFilter};
use std::path::PathBuf;

/// Reconcile query-engine metadata into a metadata catalog
#[derive(Parser, Debug)]
#[command(name = "metasync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Process only this catalog (registered or not)
    #[arg(short = 'c', long)]
    pub catalog: Option<String>,

    /// Process only this schema of the catalog
    #[arg(short = 's', long, requires = "catalog")]
    pub schema: Option<String>,

    /// Process only this table of the schema
    #[arg(short = 't', long, requires = "schema")]
    pub table: Option<String>,

    /// Repeat the run on this cron schedule until interrupted
    #[arg(short = 'x', long = "cron-expression", value_name = "EXPR")]
    pub cron_expression: Option<String>,

    /// Also delete catalogs, schemas and tables that no longer exist upstream
    #[arg(long)]
    pub delete_non_existing: bool,

    /// Run configuration (JSON)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Source metadata snapshot (JSON)
    #[arg(long, value_name = "FILE")]
    pub source: PathBuf,

    /// Catalog store file, loaded before and saved after every run
    #[arg(long, value_name = "FILE")]
    pub store: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<log::Level>,
}

impl Cli {
    pub fn scope(&self) -> ScopeFilter {
        ScopeFilter {
            catalog: self.catalog.clone(),
            schema: self.schema.clone(),
            table: self.table.clone(),
        }
    }

    pub fn mode(&self) -> RunMode {
        if self.delete_non_existing {
            RunMode::Prune
        } else {
            RunMode::Reconcile
        }
    }

    /// Checks clap cannot express; failures are usage errors
    pub fn validate(&self) -> Result<(), String> {
        self.scope().validate().map_err(|e| e.to_string())?;
        for (flag, value) in [
            ("--catalog", &self.catalog),
            ("--schema", &self.schema),
            ("--table", &self.table),
        ] {
            if matches!(value, Some(v) if v.trim().is_empty()) {
                return Err(format!("{} must not be empty", flag));
            }
        }
        Ok(())
    }
}
