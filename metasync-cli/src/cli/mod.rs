// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI module for metasync
//!
//! Parses the run scope and flags, drives one reconciliation run or a
//! cron-scheduled series of runs, and prints the run report.

pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::Cli;
pub use handlers::handle_sync;
