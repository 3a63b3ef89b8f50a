// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! metasync CLI entry point

use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;

mod cli;
use cli::Cli;

fn main() -> ExitCode {
    // Parse command line arguments first to get log level
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        log::LevelFilter::Debug
    } else if let Some(level) = cli.log_level {
        level.to_level_filter()
    } else {
        // Can still be overridden by RUST_LOG
        log::LevelFilter::Warn
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    if let Err(e) = cli.validate() {
        eprintln!("{} {}", "error:".red().bold(), e);
        return ExitCode::from(2);
    }

    log::info!("{} {} starting", metasync::CRATE_NAME, metasync::VERSION);

    match cli::handle_sync(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::from(1)
        }
    }
}
