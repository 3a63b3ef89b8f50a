// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Run handlers

use super::commands::Cli;
use super::output::ReportFormatter;
use colored::Colorize;
use metasync::{
    run_scheduled, ConnectorRegistry, CronSchedule, MemoryCatalogStore, Reconciler, RunMode,
    ScopeFilter, SnapshotSource, SyncConfig, SyncResult,
};
use std::cell::Cell;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Run once, or on the cron schedule; returns whether every run succeeded
pub fn handle_sync(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run(cli))
}

async fn run(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let schedule = cli
        .cron_expression
        .as_deref()
        .map(CronSchedule::parse)
        .transpose()?;

    let config = match &cli.config {
        Some(path) => SyncConfig::load(path)?,
        None => {
            log::warn!("No configuration given, using defaults");
            SyncConfig::default()
        }
    };
    let source = SnapshotSource::load(&cli.source)?;
    let store = Arc::new(match &cli.store {
        Some(path) => MemoryCatalogStore::load(path)?,
        None => MemoryCatalogStore::new(),
    });

    let reconciler = Reconciler::new(
        Arc::new(source),
        store.clone(),
        Arc::new(ConnectorRegistry::new()),
        config,
    );
    log::info!(
        "Processing catalogs with up to {} workers",
        reconciler.config().worker_limit()
    );

    let cancel = reconciler.cancellation_token();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupted, cancelling the current run");
            interrupt.cancel();
        }
    });

    let scope = cli.scope();
    let mode = cli.mode();
    let store_path = cli.store.as_deref();

    match schedule {
        None => Ok(run_once(&reconciler, &store, store_path, &scope, mode).await?),
        Some(schedule) => {
            println!(
                "{} {}",
                "Running on schedule".bold().green(),
                schedule.expression()
            );
            let succeeded = run_on_schedule(
                &schedule,
                cancel,
                &reconciler,
                &store,
                store_path,
                &scope,
                mode,
            )
            .await;
            Ok(succeeded)
        }
    }
}

/// Repeat runs on `schedule` until cancelled; returns whether every run succeeded
///
/// A user-input error (unknown catalog, schema or table) cannot succeed on a
/// later tick, so it stops the schedule.
async fn run_on_schedule(
    schedule: &CronSchedule,
    cancel: CancellationToken,
    reconciler: &Reconciler,
    store: &MemoryCatalogStore,
    store_path: Option<&Path>,
    scope: &ScopeFilter,
    mode: RunMode,
) -> bool {
    let all_succeeded = Cell::new(true);
    let succeeded = &all_succeeded;
    let stop = cancel.clone();
    run_scheduled(schedule, cancel, move || {
        let stop = stop.clone();
        async move {
            match run_once(reconciler, store, store_path, scope, mode).await {
                Ok(success) => succeeded.set(succeeded.get() && success),
                Err(e) => {
                    succeeded.set(false);
                    eprintln!("{} {}", "Run failed:".red(), e);
                    if e.is_user_error() {
                        log::error!("Stopping the schedule: {}", e);
                        stop.cancel();
                    }
                }
            }
        }
    })
    .await;
    all_succeeded.get()
}

async fn run_once(
    reconciler: &Reconciler,
    store: &MemoryCatalogStore,
    store_path: Option<&Path>,
    scope: &ScopeFilter,
    mode: RunMode,
) -> SyncResult<bool> {
    let report = reconciler.run(scope, mode).await;

    // Whatever was written before a failure is kept
    if let Some(path) = store_path {
        store.save(path)?;
    }

    let report = report?;
    print!("{}", ReportFormatter::format(&report));
    Ok(report.is_success())
}
