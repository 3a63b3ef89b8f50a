// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Report formatting for CLI output

use colored::*;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use metasync::sync::{CatalogStats, EntityCounts};
use metasync::SyncReport;

pub struct ReportFormatter;

impl ReportFormatter {
    /// Render a run report as a table followed by a summary
    pub fn format(report: &SyncReport) -> String {
        let mut output = String::new();

        output.push_str(&format!("{}\n", "Reconciliation Report".bold().green()));
        if let Some(instance) = &report.instance {
            output.push_str(&format!("Instance: {}\n", instance.qualified_name));
        }
        output.push_str(&format!(
            "Duration: {} ms\n\n",
            report.duration().num_milliseconds()
        ));

        if report.catalogs.is_empty() {
            output.push_str(&format!("{}\n", "No catalogs processed".yellow()));
        } else {
            output.push_str(&Self::catalog_table(report));
            output.push('\n');
        }

        if let Some(pruned) = &report.pruned_catalogs {
            match pruned {
                Ok(stats) => output.push_str(&format!(
                    "\nOrphan catalogs deleted: {} ({} schemas, {} tables)\n",
                    stats.catalogs, stats.schemas, stats.tables
                )),
                Err(e) => output.push_str(&format!(
                    "\n{} {}\n",
                    "Pruning orphan catalogs failed:".red(),
                    e
                )),
            }
        }

        if !report.missing.is_empty() {
            output.push_str(&format!(
                "\n{} {}\n",
                "Registered but not found:".bold().yellow(),
                report.missing.join(", ").yellow()
            ));
        }
        if !report.skipped.is_empty() {
            output.push_str(&format!(
                "{} {}\n",
                "Not registered, skipped:".yellow(),
                report.skipped.join(", ")
            ));
        }

        output.push('\n');
        output.push_str(&Self::summary(report));
        output
    }

    fn catalog_table(report: &SyncReport) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(
            ["Catalog", "Status", "Schemas", "Tables", "Columns", "Deleted"]
                .iter()
                .map(|h| Cell::new(h).fg(Color::Green))
                .collect::<Vec<Cell>>(),
        );

        for entry in &report.catalogs {
            match &entry.result {
                Ok(stats) => {
                    let status = if stats.catalogs.created > 0 { "created" } else { "ok" };
                    table.add_row(vec![
                        Cell::new(&entry.catalog),
                        Cell::new(status).fg(Color::Green),
                        Cell::new(Self::counts(&stats.schemas)),
                        Cell::new(Self::counts(&stats.tables)),
                        Cell::new(Self::counts(&stats.columns)),
                        Cell::new(stats.deleted.total()),
                    ]);
                }
                Err(e) => {
                    table.add_row(vec![
                        Cell::new(&entry.catalog),
                        Cell::new(format!("failed: {}", e)).fg(Color::Red),
                        Cell::new("-"),
                        Cell::new("-"),
                        Cell::new("-"),
                        Cell::new("-"),
                    ]);
                }
            }
        }
        table.to_string()
    }

    /// `created / existing`
    fn counts(counts: &EntityCounts) -> String {
        format!("{} / {}", counts.created, counts.existing)
    }

    fn summary(report: &SyncReport) -> String {
        let CatalogStats {
            catalogs,
            schemas,
            tables,
            columns,
            deleted,
        } = report.totals();
        let created = catalogs.created + schemas.created + tables.created + columns.created;
        let failures = report.failures();

        let mut line = format!(
            "{} entities created, {} deleted",
            created,
            deleted.total()
        );
        if failures.is_empty() {
            line = format!("{} {}", "✅".green(), line);
        } else {
            line = format!(
                "{} {}, {} failed",
                "❌".red(),
                line,
                failures.len().to_string().red()
            );
        }
        line.push('\n');
        line
    }
}
