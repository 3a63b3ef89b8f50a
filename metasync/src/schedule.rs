// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Recurring runs on a cron schedule
//!
//! Accepts classic five-field Unix expressions (`min hour dom month dow`) as
//! well as the six and seven field forms with seconds and years.

use crate::error::{SyncError, SyncResult};
use chrono::{DateTime, Utc};
use cron::Schedule;
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
pub struct CronSchedule {
    expression: String,
    schedule: Schedule,
}

impl CronSchedule {
    /// Parse and validate a cron expression
    pub fn parse(expression: &str) -> SyncResult<Self> {
        let trimmed = expression.trim();
        let fields = trimmed.split_whitespace().count();
        let normalized = match fields {
            5 => format!("0 {}", trimmed),
            6 | 7 => trimmed.to_string(),
            _ => {
                return Err(SyncError::InvalidSchedule {
                    expression: expression.to_string(),
                    reason: format!("expected 5 to 7 fields, found {}", fields),
                })
            }
        };

        let schedule = Schedule::from_str(&normalized).map_err(|e| SyncError::InvalidSchedule {
            expression: expression.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            expression: trimmed.to_string(),
            schedule,
        })
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// First tick strictly after `after`
    pub fn next_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedule.after(&after).next()
    }
}

/// Invoke `run` on every tick of `schedule` until `cancel` fires
///
/// Runs are sequential: a tick that passes while a run is still in progress
/// is skipped. Returns the number of completed runs.
pub async fn run_scheduled<F, Fut>(
    schedule: &CronSchedule,
    cancel: CancellationToken,
    mut run: F,
) -> usize
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    let mut completed = 0;
    loop {
        let now = Utc::now();
        let Some(next) = schedule.next_after(now) else {
            log::warn!("Schedule '{}' has no upcoming ticks", schedule.expression());
            break;
        };
        let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
        log::info!("Next run at {} (in {}s)", next, wait.as_secs());

        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(wait) => {}
        }

        run().await;
        completed += 1;

        if cancel.is_cancelled() {
            break;
        }
    }
    log::info!("Scheduler stopped after {} runs", completed);
    completed
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_five_field_expression_gets_seconds() {
        let schedule = CronSchedule::parse("*/5 * * * *").unwrap();
        assert_eq!(schedule.expression(), "*/5 * * * *");

        let start = Utc.with_ymd_and_hms(2024, 1, 1, 10, 2, 30).unwrap();
        let next = schedule.next_after(start).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 1, 1, 10, 5, 0).unwrap());
    }

    #[test]
    fn test_six_field_expression_is_kept() {
        let schedule = CronSchedule::parse("30 0 10 * * *").unwrap();
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            schedule.next_after(start),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 30).unwrap())
        );
    }

    #[test]
    fn test_invalid_expressions() {
        for expression in ["", "nope", "61 * * * *", "* * *"] {
            let err = CronSchedule::parse(expression).unwrap_err();
            assert!(
                matches!(err, SyncError::InvalidSchedule { .. }),
                "{:?} should be rejected",
                expression
            );
            assert!(err.is_user_error());
        }
    }

    #[tokio::test]
    async fn test_run_scheduled_stops_on_cancel() {
        let schedule = CronSchedule::parse("* * * * * *").unwrap();
        let cancel = CancellationToken::new();

        let mut runs = 0;
        let token = cancel.clone();
        let completed = run_scheduled(&schedule, cancel, || {
            runs += 1;
            if runs == 2 {
                token.cancel();
            }
            async {}
        })
        .await;

        assert_eq!(completed, 2);
        assert_eq!(runs, 2);
    }

    #[tokio::test]
    async fn test_run_scheduled_cancelled_before_first_tick() {
        let schedule = CronSchedule::parse("0 0 1 1 *").unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let completed = run_scheduled(&schedule, cancel, || async {}).await;
        assert_eq!(completed, 0);
    }
}
