//! srs-replay: replays a rating sequence through the scheduler and prints one
//! JSON outcome per review. Each review happens exactly on its due date.
//!
//! ```text
//! srs-replay [--from-interval DAYS] RATING...
//! ```
//!
//! Configuration comes from the `SRS_*` environment variables, the start
//! instant from `REPLAY_START` (RFC 3339, default now).

use std::process::ExitCode;

use chrono::{DateTime, Duration, Utc};

use study_scheduler::logging::{init_tracing, LogSettings};
use study_scheduler::{LegacyItem, MemoryState, Rating, Scheduler, SchedulerConfig};

fn main() -> ExitCode {
    let _log_guard = init_tracing(&LogSettings::from_env());

    let mut args = std::env::args().skip(1).peekable();
    let mut prior_interval = None;
    if args.peek().map(String::as_str) == Some("--from-interval") {
        args.next();
        match args.next().and_then(|raw| raw.parse::<f64>().ok()) {
            Some(days) => prior_interval = Some(days),
            None => {
                tracing::error!("--from-interval needs a number of days");
                return ExitCode::from(2);
            }
        }
    }

    let ratings: Result<Vec<Rating>, _> = args.map(|raw| raw.parse::<Rating>()).collect();
    let ratings = match ratings {
        Ok(ratings) if !ratings.is_empty() => ratings,
        Ok(_) => {
            eprintln!("usage: srs-replay [--from-interval DAYS] RATING...");
            return ExitCode::from(2);
        }
        Err(err) => {
            tracing::error!(error = %err, "rejected input");
            return ExitCode::from(2);
        }
    };

    let mut now = std::env::var("REPLAY_START")
        .ok()
        .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
        .map(|start| start.with_timezone(&Utc))
        .unwrap_or_else(Utc::now);

    let scheduler = Scheduler::new(SchedulerConfig::from_env());
    let mut state: Option<MemoryState> = prior_interval.map(|days| {
        scheduler.migrate(&LegacyItem {
            prior_interval_days: Some(days),
            last_reviewed_at: Some(now),
            lapse_count: None,
        })
    });

    tracing::info!(reviews = ratings.len(), start = %now, "replaying");

    for rating in ratings {
        let elapsed = state
            .as_ref()
            .map(|s| f64::from(s.interval_days()))
            .unwrap_or(0.0);
        now = match advance(now, elapsed) {
            Some(next) => next,
            None => {
                tracing::error!(%now, elapsed, "due date out of range, stopping replay");
                return ExitCode::FAILURE;
            }
        };

        let outcome = scheduler.schedule(rating, state.as_ref(), Some(elapsed), now);
        match serde_json::to_string(&outcome) {
            Ok(line) => println!("{line}"),
            Err(err) => {
                tracing::error!(error = %err, "failed to serialize outcome");
                return ExitCode::FAILURE;
            }
        }
        state = Some(outcome.state);
    }

    ExitCode::SUCCESS
}

/// `now + days`, or `None` once the calendar runs out.
fn advance(now: DateTime<Utc>, days: f64) -> Option<DateTime<Utc>> {
    now.checked_add_signed(Duration::days(days as i64))
}
