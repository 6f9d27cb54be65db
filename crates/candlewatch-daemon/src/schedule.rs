//! Fixed-period loop runner.

use chrono::Utc;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::LoopStats;

/// When and how often a loop runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    /// Loop name used in logs.
    pub name: String,
    /// Period between tick starts.
    pub every: Duration,
    /// Run the first tick immediately instead of after one period.
    pub run_immediately: bool,
    /// Stop after this many ticks. `None` runs forever.
    pub max_ticks: Option<u64>,
}

impl Schedule {
    /// A loop that ticks immediately and then every `every`, forever.
    #[must_use]
    pub fn new(name: impl Into<String>, every: Duration) -> Self {
        Self {
            name: name.into(),
            every,
            run_immediately: true,
            max_ticks: None,
        }
    }

    /// Waits one period before the first tick.
    #[must_use]
    pub const fn delayed(mut self) -> Self {
        self.run_immediately = false;
        self
    }

    /// Stops after `ticks` ticks.
    #[must_use]
    pub const fn with_max_ticks(mut self, ticks: u64) -> Self {
        self.max_ticks = Some(ticks);
        self
    }
}

/// Runs `task` on `schedule` until `max_ticks` is reached (or forever).
///
/// Each tick runs in its own spawned task and is awaited before the next one
/// is scheduled, so ticks never overlap. Missed ticks are delayed rather than
/// replayed. A tick that returns an error or panics is logged and recorded in
/// `stats`; the loop carries on.
pub async fn run_every<F, Fut, E>(schedule: Schedule, stats: Arc<LoopStats>, task: F)
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), E>> + Send + 'static,
    E: Display + Send + 'static,
{
    let every = schedule.every.max(Duration::from_millis(1));
    let start = if schedule.run_immediately {
        tokio::time::Instant::now()
    } else {
        tokio::time::Instant::now() + every
    };
    let mut ticker = tokio::time::interval_at(start, every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(loop_name = %schedule.name, every_secs = every.as_secs_f64(), "loop started");

    let mut ticks = 0u64;
    loop {
        if schedule.max_ticks.is_some_and(|max| ticks >= max) {
            break;
        }
        ticker.tick().await;
        ticks += 1;
        stats.record_start();

        match tokio::spawn(task()).await {
            Ok(Ok(())) => {
                stats.record_success(Utc::now());
                tracing::debug!(loop_name = %schedule.name, tick = ticks, "tick complete");
            }
            Ok(Err(e)) => {
                tracing::warn!(loop_name = %schedule.name, tick = ticks, error = %e, "tick failed");
                stats.record_failure(e.to_string());
            }
            Err(join_error) => {
                tracing::error!(
                    loop_name = %schedule.name,
                    tick = ticks,
                    panicked = join_error.is_panic(),
                    "tick aborted"
                );
                stats.record_panic();
            }
        }
    }

    tracing::info!(loop_name = %schedule.name, ticks, "loop stopped");
}

/// Spawns [`run_every`] onto the runtime, returning its stats and handle.
pub fn spawn_loop<F, Fut, E>(schedule: Schedule, task: F) -> (Arc<LoopStats>, JoinHandle<()>)
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), E>> + Send + 'static,
    E: Display + Send + 'static,
{
    let stats = Arc::new(LoopStats::new(schedule.name.clone()));
    let handle = tokio::spawn(run_every(schedule, Arc::clone(&stats), task));
    (stats, handle)
}
