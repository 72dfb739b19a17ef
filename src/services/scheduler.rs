use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use log::{debug, error, info, warn};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::time::MissedTickBehavior;

use crate::services::aggregation::AggregationSummary;

/// Fire-and-forget trigger for the global ranking recomputation.
///
/// At most one request waits while a run is in flight; further requests
/// are folded into the waiting one.
#[derive(Clone)]
pub struct RecomputeQueue {
    sender: mpsc::Sender<()>,
}

impl RecomputeQueue {
    /// Spawns the worker on the current tokio runtime.
    pub fn start<F>(job: F) -> Self
    where
        F: Fn() -> Result<AggregationSummary> + Send + Sync + 'static,
    {
        let (sender, receiver) = mpsc::channel(1);
        tokio::spawn(run_worker(Arc::new(job), receiver));
        Self { sender }
    }

    /// Returns whether a new run was queued.
    pub fn enqueue(&self) -> bool {
        match self.sender.try_send(()) {
            Ok(()) => {
                info!("Global ranking recomputation queued");
                true
            }
            Err(TrySendError::Full(())) => {
                debug!("Recomputation already pending, request coalesced");
                false
            }
            Err(TrySendError::Closed(())) => {
                warn!("Recompute worker is gone, request dropped");
                false
            }
        }
    }
}

async fn run_worker<F>(job: Arc<F>, mut receiver: mpsc::Receiver<()>)
where
    F: Fn() -> Result<AggregationSummary> + Send + Sync + 'static,
{
    while receiver.recv().await.is_some() {
        let job = Arc::clone(&job);
        match tokio::task::spawn_blocking(move || job()).await {
            Ok(Ok(summary)) => info!(
                "Recomputation finished: {} written, {} skipped, {} pruned",
                summary.countries_written, summary.countries_skipped, summary.countries_pruned
            ),
            Ok(Err(e)) => error!("Recomputation failed: {:#}", e),
            Err(e) => error!("Recomputation task aborted: {}", e),
        }
    }
    debug!("Recompute worker stopped");
}

/// Enqueues a recomputation on every tick until Ctrl-C.
pub async fn run_scheduler(queue: RecomputeQueue, interval: Duration) -> Result<()> {
    info!("Scheduler started, recomputing every {:?}", interval);

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                queue.enqueue();
            }
            result = tokio::signal::ctrl_c() => {
                result?;
                info!("Shutdown signal received, stopping scheduler");
                break;
            }
        }
    }

    Ok(())
}
