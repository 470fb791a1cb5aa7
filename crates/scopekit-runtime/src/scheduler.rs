//! Fixed-cadence scope scheduler.
//!
//! A single tokio task ticks at the configured cadence. Each tick snapshots
//! the controls, reads the newest frame, runs one cycle on the blocking pool
//! and hands the images to the sink. The loop awaits each cycle before the
//! next tick, so at most one is in flight; ticks that fall due while a cycle
//! is still running are skipped rather than queued.

use std::sync::Arc;

use scopekit_core::ScopeImages;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::controls::SharedControls;
use crate::error::RuntimeError;
use crate::pipeline::ScopePipeline;
use crate::source::FrameSource;

/// Receives the images of every completed cycle.
pub trait ScopeSink: Send + 'static {
    fn present(&mut self, images: ScopeImages);
}

impl<F> ScopeSink for F
where
    F: FnMut(ScopeImages) + Send + 'static,
{
    fn present(&mut self, images: ScopeImages) {
        self(images)
    }
}

pub struct ScopeScheduler;

impl ScopeScheduler {
    /// Start the cycle loop on the current tokio runtime.
    pub fn spawn<S, K>(
        source: Arc<S>,
        mut sink: K,
        controls: SharedControls,
        mut pipeline: ScopePipeline,
    ) -> SchedulerHandle
    where
        S: FrameSource + ?Sized,
        K: ScopeSink,
    {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let cadence = pipeline.config().cadence();

        let task = tokio::spawn(async move {
            tracing::info!("scope scheduler started ({}ms cadence)", cadence.as_millis());
            let mut ticker = time::interval(cadence);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        let snapshot = controls.snapshot();
                        let Some(frame) = source.latest_frame() else {
                            tracing::trace!("no frame available, idle tick");
                            continue;
                        };
                        // Prepare, analysis and rendering are CPU-bound; keep them
                        // off the async workers.
                        let cycle = tokio::task::spawn_blocking(move || {
                            let images = pipeline.run_cycle(&frame, snapshot);
                            (pipeline, images)
                        });
                        let images;
                        (pipeline, images) = match cycle.await {
                            Ok(done) => done,
                            Err(e) => {
                                tracing::error!("scope cycle aborted: {e}");
                                return Err(RuntimeError::Join(e));
                            }
                        };
                        if let Some(images) = images {
                            sink.present(images);
                        }
                    }
                }
            }

            let stats = pipeline.stats();
            tracing::info!(
                "scope scheduler stopped after {} cycles ({} skipped, mean {:.2}ms)",
                stats.cycles,
                stats.skipped,
                stats.mean_duration().as_secs_f64() * 1000.0
            );
            Ok(pipeline)
        });

        SchedulerHandle { stop_tx, task }
    }
}

/// Handle to a running scheduler. Dropping it also stops the loop.
pub struct SchedulerHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<Result<ScopePipeline, RuntimeError>>,
}

impl SchedulerHandle {
    /// Ask the loop to stop after the current cycle.
    pub fn stop(&self) {
        // The receiver only goes away once the task has already exited.
        let _ = self.stop_tx.send(true);
    }

    /// Whether the loop has exited, after a stop or a failed cycle.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop the loop and wait for it, returning the pipeline with its stats.
    pub async fn shutdown(self) -> Result<ScopePipeline, RuntimeError> {
        self.stop();
        self.task.await?
    }
}
