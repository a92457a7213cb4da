//! Fixed-size worker pool with a bounded queue.
//!
//! The [`Dispatcher`] spawns an exact number of workers up front and feeds
//! them through a bounded channel whose capacity equals the worker count,
//! so a slow pool exerts backpressure on the producer instead of buffering
//! the whole listing. Workers share one receiver; each pulls the next job
//! as it frees up. One failing job never takes the pool down, and a
//! cancellation request stops dispatch, abandons queued jobs, and lets
//! in-flight transfers wind down on their own.

use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use reqwest_middleware::ClientWithMiddleware;

use super::job::TransferJob;
use super::summary::{RunOutcome, RunReport, Summary};
use crate::downloader::Downloader;
use crate::progress::display::ProgressDisplay;
use crate::progress::style::StyleOptions;
use crate::sink::Sink;

/// Configuration for the worker pool.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Number of workers, which is also the queue capacity.
    pub workers: usize,
    /// Pool style options.
    pub style_options: StyleOptions,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: 5,
            style_options: StyleOptions::default(),
        }
    }
}

/// Hands transfer jobs to a fixed set of workers.
pub struct Dispatcher {
    config: PoolConfig,
    client: ClientWithMiddleware,
    downloader: Downloader,
    sink: Sink,
    output_root: String,
}

/// Everything a worker needs, shared once.
struct WorkerContext {
    client: ClientWithMiddleware,
    downloader: Downloader,
    sink: Sink,
    progress: ProgressDisplay,
    cancel: CancellationToken,
}

impl Dispatcher {
    /// Creates a new Dispatcher over a shared client, downloader, and sink.
    pub fn new(
        config: PoolConfig,
        client: ClientWithMiddleware,
        downloader: Downloader,
        sink: Sink,
        output_root: impl Into<String>,
    ) -> Self {
        Self {
            config,
            client,
            downloader,
            sink,
            output_root: output_root.into(),
        }
    }

    /// Effective worker count; zero is bumped to one.
    pub fn workers(&self) -> usize {
        self.config.workers.max(1)
    }

    /// Run every link through the pool and report how it went.
    ///
    /// Links that cannot be turned into jobs are logged and skipped before
    /// dispatch begins. The call returns once every worker has wound down,
    /// whether the queue drained or `cancel` fired first.
    pub async fn run(&self, links: &[String], cancel: &CancellationToken) -> RunReport {
        let jobs = self.build_jobs(links);
        let progress = ProgressDisplay::new(self.config.style_options.clone(), jobs.len(), false);

        let workers = self.workers();
        debug!("Dispatching {} job(s) across {workers} worker(s)", jobs.len());

        let (tx, rx) = mpsc::channel::<TransferJob>(workers);
        let rx = Arc::new(Mutex::new(rx));
        let ctx = Arc::new(WorkerContext {
            client: self.client.clone(),
            downloader: self.downloader.clone(),
            sink: self.sink.clone(),
            progress,
            cancel: cancel.clone(),
        });

        let mut handles: Vec<JoinHandle<Vec<Summary>>> = Vec::with_capacity(workers);
        for worker_id in 0..workers {
            handles.push(tokio::spawn(worker_loop(worker_id, rx.clone(), ctx.clone())));
        }

        for job in jobs {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                sent = tx.send(job) => {
                    if sent.is_err() {
                        break;
                    }
                }
            }
        }
        drop(tx);

        let mut summaries = Vec::new();
        for handle in handles {
            match handle.await {
                Ok(mut worker_summaries) => summaries.append(&mut worker_summaries),
                Err(e) => warn!("Worker task failed: {e}"),
            }
        }

        if let Ok(ctx) = Arc::try_unwrap(ctx) {
            ctx.progress.finish();
        }

        let outcome = if cancel.is_cancelled() {
            RunOutcome::Cancelled
        } else {
            RunOutcome::Completed
        };
        RunReport::new(outcome, summaries)
    }

    fn build_jobs(&self, links: &[String]) -> Vec<TransferJob> {
        let mut jobs = Vec::with_capacity(links.len());
        for link in links {
            match TransferJob::new(link, &self.output_root) {
                Ok(job) => jobs.push(job),
                Err(e) => warn!("Skipping link \"{link}\": {e}"),
            }
        }
        jobs
    }
}

async fn worker_loop(
    worker_id: usize,
    rx: Arc<Mutex<mpsc::Receiver<TransferJob>>>,
    ctx: Arc<WorkerContext>,
) -> Vec<Summary> {
    debug!("Worker {worker_id} starting");
    let mut summaries = Vec::new();
    loop {
        // The lock guards the receiver only for the duration of one recv.
        let job = {
            let mut rx = rx.lock().await;
            rx.recv().await
        };
        let Some(job) = job else { break };

        if ctx.cancel.is_cancelled() {
            summaries.push(Summary::new(job).cancelled());
            break;
        }

        summaries.push(execute_job(&ctx, job).await);
        ctx.progress.increment_main();
    }
    debug!("Worker {worker_id} shutting down");
    summaries
}

async fn execute_job(ctx: &WorkerContext, job: TransferJob) -> Summary {
    info!("Downloading zone {} from {}", job.zone, job.url);

    let zone = match ctx
        .downloader
        .download(&ctx.client, &job.url, &ctx.progress, &ctx.cancel)
        .await
    {
        Ok(zone) => zone,
        Err(e) if e.is_cancelled() => {
            info!("Abandoning zone {}: shutdown requested", job.zone);
            return Summary::new(job).cancelled();
        }
        Err(e) => {
            warn!("Downloading zone {} failed: {e}", job.zone);
            return Summary::new(job).fail(e);
        }
    };

    match ctx.sink.save(&job.target, &job.zone, zone, &ctx.cancel).await {
        Ok(size) => {
            info!("Saved zone {} to {} ({size} bytes)", job.zone, job.target);
            Summary::new(job).success(size)
        }
        Err(e) if e.is_cancelled() => {
            info!("Abandoning zone {}: shutdown requested", job.zone);
            Summary::new(job).cancelled()
        }
        Err(e) => {
            warn!("Persisting zone {} failed: {e}", job.zone);
            Summary::new(job).fail(e)
        }
    }
}
