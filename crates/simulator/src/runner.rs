//! The simulation loop.
//!
//! Until the deadline passes, each worker repeatedly:
//!
//! 1. checks the deadline (and the optional operation budget)
//! 2. acquires a slot from the shared [`RateLimiter`]
//! 3. selects an operation and operands
//! 4. executes it inside an [`OperationSpan`](crate::recorder::OperationSpan)
//! 5. records the outcome and releases the slot
//!
//! With one worker (the default) everything runs sequentially on the calling
//! task and records are in start order. With several workers, each keeps its
//! own buffer; the buffers are concatenated in worker order at the end.

use crate::config::LoadConfig;
use crate::error::SimulationError;
use crate::metrics::{MetricsCollector, SimulationReport};
use crate::rate_limiter::RateLimiter;
use crate::recorder::OperationLogger;
use crate::selector::OperationSelector;
use loadsim_types::OperationRecord;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Records and summary of a finished run.
#[derive(Debug)]
pub struct SimulationRun {
    pub records: Vec<OperationRecord>,
    pub report: SimulationReport,
}

/// Drives a load run for one [`LoadConfig`].
pub struct Simulator {
    config: LoadConfig,
    selector: OperationSelector,
    logger: OperationLogger,
}

impl Simulator {
    /// Create a simulator, rejecting invalid configuration.
    pub fn new(config: LoadConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        Ok(Self {
            selector: OperationSelector::new(config.complexity),
            logger: OperationLogger::default(),
            config,
        })
    }

    /// Replace the per-operation logger.
    pub fn with_logger(mut self, logger: OperationLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &LoadConfig {
        &self.config
    }

    /// Run until the deadline and return every executed operation.
    pub async fn run(&self) -> Result<Vec<OperationRecord>, SimulationError> {
        self.run_with_report().await.map(|run| run.records)
    }

    /// Run until the deadline and return the records plus a summary.
    pub async fn run_with_report(&self) -> Result<SimulationRun, SimulationError> {
        self.execute(true).await
    }

    /// Run until the deadline keeping only the summary.
    ///
    /// Records are counted but not retained, so memory stays flat however
    /// many operations execute.
    pub async fn run_report_only(&self) -> Result<SimulationReport, SimulationError> {
        self.execute(false).await.map(|run| run.report)
    }

    async fn execute(&self, keep_records: bool) -> Result<SimulationRun, SimulationError> {
        let start = Instant::now();
        let limiter = RateLimiter::new(self.config.max_ops_per_sec, self.config.rate_limit_mode);

        info!(
            complexity = %self.config.complexity,
            duration_secs = self.config.duration.as_secs(),
            max_ops_per_sec = self.config.max_ops_per_sec,
            rate_limit_mode = %limiter.mode(),
            workers = self.config.workers,
            "Starting load simulation"
        );

        let ctx = Arc::new(RunContext {
            selector: self.selector,
            logger: self.logger,
            limiter: limiter.clone(),
            deadline: self.config.deadline_from(start),
            max_operations: self.config.max_operations,
            keep_records,
            issued: AtomicU64::new(0),
        });

        let outputs = if self.config.workers == 1 {
            vec![run_worker(ctx, 0, self.rng_for(0)).await?]
        } else {
            let handles: Vec<_> = (0..self.config.workers)
                .map(|id| tokio::spawn(run_worker(ctx.clone(), id, self.rng_for(id))))
                .collect();

            let mut outputs = Vec::with_capacity(handles.len());
            for joined in futures::future::join_all(handles).await {
                let output =
                    joined.map_err(|e| SimulationError::WorkerFailed(e.to_string()))??;
                outputs.push(output);
            }
            outputs
        };

        let elapsed = start.elapsed();
        let mut metrics = MetricsCollector::new();
        let mut records = Vec::with_capacity(outputs.iter().map(|o| o.records.len()).sum());
        for output in outputs {
            metrics.merge(&output.metrics);
            records.extend(output.records);
        }
        let report = metrics.report(self.config.complexity, elapsed);

        info!(
            operations = report.total_operations,
            errors = report.total_errors(),
            elapsed_ms = elapsed.as_millis() as u64,
            free_permits = limiter.available(),
            "Load simulation finished"
        );

        Ok(SimulationRun { records, report })
    }

    fn rng_for(&self, worker: usize) -> ChaCha8Rng {
        match self.config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(worker as u64)),
            None => ChaCha8Rng::from_entropy(),
        }
    }
}

/// State shared by all workers of one run.
struct RunContext {
    selector: OperationSelector,
    logger: OperationLogger,
    limiter: RateLimiter,
    deadline: Instant,
    max_operations: Option<u64>,
    /// Whether workers retain each record or only count it.
    keep_records: bool,
    /// Operations started so far, across workers.
    issued: AtomicU64,
}

impl RunContext {
    /// Claim one unit of the operation budget.
    fn claim(&self) -> bool {
        match self.max_operations {
            Some(max) => self.issued.fetch_add(1, Ordering::Relaxed) < max,
            None => true,
        }
    }
}

struct WorkerOutput {
    records: Vec<OperationRecord>,
    metrics: MetricsCollector,
}

async fn run_worker(
    ctx: Arc<RunContext>,
    worker: usize,
    mut rng: ChaCha8Rng,
) -> Result<WorkerOutput, SimulationError> {
    let mut records = Vec::new();
    let mut metrics = MetricsCollector::new();
    let deadline = tokio::time::Instant::from_std(ctx.deadline);

    while Instant::now() < ctx.deadline {
        if !ctx.claim() {
            debug!(worker, "Operation budget exhausted");
            break;
        }

        let permit = match tokio::time::timeout_at(deadline, ctx.limiter.acquire()).await {
            Ok(permit) => permit?,
            Err(_) => break,
        };

        let (operation, x, y) = ctx.selector.select(&mut rng);
        let span = ctx.logger.start(operation, x, y);
        let record = OperationRecord::execute(operation, x, y);
        let latency = span.elapsed();
        drop(span);

        metrics.record(&record, latency);
        if ctx.keep_records {
            records.push(record);
        }
        ctx.limiter.release(permit);
    }

    debug!(worker, operations = metrics.total(), "Worker finished");
    Ok(WorkerOutput { records, metrics })
}
