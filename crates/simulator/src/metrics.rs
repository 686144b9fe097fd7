//! Run metrics and the end-of-run report.

use hdrhistogram::Histogram;
use loadsim_types::{Complexity, NumericError, Operation, OperationRecord};
use std::collections::HashMap;
use std::time::Duration;

/// Accumulates per-worker counters and latencies.
pub struct MetricsCollector {
    per_operation: HashMap<Operation, u64>,
    errors: HashMap<NumericError, u64>,
    /// Execution latency in nanoseconds.
    latency: Histogram<u64>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            per_operation: HashMap::new(),
            errors: HashMap::new(),
            // 1ns .. 60s, 3 significant figures.
            latency: Histogram::new_with_bounds(1, 60_000_000_000, 3)
                .expect("static histogram bounds are valid"),
        }
    }

    /// Account for one executed operation.
    pub fn record(&mut self, record: &OperationRecord, latency: Duration) {
        *self.per_operation.entry(record.operation).or_default() += 1;
        if let Some(error) = record.result.error() {
            *self.errors.entry(error).or_default() += 1;
        }
        let nanos = u64::try_from(latency.as_nanos()).unwrap_or(u64::MAX);
        self.latency.saturating_record(nanos.max(1));
    }

    /// Fold another collector into this one.
    pub fn merge(&mut self, other: &MetricsCollector) {
        for (op, n) in &other.per_operation {
            *self.per_operation.entry(*op).or_default() += n;
        }
        for (error, n) in &other.errors {
            *self.errors.entry(*error).or_default() += n;
        }
        // Both histograms share bounds, so `add` cannot fail.
        let _ = self.latency.add(&other.latency);
    }

    pub fn total(&self) -> u64 {
        self.per_operation.values().sum()
    }

    /// Build the final report.
    pub fn report(&self, complexity: Complexity, elapsed: Duration) -> SimulationReport {
        let mut per_operation: Vec<(Operation, u64)> = complexity
            .operations()
            .into_iter()
            .map(|op| (op, self.per_operation.get(&op).copied().unwrap_or(0)))
            .collect();
        // Operations outside the tier should never appear, but keep them visible if they do.
        for (op, n) in &self.per_operation {
            if !complexity.contains(*op) {
                per_operation.push((*op, *n));
            }
        }

        let mut errors: Vec<(NumericError, u64)> =
            self.errors.iter().map(|(e, n)| (*e, *n)).collect();
        errors.sort_by_key(|(e, _)| e.to_string());

        let has_samples = self.latency.len() > 0;
        let quantile = |q: f64| {
            has_samples.then(|| Duration::from_nanos(self.latency.value_at_quantile(q)))
        };

        SimulationReport {
            complexity,
            elapsed,
            total_operations: self.total(),
            per_operation,
            errors,
            p50_latency: quantile(0.50),
            p99_latency: quantile(0.99),
            max_latency: has_samples.then(|| Duration::from_nanos(self.latency.max())),
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary of a finished run.
#[derive(Debug, Clone)]
pub struct SimulationReport {
    pub complexity: Complexity,
    pub elapsed: Duration,
    pub total_operations: u64,
    /// Count per operation; the tier's two operations always come first.
    pub per_operation: Vec<(Operation, u64)>,
    /// Captured numeric errors by kind.
    pub errors: Vec<(NumericError, u64)>,
    pub p50_latency: Option<Duration>,
    pub p99_latency: Option<Duration>,
    pub max_latency: Option<Duration>,
}

impl SimulationReport {
    /// Operations completed per second of wall-clock time.
    pub fn ops_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.total_operations as f64 / secs
        } else {
            0.0
        }
    }

    pub fn total_errors(&self) -> u64 {
        self.errors.iter().map(|(_, n)| n).sum()
    }

    /// Print a human-readable summary to stdout.
    pub fn print(&self) {
        println!("=== Load Simulation Report ===");
        println!("Complexity:       {}", self.complexity);
        println!("Elapsed:          {:.3}s", self.elapsed.as_secs_f64());
        println!("Operations:       {}", self.total_operations);
        println!("Throughput:       {:.1} ops/s", self.ops_per_sec());
        for (op, n) in &self.per_operation {
            println!("  {:<6}          {}", op, n);
        }
        println!("Numeric errors:   {}", self.total_errors());
        for (error, n) in &self.errors {
            println!("  {:<16}{}", error.to_string(), n);
        }
        if let (Some(p50), Some(p99), Some(max)) =
            (self.p50_latency, self.p99_latency, self.max_latency)
        {
            println!("Latency p50:      {:?}", p50);
            println!("Latency p99:      {:?}", p99);
            println!("Latency max:      {:?}", max);
        }
    }
}
