use super::types::{
    FailedPoint, FailurePolicy, PointFailure, SweepConfig, SweepRecord, SweepReport, SweepStatus,
};
use crate::error::ConfigError;
use crate::metrics::extract;
use crate::{Builder, Runner, SweepPoint, mode_name};
use tracing::{info, warn};

/// Walks the configuration space one point at a time: rebuild, run, extract.
///
/// Points are never overlapped. Every rebuild overwrites the single `host`
/// binary in the work directory, so a point's run must finish before the
/// next point's build starts.
pub struct SweepDriver {
    config: SweepConfig,
    builder: Box<dyn Builder>,
    runner: Box<dyn Runner>,
}

impl SweepDriver {
    pub fn new(
        config: SweepConfig,
        builder: Box<dyn Builder>,
        runner: Box<dyn Runner>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            builder,
            runner,
        })
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    pub fn run_sweep(&mut self) -> SweepReport {
        let space = self.config.config_space();
        let mut records = Vec::new();
        let mut failures = Vec::new();
        let mut status = SweepStatus::Completed;

        self.print_sweep_header(space.len());

        for point in &space {
            self.print_point_banner(&point);

            match self.run_point(&point) {
                Ok(record) => {
                    info!(
                        tasklets = point.build.tasklet_count,
                        block_size = point.build.block_size,
                        cycles = record.metrics.cycles.as_deref().unwrap_or("<absent>"),
                        throughput = record.metrics.throughput.as_deref().unwrap_or("<absent>"),
                        "point finished"
                    );
                    records.push(record);
                }
                Err(failure) => {
                    let policy = self.config.policy_for(&failure);
                    let failed = FailedPoint { point, failure };
                    eprintln!("{}", super::reporting::format_failure(&failed));
                    failures.push(failed);

                    if policy == FailurePolicy::Abort {
                        warn!("aborting sweep after failed point");
                        status = SweepStatus::Aborted;
                        break;
                    }
                    warn!("skipping failed point, continuing sweep");
                }
            }
        }

        let stars = "*".repeat(32);
        println!("\n{stars} Done benchmark for Minime {stars}");

        SweepReport {
            records,
            failures,
            status,
            total_points: space.len(),
        }
    }

    fn run_point(&mut self, point: &SweepPoint) -> Result<SweepRecord, PointFailure> {
        self.builder
            .build(&point.build)
            .map_err(PointFailure::Build)?;

        let output = self.runner.run(&point.run).map_err(PointFailure::Run)?;

        if self.config.show_run_output {
            println!("{}", output.stdout);
        }
        for line in output.stderr.lines().filter(|l| !l.trim().is_empty()) {
            warn!(stderr = line, "benchmark wrote to stderr");
        }

        let metrics = extract(&output.stdout);
        if metrics.cycles.is_none() {
            warn!("no \"Average cycles per DPU\" line in benchmark output");
        }
        if metrics.throughput.is_none() {
            warn!("no \"Overall throughput\" line in benchmark output");
        }
        println!("Cycles per DPU: {}", display_or_absent(&metrics.cycles));
        println!("Throughput: {}", display_or_absent(&metrics.throughput));

        Ok(SweepRecord {
            point: point.clone(),
            metrics,
            output,
        })
    }

    fn print_sweep_header(&self, points: usize) {
        let stars = "*".repeat(30);
        println!("\n{stars} Starting benchmark for Minime {stars}\n");
        println!("DPUs: {}", self.config.device_count);
        println!(
            "Mode: {} ({})",
            self.config.mode,
            mode_name(self.config.mode).unwrap_or("unknown")
        );
        println!("Memory per DPU: {}", self.config.total_memory);
        println!("Duration: {}s", self.config.duration_seconds);
        println!("Tasklets: {:?}", self.config.tasklets);
        println!("Block sizes: {:?}", self.config.block_sizes);
        println!(
            "On failure: build={}, run={}",
            self.config.on_build_failure, self.config.on_run_failure
        );
        println!("Points: {points}");

        if mode_name(self.config.mode).is_none() {
            warn!(mode = self.config.mode, "mode is not a known host plugin");
        }
        if self.config.total_memory.exceeds_host_limit() {
            warn!(
                memory = %self.config.total_memory,
                "memory exceeds 32M, the host will fall back to 32M"
            );
        }
    }

    fn print_point_banner(&self, point: &SweepPoint) {
        let stars = "*".repeat(28);
        println!(
            "\n{stars} Benchmark with {} DPUs and {} tasklets block size {} mode {} {stars}\n",
            point.build.device_count,
            point.build.tasklet_count,
            point.build.block_size,
            point.run.mode
        );
    }
}

fn display_or_absent(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("<absent>")
}
