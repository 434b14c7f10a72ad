use super::types::{FailedPoint, SweepRecord, SweepReport};

/// Print the end-of-sweep summary: results table, failed points and best point
pub fn print_sweep_summary(report: &SweepReport) {
    print!("{}", render_results_table(&report.records));

    if !report.failures.is_empty() {
        print!("{}", render_failures(&report.failures));
    }

    println!(
        "\nPoints: {} total, {} measured, {} failed, {} not reached",
        report.total_points,
        report.records.len(),
        report.failures.len(),
        report
            .total_points
            .saturating_sub(report.records.len() + report.failures.len())
    );

    if let Some(best) = find_best_point(&report.records) {
        println!(
            "Best throughput: {} with {} tasklets, block size {}",
            best.metrics.throughput.as_deref().unwrap_or_default(),
            best.point.build.tasklet_count,
            best.point.build.block_size
        );
    }
}

pub fn render_results_table(records: &[SweepRecord]) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n{}\n", "=".repeat(90)));
    out.push_str("Sweep Results Summary\n");
    out.push_str(&format!("{}\n", "=".repeat(90)));
    out.push_str(&format!(
        "{:<6} {:<9} {:<11} {:<6} {:<24} {:<24}\n",
        "DPUs", "Tasklets", "Block Size", "Mode", "Cycles per DPU", "Throughput"
    ));
    out.push_str(&format!("{}\n", "-".repeat(90)));

    for record in records {
        let build = &record.point.build;
        out.push_str(&format!(
            "{:<6} {:<9} {:<11} {:<6} {:<24} {:<24}\n",
            build.device_count,
            build.tasklet_count,
            build.block_size,
            record.point.run.mode,
            record.metrics.cycles.as_deref().unwrap_or("N/A"),
            record.metrics.throughput.as_deref().unwrap_or("N/A"),
        ));
    }
    out.push_str(&format!("{}\n", "=".repeat(90)));
    out
}

pub fn render_failures(failures: &[FailedPoint]) -> String {
    let mut out = String::from("\nFailed points:\n");
    for failed in failures {
        let build = &failed.point.build;
        out.push_str(&format!(
            "  tasklets={} block_size={}: {}\n",
            build.tasklet_count, build.block_size, failed.failure
        ));
    }
    out
}

/// Diagnostic for one failed point, including whatever output the process left
pub fn format_failure(failed: &FailedPoint) -> String {
    let mut out = format!("FAILED {}: {}", failed.point, failed.failure);
    if let Some(output) = failed.output() {
        for (name, text) in [("stdout", &output.stdout), ("stderr", &output.stderr)] {
            if text.trim().is_empty() {
                continue;
            }
            out.push_str(&format!("\n  --- {name} ---"));
            for line in text.lines() {
                out.push_str("\n  ");
                out.push_str(line);
            }
        }
    }
    out
}

/// Generate a CSV of the measured points
pub fn records_to_csv(records: &[SweepRecord]) -> String {
    let mut csv = String::from(
        "device_count,tasklet_count,block_size,mode,total_memory,duration_seconds,cycles_per_dpu,throughput\n",
    );

    for record in records {
        let build = &record.point.build;
        let run = &record.point.run;
        csv.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            build.device_count,
            build.tasklet_count,
            build.block_size,
            run.mode,
            run.total_memory,
            run.duration_seconds,
            csv_field(record.metrics.cycles.as_deref()),
            csv_field(record.metrics.throughput.as_deref()),
        ));
    }

    csv
}

/// Find the measured point with the highest numeric throughput
pub fn find_best_point(records: &[SweepRecord]) -> Option<&SweepRecord> {
    records
        .iter()
        .filter_map(|r| r.metrics.throughput_value().map(|v| (r, v)))
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(r, _)| r)
}

// Absent metrics become empty cells.
fn csv_field(value: Option<&str>) -> String {
    match value {
        None => String::new(),
        Some(v) if v.contains([',', '"', '\n']) => format!("\"{}\"", v.replace('"', "\"\"")),
        Some(v) => v.to_string(),
    }
}
