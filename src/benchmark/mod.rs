pub mod reporting;
pub mod runner;
pub mod types;

pub use reporting::{
    find_best_point, format_failure, print_sweep_summary, records_to_csv, render_failures,
    render_results_table,
};
pub use runner::SweepDriver;
pub use types::{
    FailedPoint, FailurePolicy, PointFailure, SweepConfig, SweepRecord, SweepReport, SweepStatus,
};
