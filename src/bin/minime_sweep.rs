use std::io;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use minime::benchmark::{SweepConfig, SweepDriver, print_sweep_summary, records_to_csv};
use minime::prompt::{parse_u32_list, prompt_config};
use minime::{ConfigError, FailurePolicy, HostRunner, MakeBuilder, MemorySize};

#[derive(Parser, Debug)]
#[command(name = "minime_sweep", version)]
#[command(about = "Rebuild and run the Minime DPU benchmark for every tasklet / block size pair")]
struct Args {
    /// The benchmark mode (0 = sequential_read, 1 = random_read)
    #[arg(required_unless_present = "interactive")]
    mode: Option<u32>,

    /// The number of DPUs
    #[arg(required_unless_present = "interactive")]
    num_dpus: Option<u32>,

    /// The benchmark duration (in seconds)
    #[arg(required_unless_present = "interactive")]
    bench_time: Option<u64>,

    /// Ask for mode, DPUs, tasklets and duration on the terminal
    #[arg(short, long)]
    interactive: bool,

    /// Tasklet counts to sweep (comma-separated, empty for none)
    #[arg(long, default_value = "1", value_parser = tasklet_list)]
    tasklets: ::std::vec::Vec<u32>,

    /// Block sizes to sweep (comma-separated, empty for none)
    #[arg(long, default_value = "2,4,8,16,32,64,128,256,512", value_parser = block_size_list)]
    block_sizes: ::std::vec::Vec<u32>,

    /// Memory to benchmark per DPU, with optional K or M suffix
    #[arg(short = 'g', long, default_value = "32M")]
    memory: MemorySize,

    /// Directory containing the Makefile and the host binary
    #[arg(short = 'C', long, default_value = ".")]
    work_dir: PathBuf,

    /// make executable
    #[arg(long, default_value = "make")]
    make: String,

    /// Host binary, relative to the work directory
    #[arg(long, default_value = "host")]
    host: PathBuf,

    /// What to do when a build fails: skip or abort
    #[arg(long, default_value = "skip")]
    on_build_failure: FailurePolicy,

    /// What to do when a benchmark run fails: skip or abort
    #[arg(long, default_value = "skip")]
    on_run_failure: FailurePolicy,

    /// Pass -d to the host so the benchmark runs on the DPUs
    #[arg(long)]
    use_dpu: bool,

    /// Stream make output instead of capturing it
    #[arg(long)]
    show_build_output: bool,

    /// Print the full benchmark output of every point
    #[arg(long)]
    show_output: bool,

    /// Print every command before running it and enable debug logs
    #[arg(long)]
    debug: bool,

    /// Write measured points to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
}

fn tasklet_list(value: &str) -> Result<Vec<u32>, ConfigError> {
    parse_u32_list("tasklets", value)
}

fn block_size_list(value: &str) -> Result<Vec<u32>, ConfigError> {
    parse_u32_list("block sizes", value)
}

impl Args {
    fn to_config(&self) -> SweepConfig {
        let defaults = SweepConfig::default();
        SweepConfig {
            device_count: self.num_dpus.unwrap_or(defaults.device_count),
            mode: self.mode.unwrap_or(defaults.mode),
            duration_seconds: self.bench_time.unwrap_or(defaults.duration_seconds),
            total_memory: self.memory.clone(),
            tasklets: self.tasklets.clone(),
            block_sizes: self.block_sizes.clone(),
            debug: self.debug,
            on_build_failure: self.on_build_failure,
            on_run_failure: self.on_run_failure,
            use_dpu: self.use_dpu,
            show_build_output: self.show_build_output,
            show_run_output: self.show_output,
            work_dir: self.work_dir.clone(),
        }
    }
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = args.to_config();
    if args.interactive {
        let stdin = io::stdin();
        config = prompt_config(&mut stdin.lock(), &mut io::stdout(), config)?;
    }

    let builder = MakeBuilder::new(&config.work_dir)
        .with_program(&args.make)
        .show_output(config.show_build_output)
        .echo_commands(config.debug);
    let runner = HostRunner::new(&config.work_dir)
        .with_binary(&args.host)
        .echo_commands(config.debug);

    let mut driver = SweepDriver::new(config, Box::new(builder), Box::new(runner))?;
    let report = driver.run_sweep();

    print_sweep_summary(&report);

    if let Some(path) = &args.csv {
        std::fs::write(path, records_to_csv(&report.records))?;
        println!("Results written to {}", path.display());
    }

    report.into_result()?;
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_tracing(args.debug);

    if let Err(err) = run(args) {
        eprintln!("minime_sweep error: {err}");
        std::process::exit(1);
    }
}
