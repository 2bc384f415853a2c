//! Replays a cache trace through a set of policies and prints one row of stats per policy.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use log::info;

use adaptive_tinylfu::cache::config::{Config, ConfigBuilder};
use adaptive_tinylfu::cache::policies::{Policy, PolicyKind};
use adaptive_tinylfu::cache::simulation::{Simulation, SimulationResult};
use adaptive_tinylfu::cache::trace::synthetic;
use adaptive_tinylfu::cache::trace::TraceFormat;

#[derive(Parser, Debug)]
#[command(
    name = "cacheck",
    version,
    about = "Replays a cache trace through LRU and W-TinyLFU policies",
    long_about = "Replays a cache trace through LRU and W-TinyLFU policies and prints hits, misses, hit ratio and time per policy.\n\nExamples:\n  cacheck sample_trace.tr\n  cacheck --format arc --maximum-size 5000 P8.lis\n  cacheck --policies lru,hill-climb --zipf-exponent 0.9"
)]
struct Cli {
    /// Trace file to replay, a synthetic Zipf trace is generated when absent.
    trace: Option<PathBuf>,

    /// Syntax of the trace file.
    #[arg(short, long, value_enum, default_value = "lirs")]
    format: TraceFormat,

    /// Capacity of every policy, in units of entry size.
    #[arg(short, long, default_value_t = 1000)]
    maximum_size: u64,

    /// Initial share of the capacity given to the window.
    #[arg(short, long, default_value_t = 1)]
    window_percentage: u64,

    /// Policies to compare, all of them when absent.
    #[arg(short, long, value_enum, value_delimiter = ',')]
    policies: Vec<PolicyKind>,

    /// Replays the policies one after the other instead of one thread per policy.
    #[arg(long)]
    sequential: bool,

    /// Logs every window resize at debug level.
    #[arg(long)]
    debug: bool,

    /// Distinct keys of the synthetic trace.
    #[arg(long, default_value_t = 10_000)]
    zipf_items: u64,

    /// Exponent of the synthetic trace.
    #[arg(long, default_value_t = 1.01)]
    zipf_exponent: f64,

    /// Accesses of the synthetic trace.
    #[arg(long, default_value_t = 1_000_000)]
    zipf_length: usize,

    /// Seed of the synthetic trace.
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

impl Cli {
    fn config(&self) -> Config<u64> {
        ConfigBuilder::new()
            .maximum_size(self.maximum_size)
            .window_percentage(self.window_percentage)
            .debug(self.debug)
            .build()
    }

    fn policy_kinds(&self) -> Vec<PolicyKind> {
        if self.policies.is_empty() {
            return PolicyKind::ALL.to_vec();
        }
        self.policies.clone()
    }

    fn load_trace(&self) -> Result<Vec<u64>, Box<dyn Error>> {
        let trace = match &self.trace {
            Some(path) => self.format.load(path)?,
            None => synthetic::zipf(self.zipf_items, self.zipf_exponent, self.zipf_length, self.seed)?,
        };
        info!("Loaded trace with {} accesses", trace.len());
        Ok(trace)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let trace = cli.load_trace()?;
    let policies = cli
        .policy_kinds()
        .into_iter()
        .map(|kind| kind.build(cli.config()))
        .collect::<Result<Vec<Box<dyn Policy<u64>>>, _>>()?;

    let results = if cli.sequential {
        policies
            .into_iter()
            .map(|mut policy| Simulation::run(policy.as_mut(), trace.iter().copied()))
            .collect::<Result<Vec<SimulationResult>, _>>()?
    } else {
        Simulation::run_all(policies, &trace)?
    };

    print_results(&results);
    Ok(())
}

fn print_results(results: &[SimulationResult]) {
    println!("{:<12} {:<12} {:<12} {:<12} {:<12}", "Name", "Hits", "Misses", "Hit Ratio", "Time(s)");
    for result in results {
        println!(
            "{:<12} {:<12} {:<12} {:<12.4} {:<12.3}",
            result.summary.name,
            result.summary.hits,
            result.summary.misses,
            result.summary.hit_ratio,
            result.elapsed.as_secs_f64(),
        );
    }
}
