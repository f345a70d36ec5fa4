use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use vmreplay::dispatch::{CommandDispatcher, JsonLinesDispatcher, LogDispatcher};
use vmreplay::replay::{self, NoWait, Pacer, ReplayConfig, ReplaySummary, ThreadPacer};

#[derive(Parser)]
#[command(name = "vmreplay", allow_negative_numbers = true)]
#[command(about = "Replay a normalized VM workload trace as paced VM creation requests")]
struct Cli {
    /// Normalized trace CSV
    trace_file: PathBuf,
    /// First trace time to replay, in fractional days
    t_start: f64,
    /// Last trace time to replay, in fractional days
    t_stop: f64,
    /// Maximum number of requests at a time
    max_rq_cnt: f64,
    /// Maximum lifetime of a VM
    max_lft: f64,
    /// Maximum vCPU count of a VM
    max_vcpu_cnt: f64,

    /// Seed for lifetime and vCPU sampling
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, value_enum, default_value_t = DispatchMode::Log)]
    dispatcher: DispatchMode,
    /// Output file for the jsonl dispatcher, stdout when absent
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Program run once per batch by the command dispatcher
    #[arg(long, required_if_eq("dispatcher", "command"))]
    command: Option<String>,
    /// Argument passed to the dispatcher program, may be repeated
    #[arg(long = "arg", allow_hyphen_values = true)]
    args: Vec<String>,
    /// Report waits between timesteps without sleeping
    #[arg(long)]
    no_wait: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DispatchMode {
    Log,
    Jsonl,
    Command,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run_replay(cli) {
        eprintln!("Replay error: {:#}", e);
        std::process::exit(1);
    }
}

fn run_replay(cli: Cli) -> anyhow::Result<()> {
    let config = ReplayConfig {
        trace_file: cli.trace_file,
        t_start: cli.t_start,
        t_stop: cli.t_stop,
        max_rq_cnt: cli.max_rq_cnt,
        max_lft: cli.max_lft,
        max_vcpu_cnt: cli.max_vcpu_cnt,
    };

    println!(
        "nrl_trace_file: {} t_start: {} t_stop: {} max_rq_cnt: {} max_lft: {} max_vcpu_cnt: {}",
        config.trace_file.display(),
        config.t_start,
        config.t_stop,
        config.max_rq_cnt,
        config.max_lft,
        config.max_vcpu_cnt
    );

    let mut pacer: Box<dyn Pacer> = if cli.no_wait {
        Box::new(NoWait)
    } else {
        Box::new(ThreadPacer)
    };

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let summary = match cli.dispatcher {
        DispatchMode::Log => {
            let mut dispatcher = LogDispatcher::new();
            let summary = replay::run(&config, &mut dispatcher, pacer.as_mut(), &mut rng)?;
            tracing::info!(
                "Logged {} batches, {} requests",
                dispatcher.batches(),
                dispatcher.requests()
            );
            summary
        }
        DispatchMode::Jsonl => match &cli.output {
            Some(path) => replay_jsonl(
                &config,
                JsonLinesDispatcher::create(path)?,
                pacer.as_mut(),
                &mut rng,
            )?,
            None => replay_jsonl(
                &config,
                JsonLinesDispatcher::new(BufWriter::new(std::io::stdout())),
                pacer.as_mut(),
                &mut rng,
            )?,
        },
        DispatchMode::Command => {
            let program = cli
                .command
                .ok_or_else(|| anyhow::anyhow!("--command is required for the command dispatcher"))?;
            let mut dispatcher = CommandDispatcher::new(program, cli.args);
            replay::run(&config, &mut dispatcher, pacer.as_mut(), &mut rng)?
        }
    };

    tracing::info!(
        "Replayed {} timesteps, waited {:.0}s in total",
        summary.timesteps,
        summary.total_wait.as_secs_f64()
    );

    Ok(())
}

fn replay_jsonl<W: Write>(
    config: &ReplayConfig,
    mut dispatcher: JsonLinesDispatcher<W>,
    pacer: &mut dyn Pacer,
    rng: &mut StdRng,
) -> anyhow::Result<ReplaySummary> {
    let summary = replay::run(config, &mut dispatcher, pacer, rng)?;
    let (batches, requests) = dispatcher.finish()?;
    tracing::info!("Wrote {} batches, {} requests", batches, requests);
    Ok(summary)
}
