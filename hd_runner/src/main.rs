mod generator;
mod sink;

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use hd_engine::{InitialState, Scheduler, SimError, Statistics};
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sink::FileSnapshotSink;

struct Args {
    event_count: u64,
    l: f64,
    particle_count: usize,
    input: Option<PathBuf>,
    out_dir: PathBuf,
}

fn parse_args(raw: &[String]) -> Result<Args, String> {
    let mut positional = Vec::new();
    let mut input = None;
    let mut out_dir = PathBuf::from("./out");

    let mut i = 0;
    while i < raw.len() {
        match raw[i].as_str() {
            "--input" => {
                let path = raw.get(i + 1).ok_or("--input requires a path argument")?;
                input = Some(PathBuf::from(path));
                i += 2;
            }
            "--out-dir" => {
                let path = raw.get(i + 1).ok_or("--out-dir requires a path argument")?;
                out_dir = PathBuf::from(path);
                i += 2;
            }
            other => {
                positional.push(other.to_string());
                i += 1;
            }
        }
    }

    if positional.len() != 3 {
        return Err(
            "usage: hd_runner <event_count> <L> <particle_count> [--input <path.json>] [--out-dir <path>]"
                .to_string(),
        );
    }
    let event_count = positional[0].parse().map_err(|_| "event_count must be a non-negative integer")?;
    let l = positional[1].parse().map_err(|_| "L must be a number")?;
    let particle_count = positional[2].parse().map_err(|_| "particle_count must be a non-negative integer")?;

    Ok(Args {
        event_count,
        l,
        particle_count,
        input,
        out_dir,
    })
}

fn exit_code_for(err: &SimError) -> u8 {
    match err {
        SimError::InvalidInitialState(_) => 1,
        SimError::HeapExhausted { .. } => 2,
        SimError::NumericalStall { .. } => 3,
        SimError::SinkFailure(_) => 4,
    }
}

fn run(args: Args) -> Result<u64, SimError> {
    let (particles, obstacles) = match &args.input {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .map_err(|e| SimError::InvalidInitialState(format!("reading {}: {e}", path.display())))?;
            let state = InitialState::from_json(&contents)?;
            state.build()?
        }
        None => generator::generate_scene(args.l, args.particle_count, 0)?,
    };

    info!(particle_count = particles.len(), l = args.l, "initial state ready");

    let mut sink = FileSnapshotSink::new(&args.out_dir)?;
    let mut scheduler = Scheduler::new(particles, obstacles);
    let run_result = scheduler.run(args.event_count, args.l, &mut sink, || false);

    if let Err(SimError::NumericalStall { step_index, tau }) = &run_result {
        if let Some((last_step, last_tau, _, _)) = scheduler.last_emitted() {
            error!(
                stalled_at_step = step_index,
                stalled_at_tau = tau,
                last_good_step = last_step,
                last_good_tau = last_tau,
                "numerical stall; last good snapshot retained in steps/ for forensics"
            );
        }
    }
    let processed = run_result?;

    let stats = Statistics::build(scheduler.particles());
    info!(
        processed,
        total_energy = stats.total_energy,
        "run complete"
    );

    Ok(processed)
}

fn main() -> ExitCode {
    let fmt_layer = fmt::layer();
    let filter_layer = EnvFilter::from_default_env();
    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter_layer)
        .init();

    let raw: Vec<String> = env::args().skip(1).collect();
    let args = match parse_args(&raw) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };

    match run(args) {
        Ok(processed) => {
            println!("processed {processed} events");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(%err, "run failed");
            eprintln!("{err}");
            ExitCode::from(exit_code_for(&err))
        }
    }
}
