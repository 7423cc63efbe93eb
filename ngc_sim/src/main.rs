//! # NGC Simulator Binary
//!
//! Runs an RS274/NGC program against the simulated canonical machine.
//!
//! # Usage
//!
//! ```bash
//! # Run a program file
//! ngc_sim part.ngc
//!
//! # Interactive: read blocks from stdin until Q
//! ngc_sim
//!
//! # Keep machine state across runs, dump it at the end
//! ngc_sim part.ngc --state-file /tmp/ngc_state.bin --dump-state
//!
//! # Verbose logging in JSON
//! ngc_sim part.ngc -v --json
//! ```

#![deny(warnings)]

use clap::Parser;
use ngc_interp::{Interpreter, MessageSink};
use ngc_sim::{SimConfig, SimMachine, StatePersistence, run_program};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

/// NGC Simulator - interpret RS274/NGC blocks against a simulated machine
#[derive(Parser, Debug)]
#[command(name = "ngc_sim")]
#[command(version)]
#[command(about = "Interpret RS274/NGC blocks against a simulated canonical machine")]
#[command(long_about = None)]
struct Args {
    /// Program file; reads stdin when omitted.
    #[arg(value_name = "FILE")]
    program: Option<PathBuf>,

    /// Path to simulator configuration (sim.toml).
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Machine state file; overrides `machine.state_file` from the config.
    #[arg(long, value_name = "FILE")]
    state_file: Option<PathBuf>,

    /// Print final machine state as JSON on stdout.
    #[arg(long)]
    dump_state: bool,

    /// Print accepted canonical calls as JSON lines on stdout.
    #[arg(long)]
    journal: bool,

    /// Print the effective configuration as TOML and exit.
    #[arg(long)]
    print_config: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    json: bool,
}

/// Prints `(MSG ...)` comments to stdout.
struct StdoutSink;

impl MessageSink for StdoutSink {
    fn message(&mut self, text: &str) {
        println!("{text}");
    }
}

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("Simulator failed: {}", e);
            eprintln!("ngc_sim: {e}");
            std::process::exit(2);
        }
    }
}

/// Returns whether every block completed.
fn run() -> Result<bool, Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SimConfig::load_validated(path)?,
        None => SimConfig::default(),
    };

    if args.print_config {
        print!("{}", toml::to_string_pretty(&config)?);
        return Ok(true);
    }

    setup_tracing(&args, &config);
    info!(
        "NGC simulator v{} starting ({})",
        env!("CARGO_PKG_VERSION"),
        config.shared.service_name
    );

    let persistence = args
        .state_file
        .clone()
        .or_else(|| config.machine.state_file.clone())
        .map(StatePersistence::new);

    let machine = match persistence.as_ref().map(StatePersistence::load).transpose()? {
        Some(Some(state)) => SimMachine::with_state(config.machine.clone(), state),
        _ => SimMachine::new(config.machine.clone()),
    };

    let input: Box<dyn BufRead> = match &args.program {
        Some(path) => {
            info!("Running program {:?}", path);
            Box::new(BufReader::new(File::open(path)?))
        }
        None => {
            info!("Reading blocks from stdin (Q to quit)");
            Box::new(io::stdin().lock())
        }
    };

    let mut interp = Interpreter::new(machine);
    let summary = run_program(&mut interp, input, &mut StdoutSink)?;
    info!(
        "Run complete: {} lines, {} completed, {} failed, {} pauses, stop={:?}",
        summary.lines,
        summary.completed,
        summary.failures.len(),
        summary.pauses,
        summary.stop
    );

    let mut machine = interp.into_machine();
    if args.journal {
        for call in machine.take_journal() {
            println!("{}", serde_json::to_string(&call)?);
        }
    }
    if let Some(persistence) = &persistence {
        persistence.save(machine.state())?;
    }
    if args.dump_state {
        println!("{}", serde_json::to_string_pretty(machine.state())?);
    }

    Ok(summary.is_clean())
}

/// Setup tracing subscriber based on CLI arguments and config.
fn setup_tracing(args: &Args, config: &SimConfig) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::from(config.shared.log_level)
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .compact()
            .init();
    }
}
