//! Runs an LS-8 program file and prints its output.
//!
//! ```text
//! ls8 riddle.ls8 --skip-lines 117
//! ```
//!
//! PRN values are printed as they are produced, one per line; the hint is printed
//! once the program halts. Set `RUST_LOG` (or pass `--trace`) for diagnostics.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ls8::loader::{self, LoaderConfig};
use ls8::{CpuConfig, FlatMemory, StepOutcome, CPU};

#[derive(Debug, Parser)]
#[command(name = "ls8", version, about = "Run an LS-8 program and print its hint")]
struct Args {
    /// Program file: one 8-digit binary literal per line, `#` starts a comment
    program: PathBuf,

    /// Leading lines to ignore (riddle preamble)
    #[arg(long, default_value_t = 0)]
    skip_lines: usize,

    /// Timer interrupt period in milliseconds
    #[arg(long, default_value_t = 1000)]
    timer_ms: u64,

    /// Log every executed instruction
    #[arg(long)]
    trace: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = if args.trace {
        EnvFilter::new("ls8=trace")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = LoaderConfig {
        skip_lines: args.skip_lines,
    };
    let program = match loader::load_file(&args.program, &config) {
        Ok(program) => program,
        Err(err) => {
            eprintln!("error: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let cpu_config = CpuConfig {
        timer_period: Duration::from_millis(args.timer_ms),
    };
    let mut cpu = CPU::with_config(FlatMemory::new(), cpu_config);
    if let Err(err) = cpu.load(&program) {
        eprintln!("error: {}", err);
        return ExitCode::FAILURE;
    }

    loop {
        let outcome = cpu.step();

        for value in cpu.take_printed() {
            println!("{}", value);
        }

        match outcome {
            Ok(StepOutcome::Halted) => break,
            Ok(_) => {}
            Err(err) => {
                eprintln!("error: {}", err);
                eprintln!("{}", cpu.trace());
                if !cpu.hint().is_empty() {
                    eprintln!("partial hint: {}", cpu.hint());
                }
                return ExitCode::FAILURE;
            }
        }
    }

    if !cpu.hint().is_empty() {
        println!("{}", cpu.hint());
    }
    ExitCode::SUCCESS
}
