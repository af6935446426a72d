use std::{fs::read_to_string, path::PathBuf, process::ExitCode, time::Instant};

use clap::Parser;
use tracing::{debug, error};

use probecheck::{
    display_error, init_tracing, parse_source,
    type_checker::type_checker::{exit_code, SemanticAnalyser},
};

/// Exit code for unreadable input or syntax errors; analysis failures exit
/// with the number of the failing pass (1 or 2).
const INPUT_ERROR: u8 = 3;

/// Type check a probe program without running it
#[derive(Parser)]
#[command(name = "probecheck")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the probe source file
    file: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let start = Instant::now();

    let source = match read_to_string(&cli.file) {
        Ok(source) => source,
        Err(err) => {
            error!(file = %cli.file.display(), %err, "failed to read source");
            eprintln!("Error: could not read {}: {}", cli.file.display(), err);
            return ExitCode::from(INPUT_ERROR);
        }
    };

    let file_name = cli.file.to_string_lossy().to_string();
    let program = match parse_source(source.clone(), &file_name) {
        Ok(program) => program,
        Err(err) => {
            display_error(&err, &source);
            return ExitCode::from(INPUT_ERROR);
        }
    };

    debug!(elapsed = ?start.elapsed(), probes = program.probes.len(), "parsed");

    let type_check_start = Instant::now();
    let result = SemanticAnalyser::new(&program).analyse();

    debug!(elapsed = ?type_check_start.elapsed(), ok = result.is_ok(), "type checked");

    ExitCode::from(exit_code(&result) as u8)
}
