use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;

use sqlriver::report::FileStatus;
use sqlriver::RunOptions;

/// sqlriver - format SQL into the sqlstyle.guide river style.
#[derive(Parser, Debug)]
#[command(name = "sqlriver", version, about)]
struct Cli {
    /// Files or directories to format. Use "-" to read from stdin.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Check formatting without writing changes.
    #[arg(long)]
    check: bool,

    /// Show formatting diff without writing changes.
    #[arg(long)]
    diff: bool,

    /// Verbose output.
    #[arg(short, long)]
    verbose: bool,

    /// Quiet output (errors only).
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    let is_stdin = cli.files.len() == 1 && cli.files[0].to_string_lossy() == "-";
    if is_stdin {
        run_stdin();
        return;
    }

    let options = RunOptions {
        check: cli.check,
        diff: cli.diff,
    };
    let report = sqlriver::run(&cli.files, &options);

    if cli.verbose && !cli.quiet {
        for result in &report.results {
            match result.status {
                FileStatus::Changed => eprintln!("reformatted {}", result.path.display()),
                FileStatus::Unchanged => {}
                FileStatus::Error => {}
            }
        }
    }
    if !cli.quiet {
        eprintln!("{}", report.summary());
    }
    report.print_errors();

    if report.has_errors() {
        std::process::exit(2);
    } else if cli.check && report.has_changes() {
        std::process::exit(1);
    }
}

fn run_stdin() {
    let mut source = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut source) {
        eprintln!("Error reading stdin: {}", e);
        std::process::exit(2);
    }

    match sqlriver::format_string(&source) {
        Ok(formatted) => {
            print!("{}", formatted);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}
