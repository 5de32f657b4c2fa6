//! `wsw` binary entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;
use workspace_sweeper::cli_app::{Cli, run};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("wsw: {err}");
        std::process::exit(1);
    }
}
