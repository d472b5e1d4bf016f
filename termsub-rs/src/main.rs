use std::io::Write;

use clap::Parser;
use termsub::cli::{self, CliArgs};
use tracing_subscriber::EnvFilter;

fn main() {
    // Logs go to stderr so stdout carries only the expansion.
    let filter = EnvFilter::try_from_env("TERMSUB_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    let out = match cli::run(&args) {
        Ok(out) => out,
        Err(e) => {
            eprintln!("termsub: {e}");
            std::process::exit(1);
        }
    };

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = stdout.write_all(out.as_bytes()).and_then(|()| stdout.flush()) {
        eprintln!("termsub: stdout: {e}");
        std::process::exit(1);
    }
}
