//! pcmfx CLI
//!
//! Command-line entry point for the echo and vocal-removal transforms.

use clap::Parser;
use env_logger::Env;
use log::debug;

use pcmfx::cli::{handle_command, Cli};

fn main() {
    // Usage errors exit with status 1; --help and --version exit cleanly
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    // Initialize logger
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    debug!("pcmfx v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = handle_command(cli.command) {
        eprintln!("error: {}", e);
        debug!("error code: {}", e.error_code());
        if e.is_usage() {
            eprintln!("Usage: pcmfx addecho [-d delay] [-v volume_scale] sourcewav destwav");
            eprintln!("       pcmfx remvocals sourcewav destwav");
        }
        std::process::exit(1);
    }
}
