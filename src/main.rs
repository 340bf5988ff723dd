use clap::Parser;
use lexitag::interfaces::cli::{self, Cli};
use std::process;

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    if let Err(err) = cli::run(cli) {
        eprintln!("{}", err);
        process::exit(1);
    }
}
