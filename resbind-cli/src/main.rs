//! CLI entrypoint for `resbind`.

use clap::Parser;
use resbind_cli::{Cli, CliError};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_tracing(&cli);
    resbind_cli::run(&cli).map(drop)
}

/// `--verbose` wins over `RUST_LOG`, which wins over the `info` default.
fn init_tracing(cli: &Cli) {
    let filter = cli.verbosity_filter().map_or_else(
        || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        EnvFilter::new,
    );
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}
