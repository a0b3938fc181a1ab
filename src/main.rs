//! Binary entry point: parse arguments, run preflight checks, split.

use clap::Parser;
use tracing::error;

use dumpsplit::cli::Cli;
use dumpsplit::error::AppError;
use dumpsplit::split::{self, SplitConfig};
use dumpsplit::validation;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("[SPLITTER] {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    validation::check_source(&cli.source).await?;
    validation::check_destination(&cli.output_dir).await?;

    let config = SplitConfig::default()
        .rows_per_file_limit(cli.limit)
        .group_column(usize::from(cli.column))
        .ids_only(cli.only_ids)
        .include_header(cli.include_header)
        .encoding(cli.encoding);

    split::split_file(&cli.source, &cli.output_dir, config).await?;

    Ok(())
}
