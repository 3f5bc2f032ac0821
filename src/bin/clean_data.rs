use anyhow::{Context, Result};
use clap::Parser;

use coview::cleaning::clean_and_save;
use coview::logging;

#[derive(Parser)]
#[command(name = "clean_data")]
#[command(about = "Clean the raw interaction and article exports for the recommender")]
#[command(version)]
struct Cli {
    /// Raw user-article interactions CSV
    raw_interactions: String,

    /// Raw articles CSV
    raw_articles: String,

    /// Directory to write the cleaned files into
    #[arg(long, default_value = "./data/processed/")]
    out_dir: String,

    /// Log level, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level);

    clean_and_save(&cli.raw_interactions, &cli.raw_articles, &cli.out_dir)
        .with_context(|| format!("cleaning {} and {}", cli.raw_interactions, cli.raw_articles))?;
    Ok(())
}
