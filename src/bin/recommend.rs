use anyhow::Result;
use clap::Parser;

use coview::config::AppConfig;
use coview::io::{Dataset, UserId};
use coview::logging;
use coview::{RecommendError, Recommender};

#[derive(Parser)]
#[command(name = "recommend")]
#[command(about = "Recommend articles to a user based on what similar users viewed")]
#[command(version)]
struct Cli {
    /// User to recommend for
    user_id: UserId,

    /// Number of articles to recommend
    #[arg(allow_negative_numbers = true)]
    count: i64,

    /// Configuration file
    #[arg(short, long, default_value = "coview.conf")]
    config: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::new(&cli.config)?;
    logging::init(&config.log.level);

    if cli.count <= 0 {
        return Err(RecommendError::InvalidArgument(format!(
            "count must be a positive integer, got {}",
            cli.count
        ))
        .into());
    }

    let dataset = Dataset::load(&config.data.interactions_path, &config.data.articles_path)?;
    let recommender = Recommender::new(dataset, config.model.neighborhood_size());

    let recommendations = recommender.recommend_titled(cli.user_id, cli.count as usize)?;
    println!(
        "Top {} recommendations for user {}:",
        recommendations.len(),
        cli.user_id
    );
    for (position, (_article_id, title)) in recommendations.iter().enumerate() {
        println!("{}. {}", position + 1, title);
    }
    Ok(())
}
