use std::fs::File;

use anyhow::Result;
use clap::Parser;
use serde_derive::Serialize;
use tracing::info;

use coview::cleaning::write_records;
use coview::config::AppConfig;
use coview::evaluation::evaluate;
use coview::io::Dataset;
use coview::logging;
use coview::stopwatch::Strategy;

#[derive(Parser)]
#[command(name = "evaluate")]
#[command(about = "Evaluate the recommender on held-out views")]
#[command(version)]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = "coview.conf")]
    config: String,
}

#[derive(Serialize)]
struct MetricRecord {
    metric: String,
    score: f64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::new(&cli.config)?;
    logging::init(&config.log.level);

    let dataset = Dataset::load(&config.data.interactions_path, &config.data.articles_path)?;
    let num_items_to_recommend = config.model.num_items_to_recommend;
    let result = evaluate(
        dataset,
        &config.evaluation,
        num_items_to_recommend,
        config.model.neighborhood_size(),
    )?;

    println!("===============================================================");
    println!("===                  EVALUATING HELD-OUT VIEWS             ====");
    println!("===============================================================");
    println!("Qty evaluated users: {}", result.reporter.qty_users());
    println!("{}", result.reporter.get_name());
    println!("{}", result.reporter.result());
    println!("Prediction latency");
    for strategy in [Strategy::Neighbors, Strategy::ColdStart] {
        println!("{:?} (n={})", strategy, result.latencies.get_n(strategy));
        for (label, q) in [("p90", 0.9), ("p95", 0.95), ("p99.5", 0.995)] {
            if let Some(micros) = result.latencies.get_percentile_in_micros(strategy, q) {
                println!("{} (microseconds): {:.0}", label, micros);
            }
        }
    }

    if let Some(out_path) = config.evaluation.out_path.as_deref() {
        let records: Vec<MetricRecord> = result
            .reporter
            .scores()
            .into_iter()
            .map(|(metric, score)| MetricRecord { metric, score })
            .collect();
        write_records(File::create(out_path)?, &records)?;
        info!(out_path, "wrote evaluation results");
    }
    Ok(())
}
