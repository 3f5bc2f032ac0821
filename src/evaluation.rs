use hashbrown::HashSet;
use indicatif::ProgressBar;
use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use rayon::prelude::*;
use tracing::info;

use crate::config::EvaluationConfig;
use crate::error::Result;
use crate::io::{ArticleId, Dataset, Interaction, UserId};
use crate::metrics::evaluation_reporter::EvaluationReporter;
use crate::stopwatch::{LatencyLog, Stopwatch, Strategy};
use crate::userknn::Recommender;

/// Training interactions plus, per evaluated user, the articles hidden from training.
pub struct HoldoutSplit {
    pub training: Vec<Interaction>,
    pub held_out: Vec<(UserId, HashSet<ArticleId>)>,
}

/// Splits the deduplicated interactions per user with a seeded generator, so
/// the same seed always yields the same split.
///
/// A `cold_start_user_fraction` of all users lose their whole history and are
/// evaluated as unknown users. Of the remaining users, those with at least
/// `min_views_for_holdout` distinct views get `holdout_fraction` of them hidden,
/// at least one and never all.
pub fn split_holdout(interactions: &[Interaction], config: &EvaluationConfig) -> HoldoutSplit {
    let mut rng = Pcg64::seed_from_u64(config.seed);

    let user_to_articles = interactions
        .iter()
        .map(|interaction| (interaction.user_id, interaction.article_id))
        .unique()
        .into_group_map();

    let mut training = Vec::with_capacity(interactions.len());
    let mut held_out = Vec::new();

    for user_id in user_to_articles.keys().copied().sorted() {
        let mut articles = user_to_articles[&user_id].clone();
        articles.sort_unstable();

        if rng.gen_bool(config.cold_start_user_fraction.clamp(0.0, 1.0)) {
            held_out.push((user_id, articles.into_iter().collect()));
            continue;
        }

        if articles.len() >= config.min_views_for_holdout.max(2) {
            articles.shuffle(&mut rng);
            let qty_held_out = ((articles.len() as f64 * config.holdout_fraction).round() as usize)
                .clamp(1, articles.len() - 1);
            let kept = articles.split_off(qty_held_out);
            held_out.push((user_id, articles.into_iter().collect()));
            articles = kept;
        }

        training.extend(
            articles
                .into_iter()
                .map(|article_id| Interaction::new(user_id, article_id)),
        );
    }

    HoldoutSplit { training, held_out }
}

pub struct EvaluationResult {
    pub reporter: EvaluationReporter,
    pub latencies: LatencyLog,
}

/// Trains on the split of `dataset` and scores `num_items_to_recommend`
/// recommendations for every held-out user, in parallel.
pub fn evaluate(
    dataset: Dataset,
    config: &EvaluationConfig,
    num_items_to_recommend: usize,
    neighborhood_size_k: Option<usize>,
) -> Result<EvaluationResult> {
    let split = split_holdout(&dataset.interactions, config);
    info!(
        training_interactions = split.training.len(),
        evaluated_users = split.held_out.len(),
        "split dataset"
    );

    let recommender = Recommender::new(
        Dataset {
            descriptive_name: format!("{} (training split)", dataset.descriptive_name),
            interactions: split.training,
            catalog: dataset.catalog,
        },
        neighborhood_size_k,
    );

    let progress = ProgressBar::new(split.held_out.len() as u64);
    let outcomes = split
        .held_out
        .par_iter()
        .map(|(user_id, _held_out)| {
            let strategy = if recommender.store().is_known_user(user_id) {
                Strategy::Neighbors
            } else {
                Strategy::ColdStart
            };
            let stopwatch = Stopwatch::new();
            let recommendations = recommender.recommend(*user_id, num_items_to_recommend)?;
            let duration_micros = stopwatch.elapsed_micros();
            progress.inc(1);
            Ok((recommendations, strategy, duration_micros))
        })
        .collect::<Result<Vec<_>>>()?;
    progress.finish_and_clear();

    let mut reporter = EvaluationReporter::new(recommender.store(), num_items_to_recommend);
    let mut latencies = LatencyLog::new();
    for ((recommendations, strategy, duration_micros), (_user_id, held_out)) in
        outcomes.iter().zip(split.held_out.iter())
    {
        reporter.add(recommendations, held_out);
        latencies.record(*strategy, *duration_micros);
    }

    Ok(EvaluationResult {
        reporter,
        latencies,
    })
}
