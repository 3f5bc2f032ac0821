use itertools::Itertools;
use rayon::prelude::*;
use tdigest::TDigest;
use tracing::info;

use crate::io::{ArticleId, Interaction, UserId};

pub struct DatasetStats {
    pub descriptive_name: String,
    pub qty_records: usize,
    pub qty_unique_interactions: usize,
    pub qty_unique_user_ids: usize,
    pub qty_unique_article_ids: usize,
    pub qty_catalog_articles: usize,
    pub views_per_user_p25: u64,
    pub views_per_user_p50: u64,
    pub views_per_user_p75: u64,
    pub views_per_user_p90: u64,
    pub views_per_user_p99: u64,
    pub max_views_per_user: u64,
}

pub fn determine_dataset_statistics(
    descriptive_name: &str,
    interactions: &[Interaction],
    qty_catalog_articles: usize,
) -> DatasetStats {
    let qty_records = interactions.len();

    let mut unique_interactions: Vec<(UserId, ArticleId)> = interactions
        .par_iter()
        .map(|interaction| (interaction.user_id, interaction.article_id))
        .collect();
    unique_interactions.par_sort_unstable();
    unique_interactions.dedup();
    let qty_unique_interactions = unique_interactions.len();

    let mut article_ids: Vec<ArticleId> = unique_interactions
        .par_iter()
        .map(|(_user_id, article_id)| *article_id)
        .collect();
    article_ids.par_sort_unstable();
    article_ids.dedup();
    let qty_unique_article_ids = article_ids.len();

    // unique_interactions is sorted by user id, so equal users are adjacent
    let views_per_user = unique_interactions
        .iter()
        .group_by(|(user_id, _article_id)| *user_id)
        .into_iter()
        .map(|(_user_id, views)| views.count() as f64)
        .collect_vec();
    let qty_unique_user_ids = views_per_user.len();
    let max_views_per_user = views_per_user.iter().fold(0_f64, |max, views| max.max(*views)) as u64;

    let views_digest = TDigest::new_with_size(100).merge_unsorted(views_per_user);
    let percentile = |q: f64| views_digest.estimate_quantile(q).round() as u64;

    let stats = DatasetStats {
        descriptive_name: descriptive_name.to_string(),
        qty_records,
        qty_unique_interactions,
        qty_unique_user_ids,
        qty_unique_article_ids,
        qty_catalog_articles,
        views_per_user_p25: percentile(0.25),
        views_per_user_p50: percentile(0.50),
        views_per_user_p75: percentile(0.75),
        views_per_user_p90: percentile(0.90),
        views_per_user_p99: percentile(0.99),
        max_views_per_user,
    };

    info!(
        dataset = %stats.descriptive_name,
        records = stats.qty_records,
        unique_interactions = stats.qty_unique_interactions,
        users = stats.qty_unique_user_ids,
        viewed_articles = stats.qty_unique_article_ids,
        catalog_articles = stats.qty_catalog_articles,
        "loaded dataset"
    );
    info!(
        p25 = stats.views_per_user_p25,
        p50 = stats.views_per_user_p50,
        p75 = stats.views_per_user_p75,
        p90 = stats.views_per_user_p90,
        p99 = stats.views_per_user_p99,
        max = stats.max_views_per_user,
        "distinct articles viewed per user"
    );

    stats
}
