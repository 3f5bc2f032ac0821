use hashbrown::HashSet;

use crate::io::ArticleId;

pub mod coverage;
pub mod evaluation_reporter;
pub mod f1score;
pub mod hitrate;
pub mod mrr;
pub mod popularity;
pub mod precision;
pub mod recall;

/// A ranking metric over users: each call to `add` scores the recommendations
/// for one user against the articles that were held out from that user's history.
pub trait RecommendationMetric {
    fn add(&mut self, recommendations: &[ArticleId], held_out: &HashSet<ArticleId>);
    fn result(&self) -> f64;
    fn get_name(&self) -> String;
}

pub(crate) fn top_n(recommendations: &[ArticleId], length: usize) -> &[ArticleId] {
    &recommendations[..recommendations.len().min(length)]
}
