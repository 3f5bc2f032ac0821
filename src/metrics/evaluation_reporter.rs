use hashbrown::HashSet;

use crate::io::ArticleId;
use crate::metrics::coverage::Coverage;
use crate::metrics::f1score::F1score;
use crate::metrics::hitrate::HitRate;
use crate::metrics::mrr::Mrr;
use crate::metrics::popularity::Popularity;
use crate::metrics::precision::Precision;
use crate::metrics::recall::Recall;
use crate::metrics::RecommendationMetric;
use crate::userknn::interaction_store::InteractionStore;

/// Feeds every evaluated user into all metrics at once.
pub struct EvaluationReporter {
    metrics: Vec<Box<dyn RecommendationMetric + Send>>,
    qty_users: usize,
}

impl EvaluationReporter {
    pub fn new(store: &InteractionStore, length: usize) -> EvaluationReporter {
        let metrics: Vec<Box<dyn RecommendationMetric + Send>> = vec![
            Box::new(Mrr::new(length)),
            Box::new(HitRate::new(length)),
            Box::new(Precision::new(length)),
            Box::new(Recall::new(length)),
            Box::new(F1score::new(length)),
            Box::new(Coverage::new(store.num_articles(), length)),
            Box::new(Popularity::new(store, length)),
        ];

        EvaluationReporter {
            metrics,
            qty_users: 0,
        }
    }

    pub fn add(&mut self, recommendations: &[ArticleId], held_out: &HashSet<ArticleId>) {
        self.qty_users += 1;
        for metric in self.metrics.iter_mut() {
            metric.add(recommendations, held_out);
        }
    }

    pub fn qty_users(&self) -> usize {
        self.qty_users
    }

    /// `(name, score)` pairs in a fixed order.
    pub fn scores(&self) -> Vec<(String, f64)> {
        self.metrics
            .iter()
            .map(|metric| (metric.get_name(), metric.result()))
            .collect()
    }

    pub fn result(&self) -> String {
        self.metrics
            .iter()
            .map(|metric| format!("{:.4}", metric.result()))
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn get_name(&self) -> String {
        self.metrics
            .iter()
            .map(|metric| metric.get_name())
            .collect::<Vec<_>>()
            .join(",")
    }
}
