use hashbrown::HashSet;

use crate::io::ArticleId;
use crate::metrics::{top_n, RecommendationMetric};

/// Mean reciprocal rank of the first held-out article in the recommendations.
pub struct Mrr {
    sum_of_scores: f64,
    qty: usize,
    length: usize,
}

impl Mrr {
    pub fn new(length: usize) -> Mrr {
        Mrr {
            sum_of_scores: 0_f64,
            qty: 0,
            length,
        }
    }
}

impl RecommendationMetric for Mrr {
    fn add(&mut self, recommendations: &[ArticleId], held_out: &HashSet<ArticleId>) {
        self.qty += 1;
        let first_hit = top_n(recommendations, self.length)
            .iter()
            .position(|article_id| held_out.contains(article_id));
        if let Some(rank) = first_hit {
            self.sum_of_scores += 1_f64 / (rank as f64 + 1_f64)
        }
    }

    fn result(&self) -> f64 {
        if self.qty > 0 {
            self.sum_of_scores / self.qty as f64
        } else {
            0.0
        }
    }

    fn get_name(&self) -> String {
        format!("Mrr@{}", self.length)
    }
}
