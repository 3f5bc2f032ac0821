use hashbrown::HashSet;

use crate::io::ArticleId;
use crate::metrics::{top_n, RecommendationMetric};

pub struct Precision {
    sum_of_scores: f64,
    qty: usize,
    length: usize,
}

impl Precision {
    /// Returns a Precision evaluation metric: the share of the top `length`
    /// slots that hold a held-out article. Empty slots count as misses.
    ///
    /// # Arguments
    ///
    /// * `length` - the length aka 'k' that will be used for evaluation.
    ///
    pub fn new(length: usize) -> Precision {
        Precision {
            sum_of_scores: 0_f64,
            qty: 0,
            length,
        }
    }
}

impl RecommendationMetric for Precision {
    fn add(&mut self, recommendations: &[ArticleId], held_out: &HashSet<ArticleId>) {
        self.qty += 1;
        let qty_hits = top_n(recommendations, self.length)
            .iter()
            .filter(|article_id| held_out.contains(*article_id))
            .count();
        self.sum_of_scores += qty_hits as f64 / self.length as f64
    }

    fn result(&self) -> f64 {
        if self.qty > 0 {
            self.sum_of_scores / self.qty as f64
        } else {
            0.0
        }
    }

    fn get_name(&self) -> String {
        format!("Precision@{}", self.length)
    }
}
