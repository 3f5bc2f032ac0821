use hashbrown::HashSet;

use crate::io::ArticleId;
use crate::metrics::{top_n, RecommendationMetric};

pub struct Recall {
    sum_of_scores: f64,
    qty: usize,
    length: usize,
}

impl Recall {
    /// Returns a Recall evaluation metric: the share of a user's held-out
    /// articles that made it into the top `length` recommendations.
    ///
    /// # Arguments
    ///
    /// * `length` - the length aka 'k' that will be used for evaluation.
    ///
    pub fn new(length: usize) -> Recall {
        Recall {
            sum_of_scores: 0_f64,
            qty: 0,
            length,
        }
    }
}

impl RecommendationMetric for Recall {
    fn add(&mut self, recommendations: &[ArticleId], held_out: &HashSet<ArticleId>) {
        if held_out.is_empty() {
            return;
        }
        self.qty += 1;
        let qty_hits = top_n(recommendations, self.length)
            .iter()
            .filter(|article_id| held_out.contains(*article_id))
            .count();
        self.sum_of_scores += qty_hits as f64 / held_out.len() as f64
    }

    fn result(&self) -> f64 {
        if self.qty > 0 {
            self.sum_of_scores / self.qty as f64
        } else {
            0.0
        }
    }

    fn get_name(&self) -> String {
        format!("Recall@{}", self.length)
    }
}

#[cfg(test)]
mod recall_test {
    use super::*;

    #[test]
    fn should_calculate_recall() {
        let length = 20;
        let mut under_test = Recall::new(length);
        let recommendations: Vec<ArticleId> = (1..=24).collect();
        let held_out: HashSet<ArticleId> = vec![3, 55, 4].into_iter().collect();
        under_test.add(&recommendations, &held_out);
        assert!((2.0 / 3.0 - under_test.result()).abs() < f64::EPSILON);
        assert_eq!("Recall@20", under_test.get_name());
    }

    #[test]
    fn should_skip_users_without_held_out_articles() {
        let mut under_test = Recall::new(5);
        under_test.add(&[1, 2], &HashSet::new());
        assert!((0.0 - under_test.result()).abs() < f64::EPSILON);
    }
}
