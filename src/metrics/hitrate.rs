use hashbrown::HashSet;

use crate::io::ArticleId;
use crate::metrics::{top_n, RecommendationMetric};

/// Share of users with at least one held-out article among their top recommendations.
pub struct HitRate {
    sum_of_scores: f64,
    qty: usize,
    length: usize,
}

impl HitRate {
    pub fn new(length: usize) -> HitRate {
        HitRate {
            sum_of_scores: 0_f64,
            qty: 0,
            length,
        }
    }
}

impl RecommendationMetric for HitRate {
    fn add(&mut self, recommendations: &[ArticleId], held_out: &HashSet<ArticleId>) {
        self.qty += 1;
        if top_n(recommendations, self.length)
            .iter()
            .any(|article_id| held_out.contains(article_id))
        {
            self.sum_of_scores += 1_f64
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
        format!("HitRate@{}", self.length)
    }
}

#[cfg(test)]
mod hitrate_test {
    use super::*;

    #[test]
    fn should_happyflow_hitrate() {
        let mut undertest = HitRate::new(2);
        let held_out: HashSet<ArticleId> = vec![2, 3].into_iter().collect();
        undertest.add(&[1, 2], &held_out);
        undertest.add(&[4, 5, 3], &held_out);
        assert!((0.5 - undertest.result()).abs() < f64::EPSILON);
        assert_eq!("HitRate@2", undertest.get_name());
    }

    #[test]
    fn should_handle_divide_by_zero() {
        let undertest = HitRate::new(20);
        assert!((0.0 - undertest.result()).abs() < f64::EPSILON);
    }
}
