use hashbrown::HashSet;

use crate::io::ArticleId;
use crate::metrics::{top_n, RecommendationMetric};

/// Share of the article universe that shows up in at least one user's top recommendations.
pub struct Coverage {
    qty_articles: usize,
    recommended_articles: HashSet<ArticleId>,
    length: usize,
}

impl Coverage {
    pub fn new(qty_articles: usize, length: usize) -> Coverage {
        Coverage {
            qty_articles,
            recommended_articles: HashSet::new(),
            length,
        }
    }
}

impl RecommendationMetric for Coverage {
    fn add(&mut self, recommendations: &[ArticleId], _held_out: &HashSet<ArticleId>) {
        self.recommended_articles
            .extend(top_n(recommendations, self.length).iter().copied());
    }

    fn result(&self) -> f64 {
        if self.qty_articles > 0 {
            self.recommended_articles.len() as f64 / self.qty_articles as f64
        } else {
            0.0
        }
    }

    fn get_name(&self) -> String {
        format!("Coverage@{}", self.length)
    }
}

#[cfg(test)]
mod coverage_test {
    use super::*;

    #[test]
    fn should_count_distinct_recommended_articles() {
        let mut undertest = Coverage::new(10, 2);
        undertest.add(&[1, 2, 3], &HashSet::new());
        undertest.add(&[2, 4], &HashSet::new());
        assert!((0.3 - undertest.result()).abs() < 1e-12);
        assert_eq!("Coverage@2", undertest.get_name());
    }
}
