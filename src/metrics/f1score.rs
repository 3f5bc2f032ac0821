use hashbrown::HashSet;

use crate::io::ArticleId;
use crate::metrics::precision::Precision;
use crate::metrics::recall::Recall;
use crate::metrics::RecommendationMetric;

pub struct F1score {
    precision: Precision,
    recall: Recall,
    length: usize,
}

impl F1score {
    pub fn new(length: usize) -> F1score {
        F1score {
            precision: Precision::new(length),
            recall: Recall::new(length),
            length,
        }
    }
}

impl RecommendationMetric for F1score {
    fn add(&mut self, recommendations: &[ArticleId], held_out: &HashSet<ArticleId>) {
        self.precision.add(recommendations, held_out);
        self.recall.add(recommendations, held_out);
    }

    fn result(&self) -> f64 {
        let precision_score = self.precision.result();
        let recall_score = self.recall.result();
        let f1score: f64 =
            2.0 * (precision_score * recall_score) / (precision_score + recall_score);
        if f1score.is_nan() {
            0.0
        } else {
            f1score
        }
    }

    fn get_name(&self) -> String {
        format!("F1score@{}", self.length)
    }
}
