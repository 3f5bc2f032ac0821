use hashbrown::{HashMap, HashSet};

use crate::io::ArticleId;
use crate::metrics::{top_n, RecommendationMetric};
use crate::userknn::interaction_store::InteractionStore;

/// Average popularity of the recommended articles, as distinct viewers
/// relative to the most viewed article. Close to 1 means the recommender
/// mostly repeats the head of the popularity ranking.
pub struct Popularity {
    sum_of_scores: f64,
    qty: usize,
    article_to_qty_viewers: HashMap<ArticleId, usize>,
    max_qty_viewers: usize,
    length: usize,
}

impl Popularity {
    pub fn new(store: &InteractionStore, length: usize) -> Popularity {
        let article_to_qty_viewers: HashMap<ArticleId, usize> = store
            .all_articles_by_popularity()
            .iter()
            .map(|article_id| (*article_id, store.viewers_of(article_id).len()))
            .collect();
        let max_qty_viewers = article_to_qty_viewers.values().copied().max().unwrap_or(0);

        Popularity {
            sum_of_scores: 0.0,
            qty: 0,
            article_to_qty_viewers,
            max_qty_viewers,
            length,
        }
    }
}

impl RecommendationMetric for Popularity {
    fn add(&mut self, recommendations: &[ArticleId], _held_out: &HashSet<ArticleId>) {
        let top_recos = top_n(recommendations, self.length);
        self.qty += 1;
        if !top_recos.is_empty() && self.max_qty_viewers > 0 {
            let sum: f64 = top_recos
                .iter()
                .filter_map(|article_id| self.article_to_qty_viewers.get(article_id))
                .map(|qty_viewers| *qty_viewers as f64 / self.max_qty_viewers as f64)
                .sum();
            self.sum_of_scores += sum / top_recos.len() as f64;
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
        format!("Popularity@{}", self.length)
    }
}

#[cfg(test)]
mod popularity_test {
    use super::*;
    use crate::io::Interaction;

    #[test]
    fn should_average_normalized_viewer_counts() {
        let interactions = vec![
            Interaction::new(1, 10),
            Interaction::new(2, 10),
            Interaction::new(3, 10),
            Interaction::new(4, 10),
            Interaction::new(1, 20),
        ];
        let store = InteractionStore::new(&interactions, &[30]);
        let mut undertest = Popularity::new(&store, 2);

        undertest.add(&[10, 20, 30], &HashSet::new());
        undertest.add(&[30], &HashSet::new());

        // (1.0 + 0.25) / 2 for the first user, 0.0 for the second
        assert!((0.3125 - undertest.result()).abs() < 1e-12);
        assert_eq!("Popularity@2", undertest.get_name());
    }
}
