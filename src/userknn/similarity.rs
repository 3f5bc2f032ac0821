use std::collections::BinaryHeap;

use hashbrown::{HashMap, HashSet};
use rayon::prelude::*;

use crate::error::{RecommendError, Result};
use crate::io::{ArticleId, UserId};
use crate::userknn::interaction_store::InteractionStore;
use crate::userknn::UserScore;

pub trait NeighborhoodIndex {
    fn views_of(&self, user_id: &UserId) -> &HashSet<ArticleId>;

    fn is_known_user(&self, user_id: &UserId) -> bool;

    fn articles_by_popularity(&self) -> &[ArticleId];

    fn popularity_rank(&self, article_id: &ArticleId) -> Option<usize>;

    /// Find the users that co-viewed at least one article with `user_id`,
    /// strongest neighbor first.
    /// param k keeps only the top 'k' neighbors, `None` keeps all of them.
    fn find_neighbors(&self, user_id: &UserId, k: Option<usize>) -> Result<Vec<UserScore>>;
}

impl NeighborhoodIndex for InteractionStore {
    fn views_of(&self, user_id: &UserId) -> &HashSet<ArticleId> {
        InteractionStore::views_of(self, user_id)
    }

    fn is_known_user(&self, user_id: &UserId) -> bool {
        InteractionStore::is_known_user(self, user_id)
    }

    fn articles_by_popularity(&self) -> &[ArticleId] {
        self.all_articles_by_popularity()
    }

    fn popularity_rank(&self, article_id: &ArticleId) -> Option<usize> {
        InteractionStore::popularity_rank(self, article_id)
    }

    fn find_neighbors(&self, user_id: &UserId, k: Option<usize>) -> Result<Vec<UserScore>> {
        if !self.is_known_user(user_id) {
            return Err(RecommendError::UnknownUser(*user_id));
        }

        let co_views = co_view_counts(self, user_id);
        let scored = co_views
            .into_iter()
            .map(|(other_id, score)| UserScore::new(other_id, score, self.view_count(&other_id)));

        match k {
            Some(k) => Ok(top_k(scored, k)),
            None => {
                let mut neighbors: Vec<UserScore> = scored.collect();
                neighbors.par_sort_unstable();
                Ok(neighbors)
            }
        }
    }
}

/// Dot product of the target's binary view vector with every other user's,
/// restricted to users with a non-zero product.
fn co_view_counts(store: &InteractionStore, user_id: &UserId) -> HashMap<UserId, usize> {
    let target_views = store.views_of(user_id);
    let mut co_views: HashMap<UserId, usize> = HashMap::with_capacity(target_views.len() * 8);
    for article_id in target_views.iter() {
        for other_id in store.viewers_of(article_id).iter() {
            if other_id != user_id {
                *co_views.entry(*other_id).or_insert(0) += 1;
            }
        }
    }
    co_views
}

fn top_k(scored: impl Iterator<Item = UserScore>, k: usize) -> Vec<UserScore> {
    if k == 0 {
        return Vec::new();
    }
    // UserScore orders the strongest neighbor first, so the top of the heap is
    // the weakest neighbor kept so far.
    let mut closest_neighbors: BinaryHeap<UserScore> = BinaryHeap::with_capacity(k);
    for candidate in scored {
        if closest_neighbors.len() < k {
            closest_neighbors.push(candidate);
        } else if let Some(mut bottom) = closest_neighbors.peek_mut() {
            if candidate < *bottom {
                *bottom = candidate;
            }
        }
    }
    closest_neighbors.into_sorted_vec()
}
