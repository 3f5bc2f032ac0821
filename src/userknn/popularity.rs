use std::cmp::Ordering;

use hashbrown::{HashMap, HashSet};
use rayon::prelude::*;

use crate::io::{ArticleId, UserId};

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct ArticlePopularity {
    pub article_id: ArticleId,
    pub qty_viewers: usize,
}

impl ArticlePopularity {
    pub fn new(article_id: ArticleId, qty_viewers: usize) -> Self {
        ArticlePopularity {
            article_id,
            qty_viewers,
        }
    }
}

impl Ord for ArticlePopularity {
    fn cmp(&self, other: &Self) -> Ordering {
        // most viewers first, then ascending article id
        other
            .qty_viewers
            .cmp(&self.qty_viewers)
            .then_with(|| self.article_id.cmp(&other.article_id))
    }
}

impl PartialOrd for ArticlePopularity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Global ranking of articles by the number of distinct users that viewed them.
///
/// The ranking is computed once per loaded dataset and is the knowledge-based
/// source for users without history, as well as the fill source for everybody
/// else. Articles that are part of the catalog but were never viewed are ranked
/// last, in ascending id order.
pub struct PopularityRanking {
    articles_by_popularity: Vec<ArticleId>,
    article_to_rank: HashMap<ArticleId, usize>,
}

impl PopularityRanking {
    pub fn new<'a>(
        article_to_users: &HashMap<ArticleId, HashSet<UserId>>,
        unviewed_articles: impl IntoIterator<Item = &'a ArticleId>,
    ) -> Self {
        let mut scored: Vec<ArticlePopularity> = article_to_users
            .iter()
            .map(|(article_id, viewers)| ArticlePopularity::new(*article_id, viewers.len()))
            .collect();

        let mut unviewed: Vec<ArticleId> = unviewed_articles
            .into_iter()
            .filter(|article_id| !article_to_users.contains_key(*article_id))
            .copied()
            .collect();
        unviewed.sort_unstable();
        unviewed.dedup();
        scored.extend(
            unviewed
                .into_iter()
                .map(|article_id| ArticlePopularity::new(article_id, 0)),
        );

        // The ordering is total, so the unstable parallel sort is deterministic.
        scored.par_sort_unstable();

        let articles_by_popularity: Vec<ArticleId> =
            scored.iter().map(|scored| scored.article_id).collect();
        let article_to_rank = articles_by_popularity
            .iter()
            .enumerate()
            .map(|(rank, article_id)| (*article_id, rank))
            .collect();

        PopularityRanking {
            articles_by_popularity,
            article_to_rank,
        }
    }

    pub fn articles(&self) -> &[ArticleId] {
        &self.articles_by_popularity
    }

    /// Zero based position of the article in the ranking.
    pub fn rank_of(&self, article_id: &ArticleId) -> Option<usize> {
        self.article_to_rank.get(article_id).copied()
    }

    pub fn len(&self) -> usize {
        self.articles_by_popularity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles_by_popularity.is_empty()
    }
}
