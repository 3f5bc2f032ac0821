use std::time::Instant;

use hashbrown::{HashMap, HashSet};
use tracing::info;

use crate::io::{ArticleId, Interaction, UserId};
use crate::userknn::popularity::PopularityRanking;

/// Read-only index over the cleaned interaction log.
///
/// The binary user-by-article matrix is kept as two sparse adjacency maps, one
/// per axis, so memory grows with the number of interactions rather than with
/// users times articles. Repeated views of the same article by the same user
/// collapse into a single entry.
pub struct InteractionStore {
    user_to_articles: HashMap<UserId, HashSet<ArticleId>>,
    article_to_users: HashMap<ArticleId, HashSet<UserId>>,
    popularity: PopularityRanking,
    no_articles: HashSet<ArticleId>,
    no_users: HashSet<UserId>,
}

impl InteractionStore {
    /// Builds the indices in a single pass over `interactions`. Every id in
    /// `catalog_article_ids` becomes part of the article universe, also when
    /// nobody viewed it.
    pub fn new<'a>(
        interactions: &[Interaction],
        catalog_article_ids: impl IntoIterator<Item = &'a ArticleId>,
    ) -> Self {
        let start_time = Instant::now();
        let mut user_to_articles: HashMap<UserId, HashSet<ArticleId>> = HashMap::new();
        let mut article_to_users: HashMap<ArticleId, HashSet<UserId>> = HashMap::new();

        for interaction in interactions.iter() {
            user_to_articles
                .entry(interaction.user_id)
                .or_insert_with(HashSet::new)
                .insert(interaction.article_id);
            article_to_users
                .entry(interaction.article_id)
                .or_insert_with(HashSet::new)
                .insert(interaction.user_id);
        }

        let popularity = PopularityRanking::new(&article_to_users, catalog_article_ids);

        info!(
            qty_users = user_to_articles.len(),
            qty_articles = popularity.len(),
            elapsed_micros = start_time.elapsed().as_micros() as u64,
            "prepared interaction indices"
        );

        InteractionStore {
            user_to_articles,
            article_to_users,
            popularity,
            no_articles: HashSet::new(),
            no_users: HashSet::new(),
        }
    }

    /// Articles the user viewed; empty for unknown users.
    pub fn views_of(&self, user_id: &UserId) -> &HashSet<ArticleId> {
        self.user_to_articles
            .get(user_id)
            .unwrap_or(&self.no_articles)
    }

    /// Users that viewed the article; empty for articles nobody viewed.
    pub fn viewers_of(&self, article_id: &ArticleId) -> &HashSet<UserId> {
        self.article_to_users
            .get(article_id)
            .unwrap_or(&self.no_users)
    }

    pub fn is_known_user(&self, user_id: &UserId) -> bool {
        self.user_to_articles.contains_key(user_id)
    }

    /// Number of distinct articles the user viewed.
    pub fn view_count(&self, user_id: &UserId) -> usize {
        self.views_of(user_id).len()
    }

    pub fn all_articles_by_popularity(&self) -> &[ArticleId] {
        self.popularity.articles()
    }

    pub fn popularity_rank(&self, article_id: &ArticleId) -> Option<usize> {
        self.popularity.rank_of(article_id)
    }

    /// Known users in ascending id order.
    pub fn user_ids(&self) -> Vec<UserId> {
        let mut user_ids: Vec<UserId> = self.user_to_articles.keys().copied().collect();
        user_ids.sort_unstable();
        user_ids
    }

    pub fn num_users(&self) -> usize {
        self.user_to_articles.len()
    }

    /// Size of the article universe, viewed or not.
    pub fn num_articles(&self) -> usize {
        self.popularity.len()
    }
}
