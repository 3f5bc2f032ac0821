use std::cmp::Ordering;

use hashbrown::HashSet;
use tracing::debug;

use crate::catalog::Catalog;
use crate::datasetstats::{determine_dataset_statistics, DatasetStats};
use crate::error::{RecommendError, Result};
use crate::io::{ArticleId, Dataset, UserId};
use crate::userknn::interaction_store::InteractionStore;
use crate::userknn::similarity::NeighborhoodIndex;

pub mod interaction_store;
pub mod popularity;
pub mod similarity;

/// A neighbor of the target user.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct UserScore {
    pub id: UserId,
    /// Number of articles co-viewed with the target user.
    pub score: usize,
    /// Number of distinct articles this neighbor viewed.
    pub qty_views: usize,
}

impl UserScore {
    pub fn new(id: UserId, score: usize, qty_views: usize) -> Self {
        UserScore {
            id,
            score,
            qty_views,
        }
    }
}

impl Ord for UserScore {
    fn cmp(&self, other: &Self) -> Ordering {
        // strongest neighbor first: highest score, then most views, then lowest id
        other
            .score
            .cmp(&self.score)
            .then_with(|| other.qty_views.cmp(&self.qty_views))
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for UserScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Source {
    Neighbor(UserId),
    Popularity,
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct Recommendation {
    pub article_id: ArticleId,
    pub source: Source,
}

impl Recommendation {
    fn new(article_id: ArticleId, source: Source) -> Self {
        Recommendation { article_id, source }
    }
}

/// Recommends `how_many` articles for `user_id`.
///
/// Users without history get the head of the popularity ranking. Known users
/// get the unseen articles of their neighbors, strongest neighbor first and
/// within a neighbor by global popularity, topped up from the popularity
/// ranking once the neighbors run out. The result never contains duplicates
/// nor articles the user already viewed, and is only shorter than `how_many`
/// when the article universe minus the user's history is.
pub fn recommend<I: NeighborhoodIndex>(
    index: &I,
    user_id: UserId,
    how_many: usize,
    neighborhood_size_k: Option<usize>,
) -> Result<Vec<Recommendation>> {
    if how_many == 0 {
        return Err(RecommendError::InvalidArgument(
            "the number of recommendations must be at least 1".to_string(),
        ));
    }

    if !index.is_known_user(&user_id) {
        return Ok(index
            .articles_by_popularity()
            .iter()
            .take(how_many)
            .map(|article_id| Recommendation::new(*article_id, Source::Popularity))
            .collect());
    }

    let seen = index.views_of(&user_id);
    let mut selected: HashSet<ArticleId> = HashSet::with_capacity(how_many);
    let mut recommendations: Vec<Recommendation> = Vec::with_capacity(how_many);

    let neighbors = index.find_neighbors(&user_id, neighborhood_size_k)?;
    'neighbor_loop: for neighbor in neighbors.iter() {
        if recommendations.len() >= how_many {
            break;
        }
        let mut candidates: Vec<ArticleId> = index
            .views_of(&neighbor.id)
            .iter()
            .filter(|article_id| !seen.contains(*article_id) && !selected.contains(*article_id))
            .copied()
            .collect();
        candidates.sort_unstable_by_key(|article_id| {
            (
                index.popularity_rank(article_id).unwrap_or(usize::MAX),
                *article_id,
            )
        });

        for article_id in candidates.into_iter() {
            if recommendations.len() >= how_many {
                break 'neighbor_loop;
            }
            selected.insert(article_id);
            recommendations.push(Recommendation::new(article_id, Source::Neighbor(neighbor.id)));
        }
    }

    let qty_from_neighbors = recommendations.len();
    if recommendations.len() < how_many {
        for article_id in index.articles_by_popularity().iter() {
            if recommendations.len() >= how_many {
                break;
            }
            if !seen.contains(article_id) && !selected.contains(article_id) {
                selected.insert(*article_id);
                recommendations.push(Recommendation::new(*article_id, Source::Popularity));
            }
        }
    }

    debug!(
        user_id,
        qty_neighbors = neighbors.len(),
        qty_from_neighbors,
        qty_from_popularity = recommendations.len() - qty_from_neighbors,
        "recommended for known user"
    );

    Ok(recommendations)
}

/// The loaded dataset with every derived index, ready to serve requests.
///
/// Nothing is mutated after construction, so a single instance can be shared
/// between threads. Reloading the data means building a new `Recommender`.
pub struct Recommender {
    store: InteractionStore,
    catalog: Catalog,
    stats: DatasetStats,
    neighborhood_size_k: Option<usize>,
}

impl Recommender {
    pub fn new(dataset: Dataset, neighborhood_size_k: Option<usize>) -> Self {
        let stats = determine_dataset_statistics(
            &dataset.descriptive_name,
            &dataset.interactions,
            dataset.catalog.len(),
        );
        let store = InteractionStore::new(&dataset.interactions, dataset.catalog.article_ids());

        Recommender {
            store,
            catalog: dataset.catalog,
            stats,
            neighborhood_size_k,
        }
    }

    pub fn recommend(&self, user_id: UserId, how_many: usize) -> Result<Vec<ArticleId>> {
        Ok(self
            .recommend_with_sources(user_id, how_many)?
            .into_iter()
            .map(|recommendation| recommendation.article_id)
            .collect())
    }

    pub fn recommend_with_sources(
        &self,
        user_id: UserId,
        how_many: usize,
    ) -> Result<Vec<Recommendation>> {
        recommend(&self.store, user_id, how_many, self.neighborhood_size_k)
    }

    /// Like `recommend`, joined with the article titles.
    pub fn recommend_titled(
        &self,
        user_id: UserId,
        how_many: usize,
    ) -> Result<Vec<(ArticleId, &str)>> {
        Ok(self
            .recommend(user_id, how_many)?
            .into_iter()
            .map(|article_id| (article_id, self.catalog.title(&article_id).unwrap_or_default()))
            .collect())
    }

    pub fn store(&self) -> &InteractionStore {
        &self.store
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn stats(&self) -> &DatasetStats {
        &self.stats
    }
}

#[cfg(test)]
mod recommend_test {
    use super::*;
    use crate::io::Interaction;
    use std::collections::BinaryHeap;

    const A: ArticleId = 1;
    const B: ArticleId = 2;
    const C: ArticleId = 3;

    fn store(pairs: &[(UserId, ArticleId)], catalog: &[ArticleId]) -> InteractionStore {
        let interactions: Vec<Interaction> = pairs
            .iter()
            .map(|(user_id, article_id)| Interaction::new(*user_id, *article_id))
            .collect();
        InteractionStore::new(&interactions, catalog)
    }

    fn example_store() -> InteractionStore {
        store(&[(1, A), (1, B), (2, A), (2, C), (3, A), (3, B), (3, C)], &[])
    }

    fn article_ids(recommendations: &[Recommendation]) -> Vec<ArticleId> {
        recommendations
            .iter()
            .map(|recommendation| recommendation.article_id)
            .collect()
    }

    #[test]
    fn should_follow_worked_example() {
        let store = example_store();
        assert_eq!(&[A, B, C], store.all_articles_by_popularity());

        let cold_start = recommend(&store, 4, 2, None).unwrap();
        assert_eq!(vec![A, B], article_ids(&cold_start));

        let personalized = recommend(&store, 1, 1, None).unwrap();
        assert_eq!(vec![C], article_ids(&personalized));
        assert_eq!(Source::Neighbor(3), personalized[0].source);
    }

    #[test]
    fn should_reject_zero_count() {
        let result = recommend(&example_store(), 1, 0, None);
        assert!(matches!(result, Err(RecommendError::InvalidArgument(_))));

        let result = recommend(&example_store(), 99, 0, None);
        assert!(matches!(result, Err(RecommendError::InvalidArgument(_))));
    }

    #[test]
    fn should_return_whole_universe_when_count_exceeds_it() {
        let store = example_store();
        let cold_start = recommend(&store, 42, 10, None).unwrap();
        assert_eq!(vec![A, B, C], article_ids(&cold_start));

        // user 1 viewed A and B, only C is left
        let personalized = recommend(&store, 1, 10, None).unwrap();
        assert_eq!(vec![C], article_ids(&personalized));
    }

    #[test]
    fn should_order_neighbor_candidates_by_popularity() {
        // user 2 is the only neighbor of user 1 and viewed 20, 30 and 40
        // 40 is the most popular of those, then 30, then 20
        let store = store(
            &[
                (1, 10),
                (2, 10),
                (2, 20),
                (2, 30),
                (2, 40),
                (3, 40),
                (4, 40),
                (3, 30),
            ],
            &[],
        );
        let recommendations = recommend(&store, 1, 3, None).unwrap();
        assert_eq!(vec![40, 30, 20], article_ids(&recommendations));
    }

    #[test]
    fn should_walk_neighbors_in_similarity_order() {
        // user 3 shares two articles with user 1, user 2 shares one
        let store = store(
            &[
                (1, 10),
                (1, 11),
                (2, 10),
                (2, 50),
                (3, 10),
                (3, 11),
                (3, 60),
            ],
            &[],
        );
        let recommendations = recommend(&store, 1, 2, None).unwrap();
        assert_eq!(vec![60, 50], article_ids(&recommendations));
        assert_eq!(Source::Neighbor(3), recommendations[0].source);
        assert_eq!(Source::Neighbor(2), recommendations[1].source);
    }

    #[test]
    fn should_fill_from_popularity_when_neighbors_run_out() {
        let store = store(&[(1, 10), (2, 10), (2, 20), (3, 30), (4, 30), (5, 40)], &[99]);
        let recommendations = recommend(&store, 1, 4, None).unwrap();

        assert_eq!(vec![20, 30, 40, 99], article_ids(&recommendations));
        assert_eq!(Source::Neighbor(2), recommendations[0].source);
        assert!(recommendations[1..]
            .iter()
            .all(|recommendation| recommendation.source == Source::Popularity));
    }

    #[test]
    fn should_fall_back_to_popularity_without_overlap() {
        let store = store(&[(1, 10), (2, 20), (3, 20), (3, 30)], &[]);
        let recommendations = recommend(&store, 1, 2, None).unwrap();

        assert_eq!(vec![20, 30], article_ids(&recommendations));
        assert!(recommendations
            .iter()
            .all(|recommendation| recommendation.source == Source::Popularity));
    }

    #[test]
    fn should_respect_neighborhood_size() {
        let store = store(
            &[
                (1, 10),
                (1, 11),
                (2, 10),
                (2, 50),
                (3, 10),
                (3, 11),
                (3, 60),
            ],
            &[],
        );
        // with only the closest neighbor, 50 comes from the popularity fill
        let recommendations = recommend(&store, 1, 2, Some(1)).unwrap();
        assert_eq!(vec![60, 50], article_ids(&recommendations));
        assert_eq!(Source::Popularity, recommendations[1].source);
    }

    #[test]
    fn should_never_recommend_seen_or_duplicate_articles() {
        let mut pairs = Vec::new();
        for user_id in 1..30_u32 {
            for step in 0..(user_id % 5 + 2) {
                pairs.push((user_id, ((user_id as u64 * 7 + step as u64 * 13) % 23)));
            }
        }
        let store = store(&pairs, &[]);
        let universe = store.num_articles();

        for user_id in 1..35_u32 {
            let seen = store.views_of(&user_id).clone();
            for how_many in [1, 3, 10, 50] {
                let recommendations = article_ids(&recommend(&store, user_id, how_many, None).unwrap());
                let unique: HashSet<ArticleId> = recommendations.iter().copied().collect();
                assert_eq!(unique.len(), recommendations.len());
                assert!(recommendations.iter().all(|article_id| !seen.contains(article_id)));
                assert_eq!(
                    std::cmp::min(how_many, universe - seen.len()),
                    recommendations.len()
                );
            }
        }
    }

    #[test]
    fn should_match_popularity_prefix_for_unknown_users() {
        let store = example_store();
        for how_many in 1..=3 {
            let recommendations = recommend(&store, 1000, how_many, None).unwrap();
            assert_eq!(
                &store.all_articles_by_popularity()[..how_many],
                &article_ids(&recommendations)[..]
            );
        }
    }

    #[test]
    fn should_be_idempotent_and_independent_of_input_order() {
        let pairs = [(1, A), (1, B), (2, A), (2, C), (3, A), (3, B), (3, C), (4, C)];
        let forward = store(&pairs, &[]);
        let mut reversed_pairs = pairs.to_vec();
        reversed_pairs.reverse();
        let reversed = store(&reversed_pairs, &[]);

        for user_id in 1..=5 {
            let first = recommend(&forward, user_id, 2, None).unwrap();
            let second = recommend(&forward, user_id, 2, None).unwrap();
            let other_order = recommend(&reversed, user_id, 2, None).unwrap();
            assert_eq!(first, second);
            assert_eq!(first, other_order);
        }
        assert_eq!(
            forward.all_articles_by_popularity(),
            reversed.all_articles_by_popularity()
        );
    }

    #[test]
    fn handle_reverse_ordering_userscore() {
        let strongest = UserScore::new(7, 5, 1);
        let middle = UserScore::new(3, 2, 9);
        let weakest = UserScore::new(1, 1, 100);
        let items = vec![weakest, strongest, middle];

        let how_many = 2;
        let mut top_users: BinaryHeap<UserScore> = BinaryHeap::with_capacity(how_many);

        for userscore in items.into_iter() {
            if top_users.len() < how_many {
                top_users.push(userscore);
            } else {
                let mut bottom = top_users.peek_mut().unwrap();
                if userscore < *bottom {
                    *bottom = userscore;
                }
            }
        }
        // the weakest kept neighbor sits on top of the heap
        assert_eq!(3, top_users.pop().unwrap().id);
        assert_eq!(7, top_users.pop().unwrap().id);
    }

    #[test]
    fn should_join_recommendations_with_titles() {
        let records = vec![
            crate::io::InteractionRecord {
                user_id: 1,
                article_id: A,
                title: Some("a".to_string()),
            },
            crate::io::InteractionRecord {
                user_id: 2,
                article_id: A,
                title: None,
            },
            crate::io::InteractionRecord {
                user_id: 2,
                article_id: B,
                title: Some("b from interactions".to_string()),
            },
        ];
        let articles = vec![crate::io::ArticleRecord {
            article_id: B,
            title: "b".to_string(),
        }];
        let dataset = Dataset::from_records("unittest", records, articles).unwrap();
        let recommender = Recommender::new(dataset, None);

        assert_eq!(vec![(B, "b")], recommender.recommend_titled(1, 1).unwrap());
        assert_eq!(
            vec![(A, "a"), (B, "b")],
            recommender.recommend_titled(9, 5).unwrap()
        );
        assert_eq!(3, recommender.stats().qty_records);
    }
}
