#[macro_use]
extern crate bencher;

use bencher::Bencher;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use coview::io::{ArticleId, Interaction, UserId};
use coview::userknn::interaction_store::InteractionStore;
use coview::userknn::recommend;
use coview::userknn::similarity::NeighborhoodIndex;

benchmark_group!(
    benches,
    bench_find_all_neighbors,
    bench_find_top_k_neighbors,
    bench_recommend
);
benchmark_main!(benches);

const NUM_USERS: UserId = 5_000;
const NUM_ARTICLES: ArticleId = 1_000;
const MAX_VIEWS_PER_USER: usize = 40;
const TARGET_USER: UserId = 1;

fn synthetic_store() -> InteractionStore {
    let mut rng = Pcg64::seed_from_u64(42);
    let mut interactions = Vec::new();
    for user_id in 1..=NUM_USERS {
        let qty_views = rng.gen_range(1..MAX_VIEWS_PER_USER);
        for _ in 0..qty_views {
            // squared draw skews views towards low article ids, like real traffic
            let draw: f64 = rng.gen();
            let article_id = (draw * draw * NUM_ARTICLES as f64) as ArticleId;
            interactions.push(Interaction::new(user_id, article_id));
        }
    }
    let universe: Vec<ArticleId> = (0..NUM_ARTICLES).collect();
    InteractionStore::new(&interactions, universe.iter())
}

fn bench_find_all_neighbors(bench: &mut Bencher) {
    let store = synthetic_store();
    bench.iter(|| {
        bencher::black_box(store.find_neighbors(&TARGET_USER, None).ok());
    });
}

fn bench_find_top_k_neighbors(bench: &mut Bencher) {
    let store = synthetic_store();
    bench.iter(|| {
        bencher::black_box(store.find_neighbors(&TARGET_USER, Some(50)).ok());
    });
}

fn bench_recommend(bench: &mut Bencher) {
    let store = synthetic_store();
    bench.iter(|| {
        bencher::black_box(recommend(&store, TARGET_USER, 10, Some(50)).ok());
    });
}
