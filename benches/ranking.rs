//! Benchmarks for EngageDB listing, reputation and thread operations.
//!
//! Run with: `cargo bench`
//!
//! Performance targets:
//! - Trending listing over 500 items < 50ms
//! - Reputation recompute for an active user < 20ms
//! - Thread build for 1K comments < 5ms (in memory)

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use engagedb::thread::build_thread;
use engagedb::{
    CommentFact, CommentId, Config, EngageDB, ItemId, NewItem, NewVote, RankQuery, SortMode,
    Timestamp, UserId,
};
use tempfile::{tempdir, TempDir};

/// Opens a database seeded with `items` items and a few votes on each.
fn seeded_db(items: usize) -> (EngageDB, TempDir, UserId) {
    let dir = tempdir().unwrap();
    let db = EngageDB::open(dir.path().join("bench.db"), Config::default()).unwrap();
    let now = Timestamp::now();

    let maker = UserId::new("maker");
    db.register_user(maker.clone(), "Maker").unwrap();
    let voters: Vec<UserId> = (0..5)
        .map(|i| {
            let id = UserId::new(format!("voter-{}", i));
            db.register_user(id.clone(), "Voter").unwrap();
            id
        })
        .collect();

    for i in 0..items {
        let item = db
            .submit_item(NewItem {
                owner_id: maker.clone(),
                name: format!("tool-{}", i),
                created_at: Some(now.minus_hours((i % 300) as i64)),
                ..Default::default()
            })
            .unwrap();
        for voter in voters.iter().take(i % voters.len() + 1) {
            db.cast_vote(NewVote::up(item, voter.clone()).at(now.minus_hours((i % 48) as i64)))
                .unwrap();
        }
    }

    (db, dir, maker)
}

/// Benchmark a trending listing.
fn bench_rank_trending(c: &mut Criterion) {
    let (db, _dir, _maker) = seeded_db(500);
    let now = Timestamp::now();

    c.bench_function("rank_trending_500", |b| {
        b.iter(|| {
            let listing = db
                .rank_at(black_box(RankQuery::new(SortMode::Trending)), now)
                .unwrap();
            black_box(listing);
        });
    });
}

/// Benchmark a field sort, which skips fact reads.
fn bench_rank_newest(c: &mut Criterion) {
    let (db, _dir, _maker) = seeded_db(500);
    let now = Timestamp::now();

    c.bench_function("rank_newest_500", |b| {
        b.iter(|| {
            let listing = db
                .rank_at(black_box(RankQuery::new(SortMode::Newest)), now)
                .unwrap();
            black_box(listing);
        });
    });
}

/// Benchmark reputation recomputation once every achievement is settled.
fn bench_recompute_reputation(c: &mut Criterion) {
    let (db, _dir, maker) = seeded_db(100);
    db.recompute_reputation(&maker, None).unwrap();

    c.bench_function("recompute_reputation_100_items", |b| {
        b.iter(|| {
            black_box(db.recompute_reputation(&maker, None).unwrap());
        });
    });
}

/// Benchmark in-memory thread reconstruction.
fn bench_build_thread(c: &mut Criterion) {
    let item = ItemId::new();
    let ids: Vec<CommentId> = (0..1_000).map(|_| CommentId::new()).collect();
    let comments: Vec<CommentFact> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| CommentFact {
            id: *id,
            item_id: item,
            author_id: UserId::new("author"),
            // Every third comment is a root, the rest reply to a recent one
            parent_id: if i % 3 == 0 { None } else { Some(ids[i / 2]) },
            body: format!("comment {}", i),
            timestamp: Timestamp::from_millis(i as i64),
        })
        .collect();

    c.bench_function("build_thread_1k", |b| {
        b.iter(|| black_box(build_thread(comments.clone())));
    });
}

criterion_group!(
    benches,
    bench_rank_trending,
    bench_rank_newest,
    bench_recompute_reputation,
    bench_build_thread
);
criterion_main!(benches);
