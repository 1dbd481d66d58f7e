//! Fuzz thread reconstruction with arbitrary parent links.
//!
//! Each input byte pair is one comment: the first byte picks a parent
//! index (0xFF for a root), the second its timestamp. Links may point
//! forward, at the comment itself or past the end.

#![no_main]

use engagedb::thread::{build_thread, forest_size};
use engagedb::{CommentFact, CommentId, ItemId, Timestamp, UserId};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let item = ItemId::new();
    let pairs: Vec<(u8, u8)> = data.chunks_exact(2).map(|c| (c[0], c[1])).collect();
    let ids: Vec<CommentId> = pairs.iter().map(|_| CommentId::new()).collect();

    let comments: Vec<CommentFact> = pairs
        .iter()
        .enumerate()
        .map(|(i, (link, at))| CommentFact {
            id: ids[i],
            item_id: item,
            author_id: UserId::new("fuzz"),
            parent_id: match *link {
                0xFF => None,
                p => Some(ids.get(p as usize).copied().unwrap_or_else(CommentId::new)),
            },
            body: String::new(),
            timestamp: Timestamp::from_millis(*at as i64),
        })
        .collect();

    let expected = comments.len();
    let forest = build_thread(comments);
    assert_eq!(forest_size(&forest), expected);
});
