//! Integration tests for comment thread reconstruction.
//!
//! These tests verify that:
//! - Replies nest under their parents in chronological order
//! - Stored comments with a dangling parent surface as roots
//! - Every stored comment appears exactly once in the forest
//! - Threads serialize for rendering

use engagedb::thread::{build_thread, forest_size};
use engagedb::{
    CommentFact, CommentId, Config, EngageDB, ItemId, NewComment, NewItem, ThreadNode, Timestamp,
    UserId, MILLIS_PER_HOUR,
};
use proptest::prelude::*;
use tempfile::{tempdir, TempDir};

// ============================================================================
// Helpers
// ============================================================================

fn open_db() -> (EngageDB, TempDir, UserId, ItemId) {
    let dir = tempdir().unwrap();
    let db = EngageDB::open(dir.path().join("test.db"), Config::default()).unwrap();
    let author = UserId::new("author");
    db.register_user(author.clone(), "Author").unwrap();
    let item = db
        .submit_item(NewItem {
            owner_id: author.clone(),
            name: "tool".to_string(),
            ..Default::default()
        })
        .unwrap();
    (db, dir, author, item)
}

fn post(
    db: &EngageDB,
    author: &UserId,
    item: ItemId,
    parent: Option<CommentId>,
    body: &str,
    at: Timestamp,
) -> CommentId {
    db.add_comment(NewComment {
        item_id: item,
        author_id: author.clone(),
        parent_id: parent,
        body: body.to_string(),
        timestamp: Some(at),
    })
    .unwrap()
}

fn bodies(nodes: &[ThreadNode]) -> Vec<&str> {
    nodes.iter().map(|n| n.comment.body.as_str()).collect()
}

// ============================================================================
// Thread shape
// ============================================================================

#[test]
fn test_nested_replies() {
    let (db, _dir, author, item) = open_db();
    let t0 = Timestamp::now().minus_hours(10);
    let at = |hours: i64| Timestamp::from_millis(t0.as_millis() + hours * MILLIS_PER_HOUR);

    let a = post(&db, &author, item, None, "a", at(0));
    let b = post(&db, &author, item, None, "b", at(1));
    let a2 = post(&db, &author, item, Some(a), "a2", at(3));
    post(&db, &author, item, Some(a), "a1", at(2));
    post(&db, &author, item, Some(a2), "a2x", at(4));
    post(&db, &author, item, Some(b), "b1", at(5));

    let forest = db.build_thread(item).unwrap();
    assert_eq!(bodies(&forest), vec!["a", "b"]);
    assert_eq!(bodies(&forest[0].replies), vec!["a1", "a2"]);
    assert_eq!(bodies(&forest[0].replies[1].replies), vec!["a2x"]);
    assert_eq!(bodies(&forest[1].replies), vec!["b1"]);
    assert_eq!(forest_size(&forest), 6);
    assert_eq!(db.get_item(item).unwrap().unwrap().comment_count, 6);

    db.close().unwrap();
}

#[test]
fn test_empty_thread() {
    let (db, _dir, _author, item) = open_db();
    assert!(db.build_thread(item).unwrap().is_empty());
}

#[test]
fn test_unknown_item_is_not_found() {
    let (db, _dir, _author, _item) = open_db();
    assert!(db.build_thread(ItemId::new()).unwrap_err().is_not_found());
}

#[test]
fn test_reply_must_not_predate_parent() {
    let (db, _dir, author, item) = open_db();
    let now = Timestamp::now();
    let parent = post(&db, &author, item, None, "parent", now);

    let err = db
        .add_comment(NewComment {
            item_id: item,
            author_id: author.clone(),
            parent_id: Some(parent),
            body: "from the past".to_string(),
            timestamp: Some(now.minus_hours(1)),
        })
        .unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn test_parent_on_other_item_rejected() {
    let (db, _dir, author, item) = open_db();
    let other = db
        .submit_item(NewItem {
            owner_id: author.clone(),
            name: "other".to_string(),
            ..Default::default()
        })
        .unwrap();
    let parent = post(&db, &author, other, None, "elsewhere", Timestamp::now());

    let err = db
        .add_comment(NewComment {
            item_id: item,
            author_id: author.clone(),
            parent_id: Some(parent),
            body: "cross-thread".to_string(),
            timestamp: None,
        })
        .unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn test_dangling_parent_becomes_root() {
    let (db, _dir, author, item) = open_db();
    let now = Timestamp::now();
    let root = post(&db, &author, item, None, "root", now.minus_hours(2));

    // Written directly to storage; the facade would reject it.
    db.storage_for_test()
        .insert_comment(&CommentFact {
            id: CommentId::new(),
            item_id: item,
            author_id: author.clone(),
            parent_id: Some(CommentId::new()),
            body: "orphan".to_string(),
            timestamp: now.minus_hours(1),
        })
        .unwrap();

    let forest = db.build_thread(item).unwrap();
    assert_eq!(bodies(&forest), vec!["root", "orphan"]);
    assert!(forest.iter().all(|n| n.replies.is_empty()));
    assert!(forest.iter().any(|n| n.comment.id == root));
}

// ============================================================================
// Serialization
// ============================================================================

#[test]
fn test_thread_serializes_to_json() {
    let (db, _dir, author, item) = open_db();
    let now = Timestamp::now();
    let root = post(&db, &author, item, None, "root", now.minus_hours(1));
    post(&db, &author, item, Some(root), "reply", now);

    let forest = db.build_thread(item).unwrap();
    let json = serde_json::to_value(&forest).unwrap();

    assert_eq!(json[0]["comment"]["body"], "root");
    assert_eq!(json[0]["replies"][0]["comment"]["body"], "reply");
    assert_eq!(json[0]["replies"][0]["replies"].as_array().unwrap().len(), 0);

    let back: Vec<ThreadNode> = serde_json::from_value(json).unwrap();
    assert_eq!(back, forest);
}

// ============================================================================
// Forest properties
// ============================================================================

/// Builds comments whose parent links point at arbitrary indices, including
/// later comments, themselves and IDs that do not exist.
fn arbitrary_comments(links: &[Option<usize>]) -> Vec<CommentFact> {
    let item = ItemId::new();
    let ids: Vec<CommentId> = links.iter().map(|_| CommentId::new()).collect();
    links
        .iter()
        .enumerate()
        .map(|(i, link)| CommentFact {
            id: ids[i],
            item_id: item,
            author_id: UserId::new("author"),
            parent_id: link.map(|p| ids.get(p).copied().unwrap_or_else(CommentId::new)),
            body: format!("c{}", i),
            timestamp: Timestamp::from_millis(i as i64 * 1_000),
        })
        .collect()
}

fn assert_children_follow_parents(node: &ThreadNode) {
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        let mut previous: Option<Timestamp> = None;
        for reply in &current.replies {
            assert!(reply.comment.timestamp >= current.comment.timestamp);
            if let Some(prev) = previous {
                assert!(reply.comment.timestamp >= prev);
            }
            previous = Some(reply.comment.timestamp);
            stack.push(reply);
        }
    }
}

proptest! {
    #[test]
    fn prop_every_comment_appears_once(
        links in prop::collection::vec(prop::option::of(0usize..80), 0..60)
    ) {
        let comments = arbitrary_comments(&links);
        let forest = build_thread(comments.clone());
        prop_assert_eq!(forest_size(&forest), comments.len());

        let mut seen: Vec<CommentId> = Vec::new();
        let mut stack: Vec<&ThreadNode> = forest.iter().collect();
        while let Some(node) = stack.pop() {
            seen.push(node.comment.id);
            stack.extend(node.replies.iter());
        }
        seen.sort();
        let mut expected: Vec<CommentId> = comments.iter().map(|c| c.id).collect();
        expected.sort();
        prop_assert_eq!(seen, expected);
    }

    #[test]
    fn prop_children_never_predate_parents(
        links in prop::collection::vec(prop::option::of(0usize..40), 0..40)
    ) {
        let forest = build_thread(arbitrary_comments(&links));
        for root in &forest {
            assert_children_follow_parents(root);
        }
    }
}
