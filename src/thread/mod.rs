//! Comment thread reconstruction.
//!
//! Turns the flat comment facts of one item into a forest: roots are
//! top-level comments, each node's `replies` are its direct replies, and
//! every level is ordered by creation time (ascending, ties by ID).
//!
//! The build is arena-and-index: one pass indexes comments by ID, a second
//! links each comment to its parent's child list, and the nested nodes are
//! assembled bottom-up from the arena. Building, cloning, comparing and
//! dropping a [`ThreadNode`] all walk an explicit stack, so reply depth is
//! unbounded here. `Debug` and serde output still nest per level; any depth
//! cap for rendering is a presentation concern.
//!
//! A comment whose parent is not among the item's comments, or whose
//! parent is not strictly earlier in creation order, is promoted to a root
//! rather than dropped. Every input comment appears exactly once.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::comment::CommentFact;
use crate::types::CommentId;

/// A comment and its direct replies.
#[derive(Debug, Eq, Serialize, Deserialize)]
pub struct ThreadNode {
    /// The comment itself.
    pub comment: CommentFact,
    /// Direct replies, oldest first.
    pub replies: Vec<ThreadNode>,
}

impl Drop for ThreadNode {
    fn drop(&mut self) {
        // Detach descendants first so each node drops with no replies left.
        let mut pending = std::mem::take(&mut self.replies);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.replies);
        }
    }
}

impl Clone for ThreadNode {
    fn clone(&self) -> Self {
        // Pre-order walk below the root; in reverse, every subtree finishes
        // before its parent needs it.
        let mut order: Vec<&ThreadNode> = Vec::new();
        let mut stack: Vec<&ThreadNode> = self.replies.iter().collect();
        while let Some(node) = stack.pop() {
            order.push(node);
            stack.extend(node.replies.iter());
        }

        let mut finished: Vec<ThreadNode> = Vec::with_capacity(order.len());
        for node in order.into_iter().rev() {
            let replies = finished.split_off(finished.len() - node.replies.len());
            finished.push(ThreadNode {
                comment: node.comment.clone(),
                replies,
            });
        }

        // Only the root's direct replies are left, in order.
        ThreadNode {
            comment: self.comment.clone(),
            replies: finished,
        }
    }
}

impl PartialEq for ThreadNode {
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(self, other)];
        while let Some((a, b)) = stack.pop() {
            if a.comment != b.comment || a.replies.len() != b.replies.len() {
                return false;
            }
            stack.extend(a.replies.iter().zip(b.replies.iter()));
        }
        true
    }
}

impl ThreadNode {
    /// Number of comments in this subtree, including this one.
    pub fn subtree_size(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.replies.iter());
        }
        count
    }
}

/// Counts every node in a forest.
pub fn forest_size(forest: &[ThreadNode]) -> usize {
    forest.iter().map(ThreadNode::subtree_size).sum()
}

/// Builds the reply forest for one item's comments.
///
/// Input order does not matter; comments are sorted by `(timestamp, id)`.
pub fn build_thread(mut comments: Vec<CommentFact>) -> Vec<ThreadNode> {
    comments.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));

    let index: HashMap<CommentId, usize> = comments
        .iter()
        .enumerate()
        .map(|(pos, comment)| (comment.id, pos))
        .collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); comments.len()];
    let mut roots: Vec<usize> = Vec::new();

    for (pos, comment) in comments.iter().enumerate() {
        let parent = comment
            .parent_id
            .map(|parent_id| (parent_id, index.get(&parent_id).copied()));

        match parent {
            None => roots.push(pos),
            // Parents sort strictly earlier; anything else would allow a cycle.
            Some((_, Some(parent_pos))) if parent_pos < pos => children[parent_pos].push(pos),
            Some((parent_id, _)) => {
                warn!(
                    comment_id = %comment.id,
                    parent_id = %parent_id,
                    "Comment parent missing or out of order, promoting to root"
                );
                roots.push(pos);
            }
        }
    }

    // Children always sit at higher positions than their parent, so walking
    // the arena backwards finishes every subtree before its parent needs it.
    let mut slots: Vec<Option<ThreadNode>> = Vec::with_capacity(comments.len());
    slots.resize_with(comments.len(), || None);
    let mut arena: Vec<Option<CommentFact>> = comments.into_iter().map(Some).collect();

    for pos in (0..arena.len()).rev() {
        let Some(comment) = arena[pos].take() else {
            continue;
        };
        let replies = children[pos]
            .iter()
            .filter_map(|&child| slots[child].take())
            .collect();
        slots[pos] = Some(ThreadNode { comment, replies });
    }

    roots
        .into_iter()
        .filter_map(|pos| slots[pos].take())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ItemId, Timestamp, UserId};

    fn comment(item: ItemId, at: i64, parent: Option<CommentId>) -> CommentFact {
        CommentFact {
            id: CommentId::new(),
            item_id: item,
            author_id: UserId::new("author"),
            parent_id: parent,
            body: format!("comment at {}", at),
            timestamp: Timestamp::from_millis(at),
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(build_thread(vec![]).is_empty());
    }

    #[test]
    fn test_nested_replies_in_creation_order() {
        let item = ItemId::new();
        let root = comment(item, 1, None);
        let reply_late = comment(item, 5, Some(root.id));
        let reply_early = comment(item, 3, Some(root.id));
        let nested = comment(item, 4, Some(reply_early.id));
        let second_root = comment(item, 2, None);

        let forest = build_thread(vec![
            nested.clone(),
            reply_late.clone(),
            second_root.clone(),
            root.clone(),
            reply_early.clone(),
        ]);

        assert_eq!(forest.len(), 2);
        assert_eq!(forest[0].comment.id, root.id);
        assert_eq!(forest[1].comment.id, second_root.id);

        let replies = &forest[0].replies;
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0].comment.id, reply_early.id);
        assert_eq!(replies[1].comment.id, reply_late.id);
        assert_eq!(replies[0].replies[0].comment.id, nested.id);
        assert_eq!(forest_size(&forest), 5);
    }

    #[test]
    fn test_dangling_parent_becomes_root() {
        let item = ItemId::new();
        let orphan = comment(item, 2, Some(CommentId::new()));
        let root = comment(item, 1, None);

        let forest = build_thread(vec![orphan.clone(), root.clone()]);
        assert_eq!(forest.len(), 2);
        assert_eq!(forest[0].comment.id, root.id);
        assert_eq!(forest[1].comment.id, orphan.id);
    }

    #[test]
    fn test_parent_newer_than_child_becomes_root() {
        let item = ItemId::new();
        let mut a = comment(item, 10, None);
        let mut b = comment(item, 20, None);
        // Corrupt data: a and b name each other as parent.
        a.parent_id = Some(b.id);
        b.parent_id = Some(a.id);

        let forest = build_thread(vec![a.clone(), b.clone()]);
        assert_eq!(forest_size(&forest), 2);
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].comment.id, a.id);
        assert_eq!(forest[0].replies[0].comment.id, b.id);
    }

    #[test]
    fn test_self_parent_becomes_root() {
        let item = ItemId::new();
        let mut c = comment(item, 1, None);
        c.parent_id = Some(c.id);
        let forest = build_thread(vec![c.clone()]);
        assert_eq!(forest.len(), 1);
        assert!(forest[0].replies.is_empty());
    }

    #[test]
    fn test_deep_chain_does_not_recurse() {
        let item = ItemId::new();
        let mut comments = Vec::new();
        let mut parent = None;
        for at in 0..5_000 {
            let c = comment(item, at, parent);
            parent = Some(c.id);
            comments.push(c);
        }

        let forest = build_thread(comments);
        assert_eq!(forest.len(), 1);
        assert_eq!(forest_size(&forest), 5_000);
    }

    fn chain(item: ItemId, depth: i64) -> Vec<CommentFact> {
        let mut comments = Vec::with_capacity(depth as usize);
        let mut parent = None;
        for at in 0..depth {
            let c = comment(item, at, parent);
            parent = Some(c.id);
            comments.push(c);
        }
        comments
    }

    #[test]
    fn test_very_deep_chain_drops_without_overflow() {
        let forest = build_thread(chain(ItemId::new(), 200_000));
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].subtree_size(), 200_000);
        drop(forest);
    }

    #[test]
    fn test_very_deep_chain_clone_and_compare() {
        let forest = build_thread(chain(ItemId::new(), 200_000));
        let copy = forest.clone();
        assert_eq!(copy, forest);
        assert_eq!(forest_size(&copy), 200_000);
    }

    #[test]
    fn test_clone_keeps_reply_order() {
        let item = ItemId::new();
        let root = comment(item, 1, None);
        let first = comment(item, 2, Some(root.id));
        let second = comment(item, 3, Some(root.id));
        let nested = comment(item, 4, Some(first.id));
        let forest = build_thread(vec![second.clone(), nested.clone(), root, first.clone()]);

        let copy = forest[0].clone();
        assert_eq!(copy, forest[0]);
        assert_eq!(copy.replies[0].comment.id, first.id);
        assert_eq!(copy.replies[1].comment.id, second.id);
        assert_eq!(copy.replies[0].replies[0].comment.id, nested.id);

        let mut changed = copy.clone();
        changed.replies[0].replies[0].comment.body = "edited".to_string();
        assert_ne!(changed, copy);
    }
}
