//! Achievement evaluation.
//!
//! [`evaluate`] is pure: given current counts and the kinds a user already
//! holds, it returns the kinds that newly qualify. Awarding happens in the
//! facade through [`ActivityStore::insert_grant_if_absent`], whose
//! uniqueness on `(user, kind)` is the only thing that prevents a double
//! award. The pre-read of granted kinds merely skips pointless inserts;
//! a losing concurrent insert reports `false` and is dropped without
//! awarding anything.
//!
//! [`ActivityStore::insert_grant_if_absent`]: crate::storage::ActivityStore::insert_grant_if_absent

pub mod catalog;

pub use catalog::{AchievementKind, Counter, CATALOG_VERSION};

use serde::{Deserialize, Serialize};

use crate::reputation::ActivityCounts;
use crate::types::{Timestamp, UserId};

/// A stored achievement award. Unique per `(user_id, kind)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementGrant {
    /// Who earned it.
    pub user_id: UserId,

    /// Which achievement.
    pub kind: AchievementKind,

    /// When it was awarded.
    pub awarded_at: Timestamp,

    /// Bonus points recorded at award time.
    pub points: u64,
}

impl AchievementGrant {
    /// Builds a grant of `kind` at its catalog point value.
    pub fn new(user_id: UserId, kind: AchievementKind, awarded_at: Timestamp) -> Self {
        Self {
            user_id,
            kind,
            awarded_at,
            points: kind.points(),
        }
    }
}

/// Returns the kinds that qualify under `counts` and are not in `already_granted`.
///
/// Output follows catalog order and never contains a kind from `already_granted`.
pub fn evaluate(counts: &ActivityCounts, already_granted: &[AchievementKind]) -> Vec<AchievementKind> {
    AchievementKind::ALL
        .iter()
        .copied()
        .filter(|kind| kind.qualifies(counts) && !already_granted.contains(kind))
        .collect()
}

/// Sums the bonus points of `grants`.
pub fn bonus_points(grants: &[AchievementGrant]) -> u64 {
    grants
        .iter()
        .fold(0u64, |acc, grant| acc.saturating_add(grant.points))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_five_submissions_unlock_two_kinds() {
        let counts = ActivityCounts {
            submissions: 5,
            ..Default::default()
        };
        let kinds = evaluate(&counts, &[]);
        assert_eq!(
            kinds,
            vec![
                AchievementKind::FIRST_SUBMISSION,
                AchievementKind::SUBMISSION_STREAK_5
            ]
        );
        let points: u64 = kinds.iter().map(|k| k.points()).sum();
        assert_eq!(
            points,
            AchievementKind::FIRST_SUBMISSION.points() + AchievementKind::SUBMISSION_STREAK_5.points()
        );
    }

    #[test]
    fn test_already_granted_is_excluded() {
        let counts = ActivityCounts {
            submissions: 5,
            ..Default::default()
        };
        let kinds = evaluate(&counts, &[AchievementKind::FIRST_SUBMISSION]);
        assert_eq!(kinds, vec![AchievementKind::SUBMISSION_STREAK_5]);
    }

    #[test]
    fn test_zero_activity_unlocks_nothing() {
        assert!(evaluate(&ActivityCounts::default(), &[]).is_empty());
    }

    #[test]
    fn test_never_returns_granted_kind() {
        let counts = ActivityCounts {
            submissions: 100,
            votes_cast: 1000,
            comments: 1000,
            collections: 100,
            votes_received: 10_000,
        };
        let all = evaluate(&counts, &[]);
        assert_eq!(all.len(), AchievementKind::ALL.len());
        assert!(evaluate(&counts, &all).is_empty());
    }

    #[test]
    fn test_bonus_points() {
        let user = UserId::new("u");
        let grants = vec![
            AchievementGrant::new(user.clone(), AchievementKind::FIRST_VOTE, Timestamp::now()),
            AchievementGrant::new(user, AchievementKind::FIRST_COMMENT, Timestamp::now()),
        ];
        assert_eq!(bonus_points(&grants), 10);
        assert_eq!(bonus_points(&[]), 0);
    }
}
