//! Vote and engagement facts.
//!
//! A **fact** is an immutable, timestamped record of one user action.
//! Activity classifications are closed enums ([`VotePolarity`],
//! [`EngagementKind`], [`Actor`]) so an invalid classification cannot be
//! constructed.
//!
//! # Operations
//!
//! - [`cast_vote(vote)`](crate::EngageDB::cast_vote)
//! - [`remove_vote(item, voter, polarity)`](crate::EngageDB::remove_vote)
//! - [`record_view(item, actor)`](crate::EngageDB::record_view)
//! - [`record_click(item, actor)`](crate::EngageDB::record_click)

pub mod types;

pub use types::{Actor, EngagementEvent, EngagementKind, NewVote, VoteFact, VotePolarity};
