//! Core identifiers and timestamps for EngageDB.
//!
//! Entity IDs created by the engine (items, comments, collections,
//! engagement events) are UUID v7 so that byte order follows creation order.
//! Users are identified by an opaque string supplied by the host's auth layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Defines a UUID v7 backed identifier with storage helpers.
macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new time-ordered identifier (UUID v7).
            #[inline]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates a nil (all zeros) identifier, useful as a sentinel in tests.
            #[inline]
            pub fn nil() -> Self {
                Self(Uuid::nil())
            }

            /// Returns the raw UUID bytes for storage keys.
            #[inline]
            pub fn as_bytes(&self) -> &[u8; 16] {
                self.0.as_bytes()
            }

            /// Rebuilds the identifier from raw key bytes.
            #[inline]
            pub fn from_bytes(bytes: [u8; 16]) -> Self {
                Self(Uuid::from_bytes(bytes))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::nil()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id!(
    /// Identifier of a submitted item (a tool listed on the site).
    ItemId
);

uuid_id!(
    /// Identifier of a single comment fact.
    CommentId
);

uuid_id!(
    /// Identifier of a user-curated collection of items.
    CollectionId
);

uuid_id!(
    /// Identifier of an append-only view/click event.
    EventId
);

/// Opaque user identifier.
///
/// EngageDB doesn't handle authentication; the host passes whatever
/// stable ID its session layer resolved.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    /// Creates a new UserId from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the user ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Milliseconds in one hour.
pub const MILLIS_PER_HOUR: i64 = 60 * 60 * 1000;

/// Unix timestamp in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    ///
    /// A clock set before the Unix epoch yields the epoch instead of panicking.
    #[inline]
    pub fn now() -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self(duration.as_millis() as i64)
    }

    /// Creates a timestamp from Unix milliseconds.
    #[inline]
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the timestamp as Unix milliseconds.
    #[inline]
    pub const fn as_millis(&self) -> i64 {
        self.0
    }

    /// Returns big-endian bytes for storage (lexicographic = chronological).
    #[inline]
    pub fn to_be_bytes(&self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    /// Returns the timestamp `hours` before this one.
    #[inline]
    pub fn minus_hours(&self, hours: i64) -> Self {
        Self(self.0.saturating_sub(hours.saturating_mul(MILLIS_PER_HOUR)))
    }

    /// Fractional hours elapsed from `earlier` to `self`.
    ///
    /// Clamped to `0.0` when `earlier` lies in the future (clock skew).
    #[inline]
    pub fn hours_since(&self, earlier: Timestamp) -> f64 {
        let delta = self.0.saturating_sub(earlier.0);
        if delta <= 0 {
            0.0
        } else {
            delta as f64 / MILLIS_PER_HOUR as f64
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
