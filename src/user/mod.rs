//! Registered users.
//!
//! Authentication lives outside EngageDB. The host registers each user
//! once so that facts and reputation have a known owner, and unknown IDs
//! surface as [`NotFoundError::User`](crate::NotFoundError::User).

use serde::{Deserialize, Serialize};

use crate::error::{EngageError, ValidationError};
use crate::storage::schema::MAX_USER_ID_LENGTH;
use crate::types::{Timestamp, UserId};

/// A registered user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Host-supplied identifier.
    pub id: UserId,

    /// Name shown on leaderboards.
    pub display_name: String,

    /// When the user was registered.
    pub joined_at: Timestamp,
}

pub(crate) fn validate_user_id(id: &UserId) -> Result<(), EngageError> {
    if id.as_str().is_empty() {
        return Err(ValidationError::required_field("user_id").into());
    }
    if id.as_str().len() > MAX_USER_ID_LENGTH {
        return Err(ValidationError::invalid_field(
            "user_id",
            format!("must be at most {} bytes", MAX_USER_ID_LENGTH),
        )
        .into());
    }
    Ok(())
}
