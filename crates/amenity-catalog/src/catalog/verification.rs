use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{AmenityId, UserId};

/// Identifier wrapper for verification ledger entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerificationId(pub u64);

/// Entity a user submitted for review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum VerifiedEntity {
    Amenity(AmenityId),
}

impl VerifiedEntity {
    pub fn amenity(&self) -> Option<AmenityId> {
        match self {
            VerifiedEntity::Amenity(id) => Some(*id),
        }
    }
}

/// Marker linking a user-submitted entity to its submitter.
///
/// Records are written once at submission time and never updated; they only
/// widen what the submitter can see and carry no approval state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRecord {
    pub id: VerificationId,
    pub user: UserId,
    pub entity: VerifiedEntity,
    pub created_at: DateTime<Utc>,
}

impl VerificationRecord {
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.user == user
    }
}
