//! Owner identity for multi-tenant scoping.
//!
//! Every store operation takes an [`OwnerId`] as a mandatory parameter so no
//! code path can accidentally query across tenants. The core treats the value
//! as opaque; the inbound layer is responsible for authenticating it.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned by [`OwnerId::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerIdValidationError {
    /// The identifier was empty.
    EmptyId,
    /// The identifier was not a valid UUID.
    InvalidId,
}

impl fmt::Display for OwnerIdValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "owner id must not be empty"),
            Self::InvalidId => write!(f, "owner id must be a valid UUID"),
        }
    }
}

impl std::error::Error for OwnerIdValidationError {}

/// Stable owner identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OwnerId(Uuid, String);

impl OwnerId {
    /// Validate and construct an [`OwnerId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, OwnerIdValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a new random [`OwnerId`].
    pub fn random() -> Self {
        let uuid = Uuid::new_v4();
        Self(uuid, uuid.to_string())
    }

    /// Construct an [`OwnerId`] from an already-parsed UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    fn from_owned(id: String) -> Result<Self, OwnerIdValidationError> {
        if id.is_empty() {
            return Err(OwnerIdValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(OwnerIdValidationError::InvalidId);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| OwnerIdValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for OwnerId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<OwnerId> for String {
    fn from(value: OwnerId) -> Self {
        let OwnerId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for OwnerId {
    type Error = OwnerIdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn accepts_canonical_uuid() {
        let id = OwnerId::new("11111111-1111-1111-1111-111111111111").expect("valid owner id");
        assert_eq!(id.to_string(), "11111111-1111-1111-1111-111111111111");
    }

    #[rstest]
    #[case("")]
    #[case("  ")]
    #[case("not-a-uuid")]
    #[case(" 11111111-1111-1111-1111-111111111111")]
    fn rejects_invalid_input(#[case] raw: &str) {
        assert!(OwnerId::new(raw).is_err());
    }

    #[rstest]
    fn random_ids_are_distinct() {
        assert_ne!(OwnerId::random(), OwnerId::random());
    }

    #[rstest]
    fn round_trips_through_serde() {
        let id = OwnerId::random();
        let json = serde_json::to_string(&id).expect("owner id serialises");
        let back: OwnerId = serde_json::from_str(&json).expect("owner id deserialises");
        assert_eq!(back, id);
    }
}
