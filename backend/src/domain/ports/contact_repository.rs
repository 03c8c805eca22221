//! Port abstraction for contact persistence adapters and their errors.
//!
//! Every method except the error helpers takes the owning user as a
//! mandatory parameter; adapters must scope all reads and writes to that
//! owner. Absent records are a normal `None` return, never an error.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    BirthdayWindow, Contact, ContactDraft, ContactPatch, ContactSearchFilter, OwnerId,
};

/// Persistence errors raised by contact repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContactRepositoryError {
    /// Repository connection could not be established.
    #[error("contact repository connection failed: {message}")]
    Connection { message: String },

    /// Query or mutation failed during execution.
    #[error("contact repository query failed: {message}")]
    Query { message: String },

    /// The pre-insert check found the owner already has a contact with the
    /// same email or phone.
    #[error("owner already has a contact with this email or phone")]
    Duplicate,

    /// The store rejected the write on the per-owner email uniqueness
    /// constraint, after the pre-check (a race, or an update without one).
    #[error("a contact with this email already exists")]
    DuplicateEmail,

    /// The store rejected the write on some other declared constraint.
    #[error("data integrity violation on constraint {constraint}")]
    Integrity { constraint: String },
}

impl ContactRepositoryError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Create an integrity error naming the violated constraint.
    pub fn integrity(constraint: impl Into<String>) -> Self {
        Self::Integrity {
            constraint: constraint.into(),
        }
    }
}

/// Offset/limit slice for list-shaped queries.
///
/// Negative inputs are clamped to zero so adapters never see an invalid
/// window; no upper bound is enforced here (caller responsibility).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    skip: i64,
    limit: i64,
}

impl Page {
    /// Build a page, clamping negative values to zero.
    pub fn new(skip: i64, limit: i64) -> Self {
        Self {
            skip: skip.max(0),
            limit: limit.max(0),
        }
    }

    /// Number of leading records to skip.
    pub fn skip(&self) -> i64 {
        self.skip
    }

    /// Maximum number of records to return.
    pub fn limit(&self) -> i64 {
        self.limit
    }
}

/// Port for owner-scoped contact persistence.
///
/// Result ordering is ascending contact id wherever a sequence is returned,
/// so repeated reads are deterministic.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// List the owner's contacts in id order, sliced by `page`.
    async fn list(&self, owner: &OwnerId, page: Page)
    -> Result<Vec<Contact>, ContactRepositoryError>;

    /// Fetch one contact; `None` when missing or owned by someone else.
    async fn find_by_id(
        &self,
        owner: &OwnerId,
        id: &Uuid,
    ) -> Result<Option<Contact>, ContactRepositoryError>;

    /// Case-insensitive substring match on first name, sliced by `page`.
    async fn search_by_first_name(
        &self,
        owner: &OwnerId,
        name: &str,
        page: Page,
    ) -> Result<Vec<Contact>, ContactRepositoryError>;

    /// ANDed case-insensitive substring filters on name, surname, and email.
    async fn search(
        &self,
        owner: &OwnerId,
        filter: &ContactSearchFilter,
    ) -> Result<Vec<Contact>, ContactRepositoryError>;

    /// Insert a new contact after the duplicate pre-check, atomically.
    async fn create(
        &self,
        owner: &OwnerId,
        draft: &ContactDraft,
    ) -> Result<Contact, ContactRepositoryError>;

    /// Apply a partial update; `None` when the target is absent.
    async fn update(
        &self,
        owner: &OwnerId,
        id: &Uuid,
        patch: &ContactPatch,
    ) -> Result<Option<Contact>, ContactRepositoryError>;

    /// Remove a contact, returning the pre-deletion snapshot.
    async fn delete(
        &self,
        owner: &OwnerId,
        id: &Uuid,
    ) -> Result<Option<Contact>, ContactRepositoryError>;

    /// Contacts whose birth date falls inside the window, year-agnostic.
    async fn upcoming_birthdays(
        &self,
        owner: &OwnerId,
        window: &BirthdayWindow,
    ) -> Result<Vec<Contact>, ContactRepositoryError>;
}
