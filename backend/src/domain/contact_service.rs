//! Transactional safety net over the contact repository port.
//!
//! Reads are pure delegation; mutations gain one consistent error shape:
//! whether the duplicate pre-check or the store's unique constraint caught a
//! clash, the caller sees a conflict. The repository's transaction guarantees
//! nothing is persisted when a mutation fails.

use std::sync::Arc;

use mockable::Clock;
use tracing::debug;
use uuid::Uuid;

use super::ports::{ContactRepository, ContactRepositoryError, Page};
use super::{
    BirthdayWindow, Contact, ContactDraft, ContactPatch, ContactSearchFilter, Error, OwnerId,
};

/// Domain service wrapping a [`ContactRepository`] with conflict translation.
#[derive(Clone)]
pub struct ContactService<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

/// Map repository failures to transport-agnostic domain errors.
fn map_repository_error(error: ContactRepositoryError) -> Error {
    match error {
        ContactRepositoryError::Connection { message } => Error::service_unavailable(message),
        ContactRepositoryError::Query { message } => Error::internal(message),
        ContactRepositoryError::Duplicate => {
            Error::conflict("you already have a contact with this email or phone")
        }
        ContactRepositoryError::DuplicateEmail => {
            Error::conflict("a contact with this email already exists")
        }
        ContactRepositoryError::Integrity { constraint } => {
            debug!(constraint, "unique violation outside the email constraint");
            Error::invalid_request("data integrity error")
        }
    }
}

impl<R> ContactService<R> {
    /// Create a new service over the given repository and clock.
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }
}

impl<R> ContactService<R>
where
    R: ContactRepository,
{
    /// Create a contact for the owner.
    ///
    /// Duplicate email/phone clashes surface as a conflict whether the
    /// repository pre-check or the store constraint detected them.
    pub async fn create(&self, owner: &OwnerId, draft: &ContactDraft) -> Result<Contact, Error> {
        self.repository
            .create(owner, draft)
            .await
            .map_err(map_repository_error)
    }

    /// Apply a partial update; `Ok(None)` means the target was not found.
    pub async fn update(
        &self,
        owner: &OwnerId,
        id: &Uuid,
        patch: &ContactPatch,
    ) -> Result<Option<Contact>, Error> {
        self.repository
            .update(owner, id, patch)
            .await
            .map_err(map_repository_error)
    }

    /// Delete a contact, returning its last persisted state.
    pub async fn delete(&self, owner: &OwnerId, id: &Uuid) -> Result<Option<Contact>, Error> {
        self.repository
            .delete(owner, id)
            .await
            .map_err(map_repository_error)
    }

    /// Fetch one of the owner's contacts.
    pub async fn find_by_id(&self, owner: &OwnerId, id: &Uuid) -> Result<Option<Contact>, Error> {
        self.repository
            .find_by_id(owner, id)
            .await
            .map_err(map_repository_error)
    }

    /// List the owner's contacts.
    pub async fn list(&self, owner: &OwnerId, page: Page) -> Result<Vec<Contact>, Error> {
        self.repository
            .list(owner, page)
            .await
            .map_err(map_repository_error)
    }

    /// Case-insensitive first-name substring search.
    pub async fn search_by_first_name(
        &self,
        owner: &OwnerId,
        name: &str,
        page: Page,
    ) -> Result<Vec<Contact>, Error> {
        self.repository
            .search_by_first_name(owner, name, page)
            .await
            .map_err(map_repository_error)
    }

    /// ANDed substring search across name, surname, and email.
    pub async fn search(
        &self,
        owner: &OwnerId,
        filter: &ContactSearchFilter,
    ) -> Result<Vec<Contact>, Error> {
        self.repository
            .search(owner, filter)
            .await
            .map_err(map_repository_error)
    }

    /// Contacts with a birthday in the next seven days, per the clock.
    pub async fn upcoming_birthdays(&self, owner: &OwnerId) -> Result<Vec<Contact>, Error> {
        let today = self.clock.utc().date_naive();
        let window = BirthdayWindow::next_week(today);
        self.upcoming_birthdays_in(owner, &window).await
    }

    /// Explicit-window variant for callers that supply their own dates.
    pub async fn upcoming_birthdays_in(
        &self,
        owner: &OwnerId,
        window: &BirthdayWindow,
    ) -> Result<Vec<Contact>, Error> {
        self.repository
            .upcoming_birthdays(owner, window)
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "contact_service_tests.rs"]
mod tests;
