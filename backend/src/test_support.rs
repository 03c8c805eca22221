//! Test utilities shared by unit and integration tests.
//!
//! [`InMemoryContactRepository`] mirrors the Diesel adapter's observable
//! semantics — owner scoping, id ordering, the duplicate pre-check, and
//! constraint-shaped failures — without a database. Compiled only for tests
//! or behind the `test-support` feature.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use uuid::Uuid;

use crate::domain::ports::{ContactRepository, ContactRepositoryError, Page};
use crate::domain::{
    BirthdayWindow, Contact, ContactDraft, ContactPatch, ContactSearchFilter, OwnerId,
};
use crate::outbound::persistence::OWNER_PHONE_CONSTRAINT;

/// Clock pinned to a known instant so time-derived windows are deterministic.
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    /// Clock reporting noon UTC on the given date.
    ///
    /// # Panics
    ///
    /// Panics when the date is not a valid calendar date; acceptable in test
    /// support where inputs are literals.
    pub fn at(year: i32, month: u32, day: u32) -> Self {
        let instant = Utc
            .with_ymd_and_hms(year, month, day, 12, 0, 0)
            .single()
            .expect("valid instant");
        Self(instant)
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// In-memory implementation of the `ContactRepository` port.
///
/// Records are keyed by id in a `BTreeMap`, so iteration order matches the
/// adapter's `ORDER BY id` guarantee.
#[derive(Default)]
pub struct InMemoryContactRepository {
    records: Mutex<BTreeMap<Uuid, Contact>>,
}

impl InMemoryContactRepository {
    /// Empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<Uuid, Contact>> {
        match self.records.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("contacts lock poisoned"),
        }
    }
}

fn page_slice(contacts: Vec<Contact>, page: Page) -> Vec<Contact> {
    let skip = usize::try_from(page.skip()).unwrap_or(usize::MAX);
    let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
    contacts.into_iter().skip(skip).take(limit).collect()
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl ContactRepository for InMemoryContactRepository {
    async fn list(
        &self,
        owner: &OwnerId,
        page: Page,
    ) -> Result<Vec<Contact>, ContactRepositoryError> {
        let owned: Vec<Contact> = self
            .lock()
            .values()
            .filter(|contact| &contact.owner_id == owner)
            .cloned()
            .collect();

        Ok(page_slice(owned, page))
    }

    async fn find_by_id(
        &self,
        owner: &OwnerId,
        id: &Uuid,
    ) -> Result<Option<Contact>, ContactRepositoryError> {
        Ok(self
            .lock()
            .get(id)
            .filter(|contact| &contact.owner_id == owner)
            .cloned())
    }

    async fn search_by_first_name(
        &self,
        owner: &OwnerId,
        name: &str,
        page: Page,
    ) -> Result<Vec<Contact>, ContactRepositoryError> {
        let matches: Vec<Contact> = self
            .lock()
            .values()
            .filter(|contact| &contact.owner_id == owner)
            .filter(|contact| contains_ci(&contact.first_name, name))
            .cloned()
            .collect();

        Ok(page_slice(matches, page))
    }

    async fn search(
        &self,
        owner: &OwnerId,
        filter: &ContactSearchFilter,
    ) -> Result<Vec<Contact>, ContactRepositoryError> {
        Ok(self
            .lock()
            .values()
            .filter(|contact| &contact.owner_id == owner)
            .filter(|contact| {
                filter
                    .name()
                    .is_none_or(|name| contains_ci(&contact.first_name, name))
            })
            .filter(|contact| {
                filter
                    .surname()
                    .is_none_or(|surname| contains_ci(&contact.last_name, surname))
            })
            .filter(|contact| {
                filter
                    .email()
                    .is_none_or(|email| contains_ci(&contact.email, email))
            })
            .cloned()
            .collect())
    }

    async fn create(
        &self,
        owner: &OwnerId,
        draft: &ContactDraft,
    ) -> Result<Contact, ContactRepositoryError> {
        let mut records = self.lock();

        let clash = records.values().any(|contact| {
            &contact.owner_id == owner
                && (contact.email == draft.email() || contact.phone == draft.phone())
        });
        if clash {
            return Err(ContactRepositoryError::Duplicate);
        }

        let contact = draft.clone().into_contact(Uuid::new_v4(), owner.clone());
        records.insert(contact.id, contact.clone());
        Ok(contact)
    }

    async fn update(
        &self,
        owner: &OwnerId,
        id: &Uuid,
        patch: &ContactPatch,
    ) -> Result<Option<Contact>, ContactRepositoryError> {
        let mut records = self.lock();

        let Some(existing) = records
            .get(id)
            .filter(|contact| &contact.owner_id == owner)
            .cloned()
        else {
            return Ok(None);
        };

        if patch.is_noop() {
            return Ok(Some(existing));
        }

        // Updates have no pre-check; clashes surface the way the database
        // constraints would.
        if let Some(email) = patch.email() {
            let taken = records.values().any(|contact| {
                contact.id != *id && &contact.owner_id == owner && contact.email == email
            });
            if taken {
                return Err(ContactRepositoryError::DuplicateEmail);
            }
        }
        if let Some(phone) = patch.phone() {
            let taken = records.values().any(|contact| {
                contact.id != *id && &contact.owner_id == owner && contact.phone == phone
            });
            if taken {
                return Err(ContactRepositoryError::integrity(OWNER_PHONE_CONSTRAINT));
            }
        }

        let mut updated = existing;
        patch.apply(&mut updated);
        records.insert(updated.id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete(
        &self,
        owner: &OwnerId,
        id: &Uuid,
    ) -> Result<Option<Contact>, ContactRepositoryError> {
        let mut records = self.lock();

        if records
            .get(id)
            .is_none_or(|contact| &contact.owner_id != owner)
        {
            return Ok(None);
        }

        Ok(records.remove(id))
    }

    async fn upcoming_birthdays(
        &self,
        owner: &OwnerId,
        window: &BirthdayWindow,
    ) -> Result<Vec<Contact>, ContactRepositoryError> {
        Ok(self
            .lock()
            .values()
            .filter(|contact| &contact.owner_id == owner)
            .filter(|contact| window.matches(contact.birth_date))
            .cloned()
            .collect())
    }
}
