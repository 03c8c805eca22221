//! Contact aggregate and its write payloads.
//!
//! A contact always belongs to exactly one owner and is only reachable
//! through owner-scoped repository operations. Creation goes through
//! [`ContactDraft`] (all required fields validated up front); mutation goes
//! through [`ContactPatch`] (partial update, empty strings skipped).

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::OwnerId;

/// Validation errors returned by [`ContactDraft::try_new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactValidationError {
    /// `first_name` was missing or blank once trimmed.
    EmptyFirstName,
    /// `last_name` was missing or blank once trimmed.
    EmptyLastName,
    /// `email` was missing or blank once trimmed.
    EmptyEmail,
    /// `phone` was missing or blank once trimmed.
    EmptyPhone,
}

impl fmt::Display for ContactValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyFirstName => write!(f, "first name must not be empty"),
            Self::EmptyLastName => write!(f, "last name must not be empty"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPhone => write!(f, "phone must not be empty"),
        }
    }
}

impl std::error::Error for ContactValidationError {}

/// A persisted contact record.
///
/// ## Invariants
/// - `owner_id` is immutable after creation; no operation rebinds a contact
///   to another owner.
/// - `(owner_id, email)` and `(owner_id, phone)` are unique at the store
///   level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Store-assigned identifier (UUID v4).
    pub id: Uuid,
    /// Owning user; never changes after creation.
    pub owner_id: OwnerId,
    /// Required given name.
    pub first_name: String,
    /// Required family name.
    pub last_name: String,
    /// Required email, unique per owner.
    pub email: String,
    /// Required phone number, unique per owner.
    pub phone: String,
    /// Calendar date of birth; no past-date constraint.
    pub birth_date: NaiveDate,
    /// Optional free-form notes.
    pub additional_info: Option<String>,
}

/// Validated create payload for a new contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDraft {
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
    birth_date: NaiveDate,
    additional_info: Option<String>,
}

impl ContactDraft {
    /// Construct a draft from raw inputs, rejecting blank required fields.
    pub fn try_new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        birth_date: NaiveDate,
        additional_info: Option<String>,
    ) -> Result<Self, ContactValidationError> {
        let first_name = first_name.into();
        if first_name.trim().is_empty() {
            return Err(ContactValidationError::EmptyFirstName);
        }
        let last_name = last_name.into();
        if last_name.trim().is_empty() {
            return Err(ContactValidationError::EmptyLastName);
        }
        let email = email.into();
        if email.trim().is_empty() {
            return Err(ContactValidationError::EmptyEmail);
        }
        let phone = phone.into();
        if phone.trim().is_empty() {
            return Err(ContactValidationError::EmptyPhone);
        }

        Ok(Self {
            first_name,
            last_name,
            email,
            phone,
            birth_date,
            additional_info,
        })
    }

    /// Required given name.
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Required family name.
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Required email address.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Required phone number.
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Date of birth.
    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    /// Optional free-form notes.
    pub fn additional_info(&self) -> Option<&str> {
        self.additional_info.as_deref()
    }

    /// Materialise the draft into a [`Contact`] with a store-assigned id.
    pub fn into_contact(self, id: Uuid, owner_id: OwnerId) -> Contact {
        Contact {
            id,
            owner_id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            birth_date: self.birth_date,
            additional_info: self.additional_info,
        }
    }
}

/// Partial update payload for an existing contact.
///
/// Fields left unset keep the stored value. An empty string is treated the
/// same as unset, so a caller cannot clear a field to the empty string
/// through a patch. The accessors apply that policy, leaving the raw payload
/// intact for serialisation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPatch {
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    birth_date: Option<NaiveDate>,
    additional_info: Option<String>,
}

fn provided(field: Option<&str>) -> Option<&str> {
    field.filter(|value| !value.is_empty())
}

impl ContactPatch {
    /// Patch with every field unset; applying it is a no-op.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Set the given name.
    pub fn with_first_name(mut self, value: impl Into<String>) -> Self {
        self.first_name = Some(value.into());
        self
    }

    /// Set the family name.
    pub fn with_last_name(mut self, value: impl Into<String>) -> Self {
        self.last_name = Some(value.into());
        self
    }

    /// Set the email address.
    pub fn with_email(mut self, value: impl Into<String>) -> Self {
        self.email = Some(value.into());
        self
    }

    /// Set the phone number.
    pub fn with_phone(mut self, value: impl Into<String>) -> Self {
        self.phone = Some(value.into());
        self
    }

    /// Set the date of birth.
    pub fn with_birth_date(mut self, value: NaiveDate) -> Self {
        self.birth_date = Some(value);
        self
    }

    /// Set the free-form notes.
    pub fn with_additional_info(mut self, value: impl Into<String>) -> Self {
        self.additional_info = Some(value.into());
        self
    }

    /// Effective given name change, if one was provided.
    pub fn first_name(&self) -> Option<&str> {
        provided(self.first_name.as_deref())
    }

    /// Effective family name change, if one was provided.
    pub fn last_name(&self) -> Option<&str> {
        provided(self.last_name.as_deref())
    }

    /// Effective email change, if one was provided.
    pub fn email(&self) -> Option<&str> {
        provided(self.email.as_deref())
    }

    /// Effective phone change, if one was provided.
    pub fn phone(&self) -> Option<&str> {
        provided(self.phone.as_deref())
    }

    /// Effective birth date change, if one was provided.
    pub fn birth_date(&self) -> Option<NaiveDate> {
        self.birth_date
    }

    /// Effective notes change, if one was provided.
    pub fn additional_info(&self) -> Option<&str> {
        provided(self.additional_info.as_deref())
    }

    /// True when the patch carries no effective change.
    pub fn is_noop(&self) -> bool {
        self.first_name().is_none()
            && self.last_name().is_none()
            && self.email().is_none()
            && self.phone().is_none()
            && self.birth_date().is_none()
            && self.additional_info().is_none()
    }

    /// Apply the effective changes onto an existing contact in place.
    pub fn apply(&self, contact: &mut Contact) {
        if let Some(value) = self.first_name() {
            contact.first_name = value.to_owned();
        }
        if let Some(value) = self.last_name() {
            contact.last_name = value.to_owned();
        }
        if let Some(value) = self.email() {
            contact.email = value.to_owned();
        }
        if let Some(value) = self.phone() {
            contact.phone = value.to_owned();
        }
        if let Some(value) = self.birth_date() {
            contact.birth_date = value;
        }
        if let Some(value) = self.additional_info() {
            contact.additional_info = Some(value.to_owned());
        }
    }
}

/// Optional case-insensitive substring filters for contact search.
///
/// Each supplied filter is ANDed with the others; omitted or empty filters
/// are not applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactSearchFilter {
    name: Option<String>,
    surname: Option<String>,
    email: Option<String>,
}

impl ContactSearchFilter {
    /// Filter matching every contact of the owner.
    pub fn any() -> Self {
        Self::default()
    }

    /// Filter on a first-name substring.
    pub fn with_name(mut self, value: impl Into<String>) -> Self {
        self.name = Some(value.into());
        self
    }

    /// Filter on a last-name substring.
    pub fn with_surname(mut self, value: impl Into<String>) -> Self {
        self.surname = Some(value.into());
        self
    }

    /// Filter on an email substring.
    pub fn with_email(mut self, value: impl Into<String>) -> Self {
        self.email = Some(value.into());
        self
    }

    /// Effective first-name filter.
    pub fn name(&self) -> Option<&str> {
        provided(self.name.as_deref())
    }

    /// Effective last-name filter.
    pub fn surname(&self) -> Option<&str> {
        provided(self.surname.as_deref())
    }

    /// Effective email filter.
    pub fn email(&self) -> Option<&str> {
        provided(self.email.as_deref())
    }
}
