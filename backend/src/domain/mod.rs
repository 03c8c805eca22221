//! Domain primitives and services for the contact book core.
//!
//! Purpose: owner-scoped contact records, their write payloads, the birthday
//! lookahead window, and the service that translates persistence conflicts
//! into transport-agnostic domain errors. Types stay immutable where
//! practical and document their invariants in Rustdoc.

pub mod birthday;
pub mod contact;
pub mod contact_service;
pub mod error;
pub mod owner;
pub mod ports;

pub use self::birthday::{BirthdayWindow, BirthdayWindowError, LOOKAHEAD_DAYS};
pub use self::contact::{
    Contact, ContactDraft, ContactPatch, ContactSearchFilter, ContactValidationError,
};
pub use self::contact_service::ContactService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::owner::{OwnerId, OwnerIdValidationError};

/// Convenient result alias for domain operations.
pub type DomainResult<T> = Result<T, Error>;
