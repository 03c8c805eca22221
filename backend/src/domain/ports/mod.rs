//! Domain ports and supporting types for the hexagonal boundary.

mod contact_repository;

#[cfg(test)]
pub use contact_repository::MockContactRepository;
pub use contact_repository::{ContactRepository, ContactRepositoryError, Page};
