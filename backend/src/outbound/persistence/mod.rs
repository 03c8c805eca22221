//! PostgreSQL persistence adapters built on Diesel.
//!
//! The adapter layer owns the connection pool, the table definitions, the
//! row structs, and the mapping from Diesel failures onto the domain's
//! repository errors. Nothing in here leaks Diesel types to the domain.

mod diesel_contact_repository;
mod diesel_error_mapping;
mod migrations;
mod models;
mod pool;
pub(crate) mod schema;

pub use diesel_contact_repository::DieselContactRepository;
pub use diesel_error_mapping::{OWNER_EMAIL_CONSTRAINT, OWNER_PHONE_CONSTRAINT};
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
