//! Contact book backend library modules.
//!
//! An owner-scoped contact access layer: the domain model and service live
//! under [`domain`], the Diesel/PostgreSQL adapter under [`outbound`], and
//! process wiring (settings, tracing) alongside. Transport and
//! authentication are the embedding application's concern; it supplies an
//! authenticated [`domain::OwnerId`] and validated payloads per call.

pub mod config;
pub mod domain;
pub mod outbound;
pub mod telemetry;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
