//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations exactly; Diesel uses them for
//! compile-time query validation and type-safe SQL generation. Regenerate
//! with `diesel print-schema` after a migration changes the schema.

diesel::table! {
    /// Contact records, one row per contact per owner.
    ///
    /// Uniqueness of `(owner_id, email)` and `(owner_id, phone)` is declared
    /// by the named constraints `contacts_owner_email_key` and
    /// `contacts_owner_phone_key`; the error-mapping layer recognises those
    /// names when a write is rejected.
    contacts (id) {
        /// Primary key: UUID v4 assigned on insert.
        id -> Uuid,
        /// Owning user; immutable after creation, no cross-tenant reads.
        owner_id -> Uuid,
        /// Required given name.
        first_name -> Varchar,
        /// Required family name.
        last_name -> Varchar,
        /// Required email, unique per owner.
        email -> Varchar,
        /// Required phone number, unique per owner.
        phone -> Varchar,
        /// Calendar date of birth.
        birth_date -> Date,
        /// Optional free-form notes.
        additional_info -> Nullable<Text>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}
