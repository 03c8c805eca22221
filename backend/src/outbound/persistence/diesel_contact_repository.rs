//! PostgreSQL-backed `ContactRepository` implementation using Diesel ORM.
//!
//! Every query filters on `owner_id`, so no code path can read or mutate
//! another tenant's contacts. Mutations run inside a transaction: the
//! duplicate pre-check and the insert either commit together or not at all,
//! and a constraint violation rolls the whole write back.

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use diesel::prelude::*;
use diesel::sql_types::{Date, Text};
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{ContactRepository, ContactRepositoryError, Page};
use crate::domain::{
    BirthdayWindow, Contact, ContactDraft, ContactPatch, ContactSearchFilter, OwnerId,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{ContactChangeset, ContactRow, NewContactRow};
use super::pool::DbPool;
use super::schema::contacts;

diesel::define_sql_function! {
    /// PostgreSQL `date_part`, used to compare month/day components of the
    /// stored birth date without regard to its year.
    fn date_part(part: Text, source: Date) -> Double;
}

/// `ILIKE` pattern matching `term` anywhere in the column value.
fn substring_pattern(term: &str) -> String {
    format!("%{term}%")
}

/// Diesel-backed implementation of the `ContactRepository` port.
#[derive(Clone)]
pub struct DieselContactRepository {
    pool: DbPool,
}

impl DieselContactRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactRepository for DieselContactRepository {
    async fn list(
        &self,
        owner: &OwnerId,
        page: Page,
    ) -> Result<Vec<Contact>, ContactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ContactRow> = contacts::table
            .filter(contacts::owner_id.eq(owner.as_uuid()))
            .order(contacts::id.asc())
            .offset(page.skip())
            .limit(page.limit())
            .select(ContactRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(Contact::from).collect())
    }

    async fn find_by_id(
        &self,
        owner: &OwnerId,
        id: &Uuid,
    ) -> Result<Option<Contact>, ContactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ContactRow> = contacts::table
            .filter(
                contacts::id
                    .eq(*id)
                    .and(contacts::owner_id.eq(owner.as_uuid())),
            )
            .select(ContactRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(Contact::from))
    }

    async fn search_by_first_name(
        &self,
        owner: &OwnerId,
        name: &str,
        page: Page,
    ) -> Result<Vec<Contact>, ContactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ContactRow> = contacts::table
            .filter(contacts::owner_id.eq(owner.as_uuid()))
            .filter(contacts::first_name.ilike(substring_pattern(name)))
            .order(contacts::id.asc())
            .offset(page.skip())
            .limit(page.limit())
            .select(ContactRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(Contact::from).collect())
    }

    async fn search(
        &self,
        owner: &OwnerId,
        filter: &ContactSearchFilter,
    ) -> Result<Vec<Contact>, ContactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = contacts::table
            .filter(contacts::owner_id.eq(owner.as_uuid()))
            .order(contacts::id.asc())
            .select(ContactRow::as_select())
            .into_boxed();

        if let Some(name) = filter.name() {
            query = query.filter(contacts::first_name.ilike(substring_pattern(name)));
        }
        if let Some(surname) = filter.surname() {
            query = query.filter(contacts::last_name.ilike(substring_pattern(surname)));
        }
        if let Some(email) = filter.email() {
            query = query.filter(contacts::email.ilike(substring_pattern(email)));
        }

        let rows: Vec<ContactRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(Contact::from).collect())
    }

    async fn create(
        &self,
        owner: &OwnerId,
        draft: &ContactDraft,
    ) -> Result<Contact, ContactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewContactRow {
            id: Uuid::new_v4(),
            owner_id: *owner.as_uuid(),
            first_name: draft.first_name(),
            last_name: draft.last_name(),
            email: draft.email(),
            phone: draft.phone(),
            birth_date: draft.birth_date(),
            additional_info: draft.additional_info(),
        };

        let inserted = conn
            .transaction::<ContactRow, ContactRepositoryError, _>(|conn| {
                async move {
                    // Deterministic duplicate detection; the unique
                    // constraints remain the authoritative backstop for the
                    // pre-check/insert race.
                    let duplicates: i64 = contacts::table
                        .filter(contacts::owner_id.eq(row.owner_id))
                        .filter(contacts::email.eq(row.email).or(contacts::phone.eq(row.phone)))
                        .count()
                        .get_result(conn)
                        .await?;

                    if duplicates > 0 {
                        return Err(ContactRepositoryError::Duplicate);
                    }

                    diesel::insert_into(contacts::table)
                        .values(&row)
                        .returning(ContactRow::as_returning())
                        .get_result(conn)
                        .await
                        .map_err(ContactRepositoryError::from)
                }
                .scope_boxed()
            })
            .await?;

        Ok(Contact::from(inserted))
    }

    async fn update(
        &self,
        owner: &OwnerId,
        id: &Uuid,
        patch: &ContactPatch,
    ) -> Result<Option<Contact>, ContactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = conn
            .transaction::<Option<ContactRow>, ContactRepositoryError, _>(|conn| {
                async move {
                    let existing: Option<ContactRow> = contacts::table
                        .filter(
                            contacts::id
                                .eq(*id)
                                .and(contacts::owner_id.eq(owner.as_uuid())),
                        )
                        .select(ContactRow::as_select())
                        .first(conn)
                        .await
                        .optional()?;

                    let Some(existing) = existing else {
                        return Ok(None);
                    };

                    // A patch with no effective change would produce an empty
                    // changeset, which Diesel rejects; the contract is to
                    // return the record untouched.
                    if patch.is_noop() {
                        return Ok(Some(existing));
                    }

                    let changeset = ContactChangeset {
                        first_name: patch.first_name(),
                        last_name: patch.last_name(),
                        email: patch.email(),
                        phone: patch.phone(),
                        birth_date: patch.birth_date(),
                        additional_info: patch.additional_info(),
                        updated_at: Utc::now(),
                    };

                    let updated = diesel::update(
                        contacts::table.filter(contacts::id.eq(existing.id)),
                    )
                    .set(&changeset)
                    .returning(ContactRow::as_returning())
                    .get_result(conn)
                    .await?;

                    Ok(Some(updated))
                }
                .scope_boxed()
            })
            .await?;

        Ok(updated.map(Contact::from))
    }

    async fn delete(
        &self,
        owner: &OwnerId,
        id: &Uuid,
    ) -> Result<Option<Contact>, ContactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted: Option<ContactRow> = diesel::delete(
            contacts::table.filter(
                contacts::id
                    .eq(*id)
                    .and(contacts::owner_id.eq(owner.as_uuid())),
            ),
        )
        .returning(ContactRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        Ok(deleted.map(Contact::from))
    }

    async fn upcoming_birthdays(
        &self,
        owner: &OwnerId,
        window: &BirthdayWindow,
    ) -> Result<Vec<Contact>, ContactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let start = window.start();
        let end = window.end();

        // Month-pair rule from the domain window, expressed over date_part;
        // see BirthdayWindow for the documented limitation on long windows.
        let in_start_month = date_part("month", contacts::birth_date)
            .eq(f64::from(start.month()))
            .and(date_part("day", contacts::birth_date).ge(f64::from(start.day())));
        let in_end_month = date_part("month", contacts::birth_date)
            .eq(f64::from(end.month()))
            .and(date_part("day", contacts::birth_date).le(f64::from(end.day())));

        let rows: Vec<ContactRow> = contacts::table
            .filter(contacts::owner_id.eq(owner.as_uuid()))
            .filter(in_start_month.or(in_end_month))
            .order(contacts::id.asc())
            .select(ContactRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(Contact::from).collect())
    }
}
