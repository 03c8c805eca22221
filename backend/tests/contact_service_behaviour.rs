//! Behavioural tests for the contact service over the in-memory repository.
//!
//! These exercise the owner-scoping, conflict, partial-update, and birthday
//! window guarantees end to end through `ContactService`, using the
//! `test-support` double that mirrors the Diesel adapter's semantics.

use std::sync::Arc;

use chrono::NaiveDate;
use rstest::{fixture, rstest};
use uuid::Uuid;

use backend::domain::ports::Page;
use backend::domain::{
    ContactDraft, ContactPatch, ContactSearchFilter, ContactService, ErrorCode, OwnerId,
};
use backend::test_support::{FixedClock, InMemoryContactRepository};

type Service = ContactService<InMemoryContactRepository>;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn draft(first: &str, last: &str, email: &str, phone: &str, birth: NaiveDate) -> ContactDraft {
    ContactDraft::try_new(first, last, email, phone, birth, None).expect("valid draft")
}

/// Service sitting at 2024-03-25, a window that crosses into April.
#[fixture]
fn service() -> Service {
    ContactService::new(
        Arc::new(InMemoryContactRepository::new()),
        Arc::new(FixedClock::at(2024, 3, 25)),
    )
}

#[fixture]
fn owner() -> OwnerId {
    OwnerId::random()
}

#[rstest]
#[tokio::test]
async fn contacts_are_invisible_to_other_owners(service: Service, owner: OwnerId) {
    let other = OwnerId::random();
    let created = service
        .create(
            &owner,
            &draft(
                "Anna",
                "Kowalska",
                "anna@example.com",
                "+48100200300",
                date(1990, 3, 28),
            ),
        )
        .await
        .expect("create succeeds");

    assert!(
        service
            .find_by_id(&other, &created.id)
            .await
            .expect("lookup succeeds")
            .is_none()
    );
    assert!(
        service
            .list(&other, Page::new(0, 100))
            .await
            .expect("list succeeds")
            .is_empty()
    );
    assert!(
        service
            .search(&other, &ContactSearchFilter::any().with_name("ann"))
            .await
            .expect("search succeeds")
            .is_empty()
    );
}

#[rstest]
#[tokio::test]
async fn create_then_find_returns_the_stored_record(service: Service, owner: OwnerId) {
    let input = draft(
        "Anna",
        "Kowalska",
        "anna@example.com",
        "+48100200300",
        date(1990, 3, 28),
    );
    let created = service.create(&owner, &input).await.expect("create succeeds");

    let found = service
        .find_by_id(&owner, &created.id)
        .await
        .expect("lookup succeeds")
        .expect("record exists");

    assert_eq!(found, created);
    assert_eq!(found.first_name, "Anna");
    assert_eq!(found.owner_id, owner);
}

#[rstest]
#[tokio::test]
async fn empty_patch_leaves_the_record_unchanged(service: Service, owner: OwnerId) {
    let created = service
        .create(
            &owner,
            &draft(
                "Anna",
                "Kowalska",
                "anna@example.com",
                "+48100200300",
                date(1990, 3, 28),
            ),
        )
        .await
        .expect("create succeeds");

    let patch = ContactPatch::empty().with_first_name("").with_email("");
    let updated = service
        .update(&owner, &created.id, &patch)
        .await
        .expect("update succeeds")
        .expect("record exists");

    assert_eq!(updated, created);
}

#[rstest]
#[tokio::test]
async fn email_only_patch_changes_only_the_email(service: Service, owner: OwnerId) {
    let created = service
        .create(
            &owner,
            &draft(
                "Anna",
                "Kowalska",
                "anna@example.com",
                "+48100200300",
                date(1990, 3, 28),
            ),
        )
        .await
        .expect("create succeeds");

    let updated = service
        .update(
            &owner,
            &created.id,
            &ContactPatch::empty().with_email("anna.k@example.com"),
        )
        .await
        .expect("update succeeds")
        .expect("record exists");

    assert_eq!(updated.email, "anna.k@example.com");
    assert_eq!(updated.first_name, created.first_name);
    assert_eq!(updated.last_name, created.last_name);
    assert_eq!(updated.phone, created.phone);
    assert_eq!(updated.birth_date, created.birth_date);
}

#[rstest]
#[tokio::test]
async fn delete_returns_snapshot_and_removes_the_record(service: Service, owner: OwnerId) {
    let created = service
        .create(
            &owner,
            &draft(
                "Anna",
                "Kowalska",
                "anna@example.com",
                "+48100200300",
                date(1990, 3, 28),
            ),
        )
        .await
        .expect("create succeeds");

    let deleted = service
        .delete(&owner, &created.id)
        .await
        .expect("delete succeeds")
        .expect("record existed");
    assert_eq!(deleted, created);

    assert!(
        service
            .find_by_id(&owner, &created.id)
            .await
            .expect("lookup succeeds")
            .is_none()
    );
    assert!(
        service
            .delete(&owner, &created.id)
            .await
            .expect("second delete succeeds")
            .is_none()
    );
}

#[rstest]
#[tokio::test]
async fn duplicate_email_on_create_is_a_conflict(service: Service, owner: OwnerId) {
    service
        .create(
            &owner,
            &draft(
                "Anna",
                "Kowalska",
                "anna@example.com",
                "+48100200300",
                date(1990, 3, 28),
            ),
        )
        .await
        .expect("first create succeeds");

    let err = service
        .create(
            &owner,
            &draft(
                "Anna",
                "Nowak",
                "anna@example.com",
                "+48999888777",
                date(1985, 6, 1),
            ),
        )
        .await
        .expect_err("second create must fail");

    assert_eq!(err.code(), ErrorCode::Conflict);

    let remaining = service
        .list(&owner, Page::new(0, 100))
        .await
        .expect("list succeeds");
    assert_eq!(remaining.len(), 1, "no second record may be persisted");
}

#[rstest]
#[tokio::test]
async fn same_email_under_another_owner_is_allowed(service: Service, owner: OwnerId) {
    let other = OwnerId::random();
    let shared = draft(
        "Anna",
        "Kowalska",
        "anna@example.com",
        "+48100200300",
        date(1990, 3, 28),
    );

    service.create(&owner, &shared).await.expect("first owner create");
    service
        .create(&other, &shared)
        .await
        .expect("same email under a different owner is not a duplicate");
}

#[rstest]
#[tokio::test]
async fn update_onto_a_taken_email_is_a_conflict(service: Service, owner: OwnerId) {
    service
        .create(
            &owner,
            &draft(
                "Anna",
                "Kowalska",
                "anna@example.com",
                "+48100200300",
                date(1990, 3, 28),
            ),
        )
        .await
        .expect("first create succeeds");
    let second = service
        .create(
            &owner,
            &draft(
                "Joanna",
                "Nowak",
                "joanna@example.com",
                "+48111222333",
                date(1992, 7, 4),
            ),
        )
        .await
        .expect("second create succeeds");

    let err = service
        .update(
            &owner,
            &second.id,
            &ContactPatch::empty().with_email("anna@example.com"),
        )
        .await
        .expect_err("update must fail");

    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.message(), "a contact with this email already exists");
}

#[rstest]
#[tokio::test]
async fn update_onto_a_taken_phone_is_a_data_integrity_error(service: Service, owner: OwnerId) {
    service
        .create(
            &owner,
            &draft(
                "Anna",
                "Kowalska",
                "anna@example.com",
                "+48100200300",
                date(1990, 3, 28),
            ),
        )
        .await
        .expect("first create succeeds");
    let second = service
        .create(
            &owner,
            &draft(
                "Joanna",
                "Nowak",
                "joanna@example.com",
                "+48111222333",
                date(1992, 7, 4),
            ),
        )
        .await
        .expect("second create succeeds");

    let err = service
        .update(
            &owner,
            &second.id,
            &ContactPatch::empty().with_phone("+48100200300"),
        )
        .await
        .expect_err("update must fail");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "data integrity error");
}

#[rstest]
#[tokio::test]
async fn update_of_a_missing_record_reports_not_found(service: Service, owner: OwnerId) {
    let outcome = service
        .update(
            &owner,
            &Uuid::new_v4(),
            &ContactPatch::empty().with_first_name("Anna"),
        )
        .await
        .expect("update succeeds");

    assert!(outcome.is_none());
}

#[rstest]
#[tokio::test]
async fn upcoming_birthdays_match_the_month_crossing_window(service: Service, owner: OwnerId) {
    // Clock is pinned at 2024-03-25; the window runs to 2024-04-01.
    let cases = [
        ("Edge", "Start", "start@example.com", "1", date(1990, 3, 25), true),
        ("Late", "March", "march@example.com", "2", date(1985, 3, 31), true),
        ("April", "First", "april@example.com", "3", date(2001, 4, 1), true),
        ("Too", "Early", "early@example.com", "4", date(1990, 3, 24), false),
        ("Too", "Late", "late@example.com", "5", date(1990, 4, 2), false),
        ("Far", "Away", "away@example.com", "6", date(1990, 11, 11), false),
    ];

    for (first, last, email, phone, birth, _) in &cases {
        service
            .create(&owner, &draft(first, last, email, phone, *birth))
            .await
            .expect("create succeeds");
    }

    let upcoming = service
        .upcoming_birthdays(&owner)
        .await
        .expect("query succeeds");

    let mut expected: Vec<&str> = cases
        .iter()
        .filter(|(_, _, _, _, _, hit)| *hit)
        .map(|(_, _, email, _, _, _)| *email)
        .collect();
    let mut actual: Vec<&str> = upcoming.iter().map(|c| c.email.as_str()).collect();
    expected.sort_unstable();
    actual.sort_unstable();

    assert_eq!(actual, expected);
}

#[rstest]
#[tokio::test]
async fn search_matches_substrings_case_insensitively(service: Service, owner: OwnerId) {
    for (first, last, email, phone) in [
        ("Anna", "Kowalska", "anna@example.com", "1"),
        ("Joanna", "Nowak", "joanna@example.com", "2"),
        ("Anton", "Bauer", "anton@example.com", "3"),
    ] {
        service
            .create(&owner, &draft(first, last, email, phone, date(1990, 1, 1)))
            .await
            .expect("create succeeds");
    }

    let matches = service
        .search(&owner, &ContactSearchFilter::any().with_name("ann"))
        .await
        .expect("search succeeds");

    let mut names: Vec<&str> = matches.iter().map(|c| c.first_name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["Anna", "Joanna"]);
}

#[rstest]
#[tokio::test]
async fn search_filters_combine_with_and(service: Service, owner: OwnerId) {
    for (first, last, email, phone) in [
        ("Anna", "Kowalska", "anna@example.com", "1"),
        ("Anna", "Nowak", "anna.n@other.org", "2"),
    ] {
        service
            .create(&owner, &draft(first, last, email, phone, date(1990, 1, 1)))
            .await
            .expect("create succeeds");
    }

    let matches = service
        .search(
            &owner,
            &ContactSearchFilter::any()
                .with_name("ANNA")
                .with_surname("kowal")
                .with_email("example.com"),
        )
        .await
        .expect("search succeeds");

    assert_eq!(matches.len(), 1);
    assert_eq!(matches.first().map(|c| c.last_name.as_str()), Some("Kowalska"));
}

#[rstest]
#[tokio::test]
async fn list_slices_by_skip_and_limit(service: Service, owner: OwnerId) {
    for index in 0..5 {
        service
            .create(
                &owner,
                &draft(
                    "Contact",
                    "Number",
                    &format!("contact{index}@example.com"),
                    &format!("+4810020030{index}"),
                    date(1990, 1, 1),
                ),
            )
            .await
            .expect("create succeeds");
    }

    let all = service
        .list(&owner, Page::new(0, 100))
        .await
        .expect("list succeeds");
    assert_eq!(all.len(), 5);

    let sliced = service
        .list(&owner, Page::new(1, 2))
        .await
        .expect("list succeeds");
    assert_eq!(sliced.len(), 2);
    assert_eq!(sliced.as_slice(), &all[1..3]);

    let empty = service
        .list(&owner, Page::new(10, 100))
        .await
        .expect("list succeeds");
    assert!(empty.is_empty());
}

#[rstest]
#[tokio::test]
async fn first_name_search_pages_through_matches(service: Service, owner: OwnerId) {
    for index in 0..4 {
        service
            .create(
                &owner,
                &draft(
                    "Anna",
                    "Kowalska",
                    &format!("anna{index}@example.com"),
                    &format!("+4870000000{index}"),
                    date(1990, 1, 1),
                ),
            )
            .await
            .expect("create succeeds");
    }

    let page = service
        .search_by_first_name(&owner, "ann", Page::new(2, 10))
        .await
        .expect("search succeeds");

    assert_eq!(page.len(), 2);
}
