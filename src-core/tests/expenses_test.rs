mod common;

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use ledgerly_core::errors::Error;
use ledgerly_core::expenses::{
    ExpenseQuery, ExpenseRepository, ExpenseService, ExpenseServiceTrait, ExpenseUpdate,
    NewExpense, RecurrenceType,
};
use ledgerly_core::trackables::{
    NewTrackable, TrackableKind, TrackableRepository, TrackableService, TrackableServiceTrait,
};

fn expense_service(db: &common::TestDb) -> ExpenseService {
    ExpenseService::new(Arc::new(ExpenseRepository::new(db.pool.clone())))
}

fn trackable_service(db: &common::TestDb) -> TrackableService {
    TrackableService::new(Arc::new(TrackableRepository::new(db.pool.clone())))
}

fn expense(description: &str, amount: Decimal, category: &str, date: &str) -> NewExpense {
    NewExpense {
        description: description.to_string(),
        amount,
        category: category.to_string(),
        is_recurring: false,
        recurrence_type: RecurrenceType::None,
        date: date.to_string(),
        goal_id: None,
        budget_id: None,
    }
}

fn query(limit: i64) -> ExpenseQuery {
    ExpenseQuery {
        limit,
        cursor: None,
        category: None,
        is_recurring: None,
        trackable_id: None,
        start_date: None,
        end_date: None,
    }
}

async fn seed_five(service: &ExpenseService, user: &str) -> Vec<String> {
    let mut ids = Vec::new();
    for day in 1..=5 {
        let created = service
            .create(
                user,
                expense(
                    &format!("Expense {}", day),
                    dec!(10),
                    "Other",
                    &format!("2026-08-0{}T12:00:00Z", day),
                ),
            )
            .await
            .unwrap();
        ids.push(created.id);
    }
    ids
}

#[tokio::test]
async fn cursor_walk_visits_every_record_once() {
    let db = common::setup();
    let user = common::seed_user(&db.pool, "a@example.com");
    let service = expense_service(&db);
    seed_five(&service, &user).await;

    // Newest first: Aug 5, 4 | 3, 2 | 1.
    let first = service.list(&user, &query(2)).unwrap();
    assert_eq!(first.items.len(), 2);
    assert_eq!(first.items[0].description, "Expense 5");
    assert_eq!(first.items[1].description, "Expense 4");
    assert_eq!(first.meta.total, 5);
    assert!(first.meta.has_next);
    assert_eq!(
        first.meta.next_cursor.as_deref(),
        Some(first.items[1].id.as_str())
    );

    let mut q = query(2);
    q.cursor = first.meta.next_cursor.clone();
    let second = service.list(&user, &q).unwrap();
    assert_eq!(second.items.len(), 2);
    assert_eq!(second.items[0].description, "Expense 3");
    assert_eq!(second.meta.total, 5);
    assert!(second.meta.has_next);

    let mut q = query(2);
    q.cursor = second.meta.next_cursor.clone();
    let third = service.list(&user, &q).unwrap();
    assert_eq!(third.items.len(), 1);
    assert_eq!(third.items[0].description, "Expense 1");
    assert!(!third.meta.has_next);
    assert_eq!(third.meta.next_cursor, None);
}

#[tokio::test]
async fn unknown_cursor_is_rejected() {
    let db = common::setup();
    let user = common::seed_user(&db.pool, "a@example.com");
    let service = expense_service(&db);
    seed_five(&service, &user).await;

    let mut q = query(2);
    q.cursor = Some("no-such-id".to_string());
    let err = service.list(&user, &q).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn another_users_cursor_is_rejected() {
    let db = common::setup();
    let owner = common::seed_user(&db.pool, "owner@example.com");
    let other = common::seed_user(&db.pool, "other@example.com");
    let service = expense_service(&db);
    let ids = seed_five(&service, &owner).await;

    let mut q = query(2);
    q.cursor = Some(ids[0].clone());
    let err = service.list(&other, &q).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn category_filter_matches_substring_case_insensitively() {
    let db = common::setup();
    let user = common::seed_user(&db.pool, "a@example.com");
    let service = expense_service(&db);

    service
        .create(&user, expense("Lunch", dec!(15), "Food & Dining", "2026-08-01"))
        .await
        .unwrap();
    service
        .create(&user, expense("Bus", dec!(3), "Transportation", "2026-08-02"))
        .await
        .unwrap();

    let mut q = query(10);
    q.category = Some("food".to_string());
    let page = service.list(&user, &q).unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].description, "Lunch");
    assert_eq!(page.meta.total, 1);
}

#[tokio::test]
async fn category_filter_treats_wildcards_literally() {
    let db = common::setup();
    let user = common::seed_user(&db.pool, "a@example.com");
    let service = expense_service(&db);

    service
        .create(&user, expense("Sale haul", dec!(20), "50% off", "2026-08-01"))
        .await
        .unwrap();
    service
        .create(&user, expense("Lunch", dec!(15), "Food & Dining", "2026-08-02"))
        .await
        .unwrap();

    // A literal `%` only matches the category that contains one.
    let mut q = query(10);
    q.category = Some("%".to_string());
    let page = service.list(&user, &q).unwrap();
    assert_eq!(page.meta.total, 1);
    assert_eq!(page.items[0].category, "50% off");

    // `_` is not a single-character wildcard either.
    let mut q = query(10);
    q.category = Some("_".to_string());
    let page = service.list(&user, &q).unwrap();
    assert_eq!(page.meta.total, 0);
}

#[tokio::test]
async fn recurrence_filter_narrows_the_page() {
    let db = common::setup();
    let user = common::seed_user(&db.pool, "a@example.com");
    let service = expense_service(&db);

    let mut rent = expense("Rent", dec!(1200), "Housing", "2026-08-01");
    rent.is_recurring = true;
    rent.recurrence_type = RecurrenceType::Monthly;
    service.create(&user, rent).await.unwrap();
    service
        .create(&user, expense("Cinema", dec!(14), "Entertainment", "2026-08-02"))
        .await
        .unwrap();

    let mut q = query(10);
    q.is_recurring = Some(true);
    let page = service.list(&user, &q).unwrap();
    assert_eq!(page.meta.total, 1);
    assert_eq!(page.items[0].description, "Rent");

    let mut q = query(10);
    q.is_recurring = Some(false);
    let page = service.list(&user, &q).unwrap();
    assert_eq!(page.meta.total, 1);
    assert_eq!(page.items[0].description, "Cinema");
}

#[tokio::test]
async fn link_filter_lists_only_that_records_expenses() {
    let db = common::setup();
    let user = common::seed_user(&db.pool, "a@example.com");
    let expenses = expense_service(&db);
    let trackables = trackable_service(&db);

    let goal = trackables
        .create(
            &user,
            TrackableKind::Goal,
            NewTrackable {
                name: "Vacation".to_string(),
                description: None,
                target_amount: dec!(2000),
                deadline: None,
            },
        )
        .await
        .unwrap();

    let mut linked = expense("Deposit", dec!(100), "Savings", "2026-08-01");
    linked.goal_id = Some(goal.trackable.id.clone());
    expenses.create(&user, linked).await.unwrap();
    expenses
        .create(&user, expense("Lunch", dec!(15), "Food & Dining", "2026-08-02"))
        .await
        .unwrap();

    let mut q = query(10);
    q.trackable_id = Some(goal.trackable.id.clone());
    let page = expenses.list(&user, &q).unwrap();
    assert_eq!(page.meta.total, 1);
    assert_eq!(page.items[0].description, "Deposit");
    assert_eq!(
        page.items[0].goal_id.as_deref(),
        Some(goal.trackable.id.as_str())
    );
}

#[tokio::test]
async fn date_range_filter_is_inclusive() {
    let db = common::setup();
    let user = common::seed_user(&db.pool, "a@example.com");
    let service = expense_service(&db);
    seed_five(&service, &user).await;

    let mut q = query(10);
    q.start_date = Some("2026-08-02T00:00:00Z".parse().unwrap());
    q.end_date = Some("2026-08-04T23:59:59.999Z".parse().unwrap());
    let page = service.list(&user, &q).unwrap();
    assert_eq!(page.items.len(), 3);
    assert_eq!(page.meta.total, 3);
}

#[tokio::test]
async fn link_must_point_at_a_record_of_the_named_kind() {
    let db = common::setup();
    let user = common::seed_user(&db.pool, "a@example.com");
    let expenses = expense_service(&db);
    let trackables = trackable_service(&db);

    let goal = trackables
        .create(
            &user,
            TrackableKind::Goal,
            NewTrackable {
                name: "Vacation".to_string(),
                description: None,
                target_amount: dec!(2000),
                deadline: None,
            },
        )
        .await
        .unwrap();

    // The goal's id presented as a budget link is a mismatch.
    let mut input = expense("Deposit", dec!(100), "Savings", "2026-08-01");
    input.budget_id = Some(goal.trackable.id.clone());
    let err = expenses.create(&user, input).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let mut input = expense("Deposit", dec!(100), "Savings", "2026-08-01");
    input.goal_id = Some(goal.trackable.id.clone());
    let created = expenses.create(&user, input).await.unwrap();
    assert_eq!(created.goal_id.as_deref(), Some(goal.trackable.id.as_str()));
    assert_eq!(created.budget_id, None);
}

#[tokio::test]
async fn update_changes_only_provided_fields() {
    let db = common::setup();
    let user = common::seed_user(&db.pool, "a@example.com");
    let service = expense_service(&db);

    let created = service
        .create(&user, expense("Coffee", dec!(4.50), "Food & Dining", "2026-08-01"))
        .await
        .unwrap();

    let updated = service
        .update(
            &user,
            &created.id,
            ExpenseUpdate {
                amount: Some(dec!(5.25)),
                is_recurring: Some(true),
                recurrence_type: Some(RecurrenceType::Weekly),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.amount, dec!(5.25));
    assert!(updated.is_recurring);
    assert_eq!(updated.recurrence_type, RecurrenceType::Weekly);
    assert_eq!(updated.description, "Coffee");
    assert_eq!(updated.category, "Food & Dining");
}

#[tokio::test]
async fn explicit_null_link_clears_it_but_absent_keeps_it() {
    let db = common::setup();
    let user = common::seed_user(&db.pool, "a@example.com");
    let expenses = expense_service(&db);
    let trackables = trackable_service(&db);

    let goal = trackables
        .create(
            &user,
            TrackableKind::Goal,
            NewTrackable {
                name: "Vacation".to_string(),
                description: None,
                target_amount: dec!(2000),
                deadline: None,
            },
        )
        .await
        .unwrap();

    let mut input = expense("Deposit", dec!(100), "Savings", "2026-08-01");
    input.goal_id = Some(goal.trackable.id.clone());
    let created = expenses.create(&user, input).await.unwrap();

    // An update without link fields leaves the link alone.
    let updated = expenses
        .update(
            &user,
            &created.id,
            ExpenseUpdate {
                amount: Some(dec!(150)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.goal_id.as_deref(), Some(goal.trackable.id.as_str()));

    // An explicit null unlinks.
    let unlinked = expenses
        .update(
            &user,
            &created.id,
            ExpenseUpdate {
                goal_id: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(unlinked.goal_id, None);
    assert_eq!(unlinked.budget_id, None);
    assert_eq!(unlinked.amount, dec!(150));
}

#[tokio::test]
async fn delete_is_scoped_to_the_owner() {
    let db = common::setup();
    let owner = common::seed_user(&db.pool, "owner@example.com");
    let other = common::seed_user(&db.pool, "other@example.com");
    let service = expense_service(&db);

    let created = service
        .create(&owner, expense("Lunch", dec!(12), "Food & Dining", "2026-08-01"))
        .await
        .unwrap();

    let err = service.delete(&other, &created.id).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    service.delete(&owner, &created.id).await.unwrap();
    let err = service.get(&owner, &created.id).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}
