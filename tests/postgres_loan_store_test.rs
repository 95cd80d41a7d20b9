use chrono::Duration;
use rusty_library_loans::adapters::postgres::PostgresLoanStore;
use rusty_library_loans::application::loan::{
    LoanApplicationError, get_loan_history, get_my_active_loans, rent_book,
};
use rusty_library_loans::domain::commands::RentBook;
use rusty_library_loans::domain::loan::Loan;
use rusty_library_loans::domain::rental::authorize_rental;
use rusty_library_loans::domain::value_objects::*;
use rusty_library_loans::ports::loan_store::{LoanStore, LoanStoreError};
use serial_test::serial;
use sqlx::PgPool;
use std::sync::Arc;

mod common;

use common::{TestContext, t0};

// ============================================================================
// テスト用のヘルパー関数
// ============================================================================

fn new_loan(user_id: UserId, book_id: BookId, at: chrono::DateTime<chrono::Utc>) -> Loan {
    authorize_rental(user_id, book_id, at, &[], &[]).unwrap()
}

/// テストで作成した利用者の貸出を削除する
async fn cleanup_user(pool: &PgPool, user_id: UserId) {
    sqlx::query("DELETE FROM loans WHERE user_id = $1")
        .bind(user_id.value())
        .execute(pool)
        .await
        .expect("Failed to cleanup loans");
}

// ============================================================================
// LoanStore
// ============================================================================

#[tokio::test]
#[serial]
#[ignore = "requires DATABASE_URL"]
async fn test_insert_and_find_by_user() {
    let pool = common::create_test_pool().await;
    let store = PostgresLoanStore::new(pool.clone());

    let user_id = UserId::new();
    let loan = new_loan(user_id, BookId::new(), t0());

    store.insert(&loan).await.expect("Failed to insert loan");

    let found = store.find_by_user(user_id).await.unwrap();
    assert_eq!(found, vec![loan.clone()]);

    let flagged = store.find_flagged_active_by_user(user_id).await.unwrap();
    assert_eq!(flagged, vec![loan.clone()]);

    let by_book = store.find_flagged_active_by_book(loan.book_id).await.unwrap();
    assert_eq!(by_book, vec![loan.clone()]);

    let by_pair = store
        .find_flagged_active_by_user_and_book(user_id, loan.book_id)
        .await
        .unwrap();
    assert_eq!(by_pair, vec![loan.clone()]);

    let all = store.find_all_flagged_active().await.unwrap();
    assert!(all.contains(&loan));

    cleanup_user(&pool, user_id).await;
}

#[tokio::test]
#[serial]
#[ignore = "requires DATABASE_URL"]
async fn test_insert_rejects_overlapping_loan_for_user() {
    let pool = common::create_test_pool().await;
    let store = PostgresLoanStore::new(pool.clone());

    let user_id = UserId::new();
    store
        .insert(&new_loan(user_id, BookId::new(), t0()))
        .await
        .unwrap();

    let overlapping = new_loan(user_id, BookId::new(), t0() + Duration::days(1));
    let result = store.insert(&overlapping).await;

    assert!(matches!(result, Err(LoanStoreError::Conflict)));
    assert_eq!(store.find_by_user(user_id).await.unwrap().len(), 1);

    // 期限を過ぎた時刻の貸出は記録できる
    let after_expiry = new_loan(user_id, BookId::new(), t0() + Duration::days(3));
    store.insert(&after_expiry).await.unwrap();
    assert_eq!(store.find_by_user(user_id).await.unwrap().len(), 2);

    cleanup_user(&pool, user_id).await;
}

#[tokio::test]
#[serial]
#[ignore = "requires DATABASE_URL"]
async fn test_insert_rejects_overlapping_loan_for_book() {
    let pool = common::create_test_pool().await;
    let store = PostgresLoanStore::new(pool.clone());

    let book_id = BookId::new();
    let first_user = UserId::new();
    let second_user = UserId::new();

    store
        .insert(&new_loan(first_user, book_id, t0()))
        .await
        .unwrap();

    let result = store
        .insert(&new_loan(second_user, book_id, t0() + Duration::hours(2)))
        .await;

    assert!(matches!(result, Err(LoanStoreError::Conflict)));

    cleanup_user(&pool, first_user).await;
    cleanup_user(&pool, second_user).await;
}

#[tokio::test]
#[serial]
#[ignore = "requires DATABASE_URL"]
async fn test_duplicate_loan_id_is_a_conflict() {
    let pool = common::create_test_pool().await;
    let store = PostgresLoanStore::new(pool.clone());

    let user_id = UserId::new();
    let loan = new_loan(user_id, BookId::new(), t0());
    store.insert(&loan).await.unwrap();

    // 期限後の日時にずらしても主キー重複は競合
    let mut duplicate = new_loan(user_id, BookId::new(), t0() + Duration::days(10));
    duplicate.loan_id = loan.loan_id;

    let result = store.insert(&duplicate).await;
    assert!(matches!(result, Err(LoanStoreError::Conflict)));

    cleanup_user(&pool, user_id).await;
}

#[tokio::test]
#[serial]
#[ignore = "requires DATABASE_URL"]
async fn test_loan_period_is_enforced_by_schema() {
    let pool = common::create_test_pool().await;

    let result = sqlx::query(
        r#"
        INSERT INTO loans (loan_id, user_id, book_id, loan_date, expiry_date, is_active, price)
        VALUES ($1, $2, $3, $4, $5, TRUE, 5.00)
        "#,
    )
    .bind(LoanId::new().value())
    .bind(UserId::new().value())
    .bind(BookId::new().value())
    .bind(t0())
    .bind(t0() + Duration::days(7))
    .execute(&pool)
    .await;

    assert!(result.is_err());
}

#[tokio::test]
#[serial]
#[ignore = "requires DATABASE_URL"]
async fn test_history_is_newest_first() {
    let pool = common::create_test_pool().await;
    let store = PostgresLoanStore::new(pool.clone());

    let user_id = UserId::new();
    let older = new_loan(user_id, BookId::new(), t0());
    let newer = new_loan(user_id, BookId::new(), t0() + Duration::days(5));

    store.insert(&older).await.unwrap();
    store.insert(&newer).await.unwrap();

    let history = store.find_by_user(user_id).await.unwrap();
    assert_eq!(history, vec![newer, older]);

    cleanup_user(&pool, user_id).await;
}

#[tokio::test]
#[serial]
#[ignore = "requires DATABASE_URL"]
async fn test_rented_loan_reads_back_unchanged() {
    let pool = common::create_test_pool().await;
    let ctx = TestContext::with_store(Arc::new(PostgresLoanStore::new(pool.clone())));
    let user_id = ctx.register_user();
    let book_id = ctx.register_book();

    // マイクロ秒未満の端数を持つ時刻
    ctx.clock.set(t0() + Duration::nanoseconds(123_456_789));

    let loan = rent_book(&ctx.deps, RentBook { user_id, book_id })
        .await
        .expect("Failed to rent book");

    let history = get_loan_history(&ctx.deps, user_id).await.unwrap();
    assert_eq!(history, vec![loan.clone()]);

    let active = get_my_active_loans(&ctx.deps, user_id).await.unwrap();
    assert_eq!(active, vec![loan]);

    cleanup_user(&pool, user_id).await;
}

// ============================================================================
// 複数インスタンスからの同時レンタル
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[serial]
#[ignore = "requires DATABASE_URL"]
async fn test_concurrent_rentals_across_instances_allow_exactly_one() {
    let pool = common::create_test_pool().await;
    let store: Arc<dyn LoanStore> = Arc::new(PostgresLoanStore::new(pool.clone()));

    let ctx = TestContext::with_store(store.clone());
    let other_instance = ctx.second_process(Arc::new(PostgresLoanStore::new(pool.clone())));
    let user_id = ctx.register_user();

    let mut handles = Vec::new();
    for i in 0..10 {
        let deps = if i % 2 == 0 {
            ctx.deps.clone()
        } else {
            other_instance.clone()
        };
        let book_id = ctx.register_book();
        handles.push(tokio::spawn(async move {
            rent_book(&deps, RentBook { user_id, book_id }).await
        }));
    }

    let results: Vec<_> = futures::future::join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results.iter().filter(|r| r.is_err()).all(|r| matches!(
        r,
        Err(LoanApplicationError::LoanLimitExceeded)
    )));
    assert_eq!(store.find_by_user(user_id).await.unwrap().len(), 1);

    cleanup_user(&pool, user_id).await;
}
