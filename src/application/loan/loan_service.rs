use crate::domain::{
    self, commands::RentBook, expiry_policy::is_currently_active, loan::Loan, value_objects::*,
};
use crate::ports::{
    book_service::{BookService, BookSummary},
    clock::Clock,
    loan_store::LoanStore,
    user_service::UserService,
};
use chrono::SubsecRound;
use std::sync::Arc;

use super::errors::{LoanApplicationError, Result};
use super::rental_locks::RentalLocks;

/// サービスの依存関係
///
/// 関数型DDDの原則に従い、データ構造として定義。
/// 振る舞い（メソッド）は持たず、純粋な関数に依存関係を渡す。
/// 時計もここから注入するため、テストで時刻を固定・前進できる。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub loan_store: Arc<dyn LoanStore>,
    pub user_service: Arc<dyn UserService>,
    pub book_service: Arc<dyn BookService>,
    pub clock: Arc<dyn Clock>,
    pub rental_locks: Arc<RentalLocks>,
}

async fn ensure_user_exists(deps: &ServiceDependencies, user_id: UserId) -> Result<()> {
    let exists = deps
        .user_service
        .exists(user_id)
        .await
        .map_err(LoanApplicationError::UserServiceError)?;

    if !exists {
        return Err(LoanApplicationError::UserNotFound);
    }
    Ok(())
}

async fn find_book(deps: &ServiceDependencies, book_id: BookId) -> Result<BookSummary> {
    deps.book_service
        .find_book(book_id)
        .await
        .map_err(LoanApplicationError::BookServiceError)?
        .ok_or(LoanApplicationError::BookNotFound)
}

/// 失敗をログに残して結果をそのまま返す
///
/// インフラ障害は詳細を含めてerror、業務上の否決はdebug。
/// 利用者ID・書籍IDは呼び出し元のspanに載っている。
fn logged<T>(operation: &'static str, result: Result<T>) -> Result<T> {
    if let Err(err) = &result {
        if err.is_retryable() {
            let cause = std::error::Error::source(err)
                .map(|source| source.to_string())
                .unwrap_or_default();
            tracing::error!(operation, error = %err, cause = %cause, "loan operation failed");
        } else {
            tracing::debug!(operation, reason = %err, "loan operation rejected");
        }
    }
    result
}

/// 判定から保存までの1回分
///
/// 呼び出し側が排他区間を保持していること。
async fn authorize_and_record(deps: &ServiceDependencies, cmd: &RentBook) -> Result<Loan> {
    // 保存先の精度（マイクロ秒）に揃える
    let now = deps.clock.now().trunc_subsecs(6);

    let user_loans = deps
        .loan_store
        .find_flagged_active_by_user(cmd.user_id)
        .await?;
    let book_loans = deps
        .loan_store
        .find_flagged_active_by_book(cmd.book_id)
        .await?;

    let loan =
        domain::rental::authorize_rental(cmd.user_id, cmd.book_id, now, &user_loans, &book_loans)?;

    deps.loan_store.insert(&loan).await?;

    tracing::info!(
        loan_id = %loan.loan_id,
        expiry_date = %loan.expiry_date,
        "loan created"
    );
    Ok(loan)
}

/// 書籍をレンタルする
///
/// ビジネスルール：
/// - 利用者が存在すること
/// - 書籍が存在し、カタログ上貸出可能であること
/// - 利用者の有効な貸出が0件であること
/// - 他の利用者がこの書籍を有効に借りていないこと
///
/// # 一貫性保証
///
/// 判定と保存は利用者・書籍ごとの排他区間内で行う。さらにLoanStoreは
/// 重複する有効な貸出の保存を`Conflict`で拒否する（別プロセスとの競合）。
/// 競合時は判定からやり直すのを1回だけ行い、それでも競合すれば
/// `StorageConflict`（再試行可能）を返す。上限超過として報告することはない。
///
/// # 戻り値
/// 作成された貸出
#[tracing::instrument(skip_all, fields(user_id = %cmd.user_id, book_id = %cmd.book_id))]
pub async fn rent_book(deps: &ServiceDependencies, cmd: RentBook) -> Result<Loan> {
    logged("rent_book", rent_book_checked(deps, cmd).await)
}

async fn rent_book_checked(deps: &ServiceDependencies, cmd: RentBook) -> Result<Loan> {
    // 1. 利用者の存在確認
    ensure_user_exists(deps, cmd.user_id).await?;

    // 2. 書籍の存在・貸出可否確認
    let book = find_book(deps, cmd.book_id).await?;
    if !book.available {
        return Err(LoanApplicationError::BookUnavailable);
    }

    // 3. 排他区間に入る（利用者 → 書籍の順）
    let _guard = deps.rental_locks.acquire(cmd.user_id, cmd.book_id).await;

    // 4. 判定と保存。競合時は1回だけやり直す
    match authorize_and_record(deps, &cmd).await {
        Err(LoanApplicationError::StorageConflict) => {
            tracing::warn!("concurrent rental detected by loan store, retrying once");
            authorize_and_record(deps, &cmd).await
        }
        other => other,
    }
}

/// 自分の有効な貸出を取得する
///
/// 保存上有効な貸出を期限で再判定し、現在有効なものだけを返す。
#[tracing::instrument(skip_all, fields(user_id = %user_id))]
pub async fn get_my_active_loans(deps: &ServiceDependencies, user_id: UserId) -> Result<Vec<Loan>> {
    logged(
        "get_my_active_loans",
        my_active_loans(deps, user_id).await,
    )
}

async fn my_active_loans(deps: &ServiceDependencies, user_id: UserId) -> Result<Vec<Loan>> {
    ensure_user_exists(deps, user_id).await?;

    let now = deps.clock.now();
    let loans = deps.loan_store.find_flagged_active_by_user(user_id).await?;

    Ok(loans
        .into_iter()
        .filter(|loan| is_currently_active(loan, now))
        .collect())
}

/// すべての有効な貸出を取得する（管理者向け）
///
/// 権限チェックは行わない（認可は認証コンテキストの責務）。
/// 保存フラグだけでなく期限でも絞り込む。
#[tracing::instrument(skip_all)]
pub async fn get_all_active_loans(deps: &ServiceDependencies) -> Result<Vec<Loan>> {
    logged("get_all_active_loans", all_active_loans(deps).await)
}

async fn all_active_loans(deps: &ServiceDependencies) -> Result<Vec<Loan>> {
    let now = deps.clock.now();
    let loans = deps.loan_store.find_all_flagged_active().await?;

    Ok(loans
        .into_iter()
        .filter(|loan| is_currently_active(loan, now))
        .collect())
}

/// 呼び出し元がこの書籍を現在借りているか
///
/// 匿名の呼び出し元（`None`）には、どの依存にも触れずに`false`を返す。
#[tracing::instrument(skip_all, fields(user_id = ?caller, book_id = %book_id))]
pub async fn is_book_rented_by_user(
    deps: &ServiceDependencies,
    caller: Option<UserId>,
    book_id: BookId,
) -> Result<bool> {
    let Some(user_id) = caller else {
        return Ok(false);
    };

    logged(
        "is_book_rented_by_user",
        book_rented_by(deps, user_id, book_id).await,
    )
}

async fn book_rented_by(deps: &ServiceDependencies, user_id: UserId, book_id: BookId) -> Result<bool> {
    ensure_user_exists(deps, user_id).await?;
    find_book(deps, book_id).await?;

    let now = deps.clock.now();
    let loans = deps
        .loan_store
        .find_flagged_active_by_user_and_book(user_id, book_id)
        .await?;

    Ok(loans.iter().any(|loan| is_currently_active(loan, now)))
}

/// 利用者の貸出履歴を取得する（新しい順、期限切れも含む）
#[tracing::instrument(skip_all, fields(user_id = %user_id))]
pub async fn get_loan_history(deps: &ServiceDependencies, user_id: UserId) -> Result<Vec<Loan>> {
    logged("get_loan_history", loan_history(deps, user_id).await)
}

async fn loan_history(deps: &ServiceDependencies, user_id: UserId) -> Result<Vec<Loan>> {
    ensure_user_exists(deps, user_id).await?;
    Ok(deps.loan_store.find_by_user(user_id).await?)
}
