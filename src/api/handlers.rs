use crate::application::loan::{
    ServiceDependencies, get_all_active_loans as execute_get_all_active_loans,
    get_loan_history as execute_get_loan_history,
    get_my_active_loans as execute_get_my_active_loans,
    is_book_rented_by_user as execute_is_book_rented_by_user, rent_book as execute_rent_book,
};
use crate::domain::{commands::RentBook, value_objects::BookId};
use crate::ports::identity_provider::IdentityProvider;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use uuid::Uuid;

use super::{error::ApiError, extract::Caller, types::LoanResponse};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
    pub identity_provider: Arc<dyn IdentityProvider>,
}

// ============================================================================
// Command handlers (POST)
// ============================================================================

/// POST /loans/rent/:book_id - 書籍をレンタル
///
/// 強制されるビジネスルール:
/// - 認証済みであること
/// - 書籍が存在し貸出可能であること
/// - 有効な貸出が0件であること（1冊まで）
pub async fn rent_book(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(book_id): Path<Uuid>,
) -> Result<(StatusCode, Json<LoanResponse>), ApiError> {
    let cmd = RentBook {
        user_id: caller.require()?,
        book_id: BookId::from_uuid(book_id),
    };

    let loan = execute_rent_book(&state.service_deps, cmd).await?;
    let now = state.service_deps.clock.now();

    Ok((StatusCode::CREATED, Json(LoanResponse::from_loan(&loan, now))))
}

// ============================================================================
// Query handlers (GET)
// ============================================================================

/// GET /loans/my-books - 自分の有効な貸出
pub async fn my_books(
    State(state): State<Arc<AppState>>,
    caller: Caller,
) -> Result<Json<Vec<LoanResponse>>, ApiError> {
    let loans = execute_get_my_active_loans(&state.service_deps, caller.require()?).await?;
    let now = state.service_deps.clock.now();

    Ok(Json(LoanResponse::from_loans(&loans, now)))
}

/// GET /loans/history - 自分の貸出履歴（期限切れを含む）
pub async fn loan_history(
    State(state): State<Arc<AppState>>,
    caller: Caller,
) -> Result<Json<Vec<LoanResponse>>, ApiError> {
    let loans = execute_get_loan_history(&state.service_deps, caller.require()?).await?;
    let now = state.service_deps.clock.now();

    Ok(Json(LoanResponse::from_loans(&loans, now)))
}

/// GET /loans/admin/active - すべての有効な貸出
///
/// 管理者権限の確認は認証・認可側（ゲートウェイ等）に委ねる。
pub async fn admin_active_loans(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<LoanResponse>>, ApiError> {
    let loans = execute_get_all_active_loans(&state.service_deps).await?;
    let now = state.service_deps.clock.now();

    Ok(Json(LoanResponse::from_loans(&loans, now)))
}

/// GET /loans/check/:book_id - 呼び出し元がこの書籍を借りているか
///
/// 未ログインの場合は常にfalse。
pub async fn check_loan_status(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Path(book_id): Path<Uuid>,
) -> Result<Json<bool>, ApiError> {
    let rented =
        execute_is_book_rented_by_user(&state.service_deps, caller, BookId::from_uuid(book_id))
            .await?;

    Ok(Json(rented))
}
