use crate::application::loan::LoanApplicationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーと認証の失敗を、HTTPレスポンスへマッピングする。
#[derive(Debug)]
pub enum ApiError {
    /// アプリケーション層のエラー
    Application(LoanApplicationError),
    /// 認証が必要な操作に資格情報がない、または無効
    Unauthenticated,
    /// 認証プロバイダに到達できない
    IdentityProvider(Box<dyn std::error::Error + Send + Sync>),
}

impl From<LoanApplicationError> for ApiError {
    fn from(err: LoanApplicationError) -> Self {
        ApiError::Application(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            // 401 Unauthorized
            ApiError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHENTICATED",
                "Authentication required",
            ),
            ApiError::IdentityProvider(ref e) => {
                tracing::error!("Identity provider error: {}", e);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SERVICE_UNAVAILABLE",
                    "Service temporarily unavailable, please retry",
                )
            }
            ApiError::Application(ref err) => application_error_parts(err),
        };

        let body = Json(ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}

fn application_error_parts(
    err: &LoanApplicationError,
) -> (StatusCode, &'static str, &'static str) {
    match err {
        // 404 Not Found - 参照先が存在しない
        LoanApplicationError::UserNotFound => {
            (StatusCode::NOT_FOUND, "USER_NOT_FOUND", "User not found")
        }
        LoanApplicationError::BookNotFound => {
            (StatusCode::NOT_FOUND, "BOOK_NOT_FOUND", "Book not found")
        }

        // 409 Conflict - ビジネスルールによる否決
        LoanApplicationError::BookUnavailable => (
            StatusCode::CONFLICT,
            "BOOK_NOT_AVAILABLE",
            "Book is not available for loan",
        ),
        LoanApplicationError::BookAlreadyRented => (
            StatusCode::CONFLICT,
            "BOOK_ALREADY_RENTED",
            "Book is currently rented by another user",
        ),
        LoanApplicationError::LoanLimitExceeded => (
            StatusCode::CONFLICT,
            "LOAN_LIMIT_EXCEEDED",
            "Limit reached: you can only have 1 active book at a time",
        ),

        // 503 Service Unavailable - 再試行可能な障害
        // 詳細はサービス層でログ済み。クライアントには一般的なメッセージのみを返す
        LoanApplicationError::StorageConflict
        | LoanApplicationError::LoanStoreError(_)
        | LoanApplicationError::UserServiceError(_)
        | LoanApplicationError::BookServiceError(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "SERVICE_UNAVAILABLE",
            "Service temporarily unavailable, please retry",
        ),
    }
}
