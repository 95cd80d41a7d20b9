use crate::domain::RentalRejection;
use crate::ports::loan_store::LoanStoreError;
use thiserror::Error;

/// 貸出管理アプリケーション層のエラー
#[derive(Debug, Error)]
pub enum LoanApplicationError {
    /// 利用者が存在しない
    #[error("User not found")]
    UserNotFound,

    /// 書籍が存在しない
    #[error("Book not found")]
    BookNotFound,

    /// 書籍がカタログ上貸出不可
    #[error("Book is not available for loan")]
    BookUnavailable,

    /// 他の利用者が貸出中
    #[error("Book is currently rented by another user")]
    BookAlreadyRented,

    /// 有効な貸出の上限（1冊）に達している
    #[error("Loan limit exceeded (only 1 active book at a time)")]
    LoanLimitExceeded,

    /// 再試行後も同時書き込みの競合が解消しなかった
    #[error("Concurrent rental conflict")]
    StorageConflict,

    /// LoanStoreのエラー
    #[error("Loan store error")]
    LoanStoreError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// UserServiceのエラー
    #[error("User service error")]
    UserServiceError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// BookServiceのエラー
    #[error("Book service error")]
    BookServiceError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl LoanApplicationError {
    /// 呼び出し側が再試行してよいエラーか
    ///
    /// 業務上の否決（上限超過など）はfalse。
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LoanApplicationError::StorageConflict
                | LoanApplicationError::LoanStoreError(_)
                | LoanApplicationError::UserServiceError(_)
                | LoanApplicationError::BookServiceError(_)
        )
    }
}

impl From<RentalRejection> for LoanApplicationError {
    fn from(rejection: RentalRejection) -> Self {
        match rejection {
            RentalRejection::LoanLimitExceeded => LoanApplicationError::LoanLimitExceeded,
            RentalRejection::BookAlreadyRented => LoanApplicationError::BookAlreadyRented,
        }
    }
}

impl From<LoanStoreError> for LoanApplicationError {
    fn from(err: LoanStoreError) -> Self {
        match err {
            LoanStoreError::Conflict => LoanApplicationError::StorageConflict,
            LoanStoreError::Unavailable(source) => LoanApplicationError::LoanStoreError(source),
        }
    }
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, LoanApplicationError>;
