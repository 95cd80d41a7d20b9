use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{
    expiry_policy::{days_remaining, is_currently_active},
    loan::Loan,
};

/// 貸出レスポンス
///
/// `is_active`は保存フラグではなく、レスポンス作成時点の期限判定を反映する。
#[derive(Debug, Serialize)]
pub struct LoanResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub loan_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
    pub is_active: bool,
    pub price: Decimal,
    pub days_left: i64,
}

impl LoanResponse {
    pub fn from_loan(loan: &Loan, now: DateTime<Utc>) -> Self {
        Self {
            id: loan.loan_id.value(),
            user_id: loan.user_id.value(),
            book_id: loan.book_id.value(),
            loan_date: loan.loan_date,
            expiry_date: loan.expiry_date,
            is_active: loan.is_active && is_currently_active(loan, now),
            price: loan.price,
            days_left: days_remaining(loan, now),
        }
    }

    pub fn from_loans(loans: &[Loan], now: DateTime<Utc>) -> Vec<Self> {
        loans.iter().map(|loan| Self::from_loan(loan, now)).collect()
    }
}

/// エラーレスポンス
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}
