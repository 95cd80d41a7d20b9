use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{BookId, LoanId, UserId};

/// 1回のレンタル料金（5.00）
///
/// 記録のみで課金処理は行わない。
pub fn rental_fee() -> Decimal {
    Decimal::new(500, 2)
}

/// Loanエンティティ - 1冊の書籍の1回のレンタル
///
/// 作成後に変化するフィールドはない。`is_active`は作成時に`true`となる
/// 保存上のヒントにすぎず、現在有効かどうかは常に
/// [`super::expiry_policy::is_currently_active`]で判定する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    // 識別子
    pub loan_id: LoanId,

    // 他の集約への参照（IDのみ）
    pub user_id: UserId,
    pub book_id: BookId,

    // 貸出期間
    pub loan_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,

    pub is_active: bool,
    pub price: Decimal,
}
