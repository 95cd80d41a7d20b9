use chrono::{DateTime, Duration, Utc};

use super::loan::Loan;

/// 貸出期間（日数）
pub const LOAN_PERIOD_DAYS: i64 = 3;

/// 純粋関数：返却期限を計算する
///
/// 貸出開始 + 3日間。
pub fn compute_expiry(loan_start: DateTime<Utc>) -> DateTime<Utc> {
    loan_start + Duration::days(LOAN_PERIOD_DAYS)
}

/// 純粋関数：貸出が現時点で有効か
///
/// 保存された`is_active`フラグは見ない。読み取り経路はすべてこの判定を使う。
pub fn is_currently_active(loan: &Loan, now: DateTime<Utc>) -> bool {
    loan.expiry_date > now
}

/// 純粋関数：残り日数（切り上げ、期限切れなら0）
pub fn days_remaining(loan: &Loan, now: DateTime<Utc>) -> i64 {
    let remaining = loan.expiry_date - now;
    if remaining <= Duration::zero() {
        return 0;
    }

    let day_ms = Duration::days(1).num_milliseconds();
    (remaining.num_milliseconds() + day_ms - 1) / day_ms
}
