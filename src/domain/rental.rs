use chrono::{DateTime, Utc};

use super::{
    BookId, LoanId, RentalRejection, UserId,
    expiry_policy::{compute_expiry, is_currently_active},
    loan::{Loan, rental_fee},
};

/// 利用者1人あたりの同時有効貸出数
pub const MAX_ACTIVE_LOANS_PER_USER: usize = 1;

/// 純粋関数：レンタルを承認し、新しいLoanを生成する
///
/// ビジネスルール：
/// - 利用者の有効な貸出は1件まで（保存フラグではなく期限で再判定）
/// - 他の利用者が有効な貸出を持つ書籍は貸し出せない
/// - 貸出期間は3日間、料金は固定
///
/// 副作用なし。`user_loans`と`book_loans`は保存上`is_active`の貸出。
/// 呼び出し側は判定から永続化までを排他区間で行うこと。
pub fn authorize_rental(
    user_id: UserId,
    book_id: BookId,
    now: DateTime<Utc>,
    user_loans: &[Loan],
    book_loans: &[Loan],
) -> Result<Loan, RentalRejection> {
    let active_for_user = user_loans
        .iter()
        .filter(|loan| loan.user_id == user_id && is_currently_active(loan, now))
        .count();

    if active_for_user >= MAX_ACTIVE_LOANS_PER_USER {
        return Err(RentalRejection::LoanLimitExceeded);
    }

    let book_taken = book_loans
        .iter()
        .any(|loan| loan.book_id == book_id && is_currently_active(loan, now));

    if book_taken {
        return Err(RentalRejection::BookAlreadyRented);
    }

    Ok(Loan {
        loan_id: LoanId::new(),
        user_id,
        book_id,
        loan_date: now,
        expiry_date: compute_expiry(now),
        is_active: true,
        price: rental_fee(),
    })
}
