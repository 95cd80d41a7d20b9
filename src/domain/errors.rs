/// レンタル承認の拒否理由
///
/// いずれも通常の業務上の否決であり、インフラ障害とは区別される。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RentalRejection {
    /// 利用者が既に有効な貸出を1件持っている
    LoanLimitExceeded,
    /// 他の利用者がこの書籍を貸出中
    BookAlreadyRented,
}
