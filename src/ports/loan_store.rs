use crate::domain::{
    loan::Loan,
    value_objects::{BookId, UserId},
};
use async_trait::async_trait;
use thiserror::Error;

/// 貸出ストアのエラー
///
/// 競合はリトライで解消しうる通常の信号、それ以外はインフラ障害として区別する。
#[derive(Debug, Error)]
pub enum LoanStoreError {
    /// 同時書き込みを検出した（同じ利用者・書籍の有効な貸出が既に記録済み、またはID重複）
    #[error("conflicting loan already recorded")]
    Conflict,

    /// ストレージに到達できない、またはクエリが失敗した
    #[error("loan store unavailable")]
    Unavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, LoanStoreError>;

/// 貸出ストアポート
///
/// 貸出記録の永続的なコレクション。貸出は追加のみで、更新・削除はない。
#[async_trait]
pub trait LoanStore: Send + Sync {
    /// 新しい貸出を保存する
    ///
    /// 同じ利用者、または同じ書籍に、保存上有効かつ`loan.loan_date`より後に
    /// 期限を迎える貸出が既にある場合は`LoanStoreError::Conflict`を返し、何も書き込まない。
    /// 判定と書き込みはストア内で不可分に行われる。
    async fn insert(&self, loan: &Loan) -> Result<()>;

    /// 利用者の保存上有効な貸出を取得する
    async fn find_flagged_active_by_user(&self, user_id: UserId) -> Result<Vec<Loan>>;

    /// 書籍の保存上有効な貸出を取得する
    async fn find_flagged_active_by_book(&self, book_id: BookId) -> Result<Vec<Loan>>;

    /// (利用者, 書籍)の組で保存上有効な貸出を取得する
    async fn find_flagged_active_by_user_and_book(
        &self,
        user_id: UserId,
        book_id: BookId,
    ) -> Result<Vec<Loan>>;

    /// 保存上有効なすべての貸出を取得する
    ///
    /// 管理者向け一覧に使用される。
    async fn find_all_flagged_active(&self) -> Result<Vec<Loan>>;

    /// 利用者の全貸出を取得する（新しい順）
    ///
    /// 貸出履歴表示に使用される。
    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Loan>>;
}
