use crate::domain::value_objects::BookId;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 貸出コンテキストから見た書籍の最小情報
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookSummary {
    pub book_id: BookId,
    /// カタログ上の貸出可否（管理者が書籍を流通から外した場合はfalse）
    pub available: bool,
}

/// 書籍サービスポート
///
/// 貸出コンテキストとカタログコンテキストの境界を維持する。
/// 貸出コンテキストはBookIDと貸出可否フラグのみを知り、書籍詳細は知らない。
#[async_trait]
pub trait BookService: Send + Sync {
    /// IDで書籍を取得する
    ///
    /// 存在しない場合は`None`。
    async fn find_book(&self, book_id: BookId) -> Result<Option<BookSummary>>;
}
