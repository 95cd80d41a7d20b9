use crate::domain::value_objects::BookId;
use crate::ports::book_service::{BookService as BookServiceTrait, BookSummary, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// BookServiceのモック実装
///
/// 書籍IDと貸出可否を保存することで状態を持ったテストをサポート。
pub struct BookService {
    books: Mutex<HashMap<BookId, bool>>,
}

impl BookService {
    pub fn new() -> Self {
        Self {
            books: Mutex::new(HashMap::new()),
        }
    }

    /// テスト用に貸出可能な書籍を登録
    pub fn add_available_book(&self, book_id: BookId) {
        self.books.lock().unwrap().insert(book_id, true);
    }

    /// テスト用に流通から外された書籍を登録
    pub fn add_unavailable_book(&self, book_id: BookId) {
        self.books.lock().unwrap().insert(book_id, false);
    }
}

impl Default for BookService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookServiceTrait for BookService {
    /// 登録された書籍を返す
    async fn find_book(&self, book_id: BookId) -> Result<Option<BookSummary>> {
        Ok(self
            .books
            .lock()
            .unwrap()
            .get(&book_id)
            .map(|&available| BookSummary { book_id, available }))
    }
}
