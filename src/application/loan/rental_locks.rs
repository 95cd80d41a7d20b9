use crate::domain::value_objects::{BookId, UserId};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// 空きスロットの掃除を始めるテーブルサイズ
const PRUNE_THRESHOLD: usize = 1024;

/// キーごとの排他区間
struct KeyedMutex<K> {
    slots: Mutex<HashMap<K, Arc<AsyncMutex<()>>>>,
}

impl<K: Eq + Hash + Copy> KeyedMutex<K> {
    fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    async fn lock(&self, key: K) -> OwnedMutexGuard<()> {
        let slot = {
            let mut slots = self
                .slots
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());

            if slots.len() >= PRUNE_THRESHOLD {
                // 誰も保持・待機していないスロットはテーブルからしか参照されない
                slots.retain(|_, slot| Arc::strong_count(slot) > 1);
            }

            Arc::clone(slots.entry(key).or_default())
        };

        slot.lock_owned().await
    }

    fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

/// レンタル承認の排他制御
///
/// 「有効な貸出を数える → 判定 → 保存」を、同じ利用者・同じ書籍について
/// 直列化する。ロックは常に利用者 → 書籍の順で取得するため、
/// 異なる組み合わせのリクエスト同士でデッドロックしない。
pub struct RentalLocks {
    users: KeyedMutex<UserId>,
    books: KeyedMutex<BookId>,
}

/// 保持中の排他区間。dropで解放される。
pub struct RentalGuard {
    _user: OwnedMutexGuard<()>,
    _book: OwnedMutexGuard<()>,
}

impl RentalLocks {
    pub fn new() -> Self {
        Self {
            users: KeyedMutex::new(),
            books: KeyedMutex::new(),
        }
    }

    /// 利用者と書籍の両方の排他区間に入る
    pub async fn acquire(&self, user_id: UserId, book_id: BookId) -> RentalGuard {
        let user = self.users.lock(user_id).await;
        let book = self.books.lock(book_id).await;
        RentalGuard {
            _user: user,
            _book: book,
        }
    }

    /// 現在テーブルにあるスロット数（利用者, 書籍）
    pub fn slot_counts(&self) -> (usize, usize) {
        (self.users.len(), self.books.len())
    }
}

impl Default for RentalLocks {
    fn default() -> Self {
        Self::new()
    }
}
