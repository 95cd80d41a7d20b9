use serde::{Deserialize, Serialize};

use super::{BookId, UserId};

/// コマンド：書籍をレンタルする
///
/// 貸出日時はコマンドではなく、サービスに注入されたClockから決まる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentBook {
    pub user_id: UserId,
    pub book_id: BookId,
}
