use crate::domain::value_objects::UserId;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 利用者サービスポート
///
/// 貸出コンテキストと利用者コンテキストの境界を維持する。
/// 貸出コンテキストはUserIDのみを知り、利用者詳細は知らない。
#[async_trait]
pub trait UserService: Send + Sync {
    /// 利用者が存在するか確認する
    ///
    /// レンタル作成前と照会前のバリデーションに使用される。
    async fn exists(&self, user_id: UserId) -> Result<bool>;
}
