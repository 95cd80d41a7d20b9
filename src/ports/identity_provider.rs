use crate::domain::value_objects::UserId;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 認証プロバイダポート
///
/// リクエストの資格情報（Bearerトークン）を安定した利用者IDに解決する。
/// 認証方式そのものは貸出コンテキストの関心外。
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// トークンを利用者IDに解決する
    ///
    /// 無効なトークンは`None`（匿名扱い）。
    async fn resolve(&self, token: &str) -> Result<Option<UserId>>;
}
