use crate::domain::value_objects::UserId;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;

use super::{error::ApiError, handlers::AppState};

/// リクエストの呼び出し元
///
/// `Authorization: Bearer <token>`を認証プロバイダで解決した利用者ID。
/// ヘッダがない、またはトークンが無効な場合は匿名（`None`）。
#[derive(Debug, Clone, Copy)]
pub struct Caller(pub Option<UserId>);

impl Caller {
    /// 認証済みの利用者IDを要求する
    pub fn require(self) -> Result<UserId, ApiError> {
        self.0.ok_or(ApiError::Unauthenticated)
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            return Ok(Caller(None));
        };

        let user_id = state
            .identity_provider
            .resolve(token)
            .await
            .map_err(ApiError::IdentityProvider)?;

        Ok(Caller(user_id))
    }
}
