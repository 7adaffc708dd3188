use crate::{error::AppError, services::auth::User, state::AppState};
use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

/// 认证中间件
/// 令牌有效时把用户放进请求扩展，无令牌或令牌无效的请求按匿名继续
pub async fn auth_middleware(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request<Body>,
    next: Next<Body>,
) -> Result<Response, AppError> {
    if let Some(auth_header) = headers.get("authorization") {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                match app_state.auth_service.verify_token(token) {
                    Ok(user) => {
                        debug!("Authenticated user: {} ({})", user.id, user.email);
                        request.extensions_mut().insert(user);
                    }
                    Err(e) => {
                        debug!("Token verification failed: {}", e);
                        // 不返回错误，让请求继续处理（作为未认证请求）
                    }
                }
            }
        }
    }

    Ok(next.run(request).await)
}

/// 可选认证提取器
pub struct OptionalAuth(pub Option<User>);

#[async_trait::async_trait]
impl<S> axum::extract::FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let user = parts.extensions.get::<User>().cloned();
        Ok(OptionalAuth(user))
    }
}

/// 必需认证提取器，未登录请求拒绝为 401
pub struct RequireAuth(pub User);

#[async_trait::async_trait]
impl<S> axum::extract::FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<User>()
            .cloned()
            .ok_or_else(|| AppError::Authentication("Authentication required".to_string()))?;
        Ok(RequireAuth(user))
    }
}
