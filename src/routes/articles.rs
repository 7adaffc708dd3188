use crate::{
    error::Result,
    models::article::{ArticleQuery, CreateArticleRequest, UpdateArticleRequest},
    require_staff,
    state::AppState,
    utils::middleware::{OptionalAuth, RequireAuth},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        // 公开读取 + staff 创建
        .route("/", get(list_articles).post(create_article))
        .route(
            "/:id",
            get(get_article).put(update_article).delete(delete_article),
        )
        .route("/:id/like", post(toggle_like))
}

/// 获取文章列表
/// GET /api/articles
pub async fn list_articles(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<ArticleQuery>,
    OptionalAuth(user): OptionalAuth,
) -> Result<Json<Value>> {
    debug!("Fetching articles list with query: {:?}", query);

    let viewer = user.map(|u| u.id);
    let result = app_state.article_service.list_articles(query, viewer).await?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "articles": result.data,
            "pagination": {
                "current_page": result.page,
                "total_pages": result.total_pages,
                "total_items": result.total,
                "items_per_page": result.per_page,
                "has_next": result.page < result.total_pages,
                "has_prev": result.page > 1,
            }
        }
    })))
}

/// 获取文章详情
/// GET /api/articles/:id
pub async fn get_article(
    State(app_state): State<Arc<AppState>>,
    Path(article_id): Path<Uuid>,
    OptionalAuth(user): OptionalAuth,
) -> Result<Json<Value>> {
    debug!("Fetching article: {}", article_id);

    // 点赞状态只在有会话时填充
    let viewer = user.map(|u| u.id);
    let article = app_state
        .article_service
        .get_article(article_id, viewer)
        .await?;

    Ok(Json(json!({
        "success": true,
        "data": article
    })))
}

/// 创建新文章
/// POST /api/articles
pub async fn create_article(
    State(app_state): State<Arc<AppState>>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<CreateArticleRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    debug!("Creating article for user: {}", user.id);

    require_staff!(user);

    let article = app_state
        .article_service
        .create_article(user.id, request)
        .await?;

    info!("Created article: {} by user: {}", article.id, user.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": article,
            "message": "Article created successfully"
        })),
    ))
}

/// 更新文章
/// PUT /api/articles/:id
pub async fn update_article(
    State(app_state): State<Arc<AppState>>,
    Path(article_id): Path<Uuid>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<UpdateArticleRequest>,
) -> Result<Json<Value>> {
    debug!("Updating article: {} by user: {}", article_id, user.id);

    // 所有权检查在服务层：作者或 staff/admin
    let article = app_state
        .article_service
        .update_article(article_id, &user, request)
        .await?;

    info!("Updated article: {} by user: {}", article_id, user.id);

    Ok(Json(json!({
        "success": true,
        "data": article,
        "message": "Article updated successfully"
    })))
}

/// 删除文章
/// DELETE /api/articles/:id
pub async fn delete_article(
    State(app_state): State<Arc<AppState>>,
    Path(article_id): Path<Uuid>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Value>> {
    debug!("Deleting article: {} by user: {}", article_id, user.id);

    app_state
        .article_service
        .delete_article(article_id, &user)
        .await?;

    info!("Deleted article: {} by user: {}", article_id, user.id);

    Ok(Json(json!({
        "success": true,
        "message": "Article deleted successfully"
    })))
}

/// 点赞开关
/// POST /api/articles/:id/like
pub async fn toggle_like(
    State(app_state): State<Arc<AppState>>,
    Path(article_id): Path<Uuid>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Value>> {
    debug!("Toggling like on article: {} by user: {}", article_id, user.id);

    let result = app_state
        .article_service
        .toggle_like(article_id, user.id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "data": result
    })))
}
