use crate::{
    error::Result,
    models::category::{CreateCategoryRequest, UpdateCategoryRequest},
    require_staff,
    state::AppState,
    utils::middleware::RequireAuth,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/:id",
            get(get_category).put(update_category).delete(delete_category),
        )
}

/// 获取分类列表
/// GET /api/categories
pub async fn list_categories(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Value>> {
    debug!("Fetching categories list");

    let categories = app_state.category_service.list_categories().await?;

    Ok(Json(json!({
        "success": true,
        "data": categories
    })))
}

/// 获取分类详情
/// GET /api/categories/:id
pub async fn get_category(
    State(app_state): State<Arc<AppState>>,
    Path(category_id): Path<Uuid>,
) -> Result<Json<Value>> {
    debug!("Fetching category: {}", category_id);

    let category = app_state.category_service.get_category(category_id).await?;

    Ok(Json(json!({
        "success": true,
        "data": category
    })))
}

/// 创建分类
/// POST /api/categories
pub async fn create_category(
    State(app_state): State<Arc<AppState>>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    debug!("Creating category by user: {}", user.id);

    require_staff!(user);

    let category = app_state.category_service.create_category(request).await?;

    info!("Created category: {} by user: {}", category.id, user.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": category,
            "message": "Category created successfully"
        })),
    ))
}

/// 更新分类
/// PUT /api/categories/:id
pub async fn update_category(
    State(app_state): State<Arc<AppState>>,
    Path(category_id): Path<Uuid>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<UpdateCategoryRequest>,
) -> Result<Json<Value>> {
    debug!("Updating category: {} by user: {}", category_id, user.id);

    require_staff!(user);

    let category = app_state
        .category_service
        .update_category(category_id, request)
        .await?;

    info!("Updated category: {} by user: {}", category_id, user.id);

    Ok(Json(json!({
        "success": true,
        "data": category,
        "message": "Category updated successfully"
    })))
}

/// 删除分类
/// DELETE /api/categories/:id
pub async fn delete_category(
    State(app_state): State<Arc<AppState>>,
    Path(category_id): Path<Uuid>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Value>> {
    debug!("Deleting category: {} by user: {}", category_id, user.id);

    require_staff!(user);

    app_state.category_service.delete_category(category_id).await?;

    info!("Deleted category: {} by user: {}", category_id, user.id);

    Ok(Json(json!({
        "success": true,
        "message": "Category deleted successfully"
    })))
}
