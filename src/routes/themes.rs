use crate::{
    error::Result,
    models::theme::{CreateThemeRequest, UpdateThemeRequest},
    require_staff,
    state::AppState,
    utils::middleware::RequireAuth,
};
use axum::{
    extract::{Path, State},
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
        .route("/", get(list_themes).post(create_theme))
        .route("/active", get(get_active_theme))
        .route("/:id", get(get_theme).put(update_theme).delete(delete_theme))
        .route("/:id/activate", post(activate_theme))
}

/// 主题列表
/// GET /api/themes
pub async fn list_themes(State(app_state): State<Arc<AppState>>) -> Result<Json<Value>> {
    debug!("Fetching themes list");

    let themes = app_state.theme_service.list_themes().await?;

    Ok(Json(json!({
        "success": true,
        "data": themes
    })))
}

/// 当前激活的主题
/// GET /api/themes/active
pub async fn get_active_theme(State(app_state): State<Arc<AppState>>) -> Result<Json<Value>> {
    debug!("Fetching active theme");

    let theme = app_state.theme_service.get_active_theme().await?;

    Ok(Json(json!({
        "success": true,
        "data": theme
    })))
}

/// 主题详情
/// GET /api/themes/:id
pub async fn get_theme(
    State(app_state): State<Arc<AppState>>,
    Path(theme_id): Path<Uuid>,
) -> Result<Json<Value>> {
    debug!("Fetching theme: {}", theme_id);

    let theme = app_state.theme_service.get_theme(theme_id).await?;

    Ok(Json(json!({
        "success": true,
        "data": theme
    })))
}

/// 创建主题
/// POST /api/themes
pub async fn create_theme(
    State(app_state): State<Arc<AppState>>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<CreateThemeRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    debug!("Creating theme by user: {}", user.id);

    require_staff!(user);

    let theme = app_state.theme_service.create_theme(request).await?;

    info!("Created theme: {} by user: {}", theme.id, user.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": theme,
            "message": "Theme created successfully"
        })),
    ))
}

/// 更新主题
/// PUT /api/themes/:id
pub async fn update_theme(
    State(app_state): State<Arc<AppState>>,
    Path(theme_id): Path<Uuid>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<UpdateThemeRequest>,
) -> Result<Json<Value>> {
    debug!("Updating theme: {} by user: {}", theme_id, user.id);

    require_staff!(user);

    let theme = app_state.theme_service.update_theme(theme_id, request).await?;

    info!("Updated theme: {} by user: {}", theme_id, user.id);

    Ok(Json(json!({
        "success": true,
        "data": theme,
        "message": "Theme updated successfully"
    })))
}

/// 激活主题
/// POST /api/themes/:id/activate
pub async fn activate_theme(
    State(app_state): State<Arc<AppState>>,
    Path(theme_id): Path<Uuid>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Value>> {
    debug!("Activating theme: {} by user: {}", theme_id, user.id);

    require_staff!(user);

    let theme = app_state.theme_service.activate_theme(theme_id).await?;

    info!("Activated theme: {} by user: {}", theme_id, user.id);

    Ok(Json(json!({
        "success": true,
        "data": theme,
        "message": "Theme activated successfully"
    })))
}

/// 删除主题
/// DELETE /api/themes/:id
pub async fn delete_theme(
    State(app_state): State<Arc<AppState>>,
    Path(theme_id): Path<Uuid>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Value>> {
    debug!("Deleting theme: {} by user: {}", theme_id, user.id);

    require_staff!(user);

    app_state.theme_service.delete_theme(theme_id).await?;

    info!("Deleted theme: {} by user: {}", theme_id, user.id);

    Ok(Json(json!({
        "success": true,
        "message": "Theme deleted successfully"
    })))
}
