use crate::{
    error::Result,
    models::staff::{CreateStaffRequest, UpdateStaffRequest},
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
        .route("/", get(list_staff).post(create_staff))
        .route("/:id", get(get_staff).put(update_staff).delete(delete_staff))
}

/// 公开的团队名册
/// GET /api/staff
pub async fn list_staff(State(app_state): State<Arc<AppState>>) -> Result<Json<Value>> {
    debug!("Fetching staff roster");

    let members = app_state.staff_service.list_staff().await?;

    Ok(Json(json!({
        "success": true,
        "data": members
    })))
}

/// 获取成员详情
/// GET /api/staff/:id
pub async fn get_staff(
    State(app_state): State<Arc<AppState>>,
    Path(staff_id): Path<Uuid>,
) -> Result<Json<Value>> {
    debug!("Fetching staff member: {}", staff_id);

    let member = app_state.staff_service.get_staff(staff_id).await?;

    Ok(Json(json!({
        "success": true,
        "data": member
    })))
}

/// 新增成员
/// POST /api/staff
pub async fn create_staff(
    State(app_state): State<Arc<AppState>>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<CreateStaffRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    debug!("Creating staff member by user: {}", user.id);

    require_staff!(user);

    let member = app_state.staff_service.create_staff(request).await?;

    info!("Created staff member: {} by user: {}", member.id, user.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": member,
            "message": "Staff member created successfully"
        })),
    ))
}

/// 更新成员
/// PUT /api/staff/:id
pub async fn update_staff(
    State(app_state): State<Arc<AppState>>,
    Path(staff_id): Path<Uuid>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<UpdateStaffRequest>,
) -> Result<Json<Value>> {
    debug!("Updating staff member: {} by user: {}", staff_id, user.id);

    require_staff!(user);

    let member = app_state.staff_service.update_staff(staff_id, request).await?;

    info!("Updated staff member: {} by user: {}", staff_id, user.id);

    Ok(Json(json!({
        "success": true,
        "data": member,
        "message": "Staff member updated successfully"
    })))
}

/// 删除成员
/// DELETE /api/staff/:id
pub async fn delete_staff(
    State(app_state): State<Arc<AppState>>,
    Path(staff_id): Path<Uuid>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Value>> {
    debug!("Deleting staff member: {} by user: {}", staff_id, user.id);

    require_staff!(user);

    app_state.staff_service.delete_staff(staff_id).await?;

    info!("Deleted staff member: {} by user: {}", staff_id, user.id);

    Ok(Json(json!({
        "success": true,
        "message": "Staff member deleted successfully"
    })))
}
