use crate::{error::Result, state::AppState};
use axum::{extract::State, response::Json, routing::get, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/now-playing", get(now_playing))
}

/// 当前播放信息，前端播放器轮询这个端点
/// GET /api/station/now-playing
pub async fn now_playing(State(app_state): State<Arc<AppState>>) -> Result<Json<Value>> {
    debug!("Fetching now playing info");

    let now_playing = app_state.station_service.now_playing().await?;

    Ok(Json(json!({
        "success": true,
        "data": now_playing
    })))
}
