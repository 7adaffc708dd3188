use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StaffMember {
    pub id: Uuid,
    /// 关联 OnAir-Auth 的用户，用于把文章作者映射到名册
    pub user_id: Option<Uuid>,
    pub name: String,
    pub role_title: String,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateStaffRequest {
    pub user_id: Option<Uuid>,

    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(length(min = 1, max = 100))]
    pub role_title: String,

    #[validate(length(max = 1000))]
    pub bio: Option<String>,

    #[validate(url)]
    pub photo_url: Option<String>,

    pub display_order: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdateStaffRequest {
    pub user_id: Option<Uuid>,

    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub role_title: Option<String>,

    #[validate(length(max = 1000))]
    pub bio: Option<String>,

    #[validate(url)]
    pub photo_url: Option<String>,

    pub display_order: Option<i32>,
}
