use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

static COLOR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").unwrap());

/// 站点视觉主题，同一时刻只有一个激活
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Theme {
    pub id: Uuid,
    pub name: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub background_color: String,
    pub text_color: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateThemeRequest {
    #[validate(length(min = 1, max = 50))]
    pub name: String,

    #[validate(regex(path = "COLOR_REGEX", message = "must be a hex color like #1a2b3c"))]
    pub primary_color: String,

    #[validate(regex(path = "COLOR_REGEX", message = "must be a hex color like #1a2b3c"))]
    pub secondary_color: String,

    #[validate(regex(path = "COLOR_REGEX", message = "must be a hex color like #1a2b3c"))]
    pub background_color: String,

    #[validate(regex(path = "COLOR_REGEX", message = "must be a hex color like #1a2b3c"))]
    pub text_color: String,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdateThemeRequest {
    #[validate(length(min = 1, max = 50))]
    pub name: Option<String>,

    #[validate(regex(path = "COLOR_REGEX", message = "must be a hex color like #1a2b3c"))]
    pub primary_color: Option<String>,

    #[validate(regex(path = "COLOR_REGEX", message = "must be a hex color like #1a2b3c"))]
    pub secondary_color: Option<String>,

    #[validate(regex(path = "COLOR_REGEX", message = "must be a hex color like #1a2b3c"))]
    pub background_color: Option<String>,

    #[validate(regex(path = "COLOR_REGEX", message = "must be a hex color like #1a2b3c"))]
    pub text_color: Option<String>,
}
