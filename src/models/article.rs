use crate::models::category::Category;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// 文章落库模型
/// content 是作者提交的原始 Markdown，content_html 是派生的清理后 HTML，
/// 渲染端永远不直接信任 content
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Article {
    pub id: Uuid,
    pub title: String,
    pub resume: String,
    pub content: String,
    pub content_html: Option<String>,
    pub picture_url: Option<String>,
    pub is_headline: bool,
    pub author_id: Uuid,
    pub published_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateArticleRequest {
    #[validate(length(min = 1, max = 150))]
    pub title: String,

    /// 省略时从正文自动生成
    #[validate(length(min = 1, max = 300))]
    pub resume: Option<String>,

    pub content: String,

    #[validate(url)]
    pub picture_url: Option<String>,

    #[serde(default)]
    pub category_ids: Vec<Uuid>,

    pub is_headline: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdateArticleRequest {
    #[validate(length(min = 1, max = 150))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 300))]
    pub resume: Option<String>,

    pub content: Option<String>,

    #[validate(url)]
    pub picture_url: Option<String>,

    pub category_ids: Option<Vec<Uuid>>,

    pub is_headline: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ArticleQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub category: Option<String>,
    pub author: Option<Uuid>,
    pub headline: Option<bool>,
    pub search: Option<String>,
    pub sort: Option<String>,  // "published_at", "updated_at", "likes"
    pub order: Option<String>, // "asc", "desc"
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuthorInfo {
    pub id: Uuid,
    pub name: String,
    pub photo_url: Option<String>,
}

/// 列表项不携带正文
#[derive(Debug, Serialize, Deserialize)]
pub struct ArticleListItem {
    pub id: Uuid,
    pub title: String,
    pub resume: String,
    pub picture_url: Option<String>,
    pub is_headline: bool,
    pub author_id: Uuid,
    pub author: Option<AuthorInfo>,
    pub categories: Vec<Category>,
    pub likes: i64,
    pub is_liked_by_current_user: Option<bool>,
    pub published_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ArticleResponse {
    pub id: Uuid,
    pub title: String,
    pub resume: String,
    pub content: String,
    pub content_html: Option<String>,
    pub picture_url: Option<String>,
    pub is_headline: bool,
    pub author_id: Uuid,
    pub author: Option<AuthorInfo>,
    pub categories: Vec<Category>,
    pub likes: i64,
    pub is_liked_by_current_user: Option<bool>,
    pub published_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
