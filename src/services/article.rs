use crate::{
    config::Config,
    error::{AppError, Result},
    models::{
        article::{
            Article, ArticleListItem, ArticleQuery, ArticleResponse, CreateArticleRequest,
            UpdateArticleRequest,
        },
        like::LikeResponse,
    },
    repositories::ArticleStore,
    services::auth::User,
    services::database::PaginatedResult,
    utils::{markdown::MarkdownProcessor, validation::validate_content},
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

/// 文章的修改权限：作者本人，或 staff/admin
pub fn can_modify(article: &Article, user: &User) -> bool {
    article.author_id == user.id || user.role.is_staff()
}

#[derive(Clone)]
pub struct ArticleService {
    store: Arc<dyn ArticleStore>,
    markdown_processor: MarkdownProcessor,
    per_page: usize,
    excerpt_length: usize,
}

impl ArticleService {
    pub async fn new(store: Arc<dyn ArticleStore>, config: &Config) -> Result<Self> {
        Ok(Self {
            store,
            markdown_processor: MarkdownProcessor::new(),
            per_page: config.default_articles_per_page,
            excerpt_length: config.excerpt_length,
        })
    }

    /// 创建新文章
    /// 内容先过校验，再派生清理后的 HTML，原始 Markdown 和 HTML 一起落库
    pub async fn create_article(
        &self,
        author_id: Uuid,
        request: CreateArticleRequest,
    ) -> Result<ArticleResponse> {
        debug!("Creating article for user: {}", author_id);

        request.validate().map_err(AppError::ValidatorError)?;

        let validation = validate_content(&request.content);
        if !validation.is_valid {
            return Err(AppError::Validation(validation.joined_errors()));
        }

        let content_html = self.markdown_processor.to_html(&request.content);

        // 没有提供摘要时从正文生成
        let resume = request.resume.unwrap_or_else(|| {
            self.markdown_processor
                .generate_excerpt(&request.content, self.excerpt_length)
        });

        let now = Utc::now();

        let article = Article {
            id: Uuid::new_v4(),
            title: request.title,
            resume,
            content: request.content,
            content_html: Some(content_html),
            picture_url: request.picture_url,
            is_headline: request.is_headline.unwrap_or(false),
            author_id,
            published_at: now,
            updated_at: now,
        };

        let created = self.store.create(&article).await?;
        self.store
            .set_categories(created.id, &request.category_ids)
            .await?;

        info!("Created article: {} by user: {}", created.id, author_id);
        self.to_response(created, Some(author_id)).await
    }

    /// 更新文章（部分字段）
    /// content 缺省时保留已存的 content_html，部分更新不触发重渲染
    pub async fn update_article(
        &self,
        article_id: Uuid,
        user: &User,
        request: UpdateArticleRequest,
    ) -> Result<ArticleResponse> {
        debug!("Updating article: {} by user: {}", article_id, user.id);

        request.validate().map_err(AppError::ValidatorError)?;

        let mut article = self
            .store
            .find_by_id(article_id)
            .await?
            .ok_or_else(|| AppError::not_found("Article"))?;

        if !can_modify(&article, user) {
            return Err(AppError::Authorization(
                "You do not have permission to modify this article".to_string(),
            ));
        }

        if let Some(title) = request.title {
            article.title = title;
        }
        if let Some(resume) = request.resume {
            article.resume = resume;
        }
        if let Some(content) = request.content {
            let validation = validate_content(&content);
            if !validation.is_valid {
                return Err(AppError::Validation(validation.joined_errors()));
            }
            article.content_html = Some(self.markdown_processor.to_html(&content));
            article.content = content;
        }
        if let Some(picture_url) = request.picture_url {
            article.picture_url = Some(picture_url);
        }
        if let Some(is_headline) = request.is_headline {
            article.is_headline = is_headline;
        }
        article.updated_at = Utc::now();

        let updated = self.store.update(&article).await?;

        if let Some(category_ids) = request.category_ids {
            self.store.set_categories(updated.id, &category_ids).await?;
        }

        info!("Updated article: {}", article_id);
        self.to_response(updated, Some(user.id)).await
    }

    /// 删除文章
    /// 不存在返回 not found，无权限返回 forbidden，两者不混淆
    pub async fn delete_article(&self, article_id: Uuid, user: &User) -> Result<()> {
        debug!("Deleting article: {} by user: {}", article_id, user.id);

        let article = self
            .store
            .find_by_id(article_id)
            .await?
            .ok_or_else(|| AppError::not_found("Article"))?;

        if !can_modify(&article, user) {
            return Err(AppError::Authorization(
                "You do not have permission to delete this article".to_string(),
            ));
        }

        self.store.delete(article_id).await?;

        info!("Deleted article: {}", article_id);
        Ok(())
    }

    /// 点赞开关
    /// 插入冲突视为已点赞并转为取消，计数在变更后重新统计
    pub async fn toggle_like(&self, article_id: Uuid, user_id: Uuid) -> Result<LikeResponse> {
        debug!("Toggling like on article: {} by user: {}", article_id, user_id);

        self.store
            .find_by_id(article_id)
            .await?
            .ok_or_else(|| AppError::not_found("Article"))?;

        let liked = if self.store.insert_like(article_id, user_id).await? {
            true
        } else {
            self.store.remove_like(article_id, user_id).await?;
            false
        };

        let likes = self.store.count_likes(article_id).await?;

        Ok(LikeResponse { liked, likes })
    }

    /// 获取单篇文章
    pub async fn get_article(
        &self,
        article_id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<ArticleResponse> {
        debug!("Getting article: {}", article_id);

        let article = self
            .store
            .find_by_id(article_id)
            .await?
            .ok_or_else(|| AppError::not_found("Article"))?;

        self.to_response(article, viewer).await
    }

    /// 获取文章列表（分页）
    pub async fn list_articles(
        &self,
        query: ArticleQuery,
        viewer: Option<Uuid>,
    ) -> Result<PaginatedResult<ArticleListItem>> {
        debug!("Listing articles with query: {:?}", query);

        let page = query.page.unwrap_or(1).max(1);
        let limit = query.limit.unwrap_or(self.per_page).clamp(1, 100);

        let (articles, total) = self.store.list(&query, page, limit).await?;
        let data = self.hydrate(articles, viewer).await?;

        let total = total as usize;
        Ok(PaginatedResult {
            data,
            total,
            page,
            per_page: limit,
            total_pages: (total + limit - 1) / limit,
        })
    }

    /// 批量补齐分类、点赞数、当前用户点赞状态和作者名册信息
    async fn hydrate(
        &self,
        articles: Vec<Article>,
        viewer: Option<Uuid>,
    ) -> Result<Vec<ArticleListItem>> {
        let ids: Vec<Uuid> = articles.iter().map(|a| a.id).collect();
        let author_ids: Vec<Uuid> = articles.iter().map(|a| a.author_id).collect();

        let mut categories = self.store.categories_for(&ids).await?;
        let like_counts = self.store.like_counts(&ids).await?;
        let authors = self.store.authors_for(&author_ids).await?;
        let liked = match viewer {
            Some(user_id) => Some(self.store.liked_by(&ids, user_id).await?),
            None => None,
        };

        Ok(articles
            .into_iter()
            .map(|article| ArticleListItem {
                likes: like_counts.get(&article.id).copied().unwrap_or(0),
                is_liked_by_current_user: liked.as_ref().map(|set| set.contains(&article.id)),
                categories: categories.remove(&article.id).unwrap_or_default(),
                author: authors.get(&article.author_id).cloned(),
                id: article.id,
                title: article.title,
                resume: article.resume,
                picture_url: article.picture_url,
                is_headline: article.is_headline,
                author_id: article.author_id,
                published_at: article.published_at,
                updated_at: article.updated_at,
            })
            .collect())
    }

    async fn to_response(
        &self,
        article: Article,
        viewer: Option<Uuid>,
    ) -> Result<ArticleResponse> {
        let ids = [article.id];

        let mut categories = self.store.categories_for(&ids).await?;
        let likes = self.store.count_likes(article.id).await?;
        let authors = self.store.authors_for(&[article.author_id]).await?;
        let is_liked_by_current_user = match viewer {
            Some(user_id) => {
                let liked = self.store.liked_by(&ids, user_id).await?;
                Some(liked.contains(&article.id))
            }
            None => None,
        };

        Ok(ArticleResponse {
            likes,
            is_liked_by_current_user,
            categories: categories.remove(&article.id).unwrap_or_default(),
            author: authors.get(&article.author_id).cloned(),
            id: article.id,
            title: article.title,
            resume: article.resume,
            content: article.content,
            content_html: article.content_html,
            picture_url: article.picture_url,
            is_headline: article.is_headline,
            author_id: article.author_id,
            published_at: article.published_at,
            updated_at: article.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{article::AuthorInfo, category::Category},
        services::auth::Role,
    };
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    /// 内存实现的 ArticleStore 替身
    #[derive(Default)]
    struct MemoryStore {
        articles: Mutex<HashMap<Uuid, Article>>,
        likes: Mutex<HashSet<(Uuid, Uuid)>>,
        article_categories: Mutex<HashMap<Uuid, Vec<Uuid>>>,
    }

    #[async_trait]
    impl ArticleStore for MemoryStore {
        async fn list(
            &self,
            query: &ArticleQuery,
            page: usize,
            limit: usize,
        ) -> Result<(Vec<Article>, i64)> {
            let articles = self.articles.lock().unwrap();
            let mut items: Vec<Article> = articles
                .values()
                .filter(|a| query.author.map_or(true, |id| a.author_id == id))
                .filter(|a| query.headline.map_or(true, |h| a.is_headline == h))
                .cloned()
                .collect();
            items.sort_by(|a, b| b.published_at.cmp(&a.published_at));

            let total = items.len() as i64;
            let data = items
                .into_iter()
                .skip((page - 1) * limit)
                .take(limit)
                .collect();
            Ok((data, total))
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Article>> {
            Ok(self.articles.lock().unwrap().get(&id).cloned())
        }

        async fn create(&self, article: &Article) -> Result<Article> {
            self.articles
                .lock()
                .unwrap()
                .insert(article.id, article.clone());
            Ok(article.clone())
        }

        async fn update(&self, article: &Article) -> Result<Article> {
            let mut articles = self.articles.lock().unwrap();
            if !articles.contains_key(&article.id) {
                return Err(AppError::not_found("Article"));
            }
            articles.insert(article.id, article.clone());
            Ok(article.clone())
        }

        async fn delete(&self, id: Uuid) -> Result<bool> {
            Ok(self.articles.lock().unwrap().remove(&id).is_some())
        }

        async fn set_categories(&self, article_id: Uuid, category_ids: &[Uuid]) -> Result<()> {
            self.article_categories
                .lock()
                .unwrap()
                .insert(article_id, category_ids.to_vec());
            Ok(())
        }

        async fn categories_for(
            &self,
            _article_ids: &[Uuid],
        ) -> Result<HashMap<Uuid, Vec<Category>>> {
            Ok(HashMap::new())
        }

        async fn like_counts(&self, article_ids: &[Uuid]) -> Result<HashMap<Uuid, i64>> {
            let likes = self.likes.lock().unwrap();
            let mut counts = HashMap::new();
            for (article_id, _) in likes.iter() {
                if article_ids.contains(article_id) {
                    *counts.entry(*article_id).or_insert(0) += 1;
                }
            }
            Ok(counts)
        }

        async fn liked_by(&self, article_ids: &[Uuid], user_id: Uuid) -> Result<HashSet<Uuid>> {
            let likes = self.likes.lock().unwrap();
            Ok(article_ids
                .iter()
                .copied()
                .filter(|id| likes.contains(&(*id, user_id)))
                .collect())
        }

        async fn insert_like(&self, article_id: Uuid, user_id: Uuid) -> Result<bool> {
            Ok(self.likes.lock().unwrap().insert((article_id, user_id)))
        }

        async fn remove_like(&self, article_id: Uuid, user_id: Uuid) -> Result<()> {
            self.likes.lock().unwrap().remove(&(article_id, user_id));
            Ok(())
        }

        async fn count_likes(&self, article_id: Uuid) -> Result<i64> {
            let likes = self.likes.lock().unwrap();
            Ok(likes.iter().filter(|(id, _)| *id == article_id).count() as i64)
        }

        async fn authors_for(&self, _user_ids: &[Uuid]) -> Result<HashMap<Uuid, AuthorInfo>> {
            Ok(HashMap::new())
        }
    }

    fn service() -> ArticleService {
        ArticleService {
            store: Arc::new(MemoryStore::default()),
            markdown_processor: MarkdownProcessor::new(),
            per_page: 20,
            excerpt_length: 200,
        }
    }

    fn user(id: Uuid, role: Role) -> User {
        User {
            id,
            email: "member@onair.example".to_string(),
            display_name: None,
            role,
        }
    }

    fn create_request(content: &str) -> CreateArticleRequest {
        CreateArticleRequest {
            title: "Morning show recap".to_string(),
            resume: Some("What happened on air this morning".to_string()),
            content: content.to_string(),
            picture_url: None,
            category_ids: Vec::new(),
            is_headline: None,
        }
    }

    fn empty_update() -> UpdateArticleRequest {
        UpdateArticleRequest {
            title: None,
            resume: None,
            content: None,
            picture_url: None,
            category_ids: None,
            is_headline: None,
        }
    }

    #[tokio::test]
    async fn test_create_article_generates_sanitized_html() {
        let service = service();
        let author = Uuid::new_v4();

        let article = service
            .create_article(author, create_request("# Hello\n\nBody text."))
            .await
            .unwrap();

        let html = article.content_html.unwrap();
        assert!(html.contains("<h1>Hello</h1>"));
        assert_eq!(article.author_id, author);
    }

    #[tokio::test]
    async fn test_create_article_generates_resume_when_missing() {
        let service = service();

        let mut request = create_request("# Heading\n\nA body paragraph long enough to summarize.");
        request.resume = None;

        let article = service
            .create_article(Uuid::new_v4(), request)
            .await
            .unwrap();

        assert!(article.resume.starts_with("Heading"));
    }

    #[tokio::test]
    async fn test_create_article_rejects_dangerous_content() {
        let service = service();

        let err = service
            .create_article(
                Uuid::new_v4(),
                create_request("hi <script>alert(1)</script>"),
            )
            .await
            .unwrap_err();

        match err {
            AppError::Validation(msg) => assert!(msg.contains("script")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_article_rejects_empty_content() {
        let service = service();

        let err = service
            .create_article(Uuid::new_v4(), create_request("   "))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_forbidden_for_non_author_leaves_article_unmodified() {
        let service = service();
        let author = Uuid::new_v4();

        let created = service
            .create_article(author, create_request("original body"))
            .await
            .unwrap();

        let stranger = user(Uuid::new_v4(), Role::User);
        let mut request = empty_update();
        request.title = Some("Hijacked".to_string());

        let err = service
            .update_article(created.id, &stranger, request)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Authorization(_)));

        // 文章保持原样
        let unchanged = service.get_article(created.id, None).await.unwrap();
        assert_eq!(unchanged.title, created.title);
        assert_eq!(unchanged.content, created.content);
    }

    #[tokio::test]
    async fn test_update_allowed_for_staff() {
        let service = service();
        let author = Uuid::new_v4();

        let created = service
            .create_article(author, create_request("original body"))
            .await
            .unwrap();

        let staff = user(Uuid::new_v4(), Role::Staff);
        let mut request = empty_update();
        request.title = Some("Edited by staff".to_string());

        let updated = service
            .update_article(created.id, &staff, request)
            .await
            .unwrap();
        assert_eq!(updated.title, "Edited by staff");
    }

    #[tokio::test]
    async fn test_partial_update_preserves_content_html() {
        let service = service();
        let author = Uuid::new_v4();

        let created = service
            .create_article(author, create_request("# Keep me"))
            .await
            .unwrap();
        let original_html = created.content_html.clone().unwrap();

        let mut request = empty_update();
        request.title = Some("New title".to_string());

        let updated = service
            .update_article(created.id, &user(author, Role::User), request)
            .await
            .unwrap();

        // content 没变，派生 HTML 原样保留
        assert_eq!(updated.content_html.unwrap(), original_html);
    }

    #[tokio::test]
    async fn test_update_with_content_regenerates_html() {
        let service = service();
        let author = Uuid::new_v4();

        let created = service
            .create_article(author, create_request("# Old heading"))
            .await
            .unwrap();

        let mut request = empty_update();
        request.content = Some("# New heading".to_string());

        let updated = service
            .update_article(created.id, &user(author, Role::User), request)
            .await
            .unwrap();

        let html = updated.content_html.unwrap();
        assert!(html.contains("<h1>New heading</h1>"));
        assert!(!html.contains("Old heading"));
    }

    #[tokio::test]
    async fn test_update_missing_article_is_not_found() {
        let service = service();

        let err = service
            .update_article(Uuid::new_v4(), &user(Uuid::new_v4(), Role::Admin), empty_update())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_forbidden_for_non_author() {
        let service = service();
        let author = Uuid::new_v4();

        let created = service
            .create_article(author, create_request("body"))
            .await
            .unwrap();

        let err = service
            .delete_article(created.id, &user(Uuid::new_v4(), Role::User))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Authorization(_)));

        // 仍然存在
        assert!(service.get_article(created.id, None).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_by_author_then_not_found() {
        let service = service();
        let author = Uuid::new_v4();

        let created = service
            .create_article(author, create_request("body"))
            .await
            .unwrap();

        service
            .delete_article(created.id, &user(author, Role::User))
            .await
            .unwrap();

        let err = service
            .delete_article(created.id, &user(author, Role::User))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_toggle_like_round_trip() {
        let service = service();
        let author = Uuid::new_v4();

        let created = service
            .create_article(author, create_request("body"))
            .await
            .unwrap();

        // 另一个用户先点了一个赞，起始计数 N = 1
        let other = Uuid::new_v4();
        service.toggle_like(created.id, other).await.unwrap();

        let viewer = Uuid::new_v4();
        let first = service.toggle_like(created.id, viewer).await.unwrap();
        assert!(first.liked);
        assert_eq!(first.likes, 2);

        let second = service.toggle_like(created.id, viewer).await.unwrap();
        assert!(!second.liked);
        assert_eq!(second.likes, 1);
    }

    #[tokio::test]
    async fn test_toggle_like_missing_article_is_not_found() {
        let service = service();

        let err = service
            .toggle_like(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_articles_paginates() {
        let service = service();
        let author = Uuid::new_v4();

        for _ in 0..3 {
            service
                .create_article(author, create_request("body"))
                .await
                .unwrap();
        }

        let result = service
            .list_articles(
                ArticleQuery {
                    limit: Some(2),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap();

        assert_eq!(result.total, 3);
        assert_eq!(result.data.len(), 2);
        assert_eq!(result.total_pages, 2);
        // 未登录时不填充点赞状态
        assert!(result.data[0].is_liked_by_current_user.is_none());
    }

    #[test]
    fn test_can_modify_policy() {
        let author_id = Uuid::new_v4();
        let article = Article {
            id: Uuid::new_v4(),
            title: "t".to_string(),
            resume: "r".to_string(),
            content: "c".to_string(),
            content_html: None,
            picture_url: None,
            is_headline: false,
            author_id,
            published_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(can_modify(&article, &user(author_id, Role::User)));
        assert!(can_modify(&article, &user(Uuid::new_v4(), Role::Staff)));
        assert!(can_modify(&article, &user(Uuid::new_v4(), Role::Admin)));
        assert!(!can_modify(&article, &user(Uuid::new_v4(), Role::User)));
    }
}
