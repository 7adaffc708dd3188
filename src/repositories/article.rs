use crate::{
    error::{AppError, Result},
    models::{
        article::{Article, ArticleQuery, AuthorInfo},
        category::Category,
    },
};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// 文章/点赞持久化契约
/// 服务层只消费这个接口，测试里用内存实现替身
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// 过滤 + 分页列表，返回当前页数据和总条数
    async fn list(&self, query: &ArticleQuery, page: usize, limit: usize)
        -> Result<(Vec<Article>, i64)>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Article>>;

    async fn create(&self, article: &Article) -> Result<Article>;

    async fn update(&self, article: &Article) -> Result<Article>;

    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// 重建文章与分类的多对多关联
    async fn set_categories(&self, article_id: Uuid, category_ids: &[Uuid]) -> Result<()>;

    async fn categories_for(&self, article_ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<Category>>>;

    async fn like_counts(&self, article_ids: &[Uuid]) -> Result<HashMap<Uuid, i64>>;

    async fn liked_by(&self, article_ids: &[Uuid], user_id: Uuid) -> Result<HashSet<Uuid>>;

    /// 仅在不存在时插入，冲突返回 false（表示已点赞）
    async fn insert_like(&self, article_id: Uuid, user_id: Uuid) -> Result<bool>;

    async fn remove_like(&self, article_id: Uuid, user_id: Uuid) -> Result<()>;

    async fn count_likes(&self, article_id: Uuid) -> Result<i64>;

    /// 按 auth 用户 ID 批量解析作者的名册信息
    async fn authors_for(&self, user_ids: &[Uuid]) -> Result<HashMap<Uuid, AuthorInfo>>;
}

/// PostgreSQL 实现，连接池由调用方注入
#[derive(Clone)]
pub struct PgArticleRepository {
    pool: PgPool,
}

impl PgArticleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &ArticleQuery) {
        if query.category.is_some() {
            qb.push(" JOIN article_categories ac ON ac.article_id = a.id");
            qb.push(" JOIN categories c ON c.id = ac.category_id");
        }

        let mut prefix = " WHERE ";
        if let Some(category) = &query.category {
            qb.push(prefix).push("c.slug = ").push_bind(category.clone());
            prefix = " AND ";
        }
        if let Some(author) = query.author {
            qb.push(prefix).push("a.author_id = ").push_bind(author);
            prefix = " AND ";
        }
        if let Some(headline) = query.headline {
            qb.push(prefix).push("a.is_headline = ").push_bind(headline);
            prefix = " AND ";
        }
        if let Some(search) = &query.search {
            let pattern = format!("%{}%", search);
            qb.push(prefix)
                .push("(a.title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR a.resume ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR a.content ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
    }

    /// 排序列只能来自白名单，方向默认降序
    fn order_clause(query: &ArticleQuery) -> String {
        let column = match query.sort.as_deref() {
            Some("updated_at") => "a.updated_at",
            Some("likes") => "(SELECT COUNT(*) FROM article_likes l WHERE l.article_id = a.id)",
            _ => "a.published_at",
        };
        let direction = match query.order.as_deref() {
            Some("asc") => "ASC",
            _ => "DESC",
        };
        format!(" ORDER BY {} {}", column, direction)
    }
}

const ARTICLE_COLUMNS: &str = "a.id, a.title, a.resume, a.content, a.content_html, \
     a.picture_url, a.is_headline, a.author_id, a.published_at, a.updated_at";

#[async_trait]
impl ArticleStore for PgArticleRepository {
    async fn list(
        &self,
        query: &ArticleQuery,
        page: usize,
        limit: usize,
    ) -> Result<(Vec<Article>, i64)> {
        let offset = (page.saturating_sub(1)) * limit;

        let mut count_builder = QueryBuilder::new("SELECT COUNT(a.id) FROM articles a");
        Self::push_filters(&mut count_builder, query);
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut builder =
            QueryBuilder::new(format!("SELECT {} FROM articles a", ARTICLE_COLUMNS));
        Self::push_filters(&mut builder, query);
        builder.push(Self::order_clause(query));
        builder.push(" LIMIT ").push_bind(limit as i64);
        builder.push(" OFFSET ").push_bind(offset as i64);

        let articles = builder
            .build_query_as::<Article>()
            .fetch_all(&self.pool)
            .await?;

        Ok((articles, total))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Article>> {
        let article = sqlx::query_as::<_, Article>("SELECT * FROM articles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(article)
    }

    async fn create(&self, article: &Article) -> Result<Article> {
        let created = sqlx::query_as::<_, Article>(
            r#"
            INSERT INTO articles
                (id, title, resume, content, content_html, picture_url,
                 is_headline, author_id, published_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(article.id)
        .bind(&article.title)
        .bind(&article.resume)
        .bind(&article.content)
        .bind(&article.content_html)
        .bind(&article.picture_url)
        .bind(article.is_headline)
        .bind(article.author_id)
        .bind(article.published_at)
        .bind(article.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn update(&self, article: &Article) -> Result<Article> {
        let updated = sqlx::query_as::<_, Article>(
            r#"
            UPDATE articles
            SET title = $2, resume = $3, content = $4, content_html = $5,
                picture_url = $6, is_headline = $7, updated_at = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(article.id)
        .bind(&article.title)
        .bind(&article.resume)
        .bind(&article.content)
        .bind(&article.content_html)
        .bind(&article.picture_url)
        .bind(article.is_headline)
        .bind(article.updated_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found("Article"))?;

        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_categories(&self, article_id: Uuid, category_ids: &[Uuid]) -> Result<()> {
        sqlx::query("DELETE FROM article_categories WHERE article_id = $1")
            .bind(article_id)
            .execute(&self.pool)
            .await?;

        for category_id in category_ids {
            sqlx::query(
                "INSERT INTO article_categories (article_id, category_id) VALUES ($1, $2) \
                 ON CONFLICT DO NOTHING",
            )
            .bind(article_id)
            .bind(*category_id)
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }

    async fn categories_for(&self, article_ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<Category>>> {
        if article_ids.is_empty() {
            return Ok(HashMap::new());
        }

        #[derive(sqlx::FromRow)]
        struct ArticleCategoryRow {
            article_id: Uuid,
            #[sqlx(flatten)]
            category: Category,
        }

        let rows: Vec<ArticleCategoryRow> = sqlx::query_as(
            r#"
            SELECT ac.article_id, c.id, c.name, c.slug, c.color, c.created_at, c.updated_at
            FROM article_categories ac
            JOIN categories c ON c.id = ac.category_id
            WHERE ac.article_id = ANY($1)
            ORDER BY c.name
            "#,
        )
        .bind(article_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut map: HashMap<Uuid, Vec<Category>> = HashMap::new();
        for row in rows {
            map.entry(row.article_id).or_default().push(row.category);
        }
        Ok(map)
    }

    async fn like_counts(&self, article_ids: &[Uuid]) -> Result<HashMap<Uuid, i64>> {
        if article_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(Uuid, i64)> = sqlx::query_as(
            "SELECT article_id, COUNT(*) FROM article_likes \
             WHERE article_id = ANY($1) GROUP BY article_id",
        )
        .bind(article_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }

    async fn liked_by(&self, article_ids: &[Uuid], user_id: Uuid) -> Result<HashSet<Uuid>> {
        if article_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let ids: Vec<Uuid> = sqlx::query_scalar(
            "SELECT article_id FROM article_likes WHERE user_id = $1 AND article_id = ANY($2)",
        )
        .bind(user_id)
        .bind(article_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids.into_iter().collect())
    }

    async fn insert_like(&self, article_id: Uuid, user_id: Uuid) -> Result<bool> {
        // 依赖 (article_id, user_id) 唯一约束：冲突即已点赞，
        // 不做先查后写，避免同一用户并发切换时的竞态
        let result = sqlx::query(
            "INSERT INTO article_likes (article_id, user_id) VALUES ($1, $2) \
             ON CONFLICT (article_id, user_id) DO NOTHING",
        )
        .bind(article_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove_like(&self, article_id: Uuid, user_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM article_likes WHERE article_id = $1 AND user_id = $2")
            .bind(article_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn count_likes(&self, article_id: Uuid) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM article_likes WHERE article_id = $1")
                .bind(article_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    async fn authors_for(&self, user_ids: &[Uuid]) -> Result<HashMap<Uuid, AuthorInfo>> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let authors: Vec<AuthorInfo> = sqlx::query_as(
            "SELECT user_id AS id, name, photo_url FROM staff_profiles WHERE user_id = ANY($1)",
        )
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(authors.into_iter().map(|a| (a.id, a)).collect())
    }
}
