use crate::{
    error::{AppError, Result},
    models::category::{Category, CreateCategoryRequest, UpdateCategoryRequest},
    repositories::CategoryRepository,
    utils::slug,
};
use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

#[derive(Clone)]
pub struct CategoryService {
    repo: CategoryRepository,
}

impl CategoryService {
    pub async fn new(repo: CategoryRepository) -> Result<Self> {
        Ok(Self { repo })
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        self.repo.list().await
    }

    pub async fn get_category(&self, category_id: Uuid) -> Result<Category> {
        self.repo
            .find_by_id(category_id)
            .await?
            .ok_or_else(|| AppError::not_found("Category"))
    }

    /// 创建分类
    /// slug 省略时从名称生成，创建前检查唯一性
    pub async fn create_category(&self, request: CreateCategoryRequest) -> Result<Category> {
        debug!("Creating category: {}", request.name);

        request.validate().map_err(AppError::ValidatorError)?;

        let slug = match request.slug {
            Some(slug) => {
                if !slug::is_valid_slug(&slug) {
                    return Err(AppError::validation("Invalid slug format"));
                }
                slug
            }
            None => slug::generate_slug(&request.name),
        };

        if self.repo.find_by_slug(&slug).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Category slug '{}' already exists",
                slug
            )));
        }

        let now = Utc::now();
        let category = Category {
            id: Uuid::new_v4(),
            name: request.name,
            slug,
            color: request.color,
            created_at: now,
            updated_at: now,
        };

        let created = self.repo.create(&category).await?;
        info!("Created category: {} ({})", created.name, created.id);
        Ok(created)
    }

    /// 更新分类
    /// 名称变化不会自动改 slug，slug 只有显式提供才变
    pub async fn update_category(
        &self,
        category_id: Uuid,
        request: UpdateCategoryRequest,
    ) -> Result<Category> {
        debug!("Updating category: {}", category_id);

        request.validate().map_err(AppError::ValidatorError)?;

        let mut category = self.get_category(category_id).await?;

        if let Some(name) = request.name {
            category.name = name;
        }
        if let Some(slug) = request.slug {
            if !slug::is_valid_slug(&slug) {
                return Err(AppError::validation("Invalid slug format"));
            }
            if slug != category.slug {
                if self.repo.find_by_slug(&slug).await?.is_some() {
                    return Err(AppError::Conflict(format!(
                        "Category slug '{}' already exists",
                        slug
                    )));
                }
                category.slug = slug;
            }
        }
        if let Some(color) = request.color {
            category.color = color;
        }
        category.updated_at = Utc::now();

        let updated = self
            .repo
            .update(&category)
            .await?
            .ok_or_else(|| AppError::not_found("Category"))?;

        info!("Updated category: {}", category_id);
        Ok(updated)
    }

    /// 删除分类
    /// 仍被文章引用时拒绝删除
    pub async fn delete_category(&self, category_id: Uuid) -> Result<()> {
        debug!("Deleting category: {}", category_id);

        self.get_category(category_id).await?;

        let references = self.repo.article_count(category_id).await?;
        if references > 0 {
            return Err(AppError::Conflict(format!(
                "Category is still referenced by {} article(s)",
                references
            )));
        }

        self.repo.delete(category_id).await?;

        info!("Deleted category: {}", category_id);
        Ok(())
    }
}
