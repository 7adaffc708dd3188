use crate::{
    error::{AppError, Result},
    models::theme::{CreateThemeRequest, Theme, UpdateThemeRequest},
    services::Database,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

/// 视觉主题服务
#[derive(Clone)]
pub struct ThemeService {
    db: Arc<Database>,
}

impl ThemeService {
    pub async fn new(db: Arc<Database>) -> Result<Self> {
        Ok(Self { db })
    }

    pub async fn list_themes(&self) -> Result<Vec<Theme>> {
        let themes = sqlx::query_as::<_, Theme>("SELECT * FROM themes ORDER BY name")
            .fetch_all(self.db.pool())
            .await?;
        Ok(themes)
    }

    pub async fn get_theme(&self, theme_id: Uuid) -> Result<Theme> {
        sqlx::query_as::<_, Theme>("SELECT * FROM themes WHERE id = $1")
            .bind(theme_id)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or_else(|| AppError::not_found("Theme"))
    }

    /// 当前激活的主题，公开站点启动时读取
    pub async fn get_active_theme(&self) -> Result<Theme> {
        sqlx::query_as::<_, Theme>("SELECT * FROM themes WHERE is_active = true")
            .fetch_optional(self.db.pool())
            .await?
            .ok_or_else(|| AppError::not_found("Active theme"))
    }

    pub async fn create_theme(&self, request: CreateThemeRequest) -> Result<Theme> {
        debug!("Creating theme: {}", request.name);

        request.validate().map_err(AppError::ValidatorError)?;

        let now = Utc::now();
        let theme = sqlx::query_as::<_, Theme>(
            r#"
            INSERT INTO themes
                (id, name, primary_color, secondary_color, background_color,
                 text_color, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, false, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&request.name)
        .bind(&request.primary_color)
        .bind(&request.secondary_color)
        .bind(&request.background_color)
        .bind(&request.text_color)
        .bind(now)
        .bind(now)
        .fetch_one(self.db.pool())
        .await?;

        info!("Created theme: {} ({})", theme.name, theme.id);
        Ok(theme)
    }

    pub async fn update_theme(
        &self,
        theme_id: Uuid,
        request: UpdateThemeRequest,
    ) -> Result<Theme> {
        debug!("Updating theme: {}", theme_id);

        request.validate().map_err(AppError::ValidatorError)?;

        let mut theme = self.get_theme(theme_id).await?;

        if let Some(name) = request.name {
            theme.name = name;
        }
        if let Some(primary_color) = request.primary_color {
            theme.primary_color = primary_color;
        }
        if let Some(secondary_color) = request.secondary_color {
            theme.secondary_color = secondary_color;
        }
        if let Some(background_color) = request.background_color {
            theme.background_color = background_color;
        }
        if let Some(text_color) = request.text_color {
            theme.text_color = text_color;
        }
        theme.updated_at = Utc::now();

        let updated = sqlx::query_as::<_, Theme>(
            r#"
            UPDATE themes
            SET name = $2, primary_color = $3, secondary_color = $4,
                background_color = $5, text_color = $6, updated_at = $7
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(theme.id)
        .bind(&theme.name)
        .bind(&theme.primary_color)
        .bind(&theme.secondary_color)
        .bind(&theme.background_color)
        .bind(&theme.text_color)
        .bind(theme.updated_at)
        .fetch_optional(self.db.pool())
        .await?
        .ok_or_else(|| AppError::not_found("Theme"))?;

        info!("Updated theme: {}", theme_id);
        Ok(updated)
    }

    /// 激活主题，同时取消之前的激活主题
    pub async fn activate_theme(&self, theme_id: Uuid) -> Result<Theme> {
        debug!("Activating theme: {}", theme_id);

        let mut tx = self.db.pool().begin().await?;

        sqlx::query("UPDATE themes SET is_active = false, updated_at = $1 WHERE is_active = true")
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;

        let theme = sqlx::query_as::<_, Theme>(
            "UPDATE themes SET is_active = true, updated_at = $2 WHERE id = $1 RETURNING *",
        )
        .bind(theme_id)
        .bind(Utc::now())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found("Theme"))?;

        tx.commit().await?;

        info!("Activated theme: {}", theme_id);
        Ok(theme)
    }

    /// 删除主题，激活中的主题不可删除
    pub async fn delete_theme(&self, theme_id: Uuid) -> Result<()> {
        debug!("Deleting theme: {}", theme_id);

        let theme = self.get_theme(theme_id).await?;
        if theme.is_active {
            return Err(AppError::conflict("Cannot delete the active theme"));
        }

        sqlx::query("DELETE FROM themes WHERE id = $1")
            .bind(theme_id)
            .execute(self.db.pool())
            .await?;

        info!("Deleted theme: {}", theme_id);
        Ok(())
    }
}
