use crate::{
    error::{AppError, Result},
    models::staff::{CreateStaffRequest, StaffMember, UpdateStaffRequest},
    services::Database,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

/// 团队名册服务
#[derive(Clone)]
pub struct StaffService {
    db: Arc<Database>,
}

impl StaffService {
    pub async fn new(db: Arc<Database>) -> Result<Self> {
        Ok(Self { db })
    }

    /// 公开的名册列表，按展示顺序排列
    pub async fn list_staff(&self) -> Result<Vec<StaffMember>> {
        let members = sqlx::query_as::<_, StaffMember>(
            "SELECT * FROM staff_profiles ORDER BY display_order, name",
        )
        .fetch_all(self.db.pool())
        .await?;
        Ok(members)
    }

    pub async fn get_staff(&self, staff_id: Uuid) -> Result<StaffMember> {
        sqlx::query_as::<_, StaffMember>("SELECT * FROM staff_profiles WHERE id = $1")
            .bind(staff_id)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or_else(|| AppError::not_found("Staff member"))
    }

    pub async fn create_staff(&self, request: CreateStaffRequest) -> Result<StaffMember> {
        debug!("Creating staff member: {}", request.name);

        request.validate().map_err(AppError::ValidatorError)?;

        let now = Utc::now();
        let member = sqlx::query_as::<_, StaffMember>(
            r#"
            INSERT INTO staff_profiles
                (id, user_id, name, role_title, bio, photo_url, display_order,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request.user_id)
        .bind(&request.name)
        .bind(&request.role_title)
        .bind(&request.bio)
        .bind(&request.photo_url)
        .bind(request.display_order.unwrap_or(0))
        .bind(now)
        .bind(now)
        .fetch_one(self.db.pool())
        .await?;

        info!("Created staff member: {} ({})", member.name, member.id);
        Ok(member)
    }

    pub async fn update_staff(
        &self,
        staff_id: Uuid,
        request: UpdateStaffRequest,
    ) -> Result<StaffMember> {
        debug!("Updating staff member: {}", staff_id);

        request.validate().map_err(AppError::ValidatorError)?;

        let mut member = self.get_staff(staff_id).await?;

        if let Some(user_id) = request.user_id {
            member.user_id = Some(user_id);
        }
        if let Some(name) = request.name {
            member.name = name;
        }
        if let Some(role_title) = request.role_title {
            member.role_title = role_title;
        }
        if let Some(bio) = request.bio {
            member.bio = Some(bio);
        }
        if let Some(photo_url) = request.photo_url {
            member.photo_url = Some(photo_url);
        }
        if let Some(display_order) = request.display_order {
            member.display_order = display_order;
        }
        member.updated_at = Utc::now();

        let updated = sqlx::query_as::<_, StaffMember>(
            r#"
            UPDATE staff_profiles
            SET user_id = $2, name = $3, role_title = $4, bio = $5,
                photo_url = $6, display_order = $7, updated_at = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(member.id)
        .bind(member.user_id)
        .bind(&member.name)
        .bind(&member.role_title)
        .bind(&member.bio)
        .bind(&member.photo_url)
        .bind(member.display_order)
        .bind(member.updated_at)
        .fetch_optional(self.db.pool())
        .await?
        .ok_or_else(|| AppError::not_found("Staff member"))?;

        info!("Updated staff member: {}", staff_id);
        Ok(updated)
    }

    pub async fn delete_staff(&self, staff_id: Uuid) -> Result<()> {
        debug!("Deleting staff member: {}", staff_id);

        let result = sqlx::query("DELETE FROM staff_profiles WHERE id = $1")
            .bind(staff_id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Staff member"));
        }

        info!("Deleted staff member: {}", staff_id);
        Ok(())
    }
}
