//! Admin repository

use async_trait::async_trait;
use uuid::Uuid;

use super::PgStore;
use crate::{
    db::store::AdminStore,
    error::{AppError, AppResult},
    models::{Admin, NewAdmin},
};

#[async_trait]
impl AdminStore for PgStore {
    async fn create_admin(&self, admin: NewAdmin) -> AppResult<Admin> {
        sqlx::query_as::<_, Admin>(
            r#"
            INSERT INTO admins (email, password_hash, name, role)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&admin.email)
        .bind(&admin.password_hash)
        .bind(&admin.name)
        .bind(&admin.role)
        .fetch_one(self.pool())
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::Conflict(_) => AppError::Conflict("Admin already exists".to_string()),
            other => other,
        })
    }

    async fn find_admin_by_id(&self, id: &Uuid) -> AppResult<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>(r#"SELECT * FROM admins WHERE id = $1"#)
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        Ok(admin)
    }

    async fn find_admin_by_email(&self, email: &str) -> AppResult<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>(r#"SELECT * FROM admins WHERE email = $1"#)
            .bind(email)
            .fetch_optional(self.pool())
            .await?;

        Ok(admin)
    }
}
