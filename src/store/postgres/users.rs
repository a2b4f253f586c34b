use async_trait::async_trait;
use sqlx::query_as;
use uuid::Uuid;

use super::PgStore;
use crate::models::user::{NewUser, PublicMember, User, UserCredentials, UserPatch};
use crate::store::{StoreResult, UserStore};

const USER_COLUMNS: &str =
    "id, email, name, role, position, school, phone, is_active, last_login_at, created_at";

#[async_trait]
impl UserStore for PgStore {
    async fn find_credentials(&self, email: &str) -> StoreResult<Option<UserCredentials>> {
        let row = query_as::<_, UserCredentials>(
            "SELECT id, email, role, password_hash FROM users
             WHERE email = $1 AND is_active = TRUE AND deleted_at IS NULL",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn touch_last_login(&self, id: Uuid) -> StoreResult<()> {
        sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE deleted_at IS NULL ORDER BY name ASC"
        );
        Ok(query_as::<_, User>(&sql).fetch_all(&self.pool).await?)
    }

    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND deleted_at IS NULL");
        Ok(query_as::<_, User>(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn insert_user(&self, user: &NewUser) -> StoreResult<Option<User>> {
        // Email unik juga terhadap user yang sudah di-soft-delete.
        let sql = format!(
            "INSERT INTO users (email, password_hash, name, role, position, school, phone)
             SELECT $1, $2, $3, $4, $5, $6, $7
             WHERE NOT EXISTS (SELECT 1 FROM users WHERE email = $1)
             RETURNING {USER_COLUMNS}"
        );
        let row = query_as::<_, User>(&sql)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.name)
            .bind(user.role.as_str())
            .bind(&user.position)
            .bind(&user.school)
            .bind(&user.phone)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_user(&self, id: Uuid, patch: &UserPatch) -> StoreResult<Option<User>> {
        let sql = format!(
            "UPDATE users SET
                name = COALESCE($2, name),
                role = COALESCE($3, role),
                position = COALESCE($4, position),
                school = COALESCE($5, school),
                phone = COALESCE($6, phone),
                is_active = COALESCE($7, is_active),
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {USER_COLUMNS}"
        );
        let row = query_as::<_, User>(&sql)
            .bind(id)
            .bind(&patch.name)
            .bind(patch.role.map(|r| r.as_str()))
            .bind(&patch.position)
            .bind(&patch.school)
            .bind(&patch.phone)
            .bind(patch.is_active)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn soft_delete_user(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET deleted_at = NOW(), is_active = FALSE
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_users(&self) -> StoreResult<i64> {
        let (count,): (i64,) = query_as("SELECT COUNT(*) FROM users WHERE deleted_at IS NULL")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn list_public_members(&self) -> StoreResult<Vec<PublicMember>> {
        let rows = query_as::<_, PublicMember>(
            "SELECT id, name, school, position FROM users
             WHERE is_active = TRUE AND deleted_at IS NULL
             ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
