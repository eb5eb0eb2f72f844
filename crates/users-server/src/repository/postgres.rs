use async_trait::async_trait;
use users_shared::{NewUser, User};
use uuid::Uuid;

use super::{RepositoryError, UniqueField, UserRepository};
use crate::db::DbPool;

const USER_COLUMNS: &str =
    "id, username, first_name, last_name, email, phone_number, created_at, updated_at";

#[derive(Clone)]
pub struct PgUserRepository {
    db: DbPool,
}

impl PgUserRepository {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }
}

/// Unique index violations carry the constraint name, which tells us the field.
fn map_write_error(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            if let Some(field) = db_err.constraint().and_then(UniqueField::from_constraint) {
                return RepositoryError::Duplicate(field);
            }
        }
    }
    RepositoryError::Database(err)
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert(&self, user: &NewUser) -> Result<User, RepositoryError> {
        let query = format!(
            r#"
            INSERT INTO users (username, first_name, last_name, email, phone_number)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, User>(&query)
            .bind(&user.username)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.email)
            .bind(&user.phone_number)
            .fetch_one(&self.db)
            .await
            .map_err(map_write_error)
    }

    async fn save(&self, user: &User) -> Result<User, RepositoryError> {
        let query = format!(
            r#"
            UPDATE users
            SET username = $2, first_name = $3, last_name = $4, email = $5,
                phone_number = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, User>(&query)
            .bind(user.id)
            .bind(&user.username)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.email)
            .bind(&user.phone_number)
            .fetch_optional(&self.db)
            .await
            .map_err(map_write_error)?
            .ok_or(RepositoryError::Missing(user.id))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    async fn find_all(&self) -> Result<Vec<User>, RepositoryError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at, id");

        let users = sqlx::query_as::<_, User>(&query)
            .fetch_all(&self.db)
            .await?;

        Ok(users)
    }

    async fn exists_by_id(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.db)
                .await?;

        Ok(exists)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::Missing(id));
        }

        Ok(())
    }

    async fn find_conflicting(
        &self,
        email: &str,
        username: &str,
        phone_number: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<Vec<User>, RepositoryError> {
        let query = format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE (email = $1 OR username = $2 OR phone_number = $3)
              AND ($4::uuid IS NULL OR id <> $4)
            "#
        );

        let users = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .bind(username)
            .bind(phone_number)
            .bind(exclude_id)
            .fetch_all(&self.db)
            .await?;

        Ok(users)
    }
}
