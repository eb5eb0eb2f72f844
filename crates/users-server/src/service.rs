use std::sync::Arc;

use users_shared::api::{CreateUserRequest, UserView};
use users_shared::User;
use uuid::Uuid;

use crate::error::{AppError, FieldErrors};
use crate::mapper;
use crate::repository::{UniqueField, UserRepository};

/// Business rules for user records. Holds nothing but the repository handle.
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, req: Option<CreateUserRequest>) -> Result<UserView, AppError> {
        let Some(req) = req else {
            tracing::error!("Provided entity is null");
            return Err(AppError::NullInput);
        };

        self.ensure_unique(&req, None).await?;

        let user = self.repo.insert(&mapper::to_entity(&req)).await?;
        tracing::info!("User successfully created, ID: {}", user.id);

        Ok(mapper::to_view(&user))
    }

    pub async fn get_all(&self) -> Result<Vec<UserView>, AppError> {
        let users = self.repo.find_all().await?;
        Ok(users.iter().map(mapper::to_view).collect())
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<UserView, AppError> {
        let user = self.find_existing(id).await?;
        Ok(mapper::to_view(&user))
    }

    pub async fn update(
        &self,
        id: Uuid,
        req: Option<CreateUserRequest>,
    ) -> Result<UserView, AppError> {
        let Some(req) = req else {
            tracing::error!("Provided entity is null");
            return Err(AppError::NullInput);
        };

        let mut user = self.find_existing(id).await?;
        self.ensure_unique(&req, Some(id)).await?;

        mapper::update_entity(Some(&req), Some(&mut user))?;
        let saved = self.repo.save(&user).await?;
        tracing::info!("User with ID: {} successfully updated", id);

        Ok(mapper::to_view(&saved))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.exists_by_id(id).await? {
            tracing::error!("User with ID: {} not found", id);
            return Err(AppError::NotFound(id));
        }

        self.repo.delete_by_id(id).await?;
        tracing::info!("User with ID: {} successfully deleted", id);

        Ok(())
    }

    async fn find_existing(&self, id: Uuid) -> Result<User, AppError> {
        self.repo.find_by_id(id).await?.ok_or_else(|| {
            tracing::error!("User with ID: {} not found", id);
            AppError::NotFound(id)
        })
    }

    async fn ensure_unique(
        &self,
        req: &CreateUserRequest,
        exclude_id: Option<Uuid>,
    ) -> Result<(), AppError> {
        let existing = self
            .repo
            .find_conflicting(&req.email, &req.username, &req.phone_number, exclude_id)
            .await?;

        let conflicts = conflicting_fields(req, exclude_id, &existing);
        if conflicts.is_empty() {
            return Ok(());
        }

        tracing::warn!(
            "Unique constraint violations on fields: {:?}",
            conflicts.keys().collect::<Vec<_>>()
        );
        Err(AppError::UniqueConstraintViolation(conflicts))
    }
}

/// Fields of `req` already used by some other user in `existing`.
fn conflicting_fields(
    req: &CreateUserRequest,
    exclude_id: Option<Uuid>,
    existing: &[User],
) -> FieldErrors {
    let mut conflicts = FieldErrors::new();

    for user in existing.iter().filter(|u| exclude_id != Some(u.id)) {
        let checks = [
            (UniqueField::Email, user.email == req.email),
            (UniqueField::Username, user.username == req.username),
            (UniqueField::PhoneNumber, user.phone_number == req.phone_number),
        ];

        for (field, clash) in checks {
            if clash {
                conflicts.insert(field.key().to_string(), field.conflict_message().to_string());
            }
        }
    }

    conflicts
}
