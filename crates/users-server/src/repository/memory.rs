use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use users_shared::{NewUser, User};
use uuid::Uuid;

use super::{RepositoryError, UniqueField, UserRepository};

/// Process-local user store.
///
/// Keeps users in insertion order and enforces the same unique columns as
/// the `users` table. Intended for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn taken(users: &[User], candidate: &User) -> Option<UniqueField> {
        users
            .iter()
            .filter(|u| u.id != candidate.id)
            .find_map(|u| {
                if u.username == candidate.username {
                    Some(UniqueField::Username)
                } else if u.email == candidate.email {
                    Some(UniqueField::Email)
                } else if u.phone_number == candidate.phone_number {
                    Some(UniqueField::PhoneNumber)
                } else {
                    None
                }
            })
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &NewUser) -> Result<User, RepositoryError> {
        let now = Utc::now();
        let stored = User {
            id: Uuid::new_v4(),
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            phone_number: user.phone_number.clone(),
            created_at: now,
            updated_at: now,
        };

        let mut users = self.users.write().map_err(|_| RepositoryError::Poisoned)?;
        if let Some(field) = Self::taken(&users, &stored) {
            return Err(RepositoryError::Duplicate(field));
        }
        users.push(stored.clone());

        Ok(stored)
    }

    async fn save(&self, user: &User) -> Result<User, RepositoryError> {
        let mut users = self.users.write().map_err(|_| RepositoryError::Poisoned)?;
        if let Some(field) = Self::taken(&users, user) {
            return Err(RepositoryError::Duplicate(field));
        }

        let existing = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(RepositoryError::Missing(user.id))?;

        existing.username = user.username.clone();
        existing.first_name = user.first_name.clone();
        existing.last_name = user.last_name.clone();
        existing.email = user.email.clone();
        existing.phone_number = user.phone_number.clone();
        existing.updated_at = Utc::now();

        Ok(existing.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        let users = self.users.read().map_err(|_| RepositoryError::Poisoned)?;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<User>, RepositoryError> {
        let users = self.users.read().map_err(|_| RepositoryError::Poisoned)?;
        Ok(users.clone())
    }

    async fn exists_by_id(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let users = self.users.read().map_err(|_| RepositoryError::Poisoned)?;
        Ok(users.iter().any(|u| u.id == id))
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), RepositoryError> {
        let mut users = self.users.write().map_err(|_| RepositoryError::Poisoned)?;
        let before = users.len();
        users.retain(|u| u.id != id);

        if users.len() == before {
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
        let users = self.users.read().map_err(|_| RepositoryError::Poisoned)?;

        Ok(users
            .iter()
            .filter(|u| exclude_id != Some(u.id))
            .filter(|u| u.email == email || u.username == username || u.phone_number == phone_number)
            .cloned()
            .collect())
    }
}
