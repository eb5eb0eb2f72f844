//! Persistence gateway for user records.
//!
//! The service only talks to [`UserRepository`]; the Postgres adapter is used
//! when a database is configured, the in-memory one otherwise and in tests.

mod memory;
mod postgres;

use async_trait::async_trait;
use users_shared::{NewUser, User};
use uuid::Uuid;

pub use memory::InMemoryUserRepository;
pub use postgres::PgUserRepository;

/// Columns that must be unique across all users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Username,
    Email,
    PhoneNumber,
}

impl UniqueField {
    /// Wire name of the field, used as the key in field error maps.
    pub fn key(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Email => "email",
            Self::PhoneNumber => "phoneNumber",
        }
    }

    pub fn conflict_message(self) -> &'static str {
        match self {
            Self::Username => "Username is already in use",
            Self::Email => "Email is already in use",
            Self::PhoneNumber => "Phone number is already in use",
        }
    }

    /// Maps a unique constraint name from the schema back to its field.
    pub fn from_constraint(name: &str) -> Option<Self> {
        match name {
            "users_username_key" => Some(Self::Username),
            "users_email_key" => Some(Self::Email),
            "users_phone_number_key" => Some(Self::PhoneNumber),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("{} is already taken", .0.key())]
    Duplicate(UniqueField),

    #[error("user {0} does not exist")]
    Missing(Uuid),

    #[error("store lock poisoned")]
    Poisoned,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user; the store assigns the identifier.
    async fn insert(&self, user: &NewUser) -> Result<User, RepositoryError>;

    /// Overwrite the mutable fields of an existing user.
    async fn save(&self, user: &User) -> Result<User, RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError>;

    /// Every user, in the order they were created.
    async fn find_all(&self) -> Result<Vec<User>, RepositoryError>;

    async fn exists_by_id(&self, id: Uuid) -> Result<bool, RepositoryError>;

    async fn delete_by_id(&self, id: Uuid) -> Result<(), RepositoryError>;

    /// Users sharing the email, username or phone number, skipping
    /// `exclude_id` when given.
    async fn find_conflicting(
        &self,
        email: &str,
        username: &str,
        phone_number: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<Vec<User>, RepositoryError>;
}
