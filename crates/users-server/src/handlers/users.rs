use axum::{extract::State, http::StatusCode, Json};
use users_shared::api::{ApiResponse, CreateUserRequest, UserView};
use uuid::Uuid;

use crate::error::AppError;
use crate::extract::{OptionalJson, Path};
use crate::routes::AppState;
use crate::validation::validate;

type Envelope<T> = (StatusCode, Json<ApiResponse<T>>);

fn envelope<T>(status: StatusCode, message: &str, data: T) -> Envelope<T> {
    (
        status,
        Json(ApiResponse::new(status.as_u16(), message, Some(data))),
    )
}

fn validated(body: Option<CreateUserRequest>) -> Result<Option<CreateUserRequest>, AppError> {
    if let Some(req) = &body {
        validate(req)?;
    }
    Ok(body)
}

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    OptionalJson(body): OptionalJson<CreateUserRequest>,
) -> Result<Envelope<UserView>, AppError> {
    let user = state.users.create(validated(body)?).await?;

    Ok(envelope(
        StatusCode::CREATED,
        "User created successfully",
        user,
    ))
}

/// GET /users
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Envelope<Vec<UserView>>, AppError> {
    let users = state.users.get_all().await?;

    Ok(envelope(
        StatusCode::OK,
        "Users retrieved successfully",
        users,
    ))
}

/// GET /users/:id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Envelope<UserView>, AppError> {
    let user = state.users.get_by_id(id).await?;

    Ok(envelope(StatusCode::OK, "User retrieved successfully", user))
}

/// PUT /users/:id
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    OptionalJson(body): OptionalJson<CreateUserRequest>,
) -> Result<Envelope<UserView>, AppError> {
    let user = state.users.update(id, validated(body)?).await?;

    Ok(envelope(StatusCode::OK, "User updated successfully", user))
}

/// DELETE /users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.users.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
