use users_shared::api::{CreateUserRequest, UserView};
use users_shared::{NewUser, User};

use crate::error::AppError;

pub fn to_entity(req: &CreateUserRequest) -> NewUser {
    NewUser {
        username: req.username.clone(),
        first_name: req.first_name.clone(),
        last_name: req.last_name.clone(),
        email: req.email.clone(),
        phone_number: req.phone_number.clone(),
    }
}

pub fn to_view(user: &User) -> UserView {
    UserView {
        id: user.id,
        username: user.username.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        email: user.email.clone(),
        phone_number: user.phone_number.clone(),
    }
}

/// Overwrite the mutable fields of `user` with the request. The id is left alone.
pub fn update_entity(
    req: Option<&CreateUserRequest>,
    user: Option<&mut User>,
) -> Result<(), AppError> {
    let (Some(req), Some(user)) = (req, user) else {
        tracing::error!("Attempted to update entity from request, request and user must both be present");
        return Err(AppError::NullArgument);
    };

    user.username = req.username.clone();
    user.first_name = req.first_name.clone();
    user.last_name = req.last_name.clone();
    user.email = req.email.clone();
    user.phone_number = req.phone_number.clone();

    Ok(())
}
