use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::handlers::users as user_handlers;
use crate::repository::UserRepository;
use crate::service::UserService;

#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
}

impl AppState {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self {
            users: UserService::new(repo),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let user_routes = Router::new()
        .route(
            "/",
            post(user_handlers::create_user).get(user_handlers::list_users),
        )
        .route(
            "/:id",
            get(user_handlers::get_user)
                .put(user_handlers::update_user)
                .delete(user_handlers::delete_user),
        );

    Router::new()
        .route("/health", get(health_check))
        .nest("/users", user_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
