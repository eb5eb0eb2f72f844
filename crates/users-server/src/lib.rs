pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod mapper;
pub mod repository;
pub mod routes;
pub mod service;
pub mod validation;

pub use config::Config;
pub use db::DbPool;
pub use routes::{create_router, AppState};
