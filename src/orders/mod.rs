pub mod dto;
pub mod handlers;
pub mod repo;

use axum::{
    extract::Request,
    middleware::{self, Next},
    routing::post,
    Router,
};

use crate::auth::middleware::{enforce, RoleRequirement};
use crate::state::AppState;
use crate::users::repo::UserRole;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", post(handlers::create_order))
        .route_layer(middleware::from_fn(|req: Request, next: Next| {
            enforce(RoleRequirement::Only(UserRole::Client), req, next)
        }))
}
