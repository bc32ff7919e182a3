pub mod dto;
pub mod handlers;
pub mod repo;
pub mod services;

use axum::{
    extract::Request,
    middleware::{self, Next},
    routing::{get, post},
    Router,
};

use crate::auth::middleware::{enforce, RoleRequirement};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    let public = Router::new()
        .route("/accounts", post(handlers::create_account))
        .route("/accounts/verify", post(handlers::verify_email))
        .route("/auth/login", post(handlers::login));

    // Any authenticated identity, role irrelevant.
    let authed = Router::new()
        .route("/me", get(handlers::me).patch(handlers::edit_profile))
        .route("/users/:id", get(handlers::user_profile))
        .route_layer(middleware::from_fn(|req: Request, next: Next| {
            enforce(RoleRequirement::Any, req, next)
        }));

    public.merge(authed)
}
