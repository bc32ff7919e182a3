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
use crate::users::repo::UserRole;

pub fn router() -> Router<AppState> {
    // Reads are public; the handler still sees who is asking.
    let public = Router::new().route("/restaurants/:id", get(handlers::get_restaurant));

    let owner_only = Router::new()
        .route("/restaurants", post(handlers::create_restaurant))
        .route(
            "/restaurants/:id",
            axum::routing::patch(handlers::edit_restaurant).delete(handlers::delete_restaurant),
        )
        .route("/dishes", post(handlers::create_dish))
        .route(
            "/dishes/:id",
            axum::routing::patch(handlers::edit_dish).delete(handlers::delete_dish),
        )
        .route_layer(middleware::from_fn(|req: Request, next: Next| {
            enforce(RoleRequirement::Only(UserRole::Owner), req, next)
        }));

    public.merge(owner_only)
}
