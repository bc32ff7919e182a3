use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::instrument;
use uuid::Uuid;

use crate::auth::extractors::{Authed, MaybeUser};
use crate::error::{internal, mutation_response, MutationOutput};
use crate::restaurants::dto::{
    CreateDishRequest, CreateRestaurantRequest, EditDishRequest, EditRestaurantRequest,
    RestaurantOutput,
};
use crate::restaurants::services;
use crate::state::AppState;

#[instrument(skip(state, owner, payload))]
pub async fn create_restaurant(
    State(state): State<AppState>,
    Authed(owner): Authed,
    Json(payload): Json<CreateRestaurantRequest>,
) -> Result<Json<MutationOutput>, (StatusCode, String)> {
    mutation_response(services::create_restaurant(&state, &owner, payload).await)
}

#[instrument(skip(state, caller))]
pub async fn get_restaurant(
    State(state): State<AppState>,
    MaybeUser(caller): MaybeUser,
    Path(id): Path<Uuid>,
) -> Result<Json<RestaurantOutput>, (StatusCode, String)> {
    match services::get_restaurant(&state, id, caller.map(|u| u.id)).await {
        Ok(view) => Ok(Json(RestaurantOutput {
            ok: true,
            error: None,
            restaurant: Some(view),
        })),
        Err(e) if e.is_internal() => Err(internal(e)),
        Err(e) => Ok(Json(RestaurantOutput {
            ok: false,
            error: Some(e.to_string()),
            restaurant: None,
        })),
    }
}

#[instrument(skip(state, owner, payload))]
pub async fn edit_restaurant(
    State(state): State<AppState>,
    Authed(owner): Authed,
    Path(id): Path<Uuid>,
    Json(payload): Json<EditRestaurantRequest>,
) -> Result<Json<MutationOutput>, (StatusCode, String)> {
    mutation_response(services::edit_restaurant(&state, &owner, id, payload).await)
}

#[instrument(skip(state, owner))]
pub async fn delete_restaurant(
    State(state): State<AppState>,
    Authed(owner): Authed,
    Path(id): Path<Uuid>,
) -> Result<Json<MutationOutput>, (StatusCode, String)> {
    mutation_response(services::delete_restaurant(&state, &owner, id).await)
}

#[instrument(skip(state, owner, payload))]
pub async fn create_dish(
    State(state): State<AppState>,
    Authed(owner): Authed,
    Json(payload): Json<CreateDishRequest>,
) -> Result<Json<MutationOutput>, (StatusCode, String)> {
    mutation_response(services::create_dish(&state, &owner, payload).await)
}

#[instrument(skip(state, owner, payload))]
pub async fn edit_dish(
    State(state): State<AppState>,
    Authed(owner): Authed,
    Path(id): Path<Uuid>,
    Json(payload): Json<EditDishRequest>,
) -> Result<Json<MutationOutput>, (StatusCode, String)> {
    mutation_response(services::edit_dish(&state, &owner, id, payload).await)
}

#[instrument(skip(state, owner))]
pub async fn delete_dish(
    State(state): State<AppState>,
    Authed(owner): Authed,
    Path(id): Path<Uuid>,
) -> Result<Json<MutationOutput>, (StatusCode, String)> {
    mutation_response(services::delete_dish(&state, &owner, id).await)
}
