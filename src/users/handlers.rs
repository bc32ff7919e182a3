use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::instrument;
use uuid::Uuid;

use crate::auth::extractors::Authed;
use crate::error::{internal, mutation_response, MutationOutput};
use crate::state::AppState;
use crate::users::dto::{
    CreateAccountRequest, EditProfileRequest, LoginOutput, LoginRequest, PublicUser,
    UserProfileOutput, VerifyEmailRequest,
};
use crate::users::services;

#[instrument(skip(state, payload))]
pub async fn create_account(
    State(state): State<AppState>,
    Json(payload): Json<CreateAccountRequest>,
) -> Result<Json<MutationOutput>, (StatusCode, String)> {
    mutation_response(services::create_account(&state, payload).await)
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginOutput>, (StatusCode, String)> {
    match services::login(&state, payload).await {
        Ok(token) => Ok(Json(LoginOutput {
            ok: true,
            error: None,
            token: Some(token),
        })),
        Err(e) if e.is_internal() => Err(internal(e)),
        Err(e) => Ok(Json(LoginOutput {
            ok: false,
            error: Some(e.to_string()),
            token: None,
        })),
    }
}

#[instrument(skip_all)]
pub async fn me(Authed(user): Authed) -> Json<PublicUser> {
    Json(PublicUser::from(user))
}

#[instrument(skip(state))]
pub async fn user_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserProfileOutput>, (StatusCode, String)> {
    match services::user_profile(&state, user_id).await {
        Ok(user) => Ok(Json(UserProfileOutput {
            ok: true,
            error: None,
            user: Some(PublicUser::from(user)),
        })),
        Err(e) if e.is_internal() => Err(internal(e)),
        Err(e) => Ok(Json(UserProfileOutput {
            ok: false,
            error: Some(e.to_string()),
            user: None,
        })),
    }
}

#[instrument(skip(state, user, payload))]
pub async fn edit_profile(
    State(state): State<AppState>,
    Authed(user): Authed,
    Json(payload): Json<EditProfileRequest>,
) -> Result<Json<MutationOutput>, (StatusCode, String)> {
    mutation_response(services::edit_profile(&state, user, payload).await)
}

#[instrument(skip(state, payload))]
pub async fn verify_email(
    State(state): State<AppState>,
    Json(payload): Json<VerifyEmailRequest>,
) -> Result<Json<MutationOutput>, (StatusCode, String)> {
    mutation_response(services::verify_email(&state, &payload.code).await)
}
