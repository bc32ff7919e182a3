use axum::{extract::State, http::StatusCode, Json};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::extractors::Authed;
use crate::error::{mutation_response, AppError, MutationOutput};
use crate::orders::dto::CreateOrderRequest;
use crate::restaurants::repo::Restaurant;
use crate::state::AppState;

#[instrument(skip(state, customer, payload))]
pub async fn create_order(
    State(state): State<AppState>,
    Authed(customer): Authed,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<Json<MutationOutput>, (StatusCode, String)> {
    mutation_response(place_order(&state, customer.id, payload.restaurant_id).await)
}

async fn place_order(
    state: &AppState,
    customer_id: Uuid,
    restaurant_id: Uuid,
) -> Result<(), AppError> {
    let restaurant = Restaurant::find_by_id(&state.db, restaurant_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Restaurant not found".into()))?;

    let order = crate::orders::repo::Order::create(&state.db, customer_id, restaurant.id).await?;
    info!(order_id = %order.id, %customer_id, %restaurant_id, "order placed");
    Ok(())
}
