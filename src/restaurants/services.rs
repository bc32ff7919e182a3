use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::restaurants::dto::{
    CreateDishRequest, CreateRestaurantRequest, EditDishRequest, EditRestaurantRequest,
    RestaurantView,
};
use crate::restaurants::repo::{Category, Dish, DishWithOwner, Restaurant};
use crate::state::AppState;
use crate::users::repo::User;

fn normalize_category(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Ownership decision: a role only admits a caller to the class of
/// operation, it never implies ownership of any particular resource.
fn check_owner(resource_owner: Uuid, caller: Uuid, denial: &str) -> Result<(), AppError> {
    if resource_owner == caller {
        Ok(())
    } else {
        Err(AppError::Forbidden(denial.into()))
    }
}

/// An absent row becomes a not-found with the resource's message. Runs
/// before any ownership check, so a missing resource never reads as a
/// denial.
fn require_found<T>(found: Option<T>, missing: &str) -> Result<T, AppError> {
    found.ok_or_else(|| AppError::NotFound(missing.into()))
}

/// Load a restaurant and require that the caller owns it.
async fn restaurant_owned_by(
    db: &PgPool,
    restaurant_id: Uuid,
    caller: Uuid,
    denial: &str,
) -> Result<Restaurant, AppError> {
    let restaurant = require_found(
        Restaurant::find_by_id(db, restaurant_id).await?,
        "Restaurant not found",
    )?;
    check_owner(restaurant.owner_id, caller, denial)?;
    Ok(restaurant)
}

/// Load a dish with its owner resolved through the parent restaurant and
/// require that the caller owns it.
async fn dish_owned_by(
    db: &PgPool,
    dish_id: Uuid,
    caller: Uuid,
) -> Result<DishWithOwner, AppError> {
    let dish = require_found(Dish::find_with_owner(db, dish_id).await?, "Dish not found")?;
    check_owner(dish.owner_id, caller, "You can't do that.")?;
    Ok(dish)
}

pub async fn create_restaurant(
    state: &AppState,
    owner: &User,
    payload: CreateRestaurantRequest,
) -> Result<(), AppError> {
    let category =
        Category::get_or_create(&state.db, &normalize_category(&payload.category_name)).await?;
    let restaurant = Restaurant::create(
        &state.db,
        &payload.name,
        &payload.address,
        category.id,
        owner.id,
    )
    .await?;
    info!(restaurant_id = %restaurant.id, owner_id = %owner.id, "restaurant created");
    Ok(())
}

pub async fn get_restaurant(
    state: &AppState,
    restaurant_id: Uuid,
    caller: Option<Uuid>,
) -> Result<RestaurantView, AppError> {
    let restaurant = require_found(
        Restaurant::find_by_id(&state.db, restaurant_id).await?,
        "Restaurant not found",
    )?;
    let menu = Dish::list_by_restaurant(&state.db, restaurant.id).await?;
    Ok(RestaurantView::new(restaurant, menu, caller))
}

pub async fn edit_restaurant(
    state: &AppState,
    owner: &User,
    restaurant_id: Uuid,
    payload: EditRestaurantRequest,
) -> Result<(), AppError> {
    let restaurant = restaurant_owned_by(
        &state.db,
        restaurant_id,
        owner.id,
        "You can't edit a restaurant that you don't own.",
    )
    .await?;

    let category_id = match payload.category_name {
        Some(name) => {
            Category::get_or_create(&state.db, &normalize_category(&name))
                .await?
                .id
        }
        None => restaurant.category_id,
    };
    let name = payload.name.unwrap_or(restaurant.name);
    let address = payload.address.unwrap_or(restaurant.address);

    Restaurant::update(&state.db, restaurant.id, &name, &address, category_id).await?;
    info!(%restaurant_id, "restaurant edited");
    Ok(())
}

pub async fn delete_restaurant(
    state: &AppState,
    owner: &User,
    restaurant_id: Uuid,
) -> Result<(), AppError> {
    let restaurant = restaurant_owned_by(
        &state.db,
        restaurant_id,
        owner.id,
        "You can't delete a restaurant that you don't own.",
    )
    .await?;
    Restaurant::delete(&state.db, restaurant.id).await?;
    info!(%restaurant_id, "restaurant deleted");
    Ok(())
}

pub async fn create_dish(
    state: &AppState,
    owner: &User,
    payload: CreateDishRequest,
) -> Result<(), AppError> {
    let restaurant = restaurant_owned_by(
        &state.db,
        payload.restaurant_id,
        owner.id,
        "You can't do that.",
    )
    .await?;
    let dish = Dish::create(
        &state.db,
        &payload.name,
        payload.price,
        &payload.description,
        payload.photo.as_deref(),
        restaurant.id,
    )
    .await?;
    info!(dish_id = %dish.id, restaurant_id = %restaurant.id, "dish created");
    Ok(())
}

pub async fn edit_dish(
    state: &AppState,
    owner: &User,
    dish_id: Uuid,
    payload: EditDishRequest,
) -> Result<(), AppError> {
    let dish = dish_owned_by(&state.db, dish_id, owner.id).await?;

    let name = payload.name.unwrap_or(dish.name);
    let price = payload.price.unwrap_or(dish.price);
    let description = payload.description.unwrap_or(dish.description);
    let photo = payload.photo.or(dish.photo);

    Dish::update(&state.db, dish.id, &name, price, &description, photo.as_deref()).await?;
    info!(%dish_id, "dish edited");
    Ok(())
}

pub async fn delete_dish(state: &AppState, owner: &User, dish_id: Uuid) -> Result<(), AppError> {
    let dish = dish_owned_by(&state.db, dish_id, owner.id).await?;
    Dish::delete(&state.db, dish.id).await?;
    info!(%dish_id, "dish deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_match_passes() {
        let id = Uuid::new_v4();
        assert!(check_owner(id, id, "nope").is_ok());
    }

    #[test]
    fn owner_mismatch_is_forbidden_with_the_declared_denial() {
        let err = check_owner(Uuid::new_v4(), Uuid::new_v4(), "You can't do that.").unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert_eq!(err.to_string(), "You can't do that.");
    }

    #[test]
    fn missing_resources_map_to_their_not_found_message() {
        let err = require_found::<Restaurant>(None, "Restaurant not found").unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(err.to_string(), "Restaurant not found");

        let err = require_found::<DishWithOwner>(None, "Dish not found").unwrap_err();
        assert_eq!(err.to_string(), "Dish not found");
    }

    #[test]
    fn found_resources_pass_through() {
        assert_eq!(require_found(Some(7), "nope").ok(), Some(7));
    }

    #[test]
    fn category_names_are_normalized() {
        assert_eq!(normalize_category("  Korean BBQ "), "korean bbq");
        assert_eq!(normalize_category("korean bbq"), "korean bbq");
    }
}
