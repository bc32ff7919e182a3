use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::restaurants::repo::{Dish, Restaurant};

#[derive(Debug, Deserialize)]
pub struct CreateRestaurantRequest {
    pub name: String,
    pub address: String,
    pub category_name: String,
}

#[derive(Debug, Deserialize)]
pub struct EditRestaurantRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub category_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateDishRequest {
    pub restaurant_id: Uuid,
    pub name: String,
    pub price: i32,
    pub description: String,
    pub photo: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EditDishRequest {
    pub name: Option<String>,
    pub price: Option<i32>,
    pub description: Option<String>,
    pub photo: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DishView {
    pub id: Uuid,
    pub name: String,
    pub price: i32,
    pub description: String,
    pub photo: Option<String>,
}

impl From<Dish> for DishView {
    fn from(d: Dish) -> Self {
        Self {
            id: d.id,
            name: d.name,
            price: d.price,
            description: d.description,
            photo: d.photo,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RestaurantView {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub created_at: OffsetDateTime,
    /// Whether the requesting identity, if any, owns this restaurant.
    pub is_mine: bool,
    pub menu: Vec<DishView>,
}

impl RestaurantView {
    pub fn new(restaurant: Restaurant, menu: Vec<Dish>, caller: Option<Uuid>) -> Self {
        Self {
            is_mine: caller == Some(restaurant.owner_id),
            id: restaurant.id,
            name: restaurant.name,
            address: restaurant.address,
            created_at: restaurant.created_at,
            menu: menu.into_iter().map(DishView::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RestaurantOutput {
    pub ok: bool,
    pub error: Option<String>,
    pub restaurant: Option<RestaurantView>,
}
