use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
}

impl Category {
    /// Find or create a category by normalized name. The upsert keeps
    /// concurrent creators from racing to a duplicate.
    pub async fn get_or_create(db: &PgPool, name: &str) -> anyhow::Result<Category> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name)
            VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id, name
            "#,
        )
        .bind(name)
        .fetch_one(db)
        .await?;
        Ok(category)
    }
}

/// `owner_id` is set at creation and never updated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Restaurant {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub category_id: Uuid,
    pub owner_id: Uuid,
    pub created_at: OffsetDateTime,
}

impl Restaurant {
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Restaurant>> {
        let restaurant = sqlx::query_as::<_, Restaurant>(
            r#"
            SELECT id, name, address, category_id, owner_id, created_at
            FROM restaurants
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(restaurant)
    }

    pub async fn create(
        db: &PgPool,
        name: &str,
        address: &str,
        category_id: Uuid,
        owner_id: Uuid,
    ) -> anyhow::Result<Restaurant> {
        let restaurant = sqlx::query_as::<_, Restaurant>(
            r#"
            INSERT INTO restaurants (name, address, category_id, owner_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, address, category_id, owner_id, created_at
            "#,
        )
        .bind(name)
        .bind(address)
        .bind(category_id)
        .bind(owner_id)
        .fetch_one(db)
        .await?;
        Ok(restaurant)
    }

    pub async fn update(
        db: &PgPool,
        id: Uuid,
        name: &str,
        address: &str,
        category_id: Uuid,
    ) -> anyhow::Result<Restaurant> {
        let restaurant = sqlx::query_as::<_, Restaurant>(
            r#"
            UPDATE restaurants
            SET name = $2, address = $3, category_id = $4
            WHERE id = $1
            RETURNING id, name, address, category_id, owner_id, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(address)
        .bind(category_id)
        .fetch_one(db)
        .await?;
        Ok(restaurant)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM restaurants WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Dish {
    pub id: Uuid,
    pub name: String,
    pub price: i32,
    pub description: String,
    pub photo: Option<String>,
    pub restaurant_id: Uuid,
    pub created_at: OffsetDateTime,
}

/// A dish joined to its parent restaurant's owner. Dishes carry no owner
/// column; ownership resolves through the restaurant, fetched eagerly here
/// in one query.
#[derive(Debug, Clone, FromRow)]
pub struct DishWithOwner {
    pub id: Uuid,
    pub name: String,
    pub price: i32,
    pub description: String,
    pub photo: Option<String>,
    pub restaurant_id: Uuid,
    pub owner_id: Uuid,
}

impl Dish {
    pub async fn create(
        db: &PgPool,
        name: &str,
        price: i32,
        description: &str,
        photo: Option<&str>,
        restaurant_id: Uuid,
    ) -> anyhow::Result<Dish> {
        let dish = sqlx::query_as::<_, Dish>(
            r#"
            INSERT INTO dishes (name, price, description, photo, restaurant_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, price, description, photo, restaurant_id, created_at
            "#,
        )
        .bind(name)
        .bind(price)
        .bind(description)
        .bind(photo)
        .bind(restaurant_id)
        .fetch_one(db)
        .await?;
        Ok(dish)
    }

    pub async fn find_with_owner(db: &PgPool, id: Uuid) -> anyhow::Result<Option<DishWithOwner>> {
        let dish = sqlx::query_as::<_, DishWithOwner>(
            r#"
            SELECT d.id, d.name, d.price, d.description, d.photo, d.restaurant_id, r.owner_id
            FROM dishes d
            JOIN restaurants r ON r.id = d.restaurant_id
            WHERE d.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(dish)
    }

    pub async fn list_by_restaurant(db: &PgPool, restaurant_id: Uuid) -> anyhow::Result<Vec<Dish>> {
        let dishes = sqlx::query_as::<_, Dish>(
            r#"
            SELECT id, name, price, description, photo, restaurant_id, created_at
            FROM dishes
            WHERE restaurant_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(restaurant_id)
        .fetch_all(db)
        .await?;
        Ok(dishes)
    }

    pub async fn update(
        db: &PgPool,
        id: Uuid,
        name: &str,
        price: i32,
        description: &str,
        photo: Option<&str>,
    ) -> anyhow::Result<Dish> {
        let dish = sqlx::query_as::<_, Dish>(
            r#"
            UPDATE dishes
            SET name = $2, price = $3, description = $4, photo = $5
            WHERE id = $1
            RETURNING id, name, price, description, photo, restaurant_id, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(price)
        .bind(description)
        .bind(photo)
        .fetch_one(db)
        .await?;
        Ok(dish)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM dishes WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }
}
