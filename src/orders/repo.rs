use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub restaurant_id: Uuid,
    pub status: String,
    pub created_at: OffsetDateTime,
}

impl Order {
    pub async fn create(
        db: &PgPool,
        customer_id: Uuid,
        restaurant_id: Uuid,
    ) -> anyhow::Result<Order> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (customer_id, restaurant_id)
            VALUES ($1, $2)
            RETURNING id, customer_id, restaurant_id, status, created_at
            "#,
        )
        .bind(customer_id)
        .bind(restaurant_id)
        .fetch_one(db)
        .await?;
        Ok(order)
    }
}
