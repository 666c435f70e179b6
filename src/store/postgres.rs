use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::chrono::Utc;

use super::{StoreError, SubscriberStore};
use crate::domain::{NewSubscriber, Subscriber};

#[derive(Clone)]
pub struct PostgresSubscriberStore {
    pool: PgPool,
}

impl PostgresSubscriberStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriberStore for PostgresSubscriberStore {
    #[tracing::instrument(
        name = "Saving new subscriber details in the database",
        skip(self, new_subscriber)
    )]
    async fn insert(&self, new_subscriber: &NewSubscriber) -> Result<Subscriber, StoreError> {
        let subscriber = sqlx::query_as::<_, Subscriber>(
            r#"
            INSERT INTO subscribers (email, created_at)
            VALUES ($1, $2)
            RETURNING id, email, created_at
            "#,
        )
        .bind(new_subscriber.email.as_ref())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(subscriber)
    }

    #[tracing::instrument(name = "Counting subscribers", skip(self))]
    async fn count(&self) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM subscribers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
