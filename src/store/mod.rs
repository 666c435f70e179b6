//! Persistence of subscribers.
//!
//! The HTTP layer only sees [`SubscriberStore`]; which backend sits behind it is decided in
//! [`crate::startup`].

mod in_memory;
mod postgres;

use async_trait::async_trait;

use crate::domain::{NewSubscriber, Subscriber};

pub use in_memory::InMemorySubscriberStore;
pub use postgres::PostgresSubscriberStore;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// The email is already present. Raised by the storage uniqueness constraint.
    #[error("A subscriber with this email already exists.")]
    UniqueViolation,
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db_error) if db_error.is_unique_violation() => {
                StoreError::UniqueViolation
            }
            _ => StoreError::Unexpected(e.into()),
        }
    }
}

#[async_trait]
pub trait SubscriberStore: Send + Sync {
    /// Inserts a single row. Fails with [`StoreError::UniqueViolation`] if the email is taken.
    async fn insert(&self, new_subscriber: &NewSubscriber) -> Result<Subscriber, StoreError>;

    /// Live row count.
    async fn count(&self) -> Result<i64, StoreError>;
}
