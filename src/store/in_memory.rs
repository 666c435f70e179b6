use std::sync::Mutex;

use anyhow::anyhow;
use async_trait::async_trait;
use sqlx::types::chrono::Utc;

use super::{StoreError, SubscriberStore};
use crate::domain::{NewSubscriber, Subscriber};

/// Keeps subscribers in process memory with the same uniqueness rule as the `subscribers`
/// table. Emails are compared byte for byte.
#[derive(Default)]
pub struct InMemorySubscriberStore {
    rows: Mutex<Vec<Subscriber>>,
}

impl InMemorySubscriberStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribers(&self) -> Result<Vec<Subscriber>, StoreError> {
        let rows = self
            .rows
            .lock()
            .map_err(|_| anyhow!("Subscriber table lock is poisoned."))?;
        Ok(rows.clone())
    }
}

#[async_trait]
impl SubscriberStore for InMemorySubscriberStore {
    async fn insert(&self, new_subscriber: &NewSubscriber) -> Result<Subscriber, StoreError> {
        let mut rows = self
            .rows
            .lock()
            .map_err(|_| anyhow!("Subscriber table lock is poisoned."))?;

        if rows
            .iter()
            .any(|row| row.email == new_subscriber.email.as_ref())
        {
            return Err(StoreError::UniqueViolation);
        }

        let id = i32::try_from(rows.len() + 1)
            .map_err(|_| anyhow!("Subscriber id space is exhausted."))?;
        let subscriber = Subscriber {
            id,
            email: new_subscriber.email.as_ref().to_owned(),
            created_at: Utc::now(),
        };
        rows.push(subscriber.clone());

        Ok(subscriber)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let rows = self
            .rows
            .lock()
            .map_err(|_| anyhow!("Subscriber table lock is poisoned."))?;
        let count = i64::try_from(rows.len())
            .map_err(|_| anyhow!("Subscriber count does not fit in i64."))?;
        Ok(count)
    }
}
