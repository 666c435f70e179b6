use sqlx::types::chrono::{DateTime, Utc};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Subscriber {
    pub id: i32,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Successful results of a subscribe call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeOutcome {
    Created,
    AlreadySubscribed,
}
