use actix_web::{HttpResponse, web};

use crate::store::SubscriberStore;

use super::types::SubscriberCountResponse;

#[tracing::instrument(name = "Reading subscriber count.", skip(store))]
pub async fn subscriber_count(store: web::Data<dyn SubscriberStore>) -> HttpResponse {
    let count = count_subscribers(store.get_ref()).await;
    HttpResponse::Ok().json(SubscriberCountResponse { count })
}

/// Live number of subscribers. The figure is display-only, so storage failures are logged
/// and reported as zero.
pub async fn count_subscribers(store: &dyn SubscriberStore) -> i64 {
    match store.count().await {
        Ok(count) => count,
        Err(e) => {
            tracing::error!(
                error.cause_chain = ?e,
                error.message = %e,
                "Failed to count subscribers, falling back to zero"
            );
            0
        }
    }
}
