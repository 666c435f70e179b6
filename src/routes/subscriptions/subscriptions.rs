use actix_web::{HttpResponse, web};

use crate::{
    domain::{NewSubscriber, SubscribeBody, SubscribeOutcome},
    store::{StoreError, SubscriberStore},
};

use super::{errors::SubscribeError, types::SubscribeResponse};

#[tracing::instrument(
    name = "Adding a new subscriber.",
    skip(body, store),
    fields(subscriber_email = %body.email)
)]
pub async fn subscribe(
    body: web::Json<SubscribeBody>,
    store: web::Data<dyn SubscriberStore>,
) -> Result<HttpResponse, SubscribeError> {
    let new_subscriber: NewSubscriber = body
        .into_inner()
        .try_into()
        .map_err(SubscribeError::ValidationError)?;

    let response = match register_subscriber(store.get_ref(), &new_subscriber).await? {
        SubscribeOutcome::Created => {
            HttpResponse::Created().json(SubscribeResponse::success("Successfully subscribed!"))
        }
        SubscribeOutcome::AlreadySubscribed => {
            HttpResponse::Ok().json(SubscribeResponse::success("You're already on the list!"))
        }
    };

    Ok(response)
}

/// Persists `new_subscriber`, treating an existing row for the same email as success.
///
/// The store's uniqueness constraint is the only guard against concurrent duplicates: of
/// several racing calls for one email exactly one observes [`SubscribeOutcome::Created`].
#[tracing::instrument(
    name = "Registering subscriber",
    skip(store, new_subscriber),
    fields(subscriber_email = %new_subscriber.email)
)]
pub async fn register_subscriber(
    store: &dyn SubscriberStore,
    new_subscriber: &NewSubscriber,
) -> Result<SubscribeOutcome, SubscribeError> {
    match store.insert(new_subscriber).await {
        Ok(subscriber) => {
            tracing::info!(subscriber_id = subscriber.id, "New subscriber saved");
            Ok(SubscribeOutcome::Created)
        }
        Err(StoreError::UniqueViolation) => {
            tracing::info!("Subscriber already on the list");
            Ok(SubscribeOutcome::AlreadySubscribed)
        }
        Err(StoreError::Unexpected(e)) => {
            let e = e.context("Failed to insert a new subscriber in the database.");
            tracing::error!(error.cause_chain = ?e, "Subscribe failed");
            Err(SubscribeError::UnexpectedError(e))
        }
    }
}
