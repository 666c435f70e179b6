mod count;
mod errors;
#[allow(clippy::module_inception)]
mod subscriptions;
mod types;

pub use count::{count_subscribers, subscriber_count};
pub use errors::{GENERIC_FAILURE_MESSAGE, SubscribeError, json_error_handler};
pub use subscriptions::{register_subscriber, subscribe};
pub use types::{SubscribeResponse, SubscriberCountResponse};
