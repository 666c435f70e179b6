mod new_subscriber;
mod subscriber;
mod subscriber_email;

pub use new_subscriber::{NewSubscriber, SubscribeBody};
pub use subscriber::{SubscribeOutcome, Subscriber};
pub use subscriber_email::SubscriberEmail;
