mod health_check;
mod helpers;
mod not_found;
mod ping;
mod subscriptions;

pub use health_check::health_check;
pub use helpers::error_chain_fmt;
pub use not_found::{NotFoundResponse, not_found};
pub use ping::{PingMessage, PingResponse, ping};
pub use subscriptions::*;
