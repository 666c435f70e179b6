mod health_check;
mod helpers;
mod rate_limit;
mod subscriber_count;
