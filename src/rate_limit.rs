//! Per-address request limiting for the `/api` scope.
//!
//! Each source IP gets a fixed window of `window` length that opens on its first request.
//! Within a window at most `max_requests` requests are let through; the rest are answered
//! with `429 Too Many Requests` before reaching any handler.

use std::collections::HashMap;
use std::net::IpAddr;
use std::time::{Duration, Instant};

use actix_web::{
    HttpResponse,
    body::{BoxBody, MessageBody},
    dev::{ServiceRequest, ServiceResponse},
    http::header::{HeaderMap, HeaderName, HeaderValue, RETRY_AFTER},
    middleware::Next,
    web,
};
use parking_lot::Mutex;

use crate::configuration::RateLimitSettings;

const RATELIMIT_LIMIT: &str = "ratelimit-limit";
const RATELIMIT_REMAINING: &str = "ratelimit-remaining";
const RATELIMIT_RESET: &str = "ratelimit-reset";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Time until the caller's window closes.
    pub reset_after: Duration,
}

impl RateLimitDecision {
    /// `reset_after` in whole seconds, rounded up so a client never gets told to retry early.
    pub fn reset_secs(&self) -> u64 {
        self.reset_after.as_secs() + u64::from(self.reset_after.subsec_nanos() > 0)
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    hits: u32,
}

#[derive(Debug)]
struct Windows {
    by_ip: HashMap<IpAddr, Window>,
    last_sweep: Instant,
}

#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    windows: Mutex<Windows>,
}

#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct RateLimitedResponse {
    pub error: String,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            windows: Mutex::new(Windows {
                by_ip: HashMap::new(),
                last_sweep: Instant::now(),
            }),
        }
    }

    pub fn from_settings(settings: &RateLimitSettings) -> Self {
        Self::new(settings.max_requests, settings.window())
    }

    /// Records a request from `ip` at `now` and reports whether it may proceed.
    pub fn check(&self, ip: IpAddr, now: Instant) -> RateLimitDecision {
        let mut windows = self.windows.lock();

        if now.saturating_duration_since(windows.last_sweep) >= self.window {
            let window = self.window;
            windows
                .by_ip
                .retain(|_, w| now.saturating_duration_since(w.started) < window);
            windows.last_sweep = now;
        }

        let entry = windows.by_ip.entry(ip).or_insert(Window {
            started: now,
            hits: 0,
        });
        if now.saturating_duration_since(entry.started) >= self.window {
            *entry = Window {
                started: now,
                hits: 0,
            };
        }

        let allowed = entry.hits < self.max_requests;
        if allowed {
            entry.hits += 1;
        }

        RateLimitDecision {
            allowed,
            limit: self.max_requests,
            remaining: self.max_requests.saturating_sub(entry.hits),
            reset_after: self
                .window
                .saturating_sub(now.saturating_duration_since(entry.started)),
        }
    }

    /// Number of addresses currently holding a window.
    pub fn tracked_addresses(&self) -> usize {
        self.windows.lock().by_ip.len()
    }
}

fn insert_rate_limit_headers(headers: &mut HeaderMap, decision: &RateLimitDecision) {
    headers.insert(
        HeaderName::from_static(RATELIMIT_LIMIT),
        HeaderValue::from(decision.limit),
    );
    headers.insert(
        HeaderName::from_static(RATELIMIT_REMAINING),
        HeaderValue::from(decision.remaining),
    );
    headers.insert(
        HeaderName::from_static(RATELIMIT_RESET),
        HeaderValue::from(decision.reset_secs()),
    );
}

/// Middleware gating the `/api` scope. Requests without a known peer address, or served by an
/// app without a [`RateLimiter`], pass through untouched.
pub async fn rate_limit(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<BoxBody>, actix_web::Error> {
    let limiter = req.app_data::<web::Data<RateLimiter>>().cloned();
    let peer_ip = req.peer_addr().map(|addr| addr.ip());

    let (Some(limiter), Some(ip)) = (limiter, peer_ip) else {
        return Ok(next.call(req).await?.map_into_boxed_body());
    };

    let decision = limiter.check(ip, Instant::now());

    if !decision.allowed {
        tracing::warn!(client_ip = %ip, "Rate limit exceeded");
        let mut response = HttpResponse::TooManyRequests()
            .insert_header((RETRY_AFTER, decision.reset_secs().to_string()))
            .json(RateLimitedResponse {
                error: "Too many requests from this IP, please try again later".into(),
            });
        insert_rate_limit_headers(response.headers_mut(), &decision);
        return Ok(req.into_response(response));
    }

    let mut response = next.call(req).await?.map_into_boxed_body();
    insert_rate_limit_headers(response.headers_mut(), &decision);
    Ok(response)
}
