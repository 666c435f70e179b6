use crate::configuration::{DatabaseSettings, Settings};
use crate::rate_limit::{RateLimiter, rate_limit};
use crate::routes::{
    PingMessage, health_check, json_error_handler, not_found, ping, subscribe, subscriber_count,
};
use crate::store::{PostgresSubscriberStore, SubscriberStore};
use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::http::{Method, header};
use actix_web::middleware::{Compress, Condition, from_fn};
use actix_web::{App, HttpServer, web};
use anyhow::Context;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;
use tracing_actix_web::TracingLogger;

/// Seconds in-flight requests get to finish after a shutdown signal.
const SHUTDOWN_TIMEOUT_SECS: u64 = 10;

pub struct Application {
    port: u16,
    server: Server,
}

/// Everything the HTTP layer needs besides the listener.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SubscriberStore>,
    pub ping_message: String,
    pub allowed_origins: Vec<String>,
    /// `None` disables rate limiting.
    pub rate_limiter: Option<web::Data<RateLimiter>>,
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, anyhow::Error> {
        let connection_pool = get_connection_pool(&config.database);
        let state = AppState {
            store: Arc::new(PostgresSubscriberStore::new(connection_pool)),
            ping_message: config.app.ping_message.clone(),
            allowed_origins: config.app.allowed_origins.clone(),
            rate_limiter: config
                .rate_limit
                .enabled
                .then(|| web::Data::new(RateLimiter::from_settings(&config.rate_limit))),
        };

        let address = format!("{}:{}", config.app.host, config.app.port);
        let listener =
            TcpListener::bind(&address).with_context(|| format!("Failed to bind {address}"))?;
        let port = listener
            .local_addr()
            .context("Failed to read the bound address")?
            .port();
        tracing::info!(%address, port, "Listening");

        let server = run(listener, state)?;

        Ok(Self { port, server })
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

/// Registers the routes and middleware shared by the server and the handler tests.
pub fn configure_app(cfg: &mut web::ServiceConfig, state: &AppState) {
    let store: web::Data<dyn SubscriberStore> = web::Data::from(state.store.clone());
    if let Some(limiter) = &state.rate_limiter {
        cfg.app_data(limiter.clone());
    }
    cfg.app_data(store)
        .app_data(web::Data::new(PingMessage(state.ping_message.clone())))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .route("/health_check", web::get().to(health_check))
        .service(
            web::scope("/api")
                .wrap(Condition::new(
                    state.rate_limiter.is_some(),
                    from_fn(rate_limit),
                ))
                .route("/ping", web::get().to(ping))
                .route("/subscribe", web::post().to(subscribe))
                .route("/subscribers/count", web::get().to(subscriber_count)),
        )
        .default_service(web::to(not_found));
}

/// Cross-origin policy for browser clients served from another origin.
///
/// An empty `allowed_origins` lets any origin through; the request origin is echoed back so
/// credentialed requests keep working.
pub fn cors(allowed_origins: &[String]) -> Cors {
    let cors = if allowed_origins.is_empty() {
        Cors::default().allow_any_origin()
    } else {
        allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };

    cors.supports_credentials()
        .allowed_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allowed_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

pub fn run(listener: TcpListener, state: AppState) -> Result<Server, anyhow::Error> {
    let server = HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .wrap(cors(&state.allowed_origins))
            .wrap(TracingLogger::default())
            .configure(|cfg| configure_app(cfg, &state))
    })
    .shutdown_timeout(SHUTDOWN_TIMEOUT_SECS)
    .listen(listener)?
    .run();

    Ok(server)
}

pub fn get_connection_pool(db_config: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(Duration::from_secs(2))
        .connect_lazy_with(db_config.with_db())
}
