use once_cell::sync::Lazy;
use revz::{
    configuration::{DatabaseSettings, Settings, get_configuration},
    startup::{Application, get_connection_pool},
    telemetry::{get_subscriber, init_subscriber},
};
use sqlx::{Connection, Executor, PgConnection, PgPool};
use uuid::Uuid;

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub address: String,
    pub db_pool: PgPool,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub async fn post_subscribe(&self, body: &serde_json::Value) -> reqwest::Response {
        self.api_client
            .post(format!("{}/api/subscribe", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_subscribe_raw(&self, body: &'static str) -> reqwest::Response {
        self.api_client
            .post(format!("{}/api/subscribe", &self.address))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_subscriber_count(&self) -> reqwest::Response {
        self.api_client
            .get(format!("{}/api/subscribers/count", &self.address))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn stored_emails(&self) -> Vec<String> {
        sqlx::query_scalar::<_, String>("SELECT email FROM subscribers ORDER BY id")
            .fetch_all(&self.db_pool)
            .await
            .expect("Failed to fetch saved subscribers")
    }
}

pub async fn configure_database(config: &DatabaseSettings) -> PgPool {
    let mut connection = PgConnection::connect_with(&config.without_db())
        .await
        .expect("Failed to connect to Postgres");

    connection
        .execute(format!(r#"CREATE DATABASE "{}";"#, config.database_name).as_str())
        .await
        .expect("Failed to create database");

    let connection_pool = PgPool::connect_with(config.with_db())
        .await
        .expect("Failed to connect to Postgres");

    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate database");

    connection_pool
}

fn test_configuration() -> Settings {
    let mut config = get_configuration().expect("Failed to read configuration");
    config.database.database_name = Uuid::new_v4().to_string();
    config.app.port = 0;
    config.app.ping_message = "pong".into();
    config.rate_limit.enabled = false;
    config
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Spawns the app against a fresh, migrated database after applying `customize`.
pub async fn spawn_app_with(customize: impl FnOnce(&mut Settings)) -> TestApp {
    Lazy::force(&TRACING);

    let mut config = test_configuration();
    customize(&mut config);

    configure_database(&config.database).await;
    launch(config).await
}

/// Spawns the app with its database pointed at a port nobody listens on.
pub async fn spawn_app_without_database() -> TestApp {
    Lazy::force(&TRACING);

    let mut config = test_configuration();
    config.database.port = 1;

    launch(config).await
}

async fn launch(config: Settings) -> TestApp {
    let application = Application::build(config.clone())
        .await
        .expect("Failed to build application.");
    let port = application.get_port();
    let _ = tokio::spawn(application.run_until_stopped());

    TestApp {
        address: format!("http://127.0.0.1:{port}"),
        db_pool: get_connection_pool(&config.database),
        api_client: reqwest::Client::new(),
    }
}
