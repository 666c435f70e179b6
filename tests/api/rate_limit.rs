use serde_json::json;

use crate::helpers::spawn_app_with;

#[tokio::test]
async fn api_requests_over_the_cap_get_429() {
    let app = spawn_app_with(|config| {
        config.rate_limit.enabled = true;
        config.rate_limit.max_requests = 3;
    })
    .await;

    for _ in 0..3 {
        let response = app.get_subscriber_count().await;
        assert_eq!(200, response.status().as_u16());
        assert!(response.headers().contains_key("ratelimit-limit"));
    }

    let response = app
        .post_subscribe(&json!({ "email": "driver44@example.com" }))
        .await;

    assert_eq!(429, response.status().as_u16());
    assert!(response.headers().contains_key("retry-after"));
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body["error"],
        "Too many requests from this IP, please try again later"
    );
    assert!(app.stored_emails().await.is_empty());
}

#[tokio::test]
async fn health_check_is_outside_the_limit() {
    let app = spawn_app_with(|config| {
        config.rate_limit.enabled = true;
        config.rate_limit.max_requests = 1;
    })
    .await;

    for _ in 0..3 {
        let response = app
            .api_client
            .get(format!("{}/health_check", app.address))
            .send()
            .await
            .expect("Failed to execute request.");
        assert_eq!(200, response.status().as_u16());
    }
}
