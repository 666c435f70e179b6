use serde_json::json;

use crate::helpers::{spawn_app, spawn_app_without_database};

#[tokio::test]
async fn count_is_zero_for_an_empty_list() {
    let app = spawn_app().await;

    let response = app.get_subscriber_count().await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "count": 0 }));
}

#[tokio::test]
async fn count_follows_new_subscriptions_but_not_duplicates() {
    let app = spawn_app().await;

    for email in [
        "driver44@example.com",
        "driver1@example.com",
        "driver44@example.com",
    ] {
        app.post_subscribe(&json!({ "email": email })).await;
    }

    let body: serde_json::Value = app.get_subscriber_count().await.json().await.unwrap();
    assert_eq!(body["count"], 2);
}

#[tokio::test]
async fn invalid_subscriptions_do_not_change_the_count() {
    let app = spawn_app().await;
    app.post_subscribe(&json!({ "email": "driver44@example.com" }))
        .await;

    app.post_subscribe(&json!({ "email": "not-an-email" })).await;

    let body: serde_json::Value = app.get_subscriber_count().await.json().await.unwrap();
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn count_falls_back_to_zero_when_storage_is_unreachable() {
    let app = spawn_app_without_database().await;

    let response = app.get_subscriber_count().await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "count": 0 }));
}
