//! Mock article server helpers
//!
//! Thin wrappers over wiremock for the endpoints the engine talks to.

use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Server-side article JSON as returned by `GET /api/articles`
pub fn article_json(id: i64, starred: bool, status: &str) -> Value {
    json!({
        "id": id,
        "user_id": 1,
        "url": format!("https://example.com/{id}"),
        "title": format!("Article {id}"),
        "content": "<p>body</p>",
        "status": status,
        "starred": starred,
        "summary": null,
        "created_at": "2025-06-01T10:00:00.000000Z",
        "updated_at": "not a date"
    })
}

/// `GET /api/articles` always answering with `articles`
pub async fn mount_article_list(server: &MockServer, articles: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(articles)))
        .mount(server)
        .await;
}

/// `GET /api/articles` answering with `articles` once
pub async fn mount_article_list_once(server: &MockServer, articles: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(articles)))
        .up_to_n_times(1)
        .mount(server)
        .await;
}

/// An action endpoint answering `status`, expected exactly `calls` times
pub async fn mount_action(server: &MockServer, http_method: &str, route: &str, status: u16, calls: u64) {
    Mock::given(method(http_method))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .expect(calls)
        .mount(server)
        .await;
}

/// An action endpoint that answers once with `status`
pub async fn mount_action_once(server: &MockServer, http_method: &str, route: &str, status: u16) {
    Mock::given(method(http_method))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .up_to_n_times(1)
        .mount(server)
        .await;
}

/// An action endpoint that answers after `delay`
pub async fn mount_slow_action(server: &MockServer, http_method: &str, route: &str, delay: Duration, calls: u64) {
    Mock::given(method(http_method))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_delay(delay))
        .expect(calls)
        .mount(server)
        .await;
}

/// Requests the server has seen for `http_method route`
pub async fn requests_to(server: &MockServer, http_method: &str, route: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.method.as_str() == http_method && request.url.path() == route)
        .count()
}
