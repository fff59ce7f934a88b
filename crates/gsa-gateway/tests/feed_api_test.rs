//! Tests for feed push and delete endpoints.


use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};

use gsa_gateway::create_router;
use gsa_gateway::types::{ErrorResponse, FeedResponse};
use test_helpers::*;

fn request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn app_with(feeds: Arc<MockFeedClient>) -> axum::Router {
    create_router(make_test_state(MockTransport::new(""), feeds))
}

#[tokio::test]
async fn test_post_pushes_crawl_immediately_record() {
    let feeds = MockFeedClient::new(StatusCode::OK);
    let (status, body) = call(
        app_with(feeds.clone()),
        request(
            "POST",
            "/api/feed?u=http%253A%252F%252Fintranet%252Fnyheter%253Fid%253D4&s=Intranet",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let resp: FeedResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(resp.url, "http://intranet/nyheter?id=4");
    assert_eq!(resp.status, 200);

    let pushes = feeds.pushes.lock().unwrap();
    assert_eq!(pushes.len(), 1);
    let (xml, host) = &pushes[0];
    assert_eq!(host, "http://gsa.example.com");
    assert!(xml.contains(r#"url="http://intranet/nyheter?id=4""#));
    assert!(xml.contains(r#"crawl-immediately="true""#));
    assert!(!xml.contains("action="));
}

#[tokio::test]
async fn test_delete_pushes_delete_record() {
    let feeds = MockFeedClient::new(StatusCode::OK);
    let (status, _) = call(
        app_with(feeds.clone()),
        request("DELETE", "/api/feed?u=http%253A%252F%252Fintranet%252Fgammal&s=extranet"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let pushes = feeds.pushes.lock().unwrap();
    let (xml, host) = &pushes[0];
    assert_eq!(host, "http://gsa-ext.example.com");
    assert!(xml.contains(r#"url="http://intranet/gammal""#));
    assert!(xml.contains(r#"action="delete""#));
    assert!(xml.contains(r#"crawl-immediately="false""#));
}

#[tokio::test]
async fn test_appliance_status_is_passed_through() {
    let feeds = MockFeedClient::new(StatusCode::INTERNAL_SERVER_ERROR);
    let (status, body) = call(
        app_with(feeds),
        request("POST", "/api/feed?u=http%3A%2F%2Fintranet%2F&s=Intranet"),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let resp: FeedResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(resp.status, 500);
}

#[tokio::test]
async fn test_missing_url_is_bad_request() {
    let feeds = MockFeedClient::new(StatusCode::OK);
    for uri in ["/api/feed?s=Intranet", "/api/feed?u=&s=Intranet"] {
        let (status, body) = call(app_with(feeds.clone()), request("POST", uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let err: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert!(err.error.contains("u parameter"));
    }
    assert!(feeds.pushes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_system_is_bad_request() {
    let feeds = MockFeedClient::new(StatusCode::OK);
    let (status, body) = call(
        app_with(feeds.clone()),
        request("DELETE", "/api/feed?u=http%3A%2F%2Fintranet%2F"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let err: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert!(err.error.contains("s parameter"));

    let (status, _) = call(
        app_with(feeds.clone()),
        request("POST", "/api/feed?u=http%3A%2F%2Fintranet%2F&s=Nowhere"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(feeds.pushes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_get_on_feed_is_not_allowed() {
    let (status, _) = call(
        app_with(MockFeedClient::new(StatusCode::OK)),
        request("GET", "/api/feed?u=x&s=Intranet"),
    )
    .await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
