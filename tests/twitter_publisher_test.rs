//! X API 投稿プロバイダーの HTTP 結合テスト

use mcp_social::posting::{PostPublisher, PostingError, TwitterConfig, TwitterPublisher};
use serde_json::json;
use wiremock::matchers::{body_json, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn publisher_for(server: &MockServer) -> TwitterPublisher {
    let config = TwitterConfig::new("consumer", "consumer-secret", "token", "token-secret")
        .with_base_url(server.uri());
    TwitterPublisher::new(config).unwrap()
}

#[tokio::test]
async fn test_post_signs_request_and_returns_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/2/tweets"))
        .and(header_exists("authorization"))
        .and(body_json(json!({ "text": "Hello from Rust 🦀" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": { "id": "1445880548472328192", "text": "Hello from Rust 🦀" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let post = publisher_for(&server).post("Hello from Rust 🦀").await.unwrap();
    assert_eq!(post.id, "1445880548472328192");
    assert_eq!(post.text, "Hello from Rust 🦀");

    let requests = server.received_requests().await.unwrap();
    let auth = requests[0]
        .headers
        .get("authorization")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(auth.starts_with("OAuth "));
    for field in [
        "oauth_consumer_key=\"consumer\"",
        "oauth_token=\"token\"",
        "oauth_signature_method=\"HMAC-SHA1\"",
        "oauth_version=\"1.0\"",
        "oauth_signature=",
        "oauth_nonce=",
        "oauth_timestamp=",
    ] {
        assert!(auth.contains(field), "missing {} in {}", field, auth);
    }
}

#[tokio::test]
async fn test_reply_sets_in_reply_to() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/2/tweets"))
        .and(body_json(json!({
            "text": "2/2 second",
            "reply": { "in_reply_to_tweet_id": "100" }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": { "id": "101", "text": "2/2 second" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let post = publisher_for(&server).reply("2/2 second", "100").await.unwrap();
    assert_eq!(post.id, "101");
}

#[tokio::test]
async fn test_forbidden_reports_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/2/tweets"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "title": "Forbidden",
            "detail": "You are not allowed to create a Tweet with duplicate content.",
            "type": "about:blank",
            "status": 403
        })))
        .mount(&server)
        .await;

    let err = publisher_for(&server).post("dup").await.unwrap_err();
    assert!(matches!(err, PostingError::ApiError { status: 403, .. }));
    assert_eq!(
        err.detail(),
        "You are not allowed to create a Tweet with duplicate content."
    );
}

#[tokio::test]
async fn test_unauthorized_and_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/2/tweets"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "title": "Unauthorized",
            "status": 401
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/2/tweets"))
        .respond_with(ResponseTemplate::new(429).set_body_string("Too Many Requests"))
        .mount(&server)
        .await;

    let publisher = publisher_for(&server);

    let err = publisher.post("a").await.unwrap_err();
    assert!(matches!(err, PostingError::AuthError(ref d) if d == "Unauthorized"));

    let err = publisher.post("b").await.unwrap_err();
    assert!(matches!(err, PostingError::RateLimitError(ref d) if d == "Too Many Requests"));
}

#[tokio::test]
async fn test_missing_data_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/2/tweets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "meta": {} })))
        .mount(&server)
        .await;

    let err = publisher_for(&server).post("x").await.unwrap_err();
    assert!(matches!(err, PostingError::InvalidResponse(_)));
}
