//! HTTP-level tests for TwitterClient against a mock server.

use serde_json::json;
use twitter_client::{Credentials, PageQuery, TweetId, TwitterClient, TwitterError};
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const JSON_UTF8: &str = "application/json; charset=utf-8";

fn credentials() -> Credentials {
    Credentials {
        key: "key".to_string(),
        secret: "secret".to_string(),
    }
}

async fn server_with_token() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(header("authorization", "Basic a2V5OnNlY3JldA=="))
        .and(body_string("grant_type=client_credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "bearer",
            "access_token": "tok",
        })))
        .mount(&server)
        .await;
    server
}

async fn connect(server: &MockServer) -> TwitterClient {
    TwitterClient::connect_with_base_url(&credentials(), &server.uri())
        .await
        .expect("token exchange should succeed")
}

fn id(raw: u64) -> Option<TweetId> {
    TweetId::new(raw)
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn rejected_credentials_surface_as_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(403).set_body_string("bad key"))
        .mount(&server)
        .await;

    let result = TwitterClient::connect_with_base_url(&credentials(), &server.uri()).await;
    match result {
        Err(TwitterError::Auth(msg)) => assert!(msg.contains("403")),
        other => panic!("expected Auth error, got {:?}", other.err()),
    }
}

#[tokio::test]
async fn non_bearer_token_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "mac",
            "access_token": "tok",
        })))
        .mount(&server)
        .await;

    let result = TwitterClient::connect_with_base_url(&credentials(), &server.uri()).await;
    assert!(matches!(result, Err(TwitterError::Auth(_))));
}

// =============================================================================
// Timeline requests
// =============================================================================

#[tokio::test]
async fn timeline_sends_bearer_and_boundaries() {
    let server = server_with_token().await;
    let body = json!([
        { "id": 300, "id_str": "300", "text": "newest" },
        { "id": 200, "id_str": "200", "text": "older" },
    ]);
    Mock::given(method("GET"))
        .and(path("/1.1/statuses/user_timeline.json"))
        .and(header("authorization", "Bearer tok"))
        .and(query_param("screen_name", "jack"))
        .and(query_param("count", "200"))
        .and(query_param("trim_user", "true"))
        .and(query_param("max_id", "999"))
        .and(query_param("since_id", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), JSON_UTF8))
        .expect(1)
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let query = PageQuery {
        max_id: id(999),
        since_id: id(100),
        count: 200,
    };
    let tweets = client.user_timeline("jack", &query).await.unwrap();

    let ids: Vec<u64> = tweets.iter().map(|t| t.id().unwrap().get()).collect();
    assert_eq!(ids, vec![300, 200]);
}

#[tokio::test]
async fn latest_page_omits_boundaries() {
    let server = server_with_token().await;
    Mock::given(method("GET"))
        .and(path("/1.1/statuses/user_timeline.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("[]", JSON_UTF8))
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let tweets = client
        .user_timeline("jack", &PageQuery::latest(200))
        .await
        .unwrap();
    assert!(tweets.is_empty());

    let requests = server.received_requests().await.unwrap();
    let timeline = requests
        .iter()
        .find(|r| r.url.path() == "/1.1/statuses/user_timeline.json")
        .unwrap();
    let keys: Vec<String> = timeline.url.query_pairs().map(|(k, _)| k.into_owned()).collect();
    assert!(!keys.contains(&"max_id".to_string()));
    assert!(!keys.contains(&"since_id".to_string()));
}

#[tokio::test]
async fn wrong_content_type_is_a_format_error() {
    let server = server_with_token().await;
    Mock::given(method("GET"))
        .and(path("/1.1/statuses/user_timeline.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<html>fail whale</html>", "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let err = client
        .user_timeline("jack", &PageQuery::latest(200))
        .await
        .unwrap_err();

    assert!(matches!(err, TwitterError::ContentType(ref ct) if ct.starts_with("text/html")));
    assert!(err.is_format_error());
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = server_with_token().await;
    Mock::given(method("GET"))
        .and(path("/1.1/statuses/user_timeline.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{\"errors\":", JSON_UTF8))
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let err = client
        .user_timeline("jack", &PageQuery::latest(200))
        .await
        .unwrap_err();

    assert!(matches!(err, TwitterError::Decode(_)));
}

#[tokio::test]
async fn server_error_is_an_api_error() {
    let server = server_with_token().await;
    Mock::given(method("GET"))
        .and(path("/1.1/statuses/user_timeline.json"))
        .respond_with(ResponseTemplate::new(503).set_body_string("over capacity"))
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let err = client
        .user_timeline("jack", &PageQuery::latest(200))
        .await
        .unwrap_err();

    match err {
        TwitterError::Api { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "over capacity");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn too_many_requests_reports_reset_time() {
    let server = server_with_token().await;
    Mock::given(method("GET"))
        .and(path("/1.1/statuses/user_timeline.json"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("x-rate-limit-remaining", "0")
                .insert_header("x-rate-limit-reset", "1303182615"),
        )
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let err = client
        .user_timeline("jack", &PageQuery::latest(200))
        .await
        .unwrap_err();

    match err {
        TwitterError::RateLimited { reset } => {
            assert_eq!(reset.unwrap().timestamp(), 1303182615);
        }
        other => panic!("expected RateLimited, got {other:?}"),
    }
}
