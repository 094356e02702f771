#![allow(clippy::unwrap_used)]
// Integration tests for `SyncBoxClient` using wiremock.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use syncbox_api::{
    ConnectionTarget, Error, ErrorKind, ExecutionUpdate, Resource, SyncBoxClient, TransportConfig,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn api_path(suffix: &str) -> String {
    format!("/api/v1{suffix}")
}

fn client_for(server: &MockServer, token: Option<&str>) -> SyncBoxClient {
    let base_url = Url::parse(&format!("{}/api/v1", server.uri())).unwrap();
    SyncBoxClient::with_client(
        reqwest::Client::new(),
        base_url,
        token.map(|t| SecretString::from(t.to_owned())),
    )
}

async fn setup(token: Option<&str>) -> (MockServer, SyncBoxClient) {
    let server = MockServer::start().await;
    let client = client_for(&server, token);
    (server, client)
}

fn device_error(status: u16, code: i64, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({ "code": code, "message": message }))
}

async fn authorization_headers(server: &MockServer) -> Vec<Option<String>> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| {
            r.headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(String::from)
        })
        .collect()
}

// ── Request executor ────────────────────────────────────────────────

#[tokio::test]
async fn test_get_state_attaches_token_and_content_type() {
    let (server, client) = setup(Some("secret-token")).await;

    Mock::given(method("GET"))
        .and(path("/api/v1"))
        .and(header("authorization", "Bearer secret-token"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"device": {"name": "Box"}})))
        .expect(1)
        .mount(&server)
        .await;

    let state = client.get_state().await.unwrap().unwrap();
    assert_eq!(state["device"]["name"], "Box");
}

#[tokio::test]
async fn test_no_token_means_no_authorization_header() {
    let (server, client) = setup(None).await;

    Mock::given(method("GET"))
        .and(path(api_path("/hdmi")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    client.get_resource(Resource::Hdmi).await.unwrap();
    assert_eq!(authorization_headers(&server).await, vec![None]);
}

#[tokio::test]
async fn test_non_json_success_returns_nothing() {
    let (server, client) = setup(Some("t")).await;

    Mock::given(method("PUT"))
        .and(path(api_path("/execution")))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let result = client.put("/execution", &json!({"mode": "game"})).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_json_content_type_is_matched_case_insensitively() {
    let (server, client) = setup(Some("t")).await;

    Mock::given(method("GET"))
        .and(path(api_path("/device")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"name":"Box"}"#, "Application/JSON; charset=utf-8"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("/hue")))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_raw(r#"{"code":2,"message":"Invalid token"}"#, "APPLICATION/JSON"),
        )
        .mount(&server)
        .await;

    let device = client.get_resource(Resource::Device).await.unwrap().unwrap();
    assert_eq!(device["name"], "Box");

    let err = client.get_resource(Resource::Hue).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert_eq!(err.code(), Some(2));
}

#[tokio::test]
async fn test_non_json_failure_is_request_failure() {
    let (server, client) = setup(Some("t")).await;

    Mock::given(method("GET"))
        .and(path(api_path("/device")))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = client.get_resource(Resource::Device).await.unwrap_err();
    assert!(matches!(err, Error::Http { status: 502, .. }), "got: {err:?}");
    assert_eq!(err.kind(), ErrorKind::Request);
}

#[tokio::test]
async fn test_device_error_codes_are_classified() {
    let cases = [
        (401, 2, ErrorKind::Unauthorized),
        (400, 13, ErrorKind::Request),
        (400, 16, ErrorKind::InvalidState),
        (500, 99, ErrorKind::Device),
    ];

    for (status, code, kind) in cases {
        let (server, client) = setup(Some("t")).await;
        Mock::given(method("GET"))
            .and(path(api_path("/hue")))
            .respond_with(device_error(status, code, "boom"))
            .mount(&server)
            .await;

        let err = client.get_resource(Resource::Hue).await.unwrap_err();
        assert_eq!(err.kind(), kind, "code {code}");
        assert_eq!(err.code(), Some(code));
        assert_eq!(err.to_string(), format!("{code}: boom"));
    }
}

#[tokio::test]
async fn test_malformed_error_body_is_deserialization_error() {
    let (server, client) = setup(Some("t")).await;

    Mock::given(method("GET"))
        .and(path(api_path("/device")))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"oops": true})))
        .mount(&server)
        .await;

    let err = client.get_resource(Resource::Device).await.unwrap_err();
    assert!(matches!(err, Error::Deserialization { .. }), "got: {err:?}");
}

#[tokio::test]
async fn test_connection_refused_is_request_failure() {
    let client = SyncBoxClient::with_client(
        reqwest::Client::new(),
        Url::parse("http://127.0.0.1:1/api/v1").unwrap(),
        None,
    );

    let err = client.get_state().await.unwrap_err();
    assert!(matches!(err, Error::Transport { .. }), "got: {err:?}");
    assert_eq!(err.kind(), ErrorKind::Request);
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_timeout_is_request_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let http = reqwest::Client::builder()
        .timeout(Duration::from_millis(50))
        .build()
        .unwrap();
    let client = SyncBoxClient::with_client(
        http,
        Url::parse(&format!("{}/api/v1", server.uri())).unwrap(),
        None,
    );

    let err = client.get_state().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Request);
    assert!(err.is_transient(), "got: {err:?}");
}

// ── Closed transport ────────────────────────────────────────────────

#[test]
fn test_client_builds_for_an_all_digit_unique_id() {
    let target = ConnectionTarget::new("192.168.1.20", "001788123456");
    let client = SyncBoxClient::new(&target, &TransportConfig::default(), None).unwrap();
    assert_eq!(client.base_url().as_str(), "https://192.168.1.20/api/v1");
}

#[tokio::test]
async fn test_closed_transport_is_a_silent_no_op() {
    let (server, client) = setup(Some("t")).await;

    client.close().await;
    assert!(client.is_closed().await);

    assert!(client.get_state().await.unwrap().is_none());
    assert!(client.get_resource(Resource::Execution).await.unwrap().is_none());
    client
        .update_execution(&ExecutionUpdate {
            mode: Some("video".into()),
            ..ExecutionUpdate::default()
        })
        .await
        .unwrap();
    client.set_group_active("7", true).await.unwrap();
    assert!(client.register("App", "Device", true).await.unwrap().is_none());
    assert!(!client.is_registered().await.unwrap());

    // Closing twice is fine.
    client.close().await;

    assert!(server.received_requests().await.unwrap().is_empty());
}

// ── Partial writes ──────────────────────────────────────────────────

#[tokio::test]
async fn test_update_execution_sends_only_set_fields() {
    let (server, client) = setup(Some("t")).await;

    Mock::given(method("PUT"))
        .and(path(api_path("/execution")))
        .and(body_json(json!({"mode": "video", "hdmiSource": "input3"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let update = ExecutionUpdate {
        mode: Some("video".into()),
        hdmi_source: Some("input3".into()),
        ..ExecutionUpdate::default()
    };
    client.update_execution(&update).await.unwrap();
}

#[tokio::test]
async fn test_set_group_active() {
    let (server, client) = setup(Some("t")).await;

    Mock::given(method("PUT"))
        .and(path(api_path("/hue/groups/13")))
        .and(body_json(json!({"active": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client.set_group_active("13", false).await.unwrap();
}

#[tokio::test]
async fn test_group_id_cannot_escape_its_path() {
    let (server, client) = setup(Some("t")).await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    client.set_group_active("13/../../execution", true).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].url.path(),
        "/api/v1/hue/groups/13%2F..%2F..%2Fexecution"
    );
}

// ── Registration ────────────────────────────────────────────────────

#[tokio::test]
async fn test_is_registered_false_on_unauthorized() {
    let (server, client) = setup(Some("revoked")).await;

    Mock::given(method("GET"))
        .and(path(api_path("/registrations")))
        .respond_with(device_error(401, 1, "not authorized"))
        .mount(&server)
        .await;

    assert!(!client.is_registered().await.unwrap());
}

#[tokio::test]
async fn test_is_registered_true_on_success() {
    let (server, client) = setup(Some("valid")).await;

    Mock::given(method("GET"))
        .and(path(api_path("/registrations")))
        .and(header("authorization", "Bearer valid"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"r1": {"appName": "App"}})))
        .mount(&server)
        .await;

    assert!(client.is_registered().await.unwrap());
}

#[tokio::test]
async fn test_is_registered_propagates_other_failures() {
    let (server, client) = setup(Some("valid")).await;

    Mock::given(method("GET"))
        .and(path(api_path("/registrations")))
        .respond_with(device_error(400, 16, "busy"))
        .mount(&server)
        .await;

    let err = client.is_registered().await.unwrap_err();
    assert!(err.is_invalid_state());
}

#[tokio::test]
async fn test_register_before_and_after_button_press() {
    let (server, client) = setup(Some("stale")).await;

    Mock::given(method("POST"))
        .and(path(api_path("/registrations")))
        .and(body_json(json!({"appName": "App", "instanceName": "Device"})))
        .respond_with(device_error(400, 16, "link button not pressed"))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(api_path("/registrations")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"registrationId": "r1", "accessToken": "t1"})),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(api_path("/execution")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let err = client.register("App", "Device", true).await.unwrap_err();
    assert!(matches!(err, Error::InvalidState { code: 16, .. }), "got: {err:?}");
    assert_eq!(err.to_string(), "16: link button not pressed");

    let registration = client.register("App", "Device", true).await.unwrap().unwrap();
    assert_eq!(registration.registration_id, "r1");
    assert_eq!(registration.access_token.expose_secret(), "t1");
    assert_eq!(client.access_token().unwrap().expose_secret(), "t1");

    client.get_resource(Resource::Execution).await.unwrap();

    // The stale token is never sent with the pairing call.
    assert_eq!(
        authorization_headers(&server).await,
        vec![None, None, Some("Bearer t1".to_owned())]
    );
}

#[tokio::test]
async fn test_register_can_leave_token_untouched() {
    let (server, client) = setup(Some("old")).await;

    Mock::given(method("POST"))
        .and(path(api_path("/registrations")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"registrationId": "r2", "accessToken": "t2"})),
        )
        .mount(&server)
        .await;

    let registration = client.register("App", "Device", false).await.unwrap().unwrap();
    assert_eq!(registration.access_token.expose_secret(), "t2");
    assert_eq!(client.access_token().unwrap().expose_secret(), "old");
}

#[tokio::test]
async fn test_wait_for_registration_polls_until_pressed() {
    let (server, client) = setup(None).await;

    Mock::given(method("POST"))
        .and(path(api_path("/registrations")))
        .respond_with(device_error(400, 16, "link button not pressed"))
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(api_path("/registrations")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"registrationId": "r3", "accessToken": "t3"})),
        )
        .mount(&server)
        .await;

    let registration = client
        .wait_for_registration(
            "App",
            "Device",
            Duration::from_millis(10),
            Duration::from_secs(5),
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(registration.registration_id, "r3");
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_wait_for_registration_gives_up_after_timeout() {
    let (server, client) = setup(None).await;

    Mock::given(method("POST"))
        .and(path(api_path("/registrations")))
        .respond_with(device_error(400, 16, "link button not pressed"))
        .mount(&server)
        .await;

    let err = client
        .wait_for_registration(
            "App",
            "Device",
            Duration::from_millis(20),
            Duration::from_millis(100),
        )
        .await
        .unwrap_err();

    assert!(err.is_invalid_state());
}

#[tokio::test]
async fn test_unregister_sends_authorized_delete() {
    let (server, client) = setup(Some("t1")).await;

    Mock::given(method("DELETE"))
        .and(path(api_path("/registrations/r1")))
        .and(header("authorization", "Bearer t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client.unregister("r1").await.unwrap();
}

#[tokio::test]
async fn test_unregister_encodes_the_registration_id() {
    let (server, client) = setup(Some("t1")).await;

    Mock::given(method("DELETE"))
        .and(path(api_path("/device")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    client.unregister("../device").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.path(), "/api/v1/registrations/..%2Fdevice");
}

#[tokio::test]
async fn test_unregister_rejects_dot_segments_without_a_request() {
    let (server, client) = setup(Some("t1")).await;

    for id in ["", ".", ".."] {
        let err = client.unregister(id).await.unwrap_err();
        assert!(matches!(err, Error::InvalidId(_)), "{id:?}: {err:?}");
    }
    assert!(server.received_requests().await.unwrap().is_empty());
}
