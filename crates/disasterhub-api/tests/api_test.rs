/// Integration tests: drive the dashboard router in-process.
///
/// Upstream services point at a closed loopback port, so every outbound
/// call fails with a network error unless a test says otherwise.
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use serde_json::{Value, json};
use tower::ServiceExt;

use disasterhub_api::{AppState, AppStateInner, router};
use disasterhub_client::ClientError;
use disasterhub_client::auth::{AdminCredentials, LocalAuthenticator};
use disasterhub_client::directory::EmergencyDirectory;
use disasterhub_client::feed::ReportFeed;
use disasterhub_client::geolocation::FixedLocation;
use disasterhub_client::normalize::StatusMapping;
use disasterhub_client::report_form::ReportFormClient;
use disasterhub_client::routing::{RoutingClient, default_relief_centers};
use disasterhub_client::source::ReportSource;
use disasterhub_client::store::MergePolicy;
use disasterhub_client::submit::EmergencyClient;
use disasterhub_db::{LocalState, MemoryStore};

const ADMIN_EMAIL: &str = "ops@example.org";
const ADMIN_PASSWORD: &str = "ops-password";

struct StaticSource;

impl ReportSource for StaticSource {
    fn fetch(&self) -> BoxFuture<'_, Result<Value, ClientError>> {
        async {
            Ok(json!({
                "predictions": [
                    {
                        "_id": "m1",
                        "text": "Flood Warning",
                        "is_disaster": "yes",
                        "fact_verdict": "Not checked"
                    },
                    {"_id": "m2", "text": "Wildfire", "is_disaster": "no idea"}
                ]
            }))
        }
        .boxed()
    }
}

fn dead_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn app() -> (Router, AppState, Arc<LocalState>) {
    let local = Arc::new(LocalState::new(Arc::new(MemoryStore::new())));
    let http = reqwest::Client::new();
    let upstream = dead_url();

    let state: AppState = Arc::new(AppStateInner {
        feed: Arc::new(ReportFeed::new(
            Arc::new(StaticSource),
            StatusMapping::TwoWay,
            MergePolicy::Replace,
        )),
        emergencies: EmergencyClient::new(http.clone(), &upstream, local.clone()),
        directory: EmergencyDirectory::new(http.clone(), &upstream),
        report_form: ReportFormClient::new(http.clone(), &upstream),
        routing: RoutingClient::new(http, &upstream),
        relief_centers: default_relief_centers(),
        geolocation: Arc::new(FixedLocation::unsupported()),
        authenticator: Arc::new(LocalAuthenticator::new(
            local.clone(),
            Some(AdminCredentials {
                email: ADMIN_EMAIL.into(),
                password: ADMIN_PASSWORD.into(),
            }),
        )),
        jwt_secret: "test-secret".into(),
    });

    (router(state.clone()), state, local)
}

async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let req = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn register(app: &Router, email: &str) -> String {
    let (status, body) = call(
        app,
        "POST",
        "/auth/register",
        None,
        Some(json!({"username": "tester", "email": email, "password": "hunter22"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_is_public_and_reports_are_not() {
    let (app, _, _) = app();
    let (status, body) = call(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, _) = call(&app, "GET", "/reports", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call(&app, "GET", "/reports", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_conflict_and_bad_login() {
    let (app, _, _) = app();
    register(&app, "a@example.org").await;

    let (status, body) = call(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({"username": "again", "email": "a@example.org", "password": "hunter22"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Email already in use");

    let (status, body) = call(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({"email": "a@example.org", "password": "wrong-one"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials or role");
}

#[tokio::test]
async fn voting_flow() {
    let (app, state, _) = app();
    let token = register(&app, "voter@example.org").await;
    state.feed.refresh().await;

    let (status, body) = call(&app, "GET", "/reports", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reports"].as_array().unwrap().len(), 2);
    assert_eq!(body["reports"][0]["disasterStatus"], "confirmed");
    assert_eq!(body["reports"][0]["userVote"], "none");
    assert!(body["error"].is_null());

    let (_, body) = call(&app, "POST", "/reports/m1/upvote", Some(&token), None).await;
    assert_eq!(body["report"]["upvotes"], 1);
    assert_eq!(body["report"]["userVote"], "up");

    let (_, body) = call(&app, "POST", "/reports/m1/downvote", Some(&token), None).await;
    assert_eq!(body["report"]["upvotes"], 0);
    assert_eq!(body["report"]["downvotes"], 1);
    assert_eq!(body["report"]["userVote"], "down");

    let (_, body) = call(&app, "POST", "/reports/m1/downvote", Some(&token), None).await;
    assert_eq!(body["report"]["downvotes"], 0);
    assert_eq!(body["report"]["userVote"], "none");

    let (status, body) = call(&app, "POST", "/reports/zzz/downvote", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["report"].is_null());

    let (status, body) = call(&app, "GET", "/reports/m2", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["raw"]["is_disaster"], "no idea");

    let (status, _) = call(&app, "GET", "/reports/zzz", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn sos_validation_blocks_before_network() {
    let (app, _, local) = app();
    let token = register(&app, "sos@example.org").await;

    let (status, body) = call(
        &app,
        "POST",
        "/emergencies",
        Some(&token),
        Some(json!({"disasterType": "", "latitude": 26.9, "longitude": 75.8})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please select a disaster type");

    // no coordinates and no server-side position
    let (status, body) = call(
        &app,
        "POST",
        "/emergencies",
        Some(&token),
        Some(json!({"disasterType": "flood"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Location not available");

    assert!(local.pending_emergencies().unwrap().is_empty());
}

#[tokio::test]
async fn failed_sos_is_queued() {
    let (app, _, _) = app();
    let token = register(&app, "queue@example.org").await;

    let (status, body) = call(
        &app,
        "POST",
        "/emergencies",
        Some(&token),
        Some(json!({
            "disasterType": "flood",
            "priority": "high",
            "latitude": 26.9,
            "longitude": 75.8
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["message"].as_str().unwrap().starts_with("Network error"));

    let (_, body) = call(&app, "GET", "/emergencies/pending", Some(&token), None).await;
    let pending = body["pending"].as_array().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["location"]["coordinates"][0], 75.8);

    let (_, body) = call(&app, "POST", "/emergencies/pending/resend", Some(&token), None).await;
    assert_eq!(body["sent"], 0);
    assert_eq!(body["failed"], 1);
}

#[tokio::test]
async fn admin_listing_requires_admin_and_falls_back() {
    let (app, _, _) = app();
    let user_token = register(&app, "plain@example.org").await;

    let (status, _) = call(&app, "GET", "/emergencies", Some(&user_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({"email": ADMIN_EMAIL, "password": ADMIN_PASSWORD, "role": "user"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "admin");
    let admin_token = body["token"].as_str().unwrap().to_string();

    let (status, body) = call(&app, "GET", "/emergencies", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["emergencies"][0]["id"], "fallback-1");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn map_endpoints() {
    let (app, _, _) = app();
    let token = register(&app, "map@example.org").await;

    let (_, body) = call(&app, "GET", "/map/relief-centers", Some(&token), None).await;
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (status, _) = call(&app, "GET", "/map/heatmap?lat=95&lng=10", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(
        &app,
        "GET",
        "/map/heatmap?lat=26.9&lng=75.8&radius_km=1.5&samples=20",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "FeatureCollection");
    assert_eq!(body["features"].as_array().unwrap().len(), 21);

    let (status, _) = call(&app, "GET", "/map/route?lat=26.9&lng=75.8", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn remembered_user_after_login() {
    let (app, _, _) = app();
    register(&app, "memo@example.org").await;

    let (_, body) = call(&app, "GET", "/auth/remembered", None, None).await;
    assert!(body.is_null());

    let (_, body) = call(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({"email": "memo@example.org", "password": "hunter22", "rememberMe": true})),
    )
    .await;
    let token = body["token"].as_str().unwrap().to_string();

    let (_, body) = call(&app, "GET", "/auth/remembered", None, None).await;
    assert_eq!(body["email"], "memo@example.org");
    assert_eq!(body["role"], "user");

    let (status, _) = call(&app, "POST", "/auth/logout", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call(&app, "POST", "/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
