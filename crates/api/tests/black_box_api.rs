use std::collections::BTreeMap;

use chrono::Utc;
use reqwest::StatusCode;
use serde_json::json;

use fleetwatch_api::app::build_app;
use fleetwatch_api::config::ApiConfig;
use fleetwatch_auth::{AuthConfig, SigningSecret, TokenCodec};

// base64 of a fixed 32-byte test secret.
const TEST_SECRET: &str = "ZmxlZXR3YXRjaC10ZXN0LXNpZ25pbmctc2VjcmV0MzI=";

fn test_config(access_ttl_secs: i64) -> ApiConfig {
    let secret = SigningSecret::from_base64(TEST_SECRET).unwrap();
    let auth = AuthConfig::new(secret)
        .with_lifetimes(access_ttl_secs, 7 * 24 * 60 * 60)
        .unwrap();
    ApiConfig {
        auth,
        admin_password: "admin123".to_string(),
    }
}

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(config: ApiConfig) -> Self {
        // Build the app (same router as prod), but bind to an ephemeral port.
        let app = build_app(config).expect("failed to build app");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn set_cookies(res: &reqwest::Response) -> Vec<cookie::Cookie<'static>> {
    res.headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .map(|v| cookie::Cookie::parse(v.to_str().unwrap().to_string()).unwrap())
        .collect()
}

fn cookie_named<'a>(
    cookies: &'a [cookie::Cookie<'static>],
    name: &str,
) -> &'a cookie::Cookie<'static> {
    cookies
        .iter()
        .find(|c| c.name() == name)
        .unwrap_or_else(|| panic!("no {name} cookie among {cookies:?}"))
}

async fn login(
    client: &reqwest::Client,
    base_url: &str,
    username: &str,
    password: &str,
) -> reqwest::Response {
    client
        .post(format!("{base_url}/login"))
        .json(&json!({ "username": username, "password": password }))
        .send()
        .await
        .unwrap()
}

/// Login and return the access and refresh token values.
async fn session_tokens(
    client: &reqwest::Client,
    base_url: &str,
    username: &str,
    password: &str,
) -> (String, String) {
    let res = login(client, base_url, username, password).await;
    assert_eq!(res.status(), StatusCode::OK);
    let cookies = set_cookies(&res);
    let access = cookie_named(&cookies, "access_token").value().to_string();
    let refresh = cookie_named(&cookies, "refresh_token").value().to_string();
    (access, refresh)
}

#[tokio::test]
async fn login_issues_both_session_cookies() {
    let srv = TestServer::spawn(test_config(900)).await;
    let client = reqwest::Client::new();

    let res = login(&client, &srv.base_url, "admin", "admin123").await;
    assert_eq!(res.status(), StatusCode::OK);

    let cookies = set_cookies(&res);
    assert_eq!(cookies.len(), 2);
    let access = cookie_named(&cookies, "access_token");
    let refresh = cookie_named(&cookies, "refresh_token");

    for c in [access, refresh] {
        assert!(!c.value().is_empty());
        assert_eq!(c.http_only(), Some(true));
        assert_eq!(c.path(), Some("/"));
    }
    assert_ne!(access.value(), refresh.value());
    assert_eq!(access.max_age(), Some(cookie::time::Duration::seconds(900)));

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["loggedIn"], json!(true));
    assert_eq!(body["role"], json!("ROLE_ADMIN"));
}

#[tokio::test]
async fn failed_logins_are_indistinguishable() {
    let srv = TestServer::spawn(test_config(900)).await;
    let client = reqwest::Client::new();

    let wrong_password = login(&client, &srv.base_url, "admin", "nope").await;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookies(&wrong_password).is_empty());
    let wrong_body: serde_json::Value = wrong_password.json().await.unwrap();

    let unknown_user = login(&client, &srv.base_url, "ghost", "admin123").await;
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookies(&unknown_user).is_empty());
    let unknown_body: serde_json::Value = unknown_user.json().await.unwrap();

    assert_eq!(wrong_body, unknown_body);
    assert_eq!(wrong_body, json!({ "loggedIn": false, "role": "" }));
}

#[tokio::test]
async fn bad_access_cookies_demote_to_anonymous_instead_of_erroring() {
    let srv = TestServer::spawn(test_config(900)).await;
    let client = reqwest::Client::new();

    // A token for a principal the directory does not know.
    let codec = TokenCodec::new(&SigningSecret::from_base64(TEST_SECRET).unwrap());
    let now = Utc::now();
    let ghost_token = codec
        .encode("ghost", &BTreeMap::new(), now, now + chrono::Duration::minutes(15))
        .unwrap();

    for access in ["", "garbage", ghost_token.as_str()] {
        let cookie_header = format!("access_token={access}");

        // Public routes stay reachable whatever the cookie state.
        let res = client
            .get(format!("{}/health", srv.base_url))
            .header(reqwest::header::COOKIE, &cookie_header)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK, "health with {access:?}");

        // Protected routes reject from the authorization layer, not the filter.
        let res = client
            .get(format!("{}/session-info", srv.base_url))
            .header(reqwest::header::COOKIE, &cookie_header)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "session-info with {access:?}");
    }

    // No cookie at all behaves the same.
    let res = client
        .get(format!("{}/session-info", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn session_lifecycle_expiry_then_silent_renewal() {
    // Short access lifetime so the test can outlive it.
    let srv = TestServer::spawn(test_config(3)).await;
    let client = reqwest::Client::new();

    let (access, refresh) = session_tokens(&client, &srv.base_url, "admin", "admin123").await;

    // The fresh access cookie authenticates.
    let res = client
        .get(format!("{}/session-info", srv.base_url))
        .header(reqwest::header::COOKIE, format!("access_token={access}"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["username"], json!("admin"));
    assert_eq!(body["role"], json!("ROLE_ADMIN"));

    // Past the access lifetime the stale cookie is anonymous again.
    tokio::time::sleep(std::time::Duration::from_millis(3_300)).await;
    let res = client
        .get(format!("{}/session-info", srv.base_url))
        .header(reqwest::header::COOKIE, format!("access_token={access}"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // The refresh cookie mints a new access token without the password.
    let res = client
        .post(format!("{}/refresh", srv.base_url))
        .header(reqwest::header::COOKIE, format!("refresh_token={refresh}"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let cookies = set_cookies(&res);
    assert_eq!(cookies.len(), 1);
    let renewed = cookie_named(&cookies, "access_token").value().to_string();
    assert_ne!(renewed, access);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["role"], json!("ROLE_ADMIN"));

    let res = client
        .get(format!("{}/session-info", srv.base_url))
        .header(reqwest::header::COOKIE, format!("access_token={renewed}"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn refresh_requires_and_validates_the_refresh_cookie() {
    let srv = TestServer::spawn(test_config(900)).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/refresh", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .post(format!("{}/refresh", srv.base_url))
        .header(reqwest::header::COOKIE, "refresh_token=garbage")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "loggedIn": false, "role": "" }));
}

#[tokio::test]
async fn logout_clears_cookies_even_without_a_session() {
    let srv = TestServer::spawn(test_config(900)).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/logout", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let cookies = set_cookies(&res);
    assert_eq!(cookies.len(), 2);
    for name in ["access_token", "refresh_token"] {
        let c = cookie_named(&cookies, name);
        assert_eq!(c.value(), "");
        assert_eq!(c.max_age(), Some(cookie::time::Duration::ZERO));
    }
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "loggedIn": false, "role": "" }));
}

#[tokio::test]
async fn fleet_routes_enforce_permissions() {
    let srv = TestServer::spawn(test_config(900)).await;
    let client = reqwest::Client::new();

    let (viewer_access, _) = session_tokens(&client, &srv.base_url, "viewer", "viewer123").await;
    let viewer_cookie = format!("access_token={viewer_access}");

    // Viewers read…
    let res = client
        .get(format!("{}/incidents", srv.base_url))
        .header(reqwest::header::COOKIE, &viewer_cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // …but cannot register buses or report incidents.
    let res = client
        .post(format!("{}/buses", srv.base_url))
        .header(reqwest::header::COOKIE, &viewer_cookie)
        .json(&json!({ "fleet_number": "B-001", "registration": "AB-123", "capacity": 60 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .post(format!("{}/incidents", srv.base_url))
        .header(reqwest::header::COOKIE, &viewer_cookie)
        .json(&json!({ "bus_id": "0", "title": "x", "severity": "low" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn incident_lifecycle_and_conflicts() {
    let srv = TestServer::spawn(test_config(900)).await;
    let client = reqwest::Client::new();

    let (admin_access, _) = session_tokens(&client, &srv.base_url, "admin", "admin123").await;
    let admin_cookie = format!("access_token={admin_access}");

    // Register a bus.
    let res = client
        .post(format!("{}/buses", srv.base_url))
        .header(reqwest::header::COOKIE, &admin_cookie)
        .json(&json!({ "fleet_number": "B-001", "registration": "AB-123", "capacity": 60 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let bus: serde_json::Value = res.json().await.unwrap();
    let bus_id = bus["id"].as_str().unwrap().to_string();

    // Duplicate fleet number conflicts.
    let res = client
        .post(format!("{}/buses", srv.base_url))
        .header(reqwest::header::COOKIE, &admin_cookie)
        .json(&json!({ "fleet_number": "B-001", "registration": "CD-456", "capacity": 40 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // Report an incident against the bus; the reporter is taken from the
    // session, not the body.
    let res = client
        .post(format!("{}/incidents", srv.base_url))
        .header(reqwest::header::COOKIE, &admin_cookie)
        .json(&json!({
            "bus_id": bus_id,
            "title": "Engine overheating",
            "description": "Temperature warning on route 12",
            "severity": "high",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let incident: serde_json::Value = res.json().await.unwrap();
    assert_eq!(incident["status"], json!("open"));
    assert_eq!(incident["reported_by"], json!("admin"));
    let incident_id = incident["id"].as_str().unwrap().to_string();

    // Reports against unknown buses are rejected.
    let res = client
        .post(format!("{}/incidents", srv.base_url))
        .header(reqwest::header::COOKIE, &admin_cookie)
        .json(&json!({
            "bus_id": fleetwatch_core::BusId::new().to_string(),
            "title": "Phantom",
            "severity": "low",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Resolve once, then the invariant trips.
    let res = client
        .post(format!("{}/incidents/{incident_id}/resolve", srv.base_url))
        .header(reqwest::header::COOKIE, &admin_cookie)
        .json(&json!({ "note": "Coolant refilled" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let resolved: serde_json::Value = res.json().await.unwrap();
    assert_eq!(resolved["status"], json!("resolved"));

    let res = client
        .post(format!("{}/incidents/{incident_id}/resolve", srv.base_url))
        .header(reqwest::header::COOKIE, &admin_cookie)
        .json(&json!({ "note": null }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Filtered listing sees the resolved incident.
    let res = client
        .get(format!("{}/incidents?status=resolved&bus_id={bus_id}", srv.base_url))
        .header(reqwest::header::COOKIE, &admin_cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let listing: serde_json::Value = res.json().await.unwrap();
    assert_eq!(listing["items"].as_array().unwrap().len(), 1);

    // Delete, then it is gone.
    let res = client
        .delete(format!("{}/incidents/{incident_id}", srv.base_url))
        .header(reqwest::header::COOKIE, &admin_cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/incidents/{incident_id}", srv.base_url))
        .header(reqwest::header::COOKIE, &admin_cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
