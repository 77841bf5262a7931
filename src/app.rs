use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use crate::{auth, dashboard, profile, settings};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .nest(
            "/api",
            Router::new()
                .merge(auth::router())
                .merge(settings::router())
                .merge(profile::router())
                .merge(dashboard::router())
                .route("/health", get(|| async { "ok" })),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        let latency_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, latency_ms, "response");
                        } else {
                            tracing::info!(%status, latency_ms, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "5000".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn call(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(v) => {
                req = req.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let resp = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn register(app: &Router, name: &str, email: &str) -> String {
        let (status, body) = call(
            app,
            Method::POST,
            "/api/register",
            None,
            Some(json!({ "name": name, "email": email, "password": "secret123" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn health_is_public() {
        let app = build_app(AppState::fake());
        let resp = app
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn protected_routes_require_token() {
        let app = build_app(AppState::fake());
        for uri in ["/api/user", "/api/settings", "/api/dashboard/summary"] {
            let (status, body) = call(&app, Method::GET, uri, None, None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
            assert_eq!(body["message"], "Token is missing");
        }

        let (status, body) = call(&app, Method::GET, "/api/settings", Some("garbage"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid or expired token");
    }

    #[tokio::test]
    async fn register_then_read_default_settings() {
        let app = build_app(AppState::fake());
        let token = register(&app, "Jane Doe", "jane@example.com").await;

        let (status, body) = call(&app, Method::GET, "/api/user", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["avatar"], "JA");
        assert_eq!(body["user"]["role"], "Standard User");
        assert!(body["user"].get("password_hash").is_none());

        let (status, body) = call(&app, Method::GET, "/api/settings", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["theme"], "light");
        assert_eq!(body["currency"], "USD");
        assert_eq!(body["notifications"]["investment_opportunities"], false);
        assert!(body.get("user_id").is_none());

        let (status, _) = call(
            &app,
            Method::POST,
            "/api/register",
            None,
            Some(json!({ "name": "Other", "email": "jane@example.com", "password": "secret123" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn theme_updates_validate_and_detect_no_ops() {
        let app = build_app(AppState::fake());
        let token = register(&app, "Sam", "sam@example.com").await;

        let (status, body) = call(
            &app,
            Method::PUT,
            "/api/settings/theme",
            Some(&token),
            Some(json!({ "theme": "neon" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("light"));

        let (status, body) = call(
            &app,
            Method::PUT,
            "/api/settings/theme",
            Some(&token),
            Some(json!({ "theme": "dark" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Theme updated successfully");
        assert_eq!(body["theme"], "dark");

        let (status, body) = call(
            &app,
            Method::PUT,
            "/api/settings/theme",
            Some(&token),
            Some(json!({ "theme": "dark" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "No changes made to theme");
    }

    #[tokio::test]
    async fn scalar_routes_ignore_other_keys() {
        let app = build_app(AppState::fake());
        let token = register(&app, "Kim", "kim@example.com").await;

        let (status, body) = call(
            &app,
            Method::PUT,
            "/api/settings/theme",
            Some(&token),
            Some(json!({ "theme": "dark", "currency": 5 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["theme"], "dark");

        let (status, body) = call(
            &app,
            Method::PUT,
            "/api/settings/currency",
            Some(&token),
            Some(json!({ "currency": 5 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Currency must be a string");

        let (_, body) = call(&app, Method::GET, "/api/settings", Some(&token), None).await;
        assert_eq!(body["currency"], "USD");
    }

    #[tokio::test]
    async fn notification_aliases_merge_into_canonical_keys() {
        let app = build_app(AppState::fake());
        let token = register(&app, "Ann", "ann@example.com").await;

        let (status, body) = call(
            &app,
            Method::PUT,
            "/api/settings/notifications",
            Some(&token),
            Some(json!({ "goalReminders": false, "unknownField": true })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Notification settings updated successfully");
        assert_eq!(body["notifications"]["goal_reminders"], false);
        assert_eq!(body["notifications"]["email"], true);
        assert!(body["notifications"].get("goalReminders").is_none());
        assert!(body["notifications"].get("unknownField").is_none());

        let (status, body) = call(
            &app,
            Method::PUT,
            "/api/settings/privacy",
            Some(&token),
            Some(json!({ "unknownField": true })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "At least one valid privacy setting must be provided");
    }

    #[tokio::test]
    async fn malformed_json_is_a_client_error() {
        let app = build_app(AppState::fake());
        let token = register(&app, "Bo", "bo@example.com").await;
        let req = Request::put("/api/settings/currency")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn profile_rename_recomputes_avatar() {
        let app = build_app(AppState::fake());
        let token = register(&app, "old name", "p@example.com").await;

        let (status, body) = call(
            &app,
            Method::PUT,
            "/api/settings/profile",
            Some(&token),
            Some(json!({ "name": "zoe" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Profile updated successfully");
        assert_eq!(body["user"]["avatar"], "ZO");

        let (status, body) = call(
            &app,
            Method::PUT,
            "/api/settings/password",
            Some(&token),
            Some(json!({ "current_password": "wrong-one", "new_password": "another123" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Current password is incorrect");
    }

    #[tokio::test]
    async fn dashboard_views_for_new_user() {
        let app = build_app(AppState::fake());
        let token = register(&app, "Dee", "dee@example.com").await;

        let (status, body) = call(&app, Method::GET, "/api/dashboard/accounts", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["accounts"][0]["type"], "Cash");
        assert_eq!(body["total_balance"], 1000.0);

        let (status, body) = call(
            &app,
            Method::GET,
            "/api/dashboard/transactions?limit=500&skip=-3",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["current_page"], 1);

        let (status, _) = call(
            &app,
            Method::GET,
            "/api/dashboard/transactions?limit=abc",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = call(&app, Method::GET, "/api/dashboard/summary", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"]["savings_rate"], 25.0);
    }
}
