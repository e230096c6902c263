//! Reverse-proxy surface tests: token substitution, verbatim forwarding,
//! and the 401/502 edges.

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::util::ServiceExt;
    use wiremock::matchers::{body_json, header as header_matcher, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use kinvest_gateway::app_router;
    use kinvest_gateway::config::{Config, Environment};
    use kinvest_gateway::state::AppState;

    fn test_state(upstream: &str, service_token: Option<&str>) -> AppState {
        AppState::from_config(Config {
            api_base_url: upstream.to_string(),
            service_api_token: service_token.map(str::to_string),
            environment: Environment::Development,
            port: 0,
            request_timeout_seconds: 5,
            cache_ttl_seconds: 60,
            cors_allowed_origins: None,
            log_level: "info".to_string(),
        })
    }

    async fn body_value(body: Body) -> Value {
        let bytes = axum::body::to_bytes(body, usize::MAX).await.expect("body");
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    }

    #[tokio::test]
    async fn proxy_without_any_token_answers_401() {
        let app = app_router(test_state("http://localhost:4000", None));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/groups")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_value(response.into_body()).await;
        assert_eq!(body["error"], "Missing auth token");
    }

    #[tokio::test]
    async fn proxy_forwards_query_and_substitutes_the_service_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/groups"))
            .and(query_param("page", "2"))
            .and(header_matcher("authorization", "Bearer tok_service"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "g1"}])))
            .expect(1)
            .mount(&server)
            .await;

        let app = app_router(test_state(&server.uri(), Some("tok_service")));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/groups?page=2")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_value(response.into_body()).await;
        assert_eq!(body[0]["id"], "g1");
        server.verify().await;
    }

    #[tokio::test]
    async fn proxy_prefers_the_callers_own_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/wallets"))
            .and(header_matcher("authorization", "Bearer tok_caller"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let app = app_router(test_state(&server.uri(), Some("tok_service")));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/wallets")
                    .header(header::AUTHORIZATION, "Bearer tok_caller")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        server.verify().await;
    }

    #[tokio::test]
    async fn proxy_forwards_method_body_and_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/groups/g1/contributions"))
            .and(header_matcher("content-type", "application/json"))
            .and(body_json(json!({"cycleId": "c1", "amount": 50})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let app = app_router(test_state(&server.uri(), Some("tok_service")));
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/groups/g1/contributions")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"cycleId":"c1","amount":50}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        server.verify().await;
    }

    #[tokio::test]
    async fn proxy_passes_upstream_error_statuses_through_untouched() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/groups/missing"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"error": "Group not found"})),
            )
            .mount(&server)
            .await;

        let app = app_router(test_state(&server.uri(), Some("tok_service")));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/groups/missing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_value(response.into_body()).await;
        assert_eq!(body["error"], "Group not found");
    }

    #[tokio::test]
    async fn unreachable_upstream_answers_502() {
        // Nothing listens on this port.
        let app = app_router(test_state("http://127.0.0.1:9", Some("tok_service")));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/groups")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_value(response.into_body()).await;
        assert_eq!(body["error"], "Failed to reach upstream API");
    }
}
