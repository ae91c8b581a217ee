use axum::{
	body::{to_bytes, Body},
	http::{Request, StatusCode},
	response::Response,
};
use proxy_config::ProxyConfig;
use proxy_service::{router, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{any, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(prod: &str, staging: &str, api_key: Option<&str>) -> ProxyConfig {
	let mut config = ProxyConfig::default();
	config.upstream.prod_base_url = prod.to_string();
	config.upstream.staging_base_url = staging.to_string();
	config.upstream.api_key = api_key.map(str::to_string);
	config.retry.base_delay_ms = 1;
	config.retry.jitter_ms = 0;
	config.retry.max_delay_ms = 5;
	config
}

fn state(prod: &MockServer, staging: &MockServer) -> AppState {
	AppState::from_config(config(&prod.uri(), &staging.uri(), Some("test-key"))).unwrap()
}

async fn send(state: AppState, request: Request<Body>) -> Response {
	router(state).oneshot(request).await.unwrap()
}

fn get(uri: &str) -> Request<Body> {
	Request::builder()
		.method("GET")
		.uri(uri)
		.body(Body::empty())
		.unwrap()
}

fn post(uri: &str, body: &str) -> Request<Body> {
	Request::builder()
		.method("POST")
		.uri(uri)
		.header("content-type", "application/json")
		.body(Body::from(body.to_string()))
		.unwrap()
}

async fn body_text(response: Response) -> String {
	let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
	String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: Response) -> Value {
	serde_json::from_str(&body_text(response).await).unwrap()
}

/// Fails verification if the server sees any request at all.
async fn expect_untouched(server: &MockServer) {
	Mock::given(any())
		.respond_with(ResponseTemplate::new(500))
		.expect(0)
		.mount(server)
		.await;
}

#[tokio::test]
async fn test_preflight_on_every_route() {
	let prod = MockServer::start().await;
	let staging = MockServer::start().await;
	expect_untouched(&prod).await;
	expect_untouched(&staging).await;

	for (uri, methods) in [
		("/api/accounts/0xabc/portfolio", "GET, OPTIONS"),
		("/api/intent-operation/abc123", "GET, OPTIONS"),
		("/api/intent-operations", "POST, OPTIONS"),
		("/api/intents/route", "POST, OPTIONS"),
	] {
		let request = Request::builder()
			.method("OPTIONS")
			.uri(uri)
			.body(Body::empty())
			.unwrap();
		let response = send(state(&prod, &staging), request).await;

		assert_eq!(response.status(), StatusCode::NO_CONTENT, "{}", uri);
		let headers = response.headers();
		assert_eq!(headers["access-control-allow-origin"], "*");
		assert_eq!(headers["access-control-allow-methods"], methods);
		assert_eq!(headers["access-control-allow-headers"], "Content-Type");
		assert!(body_text(response).await.is_empty());
	}
}

#[tokio::test]
async fn test_wrong_method_is_rejected() {
	let prod = MockServer::start().await;
	let staging = MockServer::start().await;
	expect_untouched(&prod).await;

	let response = send(state(&prod, &staging), post("/api/intent-operation/abc123", "{}")).await;
	assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
	assert_eq!(response.headers()["content-type"], "application/json");
	assert_eq!(body_json(response).await, json!({"error": "Method not allowed"}));

	let response = send(state(&prod, &staging), get("/api/intents/route")).await;
	assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
	assert_eq!(
		response.headers()["access-control-allow-methods"],
		"POST, OPTIONS"
	);
}

#[tokio::test]
async fn test_missing_api_key() {
	let prod = MockServer::start().await;
	let staging = MockServer::start().await;
	expect_untouched(&prod).await;
	expect_untouched(&staging).await;

	let state =
		AppState::from_config(config(&prod.uri(), &staging.uri(), None)).unwrap();
	let response = send(state, get("/api/accounts/0xabc/portfolio")).await;

	assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(
		body_json(response).await,
		json!({"error": "API key not configured"})
	);
}

#[tokio::test]
async fn test_status_falls_back_to_staging_on_404() {
	let prod = MockServer::start().await;
	let staging = MockServer::start().await;

	Mock::given(method("GET"))
		.and(path("/intent-operation/abc123"))
		.and(header("x-api-key", "test-key"))
		.respond_with(ResponseTemplate::new(404).set_body_string(r#"{"error":"not found"}"#))
		.expect(1)
		.mount(&prod)
		.await;
	Mock::given(method("GET"))
		.and(path("/intent-operation/abc123"))
		.and(header("x-api-key", "test-key"))
		.respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status":"PENDING"}"#))
		.expect(1)
		.mount(&staging)
		.await;

	let response = send(state(&prod, &staging), get("/api/intent-operation/abc123")).await;

	assert_eq!(response.status(), StatusCode::OK);
	assert!(response.headers().contains_key("x-request-id"));
	assert_eq!(response.headers()["access-control-allow-methods"], "GET, OPTIONS");
	assert_eq!(body_text(response).await, r#"{"status":"PENDING"}"#);
}

#[tokio::test]
async fn test_status_server_error_is_final() {
	let prod = MockServer::start().await;
	let staging = MockServer::start().await;

	Mock::given(method("GET"))
		.and(path("/intent-operation/abc123"))
		.respond_with(ResponseTemplate::new(500).set_body_string(r#"{"error":"boom"}"#))
		.expect(1)
		.mount(&prod)
		.await;
	expect_untouched(&staging).await;

	let response = send(state(&prod, &staging), get("/api/intent-operation/abc123")).await;

	assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(body_text(response).await, r#"{"error":"boom"}"#);
}

#[tokio::test]
async fn test_legacy_status_route() {
	let prod = MockServer::start().await;
	let staging = MockServer::start().await;

	Mock::given(method("GET"))
		.and(path("/intent-operation/xyz"))
		.respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status":"COMPLETED"}"#))
		.expect(1)
		.mount(&prod)
		.await;
	expect_untouched(&staging).await;

	let response = send(
		state(&prod, &staging),
		get("/api/intent-operation-status?id=xyz"),
	)
	.await;
	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(body_text(response).await, r#"{"status":"COMPLETED"}"#);

	let response = send(state(&prod, &staging), get("/api/intent-operation-status")).await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	assert_eq!(
		body_json(response).await,
		json!({"error": "Missing intentId parameter"})
	);
}

#[tokio::test]
async fn test_testnet_route_only_contacts_staging() {
	let prod = MockServer::start().await;
	let staging = MockServer::start().await;
	expect_untouched(&prod).await;

	let body = r#"{"destinationChainId":84532,"accountAccessList":{"chainIds":[11155111]}}"#;
	Mock::given(method("POST"))
		.and(path("/intents/route"))
		.and(header("x-api-key", "test-key"))
		.and(body_string_contains("84532"))
		.respond_with(ResponseTemplate::new(200).set_body_string(r#"{"route":"ok"}"#))
		.expect(1)
		.mount(&staging)
		.await;

	let response = send(state(&prod, &staging), post("/api/intents/route", body)).await;

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(response.headers()["content-type"], "application/json");
	assert_eq!(body_text(response).await, r#"{"route":"ok"}"#);
}

#[tokio::test]
async fn test_intent_operations_fall_back_on_gateway_errors() {
	let prod = MockServer::start().await;
	let staging = MockServer::start().await;

	Mock::given(method("POST"))
		.and(path("/intent-operations"))
		.respond_with(ResponseTemplate::new(502))
		.expect(1)
		.mount(&prod)
		.await;
	Mock::given(method("POST"))
		.and(path("/intent-operations"))
		.respond_with(ResponseTemplate::new(201).set_body_string(r#"{"id":"op-1"}"#))
		.expect(1)
		.mount(&staging)
		.await;

	// mainnet and testnet mixed: both deployments are candidates
	let body = json!({
		"signedIntentOp": {
			"elements": [
				{"chainId": "1", "mandate": {"destinationChainId": "84532"}}
			]
		}
	})
	.to_string();

	let response = send(state(&prod, &staging), post("/api/intent-operations", &body)).await;

	assert_eq!(response.status(), StatusCode::CREATED);
	assert_eq!(body_text(response).await, r#"{"id":"op-1"}"#);
}

#[tokio::test]
async fn test_portfolio_forwards_query_to_prod() {
	let prod = MockServer::start().await;
	let staging = MockServer::start().await;
	expect_untouched(&staging).await;

	Mock::given(method("GET"))
		.and(path("/accounts/0xabc/portfolio"))
		.and(query_param("chainIds", "1,8453"))
		.and(query_param("foo", "bar"))
		.respond_with(ResponseTemplate::new(200).set_body_string(r#"{"portfolio":[]}"#))
		.expect(1)
		.mount(&prod)
		.await;

	let response = send(
		state(&prod, &staging),
		get("/api/accounts/0xabc/portfolio?chainIds=1,8453&foo=bar"),
	)
	.await;

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(body_text(response).await, r#"{"portfolio":[]}"#);
}

#[tokio::test]
async fn test_portfolio_retries_server_errors_then_falls_back() {
	let prod = MockServer::start().await;
	let staging = MockServer::start().await;

	// default budget: 2 retries per endpoint
	Mock::given(method("GET"))
		.and(path("/accounts/0xabc/portfolio"))
		.respond_with(ResponseTemplate::new(503))
		.expect(3)
		.mount(&prod)
		.await;
	Mock::given(method("GET"))
		.and(path("/accounts/0xabc/portfolio"))
		.respond_with(ResponseTemplate::new(200).set_body_string(r#"{"portfolio":[1]}"#))
		.expect(1)
		.mount(&staging)
		.await;

	let response = send(state(&prod, &staging), get("/api/accounts/0xabc/portfolio")).await;

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(body_text(response).await, r#"{"portfolio":[1]}"#);
}

#[tokio::test]
async fn test_unreachable_upstreams_yield_proxy_failure() {
	// nothing listens on these ports
	let state = AppState::from_config(config(
		"http://127.0.0.1:1",
		"http://127.0.0.1:2",
		Some("test-key"),
	))
	.unwrap();

	let response = send(state, post("/api/intent-operations", "{}")).await;

	assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(
		response.headers()["access-control-allow-methods"],
		"POST, OPTIONS"
	);
	let body = body_json(response).await;
	assert_eq!(body["error"], "Failed to proxy request");
	// the last attempt went to staging
	let details = body["details"].as_str().unwrap();
	assert!(details.contains("127.0.0.1:2"), "{}", details);
}

#[tokio::test]
async fn test_invalid_json_body() {
	let prod = MockServer::start().await;
	let staging = MockServer::start().await;
	expect_untouched(&prod).await;
	expect_untouched(&staging).await;

	let response = send(state(&prod, &staging), post("/api/intents/route", "{not json")).await;

	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	assert_eq!(body_json(response).await, json!({"error": "Invalid JSON body"}));
}

#[tokio::test]
async fn test_health_and_fallback() {
	let prod = MockServer::start().await;
	let staging = MockServer::start().await;

	let response = send(state(&prod, &staging), get("/health")).await;
	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(
		body_json(response).await,
		json!({"status": "ok", "apiKeyConfigured": true})
	);

	let response = send(state(&prod, &staging), get("/api/unknown")).await;
	assert_eq!(response.status(), StatusCode::NOT_FOUND);
	assert_eq!(response.headers()["access-control-allow-origin"], "*");
	assert_eq!(body_json(response).await, json!({"error": "Not found"}));
}

#[tokio::test]
async fn test_path_values_stay_in_one_upstream_segment() {
	let prod = MockServer::start().await;
	let staging = MockServer::start().await;
	expect_untouched(&staging).await;

	Mock::given(method("GET"))
		.and(path("/intent-operation/..%2F..%2Fadmin"))
		.respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status":"PENDING"}"#))
		.expect(1)
		.mount(&prod)
		.await;
	Mock::given(method("GET"))
		.and(path("/intent-operation/abc%3Finjected=1"))
		.respond_with(ResponseTemplate::new(200).set_body_string("{}"))
		.expect(1)
		.mount(&prod)
		.await;
	Mock::given(method("GET"))
		.and(path("/accounts/0xabc%2F..%2F..%2Fintents%2Froute/portfolio"))
		.respond_with(ResponseTemplate::new(200).set_body_string("{}"))
		.expect(1)
		.mount(&prod)
		.await;

	for uri in [
		"/api/intent-operation/..%2F..%2Fadmin",
		"/api/intent-operation/abc%3Finjected=1",
		"/api/accounts/0xabc%2F..%2F..%2Fintents%2Froute/portfolio",
	] {
		let response = send(state(&prod, &staging), get(uri)).await;
		assert_eq!(response.status(), StatusCode::OK, "{}", uri);
	}
}

#[tokio::test]
async fn test_dot_segment_path_values_are_refused() {
	let prod = MockServer::start().await;
	let staging = MockServer::start().await;
	expect_untouched(&prod).await;
	expect_untouched(&staging).await;

	let response = send(state(&prod, &staging), get("/api/intent-operation/%2E%2E")).await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	assert_eq!(
		body_json(response).await,
		json!({"error": "Invalid path parameter '..'"})
	);

	let response = send(
		state(&prod, &staging),
		get("/api/intent-operation-status?id=."),
	)
	.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_blank_address_is_rejected() {
	let prod = MockServer::start().await;
	let staging = MockServer::start().await;
	expect_untouched(&prod).await;
	expect_untouched(&staging).await;

	let response = send(state(&prod, &staging), get("/api/accounts/%20/portfolio")).await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	assert_eq!(
		body_json(response).await,
		json!({"error": "Missing address parameter"})
	);

	let response = send(state(&prod, &staging), get("/api/accounts/%20%20/portfolio")).await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	assert_eq!(response.headers()["access-control-allow-methods"], "GET, OPTIONS");
}

#[tokio::test]
async fn test_undecodable_path_is_json_with_cors() {
	let prod = MockServer::start().await;
	let staging = MockServer::start().await;
	expect_untouched(&prod).await;
	expect_untouched(&staging).await;

	let response = send(state(&prod, &staging), get("/api/intent-operation/%FF")).await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	assert_eq!(response.headers()["content-type"], "application/json");
	assert_eq!(response.headers()["access-control-allow-origin"], "*");
	assert_eq!(
		response.headers()["access-control-allow-methods"],
		"GET, OPTIONS"
	);
	let body = body_json(response).await;
	assert!(body["error"].as_str().unwrap().contains("UTF-8"), "{}", body);

	// admission still comes first
	let request = Request::builder()
		.method("OPTIONS")
		.uri("/api/intent-operation/%FF")
		.body(Body::empty())
		.unwrap();
	let response = send(state(&prod, &staging), request).await;
	assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_oversized_body_is_json_with_cors() {
	let prod = MockServer::start().await;
	let staging = MockServer::start().await;
	expect_untouched(&prod).await;
	expect_untouched(&staging).await;

	let mut config = config(&prod.uri(), &staging.uri(), Some("test-key"));
	config.server.max_body_bytes = 16;
	let state = AppState::from_config(config).unwrap();

	let body = json!({"destinationChainId": 84532, "padding": "x".repeat(64)}).to_string();
	let response = send(state, post("/api/intents/route", &body)).await;

	assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
	assert_eq!(response.headers()["content-type"], "application/json");
	assert_eq!(
		response.headers()["access-control-allow-methods"],
		"POST, OPTIONS"
	);
	let body = body_json(response).await;
	assert!(body["error"].is_string());
}
