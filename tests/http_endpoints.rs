// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use sensor_gateway::{
    AppState, Config, InfluxConfig, StoreStatus, create_router, outcome, probe_once, query,
    start_probe_loop,
};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn make_state(server: &MockServer) -> Arc<AppState> {
    let config = Config {
        server_addr: "127.0.0.1:8000".to_string(),
        influx: InfluxConfig {
            url: server.uri(),
            token: "test-token".to_string().into(),
            org: "acme".to_string(),
            bucket: "sensors".to_string(),
            timeout_secs: 5,
        },
        history_max_minutes: 1440,
        latest_lookback_days: 30,
        health_probe_interval_secs: 1,
    };
    Arc::new(AppState::new(config).unwrap())
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<String> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

async fn mount_write(server: &MockServer, status: u16, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/api/v2/write"))
        .respond_with(ResponseTemplate::new(status))
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn mount_query(server: &MockServer, csv: &str) {
    Mock::given(method("POST"))
        .and(path("/api/v2/query"))
        .respond_with(ResponseTemplate::new(200).set_body_string(csv))
        .mount(server)
        .await;
}

// --- POST /api/ingest ---

#[tokio::test]
async fn ingest_returns_201_with_trimmed_sensor_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/write"))
        .and(body_string_contains("sensor_id=sensor_001,zone=zone_A "))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let state = make_state(&server);
    let app = create_router(state.clone());

    let resp = app
        .oneshot(post_json(
            "/api/ingest",
            r#"{"sensorId":"  sensor_001 ","zone":"zone_A","value":42.5,"latencyMs":12.3}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Data ingested successfully");
    assert_eq!(body["sensorId"], "sensor_001");
    assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
    assert_eq!(state.metrics.get_ingest_count(outcome::SUCCESS), 1);
}

#[tokio::test]
async fn ingest_blank_zone_is_400_and_not_written() {
    let server = MockServer::start().await;
    mount_write(&server, 204, 0).await;

    let state = make_state(&server);
    let app = create_router(state.clone());

    let resp = app
        .oneshot(post_json(
            "/api/ingest",
            r#"{"sensorId":"s1","zone":"   ","value":1.0,"latencyMs":1.0}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Validation error");
    assert_eq!(body["detail"], "zone cannot be empty or whitespace");
    assert_eq!(state.metrics.get_ingest_count(outcome::REJECTED), 1);
}

#[tokio::test]
async fn ingest_negative_latency_is_400() {
    let server = MockServer::start().await;
    mount_write(&server, 204, 0).await;
    let app = create_router(make_state(&server));

    let resp = app
        .oneshot(post_json(
            "/api/ingest",
            r#"{"sensorId":"s1","zone":"z","value":1.0,"latencyMs":-3}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["detail"], "latencyMs must be greater than or equal to 0");
}

#[tokio::test]
async fn ingest_malformed_json_is_400() {
    let server = MockServer::start().await;
    mount_write(&server, 204, 0).await;
    let app = create_router(make_state(&server));

    let resp = app
        .oneshot(post_json("/api/ingest", r#"{"sensorId":"s1","zone":"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "Validation error");
}

#[tokio::test]
async fn ingest_missing_field_is_400() {
    let server = MockServer::start().await;
    mount_write(&server, 204, 0).await;
    let app = create_router(make_state(&server));

    let resp = app
        .oneshot(post_json(
            "/api/ingest",
            r#"{"sensorId":"s1","zone":"z","value":1.0}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn ingest_store_failure_is_500() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/write"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_string(r#"{"code":"internal error","message":"engine closed"}"#),
        )
        .mount(&server)
        .await;

    let state = make_state(&server);
    let app = create_router(state.clone());

    let resp = app
        .oneshot(post_json(
            "/api/ingest",
            r#"{"sensorId":"s1","zone":"z","value":1.0,"latencyMs":0}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Database error");
    assert!(body["detail"].as_str().unwrap().contains("engine closed"));
    assert_eq!(state.metrics.get_ingest_count(outcome::ERROR), 1);
}

// --- GET /api/latest/{sensor_id} ---

#[tokio::test]
async fn latest_returns_found_reading() {
    let server = MockServer::start().await;
    mount_query(
        &server,
        ",result,table,_time,latency_ms,sensor_id,value,zone\n\
         ,_result,0,2026-01-30T14:18:38Z,12.3,sensor_001,42.5,zone_A\n",
    )
    .await;

    let state = make_state(&server);
    let app = create_router(state.clone());

    let resp = app
        .oneshot(
            Request::get("/api/latest/sensor_001")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["found"], true);
    assert_eq!(body["sensorId"], "sensor_001");
    assert_eq!(body["zone"], "zone_A");
    assert_eq!(body["value"], 42.5);
    assert_eq!(body["latencyMs"], 12.3);
    assert_eq!(body["timestamp"], "2026-01-30T14:18:38Z");
    assert_eq!(
        state.metrics.get_query_count(query::LATEST, outcome::SUCCESS),
        1
    );
}

#[tokio::test]
async fn latest_without_data_is_200_not_found() {
    let server = MockServer::start().await;
    mount_query(&server, "").await;
    let app = create_router(make_state(&server));

    let resp = app
        .oneshot(Request::get("/api/latest/ghost").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["found"], false);
    assert_eq!(body["sensorId"], "ghost");
    assert!(body["value"].is_null());
}

#[tokio::test]
async fn latest_whitespace_sensor_id_is_400() {
    let server = MockServer::start().await;
    let app = create_router(make_state(&server));

    let resp = app
        .oneshot(Request::get("/api/latest/%20%20").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn backslash_sensor_id_is_400_on_ingest_and_latest() {
    let server = MockServer::start().await;
    mount_write(&server, 204, 0).await;
    let state = make_state(&server);

    let resp = create_router(state.clone())
        .oneshot(post_json(
            "/api/ingest",
            r#"{"sensorId":"a\\b","zone":"z","value":1.0,"latencyMs":0}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(
        body["detail"],
        "sensorId cannot contain backslashes or control characters"
    );

    let resp = create_router(state)
        .oneshot(Request::get("/api/latest/a%5Cb").body(String::new()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn latest_store_failure_is_500() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/query"))
        .respond_with(ResponseTemplate::new(401).set_body_string(
            r#"{"code":"unauthorized","message":"unauthorized access"}"#,
        ))
        .mount(&server)
        .await;

    let app = create_router(make_state(&server));
    let resp = app
        .oneshot(Request::get("/api/latest/s1").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "Database error");
    assert!(
        body["detail"]
            .as_str()
            .unwrap()
            .contains("unauthorized access")
    );
}

// --- GET /api/history/{sensor_id} ---

#[tokio::test]
async fn history_defaults_to_60_minutes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/query"))
        .and(body_string_contains("range(start: -60m)"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            ",result,table,_time,sensor_id,value\n\
             ,_result,0,2026-01-30T14:00:00Z,s1,1.5\n\
             ,_result,0,2026-01-30T14:01:00Z,s1,2.5\n",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let app = create_router(make_state(&server));
    let resp = app
        .oneshot(Request::get("/api/history/s1").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let points = body.as_array().unwrap();
    assert_eq!(points.len(), 2);
    assert_eq!(points[0]["sensor_id"], "s1");
    assert_eq!(points[0]["value"], 1.5);
    assert_eq!(points[1]["timestamp"], "2026-01-30T14:01:00Z");
}

#[tokio::test]
async fn history_uses_requested_window() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/query"))
        .and(body_string_contains("range(start: -5m)"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .expect(1)
        .mount(&server)
        .await;

    let app = create_router(make_state(&server));
    let resp = app
        .oneshot(
            Request::get("/api/history/s1?minutes=5")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_json(resp).await.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn history_window_out_of_bounds_is_400() {
    let server = MockServer::start().await;
    let state = make_state(&server);

    for uri in [
        "/api/history/s1?minutes=0",
        "/api/history/s1?minutes=-10",
        "/api/history/s1?minutes=1441",
        "/api/history/s1?minutes=abc",
    ] {
        let resp = create_router(state.clone())
            .oneshot(Request::get(uri).body(String::new()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "uri: {uri}");
        let body = body_json(resp).await;
        assert_eq!(body["error"], "Validation error", "uri: {uri}");
    }

    assert_eq!(
        state.metrics.get_query_count(query::HISTORY, outcome::REJECTED),
        4
    );
}

#[tokio::test]
async fn history_store_failure_is_500() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/query"))
        .respond_with(ResponseTemplate::new(500).set_body_string(
            r#"{"code":"internal error","message":"query engine unavailable"}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let state = make_state(&server);
    let resp = create_router(state.clone())
        .oneshot(
            Request::get("/api/history/s1?minutes=15")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    // A store failure must not look like an empty history
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Database error");
    assert!(
        body["detail"]
            .as_str()
            .unwrap()
            .contains("query engine unavailable")
    );
    assert_eq!(
        state.metrics.get_query_count(query::HISTORY, outcome::ERROR),
        1
    );
    assert_eq!(
        state.metrics.get_query_count(query::HISTORY, outcome::SUCCESS),
        0
    );
}

// --- /health, /, /metrics ---

#[tokio::test]
async fn health_is_unknown_before_first_probe() {
    let server = MockServer::start().await;
    let app = create_router(make_state(&server));

    let resp = app
        .oneshot(Request::get("/health").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["influxdb"], "unknown");
}

#[tokio::test]
async fn health_connected_after_successful_probe() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let state = make_state(&server);
    assert_eq!(probe_once(&state).await, StoreStatus::Connected);

    let resp = create_router(state.clone())
        .oneshot(Request::get("/health").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["influxdb"], "connected");
    assert_eq!(state.metrics.get_store_up(), 1);
}

#[tokio::test]
async fn health_degraded_when_store_down() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let state = make_state(&server);
    assert_eq!(probe_once(&state).await, StoreStatus::Disconnected);

    let resp = create_router(state)
        .oneshot(Request::get("/health").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(resp).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["influxdb"], "disconnected");
}

#[tokio::test]
async fn probe_loop_updates_health_and_stops_on_shutdown() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let state = make_state(&server);
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let handle = start_probe_loop(shutdown_rx, state.clone());

    // Nothing is pinged before the first interval elapses
    tokio::time::sleep(std::time::Duration::from_millis(300)).await;
    assert_eq!(state.store_health.status(), StoreStatus::Unknown);
    assert!(server.received_requests().await.unwrap().is_empty());

    for _ in 0..150 {
        if state.store_health.status() != StoreStatus::Unknown {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    assert_eq!(state.store_health.status(), StoreStatus::Connected);

    shutdown_tx.send(true).unwrap();
    tokio::time::timeout(std::time::Duration::from_secs(5), handle)
        .await
        .expect("probe loop did not stop")
        .unwrap();
}

#[tokio::test]
async fn root_returns_service_banner() {
    let server = MockServer::start().await;
    let app = create_router(make_state(&server));

    let resp = app
        .oneshot(Request::get("/").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["service"], "PredictionX API");
    assert_eq!(body["status"], "running");
}

#[tokio::test]
async fn metrics_returns_openmetrics_with_request_counters() {
    let server = MockServer::start().await;
    mount_write(&server, 204, 1).await;
    let state = make_state(&server);

    let resp = create_router(state.clone())
        .oneshot(post_json(
            "/api/ingest",
            r#"{"sensorId":"s1","zone":"z","value":1.0,"latencyMs":0}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = create_router(state)
        .oneshot(Request::get("/metrics").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let ct = resp
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(
        ct.contains("openmetrics-text"),
        "Expected OpenMetrics content-type, got: {ct}"
    );

    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("sensor_gateway_ingest_total{outcome=\"success\"} 1"));
    assert!(text.contains("sensor_gateway_store_request_duration_milliseconds{operation=\"write\"}"));
}

// --- 404 for unknown routes ---

#[tokio::test]
async fn unknown_route_returns_404() {
    let server = MockServer::start().await;
    let app = create_router(make_state(&server));

    let resp = app
        .oneshot(Request::get("/api/logs").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
