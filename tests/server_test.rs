//! End-to-end tests: HTTP client against the mock server on a loopback port

use experience_booking::client::{HttpTransport, RpcClient};
use experience_booking::domain::{BookingStatus, ExperienceFilter, NewBooking};
use experience_booking::infra::Metrics;
use experience_booking::io::{bind, run_server, ServerState};
use experience_booking::mock::MockRouter;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

struct TestServer {
    addr: SocketAddr,
    metrics: Arc<Metrics>,
    shutdown: watch::Sender<bool>,
}

impl TestServer {
    async fn start() -> Self {
        let listener = bind("127.0.0.1", 0).await.unwrap();
        let addr = listener.local_addr().unwrap();
        let metrics = Arc::new(Metrics::new());
        let state = Arc::new(ServerState::new(
            Arc::new(MockRouter::default()),
            metrics.clone(),
            "/api/trpc",
        ));
        let (shutdown, shutdown_rx) = watch::channel(false);
        tokio::spawn(async move {
            run_server(listener, state, shutdown_rx).await.unwrap();
        });
        Self { addr, metrics, shutdown }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    fn client(&self) -> RpcClient {
        let transport =
            HttpTransport::new(&self.url("/api/trpc"), Duration::from_secs(5)).unwrap();
        RpcClient::new(transport)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

#[tokio::test]
async fn test_get_by_id_over_http() {
    let server = TestServer::start().await;
    let http = reqwest::Client::new();

    let response = http
        .get(server.url("/api/trpc/experience.getById"))
        .query(&[("input", "\"exp-1\"")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["result"]["data"]["id"], "exp-1");

    let response = http
        .get(server.url("/api/trpc/experience.getById"))
        .query(&[("input", "\"nope\"")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["data"]["code"], "NOT_FOUND");
    assert_eq!(body["error"]["data"]["httpStatus"], 404);

    let response = http.get(server.url("/api/trpc/experience.getById")).send().await.unwrap();
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["data"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_wrapped_mutation_body() {
    let server = TestServer::start().await;
    let response = reqwest::Client::new()
        .post(server.url("/api/trpc/booking.create"))
        .json(&json!({"json": {
            "experienceId": "exp-4",
            "numberOfParticipants": 2,
            "scheduledVisitTime": "2026-12-05T10:00:00Z"
        }}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["result"]["data"]["status"], "confirmed");
    assert_eq!(server.metrics.bookings_created_total(), 1);
}

#[tokio::test]
async fn test_unknown_procedure_and_wrong_method() {
    let server = TestServer::start().await;
    let http = reqwest::Client::new();

    let response = http.get(server.url("/api/trpc/payment.charge")).send().await.unwrap();
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["data"]["code"], "NOT_FOUND");
    assert_eq!(server.metrics.unknown_procedure_total(), 1);

    let response = http.get(server.url("/api/trpc/booking.create")).send().await.unwrap();
    assert_eq!(response.status(), 405);
}

#[tokio::test]
async fn test_typed_client_over_http() {
    let server = TestServer::start().await;
    let client = server.client();

    let health = client.health_check().await.unwrap();
    assert_eq!(health.status, "ok");

    let page = client.experience_list(&ExperienceFilter::page(10, 4)).await.unwrap();
    assert_eq!(page.experiences.len(), 2);
    assert!(!page.has_more);

    let page = client
        .experience_list_by_brand("brand-1", &ExperienceFilter::page(10, 0).with_status("draft"))
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.experiences[0].id, "exp-3");

    let request = NewBooking {
        experience_id: "exp-1".to_string(),
        user_id: None,
        number_of_participants: 1,
        scheduled_visit_time: "2026-12-05T10:00:00Z".to_string(),
    };
    let first = client.booking_create(&request).await.unwrap();
    let second = client.booking_create(&request).await.unwrap();
    assert_eq!(first.status, BookingStatus::Confirmed);
    assert_ne!(first.id, second.id);

    let err = client.experience_get_by_id("missing").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_health_and_metrics_endpoints() {
    let server = TestServer::start().await;
    let http = reqwest::Client::new();

    let body = http.get(server.url("/health")).send().await.unwrap().text().await.unwrap();
    assert_eq!(body, "ok");

    http.get(server.url("/api/trpc/health.check")).send().await.unwrap();
    let body = http.get(server.url("/metrics")).send().await.unwrap().text().await.unwrap();
    assert!(body.contains("mock_procedure_calls_total 1"));
}
