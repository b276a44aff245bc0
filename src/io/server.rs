//! HTTP front for the mock router
//!
//! Serves catalog procedures at `{base_path}/{procedure}` (queries as GET with
//! an `input` query parameter, mutations as POST with a JSON body), plus
//! `/health` and a Prometheus `/metrics` endpoint. Uses hyper for the HTTP server.

use crate::infra::metrics::{Metrics, MetricsSummary, METRICS_BUCKET_BOUNDS, METRICS_NUM_BUCKETS};
use crate::mock::envelope::{self, decode_body_input, decode_query_input};
use crate::mock::procedures::BOOKING_CREATE;
use crate::mock::{ErrorCode, MockRouter, ProcedureError, ProcedureKind};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde_json::Value;
use std::convert::Infallible;
use std::fmt::Write;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Shared state handed to every connection
pub struct ServerState {
    pub router: Arc<MockRouter>,
    pub metrics: Arc<Metrics>,
    /// Normalized prefix: leading slash, no trailing slash
    pub base_path: String,
}

impl ServerState {
    pub fn new(
        router: Arc<MockRouter>,
        metrics: Arc<Metrics>,
        base_path: impl Into<String>,
    ) -> Self {
        Self { router, metrics, base_path: base_path.into() }
    }

    /// Procedure path for a request path under the base prefix
    fn procedure_path<'a>(&self, path: &'a str) -> Option<&'a str> {
        let rest = path.strip_prefix(self.base_path.as_str())?;
        let procedure = rest.strip_prefix('/')?;
        (!procedure.is_empty()).then_some(procedure)
    }
}

/// Prometheus metric type
enum MetricType {
    Counter,
    Gauge,
}

impl MetricType {
    fn as_str(&self) -> &'static str {
        match self {
            MetricType::Counter => "counter",
            MetricType::Gauge => "gauge",
        }
    }
}

/// Write a simple metric (counter or gauge)
fn write_metric(output: &mut String, name: &str, help: &str, typ: MetricType, val: u64) {
    let _ = writeln!(output, "# HELP {name} {help}");
    let _ = writeln!(output, "# TYPE {name} {}", typ.as_str());
    let _ = writeln!(output, "{name} {val}");
}

/// Write a histogram metric with buckets, sum, and count
fn write_histogram(
    output: &mut String,
    name: &str,
    help: &str,
    buckets: &[u64; METRICS_NUM_BUCKETS],
    avg: u64,
) {
    let _ = writeln!(output, "# HELP {name} {help}");
    let _ = writeln!(output, "# TYPE {name} histogram");

    let mut cumulative = 0u64;
    for (i, &bound) in METRICS_BUCKET_BOUNDS.iter().enumerate() {
        cumulative += buckets[i];
        let _ = writeln!(output, "{name}_bucket{{le=\"{bound}\"}} {cumulative}");
    }
    cumulative += buckets[METRICS_NUM_BUCKETS - 1];
    let _ = writeln!(output, "{name}_bucket{{le=\"+Inf\"}} {cumulative}");

    let count: u64 = buckets.iter().sum();
    let _ = writeln!(output, "{name}_sum {}", avg * count);
    let _ = writeln!(output, "{name}_count {count}");
}

/// Format metrics in Prometheus text exposition format
fn format_prometheus_metrics(summary: &MetricsSummary) -> String {
    let mut output = String::with_capacity(2048);

    write_metric(
        &mut output,
        "mock_procedure_calls_total",
        "Procedure calls answered",
        MetricType::Counter,
        summary.calls_total,
    );
    let name = "mock_procedure_errors_total";
    let _ = writeln!(output, "# HELP {name} Procedure calls answered with an error");
    let _ = writeln!(output, "# TYPE {name} counter");
    for (code, val) in [
        ("BAD_REQUEST", summary.bad_request_total),
        ("NOT_FOUND", summary.not_found_total),
        ("OTHER", summary.other_errors_total),
    ] {
        let _ = writeln!(output, "{name}{{code=\"{code}\"}} {val}");
    }
    write_metric(
        &mut output,
        "mock_unknown_procedure_total",
        "Requests for paths outside the catalog",
        MetricType::Counter,
        summary.unknown_procedure_total,
    );
    write_metric(
        &mut output,
        "mock_bookings_created_total",
        "Bookings created",
        MetricType::Counter,
        summary.bookings_created_total,
    );
    write_histogram(
        &mut output,
        "mock_procedure_latency_us",
        "Procedure handler latency in microseconds",
        &summary.latency_buckets,
        summary.latency_avg_us,
    );
    write_metric(
        &mut output,
        "mock_procedure_latency_max_us",
        "Maximum procedure handler latency",
        MetricType::Gauge,
        summary.latency_max_us,
    );

    output
}

fn json_response(status: u16, body: &Value) -> Response<Full<Bytes>> {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Full::new(Bytes::from(body.to_string())))
        .expect("static response should not fail")
}

fn error_response(error: &ProcedureError, path: &str) -> Response<Full<Bytes>> {
    json_response(error.code.http_status(), &envelope::failure(error, path))
}

/// Answer a procedure request under the base prefix
async fn handle_procedure(
    req: Request<hyper::body::Incoming>,
    procedure_path: String,
    state: Arc<ServerState>,
) -> Response<Full<Bytes>> {
    let Some(procedure) = state.router.resolve(&procedure_path) else {
        state.metrics.record_unknown_procedure();
        warn!(path = %procedure_path, "unknown_procedure");
        let err =
            ProcedureError::not_found(format!("No procedure found on path \"{procedure_path}\""));
        return error_response(&err, &procedure_path);
    };

    let expected_method = match procedure.kind {
        ProcedureKind::Query => Method::GET,
        ProcedureKind::Mutation => Method::POST,
    };
    if req.method() != expected_method {
        let err = ProcedureError::new(
            ErrorCode::MethodNotSupported,
            format!("Unsupported {} request to {:?} procedure", req.method(), procedure.kind),
        );
        return error_response(&err, &procedure_path);
    }

    let input = match procedure.kind {
        ProcedureKind::Query => decode_query_input(req.uri().query()),
        ProcedureKind::Mutation => match req.into_body().collect().await {
            Ok(collected) => decode_body_input(&collected.to_bytes()),
            Err(e) => Err(ProcedureError::bad_request(format!("Failed to read request body: {e}"))),
        },
    };

    let start = Instant::now();
    let result = input.and_then(|input| state.router.invoke(procedure, input));
    let latency_us = start.elapsed().as_micros() as u64;

    state.metrics.record_call(latency_us, result.as_ref().err().map(|e| e.code));

    match result {
        Ok(data) => {
            if procedure.path == BOOKING_CREATE {
                state.metrics.record_booking_created();
            }
            debug!(path = %procedure_path, latency_us = %latency_us, "procedure_ok");
            json_response(200, &envelope::success(data))
        }
        Err(e) => {
            info!(path = %procedure_path, code = %e.code, message = %e.message, "procedure_error");
            error_response(&e, &procedure_path)
        }
    }
}

/// Handle HTTP requests
async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<ServerState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let path = req.uri().path().to_string();

    if req.method() == Method::OPTIONS {
        return Ok(Response::builder()
            .status(StatusCode::OK)
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "GET, POST, OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type")
            .body(Full::new(Bytes::from("")))
            .expect("static response should not fail"));
    }

    match (req.method(), path.as_str()) {
        (&Method::GET, "/metrics") => {
            let body = format_prometheus_metrics(&state.metrics.snapshot());
            return Ok(Response::builder()
                .status(StatusCode::OK)
                .header("Content-Type", "text/plain; version=0.0.4; charset=utf-8")
                .body(Full::new(Bytes::from(body)))
                .expect("static response should not fail"));
        }
        (&Method::GET, "/health") => {
            return Ok(Response::builder()
                .status(StatusCode::OK)
                .body(Full::new(Bytes::from("ok")))
                .expect("static response should not fail"));
        }
        _ => {}
    }

    match state.procedure_path(&path) {
        Some(procedure_path) => {
            let procedure_path = procedure_path.to_string();
            Ok(handle_procedure(req, procedure_path, state).await)
        }
        None => Ok(Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Full::new(Bytes::from("Not Found")))
            .expect("static response should not fail")),
    }
}

/// Bind the listening socket
pub async fn bind(
    bind_address: &str,
    port: u16,
) -> Result<TcpListener, Box<dyn std::error::Error + Send + Sync>> {
    let ip: std::net::IpAddr = bind_address.parse()?;
    let listener = TcpListener::bind(SocketAddr::new(ip, port)).await?;
    Ok(listener)
}

/// Serve connections until the shutdown flag flips to true
pub async fn run_server(
    listener: TcpListener,
    state: Arc<ServerState>,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, base_path = %state.base_path, "mock_server_started");

    loop {
        tokio::select! {
            result = listener.accept() => {
                match result {
                    Ok((stream, _addr)) => {
                        let io = TokioIo::new(stream);
                        let state = state.clone();

                        tokio::spawn(async move {
                            let service = service_fn(move |req| {
                                let state = state.clone();
                                async move { handle_request(req, state).await }
                            });

                            if let Err(e) = http1::Builder::new()
                                .serve_connection(io, service)
                                .await
                            {
                                error!(error = %e, "mock_server_http_error");
                            }
                        });
                    }
                    Err(e) => {
                        error!(error = %e, "mock_server_accept_error");
                    }
                }
            }
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    info!("mock_server_shutdown");
                    return Ok(());
                }
            }
        }
    }
}
