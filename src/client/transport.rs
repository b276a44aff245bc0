//! Transports carrying procedure calls
//!
//! `HttpTransport` talks to a real backend. `InterceptingTransport` answers
//! catalog calls from the mock service while it is started and hands every
//! other call to the wrapped transport unchanged.

use crate::client::error::ClientError;
use crate::mock::envelope;
use crate::mock::{MockService, ProcedureKind};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct RpcRequest {
    pub path: String,
    pub kind: ProcedureKind,
    pub input: Option<Value>,
}

impl RpcRequest {
    pub fn query(path: impl Into<String>, input: Option<Value>) -> Self {
        Self { path: path.into(), kind: ProcedureKind::Query, input }
    }

    pub fn mutation(path: impl Into<String>, input: Option<Value>) -> Self {
        Self { path: path.into(), kind: ProcedureKind::Mutation, input }
    }
}

/// Raw response: HTTP status plus the decoded JSON envelope
#[derive(Debug, Clone, PartialEq)]
pub struct RpcResponse {
    pub status: u16,
    pub body: Value,
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &RpcRequest) -> Result<RpcResponse, ClientError>;
}

/// Procedure calls over HTTP
pub struct HttpTransport {
    base_url: String,
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let parsed = url::Url::parse(base_url)?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url: parsed.as_str().trim_end_matches('/').to_string(), http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &RpcRequest) -> Result<RpcResponse, ClientError> {
        let endpoint = self.endpoint(&request.path);
        let builder = match request.kind {
            ProcedureKind::Query => {
                let mut builder = self.http.get(&endpoint);
                if let Some(input) = &request.input {
                    builder = builder.query(&[("input", input.to_string())]);
                }
                builder
            }
            ProcedureKind::Mutation => {
                let mut builder = self.http.post(&endpoint);
                if let Some(input) = &request.input {
                    builder = builder.json(input);
                }
                builder
            }
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        let body = serde_json::from_str(&text).map_err(|e| {
            ClientError::Decode(format!("non-JSON response (status {status}) from {endpoint}: {e}"))
        })?;
        debug!(path = %request.path, status = %status, "rpc_http_response");
        Ok(RpcResponse { status, body })
    }
}

/// Answers catalog calls in-process while the mock service is started
pub struct InterceptingTransport<T> {
    service: MockService,
    inner: T,
}

impl<T: Transport> InterceptingTransport<T> {
    pub fn new(service: MockService, inner: T) -> Self {
        Self { service, inner }
    }
}

#[async_trait]
impl<T: Transport> Transport for InterceptingTransport<T> {
    async fn send(&self, request: &RpcRequest) -> Result<RpcResponse, ClientError> {
        let input = request.input.clone().and_then(envelope::unwrap_input);
        match self.service.intercept(&request.path, request.kind, input) {
            Some(Ok(data)) => Ok(RpcResponse { status: 200, body: envelope::success(data) }),
            Some(Err(e)) => Ok(RpcResponse {
                status: e.code.http_status(),
                body: envelope::failure(&e, &request.path),
            }),
            None => self.inner.send(request).await,
        }
    }
}
