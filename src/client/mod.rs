//! Typed procedure client
//!
//! This module wraps the procedure catalog in typed async calls:
//! - `transport` - HTTP transport and the mock-intercepting wrapper
//! - `error` - client error taxonomy
//!
//! Every call goes through a [`Transport`]; clients built from config wrap the
//! HTTP transport so a started [`MockService`] answers catalog calls locally.

pub mod error;
pub mod transport;

pub use error::ClientError;
pub use transport::{HttpTransport, InterceptingTransport, RpcRequest, RpcResponse, Transport};

use crate::domain::{
    Booking, BrandExperienceFilter, Experience, ExperienceFilter, ExperienceList, NewBooking,
};
use crate::infra::Config;
use crate::mock::procedures::{
    BOOKING_CREATE, BOOKING_LIST_BY_USER, EXPERIENCE_GET_BY_ID, EXPERIENCE_LIST,
    EXPERIENCE_LIST_BY_BRAND, HEALTH_CHECK,
};
use crate::mock::MockService;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Payload of `health.check`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
    pub message: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    message: String,
    #[serde(default)]
    data: Option<ErrorData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorData {
    code: String,
    http_status: u16,
}

/// Pull the payload out of a response envelope
fn decode_envelope<T: DeserializeOwned>(response: RpcResponse) -> Result<T, ClientError> {
    let RpcResponse { status, mut body } = response;

    if let Some(error) = body.get_mut("error").map(Value::take) {
        let envelope: ErrorEnvelope = serde_json::from_value(error)
            .map_err(|e| ClientError::Decode(format!("malformed error envelope: {e}")))?;
        let (code, http_status) = match envelope.data {
            Some(data) => (data.code, data.http_status),
            None => ("UNKNOWN".to_string(), status),
        };
        return Err(ClientError::Procedure { code, http_status, message: envelope.message });
    }

    let data = body
        .get_mut("result")
        .and_then(|result| result.get_mut("data"))
        .map(Value::take)
        .ok_or_else(|| ClientError::Decode(format!("missing result.data (status {status})")))?;
    serde_json::from_value(data).map_err(|e| ClientError::Decode(e.to_string()))
}

#[derive(Clone)]
pub struct RpcClient {
    transport: Arc<dyn Transport>,
}

impl RpcClient {
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self { transport: Arc::new(transport) }
    }

    /// HTTP client whose catalog calls are answered by the global mock
    /// service whenever it has been started
    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        let http = HttpTransport::new(
            config.client_base_url(),
            Duration::from_millis(config.client_timeout_ms()),
        )?;
        debug!(
            base_url = %http.base_url(),
            timeout_ms = %config.client_timeout_ms(),
            "rpc_client_configured"
        );
        Ok(Self::new(InterceptingTransport::new(MockService::global().clone(), http)))
    }

    async fn call<T: DeserializeOwned>(&self, request: RpcRequest) -> Result<T, ClientError> {
        let response = self.transport.send(&request).await?;
        decode_envelope(response)
    }

    fn encode<T: Serialize>(input: &T) -> Result<Value, ClientError> {
        serde_json::to_value(input).map_err(|e| ClientError::Decode(e.to_string()))
    }

    pub async fn experience_get_by_id(&self, id: &str) -> Result<Experience, ClientError> {
        self.call(RpcRequest::query(EXPERIENCE_GET_BY_ID, Some(json!(id)))).await
    }

    pub async fn experience_list(
        &self,
        filter: &ExperienceFilter,
    ) -> Result<ExperienceList, ClientError> {
        self.call(RpcRequest::query(EXPERIENCE_LIST, Some(Self::encode(filter)?))).await
    }

    pub async fn experience_list_by_brand(
        &self,
        brand_id: &str,
        filter: &ExperienceFilter,
    ) -> Result<ExperienceList, ClientError> {
        let input =
            BrandExperienceFilter { brand_id: brand_id.to_string(), filter: filter.clone() };
        self.call(RpcRequest::query(EXPERIENCE_LIST_BY_BRAND, Some(Self::encode(&input)?))).await
    }

    pub async fn booking_create(&self, booking: &NewBooking) -> Result<Booking, ClientError> {
        self.call(RpcRequest::mutation(BOOKING_CREATE, Some(Self::encode(booking)?))).await
    }

    pub async fn booking_list_by_user(&self, user_id: &str) -> Result<Vec<Booking>, ClientError> {
        self.call(RpcRequest::query(BOOKING_LIST_BY_USER, Some(json!(user_id)))).await
    }

    pub async fn health_check(&self) -> Result<HealthStatus, ClientError> {
        self.call(RpcRequest::query(HEALTH_CHECK, None)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BookingStatus;
    use crate::mock::{Environment, MockRouter};

    /// Transport that only ever answers from a private started mock service
    fn mock_client() -> RpcClient {
        struct Unreachable;

        #[async_trait::async_trait]
        impl Transport for Unreachable {
            async fn send(&self, request: &RpcRequest) -> Result<RpcResponse, ClientError> {
                Err(ClientError::Decode(format!("unexpected network call to {}", request.path)))
            }
        }

        let service = MockService::new();
        service.start(Environment::Test, MockRouter::default());
        RpcClient::new(InterceptingTransport::new(service, Unreachable))
    }

    #[test]
    fn test_decode_envelope_error() {
        let response = RpcResponse {
            status: 404,
            body: json!({"error": {
                "message": "gone",
                "code": -32004,
                "data": {"code": "NOT_FOUND", "httpStatus": 404}
            }}),
        };
        let err = decode_envelope::<Value>(response).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "NOT_FOUND (404): gone");
    }

    #[test]
    fn test_decode_envelope_missing_data() {
        let response = RpcResponse { status: 200, body: json!({"result": {}}) };
        assert!(matches!(decode_envelope::<Value>(response), Err(ClientError::Decode(_))));
    }

    #[tokio::test]
    async fn test_typed_calls_against_mock() {
        let client = mock_client();

        let experience = client.experience_get_by_id("exp-1").await.unwrap();
        assert_eq!(experience.id, "exp-1");

        let err = client.experience_get_by_id("exp-999").await.unwrap_err();
        assert!(err.is_not_found());

        let err = client.experience_get_by_id("").await.unwrap_err();
        assert!(err.is_bad_request());

        let page = client.experience_list(&ExperienceFilter::page(2, 0)).await.unwrap();
        assert_eq!(page.experiences.len(), 2);
        assert_eq!(page.total, 6);
        assert!(page.has_more);

        let filter = ExperienceFilter::page(10, 0).with_status("active");
        let page = client.experience_list_by_brand("brand-2", &filter).await.unwrap();
        assert_eq!(page.total, 2);
        assert!(page.experiences.iter().all(|e| e.brand_id == "brand-2" && e.status == "active"));

        let health = client.health_check().await.unwrap();
        assert_eq!(health.status, "ok");
    }

    #[tokio::test]
    async fn test_booking_calls_against_mock() {
        let client = mock_client();
        let request = NewBooking {
            experience_id: "exp-2".to_string(),
            user_id: Some("user-1".to_string()),
            number_of_participants: 2,
            scheduled_visit_time: "2026-12-24T17:00:00Z".to_string(),
        };

        let first = client.booking_create(&request).await.unwrap();
        let second = client.booking_create(&request).await.unwrap();
        assert_eq!(first.status, BookingStatus::Confirmed);
        assert_ne!(first.id, second.id);

        let bookings = client.booking_list_by_user("user-1").await.unwrap();
        assert!(!bookings.is_empty());
        assert!(bookings.iter().all(|b| b.user_id.as_deref() == Some("user-1")));
    }
}
