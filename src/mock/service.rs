//! Process-wide switch that lets clients answer calls from the mock router
//!
//! Clients consult [`MockService::intercept`] before touching the network.
//! While started, calls on catalog paths are answered in-process; everything
//! else passes through to the real transport.

use crate::mock::error::ProcedureError;
use crate::mock::router::{MockRouter, ProcedureKind};
use parking_lot::RwLock;
use serde::Deserialize;
use serde_json::Value;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info};

/// Runtime environment the process is hosted in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl Environment {
    /// Whether in-process interception may be installed
    pub fn supports_interception(&self) -> bool {
        !matches!(self, Environment::Production)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Production => "production",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    /// Already running; the new router was discarded
    AlreadyStarted,
    /// The environment cannot host interception; nothing changed
    Unsupported,
}

/// Started/stopped switch around a shared router. Clones share state.
#[derive(Clone, Default)]
pub struct MockService {
    router: Arc<RwLock<Option<Arc<MockRouter>>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide instance
    pub fn global() -> &'static MockService {
        static GLOBAL: OnceLock<MockService> = OnceLock::new();
        GLOBAL.get_or_init(MockService::new)
    }

    pub fn start(&self, environment: Environment, router: MockRouter) -> StartOutcome {
        if !environment.supports_interception() {
            debug!(environment = %environment.as_str(), "mock_service_start_skipped");
            return StartOutcome::Unsupported;
        }

        let mut slot = self.router.write();
        if slot.is_some() {
            return StartOutcome::AlreadyStarted;
        }
        let procedures = router.procedures().count();
        *slot = Some(Arc::new(router));
        info!(
            environment = %environment.as_str(),
            procedures = %procedures,
            "mock_service_started"
        );
        StartOutcome::Started
    }

    /// Returns whether the service was running
    pub fn stop(&self) -> bool {
        let was_running = self.router.write().take().is_some();
        if was_running {
            info!("mock_service_stopped");
        }
        was_running
    }

    pub fn is_started(&self) -> bool {
        self.router.read().is_some()
    }

    /// Answer a call in-process. `None` means pass through: the service is
    /// stopped, the path is outside the catalog, or the kind does not match.
    pub fn intercept(
        &self,
        path: &str,
        kind: ProcedureKind,
        input: Option<Value>,
    ) -> Option<Result<Value, ProcedureError>> {
        let router = self.router.read().clone()?;
        let procedure = router.resolve(path)?;
        if procedure.kind != kind {
            return None;
        }
        debug!(path = %path, "mock_service_intercepted");
        Some(router.invoke(procedure, input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_start_stop_lifecycle() {
        let service = MockService::new();
        assert!(!service.is_started());

        assert_eq!(
            service.start(Environment::Development, MockRouter::default()),
            StartOutcome::Started
        );
        assert!(service.is_started());

        assert_eq!(
            service.start(Environment::Development, MockRouter::default()),
            StartOutcome::AlreadyStarted
        );
        assert!(service.is_started());

        assert!(service.stop());
        assert!(!service.is_started());
        assert!(!service.stop());
    }

    #[test]
    fn test_start_in_production_is_noop() {
        let service = MockService::new();
        assert_eq!(
            service.start(Environment::Production, MockRouter::default()),
            StartOutcome::Unsupported
        );
        assert!(!service.is_started());
        assert!(service.intercept("health.check", ProcedureKind::Query, None).is_none());
    }

    #[test]
    fn test_intercept_only_catalog_calls() {
        let service = MockService::new();
        assert!(service.intercept("health.check", ProcedureKind::Query, None).is_none());

        service.start(Environment::Test, MockRouter::default());
        let health =
            service.intercept("health.check", ProcedureKind::Query, None).unwrap().unwrap();
        assert_eq!(health["status"], "ok");

        assert!(service.intercept("payment.charge", ProcedureKind::Mutation, None).is_none());
        assert!(service
            .intercept("booking.create", ProcedureKind::Query, Some(json!({})))
            .is_none());
    }

    #[test]
    fn test_clones_share_state() {
        let service = MockService::new();
        let clone = service.clone();
        service.start(Environment::Development, MockRouter::default());
        assert!(clone.is_started());
        clone.stop();
        assert!(!service.is_started());
    }

    #[test]
    fn test_environment_from_toml_value() {
        #[derive(Deserialize)]
        struct Wrapper {
            environment: Environment,
        }
        let parsed: Wrapper = toml::from_str("environment = \"production\"").unwrap();
        assert_eq!(parsed.environment, Environment::Production);
    }
}
