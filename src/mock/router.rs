//! Dispatch table from procedure path to handler

use crate::mock::error::ProcedureError;
use crate::mock::fixtures::Fixtures;
use crate::mock::procedures::{
    self, BOOKING_CREATE, BOOKING_LIST_BY_USER, EXPERIENCE_GET_BY_ID, EXPERIENCE_LIST,
    EXPERIENCE_LIST_BY_BRAND, HEALTH_CHECK,
};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Query procedures are read-only and travel as GET, mutations as POST
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcedureKind {
    Query,
    Mutation,
}

pub type Handler = fn(&Fixtures, Option<Value>) -> Result<Value, ProcedureError>;

#[derive(Clone, Copy)]
pub struct Procedure {
    pub path: &'static str,
    pub kind: ProcedureKind,
    handler: Handler,
}

impl std::fmt::Debug for Procedure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Procedure").field("path", &self.path).field("kind", &self.kind).finish()
    }
}

/// Every procedure the mock backend answers
pub const CATALOG: &[Procedure] = &[
    Procedure {
        path: EXPERIENCE_GET_BY_ID,
        kind: ProcedureKind::Query,
        handler: procedures::experience_get_by_id,
    },
    Procedure {
        path: EXPERIENCE_LIST,
        kind: ProcedureKind::Query,
        handler: procedures::experience_list,
    },
    Procedure {
        path: EXPERIENCE_LIST_BY_BRAND,
        kind: ProcedureKind::Query,
        handler: procedures::experience_list_by_brand,
    },
    Procedure {
        path: BOOKING_CREATE,
        kind: ProcedureKind::Mutation,
        handler: procedures::booking_create,
    },
    Procedure {
        path: BOOKING_LIST_BY_USER,
        kind: ProcedureKind::Query,
        handler: procedures::booking_list_by_user,
    },
    Procedure { path: HEALTH_CHECK, kind: ProcedureKind::Query, handler: procedures::health_check },
];

/// Stand-in backend answering the procedure catalog from fixtures
pub struct MockRouter {
    fixtures: Fixtures,
    table: FxHashMap<&'static str, Procedure>,
}

impl Default for MockRouter {
    fn default() -> Self {
        Self::new(Fixtures::default())
    }
}

impl MockRouter {
    pub fn new(fixtures: Fixtures) -> Self {
        let table = CATALOG.iter().map(|p| (p.path, *p)).collect();
        Self { fixtures, table }
    }

    pub fn fixtures(&self) -> &Fixtures {
        &self.fixtures
    }

    /// Look up a catalog entry
    pub fn resolve(&self, path: &str) -> Option<Procedure> {
        self.table.get(path).copied()
    }

    pub fn invoke(
        &self,
        procedure: Procedure,
        input: Option<Value>,
    ) -> Result<Value, ProcedureError> {
        (procedure.handler)(&self.fixtures, input)
    }

    /// Run a procedure by path. `None` means the path is outside the catalog.
    pub fn call(&self, path: &str, input: Option<Value>) -> Option<Result<Value, ProcedureError>> {
        let procedure = self.resolve(path)?;
        Some(self.invoke(procedure, input))
    }

    /// Catalog entries in a stable order
    pub fn procedures(&self) -> impl Iterator<Item = &Procedure> {
        CATALOG.iter().filter(|p| self.table.contains_key(p.path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::error::ErrorCode;
    use serde_json::json;

    #[test]
    fn test_catalog_paths_unique() {
        let router = MockRouter::default();
        assert_eq!(router.table.len(), CATALOG.len());
        assert_eq!(router.procedures().count(), 6);
    }

    #[test]
    fn test_kinds() {
        let router = MockRouter::default();
        assert_eq!(router.resolve("booking.create").unwrap().kind, ProcedureKind::Mutation);
        assert_eq!(router.resolve("experience.list").unwrap().kind, ProcedureKind::Query);
    }

    #[test]
    fn test_unknown_path_passes_through() {
        let router = MockRouter::default();
        assert!(router.call("payment.charge", None).is_none());
        assert!(router.call("", None).is_none());
    }

    #[test]
    fn test_call_dispatches() {
        let router = MockRouter::default();
        let result = router.call("experience.getById", Some(json!("exp-1"))).unwrap().unwrap();
        assert_eq!(result["title"], "Neon Abyss VR");

        let err = router.call("experience.getById", None).unwrap().unwrap_err();
        assert_eq!(err.code, ErrorCode::BadRequest);
    }

    #[test]
    fn test_custom_fixtures() {
        let router = MockRouter::new(Fixtures { experiences: Vec::new(), bookings: Vec::new() });
        let page = router.call("experience.list", None).unwrap().unwrap();
        assert_eq!(page["total"], 0);
        assert_eq!(page["hasMore"], false);
    }
}
