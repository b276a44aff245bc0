//! Handlers for each catalog procedure
//!
//! Every handler is a pure function from fixtures and decoded input to a
//! payload or a `ProcedureError`. Only `booking.create` and `health.check`
//! read the clock.

use crate::domain::{
    Booking, BookingStatus, BrandExperienceFilter, ExperienceFilter, NewBooking,
};
use crate::mock::error::ProcedureError;
use crate::mock::fixtures::Fixtures;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

pub const EXPERIENCE_GET_BY_ID: &str = "experience.getById";
pub const EXPERIENCE_LIST: &str = "experience.list";
pub const EXPERIENCE_LIST_BY_BRAND: &str = "experience.listByBrand";
pub const BOOKING_CREATE: &str = "booking.create";
pub const BOOKING_LIST_BY_USER: &str = "booking.listByUser";
pub const HEALTH_CHECK: &str = "health.check";

fn to_payload<T: Serialize>(value: &T) -> Result<Value, ProcedureError> {
    serde_json::to_value(value)
        .map_err(|e| ProcedureError::internal(format!("Failed to encode response: {e}")))
}

fn decode<T: DeserializeOwned>(input: Value) -> Result<T, ProcedureError> {
    serde_json::from_value(input)
        .map_err(|e| ProcedureError::bad_request(format!("Invalid input: {e}")))
}

/// Accept either a bare string or an object carrying the string under `key`
fn string_input(input: Option<Value>, key: &str) -> Option<String> {
    let value = match input? {
        Value::Object(mut map) => map.remove(key)?,
        other => other,
    };
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        _ => None,
    }
}

pub fn experience_get_by_id(
    fixtures: &Fixtures,
    input: Option<Value>,
) -> Result<Value, ProcedureError> {
    let id = string_input(input, "id")
        .ok_or_else(|| ProcedureError::bad_request("Experience ID is required"))?;
    let experience = fixtures.experience(&id).ok_or_else(|| {
        ProcedureError::not_found(format!("Experience with ID \"{id}\" not found"))
    })?;
    to_payload(experience)
}

pub fn experience_list(fixtures: &Fixtures, input: Option<Value>) -> Result<Value, ProcedureError> {
    let filter: ExperienceFilter = match input {
        Some(value) => decode(value)?,
        None => ExperienceFilter::default(),
    };
    to_payload(&filter.apply(&fixtures.experiences))
}

pub fn experience_list_by_brand(
    fixtures: &Fixtures,
    input: Option<Value>,
) -> Result<Value, ProcedureError> {
    let input = input.ok_or_else(|| ProcedureError::bad_request("Brand ID is required"))?;
    let scoped: BrandExperienceFilter = decode(input)?;
    let brand_id = scoped.brand_id.as_str();
    let list = scoped.filter.apply(fixtures.experiences.iter().filter(|e| e.brand_id == brand_id));
    to_payload(&list)
}

/// Uppercase hex tail of a UUIDv7; the tail is the random part
fn confirmation_code(id: &Uuid) -> String {
    let hex = id.simple().to_string();
    format!("EXP-{}", hex[hex.len() - 8..].to_uppercase())
}

pub fn booking_create(_fixtures: &Fixtures, input: Option<Value>) -> Result<Value, ProcedureError> {
    let input = input.ok_or_else(|| ProcedureError::bad_request("Booking details are required"))?;
    let request: NewBooking = decode(input)?;

    let id = Uuid::now_v7();
    let booking = Booking {
        id: id.to_string(),
        experience_id: request.experience_id,
        user_id: request.user_id,
        number_of_participants: request.number_of_participants,
        scheduled_visit_time: request.scheduled_visit_time,
        status: BookingStatus::Confirmed,
        confirmation_code: confirmation_code(&id),
        created_at: chrono::Utc::now().to_rfc3339(),
    };
    to_payload(&booking)
}

pub fn booking_list_by_user(
    fixtures: &Fixtures,
    input: Option<Value>,
) -> Result<Value, ProcedureError> {
    let user_id = string_input(input, "userId")
        .ok_or_else(|| ProcedureError::bad_request("User ID is required"))?;
    let bookings: Vec<Booking> = fixtures
        .bookings
        .iter()
        .map(|b| Booking { user_id: Some(user_id.clone()), ..b.clone() })
        .collect();
    to_payload(&bookings)
}

pub fn health_check(_fixtures: &Fixtures, _input: Option<Value>) -> Result<Value, ProcedureError> {
    Ok(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "message": "Mock API is running",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Experience, ExperienceList};
    use crate::mock::error::ErrorCode;
    use std::collections::HashSet;

    fn list(value: Value) -> ExperienceList {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_get_by_id_known() {
        let fixtures = Fixtures::default();
        let value = experience_get_by_id(&fixtures, Some(json!("exp-2"))).unwrap();
        let experience: Experience = serde_json::from_value(value).unwrap();
        assert_eq!(&experience, fixtures.experience("exp-2").unwrap());
    }

    #[test]
    fn test_get_by_id_object_input() {
        let fixtures = Fixtures::default();
        let value = experience_get_by_id(&fixtures, Some(json!({"id": "exp-5"}))).unwrap();
        assert_eq!(value["id"], "exp-5");
    }

    #[test]
    fn test_get_by_id_unknown_is_not_found() {
        let err = experience_get_by_id(&Fixtures::default(), Some(json!("exp-404"))).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.code.http_status(), 404);
    }

    #[test]
    fn test_get_by_id_missing_is_bad_request() {
        let fixtures = Fixtures::default();
        for input in [None, Some(json!("")), Some(json!({})), Some(json!(42))] {
            let err = experience_get_by_id(&fixtures, input.clone()).unwrap_err();
            assert_eq!(err.code, ErrorCode::BadRequest, "input={input:?}");
        }
    }

    #[test]
    fn test_list_first_page() {
        let input = json!({"limit": 2, "offset": 0});
        let page = list(experience_list(&Fixtures::default(), Some(input)).unwrap());
        assert_eq!(page.experiences.len(), 2);
        assert_eq!(page.total, 6);
        assert!(page.has_more);
    }

    #[test]
    fn test_list_tail_page() {
        let input = json!({"limit": 10, "offset": 4});
        let page = list(experience_list(&Fixtures::default(), Some(input)).unwrap());
        assert_eq!(page.experiences.len(), 2);
        assert_eq!(page.total, 6);
        assert!(!page.has_more);
    }

    #[test]
    fn test_list_without_input_uses_defaults() {
        let page = list(experience_list(&Fixtures::default(), None).unwrap());
        assert_eq!(page.experiences.len(), 6);
        assert!(!page.has_more);
    }

    #[test]
    fn test_list_filters() {
        let page = list(
            experience_list(
                &Fixtures::default(),
                Some(json!({"limit": 10, "offset": 0, "status": "active", "experienceType": "vr"})),
            )
            .unwrap(),
        );
        assert_eq!(page.total, 2);
        assert!(page.experiences.iter().all(|e| e.status == "active" && e.experience_type == "vr"));
    }

    #[test]
    fn test_list_rejects_malformed_input() {
        let err = experience_list(&Fixtures::default(), Some(json!({"limit": "two"}))).unwrap_err();
        assert_eq!(err.code, ErrorCode::BadRequest);
    }

    #[test]
    fn test_list_by_brand_composes_filters() {
        let fixtures = Fixtures::default();
        let page = list(
            experience_list_by_brand(
                &fixtures,
                Some(json!({"brandId": "brand-1", "status": "active", "limit": 1, "offset": 0})),
            )
            .unwrap(),
        );
        // brand-1 has exp-1 and exp-2 active, exp-3 draft
        assert_eq!(page.total, 2);
        assert!(page.has_more);
        assert_eq!(page.experiences.len(), 1);
        assert_eq!(page.experiences[0].brand_id, "brand-1");
        assert_eq!(page.experiences[0].status, "active");
    }

    #[test]
    fn test_list_by_brand_requires_brand() {
        let fixtures = Fixtures::default();
        let err = experience_list_by_brand(&fixtures, None).unwrap_err();
        assert_eq!(err.code, ErrorCode::BadRequest);
        assert_eq!(
            experience_list_by_brand(&fixtures, Some(json!({"limit": 5}))).unwrap_err().code,
            ErrorCode::BadRequest
        );
    }

    #[test]
    fn test_booking_create_confirms_with_unique_ids() {
        let fixtures = Fixtures::default();
        let input = json!({
            "experienceId": "exp-1",
            "numberOfParticipants": 3,
            "scheduledVisitTime": "2026-12-01T19:00:00Z",
            "status": "pending"
        });

        let mut ids = HashSet::new();
        for _ in 0..50 {
            let value = booking_create(&fixtures, Some(input.clone())).unwrap();
            let booking: Booking = serde_json::from_value(value).unwrap();
            assert_eq!(booking.status, BookingStatus::Confirmed);
            assert_eq!(booking.experience_id, "exp-1");
            assert_eq!(booking.number_of_participants, 3);
            assert!(booking.confirmation_code.starts_with("EXP-"));
            assert_eq!(booking.confirmation_code.len(), 12);
            assert!(ids.insert(booking.id), "booking ids must not repeat");
        }
    }

    #[test]
    fn test_booking_create_requires_fields() {
        let fixtures = Fixtures::default();
        assert_eq!(booking_create(&fixtures, None).unwrap_err().code, ErrorCode::BadRequest);
        let err = booking_create(&fixtures, Some(json!({"experienceId": "exp-1"}))).unwrap_err();
        assert_eq!(err.code, ErrorCode::BadRequest);
    }

    #[test]
    fn test_booking_list_by_user() {
        let fixtures = Fixtures::default();
        let bookings: Vec<Booking> = serde_json::from_value(
            booking_list_by_user(&fixtures, Some(json!("user-7"))).unwrap(),
        )
        .unwrap();
        assert_eq!(bookings.len(), fixtures.bookings.len());
        assert!(bookings.iter().all(|b| b.user_id.as_deref() == Some("user-7")));

        let err = booking_list_by_user(&fixtures, None).unwrap_err();
        assert_eq!(err.code, ErrorCode::BadRequest);
    }

    #[test]
    fn test_health_check() {
        let value = health_check(&Fixtures::default(), None).unwrap();
        assert_eq!(value["status"], "ok");
        assert!(value["timestamp"].as_str().is_some());
        assert!(value["message"].as_str().is_some());
    }
}
