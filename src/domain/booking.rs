//! Booking records

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

/// A submitted booking. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub experience_id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    pub number_of_participants: u32,
    /// RFC 3339 timestamp
    pub scheduled_visit_time: String,
    pub status: BookingStatus,
    pub confirmation_code: String,
    pub created_at: String,
}

/// Payload for `booking.create`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub experience_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub number_of_participants: u32,
    pub scheduled_visit_time: String,
}
