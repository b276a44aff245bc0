//! Booking submission
//!
//! The form is checked against the experience before any call is made; only a
//! valid form reaches `booking.create`.

use crate::client::{ClientError, RpcClient};
use crate::domain::{Booking, Experience, NewBooking};
use chrono::DateTime;
use thiserror::Error;
use tracing::info;

/// Status an experience must have to accept bookings
const BOOKABLE_STATUS: &str = "active";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingForm {
    pub participants: u32,
    /// RFC 3339 timestamp
    pub scheduled_visit_time: String,
    pub user_id: Option<String>,
}

#[derive(Debug, Error)]
pub enum BookingFormError {
    #[error("experience is not open for booking (status: {0})")]
    NotBookable(String),
    #[error("at least one participant is required")]
    NoParticipants,
    #[error("{requested} participants exceeds the limit of {max}")]
    TooManyParticipants { requested: u32, max: u32 },
    #[error("a visit time is required")]
    MissingVisitTime,
    #[error("visit time {0:?} is not a valid RFC 3339 timestamp")]
    InvalidVisitTime(String),
    #[error(transparent)]
    Client(#[from] ClientError),
}

impl BookingForm {
    /// Check the form and build the `booking.create` payload
    pub fn validate(&self, experience: &Experience) -> Result<NewBooking, BookingFormError> {
        if experience.status != BOOKABLE_STATUS {
            return Err(BookingFormError::NotBookable(experience.status.clone()));
        }
        if self.participants == 0 {
            return Err(BookingFormError::NoParticipants);
        }
        if self.participants > experience.max_participants {
            return Err(BookingFormError::TooManyParticipants {
                requested: self.participants,
                max: experience.max_participants,
            });
        }

        let visit_time = self.scheduled_visit_time.trim();
        if visit_time.is_empty() {
            return Err(BookingFormError::MissingVisitTime);
        }
        if DateTime::parse_from_rfc3339(visit_time).is_err() {
            return Err(BookingFormError::InvalidVisitTime(visit_time.to_string()));
        }

        Ok(NewBooking {
            experience_id: experience.id.clone(),
            user_id: self.user_id.clone(),
            number_of_participants: self.participants,
            scheduled_visit_time: visit_time.to_string(),
        })
    }
}

pub async fn submit_booking(
    client: &RpcClient,
    experience: &Experience,
    form: &BookingForm,
) -> Result<Booking, BookingFormError> {
    let request = form.validate(experience)?;
    let booking = client.booking_create(&request).await?;
    info!(
        booking_id = %booking.id,
        experience_id = %booking.experience_id,
        participants = %booking.number_of_participants,
        confirmation_code = %booking.confirmation_code,
        "booking_created"
    );
    Ok(booking)
}
