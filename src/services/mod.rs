//! Services - page view-models built on the procedure client
//!
//! This module contains the logic pages consume:
//! - `experience_page` - detail page with before/after content tiers gated by access level
//! - `booking_flow` - booking form validation and submission
//! - `view_state` - loading/error/ready switch

pub mod booking_flow;
pub mod experience_page;
pub mod view_state;

// Re-export commonly used types
pub use booking_flow::{submit_booking, BookingForm, BookingFormError};
pub use experience_page::{load_experience_page, ContentTier, ExperiencePage, GatedAsset};
pub use view_state::ViewState;
