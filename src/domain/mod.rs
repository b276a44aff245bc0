//! Domain models - experiences, assets, bookings, and access gating
//!
//! This module contains the canonical data types used throughout the system:
//! - `Experience` - a bookable bundle of event content
//! - `ExperienceAsset` - content attached to an experience, gated by `AccessLevel`
//! - `Booking` - a submitted reservation
//! - `access` - the tier order and visibility decision
//! - `list_field` - parse-on-read for JSON-encoded list fields

pub mod access;
pub mod booking;
pub mod experience;
pub mod list_field;

// Re-export commonly used types at module level
pub use access::{can_access, can_access_tags, AccessLevel};
pub use booking::{Booking, BookingStatus, NewBooking};
pub use experience::{
    AssetKind, AssetPhase, BrandExperienceFilter, Experience, ExperienceAsset, ExperienceFilter,
    ExperienceList,
};
