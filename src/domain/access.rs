//! Access tiers and the visibility gate for experience content
//!
//! Tiers form a fixed total order: public < ticket_holder < attended.
//! A viewer unlocks an asset when their tier ranks at or above the asset's
//! required tier. Unrecognized tags fail closed on either side of the
//! comparison: an unknown viewer sees nothing gated, and content with an
//! unknown requirement is visible to nobody.

use serde::{Deserialize, Deserializer, Serialize};

/// Ordered permission tier gating asset visibility
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    #[default]
    Public,
    TicketHolder,
    Attended,
    /// Any tag outside the known set
    Unknown,
}

// Wire values go through `from_tag` so JSON and raw tags share one policy
impl<'de> Deserialize<'de> for AccessLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(AccessLevel::from_tag(&tag))
    }
}

impl AccessLevel {
    /// Parse a wire tag. Never fails; unrecognized tags map to `Unknown`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            "public" => AccessLevel::Public,
            "ticket_holder" => AccessLevel::TicketHolder,
            "attended" => AccessLevel::Attended,
            _ => AccessLevel::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Public => "public",
            AccessLevel::TicketHolder => "ticket_holder",
            AccessLevel::Attended => "attended",
            AccessLevel::Unknown => "unknown",
        }
    }

    /// Position in the tier order. `Unknown` ranks below every known tier.
    pub fn rank(&self) -> i8 {
        match self {
            AccessLevel::Public => 0,
            AccessLevel::TicketHolder => 1,
            AccessLevel::Attended => 2,
            AccessLevel::Unknown => -1,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, AccessLevel::Unknown)
    }

    /// Display label shown on locked content
    pub fn label(&self) -> &'static str {
        match self {
            AccessLevel::Public => "Public",
            AccessLevel::TicketHolder => "Ticket Holders",
            AccessLevel::Attended => "Attendees",
            AccessLevel::Unknown => "Restricted",
        }
    }
}

impl std::fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a viewer at `viewer` may see content requiring `required`
#[inline]
pub fn can_access(viewer: AccessLevel, required: AccessLevel) -> bool {
    if !viewer.is_known() || !required.is_known() {
        return false;
    }
    viewer.rank() >= required.rank()
}

/// Same decision as [`can_access`] over raw wire tags
pub fn can_access_tags(viewer: &str, required: &str) -> bool {
    can_access(AccessLevel::from_tag(viewer), AccessLevel::from_tag(required))
}
