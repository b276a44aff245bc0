//! Experience records and their attached content assets

use crate::domain::access::AccessLevel;
use crate::domain::list_field::{parse_highlights, parse_payment_methods};
use serde::{Deserialize, Serialize};

/// Timing phase an asset belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetPhase {
    Before,
    After,
}

impl AssetPhase {
    pub fn label(&self) -> &'static str {
        match self {
            AssetPhase::Before => "Before your visit",
            AssetPhase::After => "After your visit",
        }
    }
}

/// Content kind of an asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Video,
    Article,
    Image,
    Download,
    Audio,
    #[serde(other)]
    Other,
}

impl AssetKind {
    pub fn label(&self) -> &'static str {
        match self {
            AssetKind::Video => "Video",
            AssetKind::Article => "Article",
            AssetKind::Image => "Gallery",
            AssetKind::Download => "Download",
            AssetKind::Audio => "Audio",
            AssetKind::Other => "Content",
        }
    }
}

/// A content item attached to an experience
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceAsset {
    pub id: String,
    pub experience_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub phase: AssetPhase,
    /// Free-form grouping, e.g. "preparation" or "behind_the_scenes"
    pub category: String,
    #[serde(rename = "assetType")]
    pub kind: AssetKind,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub access_level: AccessLevel,
    #[serde(default)]
    pub sort_order: i32,
}

/// A bookable bundle of event content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub id: String,
    pub brand_id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub duration_minutes: u32,
    pub max_participants: u32,
    pub price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub status: String,
    pub experience_type: String,
    /// JSON-encoded list of strings
    #[serde(default)]
    pub highlights: Option<String>,
    /// JSON-encoded list of strings
    #[serde(default)]
    pub payment_methods: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub assets: Vec<ExperienceAsset>,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl Experience {
    pub fn highlight_list(&self) -> Vec<String> {
        parse_highlights(self.highlights.as_deref())
    }

    pub fn payment_method_list(&self) -> Vec<String> {
        parse_payment_methods(self.payment_methods.as_deref())
    }
}

/// Page size used when a list call carries no input
pub const DEFAULT_PAGE_LIMIT: usize = 10;

fn default_page_limit() -> usize {
    DEFAULT_PAGE_LIMIT
}

/// Optional equality filters plus a `[offset, offset + limit)` window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceFilter {
    #[serde(default = "default_page_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_type: Option<String>,
}

impl Default for ExperienceFilter {
    fn default() -> Self {
        Self { limit: DEFAULT_PAGE_LIMIT, offset: 0, status: None, experience_type: None }
    }
}

impl ExperienceFilter {
    pub fn page(limit: usize, offset: usize) -> Self {
        Self { limit, offset, ..Default::default() }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_type(mut self, experience_type: impl Into<String>) -> Self {
        self.experience_type = Some(experience_type.into());
        self
    }

    /// True when every set filter equals the record's field
    pub fn matches(&self, experience: &Experience) -> bool {
        self.status.as_deref().map_or(true, |s| experience.status == s)
            && self.experience_type.as_deref().map_or(true, |t| experience.experience_type == t)
    }

    /// Filter first, then slice. `has_more` is set iff `offset + limit < total`.
    pub fn apply<'a, I>(&self, experiences: I) -> ExperienceList
    where
        I: IntoIterator<Item = &'a Experience>,
    {
        let matched: Vec<&Experience> =
            experiences.into_iter().filter(|e| self.matches(e)).collect();
        let total = matched.len();
        let end = self.offset.saturating_add(self.limit);
        let page = matched.into_iter().skip(self.offset).take(self.limit).cloned().collect();
        ExperienceList { experiences: page, total, has_more: end < total }
    }
}

/// Brand-scoped variant of [`ExperienceFilter`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandExperienceFilter {
    pub brand_id: String,
    #[serde(flatten)]
    pub filter: ExperienceFilter,
}

/// One page of a filtered experience listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceList {
    pub experiences: Vec<Experience>,
    pub total: usize,
    pub has_more: bool,
}
