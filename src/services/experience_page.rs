//! Experience detail page view-model
//!
//! Combines an experience record with the viewer's access level: list fields
//! are decoded, and assets are split into before/after tiers where each entry
//! is either unlocked or carries the label of the tier that unlocks it.
//! Locked entries never carry their content URL.

use crate::client::RpcClient;
use crate::domain::{can_access, AccessLevel, AssetPhase, Experience, ExperienceAsset};
use crate::services::view_state::ViewState;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct GatedAsset {
    pub asset: ExperienceAsset,
    pub unlocked: bool,
    /// "Available to Ticket Holders" style hint on locked entries
    pub lock_label: Option<String>,
}

impl GatedAsset {
    pub fn gate(mut asset: ExperienceAsset, viewer: AccessLevel) -> Self {
        if can_access(viewer, asset.access_level) {
            return Self { asset, unlocked: true, lock_label: None };
        }
        let lock_label = format!("Available to {}", asset.access_level.label());
        asset.url = None;
        Self { asset, unlocked: false, lock_label: Some(lock_label) }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContentTier {
    pub phase: AssetPhase,
    pub title: &'static str,
    pub assets: Vec<GatedAsset>,
}

impl ContentTier {
    fn build(phase: AssetPhase, assets: &[ExperienceAsset], viewer: AccessLevel) -> Self {
        let mut selected: Vec<&ExperienceAsset> =
            assets.iter().filter(|a| a.phase == phase).collect();
        selected.sort_by_key(|a| a.sort_order);
        Self {
            phase,
            title: phase.label(),
            assets: selected.into_iter().map(|a| GatedAsset::gate(a.clone(), viewer)).collect(),
        }
    }

    pub fn unlocked_count(&self) -> usize {
        self.assets.iter().filter(|a| a.unlocked).count()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExperiencePage {
    pub id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub duration_label: String,
    pub capacity_label: String,
    pub price_label: String,
    pub image_url: Option<String>,
    pub highlights: Vec<String>,
    pub payment_methods: Vec<String>,
    pub viewer: AccessLevel,
    pub before: ContentTier,
    pub after: ContentTier,
}

fn format_duration(minutes: u32) -> String {
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{m} min"),
        (h, 0) => format!("{h} h"),
        (h, m) => format!("{h} h {m} min"),
    }
}

impl ExperiencePage {
    pub fn build(experience: &Experience, viewer: AccessLevel) -> Self {
        Self {
            id: experience.id.clone(),
            title: experience.title.clone(),
            description: experience.description.clone(),
            location: experience.location.clone(),
            duration_label: format_duration(experience.duration_minutes),
            capacity_label: format!("Up to {} participants", experience.max_participants),
            price_label: format!("{} {:.2}", experience.currency, experience.price),
            image_url: experience.image_url.clone(),
            highlights: experience.highlight_list(),
            payment_methods: experience.payment_method_list(),
            viewer,
            before: ContentTier::build(AssetPhase::Before, &experience.assets, viewer),
            after: ContentTier::build(AssetPhase::After, &experience.assets, viewer),
        }
    }
}

/// Fetch and assemble a detail page. Failures become `ViewState::Error`.
pub async fn load_experience_page(
    client: &RpcClient,
    id: &str,
    viewer: AccessLevel,
) -> ViewState<ExperiencePage> {
    let result = client.experience_get_by_id(id).await;
    if let Err(e) = &result {
        warn!(experience_id = %id, error = %e, "experience_page_load_failed");
    }

    let state =
        ViewState::from_result(result).map(|experience| ExperiencePage::build(&experience, viewer));
    if let Some(page) = state.ready() {
        info!(
            experience_id = %id,
            viewer = %viewer,
            before_unlocked = %page.before.unlocked_count(),
            after_unlocked = %page.after.unlocked_count(),
            "experience_page_loaded"
        );
    }
    state
}
