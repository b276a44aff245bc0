//! Canned records served by the mock router
//!
//! The built-in catalog has six experiences across two brands with mixed
//! status and type, so list filters and pagination have something to bite on.
//! A JSON file with the same shape can replace it.

use crate::domain::{
    AccessLevel, AssetKind, AssetPhase, Booking, BookingStatus, Experience, ExperienceAsset,
};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixtures {
    pub experiences: Vec<Experience>,
    /// Returned for every `booking.listByUser` call, re-owned to the caller
    #[serde(default)]
    pub bookings: Vec<Booking>,
}

impl Default for Fixtures {
    fn default() -> Self {
        Self { experiences: default_experiences(), bookings: default_bookings() }
    }
}

impl Fixtures {
    /// Load fixtures from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixtures file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse fixtures file {}", path.display()))
    }

    pub fn experience(&self, id: &str) -> Option<&Experience> {
        self.experiences.iter().find(|e| e.id == id)
    }
}

struct AssetSeed {
    phase: AssetPhase,
    kind: AssetKind,
    level: AccessLevel,
    category: &'static str,
    title: &'static str,
}

const fn seed(
    phase: AssetPhase,
    kind: AssetKind,
    level: AccessLevel,
    category: &'static str,
    title: &'static str,
) -> AssetSeed {
    AssetSeed { phase, kind, level, category, title }
}

fn assets(experience_id: &str, seeds: &[AssetSeed]) -> Vec<ExperienceAsset> {
    seeds
        .iter()
        .enumerate()
        .map(|(i, s)| ExperienceAsset {
            id: format!("{experience_id}-asset-{}", i + 1),
            experience_id: experience_id.to_string(),
            title: s.title.to_string(),
            description: None,
            phase: s.phase,
            category: s.category.to_string(),
            kind: s.kind,
            url: Some(format!("https://cdn.example.com/{experience_id}/{}", i + 1)),
            access_level: s.level,
            sort_order: i as i32,
        })
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn experience(
    id: &str,
    brand_id: &str,
    title: &str,
    description: &str,
    location: &str,
    duration_minutes: u32,
    max_participants: u32,
    price: f64,
    status: &str,
    experience_type: &str,
    highlights: Option<&str>,
    payment_methods: Option<&str>,
    asset_seeds: &[AssetSeed],
) -> Experience {
    Experience {
        id: id.to_string(),
        brand_id: brand_id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        location: location.to_string(),
        duration_minutes,
        max_participants,
        price,
        currency: "USD".to_string(),
        status: status.to_string(),
        experience_type: experience_type.to_string(),
        highlights: highlights.map(str::to_string),
        payment_methods: payment_methods.map(str::to_string),
        image_url: Some(format!("https://cdn.example.com/{id}/cover.jpg")),
        assets: assets(id, asset_seeds),
    }
}

fn default_experiences() -> Vec<Experience> {
    use AccessLevel::{Attended, Public, TicketHolder};
    use AssetKind::{Article, Audio, Download, Image, Video};
    use AssetPhase::{After, Before};

    vec![
        experience(
            "exp-1",
            "brand-1",
            "Neon Abyss VR",
            "A free-roam virtual reality dive through a flooded megacity.",
            "Downtown Arena, Hall B",
            45,
            6,
            39.0,
            "active",
            "vr",
            Some(r#"["Free-roam arena","Full-body haptics","Up to 6 players"]"#),
            Some(r#"["card","onsite"]"#),
            &[
                seed(Before, Video, Public, "preparation", "Trailer"),
                seed(Before, Article, TicketHolder, "preparation", "Safety briefing"),
                seed(Before, Download, TicketHolder, "preparation", "Waiver form"),
                seed(After, Image, Attended, "souvenir", "Your team photos"),
                seed(After, Video, Attended, "behind_the_scenes", "Making of Neon Abyss"),
            ],
        ),
        experience(
            "exp-2",
            "brand-1",
            "The Clockmaker's Vault",
            "Sixty minutes to crack a Victorian inventor's vault.",
            "Old Town, 12 Gear Street",
            60,
            5,
            28.5,
            "active",
            "escape_room",
            Some(r#"["60-minute challenge","Hint system"]"#),
            None,
            &[
                seed(Before, Article, Public, "preparation", "How escape rooms work"),
                seed(After, Download, Attended, "souvenir", "Solution walkthrough"),
            ],
        ),
        experience(
            "exp-3",
            "brand-1",
            "Midnight Masquerade",
            "An immersive theater evening in a 1920s mansion.",
            "Hollow Manor",
            120,
            40,
            65.0,
            "draft",
            "theater",
            Some("not-a-list"),
            Some(r#"["card"]"#),
            &[
                seed(Before, Audio, TicketHolder, "preparation", "Character briefing"),
                seed(After, Article, Attended, "behind_the_scenes", "Cast notes"),
            ],
        ),
        experience(
            "exp-4",
            "brand-2",
            "Orbital Drop",
            "A zero-gravity VR launch sequence with motion platforms.",
            "Skyport Mall, Level 3",
            30,
            4,
            24.0,
            "active",
            "vr",
            Some(r#"["Motion platform","Ages 10+"]"#),
            Some(r#"["card","voucher"]"#),
            &[
                seed(Before, Video, Public, "preparation", "Launch teaser"),
                seed(After, Video, Attended, "souvenir", "Your launch replay"),
            ],
        ),
        experience(
            "exp-5",
            "brand-2",
            "Whispers in the Archive",
            "Promenade theater through a library that remembers you.",
            "City Library Annex",
            90,
            25,
            48.0,
            "active",
            "theater",
            None,
            Some(r#"["onsite"]"#),
            &[
                seed(Before, Article, Public, "preparation", "Reading list"),
                seed(After, Audio, Attended, "souvenir", "Archive recordings"),
            ],
        ),
        experience(
            "exp-6",
            "brand-2",
            "Submarine Protocol",
            "Escape a sinking submarine before the air runs out.",
            "Harbor Warehouse 7",
            60,
            6,
            30.0,
            "archived",
            "escape_room",
            Some(r#"["Retired scenario"]"#),
            None,
            &[seed(Before, Image, Public, "preparation", "Floor plan")],
        ),
    ]
}

fn default_bookings() -> Vec<Booking> {
    vec![
        Booking {
            id: "booking-1".to_string(),
            experience_id: "exp-1".to_string(),
            user_id: None,
            number_of_participants: 2,
            scheduled_visit_time: "2026-11-14T18:00:00Z".to_string(),
            status: BookingStatus::Confirmed,
            confirmation_code: "EXP-4F2A9C01".to_string(),
            created_at: "2026-10-01T09:30:00Z".to_string(),
        },
        Booking {
            id: "booking-2".to_string(),
            experience_id: "exp-4".to_string(),
            user_id: None,
            number_of_participants: 4,
            scheduled_visit_time: "2026-09-20T15:30:00Z".to_string(),
            status: BookingStatus::Confirmed,
            confirmation_code: "EXP-77B0D3E5".to_string(),
            created_at: "2026-09-02T12:00:00Z".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_catalog_shape() {
        let fixtures = Fixtures::default();
        assert_eq!(fixtures.experiences.len(), 6);

        let ids: HashSet<_> = fixtures.experiences.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids.len(), 6, "experience ids must be unique");

        for e in &fixtures.experiences {
            assert!(e.assets.iter().all(|a| a.experience_id == e.id));
        }
    }

    #[test]
    fn test_catalog_covers_every_access_level() {
        let fixtures = Fixtures::default();
        let levels: HashSet<_> = fixtures
            .experiences
            .iter()
            .flat_map(|e| e.assets.iter().map(|a| a.access_level))
            .collect();
        assert!(levels.contains(&AccessLevel::Public));
        assert!(levels.contains(&AccessLevel::TicketHolder));
        assert!(levels.contains(&AccessLevel::Attended));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        let fixtures = Fixtures {
            experiences: Fixtures::default().experiences.into_iter().take(1).collect(),
            bookings: Vec::new(),
        };
        file.write_all(serde_json::to_string(&fixtures).unwrap().as_bytes()).unwrap();
        file.flush().unwrap();

        let loaded = Fixtures::from_file(file.path()).unwrap();
        assert_eq!(loaded, fixtures);
    }

    #[test]
    fn test_from_missing_file() {
        assert!(Fixtures::from_file("/nonexistent/fixtures.json").is_err());
    }
}
