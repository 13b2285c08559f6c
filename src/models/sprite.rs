use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A gacha catalog entry. `sprite_summon_chance` is a relative weight, not
/// a normalized probability: draws are taken against the catalog total.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Sprite {
    pub sprite_uuid: Uuid,
    pub sprite_source: String,
    pub sprite_summon_chance: f64,
}

/// Records that a user owns one copy of a sprite.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct SpriteInstance {
    pub sprite_instance_uuid: Uuid,
    pub acquisition_date: NaiveDate,
    pub sprite_uuid: Uuid,
    pub user_uuid: Uuid,
}

impl SpriteInstance {
    pub fn new(sprite_uuid: Uuid, user_uuid: Uuid) -> Self {
        Self {
            sprite_instance_uuid: Uuid::new_v4(),
            acquisition_date: Utc::now().date_naive(),
            sprite_uuid,
            user_uuid,
        }
    }
}

/// An owned sprite joined with its catalog entry, as listed to the client.
#[derive(Debug, Serialize, FromRow)]
pub struct OwnedSprite {
    pub sprite_instance_uuid: Uuid,
    pub acquisition_date: NaiveDate,
    pub sprite_uuid: Uuid,
    pub sprite_source: String,
    pub sprite_summon_chance: f64,
}

/// Sum of catalog weights; the roll space for one draw.
pub fn total_weight(catalog: &[Sprite]) -> f64 {
    catalog.iter().map(|sprite| sprite.sprite_summon_chance).sum()
}

/// Picks the catalog entry whose cumulative weight bracket contains `roll`.
/// `roll` must lie in `[0, total_weight)`; rounding at the top of the range
/// resolves to the last entry. Returns `None` only for an empty catalog.
pub fn draw_sprite(catalog: &[Sprite], roll: f64) -> Option<&Sprite> {
    let mut cursor = 0.0;
    for sprite in catalog {
        cursor += sprite.sprite_summon_chance;
        if roll < cursor {
            return Some(sprite);
        }
    }
    catalog.last()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Sprite> {
        ["common.png", "uncommon.png", "rare.png"]
            .iter()
            .zip([70.0, 25.0, 5.0])
            .map(|(source, chance)| Sprite {
                sprite_uuid: Uuid::new_v4(),
                sprite_source: source.to_string(),
                sprite_summon_chance: chance,
            })
            .collect()
    }

    #[test]
    fn test_total_weight() {
        assert_eq!(total_weight(&catalog()), 100.0);
        assert_eq!(total_weight(&[]), 0.0);
    }

    #[test]
    fn test_draw_lands_in_weight_brackets() {
        let catalog = catalog();
        assert_eq!(draw_sprite(&catalog, 0.0).unwrap().sprite_source, "common.png");
        assert_eq!(draw_sprite(&catalog, 69.9).unwrap().sprite_source, "common.png");
        assert_eq!(draw_sprite(&catalog, 70.0).unwrap().sprite_source, "uncommon.png");
        assert_eq!(draw_sprite(&catalog, 94.9).unwrap().sprite_source, "uncommon.png");
        assert_eq!(draw_sprite(&catalog, 95.0).unwrap().sprite_source, "rare.png");
    }

    #[test]
    fn test_draw_at_top_of_range_resolves_to_last_entry() {
        let catalog = catalog();
        assert_eq!(
            draw_sprite(&catalog, 100.0).unwrap().sprite_source,
            "rare.png"
        );
    }

    #[test]
    fn test_draw_from_empty_catalog() {
        assert!(draw_sprite(&[], 0.5).is_none());
    }

    #[test]
    fn test_instance_records_owner_and_sprite() {
        let sprite_uuid = Uuid::new_v4();
        let user_uuid = Uuid::new_v4();
        let instance = SpriteInstance::new(sprite_uuid, user_uuid);
        assert_eq!(instance.sprite_uuid, sprite_uuid);
        assert_eq!(instance.user_uuid, user_uuid);
    }
}
