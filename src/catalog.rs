use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

pub const PATTERN_SIZE: usize = 5;

/// 5×5 grid of CSS-style colour strings. Only the renderer reads it.
pub type Pattern = [[String; PATTERN_SIZE]; PATTERN_SIZE];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    #[default]
    Common,
    Rare,
    Legendary,
}

impl Rarity {
    pub const ALL: [Rarity; 3] = [Rarity::Common, Rarity::Rare, Rarity::Legendary];

    pub fn label(self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Rare => "rare",
            Rarity::Legendary => "legendary",
        }
    }

    pub fn icon(self) -> char {
        match self {
            Rarity::Common => '◉',
            Rarity::Rare => '♥',
            Rarity::Legendary => '★',
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A developed photo. Field names follow the persisted JSON layout, so a
/// missing field deserializes to its zero value instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RewardItem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub rarity: Rarity,
    #[serde(rename = "pixels")]
    pub pattern: Pattern,
}

/// Read-only table of reward items. Every rarity tier has at least one entry.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<RewardItem>,
}

impl Catalog {
    pub fn new(items: Vec<RewardItem>) -> Result<Self, CatalogError> {
        for rarity in Rarity::ALL {
            if !items.iter().any(|item| item.rarity == rarity) {
                return Err(CatalogError::EmptyTier(rarity));
            }
        }
        Ok(Self { items })
    }

    /// The six photos Miso can develop.
    pub fn builtin() -> &'static Catalog {
        static CATALOG: OnceLock<Catalog> = OnceLock::new();
        CATALOG.get_or_init(|| Catalog {
            items: builtin_items(),
        })
    }

    pub fn items(&self) -> &[RewardItem] {
        &self.items
    }

    /// Items of one tier in table order.
    pub fn items_by_rarity(&self, rarity: Rarity) -> Vec<&RewardItem> {
        self.items
            .iter()
            .filter(|item| item.rarity == rarity)
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&RewardItem> {
        self.items.iter().find(|item| item.id == id)
    }
}

fn pattern(rows: [[&str; PATTERN_SIZE]; PATTERN_SIZE]) -> Pattern {
    rows.map(|row| row.map(str::to_string))
}

fn item(
    id: &str,
    name: &str,
    description: &str,
    rarity: Rarity,
    rows: [[&str; PATTERN_SIZE]; PATTERN_SIZE],
) -> RewardItem {
    RewardItem {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        rarity,
        pattern: pattern(rows),
    }
}

fn builtin_items() -> Vec<RewardItem> {
    vec![
        item(
            "sunset",
            "Golden Hour",
            "A perfect sunset captured on film",
            Rarity::Common,
            [
                ["#ff6b35", "#ff6b35", "#ff8c42", "#ff8c42", "#ffa726"],
                ["#ff8c42", "#ffa726", "#ffb74d", "#ffcc80", "#ffe0b2"],
                ["#ffb74d", "#ffcc80", "#ffe0b2", "#fff3e0", "#fff8e1"],
                ["#333", "#333", "#444", "#444", "#555"],
                ["#222", "#222", "#333", "#333", "#444"],
            ],
        ),
        item(
            "coffee",
            "Morning Brew",
            "Steam rising from a perfect cup",
            Rarity::Common,
            [
                ["#3e2723", "#5d4037", "#6d4c41", "#5d4037", "#3e2723"],
                ["#5d4037", "#8d6e63", "#a1887f", "#8d6e63", "#5d4037"],
                ["#6d4c41", "#a1887f", "#bcaaa4", "#a1887f", "#6d4c41"],
                ["#444", "#666", "#888", "#666", "#444"],
                ["#222", "#333", "#444", "#333", "#222"],
            ],
        ),
        item(
            "cat",
            "Miso's Portrait",
            "A rare self-portrait by the artist",
            Rarity::Rare,
            [
                ["#ff6b35", "#ff6b35", "#ff8c42", "#ff6b35", "#ff6b35"],
                ["#ff6b35", "#000", "#ff8c42", "#000", "#ff6b35"],
                ["#ff8c42", "#ff8c42", "#000", "#ff8c42", "#ff8c42"],
                ["#ff8c42", "#000", "#000", "#000", "#ff8c42"],
                ["#ffa726", "#ffa726", "#ffa726", "#ffa726", "#ffa726"],
            ],
        ),
        item(
            "stars",
            "Night Sky",
            "Long exposure of the cosmos",
            Rarity::Rare,
            [
                ["#0d1421", "#1a237e", "#0d1421", "#fff", "#0d1421"],
                ["#1a237e", "#283593", "#3949ab", "#1a237e", "#fff"],
                ["#0d1421", "#3949ab", "#5c6bc0", "#3949ab", "#0d1421"],
                ["#fff", "#1a237e", "#3949ab", "#1a237e", "#0d1421"],
                ["#0d1421", "#0d1421", "#1a237e", "#0d1421", "#fff"],
            ],
        ),
        item(
            "rainbow",
            "Double Rainbow",
            "A legendary moment in time",
            Rarity::Legendary,
            [
                ["#e3f2fd", "#e3f2fd", "#e3f2fd", "#e3f2fd", "#e3f2fd"],
                ["#f44336", "#ff9800", "#ffeb3b", "#4caf50", "#2196f3"],
                ["#e91e63", "#ff5722", "#ffc107", "#8bc34a", "#3f51b5"],
                ["#333", "#444", "#555", "#444", "#333"],
                ["#222", "#333", "#444", "#333", "#222"],
            ],
        ),
        item(
            "heart",
            "Love Letter",
            "A message from the heart",
            Rarity::Legendary,
            [
                ["#ffebee", "#f44336", "#e91e63", "#f44336", "#ffebee"],
                ["#f44336", "#e91e63", "#ad1457", "#e91e63", "#f44336"],
                ["#e91e63", "#ad1457", "#880e4f", "#ad1457", "#e91e63"],
                ["#f44336", "#e91e63", "#ad1457", "#e91e63", "#f44336"],
                ["#ffebee", "#f44336", "#e91e63", "#f44336", "#ffebee"],
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_covers_every_tier() {
        let catalog = Catalog::builtin();
        for rarity in Rarity::ALL {
            assert!(
                !catalog.items_by_rarity(rarity).is_empty(),
                "tier {rarity} is empty"
            );
        }
        Catalog::new(catalog.items().to_vec()).expect("builtin catalog validates");
    }

    #[test]
    fn items_by_rarity_keeps_table_order() {
        let ids: Vec<&str> = Catalog::builtin()
            .items_by_rarity(Rarity::Rare)
            .iter()
            .map(|item| item.id.as_str())
            .collect();
        assert_eq!(ids, ["cat", "stars"]);
    }

    #[test]
    fn catalog_without_legendary_is_rejected() {
        let items: Vec<RewardItem> = Catalog::builtin()
            .items()
            .iter()
            .filter(|item| item.rarity != Rarity::Legendary)
            .cloned()
            .collect();
        let err = Catalog::new(items).unwrap_err();
        assert_eq!(err, CatalogError::EmptyTier(Rarity::Legendary));
    }

    #[test]
    fn item_json_uses_pixels_and_lowercase_rarity() {
        let item = Catalog::builtin().get("heart").unwrap();
        let json = serde_json::to_value(item).unwrap();
        assert_eq!(json["rarity"], "legendary");
        assert_eq!(json["pixels"][2][2], "#880e4f");
    }

    #[test]
    fn item_with_missing_fields_defaults() {
        let item: RewardItem = serde_json::from_str(r#"{"id":"sunset"}"#).unwrap();
        assert_eq!(item.id, "sunset");
        assert_eq!(item.rarity, Rarity::Common);
        assert!(item.pattern.iter().flatten().all(String::is_empty));
    }
}
