use rand::Rng;

use crate::catalog::{Catalog, Rarity, RewardItem};
use crate::config::RarityThresholds;

/// Maps a uniform sample in `[0, 1)` to a tier, rarest first.
pub fn tier_for_roll(roll: f64, thresholds: &RarityThresholds) -> Rarity {
    if roll < thresholds.legendary {
        Rarity::Legendary
    } else if roll < thresholds.legendary + thresholds.rare {
        Rarity::Rare
    } else {
        Rarity::Common
    }
}

#[derive(Debug, Clone)]
pub struct WeightedDraw {
    catalog: Catalog,
    thresholds: RarityThresholds,
}

impl WeightedDraw {
    pub fn new(catalog: Catalog, thresholds: RarityThresholds) -> Self {
        Self {
            catalog,
            thresholds,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> RewardItem {
        let roll = rng.gen_range(0.0..1.0);
        let tier = tier_for_roll(roll, &self.thresholds);
        // `Catalog::new` guarantees every tier is populated.
        let items = self.catalog.items_by_rarity(tier);
        let idx = rng.gen_range(0..items.len());
        items[idx].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashMap;

    const SAMPLE_SIZE: usize = 100_000;
    const TOLERANCE: f64 = 0.01;

    fn default_draw() -> WeightedDraw {
        WeightedDraw::new(Catalog::builtin().clone(), RarityThresholds::default())
    }

    #[test]
    fn thresholds_are_half_open() {
        let t = RarityThresholds::default();
        assert_eq!(tier_for_roll(0.0, &t), Rarity::Legendary);
        assert_eq!(tier_for_roll(0.049_999, &t), Rarity::Legendary);
        assert_eq!(tier_for_roll(0.05, &t), Rarity::Rare);
        assert_eq!(tier_for_roll(0.249_999, &t), Rarity::Rare);
        assert_eq!(tier_for_roll(0.25, &t), Rarity::Common);
        assert_eq!(tier_for_roll(0.999_999, &t), Rarity::Common);
    }

    #[test]
    fn tier_frequencies_track_thresholds() {
        let draw = default_draw();
        let mut rng = StdRng::seed_from_u64(0xDA2C_2004);
        let mut counts: HashMap<Rarity, usize> = HashMap::new();
        for _ in 0..SAMPLE_SIZE {
            *counts.entry(draw.draw(&mut rng).rarity).or_default() += 1;
        }

        for (rarity, expected) in [
            (Rarity::Legendary, 0.05),
            (Rarity::Rare, 0.20),
            (Rarity::Common, 0.75),
        ] {
            let observed = counts[&rarity] as f64 / SAMPLE_SIZE as f64;
            assert!(
                (observed - expected).abs() <= TOLERANCE,
                "{rarity} drifted: observed {observed:.4}, expected {expected:.2}"
            );
        }
    }

    #[test]
    fn items_within_a_tier_are_uniform() {
        let draw = default_draw();
        let mut rng = StdRng::seed_from_u64(7);
        let mut counts: HashMap<String, usize> = HashMap::new();
        for _ in 0..SAMPLE_SIZE {
            let item = draw.draw(&mut rng);
            if item.rarity == Rarity::Common {
                *counts.entry(item.id).or_default() += 1;
            }
        }
        let sunset = counts["sunset"] as f64;
        let coffee = counts["coffee"] as f64;
        let share = sunset / (sunset + coffee);
        assert!((share - 0.5).abs() < 0.02, "common split drifted: {share:.4}");
    }

    #[test]
    fn custom_thresholds_can_force_a_tier() {
        let draw = WeightedDraw::new(
            Catalog::builtin().clone(),
            RarityThresholds {
                legendary: 1.0,
                rare: 0.0,
            },
        );
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            assert_eq!(draw.draw(&mut rng).rarity, Rarity::Legendary);
        }
    }
}
