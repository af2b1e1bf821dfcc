//! Level-up card selection

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::weapons::{Weapon, WeaponKind};

/// Fraction of max hp restored by the filler card
pub const RECOVER_HEAL_RATIO: f32 = 0.25;

/// One card on the level-up menu
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum UpgradeChoice {
    /// Level up a held weapon
    Upgrade { kind: WeaponKind },
    /// Add a weapon not yet held
    New { kind: WeaponKind },
    /// Filler when the pool runs dry
    Recover { heal_ratio: f32 },
}

impl UpgradeChoice {
    pub fn recover() -> Self {
        UpgradeChoice::Recover {
            heal_ratio: RECOVER_HEAL_RATIO,
        }
    }

    pub fn title(&self) -> String {
        match self {
            UpgradeChoice::Upgrade { kind } => format!("{} +1", kind.name()),
            UpgradeChoice::New { kind } => format!("New: {}", kind.name()),
            UpgradeChoice::Recover { .. } => "Recover".to_string(),
        }
    }

    /// Card body; upgrades describe the weapon at its next level
    pub fn description(&self, roster: &[Weapon]) -> String {
        match self {
            UpgradeChoice::Upgrade { kind } => roster
                .iter()
                .find(|w| w.kind() == *kind)
                .map(|held| {
                    let mut preview = held.clone();
                    preview.level_up();
                    preview.description()
                })
                .unwrap_or_else(|| kind.create().description()),
            UpgradeChoice::New { kind } => kind.create().description(),
            UpgradeChoice::Recover { heal_ratio } => {
                format!("Restore {}% of max HP.", (heal_ratio * 100.0).round())
            }
        }
    }
}

/// Draw up to `count` distinct cards from the eligible pool, backfilling with Recover
pub fn build_level_up_choices(roster: &[Weapon], rng: &mut impl Rng, count: usize) -> Vec<UpgradeChoice> {
    let mut pool: Vec<UpgradeChoice> = WeaponKind::ALL
        .into_iter()
        .filter_map(|kind| match roster.iter().find(|w| w.kind() == kind) {
            Some(held) if held.is_max_level() => None,
            Some(_) => Some(UpgradeChoice::Upgrade { kind }),
            None if kind.is_eligible(roster) => Some(UpgradeChoice::New { kind }),
            None => None,
        })
        .collect();

    let mut choices = Vec::with_capacity(count);
    while choices.len() < count && !pool.is_empty() {
        let index = rng.random_range(0..pool.len());
        choices.push(pool.swap_remove(index));
    }
    choices.resize(count, UpgradeChoice::recover());
    choices
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn maxed(kind: WeaponKind) -> Weapon {
        let mut weapon = kind.create();
        while !weapon.is_max_level() {
            weapon.level_up();
        }
        weapon
    }

    #[test]
    fn test_starting_roster_offers_three_distinct() {
        let roster = vec![WeaponKind::MagicWand.create()];
        let mut rng = Pcg32::seed_from_u64(7);
        let choices = build_level_up_choices(&roster, &mut rng, 3);
        assert_eq!(choices.len(), 3);
        for (i, a) in choices.iter().enumerate() {
            assert!(!matches!(a, UpgradeChoice::Recover { .. }));
            assert!(!matches!(a, UpgradeChoice::New { kind: WeaponKind::OrbitalResonance }));
            for b in &choices[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_backfill_with_recover() {
        // Everything maxed except two kinds, one of which is gated behind orbitals
        let mut roster: Vec<Weapon> = WeaponKind::ALL
            .into_iter()
            .filter(|k| !matches!(k, WeaponKind::Garlic | WeaponKind::Orbitals | WeaponKind::OrbitalResonance))
            .map(maxed)
            .collect();
        roster.push(WeaponKind::Garlic.create());
        roster.push(maxed(WeaponKind::Orbitals));

        let mut rng = Pcg32::seed_from_u64(1);
        let choices = build_level_up_choices(&roster, &mut rng, 3);
        assert_eq!(choices.len(), 3);
        assert!(choices.contains(&UpgradeChoice::Upgrade { kind: WeaponKind::Garlic }));
        assert!(choices.contains(&UpgradeChoice::New {
            kind: WeaponKind::OrbitalResonance
        }));
        assert!(choices.contains(&UpgradeChoice::recover()));
    }

    #[test]
    fn test_empty_pool_all_recover() {
        let roster: Vec<Weapon> = WeaponKind::ALL.into_iter().map(maxed).collect();
        let mut rng = Pcg32::seed_from_u64(3);
        let choices = build_level_up_choices(&roster, &mut rng, 4);
        assert_eq!(choices, vec![UpgradeChoice::recover(); 4]);
    }

    #[test]
    fn test_upgrade_description_previews_next_level() {
        let roster = vec![WeaponKind::Garlic.create()];
        let card = UpgradeChoice::Upgrade { kind: WeaponKind::Garlic };
        assert!(card.description(&roster).contains("Radius: 85"));
        assert_eq!(card.title(), "Garlic +1");
        assert_eq!(
            UpgradeChoice::recover().description(&roster),
            "Restore 25% of max HP."
        );
    }

    #[test]
    fn test_choice_serializes_tagged() {
        let json = serde_json::to_string(&UpgradeChoice::New {
            kind: WeaponKind::TailFuse,
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"new","kind":"tail-fuse"}"#);
    }
}
