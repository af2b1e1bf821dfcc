//! Weapon roster
//!
//! Every weapon kind is a small self-contained state machine implementing
//! [`WeaponBehavior`]. The closed [`Weapon`] enum is what the engine stores;
//! it dispatches to the behavior and owns the shared level ceiling.
//!
//! Weapons never touch segment hp directly. They call
//! [`World::damage_segment`], and react to the resulting events through the
//! optional hooks once the engine fans them out.

pub mod aura;
pub mod orbit;
pub mod projectile;
pub mod reactive;
pub mod strike;
pub mod zone;

use serde::{Deserialize, Serialize};

pub use aura::{Garlic, MagnetPulse};
pub use orbit::{OrbitalResonance, Orbitals};
pub use projectile::{MagicWand, Projectile, RicochetArc};
pub use reactive::{EmergencyShield, GreedPact, TimeDilationWard};
pub use strike::{Headhunter, TailFuse};
pub use zone::{BloodTrail, CorpseBloom, Zone};

use super::state::TimeDilation;
use super::world::{SegmentDamaged, SegmentDestroyed, World};
use crate::consts::{ATTACK_PENALTY_PER_KIND, MIN_ATTACK_SPEED, MIN_COOLDOWN_FRAMES};

/// Level ceiling shared by every weapon kind
pub const MAX_WEAPON_LEVEL: u32 = 8;

/// Cooldown multiplier for holding `kinds` distinct weapon kinds
pub fn attack_penalty_multiplier(kinds: usize) -> f32 {
    1.0 + kinds.saturating_sub(1) as f32 * ATTACK_PENALTY_PER_KIND
}

/// Attack speed after the diversity tax, floored at `MIN_ATTACK_SPEED`
pub fn effective_attack_speed(kinds: usize) -> f32 {
    (1.0 / attack_penalty_multiplier(kinds)).max(MIN_ATTACK_SPEED)
}

/// Per-tick values every weapon reads, computed once by the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    pub now_ms: f64,
    pub attack_speed: f32,
    /// Time-dilation cooldown multiplier (below 1 means faster attacks)
    pub attack_mul: f32,
    pub enemy_speed_mul: f32,
}

impl TickContext {
    pub fn new(now_ms: f64, weapon_kinds: usize, dilation: &TimeDilation) -> Self {
        Self {
            now_ms,
            attack_speed: effective_attack_speed(weapon_kinds),
            attack_mul: dilation.attack_mul,
            enemy_speed_mul: dilation.enemy_speed_mul,
        }
    }

    /// Base cooldown in ticks after the diversity tax and time dilation
    pub fn effective_cooldown(&self, base_frames: f32) -> i32 {
        let scaled = base_frames / self.attack_speed * self.attack_mul;
        scaled.max(MIN_COOLDOWN_FRAMES).round() as i32
    }
}

/// Weapon identity, independent of level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeaponKind {
    MagicWand,
    Garlic,
    Orbitals,
    Headhunter,
    TailFuse,
    BloodTrail,
    MagnetPulse,
    RicochetArc,
    OrbitalResonance,
    EmergencyShield,
    TimeDilation,
    GreedPact,
    CorpseBloom,
}

impl WeaponKind {
    /// Upgrade pool order
    pub const ALL: [WeaponKind; 13] = [
        WeaponKind::MagicWand,
        WeaponKind::Garlic,
        WeaponKind::Orbitals,
        WeaponKind::Headhunter,
        WeaponKind::TailFuse,
        WeaponKind::BloodTrail,
        WeaponKind::MagnetPulse,
        WeaponKind::RicochetArc,
        WeaponKind::OrbitalResonance,
        WeaponKind::EmergencyShield,
        WeaponKind::TimeDilation,
        WeaponKind::GreedPact,
        WeaponKind::CorpseBloom,
    ];

    /// The weapon every run starts with
    pub const STARTING: WeaponKind = WeaponKind::MagicWand;

    pub fn id(self) -> &'static str {
        match self {
            WeaponKind::MagicWand => "magic-wand",
            WeaponKind::Garlic => "garlic",
            WeaponKind::Orbitals => "orbitals",
            WeaponKind::Headhunter => "headhunter",
            WeaponKind::TailFuse => "tail-fuse",
            WeaponKind::BloodTrail => "blood-trail",
            WeaponKind::MagnetPulse => "magnet-pulse",
            WeaponKind::RicochetArc => "ricochet-arc",
            WeaponKind::OrbitalResonance => "orbital-resonance",
            WeaponKind::EmergencyShield => "emergency-shield",
            WeaponKind::TimeDilation => "time-dilation",
            WeaponKind::GreedPact => "greed-pact",
            WeaponKind::CorpseBloom => "corpse-bloom",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    pub fn name(self) -> &'static str {
        match self {
            WeaponKind::MagicWand => "Magic Wand",
            WeaponKind::Garlic => "Garlic",
            WeaponKind::Orbitals => "Orbitals",
            WeaponKind::Headhunter => "Headhunter",
            WeaponKind::TailFuse => "Tail Fuse",
            WeaponKind::BloodTrail => "Blood Trail",
            WeaponKind::MagnetPulse => "Magnet Pulse",
            WeaponKind::RicochetArc => "Ricochet Arc",
            WeaponKind::OrbitalResonance => "Orbital Resonance",
            WeaponKind::EmergencyShield => "Emergency Shield",
            WeaponKind::TimeDilation => "Time Dilation",
            WeaponKind::GreedPact => "Greed Pact",
            WeaponKind::CorpseBloom => "Corpse Bloom",
        }
    }

    pub fn tags(self) -> &'static [&'static str] {
        match self {
            WeaponKind::MagicWand | WeaponKind::RicochetArc => &["offense", "projectile"],
            WeaponKind::Garlic => &["offense", "aoe"],
            WeaponKind::Orbitals => &["offense", "orbit"],
            WeaponKind::Headhunter => &["offense", "burst"],
            WeaponKind::TailFuse => &["offense", "chain"],
            WeaponKind::BloodTrail | WeaponKind::CorpseBloom => &["offense", "zone"],
            WeaponKind::MagnetPulse => &["utility", "offense"],
            WeaponKind::OrbitalResonance => &["offense", "synergy"],
            WeaponKind::EmergencyShield => &["defense", "reactive"],
            WeaponKind::TimeDilation => &["control", "reactive"],
            WeaponKind::GreedPact => &["economy", "risk"],
        }
    }

    /// Weapon that must already be held before this kind is offered
    pub fn prerequisite(self) -> Option<WeaponKind> {
        match self {
            WeaponKind::OrbitalResonance => Some(WeaponKind::Orbitals),
            _ => None,
        }
    }

    /// Whether this kind may be offered as a new weapon
    pub fn is_eligible(self, roster: &[Weapon]) -> bool {
        self.prerequisite()
            .is_none_or(|required| roster.iter().any(|w| w.kind() == required))
    }

    /// Fresh level-1 instance
    pub fn create(self) -> Weapon {
        match self {
            WeaponKind::MagicWand => Weapon::MagicWand(MagicWand::default()),
            WeaponKind::Garlic => Weapon::Garlic(Garlic::default()),
            WeaponKind::Orbitals => Weapon::Orbitals(Orbitals::default()),
            WeaponKind::Headhunter => Weapon::Headhunter(Headhunter::default()),
            WeaponKind::TailFuse => Weapon::TailFuse(TailFuse::default()),
            WeaponKind::BloodTrail => Weapon::BloodTrail(BloodTrail::default()),
            WeaponKind::MagnetPulse => Weapon::MagnetPulse(MagnetPulse::default()),
            WeaponKind::RicochetArc => Weapon::RicochetArc(RicochetArc::default()),
            WeaponKind::OrbitalResonance => Weapon::OrbitalResonance(OrbitalResonance::default()),
            WeaponKind::EmergencyShield => Weapon::EmergencyShield(EmergencyShield::default()),
            WeaponKind::TimeDilation => Weapon::TimeDilation(TimeDilationWard::default()),
            WeaponKind::GreedPact => Weapon::GreedPact(GreedPact::default()),
            WeaponKind::CorpseBloom => Weapon::CorpseBloom(CorpseBloom::default()),
        }
    }
}

/// Shared weapon contract; hooks default to no-ops
pub trait WeaponBehavior {
    fn kind(&self) -> WeaponKind;

    fn level(&self) -> u32;

    /// Increment the level and apply this kind's stat growth
    ///
    /// Only called below `MAX_WEAPON_LEVEL`; the ceiling is enforced by [`Weapon::level_up`].
    fn advance_level(&mut self);

    /// One-line menu text for the current level
    fn description(&self) -> String;

    fn update(&mut self, _world: &mut World, _ctx: &TickContext) {}

    fn on_segment_damaged(&mut self, _world: &mut World, _ctx: &TickContext, _event: &SegmentDamaged) {}

    fn on_segment_destroyed(
        &mut self,
        _world: &mut World,
        _ctx: &TickContext,
        _event: &SegmentDestroyed,
    ) {
    }

    fn on_player_damaged(&mut self, _world: &mut World, _ctx: &TickContext, _amount: f32) {}

    /// Drop delayed actions (pending volleys) when the run pauses or ends
    fn cancel_scheduled(&mut self) {}
}

/// A weapon in the roster
#[derive(Debug, Clone)]
pub enum Weapon {
    MagicWand(MagicWand),
    Garlic(Garlic),
    Orbitals(Orbitals),
    Headhunter(Headhunter),
    TailFuse(TailFuse),
    BloodTrail(BloodTrail),
    MagnetPulse(MagnetPulse),
    RicochetArc(RicochetArc),
    OrbitalResonance(OrbitalResonance),
    EmergencyShield(EmergencyShield),
    TimeDilation(TimeDilationWard),
    GreedPact(GreedPact),
    CorpseBloom(CorpseBloom),
}

impl Weapon {
    fn behavior(&self) -> &dyn WeaponBehavior {
        match self {
            Weapon::MagicWand(w) => w,
            Weapon::Garlic(w) => w,
            Weapon::Orbitals(w) => w,
            Weapon::Headhunter(w) => w,
            Weapon::TailFuse(w) => w,
            Weapon::BloodTrail(w) => w,
            Weapon::MagnetPulse(w) => w,
            Weapon::RicochetArc(w) => w,
            Weapon::OrbitalResonance(w) => w,
            Weapon::EmergencyShield(w) => w,
            Weapon::TimeDilation(w) => w,
            Weapon::GreedPact(w) => w,
            Weapon::CorpseBloom(w) => w,
        }
    }

    fn behavior_mut(&mut self) -> &mut dyn WeaponBehavior {
        match self {
            Weapon::MagicWand(w) => w,
            Weapon::Garlic(w) => w,
            Weapon::Orbitals(w) => w,
            Weapon::Headhunter(w) => w,
            Weapon::TailFuse(w) => w,
            Weapon::BloodTrail(w) => w,
            Weapon::MagnetPulse(w) => w,
            Weapon::RicochetArc(w) => w,
            Weapon::OrbitalResonance(w) => w,
            Weapon::EmergencyShield(w) => w,
            Weapon::TimeDilation(w) => w,
            Weapon::GreedPact(w) => w,
            Weapon::CorpseBloom(w) => w,
        }
    }

    pub fn kind(&self) -> WeaponKind {
        self.behavior().kind()
    }

    pub fn id(&self) -> &'static str {
        self.kind().id()
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    pub fn level(&self) -> u32 {
        self.behavior().level()
    }

    pub fn max_level(&self) -> u32 {
        MAX_WEAPON_LEVEL
    }

    pub fn is_max_level(&self) -> bool {
        self.level() >= MAX_WEAPON_LEVEL
    }

    pub fn description(&self) -> String {
        self.behavior().description()
    }

    /// Raise the level by one; no-op at the ceiling
    pub fn level_up(&mut self) {
        if self.is_max_level() {
            return;
        }
        self.behavior_mut().advance_level();
    }

    pub fn update(&mut self, world: &mut World, ctx: &TickContext) {
        self.behavior_mut().update(world, ctx);
    }

    pub fn on_segment_damaged(&mut self, world: &mut World, ctx: &TickContext, event: &SegmentDamaged) {
        self.behavior_mut().on_segment_damaged(world, ctx, event);
    }

    pub fn on_segment_destroyed(
        &mut self,
        world: &mut World,
        ctx: &TickContext,
        event: &SegmentDestroyed,
    ) {
        self.behavior_mut().on_segment_destroyed(world, ctx, event);
    }

    pub fn on_player_damaged(&mut self, world: &mut World, ctx: &TickContext, amount: f32) {
        self.behavior_mut().on_player_damaged(world, ctx, amount);
    }

    pub fn cancel_scheduled(&mut self) {
        self.behavior_mut().cancel_scheduled();
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ids_unique_and_roundtrip() {
        for kind in WeaponKind::ALL {
            assert_eq!(WeaponKind::from_id(kind.id()), Some(kind));
            assert_eq!(kind.create().kind(), kind);
            assert_eq!(kind.create().level(), 1);
            assert!(!kind.create().description().is_empty());
        }
        assert_eq!(WeaponKind::from_id("bogus"), None);
    }

    #[test]
    fn test_serde_uses_ids() {
        let json = serde_json::to_string(&WeaponKind::OrbitalResonance).unwrap();
        assert_eq!(json, "\"orbital-resonance\"");
    }

    #[test]
    fn test_resonance_needs_orbitals() {
        let roster = vec![WeaponKind::MagicWand.create()];
        assert!(!WeaponKind::OrbitalResonance.is_eligible(&roster));
        assert!(WeaponKind::Garlic.is_eligible(&roster));
        let roster = vec![WeaponKind::Orbitals.create()];
        assert!(WeaponKind::OrbitalResonance.is_eligible(&roster));
    }

    #[test]
    fn test_penalty_values() {
        assert_eq!(attack_penalty_multiplier(0), 1.0);
        assert_eq!(attack_penalty_multiplier(1), 1.0);
        assert!((attack_penalty_multiplier(3) - 1.24).abs() < 1e-6);
        assert_eq!(effective_attack_speed(1), 1.0);
        assert_eq!(effective_attack_speed(1000), MIN_ATTACK_SPEED);
    }

    #[test]
    fn test_effective_cooldown() {
        let calm = TickContext::new(0.0, 1, &TimeDilation::default());
        assert_eq!(calm.effective_cooldown(60.0), 60);
        assert_eq!(calm.effective_cooldown(1.0), 3);

        let taxed = TickContext::new(0.0, 3, &TimeDilation::default());
        assert_eq!(taxed.effective_cooldown(60.0), (60.0f32 * 1.24).round() as i32);

        let dilation = TimeDilation {
            until_ms: 1000.0,
            enemy_speed_mul: 0.5,
            attack_mul: 0.75,
        };
        let slowed = TickContext::new(0.0, 1, &dilation);
        assert_eq!(slowed.effective_cooldown(60.0), 45);
        assert_eq!(slowed.enemy_speed_mul, 0.5);
    }

    proptest! {
        #[test]
        fn prop_attack_speed_monotonic(kinds in 0usize..200) {
            let a = effective_attack_speed(kinds);
            let b = effective_attack_speed(kinds + 1);
            prop_assert!(b <= a);
            prop_assert!(b >= MIN_ATTACK_SPEED);
        }

        #[test]
        fn prop_level_up_ceiling(pick in 0usize..13, extra in 0u32..20) {
            let mut weapon = WeaponKind::ALL[pick].create();
            for _ in 0..(MAX_WEAPON_LEVEL + extra) {
                weapon.level_up();
            }
            prop_assert_eq!(weapon.level(), MAX_WEAPON_LEVEL);
            let before = format!("{:?}", weapon);
            weapon.level_up();
            prop_assert_eq!(format!("{:?}", weapon), before);
        }
    }
}
