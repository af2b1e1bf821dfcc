//! Simulation module
//!
//! All gameplay logic lives here. This module stays free of rendering:
//! - Fixed timestep only
//! - Seeded RNG only (combat and cosmetic streams kept apart)
//! - Every point of segment damage goes through `World::damage_segment`

pub mod engine;
pub mod enemy;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod upgrades;
pub mod weapons;
pub mod world;

pub use engine::{ChoiceCard, Engine, Hook, HudSnapshot, WeaponSummary};
pub use enemy::{Segment, Snake};
pub use spawn::Spawner;
pub use state::{DamageNumber, GameMode, Gem, GemTier, Particle, Player, Rgba, TimeDilation};
pub use tick::{TickInput, tick};
pub use upgrades::{RECOVER_HEAL_RATIO, UpgradeChoice, build_level_up_choices};
pub use weapons::{MAX_WEAPON_LEVEL, TickContext, Weapon, WeaponBehavior, WeaponKind};
pub use world::{CombatEvent, DamageOutcome, SegmentDamaged, SegmentDestroyed, SegmentRef, World};
