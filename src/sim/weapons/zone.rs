//! Lingering damage zones left on the ground

use std::collections::VecDeque;

use glam::Vec2;

use super::{MAX_WEAPON_LEVEL, TickContext, WeaponBehavior, WeaponKind};
use crate::distance;
use crate::sim::world::{SegmentDestroyed, World};

const MAX_POOLS: usize = 24;
const MAX_BLOOMS: usize = 6;
/// Minimum per-tick displacement that counts as moving
const MOVE_THRESHOLD: f32 = 1.0;

/// A ground patch that damages segments inside it on an interval
#[derive(Debug, Clone)]
pub struct Zone {
    pub pos: Vec2,
    /// Ticks remaining
    pub life: i32,
    /// Ticks until the next damage pulse
    pub tick: i32,
}

impl Zone {
    fn new(pos: Vec2, life: i32) -> Self {
        Self { pos, life, tick: 0 }
    }
}

/// Age every zone, pulse the due ones, and drop the expired
fn tick_zones(
    zones: &mut VecDeque<Zone>,
    world: &mut World,
    radius: f32,
    damage: f32,
    pulse_reset: i32,
    source: WeaponKind,
) {
    zones.retain_mut(|zone| {
        zone.life -= 1;
        zone.tick -= 1;
        if zone.tick <= 0 {
            zone.tick = pulse_reset;
            for hit in world.segments_in_radius(zone.pos, radius) {
                world.damage_segment(hit.segment_id, damage, Some(source));
            }
        }
        zone.life > 0
    });
}

fn push_capped(zones: &mut VecDeque<Zone>, zone: Zone, cap: usize) {
    zones.push_back(zone);
    while zones.len() > cap {
        zones.pop_front();
    }
}

/// Toxic pools dropped while the player moves
#[derive(Debug, Clone)]
pub struct BloodTrail {
    pub level: u32,
    pub spawn_interval: f32,
    pub spawn_timer: i32,
    last_player_pos: Vec2,
    pub pools: VecDeque<Zone>,
}

impl Default for BloodTrail {
    fn default() -> Self {
        Self {
            level: 1,
            spawn_interval: 16.0,
            spawn_timer: 0,
            last_player_pos: Vec2::ZERO,
            pools: VecDeque::new(),
        }
    }
}

impl BloodTrail {
    pub fn pool_life(&self) -> i32 {
        120 + (self.level as i32 - 1) * 10
    }

    pub fn pool_radius(&self) -> f32 {
        28.0 + (self.level - 1) as f32 * 3.0
    }

    pub fn tick_damage(&self) -> f32 {
        4.0 + (self.level - 1) as f32
    }
}

impl WeaponBehavior for BloodTrail {
    fn kind(&self) -> WeaponKind {
        WeaponKind::BloodTrail
    }

    fn level(&self) -> u32 {
        self.level
    }

    fn advance_level(&mut self) {
        self.level = (self.level + 1).min(MAX_WEAPON_LEVEL);
        self.spawn_interval = (self.spawn_interval - 1.0).max(8.0);
    }

    fn description(&self) -> String {
        format!(
            "Moving leaves toxic pools. Radius: {}, Dmg: {}.",
            self.pool_radius(),
            self.tick_damage()
        )
    }

    fn update(&mut self, world: &mut World, ctx: &TickContext) {
        let player_pos = world.player.pos;
        let moved = distance(self.last_player_pos, player_pos) > MOVE_THRESHOLD;
        self.last_player_pos = player_pos;

        self.spawn_timer -= 1;
        if moved && self.spawn_timer <= 0 {
            self.spawn_timer = ctx.effective_cooldown(self.spawn_interval);
            let pool = Zone::new(player_pos, self.pool_life());
            push_capped(&mut self.pools, pool, MAX_POOLS);
        }

        let (radius, damage) = (self.pool_radius(), self.tick_damage());
        tick_zones(
            &mut self.pools,
            world,
            radius,
            damage,
            ctx.effective_cooldown(20.0),
            WeaponKind::BloodTrail,
        );
    }
}

/// Thorn patches sprouting where segments die
#[derive(Debug, Clone)]
pub struct CorpseBloom {
    pub level: u32,
    pub zones: VecDeque<Zone>,
}

impl Default for CorpseBloom {
    fn default() -> Self {
        Self {
            level: 1,
            zones: VecDeque::new(),
        }
    }
}

impl CorpseBloom {
    pub fn zone_life(&self) -> i32 {
        180 + (self.level as i32 - 1) * 20
    }

    pub fn zone_radius(&self) -> f32 {
        32.0 + (self.level - 1) as f32 * 3.0
    }

    pub fn zone_damage(&self) -> f32 {
        3.0 + (self.level - 1) as f32
    }
}

impl WeaponBehavior for CorpseBloom {
    fn kind(&self) -> WeaponKind {
        WeaponKind::CorpseBloom
    }

    fn level(&self) -> u32 {
        self.level
    }

    fn advance_level(&mut self) {
        self.level = (self.level + 1).min(MAX_WEAPON_LEVEL);
    }

    fn description(&self) -> String {
        format!(
            "Killed segments sprout thorns. Radius: {}, Dmg: {}.",
            self.zone_radius(),
            self.zone_damage()
        )
    }

    fn update(&mut self, world: &mut World, ctx: &TickContext) {
        let (radius, damage) = (self.zone_radius(), self.zone_damage());
        tick_zones(
            &mut self.zones,
            world,
            radius,
            damage,
            ctx.effective_cooldown(15.0),
            WeaponKind::CorpseBloom,
        );
    }

    fn on_segment_destroyed(&mut self, _world: &mut World, _ctx: &TickContext, event: &SegmentDestroyed) {
        let zone = Zone::new(event.pos, self.zone_life());
        push_capped(&mut self.zones, zone, MAX_BLOOMS);
    }
}
