//! Projectile weapons: the staggered Magic Wand volley and the bouncing Ricochet Arc

use std::collections::VecDeque;

use glam::Vec2;

use super::{MAX_WEAPON_LEVEL, TickContext, WeaponBehavior, WeaponKind};
use crate::direction_to;
use crate::sim::world::World;

/// Extra reach added to a segment radius for projectile contact
pub const PROJECTILE_HIT_PADDING: f32 = 5.0;

const WAND_RANGE: f32 = 420.0;
const WAND_SPEED: f32 = 8.0;
const WAND_LIFE: i32 = 100;
/// Gap between launches within one volley
pub const WAND_VOLLEY_GAP_MS: f64 = 120.0;

const ARC_RANGE: f32 = 600.0;
const ARC_BOUNCE_RANGE: f32 = 320.0;
const ARC_SPEED: f32 = 9.0;
const ARC_LIFE: i32 = 120;

/// A moving shot
#[derive(Debug, Clone)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Ticks remaining
    pub life: i32,
    pub bounces_left: u32,
    /// Segment struck last; ignored for contact until the next bounce lands
    pub last_hit: Option<u32>,
}

impl Projectile {
    fn aimed(from: Vec2, to: Vec2, speed: f32, life: i32, bounces: u32) -> Self {
        Self {
            pos: from,
            vel: direction_to(from, to) * speed,
            life,
            bounces_left: bounces,
            last_hit: None,
        }
    }

    fn advance(&mut self) {
        self.pos += self.vel;
        self.life -= 1;
    }
}

/// Starting weapon: fires a volley of homing-at-launch bolts
#[derive(Debug, Clone)]
pub struct MagicWand {
    pub level: u32,
    pub cooldown: f32,
    pub timer: i32,
    pub damage: f32,
    pub projectiles: Vec<Projectile>,
    /// Clock times of launches still owed by the current volley
    pub pending: VecDeque<f64>,
}

impl Default for MagicWand {
    fn default() -> Self {
        Self {
            level: 1,
            cooldown: 60.0,
            timer: 0,
            damage: 10.0,
            projectiles: Vec::new(),
            pending: VecDeque::new(),
        }
    }
}

impl MagicWand {
    pub fn volley_size(&self) -> u32 {
        1 + self.level / 3
    }

    fn fire(&mut self, world: &World, now_ms: f64) {
        if world
            .nearest_segment(world.player.pos, WAND_RANGE, false, None)
            .is_none()
        {
            return;
        }
        for i in 0..self.volley_size() {
            self.pending.push_back(now_ms + f64::from(i) * WAND_VOLLEY_GAP_MS);
        }
    }

    /// Launch every due shot, re-aiming each; skipped when nothing is in range
    fn launch_due(&mut self, world: &World, now_ms: f64) {
        while self.pending.front().is_some_and(|&at| at <= now_ms) {
            self.pending.pop_front();
            let origin = world.player.pos;
            if let Some(target) = world.nearest_segment(origin, WAND_RANGE, false, None) {
                self.projectiles
                    .push(Projectile::aimed(origin, target.pos, WAND_SPEED, WAND_LIFE, 0));
            }
        }
    }
}

impl WeaponBehavior for MagicWand {
    fn kind(&self) -> WeaponKind {
        WeaponKind::MagicWand
    }

    fn level(&self) -> u32 {
        self.level
    }

    fn advance_level(&mut self) {
        self.level = (self.level + 1).min(MAX_WEAPON_LEVEL);
        self.damage += 5.0;
        self.cooldown = (self.cooldown - 5.0).max(15.0);
    }

    fn description(&self) -> String {
        format!("Fires {} projectile(s). Dmg: {}", self.volley_size(), self.damage)
    }

    fn update(&mut self, world: &mut World, ctx: &TickContext) {
        self.timer -= 1;
        if self.timer <= 0 {
            self.timer = ctx.effective_cooldown(self.cooldown);
            self.fire(world, ctx.now_ms);
        }
        self.launch_due(world, ctx.now_ms);

        let damage = self.damage;
        self.projectiles.retain_mut(|shot| {
            shot.advance();
            if let Some(hit) = world.first_contact(shot.pos, PROJECTILE_HIT_PADDING, None) {
                world.damage_segment(hit.segment_id, damage, Some(WeaponKind::MagicWand));
                return false;
            }
            shot.life > 0
        });
    }

    fn cancel_scheduled(&mut self) {
        self.pending.clear();
    }
}

/// Bouncing shot that chains between nearby segments
#[derive(Debug, Clone)]
pub struct RicochetArc {
    pub level: u32,
    pub cooldown: f32,
    pub timer: i32,
    pub damage: f32,
    pub projectiles: Vec<Projectile>,
}

impl Default for RicochetArc {
    fn default() -> Self {
        Self {
            level: 1,
            cooldown: 90.0,
            timer: 0,
            damage: 14.0,
            projectiles: Vec::new(),
        }
    }
}

impl RicochetArc {
    pub fn bounces(&self) -> u32 {
        1 + self.level / 2
    }
}

impl WeaponBehavior for RicochetArc {
    fn kind(&self) -> WeaponKind {
        WeaponKind::RicochetArc
    }

    fn level(&self) -> u32 {
        self.level
    }

    fn advance_level(&mut self) {
        self.level = (self.level + 1).min(MAX_WEAPON_LEVEL);
        self.damage += 4.0;
        self.cooldown = (self.cooldown - 5.0).max(40.0);
    }

    fn description(&self) -> String {
        format!("Arc shot with {} bounce(s). Dmg: {}", self.bounces(), self.damage)
    }

    fn update(&mut self, world: &mut World, ctx: &TickContext) {
        self.timer -= 1;
        if self.timer <= 0 {
            self.timer = ctx.effective_cooldown(self.cooldown);
            let origin = world.player.pos;
            if let Some(target) = world.nearest_segment(origin, ARC_RANGE, false, None) {
                self.projectiles.push(Projectile::aimed(
                    origin,
                    target.pos,
                    ARC_SPEED,
                    ARC_LIFE,
                    self.bounces(),
                ));
            }
        }

        let damage = self.damage;
        self.projectiles.retain_mut(|shot| {
            shot.advance();
            let Some(hit) = world.first_contact(shot.pos, PROJECTILE_HIT_PADDING, shot.last_hit) else {
                return shot.life > 0;
            };

            world.damage_segment(hit.segment_id, damage, Some(WeaponKind::RicochetArc));
            if shot.bounces_left == 0 {
                return false;
            }
            match world.nearest_segment(hit.pos, ARC_BOUNCE_RANGE, false, Some(hit.segment_id)) {
                Some(next) => {
                    shot.vel = direction_to(shot.pos, next.pos) * ARC_SPEED;
                    shot.bounces_left -= 1;
                    shot.last_hit = Some(hit.segment_id);
                    true
                }
                None => false,
            }
        });
    }
}
