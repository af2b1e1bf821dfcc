//! Player-centered area weapons

use super::{MAX_WEAPON_LEVEL, TickContext, WeaponBehavior, WeaponKind};
use crate::distance;
use crate::sim::world::World;

/// Ticks the magnet ring stays visible after a pulse
pub const PULSE_FX_TICKS: u32 = 20;

/// Damaging aura around the player
#[derive(Debug, Clone)]
pub struct Garlic {
    pub level: u32,
    pub cooldown: f32,
    pub timer: i32,
    pub damage: f32,
    pub radius: f32,
}

impl Default for Garlic {
    fn default() -> Self {
        Self {
            level: 1,
            cooldown: 30.0,
            timer: 0,
            damage: 5.0,
            radius: 70.0,
        }
    }
}

impl WeaponBehavior for Garlic {
    fn kind(&self) -> WeaponKind {
        WeaponKind::Garlic
    }

    fn level(&self) -> u32 {
        self.level
    }

    fn advance_level(&mut self) {
        self.level = (self.level + 1).min(MAX_WEAPON_LEVEL);
        self.damage += 3.0;
        self.radius += 15.0;
        self.cooldown = (self.cooldown - 2.0).max(10.0);
    }

    fn description(&self) -> String {
        format!("AoE aura. Radius: {}, Dmg: {}", self.radius, self.damage)
    }

    fn update(&mut self, world: &mut World, ctx: &TickContext) {
        self.timer -= 1;
        if self.timer > 0 {
            return;
        }
        self.timer = ctx.effective_cooldown(self.cooldown);

        let center = world.player.pos;
        let radius = self.radius;
        let hits = world.segments_where(|seg| distance(center, seg.pos) < radius + seg.radius);
        for hit in hits {
            world.damage_segment(hit.segment_id, self.damage, Some(WeaponKind::Garlic));
        }
    }
}

/// Periodic gem vacuum with a damaging shockwave
#[derive(Debug, Clone)]
pub struct MagnetPulse {
    pub level: u32,
    pub cooldown: f32,
    pub timer: i32,
    /// Ticks left on the visual ring
    pub pulse_fx: u32,
}

impl Default for MagnetPulse {
    fn default() -> Self {
        Self {
            level: 1,
            cooldown: 300.0,
            timer: 0,
            pulse_fx: 0,
        }
    }
}

impl MagnetPulse {
    pub fn pull_radius(&self) -> f32 {
        140.0 + (self.level - 1) as f32 * 20.0
    }

    pub fn pulse_radius(&self) -> f32 {
        110.0 + (self.level - 1) as f32 * 10.0
    }

    pub fn pulse_damage(&self) -> f32 {
        10.0 + (self.level - 1) as f32 * 4.0
    }
}

impl WeaponBehavior for MagnetPulse {
    fn kind(&self) -> WeaponKind {
        WeaponKind::MagnetPulse
    }

    fn level(&self) -> u32 {
        self.level
    }

    fn advance_level(&mut self) {
        self.level = (self.level + 1).min(MAX_WEAPON_LEVEL);
        self.cooldown = (self.cooldown - 20.0).max(160.0);
    }

    fn description(&self) -> String {
        format!("Periodically vacuums gems and pulses {} dmg.", self.pulse_damage())
    }

    fn update(&mut self, world: &mut World, ctx: &TickContext) {
        self.timer -= 1;
        if self.timer <= 0 {
            self.timer = ctx.effective_cooldown(self.cooldown);
            self.pulse_fx = PULSE_FX_TICKS;

            let center = world.player.pos;
            let pull = self.pull_radius();
            for gem in world.gems.iter_mut().filter(|g| distance(g.pos, center) <= pull) {
                gem.homing = true;
            }

            for hit in world.segments_in_radius(center, self.pulse_radius()) {
                world.damage_segment(hit.segment_id, self.pulse_damage(), Some(WeaponKind::MagnetPulse));
            }
        }

        self.pulse_fx = self.pulse_fx.saturating_sub(1);
    }
}
