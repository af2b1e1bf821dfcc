//! Satellites circling the player, and the resonance nova they charge

use std::f32::consts::TAU;

use glam::Vec2;

use super::{MAX_WEAPON_LEVEL, TickContext, WeaponBehavior, WeaponKind};
use crate::sim::enemy::ORBIT_SLOTS;
use crate::sim::world::{SegmentDamaged, World};
use crate::{distance, polar_offset};

/// Satellite contact radius
pub const SATELLITE_RADIUS: f32 = 12.0;
const ORBIT_DISTANCE: f32 = 90.0;
const BASE_HIT_GAP_MS: f64 = 400.0;

#[derive(Debug, Clone)]
pub struct Orbitals {
    pub level: u32,
    pub damage: f32,
    pub distance: f32,
    /// Radians per tick before attack speed and dilation
    pub speed: f32,
    pub angle: f32,
}

impl Default for Orbitals {
    fn default() -> Self {
        Self {
            level: 1,
            damage: 12.0,
            distance: ORBIT_DISTANCE,
            speed: 0.04,
            angle: 0.0,
        }
    }
}

impl Orbitals {
    pub fn satellite_count(&self) -> usize {
        (1 + self.level as usize / 2).min(ORBIT_SLOTS)
    }

    /// Current satellite centers around `center`
    pub fn satellites(&self, center: Vec2) -> impl Iterator<Item = Vec2> + '_ {
        let count = self.satellite_count();
        (0..count).map(move |i| {
            polar_offset(center, self.distance, self.angle + i as f32 * TAU / count as f32)
        })
    }
}

impl WeaponBehavior for Orbitals {
    fn kind(&self) -> WeaponKind {
        WeaponKind::Orbitals
    }

    fn level(&self) -> u32 {
        self.level
    }

    fn advance_level(&mut self) {
        self.level = (self.level + 1).min(MAX_WEAPON_LEVEL);
        self.damage += 6.0;
        self.speed += 0.005;
    }

    fn description(&self) -> String {
        format!("{} orbiting projectiles. Dmg: {}", self.satellite_count(), self.damage)
    }

    fn update(&mut self, world: &mut World, ctx: &TickContext) {
        self.angle = (self.angle + self.speed * ctx.attack_speed / ctx.attack_mul) % TAU;

        let hit_gap_ms = BASE_HIT_GAP_MS * f64::from(ctx.attack_mul) / f64::from(ctx.attack_speed);
        let centers: Vec<Vec2> = self.satellites(world.player.pos).collect();

        for (slot, center) in centers.into_iter().enumerate() {
            let touching =
                world.segments_where(|seg| distance(center, seg.pos) < SATELLITE_RADIUS + seg.radius);
            for hit in touching {
                let Some(segment) = world.segment_mut(hit.segment_id) else {
                    continue;
                };
                let ready = segment.orbit_hits[slot].is_none_or(|last| ctx.now_ms - last > hit_gap_ms);
                if !ready {
                    continue;
                }
                segment.orbit_hits[slot] = Some(ctx.now_ms);
                world.damage_segment(hit.segment_id, self.damage, Some(WeaponKind::Orbitals));
            }
        }
    }
}

/// Charges on satellite hits and releases a nova around the player
#[derive(Debug, Clone)]
pub struct OrbitalResonance {
    pub level: u32,
    pub stacks: u32,
}

impl Default for OrbitalResonance {
    fn default() -> Self {
        Self { level: 1, stacks: 0 }
    }
}

impl OrbitalResonance {
    pub fn threshold(&self) -> u32 {
        6u32.saturating_sub((self.level - 1) / 3).max(3)
    }

    pub fn nova_radius(&self) -> f32 {
        120.0 + (self.level - 1) as f32 * 12.0
    }

    pub fn nova_damage(&self) -> f32 {
        16.0 + (self.level - 1) as f32 * 5.0
    }
}

impl WeaponBehavior for OrbitalResonance {
    fn kind(&self) -> WeaponKind {
        WeaponKind::OrbitalResonance
    }

    fn level(&self) -> u32 {
        self.level
    }

    fn advance_level(&mut self) {
        self.level = (self.level + 1).min(MAX_WEAPON_LEVEL);
    }

    fn description(&self) -> String {
        format!(
            "Orbital hits stack resonance. {} stacks = nova ({} dmg).",
            self.threshold(),
            self.nova_damage()
        )
    }

    fn on_segment_damaged(&mut self, world: &mut World, _ctx: &TickContext, event: &SegmentDamaged) {
        if event.source != Some(WeaponKind::Orbitals) {
            return;
        }
        self.stacks += 1;
        if self.stacks < self.threshold() {
            return;
        }
        self.stacks = 0;

        log::debug!("Resonance nova for {} dmg", self.nova_damage());
        for hit in world.segments_in_radius(world.player.pos, self.nova_radius()) {
            world.damage_segment(hit.segment_id, self.nova_damage(), Some(WeaponKind::OrbitalResonance));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::weapons::test_support::*;

    fn damaged_by(source: WeaponKind) -> SegmentDamaged {
        SegmentDamaged {
            snake_id: 0,
            segment_id: 0,
            pos: Vec2::ZERO,
            amount: 1.0,
            source: Some(source),
        }
    }

    #[test]
    fn test_satellite_count_growth() {
        let mut orbitals = Orbitals::default();
        assert_eq!(orbitals.satellite_count(), 1);
        for _ in 0..7 {
            orbitals.advance_level();
        }
        assert_eq!(orbitals.satellite_count(), 5);
        assert_eq!(orbitals.satellites(Vec2::ZERO).count(), 5);
    }

    #[test]
    fn test_orbit_rate_limited_per_segment() {
        let mut world = arena();
        // Satellite starts at angle ~0.04, radius 90
        let ids = place_snake(&mut world, Vec2::new(90.0, 0.0), 1, 100.0);
        let mut orbitals = Orbitals::default();

        orbitals.update(&mut world, &ctx(0.0));
        assert_eq!(hp(&world, ids[0]), Some(88.0));

        // Still touching but inside the gap
        orbitals.update(&mut world, &ctx(200.0));
        assert_eq!(hp(&world, ids[0]), Some(88.0));

        orbitals.angle = 0.0;
        orbitals.update(&mut world, &ctx(401.0));
        assert_eq!(hp(&world, ids[0]), Some(76.0));
    }

    #[test]
    fn test_separate_satellites_have_separate_slots() {
        let mut world = arena();
        let ids = place_snake(&mut world, Vec2::new(90.0, 0.0), 1, 100.0);
        let mut orbitals = Orbitals::default();
        orbitals.level = 2;
        assert_eq!(orbitals.satellite_count(), 2);

        orbitals.update(&mut world, &ctx(0.0));
        assert_eq!(hp(&world, ids[0]), Some(88.0));

        // Put the second satellite where the first one was
        orbitals.angle = -std::f32::consts::PI - orbitals.speed;
        orbitals.update(&mut world, &ctx(50.0));
        assert_eq!(hp(&world, ids[0]), Some(76.0));
    }

    #[test]
    fn test_resonance_threshold_values() {
        let mut resonance = OrbitalResonance::default();
        assert_eq!(resonance.threshold(), 6);
        for _ in 0..3 {
            resonance.advance_level();
        }
        assert_eq!(resonance.threshold(), 5);
        for _ in 0..10 {
            resonance.advance_level();
        }
        assert_eq!(resonance.threshold(), 4);
    }

    #[test]
    fn test_resonance_nova_after_threshold() {
        let mut world = arena();
        let ids = place_snake(&mut world, Vec2::new(100.0, 0.0), 1, 100.0);
        let mut resonance = OrbitalResonance::default();

        for _ in 0..5 {
            resonance.on_segment_damaged(&mut world, &ctx(0.0), &damaged_by(WeaponKind::Orbitals));
        }
        assert_eq!(resonance.stacks, 5);
        assert_eq!(hp(&world, ids[0]), Some(100.0));

        // Other sources never charge
        resonance.on_segment_damaged(&mut world, &ctx(0.0), &damaged_by(WeaponKind::Garlic));
        assert_eq!(resonance.stacks, 5);

        resonance.on_segment_damaged(&mut world, &ctx(0.0), &damaged_by(WeaponKind::Orbitals));
        assert_eq!(resonance.stacks, 0);
        assert_eq!(hp(&world, ids[0]), Some(84.0));

        // The nova's own damage event is not an orbital hit
        let events = drain(&mut world);
        assert_eq!(events.len(), 1);
    }
}
