//! Targeted burst damage: head snipes and chain fuses

use super::{MAX_WEAPON_LEVEL, TickContext, WeaponBehavior, WeaponKind};
use crate::sim::world::{DamageOutcome, SegmentDestroyed, World};

const HEADHUNTER_RANGE: f32 = 1000.0;

/// Snipes the nearest head; a kill detonates around the corpse
#[derive(Debug, Clone)]
pub struct Headhunter {
    pub level: u32,
    pub cooldown: f32,
    pub timer: i32,
    pub damage: f32,
    pub explosion_radius: f32,
    pub explosion_damage: f32,
}

impl Default for Headhunter {
    fn default() -> Self {
        Self {
            level: 1,
            cooldown: 120.0,
            timer: 0,
            damage: 18.0,
            explosion_radius: 70.0,
            explosion_damage: 12.0,
        }
    }
}

impl WeaponBehavior for Headhunter {
    fn kind(&self) -> WeaponKind {
        WeaponKind::Headhunter
    }

    fn level(&self) -> u32 {
        self.level
    }

    fn advance_level(&mut self) {
        self.level = (self.level + 1).min(MAX_WEAPON_LEVEL);
        self.damage += 7.0;
        self.cooldown = (self.cooldown - 8.0).max(50.0);
        self.explosion_damage += 4.0;
    }

    fn description(&self) -> String {
        format!(
            "Auto-snipes snake heads. Dmg: {}. Head kill explodes for {}.",
            self.damage, self.explosion_damage
        )
    }

    fn update(&mut self, world: &mut World, ctx: &TickContext) {
        self.timer -= 1;
        if self.timer > 0 {
            return;
        }
        self.timer = ctx.effective_cooldown(self.cooldown);

        let Some(target) = world.nearest_segment(world.player.pos, HEADHUNTER_RANGE, true, None) else {
            return;
        };
        let outcome = world.damage_segment(target.segment_id, self.damage, Some(WeaponKind::Headhunter));
        if outcome != DamageOutcome::Destroyed {
            return;
        }

        // The corpse is already cut out, so the blast cannot hit it again
        for hit in world.segments_in_radius(target.pos, self.explosion_radius) {
            world.damage_segment(hit.segment_id, self.explosion_damage, Some(WeaponKind::Headhunter));
        }
    }
}

/// A dead body segment sets off the segments behind it
#[derive(Debug, Clone)]
pub struct TailFuse {
    pub level: u32,
}

impl Default for TailFuse {
    fn default() -> Self {
        Self { level: 1 }
    }
}

impl TailFuse {
    pub fn chain_damage(&self) -> f32 {
        10.0 + (self.level - 1) as f32 * 5.0
    }

    pub fn chain_count(&self) -> usize {
        1 + (self.level as usize - 1) / 2
    }
}

impl WeaponBehavior for TailFuse {
    fn kind(&self) -> WeaponKind {
        WeaponKind::TailFuse
    }

    fn level(&self) -> u32 {
        self.level
    }

    fn advance_level(&mut self) {
        self.level = (self.level + 1).min(MAX_WEAPON_LEVEL);
    }

    fn description(&self) -> String {
        format!(
            "Body segment death chains {} segment(s). Dmg: {}.",
            self.chain_count(),
            self.chain_damage()
        )
    }

    fn on_segment_destroyed(&mut self, world: &mut World, _ctx: &TickContext, event: &SegmentDestroyed) {
        if event.was_head {
            return;
        }
        for &segment_id in event.trailing.iter().take(self.chain_count()) {
            world.damage_segment(segment_id, self.chain_damage(), Some(WeaponKind::TailFuse));
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::sim::world::CombatEvent;
    use crate::sim::weapons::test_support::*;

    fn destroyed(events: &[CombatEvent]) -> Vec<SegmentDestroyed> {
        events
            .iter()
            .filter_map(|e| match e {
                CombatEvent::SegmentDestroyed(d) => Some(d.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_headhunter_ignores_body_segments() {
        let mut world = arena();
        // Tail end is closer to the player than the head
        let ids = place_snake(&mut world, Vec2::new(400.0, 0.0), 4, 100.0);
        let mut hunter = Headhunter::default();
        hunter.update(&mut world, &ctx(0.0));
        assert_eq!(hp(&world, ids[0]), Some(82.0));
        assert_eq!(hp(&world, ids[3]), Some(100.0));
    }

    #[test]
    fn test_headhunter_kill_explodes() {
        let mut world = arena();
        let ids = place_snake(&mut world, Vec2::new(300.0, 0.0), 3, 100.0);
        world.segment_mut(ids[0]).unwrap().hp = 10.0;
        let mut hunter = Headhunter::default();

        hunter.update(&mut world, &ctx(0.0));
        assert!(world.segment(ids[0]).is_none());
        // Neighbors within the blast radius took explosion damage
        assert_eq!(hp(&world, ids[1]), Some(88.0));
        assert_eq!(hp(&world, ids[2]), Some(88.0));
    }

    #[test]
    fn test_headhunter_out_of_range() {
        let mut world = arena();
        let ids = place_snake(&mut world, Vec2::new(1500.0, 0.0), 1, 100.0);
        let mut hunter = Headhunter::default();
        hunter.update(&mut world, &ctx(0.0));
        assert_eq!(hp(&world, ids[0]), Some(100.0));
    }

    #[test]
    fn test_tail_fuse_chains_trailing() {
        let mut world = arena();
        let ids = place_snake(&mut world, Vec2::new(300.0, 0.0), 6, 30.0);
        let mut fuse = TailFuse::default();
        fuse.level = 3;
        assert_eq!(fuse.chain_count(), 2);

        world.damage_segment(ids[2], 100.0, None);
        let events = drain(&mut world);
        let event = destroyed(&events).remove(0);
        fuse.on_segment_destroyed(&mut world, &ctx(0.0), &event);

        assert_eq!(hp(&world, ids[3]), Some(10.0));
        assert_eq!(hp(&world, ids[4]), Some(10.0));
        assert_eq!(hp(&world, ids[5]), Some(30.0));
    }

    #[test]
    fn test_tail_fuse_ignores_heads() {
        let mut world = arena();
        let ids = place_snake(&mut world, Vec2::new(300.0, 0.0), 3, 30.0);
        let fuse = &mut TailFuse::default();

        world.damage_segment(ids[0], 100.0, None);
        let events = drain(&mut world);
        let event = destroyed(&events).remove(0);
        assert!(event.was_head);
        fuse.on_segment_destroyed(&mut world, &ctx(0.0), &event);
        assert_eq!(hp(&world, ids[1]), Some(30.0));
    }
}
