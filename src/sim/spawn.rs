//! Enemy spawning and difficulty curves

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::state::{Rgba, rgb};
use super::world::World;
use crate::consts::*;
use crate::polar_offset;

/// Regular snake colors
pub const SNAKE_PALETTE: [Rgba; 4] = [
    rgb(0x8b, 0x5c, 0xf6),
    rgb(0xec, 0x48, 0x99),
    rgb(0xf5, 0x9e, 0x0b),
    rgb(0x10, 0xb9, 0x81),
];

pub const BOSS_COLOR: Rgba = rgb(0xb9, 0x1c, 0x1c);

/// Ticks between regular spawns at `game_time` seconds
pub fn spawn_interval(game_time: f32) -> f32 {
    (120.0 - game_time * 0.5).max(30.0)
}

/// Regular and boss spawn schedule
#[derive(Debug, Clone)]
pub struct Spawner {
    /// Ticks since the last regular spawn
    pub spawn_timer: u32,
    /// Game time (seconds) of the next boss
    pub next_boss_at: f32,
    pub bosses_spawned: u32,
}

impl Default for Spawner {
    fn default() -> Self {
        Self {
            spawn_timer: 0,
            next_boss_at: BOSS_SPAWN_INTERVAL_SECS,
            bosses_spawned: 0,
        }
    }
}

impl Spawner {
    /// Advance one tick; `enemy_mul` scales hp and damage
    pub fn update(&mut self, world: &mut World, enemy_mul: f32) {
        self.spawn_timer += 1;
        if self.spawn_timer as f32 > spawn_interval(world.game_time) {
            self.spawn_timer = 0;
            self.spawn_regular(world, enemy_mul);
        }

        // A long stall queues every missed boss
        while world.game_time >= self.next_boss_at {
            self.spawn_boss(world, enemy_mul);
            self.next_boss_at += BOSS_SPAWN_INTERVAL_SECS;
        }
    }

    /// Random point on a ring around the player just outside the view
    fn spawn_point(world: &mut World, padding: f32) -> Vec2 {
        let angle = world.rng().random::<f32>() * TAU;
        let dist = world.viewport.length() * 0.5 + padding;
        polar_offset(world.player.pos, dist, angle)
    }

    pub fn spawn_regular(&mut self, world: &mut World, enemy_mul: f32) -> u32 {
        let t = world.game_time;
        let pos = Self::spawn_point(world, SPAWN_PADDING);

        let length = (3 + (t / 30.0).floor() as usize).min(MAX_SNAKE_LENGTH);
        let hp = (10.0 + t * 0.5) * enemy_mul;
        let speed = 1.5 + world.rng().random::<f32>();
        let damage = (5.0 + (t / 60.0).floor() * 2.0) * enemy_mul;
        let color = SNAKE_PALETTE[world.rng().random_range(0..SNAKE_PALETTE.len())];

        let snake = world.build_snake(pos, length, hp, speed, damage, SEGMENT_RADIUS, color, false);
        world.add_snake(snake)
    }

    pub fn spawn_boss(&mut self, world: &mut World, enemy_mul: f32) -> u32 {
        let t = world.game_time;
        let i = self.bosses_spawned as f32;
        let pos = Self::spawn_point(world, BOSS_SPAWN_PADDING);

        let length = 12 + (self.bosses_spawned as usize * 2).min(16);
        let hp = (280.0 + t * 9.0 + i * 180.0) * enemy_mul;
        let speed = 1.9 + world.rng().random::<f32>() * 0.5;
        let damage = (24.0 + (t / 60.0).floor() * 4.0 + i * 5.0) * enemy_mul;

        let snake = world.build_snake(pos, length, hp, speed, damage, BOSS_SEGMENT_RADIUS, BOSS_COLOR, true);
        self.bosses_spawned += 1;
        log::info!(
            "Boss #{} spawned at {:.0}s ({} segments, {:.0} hp each)",
            self.bosses_spawned,
            t,
            length,
            hp
        );
        world.add_snake(snake)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Settings;

    fn world() -> World {
        World::new(99, &Settings::default())
    }

    #[test]
    fn test_interval_shrinks_and_floors() {
        assert_eq!(spawn_interval(0.0), 120.0);
        assert_eq!(spawn_interval(100.0), 70.0);
        assert_eq!(spawn_interval(1000.0), 30.0);
    }

    #[test]
    fn test_regular_spawn_after_interval() {
        let mut world = world();
        let mut spawner = Spawner::default();
        for _ in 0..120 {
            spawner.update(&mut world, 1.0);
        }
        assert!(world.snakes.is_empty());
        spawner.update(&mut world, 1.0);
        assert_eq!(world.snakes.len(), 1);
        assert_eq!(spawner.spawn_timer, 0);

        let snake = &world.snakes[0];
        assert_eq!(snake.len(), 3);
        assert!(!snake.is_boss);
        assert!(snake.speed >= 1.5 && snake.speed < 2.5);
        assert_eq!(snake.damage, 5.0);
        assert_eq!(snake.segments[0].max_hp, 10.0);
    }

    #[test]
    fn test_spawn_ring_outside_view() {
        let mut world = world();
        let mut spawner = Spawner::default();
        spawner.spawn_regular(&mut world, 1.0);
        let head = world.snakes[0].segments[0].pos;
        let expected = world.viewport.length() * 0.5 + SPAWN_PADDING;
        assert!((head.distance(world.player.pos) - expected).abs() < 1e-2);
    }

    #[test]
    fn test_stall_spawns_every_missed_boss() {
        let mut world = world();
        let mut spawner = Spawner::default();
        world.game_time = 150.0;
        spawner.update(&mut world, 1.0);

        let bosses: Vec<_> = world.snakes.iter().filter(|s| s.is_boss).collect();
        assert_eq!(bosses.len(), 2);
        assert_eq!(spawner.bosses_spawned, 2);
        assert_eq!(spawner.next_boss_at, 180.0);
        assert_eq!(bosses[0].len(), 12);
        assert_eq!(bosses[1].len(), 14);
        assert_eq!(bosses[1].segments[0].radius, BOSS_SEGMENT_RADIUS);
    }

    #[test]
    fn test_scaling_with_time_and_multiplier() {
        let mut world = world();
        let mut spawner = Spawner::default();
        world.game_time = 125.0;
        spawner.spawn_regular(&mut world, 1.24);

        let snake = &world.snakes[0];
        assert_eq!(snake.len(), 7);
        assert!((snake.segments[0].max_hp - 72.5 * 1.24).abs() < 1e-3);
        assert!((snake.damage - 9.0 * 1.24).abs() < 1e-4);
    }

    #[test]
    fn test_length_capped() {
        let mut world = world();
        let mut spawner = Spawner::default();
        world.game_time = 100_000.0;
        spawner.spawn_regular(&mut world, 1.0);
        assert_eq!(world.snakes[0].len(), MAX_SNAKE_LENGTH);
    }
}
