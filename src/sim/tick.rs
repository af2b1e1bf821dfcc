//! Fixed timestep simulation tick
//!
//! One call advances the run by one frame in a fixed order: player, mode
//! checks, spawning, weapons (with event fan-out after each), enemies, then
//! gems and effects.

use glam::Vec2;

use super::engine::Engine;
use super::state::GameMode;

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Movement intent, clamped to magnitude 1
    pub movement: Vec2,
}

impl TickInput {
    pub fn moving(movement: Vec2) -> Self {
        Self { movement }
    }
}

/// Advance the engine by one fixed timestep of `dt` seconds
pub fn tick(engine: &mut Engine, input: &TickInput, dt: f32) {
    // Paused, stopped, and finished runs keep their last state
    if !engine.running || engine.mode != GameMode::Playing {
        return;
    }
    if !(dt.is_finite() && dt > 0.0) {
        return;
    }

    let world = &mut engine.world;
    world.clock_ms += f64::from(dt) * 1000.0;
    world.game_time += dt;
    let now = world.clock_ms;
    world.time_dilation.expire(now);

    world.player.update(input.movement);

    if world.player.is_dead() {
        engine.enter_game_over();
        return;
    }
    if world.player.check_level_up() {
        // One menu per tick however many levels were gained
        engine.enter_level_up();
        return;
    }

    let enemy_mul = engine.enemy_strength_multiplier();
    engine.spawner.update(&mut engine.world, enemy_mul);

    // Weapons
    let ctx = engine.tick_context();
    for i in 0..engine.weapons.len() {
        engine.weapons[i].update(&mut engine.world, &ctx);
        engine.dispatch_events(&ctx);
    }
    engine.world.merge_fragments();
    engine.world.remove_dead_snakes();

    // Enemies
    for i in 0..engine.world.snakes.len() {
        let world = &mut engine.world;
        let dealt = world.snakes[i].update(&mut world.player, ctx.enemy_speed_mul, now);
        if dealt > 0.0 {
            engine.notify_player_damaged(dealt, &ctx);
        }
    }
    engine.world.merge_fragments();
    engine.world.remove_dead_snakes();

    if engine.world.player.is_dead() {
        engine.enter_game_over();
        return;
    }

    let exp_mul = engine.exp_multiplier();
    engine.world.update_gems(exp_mul);
    engine.world.update_effects();
}

impl Engine {
    /// Advance one fixed timestep; see [`tick`]
    pub fn tick(&mut self, input: &TickInput, dt: f32) {
        tick(self, input, dt);
    }
}
