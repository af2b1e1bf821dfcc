//! Frame painting: every entity in the fixed layer order

use glam::Vec2;

use super::vertex::colors::{self, fade};
use super::{Layer, Surface};
use crate::sim::engine::Engine;
use crate::sim::enemy::Snake;
use crate::sim::state::{GemTier, Player};
use crate::sim::weapons::aura::PULSE_FX_TICKS;
use crate::sim::weapons::Weapon;
use crate::sim::world::World;
use crate::lerp;

/// Background grid spacing in world pixels
pub const GRID_SIZE: f32 = 100.0;

const WAND_BOLT_RADIUS: f32 = 6.0;
const ARC_BOLT_RADIUS: f32 = 5.0;
const SATELLITE_DRAW_RADIUS: f32 = 10.0;

/// Paint the current state; the engine is only read
pub fn draw_frame(engine: &Engine, surface: &mut impl Surface) {
    let world = engine.world();
    let camera = world.camera();
    let now = world.clock_ms;

    surface.begin_layer(Layer::Background);
    surface.clear(colors::BACKGROUND);

    surface.begin_layer(Layer::Grid);
    if engine.settings().quality.grid_enabled() {
        draw_grid(surface, camera, world.viewport);
    }

    surface.begin_layer(Layer::Gems);
    for gem in &world.gems {
        let color = match gem.tier() {
            GemTier::Small => colors::GEM_SMALL,
            GemTier::Medium => colors::GEM_MEDIUM,
            GemTier::Large => colors::GEM_LARGE,
        };
        let pos = gem.pos - camera;
        surface.fill_circle(pos, gem.radius, color);
        surface.stroke_circle(pos, gem.radius, 1.0, colors::WHITE);
    }

    surface.begin_layer(Layer::Enemies);
    for snake in world.all_snakes() {
        draw_snake(surface, snake, camera);
    }

    surface.begin_layer(Layer::Weapons);
    for weapon in engine.weapons() {
        draw_weapon(surface, weapon, world, camera);
    }

    surface.begin_layer(Layer::Player);
    draw_player(surface, &world.player, camera, now);

    surface.begin_layer(Layer::Particles);
    for particle in &world.particles {
        surface.fill_circle(particle.pos - camera, particle.size, fade(particle.color, particle.alpha()));
    }

    surface.begin_layer(Layer::DamageNumbers);
    for number in &world.damage_numbers {
        let (color, size) = if number.crit {
            (colors::CRIT_TEXT, 20.0)
        } else {
            (colors::DAMAGE_TEXT, 14.0)
        };
        surface.text(number.pos - camera, &number.value.to_string(), size, fade(color, number.alpha()));
    }
}

fn draw_grid(surface: &mut impl Surface, camera: Vec2, viewport: Vec2) {
    let offset = (-camera).rem_euclid(Vec2::splat(GRID_SIZE));

    let mut x = offset.x;
    while x < viewport.x {
        surface.line(Vec2::new(x, 0.0), Vec2::new(x, viewport.y), 1.0, colors::GRID);
        x += GRID_SIZE;
    }
    let mut y = offset.y;
    while y < viewport.y {
        surface.line(Vec2::new(0.0, y), Vec2::new(viewport.x, y), 1.0, colors::GRID);
        y += GRID_SIZE;
    }
}

/// Tail to head so the head sits on top
fn draw_snake(surface: &mut impl Surface, snake: &Snake, camera: Vec2) {
    for segment in snake.segments.iter().rev() {
        let pos = segment.pos - camera;
        surface.fill_circle(pos, segment.radius, segment.color);
        if segment.is_head {
            surface.stroke_circle(pos, segment.radius, 3.0, colors::HEAD_OUTLINE);
        } else {
            surface.stroke_circle(pos, segment.radius, 1.0, colors::BLACK);
        }

        if segment.hp < segment.max_hp {
            let bar = pos + Vec2::new(-10.0, -segment.radius - 8.0);
            surface.fill_rect(bar, Vec2::new(20.0, 4.0), colors::HP_BAR_BACK);
            surface.fill_rect(bar, Vec2::new(20.0 * segment.hp_fraction(), 4.0), colors::HP_BAR_FILL);
        }
    }
}

fn draw_weapon(surface: &mut impl Surface, weapon: &Weapon, world: &World, camera: Vec2) {
    let player = world.player.pos - camera;
    let now = world.clock_ms;

    match weapon {
        Weapon::MagicWand(wand) => {
            for shot in &wand.projectiles {
                let pos = shot.pos - camera;
                surface.fill_circle(pos, WAND_BOLT_RADIUS, colors::WAND_BOLT);
                surface.stroke_circle(pos, WAND_BOLT_RADIUS, 1.0, colors::WHITE);
            }
        }
        Weapon::RicochetArc(arc) => {
            for shot in &arc.projectiles {
                let pos = shot.pos - camera;
                surface.fill_circle(pos, ARC_BOLT_RADIUS, colors::ARC_BOLT);
                surface.stroke_circle(pos, ARC_BOLT_RADIUS, 1.0, colors::ARC_BOLT_EDGE);
            }
        }
        Weapon::Garlic(garlic) => {
            let pulse = 0.3 + ((now / 150.0).sin() as f32) * 0.2;
            surface.fill_circle(player, garlic.radius, colors::GARLIC_FILL);
            surface.stroke_circle(player, garlic.radius, 2.0, fade(colors::WHITE, pulse));
        }
        Weapon::Orbitals(orbitals) => {
            for center in orbitals.satellites(world.player.pos) {
                let pos = center - camera;
                surface.fill_circle(pos, SATELLITE_DRAW_RADIUS, colors::SATELLITE);
                surface.stroke_circle(pos, SATELLITE_DRAW_RADIUS, 2.0, colors::WHITE);
            }
        }
        Weapon::OrbitalResonance(resonance) => {
            if resonance.stacks > 0 {
                let label = format!("Res {}/{}", resonance.stacks, resonance.threshold());
                surface.text(player + Vec2::new(22.0, -22.0), &label, 14.0, colors::RESONANCE_TEXT);
            }
        }
        Weapon::BloodTrail(trail) => {
            let radius = trail.pool_radius();
            for pool in &trail.pools {
                let pos = pool.pos - camera;
                surface.fill_circle(pos, radius, colors::POOL_FILL);
                surface.stroke_circle(pos, radius, 1.5, colors::POOL_EDGE);
            }
        }
        Weapon::CorpseBloom(bloom) => {
            let radius = bloom.zone_radius();
            for zone in &bloom.zones {
                let pos = zone.pos - camera;
                surface.fill_circle(pos, radius, colors::BLOOM_FILL);
                surface.stroke_circle(pos, radius, 1.5, colors::BLOOM_EDGE);
            }
        }
        Weapon::MagnetPulse(magnet) => {
            if magnet.pulse_fx > 0 {
                let t = magnet.pulse_fx as f32 / PULSE_FX_TICKS as f32;
                // Shrinks to 40% as the pulse fades
                let radius = lerp(magnet.pulse_radius(), magnet.pulse_radius() * 0.4, t);
                surface.stroke_circle(player, radius, 2.0, fade(colors::MAGNET_RING, 0.5 * t));
            }
        }
        Weapon::EmergencyShield(_) => {
            if now < world.player.extra_invuln_until {
                surface.stroke_circle(player, world.player.radius + 8.0, 2.0, colors::SHIELD_RING);
            }
        }
        Weapon::TimeDilation(_) => {
            if world.time_dilation.is_active(now) {
                surface.stroke_circle(player, world.player.radius + 20.0, 2.0, colors::DILATION_RING);
            }
        }
        Weapon::Headhunter(_) | Weapon::TailFuse(_) | Weapon::GreedPact(_) => {}
    }
}

fn draw_player(surface: &mut impl Surface, player: &Player, camera: Vec2, now: f64) {
    let pos = player.pos - camera;
    surface.stroke_circle(pos, player.pickup_radius, 1.0, colors::PICKUP_RING);

    let hurt = player
        .last_damage_ms
        .is_some_and(|last| now - last < player.invuln_ms);
    let blink = (now / 100.0).floor() as i64 % 2 == 0;
    let color = if hurt && blink {
        colors::PLAYER_HURT
    } else {
        colors::PLAYER
    };
    surface.fill_circle(pos, player.radius, color);
    surface.stroke_circle(pos, player.radius, 2.0, colors::BLACK);
}
