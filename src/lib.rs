//! Serpent Swarm - arcade survival against segmented snake swarms
//!
//! Core modules:
//! - `sim`: Simulation (player, snakes, weapons, damage resolution, spawning)
//! - `renderer`: Draw boundary (`Surface` trait, layer order, mesh tessellation)
//! - `settings`: Quality preset, viewport, and menu configuration

pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one tick per animation frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Default viewport, replaced by `Engine::resize`
    pub const DEFAULT_VIEWPORT_WIDTH: f32 = 1280.0;
    pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 720.0;

    /// Player defaults
    pub const PLAYER_SPEED: f32 = 4.0; // px per tick
    pub const PLAYER_RADIUS: f32 = 16.0;
    pub const PLAYER_MAX_HP: f32 = 100.0;
    pub const PLAYER_PICKUP_RADIUS: f32 = 80.0;
    pub const PLAYER_INVULN_MS: f64 = 500.0;
    pub const FIRST_LEVEL_EXP: f32 = 10.0;
    pub const LEVEL_EXP_GROWTH: f32 = 1.5;

    /// Snake defaults
    pub const SEGMENT_RADIUS: f32 = 12.0;
    pub const BOSS_SEGMENT_RADIUS: f32 = 18.0;
    /// Leader/follower target distance is `r1 + r2 - SEGMENT_OVERLAP`
    pub const SEGMENT_OVERLAP: f32 = 2.0;
    pub const MAX_SNAKE_LENGTH: usize = 48;

    /// Gem defaults
    pub const GEM_RADIUS: f32 = 4.0;
    pub const GEM_HOMING_SPEED: f32 = 10.0;
    pub const HEAD_GEM_EXP: f32 = 5.0;
    pub const BODY_GEM_EXP: f32 = 1.0;

    /// Combat
    pub const CRIT_CHANCE: f64 = 0.1;
    pub const CRIT_MULTIPLIER: f32 = 2.0;
    pub const HIT_PARTICLES: usize = 3;

    /// Attack-speed economy (diversity tax)
    pub const ATTACK_PENALTY_PER_KIND: f32 = 0.12;
    pub const MIN_ATTACK_SPEED: f32 = 0.15;
    pub const MIN_COOLDOWN_FRAMES: f32 = 3.0;

    /// Spawning
    pub const BOSS_SPAWN_INTERVAL_SECS: f32 = 60.0;
    pub const SPAWN_PADDING: f32 = 100.0;
    pub const BOSS_SPAWN_PADDING: f32 = 240.0;
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Unit vector from `from` toward `to`, zero when the points coincide
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

/// Clamp a movement intent to magnitude 1 so diagonals move at axis speed
#[inline]
pub fn clamp_intent(intent: Vec2) -> Vec2 {
    if intent.length_squared() > 1.0 {
        intent.normalize_or_zero()
    } else if intent.is_finite() {
        intent
    } else {
        Vec2::ZERO
    }
}

/// Convert polar (r, theta) around `center` to cartesian
#[inline]
pub fn polar_offset(center: Vec2, r: f32, theta: f32) -> Vec2 {
    center + Vec2::new(r * theta.cos(), r * theta.sin())
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_to_coincident_points() {
        let p = Vec2::new(3.0, 4.0);
        assert_eq!(direction_to(p, p), Vec2::ZERO);
        let d = direction_to(Vec2::ZERO, Vec2::new(0.0, 10.0));
        assert!((d - Vec2::Y).length() < 1e-6);
    }

    #[test]
    fn test_clamp_intent_diagonal() {
        let d = clamp_intent(Vec2::new(1.0, 1.0));
        assert!((d.length() - 1.0).abs() < 1e-6);
        let half = clamp_intent(Vec2::new(0.5, 0.0));
        assert_eq!(half, Vec2::new(0.5, 0.0));
        assert_eq!(clamp_intent(Vec2::new(f32::NAN, 1.0)), Vec2::ZERO);
    }

    #[test]
    fn test_polar_offset() {
        let p = polar_offset(Vec2::new(10.0, 0.0), 5.0, 0.0);
        assert!((p - Vec2::new(15.0, 0.0)).length() < 1e-5);
        assert!((distance(Vec2::ZERO, Vec2::new(3.0, 4.0)) - 5.0).abs() < 1e-6);
        assert_eq!(lerp(0.0, 10.0, 0.25), 2.5);
    }
}
