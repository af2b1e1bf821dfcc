//! Core entity types: player, gems, visual effects, time dilation

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::{clamp_intent, direction_to, distance};

/// Engine mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Constructed, waiting for `start`
    Menu,
    /// Active simulation
    Playing,
    /// Paused on the level-up menu
    LevelUp,
    /// Run ended (terminal until restart)
    GameOver,
}

/// RGBA color, 0-1 per channel
pub type Rgba = [f32; 4];

/// Opaque color from 8-bit channels
pub const fn rgb(r: u8, g: u8, b: u8) -> Rgba {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
}

/// The player
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    /// Last movement intent (magnitude <= 1)
    pub intent: Vec2,
    pub speed: f32,
    pub radius: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub exp: f32,
    pub exp_to_next_level: f32,
    pub level: u32,
    pub pickup_radius: f32,
    /// Clock time of the last hit that landed
    pub last_damage_ms: Option<f64>,
    pub invuln_ms: f64,
    /// Weapon-granted invulnerability deadline
    pub extra_invuln_until: f64,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            intent: Vec2::ZERO,
            speed: PLAYER_SPEED,
            radius: PLAYER_RADIUS,
            hp: PLAYER_MAX_HP,
            max_hp: PLAYER_MAX_HP,
            exp: 0.0,
            exp_to_next_level: FIRST_LEVEL_EXP,
            level: 1,
            pickup_radius: PLAYER_PICKUP_RADIUS,
            last_damage_ms: None,
            invuln_ms: PLAYER_INVULN_MS,
            extra_invuln_until: 0.0,
        }
    }
}

impl Player {
    /// Advance position by the (clamped) movement intent
    pub fn update(&mut self, intent: Vec2) {
        self.intent = clamp_intent(intent);
        self.pos += self.intent * self.speed;
    }

    /// Whether a hit at `now_ms` would be absorbed
    pub fn is_invulnerable(&self, now_ms: f64) -> bool {
        let in_window = self
            .last_damage_ms
            .is_some_and(|last| now_ms - last <= self.invuln_ms);
        in_window || now_ms < self.extra_invuln_until
    }

    /// Apply a hit; returns the amount actually taken (0 when absorbed)
    pub fn take_damage(&mut self, amount: f32, now_ms: f64) -> f32 {
        if amount <= 0.0 || self.is_invulnerable(now_ms) {
            return 0.0;
        }
        let taken = amount.min(self.hp);
        self.hp = (self.hp - amount).max(0.0);
        self.last_damage_ms = Some(now_ms);
        taken
    }

    /// Heal, clamped to max hp
    pub fn heal(&mut self, amount: f32) {
        if amount > 0.0 {
            self.hp = (self.hp + amount).min(self.max_hp);
        }
    }

    /// Extend the weapon-granted invulnerability deadline (never shortens it)
    pub fn grant_invuln_until(&mut self, until_ms: f64) {
        self.extra_invuln_until = self.extra_invuln_until.max(until_ms);
    }

    pub fn gain_exp(&mut self, amount: f32) {
        self.exp += amount;
    }

    /// Consume exp into levels; true if at least one level was gained
    pub fn check_level_up(&mut self) -> bool {
        let mut leveled = false;
        while self.exp >= self.exp_to_next_level && self.exp_to_next_level > 0.0 {
            self.exp -= self.exp_to_next_level;
            self.level += 1;
            self.exp_to_next_level = (self.exp_to_next_level * LEVEL_EXP_GROWTH).floor();
            leveled = true;
        }
        leveled
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0.0
    }
}

/// Gem color band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GemTier {
    Small,
    Medium,
    Large,
}

impl GemTier {
    pub fn for_exp(exp: f32) -> Self {
        if exp < 5.0 {
            GemTier::Small
        } else if exp < 20.0 {
            GemTier::Medium
        } else {
            GemTier::Large
        }
    }
}

/// An experience gem
#[derive(Debug, Clone)]
pub struct Gem {
    pub pos: Vec2,
    pub exp: f32,
    pub radius: f32,
    /// Entered the pickup radius (or was vacuumed) and now flies to the player
    pub homing: bool,
}

impl Gem {
    pub fn new(pos: Vec2, exp: f32) -> Self {
        Self {
            pos,
            exp,
            radius: GEM_RADIUS,
            homing: false,
        }
    }

    pub fn tier(&self) -> GemTier {
        GemTier::for_exp(self.exp)
    }

    /// Advance one tick; returns true once consumed by the player
    pub fn update(&mut self, player: &mut Player, exp_multiplier: f32) -> bool {
        let dist = distance(self.pos, player.pos);
        if self.homing {
            if dist < player.radius {
                player.gain_exp(self.exp * exp_multiplier);
                return true;
            }
            self.pos += direction_to(self.pos, player.pos) * GEM_HOMING_SPEED;
        } else if dist < player.pickup_radius {
            self.homing = true;
        }
        false
    }
}

/// A hit spark (cosmetic)
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Rgba,
    /// Ticks remaining
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
}

impl Particle {
    pub fn spark(pos: Vec2, color: Rgba, speed: f32, rng: &mut impl Rng) -> Self {
        let angle = rng.random::<f32>() * std::f32::consts::TAU;
        let s = rng.random::<f32>() * speed;
        let max_life = 20.0 + rng.random::<f32>() * 20.0;
        Self {
            pos,
            vel: Vec2::new(angle.cos(), angle.sin()) * s,
            color,
            life: max_life,
            max_life,
            size: 2.0 + rng.random::<f32>() * 3.0,
        }
    }

    pub fn update(&mut self) {
        self.pos += self.vel;
        self.life -= 1.0;
    }

    pub fn alpha(&self) -> f32 {
        (self.life / self.max_life).clamp(0.0, 1.0)
    }
}

/// Lifetime of a floating damage number, in ticks
pub const DAMAGE_NUMBER_LIFE: f32 = 30.0;

/// Floating damage number (cosmetic)
#[derive(Debug, Clone)]
pub struct DamageNumber {
    pub pos: Vec2,
    pub value: u32,
    pub crit: bool,
    pub life: f32,
}

impl DamageNumber {
    pub fn new(pos: Vec2, value: f32, crit: bool, rng: &mut impl Rng) -> Self {
        let jitter = Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5) * 20.0;
        Self {
            pos: pos + jitter,
            value: value.max(0.0).floor() as u32,
            crit,
            life: DAMAGE_NUMBER_LIFE,
        }
    }

    pub fn update(&mut self) {
        self.pos.y -= 1.0;
        self.life -= 1.0;
    }

    pub fn alpha(&self) -> f32 {
        (self.life / DAMAGE_NUMBER_LIFE).clamp(0.0, 1.0)
    }
}

/// Global slow-time buff window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeDilation {
    pub until_ms: f64,
    pub enemy_speed_mul: f32,
    pub attack_mul: f32,
}

impl Default for TimeDilation {
    fn default() -> Self {
        Self {
            until_ms: 0.0,
            enemy_speed_mul: 1.0,
            attack_mul: 1.0,
        }
    }
}

impl TimeDilation {
    /// Duration takes the later deadline; multipliers are overwritten by the newest trigger
    pub fn activate(&mut self, now_ms: f64, duration_ms: f64, enemy_speed_mul: f32, attack_mul: f32) {
        self.until_ms = self.until_ms.max(now_ms + duration_ms);
        self.enemy_speed_mul = enemy_speed_mul;
        self.attack_mul = attack_mul;
    }

    /// Reset multipliers once the window has passed
    pub fn expire(&mut self, now_ms: f64) {
        if now_ms > self.until_ms {
            self.enemy_speed_mul = 1.0;
            self.attack_mul = 1.0;
        }
    }

    pub fn is_active(&self, now_ms: f64) -> bool {
        now_ms <= self.until_ms && (self.enemy_speed_mul != 1.0 || self.attack_mul != 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_invulnerability_window_scenario() {
        let mut player = Player::default();
        assert_eq!(player.take_damage(10.0, 0.0), 10.0);
        assert_eq!(player.take_damage(10.0, 200.0), 0.0);
        assert_eq!(player.hp, 90.0);
        assert_eq!(player.take_damage(10.0, 600.0), 10.0);
        assert_eq!(player.hp, 80.0);
    }

    #[test]
    fn test_extra_invuln_never_shortens() {
        let mut player = Player::default();
        player.grant_invuln_until(2000.0);
        player.grant_invuln_until(1000.0);
        assert_eq!(player.extra_invuln_until, 2000.0);
        assert_eq!(player.take_damage(5.0, 1500.0), 0.0);
        assert_eq!(player.take_damage(5.0, 2000.0), 5.0);
    }

    #[test]
    fn test_hp_clamped() {
        let mut player = Player::default();
        player.take_damage(500.0, 0.0);
        assert_eq!(player.hp, 0.0);
        assert!(player.is_dead());
        player.heal(1000.0);
        assert_eq!(player.hp, player.max_hp);
    }

    #[test]
    fn test_level_up_threshold_and_carry() {
        let mut player = Player::default();
        player.gain_exp(3.0);
        let threshold = player.exp_to_next_level;
        player.gain_exp(threshold);
        assert!(player.check_level_up());
        assert_eq!(player.level, 2);
        assert_eq!(player.exp_to_next_level, (threshold * 1.5).floor());
        assert_eq!(player.exp, 3.0);
        assert!(!player.check_level_up());
    }

    #[test]
    fn test_multi_level_single_call() {
        let mut player = Player::default();
        player.gain_exp(10.0 + 15.0 + 1.0);
        assert!(player.check_level_up());
        assert_eq!(player.level, 3);
        assert_eq!(player.exp, 1.0);
        assert_eq!(player.exp_to_next_level, 22.0);
    }

    #[test]
    fn test_diagonal_movement_normalized() {
        let mut player = Player::default();
        player.update(Vec2::new(1.0, 1.0));
        assert!((player.pos.length() - PLAYER_SPEED).abs() < 1e-4);
    }

    #[test]
    fn test_gem_idle_homing_consumed() {
        let mut player = Player::default();
        let mut gem = Gem::new(Vec2::new(60.0, 0.0), 5.0);
        assert_eq!(gem.tier(), GemTier::Medium);
        assert!(!gem.update(&mut player, 1.0));
        assert!(gem.homing);
        let mut consumed = false;
        for _ in 0..10 {
            if gem.update(&mut player, 2.0) {
                consumed = true;
                break;
            }
        }
        assert!(consumed);
        assert_eq!(player.exp, 10.0);
    }

    #[test]
    fn test_gem_outside_pickup_stays_idle() {
        let mut player = Player::default();
        let mut gem = Gem::new(Vec2::new(500.0, 0.0), 1.0);
        assert_eq!(gem.tier(), GemTier::Small);
        assert!(!gem.update(&mut player, 1.0));
        assert!(!gem.homing);
        assert_eq!(gem.pos, Vec2::new(500.0, 0.0));
        assert_eq!(GemTier::for_exp(25.0), GemTier::Large);
    }

    #[test]
    fn test_time_dilation_asymmetry() {
        let mut dilation = TimeDilation::default();
        dilation.activate(0.0, 2000.0, 0.5, 0.75);
        dilation.activate(500.0, 500.0, 0.6, 0.8);
        // Later deadline kept, newest magnitude wins
        assert_eq!(dilation.until_ms, 2000.0);
        assert_eq!(dilation.enemy_speed_mul, 0.6);
        assert_eq!(dilation.attack_mul, 0.8);
        dilation.expire(1999.0);
        assert!(dilation.is_active(1999.0));
        dilation.expire(2001.0);
        assert_eq!(dilation.enemy_speed_mul, 1.0);
        assert_eq!(dilation.attack_mul, 1.0);
    }

    #[test]
    fn test_effects_expire() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut particle = Particle::spark(Vec2::ZERO, [1.0; 4], 3.0, &mut rng);
        let mut ticks = 0;
        while particle.life > 0.0 {
            particle.update();
            ticks += 1;
        }
        assert!((20..=40).contains(&ticks));

        let mut number = DamageNumber::new(Vec2::ZERO, 12.7, true, &mut rng);
        assert_eq!(number.value, 12);
        for _ in 0..30 {
            number.update();
        }
        assert_eq!(number.alpha(), 0.0);
    }
}
