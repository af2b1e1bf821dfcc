//! Defensive and economic weapons that react to the player being hit

use super::{MAX_WEAPON_LEVEL, TickContext, WeaponBehavior, WeaponKind};
use crate::sim::world::World;

/// Whether a reactive cooldown measured from `last` has elapsed at `now`
fn ready(last: Option<f64>, now_ms: f64, cooldown_ms: f64) -> bool {
    last.is_none_or(|at| now_ms - at >= cooldown_ms)
}

/// Heals and extends invulnerability when the player takes a hit
#[derive(Debug, Clone)]
pub struct EmergencyShield {
    pub level: u32,
    pub last_trigger: Option<f64>,
}

impl Default for EmergencyShield {
    fn default() -> Self {
        Self {
            level: 1,
            last_trigger: None,
        }
    }
}

impl EmergencyShield {
    pub fn cooldown_ms(&self) -> f64 {
        (18_000.0 - f64::from(self.level - 1) * 1000.0).max(8000.0)
    }

    pub fn heal_amount(&self) -> f32 {
        10.0 + (self.level - 1) as f32 * 6.0
    }

    pub fn extra_invuln_ms(&self) -> f64 {
        300.0 + f64::from(self.level - 1) * 80.0
    }
}

impl WeaponBehavior for EmergencyShield {
    fn kind(&self) -> WeaponKind {
        WeaponKind::EmergencyShield
    }

    fn level(&self) -> u32 {
        self.level
    }

    fn advance_level(&mut self) {
        self.level = (self.level + 1).min(MAX_WEAPON_LEVEL);
    }

    fn description(&self) -> String {
        format!(
            "On hit: heal {} + {}ms shield ({}s CD).",
            self.heal_amount(),
            self.extra_invuln_ms(),
            (self.cooldown_ms() / 1000.0).round()
        )
    }

    fn on_player_damaged(&mut self, world: &mut World, ctx: &TickContext, _amount: f32) {
        if !ready(self.last_trigger, ctx.now_ms, self.cooldown_ms()) {
            return;
        }
        self.last_trigger = Some(ctx.now_ms);
        world.player.heal(self.heal_amount());
        world.player.grant_invuln_until(ctx.now_ms + self.extra_invuln_ms());
        log::debug!("Emergency shield: +{} hp", self.heal_amount());
    }
}

/// Slows enemies and hastens attacks for a short window after a hit
#[derive(Debug, Clone)]
pub struct TimeDilationWard {
    pub level: u32,
    pub last_trigger: Option<f64>,
}

impl Default for TimeDilationWard {
    fn default() -> Self {
        Self {
            level: 1,
            last_trigger: None,
        }
    }
}

impl TimeDilationWard {
    pub const COOLDOWN_MS: f64 = 14_000.0;
    pub const ATTACK_COOLDOWN_MUL: f32 = 0.75;

    pub fn duration_ms(&self) -> f64 {
        1200.0 + f64::from(self.level - 1) * 250.0
    }

    pub fn enemy_speed_mul(&self) -> f32 {
        (0.65 - (self.level - 1) as f32 * 0.03).max(0.45)
    }
}

impl WeaponBehavior for TimeDilationWard {
    fn kind(&self) -> WeaponKind {
        WeaponKind::TimeDilation
    }

    fn level(&self) -> u32 {
        self.level
    }

    fn advance_level(&mut self) {
        self.level = (self.level + 1).min(MAX_WEAPON_LEVEL);
    }

    fn description(&self) -> String {
        format!(
            "On hit: {:.1}s slow-time (enemy x{:.2}).",
            self.duration_ms() / 1000.0,
            self.enemy_speed_mul()
        )
    }

    fn on_player_damaged(&mut self, world: &mut World, ctx: &TickContext, _amount: f32) {
        if !ready(self.last_trigger, ctx.now_ms, Self::COOLDOWN_MS) {
            return;
        }
        self.last_trigger = Some(ctx.now_ms);
        world.activate_time_dilation(
            self.duration_ms(),
            self.enemy_speed_mul(),
            Self::ATTACK_COOLDOWN_MUL,
        );
    }
}

/// More exp per gem, stronger enemies
#[derive(Debug, Clone)]
pub struct GreedPact {
    pub level: u32,
}

impl Default for GreedPact {
    fn default() -> Self {
        Self { level: 1 }
    }
}

impl GreedPact {
    pub fn exp_multiplier(&self) -> f32 {
        1.0 + self.level as f32 * 0.12
    }

    pub fn enemy_multiplier(&self) -> f32 {
        1.0 + self.level as f32 * 0.08
    }
}

impl WeaponBehavior for GreedPact {
    fn kind(&self) -> WeaponKind {
        WeaponKind::GreedPact
    }

    fn level(&self) -> u32 {
        self.level
    }

    fn advance_level(&mut self) {
        self.level = (self.level + 1).min(MAX_WEAPON_LEVEL);
    }

    fn description(&self) -> String {
        format!(
            "EXP x{:.2} but enemies scale x{:.2}.",
            self.exp_multiplier(),
            self.enemy_multiplier()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::weapons::test_support::*;

    #[test]
    fn test_shield_first_hit_always_triggers() {
        let mut world = arena();
        world.player.hp = 50.0;
        let mut shield = EmergencyShield::default();

        shield.on_player_damaged(&mut world, &ctx(0.0), 10.0);
        assert_eq!(world.player.hp, 60.0);
        assert_eq!(world.player.extra_invuln_until, 300.0);
    }

    #[test]
    fn test_shield_cooldown() {
        let mut world = arena();
        world.player.hp = 50.0;
        let mut shield = EmergencyShield::default();

        shield.on_player_damaged(&mut world, &ctx(1000.0), 10.0);
        shield.on_player_damaged(&mut world, &ctx(5000.0), 10.0);
        assert_eq!(world.player.hp, 60.0);
        shield.on_player_damaged(&mut world, &ctx(19_000.0), 10.0);
        assert_eq!(world.player.hp, 70.0);
    }

    #[test]
    fn test_shield_heal_clamped() {
        let mut world = arena();
        let mut shield = EmergencyShield::default();
        shield.on_player_damaged(&mut world, &ctx(0.0), 1.0);
        assert_eq!(world.player.hp, world.player.max_hp);
    }

    #[test]
    fn test_ward_activates_dilation() {
        let mut world = arena();
        world.clock_ms = 100.0;
        let mut ward = TimeDilationWard::default();
        ward.on_player_damaged(&mut world, &ctx(100.0), 5.0);

        let dilation = world.time_dilation;
        assert_eq!(dilation.until_ms, 1300.0);
        assert_eq!(dilation.enemy_speed_mul, 0.65);
        assert_eq!(dilation.attack_mul, 0.75);

        // On cooldown: no change even though a new hit lands
        world.time_dilation = Default::default();
        ward.on_player_damaged(&mut world, &ctx(5000.0), 5.0);
        assert_eq!(world.time_dilation.until_ms, 0.0);
    }

    #[test]
    fn test_ward_magnitude_floor() {
        let mut ward = TimeDilationWard::default();
        for _ in 0..10 {
            ward.advance_level();
        }
        assert_eq!(ward.level, MAX_WEAPON_LEVEL);
        assert_eq!(ward.enemy_speed_mul(), 0.45);
    }

    #[test]
    fn test_greed_multipliers() {
        let pact = GreedPact { level: 3 };
        assert!((pact.exp_multiplier() - 1.36).abs() < 1e-5);
        assert!((pact.enemy_multiplier() - 1.24).abs() < 1e-5);
    }
}
