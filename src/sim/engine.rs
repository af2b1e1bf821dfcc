//! Engine: mode state machine, weapon roster, and combat event fan-out
//!
//! The engine owns the [`World`] and the weapon roster as separate fields so a
//! weapon can receive `&mut World` while the roster is being walked. Events
//! queued by the resolver are drained here and delivered to every weapon.

use glam::Vec2;
use rand::Rng;
use serde::Serialize;

use super::spawn::Spawner;
use super::state::{GameMode, Player};
use super::upgrades::{UpgradeChoice, build_level_up_choices};
use super::weapons::{self, TickContext, Weapon, WeaponKind};
use super::world::{CombatEvent, DamageOutcome, World};
use crate::Settings;

/// Lifecycle callback for the menu layer
pub type Hook = Box<dyn FnMut()>;

/// One roster entry as shown on the HUD
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeaponSummary {
    pub kind: WeaponKind,
    pub name: &'static str,
    pub level: u32,
    pub max_level: u32,
    pub description: String,
}

/// One level-up card as shown on the menu
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoiceCard {
    pub choice: UpgradeChoice,
    pub title: String,
    pub description: String,
}

/// Read-only view for the HUD and menus
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudSnapshot {
    pub mode: GameMode,
    pub hp: f32,
    pub max_hp: f32,
    pub level: u32,
    pub exp: f32,
    pub exp_to_next_level: f32,
    pub game_time: f32,
    pub snakes: usize,
    pub segments: usize,
    pub gems: usize,
    pub bosses_spawned: u32,
    pub attack_penalty: f32,
    pub attack_speed: f32,
    pub time_dilation_active: bool,
    pub weapons: Vec<WeaponSummary>,
    pub choices: Vec<ChoiceCard>,
}

pub struct Engine {
    pub(crate) mode: GameMode,
    pub(crate) running: bool,
    pub(crate) world: World,
    pub(crate) weapons: Vec<Weapon>,
    pub(crate) spawner: Spawner,
    pub(crate) settings: Settings,
    pub(crate) choices: Vec<UpgradeChoice>,
    on_level_up: Option<Hook>,
    on_game_over: Option<Hook>,
}

impl Engine {
    /// Build an engine in the Menu mode with the starting weapon
    pub fn new(seed: u64, settings: Settings) -> Self {
        Self {
            mode: GameMode::Menu,
            running: false,
            world: World::new(seed, &settings),
            weapons: vec![WeaponKind::STARTING.create()],
            spawner: Spawner::default(),
            settings,
            choices: Vec::new(),
            on_level_up: None,
            on_game_over: None,
        }
    }

    /// Begin (or resume) ticking; leaves the Menu on first call
    pub fn start(&mut self) {
        self.running = true;
        if self.mode == GameMode::Menu {
            log::info!("Run started");
            self.mode = GameMode::Playing;
        }
    }

    /// Halt ticking until `start` or `restart`
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Fresh run from any mode; lifecycle hooks are kept
    pub fn restart(&mut self) {
        let seed = self.world.rng().random::<u64>();
        let viewport = self.world.viewport;
        self.world = World::new(seed, &self.settings);
        self.world.viewport = viewport;
        self.weapons = vec![WeaponKind::STARTING.create()];
        self.spawner = Spawner::default();
        self.choices.clear();
        self.mode = GameMode::Playing;
        self.running = true;
        log::info!("Run restarted");
    }

    /// Update the viewport; non-positive sizes are ignored
    pub fn resize(&mut self, width: f32, height: f32) {
        if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
            self.world.viewport = Vec2::new(width, height);
        }
    }

    pub fn on_level_up(&mut self, hook: impl FnMut() + 'static) {
        self.on_level_up = Some(Box::new(hook));
    }

    pub fn on_game_over(&mut self, hook: impl FnMut() + 'static) {
        self.on_game_over = Some(Box::new(hook));
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable arena access for scripted setups and tools
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn player(&self) -> &Player {
        &self.world.player
    }

    pub fn weapons(&self) -> &[Weapon] {
        &self.weapons
    }

    pub fn spawner(&self) -> &Spawner {
        &self.spawner
    }

    /// Cards offered by the current level-up menu
    pub fn choices(&self) -> &[UpgradeChoice] {
        &self.choices
    }

    pub fn has_weapon(&self, kind: WeaponKind) -> bool {
        self.weapons.iter().any(|w| w.kind() == kind)
    }

    /// Level of a held weapon, 0 when not held
    pub fn weapon_level(&self, kind: WeaponKind) -> u32 {
        self.weapons
            .iter()
            .find(|w| w.kind() == kind)
            .map_or(0, Weapon::level)
    }

    /// Cooldown multiplier for the current roster
    pub fn attack_penalty_multiplier(&self) -> f32 {
        weapons::attack_penalty_multiplier(self.weapons.len())
    }

    /// Cooldown multiplier a roster of `kinds` distinct weapons would have
    pub fn attack_penalty_multiplier_for(&self, kinds: usize) -> f32 {
        weapons::attack_penalty_multiplier(kinds)
    }

    pub fn effective_attack_speed(&self) -> f32 {
        weapons::effective_attack_speed(self.weapons.len())
    }

    pub fn exp_multiplier(&self) -> f32 {
        1.0 + self.weapon_level(WeaponKind::GreedPact) as f32 * 0.12
    }

    pub fn enemy_strength_multiplier(&self) -> f32 {
        1.0 + self.weapon_level(WeaponKind::GreedPact) as f32 * 0.08
    }

    /// Per-tick values shared by every weapon
    pub fn tick_context(&self) -> TickContext {
        TickContext::new(self.world.clock_ms, self.weapons.len(), &self.world.time_dilation)
    }

    /// Damage a segment between ticks and deliver the resulting events
    ///
    /// Fragments are merged before returning, so this is for hosts and tools
    /// acting outside [`Engine::tick`]; weapons damage through the `World` they are handed.
    pub fn damage_segment(&mut self, segment_id: u32, amount: f32, source: Option<WeaponKind>) -> DamageOutcome {
        let outcome = self.world.damage_segment(segment_id, amount, source);
        let ctx = self.tick_context();
        self.dispatch_events(&ctx);
        self.world.merge_fragments();
        self.world.remove_dead_snakes();
        outcome
    }

    /// Tell every weapon the player took `amount`, then deliver anything they caused
    pub fn notify_player_damaged(&mut self, amount: f32, ctx: &TickContext) {
        for weapon in &mut self.weapons {
            weapon.on_player_damaged(&mut self.world, ctx, amount);
        }
        self.dispatch_events(ctx);
    }

    /// Fan queued combat events out to the roster until the queue runs dry
    pub fn dispatch_events(&mut self, ctx: &TickContext) {
        while let Some(event) = self.world.pop_event() {
            for weapon in &mut self.weapons {
                match &event {
                    CombatEvent::SegmentDamaged(payload) => {
                        weapon.on_segment_damaged(&mut self.world, ctx, payload)
                    }
                    CombatEvent::SegmentDestroyed(payload) => {
                        weapon.on_segment_destroyed(&mut self.world, ctx, payload)
                    }
                }
            }
            if let CombatEvent::SegmentDestroyed(payload) = &event {
                self.world.settle_split(payload.segment_id);
            }
        }
    }

    /// Apply a level-up card; ignored outside the LevelUp mode
    pub fn choose(&mut self, choice: UpgradeChoice) -> bool {
        if self.mode != GameMode::LevelUp {
            return false;
        }

        match choice {
            UpgradeChoice::Upgrade { kind } | UpgradeChoice::New { kind } => {
                match self.weapons.iter().position(|w| w.kind() == kind) {
                    Some(index) => self.weapons[index].level_up(),
                    None => self.weapons.push(kind.create()),
                }
                log::debug!("Chose {} (level {})", kind.name(), self.weapon_level(kind));
            }
            UpgradeChoice::Recover { heal_ratio } => {
                let player = &mut self.world.player;
                player.heal(player.max_hp * heal_ratio);
            }
        }

        self.choices.clear();
        self.mode = GameMode::Playing;
        true
    }

    pub(crate) fn enter_level_up(&mut self) {
        self.cancel_scheduled();
        self.choices = build_level_up_choices(&self.weapons, self.world.rng(), self.settings.choice_count);
        self.mode = GameMode::LevelUp;
        log::info!("Level up: now level {}", self.world.player.level);
        if let Some(hook) = self.on_level_up.as_mut() {
            hook();
        }
    }

    pub(crate) fn enter_game_over(&mut self) {
        self.cancel_scheduled();
        self.mode = GameMode::GameOver;
        log::info!(
            "Game over at {:.1}s (level {})",
            self.world.game_time,
            self.world.player.level
        );
        if let Some(hook) = self.on_game_over.as_mut() {
            hook();
        }
    }

    fn cancel_scheduled(&mut self) {
        for weapon in &mut self.weapons {
            weapon.cancel_scheduled();
        }
    }

    pub fn hud(&self) -> HudSnapshot {
        let player = &self.world.player;
        HudSnapshot {
            mode: self.mode,
            hp: player.hp,
            max_hp: player.max_hp,
            level: player.level,
            exp: player.exp,
            exp_to_next_level: player.exp_to_next_level,
            game_time: self.world.game_time,
            snakes: self.world.all_snakes().filter(|s| !s.is_empty()).count(),
            segments: self.world.segment_count(),
            gems: self.world.gems.len(),
            bosses_spawned: self.spawner.bosses_spawned,
            attack_penalty: self.attack_penalty_multiplier(),
            attack_speed: self.effective_attack_speed(),
            time_dilation_active: self.world.time_dilation.is_active(self.world.clock_ms),
            weapons: self
                .weapons
                .iter()
                .map(|w| WeaponSummary {
                    kind: w.kind(),
                    name: w.name(),
                    level: w.level(),
                    max_level: w.max_level(),
                    description: w.description(),
                })
                .collect(),
            choices: self
                .choices
                .iter()
                .map(|c| ChoiceCard {
                    choice: *c,
                    title: c.title(),
                    description: c.description(&self.weapons),
                })
                .collect(),
        }
    }
}
