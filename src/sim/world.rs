//! The shared arena: entities, RNG streams, and the combat resolver
//!
//! Weapons receive `&mut World` during their update and hooks. Every point of
//! segment damage goes through [`World::damage_segment`], which queues
//! [`CombatEvent`]s for the engine to fan out and splits snakes on death.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::enemy::{Segment, Snake};
use super::state::{DamageNumber, Gem, Particle, Player, Rgba, TimeDilation};
use super::weapons::WeaponKind;
use crate::Settings;
use crate::consts::*;
use crate::distance;

/// Cosmetic effects draw from their own stream so toggling them cannot shift combat rolls
const FX_STREAM_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// A segment lost hp
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentDamaged {
    pub snake_id: u32,
    pub segment_id: u32,
    pub pos: Vec2,
    /// Amount dealt after the crit roll
    pub amount: f32,
    pub source: Option<WeaponKind>,
}

/// A segment reached zero hp and was cut out of its chain
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentDestroyed {
    pub snake_id: u32,
    pub segment_id: u32,
    pub pos: Vec2,
    pub was_head: bool,
    /// Ids that followed the segment in its chain when it died, nearest first
    pub trailing: Vec<u32>,
    pub source: Option<WeaponKind>,
}

/// Combat notification queued by the resolver
#[derive(Debug, Clone, PartialEq)]
pub enum CombatEvent {
    SegmentDamaged(SegmentDamaged),
    SegmentDestroyed(SegmentDestroyed),
}

/// Result of a damage request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Non-positive amount, or the segment is missing or already dead
    Ignored,
    Damaged,
    Destroyed,
}

/// Lightweight handle to a live segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentRef {
    pub snake_id: u32,
    pub segment_id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub is_head: bool,
}

impl SegmentRef {
    fn of(snake: &Snake, segment: &Segment) -> Self {
        Self {
            snake_id: snake.id,
            segment_id: segment.id,
            pos: segment.pos,
            radius: segment.radius,
            is_head: segment.is_head,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SnakeSlot {
    Main(usize),
    Fragment(usize),
}

#[derive(Debug)]
pub struct World {
    pub player: Player,
    /// Live enemies
    pub snakes: Vec<Snake>,
    /// Split-off tails created this tick, merged by `merge_fragments`
    pub fragments: Vec<Snake>,
    pub gems: Vec<Gem>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub damage_numbers: Vec<DamageNumber>,
    pub time_dilation: TimeDilation,
    /// Simulation clock in ms; advances only on simulated ticks
    pub clock_ms: f64,
    /// Elapsed game time in seconds
    pub game_time: f32,
    pub viewport: Vec2,
    max_particles: usize,
    show_damage_numbers: bool,
    crit_chance: f64,
    events: VecDeque<CombatEvent>,
    /// (destroyed segment, fragment head it promoted) until the destroy is dispatched
    provisional_heads: Vec<(u32, u32)>,
    rng: Pcg32,
    fx_rng: Pcg32,
    next_id: u32,
}

impl World {
    pub fn new(seed: u64, settings: &Settings) -> Self {
        Self {
            player: Player::default(),
            snakes: Vec::new(),
            fragments: Vec::new(),
            gems: Vec::new(),
            particles: Vec::new(),
            damage_numbers: Vec::new(),
            time_dilation: TimeDilation::default(),
            clock_ms: 0.0,
            game_time: 0.0,
            viewport: Vec2::new(settings.viewport_width, settings.viewport_height),
            max_particles: settings.max_particles(),
            show_damage_numbers: settings.damage_numbers,
            crit_chance: CRIT_CHANCE,
            events: VecDeque::new(),
            provisional_heads: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            fx_rng: Pcg32::seed_from_u64(seed ^ FX_STREAM_SALT),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Combat/spawn RNG stream
    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    pub fn crit_chance(&self) -> f64 {
        self.crit_chance
    }

    pub fn set_crit_chance(&mut self, chance: f64) {
        self.crit_chance = if chance.is_finite() { chance.clamp(0.0, 1.0) } else { 0.0 };
    }

    /// Camera offset: player position minus half the viewport
    pub fn camera(&self) -> Vec2 {
        self.player.pos - self.viewport * 0.5
    }

    /// Build a straight chain trailing to the left of `head_pos`
    #[allow(clippy::too_many_arguments)]
    pub fn build_snake(
        &mut self,
        head_pos: Vec2,
        length: usize,
        hp: f32,
        speed: f32,
        damage: f32,
        radius: f32,
        color: Rgba,
        is_boss: bool,
    ) -> Snake {
        let spacing = radius * 2.0 - SEGMENT_OVERLAP * 2.0;
        let segments = (0..length)
            .map(|i| {
                let pos = head_pos - Vec2::new(i as f32 * spacing, 0.0);
                Segment::new(self.next_entity_id(), pos, hp, radius, color)
            })
            .collect();
        let id = self.next_entity_id();
        Snake::new(id, segments, speed, damage, is_boss)
    }

    /// Add a snake to the live list; returns its id
    pub fn add_snake(&mut self, snake: Snake) -> u32 {
        let id = snake.id;
        self.snakes.push(snake);
        id
    }

    /// Live snakes including this tick's fragments
    pub fn all_snakes(&self) -> impl Iterator<Item = &Snake> {
        self.snakes.iter().chain(self.fragments.iter())
    }

    pub fn snake(&self, snake_id: u32) -> Option<&Snake> {
        self.all_snakes().find(|s| s.id == snake_id)
    }

    pub fn segment_count(&self) -> usize {
        self.all_snakes().map(Snake::len).sum()
    }

    fn locate(&self, segment_id: u32) -> Option<(SnakeSlot, usize)> {
        let find = |snakes: &[Snake]| {
            snakes
                .iter()
                .enumerate()
                .find_map(|(i, s)| s.index_of(segment_id).map(|j| (i, j)))
        };
        if let Some((i, j)) = find(&self.snakes) {
            return Some((SnakeSlot::Main(i), j));
        }
        find(&self.fragments).map(|(i, j)| (SnakeSlot::Fragment(i), j))
    }

    fn slot_mut(&mut self, slot: SnakeSlot) -> &mut Snake {
        match slot {
            SnakeSlot::Main(i) => &mut self.snakes[i],
            SnakeSlot::Fragment(i) => &mut self.fragments[i],
        }
    }

    pub fn segment(&self, segment_id: u32) -> Option<&Segment> {
        self.all_snakes()
            .flat_map(|s| s.segments.iter())
            .find(|s| s.id == segment_id)
    }

    pub fn segment_mut(&mut self, segment_id: u32) -> Option<&mut Segment> {
        let (slot, index) = self.locate(segment_id)?;
        Some(&mut self.slot_mut(slot).segments[index])
    }

    /// Snapshot every live segment matching `pred`, in chain order
    pub fn segments_where(&self, mut pred: impl FnMut(&Segment) -> bool) -> Vec<SegmentRef> {
        self.all_snakes()
            .flat_map(|snake| snake.segments.iter().map(move |seg| (snake, seg)))
            .filter(|(_, seg)| !seg.is_dead() && pred(seg))
            .map(|(snake, seg)| SegmentRef::of(snake, seg))
            .collect()
    }

    /// Segments whose circle reaches within `radius` of `center`
    pub fn segments_in_radius(&self, center: Vec2, radius: f32) -> Vec<SegmentRef> {
        self.segments_where(|seg| distance(center, seg.pos) <= radius + seg.radius)
    }

    /// Nearest live segment strictly closer than `max_dist`
    pub fn nearest_segment(
        &self,
        origin: Vec2,
        max_dist: f32,
        heads_only: bool,
        exclude: Option<u32>,
    ) -> Option<SegmentRef> {
        let mut nearest = None;
        let mut min_dist = max_dist;
        for snake in self.all_snakes() {
            for seg in &snake.segments {
                if seg.is_dead() || exclude == Some(seg.id) || (heads_only && !seg.is_head) {
                    continue;
                }
                let dist = distance(origin, seg.pos);
                if dist < min_dist {
                    min_dist = dist;
                    nearest = Some(SegmentRef::of(snake, seg));
                }
            }
        }
        nearest
    }

    /// First segment (in chain order) overlapping a probe of radius `reach`
    pub fn first_contact(&self, pos: Vec2, reach: f32, exclude: Option<u32>) -> Option<SegmentRef> {
        self.all_snakes()
            .flat_map(|snake| snake.segments.iter().map(move |seg| (snake, seg)))
            .find(|(_, seg)| {
                !seg.is_dead() && exclude != Some(seg.id) && distance(pos, seg.pos) < seg.radius + reach
            })
            .map(|(snake, seg)| SegmentRef::of(snake, seg))
    }

    /// The single damage entry point for segments
    pub fn damage_segment(
        &mut self,
        segment_id: u32,
        amount: f32,
        source: Option<WeaponKind>,
    ) -> DamageOutcome {
        if !(amount > 0.0) {
            return DamageOutcome::Ignored;
        }
        let Some((slot, index)) = self.locate(segment_id) else {
            return DamageOutcome::Ignored;
        };
        if self.slot_mut(slot).segments[index].is_dead() {
            return DamageOutcome::Ignored;
        }

        let crit = self.rng.random_bool(self.crit_chance);
        let dealt = if crit { amount * CRIT_MULTIPLIER } else { amount };

        let snake = self.slot_mut(slot);
        let snake_id = snake.id;
        let segment = &mut snake.segments[index];
        segment.hp -= dealt;
        let (pos, color, is_head, dead) = (segment.pos, segment.color, segment.is_head, segment.is_dead());
        // A fragment head whose split is still being dispatched counts as body
        let was_head = is_head && !self.is_provisional_head(segment_id);

        self.spawn_hit_effects(pos, color, dealt, crit);
        self.events.push_back(CombatEvent::SegmentDamaged(SegmentDamaged {
            snake_id,
            segment_id,
            pos,
            amount: dealt,
            source,
        }));

        if !dead {
            return DamageOutcome::Damaged;
        }

        let trailing: Vec<u32> = self.slot_mut(slot).segments[index + 1..]
            .iter()
            .map(|s| s.id)
            .collect();
        self.events.push_back(CombatEvent::SegmentDestroyed(SegmentDestroyed {
            snake_id,
            segment_id,
            pos,
            was_head,
            trailing: trailing.clone(),
            source,
        }));

        let fragment_id = if trailing.is_empty() { 0 } else { self.next_entity_id() };
        if let Some((_, Some(fragment))) = self.slot_mut(slot).split_at(index, fragment_id) {
            log::debug!(
                "Snake {} split at segment {}: tail of {} became snake {}",
                snake_id,
                segment_id,
                fragment.len(),
                fragment.id
            );
            if let Some(head) = fragment.head() {
                self.provisional_heads.push((segment_id, head.id));
            }
            self.fragments.push(fragment);
        }

        let exp = if was_head { HEAD_GEM_EXP } else { BODY_GEM_EXP };
        self.gems.push(Gem::new(pos, exp));

        DamageOutcome::Destroyed
    }

    fn spawn_hit_effects(&mut self, pos: Vec2, color: Rgba, dealt: f32, crit: bool) {
        if self.show_damage_numbers {
            self.damage_numbers
                .push(DamageNumber::new(pos, dealt, crit, &mut self.fx_rng));
        }
        for _ in 0..HIT_PARTICLES {
            if self.particles.len() >= self.max_particles {
                break;
            }
            self.particles.push(Particle::spark(pos, color, 3.0, &mut self.fx_rng));
        }
    }

    pub(crate) fn pop_event(&mut self) -> Option<CombatEvent> {
        self.events.pop_front()
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    fn is_provisional_head(&self, segment_id: u32) -> bool {
        self.provisional_heads.iter().any(|&(_, head)| head == segment_id)
    }

    /// The destroyed hooks for `segment_id` have run; its promoted head is a real head now
    pub(crate) fn settle_split(&mut self, segment_id: u32) {
        self.provisional_heads.retain(|&(destroyed, _)| destroyed != segment_id);
    }

    /// Move this tick's fragments into the live list
    pub fn merge_fragments(&mut self) {
        self.snakes.append(&mut self.fragments);
        self.provisional_heads.clear();
    }

    /// Drop snakes whose last segment died
    pub fn remove_dead_snakes(&mut self) {
        self.snakes.retain(|s| !s.is_empty());
        self.fragments.retain(|s| !s.is_empty());
    }

    pub fn activate_time_dilation(&mut self, duration_ms: f64, enemy_speed_mul: f32, attack_mul: f32) {
        self.time_dilation
            .activate(self.clock_ms, duration_ms, enemy_speed_mul, attack_mul);
    }

    /// Advance gems; consumed gems grant exp
    pub fn update_gems(&mut self, exp_multiplier: f32) {
        let player = &mut self.player;
        self.gems.retain_mut(|gem| !gem.update(player, exp_multiplier));
    }

    /// Advance particles and damage numbers, dropping expired ones
    pub fn update_effects(&mut self) {
        for particle in &mut self.particles {
            particle.update();
        }
        self.particles.retain(|p| p.life > 0.0);

        for number in &mut self.damage_numbers {
            number.update();
        }
        self.damage_numbers.retain(|d| d.life > 0.0);
    }
}
