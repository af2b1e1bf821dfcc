//! Segmented snake enemies
//!
//! A snake is an ordered chain of circular segments, head first. Killing an
//! interior segment splits the chain: the part behind it becomes a new snake.

use glam::Vec2;

use super::state::{Player, Rgba};
use crate::consts::SEGMENT_OVERLAP;
use crate::{direction_to, distance};

/// One rate-limit slot per orbital satellite
pub const ORBIT_SLOTS: usize = 5;

/// One body unit of a snake
#[derive(Debug, Clone)]
pub struct Segment {
    pub id: u32,
    pub pos: Vec2,
    pub hp: f32,
    pub max_hp: f32,
    pub radius: f32,
    pub color: Rgba,
    pub is_head: bool,
    /// Last time each orbital satellite hit this segment
    pub orbit_hits: [Option<f64>; ORBIT_SLOTS],
}

impl Segment {
    pub fn new(id: u32, pos: Vec2, hp: f32, radius: f32, color: Rgba) -> Self {
        Self {
            id,
            pos,
            hp,
            max_hp: hp,
            radius,
            color,
            is_head: false,
            orbit_hits: [None; ORBIT_SLOTS],
        }
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0.0
    }

    pub fn hp_fraction(&self) -> f32 {
        if self.max_hp > 0.0 {
            (self.hp / self.max_hp).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// A chain of segments sharing speed and contact damage
#[derive(Debug, Clone)]
pub struct Snake {
    pub id: u32,
    /// Head first
    pub segments: Vec<Segment>,
    /// Head speed in px per tick
    pub speed: f32,
    /// Head contact damage; body segments deal half
    pub damage: f32,
    pub is_boss: bool,
}

impl Snake {
    pub fn new(id: u32, segments: Vec<Segment>, speed: f32, damage: f32, is_boss: bool) -> Self {
        let mut snake = Self {
            id,
            segments,
            speed,
            damage,
            is_boss,
        };
        snake.confirm_head();
        snake
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn head(&self) -> Option<&Segment> {
        self.segments.first()
    }

    /// Index 0 is the head; no other segment is
    pub fn confirm_head(&mut self) {
        for (i, segment) in self.segments.iter_mut().enumerate() {
            segment.is_head = i == 0;
        }
    }

    pub fn index_of(&self, segment_id: u32) -> Option<usize> {
        self.segments.iter().position(|s| s.id == segment_id)
    }

    /// Advance one tick; returns damage actually dealt to the player
    pub fn update(&mut self, player: &mut Player, enemy_speed_mul: f32, now_ms: f64) -> f32 {
        let Some(head) = self.segments.first_mut() else {
            return 0.0;
        };

        let mut dealt = 0.0;

        // Seek the player
        head.pos += direction_to(head.pos, player.pos) * self.speed * enemy_speed_mul;
        if distance(head.pos, player.pos) < head.radius + player.radius {
            dealt += player.take_damage(self.damage, now_ms);
        }

        // Body follows with a half-step spring
        for i in 1..self.segments.len() {
            let (front, back) = self.segments.split_at_mut(i);
            let leader = &front[i - 1];
            let follower = &mut back[0];

            let dist = distance(leader.pos, follower.pos);
            let target = leader.radius + follower.radius - SEGMENT_OVERLAP;
            if dist > target {
                follower.pos += direction_to(follower.pos, leader.pos) * (dist - target) * 0.5;
            }

            if distance(follower.pos, player.pos) < follower.radius + player.radius {
                dealt += player.take_damage(self.damage * 0.5, now_ms);
            }
        }

        dealt
    }

    /// Remove the segment at `index`; whatever followed it comes back as a new snake
    ///
    /// The remaining front keeps this snake's id and head. Returns the removed
    /// segment and the tail fragment (if any segments followed it).
    pub fn split_at(&mut self, index: usize, fragment_id: u32) -> Option<(Segment, Option<Snake>)> {
        if index >= self.segments.len() {
            return None;
        }

        let tail: Vec<Segment> = self.segments.split_off(index + 1);
        let removed = self.segments.remove(index);
        self.confirm_head();

        let fragment = if tail.is_empty() {
            None
        } else {
            Some(Snake::new(fragment_id, tail, self.speed, self.damage, self.is_boss))
        };

        Some((removed, fragment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn chain(len: usize) -> Snake {
        let segments = (0..len)
            .map(|i| Segment::new(i as u32 + 1, Vec2::new(-(i as f32) * 20.0, 0.0), 10.0, 12.0, [1.0; 4]))
            .collect();
        Snake::new(100, segments, 2.0, 10.0, false)
    }

    fn head_count(snake: &Snake) -> usize {
        snake.segments.iter().filter(|s| s.is_head).count()
    }

    #[test]
    fn test_new_snake_has_single_head() {
        let snake = chain(4);
        assert_eq!(head_count(&snake), 1);
        assert!(snake.segments[0].is_head);
    }

    #[test]
    fn test_split_length_five_at_two() {
        let mut snake = chain(5);
        let (removed, fragment) = snake.split_at(2, 200).unwrap();
        let fragment = fragment.unwrap();

        assert_eq!(removed.id, 3);
        assert_eq!(snake.len(), 2);
        assert_eq!(fragment.len(), 2);
        assert!(snake.segments[0].is_head);
        assert!(fragment.segments[0].is_head);
        assert_eq!(fragment.segments[0].id, 4);
        assert_eq!(fragment.speed, snake.speed);
        assert_eq!(fragment.damage, snake.damage);
    }

    #[test]
    fn test_split_last_segment_no_fragment() {
        let mut snake = chain(3);
        let (_, fragment) = snake.split_at(2, 200).unwrap();
        assert!(fragment.is_none());
        assert_eq!(snake.len(), 2);
    }

    #[test]
    fn test_split_sole_segment_leaves_empty() {
        let mut snake = chain(1);
        let (_, fragment) = snake.split_at(0, 200).unwrap();
        assert!(fragment.is_none());
        assert!(snake.is_empty());
    }

    #[test]
    fn test_split_head_promotes_next() {
        let mut snake = chain(3);
        let (removed, fragment) = snake.split_at(0, 200).unwrap();
        assert!(removed.is_head);
        assert!(snake.is_empty());
        let fragment = fragment.unwrap();
        assert_eq!(fragment.len(), 2);
        assert!(fragment.segments[0].is_head);
        assert_eq!(head_count(&fragment), 1);
    }

    #[test]
    fn test_split_out_of_range() {
        let mut snake = chain(2);
        assert!(snake.split_at(5, 200).is_none());
        assert_eq!(snake.len(), 2);
    }

    #[test]
    fn test_head_seeks_player_and_body_follows() {
        let mut snake = chain(3);
        let mut player = Player {
            pos: Vec2::new(500.0, 0.0),
            ..Player::default()
        };
        let gap_before = distance(snake.segments[0].pos, snake.segments[1].pos);
        for _ in 0..10 {
            snake.update(&mut player, 1.0, 0.0);
        }
        assert!((snake.segments[0].pos.x - 20.0).abs() < 1e-3);
        let gap_after = distance(snake.segments[0].pos, snake.segments[1].pos);
        assert!(gap_after > 22.0 - 1e-3);
        assert!(gap_after <= gap_before + 20.0);
    }

    #[test]
    fn test_speed_multiplier_slows_head() {
        let mut snake = chain(1);
        let mut player = Player {
            pos: Vec2::new(500.0, 0.0),
            ..Player::default()
        };
        snake.update(&mut player, 0.5, 0.0);
        assert!((snake.segments[0].pos.x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_body_contacts_do_not_stack_within_window() {
        // Every segment overlaps the player
        let segments = (0..4)
            .map(|i| Segment::new(i + 1, Vec2::new(1.0, 0.0), 10.0, 12.0, [1.0; 4]))
            .collect();
        let mut snake = Snake::new(1, segments, 0.0, 10.0, false);
        let mut player = Player::default();
        let dealt = snake.update(&mut player, 1.0, 0.0);
        assert_eq!(dealt, 10.0);
        assert_eq!(player.hp, 90.0);
    }

    proptest! {
        #[test]
        fn prop_split_conserves_segments(len in 3usize..40, pick in 0usize..1000) {
            let index = 1 + pick % (len - 2);
            let mut snake = chain(len);
            let (_, fragment) = snake.split_at(index, 999).unwrap();
            let fragment = fragment.unwrap();

            prop_assert_eq!(snake.len(), index);
            prop_assert_eq!(fragment.len(), len - 1 - index);
            prop_assert_eq!(head_count(&snake), 1);
            prop_assert_eq!(head_count(&fragment), 1);
            prop_assert!(snake.segments[0].is_head);
            prop_assert!(fragment.segments[0].is_head);
        }
    }
}
