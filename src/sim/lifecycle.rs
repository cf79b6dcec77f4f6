//! Entity lifecycle
//!
//! Owns the live falling tokens: spawn, per-tick motion, exits past the bottom
//! edge, and click marking with a short feedback delay before removal.
//! Iteration is always in id order so replays are deterministic.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{EntityId, Field};
use crate::consts::MAX_FRAME_DT;
use crate::tokens_match;

/// A falling clickable token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub token: String,
    /// Fixed at spawn from membership in the challenge's required tokens
    pub is_required: bool,
    pub pos: Vec2,
    /// Units/sec downward
    pub vertical_speed: f32,
    /// Units/sec sideways (bounces off the side walls)
    pub drift: f32,
    pub scale: f32,
    /// Radians
    pub rotation: f32,
    pub rotation_speed: f32,
    /// Engine clock at spawn (seconds)
    pub spawn_time: f32,
    pub clicked: bool,
    pub removed: bool,
    /// Seconds left before a clicked entity disappears
    #[serde(skip)]
    feedback_timer: f32,
}

impl Entity {
    /// Clicked or removed entities no longer count as on-screen options
    pub fn is_unresolved(&self) -> bool {
        !self.clicked && !self.removed
    }
}

/// Everything needed to create an entity
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnSpec {
    pub token: String,
    pub is_required: bool,
    pub pos: Vec2,
    pub vertical_speed: f32,
    pub drift: f32,
    pub scale: f32,
    pub rotation_speed: f32,
    pub spawn_time: f32,
}

/// The live entity set, bounded by the on-screen cap
#[derive(Debug, Clone)]
pub struct EntitySet {
    entities: BTreeMap<EntityId, Entity>,
    capacity: usize,
    next_id: EntityId,
}

impl EntitySet {
    pub fn new(capacity: usize) -> Self {
        Self {
            entities: BTreeMap::new(),
            capacity,
            next_id: 1,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entities on screen, including clicked ones still showing feedback
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entities.len() >= self.capacity
    }

    /// Free slots under the cap
    pub fn free_slots(&self) -> usize {
        self.capacity.saturating_sub(self.entities.len())
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// All live entities in id order
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Entities that can still be clicked
    pub fn unresolved(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values().filter(|e| e.is_unresolved())
    }

    /// Centers of every live entity, for placement queries
    pub fn positions(&self) -> Vec<Vec2> {
        self.entities.values().map(|e| e.pos).collect()
    }

    /// Whether an unresolved entity already carries this token
    pub fn is_token_live(&self, token: &str) -> bool {
        self.unresolved().any(|e| tokens_match(&e.token, token))
    }

    /// Insert a new entity. Rejected at capacity.
    pub fn spawn(&mut self, spec: SpawnSpec) -> Option<EntityId> {
        if self.is_full() {
            log::debug!("Spawn of '{}' rejected: field at capacity ({})", spec.token, self.capacity);
            return None;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.entities.insert(
            id,
            Entity {
                id,
                token: spec.token,
                is_required: spec.is_required,
                pos: spec.pos,
                vertical_speed: spec.vertical_speed,
                drift: spec.drift,
                scale: spec.scale,
                rotation: 0.0,
                rotation_speed: spec.rotation_speed,
                spawn_time: spec.spawn_time,
                clicked: false,
                removed: false,
                feedback_timer: 0.0,
            },
        );
        Some(id)
    }

    /// Mark an entity clicked and schedule its removal
    ///
    /// Returns the entity on the first click only. Clicks on clicked, removed
    /// or unknown ids are no-ops.
    pub fn mark_clicked(&mut self, id: EntityId, feedback_secs: f32) -> Option<Entity> {
        let entity = self.entities.get_mut(&id)?;
        if !entity.is_unresolved() {
            return None;
        }
        entity.clicked = true;
        entity.feedback_timer = feedback_secs;
        Some(entity.clone())
    }

    /// Advance motion by `dt` seconds and return entities that left the field
    ///
    /// Clicked entities stay frozen until their feedback delay runs out and are
    /// then dropped without being reported.
    pub fn advance(&mut self, dt: f32, field: &Field) -> Vec<Entity> {
        if self.entities.is_empty() {
            return Vec::new();
        }
        let dt = if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_DT) } else { 0.0 };
        let (x_min, x_max) = field.x_range();
        let exit_y = field.exit_y();

        let mut exited = Vec::new();
        let mut expired = Vec::new();

        for entity in self.entities.values_mut() {
            if entity.clicked {
                entity.feedback_timer -= dt;
                if entity.feedback_timer <= 0.0 {
                    expired.push(entity.id);
                }
                continue;
            }

            entity.pos.y += entity.vertical_speed * dt;
            entity.pos.x += entity.drift * dt;
            if entity.pos.x < x_min {
                entity.pos.x = x_min;
                entity.drift = entity.drift.abs();
            } else if entity.pos.x > x_max {
                entity.pos.x = x_max;
                entity.drift = -entity.drift.abs();
            }
            entity.rotation = (entity.rotation + entity.rotation_speed * dt) % std::f32::consts::TAU;

            if entity.pos.y > exit_y {
                exited.push(entity.id);
            }
        }

        for id in expired {
            self.entities.remove(&id);
        }
        exited
            .into_iter()
            .filter_map(|id| self.entities.remove(&id))
            .map(|mut entity| {
                entity.removed = true;
                entity
            })
            .collect()
    }

    /// Drop everything (challenge reset)
    pub fn clear(&mut self) {
        self.entities.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    fn field() -> Field {
        Field::from_settings(&Settings::default())
    }

    fn spec(token: &str, y: f32, speed: f32) -> SpawnSpec {
        SpawnSpec {
            token: token.to_string(),
            is_required: false,
            pos: Vec2::new(600.0, y),
            vertical_speed: speed,
            drift: 0.0,
            scale: 1.0,
            rotation_speed: 0.0,
            spawn_time: 0.0,
        }
    }

    #[test]
    fn test_spawn_respects_capacity() {
        let mut set = EntitySet::new(2);
        assert_eq!(set.spawn(spec("a", 0.0, 10.0)), Some(1));
        assert_eq!(set.spawn(spec("b", 0.0, 10.0)), Some(2));
        assert!(set.is_full());
        assert_eq!(set.spawn(spec("c", 0.0, 10.0)), None);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_advance_moves_down_and_reports_exits() {
        let field = field();
        let mut set = EntitySet::new(4);
        let slow = set.spawn(spec("slow", 0.0, 10.0)).unwrap();
        let gone = set.spawn(spec("gone", field.exit_y() - 1.0, 60.0)).unwrap();

        let exits = set.advance(0.1, &field);
        assert_eq!(exits.len(), 1);
        assert_eq!(exits[0].id, gone);
        assert!(exits[0].removed);
        assert!(set.get(gone).is_none());
        assert!((set.get(slow).unwrap().pos.y - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_large_deltas_are_clamped() {
        let mut set = EntitySet::new(1);
        let id = set.spawn(spec("a", 0.0, 100.0)).unwrap();
        set.advance(5.0, &field());
        assert!((set.get(id).unwrap().pos.y - 100.0 * MAX_FRAME_DT).abs() < 1e-3);
    }

    #[test]
    fn test_non_finite_deltas_do_not_move_entities() {
        let field = field();
        let mut set = EntitySet::new(2);
        let falling = set.spawn(spec("a", 100.0, 50.0)).unwrap();
        let clicked = set.spawn(spec("b", 200.0, 50.0)).unwrap();
        set.mark_clicked(clicked, 0.2);

        for dt in [f32::NAN, f32::INFINITY] {
            assert!(set.advance(dt, &field).is_empty());
        }
        assert_eq!(set.get(falling).unwrap().pos.y, 100.0);
        assert_eq!(set.get(clicked).unwrap().feedback_timer, 0.2);
    }

    #[test]
    fn test_drift_bounces_off_walls() {
        let field = field();
        let (_, x_max) = field.x_range();
        let mut set = EntitySet::new(1);
        let id = set
            .spawn(SpawnSpec {
                pos: Vec2::new(x_max - 1.0, 0.0),
                drift: 50.0,
                ..spec("a", 0.0, 10.0)
            })
            .unwrap();
        set.advance(0.1, &field);
        let entity = set.get(id).unwrap();
        assert_eq!(entity.pos.x, x_max);
        assert!(entity.drift < 0.0);
    }

    #[test]
    fn test_click_is_idempotent_and_removal_is_delayed() {
        let field = field();
        let mut set = EntitySet::new(2);
        let id = set.spawn(spec("a", 100.0, 10.0)).unwrap();

        assert!(set.mark_clicked(id, 0.2).is_some());
        assert!(set.mark_clicked(id, 0.2).is_none());
        assert!(!set.is_token_live("a"));

        // Frozen while showing feedback
        set.advance(0.05, &field);
        assert_eq!(set.get(id).unwrap().pos.y, 100.0);
        set.advance(0.1, &field);
        assert!(set.get(id).is_some());
        set.advance(0.1, &field);
        assert!(set.get(id).is_none());
        assert!(set.mark_clicked(id, 0.2).is_none());
    }

    #[test]
    fn test_empty_set_ticks_quietly() {
        let mut set = EntitySet::new(3);
        assert!(set.advance(0.016, &field()).is_empty());
        assert!(set.mark_clicked(42, 0.2).is_none());
    }
}
