//! Fixed timestep simulation tick
//!
//! Advances one engine by one frame: pause handling, the initial fill on
//! entering `Active`, clicks (player or autoplay), motion and exits, then
//! field maintenance.

use rand::Rng;

use super::engine::Engine;
use super::state::{EntityId, GameEvent, GamePhase};
use crate::consts::MAX_FRAME_DT;
use crate::tokens_match;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Entities clicked this frame, resolved in order
    pub clicks: Vec<EntityId>,
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - the engine plays itself
    pub idle_mode: bool,
}

/// Advance the engine by one timestep and return the events it produced
pub fn tick(engine: &mut Engine, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    if input.pause {
        engine.paused = !engine.paused;
        log::debug!("Pause toggled: paused={}", engine.paused);
    }
    if engine.paused {
        return Vec::new();
    }

    // Non-finite deltas count as zero
    let dt = if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_DT) } else { 0.0 };
    engine.clock += dt;

    // First tick after a load performs the initial fill
    if engine.phase == GamePhase::Loading {
        engine.phase = GamePhase::Active;
        let batch = engine.settings.initial_batch;
        let spawned = engine.maintain_with_batch(batch);
        log::debug!("Initial fill spawned {spawned} entities");
    }

    for &id in &input.clicks {
        engine.resolve_click(id);
    }
    let auto_click = if input.idle_mode {
        autoplay_pick(engine, dt)
    } else {
        None
    };
    if let Some(id) = auto_click {
        engine.resolve_click(id);
    }

    let exited = engine.entities.advance(dt, &engine.field);
    if engine.phase == GamePhase::Active {
        for entity in exited {
            if entity.is_required && engine.tracker.is_still_needed(&entity.token) {
                log::debug!("Required token '{}' (#{}) left the field", entity.token, entity.id);
                engine.events.push(GameEvent::Miss {
                    entity: entity.id,
                    token: entity.token,
                    progress: engine.tracker.counters(),
                });
            }
        }
    }

    engine.spawn_cooldown = (engine.spawn_cooldown - dt).max(0.0);
    engine.maintain();

    engine.drain_events()
}

/// Pick the entity the autoplayer clicks this frame, if any
///
/// Waits `autoplay_click_interval_secs` between clicks. With probability
/// `autoplay_mistake_rate` a visible decoy is chosen instead; otherwise the
/// needed token closest to the bottom edge.
fn autoplay_pick(engine: &mut Engine, dt: f32) -> Option<EntityId> {
    if engine.phase != GamePhase::Active {
        return None;
    }
    engine.autoplay_cooldown -= dt;
    if engine.autoplay_cooldown > 0.0 {
        return None;
    }

    let field = engine.field;
    let visible: Vec<(EntityId, &str, f32)> = engine
        .entities
        .unresolved()
        .filter(|e| field.is_visible(e.pos))
        .map(|e| (e.id, e.token.as_str(), e.pos.y))
        .collect();
    if visible.is_empty() {
        return None;
    }

    let mistake_rate = engine.settings.autoplay_mistake_rate.clamp(0.0, 1.0) as f64;
    let make_mistake = mistake_rate > 0.0 && engine.rng.random_bool(mistake_rate);
    let tracker = &engine.tracker;

    let pick = if make_mistake {
        let wrong: Vec<EntityId> = visible
            .iter()
            .filter(|(_, token, _)| !tracker.is_still_needed(token))
            .map(|(id, _, _)| *id)
            .collect();
        if wrong.is_empty() {
            None
        } else {
            Some(wrong[engine.rng.random_range(0..wrong.len())])
        }
    } else {
        let wanted: Vec<&str> = if tracker.enforce_sequence() {
            tracker.next_expected().into_iter().collect()
        } else {
            tracker.remaining_tokens()
        };
        visible
            .iter()
            .filter(|(_, token, _)| wanted.iter().any(|w| tokens_match(w, token)))
            .max_by(|a, b| a.2.partial_cmp(&b.2).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(id, _, _)| *id)
    };

    if pick.is_some() {
        engine.autoplay_cooldown = engine.settings.autoplay_click_interval_secs;
    }
    pick
}
