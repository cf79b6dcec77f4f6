//! Spawn placement
//!
//! New entities enter above the visible field. A candidate is accepted when it
//! keeps `min_separation` from every live entity; after `max_attempts`
//! rejections the last candidate is used anyway so spawning never blocks.

use glam::Vec2;
use rand::Rng;

use super::state::Field;
use crate::consts::SPAWN_HEADROOM;

/// Result of a placement search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Vec2,
    /// Candidates generated, including the accepted one
    pub attempts: u32,
    /// False when every attempt overlapped and the last candidate was used
    pub clear: bool,
}

/// Whether `candidate` keeps its distance from every live position
#[inline]
pub fn is_clear(candidate: Vec2, live: &[Vec2], min_separation: f32) -> bool {
    live.iter().all(|p| p.distance(candidate) >= min_separation)
}

/// Find a spawn coordinate that does not crowd the live entities
pub fn find_spawn_position<R: Rng + ?Sized>(
    live: &[Vec2],
    field: &Field,
    min_separation: f32,
    max_attempts: u32,
    rng: &mut R,
) -> Placement {
    let (x_min, x_max) = field.x_range();
    let stagger = field.height * 0.25;
    let max_attempts = max_attempts.max(1);

    let mut candidate = Vec2::ZERO;
    for attempt in 1..=max_attempts {
        candidate = Vec2::new(
            rng.random_range(x_min..=x_max),
            -(SPAWN_HEADROOM + rng.random_range(0.0..=stagger)),
        );
        if is_clear(candidate, live, min_separation) {
            return Placement {
                position: candidate,
                attempts: attempt,
                clear: true,
            };
        }
    }

    log::debug!(
        "No clear spawn position after {max_attempts} attempts ({} live), overlapping",
        live.len()
    );
    Placement {
        position: candidate,
        attempts: max_attempts,
        clear: false,
    }
}
