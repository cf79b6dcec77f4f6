//! Spawn scheduling
//!
//! Decides which tokens to inject on a maintenance pass. Selection order:
//! 1. In sequence mode, the next expected token when it is not on screen.
//! 2. Uncollected required tokens until `min_required_on_screen` are showing.
//! 3. Density fill: a weighted mix of needed tokens and fresh decoys, falling
//!    back to reused decoys and then already-collected tokens.
//!
//! A token already live and unclicked is never planned again, so each
//! uncollected required token has at most one clickable entity.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::IndexedRandom;

use super::lifecycle::EntitySet;
use super::progress::ProgressTracker;
use super::state::Challenge;
use crate::normalize_token;
use crate::settings::Settings;

/// Why a token was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnReason {
    NextExpected,
    RequiredFloor,
    Density,
}

/// One planned spawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnRequest {
    pub token: String,
    pub is_required: bool,
    pub reason: SpawnReason,
}

/// Selection knobs taken from `Settings`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPolicy {
    pub min_required_on_screen: usize,
    pub required_ratio: f32,
}

impl SpawnPolicy {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            min_required_on_screen: settings.min_required_on_screen,
            required_ratio: settings.required_ratio,
        }
    }
}

/// Plan up to `budget` spawns
///
/// With `allow_density` false only forward-progress spawns (steps 1 and 2)
/// are planned.
#[allow(clippy::too_many_arguments)]
pub fn plan<R: Rng + ?Sized>(
    entities: &EntitySet,
    tracker: &ProgressTracker,
    challenge: &Challenge,
    decoy_pool: &[String],
    policy: &SpawnPolicy,
    budget: usize,
    allow_density: bool,
    rng: &mut R,
) -> Vec<SpawnRequest> {
    let mut planned: Vec<SpawnRequest> = Vec::new();
    if budget == 0 || tracker.is_complete() {
        return planned;
    }

    // Normalized tokens that are taken for this pass: live + already planned
    let mut taken: HashSet<String> = entities.unresolved().map(|e| normalize_token(&e.token)).collect();

    // Distinct needed tokens, split by whether they are already showing
    let mut needed_seen = HashSet::new();
    let needed: Vec<&str> = tracker
        .remaining_tokens()
        .into_iter()
        .filter(|t| needed_seen.insert(normalize_token(t)))
        .collect();
    let mut needed_on_screen = needed.iter().filter(|t| taken.contains(&normalize_token(t))).count();
    let mut needed_off: Vec<&str> = needed
        .iter()
        .copied()
        .filter(|t| !taken.contains(&normalize_token(t)))
        .collect();

    // 1. The token the player needs right now
    if tracker.enforce_sequence() {
        if let Some(next) = tracker.next_expected() {
            if let Some(idx) = needed_off.iter().position(|t| normalize_token(t) == normalize_token(next)) {
                let token = needed_off.remove(idx);
                push(&mut planned, &mut taken, token, true, SpawnReason::NextExpected);
                needed_on_screen += 1;
            }
        }
    }

    // 2. Keep the floor of needed tokens on screen
    while planned.len() < budget
        && needed_on_screen < policy.min_required_on_screen
        && !needed_off.is_empty()
    {
        let token = needed_off.remove(rng.random_range(0..needed_off.len()));
        push(&mut planned, &mut taken, token, true, SpawnReason::RequiredFloor);
        needed_on_screen += 1;
    }

    if !allow_density {
        return planned;
    }

    // 3. Density fill
    while planned.len() < budget {
        let prefer_needed = !needed_off.is_empty() && rng.random_bool(policy.required_ratio as f64);
        if prefer_needed {
            let token = needed_off.remove(rng.random_range(0..needed_off.len()));
            push(&mut planned, &mut taken, token, true, SpawnReason::Density);
            continue;
        }

        let fresh: Vec<&String> = decoy_pool
            .iter()
            .filter(|d| !taken.contains(&normalize_token(d)))
            .collect();
        if let Some(decoy) = fresh.choose(rng) {
            push(&mut planned, &mut taken, decoy.as_str(), false, SpawnReason::Density);
            continue;
        }

        if !needed_off.is_empty() {
            let token = needed_off.remove(rng.random_range(0..needed_off.len()));
            push(&mut planned, &mut taken, token, true, SpawnReason::Density);
            continue;
        }

        // Out of fresh options: decoys may repeat on screen
        if let Some(decoy) = decoy_pool.choose(rng) {
            push(&mut planned, &mut taken, decoy.as_str(), false, SpawnReason::Density);
            continue;
        }

        // No decoys at all: recycle collected tokens purely for density
        let recycled: Vec<&String> = challenge
            .required_tokens
            .iter()
            .filter(|t| !taken.contains(&normalize_token(t)) && !tracker.is_still_needed(t))
            .collect();
        match recycled.choose(rng) {
            Some(token) => push(&mut planned, &mut taken, token.as_str(), true, SpawnReason::Density),
            None => break,
        }
    }

    planned
}

fn push(
    planned: &mut Vec<SpawnRequest>,
    taken: &mut HashSet<String>,
    token: &str,
    is_required: bool,
    reason: SpawnReason,
) {
    taken.insert(normalize_token(token));
    planned.push(SpawnRequest {
        token: token.to_string(),
        is_required,
        reason,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::lifecycle::SpawnSpec;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn challenge() -> Challenge {
        Challenge::new("c", "I eat a red apple", ["yo", "como", "una", "manzana", "roja"], "es")
    }

    fn tracker(challenge: &Challenge, enforce_sequence: bool) -> ProgressTracker {
        let mut tracker = ProgressTracker::new(enforce_sequence);
        tracker.reset(challenge);
        tracker
    }

    fn decoys() -> Vec<String> {
        ["perro", "gato", "casa", "libro"].iter().map(|s| s.to_string()).collect()
    }

    fn live(set: &mut EntitySet, token: &str, is_required: bool) {
        set.spawn(SpawnSpec {
            token: token.to_string(),
            is_required,
            pos: Vec2::new(600.0, 100.0),
            vertical_speed: 50.0,
            drift: 0.0,
            scale: 1.0,
            rotation_speed: 0.0,
            spawn_time: 0.0,
        });
    }

    fn policy() -> SpawnPolicy {
        SpawnPolicy::from_settings(&Settings::default())
    }

    #[test]
    fn test_next_expected_token_comes_first() {
        let challenge = challenge();
        let tracker = tracker(&challenge, true);
        let set = EntitySet::new(12);
        let mut rng = Pcg32::seed_from_u64(1);
        let plan = plan(&set, &tracker, &challenge, &decoys(), &policy(), 2, true, &mut rng);
        assert_eq!(plan[0].token, "yo");
        assert_eq!(plan[0].reason, SpawnReason::NextExpected);
        assert!(plan[1].is_required);
        assert_eq!(plan[1].reason, SpawnReason::RequiredFloor);
    }

    #[test]
    fn test_floor_is_filled_before_decoys() {
        let challenge = challenge();
        let tracker = tracker(&challenge, true);
        let mut set = EntitySet::new(12);
        for d in decoys() {
            live(&mut set, &d, false);
        }
        let mut rng = Pcg32::seed_from_u64(2);
        let plan = plan(&set, &tracker, &challenge, &decoys(), &policy(), 5, true, &mut rng);
        let required: Vec<_> = plan.iter().filter(|r| r.is_required).collect();
        assert!(required.len() >= 3);
        assert!(plan.iter().take(3).all(|r| r.is_required));
    }

    #[test]
    fn test_never_plans_a_live_token() {
        let challenge = challenge();
        let tracker = tracker(&challenge, false);
        let mut set = EntitySet::new(12);
        live(&mut set, "YO", true);
        live(&mut set, "perro", false);
        for seed in 0..40 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let plan = plan(&set, &tracker, &challenge, &decoys(), &policy(), 6, true, &mut rng);
            let mut seen = HashSet::new();
            for request in &plan {
                let key = normalize_token(&request.token);
                assert_ne!(key, "yo");
                assert!(seen.insert(key), "duplicate in one plan");
            }
        }
    }

    #[test]
    fn test_progress_only_pass_skips_decoys() {
        let challenge = challenge();
        let tracker = tracker(&challenge, true);
        let set = EntitySet::new(12);
        let mut rng = Pcg32::seed_from_u64(3);
        let plan = plan(&set, &tracker, &challenge, &decoys(), &policy(), 10, false, &mut rng);
        assert_eq!(plan.len(), 3);
        assert!(plan.iter().all(|r| r.is_required));
    }

    #[test]
    fn test_exhausted_pools_recycle_collected_tokens() {
        let challenge = Challenge::new("c", "", ["hola", "amigo"], "es");
        let mut tracker = tracker(&challenge, true);
        tracker.on_correct_in_sequence("hola");
        let mut set = EntitySet::new(12);
        live(&mut set, "amigo", true);
        let mut rng = Pcg32::seed_from_u64(4);
        let plan = plan(&set, &tracker, &challenge, &[], &policy(), 3, true, &mut rng);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].token, "hola");
        assert!(plan[0].is_required);
    }

    #[test]
    fn test_decoys_repeat_once_fresh_ones_run_out() {
        let challenge = Challenge::new("c", "", ["hola"], "es");
        let tracker = tracker(&challenge, true);
        let mut set = EntitySet::new(12);
        live(&mut set, "hola", true);
        live(&mut set, "perro", false);
        let pool = vec!["perro".to_string()];
        let mut rng = Pcg32::seed_from_u64(5);
        let plan = plan(&set, &tracker, &challenge, &pool, &policy(), 2, true, &mut rng);
        assert_eq!(plan.len(), 2);
        assert!(plan.iter().all(|r| r.token == "perro" && !r.is_required));
    }

    #[test]
    fn test_complete_puzzle_plans_nothing() {
        let challenge = Challenge::new("c", "", ["hola"], "es");
        let mut tracker = tracker(&challenge, true);
        tracker.on_correct_in_sequence("hola");
        let set = EntitySet::new(12);
        let mut rng = Pcg32::seed_from_u64(6);
        assert!(plan(&set, &tracker, &challenge, &decoys(), &policy(), 4, true, &mut rng).is_empty());
    }
}
