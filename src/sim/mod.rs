//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod engine;
pub mod lifecycle;
pub mod placement;
pub mod pool;
pub mod progress;
pub mod scheduler;
pub mod state;
pub mod tick;

pub use engine::Engine;
pub use lifecycle::{Entity, EntitySet, SpawnSpec};
pub use placement::{Placement, find_spawn_position, is_clear};
pub use pool::{decoy_pool, generate_candidates};
pub use progress::{ProgressEvent, ProgressState, ProgressTracker};
pub use scheduler::{SpawnPolicy, SpawnReason, SpawnRequest, plan};
pub use state::{
    Challenge, ClickOutcome, EntityId, Field, GameEvent, GamePhase, ProgressCounters, Snapshot,
};
pub use tick::{TickInput, tick};
