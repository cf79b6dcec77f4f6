//! The Word Blast engine
//!
//! One engine instance runs one puzzle at a time. It owns the live entity set
//! and the progress tracker, and wires the pool generator, placement solver
//! and spawn scheduler together. The per-frame entry point lives in `tick.rs`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::lifecycle::{EntitySet, SpawnSpec};
use super::placement::find_spawn_position;
use super::pool::decoy_pool;
use super::progress::{ProgressEvent, ProgressState, ProgressTracker};
use super::scheduler::{self, SpawnPolicy, SpawnReason};
use super::state::{Challenge, ClickOutcome, EntityId, Field, GameEvent, GamePhase, Snapshot};
use crate::corpus::{DecoyCorpus, canonical_language};
use crate::error::ConfigError;
use crate::settings::{Difficulty, Settings};
use crate::theme::{ThemeId, ThemeSkin};

#[derive(Debug, Clone)]
pub struct Engine {
    pub(super) settings: Settings,
    pub(super) field: Field,
    pub(super) policy: SpawnPolicy,
    pub(super) theme: ThemeId,
    pub(super) difficulty: Difficulty,
    pub(super) language: String,
    pub(super) corpus: DecoyCorpus,
    pub(super) seed: u64,
    pub(super) rng: Pcg32,

    pub(super) phase: GamePhase,
    pub(super) paused: bool,
    /// Simulated seconds since construction (paused time excluded)
    pub(super) clock: f32,

    pub(super) challenge: Option<Challenge>,
    /// Full challenge set, source of cross-sentence decoys
    pub(super) challenge_set: Vec<Challenge>,
    pub(super) decoy_pool: Vec<String>,
    pub(super) entities: EntitySet,
    pub(super) tracker: ProgressTracker,

    /// Seconds until the next density spawn is allowed
    pub(super) spawn_cooldown: f32,
    /// Seconds until the autoplayer may click again
    pub(super) autoplay_cooldown: f32,
    pub(super) events: Vec<GameEvent>,
}

impl Engine {
    /// Build an engine, failing fast on unusable configuration
    pub fn new(
        settings: Settings,
        theme: ThemeId,
        difficulty: Difficulty,
        language: &str,
        corpus: &DecoyCorpus,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;
        corpus.require(language)?;

        log::info!(
            "Engine created: theme={}, difficulty={}, language={}, seed={}",
            theme.as_str(),
            difficulty.as_str(),
            language,
            seed
        );

        Ok(Self {
            field: Field::from_settings(&settings),
            policy: SpawnPolicy::from_settings(&settings),
            entities: EntitySet::new(settings.max_active),
            tracker: ProgressTracker::new(settings.enforce_sequence),
            settings,
            theme,
            difficulty,
            language: canonical_language(language),
            corpus: corpus.clone(),
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Idle,
            paused: false,
            clock: 0.0,
            challenge: None,
            challenge_set: Vec::new(),
            decoy_pool: Vec::new(),
            spawn_cooldown: 0.0,
            autoplay_cooldown: 0.0,
            events: Vec::new(),
        })
    }

    /// Engine using the built-in corpus and the theme's gameplay preset
    pub fn for_theme(
        theme: ThemeId,
        difficulty: Difficulty,
        language: &str,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        Self::new(
            Settings::for_theme(theme),
            theme,
            difficulty,
            language,
            DecoyCorpus::builtin(),
            seed,
        )
    }

    /// Provide the full challenge set for cross-sentence decoys
    pub fn set_challenge_set(&mut self, challenges: Vec<Challenge>) {
        self.challenge_set = challenges;
    }

    /// Issue a new challenge, replacing the current one
    ///
    /// Unplayable challenges are rejected and leave the running puzzle alone.
    pub fn load_challenge(&mut self, challenge: Challenge) -> bool {
        if !challenge.is_playable() {
            log::warn!("Rejected challenge '{}': no usable required tokens", challenge.id);
            return false;
        }

        self.entities.clear();
        self.tracker.reset(&challenge);
        self.decoy_pool = decoy_pool(
            &challenge,
            &self.challenge_set,
            self.difficulty,
            &self.language,
            &self.corpus,
            &self.settings,
            &mut self.rng,
        );
        self.spawn_cooldown = 0.0;
        self.autoplay_cooldown = self.settings.autoplay_click_interval_secs;
        self.phase = GamePhase::Loading;

        log::info!(
            "Challenge '{}' loaded: {} required tokens, {} decoys",
            challenge.id,
            challenge.required_tokens.len(),
            self.decoy_pool.len()
        );
        self.challenge = Some(challenge);
        true
    }

    /// Resolve a click on an entity
    ///
    /// Only the first click on a live entity of an active puzzle has an
    /// outcome; everything else is a no-op returning `None`.
    pub fn resolve_click(&mut self, id: EntityId) -> Option<ClickOutcome> {
        if self.phase != GamePhase::Active || self.paused {
            return None;
        }
        let entity = self
            .entities
            .mark_clicked(id, self.settings.click_feedback_secs)?;
        let outcome = self.tracker.classify(&entity.token);

        match outcome {
            ClickOutcome::CorrectInSequence => {
                let completed = self.tracker.on_correct_in_sequence(&entity.token);
                self.events.push(GameEvent::CorrectInSequence {
                    entity: id,
                    token: entity.token.clone(),
                    progress: self.tracker.counters(),
                });
                if completed == Some(ProgressEvent::ChallengeComplete) {
                    self.complete_challenge(entity.token);
                }
            }
            ClickOutcome::CorrectOutOfSequence => {
                if let ProgressEvent::SequenceWarning { expected } =
                    self.tracker.on_correct_out_of_sequence(&entity.token)
                {
                    self.events.push(GameEvent::CorrectOutOfSequence {
                        entity: id,
                        token: entity.token,
                        expected,
                        progress: self.tracker.counters(),
                    });
                }
            }
            ClickOutcome::Incorrect => {
                self.tracker.on_incorrect();
                self.events.push(GameEvent::Incorrect {
                    entity: id,
                    token: entity.token,
                    progress: self.tracker.counters(),
                });
            }
        }
        Some(outcome)
    }

    fn complete_challenge(&mut self, last_token: String) {
        let challenge_id = self
            .challenge
            .as_ref()
            .map(|c| c.id.clone())
            .unwrap_or_default();
        log::info!("Challenge '{}' complete at t={:.2}s", challenge_id, self.clock);
        self.events.push(GameEvent::ChallengeComplete {
            challenge_id,
            token: last_token,
            progress: self.tracker.counters(),
        });
        self.phase = GamePhase::Complete;
    }

    /// Top up the field. Returns the number of entities spawned.
    ///
    /// Forward-progress spawns always run; density spawns wait for the
    /// spawn cooldown.
    pub fn maintain(&mut self) -> usize {
        let batch = self.settings.spawn_batch;
        self.maintain_with_batch(batch)
    }

    pub(super) fn maintain_with_batch(&mut self, batch: usize) -> usize {
        if self.phase != GamePhase::Active || self.paused {
            return 0;
        }
        let Some(challenge) = self.challenge.as_ref() else {
            return 0;
        };
        let budget = batch.min(self.entities.free_slots());
        if budget == 0 {
            return 0;
        }

        let plan = scheduler::plan(
            &self.entities,
            &self.tracker,
            challenge,
            &self.decoy_pool,
            &self.policy,
            budget,
            self.spawn_cooldown <= 0.0,
            &mut self.rng,
        );

        let mut spawned = 0;
        for request in plan {
            let placement = find_spawn_position(
                &self.entities.positions(),
                &self.field,
                self.settings.min_separation,
                self.settings.max_placement_attempts,
                &mut self.rng,
            );
            let spec = self.roll_spawn_spec(request.token, request.is_required, placement.position);
            if self.entities.spawn(spec).is_some() {
                spawned += 1;
                if request.reason == SpawnReason::Density {
                    self.spawn_cooldown = self.settings.spawn_interval_secs;
                }
            }
        }
        spawned
    }

    /// Spawn a token at a fixed position, bypassing the scheduler
    ///
    /// `is_required` is derived from the current challenge. Rejected when no
    /// challenge is loaded or the field is at capacity.
    pub fn spawn_at(&mut self, token: &str, pos: Vec2) -> Option<EntityId> {
        let is_required = self.challenge.as_ref()?.requires(token);
        let spec = self.roll_spawn_spec(token.to_string(), is_required, pos);
        self.entities.spawn(spec)
    }

    fn roll_spawn_spec(&mut self, token: String, is_required: bool, pos: Vec2) -> SpawnSpec {
        let s = &self.settings;
        let drift = if s.drift_max > 0.0 {
            self.rng.random_range(-s.drift_max..=s.drift_max)
        } else {
            0.0
        };
        let rotation_speed = if s.rotation_speed_max > 0.0 {
            self.rng.random_range(-s.rotation_speed_max..=s.rotation_speed_max)
        } else {
            0.0
        };
        SpawnSpec {
            token,
            is_required,
            pos,
            vertical_speed: self.rng.random_range(s.fall_speed_min..=s.fall_speed_max),
            drift,
            scale: self.rng.random_range(s.scale_min..=s.scale_max),
            rotation_speed,
            spawn_time: self.clock,
        }
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Read-only view for the presentation layer
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            paused: self.paused,
            theme: self.theme,
            clock: self.clock,
            challenge_id: self.challenge.as_ref().map(|c| c.id.clone()),
            prompt: self.challenge.as_ref().map(|c| c.prompt.clone()),
            progress: self.tracker.state().clone(),
            entities: self.entities.iter().cloned().collect(),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn challenge(&self) -> Option<&Challenge> {
        self.challenge.as_ref()
    }

    pub fn progress(&self) -> &ProgressState {
        self.tracker.state()
    }

    pub fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }

    pub fn entities(&self) -> &EntitySet {
        &self.entities
    }

    pub fn decoy_pool(&self) -> &[String] {
        &self.decoy_pool
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn theme(&self) -> ThemeId {
        self.theme
    }

    pub fn skin(&self) -> ThemeSkin {
        self.theme.skin()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn clock(&self) -> f32 {
        self.clock
    }
}
