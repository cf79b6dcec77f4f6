//! Run management on top of the engine
//!
//! A session walks a queue of challenges, loading the next one whenever the
//! current puzzle completes, and ends the run when the queue is exhausted or
//! the player runs out of lives. Lives are lost on wrong clicks and misses.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::STARTING_LIVES;
use crate::error::SettingsError;
use crate::sim::{Challenge, Engine, GameEvent, TickInput, tick};

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// Every playable challenge was completed
    Cleared,
    OutOfLives,
}

/// Counters accumulated over a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub challenges_completed: u32,
    pub tokens_collected: u32,
    pub misses: u32,
    pub incorrect_clicks: u32,
    pub sequence_warnings: u32,
    /// Consecutive correct collections, reset by a mistake or miss
    pub combo: u32,
    pub max_combo: u32,
    pub ticks: u64,
}

#[derive(Debug, Clone)]
pub struct Session {
    engine: Engine,
    challenges: Vec<Challenge>,
    /// Index of the challenge currently loaded
    index: usize,
    lives: u8,
    stats: SessionStats,
    outcome: Option<RunOutcome>,
}

impl Session {
    /// Start a run. Unplayable challenges in the queue are skipped.
    pub fn new(mut engine: Engine, challenges: Vec<Challenge>) -> Self {
        engine.set_challenge_set(challenges.clone());
        let mut session = Self {
            engine,
            challenges,
            index: 0,
            lives: STARTING_LIVES,
            stats: SessionStats::default(),
            outcome: None,
        };
        session.load_from(0);
        session
    }

    /// Load the first playable challenge at or after `start`
    fn load_from(&mut self, start: usize) {
        for i in start..self.challenges.len() {
            if self.engine.load_challenge(self.challenges[i].clone()) {
                self.index = i;
                return;
            }
        }
        self.index = self.challenges.len();
        self.outcome = Some(RunOutcome::Cleared);
        log::info!(
            "Run cleared: {} challenges completed",
            self.stats.challenges_completed
        );
    }

    /// Advance one timestep. Finished runs ignore further ticks.
    pub fn tick(&mut self, input: &TickInput, dt: f32) -> Vec<GameEvent> {
        if self.outcome.is_some() {
            return Vec::new();
        }
        let events = tick(&mut self.engine, input, dt);
        self.stats.ticks += 1;

        let mut completed = false;
        for event in &events {
            match event {
                GameEvent::CorrectInSequence { .. } => {
                    self.stats.tokens_collected += 1;
                    self.stats.combo += 1;
                    self.stats.max_combo = self.stats.max_combo.max(self.stats.combo);
                }
                GameEvent::CorrectOutOfSequence { .. } => {
                    self.stats.sequence_warnings += 1;
                }
                GameEvent::Incorrect { .. } => {
                    self.stats.incorrect_clicks += 1;
                    self.lose_life();
                }
                GameEvent::Miss { .. } => {
                    self.stats.misses += 1;
                    self.lose_life();
                }
                GameEvent::ChallengeComplete { .. } => {
                    self.stats.challenges_completed += 1;
                    completed = true;
                }
            }
        }

        if self.lives == 0 {
            log::info!(
                "Run over: out of lives after {} challenges",
                self.stats.challenges_completed
            );
            self.outcome = Some(RunOutcome::OutOfLives);
        } else if completed {
            self.load_from(self.index + 1);
        }
        events
    }

    fn lose_life(&mut self) {
        self.stats.combo = 0;
        self.lives = self.lives.saturating_sub(1);
        log::debug!("Life lost, {} remaining", self.lives);
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Direct access for callers that resolve clicks outside `tick`
    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn outcome(&self) -> Option<RunOutcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Index of the current challenge in the queue
    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn challenge_count(&self) -> usize {
        self.challenges.len()
    }
}

/// Read a JSON array of challenges
///
/// Entries without an id are numbered by their position in the file.
pub fn load_challenges(path: &Path) -> Result<Vec<Challenge>, SettingsError> {
    let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut challenges: Vec<Challenge> = serde_json::from_str(&json)?;
    for (i, challenge) in challenges.iter_mut().enumerate() {
        if challenge.id.is_empty() {
            challenge.id = format!("challenge-{}", i + 1);
        }
    }
    log::info!("Loaded {} challenges from {}", challenges.len(), path.display());
    Ok(challenges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::settings::{Difficulty, Settings};
    use crate::sim::GamePhase;
    use crate::theme::ThemeId;
    use crate::DecoyCorpus;

    fn engine(mistake_rate: f32, seed: u64) -> Engine {
        let settings = Settings {
            autoplay_mistake_rate: mistake_rate,
            ..Settings::default()
        };
        Engine::new(
            settings,
            ThemeId::Classic,
            Difficulty::Beginner,
            "es",
            DecoyCorpus::builtin(),
            seed,
        )
        .unwrap()
    }

    fn queue() -> Vec<Challenge> {
        vec![
            Challenge::new("a", "How are you?", ["como", "estas"], "es"),
            Challenge::new("b", "Hello friend", ["hola", "amigo"], "es"),
        ]
    }

    #[test]
    fn test_autoplay_clears_the_queue() {
        let mut session = Session::new(engine(0.0, 1), queue());
        let idle = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..(60 * 240) {
            session.tick(&idle, SIM_DT);
            if session.is_over() {
                break;
            }
        }
        assert_eq!(session.outcome(), Some(RunOutcome::Cleared));
        assert_eq!(session.stats().challenges_completed, 2);
        assert_eq!(session.stats().tokens_collected, 4);
        assert_eq!(session.stats().incorrect_clicks, 0);
        assert!(session.stats().max_combo >= 2);

        // Finished runs are inert
        assert!(session.tick(&idle, SIM_DT).is_empty());
    }

    #[test]
    fn test_wrong_clicks_cost_lives() {
        let mut session = Session::new(engine(0.0, 2), queue());
        session.tick(&TickInput::default(), SIM_DT);

        let decoys: Vec<_> = session
            .engine()
            .entities()
            .unresolved()
            .filter(|e| !e.is_required)
            .map(|e| e.id)
            .collect();
        assert!(decoys.len() >= 3);

        let input = TickInput {
            clicks: decoys[..2].to_vec(),
            ..Default::default()
        };
        session.tick(&input, SIM_DT);
        assert_eq!(session.lives(), STARTING_LIVES - 2);
        assert!(!session.is_over());

        let input = TickInput {
            clicks: vec![decoys[2]],
            ..Default::default()
        };
        session.tick(&input, SIM_DT);
        assert_eq!(session.lives(), 0);
        assert_eq!(session.outcome(), Some(RunOutcome::OutOfLives));
        assert_eq!(session.stats().incorrect_clicks, 3);
    }

    #[test]
    fn test_unplayable_challenges_are_skipped() {
        let challenges = vec![
            Challenge::new("empty", "", Vec::<String>::new(), "es"),
            Challenge::new("ok", "Hello", ["hola"], "es"),
        ];
        let session = Session::new(engine(0.0, 3), challenges);
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.engine().phase(), GamePhase::Loading);
        assert_eq!(session.engine().challenge().map(|c| c.id.as_str()), Some("ok"));
    }

    #[test]
    fn test_empty_queue_is_cleared_immediately() {
        let session = Session::new(engine(0.0, 4), Vec::new());
        assert_eq!(session.outcome(), Some(RunOutcome::Cleared));
        assert_eq!(session.engine().phase(), GamePhase::Idle);
    }

    #[test]
    fn test_challenge_file_round_trip() {
        let path = std::env::temp_dir().join(format!("word_blast_challenges_{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"[{"english": "How are you?", "words": ["como", "estas"], "targetLanguage": "spanish"}]"#,
        )
        .unwrap();
        let challenges = load_challenges(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(challenges.len(), 1);
        assert_eq!(challenges[0].id, "challenge-1");
        assert_eq!(challenges[0].required_tokens, vec!["como", "estas"]);
    }

    #[test]
    fn test_missing_challenge_file_is_an_io_error() {
        let err = load_challenges(Path::new("/nonexistent/word_blast.json")).unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }));
    }
}
