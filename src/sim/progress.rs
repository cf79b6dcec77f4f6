//! Puzzle progress tracking
//!
//! Tracks which required tokens have been collected. In sequence mode tokens
//! must be collected in sentence order; otherwise any still-needed token
//! counts. Duplicate tokens in a sentence ("the ... the") are tracked by
//! multiplicity.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::state::{Challenge, ClickOutcome, ProgressCounters};
use crate::{normalize_token, tokens_match};

/// Collected-token state for the current challenge
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    /// Collected tokens, as authored in the challenge
    pub collected_tokens: Vec<String>,
    /// Always equals `collected_tokens.len()`
    pub next_required_index: usize,
    pub is_complete: bool,
}

/// Tracker-level signals, translated into `GameEvent`s by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    ChallengeComplete,
    SequenceWarning { expected: Option<String> },
    IncorrectClick,
}

#[derive(Debug, Clone)]
pub struct ProgressTracker {
    required: Vec<String>,
    enforce_sequence: bool,
    state: ProgressState,
}

impl ProgressTracker {
    pub fn new(enforce_sequence: bool) -> Self {
        Self {
            required: Vec::new(),
            enforce_sequence,
            state: ProgressState::default(),
        }
    }

    /// Start tracking a new challenge
    pub fn reset(&mut self, challenge: &Challenge) {
        self.required = challenge.required_tokens.clone();
        self.state = ProgressState::default();
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    pub fn required(&self) -> &[String] {
        &self.required
    }

    pub fn enforce_sequence(&self) -> bool {
        self.enforce_sequence
    }

    pub fn is_complete(&self) -> bool {
        self.state.is_complete
    }

    pub fn counters(&self) -> ProgressCounters {
        ProgressCounters {
            collected: self.state.next_required_index,
            required: self.required.len(),
        }
    }

    /// The token the puzzle wants next (first remaining one in unordered mode)
    pub fn next_expected(&self) -> Option<&str> {
        if self.state.is_complete {
            return None;
        }
        if self.enforce_sequence {
            self.required.get(self.state.next_required_index).map(String::as_str)
        } else {
            self.remaining_tokens().into_iter().next()
        }
    }

    /// Required tokens not yet collected, in sentence order
    ///
    /// In sequence mode this is exactly `required[next_required_index..]`.
    pub fn remaining_tokens(&self) -> Vec<&str> {
        let mut skip: HashMap<String, usize> = HashMap::new();
        for token in &self.state.collected_tokens {
            *skip.entry(normalize_token(token)).or_default() += 1;
        }
        self.required
            .iter()
            .filter(|token| match skip.get_mut(&normalize_token(token)) {
                Some(n) if *n > 0 => {
                    *n -= 1;
                    false
                }
                _ => true,
            })
            .map(String::as_str)
            .collect()
    }

    /// Whether collecting `token` would still move the puzzle forward
    pub fn is_still_needed(&self, token: &str) -> bool {
        let wanted = self.required.iter().filter(|t| tokens_match(t, token)).count();
        let have = self
            .state
            .collected_tokens
            .iter()
            .filter(|t| tokens_match(t, token))
            .count();
        wanted > have
    }

    /// Decide what a click on `token` means right now
    pub fn classify(&self, token: &str) -> ClickOutcome {
        if self.state.is_complete || !self.is_still_needed(token) {
            return ClickOutcome::Incorrect;
        }
        if !self.enforce_sequence {
            return ClickOutcome::CorrectInSequence;
        }
        match self.next_expected() {
            Some(next) if tokens_match(next, token) => ClickOutcome::CorrectInSequence,
            _ => ClickOutcome::CorrectOutOfSequence,
        }
    }

    /// Collect the next token. Emits `ChallengeComplete` on the last one.
    ///
    /// A token that does not qualify as in-sequence is ignored.
    pub fn on_correct_in_sequence(&mut self, token: &str) -> Option<ProgressEvent> {
        if self.classify(token) != ClickOutcome::CorrectInSequence {
            log::warn!("Ignoring out-of-turn collection of '{token}'");
            return None;
        }

        let authored = if self.enforce_sequence {
            self.required[self.state.next_required_index].clone()
        } else {
            self.remaining_tokens()
                .into_iter()
                .find(|t| tokens_match(t, token))
                .unwrap_or(token)
                .to_string()
        };

        self.state.collected_tokens.push(authored);
        self.state.next_required_index += 1;

        if self.state.next_required_index == self.required.len() {
            self.state.is_complete = true;
            return Some(ProgressEvent::ChallengeComplete);
        }
        None
    }

    /// A needed token clicked early. Progress does not move.
    pub fn on_correct_out_of_sequence(&mut self, _token: &str) -> ProgressEvent {
        ProgressEvent::SequenceWarning {
            expected: self.next_expected().map(str::to_string),
        }
    }

    /// A decoy (or no-longer-needed token) was clicked. Progress does not move.
    pub fn on_incorrect(&mut self) -> ProgressEvent {
        ProgressEvent::IncorrectClick
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn challenge(tokens: &[&str]) -> Challenge {
        Challenge::new("t", "", tokens.iter().copied(), "es")
    }

    fn tracker(tokens: &[&str], enforce_sequence: bool) -> ProgressTracker {
        let mut tracker = ProgressTracker::new(enforce_sequence);
        tracker.reset(&challenge(tokens));
        tracker
    }

    #[test]
    fn test_in_order_collection_completes() {
        let mut t = tracker(&["como", "estas"], true);
        assert_eq!(t.classify("COMO"), ClickOutcome::CorrectInSequence);
        assert_eq!(t.on_correct_in_sequence("COMO"), None);
        assert_eq!(t.state().collected_tokens, vec!["como"]);
        assert_eq!(t.on_correct_in_sequence("estas"), Some(ProgressEvent::ChallengeComplete));
        assert!(t.is_complete());
        assert_eq!(t.counters(), ProgressCounters { collected: 2, required: 2 });
        assert_eq!(t.next_expected(), None);
    }

    #[test]
    fn test_early_token_is_out_of_sequence_and_does_not_advance() {
        let mut t = tracker(&["yo", "tengo", "un", "perro"], true);
        assert_eq!(t.classify("perro"), ClickOutcome::CorrectOutOfSequence);
        assert_eq!(
            t.on_correct_out_of_sequence("perro"),
            ProgressEvent::SequenceWarning { expected: Some("yo".to_string()) }
        );
        assert_eq!(t.state().next_required_index, 0);
        assert_eq!(t.on_correct_in_sequence("perro"), None);
        assert_eq!(t.state().next_required_index, 0);
    }

    #[test]
    fn test_decoys_and_collected_tokens_are_incorrect() {
        let mut t = tracker(&["hola", "amigo"], true);
        assert_eq!(t.classify("gato"), ClickOutcome::Incorrect);
        t.on_correct_in_sequence("hola");
        assert_eq!(t.classify("hola"), ClickOutcome::Incorrect);
        assert_eq!(t.on_incorrect(), ProgressEvent::IncorrectClick);
        assert_eq!(t.state().next_required_index, 1);
    }

    #[test]
    fn test_unordered_mode_accepts_any_needed_token() {
        let mut t = tracker(&["el", "gato", "negro"], false);
        assert_eq!(t.classify("negro"), ClickOutcome::CorrectInSequence);
        t.on_correct_in_sequence("negro");
        t.on_correct_in_sequence("el");
        assert_eq!(t.remaining_tokens(), vec!["gato"]);
        assert_eq!(t.on_correct_in_sequence("gato"), Some(ProgressEvent::ChallengeComplete));
    }

    #[test]
    fn test_repeated_tokens_need_collecting_twice() {
        let mut t = tracker(&["la", "casa", "la"], true);
        t.on_correct_in_sequence("la");
        assert!(t.is_still_needed("la"));
        assert_eq!(t.classify("la"), ClickOutcome::CorrectOutOfSequence);
        t.on_correct_in_sequence("casa");
        assert_eq!(t.remaining_tokens(), vec!["la"]);
        assert_eq!(t.on_correct_in_sequence("la"), Some(ProgressEvent::ChallengeComplete));
        assert!(!t.is_still_needed("la"));
    }

    #[test]
    fn test_reset_clears_progress() {
        let mut t = tracker(&["uno"], true);
        t.on_correct_in_sequence("uno");
        t.reset(&challenge(&["dos", "tres"]));
        assert_eq!(t.state(), &ProgressState::default());
        assert_eq!(t.next_expected(), Some("dos"));
    }

    proptest! {
        #[test]
        fn test_index_only_moves_forward_and_matches_collected(
            clicks in proptest::collection::vec(0usize..6, 0..40),
            enforce_sequence in any::<bool>(),
        ) {
            let words = ["yo", "como", "una", "manzana", "roja", "gato"];
            let mut t = tracker(&words[..5], enforce_sequence);
            let mut last = 0;
            for i in clicks {
                let token = words[i];
                let before = t.state().next_required_index;
                let outcome = t.classify(token);
                match outcome {
                    ClickOutcome::CorrectInSequence => { t.on_correct_in_sequence(token); }
                    ClickOutcome::CorrectOutOfSequence => { t.on_correct_out_of_sequence(token); }
                    ClickOutcome::Incorrect => { t.on_incorrect(); }
                }
                let after = t.state().next_required_index;
                prop_assert!(after >= last);
                if outcome != ClickOutcome::CorrectInSequence {
                    prop_assert_eq!(after, before);
                }
                prop_assert_eq!(t.state().collected_tokens.len(), after);
                prop_assert_eq!(t.state().is_complete, after == 5);
                last = after;
            }
            if t.is_complete() && enforce_sequence {
                prop_assert_eq!(&t.state().collected_tokens[..], &words[..5]);
            }
        }
    }
}
