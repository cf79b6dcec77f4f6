//! Per-language decoy corpus
//!
//! Static word lists used to pad the candidate pool when the challenge set is
//! too small to supply enough cross-sentence decoys. Loaded once per process.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::error::ConfigError;

const SPANISH: &[&str] = &[
    "el", "la", "los", "las", "un", "una", "y", "pero", "porque", "muy", "también", "siempre",
    "nunca", "casa", "perro", "gato", "libro", "mesa", "escuela", "amigo", "familia", "ciudad",
    "tengo", "tienes", "es", "son", "estoy", "vamos", "comer", "beber", "hablar", "vivir",
    "grande", "pequeño", "bonito", "rojo", "azul", "hoy", "mañana", "ayer", "aquí", "allí",
];

const FRENCH: &[&str] = &[
    "le", "la", "les", "un", "une", "et", "mais", "parce", "très", "aussi", "toujours",
    "jamais", "maison", "chien", "chat", "livre", "table", "école", "ami", "famille", "ville",
    "j'ai", "tu", "est", "sont", "suis", "allons", "manger", "boire", "parler", "vivre",
    "grand", "petit", "joli", "rouge", "bleu", "aujourd'hui", "demain", "hier", "ici", "là",
];

const GERMAN: &[&str] = &[
    "der", "die", "das", "ein", "eine", "und", "aber", "weil", "sehr", "auch", "immer", "nie",
    "Haus", "Hund", "Katze", "Buch", "Tisch", "Schule", "Freund", "Familie", "Stadt", "habe",
    "hast", "ist", "sind", "bin", "gehen", "essen", "trinken", "sprechen", "wohnen", "groß",
    "klein", "schön", "rot", "blau", "heute", "morgen", "gestern", "hier", "dort",
];

const ENGLISH: &[&str] = &[
    "the", "a", "an", "and", "but", "because", "very", "also", "always", "never", "house",
    "dog", "cat", "book", "table", "school", "friend", "family", "city", "have", "has", "is",
    "are", "am", "go", "eat", "drink", "speak", "live", "big", "small", "pretty", "red",
    "blue", "today", "tomorrow", "yesterday", "here", "there",
];

/// Language tag -> decoy words
#[derive(Debug, Clone, Default)]
pub struct DecoyCorpus {
    words: BTreeMap<String, Vec<String>>,
}

impl DecoyCorpus {
    /// Empty corpus, for callers that supply their own lists
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide built-in corpus (Spanish, French, German, English)
    pub fn builtin() -> &'static DecoyCorpus {
        static BUILTIN: OnceLock<DecoyCorpus> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            let corpus = DecoyCorpus::new()
                .with_language("es", SPANISH.iter().copied())
                .with_language("fr", FRENCH.iter().copied())
                .with_language("de", GERMAN.iter().copied())
                .with_language("en", ENGLISH.iter().copied());
            log::debug!("Built-in decoy corpus loaded ({} languages)", corpus.words.len());
            corpus
        })
    }

    /// Add (or replace) the word list for a language
    pub fn with_language<I, S>(mut self, tag: &str, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.words
            .insert(canonical_language(tag), words.into_iter().map(Into::into).collect());
        self
    }

    /// Word list for a language tag, if present
    pub fn words(&self, tag: &str) -> Option<&[String]> {
        self.words.get(&canonical_language(tag)).map(Vec::as_slice)
    }

    /// Languages with a word list
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.words.keys().map(String::as_str)
    }

    /// Fail unless the language has a non-empty list
    pub fn require(&self, tag: &str) -> Result<&[String], ConfigError> {
        match self.words(tag) {
            None => Err(ConfigError::UnknownLanguage(tag.to_string())),
            Some([]) => Err(ConfigError::EmptyCorpus(tag.to_string())),
            Some(words) => Ok(words),
        }
    }
}

/// Map long language names onto short tags
pub fn canonical_language(tag: &str) -> String {
    let tag = tag.trim().to_lowercase();
    match tag.as_str() {
        "spanish" | "español" | "es-es" => "es".to_string(),
        "french" | "français" | "fr-fr" => "fr".to_string(),
        "german" | "deutsch" | "de-de" => "de".to_string(),
        "english" | "en-gb" | "en-us" => "en".to_string(),
        _ => tag,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_resolves_long_names() {
        let corpus = DecoyCorpus::builtin();
        assert_eq!(corpus.words("Spanish"), corpus.words("es"));
        assert!(corpus.words("french").is_some_and(|w| !w.is_empty()));
        assert_eq!(corpus.languages().count(), 4);
    }

    #[test]
    fn test_require_distinguishes_unknown_and_empty() {
        let corpus = DecoyCorpus::new().with_language("it", Vec::<String>::new());
        assert_eq!(
            corpus.require("it"),
            Err(ConfigError::EmptyCorpus("it".to_string()))
        );
        assert_eq!(
            corpus.require("pt"),
            Err(ConfigError::UnknownLanguage("pt".to_string()))
        );
    }
}
