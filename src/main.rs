//! Word Blast headless simulation
//!
//! Runs a session with the autoplayer at the fixed timestep and prints every
//! game event as a JSON line, followed by a run summary.

use std::error::Error;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use serde_json::json;

use word_blast::consts::SIM_DT;
use word_blast::corpus::canonical_language;
use word_blast::{
    Challenge, DecoyCorpus, Difficulty, Engine, Session, Settings, ThemeId, TickInput,
    load_challenges,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// classic, temple, pirate, space or tokyo
    #[arg(long, default_value = "classic")]
    theme: String,
    /// beginner, intermediate or advanced
    #[arg(long, default_value = "beginner")]
    difficulty: String,
    /// Target language of the decoy corpus (es, fr, de, en)
    #[arg(long, default_value = "es")]
    language: String,
    #[arg(long)]
    seed: Option<u64>,
    /// JSON array of challenges; built-in demo sentences when absent
    #[arg(long)]
    challenges: Option<PathBuf>,
    /// Settings JSON; the theme preset when absent
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Stop after this much simulated time
    #[arg(long, default_value_t = 300.0)]
    max_seconds: f32,
    /// Override the autoplayer's chance of clicking a decoy
    #[arg(long)]
    mistake_rate: Option<f32>,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("word-blast: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let theme = ThemeId::parse(&cli.theme).ok_or_else(|| format!("unknown theme '{}'", cli.theme))?;
    let difficulty = Difficulty::parse(&cli.difficulty)
        .ok_or_else(|| format!("unknown difficulty '{}'", cli.difficulty))?;
    let seed = cli.seed.unwrap_or_else(now_seed);

    let mut settings = match &cli.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::for_theme(theme),
    };
    if let Some(rate) = cli.mistake_rate {
        settings.autoplay_mistake_rate = rate;
    }

    let challenges = match &cli.challenges {
        Some(path) => load_challenges(path)?,
        None => demo_challenges(&cli.language),
    };
    if challenges.is_empty() {
        return Err("no challenges to play".into());
    }

    let engine = Engine::new(
        settings,
        theme,
        difficulty,
        &cli.language,
        DecoyCorpus::builtin(),
        seed,
    )?;
    log::info!(
        "Word Blast simulation: theme={}, {} challenges, seed={}",
        theme.as_str(),
        challenges.len(),
        seed
    );

    let mut session = Session::new(engine, challenges);
    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let max_ticks = (cli.max_seconds.max(0.0) / SIM_DT).ceil() as u64;

    for _ in 0..max_ticks {
        let challenge_id = session.engine().challenge().map(|c| c.id.clone());
        let events = session.tick(&input, SIM_DT);
        for event in events {
            let line = json!({
                "t": session.engine().clock(),
                "challenge": challenge_id,
                "lives": session.lives(),
                "event": event,
            });
            writeln!(out, "{line}")?;
        }
        if session.is_over() {
            break;
        }
    }

    let summary = json!({
        "summary": {
            "theme": theme,
            "difficulty": difficulty,
            "seed": seed,
            "outcome": session.outcome(),
            "lives": session.lives(),
            "simulated_seconds": session.engine().clock(),
            "challenges_total": session.challenge_count(),
            "stats": session.stats(),
        }
    });
    writeln!(out, "{summary}")?;
    out.flush()?;
    Ok(())
}

fn now_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// A few short sentences per language for demo runs
fn demo_challenges(language: &str) -> Vec<Challenge> {
    let lang = canonical_language(language);
    let sentences: &[(&str, &[&str])] = match lang.as_str() {
        "fr" => &[
            ("I have a cat", &["j'ai", "un", "chat"]),
            ("The house is big", &["la", "maison", "est", "grande"]),
            ("We eat bread", &["nous", "mangeons", "du", "pain"]),
        ],
        "de" => &[
            ("I have a dog", &["ich", "habe", "einen", "hund"]),
            ("The house is big", &["das", "haus", "ist", "groß"]),
            ("We drink water", &["wir", "trinken", "wasser"]),
        ],
        "en" => &[
            ("Tengo un gato", &["i", "have", "a", "cat"]),
            ("La casa es grande", &["the", "house", "is", "big"]),
            ("Bebemos agua", &["we", "drink", "water"]),
        ],
        _ => &[
            ("How are you?", &["como", "estas"]),
            ("I have a black dog", &["tengo", "un", "perro", "negro"]),
            ("My sister eats an apple", &["mi", "hermana", "come", "una", "manzana"]),
            ("We live in a big house", &["vivimos", "en", "una", "casa", "grande"]),
        ],
    };
    sentences
        .iter()
        .enumerate()
        .map(|(i, (prompt, tokens))| {
            Challenge::new(&format!("demo-{}", i + 1), prompt, tokens.iter().copied(), &lang)
        })
        .collect()
}
