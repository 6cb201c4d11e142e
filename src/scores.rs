//! Scores module - the local high-score store
//!
//! Newline-separated `name:score` records, kept sorted with the highest
//! score first. A missing file is seeded with default entries; any I/O
//! failure is logged and play continues against the in-memory list.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Environment variable overriding the score-file location
pub const SCORES_PATH_ENV: &str = "QUINTRIS_SCORES_PATH";

pub const DEFAULT_SCORES_PATH: &str = "scores.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
}

/// Leaderboard backed by a plain records file
pub struct ScoreStore {
    path: PathBuf,
    entries: Vec<ScoreEntry>,
}

impl ScoreStore {
    /// Load the store, seeding defaults when the file does not exist
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => parse_entries(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let entries = default_entries();
                if let Err(e) = write_entries(&path, &entries) {
                    eprintln!("[scores] could not seed {}: {}", path.display(), e);
                }
                entries
            }
            Err(e) => {
                eprintln!("[scores] could not read {}: {}", path.display(), e);
                Vec::new()
            }
        };
        let mut store = Self { path, entries };
        store.sort();
        store
    }

    /// Load from `QUINTRIS_SCORES_PATH`, or `scores.txt` beside the
    /// working directory
    pub fn open_default() -> Self {
        let path =
            std::env::var(SCORES_PATH_ENV).unwrap_or_else(|_| DEFAULT_SCORES_PATH.to_string());
        Self::open(path)
    }

    /// Entries, highest score first
    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn highest(&self) -> u32 {
        self.entries.first().map(|e| e.score).unwrap_or(0)
    }

    /// Record a finished match. The record is appended to the backing
    /// file; on I/O failure it still lands in the in-memory list.
    pub fn add(&mut self, name: &str, score: u32) {
        let record = format!("{}:{}\n", name, score);
        let appended = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(record.as_bytes()));
        if let Err(e) = appended {
            eprintln!("[scores] could not append to {}: {}", self.path.display(), e);
        }

        self.entries.push(ScoreEntry {
            name: name.to_string(),
            score,
        });
        self.sort();
    }

    fn sort(&mut self) {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
    }
}

fn parse_entries(contents: &str) -> Vec<ScoreEntry> {
    contents
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() {
                return None;
            }
            // Split on the last colon so names containing one survive.
            let (name, score) = line.rsplit_once(':')?;
            let score = score.trim().parse().ok()?;
            Some(ScoreEntry {
                name: name.trim().to_string(),
                score,
            })
        })
        .collect()
}

fn default_entries() -> Vec<ScoreEntry> {
    (0..6)
        .map(|i| ScoreEntry {
            name: "Player".to_string(),
            score: 1000 - i * 100,
        })
        .collect()
}

fn write_entries(path: &Path, entries: &[ScoreEntry]) -> std::io::Result<()> {
    let mut contents = String::new();
    for entry in entries {
        contents.push_str(&entry.name);
        contents.push(':');
        contents.push_str(&entry.score.to_string());
        contents.push('\n');
    }
    fs::write(path, contents)
}
