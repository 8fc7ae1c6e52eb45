use chrono::{Duration, SecondsFormat, Utc};
use include_dir::{include_dir, Dir};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Deserialize;
use std::path::Path;

use crate::error::SourceError;
use crate::validator::is_spellable;
use crate::word_source::{Word, WordSource};

static WORDS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/words");

/// A word is offered again by [`WordSource::random_word`] only after this long
const REUSE_AFTER_MINUTES: i64 = 5;

#[derive(Deserialize, Debug)]
struct SeedList {
    #[allow(dead_code)]
    name: String,
    words: Vec<SeedWord>,
}

#[derive(Deserialize, Debug)]
struct SeedWord {
    word: String,
    category: String,
    #[serde(default = "default_difficulty")]
    difficulty: u32,
}

fn default_difficulty() -> u32 {
    1
}

fn read_seed_words() -> Result<Vec<(Word, u32)>, SourceError> {
    let file = WORDS_DIR
        .get_file("seed.json")
        .ok_or_else(|| SourceError::Backend("seed word list not bundled".into()))?;
    let text = file
        .contents_utf8()
        .ok_or_else(|| SourceError::Backend("seed word list is not utf-8".into()))?;
    let seed: SeedList =
        serde_json::from_str(text).map_err(|e| SourceError::Backend(e.to_string()))?;

    Ok(seed
        .words
        .into_iter()
        .map(|s| (Word::new(&s.word, &s.category), s.difficulty))
        .collect())
}

/// SQLite-backed word catalog, seeded with the starter list on first use
#[derive(Debug)]
pub struct SqliteCatalog {
    conn: Connection,
}

impl SqliteCatalog {
    /// Open (or create) the catalog database at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SourceError::Backend(format!("Failed to create directory: {e}"))
            })?;
        }
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, SourceError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, SourceError> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS words (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                word TEXT NOT NULL,
                category TEXT NOT NULL,
                difficulty INTEGER NOT NULL
            )
            "#,
            [],
        )?;

        // Tracks when a word was last handed out by random_word
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS used_words (
                word_id INTEGER PRIMARY KEY,
                last_used TEXT NOT NULL,
                FOREIGN KEY (word_id) REFERENCES words(id)
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_words_category ON words(category)",
            [],
        )?;

        let mut catalog = SqliteCatalog { conn };
        if catalog.word_count()? == 0 {
            catalog.seed()?;
        }
        Ok(catalog)
    }

    fn seed(&mut self) -> Result<(), SourceError> {
        let words = read_seed_words()?;
        let tx = self.conn.transaction()?;
        for (word, difficulty) in &words {
            tx.execute(
                "INSERT INTO words (word, category, difficulty) VALUES (?1, ?2, ?3)",
                params![word.text, word.category, difficulty],
            )?;
        }
        tx.commit()?;
        log::debug!("seeded word catalog with {} words", words.len());
        Ok(())
    }

    pub fn word_count(&self) -> Result<usize, SourceError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM words", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Add a word to the catalog; the text is normalized to uppercase
    pub fn add_word(&self, word: &str, category: &str, difficulty: u32) -> Result<(), SourceError> {
        let word = Word::new(word, category);
        if !is_spellable(&word.text) {
            return Err(SourceError::Backend(format!(
                "{:?} is not a plain word",
                word.text
            )));
        }
        self.conn.execute(
            "INSERT INTO words (word, category, difficulty) VALUES (?1, ?2, ?3)",
            params![word.text, word.category, difficulty],
        )?;
        Ok(())
    }

    fn query_strings(&self, sql: &str, args: impl rusqlite::Params) -> Result<Vec<String>, SourceError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(args, |row| row.get::<_, String>(0))?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

impl WordSource for SqliteCatalog {
    fn categories(&self) -> Result<Vec<String>, SourceError> {
        self.query_strings("SELECT DISTINCT category FROM words ORDER BY category", [])
    }

    fn words_by_category(&self, category: &str) -> Result<Vec<String>, SourceError> {
        self.query_strings(
            "SELECT word FROM words WHERE category = ?1 ORDER BY word",
            [category],
        )
    }

    fn category_for_word(&self, word: &str) -> Result<Option<String>, SourceError> {
        let category = self
            .conn
            .query_row(
                "SELECT category FROM words WHERE word = ?1 ORDER BY id LIMIT 1",
                [word],
                |row| row.get(0),
            )
            .optional()?;
        Ok(category)
    }

    fn random_word(&self) -> Result<Option<String>, SourceError> {
        let now = Utc::now();
        let cutoff = (now - Duration::minutes(REUSE_AFTER_MINUTES))
            .to_rfc3339_opts(SecondsFormat::Millis, true);

        let picked: Option<(i64, String)> = self
            .conn
            .query_row(
                r#"
                SELECT w.id, w.word
                FROM words w
                LEFT JOIN used_words uw ON w.id = uw.word_id
                WHERE uw.word_id IS NULL OR uw.last_used < ?1
                ORDER BY RANDOM()
                LIMIT 1
                "#,
                [cutoff],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((id, word)) = picked else {
            return Ok(None);
        };

        self.conn.execute(
            "INSERT OR REPLACE INTO used_words (word_id, last_used) VALUES (?1, ?2)",
            params![id, now.to_rfc3339_opts(SecondsFormat::Millis, true)],
        )?;
        Ok(Some(word))
    }
}
