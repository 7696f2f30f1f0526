//! SQLite-backed catalog store
//!
//! Read surface over the `audio_files` table: titles per narrator,
//! the lecture list, and file-id resolution. Items are appended by an
//! external ingestion path and never mutated here.

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::{params, Connection};
use tracing::info;

use quranvoice_types::{Category, LectureEntry};

use crate::errors::Result;

/// SQLite-backed catalog store
#[derive(Clone)]
pub struct CatalogStore {
    conn: Arc<Mutex<Connection>>,
}

impl CatalogStore {
    /// Open (creating the schema if absent) the catalog at `db_path`.
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        Self::from_connection(conn)
    }

    /// In-memory catalog, used by tests.
    pub fn in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS audio_files (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                type TEXT NOT NULL,
                sura_title TEXT NOT NULL,
                sheikh TEXT NOT NULL,
                file_id TEXT NOT NULL UNIQUE,
                date_added TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )?;

        let recitations: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM audio_files WHERE type='quran'",
                [],
                |r| r.get(0),
            )
            .unwrap_or(0);
        let lectures: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM audio_files WHERE type='lecture'",
                [],
                |r| r.get(0),
            )
            .unwrap_or(0);
        info!(
            "Opened audio catalog: {} recitations, {} lectures",
            recitations, lectures
        );

        Ok(CatalogStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// All recitation titles for a narrator, in storage order.
    pub fn titles_for_narrator(&self, narrator: &str) -> Result<Vec<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(
            "SELECT sura_title FROM audio_files WHERE sheikh=?1 AND type='quran' ORDER BY id",
        )?;
        let titles = stmt
            .query_map(params![narrator], |r| r.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(titles)
    }

    /// All distinct lecture entries, ordered by first insertion.
    pub fn lectures(&self) -> Result<Vec<LectureEntry>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(
            "SELECT sura_title, sheikh FROM audio_files WHERE type='lecture'
             GROUP BY sura_title, sheikh ORDER BY MIN(id)",
        )?;
        let entries = stmt
            .query_map([], |r| {
                Ok(LectureEntry {
                    title: r.get(0)?,
                    narrator: r.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Resolve a `(title, narrator, category)` triple to its file id.
    pub fn resolve(
        &self,
        title: &str,
        narrator: &str,
        category: Category,
    ) -> Result<Option<String>> {
        let conn = self.conn.lock().unwrap();
        match conn.query_row(
            "SELECT file_id FROM audio_files WHERE sura_title=?1 AND sheikh=?2 AND type=?3",
            params![title, narrator, category.as_str()],
            |r| r.get(0),
        ) {
            Ok(file_id) => Ok(Some(file_id)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Append one item. This is the path the external ingestion uses;
    /// the bot itself only reads.
    pub fn insert(
        &self,
        category: Category,
        title: &str,
        narrator: &str,
        file_id: &str,
    ) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO audio_files (type, sura_title, sheikh, file_id) VALUES (?1, ?2, ?3, ?4)",
            params![category.as_str(), title, narrator, file_id],
        )?;
        Ok(())
    }
}
