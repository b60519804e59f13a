use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;

use crate::analysis::{compute_statistics, VoteAnalysis};
use crate::error::Result;
use crate::models::{BindingType, VoteRecord, VoteValue};

#[derive(Debug, Clone)]
pub struct CachedAnalysis {
    pub thread_url: String,
    pub analyzed_at: DateTime<Utc>,
    pub analysis: VoteAnalysis,
}

pub struct Storage {
    conn: Connection,
}

impl Storage {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let storage = Self { conn };
        storage.init_db()?;
        Ok(storage)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let storage = Self { conn };
        storage.init_db()?;
        Ok(storage)
    }

    fn init_db(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS vote_threads (
                id INTEGER PRIMARY KEY,
                thread_id TEXT UNIQUE NOT NULL,
                thread_url TEXT NOT NULL,
                analyzed_at TEXT NOT NULL,
                failed INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS votes (
                id INTEGER PRIMARY KEY,
                thread_ref INTEGER NOT NULL REFERENCES vote_threads(id),
                position INTEGER NOT NULL,
                email_id TEXT NOT NULL,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                vote_value TEXT NOT NULL,
                binding_type TEXT,
                timestamp TEXT NOT NULL,
                epoch INTEGER,
                raw_text TEXT NOT NULL,
                UNIQUE(thread_ref, position)
            );

            CREATE INDEX IF NOT EXISTS idx_votes_thread_ref ON votes(thread_ref);
            "#,
        )?;

        Ok(())
    }

    pub fn save_analysis(&mut self, thread_url: &str, analysis: &VoteAnalysis) -> Result<()> {
        let tx = self.conn.transaction()?;

        tx.execute(
            r#"
            INSERT INTO vote_threads (thread_id, thread_url, analyzed_at, failed)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(thread_id) DO UPDATE SET
                thread_url = excluded.thread_url,
                analyzed_at = excluded.analyzed_at,
                failed = excluded.failed
            "#,
            params![
                analysis.thread_id,
                thread_url,
                Utc::now().to_rfc3339(),
                analysis.failed as i64,
            ],
        )?;

        let thread_ref: i64 = tx.query_row(
            "SELECT id FROM vote_threads WHERE thread_id = ?1",
            params![analysis.thread_id],
            |row| row.get(0),
        )?;

        // Clear votes from the previous run of this thread
        tx.execute("DELETE FROM votes WHERE thread_ref = ?1", params![thread_ref])?;

        for (position, vote) in analysis.votes.iter().enumerate() {
            tx.execute(
                r#"
                INSERT INTO votes (thread_ref, position, email_id, name, email, vote_value, binding_type, timestamp, epoch, raw_text)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                "#,
                params![
                    thread_ref,
                    position as i64,
                    vote.message_id,
                    vote.sender_name,
                    vote.sender_email,
                    vote.vote_value.as_str(),
                    vote.binding_type.map(|b| b.as_str()),
                    vote.timestamp,
                    vote.epoch,
                    vote.raw_text,
                ],
            )?;
        }

        tx.commit()?;
        tracing::debug!(
            "Cached {} votes for thread {}",
            analysis.votes.len(),
            analysis.thread_id
        );
        Ok(())
    }

    pub fn get_analysis(&self, thread_id: &str) -> Result<Option<CachedAnalysis>> {
        let result = self.conn.query_row(
            "SELECT id, thread_url, analyzed_at, failed FROM vote_threads WHERE thread_id = ?1",
            params![thread_id],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                ))
            },
        );

        match result {
            Ok((thread_ref, thread_url, analyzed_at_str, failed)) => {
                let analyzed_at = DateTime::parse_from_rfc3339(&analyzed_at_str)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|_| Utc::now());

                let votes = self.get_votes(thread_ref)?;
                let stats = compute_statistics(&votes);

                Ok(Some(CachedAnalysis {
                    thread_url,
                    analyzed_at,
                    analysis: VoteAnalysis {
                        thread_id: thread_id.to_string(),
                        votes,
                        stats,
                        failed: failed.max(0) as usize,
                    },
                }))
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn get_votes(&self, thread_ref: i64) -> Result<Vec<VoteRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT email_id, name, email, vote_value, binding_type, timestamp, epoch, raw_text
            FROM votes
            WHERE thread_ref = ?1
            ORDER BY position
            "#,
        )?;

        let rows = stmt.query_map(params![thread_ref], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, Option<i64>>(6)?,
                row.get::<_, String>(7)?,
            ))
        })?;

        let mut votes = Vec::new();
        for row in rows {
            let (message_id, sender_name, sender_email, value, binding, timestamp, epoch, raw_text) = row?;

            // Rows with a value this build cannot read are skipped
            let Some(vote_value) = VoteValue::parse(&value) else {
                tracing::warn!("Skipping cached vote with unknown value '{}'", value);
                continue;
            };

            votes.push(VoteRecord {
                message_id,
                sender_name,
                sender_email,
                vote_value,
                binding_type: binding.as_deref().and_then(BindingType::classify),
                timestamp,
                epoch,
                raw_text,
            });
        }

        Ok(votes)
    }
}
