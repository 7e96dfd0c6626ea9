//! Durable half of the journal store: a SQLite-backed key-value table holding
//! one JSON document per storage key. Every journal mutation is a single
//! synchronous read-modify-write of the whole document.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use healthyspine_core::journal::{self, UpsertOutcome};
use rusqlite::{params, Connection, DatabaseName, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

const LATEST_SCHEMA_VERSION: i64 = 1;

const CREATE_SCHEMA_MIGRATIONS_SQL: &str = r"
CREATE TABLE IF NOT EXISTS schema_migrations (
  version INTEGER PRIMARY KEY,
  applied_at TEXT NOT NULL
);
";

const MIGRATION_001_SQL: &str = r"
CREATE TABLE IF NOT EXISTS journal_store (
  key TEXT PRIMARY KEY,
  value TEXT NOT NULL,
  updated_at TEXT NOT NULL
);
";

/// Persisted document keys. The string forms are the contract with the stored
/// JSON and never change.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum StorageKey {
    PainEntries,
    SleepEntries,
    SittingSessions,
    MoodEntries,
    ExerciseReminders,
    CommunityPosts,
    CompletedExercises,
    ActiveSitting,
    User,
    UserProfile,
}

impl StorageKey {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PainEntries => "painEntries",
            Self::SleepEntries => "sleepEntries",
            Self::SittingSessions => "sittingSessions",
            Self::MoodEntries => "moodEntries",
            Self::ExerciseReminders => "exerciseReminders",
            Self::CommunityPosts => "communityPosts",
            Self::CompletedExercises => "completedExercises",
            Self::ActiveSitting => "activeSitting",
            Self::User => "user",
            Self::UserProfile => "userProfile",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "painEntries" => Some(Self::PainEntries),
            "sleepEntries" => Some(Self::SleepEntries),
            "sittingSessions" => Some(Self::SittingSessions),
            "moodEntries" => Some(Self::MoodEntries),
            "exerciseReminders" => Some(Self::ExerciseReminders),
            "communityPosts" => Some(Self::CommunityPosts),
            "completedExercises" => Some(Self::CompletedExercises),
            "activeSitting" => Some(Self::ActiveSitting),
            "user" => Some(Self::User),
            "userProfile" => Some(Self::UserProfile),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SchemaStatus {
    pub current_version: i64,
    pub target_version: i64,
    pub pending_versions: Vec<i64>,
}

pub struct LocalStore {
    conn: Connection,
}

impl LocalStore {
    /// Open the journal database and configure required runtime pragmas.
    ///
    /// # Errors
    /// Returns an error when the database cannot be opened or pragmas cannot
    /// be applied.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open sqlite database at {}", path.display()))?;
        Self::configure(conn)
    }

    /// Open a throwaway in-memory journal database.
    ///
    /// # Errors
    /// Returns an error when the database cannot be opened or pragmas cannot
    /// be applied.
    pub fn open_in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().context("failed to open in-memory sqlite database")?;
        Self::configure(conn)
    }

    fn configure(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )
        .context("failed to configure sqlite pragmas")?;
        Ok(Self { conn })
    }

    /// Report current and target schema versions plus pending migrations.
    ///
    /// # Errors
    /// Returns an error when schema metadata cannot be read or initialized.
    pub fn schema_status(&self) -> Result<SchemaStatus> {
        self.conn
            .execute_batch(CREATE_SCHEMA_MIGRATIONS_SQL)
            .context("failed to apply schema_migrations table")?;
        let current_version = current_schema_version(&self.conn)?;
        let pending_versions = if current_version < LATEST_SCHEMA_VERSION {
            ((current_version + 1)..=LATEST_SCHEMA_VERSION).collect::<Vec<_>>()
        } else {
            Vec::new()
        };

        Ok(SchemaStatus {
            current_version,
            target_version: LATEST_SCHEMA_VERSION,
            pending_versions,
        })
    }

    /// Apply all forward migrations up to the latest supported schema version.
    ///
    /// # Errors
    /// Returns an error when migration bootstrapping or any migration step
    /// fails.
    pub fn migrate(&mut self) -> Result<()> {
        self.conn
            .execute_batch(CREATE_SCHEMA_MIGRATIONS_SQL)
            .context("failed to apply schema_migrations table")?;

        let mut version = current_schema_version(&self.conn)?;

        if version == 0 {
            self.conn
                .execute_batch(MIGRATION_001_SQL)
                .context("failed to apply migration v1")?;
            record_schema_version(&self.conn, 1)?;
            version = current_schema_version(&self.conn)?;
        }

        if version != LATEST_SCHEMA_VERSION {
            return Err(anyhow!(
                "unsupported schema version {version}; expected {LATEST_SCHEMA_VERSION}"
            ));
        }

        Ok(())
    }

    /// Read the JSON document under a key. Absence is `None`; a document that
    /// no longer parses is an error, never silently discarded.
    ///
    /// # Errors
    /// Returns an error when the read fails or the stored JSON is malformed.
    pub fn get_json<T: DeserializeOwned>(&self, key: StorageKey) -> Result<Option<T>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM journal_store WHERE key = ?1",
                params![key.as_str()],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("failed to read journal key {}", key.as_str()))?;

        match raw {
            Some(raw) => {
                let value = serde_json::from_str(&raw).with_context(|| {
                    format!("malformed stored JSON under key {}", key.as_str())
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Write the JSON document under a key, replacing any previous document.
    ///
    /// # Errors
    /// Returns an error when serialization or the write fails.
    pub fn put_json<T: Serialize>(&self, key: StorageKey, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)
            .with_context(|| format!("failed to serialize journal key {}", key.as_str()))?;
        let now = now_rfc3339()?;
        self.conn
            .execute(
                "INSERT INTO journal_store(key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key.as_str(), raw, now],
            )
            .with_context(|| format!("failed to write journal key {}", key.as_str()))?;
        Ok(())
    }

    /// Delete the document under a key. Absence is a silent no-op.
    ///
    /// # Errors
    /// Returns an error when the delete statement fails.
    pub fn delete(&self, key: StorageKey) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM journal_store WHERE key = ?1", params![key.as_str()])
            .with_context(|| format!("failed to delete journal key {}", key.as_str()))?;
        Ok(deleted > 0)
    }

    /// Load the journal under a key, seeding and persisting sample records on
    /// first use. A journal is never observed empty because its key is
    /// absent; only an explicit clear leaves it empty.
    ///
    /// # Errors
    /// Returns an error when the read, the seeding write, or JSON handling
    /// fails.
    pub fn load_or_seed<R>(
        &self,
        key: StorageKey,
        seed: impl FnOnce() -> Vec<R>,
    ) -> Result<Vec<R>>
    where
        R: Serialize + DeserializeOwned,
    {
        if let Some(records) = self.get_json::<Vec<R>>(key)? {
            return Ok(records);
        }
        let seeded = seed();
        self.put_json(key, &seeded)?;
        Ok(seeded)
    }

    /// Append a record and persist. The existing records are never rewritten.
    ///
    /// # Errors
    /// Returns an error when the underlying read or write fails.
    pub fn append<R>(
        &self,
        key: StorageKey,
        record: R,
        seed: impl FnOnce() -> Vec<R>,
    ) -> Result<Vec<R>>
    where
        R: Serialize + DeserializeOwned,
    {
        let mut records = self.load_or_seed(key, seed)?;
        records.push(record);
        self.put_json(key, &records)?;
        Ok(records)
    }

    /// Upsert a record by key and persist, with the caller's merge strategy.
    ///
    /// # Errors
    /// Returns an error when the underlying read or write fails.
    pub fn upsert<R, K: Ord>(
        &self,
        key: StorageKey,
        record: R,
        seed: impl FnOnce() -> Vec<R>,
        key_of: impl Fn(&R) -> K,
        merge: impl FnOnce(R, R) -> R,
    ) -> Result<(Vec<R>, UpsertOutcome)>
    where
        R: Serialize + DeserializeOwned,
    {
        let mut records = self.load_or_seed(key, seed)?;
        let outcome = journal::upsert(&mut records, record, key_of, merge);
        self.put_json(key, &records)?;
        Ok((records, outcome))
    }

    /// Update the first matching record in place and persist. An absent
    /// record is a silent no-op.
    ///
    /// # Errors
    /// Returns an error when the underlying read or write fails.
    pub fn mutate<R>(
        &self,
        key: StorageKey,
        seed: impl FnOnce() -> Vec<R>,
        matches: impl Fn(&R) -> bool,
        update: impl FnOnce(&mut R),
    ) -> Result<(Vec<R>, bool)>
    where
        R: Serialize + DeserializeOwned,
    {
        let mut records = self.load_or_seed(key, seed)?;
        let touched = journal::mutate(&mut records, matches, update);
        if touched {
            self.put_json(key, &records)?;
        }
        Ok((records, touched))
    }

    /// Remove the first matching record and persist. An absent record is a
    /// silent no-op.
    ///
    /// # Errors
    /// Returns an error when the underlying read or write fails.
    pub fn remove<R>(
        &self,
        key: StorageKey,
        seed: impl FnOnce() -> Vec<R>,
        matches: impl Fn(&R) -> bool,
    ) -> Result<(Vec<R>, bool)>
    where
        R: Serialize + DeserializeOwned,
    {
        let mut records = self.load_or_seed(key, seed)?;
        let removed = journal::remove(&mut records, matches);
        if removed {
            self.put_json(key, &records)?;
        }
        Ok((records, removed))
    }

    /// Persist an explicitly empty journal under a key.
    ///
    /// # Errors
    /// Returns an error when the write fails.
    pub fn clear<R: Serialize>(&self, key: StorageKey) -> Result<()> {
        let empty: Vec<R> = Vec::new();
        self.put_json(key, &empty)
    }

    /// Create a `SQLite` backup file of the current main database.
    ///
    /// # Errors
    /// Returns an error when backup directories cannot be created or the
    /// backup fails.
    pub fn backup_database(&self, out_file: &Path) -> Result<()> {
        if let Some(parent) = out_file.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create parent directory for backup file {}", out_file.display())
            })?;
        }

        self.conn
            .backup(DatabaseName::Main, out_file, None)
            .with_context(|| format!("failed to create sqlite backup at {}", out_file.display()))
    }

    /// Restore this database from a `SQLite` backup file, then migrate to
    /// latest.
    ///
    /// # Errors
    /// Returns an error when the backup file is missing, the restore fails,
    /// or migrations fail.
    pub fn restore_database(&mut self, in_file: &Path) -> Result<()> {
        if !in_file.exists() {
            return Err(anyhow!("backup file does not exist: {}", in_file.display()));
        }

        self.conn
            .restore(DatabaseName::Main, in_file, None::<fn(rusqlite::backup::Progress)>)
            .with_context(|| {
                format!("failed to restore sqlite backup from {}", in_file.display())
            })?;

        self.migrate()?;
        Ok(())
    }
}

fn current_schema_version(conn: &Connection) -> Result<i64> {
    let version = conn
        .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_migrations", [], |row| {
            row.get::<_, i64>(0)
        })
        .context("failed to read current schema version")?;
    Ok(version)
}

fn record_schema_version(conn: &Connection, version: i64) -> Result<()> {
    let now = now_rfc3339()?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_migrations(version, applied_at) VALUES (?1, ?2)",
        params![version, now],
    )
    .with_context(|| format!("failed to record migration version {version}"))?;
    Ok(())
}

fn now_rfc3339() -> Result<String> {
    OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .context("failed to format RFC3339 timestamp")
}

#[cfg(test)]
mod tests {
    use healthyspine_core::journal::replace;
    use healthyspine_core::{seed, SittingDay};
    use time::macros::date;
    use ulid::Ulid;

    use super::*;

    fn open_store() -> Result<LocalStore> {
        let mut store = LocalStore::open_in_memory()?;
        store.migrate()?;
        Ok(store)
    }

    #[test]
    fn migrate_is_idempotent_and_reports_latest() -> Result<()> {
        let mut store = open_store()?;
        store.migrate()?;
        let status = store.schema_status()?;
        assert_eq!(status.current_version, LATEST_SCHEMA_VERSION);
        assert_eq!(status.target_version, LATEST_SCHEMA_VERSION);
        assert!(status.pending_versions.is_empty());
        Ok(())
    }

    #[test]
    fn first_load_seeds_and_persists_the_journal() -> Result<()> {
        let store = open_store()?;
        let today = date!(2023 - 04 - 16);
        let first = store.load_or_seed(StorageKey::SittingSessions, || seed::sitting_days(today))?;
        assert_eq!(first.len(), 5);

        // The second load must come from storage, not from re-seeding.
        let second: Vec<SittingDay> =
            store.load_or_seed(StorageKey::SittingSessions, Vec::new)?;
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn cleared_journal_stays_empty_instead_of_reseeding() -> Result<()> {
        let store = open_store()?;
        let today = date!(2023 - 04 - 16);
        store.load_or_seed(StorageKey::SittingSessions, || seed::sitting_days(today))?;
        store.clear::<SittingDay>(StorageKey::SittingSessions)?;
        let records: Vec<SittingDay> =
            store.load_or_seed(StorageKey::SittingSessions, || seed::sitting_days(today))?;
        assert!(records.is_empty());
        Ok(())
    }

    #[test]
    fn append_grows_by_exactly_one() -> Result<()> {
        let store = open_store()?;
        let before: Vec<SittingDay> = store.load_or_seed(StorageKey::SittingSessions, Vec::new)?;
        let after = store.append(
            StorageKey::SittingSessions,
            SittingDay { date: date!(2023 - 04 - 17), duration: 120 },
            Vec::new,
        )?;
        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(&after[..before.len()], &before[..]);
        Ok(())
    }

    #[test]
    fn persisted_upsert_accumulates_through_storage() -> Result<()> {
        let store = open_store()?;
        let today = date!(2023 - 04 - 16);
        let accumulate = |existing: SittingDay, incoming: SittingDay| SittingDay {
            date: existing.date,
            duration: existing.duration + incoming.duration,
        };
        store.upsert(
            StorageKey::SittingSessions,
            SittingDay { date: today, duration: 150 },
            Vec::new,
            |record| record.date,
            accumulate,
        )?;
        let (records, outcome) = store.upsert(
            StorageKey::SittingSessions,
            SittingDay { date: today, duration: 60 },
            Vec::new,
            |record| record.date,
            accumulate,
        )?;
        assert_eq!(outcome, UpsertOutcome::Merged);
        assert_eq!(records, vec![SittingDay { date: today, duration: 210 }]);
        Ok(())
    }

    #[test]
    fn replace_upsert_keeps_one_record_per_date() -> Result<()> {
        let store = open_store()?;
        let today = date!(2023 - 04 - 16);
        for duration in [100, 200, 300] {
            store.upsert(
                StorageKey::SittingSessions,
                SittingDay { date: today, duration },
                Vec::new,
                |record| record.date,
                replace,
            )?;
        }
        let records: Vec<SittingDay> = store.load_or_seed(StorageKey::SittingSessions, Vec::new)?;
        assert_eq!(records, vec![SittingDay { date: today, duration: 300 }]);
        Ok(())
    }

    #[test]
    fn mutate_of_an_absent_record_writes_nothing() -> Result<()> {
        let store = open_store()?;
        let today = date!(2023 - 04 - 16);
        store.load_or_seed(StorageKey::SittingSessions, || seed::sitting_days(today))?;
        let (records, touched) = store.mutate(
            StorageKey::SittingSessions,
            Vec::new,
            |record: &SittingDay| record.date == date!(1999 - 01 - 01),
            |record| record.duration = 0,
        )?;
        assert!(!touched);
        assert_eq!(records.len(), 5);
        Ok(())
    }

    #[test]
    fn malformed_stored_json_is_an_error_not_a_reseed() -> Result<()> {
        let store = open_store()?;
        store.conn.execute(
            "INSERT INTO journal_store(key, value, updated_at) VALUES ('sittingSessions', 'not json', '1970-01-01T00:00:00Z')",
            [],
        )?;
        let loaded: Result<Vec<SittingDay>> =
            store.load_or_seed(StorageKey::SittingSessions, Vec::new);
        assert!(loaded.is_err());
        Ok(())
    }

    #[test]
    fn backup_and_restore_round_trip_preserves_journals() -> Result<()> {
        let dir = std::env::temp_dir().join(format!("healthyspine-store-{}", Ulid::new()));
        fs::create_dir_all(&dir)?;
        let db_path = dir.join("journal.sqlite3");
        let backup_path = dir.join("backup.sqlite3");

        let today = date!(2023 - 04 - 16);
        {
            let mut store = LocalStore::open(&db_path)?;
            store.migrate()?;
            store.load_or_seed(StorageKey::SittingSessions, || seed::sitting_days(today))?;
            store.backup_database(&backup_path)?;
            store.clear::<SittingDay>(StorageKey::SittingSessions)?;
            store.restore_database(&backup_path)?;
            let records: Vec<SittingDay> =
                store.load_or_seed(StorageKey::SittingSessions, Vec::new)?;
            assert_eq!(records.len(), 5);
        }

        fs::remove_dir_all(&dir)?;
        Ok(())
    }

    #[test]
    fn storage_keys_round_trip_their_string_forms() {
        let keys = [
            StorageKey::PainEntries,
            StorageKey::SleepEntries,
            StorageKey::SittingSessions,
            StorageKey::MoodEntries,
            StorageKey::ExerciseReminders,
            StorageKey::CommunityPosts,
            StorageKey::CompletedExercises,
            StorageKey::ActiveSitting,
            StorageKey::User,
            StorageKey::UserProfile,
        ];
        for key in keys {
            assert_eq!(StorageKey::parse(key.as_str()), Some(key));
        }
        assert_eq!(StorageKey::parse("unknown"), None);
    }
}
