//! Application facade: one method per user action on every tracker screen.
//!
//! Each call opens the journal database, migrates it forward if needed, and
//! performs a single synchronous read-modify-write. Validation happens before
//! any journal is touched, so a failed call leaves no partial state behind.

use std::path::{Path, PathBuf};

use anyhow::Result;
use healthyspine_core::{
    exercise_by_id, metrics, plan_by_id, seed, ActiveSitting, BodyLocation, CommunityPost,
    CompanionError, EntryId, Exercise, ExercisePlan, MoodEntry, MoodKind, PainEntry, Reminder,
    ReminderDay, SessionTimer, SittingDay, SleepEntry, UserIdentity, UserProfile, PLANS,
};
use healthyspine_core::metrics::SleepBand;
use healthyspine_store_sqlite::{LocalStore, SchemaStatus, StorageKey};
use serde::Serialize;
use time::{Date, OffsetDateTime, Time};

pub mod auth;

pub use auth::{HttpIdentityProvider, IdentityProvider, DEFAULT_AUTH_URL};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MigrateResult {
    pub dry_run: bool,
    pub current_version: i64,
    pub target_version: i64,
    pub would_apply_versions: Vec<i64>,
    pub after_version: Option<i64>,
    pub up_to_date: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct RecordPainRequest {
    pub date: Option<Date>,
    pub level: u8,
    pub location: BodyLocation,
}

#[derive(Debug, Clone)]
pub struct RecordSleepRequest {
    pub date: Option<Date>,
    pub bed_time: Time,
    pub wake_time: Time,
    pub quality: Option<u8>,
}

#[derive(Debug, Clone)]
pub struct RecordMoodRequest {
    pub date: Option<Date>,
    pub mood: MoodKind,
    pub journal: String,
}

#[derive(Debug, Clone)]
pub struct AddReminderRequest {
    pub time: Time,
    pub label: String,
    pub days: Vec<ReminderDay>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PainSummary {
    pub entries: usize,
    pub average_level: f64,
    pub latest: Option<PainEntry>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SleepSummary {
    pub entries: usize,
    pub average_hours: f64,
    pub band: SleepBand,
    pub progress_percent: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SittingStatus {
    pub running: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub started_at: Option<OffsetDateTime>,
    pub elapsed_minutes: Option<i64>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SittingStopResult {
    pub minutes_added: u32,
    pub today_total_minutes: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SittingSummary {
    pub today_minutes: u32,
    pub average_minutes: f64,
    pub limit_minutes: u32,
    pub limit_percent: f64,
    pub over_limit: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ExerciseView {
    pub id: String,
    pub name: String,
    pub duration: String,
    pub description: String,
    pub difficulty: u8,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PlanView {
    pub id: String,
    pub name: String,
    pub level: String,
    pub description: String,
    pub exercises: Vec<ExerciseView>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PlanProgress {
    pub plan_id: String,
    pub completed: usize,
    pub total: usize,
    pub percent: u8,
}

#[derive(Debug, Clone)]
pub struct CompanionApi {
    db_path: PathBuf,
}

impl CompanionApi {
    #[must_use]
    pub fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }

    fn open_store(&self) -> Result<LocalStore> {
        let mut store = LocalStore::open(&self.db_path)?;
        store.migrate()?;
        Ok(store)
    }

    /// Inspect schema status without mutating data.
    ///
    /// # Errors
    /// Returns an error when the database cannot be opened or queried.
    pub fn schema_status(&self) -> Result<SchemaStatus> {
        let store = LocalStore::open(&self.db_path)?;
        store.schema_status()
    }

    /// Apply pending migrations, or return planned versions for dry-run mode.
    ///
    /// # Errors
    /// Returns an error when migration planning or execution fails.
    pub fn migrate(&self, dry_run: bool) -> Result<MigrateResult> {
        let mut store = LocalStore::open(&self.db_path)?;
        let before = store.schema_status()?;
        if dry_run {
            return Ok(MigrateResult {
                dry_run: true,
                current_version: before.current_version,
                target_version: before.target_version,
                would_apply_versions: before.pending_versions,
                after_version: None,
                up_to_date: None,
            });
        }

        let planned_versions = before.pending_versions;
        store.migrate()?;
        let after = store.schema_status()?;
        Ok(MigrateResult {
            dry_run: false,
            current_version: before.current_version,
            target_version: before.target_version,
            would_apply_versions: planned_versions,
            after_version: Some(after.current_version),
            up_to_date: Some(after.pending_versions.is_empty()),
        })
    }

    /// Write a database backup file.
    ///
    /// # Errors
    /// Returns an error when the backup fails.
    pub fn backup(&self, out_file: &Path) -> Result<()> {
        let store = self.open_store()?;
        store.backup_database(out_file)
    }

    /// Restore the database from a backup file.
    ///
    /// # Errors
    /// Returns an error when the backup file is missing or the restore fails.
    pub fn restore(&self, in_file: &Path) -> Result<()> {
        let mut store = self.open_store()?;
        store.restore_database(in_file)
    }

    // --- pain ---

    /// Append one pain reading. Level is checked before the journal is
    /// touched.
    ///
    /// # Errors
    /// Returns a validation error for a level outside 1-10, or a storage
    /// error.
    pub fn record_pain(&self, input: RecordPainRequest) -> Result<PainEntry> {
        let date = input.date.unwrap_or_else(today_utc);
        let entry = PainEntry { date, level: input.level, location: input.location };
        entry.validate()?;
        let store = self.open_store()?;
        store.append(StorageKey::PainEntries, entry.clone(), || seed::pain_entries(date))?;
        Ok(entry)
    }

    /// # Errors
    /// Returns an error when the journal cannot be read.
    pub fn pain_history(&self) -> Result<Vec<PainEntry>> {
        let store = self.open_store()?;
        store.load_or_seed(StorageKey::PainEntries, || seed::pain_entries(today_utc()))
    }

    /// Summarize the pain journal: entry count, average over the seven most
    /// recent dates, and the latest entry. The journal is append-only and a
    /// record may be backdated, so the entries are date-ordered first.
    ///
    /// # Errors
    /// Returns an error when the journal cannot be read.
    pub fn pain_summary(&self) -> Result<PainSummary> {
        let mut entries = self.pain_history()?;
        entries.sort_by_key(|entry| entry.date);
        let average_level = metrics::average_recent(&entries, 7, |entry| f64::from(entry.level));
        Ok(PainSummary {
            entries: entries.len(),
            average_level,
            latest: entries.last().cloned(),
        })
    }

    // --- sleep ---

    /// Record one night of sleep; a second write for the same date replaces
    /// the first.
    ///
    /// # Errors
    /// Returns a validation error for a quality outside 1-5, or a storage
    /// error.
    pub fn record_sleep(&self, input: RecordSleepRequest) -> Result<SleepEntry> {
        let date = input.date.unwrap_or_else(today_utc);
        let entry = SleepEntry {
            date,
            bed_time: input.bed_time,
            wake_time: input.wake_time,
            quality: input.quality,
        };
        entry.validate()?;
        let store = self.open_store()?;
        store.upsert(
            StorageKey::SleepEntries,
            entry.clone(),
            || seed::sleep_entries(date),
            |record| record.date,
            healthyspine_core::journal::replace,
        )?;
        Ok(entry)
    }

    /// # Errors
    /// Returns an error when the journal cannot be read.
    pub fn sleep_history(&self) -> Result<Vec<SleepEntry>> {
        let store = self.open_store()?;
        store.load_or_seed(StorageKey::SleepEntries, || seed::sleep_entries(today_utc()))
    }

    /// # Errors
    /// Returns an error when the journal cannot be read.
    pub fn sleep_summary(&self) -> Result<SleepSummary> {
        let entries = self.sleep_history()?;
        let average_hours = metrics::average_recent(&entries, 7, SleepEntry::duration_hours);
        Ok(SleepSummary {
            entries: entries.len(),
            average_hours,
            band: metrics::sleep_band(average_hours),
            progress_percent: metrics::progress_percent(
                average_hours,
                metrics::RECOMMENDED_SLEEP_HOURS,
            ),
        })
    }

    // --- sitting ---

    /// Start tracking a sitting session. The running state is persisted so
    /// the timer survives process restarts.
    ///
    /// # Errors
    /// Returns a timer error when a session is already running, or a storage
    /// error.
    pub fn sitting_start(&self, now: Option<OffsetDateTime>) -> Result<SittingStatus> {
        let store = self.open_store()?;
        let now = now_or(now);
        let mut timer = load_timer(&store)?;
        timer.start(now)?;
        store.put_json(StorageKey::ActiveSitting, &ActiveSitting { started_at: now })?;
        Ok(SittingStatus { running: true, started_at: Some(now), elapsed_minutes: Some(0) })
    }

    /// Stop the running session and fold its minutes into today's total.
    ///
    /// # Errors
    /// Returns a timer error when no session is running, or a storage error.
    pub fn sitting_stop(&self, now: Option<OffsetDateTime>) -> Result<SittingStopResult> {
        let store = self.open_store()?;
        let now = now_or(now);
        let mut timer = load_timer(&store)?;
        let elapsed = timer.stop(now)?;
        store.delete(StorageKey::ActiveSitting)?;

        let minutes = u32::try_from(elapsed.whole_minutes().max(0)).unwrap_or(u32::MAX);
        let today = now.date();
        let (records, _) = store.upsert(
            StorageKey::SittingSessions,
            SittingDay { date: today, duration: minutes },
            || seed::sitting_days(today),
            |record| record.date,
            accumulate_sitting,
        )?;
        let today_total_minutes = records
            .iter()
            .find(|record| record.date == today)
            .map_or(minutes, |record| record.duration);
        Ok(SittingStopResult { minutes_added: minutes, today_total_minutes })
    }

    /// Sample the timer without transitioning it.
    ///
    /// # Errors
    /// Returns an error when the stored timer state cannot be read.
    pub fn sitting_status(&self, now: Option<OffsetDateTime>) -> Result<SittingStatus> {
        let store = self.open_store()?;
        let now = now_or(now);
        let timer = load_timer(&store)?;
        match timer {
            SessionTimer::Running { started_at } => Ok(SittingStatus {
                running: true,
                started_at: Some(started_at),
                elapsed_minutes: timer.elapsed(now).map(|elapsed| elapsed.whole_minutes()),
            }),
            SessionTimer::Idle => {
                Ok(SittingStatus { running: false, started_at: None, elapsed_minutes: None })
            }
        }
    }

    /// Add a manual sitting block to a day's total.
    ///
    /// # Errors
    /// Returns a validation error for a zero or unrepresentable duration, or
    /// a storage error.
    pub fn sitting_add(&self, hours: u32, minutes: u32, date: Option<Date>) -> Result<SittingDay> {
        let total = hours
            .checked_mul(60)
            .and_then(|from_hours| from_hours.checked_add(minutes))
            .ok_or_else(|| {
                CompanionError::Validation(
                    "sitting duration MUST fit in a whole number of minutes".to_string(),
                )
            })?;
        if total == 0 {
            return Err(CompanionError::Validation(
                "sitting duration MUST be greater than zero".to_string(),
            )
            .into());
        }
        let date = date.unwrap_or_else(today_utc);
        let store = self.open_store()?;
        let (records, _) = store.upsert(
            StorageKey::SittingSessions,
            SittingDay { date, duration: total },
            || seed::sitting_days(date),
            |record| record.date,
            accumulate_sitting,
        )?;
        let day = records
            .into_iter()
            .find(|record| record.date == date)
            .unwrap_or(SittingDay { date, duration: total });
        Ok(day)
    }

    /// # Errors
    /// Returns an error when the journal cannot be read.
    pub fn sitting_history(&self) -> Result<Vec<SittingDay>> {
        let store = self.open_store()?;
        store.load_or_seed(StorageKey::SittingSessions, || seed::sitting_days(today_utc()))
    }

    /// # Errors
    /// Returns an error when the journal cannot be read.
    pub fn sitting_summary(&self, date: Option<Date>) -> Result<SittingSummary> {
        let date = date.unwrap_or_else(today_utc);
        let records = self.sitting_history()?;
        let today_minutes = records
            .iter()
            .find(|record| record.date == date)
            .map_or(0, |record| record.duration);
        let average_minutes =
            metrics::average_recent(&records, records.len(), |record| f64::from(record.duration));
        Ok(SittingSummary {
            today_minutes,
            average_minutes,
            limit_minutes: metrics::DAILY_SITTING_LIMIT_MINUTES,
            limit_percent: metrics::progress_percent(
                f64::from(today_minutes),
                f64::from(metrics::DAILY_SITTING_LIMIT_MINUTES),
            ),
            over_limit: today_minutes > metrics::DAILY_SITTING_LIMIT_MINUTES,
        })
    }

    // --- mood ---

    /// Record the day's mood; a second write for the same date replaces the
    /// first.
    ///
    /// # Errors
    /// Returns an error when the journal cannot be written.
    pub fn record_mood(&self, input: RecordMoodRequest) -> Result<MoodEntry> {
        let date = input.date.unwrap_or_else(today_utc);
        let entry = MoodEntry { date, mood: input.mood, journal: input.journal };
        let store = self.open_store()?;
        store.upsert(
            StorageKey::MoodEntries,
            entry.clone(),
            || seed::mood_entries(date),
            |record| record.date,
            healthyspine_core::journal::replace,
        )?;
        Ok(entry)
    }

    /// # Errors
    /// Returns an error when the journal cannot be read.
    pub fn mood_history(&self) -> Result<Vec<MoodEntry>> {
        let store = self.open_store()?;
        store.load_or_seed(StorageKey::MoodEntries, || seed::mood_entries(today_utc()))
    }

    /// Consecutive journaled days, counted backward from the latest entry.
    ///
    /// # Errors
    /// Returns an error when the journal cannot be read.
    pub fn mood_streak(&self) -> Result<usize> {
        let entries = self.mood_history()?;
        Ok(metrics::daily_streak(&entries, |entry| entry.date, |_| true))
    }

    // --- reminders ---

    /// Create a reminder. An empty label falls back to "Exercise Reminder";
    /// an empty weekday set is rejected.
    ///
    /// # Errors
    /// Returns a validation error for an empty weekday set, or a storage
    /// error.
    pub fn add_reminder(&self, input: AddReminderRequest) -> Result<Reminder> {
        let label = if input.label.trim().is_empty() {
            "Exercise Reminder".to_string()
        } else {
            input.label
        };
        let reminder =
            Reminder { id: EntryId::new(), time: input.time, enabled: true, label, days: input.days };
        reminder.validate()?;
        let store = self.open_store()?;
        store.append(StorageKey::ExerciseReminders, reminder.clone(), seed::reminders)?;
        Ok(reminder)
    }

    /// Flip a reminder's enabled flag. An unknown id is a silent no-op.
    ///
    /// # Errors
    /// Returns an error when the journal cannot be read or written.
    pub fn toggle_reminder(&self, id: EntryId) -> Result<Option<Reminder>> {
        let store = self.open_store()?;
        let (records, touched) = store.mutate(
            StorageKey::ExerciseReminders,
            seed::reminders,
            |record: &Reminder| record.id == id,
            |record| record.enabled = !record.enabled,
        )?;
        if !touched {
            return Ok(None);
        }
        Ok(records.into_iter().find(|record| record.id == id))
    }

    /// Delete a reminder. An unknown id is a silent no-op.
    ///
    /// # Errors
    /// Returns an error when the journal cannot be read or written.
    pub fn delete_reminder(&self, id: EntryId) -> Result<bool> {
        let store = self.open_store()?;
        let (_, removed) = store.remove(
            StorageKey::ExerciseReminders,
            seed::reminders,
            |record: &Reminder| record.id == id,
        )?;
        Ok(removed)
    }

    /// # Errors
    /// Returns an error when the journal cannot be read.
    pub fn list_reminders(&self) -> Result<Vec<Reminder>> {
        let store = self.open_store()?;
        store.load_or_seed(StorageKey::ExerciseReminders, seed::reminders)
    }

    // --- community ---

    /// Publish a post under the signed-in name, or "User" when signed out.
    ///
    /// # Errors
    /// Returns a validation error for empty content, or a storage error.
    pub fn publish_post(&self, content: &str, now: Option<OffsetDateTime>) -> Result<CommunityPost> {
        let now = now_or(now);
        let store = self.open_store()?;
        let author = store
            .get_json::<UserIdentity>(StorageKey::User)?
            .map_or_else(|| "User".to_string(), |identity| identity.name);
        let post = CommunityPost {
            id: EntryId::new(),
            author,
            content: content.to_string(),
            posted_at: now,
            likes: 0,
            liked: false,
            comments: 0,
            tags: vec!["NewPost".to_string()],
        };
        post.validate()?;
        store.append(StorageKey::CommunityPosts, post.clone(), || seed::community_posts(now))?;
        Ok(post)
    }

    /// Toggle the like on a post: likes move by one and the flag flips, so
    /// toggling twice restores the post. An unknown id is a silent no-op.
    ///
    /// # Errors
    /// Returns an error when the journal cannot be read or written.
    pub fn toggle_like(&self, id: EntryId, now: Option<OffsetDateTime>) -> Result<Option<CommunityPost>> {
        let now = now_or(now);
        let store = self.open_store()?;
        let (records, touched) = store.mutate(
            StorageKey::CommunityPosts,
            || seed::community_posts(now),
            |record: &CommunityPost| record.id == id,
            |record| {
                if record.liked {
                    record.likes = record.likes.saturating_sub(1);
                } else {
                    record.likes += 1;
                }
                record.liked = !record.liked;
            },
        )?;
        if !touched {
            return Ok(None);
        }
        Ok(records.into_iter().find(|record| record.id == id))
    }

    /// The feed, newest post first.
    ///
    /// # Errors
    /// Returns an error when the journal cannot be read.
    pub fn feed(&self, now: Option<OffsetDateTime>) -> Result<Vec<CommunityPost>> {
        let now = now_or(now);
        let store = self.open_store()?;
        let mut posts =
            store.load_or_seed(StorageKey::CommunityPosts, || seed::community_posts(now))?;
        posts.reverse();
        Ok(posts)
    }

    // --- exercise plans ---

    /// The catalog merged with completion state.
    ///
    /// # Errors
    /// Returns an error when the completion journal cannot be read.
    pub fn list_plans(&self) -> Result<Vec<PlanView>> {
        let store = self.open_store()?;
        let completed: Vec<String> = store.load_or_seed(StorageKey::CompletedExercises, Vec::new)?;
        Ok(PLANS.iter().map(|plan| plan_view(plan, &completed)).collect())
    }

    /// Mark an exercise done, or un-mark it when already done.
    ///
    /// # Errors
    /// Returns a validation error for an unknown exercise id, or a storage
    /// error.
    pub fn toggle_exercise(&self, exercise_id: &str) -> Result<ExerciseView> {
        let Some(exercise) = exercise_by_id(exercise_id) else {
            return Err(CompanionError::Validation(format!(
                "unknown exercise id: {exercise_id}"
            ))
            .into());
        };
        let store = self.open_store()?;
        let mut completed: Vec<String> =
            store.load_or_seed(StorageKey::CompletedExercises, Vec::new)?;
        let now_completed = if let Some(index) =
            completed.iter().position(|id| id.as_str() == exercise_id)
        {
            completed.remove(index);
            false
        } else {
            completed.push(exercise_id.to_string());
            true
        };
        store.put_json(StorageKey::CompletedExercises, &completed)?;
        Ok(exercise_view(exercise, now_completed))
    }

    /// Clear all completion marks belonging to one plan.
    ///
    /// # Errors
    /// Returns a validation error for an unknown plan id, or a storage error.
    pub fn reset_plan(&self, plan_id: &str) -> Result<usize> {
        let Some(plan) = plan_by_id(plan_id) else {
            return Err(
                CompanionError::Validation(format!("unknown plan id: {plan_id}")).into()
            );
        };
        let store = self.open_store()?;
        let mut completed: Vec<String> =
            store.load_or_seed(StorageKey::CompletedExercises, Vec::new)?;
        let before = completed.len();
        completed.retain(|id| plan.exercises.iter().all(|exercise| exercise.id != id.as_str()));
        let cleared = before - completed.len();
        store.put_json(StorageKey::CompletedExercises, &completed)?;
        Ok(cleared)
    }

    /// # Errors
    /// Returns a validation error for an unknown plan id, or a storage error.
    pub fn plan_progress(&self, plan_id: &str) -> Result<PlanProgress> {
        let Some(plan) = plan_by_id(plan_id) else {
            return Err(
                CompanionError::Validation(format!("unknown plan id: {plan_id}")).into()
            );
        };
        let store = self.open_store()?;
        let completed: Vec<String> = store.load_or_seed(StorageKey::CompletedExercises, Vec::new)?;
        let done = plan
            .exercises
            .iter()
            .filter(|exercise| completed.iter().any(|id| id.as_str() == exercise.id))
            .count();
        let total = plan.exercises.len();
        let percent = ((done as f64 / total as f64) * 100.0).round() as u8;
        Ok(PlanProgress { plan_id: plan.id.to_string(), completed: done, total, percent })
    }

    // --- auth and session ---

    /// # Errors
    /// Returns an auth error with the provider's message, or a storage error.
    /// Provider failures leave the session untouched.
    pub fn sign_in(
        &self,
        provider: &dyn IdentityProvider,
        email: &str,
        password: &str,
    ) -> Result<UserIdentity> {
        let identity = provider.sign_in(email, password)?;
        let store = self.open_store()?;
        store.put_json(StorageKey::User, &identity)?;
        Ok(identity)
    }

    /// # Errors
    /// Returns an auth error with the provider's message, or a storage error.
    pub fn sign_up(
        &self,
        provider: &dyn IdentityProvider,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserIdentity> {
        let identity = provider.sign_up(name, email, password)?;
        let store = self.open_store()?;
        store.put_json(StorageKey::User, &identity)?;
        Ok(identity)
    }

    /// # Errors
    /// Returns an auth error with the provider's message, or a storage error.
    pub fn sign_in_with_google(&self, provider: &dyn IdentityProvider) -> Result<UserIdentity> {
        let identity = provider.sign_in_with_google()?;
        let store = self.open_store()?;
        store.put_json(StorageKey::User, &identity)?;
        Ok(identity)
    }

    /// Drop the session. Returns whether one existed.
    ///
    /// # Errors
    /// Returns an error when the session cannot be deleted.
    pub fn sign_out(&self) -> Result<bool> {
        let store = self.open_store()?;
        store.delete(StorageKey::User)
    }

    /// # Errors
    /// Returns an error when the session cannot be read.
    pub fn current_user(&self) -> Result<Option<UserIdentity>> {
        let store = self.open_store()?;
        store.get_json(StorageKey::User)
    }

    // --- profile ---

    /// The stored profile, or defaults derived from the session on first
    /// read (and persisted).
    ///
    /// # Errors
    /// Returns an error when the profile cannot be read or written.
    pub fn profile(&self) -> Result<UserProfile> {
        let store = self.open_store()?;
        if let Some(profile) = store.get_json::<UserProfile>(StorageKey::UserProfile)? {
            return Ok(profile);
        }
        let identity = store
            .get_json::<UserIdentity>(StorageKey::User)?
            .unwrap_or(UserIdentity { name: "User".to_string(), email: String::new() });
        let profile = UserProfile::default_for(&identity);
        store.put_json(StorageKey::UserProfile, &profile)?;
        Ok(profile)
    }

    /// Save the profile and refresh the session pair from it.
    ///
    /// # Errors
    /// Returns an error when the profile cannot be written.
    pub fn save_profile(&self, profile: UserProfile) -> Result<UserProfile> {
        let store = self.open_store()?;
        store.put_json(StorageKey::UserProfile, &profile)?;
        store.put_json(
            StorageKey::User,
            &UserIdentity { name: profile.name.clone(), email: profile.email.clone() },
        )?;
        Ok(profile)
    }
}

fn accumulate_sitting(existing: SittingDay, incoming: SittingDay) -> SittingDay {
    SittingDay {
        date: existing.date,
        duration: existing.duration.saturating_add(incoming.duration),
    }
}

fn load_timer(store: &LocalStore) -> Result<SessionTimer> {
    Ok(match store.get_json::<ActiveSitting>(StorageKey::ActiveSitting)? {
        Some(active) => SessionTimer::Running { started_at: active.started_at },
        None => SessionTimer::Idle,
    })
}

fn now_or(now: Option<OffsetDateTime>) -> OffsetDateTime {
    now.unwrap_or_else(OffsetDateTime::now_utc)
}

fn today_utc() -> Date {
    OffsetDateTime::now_utc().date()
}

fn exercise_view(exercise: &Exercise, completed: bool) -> ExerciseView {
    ExerciseView {
        id: exercise.id.to_string(),
        name: exercise.name.to_string(),
        duration: exercise.duration.to_string(),
        description: exercise.description.to_string(),
        difficulty: exercise.difficulty,
        completed,
    }
}

fn plan_view(plan: &ExercisePlan, completed: &[String]) -> PlanView {
    PlanView {
        id: plan.id.to_string(),
        name: plan.name.to_string(),
        level: plan.level.as_str().to_string(),
        description: plan.description.to_string(),
        exercises: plan
            .exercises
            .iter()
            .map(|exercise| {
                exercise_view(exercise, completed.iter().any(|id| id.as_str() == exercise.id))
            })
            .collect(),
    }
}
