//! Domain core for the HealthySpine back-pain companion: the journal
//! operations shared by every tracker, the record types they store, the
//! derived metrics read from them, and the sitting session timer.

mod catalog;
mod error;
pub mod journal;
pub mod metrics;
mod records;
pub mod seed;
mod timer;

pub use catalog::{exercise_by_id, plan_by_id, Exercise, ExercisePlan, PlanLevel, PLANS};
pub use error::CompanionError;
pub use records::{
    clock_label, serde_date, serde_hhmm, ActiveSitting, BodyLocation, CommunityPost, EntryId,
    MoodEntry, MoodKind, PainEntry, Reminder, ReminderDay, SittingDay, SleepEntry, UserIdentity,
    UserProfile,
};
pub use timer::SessionTimer;
