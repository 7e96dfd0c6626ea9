//! Deterministic first-run sample data.
//!
//! A journal key that has never been written is seeded with a week of sample
//! records so every screen has something to show. The anchor date and clock
//! are injected, and the generated values are fixed, so first-run state is
//! reproducible in tests.

use time::{Date, Duration, OffsetDateTime};
use time::macros::time;

use crate::records::{
    BodyLocation, CommunityPost, EntryId, MoodEntry, MoodKind, PainEntry, Reminder, ReminderDay,
    SleepEntry, SittingDay,
};

fn days_back(anchor: Date, days: i64) -> Date {
    anchor.saturating_sub(Duration::days(days))
}

/// A week of pain readings ending on the anchor date.
#[must_use]
pub fn pain_entries(today: Date) -> Vec<PainEntry> {
    let week = [
        (6, BodyLocation::LowerBack),
        (5, BodyLocation::LowerBack),
        (4, BodyLocation::Neck),
        (3, BodyLocation::Neck),
        (4, BodyLocation::UpperBack),
        (2, BodyLocation::LowerBack),
        (3, BodyLocation::LowerBack),
    ];
    week.iter()
        .enumerate()
        .map(|(index, (level, location))| PainEntry {
            date: days_back(today, 6 - index as i64),
            level: *level,
            location: *location,
        })
        .collect()
}

/// A week of sleep nights ending on the anchor date, durations in the
/// six-to-eight-hour range.
#[must_use]
pub fn sleep_entries(today: Date) -> Vec<SleepEntry> {
    let week = [
        (time!(22:30), time!(06:00), 3),
        (time!(23:15), time!(06:45), 4),
        (time!(22:50), time!(05:40), 2),
        (time!(23:00), time!(06:30), 4),
        (time!(22:40), time!(06:10), 3),
        (time!(23:30), time!(06:50), 5),
        (time!(22:30), time!(06:30), 4),
    ];
    week.iter()
        .enumerate()
        .map(|(index, (bed_time, wake_time, quality))| SleepEntry {
            date: days_back(today, 6 - index as i64),
            bed_time: *bed_time,
            wake_time: *wake_time,
            quality: Some(*quality),
        })
        .collect()
}

/// Five days of sitting totals ending on the anchor date, within the
/// three-to-eight-hour range.
#[must_use]
pub fn sitting_days(today: Date) -> Vec<SittingDay> {
    let durations = [300, 420, 255, 390, 210];
    durations
        .iter()
        .enumerate()
        .map(|(index, duration)| SittingDay {
            date: days_back(today, 4 - index as i64),
            duration: *duration,
        })
        .collect()
}

/// A week of journaled moods ending on the anchor date.
#[must_use]
pub fn mood_entries(today: Date) -> Vec<MoodEntry> {
    let week = [
        MoodKind::Calm,
        MoodKind::Worried,
        MoodKind::Happy,
        MoodKind::Tired,
        MoodKind::Neutral,
        MoodKind::InPain,
        MoodKind::Happy,
    ];
    week.iter()
        .enumerate()
        .map(|(index, mood)| {
            let note = if index % 2 == 0 {
                "My back pain was manageable."
            } else {
                "I struggled with back pain today but tried to stay positive."
            };
            MoodEntry {
                date: days_back(today, 6 - index as i64),
                mood: *mood,
                journal: format!("Today I felt {}. {note}", mood.as_str().to_lowercase()),
            }
        })
        .collect()
}

/// The three starter reminders.
#[must_use]
pub fn reminders() -> Vec<Reminder> {
    vec![
        Reminder {
            id: EntryId::new(),
            time: time!(08:00),
            enabled: true,
            label: "Morning Stretch".to_string(),
            days: vec![
                ReminderDay::Mon,
                ReminderDay::Tue,
                ReminderDay::Wed,
                ReminderDay::Thu,
                ReminderDay::Fri,
            ],
        },
        Reminder {
            id: EntryId::new(),
            time: time!(12:30),
            enabled: true,
            label: "Lunch Break Exercise".to_string(),
            days: vec![ReminderDay::Mon, ReminderDay::Wed, ReminderDay::Fri],
        },
        Reminder {
            id: EntryId::new(),
            time: time!(17:00),
            enabled: false,
            label: "Evening Workout".to_string(),
            days: vec![ReminderDay::Tue, ReminderDay::Thu],
        },
    ]
}

/// The five starter community posts, oldest first.
#[must_use]
pub fn community_posts(now: OffsetDateTime) -> Vec<CommunityPost> {
    let starter = [
        (
            "Jamie L.",
            "Just had my first appointment with a physical therapist recommended through the \
             app. So grateful for this community and all the resources!",
            Duration::days(4),
            15,
            4,
            &["PhysicalTherapy", "Grateful"][..],
        ),
        (
            "Alex W.",
            "I've been using the HealthySpine app for a month now, and my back pain has \
             decreased significantly! The exercise plans and posture reminders have been \
             game-changers for me.",
            Duration::days(3),
            18,
            2,
            &["Success", "Progress"][..],
        ),
        (
            "Dr. Lisa Chen",
            "Quick tip: When sitting for long periods, make sure your feet are flat on the \
             floor and your knees are at a 90-degree angle. This helps maintain proper posture \
             and reduces strain on your back.",
            Duration::days(2),
            24,
            5,
            &["ExpertTip", "Posture"][..],
        ),
        (
            "Michael T.",
            "Has anyone tried using a standing desk? I'm considering getting one to help with \
             my lower back pain during work hours.",
            Duration::days(1),
            8,
            7,
            &["WorkSetup", "StandingDesk"][..],
        ),
        (
            "Sarah J.",
            "Just completed my morning stretches! My back feels so much better already. 💪",
            Duration::hours(2),
            12,
            3,
            &["MorningRoutine", "StretchGoals"][..],
        ),
    ];
    starter
        .iter()
        .map(|(author, content, age, likes, comments, tags)| CommunityPost {
            id: EntryId::new(),
            author: (*author).to_string(),
            content: (*content).to_string(),
            posted_at: now - *age,
            likes: *likes,
            liked: false,
            comments: *comments,
            tags: tags.iter().map(|tag| (*tag).to_string()).collect(),
        })
        .collect()
}
