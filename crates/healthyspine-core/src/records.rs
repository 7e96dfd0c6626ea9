use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime, Time};
use ulid::Ulid;

use crate::error::CompanionError;

/// Serde adapter for calendar dates stored as `YYYY-MM-DD` strings.
pub mod serde_date {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::format_description::BorrowedFormatItem;
    use time::macros::format_description;
    use time::Date;

    const FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

    /// # Errors
    ///
    /// Fails when the date cannot be rendered with the `YYYY-MM-DD` layout.
    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        let text = date.format(FORMAT).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&text)
    }

    /// # Errors
    ///
    /// Fails when the stored string is not a valid `YYYY-MM-DD` date.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let text = String::deserialize(deserializer)?;
        Date::parse(&text, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for clock times stored as 24-hour `HH:MM` strings.
pub mod serde_hhmm {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::format_description::BorrowedFormatItem;
    use time::macros::format_description;
    use time::Time;

    const FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[hour]:[minute]");

    /// # Errors
    ///
    /// Fails when the time cannot be rendered with the `HH:MM` layout.
    pub fn serialize<S: Serializer>(time: &Time, serializer: S) -> Result<S::Ok, S::Error> {
        let text = time.format(FORMAT).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&text)
    }

    /// # Errors
    ///
    /// Fails when the stored string is not a valid 24-hour `HH:MM` time.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Time, D::Error> {
        let text = String::deserialize(deserializer)?;
        Time::parse(&text, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Render a clock time on the 12-hour dial, e.g. "8:00 AM" or "12:30 PM".
#[must_use]
pub fn clock_label(time: Time) -> String {
    let meridiem = if time.hour() < 12 { "AM" } else { "PM" };
    let hour = match time.hour() % 12 {
        0 => 12,
        hour => hour,
    };
    format!("{hour}:{:02} {meridiem}", time.minute())
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct EntryId(pub Ulid);

impl EntryId {
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for EntryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for EntryId {
    type Err = ulid::DecodeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(Self(Ulid::from_string(value)?))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum BodyLocation {
    LowerBack,
    UpperBack,
    Neck,
    Shoulders,
}

impl BodyLocation {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LowerBack => "lower-back",
            Self::UpperBack => "upper-back",
            Self::Neck => "neck",
            Self::Shoulders => "shoulders",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "lower-back" => Some(Self::LowerBack),
            "upper-back" => Some(Self::UpperBack),
            "neck" => Some(Self::Neck),
            "shoulders" => Some(Self::Shoulders),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::LowerBack => "Lower Back",
            Self::UpperBack => "Upper Back",
            Self::Neck => "Neck",
            Self::Shoulders => "Shoulders",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum MoodKind {
    Happy,
    Calm,
    Neutral,
    Worried,
    Sad,
    Frustrated,
    #[serde(rename = "In Pain")]
    InPain,
    Tired,
}

impl MoodKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Happy => "Happy",
            Self::Calm => "Calm",
            Self::Neutral => "Neutral",
            Self::Worried => "Worried",
            Self::Sad => "Sad",
            Self::Frustrated => "Frustrated",
            Self::InPain => "In Pain",
            Self::Tired => "Tired",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Happy" => Some(Self::Happy),
            "Calm" => Some(Self::Calm),
            "Neutral" => Some(Self::Neutral),
            "Worried" => Some(Self::Worried),
            "Sad" => Some(Self::Sad),
            "Frustrated" => Some(Self::Frustrated),
            "In Pain" => Some(Self::InPain),
            "Tired" => Some(Self::Tired),
            _ => None,
        }
    }

    #[must_use]
    pub fn emoji(self) -> &'static str {
        match self {
            Self::Happy => "😊",
            Self::Calm => "😌",
            Self::Neutral => "😐",
            Self::Worried => "😟",
            Self::Sad => "😢",
            Self::Frustrated => "😤",
            Self::InPain => "😣",
            Self::Tired => "😴",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ReminderDay {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl ReminderDay {
    pub const ALL: [Self; 7] = [
        Self::Mon,
        Self::Tue,
        Self::Wed,
        Self::Thu,
        Self::Fri,
        Self::Sat,
        Self::Sun,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mon => "mon",
            Self::Tue => "tue",
            Self::Wed => "wed",
            Self::Thu => "thu",
            Self::Fri => "fri",
            Self::Sat => "sat",
            Self::Sun => "sun",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "mon" => Some(Self::Mon),
            "tue" => Some(Self::Tue),
            "wed" => Some(Self::Wed),
            "thu" => Some(Self::Thu),
            "fri" => Some(Self::Fri),
            "sat" => Some(Self::Sat),
            "sun" => Some(Self::Sun),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Mon => "Mon",
            Self::Tue => "Tue",
            Self::Wed => "Wed",
            Self::Thu => "Thu",
            Self::Fri => "Fri",
            Self::Sat => "Sat",
            Self::Sun => "Sun",
        }
    }
}

/// One pain reading. The pain journal is append-only, so entries carry no id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PainEntry {
    #[serde(with = "serde_date")]
    pub date: Date,
    pub level: u8,
    pub location: BodyLocation,
}

impl PainEntry {
    /// # Errors
    ///
    /// Returns a validation error when the level falls outside the 1-10 scale.
    pub fn validate(&self) -> Result<(), CompanionError> {
        if !(1..=10).contains(&self.level) {
            return Err(CompanionError::Validation(
                "pain level MUST be between 1 and 10".to_string(),
            ));
        }
        Ok(())
    }
}

/// One night of sleep, keyed by the wake-up date. Duration is always derived
/// from the two clock times, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SleepEntry {
    #[serde(with = "serde_date")]
    pub date: Date,
    #[serde(with = "serde_hhmm")]
    pub bed_time: Time,
    #[serde(with = "serde_hhmm")]
    pub wake_time: Time,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<u8>,
}

impl SleepEntry {
    /// Hours slept, rounded to one decimal place. A wake time earlier in the
    /// day than the bed time is read as crossing midnight.
    #[must_use]
    pub fn duration_hours(&self) -> f64 {
        let mut minutes = (self.wake_time - self.bed_time).whole_minutes();
        if minutes < 0 {
            minutes += 24 * 60;
        }
        let hours = minutes as f64 / 60.0;
        (hours * 10.0).round() / 10.0
    }

    /// # Errors
    ///
    /// Returns a validation error when the quality rating falls outside 1-5.
    pub fn validate(&self) -> Result<(), CompanionError> {
        if let Some(quality) = self.quality {
            if !(1..=5).contains(&quality) {
                return Err(CompanionError::Validation(
                    "sleep quality MUST be between 1 and 5".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Accumulated sitting minutes for one calendar day.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct SittingDay {
    #[serde(with = "serde_date")]
    pub date: Date,
    pub duration: u32,
}

/// One journaled mood, keyed by date.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct MoodEntry {
    #[serde(with = "serde_date")]
    pub date: Date,
    pub mood: MoodKind,
    pub journal: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct Reminder {
    pub id: EntryId,
    #[serde(with = "serde_hhmm")]
    pub time: Time,
    pub enabled: bool,
    pub label: String,
    pub days: Vec<ReminderDay>,
}

impl Reminder {
    /// # Errors
    ///
    /// Returns a validation error when the weekday set is empty.
    pub fn validate(&self) -> Result<(), CompanionError> {
        if self.days.is_empty() {
            return Err(CompanionError::Validation(
                "a reminder MUST cover at least one weekday".to_string(),
            ));
        }
        Ok(())
    }

    /// Compressed rendering of the weekday set, e.g. "Weekdays" for mon-fri.
    #[must_use]
    pub fn days_label(&self) -> String {
        let weekdays = [
            ReminderDay::Mon,
            ReminderDay::Tue,
            ReminderDay::Wed,
            ReminderDay::Thu,
            ReminderDay::Fri,
        ];
        let weekend = [ReminderDay::Sat, ReminderDay::Sun];
        let covers = |set: &[ReminderDay]| {
            self.days.len() == set.len() && set.iter().all(|day| self.days.contains(day))
        };
        if covers(&ReminderDay::ALL) {
            return "Every day".to_string();
        }
        if covers(&weekdays) {
            return "Weekdays".to_string();
        }
        if covers(&weekend) {
            return "Weekends".to_string();
        }
        let labels: Vec<&str> = self.days.iter().map(|day| day.label()).collect();
        labels.join(", ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommunityPost {
    pub id: EntryId,
    pub author: String,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub posted_at: OffsetDateTime,
    pub likes: u32,
    pub liked: bool,
    pub comments: u32,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CommunityPost {
    /// # Errors
    ///
    /// Returns a validation error when the content is empty or whitespace.
    pub fn validate(&self) -> Result<(), CompanionError> {
        if self.content.trim().is_empty() {
            return Err(CompanionError::Validation(
                "post content MUST NOT be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// The signed-in pair handed back by the identity provider and kept as the
/// session.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct UserIdentity {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub age: String,
    pub gender: String,
    pub pain_history: String,
}

impl UserProfile {
    /// First-run profile derived from the session, matching the original
    /// placeholder content.
    #[must_use]
    pub fn default_for(identity: &UserIdentity) -> Self {
        Self {
            name: identity.name.clone(),
            email: identity.email.clone(),
            age: "35".to_string(),
            gender: "female".to_string(),
            pain_history: "Chronic lower back pain for 3 years, worse after prolonged sitting"
                .to_string(),
        }
    }
}

/// Running sitting-timer state persisted across process restarts.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSitting {
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
}
