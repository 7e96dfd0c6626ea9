use time::{Duration, OffsetDateTime};

use crate::error::CompanionError;

/// Sitting session state machine. The clock is injected on every call so the
/// timer itself never reads the system time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTimer {
    Idle,
    Running { started_at: OffsetDateTime },
}

impl SessionTimer {
    /// # Errors
    ///
    /// Returns a timer error when a session is already running; starting
    /// never silently resets the clock.
    pub fn start(&mut self, now: OffsetDateTime) -> Result<(), CompanionError> {
        match self {
            Self::Idle => {
                *self = Self::Running { started_at: now };
                Ok(())
            }
            Self::Running { .. } => Err(CompanionError::Timer(
                "a sitting session is already being tracked".to_string(),
            )),
        }
    }

    /// Ends the running session and returns its elapsed duration for the
    /// caller to fold into today's sitting record.
    ///
    /// # Errors
    ///
    /// Returns a timer error when no session is running.
    pub fn stop(&mut self, now: OffsetDateTime) -> Result<Duration, CompanionError> {
        match *self {
            Self::Running { started_at } => {
                *self = Self::Idle;
                Ok(now - started_at)
            }
            Self::Idle => Err(CompanionError::Timer(
                "no sitting session is being tracked".to_string(),
            )),
        }
    }

    /// Read-only sample of the running duration; never transitions state.
    #[must_use]
    pub fn elapsed(&self, now: OffsetDateTime) -> Option<Duration> {
        match *self {
            Self::Running { started_at } => Some(now - started_at),
            Self::Idle => None,
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }
}
