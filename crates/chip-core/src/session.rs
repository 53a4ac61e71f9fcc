//! Session lifecycle and elapsed-time counter.

use std::fmt;

use thiserror::Error;

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionStatus {
    #[default]
    NotStarted,
    InProgress,
    Ended,
}

impl SessionStatus {
    pub fn label(self) -> &'static str {
        match self {
            SessionStatus::NotStarted => "Not started",
            SessionStatus::InProgress => "In progress",
            SessionStatus::Ended => "Ended",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A lifecycle transition requested by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    Start,
    Stop,
    Reset,
}

impl fmt::Display for SessionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SessionAction::Start => "start",
            SessionAction::Stop => "stop",
            SessionAction::Reset => "reset",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("cannot {action} a session that is {from}")]
    InvalidTransition {
        from: SessionStatus,
        action: SessionAction,
    },
}

/// Session status plus the whole seconds counted while in progress.
///
/// The epoch changes on every transition. Timers are tagged with the epoch
/// they were started under, and ticks carrying any other epoch are ignored,
/// so a tick that was already queued when the timer was cancelled can never
/// be counted.
#[derive(Debug, Clone, Default)]
pub struct Session {
    status: SessionStatus,
    duration_seconds: u64,
    epoch: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn duration_seconds(&self) -> u64 {
        self.duration_seconds
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_running(&self) -> bool {
        self.status == SessionStatus::InProgress
    }

    pub fn can(&self, action: SessionAction) -> bool {
        match action {
            SessionAction::Start => self.status == SessionStatus::NotStarted,
            SessionAction::Stop => self.status == SessionStatus::InProgress,
            SessionAction::Reset => self.status != SessionStatus::NotStarted,
        }
    }

    /// Begin counting from zero. Returns the epoch ticks must carry.
    pub fn start(&mut self) -> Result<u64, SessionError> {
        self.check(SessionAction::Start)?;
        self.status = SessionStatus::InProgress;
        self.duration_seconds = 0;
        self.epoch += 1;
        tracing::info!(epoch = self.epoch, "session started");
        Ok(self.epoch)
    }

    /// End the session. Returns the frozen duration.
    pub fn stop(&mut self) -> Result<u64, SessionError> {
        self.check(SessionAction::Stop)?;
        self.status = SessionStatus::Ended;
        self.epoch += 1;
        tracing::info!(duration_seconds = self.duration_seconds, "session stopped");
        Ok(self.duration_seconds)
    }

    /// Return to not-started and zero the counter.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        self.check(SessionAction::Reset)?;
        self.status = SessionStatus::NotStarted;
        self.duration_seconds = 0;
        self.epoch += 1;
        tracing::info!("session reset");
        Ok(())
    }

    /// Count one elapsed second. Returns `false` if the tick was stale.
    pub fn tick(&mut self, epoch: u64) -> bool {
        if self.status != SessionStatus::InProgress || epoch != self.epoch {
            tracing::trace!(epoch, current = self.epoch, "dropping stale tick");
            return false;
        }
        self.duration_seconds += 1;
        true
    }

    fn check(&self, action: SessionAction) -> Result<(), SessionError> {
        if self.can(action) {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                from: self.status,
                action,
            })
        }
    }
}
