//! Cancelable one-second session ticker.
//!
//! A [`SessionTimer`] owns a background tokio task that sends a
//! [`Tick`] over an mpsc channel once per second. Dropping the handle (or
//! calling [`SessionTimer::cancel`]) aborts the task, so no timer outlives
//! the session run that started it.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};

/// Interval between ticks.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// One elapsed second, tagged with the session epoch it was counted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub epoch: u64,
}

/// Handle to a running ticker task.
#[derive(Debug)]
pub struct SessionTimer {
    epoch: u64,
    task: JoinHandle<()>,
}

impl SessionTimer {
    /// Spawn a ticker for `epoch`. The first tick fires one period from now.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(epoch: u64, ticks: mpsc::UnboundedSender<Tick>) -> Self {
        let first = Instant::now() + TICK_PERIOD;
        let task = tokio::spawn(async move {
            let mut interval = interval_at(first, TICK_PERIOD);
            loop {
                interval.tick().await;
                if ticks.send(Tick { epoch }).is_err() {
                    break;
                }
            }
        });
        tracing::debug!(epoch, "session timer started");
        Self { epoch, task }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Stop the ticker. Equivalent to dropping the handle.
    pub fn cancel(self) {}
}

impl Drop for SessionTimer {
    fn drop(&mut self) {
        self.task.abort();
        tracing::debug!(epoch = self.epoch, "session timer cancelled");
    }
}
