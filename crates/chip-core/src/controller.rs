//! Framework-agnostic tracker controller.
//!
//! Owns a [`TrackerState`] and the [`SessionTimer`] that feeds it, keeping
//! the two in lockstep:
//!
//! - Commands go through [`TrackerController::dispatch`], which applies them
//!   and then starts or cancels the timer to match the session status.
//! - Ticks are drained with [`TrackerController::recv`] (async, for
//!   `tokio::select!` loops) or [`TrackerController::try_recv`].

use tokio::sync::mpsc;

use crate::timer::{SessionTimer, Tick};
use crate::tracker::{Command, LogCategory, StateChanged, TrackerState};

/// Outcome of processing a single timer event.
#[derive(Debug)]
pub enum PollResult {
    /// A tick was applied; the returned [`StateChanged`] flags describe what
    /// was modified (all-false for a stale tick).
    Updated(StateChanged),
    /// No event was available (channel empty).
    Empty,
}

/// Owns the tracker state and its session timer.
pub struct TrackerController {
    pub state: TrackerState,
    timer: Option<SessionTimer>,
    tick_tx: mpsc::UnboundedSender<Tick>,
    tick_rx: mpsc::UnboundedReceiver<Tick>,
}

impl TrackerController {
    pub fn new() -> Self {
        Self::with_state(TrackerState::new())
    }

    /// Wrap an existing state. A running session gets a fresh timer on the
    /// next [`dispatch`](Self::dispatch).
    pub fn with_state(state: TrackerState) -> Self {
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        Self {
            state,
            timer: None,
            tick_tx,
            tick_rx,
        }
    }

    /// Apply a command and bring the timer in line with the session status.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&mut self, cmd: Command) -> StateChanged {
        let changed = self.state.apply(&cmd);
        self.sync_timer();
        changed
    }

    /// Try to receive and process one tick (non-blocking).
    pub fn try_recv(&mut self) -> PollResult {
        match self.tick_rx.try_recv() {
            Ok(tick) => self.handle_tick(tick),
            Err(_) => PollResult::Empty,
        }
    }

    /// Await the next tick.
    ///
    /// Pending forever while no session is running, which makes it safe to
    /// use as a `tokio::select!` branch.
    pub async fn recv(&mut self) -> PollResult {
        match self.tick_rx.recv().await {
            Some(tick) => self.handle_tick(tick),
            // We hold a sender, so the channel never closes.
            None => PollResult::Empty,
        }
    }

    /// Whether a ticker task is currently alive.
    pub fn timer_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Borrow the underlying [`TrackerState`] immutably.
    pub fn tracker_state(&self) -> &TrackerState {
        &self.state
    }

    /// Append a local feedback message to the event log.
    pub fn add_message(&mut self, text: String, category: LogCategory) {
        self.state.add_message(text, category);
    }

    // -- private -----------------------------------------------------------

    fn handle_tick(&mut self, tick: Tick) -> PollResult {
        let changed = self.state.apply(&Command::Tick { epoch: tick.epoch });
        PollResult::Updated(changed)
    }

    fn sync_timer(&mut self) {
        let wanted = self.state.timer_epoch();
        let current = self.timer.as_ref().map(SessionTimer::epoch);
        if wanted == current {
            return;
        }
        // Dropping the old handle aborts its task.
        self.timer = wanted.map(|epoch| SessionTimer::spawn(epoch, self.tick_tx.clone()));
    }
}

impl Default for TrackerController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::session::SessionStatus;

    fn with_players() -> TrackerController {
        let mut ctrl = TrackerController::new();
        for buy_in in ["10", "20"] {
            ctrl.state.apply(&Command::AddPlayer {
                name: String::new(),
                buy_in: buy_in.to_string(),
            });
        }
        ctrl
    }

    /// Let the runtime run for `secs` and a half seconds, applying every tick.
    async fn run_for(ctrl: &mut TrackerController, secs: u64) {
        let deadline = tokio::time::Instant::now() + Duration::from_millis(secs * 1_000 + 500);
        loop {
            tokio::select! {
                _ = ctrl.recv() => {}
                _ = tokio::time::sleep_until(deadline) => break,
            }
        }
        while let PollResult::Updated(_) = ctrl.try_recv() {}
    }

    #[tokio::test(start_paused = true)]
    async fn counts_whole_seconds_while_running() {
        let mut ctrl = with_players();
        assert!(!ctrl.timer_running());

        ctrl.dispatch(Command::StartSession);
        assert!(ctrl.timer_running());
        run_for(&mut ctrl, 5).await;
        assert_eq!(ctrl.state.session().duration_seconds(), 5);

        ctrl.dispatch(Command::StopSession);
        assert!(!ctrl.timer_running());
        run_for(&mut ctrl, 5).await;
        assert_eq!(ctrl.state.session().duration_seconds(), 5);
        assert_eq!(
            ctrl.state.reconciliation().unwrap().handoff().duration_seconds,
            5
        );
    }

    #[tokio::test(start_paused = true)]
    async fn no_drift_across_cycles() {
        let mut ctrl = with_players();
        for _ in 0..3 {
            ctrl.dispatch(Command::StartSession);
            run_for(&mut ctrl, 2).await;
            ctrl.dispatch(Command::ResetSession);
            assert_eq!(ctrl.state.session().duration_seconds(), 0);
            assert!(!ctrl.timer_running());
        }

        ctrl.dispatch(Command::StartSession);
        run_for(&mut ctrl, 3).await;
        ctrl.dispatch(Command::StopSession);
        assert_eq!(ctrl.state.session().duration_seconds(), 3);

        ctrl.dispatch(Command::ReturnToTable);
        assert_eq!(ctrl.state.session().status(), SessionStatus::NotStarted);
        assert_eq!(ctrl.state.session().duration_seconds(), 0);
        assert!(!ctrl.timer_running());
    }

    #[tokio::test(start_paused = true)]
    async fn stale_tick_in_channel_is_dropped() {
        let mut ctrl = with_players();
        ctrl.dispatch(Command::StartSession);
        let old_epoch = ctrl.state.timer_epoch().unwrap();
        ctrl.dispatch(Command::ResetSession);
        ctrl.dispatch(Command::StartSession);

        // A tick from the cancelled timer that was already queued.
        tokio_test::assert_ok!(ctrl.tick_tx.send(Tick { epoch: old_epoch }));
        match ctrl.try_recv() {
            PollResult::Updated(changed) => assert!(!changed.any()),
            PollResult::Empty => panic!("expected the queued tick"),
        }
        assert_eq!(ctrl.state.session().duration_seconds(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn refused_command_keeps_timer_idle() {
        let mut ctrl = with_players();
        let changed = ctrl.dispatch(Command::StopSession);
        assert!(!changed.any());
        assert!(!ctrl.timer_running());
        assert!(matches!(ctrl.try_recv(), PollResult::Empty));
    }
}
