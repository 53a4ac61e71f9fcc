use std::collections::VecDeque;

use crate::money::{format_duration, format_money};
use crate::reconciliation::{Handoff, Reconciliation, Verdict};
use crate::roster::{PlayerId, Roster};
use crate::session::{Session, SessionAction, SessionStatus};

/// Maximum number of events kept in the log.
const EVENT_LOG_CAPACITY: usize = 100;

/// Semantic category for log/event messages. The UI layer decides how to style each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogCategory {
    System,
    Roster,
    Success,
    Warning,
    Info,
}

/// A structured tracker event. Frontends render these however they see fit.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerEvent {
    /// A player took a seat.
    PlayerAdded {
        id: PlayerId,
        name: String,
        chips: f64,
        position: u8,
    },
    /// A player left the table.
    PlayerRemoved { id: PlayerId, name: String },
    /// A player's name or buy-in changed.
    PlayerEdited {
        id: PlayerId,
        name: String,
        chips: f64,
    },
    /// The session clock started.
    SessionStarted,
    /// The session ended and reconciliation began.
    SessionEnded {
        duration_seconds: u64,
        total_buy_in: f64,
    },
    /// The session went back to not-started.
    SessionReset,
    /// Final counts were validated.
    Reconciled { verdict: Verdict },
    /// Generic text message (used by the UI layer for local feedback).
    Text { text: String, category: LogCategory },
}

impl TrackerEvent {
    /// Semantic category for styling purposes.
    pub fn category(&self) -> LogCategory {
        match self {
            Self::PlayerAdded { .. } | Self::PlayerRemoved { .. } | Self::PlayerEdited { .. } => {
                LogCategory::Roster
            }
            Self::SessionStarted | Self::SessionEnded { .. } | Self::SessionReset => {
                LogCategory::System
            }
            Self::Reconciled { verdict } => match verdict {
                Verdict::Balanced { .. } => LogCategory::Success,
                Verdict::Mismatch { .. } => LogCategory::Warning,
                Verdict::Incomplete => LogCategory::Info,
            },
            Self::Text { category, .. } => *category,
        }
    }

    /// One-line human-readable description.
    pub fn describe(&self) -> String {
        match self {
            Self::PlayerAdded {
                id,
                name,
                chips,
                position,
            } => format!(
                "{} ({}) sat at seat {} with {}",
                name,
                id,
                position + 1,
                format_money(*chips)
            ),
            Self::PlayerRemoved { id, name } => format!("{} ({}) left the table", name, id),
            Self::PlayerEdited { name, chips, .. } => {
                format!("{} now has {}", name, format_money(*chips))
            }
            Self::SessionStarted => "Session started".to_string(),
            Self::SessionEnded {
                duration_seconds,
                total_buy_in,
            } => format!(
                "Session ended after {} | Total buy-in {}",
                format_duration(*duration_seconds),
                format_money(*total_buy_in)
            ),
            Self::SessionReset => "Session reset".to_string(),
            Self::Reconciled { verdict } => verdict.to_string(),
            Self::Text { text, .. } => text.clone(),
        }
    }
}

/// Describes what changed after applying a [`Command`].
///
/// All flags default to `false`; an all-false value means the command was
/// refused or had no effect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateChanged {
    /// Players were added, removed, or edited.
    pub roster: bool,
    /// The session status changed.
    pub session: bool,
    /// The elapsed-time counter changed.
    pub timer: bool,
    /// The interaction mode changed.
    pub mode: bool,
    /// The visible screen changed.
    pub screen: bool,
    /// Reconciliation entries or verdict changed.
    pub verdict: bool,
}

impl StateChanged {
    /// Returns `true` if any flag is set.
    pub fn any(self) -> bool {
        self.roster || self.session || self.timer || self.mode || self.screen || self.verdict
    }
}

/// What the table is currently doing with player clicks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Idle,
    /// The add-player panel is open.
    Adding,
    /// The edit panel is open for this player.
    Editing(PlayerId),
    /// The next player picked is removed.
    Removing,
}

/// Which screen the app is showing.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Screen {
    #[default]
    Table,
    Reconciliation(Reconciliation),
}

/// Everything the host can ask the tracker to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    OpenAddPanel,
    AddPlayer { name: String, buy_in: String },
    BeginRemove,
    RemovePlayer(PlayerId),
    BeginEdit(PlayerId),
    CommitEdit { name: String, buy_in: String },
    /// Close the add/edit panel or leave remove mode without changes.
    CancelPanel,
    StartSession,
    StopSession,
    ResetSession,
    /// One second elapsed on the timer started under `epoch`.
    Tick { epoch: u64 },
    RecordFinalCount { id: PlayerId, text: String },
    Validate,
    ReturnToTable,
}

/// Contains all tracker data: roster, session, interaction mode, and screen.
#[derive(Debug, Clone, Default)]
pub struct TrackerState {
    /// Structured events, oldest first.
    pub events: VecDeque<TrackerEvent>,
    /// Events ever logged, including evicted ones.
    logged: u64,
    roster: Roster,
    session: Session,
    mode: Mode,
    screen: Screen,
}

impl TrackerState {
    pub fn new() -> Self {
        let mut state = Self::default();
        state.add_message(
            "Welcome! Add players, then start the session.".to_string(),
            LogCategory::System,
        );
        state
    }

    /// A tracker opening on the four-player table from
    /// [`Roster::opening_table`].
    pub fn opening_table() -> Self {
        let mut state = Self::new();
        state.roster = Roster::opening_table();
        state
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// The reconciliation in progress, if the session has ended.
    pub fn reconciliation(&self) -> Option<&Reconciliation> {
        match &self.screen {
            Screen::Reconciliation(rec) => Some(rec),
            Screen::Table => None,
        }
    }

    /// Total buy-in currently on the table.
    pub fn pot(&self) -> f64 {
        self.roster.pot()
    }

    /// The epoch a running timer should tick under, or `None` when no timer
    /// should be running.
    pub fn timer_epoch(&self) -> Option<u64> {
        self.session.is_running().then(|| self.session.epoch())
    }

    pub fn can_edit_roster(&self) -> bool {
        self.screen == Screen::Table && self.session.status() != SessionStatus::Ended
    }

    pub fn can_add_player(&self) -> bool {
        self.can_edit_roster() && !self.roster.is_full()
    }

    pub fn can_start(&self) -> bool {
        self.screen == Screen::Table && self.session.can(SessionAction::Start)
    }

    pub fn can_stop(&self) -> bool {
        self.screen == Screen::Table && self.session.can(SessionAction::Stop)
    }

    pub fn can_reset(&self) -> bool {
        self.screen == Screen::Table && self.session.can(SessionAction::Reset)
    }

    /// Append an event, keeping only the last [`EVENT_LOG_CAPACITY`] entries.
    pub fn add_event(&mut self, event: TrackerEvent) {
        self.events.push_back(event);
        self.logged += 1;
        if self.events.len() > EVENT_LOG_CAPACITY {
            self.events.pop_front();
        }
    }

    /// Sequence number of the oldest kept event. Event `i` of
    /// [`events`](Self::events) has sequence number `first_event_seq() + i`,
    /// which stays attached to that event as older ones are evicted.
    pub fn first_event_seq(&self) -> u64 {
        self.logged - self.events.len() as u64
    }

    /// Convenience: append a [`TrackerEvent::Text`] for ad-hoc messages.
    pub fn add_message(&mut self, text: String, category: LogCategory) {
        self.add_event(TrackerEvent::Text { text, category });
    }

    /// Apply a command to the tracker.
    ///
    /// Refused commands leave the state untouched and return an all-false
    /// [`StateChanged`].
    pub fn apply(&mut self, cmd: &Command) -> StateChanged {
        let mut changed = StateChanged::default();

        match cmd {
            Command::OpenAddPanel => {
                if self.can_add_player() {
                    changed.mode = self.set_mode(Mode::Adding);
                }
            }
            Command::AddPlayer { name, buy_in } => {
                if !self.can_edit_roster() {
                    return refused(cmd, "roster is locked");
                }
                match self.roster.add(name, buy_in) {
                    Ok(id) => {
                        if let Some(p) = self.roster.get(id) {
                            let event = TrackerEvent::PlayerAdded {
                                id,
                                name: p.name.clone(),
                                chips: p.chips,
                                position: p.position,
                            };
                            self.add_event(event);
                        }
                        changed.roster = true;
                        changed.mode = self.set_mode(Mode::Idle);
                    }
                    Err(e) => return refused(cmd, e),
                }
            }
            Command::BeginRemove => {
                if self.can_edit_roster() && !self.roster.is_empty() {
                    changed.mode = self.set_mode(Mode::Removing);
                }
            }
            Command::RemovePlayer(id) => {
                if self.mode != Mode::Removing || !self.can_edit_roster() {
                    return refused(cmd, "not in remove mode");
                }
                match self.roster.remove(*id) {
                    Ok(player) => {
                        self.add_event(TrackerEvent::PlayerRemoved {
                            id: player.id,
                            name: player.name,
                        });
                        changed.roster = true;
                        changed.mode = self.set_mode(Mode::Idle);
                    }
                    Err(e) => return refused(cmd, e),
                }
            }
            Command::BeginEdit(id) => {
                if self.can_edit_roster() && self.roster.get(*id).is_some() {
                    changed.mode = self.set_mode(Mode::Editing(*id));
                }
            }
            Command::CommitEdit { name, buy_in } => {
                let Mode::Editing(id) = self.mode else {
                    return refused(cmd, "no edit open");
                };
                if !self.can_edit_roster() {
                    return refused(cmd, "roster is locked");
                }
                match self.roster.edit(id, name, buy_in) {
                    Ok(p) => {
                        let event = TrackerEvent::PlayerEdited {
                            id,
                            name: p.name.clone(),
                            chips: p.chips,
                        };
                        self.add_event(event);
                        changed.roster = true;
                    }
                    Err(e) => tracing::debug!(error = %e, "edited player vanished"),
                }
                changed.mode = self.set_mode(Mode::Idle);
            }
            Command::CancelPanel => {
                changed.mode = self.set_mode(Mode::Idle);
            }
            Command::StartSession => {
                if self.screen != Screen::Table {
                    return refused(cmd, "reconciliation in progress");
                }
                match self.session.start() {
                    Ok(_) => {
                        self.add_event(TrackerEvent::SessionStarted);
                        changed.session = true;
                        changed.timer = true;
                    }
                    Err(e) => return refused(cmd, e),
                }
            }
            Command::StopSession => {
                if self.screen != Screen::Table {
                    return refused(cmd, "reconciliation in progress");
                }
                match self.session.stop() {
                    Ok(duration_seconds) => {
                        let handoff = Handoff {
                            players: self.roster.snapshot(),
                            total_buy_in: self.roster.pot(),
                            duration_seconds,
                        };
                        self.add_event(TrackerEvent::SessionEnded {
                            duration_seconds,
                            total_buy_in: handoff.total_buy_in,
                        });
                        self.screen = Screen::Reconciliation(Reconciliation::new(handoff));
                        changed.session = true;
                        changed.screen = true;
                        changed.mode = self.set_mode(Mode::Idle);
                    }
                    Err(e) => return refused(cmd, e),
                }
            }
            Command::ResetSession => {
                if self.screen != Screen::Table {
                    return refused(cmd, "reconciliation in progress");
                }
                match self.session.reset() {
                    Ok(()) => {
                        self.add_event(TrackerEvent::SessionReset);
                        changed.session = true;
                        changed.timer = true;
                    }
                    Err(e) => return refused(cmd, e),
                }
            }
            Command::Tick { epoch } => {
                changed.timer = self.session.tick(*epoch);
            }
            Command::RecordFinalCount { id, text } => {
                let Screen::Reconciliation(rec) = &mut self.screen else {
                    return refused(cmd, "session has not ended");
                };
                match rec.record(*id, text) {
                    Ok(()) => changed.verdict = true,
                    Err(e) => return refused(cmd, e),
                }
            }
            Command::Validate => {
                let Screen::Reconciliation(rec) = &mut self.screen else {
                    return refused(cmd, "session has not ended");
                };
                let verdict = rec.validate();
                self.add_event(TrackerEvent::Reconciled { verdict });
                changed.verdict = true;
            }
            Command::ReturnToTable => {
                if self.screen == Screen::Table {
                    return refused(cmd, "already at the table");
                }
                self.screen = Screen::Table;
                if self.session.reset().is_ok() {
                    self.add_event(TrackerEvent::SessionReset);
                }
                changed.screen = true;
                changed.session = true;
                changed.timer = true;
                changed.verdict = true;
            }
        }

        changed
    }

    /// Returns `true` if the mode actually changed.
    fn set_mode(&mut self, mode: Mode) -> bool {
        let changed = self.mode != mode;
        self.mode = mode;
        changed
    }
}

fn refused(cmd: &Command, reason: impl std::fmt::Display) -> StateChanged {
    tracing::debug!(?cmd, %reason, "command refused");
    StateChanged::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(state: &mut TrackerState, name: &str, buy_in: &str) -> StateChanged {
        state.apply(&Command::AddPlayer {
            name: name.to_string(),
            buy_in: buy_in.to_string(),
        })
    }

    fn four_players() -> TrackerState {
        let mut state = TrackerState::new();
        for (name, buy_in) in [("Alice", "10"), ("Bob", "20"), ("Carol", "15"), ("Dave", "20")] {
            add(&mut state, name, buy_in);
        }
        state
    }

    fn ids(state: &TrackerState) -> Vec<PlayerId> {
        state.roster().players().map(|p| p.id).collect()
    }

    fn end_session(state: &mut TrackerState) {
        state.apply(&Command::StartSession);
        state.apply(&Command::StopSession);
    }

    fn enter_counts(state: &mut TrackerState, counts: &[&str]) {
        for (id, text) in ids(state).into_iter().zip(counts) {
            state.apply(&Command::RecordFinalCount {
                id,
                text: text.to_string(),
            });
        }
    }

    #[test]
    fn opening_table_reconciles_at_sixty_five() {
        let mut state = TrackerState::opening_table();
        let seats: Vec<u8> = state.roster().players().map(|p| p.position).collect();
        assert_eq!(seats, vec![0, 3, 5, 7]);
        assert_eq!(format_money(state.pot()), "$65.00");
        assert_eq!(state.session().status(), SessionStatus::NotStarted);

        end_session(&mut state);
        enter_counts(&mut state, &["30", "25", "10", "0"]);
        state.apply(&Command::Validate);
        assert_eq!(
            state.reconciliation().unwrap().verdict(),
            Some(&Verdict::Balanced { total: 65.0 })
        );
    }

    #[test]
    fn add_closes_panel() {
        let mut state = TrackerState::new();
        assert!(state.apply(&Command::OpenAddPanel).mode);
        assert_eq!(state.mode(), Mode::Adding);

        let changed = add(&mut state, "Alice", "");
        assert!(changed.roster && changed.mode);
        assert_eq!(state.mode(), Mode::Idle);
        assert_eq!(state.pot(), 10.0);
        assert!(matches!(
            state.events.back(),
            Some(TrackerEvent::PlayerAdded { position: 0, .. })
        ));
    }

    #[test]
    fn eleventh_add_is_silent_noop() {
        let mut state = TrackerState::new();
        for _ in 0..10 {
            add(&mut state, "", "10");
        }
        assert!(!state.can_add_player());
        let events = state.events.len();
        assert!(!add(&mut state, "Extra", "10").any());
        assert!(!state.apply(&Command::OpenAddPanel).any());
        assert_eq!(state.roster().len(), 10);
        assert_eq!(state.events.len(), events);
    }

    #[test]
    fn remove_mode_exits_after_one_removal() {
        let mut state = four_players();
        let bob = ids(&state)[1];

        // Removal outside remove mode is refused.
        assert!(!state.apply(&Command::RemovePlayer(bob)).any());

        state.apply(&Command::BeginRemove);
        assert_eq!(state.mode(), Mode::Removing);
        assert!(state.apply(&Command::RemovePlayer(bob)).roster);
        assert_eq!(state.mode(), Mode::Idle);
        assert_eq!(state.roster().len(), 3);
        assert_eq!(state.pot(), 45.0);
    }

    #[test]
    fn modes_are_exclusive() {
        let mut state = four_players();
        let alice = ids(&state)[0];
        state.apply(&Command::BeginRemove);
        state.apply(&Command::BeginEdit(alice));
        assert_eq!(state.mode(), Mode::Editing(alice));
        state.apply(&Command::OpenAddPanel);
        assert_eq!(state.mode(), Mode::Adding);
        state.apply(&Command::CancelPanel);
        assert_eq!(state.mode(), Mode::Idle);
    }

    #[test]
    fn edit_commit_and_cancel() {
        let mut state = four_players();
        let alice = ids(&state)[0];

        state.apply(&Command::BeginEdit(alice));
        state.apply(&Command::CancelPanel);
        assert_eq!(state.roster().get(alice).unwrap().chips, 10.0);

        state.apply(&Command::BeginEdit(alice));
        state.apply(&Command::CommitEdit {
            name: String::new(),
            buy_in: "abc".to_string(),
        });
        let p = state.roster().get(alice).unwrap();
        assert_eq!((p.name.as_str(), p.chips), ("Alice", 10.0));

        state.apply(&Command::BeginEdit(alice));
        state.apply(&Command::CommitEdit {
            name: "Alicia".to_string(),
            buy_in: "12.345".to_string(),
        });
        let p = state.roster().get(alice).unwrap();
        assert_eq!((p.name.as_str(), p.chips), ("Alicia", 12.35));
        assert_eq!(state.mode(), Mode::Idle);
    }

    #[test]
    fn commit_without_open_edit_is_refused() {
        let mut state = four_players();
        let changed = state.apply(&Command::CommitEdit {
            name: "X".to_string(),
            buy_in: "1".to_string(),
        });
        assert!(!changed.any());
    }

    #[test]
    fn session_transitions_are_gated() {
        let mut state = four_players();
        assert!(state.can_start());
        assert!(!state.can_stop());
        assert!(!state.can_reset());
        assert!(!state.apply(&Command::StopSession).any());
        assert!(!state.apply(&Command::ResetSession).any());

        state.apply(&Command::StartSession);
        assert_eq!(state.timer_epoch(), Some(state.session().epoch()));
        assert!(state.can_stop() && state.can_reset());
        assert!(!state.apply(&Command::StartSession).any());

        state.apply(&Command::ResetSession);
        assert_eq!(state.session().status(), SessionStatus::NotStarted);
        assert_eq!(state.timer_epoch(), None);
    }

    #[test]
    fn ticks_follow_status() {
        let mut state = four_players();
        state.apply(&Command::StartSession);
        let epoch = state.timer_epoch().unwrap();
        for _ in 0..5 {
            assert!(state.apply(&Command::Tick { epoch }).timer);
        }
        assert_eq!(state.session().duration_seconds(), 5);

        state.apply(&Command::StopSession);
        assert!(!state.apply(&Command::Tick { epoch }).any());
        let rec = state.reconciliation().unwrap();
        assert_eq!(rec.handoff().duration_seconds, 5);
    }

    #[test]
    fn stop_hands_off_roster_and_pot() {
        let mut state = four_players();
        state.apply(&Command::StartSession);
        state.apply(&Command::BeginRemove);
        let changed = state.apply(&Command::StopSession);
        assert!(changed.screen && changed.session);
        assert_eq!(state.mode(), Mode::Idle);

        let handoff = state.reconciliation().unwrap().handoff();
        assert_eq!(handoff.players.len(), 4);
        assert_eq!(handoff.total_buy_in, 65.0);
        assert!(!state.can_edit_roster());
        assert!(!add(&mut state, "Late", "10").any());
    }

    #[test]
    fn balanced_reconciliation() {
        let mut state = four_players();
        end_session(&mut state);
        enter_counts(&mut state, &["5", "25", "15", "20"]);
        state.apply(&Command::Validate);
        let verdict = state.reconciliation().unwrap().verdict().unwrap();
        assert!(verdict.to_string().contains("$65.00"));
        assert_eq!(state.events.back().unwrap().category(), LogCategory::Success);
    }

    #[test]
    fn mismatched_reconciliation() {
        let mut state = four_players();
        end_session(&mut state);
        enter_counts(&mut state, &["5", "25", "15", "15"]);
        state.apply(&Command::Validate);
        let message = state
            .reconciliation()
            .unwrap()
            .verdict()
            .unwrap()
            .to_string();
        assert!(message.contains("-$5.00"));
        assert!(message.contains("$65.00"));
        assert!(message.contains("$60.00"));
    }

    #[test]
    fn incomplete_reconciliation() {
        let mut state = four_players();
        end_session(&mut state);
        enter_counts(&mut state, &["5", "25", "15"]);
        state.apply(&Command::Validate);
        assert_eq!(
            state.reconciliation().unwrap().verdict(),
            Some(&Verdict::Incomplete)
        );
    }

    #[test]
    fn return_to_table_keeps_roster_and_resets_session() {
        let mut state = four_players();
        state.apply(&Command::StartSession);
        let epoch = state.timer_epoch().unwrap();
        state.apply(&Command::Tick { epoch });
        state.apply(&Command::StopSession);
        enter_counts(&mut state, &["1", "2"]);

        let changed = state.apply(&Command::ReturnToTable);
        assert!(changed.screen && changed.session);
        assert_eq!(*state.screen(), Screen::Table);
        assert_eq!(state.session().status(), SessionStatus::NotStarted);
        assert_eq!(state.session().duration_seconds(), 0);
        assert_eq!(state.roster().len(), 4);
        assert!(state.can_start());

        // A fresh session gets a fresh reconciliation.
        end_session(&mut state);
        assert_eq!(state.reconciliation().unwrap().entered_count(), 0);
    }

    #[test]
    fn reconciliation_commands_need_ended_session() {
        let mut state = four_players();
        let alice = ids(&state)[0];
        assert!(!state.apply(&Command::Validate).any());
        assert!(
            !state
                .apply(&Command::RecordFinalCount {
                    id: alice,
                    text: "5".to_string(),
                })
                .any()
        );
        assert!(!state.apply(&Command::ReturnToTable).any());
    }

    #[test]
    fn event_log_is_bounded() {
        let mut state = TrackerState::new();
        for i in 0..150 {
            state.add_message(format!("msg {i}"), LogCategory::Info);
        }
        assert_eq!(state.events.len(), EVENT_LOG_CAPACITY);
        assert_eq!(state.events.back().unwrap().describe(), "msg 149");
    }

    #[test]
    fn event_sequence_survives_eviction() {
        let mut state = TrackerState::new();
        assert_eq!(state.first_event_seq(), 0);
        for i in 0..EVENT_LOG_CAPACITY {
            state.add_message(format!("msg {i}"), LogCategory::Info);
        }
        // Welcome message plus 100 more: the welcome (seq 0) was evicted.
        assert_eq!(state.first_event_seq(), 1);
        assert_eq!(state.events.front().unwrap().describe(), "msg 0");

        state.add_message("msg 100".to_string(), LogCategory::Info);
        assert_eq!(state.first_event_seq(), 2);
        assert_eq!(state.events.front().unwrap().describe(), "msg 1");
    }
}
