//! Ratatui TUI frontend for the chip tracker.
//!
//! Terminal lifecycle and input → command mapping. All tracker state lives
//! in [`chip_core::tracker`]; drawing lives in [`crate::render`].

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};

use chip_core::roster::PlayerId;
use chip_core::tracker::{Command, LogCategory, Mode, Screen, TrackerState};

use crate::input::InputField;
use crate::render;

// ---------------------------------------------------------------------------
// UserIntent: result of processing user input
// ---------------------------------------------------------------------------

/// The result of processing a user input event.
#[derive(Debug, PartialEq)]
pub enum UserIntent {
    /// No action needed (e.g. the event was purely cosmetic).
    None,
    /// The user wants to quit / close the application.
    Quit,
    /// A command for the tracker.
    Dispatch(Command),
    /// Local feedback message. The event loop should route this through
    /// [`TrackerController::add_message`](chip_core::controller::TrackerController::add_message).
    Feedback(String, LogCategory),
}

// ---------------------------------------------------------------------------
// TUI-only state
// ---------------------------------------------------------------------------

/// Which field of the player form has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormField {
    Name,
    BuyIn,
}

/// Draft for the add/edit player panel.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlayerForm {
    /// The player being edited, or `None` when adding.
    pub target: Option<PlayerId>,
    pub name: InputField,
    pub buy_in: InputField,
    pub focus: FormField,
}

impl PlayerForm {
    fn for_mode(mode: Mode, gs: &TrackerState) -> Option<Self> {
        match mode {
            Mode::Adding => Some(Self {
                target: None,
                name: InputField::default(),
                buy_in: InputField::default(),
                focus: FormField::Name,
            }),
            Mode::Editing(id) => {
                let player = gs.roster().get(id)?;
                Some(Self {
                    target: Some(id),
                    name: InputField::with_value(player.name.clone()),
                    buy_in: InputField::with_value(player.chips.to_string()),
                    focus: FormField::Name,
                })
            }
            Mode::Idle | Mode::Removing => None,
        }
    }

    fn focused(&mut self) -> &mut InputField {
        match self.focus {
            FormField::Name => &mut self.name,
            FormField::BuyIn => &mut self.buy_in,
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            FormField::Name => FormField::BuyIn,
            FormField::BuyIn => FormField::Name,
        };
    }

    fn submit(&self) -> Command {
        let name = self.name.value().to_string();
        let buy_in = self.buy_in.value().to_string();
        match self.target {
            None => Command::AddPlayer { name, buy_in },
            Some(_) => Command::CommitEdit { name, buy_in },
        }
    }
}

/// UI-layer state that lives alongside (but separate from) the tracker state.
#[derive(Debug, Default)]
pub(crate) struct TuiState {
    /// Highlighted row in the player list.
    pub selected_player: usize,
    /// Highlighted row on the reconciliation screen.
    pub selected_entry: usize,
    /// Open add/edit panel, mirroring [`Mode::Adding`] / [`Mode::Editing`].
    pub form: Option<PlayerForm>,
    /// Show help popup
    pub show_help: bool,
}

impl TuiState {
    /// Re-sync UI state after the tracker changed.
    pub fn sync(&mut self, gs: &TrackerState) {
        let wanted_target = match gs.mode() {
            Mode::Adding => Some(None),
            Mode::Editing(id) => Some(Some(id)),
            Mode::Idle | Mode::Removing => None,
        };
        let current_target = self.form.as_ref().map(|f| f.target);
        if wanted_target != current_target {
            self.form = PlayerForm::for_mode(gs.mode(), gs);
        }

        let players = gs.roster().len();
        self.selected_player = self.selected_player.min(players.saturating_sub(1));
        let entries = gs
            .reconciliation()
            .map(|rec| rec.handoff().players.len())
            .unwrap_or(0);
        self.selected_entry = self.selected_entry.min(entries.saturating_sub(1));
    }

    fn selected_player_id(&self, gs: &TrackerState) -> Option<PlayerId> {
        gs.roster()
            .players()
            .nth(self.selected_player)
            .map(|p| p.id)
    }

    /// Translate a key press into a [`UserIntent`].
    pub fn handle_key(&mut self, key: KeyEvent, gs: &TrackerState) -> UserIntent {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return UserIntent::Quit;
        }
        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::F(1)) {
                self.show_help = false;
            }
            return UserIntent::None;
        }
        if key.code == KeyCode::F(1) {
            self.show_help = true;
            return UserIntent::None;
        }

        match gs.screen() {
            Screen::Reconciliation(_) => self.handle_reconciliation_key(key, gs),
            Screen::Table if self.form.is_some() => self.handle_form_key(key),
            Screen::Table => self.handle_table_key(key, gs),
        }
    }

    fn handle_table_key(&mut self, key: KeyEvent, gs: &TrackerState) -> UserIntent {
        let removing = gs.mode() == Mode::Removing;
        match key.code {
            KeyCode::Esc if removing => UserIntent::Dispatch(Command::CancelPanel),
            KeyCode::Esc | KeyCode::Char('q') => UserIntent::Quit,
            KeyCode::Up => {
                self.selected_player = self.selected_player.saturating_sub(1);
                UserIntent::None
            }
            KeyCode::Down => {
                if self.selected_player + 1 < gs.roster().len() {
                    self.selected_player += 1;
                }
                UserIntent::None
            }
            KeyCode::Char('a') => {
                if gs.can_add_player() {
                    UserIntent::Dispatch(Command::OpenAddPanel)
                } else {
                    UserIntent::None
                }
            }
            KeyCode::Char('r') => {
                if removing {
                    UserIntent::Dispatch(Command::CancelPanel)
                } else if gs.can_edit_roster() && !gs.roster().is_empty() {
                    UserIntent::Dispatch(Command::BeginRemove)
                } else {
                    UserIntent::None
                }
            }
            KeyCode::Enter | KeyCode::Char('e') => {
                let Some(id) = self.selected_player_id(gs) else {
                    return UserIntent::Feedback(
                        "No players yet. Press 'a' to add one.".to_string(),
                        LogCategory::Info,
                    );
                };
                if !gs.can_edit_roster() {
                    UserIntent::None
                } else if removing {
                    UserIntent::Dispatch(Command::RemovePlayer(id))
                } else {
                    UserIntent::Dispatch(Command::BeginEdit(id))
                }
            }
            KeyCode::Char('s') if gs.can_start() => UserIntent::Dispatch(Command::StartSession),
            KeyCode::Char('t') if gs.can_stop() => UserIntent::Dispatch(Command::StopSession),
            KeyCode::Char('x') if gs.can_reset() => UserIntent::Dispatch(Command::ResetSession),
            _ => UserIntent::None,
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> UserIntent {
        let Some(form) = self.form.as_mut() else {
            return UserIntent::None;
        };
        match key.code {
            KeyCode::Esc => UserIntent::Dispatch(Command::CancelPanel),
            KeyCode::Enter => UserIntent::Dispatch(form.submit()),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                form.toggle_focus();
                UserIntent::None
            }
            KeyCode::Left => {
                form.focused().move_cursor_left();
                UserIntent::None
            }
            KeyCode::Right => {
                form.focused().move_cursor_right();
                UserIntent::None
            }
            KeyCode::Backspace => {
                form.focused().delete_char();
                UserIntent::None
            }
            KeyCode::Char(c) => {
                form.focused().enter_char(c);
                UserIntent::None
            }
            _ => UserIntent::None,
        }
    }

    fn handle_reconciliation_key(&mut self, key: KeyEvent, gs: &TrackerState) -> UserIntent {
        let Some(rec) = gs.reconciliation() else {
            return UserIntent::None;
        };
        let players = &rec.handoff().players;
        let selected = players.get(self.selected_entry).map(|p| p.id);

        match key.code {
            KeyCode::Esc => UserIntent::Quit,
            KeyCode::F(2) => UserIntent::Dispatch(Command::ReturnToTable),
            KeyCode::Enter => UserIntent::Dispatch(Command::Validate),
            KeyCode::Up => {
                self.selected_entry = self.selected_entry.saturating_sub(1);
                UserIntent::None
            }
            KeyCode::Down | KeyCode::Tab => {
                if self.selected_entry + 1 < players.len() {
                    self.selected_entry += 1;
                }
                UserIntent::None
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => match selected {
                Some(id) => {
                    let mut text = rec.entry(id).to_string();
                    text.push(c);
                    UserIntent::Dispatch(Command::RecordFinalCount { id, text })
                }
                None => UserIntent::None,
            },
            KeyCode::Backspace => match selected {
                Some(id) if !rec.entry(id).is_empty() => {
                    let mut text = rec.entry(id).to_string();
                    text.pop();
                    UserIntent::Dispatch(Command::RecordFinalCount { id, text })
                }
                _ => UserIntent::None,
            },
            _ => UserIntent::None,
        }
    }
}

// ---------------------------------------------------------------------------
// Public API: Tui struct
// ---------------------------------------------------------------------------

/// Owns the ratatui terminal and all UI-layer state.
///
/// The app loop ([`crate::app`]) drives this struct: call [`Tui::render`]
/// each frame, [`Tui::poll_and_handle_input`] to process keyboard events,
/// and [`Tui::on_state_changed`] after a command was applied.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    state: TuiState,
}

impl Tui {
    /// Set up the terminal (raw mode, alternate screen) and return a ready `Tui`.
    pub fn setup() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self {
            terminal,
            state: TuiState::default(),
        })
    }

    /// Restore the terminal to its original state.
    pub fn teardown(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    /// Draw the current frame.
    pub fn render(&mut self, gs: &TrackerState) -> io::Result<()> {
        self.terminal.draw(|f| render::ui(f, gs, &self.state))?;
        Ok(())
    }

    /// Poll for a keyboard event and, if one is available, translate it into
    /// a [`UserIntent`]. This never blocks; it returns [`UserIntent::None`]
    /// immediately when no event is pending.
    pub fn poll_and_handle_input(&mut self, gs: &TrackerState) -> io::Result<UserIntent> {
        if !event::poll(std::time::Duration::from_millis(0))? {
            return Ok(UserIntent::None);
        }
        let Event::Key(key) = event::read()? else {
            return Ok(UserIntent::None);
        };
        if key.kind != KeyEventKind::Press {
            return Ok(UserIntent::None);
        }
        Ok(self.state.handle_key(key, gs))
    }

    /// Notify the UI that the tracker state changed (mode, roster, screen).
    pub fn on_state_changed(&mut self, gs: &TrackerState) {
        self.state.sync(gs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn table(n: usize) -> TrackerState {
        let mut gs = TrackerState::new();
        for i in 0..n {
            gs.apply(&Command::AddPlayer {
                name: format!("P{i}"),
                buy_in: "10".to_string(),
            });
        }
        gs
    }

    /// Apply an intent the way the app loop would.
    fn run(tui: &mut TuiState, gs: &mut TrackerState, code: KeyCode) -> UserIntent {
        let intent = tui.handle_key(press(code), gs);
        if let UserIntent::Dispatch(cmd) = &intent {
            gs.apply(cmd);
            tui.sync(gs);
        }
        intent
    }

    #[test]
    fn add_player_through_form() {
        let mut gs = table(0);
        let mut tui = TuiState::default();

        run(&mut tui, &mut gs, KeyCode::Char('a'));
        assert!(tui.form.is_some());
        for c in "Ann".chars() {
            run(&mut tui, &mut gs, KeyCode::Char(c));
        }
        run(&mut tui, &mut gs, KeyCode::Tab);
        for c in "25".chars() {
            run(&mut tui, &mut gs, KeyCode::Char(c));
        }
        let intent = run(&mut tui, &mut gs, KeyCode::Enter);
        assert_eq!(
            intent,
            UserIntent::Dispatch(Command::AddPlayer {
                name: "Ann".to_string(),
                buy_in: "25".to_string(),
            })
        );
        assert!(tui.form.is_none());
        assert_eq!(gs.pot(), 25.0);
    }

    #[test]
    fn letters_in_form_do_not_trigger_shortcuts() {
        let mut gs = table(1);
        let mut tui = TuiState::default();
        run(&mut tui, &mut gs, KeyCode::Char('a'));
        let intent = run(&mut tui, &mut gs, KeyCode::Char('s'));
        assert_eq!(intent, UserIntent::None);
        assert!(gs.can_start());
    }

    #[test]
    fn edit_form_is_prefilled() {
        let mut gs = table(2);
        let mut tui = TuiState::default();
        run(&mut tui, &mut gs, KeyCode::Down);
        run(&mut tui, &mut gs, KeyCode::Char('e'));
        let form = tui.form.as_ref().unwrap();
        assert_eq!(form.name.value(), "P1");
        assert_eq!(form.buy_in.value(), "10");

        run(&mut tui, &mut gs, KeyCode::Esc);
        assert!(tui.form.is_none());
        assert_eq!(gs.mode(), Mode::Idle);
    }

    #[test]
    fn remove_mode_picks_selected_player() {
        let mut gs = table(3);
        let mut tui = TuiState::default();
        run(&mut tui, &mut gs, KeyCode::Char('r'));
        assert_eq!(gs.mode(), Mode::Removing);
        run(&mut tui, &mut gs, KeyCode::Down);
        run(&mut tui, &mut gs, KeyCode::Enter);
        assert_eq!(gs.mode(), Mode::Idle);
        let names: Vec<_> = gs.roster().players().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["P0", "P2"]);
    }

    #[test]
    fn edit_on_empty_table_gives_hint() {
        let mut gs = table(0);
        let mut tui = TuiState::default();
        let intent = run(&mut tui, &mut gs, KeyCode::Enter);
        assert!(matches!(intent, UserIntent::Feedback(_, LogCategory::Info)));
    }

    #[test]
    fn disabled_session_keys_do_nothing() {
        let mut gs = table(1);
        let mut tui = TuiState::default();
        assert_eq!(run(&mut tui, &mut gs, KeyCode::Char('t')), UserIntent::None);
        assert_eq!(run(&mut tui, &mut gs, KeyCode::Char('x')), UserIntent::None);
        run(&mut tui, &mut gs, KeyCode::Char('s'));
        assert_eq!(run(&mut tui, &mut gs, KeyCode::Char('s')), UserIntent::None);
    }

    #[test]
    fn reconciliation_entry_flow() {
        let mut gs = table(2);
        let mut tui = TuiState::default();
        run(&mut tui, &mut gs, KeyCode::Char('s'));
        run(&mut tui, &mut gs, KeyCode::Char('t'));
        assert!(gs.reconciliation().is_some());

        for code in [KeyCode::Char('1'), KeyCode::Char('2'), KeyCode::Backspace] {
            run(&mut tui, &mut gs, code);
        }
        run(&mut tui, &mut gs, KeyCode::Down);
        for c in "9.5".chars() {
            run(&mut tui, &mut gs, KeyCode::Char(c));
        }
        // Letters are ignored on this screen.
        run(&mut tui, &mut gs, KeyCode::Char('x'));

        let rec = gs.reconciliation().unwrap();
        let ids: Vec<_> = rec.handoff().players.iter().map(|p| p.id).collect();
        assert_eq!(rec.entry(ids[0]), "1");
        assert_eq!(rec.entry(ids[1]), "9.5");

        run(&mut tui, &mut gs, KeyCode::Enter);
        assert!(gs.reconciliation().unwrap().verdict().is_some());

        run(&mut tui, &mut gs, KeyCode::F(2));
        assert_eq!(*gs.screen(), Screen::Table);
        assert_eq!(gs.roster().len(), 2);
    }

    #[test]
    fn help_swallows_keys() {
        let mut gs = table(1);
        let mut tui = TuiState::default();
        run(&mut tui, &mut gs, KeyCode::F(1));
        assert!(tui.show_help);
        assert_eq!(run(&mut tui, &mut gs, KeyCode::Char('s')), UserIntent::None);
        run(&mut tui, &mut gs, KeyCode::Esc);
        assert!(!tui.show_help);
        assert_eq!(run(&mut tui, &mut gs, KeyCode::Esc), UserIntent::Quit);
    }
}
