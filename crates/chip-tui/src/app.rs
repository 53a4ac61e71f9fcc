//! App orchestrator: connects the tracker controller, its session timer,
//! and the TUI frontend.
//!
//! This module owns the event loop and drives:
//! - [`chip_core::controller::TrackerController`]: state + timer lockstep
//! - [`crate::tui::Tui`]: ratatui TUI frontend

use chip_core::controller::{PollResult, TrackerController};
use chip_core::tracker::{Command, TrackerState};

use crate::tui::{Tui, UserIntent};

/// A player to seat before the UI opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seed {
    pub name: String,
    pub buy_in: String,
}

/// Start the tracker with the given players already seated, optionally on
/// top of the four-player opening table.
pub async fn start(
    opening_table: bool,
    seeds: Vec<Seed>,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = if opening_table {
        TrackerState::opening_table()
    } else {
        TrackerState::new()
    };
    let mut ctrl = TrackerController::with_state(state);
    for seed in seeds {
        let changed = ctrl.dispatch(Command::AddPlayer {
            name: seed.name,
            buy_in: seed.buy_in,
        });
        if !changed.roster {
            tracing::warn!("table full, ignoring remaining players");
            break;
        }
    }

    let mut tui = Tui::setup()?;
    tui.on_state_changed(&ctrl.state);
    let result = run_event_loop(&mut tui, &mut ctrl).await;
    tui.teardown()?;
    result
}

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

async fn run_event_loop(
    tui: &mut Tui,
    ctrl: &mut TrackerController,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        tui.render(&ctrl.state)?;

        let timeout = tokio::time::Duration::from_millis(50);

        tokio::select! {
            poll = ctrl.recv() => {
                if let PollResult::Updated(changed) = poll
                    && !changed.any()
                {
                    tracing::trace!("stale tick ignored");
                }
            }

            _ = tokio::time::sleep(timeout) => {
                match tui.poll_and_handle_input(&ctrl.state)? {
                    UserIntent::Quit => break,
                    UserIntent::Dispatch(cmd) => {
                        let changed = ctrl.dispatch(cmd);
                        if changed.mode || changed.roster || changed.screen {
                            tui.on_state_changed(&ctrl.state);
                        }
                    }
                    UserIntent::Feedback(text, category) => {
                        ctrl.add_message(text, category);
                    }
                    UserIntent::None => {}
                }
            }
        }
    }

    tracing::info!(
        players = ctrl.state.roster().len(),
        status = %ctrl.state.session().status(),
        "chip tracker closed"
    );
    Ok(())
}
