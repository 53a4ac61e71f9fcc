//! Root application component for the web frontend.
//!
//! Owns the tracker state, applies UI messages to it, and runs the
//! one-second session clock in the browser. The clock is a cancelable
//! task tagged with the session epoch it was started for, so stopping or
//! resetting the session always silences it.

use chip_core::tracker::{Command, Screen, TrackerState};
use chip_ui::UiMessage;
use chip_ui::components::{
    event_log, player_form, player_list, reconciliation_screen, session_bar, table_view,
};
use dioxus::core::Task;
use dioxus::prelude::*;
use futures_util::StreamExt;
use gloo_timers::future::TimeoutFuture;

const TICK_MILLIS: u32 = 1_000;

// ---------------------------------------------------------------------------
// Session clock
// ---------------------------------------------------------------------------

/// Tick the session clock every second until a tick is rejected as stale.
async fn run_clock(mut state: Signal<TrackerState>, epoch: u64) {
    loop {
        TimeoutFuture::new(TICK_MILLIS).await;
        if !state.write().apply(&Command::Tick { epoch }).timer {
            tracing::debug!(epoch, "session clock stopped");
            break;
        }
    }
}

/// The clock task currently running, with the epoch it ticks under.
struct Clock {
    epoch: u64,
    task: Task,
}

/// Start, replace or cancel the clock so it matches the session.
fn sync_clock(clock: &mut Option<Clock>, state: Signal<TrackerState>) {
    let wanted = state.read().timer_epoch();
    if wanted == clock.as_ref().map(|c| c.epoch) {
        return;
    }
    if let Some(old) = clock.take() {
        old.task.cancel();
    }
    if let Some(epoch) = wanted {
        tracing::debug!(epoch, "session clock started");
        *clock = Some(Clock {
            epoch,
            task: spawn(run_clock(state, epoch)),
        });
    }
}

// ---------------------------------------------------------------------------
// Root component
// ---------------------------------------------------------------------------

/// Root `<App>` component.
#[component]
pub fn App() -> Element {
    let state = use_signal(TrackerState::opening_table);

    // Components send UiMessage via the coroutine handle.
    let _coroutine = use_coroutine(move |mut rx: UnboundedReceiver<UiMessage>| {
        let mut state = state;

        async move {
            let mut clock: Option<Clock> = None;
            while let Some(UiMessage::Dispatch(cmd)) = rx.next().await {
                let changed = state.write().apply(&cmd);
                if changed.session || changed.timer {
                    sync_clock(&mut clock, state);
                }
            }
        }
    });

    let on_table = matches!(*state.read().screen(), Screen::Table);

    rsx! {
        document::Script { src: "https://cdn.tailwindcss.com" }
        document::Title { "Chip Tracker" }
        div { class: "min-h-screen bg-gray-900 text-gray-100 font-sans",
            if on_table {
                div { class: "flex h-screen",
                    // Left sidebar: player list
                    div { class: "w-64 bg-gray-800 border-r border-gray-700 flex flex-col",
                        player_list::PlayerList { state }
                    }
                    // Main area
                    div { class: "flex-1 flex flex-col",
                        div { class: "flex-1 flex items-center justify-center",
                            table_view::TableView { state }
                        }
                        session_bar::SessionBar { state }
                        div { class: "h-40 border-t border-gray-700",
                            event_log::EventLog { state }
                        }
                    }
                }
                player_form::PlayerPanel { state }
            } else {
                reconciliation_screen::ReconciliationScreen { state }
            }
        }
    }
}
