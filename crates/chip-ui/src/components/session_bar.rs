//! Session bar: clock, session controls and roster mode toggles.

use chip_core::money::format_duration;
use chip_core::tracker::{Command, Mode, TrackerState};
use dioxus::prelude::*;

use crate::UiMessage;

const BUTTON: &str = "px-4 py-2 rounded-lg font-semibold text-sm transition disabled:opacity-40 disabled:cursor-not-allowed";

#[component]
pub fn SessionBar(state: Signal<TrackerState>) -> Element {
    let coroutine = use_coroutine_handle::<UiMessage>();
    let gs = state.read();

    let clock = format_duration(gs.session().duration_seconds());
    let status = gs.session().status();
    let removing = gs.mode() == Mode::Removing;

    let send = move |cmd: Command| coroutine.send(UiMessage::Dispatch(cmd));

    rsx! {
        div { class: "flex flex-wrap items-center gap-3 p-3 bg-gray-800 border-t border-gray-700",
            div { class: "flex flex-col mr-4",
                span { class: "text-2xl font-mono text-emerald-400", "{clock}" }
                span { class: "text-xs uppercase tracking-wide text-gray-400", "{status}" }
            }
            button {
                class: "{BUTTON} bg-emerald-600 hover:bg-emerald-500",
                disabled: !gs.can_start(),
                onclick: move |_| send(Command::StartSession),
                "Start"
            }
            button {
                class: "{BUTTON} bg-red-600 hover:bg-red-500",
                disabled: !gs.can_stop(),
                onclick: move |_| send(Command::StopSession),
                "Stop"
            }
            button {
                class: "{BUTTON} bg-gray-600 hover:bg-gray-500",
                disabled: !gs.can_reset(),
                onclick: move |_| send(Command::ResetSession),
                "Reset"
            }
            div { class: "flex-1" }
            button {
                class: "{BUTTON} bg-sky-600 hover:bg-sky-500",
                disabled: !gs.can_add_player(),
                onclick: move |_| send(Command::OpenAddPanel),
                "Add player"
            }
            if removing {
                button {
                    class: "{BUTTON} bg-yellow-600 hover:bg-yellow-500",
                    onclick: move |_| send(Command::CancelPanel),
                    "Done removing"
                }
            } else {
                button {
                    class: "{BUTTON} bg-gray-600 hover:bg-gray-500",
                    disabled: !gs.can_edit_roster() || gs.roster().is_empty(),
                    onclick: move |_| send(Command::BeginRemove),
                    "Remove player"
                }
            }
        }
    }
}
