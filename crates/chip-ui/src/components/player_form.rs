//! Add/edit panel for a single player.

use chip_core::money::DEFAULT_BUY_IN;
use chip_core::tracker::{Command, Mode, TrackerState};
use dioxus::prelude::*;

use crate::UiMessage;

/// Shows the panel for the current mode, or nothing when no panel is open.
///
/// The form is keyed by its target so switching from "add" to "edit" (or
/// between players) starts from fresh field values.
#[component]
pub fn PlayerPanel(state: Signal<TrackerState>) -> Element {
    let gs = state.read();
    let target = match gs.mode() {
        Mode::Adding => Some(("add".to_string(), false, String::new(), String::new())),
        Mode::Editing(id) => gs
            .roster()
            .get(id)
            .map(|p| (format!("edit-{}", id.0), true, p.name.clone(), p.chips.to_string())),
        Mode::Idle | Mode::Removing => None,
    };

    rsx! {
        for (key, editing, name, buy_in) in target {
            PlayerForm { key: "{key}", editing, name, buy_in }
        }
    }
}

#[component]
fn PlayerForm(editing: bool, name: String, buy_in: String) -> Element {
    let coroutine = use_coroutine_handle::<UiMessage>();
    let mut name = use_signal(move || name);
    let mut buy_in = use_signal(move || buy_in);
    let default_buy_in = format!("{DEFAULT_BUY_IN:.2}");

    let submit = move |_: MouseEvent| {
        let name = name.read().clone();
        let buy_in = buy_in.read().clone();
        let cmd = if editing {
            Command::CommitEdit { name, buy_in }
        } else {
            Command::AddPlayer { name, buy_in }
        };
        coroutine.send(UiMessage::Dispatch(cmd));
    };

    let title = if editing { "Edit player" } else { "Add player" };
    let action = if editing { "Save" } else { "Add" };

    rsx! {
        div { class: "fixed inset-0 z-40 bg-black/60 flex items-center justify-center p-4",
            div { class: "bg-gray-800 w-full max-w-sm rounded-2xl shadow-2xl p-6 flex flex-col gap-4",
                h2 { class: "text-xl font-bold text-emerald-400", "{title}" }

                div { class: "flex flex-col gap-1",
                    label { class: "text-sm text-gray-400", "Name" }
                    input {
                        class: "bg-gray-700 rounded-lg px-4 py-2 text-white outline-none focus:ring-2 focus:ring-emerald-500",
                        r#type: "text",
                        placeholder: "Player N",
                        value: "{name}",
                        oninput: move |e| name.set(e.value()),
                    }
                }

                div { class: "flex flex-col gap-1",
                    label { class: "text-sm text-gray-400", "Buy-in" }
                    input {
                        class: "bg-gray-700 rounded-lg px-4 py-2 text-white outline-none focus:ring-2 focus:ring-emerald-500",
                        r#type: "text",
                        inputmode: "decimal",
                        placeholder: default_buy_in,
                        value: "{buy_in}",
                        oninput: move |e| buy_in.set(e.value()),
                    }
                }

                div { class: "flex gap-3 justify-end",
                    button {
                        class: "px-4 py-2 rounded-lg bg-gray-600 hover:bg-gray-500 font-semibold",
                        onclick: move |_| coroutine.send(UiMessage::Dispatch(Command::CancelPanel)),
                        "Cancel"
                    }
                    button {
                        class: "px-4 py-2 rounded-lg bg-emerald-600 hover:bg-emerald-500 font-semibold",
                        onclick: submit,
                        "{action}"
                    }
                }
            }
        }
    }
}
