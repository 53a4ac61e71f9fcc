//! Player list sidebar: seat order, buy-ins and the running pot.

use chip_core::money::format_money;
use chip_core::roster::MAX_PLAYERS;
use chip_core::tracker::{Command, Mode, TrackerState};
use dioxus::prelude::*;

use crate::UiMessage;

#[component]
pub fn PlayerList(state: Signal<TrackerState>) -> Element {
    let coroutine = use_coroutine_handle::<UiMessage>();
    let gs = state.read();
    let mode = gs.mode();
    let can_edit = gs.can_edit_roster();
    let count = gs.roster().len();
    let pot = format_money(gs.pot());

    rsx! {
        div { class: "flex flex-col h-full",
            div { class: "p-3 border-b border-gray-700 flex justify-between text-sm text-gray-400",
                span { "Players {count}/{MAX_PLAYERS}" }
                span { class: "text-amber-300", "{pot}" }
            }
            if gs.roster().is_empty() {
                div { class: "p-3 text-sm text-gray-500 italic", "No players yet." }
            }
            div { class: "flex-1 overflow-y-auto",
                for player in gs.roster().players() {
                    {
                        let id = player.id;
                        let chips = format_money(player.chips);
                        let seat = player.position + 1;
                        let highlight = match mode {
                            Mode::Editing(editing) if editing == id => "bg-sky-900/60",
                            Mode::Removing => "hover:bg-red-900/60",
                            _ => "hover:bg-gray-700",
                        };
                        rsx! {
                            div {
                                key: "{id.0}",
                                class: "flex justify-between px-3 py-2 text-sm cursor-pointer {highlight}",
                                onclick: move |_| {
                                    if !can_edit {
                                        return;
                                    }
                                    let cmd = if mode == Mode::Removing {
                                        Command::RemovePlayer(id)
                                    } else {
                                        Command::BeginEdit(id)
                                    };
                                    coroutine.send(UiMessage::Dispatch(cmd));
                                },
                                span { class: "text-gray-500 w-6", "{seat}" }
                                span { class: "flex-1 text-white", "{player.name}" }
                                span { class: "text-amber-300", "{chips}" }
                            }
                        }
                    }
                }
            }
        }
    }
}
