//! Table view: elliptical felt, seated players, placeholder cards and pot.

use chip_core::money::{format_duration, format_money};
use chip_core::roster::Player;
use chip_core::seat::{COMMUNITY_CARDS, HOLE_CARDS, default_seat_point};
use chip_core::tracker::{Command, Mode, TrackerState};
use dioxus::prelude::*;

use crate::UiMessage;

#[component]
pub fn TableView(state: Signal<TrackerState>) -> Element {
    let gs = state.read();
    let mode = gs.mode();
    let pot = format_money(gs.pot());
    let clock = format_duration(gs.session().duration_seconds());
    let players: Vec<Player> = gs.roster().snapshot();
    let can_edit = gs.can_edit_roster();

    rsx! {
        div { class: "relative w-full max-w-4xl mx-auto aspect-[16/10] p-4",
            // Felt
            div { class: "absolute inset-[8%] rounded-[50%] bg-emerald-800 border-8 border-amber-900 shadow-2xl" }

            // Centre: placeholder cards, pot and clock
            div { class: "absolute inset-0 flex flex-col items-center justify-center gap-2 pointer-events-none",
                div { class: "flex gap-1",
                    for i in 0..COMMUNITY_CARDS {
                        CommunityCard { key: "{i}" }
                    }
                }
                div { class: "bg-gray-900/70 rounded-full px-5 py-1 text-lg font-semibold text-amber-300 shadow",
                    "Pot: {pot}"
                }
                div { class: "text-sm font-mono text-emerald-200", "{clock}" }
            }

            for player in players {
                Seat {
                    key: "{player.id.0}",
                    player: player.clone(),
                    removing: mode == Mode::Removing,
                    editing: mode == Mode::Editing(player.id),
                    clickable: can_edit,
                }
            }
        }
    }
}

/// One player badge, absolutely positioned on the ellipse.
#[component]
fn Seat(player: Player, removing: bool, editing: bool, clickable: bool) -> Element {
    let coroutine = use_coroutine_handle::<UiMessage>();
    let point = default_seat_point(player.position);
    let id = player.id;
    let chips = format_money(player.chips);

    let ring = if removing {
        "ring-2 ring-red-500 hover:bg-red-900"
    } else if editing {
        "ring-2 ring-sky-400"
    } else if player.is_active {
        "ring-1 ring-emerald-400"
    } else {
        "opacity-60"
    };
    let cursor = if clickable { "cursor-pointer" } else { "cursor-default" };
    let hint = if removing { "Click to remove" } else { "Click to edit" };
    let placement = format!("left: {:.2}%; top: {:.2}%;", point.x, point.y);

    rsx! {
        div {
            class: "absolute -translate-x-1/2 -translate-y-1/2 bg-gray-800 rounded-xl px-3 py-2 text-center shadow-lg select-none {ring} {cursor}",
            style: placement,
            title: hint,
            onclick: move |_| {
                if !clickable {
                    return;
                }
                let cmd = if removing {
                    Command::RemovePlayer(id)
                } else {
                    Command::BeginEdit(id)
                };
                coroutine.send(UiMessage::Dispatch(cmd));
            },
            div { class: "font-semibold text-white whitespace-nowrap", "{player.name}" }
            div { class: "text-xs text-amber-300", "{chips}" }
            div { class: "flex gap-1 justify-center mt-2",
                for i in 0..HOLE_CARDS {
                    CardBack { key: "{i}" }
                }
            }
        }
    }
}

/// An unrevealed community card.
#[component]
fn CommunityCard() -> Element {
    rsx! {
        div { class: "w-8 h-12 rounded bg-white border border-gray-300 flex items-center justify-center text-xs text-gray-800 shadow-lg",
            span { "?" }
        }
    }
}

/// A face-down hole card.
#[component]
fn CardBack() -> Element {
    rsx! {
        div { class: "w-6 h-9 rounded bg-gradient-to-br from-blue-600 to-blue-800 border border-blue-900 shadow" }
    }
}
