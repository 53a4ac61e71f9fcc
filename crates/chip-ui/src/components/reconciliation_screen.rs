//! Reconciliation screen: final chip counts for an ended session.

use chip_core::money::{format_duration, format_money};
use chip_core::reconciliation::Verdict;
use chip_core::tracker::{Command, TrackerState};
use dioxus::prelude::*;

use crate::UiMessage;

#[component]
pub fn ReconciliationScreen(state: Signal<TrackerState>) -> Element {
    let coroutine = use_coroutine_handle::<UiMessage>();
    let gs = state.read();
    let Some(rec) = gs.reconciliation() else {
        return rsx! {};
    };

    let handoff = rec.handoff();
    let expected = format_money(handoff.total_buy_in);
    let duration = format_duration(handoff.duration_seconds);
    let entered = rec.entered_count();
    let total_players = handoff.players.len();
    let verdict = rec.verdict().copied();

    rsx! {
        div { class: "min-h-screen flex items-center justify-center p-4",
            div { class: "bg-gray-800 w-full max-w-lg rounded-2xl shadow-2xl p-6 flex flex-col gap-4",
                h1 { class: "text-2xl font-bold text-emerald-400", "Final chip counts" }
                div { class: "flex justify-between text-sm text-gray-400",
                    span { "Session length {duration}" }
                    span { "Expected total {expected}" }
                }

                div { class: "flex flex-col gap-2",
                    for player in handoff.players.iter() {
                        {
                            let id = player.id;
                            let value = rec.entry(id).to_string();
                            let buy_in = format_money(player.chips);
                            rsx! {
                                div { key: "{id.0}", class: "flex items-center gap-3",
                                    span { class: "flex-1 text-white", "{player.name}" }
                                    span { class: "text-xs text-gray-500 w-24 text-right", "in {buy_in}" }
                                    input {
                                        class: "w-28 bg-gray-700 rounded-lg px-3 py-1 text-right text-white outline-none focus:ring-2 focus:ring-emerald-500",
                                        r#type: "text",
                                        inputmode: "decimal",
                                        placeholder: "0.00",
                                        value: "{value}",
                                        oninput: move |e| {
                                            coroutine.send(UiMessage::Dispatch(Command::RecordFinalCount {
                                                id,
                                                text: e.value(),
                                            }));
                                        },
                                    }
                                }
                            }
                        }
                    }
                }

                p { class: "text-xs text-gray-500", "{entered}/{total_players} entered" }

                if let Some(verdict) = verdict {
                    VerdictBanner { verdict }
                }

                div { class: "flex gap-3 justify-end",
                    button {
                        class: "px-4 py-2 rounded-lg bg-gray-600 hover:bg-gray-500 font-semibold",
                        onclick: move |_| coroutine.send(UiMessage::Dispatch(Command::ReturnToTable)),
                        "Back to table"
                    }
                    button {
                        class: "px-4 py-2 rounded-lg bg-emerald-600 hover:bg-emerald-500 font-semibold",
                        onclick: move |_| coroutine.send(UiMessage::Dispatch(Command::Validate)),
                        "Validate"
                    }
                }
            }
        }
    }
}

#[component]
fn VerdictBanner(verdict: Verdict) -> Element {
    let color = match verdict {
        Verdict::Balanced { .. } => "bg-emerald-900/60 text-emerald-300",
        Verdict::Mismatch { .. } => "bg-red-900/60 text-red-300",
        Verdict::Incomplete => "bg-yellow-900/60 text-yellow-300",
    };

    rsx! {
        div { class: "rounded-lg px-4 py-3 text-sm font-semibold {color}", "{verdict}" }
    }
}
