//! Event log: scrollable list of tracker events, newest last.

use chip_core::tracker::{LogCategory, TrackerEvent, TrackerState};
use dioxus::prelude::*;

#[component]
pub fn EventLog(state: Signal<TrackerState>) -> Element {
    let gs = state.read();
    let first_seq = gs.first_event_seq();

    rsx! {
        div { class: "h-full overflow-y-auto p-3 bg-gray-900 text-sm font-mono flex flex-col gap-0.5",
            for (i, event) in gs.events.iter().enumerate() {
                {
                    let seq = first_seq + i as u64;
                    let line = format!("{} {}", icon(event), event.describe());
                    rsx! {
                        div { key: "{seq}", class: category_color(event.category()), "{line}" }
                    }
                }
            }
        }
    }
}

fn icon(event: &TrackerEvent) -> &'static str {
    match event {
        TrackerEvent::PlayerAdded { .. } => "+",
        TrackerEvent::PlayerRemoved { .. } => "-",
        TrackerEvent::PlayerEdited { .. } => "~",
        TrackerEvent::SessionStarted => "▶",
        TrackerEvent::SessionEnded { .. } => "■",
        TrackerEvent::SessionReset => "↺",
        TrackerEvent::Reconciled { verdict } if verdict.is_balanced() => "✓",
        TrackerEvent::Reconciled { .. } => "✗",
        TrackerEvent::Text { .. } => "·",
    }
}

pub(crate) fn category_color(category: LogCategory) -> &'static str {
    match category {
        LogCategory::System => "text-cyan-400",
        LogCategory::Roster => "text-gray-300",
        LogCategory::Success => "text-emerald-400",
        LogCategory::Warning => "text-yellow-400",
        LogCategory::Info => "text-gray-400",
    }
}
