//! Frame rendering for the table and reconciliation screens.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    symbols::Marker,
    text::{Line, Span, Text},
    widgets::{
        Block, Borders, Clear, List, ListItem, Paragraph, Wrap,
        canvas::{Canvas, Points},
    },
};

use chip_core::money::{format_duration, format_money};
use chip_core::reconciliation::{Reconciliation, Verdict};
use chip_core::seat::{COMMUNITY_CARDS, HOLE_CARDS, SEAT_COUNT, default_seat_point};
use chip_core::session::SessionStatus;
use chip_core::tracker::{LogCategory, Mode, Screen, TrackerEvent, TrackerState};

use crate::input::InputField;
use crate::tui::{FormField, PlayerForm, TuiState};

/// Radii of the felt outline, inside the seat ring.
const FELT_RADIUS_X: f64 = 30.0;
const FELT_RADIUS_Y: f64 = 24.0;

pub(crate) fn ui(frame: &mut Frame, gs: &TrackerState, tui: &TuiState) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(12),   // Main content
            Constraint::Length(3), // Controls
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    match gs.screen() {
        Screen::Table => render_table_screen(frame, gs, tui, main_layout[0]),
        Screen::Reconciliation(rec) => {
            render_reconciliation_screen(frame, gs, rec, tui, main_layout[0]);
        }
    }

    render_controls_bar(frame, gs, main_layout[1]);
    render_status_bar(frame, gs, main_layout[2]);

    if let Some(form) = &tui.form {
        render_player_form(frame, form);
    }
    if tui.show_help {
        render_help_popup(frame);
    }
}

// ---------------------------------------------------------------------------
// Table screen
// ---------------------------------------------------------------------------

fn render_table_screen(frame: &mut Frame, gs: &TrackerState, tui: &TuiState, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(28), // Players
            Constraint::Min(40),    // Table
            Constraint::Length(38), // Log
        ])
        .split(area);

    render_players_panel(frame, gs, tui, columns[0]);
    render_table_canvas(frame, gs, columns[1]);
    render_messages(frame, gs, columns[2]);
}

fn render_players_panel(frame: &mut Frame, gs: &TrackerState, tui: &TuiState, area: Rect) {
    let removing = gs.mode() == Mode::Removing;

    let items: Vec<ListItem> = gs
        .roster()
        .players()
        .enumerate()
        .map(|(index, player)| {
            let selected = index == tui.selected_player;
            let marker = if selected { "▶ " } else { "  " };
            let mut name_style = if player.is_active {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            if selected {
                name_style = if removing {
                    name_style.fg(Color::Red).bold()
                } else {
                    name_style.fg(Color::Cyan).bold()
                };
            }

            ListItem::new(Line::from(vec![
                Span::raw(marker),
                Span::styled(player.name.clone(), name_style),
                Span::styled(
                    format!(" {}", format_money(player.chips)),
                    Style::default().fg(Color::Green),
                ),
            ]))
        })
        .collect();

    let (title, color) = if removing {
        (" Pick player to remove ", Color::Red)
    } else {
        (" Players ", Color::Blue)
    };
    let players_list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(format!("{}({}/{}) ", title, gs.roster().len(), SEAT_COUNT))
            .title_style(Style::default().fg(color).bold()),
    );

    frame.render_widget(players_list, area);
}

fn render_table_canvas(frame: &mut Frame, gs: &TrackerState, area: Rect) {
    let felt: Vec<(f64, f64)> = (0..240)
        .map(|i| {
            let angle = f64::from(i) / 240.0 * std::f64::consts::TAU;
            (
                50.0 + FELT_RADIUS_X * angle.cos(),
                50.0 + FELT_RADIUS_Y * angle.sin(),
            )
        })
        .collect();

    let status = gs.session().status();
    let pot = format_money(gs.pot());
    let clock = format_duration(gs.session().duration_seconds());
    let community = "[?]".repeat(COMMUNITY_CARDS);
    let hole = "▮".repeat(HOLE_CARDS);

    let canvas = Canvas::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Magenta))
                .title(" Table ")
                .title_style(Style::default().fg(Color::Magenta).bold()),
        )
        .marker(Marker::Braille)
        .x_bounds([0.0, 100.0])
        .y_bounds([0.0, 100.0])
        .paint(move |ctx| {
            ctx.draw(&Points {
                coords: &felt,
                color: Color::Green,
            });
            ctx.layer();

            ctx.print(
                36.0,
                56.0,
                Line::styled(community.clone(), Style::default().fg(Color::White)),
            );
            ctx.print(
                42.0,
                48.0,
                Line::styled(format!("Pot {}", pot), Style::default().fg(Color::Green).bold()),
            );
            ctx.print(
                44.0,
                40.0,
                Line::styled(clock.clone(), status_style(status)),
            );

            for position in 0..SEAT_COUNT {
                let point = default_seat_point(position);
                // Canvas y grows upward; seat coordinates grow downward.
                let (x, y) = (point.x - 6.0, 100.0 - point.y);
                match gs.roster().at_position(position) {
                    Some(player) => {
                        let style = if player.is_active {
                            Style::default().fg(Color::Yellow).bold()
                        } else {
                            Style::default().fg(Color::Gray)
                        };
                        ctx.print(x, y, Line::styled(player.name.clone(), style));
                        ctx.print(
                            x,
                            y - 5.0,
                            Line::from(vec![
                                Span::styled(
                                    format_money(player.chips),
                                    Style::default().fg(Color::Green),
                                ),
                                Span::raw(" "),
                                Span::styled(hole.clone(), Style::default().fg(Color::Blue)),
                            ]),
                        );
                    }
                    None => ctx.print(
                        x,
                        y,
                        Line::styled(
                            format!("seat {}", position + 1),
                            Style::default().fg(Color::DarkGray),
                        ),
                    ),
                }
            }
        });

    frame.render_widget(canvas, area);
}

fn format_event(event: &TrackerEvent) -> String {
    let icon = match event {
        TrackerEvent::PlayerAdded { .. } => "👤",
        TrackerEvent::PlayerRemoved { .. } => "👋",
        TrackerEvent::PlayerEdited { .. } => "✏️",
        TrackerEvent::SessionStarted => "▶",
        TrackerEvent::SessionEnded { .. } => "■",
        TrackerEvent::SessionReset => "↺",
        TrackerEvent::Reconciled { verdict } => match verdict {
            Verdict::Balanced { .. } => "✅",
            Verdict::Mismatch { .. } => "❌",
            Verdict::Incomplete => "…",
        },
        TrackerEvent::Text { .. } => "·",
    };
    format!("{} {}", icon, event.describe())
}

fn render_messages(frame: &mut Frame, gs: &TrackerState, area: Rect) {
    let messages: Vec<ListItem> = gs
        .events
        .iter()
        .rev()
        .take(area.height.saturating_sub(2) as usize)
        .rev()
        .map(|ev| {
            let style = match ev.category() {
                LogCategory::System => Style::default().fg(Color::Yellow),
                LogCategory::Roster => Style::default().fg(Color::Cyan),
                LogCategory::Success => Style::default().fg(Color::Green).bold(),
                LogCategory::Warning => Style::default().fg(Color::Red),
                LogCategory::Info => Style::default().fg(Color::Gray),
            };
            ListItem::new(Span::styled(format_event(ev), style))
        })
        .collect();

    let messages_list = List::new(messages).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Log ")
            .title_style(Style::default().fg(Color::DarkGray)),
    );

    frame.render_widget(messages_list, area);
}

// ---------------------------------------------------------------------------
// Reconciliation screen
// ---------------------------------------------------------------------------

fn render_reconciliation_screen(
    frame: &mut Frame,
    gs: &TrackerState,
    rec: &Reconciliation,
    tui: &TuiState,
    area: Rect,
) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(38)])
        .split(area);

    let handoff = rec.handoff();
    let mut lines = vec![
        Line::from(vec![
            Span::styled(" Session length: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format_duration(handoff.duration_seconds),
                Style::default().fg(Color::White).bold(),
            ),
            Span::styled("   Total buy-in: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format_money(handoff.total_buy_in),
                Style::default().fg(Color::Green).bold(),
            ),
        ]),
        Line::from(Span::styled(
            format!(
                " {}/{} counts entered",
                rec.entered_count(),
                handoff.players.len()
            ),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];

    for (index, player) in handoff.players.iter().enumerate() {
        let selected = index == tui.selected_entry;
        let entry = rec.entry(player.id);
        let field = if selected {
            format!("[ {}_ ]", entry)
        } else if entry.is_empty() {
            "[    ]".to_string()
        } else {
            format!("[ {} ]", entry)
        };
        let name_style = if selected {
            Style::default().fg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(vec![
            Span::raw(if selected { " ▶ " } else { "   " }),
            Span::styled(format!("{:<16}", player.name), name_style),
            Span::styled(
                format!("{:>10}  ", format_money(player.chips)),
                Style::default().fg(Color::Gray),
            ),
            Span::styled(field, Style::default().fg(Color::Yellow)),
        ]));
    }

    if let Some(verdict) = rec.verdict() {
        let style = match verdict {
            Verdict::Balanced { .. } => Style::default().fg(Color::Green).bold(),
            Verdict::Mismatch { .. } => Style::default().fg(Color::Red).bold(),
            Verdict::Incomplete => Style::default().fg(Color::Yellow),
        };
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!(" {}", verdict), style)));
    }

    let panel = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Final chip counts ")
            .title_style(Style::default().fg(Color::Yellow).bold()),
    );
    frame.render_widget(panel, columns[0]);

    render_messages(frame, gs, columns[1]);
}

// ---------------------------------------------------------------------------
// Controls, status, popups
// ---------------------------------------------------------------------------

fn key_hint(key: &str, label: &str, enabled: bool) -> Vec<Span<'static>> {
    let (key_style, label_style) = if enabled {
        (
            Style::default().fg(Color::Cyan).bold(),
            Style::default().fg(Color::White),
        )
    } else {
        (
            Style::default().fg(Color::DarkGray),
            Style::default().fg(Color::DarkGray),
        )
    };
    vec![
        Span::styled(format!(" {} ", key), key_style),
        Span::styled(format!("{}  ", label), label_style),
    ]
}

fn render_controls_bar(frame: &mut Frame, gs: &TrackerState, area: Rect) {
    let hints: Vec<Vec<Span>> = match gs.screen() {
        Screen::Table => {
            let removing = gs.mode() == Mode::Removing;
            let has_players = !gs.roster().is_empty();
            vec![
                key_hint("a", "Add", gs.can_add_player()),
                key_hint(
                    "r",
                    if removing { "Cancel remove" } else { "Remove" },
                    gs.can_edit_roster() && has_players,
                ),
                key_hint("e", "Edit", gs.can_edit_roster() && has_players),
                key_hint("s", "Start", gs.can_start()),
                key_hint("t", "Stop", gs.can_stop()),
                key_hint("x", "Reset", gs.can_reset()),
            ]
        }
        Screen::Reconciliation(_) => vec![
            key_hint("0-9 .", "Enter count", true),
            key_hint("Enter", "Validate", true),
            key_hint("F2", "Back to table", true),
        ],
    };

    let controls = Paragraph::new(Line::from(hints.concat()))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue))
                .title(" Controls ")
                .title_style(Style::default().fg(Color::Blue).bold()),
        );
    frame.render_widget(controls, area);
}

fn status_style(status: SessionStatus) -> Style {
    match status {
        SessionStatus::NotStarted => Style::default().fg(Color::Gray),
        SessionStatus::InProgress => Style::default().fg(Color::Green).bold(),
        SessionStatus::Ended => Style::default().fg(Color::Red),
    }
}

fn render_status_bar(frame: &mut Frame, gs: &TrackerState, area: Rect) {
    let session = gs.session();
    let spans = vec![
        Span::styled(format!("● {}", session.status()), status_style(session.status())),
        Span::raw(" | "),
        Span::styled(
            format_duration(session.duration_seconds()),
            Style::default().fg(Color::White),
        ),
        Span::raw(" | Pot: "),
        Span::styled(format_money(gs.pot()), Style::default().fg(Color::Green)),
        Span::raw(" | "),
        Span::styled("F1", Style::default().fg(Color::Cyan).bold()),
        Span::raw(": Help | "),
        Span::styled("ESC", Style::default().fg(Color::Cyan).bold()),
        Span::raw(": Quit"),
    ];
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn field_line(label: &str, field: &InputField, focused: bool) -> Line<'static> {
    let label_style = if focused {
        Style::default().fg(Color::Cyan).bold()
    } else {
        Style::default().fg(Color::Gray)
    };
    let value = if focused {
        let (before, after): (String, String) = {
            let chars: Vec<char> = field.value().chars().collect();
            let split = field.cursor().min(chars.len());
            (
                chars[..split].iter().collect(),
                chars[split..].iter().collect(),
            )
        };
        format!("{}▏{}", before, after)
    } else {
        field.value().to_string()
    };
    Line::from(vec![
        Span::styled(format!(" {:<8}", label), label_style),
        Span::styled(value, Style::default().fg(Color::White)),
    ])
}

fn render_player_form(frame: &mut Frame, form: &PlayerForm) {
    let area = centered_rect(50, 40, frame.area());
    frame.render_widget(Clear, area);

    let title = match form.target {
        None => " Add player ",
        Some(_) => " Edit player ",
    };
    let lines = vec![
        Line::from(""),
        field_line("Name", &form.name, form.focus == FormField::Name),
        field_line("Buy-in", &form.buy_in, form.focus == FormField::BuyIn),
        Line::from(""),
        Line::from(Span::styled(
            " Tab: switch field | Enter: save | Esc: cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let popup = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(title)
            .title_style(Style::default().fg(Color::Cyan).bold())
            .style(Style::default().bg(Color::Black)),
    );
    frame.render_widget(popup, area);
}

fn render_help_popup(frame: &mut Frame) {
    let area = centered_rect(60, 80, frame.area());

    frame.render_widget(Clear, area);

    let help_text = Text::from(vec![
        Line::from(vec![Span::styled(
            "CONTROLS",
            Style::default().fg(Color::Yellow).bold(),
        )]),
        Line::from(""),
        Line::from(vec![Span::styled(
            "  TABLE",
            Style::default().fg(Color::Cyan).bold(),
        )]),
        Line::from("  Up/Down       Select player"),
        Line::from("  a             Add player"),
        Line::from("  e / Enter     Edit selected player"),
        Line::from("  r             Toggle remove mode"),
        Line::from("  s / t / x     Start / stop / reset session"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "  FINAL COUNTS",
            Style::default().fg(Color::Cyan).bold(),
        )]),
        Line::from("  Up/Down       Select player"),
        Line::from("  0-9 .         Type chip count"),
        Line::from("  Enter         Validate totals"),
        Line::from("  F2            Back to table"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "  SYSTEM",
            Style::default().fg(Color::Cyan).bold(),
        )]),
        Line::from("  F1            Toggle this help"),
        Line::from("  ESC           Close panel / quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press ESC or F1 to close",
            Style::default().fg(Color::DarkGray),
        )]),
    ]);

    let help = Paragraph::new(help_text).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Help ")
            .title_style(Style::default().fg(Color::Cyan).bold())
            .style(Style::default().bg(Color::Black)),
    );

    frame.render_widget(help, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
