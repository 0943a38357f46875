//! TUI views and rendering
//!
//! Draws from `AppState`, `PlannerState` and a `GateView` snapshot; never
//! modifies any of them.

use chrono::Local;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use tracing::trace;

use super::state::{AppState, GateView, Screen};
use crate::planner::PlannerState;

pub const TITLE: &str = "DailyPlanner AI";
pub const PLACEHOLDER: &str = "Enter your to-do list (one task per line)...";

mod colors {
    use ratatui::style::Color;

    pub const TITLE: Color = Color::White;
    pub const KEYBIND: Color = Color::Rgb(0, 255, 255); // Cyan
    pub const READY: Color = Color::Rgb(50, 205, 50); // Lime green
    pub const NOT_READY: Color = Color::DarkGray;
    pub const ERROR: Color = Color::Rgb(220, 20, 60); // Crimson
    pub const NOTICE: Color = Color::Rgb(255, 215, 0); // Gold
    pub const SELECTED_BG: Color = Color::Rgb(40, 40, 40);
    pub const DIM: Color = Color::DarkGray;
}

/// Render one frame
pub fn render(state: &AppState, planner: &PlannerState, gate: Option<&GateView>, frame: &mut Frame) {
    trace!(screen = ?state.screen, "render: called");
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(gate, frame, chunks[0]);

    match (state.screen, gate) {
        (Screen::Gate, Some(gate)) => render_gate(state, gate, frame, chunks[1]),
        _ => render_planner(state, planner, frame, chunks[1]),
    }

    render_footer(state, frame, chunks[2]);
}

fn render_header(gate: Option<&GateView>, frame: &mut Frame, area: Rect) {
    let date = Local::now().format("%A, %B %-d").to_string();
    let mut spans = vec![
        Span::styled(
            format!(" {} ", TITLE),
            Style::default().fg(colors::TITLE).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {} ", date), Style::default().fg(colors::DIM)),
    ];
    if let Some(key) = gate.and_then(|g| g.public_key.as_ref()) {
        spans.push(Span::styled(format!(" wallet {} ", key), Style::default().fg(colors::READY)));
    }

    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn render_gate(state: &AppState, gate: &GateView, frame: &mut Frame, area: Rect) {
    trace!(wallets = gate.wallets.len(), "render_gate: called");
    let mut lines = vec![
        Line::from(Span::styled(
            "Connect a wallet to start planning",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    for (i, (name, ready)) in gate.wallets.iter().enumerate() {
        let (marker, color) = if ready.is_ready() {
            ("●", colors::READY)
        } else {
            ("○", colors::NOT_READY)
        };
        let mut style = Style::default();
        if i == state.selected_wallet {
            style = style.bg(colors::SELECTED_BG).add_modifier(Modifier::BOLD);
        }
        lines.push(Line::from(vec![
            Span::styled(if i == state.selected_wallet { " > " } else { "   " }, style),
            Span::styled(format!("{} ", marker), style.fg(color)),
            Span::styled(format!("{:<12}", name), style),
            Span::styled(format!(" {}", ready), style.fg(colors::DIM)),
        ]));
    }

    lines.push(Line::from(""));
    if !gate.available && !gate.device.is_mobile() {
        lines.push(Line::from(Span::styled(
            "No wallet detected. Install one of the wallets above to continue.",
            Style::default().fg(colors::NOTICE),
        )));
    }
    if let Some(error) = gate.error.as_ref().filter(|_| !state.connecting) {
        lines.push(Line::from(Span::styled(error.clone(), Style::default().fg(colors::ERROR))));
    }
    if let Some(notice) = &state.notice {
        lines.push(Line::from(Span::styled(notice.clone(), Style::default().fg(colors::NOTICE))));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Wallets ({}) ", gate.device));
    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

fn render_planner(state: &AppState, planner: &PlannerState, frame: &mut Frame, area: Rect) {
    trace!(
        has_plan = planner.plan().is_some(),
        has_error = planner.error().is_some(),
        loading = planner.is_loading(),
        "render_planner: called"
    );
    let input_height = editor_height(state.input.lines().count(), area.height);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(input_height), // Task editor
            Constraint::Length(2),            // Status + error lines
            Constraint::Min(0),               // Plan
        ])
        .split(area);

    render_editor(state, frame, chunks[0]);
    render_status(state, planner, frame, chunks[1]);
    render_plan(planner, frame, chunks[2]);
}

fn render_editor(state: &AppState, frame: &mut Frame, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Tasks ");
    let body = if state.input.is_empty() {
        Paragraph::new(Span::styled(PLACEHOLDER, Style::default().fg(colors::DIM)))
    } else {
        Paragraph::new(state.input.as_str())
    };
    frame.render_widget(body.block(block), area);

    let (line, col) = state.cursor_line_col();
    let x = area.x + 1 + col as u16;
    let y = area.y + 1 + line as u16;
    if x < area.right().saturating_sub(1) && y < area.bottom().saturating_sub(1) {
        frame.set_cursor_position(Position::new(x, y));
    }
}

fn render_status(state: &AppState, planner: &PlannerState, frame: &mut Frame, area: Rect) {
    let status = if planner.is_loading() {
        Line::from(Span::styled(
            format!(" {} {}...", state.spinner(), state.status_word),
            Style::default().fg(colors::NOTICE),
        ))
    } else if let Some(notice) = &state.notice {
        Line::from(Span::styled(format!(" {}", notice), Style::default().fg(colors::NOTICE)))
    } else {
        Line::from("")
    };
    let error = match planner.error() {
        Some(error) => Line::from(Span::styled(format!(" {}", error), Style::default().fg(colors::ERROR))),
        None => Line::from(""),
    };
    frame.render_widget(Paragraph::new(vec![status, error]), area);
}

/// Editor rows: task lines plus borders, at least 8, never more than half the area
fn editor_height(lines: usize, available: u16) -> u16 {
    let wanted = (lines.max(1) as u16).saturating_add(2).max(8);
    wanted.min(available / 2)
}

fn render_plan(planner: &PlannerState, frame: &mut Frame, area: Rect) {
    let Some(plan) = planner.plan() else {
        return;
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(" Your Plan: ", Style::default().add_modifier(Modifier::BOLD)));
    frame.render_widget(Paragraph::new(plan).block(block).wrap(Wrap { trim: false }), area);
}

fn render_footer(state: &AppState, frame: &mut Frame, area: Rect) {
    let keybinds: &[(&str, &str)] = match state.screen {
        Screen::Gate => &[("[↑↓]", "Select"), ("[Enter]", "Connect"), ("[q/Esc]", "Quit")],
        Screen::Planner => &[
            ("[Ctrl+S]", "Plan My Day"),
            ("[Ctrl+U]", "Clear"),
            ("[Ctrl+D]", "Disconnect"),
            ("[Esc]", "Quit"),
        ],
    };

    let mut spans = Vec::new();
    for (key, desc) in keybinds {
        spans.push(Span::styled(*key, Style::default().fg(colors::KEYBIND)));
        spans.push(Span::raw(format!(" {}  ", desc)));
    }

    let footer = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::{PlannerEvent, reduce};
    use crate::wallet::{DeviceClass, ReadyState};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(state: &AppState, planner: &PlannerState, gate: Option<&GateView>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|f| render(state, planner, gate, f)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn gate_view() -> GateView {
        GateView {
            wallets: vec![
                ("Phantom".to_string(), ReadyState::NotDetected),
                ("Solana CLI".to_string(), ReadyState::Installed),
            ],
            available: true,
            device: DeviceClass::Desktop,
            error: Some("Failed to connect wallet. Please try again.".to_string()),
            public_key: None,
        }
    }

    #[test]
    fn test_planner_placeholder_and_title() {
        let mut state = AppState::new();
        state.screen = Screen::Planner;
        let out = draw(&state, &PlannerState::new(), None);
        assert!(out.contains(TITLE));
        assert!(out.contains(PLACEHOLDER));
        assert!(!out.contains("Your Plan:"));
    }

    #[test]
    fn test_plan_block_shown_with_plan() {
        let mut state = AppState::new();
        state.screen = Screen::Planner;
        let planner = reduce(&PlannerState::new(), PlannerEvent::SubmitRequested { gate_open: true }).state;
        let request = planner.in_flight().unwrap();
        let planner = reduce(
            &planner,
            PlannerEvent::PlanReceived {
                request,
                plan: "9am buy milk\n10am walk dog".to_string(),
            },
        )
        .state;

        let out = draw(&state, &planner, None);
        assert!(out.contains("Your Plan:"));
        assert!(out.contains("9am buy milk"));
        assert!(out.contains("10am walk dog"));
    }

    #[test]
    fn test_error_line_shown() {
        let mut state = AppState::new();
        state.screen = Screen::Planner;
        let planner = reduce(&PlannerState::new(), PlannerEvent::SubmitRequested { gate_open: false }).state;
        let out = draw(&state, &planner, None);
        assert!(out.contains("Please connect your wallet first."));
    }

    fn draw_sized(width: u16, height: u16, state: &AppState, planner: &PlannerState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| render(state, planner, None, f)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer.content.iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_planner_renders_on_short_terminals() {
        let mut state = AppState::new();
        state.screen = Screen::Planner;
        state.input = "a\nb\nc".to_string();
        for height in [20, 12, 8, 3, 1] {
            let out = draw_sized(80, height, &state, &PlannerState::new());
            assert!(!out.is_empty());
        }
        let out = draw_sized(80, 20, &state, &PlannerState::new());
        assert!(out.contains("Tasks"));
    }

    #[test]
    fn test_editor_height_bounds() {
        assert_eq!(editor_height(0, 40), 8);
        assert_eq!(editor_height(12, 40), 14);
        assert_eq!(editor_height(30, 40), 20);
        assert_eq!(editor_height(1, 14), 7);
        assert_eq!(editor_height(1, 0), 0);
    }

    #[test]
    fn test_error_stays_visible_while_loading() {
        let mut state = AppState::new();
        state.screen = Screen::Planner;
        let planner = reduce(&PlannerState::new(), PlannerEvent::SubmitRequested { gate_open: false }).state;
        let planner = reduce(&planner, PlannerEvent::SubmitRequested { gate_open: true }).state;
        assert!(planner.is_loading());

        let out = draw(&state, &planner, None);
        assert!(out.contains("Please connect your wallet first."));
        assert!(out.contains(state.status_word));
    }

    #[test]
    fn test_gate_screen_lists_wallets() {
        let state = AppState::new();
        let gate = gate_view();
        let out = draw(&state, &PlannerState::new(), Some(&gate));
        assert!(out.contains("Phantom"));
        assert!(out.contains("Solana CLI"));
        assert!(out.contains("not detected"));
        assert!(out.contains("Failed to connect wallet"));
        assert!(!out.contains(PLACEHOLDER));
    }

    #[test]
    fn test_gate_screen_shows_connect_in_progress() {
        let mut state = AppState::new();
        state.begin_connect("Phantom");
        let gate = gate_view();

        let out = draw(&state, &PlannerState::new(), Some(&gate));
        assert!(out.contains("Connecting to Phantom"));
        assert!(!out.contains("Failed to connect wallet"));
    }

    #[test]
    fn test_gate_screen_no_wallet_notice() {
        let state = AppState::new();
        let mut gate = gate_view();
        gate.available = false;
        gate.error = None;
        let out = draw(&state, &PlannerState::new(), Some(&gate));
        assert!(out.contains("No wallet detected"));
    }
}
