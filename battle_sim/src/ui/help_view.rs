//! Help overlay

use crate::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let timing = &app.setup.constants.timing;
    let escalation = &app.setup.constants.escalation;

    let lines = vec![
        heading("═══ Controls ═══"),
        key_line("↑/k  ↓/j", "Select shop entry"),
        key_line("Tab", "Switch abilities/equipment"),
        key_line("Enter / Space", "Buy selected entry"),
        key_line("PgUp / PgDn", "Scroll battle log"),
        key_line("p", "Pause"),
        key_line("s", "Cycle attack speed multiplier"),
        key_line("r", "Start a new round"),
        key_line("?", "Toggle help"),
        key_line("q / Ctrl+C", "Quit"),
        Line::from(""),
        heading("═══ Battle ═══"),
        Line::from("  Both heroes attack on their own clock: interval = 1000 / speed ms."),
        Line::from(format!("  The interval never drops below {:.0} ms.", timing.attack_interval_floor_ms)),
        Line::from("  Mana fills over time; a full bar casts the ultimate instead of attacking."),
        Line::from(format!(
            "  From {:.0}s on, damage grows by ×{:.2} every second.",
            escalation.start_secs, escalation.rate_per_sec
        )),
        Line::from(""),
        heading("═══ Stacks ═══"),
        Line::from("  Poison and frost decay each status tick; shield absorbs hits and decays on hit."),
        Line::from("  Regen heals every status tick; frost stacks feed frost nova damage."),
    ];

    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Help "));
    f.render_widget(paragraph, area);
}

fn heading(text: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        text,
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))
}

fn key_line(key: &str, desc: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:20}", key), Style::default().fg(Color::Yellow)),
        Span::styled(desc.to_string(), Style::default().fg(Color::White)),
    ])
}
