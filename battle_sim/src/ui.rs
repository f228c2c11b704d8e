//! UI rendering

mod combat_view;
mod help_view;
mod shop_view;

use crate::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Keybindings footer
        ])
        .split(f.area());

    draw_title(f, app, chunks[0]);

    if app.show_help {
        help_view::draw(f, app, chunks[1]);
    } else {
        let content = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Min(50),    // Heroes and log
                Constraint::Length(44), // Shop
            ])
            .split(chunks[1]);
        combat_view::draw(f, app, content[0]);
        shop_view::draw(f, app, content[1]);
    }

    draw_keybindings(f, app, chunks[2]);
}

fn draw_title(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        " Battle Sim ",
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    )];

    if let Some(snapshot) = app.snapshot() {
        spans.push(Span::styled("│ ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(
            format!("{:.1}s", snapshot.elapsed_ms as f64 / 1000.0),
            Style::default().fg(Color::White),
        ));
        spans.push(Span::styled("  Damage ", Style::default().fg(Color::Gray)));
        let multiplier_color = if snapshot.damage_multiplier > 1.0 { Color::Red } else { Color::White };
        spans.push(Span::styled(
            format!("×{:.2}", snapshot.damage_multiplier),
            Style::default().fg(multiplier_color),
        ));
        spans.push(Span::styled("  Attack speed ", Style::default().fg(Color::Gray)));
        spans.push(Span::styled(format!("×{:.1}", app.speed()), Style::default().fg(Color::White)));
    }

    spans.push(Span::styled("  Gold ", Style::default().fg(Color::Gray)));
    spans.push(Span::styled(
        app.money().to_string(),
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    ));
    if app.paused {
        spans.push(Span::styled("  PAUSED", Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

fn draw_keybindings(f: &mut Frame, app: &App, area: Rect) {
    if let Some(status) = &app.status {
        let paragraph = Paragraph::new(Line::from(Span::styled(status.clone(), Style::default().fg(Color::Yellow))))
            .block(Block::default().borders(Borders::ALL).title(" Keys [?] "))
            .alignment(Alignment::Center);
        f.render_widget(paragraph, area);
        return;
    }

    let keys = [
        ("↑/↓", "Select"),
        ("Tab", "Abilities/Equipment"),
        ("Enter", "Buy"),
        ("p", "Pause"),
        ("s", "Speed"),
        ("r", "New round"),
        ("q", "Quit"),
    ];

    let mut spans: Vec<Span> = Vec::new();
    for (i, (key, desc)) in keys.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  │  ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(
            format!("[{}]", key),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(format!(" {}", desc), Style::default().fg(Color::White)));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title(" Keys "))
        .alignment(Alignment::Center);

    f.render_widget(paragraph, area);
}

/// Health color by remaining fraction
pub fn health_color(ratio: f64) -> Color {
    if ratio > 0.5 {
        Color::Green
    } else if ratio > 0.25 {
        Color::Yellow
    } else {
        Color::Red
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_color_thresholds() {
        assert_eq!(health_color(1.0), Color::Green);
        assert_eq!(health_color(0.5), Color::Yellow);
        assert_eq!(health_color(0.1), Color::Red);
    }
}
