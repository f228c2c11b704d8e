//! In-battle shop list

use crate::app::{App, ShopPanel};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Entries
            Constraint::Length(5), // Description
        ])
        .split(area);

    let money = app.money();
    let entries: Vec<(String, u32, String)> = match app.panel {
        ShopPanel::Abilities => app
            .setup
            .shop
            .abilities
            .iter()
            .map(|e| (format!("{} {}", e.ability.emoji, e.ability.name), e.cost, e.ability.description.clone()))
            .collect(),
        ShopPanel::Equipment => app
            .setup
            .shop
            .equipment
            .iter()
            .map(|e| (format!("{} {}", e.item.emoji, e.item.name), e.cost, e.item.description.clone()))
            .collect(),
    };

    let items: Vec<ListItem> = entries
        .iter()
        .map(|(label, cost, _)| {
            let cost_color = if *cost <= money { Color::Yellow } else { Color::DarkGray };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:>3}g ", cost), Style::default().fg(cost_color)),
                Span::styled(label.clone(), Style::default().fg(Color::White)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Shop: {} ", app.panel.name())),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("▶ ");

    let mut state = ListState::default();
    state.select(Some(app.selected));
    f.render_stateful_widget(list, chunks[0], &mut state);

    let description = entries.get(app.selected).map(|(_, _, d)| d.clone()).unwrap_or_default();
    let paragraph = Paragraph::new(description)
        .style(Style::default().fg(Color::Gray))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Effect "));
    f.render_widget(paragraph, chunks[1]);
}
