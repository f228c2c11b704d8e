//! Hero panels and battle log

use crate::app::App;
use crate::ui::health_color;
use battle_core::{BattleOutcome, CombatantSnapshot};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Hero panels
            Constraint::Min(0),    // Battle log
        ])
        .split(area);

    let heroes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[0]);

    if let Some(snapshot) = app.snapshot() {
        let (player_title, enemy_title) = match snapshot.outcome {
            Some(BattleOutcome::Victory) => (" Player 🏆 ", " Enemy 💀 "),
            Some(BattleOutcome::Defeat) => (" Player 💀 ", " Enemy 🏆 "),
            None => (" Player ", " Enemy "),
        };
        draw_hero(f, &snapshot.player, player_title, heroes[0]);
        draw_hero(f, &snapshot.enemy, enemy_title, heroes[1]);
    }

    draw_battle_log(f, app, chunks[1]);
}

fn draw_hero(f: &mut Frame, hero: &CombatantSnapshot, title: &str, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(title.to_string());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Name
            Constraint::Length(1), // Health
            Constraint::Length(1), // Mana
            Constraint::Length(1), // Stats
            Constraint::Min(0),    // Statuses
        ])
        .split(inner);

    let name = Paragraph::new(Line::from(Span::styled(
        hero.name.clone(),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )));
    f.render_widget(name, rows[0]);

    let health_ratio = hero.health_ratio().clamp(0.0, 1.0);
    let health = Gauge::default()
        .gauge_style(Style::default().fg(health_color(health_ratio)).bg(Color::Black))
        .ratio(health_ratio)
        .label(format!("HP {:.0}/{:.0}", hero.health.max(0.0), hero.max_health));
    f.render_widget(health, rows[1]);

    let mana = Gauge::default()
        .gauge_style(Style::default().fg(Color::Blue).bg(Color::Black))
        .ratio(hero.mana_ratio().clamp(0.0, 1.0))
        .label(format!("MP {:.0}/{:.0}", hero.mana, hero.max_mana));
    f.render_widget(mana, rows[2]);

    let stats = Line::from(vec![
        Span::styled("ATK ", Style::default().fg(Color::Gray)),
        Span::styled(format!("{:.0}", hero.attack), Style::default().fg(Color::White)),
        Span::styled("  ARM ", Style::default().fg(Color::Gray)),
        Span::styled(format!("{:.0}", hero.armor), Style::default().fg(Color::White)),
        Span::styled("  SPD ", Style::default().fg(Color::Gray)),
        Span::styled(format!("{:.2}", hero.speed), Style::default().fg(Color::White)),
    ]);
    f.render_widget(Paragraph::new(stats), rows[3]);

    let statuses = if hero.statuses.is_empty() {
        Line::from(Span::styled("no effects", Style::default().fg(Color::DarkGray)))
    } else {
        Line::from(Span::styled(hero.statuses.join(", "), Style::default().fg(Color::Magenta)))
    };
    f.render_widget(Paragraph::new(statuses), rows[4]);
}

fn line_style(line: &str) -> Style {
    if line.contains("Victory") {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else if line.contains("Defeat") {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else if line.contains("critical") {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else if line.contains("⚠️") {
        Style::default().fg(Color::LightRed)
    } else if line.contains("evades") || line.contains("misses") {
        Style::default().fg(Color::Cyan)
    } else if line.contains("poison") || line.contains("☠️") {
        Style::default().fg(Color::Green)
    } else if line.contains("frost") || line.contains("❄️") {
        Style::default().fg(Color::LightCyan)
    } else if line.contains("heals") || line.contains("restores") || line.contains("regenerates") {
        Style::default().fg(Color::LightGreen)
    } else if line.contains("shield") {
        Style::default().fg(Color::Blue)
    } else {
        Style::default().fg(Color::White)
    }
}

fn draw_battle_log(f: &mut Frame, app: &App, area: Rect) {
    let log = app.log();
    let visible = area.height.saturating_sub(2) as usize;
    let end = log.len().saturating_sub(app.log_scroll);
    let start = end.saturating_sub(visible);

    let items: Vec<ListItem> = log[start..end]
        .iter()
        .map(|line| ListItem::new(Line::from(Span::styled(line.clone(), line_style(line)))))
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Battle Log (PgUp/PgDn to scroll) "),
    );

    f.render_widget(list, area);
}
