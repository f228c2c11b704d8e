//! battle_sim - Terminal viewer and headless simulator for battle_core

mod app;
mod cli;
mod logging;
mod simulation;
mod ui;

use app::{App, Setup};
use battle_core::config::{load_constants, load_hero_catalog, load_shop_catalog};
use battle_core::{default_heroes, default_shop, BattleError, CombatConstants, ConfigError};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Most engine ticks replayed in one frame after a stall
const MAX_CATCH_UP_TICKS: u32 = 10;

#[derive(Error, Debug)]
enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Battle(#[from] BattleError),
    #[error("Failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() -> Result<(), AppError> {
    let args = cli::parse_args();

    // The guard flushes the file writer on drop
    let _guard = if args.headless {
        logging::init_stderr();
        None
    } else {
        Some(logging::init_file(&args.log_dir)?)
    };

    let setup = load_setup(&args)?;
    if args.headless {
        run_headless(&args, &setup)
    } else {
        run_tui(setup)
    }
}

fn load_setup(args: &cli::Args) -> Result<Setup, AppError> {
    let catalog = match &args.heroes {
        Some(path) => load_hero_catalog(path)?,
        None => default_heroes(),
    };
    let shop = match &args.shop {
        Some(path) => load_shop_catalog(path)?,
        None => default_shop(),
    };
    let constants = match &args.constants {
        Some(path) => load_constants(path)?,
        None => CombatConstants::default(),
    };

    Ok(Setup {
        catalog,
        constants,
        shop,
        hero_id: args.hero.clone(),
        money: args.money,
        seed: args.seed.unwrap_or_else(rand::random),
    })
}

fn run_headless(args: &cli::Args, setup: &Setup) -> Result<(), AppError> {
    let (records, summary) = simulation::run_many(
        &setup.catalog,
        &setup.constants,
        setup.hero_id.as_deref(),
        setup.seed,
        args.battles,
    )?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    for record in &records {
        if args.verbose {
            println!("=== Seed {} ===", record.seed);
            for line in &record.log {
                println!("  {}", line);
            }
        }
        let outcome = record.outcome.map_or("unfinished".to_string(), |o| o.to_string());
        println!(
            "seed {:>6}  {} vs {}  {}  after {:.1}s",
            record.seed,
            record.player,
            record.enemy,
            outcome,
            record.elapsed_ms as f64 / 1000.0
        );
    }

    println!();
    println!(
        "{} battles: {} victories, {} defeats, {} unfinished ({:.1}% win rate, avg {:.1}s)",
        summary.battles,
        summary.victories,
        summary.defeats,
        summary.unfinished,
        summary.win_rate(),
        summary.average_elapsed_ms / 1000.0
    );
    Ok(())
}

fn run_tui(setup: Setup) -> Result<(), AppError> {
    let mut app = App::new(setup)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<(), AppError> {
    let tick = Duration::from_millis(app.tick_rate_ms());
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        let timeout = tick.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match (key.code, key.modifiers) {
                        (KeyCode::Char('q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => break,
                        (KeyCode::Up, _) | (KeyCode::Char('k'), _) => app.on_up(),
                        (KeyCode::Down, _) | (KeyCode::Char('j'), _) => app.on_down(),
                        (KeyCode::Tab, _) | (KeyCode::BackTab, _) => app.toggle_panel(),
                        (KeyCode::Enter, _) | (KeyCode::Char(' '), _) => app.buy_selected(),
                        (KeyCode::PageUp, _) => app.scroll_log_up(),
                        (KeyCode::PageDown, _) => app.scroll_log_down(),
                        (KeyCode::Char('p'), _) => app.toggle_pause(),
                        (KeyCode::Char('s'), _) => app.cycle_speed(),
                        (KeyCode::Char('r'), _) => app.restart(),
                        (KeyCode::Char('?'), _) => app.toggle_help(),
                        _ => {}
                    }
                }
            }
        }

        // Replay the engine ticks that fell due while drawing and waiting
        let mut replayed = 0;
        while last_tick.elapsed() >= tick && replayed < MAX_CATCH_UP_TICKS {
            app.tick();
            last_tick += tick;
            replayed += 1;
        }
        if replayed == MAX_CATCH_UP_TICKS {
            last_tick = Instant::now();
        }
    }

    Ok(())
}
