//! Application state

use crate::simulation::{choose_player, Round};
use battle_core::{BattleError, BattleSnapshot, CombatConstants, HeroTemplate, ShopCatalog};
use rand::{rngs::StdRng, SeedableRng};
use tracing::info;

/// Attack cadence multipliers cycled by the speed key
const SPEED_STEPS: [f64; 3] = [1.0, 1.5, 2.0];

/// Shop list focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopPanel {
    Abilities,
    Equipment,
}

impl ShopPanel {
    pub fn name(&self) -> &'static str {
        match self {
            ShopPanel::Abilities => "Abilities",
            ShopPanel::Equipment => "Equipment",
        }
    }
}

/// Everything needed to (re)start a round
#[derive(Debug, Clone)]
pub struct Setup {
    pub catalog: Vec<HeroTemplate>,
    pub constants: CombatConstants,
    pub shop: ShopCatalog,
    pub hero_id: Option<String>,
    pub money: u32,
    pub seed: u64,
}

pub struct App {
    pub round: Round,
    pub setup: Setup,
    pub panel: ShopPanel,
    pub selected: usize,
    /// Lines scrolled up from the newest log entry
    pub log_scroll: usize,
    pub show_help: bool,
    pub paused: bool,
    pub speed_step: usize,
    /// Last shop or round message for the footer
    pub status: Option<String>,
}

impl App {
    pub fn new(setup: Setup) -> Result<Self, BattleError> {
        let round = start_round(&setup)?;
        Ok(App {
            round,
            setup,
            panel: ShopPanel::Abilities,
            selected: 0,
            log_scroll: 0,
            show_help: false,
            paused: false,
            speed_step: 0,
            status: None,
        })
    }

    /// Advance the battle by one engine tick
    pub fn tick(&mut self) {
        if self.paused || self.show_help {
            return;
        }
        self.round.tick();
        if let Some(outcome) = self.round.notified() {
            if self.status.is_none() {
                self.status = Some(format!("Battle over: {}. Press r for a new round.", outcome));
            }
        }
    }

    pub fn snapshot(&self) -> Option<BattleSnapshot> {
        self.round.controller.snapshot()
    }

    pub fn log(&self) -> &[String] {
        self.round.controller.battle().map(|b| b.log().entries()).unwrap_or_default()
    }

    pub fn money(&self) -> u32 {
        self.round.controller.player_money()
    }

    pub fn tick_rate_ms(&self) -> u64 {
        self.setup.constants.timing.tick_rate_ms
    }

    pub fn speed(&self) -> f64 {
        SPEED_STEPS[self.speed_step]
    }

    // === Shop ===

    fn shop_len(&self) -> usize {
        match self.panel {
            ShopPanel::Abilities => self.setup.shop.abilities.len(),
            ShopPanel::Equipment => self.setup.shop.equipment.len(),
        }
    }

    pub fn toggle_panel(&mut self) {
        self.panel = match self.panel {
            ShopPanel::Abilities => ShopPanel::Equipment,
            ShopPanel::Equipment => ShopPanel::Abilities,
        };
        self.selected = self.selected.min(self.shop_len().saturating_sub(1));
    }

    pub fn on_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn on_down(&mut self) {
        if self.selected + 1 < self.shop_len() {
            self.selected += 1;
        }
    }

    /// Buy the highlighted shop entry
    pub fn buy_selected(&mut self) {
        let result = match self.panel {
            ShopPanel::Abilities => match self.setup.shop.abilities.get(self.selected) {
                Some(entry) => {
                    let name = entry.ability.name.clone();
                    self.round
                        .controller
                        .purchase_ability(entry.ability.clone(), entry.cost)
                        .map(|()| (name, entry.cost))
                }
                None => return,
            },
            ShopPanel::Equipment => match self.setup.shop.equipment.get(self.selected) {
                Some(entry) => {
                    let name = entry.item.name.clone();
                    self.round.controller.equip_item(entry.item.clone(), entry.cost).map(|()| (name, entry.cost))
                }
                None => return,
            },
        };

        self.status = Some(match result {
            Ok((name, cost)) => format!("Bought {} for {} gold", name, cost),
            Err(err) => err.to_string(),
        });
    }

    // === Round control ===

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn cycle_speed(&mut self) {
        self.speed_step = (self.speed_step + 1) % SPEED_STEPS.len();
        self.round.controller.set_speed_multiplier(self.speed());
    }

    pub fn scroll_log_up(&mut self) {
        if self.log_scroll + 1 < self.log().len() {
            self.log_scroll += 1;
        }
    }

    pub fn scroll_log_down(&mut self) {
        self.log_scroll = self.log_scroll.saturating_sub(1);
    }

    /// Start a fresh round with the next seed
    pub fn restart(&mut self) {
        self.setup.seed = self.setup.seed.wrapping_add(1);
        match start_round(&self.setup) {
            Ok(round) => {
                self.round.controller.teardown();
                self.round = round;
                self.log_scroll = 0;
                self.speed_step = 0;
                self.status = None;
                info!(seed = self.setup.seed, "round restarted");
            }
            Err(err) => self.status = Some(err.to_string()),
        }
    }
}

fn start_round(setup: &Setup) -> Result<Round, BattleError> {
    let mut rng = StdRng::seed_from_u64(setup.seed);
    let player = choose_player(&setup.catalog, setup.hero_id.as_deref(), &mut rng).ok_or_else(|| {
        BattleError::InvalidHero(format!(
            "'{}' is not in the hero catalog",
            setup.hero_id.as_deref().unwrap_or_default()
        ))
    })?;
    Round::start(setup.catalog.clone(), setup.constants.clone(), player, setup.money, setup.seed)
}
