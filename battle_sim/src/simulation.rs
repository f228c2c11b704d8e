//! Round driving and headless battle simulation

use battle_core::{
    BattleError, BattleOutcome, CombatConstants, CombatController, Hero, HeroTemplate, InitOptions,
};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::Serialize;
use std::cell::Cell;
use std::rc::Rc;
use tracing::{debug, info};

/// Ticks after which an unfinished headless battle is abandoned (10 minutes of battle time)
const MAX_TICKS: u64 = 12_000;

/// One battle plus the once-per-second escalation clock
pub struct Round {
    pub controller: CombatController,
    escalated_secs: u64,
    ended: Rc<Cell<Option<BattleOutcome>>>,
}

impl Round {
    /// Build a controller, pick heroes and start the battle
    pub fn start(
        catalog: Vec<HeroTemplate>,
        constants: CombatConstants,
        player: Hero,
        money: u32,
        seed: u64,
    ) -> Result<Self, BattleError> {
        let mut controller = CombatController::new(catalog, constants).with_seed(seed);
        let ended = Rc::new(Cell::new(None));
        let notice = Rc::clone(&ended);
        controller.set_on_battle_end(move |outcome| notice.set(Some(outcome)));
        controller.init(player, money, InitOptions::default())?;

        Ok(Round {
            controller,
            escalated_secs: 0,
            ended,
        })
    }

    /// Advance one tick and escalate damage on each new battle second
    pub fn tick(&mut self) {
        self.controller.tick();

        let elapsed_ms = self.controller.battle().map_or(0, |b| b.elapsed_ms());
        let secs = elapsed_ms / 1000;
        if secs > self.escalated_secs && !self.controller.is_game_over() {
            self.escalated_secs = secs;
            let multiplier = self.controller.constants().escalation.multiplier(secs as f64);
            self.controller.set_damage_multiplier(multiplier);
        }
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.controller.battle().and_then(|b| b.outcome())
    }

    /// Outcome once the end-of-battle notice has been delivered
    pub fn notified(&self) -> Option<BattleOutcome> {
        self.ended.get()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.controller.battle().map_or(0, |b| b.elapsed_ms())
    }
}

/// Pick the player's hero: by id when given, otherwise at random
pub fn choose_player(catalog: &[HeroTemplate], hero_id: Option<&str>, rng: &mut StdRng) -> Option<Hero> {
    let template = match hero_id {
        Some(id) => catalog.iter().find(|t| t.id == id),
        None => catalog.choose(rng),
    }?;
    Some(Hero::from_template(template))
}

/// Result of one headless battle
#[derive(Debug, Clone, Serialize)]
pub struct BattleRecord {
    pub seed: u64,
    pub player: String,
    pub enemy: String,
    pub outcome: Option<BattleOutcome>,
    pub elapsed_ms: u64,
    pub log: Vec<String>,
}

/// Aggregate of a headless run
#[derive(Debug, Clone, Default, Serialize)]
pub struct SimulationSummary {
    pub battles: u32,
    pub victories: u32,
    pub defeats: u32,
    /// Battles still running when the tick cap hit
    pub unfinished: u32,
    pub average_elapsed_ms: f64,
}

impl SimulationSummary {
    /// Add one battle to the totals
    pub fn record(&mut self, record: &BattleRecord) {
        let total_ms = self.average_elapsed_ms * self.battles as f64 + record.elapsed_ms as f64;
        self.battles += 1;
        self.average_elapsed_ms = total_ms / self.battles as f64;
        match record.outcome {
            Some(BattleOutcome::Victory) => self.victories += 1,
            Some(BattleOutcome::Defeat) => self.defeats += 1,
            None => self.unfinished += 1,
        }
    }

    pub fn win_rate(&self) -> f64 {
        if self.battles > 0 {
            self.victories as f64 / self.battles as f64 * 100.0
        } else {
            0.0
        }
    }
}

/// Run one seeded battle to completion
pub fn run_battle(
    catalog: &[HeroTemplate],
    constants: &CombatConstants,
    hero_id: Option<&str>,
    seed: u64,
) -> Result<BattleRecord, BattleError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let player = choose_player(catalog, hero_id, &mut rng).ok_or_else(|| {
        BattleError::InvalidHero(format!("'{}' is not in the hero catalog", hero_id.unwrap_or_default()))
    })?;

    let mut round = Round::start(catalog.to_vec(), constants.clone(), player, 0, seed)?;
    for _ in 0..MAX_TICKS {
        if round.controller.is_game_over() {
            break;
        }
        round.tick();
    }

    let battle = round.controller.battle().ok_or(BattleError::NotInitialized)?;
    let record = BattleRecord {
        seed,
        player: battle.player().name.clone(),
        enemy: battle.enemy().name.clone(),
        outcome: round.outcome(),
        elapsed_ms: round.elapsed_ms(),
        log: battle.log().entries().to_vec(),
    };
    debug!(seed, outcome = ?record.outcome, elapsed_ms = record.elapsed_ms, "headless battle finished");
    Ok(record)
}

/// Run `count` battles with consecutive seeds
pub fn run_many(
    catalog: &[HeroTemplate],
    constants: &CombatConstants,
    hero_id: Option<&str>,
    first_seed: u64,
    count: u32,
) -> Result<(Vec<BattleRecord>, SimulationSummary), BattleError> {
    let mut records = Vec::with_capacity(count as usize);
    let mut summary = SimulationSummary::default();
    for offset in 0..count {
        let record = run_battle(catalog, constants, hero_id, first_seed.wrapping_add(offset as u64))?;
        summary.record(&record);
        records.push(record);
    }
    info!(
        battles = summary.battles,
        victories = summary.victories,
        defeats = summary.defeats,
        "simulation complete"
    );
    Ok((records, summary))
}
