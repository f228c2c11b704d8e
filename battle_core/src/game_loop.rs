//! Game loop - one fixed-rate tick fanned out to many named callbacks
//!
//! The loop owns no clock. Each call to [`GameLoop::tick`] advances the
//! tick counter by one; whoever drives the loop decides how often that
//! happens (a 50ms timer in the terminal viewer, a tight loop in tests).

use crate::combat::{BattleError, BattleResult};
use tracing::error;

/// Callback invoked with the loop's context when its interval elapses
pub type LoopCallback<Ctx> = Box<dyn FnMut(&mut Ctx) -> BattleResult<()>>;

struct Registration<Ctx> {
    id: String,
    callback: LoopCallback<Ctx>,
    tick_interval: u64,
    last_tick: u64,
}

/// Single scheduler for every periodic combat concern
pub struct GameLoop<Ctx> {
    tick_rate_ms: u64,
    tick_count: u64,
    running: bool,
    /// Registration order is invocation order within a tick
    callbacks: Vec<Registration<Ctx>>,
}

impl<Ctx> GameLoop<Ctx> {
    /// Create a stopped loop ticking every `tick_rate_ms` (at least 1)
    pub fn new(tick_rate_ms: u64) -> Self {
        GameLoop {
            tick_rate_ms: tick_rate_ms.max(1),
            tick_count: 0,
            running: false,
            callbacks: Vec::new(),
        }
    }

    pub fn tick_rate_ms(&self) -> u64 {
        self.tick_rate_ms
    }

    /// Ticks since the loop was started
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of registered callbacks
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Whether a callback with this id is registered
    pub fn contains(&self, id: &str) -> bool {
        self.callbacks.iter().any(|r| r.id == id)
    }

    /// Register a callback to run every `interval_ms`
    ///
    /// The interval is quantized to whole ticks, `max(1, round(interval / tick_rate))`.
    /// Registering an existing id replaces it in place.
    pub fn register<F>(&mut self, id: impl Into<String>, callback: F, interval_ms: u64)
    where
        F: FnMut(&mut Ctx) -> BattleResult<()> + 'static,
    {
        let id = id.into();
        let tick_interval = ((interval_ms as f64 / self.tick_rate_ms as f64).round() as u64).max(1);
        let registration = Registration {
            id,
            callback: Box::new(callback),
            tick_interval,
            last_tick: 0,
        };
        match self.callbacks.iter_mut().find(|r| r.id == registration.id) {
            Some(existing) => *existing = registration,
            None => self.callbacks.push(registration),
        }
    }

    pub fn unregister(&mut self, id: &str) {
        self.callbacks.retain(|r| r.id != id);
    }

    /// Start ticking from zero; a no-op while already running
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.tick_count = 0;
    }

    /// Stop ticking and drop every callback
    pub fn stop(&mut self) {
        self.running = false;
        self.tick_count = 0;
        self.callbacks.clear();
    }

    /// Advance one tick, running every callback whose interval has elapsed
    ///
    /// A failing callback is logged and does not stop the others. Its
    /// schedule only advances on success, so it is retried next tick.
    pub fn tick(&mut self, ctx: &mut Ctx) {
        if !self.running {
            return;
        }
        self.tick_count += 1;

        let now = self.tick_count;
        for registration in self.callbacks.iter_mut() {
            if now - registration.last_tick < registration.tick_interval {
                continue;
            }
            match (registration.callback)(ctx) {
                Ok(()) => registration.last_tick = now,
                Err(err) => {
                    error!(callback = %registration.id, tick = now, error = %err, "game loop callback failed");
                }
            }
        }
    }

    /// Quantized interval of a registered callback, in ticks
    pub fn tick_interval(&self, id: &str) -> Option<u64> {
        self.callbacks.iter().find(|r| r.id == id).map(|r| r.tick_interval)
    }
}

impl<Ctx> std::fmt::Debug for GameLoop<Ctx> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ids: Vec<&str> = self.callbacks.iter().map(|r| r.id.as_str()).collect();
        f.debug_struct("GameLoop")
            .field("tick_rate_ms", &self.tick_rate_ms)
            .field("tick_count", &self.tick_count)
            .field("running", &self.running)
            .field("callbacks", &ids)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        fired: Vec<(&'static str, u64)>,
        calls: u64,
    }

    #[test]
    fn test_interval_quantization() {
        let mut game_loop: GameLoop<Counter> = GameLoop::new(50);
        game_loop.register("fast", |_| Ok(()), 10);
        game_loop.register("mana", |_| Ok(()), 250);
        game_loop.register("odd", |_| Ok(()), 1800);
        game_loop.register("rounded", |_| Ok(()), 74);

        assert_eq!(game_loop.tick_interval("fast"), Some(1));
        assert_eq!(game_loop.tick_interval("mana"), Some(5));
        assert_eq!(game_loop.tick_interval("odd"), Some(36));
        assert_eq!(game_loop.tick_interval("rounded"), Some(1));
    }

    #[test]
    fn test_registration_order_within_a_tick() {
        let mut game_loop: GameLoop<Counter> = GameLoop::new(50);
        game_loop.register("player", |c: &mut Counter| {
            c.fired.push(("player", c.calls));
            Ok(())
        }, 50);
        game_loop.register("enemy", |c: &mut Counter| {
            c.fired.push(("enemy", c.calls));
            Ok(())
        }, 50);
        game_loop.start();

        let mut ctx = Counter::default();
        game_loop.tick(&mut ctx);
        assert_eq!(ctx.fired, vec![("player", 0), ("enemy", 0)]);
    }

    #[test]
    fn test_reregister_replaces_in_place() {
        let mut game_loop: GameLoop<Counter> = GameLoop::new(50);
        game_loop.register("a", |_| Ok(()), 50);
        game_loop.register("b", |_| Ok(()), 50);
        game_loop.register("a", |c: &mut Counter| {
            c.fired.push(("a2", 0));
            Ok(())
        }, 50);
        assert_eq!(game_loop.len(), 2);

        game_loop.start();
        let mut ctx = Counter::default();
        game_loop.tick(&mut ctx);
        assert_eq!(ctx.fired, vec![("a2", 0)]);
    }

    #[test]
    fn test_failing_callback_does_not_stop_others() {
        let mut game_loop: GameLoop<Counter> = GameLoop::new(50);
        game_loop.register("broken", |_| {
            Err(BattleError::Callback {
                id: "broken".to_string(),
                message: "boom".to_string(),
            })
        }, 50);
        game_loop.register("healthy", |c: &mut Counter| {
            c.calls += 1;
            Ok(())
        }, 50);
        game_loop.start();

        let mut ctx = Counter::default();
        for _ in 0..3 {
            game_loop.tick(&mut ctx);
        }
        assert_eq!(ctx.calls, 3);
    }

    #[test]
    fn test_failed_callback_retries_next_tick() {
        let mut game_loop: GameLoop<Counter> = GameLoop::new(50);
        game_loop.register("flaky", |c: &mut Counter| {
            c.calls += 1;
            if c.calls == 1 {
                return Err(BattleError::Callback {
                    id: "flaky".to_string(),
                    message: "first call fails".to_string(),
                });
            }
            Ok(())
        }, 250);
        game_loop.start();

        let mut ctx = Counter::default();
        for _ in 0..5 {
            game_loop.tick(&mut ctx);
        }
        assert_eq!(ctx.calls, 1);

        // failed at tick 5, so tick 6 fires again; then back to every 5 ticks
        game_loop.tick(&mut ctx);
        assert_eq!(ctx.calls, 2);
        for _ in 0..4 {
            game_loop.tick(&mut ctx);
        }
        assert_eq!(ctx.calls, 2);
        game_loop.tick(&mut ctx);
        assert_eq!(ctx.calls, 3);
    }

    #[test]
    fn test_stop_clears_and_idles() {
        let mut game_loop: GameLoop<Counter> = GameLoop::new(50);
        game_loop.register("a", |c: &mut Counter| {
            c.calls += 1;
            Ok(())
        }, 50);
        game_loop.start();
        let mut ctx = Counter::default();
        game_loop.tick(&mut ctx);

        game_loop.stop();
        assert!(game_loop.is_empty());
        assert!(!game_loop.is_running());
        game_loop.tick(&mut ctx);
        assert_eq!(ctx.calls, 1);
        assert_eq!(game_loop.tick_count(), 0);
    }

    #[test]
    fn test_unregister() {
        let mut game_loop: GameLoop<Counter> = GameLoop::new(50);
        game_loop.register("a", |_| Ok(()), 50);
        game_loop.unregister("a");
        game_loop.unregister("missing");
        assert!(!game_loop.contains("a"));
    }
}
