use rand::Rng;

use crate::combat::{simulate_one_tick, INCOMING_DAMAGE};
use crate::models::{CharacterSnapshot, FoodItem, MAX_TICK_CEILING};
use crate::state::{DetailedRun, Durability, EndReason, LogEntry, SimulationOutcome};
use crate::stats::{max_health, max_hunger, round_to, SimulationContext};

/// Runs one encounter: ticks until the character runs out of health, the
/// weapon breaks, or the tick ceiling is reached.
pub struct SurvivalEngine<'a, R: Rng> {
    pub snapshot: &'a CharacterSnapshot,
    pub ctx: SimulationContext<'a>,
    pub food: Option<&'a FoodItem>,
    pub tick_ceiling: u32,
    pub rng: R,
}

impl<'a, R: Rng> SurvivalEngine<'a, R> {
    pub fn new(
        snapshot: &'a CharacterSnapshot,
        ctx: SimulationContext<'a>,
        food: Option<&'a FoodItem>,
        tick_ceiling: u32,
        rng: R,
    ) -> Self {
        Self {
            snapshot,
            ctx,
            food,
            tick_ceiling: tick_ceiling.min(MAX_TICK_CEILING),
            rng,
        }
    }

    pub fn run(&mut self, record_log: bool) -> DetailedRun {
        let max_health = max_health(self.snapshot, &self.ctx);
        let mut health = max_health;
        let mut hunger = max_hunger(self.snapshot, &self.ctx);
        let heal = self.food.map_or(0.0, FoodItem::heal_per_use);
        let mut durability = Durability::from_equipment(&self.snapshot.equipped_items);
        let mut log = Vec::new();

        let mut total_damage = 0.0;
        let mut ticks = 0u32;

        let end_reason = loop {
            if ticks >= self.tick_ceiling {
                break EndReason::MaxTicks;
            }
            if durability.weapon_broken() {
                break EndReason::WeaponBroken;
            }

            if health <= INCOMING_DAMAGE && hunger > 0.0 && heal > 0.0 {
                while hunger > 0.0 && health <= INCOMING_DAMAGE && health < max_health {
                    hunger -= 1.0;
                    health = round_to(health + heal, 1);
                    if record_log {
                        log.push(LogEntry::Ate {
                            food: self.food.map(|food| food.name.clone()).unwrap_or_default(),
                            heal,
                            health_after: health,
                            hunger_left: hunger,
                        });
                    }
                }
            }

            if health < INCOMING_DAMAGE {
                break EndReason::NoHealth;
            }

            let outcome = simulate_one_tick(self.snapshot, &self.ctx, &mut self.rng);
            // Health stays on the 0.1 grid every delta lives on.
            health = round_to(health - outcome.health_lost, 1);
            total_damage += outcome.final_damage_dealt;
            ticks += 1;
            durability.wear(outcome.was_dodge);

            if record_log {
                log.push(LogEntry::Tick {
                    tick: ticks,
                    outcome,
                    health_after: health,
                });
            }

            if health <= 0.0 {
                break EndReason::NoHealth;
            }
        };

        if record_log {
            log.push(LogEntry::Ended {
                reason: end_reason,
                ticks,
            });
        }

        DetailedRun {
            outcome: SimulationOutcome {
                total_damage_dealt: round_to(total_damage, 1),
                ticks_survived: ticks,
                end_reason,
            },
            final_health: health,
            hunger_left: hunger,
            durability: durability.slots(),
            log,
        }
    }
}

/// Lightweight variant used by the Monte Carlo batch: no log is built.
pub fn run_survival_loop<R: Rng + ?Sized>(
    snapshot: &CharacterSnapshot,
    ctx: &SimulationContext<'_>,
    food: Option<&FoodItem>,
    tick_ceiling: u32,
    rng: &mut R,
) -> SimulationOutcome {
    SurvivalEngine::new(snapshot, *ctx, food, tick_ceiling, rng)
        .run(false)
        .outcome
}

pub fn run_survival_loop_detailed<R: Rng + ?Sized>(
    snapshot: &CharacterSnapshot,
    ctx: &SimulationContext<'_>,
    food: Option<&FoodItem>,
    tick_ceiling: u32,
    rng: &mut R,
) -> DetailedRun {
    SurvivalEngine::new(snapshot, *ctx, food, tick_ceiling, rng).run(true)
}
