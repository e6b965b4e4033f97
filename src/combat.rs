use rand::Rng;
use serde::Serialize;

use crate::models::CharacterSnapshot;
use crate::stats::{round_to, stat_value, SimulationContext, StatKind};

/// Health every incoming hit takes before armor.
pub const INCOMING_DAMAGE: f64 = 10.0;

#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TickOutcome {
    pub final_damage_dealt: f64,
    pub health_lost: f64,
    pub was_critical: bool,
    pub was_hit: bool,
    pub was_dodge: bool,
}

/// Stat totals one exchange needs.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickStats {
    pub attack: f64,
    pub precision: f64,
    pub critical_chance: f64,
    pub critical_damages: f64,
    pub armor: f64,
    pub dodge: f64,
}

impl TickStats {
    pub fn resolve(snapshot: &CharacterSnapshot, ctx: &SimulationContext<'_>) -> Self {
        let total = |stat| stat_value(snapshot, ctx, stat);
        Self {
            attack: total(StatKind::Attack),
            precision: total(StatKind::Precision),
            critical_chance: total(StatKind::CriticalChance),
            critical_damages: total(StatKind::CriticalDamages),
            armor: total(StatKind::Armor),
            dodge: total(StatKind::Dodge),
        }
    }
}

/// Resolves one exchange with stat totals freshly computed from the snapshot.
pub fn simulate_one_tick<R: Rng + ?Sized>(
    snapshot: &CharacterSnapshot,
    ctx: &SimulationContext<'_>,
    rng: &mut R,
) -> TickOutcome {
    resolve_tick(&TickStats::resolve(snapshot, ctx), rng)
}

/// Dodge, then armor, then precision, then critical. Each check takes
/// its own uniform draw in [0, 100).
pub fn resolve_tick<R: Rng + ?Sized>(stats: &TickStats, rng: &mut R) -> TickOutcome {
    let was_dodge = roll(rng) < stats.dodge;
    let health_lost = if was_dodge {
        0.0
    } else {
        let armor = stats.armor.clamp(0.0, 100.0);
        INCOMING_DAMAGE * (1.0 - armor / 100.0)
    };

    let was_hit = roll(rng) < stats.precision;
    let base_damage = if was_hit {
        stats.attack
    } else {
        stats.attack / 2.0
    };

    let was_critical = roll(rng) < stats.critical_chance;
    let final_damage = if was_critical {
        base_damage * (1.0 + stats.critical_damages / 100.0)
    } else {
        base_damage
    };

    TickOutcome {
        final_damage_dealt: round_to(final_damage, 1),
        health_lost: round_to(health_lost, 1),
        was_critical,
        was_hit,
        was_dodge,
    }
}

fn roll<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen_range(0.0..100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SkillCode;
    use crate::skills::tests::flat_table;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn stats(attack: f64, precision: f64, crit: f64, armor: f64, dodge: f64) -> TickStats {
        TickStats {
            attack,
            precision,
            critical_chance: crit,
            critical_damages: 50.0,
            armor,
            dodge,
        }
    }

    #[test]
    fn certain_hit_without_crit_deals_attack() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..200 {
            let outcome = resolve_tick(&stats(20.0, 100.0, 0.0, 0.0, 0.0), &mut rng);
            assert_eq!(outcome.final_damage_dealt, 20.0);
            assert_eq!(outcome.health_lost, 10.0);
            assert!(outcome.was_hit);
            assert!(!outcome.was_critical);
            assert!(!outcome.was_dodge);
        }
    }

    #[test]
    fn full_dodge_never_loses_health() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..200 {
            let outcome = resolve_tick(&stats(20.0, 50.0, 50.0, 0.0, 100.0), &mut rng);
            assert!(outcome.was_dodge);
            assert_eq!(outcome.health_lost, 0.0);
        }
    }

    #[test]
    fn dodged_ticks_report_zero_loss() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut dodges = 0;
        for _ in 0..500 {
            let outcome = resolve_tick(&stats(20.0, 50.0, 50.0, 30.0, 40.0), &mut rng);
            if outcome.was_dodge {
                dodges += 1;
                assert_eq!(outcome.health_lost, 0.0);
            } else {
                assert_eq!(outcome.health_lost, 7.0);
            }
        }
        assert!(dodges > 0);
    }

    #[test]
    fn more_armor_loses_less_health() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut previous = f64::MAX;
        for armor in [0.0, 10.0, 25.0, 40.0, 50.0] {
            let outcome = resolve_tick(&stats(20.0, 100.0, 0.0, armor, 0.0), &mut rng);
            assert!(outcome.health_lost < previous);
            previous = outcome.health_lost;
        }
        assert_eq!(previous, 5.0);
    }

    #[test]
    fn armor_above_cap_never_heals() {
        let mut rng = StdRng::seed_from_u64(5);
        let outcome = resolve_tick(&stats(20.0, 100.0, 0.0, 140.0, 0.0), &mut rng);
        assert_eq!(outcome.health_lost, 0.0);
    }

    #[test]
    fn failed_precision_halves_before_crit() {
        let mut rng = StdRng::seed_from_u64(6);
        let outcome = resolve_tick(&stats(30.0, 0.0, 0.0, 0.0, 0.0), &mut rng);
        assert!(!outcome.was_hit);
        assert_eq!(outcome.final_damage_dealt, 15.0);

        let outcome = resolve_tick(&stats(30.0, 0.0, 100.0, 0.0, 0.0), &mut rng);
        assert!(!outcome.was_hit);
        assert!(outcome.was_critical);
        assert_eq!(outcome.final_damage_dealt, 22.5);
    }

    #[test]
    fn partial_hits_are_half_of_full_hits() {
        let mut rng = StdRng::seed_from_u64(7);
        let tick_stats = stats(41.0, 50.0, 30.0, 0.0, 0.0);
        for _ in 0..500 {
            let outcome = resolve_tick(&tick_stats, &mut rng);
            let base = if outcome.was_hit { 41.0 } else { 20.5 };
            let expected = if outcome.was_critical {
                base * 1.5
            } else {
                base
            };
            assert_eq!(outcome.final_damage_dealt, round_to(expected, 1));
        }
    }

    #[test]
    fn simulate_one_tick_reads_snapshot_stats() {
        let table = flat_table(&[
            (SkillCode::Attack, 20.0),
            (SkillCode::Precision, 100.0),
            (SkillCode::Dodge, 100.0),
        ]);
        let ctx = SimulationContext::new(&table);
        let snapshot = CharacterSnapshot::default();
        let mut rng = StdRng::seed_from_u64(8);

        let outcome = simulate_one_tick(&snapshot, &ctx, &mut rng);
        assert_eq!(
            outcome,
            TickOutcome {
                final_damage_dealt: 20.0,
                health_lost: 0.0,
                was_critical: false,
                was_hit: true,
                was_dodge: true,
            }
        );
    }
}
