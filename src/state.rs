use serde::Serialize;
use std::fmt;

use crate::combat::TickOutcome;
use crate::models::{Equipment, Slot};

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    NoHealth,
    WeaponBroken,
    MaxTicks,
}

impl EndReason {
    pub const ALL: [EndReason; 3] = [
        EndReason::NoHealth,
        EndReason::WeaponBroken,
        EndReason::MaxTicks,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EndReason::NoHealth => "no_health",
            EndReason::WeaponBroken => "weapon_broken",
            EndReason::MaxTicks => "max_ticks",
        }
    }
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SimulationOutcome {
    pub total_damage_dealt: f64,
    pub ticks_survived: u32,
    pub end_reason: EndReason,
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct SlotDurability {
    pub slot: Slot,
    pub remaining: i64,
}

/// Remaining durability of every tracked slot during one run.
///
/// An empty weapon slot is not tracked and never breaks; armor slots are
/// tracked only when equipped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Durability {
    weapon: Option<i64>,
    armor: Vec<SlotDurability>,
}

impl Durability {
    pub fn from_equipment(equipment: &Equipment) -> Self {
        let weapon = equipment.weapon.as_ref().map(|item| item.durability as i64);
        let armor = Slot::ARMOR
            .into_iter()
            .filter_map(|slot| {
                equipment.get(slot).map(|item| SlotDurability {
                    slot,
                    remaining: item.durability as i64,
                })
            })
            .collect();
        Self { weapon, armor }
    }

    pub fn weapon_broken(&self) -> bool {
        matches!(self.weapon, Some(remaining) if remaining <= 0)
    }

    /// Wear after one exchange: the weapon always, armor only when hit.
    pub fn wear(&mut self, dodged: bool) {
        if let Some(remaining) = self.weapon.as_mut() {
            *remaining -= 1;
        }
        if !dodged {
            for entry in &mut self.armor {
                entry.remaining -= 1;
            }
        }
    }

    pub fn slots(&self) -> Vec<SlotDurability> {
        let mut slots = Vec::with_capacity(self.armor.len() + 1);
        if let Some(remaining) = self.weapon {
            slots.push(SlotDurability {
                slot: Slot::Weapon,
                remaining,
            });
        }
        slots.extend(self.armor.iter().copied());
        slots
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LogEntry {
    Ate {
        food: String,
        heal: f64,
        health_after: f64,
        hunger_left: f64,
    },
    Tick {
        tick: u32,
        outcome: TickOutcome,
        health_after: f64,
    },
    Ended {
        reason: EndReason,
        ticks: u32,
    },
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogEntry::Ate {
                food,
                heal,
                health_after,
                hunger_left,
            } => write!(
                f,
                "Ate {} (+{:.1} health): health {:.1}, hunger left {}",
                food, heal, health_after, hunger_left
            ),
            LogEntry::Tick {
                tick,
                outcome,
                health_after,
            } => {
                let defense = if outcome.was_dodge {
                    "dodged the incoming hit".to_string()
                } else {
                    format!("took {:.1} damage", outcome.health_lost)
                };
                let hit = match (outcome.was_hit, outcome.was_critical) {
                    (true, true) => " (critical)",
                    (true, false) => "",
                    (false, true) => " (partial hit, critical)",
                    (false, false) => " (partial hit)",
                };
                write!(
                    f,
                    "Tick {}: dealt {:.1} damage{}, {}, health {:.1}",
                    tick, outcome.final_damage_dealt, hit, defense, health_after
                )
            }
            LogEntry::Ended { reason, ticks } => {
                write!(f, "Ended after {} ticks: {}", ticks, reason)
            }
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DetailedRun {
    pub outcome: SimulationOutcome,
    pub final_health: f64,
    pub hunger_left: f64,
    pub durability: Vec<SlotDurability>,
    pub log: Vec<LogEntry>,
}
