use rand::Rng;

use oppidum_types::battle::BattleResult;
use oppidum_types::units::{UnitClass, UnitKind, UnitSet};

use crate::catalog::units::unit_data;

pub const LUCK_MIN: f64 = -0.25;
pub const LUCK_MAX: f64 = 0.25;

const BASE_LOYALTY_DAMAGE: u32 = 20;

/// Source of the engagement luck draw. Injectable so battles are
/// deterministic under test.
pub trait Luck: Send + Sync {
    fn draw(&self, lo: f64, hi: f64) -> f64;
}

pub struct RandomLuck;

impl Luck for RandomLuck {
    fn draw(&self, lo: f64, hi: f64) -> f64 {
        rand::thread_rng().gen_range(lo..=hi)
    }
}

/// Always draws the same value.
pub struct FixedLuck(pub f64);

impl Luck for FixedLuck {
    fn draw(&self, _lo: f64, _hi: f64) -> f64 {
        self.0
    }
}

/// Resolves one clash between an attacking and a defending power.
/// Returns `(attacker_loss_ratio, defender_loss_ratio)`.
///
/// The losing side is wiped; the winner loses `(weaker/stronger)^1.5` of the
/// units it committed.
fn resolve_clash(attack: f64, defense: f64) -> (f64, f64) {
    if attack <= 0.0 {
        return (0.0, 0.0);
    }

    if attack > defense {
        let ratio = defense / attack;
        (ratio * ratio.sqrt(), 1.0)
    } else if defense > attack {
        let ratio = attack / defense;
        (1.0, ratio * ratio.sqrt())
    } else {
        (1.0, 1.0)
    }
}

fn offense_by_class(units: &UnitSet, luck: f64) -> (f64, f64) {
    let mut melee = 0.0;
    let mut ranged = 0.0;
    for (kind, amount) in units.iter() {
        if amount == 0 {
            continue;
        }
        let data = unit_data(kind);
        let power = (amount * data.attack) as f64;
        match data.class {
            UnitClass::Melee => melee += power,
            UnitClass::Ranged => ranged += power,
            UnitClass::Spy => {}
        }
    }
    (melee * (1.0 + luck), ranged * (1.0 + luck))
}

/// Computes a full engagement between two aggregated armies.
///
/// Rounds repeat until one side is empty. Each round the defenders are
/// split between the melee and ranged fronts in proportion to the incoming
/// offense, both fronts resolve independently, and integer losses are
/// rounded only at the final assignment.
pub fn simulate(attackers: &UnitSet, defenders: &UnitSet, luck: f64) -> BattleResult {
    let mut attacking = *attackers;
    let mut defending = *defenders;

    let mut attacker_has_units = !attacking.is_empty();
    let mut defender_has_units = !defending.is_empty();

    while attacker_has_units && defender_has_units {
        let (melee_attack, ranged_attack) = offense_by_class(&attacking, luck);
        let total_attack = melee_attack + ranged_attack;
        if total_attack <= 0.0 {
            attacker_has_units = false;
            break;
        }

        let melee_share = melee_attack / total_attack;
        let ranged_share = ranged_attack / total_attack;

        let mut melee_defense = 0.0;
        let mut ranged_defense = 0.0;
        for (kind, amount) in defending.iter() {
            if amount == 0 {
                continue;
            }
            let data = unit_data(kind);
            melee_defense += amount as f64 * melee_share * data.defense_melee as f64;
            ranged_defense += amount as f64 * ranged_share * data.defense_ranged as f64;
        }

        let (melee_attacker_loss, melee_defender_loss) =
            resolve_clash(melee_attack, melee_defense);
        let (ranged_attacker_loss, ranged_defender_loss) =
            resolve_clash(ranged_attack, ranged_defense);

        for kind in UnitKind::ALL {
            let amount = attacking.get(kind);
            if amount == 0 {
                continue;
            }
            let ratio = match unit_data(kind).class {
                UnitClass::Melee => melee_attacker_loss,
                UnitClass::Ranged => ranged_attacker_loss,
                UnitClass::Spy => 0.0,
            };
            let losses = (amount as f64 * ratio).round() as u32;
            attacking.set(kind, amount.saturating_sub(losses));
        }

        for kind in UnitKind::ALL {
            let amount = defending.get(kind);
            if amount == 0 {
                continue;
            }
            let melee_losses = amount as f64 * melee_share * melee_defender_loss;
            let ranged_losses = amount as f64 * ranged_share * ranged_defender_loss;
            let losses = ((melee_losses + ranged_losses).min(amount as f64)).round() as u32;
            defending.set(kind, amount.saturating_sub(losses));
        }

        attacker_has_units = !attacking.is_empty();
        defender_has_units = !defending.is_empty();
    }

    BattleResult {
        attacker_won: attacker_has_units && !defender_has_units,
        attacking_units: attacking,
        attacking_units_lost: attackers.saturating_sub(&attacking),
        defending_units: defending,
        defending_units_lost: defenders.saturating_sub(&defending),
        luck,
    }
}

/// Loyalty lost to a successful noble-bearing attack, scaled by luck into
/// the 20..=35 range.
pub fn loyalty_damage(luck: f64) -> u32 {
    BASE_LOYALTY_DAMAGE + ((luck - LUCK_MIN) * 2.0 * 15.0).round() as u32
}

/// Per-kind loss ratios of an aggregate, for distributing losses over the
/// participating movements.
pub fn loss_ratios(total: &UnitSet, lost: &UnitSet) -> [f64; UnitKind::ALL.len()] {
    let mut ratios = [0.0; UnitKind::ALL.len()];
    for (idx, kind) in UnitKind::ALL.into_iter().enumerate() {
        let amount = total.get(kind);
        if amount > 0 {
            ratios[idx] = lost.get(kind) as f64 / amount as f64;
        }
    }
    ratios
}

/// Losses a single participant takes given the aggregate loss ratios.
pub fn scale_losses(units: &UnitSet, ratios: &[f64; UnitKind::ALL.len()]) -> UnitSet {
    let mut lost = UnitSet::default();
    for (idx, kind) in UnitKind::ALL.into_iter().enumerate() {
        lost.set(kind, (units.get(kind) as f64 * ratios[idx]).round() as u32);
    }
    lost
}
