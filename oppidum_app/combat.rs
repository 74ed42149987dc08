use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use tracing::{info, instrument};
use uuid::Uuid;

use oppidum_game::combat::{
    LUCK_MAX, LUCK_MIN, Luck, loss_ratios, loyalty_damage, scale_losses, simulate,
};
use oppidum_game::catalog::units::loot_capacity;
use oppidum_game::engine::{VillageEngine, send_back};
use oppidum_game::models::movement::UnitMovement;
use oppidum_game::models::village::Village;
use oppidum_types::battle::MovementKind;
use oppidum_types::common::ResourceGroup;
use oppidum_types::errors::ApplicationError;
use oppidum_types::reports::{BattleParticipationPayload, BattleReportPayload, ReportPayload};
use oppidum_types::units::UnitSet;

use crate::config::Config;
use crate::repository::NewBattleMessage;
use crate::uow::UnitOfWork;

const MAX_PLUNDER_SHARE: f64 = 0.8;

/// Resolves every village with ripened attacks inside the given unit of
/// work. Returns how many targets saw an engagement.
pub async fn resolve_ready_targets(
    uow: &Box<dyn UnitOfWork<'_> + '_>,
    config: &Config,
    now: DateTime<Utc>,
    luck: &dyn Luck,
) -> Result<u32, ApplicationError> {
    let targets = uow.movements().list_ripe_attack_targets(now).await?;

    let mut processed = 0;
    for village_id in targets {
        if resolve_target(uow, village_id, config, now, luck).await? {
            processed += 1;
        }
    }

    Ok(processed)
}

/// Resolves a single engagement at the target village: all ripe attackers
/// against the garrison plus all ripe supporters.
#[instrument(skip_all, fields(target_village_id = village_id))]
pub async fn resolve_target(
    uow: &Box<dyn UnitOfWork<'_> + '_>,
    village_id: u32,
    config: &Config,
    now: DateTime<Utc>,
    luck: &dyn Luck,
) -> Result<bool, ApplicationError> {
    let villages = uow.villages();
    let movements = uow.movements();
    let messages = uow.messages();

    let village = villages.get_by_id_for_update(village_id).await?;
    let mut engine = VillageEngine::new(
        village,
        uow.building_events().list_open(village_id).await?,
        uow.training_events().list_open(village_id).await?,
        movements.list_returning(village_id, now).await?,
    );
    engine.advance_to(now, config.game_speed)?;
    // Flush the advance so landed return legs no longer count as away.
    crate::command_handlers::persist_engine(uow, &engine).await?;

    let mut attackers = movements
        .list_ripe(village_id, MovementKind::Attack, now)
        .await?;
    if attackers.is_empty() {
        return Ok(false);
    }
    attackers.sort_by_key(|movement| movement.created_at);

    let mut supporters = movements
        .list_ripe(village_id, MovementKind::Support, now)
        .await?;
    supporters.sort_by_key(|movement| movement.created_at);

    let outbound = movements.list_open_by_origin(village_id).await?;
    let garrison_available = engine.available_units(&outbound);

    let total_attacking = sum_movement_units(&attackers);
    let total_supporting = sum_movement_units(&supporters);
    let total_defending = garrison_available + total_supporting;

    let luck_value = luck.draw(LUCK_MIN, LUCK_MAX);
    let result = simulate(&total_attacking, &total_defending, luck_value);

    info!(
        attacker_won = result.attacker_won,
        luck = luck_value,
        attackers = attackers.len(),
        supporters = supporters.len(),
        "Engagement resolved."
    );

    // Origin villages of every participant, locked in ascending id order so
    // concurrent resolvers cannot deadlock on each other.
    let origin_ids: BTreeSet<u32> = attackers
        .iter()
        .chain(supporters.iter())
        .map(|movement| movement.village_id)
        .collect();
    let mut origins: BTreeMap<u32, Village> = BTreeMap::new();
    for origin_id in origin_ids {
        let origin = villages.get_by_id_for_update(origin_id).await?;
        origins.insert(origin_id, origin);
    }

    let loyalty_before = engine.village.loyalty;
    let defender_player_id = engine.village.player_id;

    // Loot comes off the stocks before anything else is applied.
    let mut bounty = ResourceGroup::default();
    let mut total_loot_capacity = 0;
    if result.attacker_won {
        total_loot_capacity = loot_capacity(&result.attacking_units);
        bounty = plunderable(&engine.village.stocks(), total_loot_capacity);
        engine.village.plunder_resources(&bounty);
    }

    let attacker_ratios = loss_ratios(&total_attacking, &result.attacking_units_lost);

    // Loyalty and conquest, when at least one nobleman survived.
    let mut damage = 0u32;
    let mut conquering_movement_id: Option<Uuid> = None;
    if result.attacker_won && result.attacking_units.nobleman > 0 {
        damage = loyalty_damage(luck_value);
        engine.village.loyalty = (engine.village.loyalty - damage as f64).max(0.0);

        if engine.village.loyalty == 0.0 {
            for movement in &attackers {
                if movement.units.nobleman == 0 {
                    continue;
                }
                let lost = scale_losses(&movement.units, &attacker_ratios);
                if movement.units.nobleman > lost.nobleman {
                    conquering_movement_id = Some(movement.id);
                    break;
                }
            }

            if let Some(movement_id) = conquering_movement_id {
                let conqueror = attackers
                    .iter()
                    .find(|movement| movement.id == movement_id)
                    .expect("selected above");
                let new_owner = origins[&conqueror.village_id].player_id;
                engine.village.player_id = new_owner;
                engine.village.loyalty = 100.0;
                info!(new_owner = ?new_owner, "Village conquered.");
            }
        }
    }

    let global_report = BattleReportPayload {
        attacker_won: result.attacker_won,
        attacking_units: result.attacking_units,
        attacking_units_lost: result.attacking_units_lost,
        defending_units: result.defending_units,
        defending_units_lost: result.defending_units_lost,
        luck: luck_value,
        loyalty_before,
        loyalty_damage: damage,
        conquered: conquering_movement_id.is_some(),
        loot_capacity: total_loot_capacity,
        bounty,
        defender_village_id: village_id,
        own: None,
    };

    // Attacking movements: losses, loot shares, return legs, reports.
    for movement in &mut attackers {
        let origin = origins.get_mut(&movement.village_id).expect("locked above");

        let (survivors, lost, own_capacity, own_bounty) = if result.attacker_won {
            let lost = scale_losses(&movement.units, &attacker_ratios);
            let survivors = movement.units.saturating_sub(&lost);
            let own_capacity = loot_capacity(&survivors);
            let share = if total_loot_capacity > 0 {
                own_capacity as f64 / total_loot_capacity as f64
            } else {
                0.0
            };
            let own_bounty = ResourceGroup::new(
                (bounty.wood() as f64 * share).round() as u32,
                (bounty.clay() as f64 * share).round() as u32,
                (bounty.iron() as f64 * share).round() as u32,
            );

            movement.units = survivors;
            movement.return_resources = own_bounty;
            if survivors.is_empty() {
                movement.completed = true;
            } else {
                send_back(
                    movement,
                    origin.position,
                    engine.village.position,
                    now,
                    config.game_speed,
                )?;
            }

            (survivors, lost, own_capacity, own_bounty)
        } else {
            let lost = movement.units;
            movement.units = UnitSet::default();
            movement.completed = true;
            (UnitSet::default(), lost, 0, ResourceGroup::default())
        };

        origin.apply_unit_losses(&lost);
        movements.save(movement).await?;

        if let Some(player_id) = origin.player_id {
            let conquering = conquering_movement_id == Some(movement.id);
            let message = if conquering {
                format!("CONQUEST: You have conquered {}!", engine.village.name)
            } else {
                format!("Battle Report: Attack on {}", engine.village.name)
            };
            let mut payload = global_report.clone();
            payload.own = Some(BattleParticipationPayload {
                village_id: movement.village_id,
                units: survivors,
                units_lost: lost,
                loot_capacity: own_capacity,
                bounty: own_bounty,
                conquering,
            });
            messages
                .add(&NewBattleMessage {
                    to_player_id: player_id,
                    message,
                    payload: ReportPayload::Battle(payload),
                })
                .await?;
        }
    }

    // Defender side: garrison and supporters bleed proportionally.
    let defender_ratios = loss_ratios(&total_defending, &result.defending_units_lost);
    let garrison_lost = scale_losses(&garrison_available, &defender_ratios);
    engine.village.apply_unit_losses(&garrison_lost);

    for movement in &mut supporters {
        let lost = scale_losses(&movement.units, &defender_ratios);
        movement.units = movement.units.saturating_sub(&lost);
        if movement.units.is_empty() {
            movement.completed = true;
        }

        let origin = origins.get_mut(&movement.village_id).expect("locked above");
        origin.apply_unit_losses(&lost);
        movements.save(movement).await?;

        if let Some(player_id) = origin.player_id {
            let mut payload = global_report.clone();
            payload.own = Some(BattleParticipationPayload {
                village_id: movement.village_id,
                units: movement.units,
                units_lost: lost,
                loot_capacity: 0,
                bounty: ResourceGroup::default(),
                conquering: false,
            });
            messages
                .add(&NewBattleMessage {
                    to_player_id: player_id,
                    message: format!(
                        "Battle Report: Your supporting units in {}",
                        engine.village.name
                    ),
                    payload: ReportPayload::Battle(payload),
                })
                .await?;
        }
    }

    // Defender report goes to the owner the village had when the attack
    // landed; a barbarian target reports to no one.
    if let Some(player_id) = defender_player_id {
        let message = if conquering_movement_id.is_some() {
            format!("Your village {} was conquered!", engine.village.name)
        } else if result.attacker_won {
            format!("Battle Report: {} was raided", engine.village.name)
        } else {
            "Your village was successfully defended".to_string()
        };
        messages
            .add(&NewBattleMessage {
                to_player_id: player_id,
                message,
                payload: ReportPayload::Battle(global_report.clone()),
            })
            .await?;
    }

    for origin in origins.values() {
        villages.save(origin).await?;
    }
    crate::command_handlers::persist_engine(uow, &engine).await?;

    Ok(true)
}

fn sum_movement_units(movements: &[UnitMovement]) -> UnitSet {
    movements
        .iter()
        .fold(UnitSet::default(), |acc, movement| acc + movement.units)
}

/// Up to 80% of each stock, bounded by an equal third of the survivors'
/// carrying capacity.
fn plunderable(stocks: &ResourceGroup, capacity: u64) -> ResourceGroup {
    let per_resource = (capacity / 3) as f64;
    let take = |stock: u32| (stock as f64 * MAX_PLUNDER_SHARE).min(per_resource) as u32;
    ResourceGroup::new(take(stocks.wood()), take(stocks.clay()), take(stocks.iron()))
}
