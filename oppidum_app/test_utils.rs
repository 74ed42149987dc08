use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use uuid::Uuid;

use oppidum_game::models::events::{BuildingEvent, UnitTrainingEvent};
use oppidum_game::models::movement::UnitMovement;
use oppidum_game::models::village::Village;
use oppidum_types::battle::MovementKind;
use oppidum_types::errors::{ApplicationError, DbError};

use crate::clock::Clock;
use crate::repository::{
    BuildingEventRepository, MessageRepository, MovementRepository, NewBattleMessage,
    TrainingEventRepository, VillageRepository,
};
use crate::uow::{UnitOfWork, UnitOfWorkProvider};

/// A clock frozen at a fixed instant.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Default, Clone)]
pub struct MockVillageRepository {
    villages: Arc<Mutex<HashMap<u32, Village>>>,
}

#[async_trait]
impl VillageRepository for MockVillageRepository {
    async fn get_by_id(&self, village_id: u32) -> Result<Village, ApplicationError> {
        let villages = self.villages.lock().unwrap();
        villages
            .get(&village_id)
            .cloned()
            .ok_or(ApplicationError::Db(DbError::VillageNotFound(village_id)))
    }

    async fn get_by_id_for_update(&self, village_id: u32) -> Result<Village, ApplicationError> {
        self.get_by_id(village_id).await
    }

    async fn save(&self, village: &Village) -> Result<(), ApplicationError> {
        self.villages
            .lock()
            .unwrap()
            .insert(village.id, village.clone());
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct MockBuildingEventRepository {
    events: Arc<Mutex<HashMap<Uuid, BuildingEvent>>>,
}

#[async_trait]
impl BuildingEventRepository for MockBuildingEventRepository {
    async fn list_open(&self, village_id: u32) -> Result<Vec<BuildingEvent>, ApplicationError> {
        let events = self.events.lock().unwrap();
        let mut open: Vec<BuildingEvent> = events
            .values()
            .filter(|event| event.village_id == village_id && !event.completed)
            .cloned()
            .collect();
        open.sort_by_key(|event| event.created_at);
        Ok(open)
    }

    async fn save(&self, event: &BuildingEvent) -> Result<(), ApplicationError> {
        self.events.lock().unwrap().insert(event.id, event.clone());
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct MockTrainingEventRepository {
    events: Arc<Mutex<HashMap<Uuid, UnitTrainingEvent>>>,
}

#[async_trait]
impl TrainingEventRepository for MockTrainingEventRepository {
    async fn list_open(
        &self,
        village_id: u32,
    ) -> Result<Vec<UnitTrainingEvent>, ApplicationError> {
        let events = self.events.lock().unwrap();
        let mut open: Vec<UnitTrainingEvent> = events
            .values()
            .filter(|event| event.village_id == village_id && !event.completed)
            .cloned()
            .collect();
        open.sort_by_key(|event| event.created_at);
        Ok(open)
    }

    async fn save(&self, event: &UnitTrainingEvent) -> Result<(), ApplicationError> {
        self.events.lock().unwrap().insert(event.id, event.clone());
        Ok(())
    }

    async fn delete(&self, event_id: Uuid) -> Result<(), ApplicationError> {
        self.events.lock().unwrap().remove(&event_id);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct MockMovementRepository {
    movements: Arc<Mutex<HashMap<Uuid, UnitMovement>>>,
}

#[async_trait]
impl MovementRepository for MockMovementRepository {
    async fn get_by_id(&self, movement_id: Uuid) -> Result<UnitMovement, ApplicationError> {
        let movements = self.movements.lock().unwrap();
        movements
            .get(&movement_id)
            .cloned()
            .ok_or(ApplicationError::Db(DbError::MovementNotFound(movement_id)))
    }

    async fn save(&self, movement: &UnitMovement) -> Result<(), ApplicationError> {
        self.movements
            .lock()
            .unwrap()
            .insert(movement.id, movement.clone());
        Ok(())
    }

    async fn list_open_by_origin(
        &self,
        village_id: u32,
    ) -> Result<Vec<UnitMovement>, ApplicationError> {
        let movements = self.movements.lock().unwrap();
        let mut open: Vec<UnitMovement> = movements
            .values()
            .filter(|movement| movement.village_id == village_id && !movement.completed)
            .cloned()
            .collect();
        open.sort_by_key(|movement| movement.created_at);
        Ok(open)
    }

    async fn list_returning(
        &self,
        village_id: u32,
        upto: DateTime<Utc>,
    ) -> Result<Vec<UnitMovement>, ApplicationError> {
        let movements = self.movements.lock().unwrap();
        let mut due: Vec<UnitMovement> = movements
            .values()
            .filter(|movement| {
                movement.village_id == village_id
                    && !movement.completed
                    && movement.return_at.is_some_and(|at| at <= upto)
            })
            .cloned()
            .collect();
        due.sort_by_key(|movement| movement.return_at);
        Ok(due)
    }

    async fn list_ripe(
        &self,
        target_village_id: u32,
        kind: MovementKind,
        now: DateTime<Utc>,
    ) -> Result<Vec<UnitMovement>, ApplicationError> {
        let movements = self.movements.lock().unwrap();
        let mut ripe: Vec<UnitMovement> = movements
            .values()
            .filter(|movement| {
                movement.target_village_id == target_village_id
                    && movement.kind == kind
                    && movement.is_ripe(now)
            })
            .cloned()
            .collect();
        ripe.sort_by_key(|movement| movement.created_at);
        Ok(ripe)
    }

    async fn list_ripe_attack_targets(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<u32>, ApplicationError> {
        let movements = self.movements.lock().unwrap();
        let mut targets: Vec<u32> = movements
            .values()
            .filter(|movement| movement.kind == MovementKind::Attack && movement.is_ripe(now))
            .map(|movement| movement.target_village_id)
            .collect();
        targets.sort_unstable();
        targets.dedup();
        Ok(targets)
    }
}

#[derive(Default, Clone)]
pub struct MockMessageRepository {
    messages: Arc<Mutex<Vec<NewBattleMessage>>>,
}

impl MockMessageRepository {
    pub fn sent(&self) -> Vec<NewBattleMessage> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageRepository for MockMessageRepository {
    async fn add(&self, message: &NewBattleMessage) -> Result<(), ApplicationError> {
        self.messages.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// An in-memory unit of work. Clones share the same stores, which stands
/// in for "the same database" across transactions.
#[derive(Clone)]
pub struct MockUnitOfWork {
    villages: Arc<MockVillageRepository>,
    building_events: Arc<MockBuildingEventRepository>,
    training_events: Arc<MockTrainingEventRepository>,
    movements: Arc<MockMovementRepository>,
    messages: Arc<MockMessageRepository>,

    committed: Arc<Mutex<bool>>,
    rolled_back: Arc<Mutex<bool>>,
}

impl MockUnitOfWork {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn message_repo(&self) -> Arc<MockMessageRepository> {
        self.messages.clone()
    }
}

impl Default for MockUnitOfWork {
    fn default() -> Self {
        Self {
            villages: Arc::new(MockVillageRepository::default()),
            building_events: Arc::new(MockBuildingEventRepository::default()),
            training_events: Arc::new(MockTrainingEventRepository::default()),
            movements: Arc::new(MockMovementRepository::default()),
            messages: Arc::new(MockMessageRepository::default()),
            committed: Arc::new(Mutex::new(false)),
            rolled_back: Arc::new(Mutex::new(false)),
        }
    }
}

#[async_trait]
impl<'a> UnitOfWork<'a> for MockUnitOfWork {
    fn villages(&self) -> Arc<dyn VillageRepository + 'a> {
        self.villages.clone()
    }

    fn building_events(&self) -> Arc<dyn BuildingEventRepository + 'a> {
        self.building_events.clone()
    }

    fn training_events(&self) -> Arc<dyn TrainingEventRepository + 'a> {
        self.training_events.clone()
    }

    fn movements(&self) -> Arc<dyn MovementRepository + 'a> {
        self.movements.clone()
    }

    fn messages(&self) -> Arc<dyn MessageRepository + 'a> {
        self.messages.clone()
    }

    async fn commit(self: Box<Self>) -> Result<(), ApplicationError> {
        *self.committed.lock().unwrap() = true;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), ApplicationError> {
        *self.rolled_back.lock().unwrap() = true;
        Ok(())
    }
}

/// Hands out clones of one shared mock, so sequential "transactions" see
/// each other's writes.
pub struct MockUnitOfWorkProvider {
    uow: MockUnitOfWork,
}

impl MockUnitOfWorkProvider {
    pub fn new(uow: MockUnitOfWork) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl UnitOfWorkProvider for MockUnitOfWorkProvider {
    async fn tx<'p>(&'p self) -> Result<Box<dyn UnitOfWork<'p> + 'p>, ApplicationError> {
        Ok(Box::new(self.uow.clone()))
    }
}
