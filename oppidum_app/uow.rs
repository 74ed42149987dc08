use std::sync::Arc;

use oppidum_types::errors::ApplicationError;

use crate::repository::*;

/// One transaction's worth of repository access.
///
/// Every repository handed out by the same instance shares the underlying
/// transaction, so a handler's reads, the village row lock, and all queue
/// writes stay atomic. `commit` and `rollback` take `self` by value: once
/// a transaction is finished it cannot be used again.
#[async_trait::async_trait]
pub trait UnitOfWork<'a>: Send + Sync {
    fn villages(&self) -> Arc<dyn VillageRepository + 'a>;
    fn building_events(&self) -> Arc<dyn BuildingEventRepository + 'a>;
    fn training_events(&self) -> Arc<dyn TrainingEventRepository + 'a>;
    fn movements(&self) -> Arc<dyn MovementRepository + 'a>;
    fn messages(&self) -> Arc<dyn MessageRepository + 'a>;

    async fn commit(self: Box<Self>) -> Result<(), ApplicationError>;
    async fn rollback(self: Box<Self>) -> Result<(), ApplicationError>;
}

/// Opens fresh units of work: one per dispatched command or query, and one
/// per target village inside a combat tick.
#[async_trait::async_trait]
pub trait UnitOfWorkProvider: Send + Sync {
    async fn tx<'p>(&'p self) -> Result<Box<dyn UnitOfWork<'p> + 'p>, ApplicationError>;
}
