use async_trait::async_trait;
use std::sync::Arc;

use oppidum_types::errors::ApplicationError;

use crate::{config::Config, uow::UnitOfWork};

/// Marks a type as a state-changing request that the
/// [`AppBus`](crate::app::AppBus) can dispatch.
pub trait Command: Send + Sync {}

/// Executes one kind of [`Command`] against the repositories of an
/// already-open unit of work.
///
/// A handler only reads and writes through `uow`; whether that work ends
/// up committed is decided by whoever opened the transaction. Returning an
/// `Err` aborts the whole operation, so partial mutations never survive.
#[async_trait]
pub trait CommandHandler<C: Command> {
    async fn handle(
        &self,
        cmd: C,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        config: &Arc<Config>,
    ) -> Result<(), ApplicationError>;
}
