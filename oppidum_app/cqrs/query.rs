use async_trait::async_trait;
use std::sync::Arc;

use oppidum_types::errors::ApplicationError;

use crate::{config::Config, uow::UnitOfWork};

/// Marks a read-only request with a typed answer.
pub trait Query: Send + Sync {
    /// What a handler produces for this query.
    type Output: Send + Sync;
}

/// Executes one kind of [`Query`] against an already-open unit of work.
///
/// Query handlers may lazily advance a village in memory to answer with
/// current numbers, but the transaction they run in is thrown away, so
/// nothing they touch becomes durable.
#[async_trait]
pub trait QueryHandler<Q: Query> {
    async fn handle(
        &self,
        query: Q,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        config: &Arc<Config>,
    ) -> Result<Q::Output, ApplicationError>;
}
