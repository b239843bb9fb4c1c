//! Terminal stage: performs the write with SeaORM.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    QueryFilter,
};

use common::AppResult;
use domain::RequestContext;

use super::mutation::{ModelOf, Mutation, MutationOp, MutationOutcome, Mutator};

/// Executes mutations against the database.
#[derive(Clone)]
pub struct Persist {
    db: DatabaseConnection,
}

impl Persist {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl<A> Mutator<A> for Persist
where
    A: ActiveModelTrait + ActiveModelBehavior + Send + 'static,
    ModelOf<A>: IntoActiveModel<A>,
{
    async fn mutate(
        &self,
        _ctx: &RequestContext,
        mutation: Mutation<A>,
    ) -> AppResult<MutationOutcome<ModelOf<A>>> {
        let (op, model, filter) = mutation.into_parts();

        let outcome = match op {
            MutationOp::Create => MutationOutcome::Saved(model.insert(&self.db).await?),
            MutationOp::UpdateOne => MutationOutcome::Saved(model.update(&self.db).await?),
            MutationOp::Update => {
                let result = A::Entity::update_many()
                    .set(model)
                    .filter(filter)
                    .exec(&self.db)
                    .await?;
                MutationOutcome::Affected(result.rows_affected)
            }
            MutationOp::DeleteOne => {
                let result = model.delete(&self.db).await?;
                MutationOutcome::Affected(result.rows_affected)
            }
            MutationOp::Delete => {
                let result = A::Entity::delete_many()
                    .filter(filter)
                    .exec(&self.db)
                    .await?;
                MutationOutcome::Affected(result.rows_affected)
            }
        };

        Ok(outcome)
    }
}
