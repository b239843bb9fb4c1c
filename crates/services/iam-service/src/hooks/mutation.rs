//! Mutation values and the `Mutator` stage contract.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, Condition, EntityName, EntityTrait};

use common::{AppError, AppResult};
use domain::{Action, RequestContext};

/// Model type produced by persisting an `ActiveModel`.
pub type ModelOf<A> = <<A as ActiveModelTrait>::Entity as EntityTrait>::Model;

/// Kind of write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOp {
    Create,
    UpdateOne,
    /// Bulk update of every row matching the filter
    Update,
    DeleteOne,
    /// Bulk delete of every row matching the filter
    Delete,
}

impl MutationOp {
    /// Authorization action this write requires
    pub fn action(&self) -> Action {
        match self {
            MutationOp::Create => Action::Create,
            MutationOp::UpdateOne | MutationOp::Update => Action::Update,
            MutationOp::DeleteOne | MutationOp::Delete => Action::Delete,
        }
    }

    pub fn is_bulk(&self) -> bool {
        matches!(self, MutationOp::Update | MutationOp::Delete)
    }

    pub fn is_update(&self) -> bool {
        matches!(self, MutationOp::UpdateOne | MutationOp::Update)
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, MutationOp::DeleteOne | MutationOp::Delete)
    }
}

/// A pending write.
///
/// `model` holds the pending field values: a field is part of the mutation
/// when it is `ActiveValue::Set`. Bulk operations target the rows matched by
/// `filter`; single-row operations target the primary key in `model`.
#[derive(Debug, Clone)]
pub struct Mutation<A> {
    op: MutationOp,
    model: A,
    filter: Condition,
}

impl<A> Mutation<A>
where
    A: ActiveModelTrait,
{
    pub fn create(model: A) -> Self {
        Self::with(MutationOp::Create, model, Condition::all())
    }

    pub fn update_one(model: A) -> Self {
        Self::with(MutationOp::UpdateOne, model, Condition::all())
    }

    /// Apply the `Set` fields of `model` to every row matching `filter`
    pub fn update_many(model: A, filter: Condition) -> Self {
        Self::with(MutationOp::Update, model, filter)
    }

    pub fn delete_one(model: A) -> Self {
        Self::with(MutationOp::DeleteOne, model, Condition::all())
    }

    pub fn delete_many(filter: Condition) -> Self {
        Self::with(
            MutationOp::Delete,
            <A as ActiveModelTrait>::default(),
            filter,
        )
    }

    fn with(op: MutationOp, model: A, filter: Condition) -> Self {
        Self { op, model, filter }
    }

    pub fn op(&self) -> MutationOp {
        self.op
    }

    pub fn model(&self) -> &A {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut A {
        &mut self.model
    }

    pub fn filter(&self) -> &Condition {
        &self.filter
    }

    pub fn into_parts(self) -> (MutationOp, A, Condition) {
        (self.op, self.model, self.filter)
    }

    /// Table name, for logging
    pub fn entity(&self) -> String {
        A::Entity::default().table_name().to_string()
    }
}

/// Result of a write.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome<M> {
    /// Single-row create or update
    Saved(M),
    /// Number of rows touched by a delete or a bulk update
    Affected(u64),
}

impl<M> MutationOutcome<M> {
    /// The saved row; errors for outcomes that carry no row
    pub fn into_model(self) -> AppResult<M> {
        match self {
            MutationOutcome::Saved(model) => Ok(model),
            MutationOutcome::Affected(_) => {
                Err(AppError::internal("mutation did not return a row"))
            }
        }
    }

    pub fn rows_affected(&self) -> u64 {
        match self {
            MutationOutcome::Saved(_) => 1,
            MutationOutcome::Affected(rows) => *rows,
        }
    }
}

/// One stage of the mutation chain.
///
/// Hooks wrap a `next` mutator and decide whether and how to forward; the
/// innermost stage persists.
#[async_trait]
pub trait Mutator<A>: Send + Sync
where
    A: ActiveModelTrait + Send + 'static,
{
    async fn mutate(
        &self,
        ctx: &RequestContext,
        mutation: Mutation<A>,
    ) -> AppResult<MutationOutcome<ModelOf<A>>>;
}
