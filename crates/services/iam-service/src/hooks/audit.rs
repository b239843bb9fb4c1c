//! Creator bookkeeping.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::ActiveModelTrait;

use common::AppResult;
use domain::RequestContext;

use super::capability::Audited;
use super::mutation::{ModelOf, Mutation, MutationOp, MutationOutcome, Mutator};
use super::pipeline::Hook;

/// On create, record the acting user as creator and owner.
///
/// Timestamps are handled by each entity's `before_save`.
pub fn audit_hook<A>() -> Hook<A>
where
    A: ActiveModelTrait + Audited + Send + 'static,
{
    Box::new(|next: Arc<dyn Mutator<A>>| -> Arc<dyn Mutator<A>> {
        Arc::new(AuditHook { next })
    })
}

struct AuditHook<A>
where
    A: ActiveModelTrait + Send + 'static,
{
    next: Arc<dyn Mutator<A>>,
}

#[async_trait]
impl<A> Mutator<A> for AuditHook<A>
where
    A: ActiveModelTrait + Audited + Send + 'static,
{
    async fn mutate(
        &self,
        ctx: &RequestContext,
        mut mutation: Mutation<A>,
    ) -> AppResult<MutationOutcome<ModelOf<A>>> {
        if mutation.op() == MutationOp::Create {
            if let Some(user_id) = ctx.actor().user_id() {
                mutation.model_mut().stamp_creator(user_id);
            }
        }

        self.next.mutate(ctx, mutation).await
    }
}
