//! Authorization of writes.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::ActiveModelTrait;
use tracing::error;

use common::{AppError, AppResult};
use domain::{Policy, RequestContext, Subject};

use super::capability::Guarded;
use super::mutation::{ModelOf, Mutation, MutationOutcome, Mutator};
use super::pipeline::Hook;

/// Evaluate `policy` for the mutation's action before forwarding.
///
/// Single-row writes are judged against the row's tenant; bulk writes
/// against the tenant the request is scoped to.
pub fn policy_hook<A>(policy: Policy) -> Hook<A>
where
    A: ActiveModelTrait + Guarded + Send + 'static,
{
    Box::new(move |next: Arc<dyn Mutator<A>>| -> Arc<dyn Mutator<A>> {
        Arc::new(PolicyHook {
            policy: policy.clone(),
            next,
        })
    })
}

struct PolicyHook<A>
where
    A: ActiveModelTrait + Send + 'static,
{
    policy: Policy,
    next: Arc<dyn Mutator<A>>,
}

#[async_trait]
impl<A> Mutator<A> for PolicyHook<A>
where
    A: ActiveModelTrait + Guarded + Send + 'static,
{
    async fn mutate(
        &self,
        ctx: &RequestContext,
        mutation: Mutation<A>,
    ) -> AppResult<MutationOutcome<ModelOf<A>>> {
        let op = mutation.op();
        let tenant_id = if op.is_bulk() {
            ctx.tenant_id()
        } else {
            mutation.model().owning_tenant().or(ctx.tenant_id())
        };
        let subject = Subject::new(A::RESOURCE, tenant_id);

        if let Err(e) = self.policy.authorize(ctx.actor(), op.action(), &subject) {
            error!(
                entity = %mutation.entity(),
                op = ?op,
                tenant_id = ?tenant_id,
                "Mutation denied by policy"
            );
            return Err(AppError::from(e));
        }

        self.next.mutate(ctx, mutation).await
    }
}
