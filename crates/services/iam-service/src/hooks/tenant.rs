//! Tenant injection and code generation.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::ActiveModelTrait;
use tracing::{debug, error, warn};

use common::{AppError, AppResult};
use domain::{generate_code, RequestContext};

use super::capability::TenantScoped;
use super::mutation::{ModelOf, Mutation, MutationOp, MutationOutcome, Mutator};
use super::pipeline::Hook;

/// Hook for tenant-scoped entities.
///
/// On create it fills in the tenant from the request context when the
/// mutation names none, then derives the code from the pending name.
/// Updates never carry a code through, and deletes pass untouched.
pub fn tenant_hook<A>() -> Hook<A>
where
    A: ActiveModelTrait + TenantScoped + Send + 'static,
{
    Box::new(|next: Arc<dyn Mutator<A>>| -> Arc<dyn Mutator<A>> {
        Arc::new(TenantHook { next })
    })
}

struct TenantHook<A>
where
    A: ActiveModelTrait + Send + 'static,
{
    next: Arc<dyn Mutator<A>>,
}

impl<A> TenantHook<A>
where
    A: ActiveModelTrait + TenantScoped + Send + 'static,
{
    fn prepare_create(ctx: &RequestContext, model: &mut A) -> AppResult<()> {
        // A non-positive explicit tenant is treated like a missing one.
        let explicit = model.tenant_id();
        if !explicit.is_some_and(|id| id > 0) {
            match ctx.tenant_id() {
                Some(tenant_id) => model.set_tenant_id(tenant_id),
                None if explicit.is_some() && model.code_source().is_some() => {
                    return Err(AppError::MissingTenantForCodeGeneration);
                }
                None => return Err(AppError::MissingTenantContext),
            }
        }

        if let Some(name) = model.code_source() {
            let tenant_id = model
                .tenant_id()
                .filter(|id| *id > 0)
                .ok_or(AppError::MissingTenantForCodeGeneration)?;
            let code = generate_code(tenant_id, name);
            model.set_code(code);
        }

        Ok(())
    }
}

#[async_trait]
impl<A> Mutator<A> for TenantHook<A>
where
    A: ActiveModelTrait + TenantScoped + Send + 'static,
{
    async fn mutate(
        &self,
        ctx: &RequestContext,
        mut mutation: Mutation<A>,
    ) -> AppResult<MutationOutcome<ModelOf<A>>> {
        let entity = mutation.entity();

        match mutation.op() {
            MutationOp::Create => {
                if let Err(e) = Self::prepare_create(ctx, mutation.model_mut()) {
                    error!(entity = %entity, error = %e, "Rejected create mutation");
                    return Err(e);
                }
            }
            op @ (MutationOp::UpdateOne | MutationOp::Update) => {
                if let Some(code) = mutation.model_mut().take_pending_code() {
                    warn!(entity = %entity, op = ?op, code = %code, "Ignoring code change; codes are immutable");
                }
            }
            op @ (MutationOp::DeleteOne | MutationOp::Delete) => {
                debug!(entity = %entity, op = ?op, "Forwarding delete");
            }
        }

        self.next.mutate(ctx, mutation).await
    }
}
