//! Mutation hook pipeline.
//!
//! Every write to an entity travels as a [`Mutation`] through an ordered
//! chain of hooks before reaching [`Persist`], the stage that talks to the
//! database. A hook may inspect or modify the pending values, and may stop
//! the chain by returning an error, in which case nothing is written.
//!
//! Hooks are generic over small capability traits ([`TenantScoped`],
//! [`Audited`], [`Guarded`]) implemented by each entity's `ActiveModel`, so a
//! single hook body serves every entity.

mod audit;
mod capability;
mod mutation;
mod persist;
mod pipeline;
mod policy;
mod tenant;

pub use audit::audit_hook;
pub use capability::{Audited, Guarded, TenantScoped};
pub(crate) use capability::{current, pending, set_if_unset, take_pending};
pub use mutation::{ModelOf, Mutation, MutationOp, MutationOutcome, Mutator};
pub use persist::Persist;
pub use pipeline::{Hook, Pipeline};
pub use policy::policy_hook;
pub use tenant::tenant_hook;

use sea_orm::ActiveModelTrait;

/// Hooks for entities owned by a tenant: tenant injection, then policy,
/// then creator stamping.
pub fn tenant_scoped_hooks<A>() -> Vec<Hook<A>>
where
    A: ActiveModelTrait + TenantScoped + Guarded + Audited + Send + 'static,
{
    vec![
        tenant_hook(),
        policy_hook(A::RESOURCE.policy()),
        audit_hook(),
    ]
}

/// Hooks for platform-level entities that live outside any tenant.
pub fn global_hooks<A>() -> Vec<Hook<A>>
where
    A: ActiveModelTrait + Guarded + Audited + Send + 'static,
{
    vec![policy_hook(A::RESOURCE.policy()), audit_hook()]
}
