//! Write-path tests: the hook chain in front of a spy terminal stage.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ActiveValue, ColumnTrait, Condition, Set};
use tokio_test::{assert_err, assert_ok};

use common::{AppError, AppResult};
use domain::{Principal, RequestContext, UserType};
use iam_service_lib::hooks::{
    global_hooks, tenant_scoped_hooks, ModelOf, Mutation, MutationOp, MutationOutcome, Mutator,
    Pipeline,
};
use iam_service_lib::repository::entities::{brand, role, tenant, user};

/// Terminal stage that records what reached it instead of writing.
struct Spy<A> {
    calls: Mutex<Vec<Mutation<A>>>,
}

impl<A> Spy<A> {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<Mutation<A>>
    where
        A: Clone,
    {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl<A> Mutator<A> for Spy<A>
where
    A: ActiveModelTrait + Clone + Send + 'static,
{
    async fn mutate(
        &self,
        _ctx: &RequestContext,
        mutation: Mutation<A>,
    ) -> AppResult<MutationOutcome<ModelOf<A>>> {
        self.calls.lock().unwrap().push(mutation);
        Ok(MutationOutcome::Affected(1))
    }
}

fn scoped<A>(spy: &Arc<Spy<A>>) -> Pipeline<A>
where
    A: ActiveModelTrait
        + iam_service_lib::hooks::TenantScoped
        + iam_service_lib::hooks::Guarded
        + iam_service_lib::hooks::Audited
        + Clone
        + Send
        + 'static,
{
    Pipeline::new(spy.clone(), tenant_scoped_hooks())
}

fn new_brand(name: &str) -> brand::ActiveModel {
    brand::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
}

fn admin_of(tenant_id: i64) -> RequestContext {
    RequestContext::for_principal(Principal::new(77, tenant_id, UserType::Admin))
}

#[tokio::test]
async fn create_without_any_tenant_fails_before_storage() {
    let spy = Spy::<brand::ActiveModel>::new();
    let pipeline = scoped(&spy);

    let result = pipeline
        .run(&RequestContext::system(), Mutation::create(new_brand("My Brand")))
        .await;

    assert!(matches!(result, Err(AppError::MissingTenantContext)));
    assert!(spy.calls().is_empty());
}

#[tokio::test]
async fn explicit_tenant_skips_context_and_sets_code() {
    let spy = Spy::<brand::ActiveModel>::new();
    let pipeline = scoped(&spy);

    let model = brand::ActiveModel {
        tenant_id: Set(1),
        ..new_brand("My Brand")
    };
    pipeline
        .run(&RequestContext::system_for_tenant(9), Mutation::create(model))
        .await
        .unwrap();

    let calls = spy.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].model().tenant_id, Set(1));
    assert_eq!(calls[0].model().code, Set("tenant:1:code:my_brand".to_string()));
}

#[tokio::test]
async fn tenant_is_taken_from_context_when_unset() {
    let spy = Spy::<role::ActiveModel>::new();
    let pipeline = scoped(&spy);

    let model = role::ActiveModel {
        name: Set("  Multi   Space  ".to_string()),
        ..Default::default()
    };
    pipeline
        .run(&admin_of(5), Mutation::create(model))
        .await
        .unwrap();

    let calls = spy.calls();
    assert_eq!(calls[0].model().tenant_id, Set(5));
    assert_eq!(calls[0].model().code, Set("tenant:5:code:multi_space".to_string()));
}

#[tokio::test]
async fn unresolvable_explicit_tenant_cannot_generate_code() {
    let spy = Spy::<brand::ActiveModel>::new();
    let pipeline = scoped(&spy);

    let model = brand::ActiveModel {
        tenant_id: Set(0),
        ..new_brand("My Brand")
    };
    let result = pipeline
        .run(&RequestContext::system(), Mutation::create(model))
        .await;

    assert!(matches!(result, Err(AppError::MissingTenantForCodeGeneration)));
    assert!(spy.calls().is_empty());
}

#[tokio::test]
async fn punctuation_only_name_yields_empty_suffix() {
    let spy = Spy::<brand::ActiveModel>::new();
    let pipeline = scoped(&spy);

    pipeline
        .run(
            &RequestContext::system_for_tenant(3),
            Mutation::create(new_brand("!!!")),
        )
        .await
        .unwrap();

    assert_eq!(spy.calls()[0].model().code, Set("tenant:3:code:".to_string()));
}

#[tokio::test]
async fn entity_without_code_only_gets_tenant() {
    let spy = Spy::<user::ActiveModel>::new();
    let pipeline = scoped(&spy);

    let model = user::ActiveModel {
        email: Set("jane@example.com".to_string()),
        name: Set("Jane".to_string()),
        ..Default::default()
    };
    pipeline
        .run(&admin_of(4), Mutation::create(model))
        .await
        .unwrap();

    assert_eq!(spy.calls()[0].model().tenant_id, Set(4));
}

#[tokio::test]
async fn non_positive_explicit_tenant_falls_back_to_context() {
    let spy = Spy::<user::ActiveModel>::new();
    let pipeline = scoped(&spy);

    let model = user::ActiveModel {
        tenant_id: Set(0),
        email: Set("jane@example.com".to_string()),
        ..Default::default()
    };
    pipeline
        .run(&admin_of(4), Mutation::create(model))
        .await
        .unwrap();

    assert_eq!(spy.calls()[0].model().tenant_id, Set(4));
}

#[tokio::test]
async fn non_positive_explicit_tenant_without_context_is_missing() {
    let spy = Spy::<user::ActiveModel>::new();
    let pipeline = scoped(&spy);

    let model = user::ActiveModel {
        tenant_id: Set(-1),
        email: Set("jane@example.com".to_string()),
        ..Default::default()
    };
    let result = pipeline
        .run(&RequestContext::system(), Mutation::create(model))
        .await;

    assert!(matches!(result, Err(AppError::MissingTenantContext)));
    assert!(spy.calls().is_empty());
}

#[tokio::test]
async fn update_never_changes_code() {
    let spy = Spy::<brand::ActiveModel>::new();
    let pipeline = scoped(&spy);

    let model = brand::ActiveModel {
        id: ActiveValue::Unchanged(1),
        tenant_id: ActiveValue::Unchanged(2),
        name: Set("Renamed".to_string()),
        code: Set("tenant:2:code:hijacked".to_string()),
        ..Default::default()
    };
    pipeline
        .run(&admin_of(2), Mutation::update_one(model))
        .await
        .unwrap();

    let calls = spy.calls();
    assert_eq!(calls[0].op(), MutationOp::UpdateOne);
    assert_eq!(calls[0].model().name, Set("Renamed".to_string()));
    assert!(calls[0].model().code.is_not_set());
}

#[tokio::test]
async fn bulk_delete_passes_through_without_tenant_injection() {
    let spy = Spy::<brand::ActiveModel>::new();
    let pipeline = scoped(&spy);

    let filter = Condition::all().add(brand::Column::TenantId.eq(2));
    let outcome = pipeline
        .run(&admin_of(2), Mutation::delete_many(filter))
        .await
        .unwrap();

    assert_eq!(outcome.rows_affected(), 1);
    let calls = spy.calls();
    assert_eq!(calls[0].op(), MutationOp::Delete);
    assert!(calls[0].model().tenant_id.is_not_set());
}

#[tokio::test]
async fn cross_tenant_write_is_denied() {
    let spy = Spy::<brand::ActiveModel>::new();
    let pipeline = scoped(&spy);

    let model = brand::ActiveModel {
        tenant_id: Set(2),
        ..new_brand("Elsewhere")
    };
    let result = pipeline.run(&admin_of(1), Mutation::create(model)).await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
    assert!(spy.calls().is_empty());
}

#[tokio::test]
async fn anonymous_write_is_denied() {
    let spy = Spy::<brand::ActiveModel>::new();
    let pipeline = scoped(&spy);

    let model = brand::ActiveModel {
        tenant_id: Set(1),
        ..new_brand("Anon")
    };
    let result = pipeline
        .run(&RequestContext::anonymous(), Mutation::create(model))
        .await;

    let err = assert_err!(result);
    assert!(matches!(err, AppError::Forbidden(_)));
    assert!(spy.calls().is_empty());
}

#[tokio::test]
async fn plain_user_needs_a_grant_to_write() {
    let spy = Spy::<brand::ActiveModel>::new();
    let pipeline = scoped(&spy);
    let ctx = RequestContext::for_principal(Principal::new(8, 1, UserType::User));

    let result = pipeline.run(&ctx, Mutation::create(new_brand("Mine"))).await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn creator_is_recorded() {
    let spy = Spy::<brand::ActiveModel>::new();
    let pipeline = scoped(&spy);

    pipeline
        .run(&admin_of(1), Mutation::create(new_brand("Owned")))
        .await
        .unwrap();

    let calls = spy.calls();
    assert_eq!(calls[0].model().created_by, Set(Some(77)));
    assert_eq!(calls[0].model().owned_by, Set(Some(77)));
}

#[tokio::test]
async fn tenant_registry_is_reserved_to_super_admins() {
    let spy = Spy::<tenant::ActiveModel>::new();
    let pipeline: Pipeline<tenant::ActiveModel> = Pipeline::new(spy.clone(), global_hooks());

    let model = tenant::ActiveModel {
        name: Set("Acme".to_string()),
        slug: Set("acme".to_string()),
        ..Default::default()
    };

    let denied = pipeline
        .run(&admin_of(1), Mutation::create(model.clone()))
        .await;
    assert!(matches!(denied, Err(AppError::Forbidden(_))));

    let super_admin =
        RequestContext::for_principal(Principal::new(1, 1, UserType::SuperAdmin));
    assert_ok!(pipeline.run(&super_admin, Mutation::create(model)).await);
    assert_eq!(spy.calls().len(), 1);
}
