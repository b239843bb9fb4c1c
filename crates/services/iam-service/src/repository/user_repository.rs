//! User repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use super::set_some;
use crate::hooks::{tenant_scoped_hooks, Mutation, Persist, Pipeline};
use common::{AppResult, OptionExt};
use domain::{RequestContext, User, UserType};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User ready to be stored. The password is already hashed.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    /// Left to the tenant hook when `None`
    pub tenant_id: Option<i64>,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub user_type: UserType,
    pub role_id: Option<i64>,
}

/// Field changes for an existing user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub user_type: Option<UserType>,
    /// `Some(None)` detaches the role
    pub role_id: Option<Option<i64>>,
    pub password_hash: Option<String>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, tenant_id: i64, id: i64) -> AppResult<Option<User>>;

    /// Look up by email across all tenants
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Look up by username across all tenants
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    async fn list(&self, tenant_id: i64) -> AppResult<Vec<User>>;

    async fn create(&self, ctx: &RequestContext, user: NewUser) -> AppResult<User>;

    async fn update(
        &self,
        ctx: &RequestContext,
        tenant_id: i64,
        id: i64,
        changes: UserChanges,
    ) -> AppResult<User>;

    async fn delete(&self, ctx: &RequestContext, tenant_id: i64, id: i64) -> AppResult<()>;

    /// Clear `role_id` on every user of the tenant holding `role_id`.
    /// Returns the number of users touched.
    async fn detach_role(&self, ctx: &RequestContext, tenant_id: i64, role_id: i64)
        -> AppResult<u64>;
}

pub struct UserStore {
    db: DatabaseConnection,
    pipeline: Pipeline<ActiveModel>,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        let pipeline = Pipeline::<ActiveModel>::new(Arc::new(Persist::new(db.clone())), tenant_scoped_hooks());
        Self { db, pipeline }
    }

    async fn load(&self, tenant_id: i64, id: i64) -> AppResult<user::Model> {
        UserEntity::find_by_id(id)
            .filter(user::Column::TenantId.eq(tenant_id))
            .one(&self.db)
            .await?
            .ok_or_not_found()
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, tenant_id: i64, id: i64) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .filter(user::Column::TenantId.eq(tenant_id))
            .one(&self.db)
            .await?;
        Ok(result.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        Ok(result.map(User::from))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?;
        Ok(result.map(User::from))
    }

    async fn list(&self, tenant_id: i64) -> AppResult<Vec<User>> {
        let users = UserEntity::find()
            .filter(user::Column::TenantId.eq(tenant_id))
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await?;
        Ok(users.into_iter().map(User::from).collect())
    }

    async fn create(&self, ctx: &RequestContext, user: NewUser) -> AppResult<User> {
        let model = ActiveModel {
            tenant_id: set_some(user.tenant_id),
            email: Set(user.email),
            username: Set(user.username),
            password_hash: Set(user.password_hash),
            name: Set(user.name),
            user_type: Set(user.user_type.as_str().to_string()),
            role_id: Set(user.role_id),
            ..Default::default()
        };

        let saved = self
            .pipeline
            .run(ctx, Mutation::create(model))
            .await?
            .into_model()?;
        Ok(User::from(saved))
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        tenant_id: i64,
        id: i64,
        changes: UserChanges,
    ) -> AppResult<User> {
        let mut model = self.load(tenant_id, id).await?.into_active_model();

        if let Some(name) = changes.name {
            model.name = Set(name);
        }
        if let Some(user_type) = changes.user_type {
            model.user_type = Set(user_type.as_str().to_string());
        }
        if let Some(role_id) = changes.role_id {
            model.role_id = Set(role_id);
        }
        if let Some(password_hash) = changes.password_hash {
            model.password_hash = Set(password_hash);
        }

        let saved = self
            .pipeline
            .run(ctx, Mutation::update_one(model))
            .await?
            .into_model()?;
        Ok(User::from(saved))
    }

    async fn delete(&self, ctx: &RequestContext, tenant_id: i64, id: i64) -> AppResult<()> {
        let model = self.load(tenant_id, id).await?.into_active_model();
        self.pipeline.run(ctx, Mutation::delete_one(model)).await?;
        Ok(())
    }

    async fn detach_role(
        &self,
        ctx: &RequestContext,
        tenant_id: i64,
        role_id: i64,
    ) -> AppResult<u64> {
        // Bulk updates bypass before_save, so stamp updated_at here
        let model = ActiveModel {
            role_id: Set(None),
            updated_at: Set(Utc::now()),
            ..ActiveModelTrait::default()
        };
        let filter = Condition::all()
            .add(user::Column::TenantId.eq(tenant_id))
            .add(user::Column::RoleId.eq(role_id));

        let outcome = self
            .pipeline
            .run(ctx, Mutation::update_many(model, filter))
            .await?;
        Ok(outcome.rows_affected())
    }
}
