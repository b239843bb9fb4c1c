//! User management use cases.

use async_trait::async_trait;
use std::sync::Arc;

use common::{AppError, AppResult, OptionExt};
use domain::{
    Action, Actor, CreateUser, Password, RequestContext, Resource, UpdateUser, User, UserType,
};

use super::{authorize, validate};
use crate::repository::{NewUser, RoleRepository, UserChanges, UserRepository};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    /// Create a user. Email and username are unique across all tenants.
    async fn create_user(&self, ctx: &RequestContext, input: CreateUser) -> AppResult<User>;

    async fn get_user(&self, ctx: &RequestContext, id: i64) -> AppResult<User>;

    async fn list_users(&self, ctx: &RequestContext) -> AppResult<Vec<User>>;

    async fn update_user(&self, ctx: &RequestContext, id: i64, input: UpdateUser)
        -> AppResult<User>;

    async fn delete_user(&self, ctx: &RequestContext, id: i64) -> AppResult<()>;
}

pub struct UserManager {
    users: Arc<dyn UserRepository>,
    roles: Arc<dyn RoleRepository>,
}

impl UserManager {
    pub fn new(users: Arc<dyn UserRepository>, roles: Arc<dyn RoleRepository>) -> Self {
        Self { users, roles }
    }

    /// Only super admins (or the system) may hand out super admin rights.
    fn check_user_type(ctx: &RequestContext, user_type: UserType) -> AppResult<()> {
        if !user_type.is_super_admin() {
            return Ok(());
        }
        match ctx.actor() {
            Actor::System => Ok(()),
            Actor::User(p) if p.user_type.is_super_admin() => Ok(()),
            _ => Err(AppError::forbidden("only super admins may grant super admin")),
        }
    }

    async fn check_role(&self, tenant_id: i64, role_id: i64) -> AppResult<()> {
        if self.roles.find_by_id(tenant_id, role_id).await?.is_none() {
            return Err(AppError::validation(format!(
                "Role {} does not exist in this tenant",
                role_id
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn create_user(&self, ctx: &RequestContext, input: CreateUser) -> AppResult<User> {
        validate(&input)?;

        let user_type = input
            .user_type
            .as_deref()
            .map(UserType::from)
            .unwrap_or(UserType::User);
        Self::check_user_type(ctx, user_type)?;

        if let Some(role_id) = input.role_id {
            let tenant_id = match input.tenant_id {
                Some(id) => id,
                None => ctx.require_tenant()?,
            };
            self.check_role(tenant_id, role_id).await?;
        }

        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::conflict("Email"));
        }
        if self.users.find_by_username(&input.username).await?.is_some() {
            return Err(AppError::conflict("Username"));
        }

        let password_hash = Password::new(&input.password)?.into_string();

        let user = self
            .users
            .create(
                ctx,
                NewUser {
                    tenant_id: input.tenant_id,
                    email: input.email,
                    username: input.username,
                    password_hash,
                    name: input.name,
                    user_type,
                    role_id: input.role_id,
                },
            )
            .await?;

        tracing::info!(user_id = user.id, tenant_id = user.tenant_id, "User created");
        Ok(user)
    }

    async fn get_user(&self, ctx: &RequestContext, id: i64) -> AppResult<User> {
        let tenant_id = ctx.require_tenant()?;
        authorize(ctx, Resource::User, Action::Read, Some(tenant_id))?;
        self.users.find_by_id(tenant_id, id).await?.ok_or_not_found()
    }

    async fn list_users(&self, ctx: &RequestContext) -> AppResult<Vec<User>> {
        let tenant_id = ctx.require_tenant()?;
        authorize(ctx, Resource::User, Action::Read, Some(tenant_id))?;
        self.users.list(tenant_id).await
    }

    async fn update_user(
        &self,
        ctx: &RequestContext,
        id: i64,
        input: UpdateUser,
    ) -> AppResult<User> {
        validate(&input)?;
        let tenant_id = ctx.require_tenant()?;

        let user_type = input.user_type.as_deref().map(UserType::from);
        if let Some(user_type) = user_type {
            Self::check_user_type(ctx, user_type)?;
        }
        if let Some(Some(role_id)) = input.role_id {
            self.check_role(tenant_id, role_id).await?;
        }
        let password_hash = match input.password.as_deref() {
            Some(plain) => Some(Password::new(plain)?.into_string()),
            None => None,
        };

        let changes = UserChanges {
            name: input.name,
            user_type,
            role_id: input.role_id,
            password_hash,
        };
        self.users.update(ctx, tenant_id, id, changes).await
    }

    async fn delete_user(&self, ctx: &RequestContext, id: i64) -> AppResult<()> {
        let tenant_id = ctx.require_tenant()?;
        self.users.delete(ctx, tenant_id, id).await?;
        tracing::info!(user_id = id, tenant_id, "User deleted");
        Ok(())
    }
}
