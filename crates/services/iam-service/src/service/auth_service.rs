//! Authentication and request context resolution.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use common::config::JwtConfig;
use common::{AppError, AppResult};
use domain::{
    Grants, Password, Principal, RequestContext, User, UserType, SECONDS_PER_HOUR,
    TOKEN_TYPE_BEARER,
};

use super::RoleService;
use crate::repository::{TenantRepository, UserRepository};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Hash checked when the login identifier matches no user, so that unknown
/// and known identifiers cost the same.
static DUMMY_HASH: Lazy<Option<String>> = Lazy::new(|| {
    Password::new("dummy-password-never-matches")
        .ok()
        .map(Password::into_string)
});

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub tenant_id: i64,
    pub user_type: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token returned after a successful login
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Always "Bearer"
    pub token_type: String,
    /// Lifetime in seconds
    pub expires_in: i64,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Login with email or username
    async fn login(&self, identifier: String, password: String) -> AppResult<TokenResponse>;

    fn verify_token(&self, token: &str) -> AppResult<Claims>;

    /// Build the context for a request.
    ///
    /// Without a token the request is anonymous. `tenant_override` re-scopes
    /// the request to another tenant and is reserved to super admins.
    async fn resolve_context(
        &self,
        token: Option<String>,
        tenant_override: Option<i64>,
    ) -> AppResult<RequestContext>;
}

pub struct AuthManager {
    users: Arc<dyn UserRepository>,
    tenants: Arc<dyn TenantRepository>,
    roles: Arc<dyn RoleService>,
    jwt: JwtConfig,
}

impl AuthManager {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tenants: Arc<dyn TenantRepository>,
        roles: Arc<dyn RoleService>,
        jwt: JwtConfig,
    ) -> Self {
        Self {
            users,
            tenants,
            roles,
            jwt,
        }
    }

    fn generate_token(&self, user: &User) -> AppResult<TokenResponse> {
        let now = Utc::now();
        let expires_at = Duration::try_hours(self.jwt.expiration_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| AppError::internal("token lifetime out of range"))?;

        let claims = Claims {
            sub: user.id,
            tenant_id: user.tenant_id,
            user_type: user.user_type.as_str().to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt.secret.as_bytes()),
        )?;

        Ok(TokenResponse {
            access_token: token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.jwt.expiration_hours * SECONDS_PER_HOUR,
        })
    }

    async fn find_login_user(&self, identifier: &str) -> AppResult<Option<User>> {
        if identifier.contains('@') {
            self.users.find_by_email(identifier).await
        } else {
            self.users.find_by_username(identifier).await
        }
    }

    /// Whether the tenant exists and currently accepts its users
    async fn tenant_usable(&self, tenant_id: i64) -> AppResult<bool> {
        let tenant = self.tenants.find_by_id(tenant_id).await?;
        Ok(tenant.is_some_and(|t| t.is_usable(Utc::now())))
    }

    async fn grants_of(&self, user: &User) -> AppResult<Grants> {
        match user.role_id {
            Some(role_id) => self.roles.grants_for_role(user.tenant_id, role_id).await,
            None => Ok(Grants::new()),
        }
    }
}

#[async_trait]
impl AuthService for AuthManager {
    async fn login(&self, identifier: String, password: String) -> AppResult<TokenResponse> {
        let user = self.find_login_user(&identifier).await?;

        let stored_hash = match (&user, DUMMY_HASH.as_deref()) {
            (Some(user), _) => Some(user.password_hash.as_str()),
            (None, dummy) => dummy,
        };
        let password_valid = stored_hash
            .map(|hash| Password::from_hash(hash).verify(&password))
            .unwrap_or(false);

        let user = match user {
            Some(user) if password_valid => user,
            _ => return Err(AppError::InvalidCredentials),
        };

        if !self.tenant_usable(user.tenant_id).await? {
            tracing::warn!(
                user_id = user.id,
                tenant_id = user.tenant_id,
                "Login refused for unusable tenant"
            );
            return Err(AppError::InvalidCredentials);
        }

        tracing::info!(user_id = user.id, tenant_id = user.tenant_id, "User logged in");
        self.generate_token(&user)
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt.secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }

    async fn resolve_context(
        &self,
        token: Option<String>,
        tenant_override: Option<i64>,
    ) -> AppResult<RequestContext> {
        let Some(token) = token else {
            if tenant_override.is_some() {
                return Err(AppError::Unauthorized);
            }
            return Ok(RequestContext::anonymous());
        };

        let claims = self.verify_token(&token)?;
        // Reload so role and user type changes apply before the token expires
        let user = self
            .users
            .find_by_id(claims.tenant_id, claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)?;
        if !self.tenant_usable(user.tenant_id).await? {
            tracing::warn!(
                user_id = user.id,
                tenant_id = user.tenant_id,
                "Token refused for unusable tenant"
            );
            return Err(AppError::Unauthorized);
        }

        let grants = self.grants_of(&user).await?;
        let principal = Principal::new(user.id, user.tenant_id, user.user_type).with_grants(grants);
        let ctx = RequestContext::for_principal(principal);

        match tenant_override {
            Some(tenant_id) if tenant_id != user.tenant_id => {
                if user.user_type != UserType::SuperAdmin {
                    tracing::warn!(
                        user_id = user.id,
                        tenant_id,
                        "Tenant override refused"
                    );
                    return Err(AppError::forbidden("tenant override requires super admin"));
                }
                if self.tenants.find_by_id(tenant_id).await?.is_none() {
                    return Err(AppError::NotFound);
                }
                Ok(ctx.with_tenant(tenant_id))
            }
            _ => Ok(ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{MockTenantRepository, MockUserRepository};
    use crate::service::MockRoleService;
    use domain::{Actor, Audit, PermissionGrant, Tenant, TenantStatus, MIN_JWT_SECRET_LENGTH};
    use mockall::predicate::*;

    fn jwt() -> JwtConfig {
        JwtConfig {
            secret: "k".repeat(MIN_JWT_SECRET_LENGTH),
            expiration_hours: 1,
        }
    }

    fn user(user_type: UserType, role_id: Option<i64>) -> User {
        User {
            id: 10,
            tenant_id: 1,
            email: "jane@example.com".to_string(),
            username: "jane".to_string(),
            password_hash: Password::new("Password123").unwrap().into_string(),
            name: "Jane".to_string(),
            user_type,
            role_id,
            audit: Audit::now(None),
        }
    }

    fn tenant(id: i64, status: TenantStatus) -> Tenant {
        Tenant {
            id,
            name: "Acme".to_string(),
            slug: "acme".to_string(),
            domain: None,
            status,
            settings: serde_json::json!({}),
            metadata: serde_json::json!({}),
            expires_at: None,
            is_active: true,
            audit: Audit::now(None),
        }
    }

    fn active_tenants() -> MockTenantRepository {
        let mut tenants = MockTenantRepository::new();
        tenants
            .expect_find_by_id()
            .returning(|id| Ok(Some(tenant(id, TenantStatus::Active))));
        tenants
    }

    fn manager(
        users: MockUserRepository,
        tenants: MockTenantRepository,
        roles: MockRoleService,
    ) -> AuthManager {
        AuthManager::new(Arc::new(users), Arc::new(tenants), Arc::new(roles), jwt())
    }

    #[tokio::test]
    async fn test_login_by_email_issues_verifiable_token() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .with(eq("jane@example.com"))
            .returning(|_| Ok(Some(user(UserType::Admin, None))));
        let mut tenants = MockTenantRepository::new();
        tenants
            .expect_find_by_id()
            .returning(|id| Ok(Some(tenant(id, TenantStatus::Active))));

        let auth = manager(users, tenants, MockRoleService::new());
        let token = auth
            .login("jane@example.com".to_string(), "Password123".to_string())
            .await
            .unwrap();

        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.expires_in, 3600);

        let claims = auth.verify_token(&token.access_token).unwrap();
        assert_eq!(claims.sub, 10);
        assert_eq!(claims.tenant_id, 1);
        assert_eq!(claims.user_type, "admin");
    }

    #[tokio::test]
    async fn test_login_by_username_wrong_password() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .with(eq("jane"))
            .returning(|_| Ok(Some(user(UserType::User, None))));

        let auth = manager(users, MockTenantRepository::new(), MockRoleService::new());
        let result = auth
            .login("jane".to_string(), "WrongPassword".to_string())
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_user_same_error() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().returning(|_| Ok(None));

        let auth = manager(users, MockTenantRepository::new(), MockRoleService::new());
        let result = auth.login("ghost".to_string(), "Password123".to_string()).await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_suspended_tenant_refused() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .returning(|_| Ok(Some(user(UserType::User, None))));
        let mut tenants = MockTenantRepository::new();
        tenants
            .expect_find_by_id()
            .returning(|id| Ok(Some(tenant(id, TenantStatus::Suspended))));

        let auth = manager(users, tenants, MockRoleService::new());
        let result = auth.login("jane".to_string(), "Password123".to_string()).await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let auth = manager(
            MockUserRepository::new(),
            MockTenantRepository::new(),
            MockRoleService::new(),
        );
        let result = auth.verify_token("not-a-jwt");

        assert!(matches!(result, Err(AppError::Jwt(_))));
    }

    #[tokio::test]
    async fn test_resolve_without_token_is_anonymous() {
        let auth = manager(
            MockUserRepository::new(),
            MockTenantRepository::new(),
            MockRoleService::new(),
        );

        let ctx = auth.resolve_context(None, None).await.unwrap();
        assert_eq!(ctx, RequestContext::anonymous());

        let result = auth.resolve_context(None, Some(2)).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_resolve_loads_role_grants() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .with(eq(1), eq(10))
            .returning(|_, _| Ok(Some(user(UserType::User, Some(3)))));
        let mut roles = MockRoleService::new();
        roles
            .expect_grants_for_role()
            .with(eq(1), eq(3))
            .returning(|_, _| {
                let mut grants = Grants::new();
                grants.insert("brand".to_string(), PermissionGrant::read_only());
                Ok(grants)
            });

        let auth = manager(users, active_tenants(), roles);
        let token = auth
            .generate_token(&user(UserType::User, Some(3)))
            .unwrap()
            .access_token;

        let ctx = auth.resolve_context(Some(token), None).await.unwrap();

        assert_eq!(ctx.tenant_id(), Some(1));
        let principal = ctx.actor().principal().unwrap();
        assert!(principal.grant_for("brand").can_read);
        assert!(!principal.grant_for("brand").can_delete);
    }

    #[tokio::test]
    async fn test_tenant_override_reserved_to_super_admin() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(|_, _| Ok(Some(user(UserType::Admin, None))));

        let auth = manager(users, active_tenants(), MockRoleService::new());
        let token = auth
            .generate_token(&user(UserType::Admin, None))
            .unwrap()
            .access_token;

        let result = auth.resolve_context(Some(token), Some(2)).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_super_admin_override_rescopes_context() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(|_, _| Ok(Some(user(UserType::SuperAdmin, None))));
        let mut tenants = MockTenantRepository::new();
        tenants
            .expect_find_by_id()
            .with(eq(1))
            .returning(|id| Ok(Some(tenant(id, TenantStatus::Active))));
        tenants
            .expect_find_by_id()
            .with(eq(2))
            .returning(|id| Ok(Some(tenant(id, TenantStatus::Active))));

        let auth = manager(users, tenants, MockRoleService::new());
        let token = auth
            .generate_token(&user(UserType::SuperAdmin, None))
            .unwrap()
            .access_token;

        let ctx = auth.resolve_context(Some(token), Some(2)).await.unwrap();

        assert_eq!(ctx.tenant_id(), Some(2));
        assert!(matches!(ctx.actor(), Actor::User(p) if p.tenant_id == 1));
    }

    #[tokio::test]
    async fn test_resolve_refuses_token_of_suspended_tenant() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(|_, _| Ok(Some(user(UserType::Admin, Some(3)))));
        let mut tenants = MockTenantRepository::new();
        tenants
            .expect_find_by_id()
            .with(eq(1))
            .returning(|id| Ok(Some(tenant(id, TenantStatus::Suspended))));
        let mut roles = MockRoleService::new();
        roles.expect_grants_for_role().never();

        let auth = manager(users, tenants, roles);
        let token = auth
            .generate_token(&user(UserType::Admin, Some(3)))
            .unwrap()
            .access_token;

        let result = auth.resolve_context(Some(token), None).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_resolve_refuses_token_of_expired_tenant() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(|_, _| Ok(Some(user(UserType::User, None))));
        let mut tenants = MockTenantRepository::new();
        tenants.expect_find_by_id().returning(|id| {
            Ok(Some(Tenant {
                expires_at: Some(Utc::now() - Duration::hours(1)),
                ..tenant(id, TenantStatus::Active)
            }))
        });

        let auth = manager(users, tenants, MockRoleService::new());
        let token = auth
            .generate_token(&user(UserType::User, None))
            .unwrap()
            .access_token;

        let result = auth.resolve_context(Some(token), None).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_oversized_lifetime_is_an_error() {
        let auth = AuthManager::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(MockTenantRepository::new()),
            Arc::new(MockRoleService::new()),
            JwtConfig {
                expiration_hours: i64::MAX,
                ..jwt()
            },
        );

        let result = auth.generate_token(&user(UserType::User, None));
        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
