//! User domain entity and related types.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::audit::Audit;
use crate::constants::{USER_TYPE_ADMIN, USER_TYPE_SUPER_ADMIN, USER_TYPE_USER};
use crate::validation::{validate_user_type, validate_username};

/// User types, from platform-wide to tenant-local
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    SuperAdmin,
    Admin,
    User,
}

impl UserType {
    /// Platform operators bypass tenant boundaries
    pub fn is_super_admin(&self) -> bool {
        matches!(self, UserType::SuperAdmin)
    }

    /// Tenant administrators manage everything inside their own tenant
    pub fn is_admin(&self) -> bool {
        matches!(self, UserType::SuperAdmin | UserType::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::SuperAdmin => USER_TYPE_SUPER_ADMIN,
            UserType::Admin => USER_TYPE_ADMIN,
            UserType::User => USER_TYPE_USER,
        }
    }
}

impl From<&str> for UserType {
    fn from(s: &str) -> Self {
        match s {
            USER_TYPE_SUPER_ADMIN => UserType::SuperAdmin,
            USER_TYPE_ADMIN => UserType::Admin,
            _ => UserType::User,
        }
    }
}

impl From<String> for UserType {
    fn from(s: String) -> Self {
        UserType::from(s.as_str())
    }
}

impl From<UserType> for String {
    fn from(user_type: UserType) -> Self {
        user_type.as_str().to_string()
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub tenant_id: i64,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub user_type: UserType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<i64>,
    #[serde(flatten)]
    pub audit: Audit,
}

impl User {
    /// Check if user administers its tenant (or every tenant)
    pub fn is_admin(&self) -> bool {
        self.user_type.is_admin()
    }
}

/// User creation data transfer object
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUser {
    /// Explicit tenant; falls back to the caller's tenant when absent
    pub tenant_id: Option<i64>,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(custom(function = "validate_username"))]
    pub username: String,
    /// Plain password (minimum 8 characters), hashed before storage
    pub password: String,
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: String,
    #[validate(custom(function = "validate_user_type"))]
    pub user_type: Option<String>,
    pub role_id: Option<i64>,
}

/// User update data transfer object
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUser {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_user_type"))]
    pub user_type: Option<String>,
    /// `Some(None)` detaches the user from its role
    pub role_id: Option<Option<i64>>,
    /// New plain password, rehashed before storage
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_input() -> CreateUser {
        CreateUser {
            tenant_id: None,
            email: "jane@example.com".to_string(),
            username: "jane".to_string(),
            password: "Password123".to_string(),
            name: "Jane".to_string(),
            user_type: None,
            role_id: None,
        }
    }

    #[test]
    fn test_user_type_from_str() {
        assert_eq!(UserType::from("super_admin"), UserType::SuperAdmin);
        assert_eq!(UserType::from("admin"), UserType::Admin);
        assert_eq!(UserType::from("anything"), UserType::User);
    }

    #[test]
    fn test_admin_hierarchy() {
        assert!(UserType::SuperAdmin.is_admin());
        assert!(UserType::Admin.is_admin());
        assert!(!UserType::User.is_admin());
        assert!(!UserType::Admin.is_super_admin());
    }

    #[test]
    fn test_create_user_valid() {
        assert!(create_input().validate().is_ok());
    }

    #[test]
    fn test_create_user_invalid_email() {
        let mut input = create_input();
        input.email = "not-an-email".to_string();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_create_user_short_username() {
        let mut input = create_input();
        input.username = "jd".to_string();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_create_user_unknown_type() {
        let mut input = create_input();
        input.user_type = Some("root".to_string());
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User {
            id: 1,
            tenant_id: 1,
            email: "jane@example.com".to_string(),
            username: "jane".to_string(),
            password_hash: "secret-hash".to_string(),
            name: "Jane".to_string(),
            user_type: UserType::User,
            role_id: None,
            audit: Audit::now(None),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
    }
}
