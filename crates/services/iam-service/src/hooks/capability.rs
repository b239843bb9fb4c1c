//! Capabilities entity `ActiveModel`s expose to the generic hooks.

use sea_orm::{ActiveValue, Value};

use domain::Resource;

/// Entities that belong to a tenant, optionally with a generated code.
pub trait TenantScoped {
    /// Tenant id pending on this mutation, if any
    fn tenant_id(&self) -> Option<i64>;

    fn set_tenant_id(&mut self, tenant_id: i64);

    /// Pending name the code is derived from. Entities without a code
    /// column return `None`.
    fn code_source(&self) -> Option<&str> {
        None
    }

    fn set_code(&mut self, _code: String) {}

    /// Remove a pending code change, returning it
    fn take_pending_code(&mut self) -> Option<String> {
        None
    }
}

/// Entities carrying `created_by` / `owned_by`.
pub trait Audited {
    /// Record the creating user unless the mutation already names one
    fn stamp_creator(&mut self, user_id: i64);
}

/// Entities protected by a policy.
pub trait Guarded {
    const RESOURCE: Resource;

    /// Tenant the row belongs to, from pending or loaded values
    fn owning_tenant(&self) -> Option<i64>;
}

/// Value set on this mutation.
pub(crate) fn pending<V>(value: &ActiveValue<V>) -> Option<&V>
where
    V: Into<Value>,
{
    match value {
        ActiveValue::Set(v) => Some(v),
        _ => None,
    }
}

/// Value set on this mutation or loaded from the stored row.
pub(crate) fn current<V>(value: &ActiveValue<V>) -> Option<&V>
where
    V: Into<Value>,
{
    match value {
        ActiveValue::Set(v) | ActiveValue::Unchanged(v) => Some(v),
        ActiveValue::NotSet => None,
    }
}

/// Drop a pending value, leaving the field out of the write.
pub(crate) fn take_pending<V>(value: &mut ActiveValue<V>) -> Option<V>
where
    V: Into<Value>,
{
    if !matches!(value, ActiveValue::Set(_)) {
        return None;
    }
    match std::mem::replace(value, ActiveValue::NotSet) {
        ActiveValue::Set(v) => Some(v),
        _ => None,
    }
}

pub(crate) fn set_if_unset<V>(value: &mut ActiveValue<V>, new_value: V)
where
    V: Into<Value>,
{
    if value.is_not_set() {
        *value = ActiveValue::Set(new_value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_only_sees_set_values() {
        assert_eq!(pending(&ActiveValue::Set(3_i64)), Some(&3));
        assert_eq!(pending(&ActiveValue::Unchanged(3_i64)), None);
        assert_eq!(pending::<i64>(&ActiveValue::NotSet), None);
    }

    #[test]
    fn test_current_sees_loaded_values() {
        assert_eq!(current(&ActiveValue::Unchanged(3_i64)), Some(&3));
    }

    #[test]
    fn test_take_pending_clears_set_value() {
        let mut value = ActiveValue::Set("tenant:1:code:x".to_string());
        assert_eq!(take_pending(&mut value), Some("tenant:1:code:x".to_string()));
        assert!(value.is_not_set());
    }

    #[test]
    fn test_take_pending_keeps_loaded_value() {
        let mut value = ActiveValue::Unchanged("kept".to_string());
        assert_eq!(take_pending(&mut value), None);
        assert_eq!(value, ActiveValue::Unchanged("kept".to_string()));
    }

    #[test]
    fn test_set_if_unset() {
        let mut value: ActiveValue<Option<i64>> = ActiveValue::NotSet;
        set_if_unset(&mut value, Some(5));
        set_if_unset(&mut value, Some(6));
        assert_eq!(value, ActiveValue::Set(Some(5)));
    }
}
