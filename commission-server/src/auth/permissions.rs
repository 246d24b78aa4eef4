//! Permission Definitions
//!
//! Permission *policy* lives with the identity provider; the engine only asks
//! an [`Authorizer`] for a yes/no answer before privileged operations.

use crate::auth::CurrentUser;
use crate::security_log;
use crate::utils::{AppError, AppResult};

/// Create, update and deactivate the company configuration
pub const CONFIG_MANAGE: &str = "commission_config:manage";
/// Approve or reject pending commissions
pub const COMMISSIONS_APPROVE: &str = "commissions:approve";
/// Mark approved commissions as paid
pub const COMMISSIONS_PAY: &str = "commissions:pay";
/// See and act on every broker's commissions within the company
pub const COMMISSIONS_VIEW_ALL: &str = "commissions:view_all";

/// Authorization collaborator
///
/// Answers whether `user` may perform `permission`.
pub trait Authorizer: Send + Sync {
    fn is_allowed(&self, user: &CurrentUser, permission: &str) -> bool;
}

/// Default authorizer backed by the permissions carried in the token
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleAuthorizer;

impl Authorizer for RoleAuthorizer {
    fn is_allowed(&self, user: &CurrentUser, permission: &str) -> bool {
        user.has_permission(permission)
    }
}

/// Fail with `PermissionDenied` unless the authorizer allows `permission`
pub fn ensure_allowed(
    authorizer: &dyn Authorizer,
    user: &CurrentUser,
    permission: &'static str,
) -> AppResult<()> {
    if authorizer.is_allowed(user, permission) {
        return Ok(());
    }
    security_log!(
        "WARN",
        "permission_denied",
        user_id = user.id,
        username = user.username.clone(),
        required_permission = permission
    );
    Err(
        AppError::permission_denied(format!("Permission denied: {}", permission))
            .with_detail("required_permission", permission),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::ErrorCode;

    fn broker(permissions: &[&str]) -> CurrentUser {
        CurrentUser {
            id: 7,
            company_id: 1,
            username: "ana".into(),
            role: "broker".into(),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
        }
    }

    struct DenyAll;
    impl Authorizer for DenyAll {
        fn is_allowed(&self, _: &CurrentUser, _: &str) -> bool {
            false
        }
    }

    #[test]
    fn role_authorizer_follows_token_permissions() {
        let user = broker(&["commissions:*"]);
        assert!(RoleAuthorizer.is_allowed(&user, COMMISSIONS_APPROVE));
        assert!(RoleAuthorizer.is_allowed(&user, COMMISSIONS_PAY));
        assert!(!RoleAuthorizer.is_allowed(&user, CONFIG_MANAGE));
    }

    #[test]
    fn ensure_allowed_enforces_the_answer() {
        let admin = CurrentUser {
            role: "admin".into(),
            ..broker(&[])
        };
        assert!(ensure_allowed(&RoleAuthorizer, &admin, CONFIG_MANAGE).is_ok());

        let err = ensure_allowed(&DenyAll, &admin, CONFIG_MANAGE).unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
    }
}
