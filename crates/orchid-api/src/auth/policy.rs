//! Access policy
//!
//! The single place that says which role each operation requires. Handlers
//! call [`enforce`] before touching the store, so a denied request never
//! executes partially.
//!
//! Per-request flow: unauthenticated until the middleware validates the
//! bearer token, then either authorized or denied here. Row-level ownership
//! (a user sees only their own orders) is a secondary check inside the order
//! handlers, after this role gate.

use serde::{Deserialize, Serialize};

use super::middleware::{AuthError, AuthenticatedUser};

/// The closed set of roles. String forms are kept as stored and carried on
/// the wire (`ROLE_ADMIN`/`ROLE_USER`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// Returns the role name as stored in the roles table
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ROLE_ADMIN",
            Role::User => "ROLE_USER",
        }
    }

    /// Parses a role from its stored name. Unknown names are `None`, which
    /// authorization treats the same as an absent role claim.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ROLE_ADMIN" => Some(Role::Admin),
            "ROLE_USER" => Some(Role::User),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What an operation demands of the caller's role claim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleRequirement {
    /// ROLE_ADMIN only
    Admin,
    /// ROLE_USER only
    User,
    /// Either role
    AdminOrUser,
    /// Any valid token; the role claim may be absent
    Authenticated,
}

impl RoleRequirement {
    /// Whether a caller carrying `role` satisfies this requirement
    pub fn allows(&self, role: Option<Role>) -> bool {
        match self {
            RoleRequirement::Authenticated => true,
            RoleRequirement::Admin => role == Some(Role::Admin),
            RoleRequirement::User => role == Some(Role::User),
            RoleRequirement::AdminOrUser => {
                matches!(role, Some(Role::Admin) | Some(Role::User))
            }
        }
    }
}

/// Every protected operation in the system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListAccounts,
    ListRoles,
    GetRole,
    CreateRole,
    UpdateRole,
    DeleteRole,
    ListCategories,
    GetCategory,
    CreateCategory,
    UpdateCategory,
    DeleteCategory,
    ListOrchids,
    GetOrchid,
    ListOrchidsByCategory,
    CreateOrchid,
    UpdateOrchid,
    DeleteOrchid,
    ListOrders,
    GetOrder,
    CreateOrder,
    UpdateOrder,
    DeleteOrder,
    ListMyOrders,
}

/// The static policy table
pub fn required(op: Operation) -> RoleRequirement {
    use Operation::*;
    use RoleRequirement::*;

    match op {
        ListAccounts => Admin,
        ListRoles | GetRole | CreateRole | UpdateRole | DeleteRole => Admin,
        ListCategories | GetCategory => Authenticated,
        CreateCategory | UpdateCategory | DeleteCategory => Admin,
        ListOrchids | GetOrchid => AdminOrUser,
        ListOrchidsByCategory => Authenticated,
        CreateOrchid | UpdateOrchid | DeleteOrchid => Admin,
        CreateOrder | ListMyOrders => User,
        GetOrder => AdminOrUser,
        ListOrders | UpdateOrder | DeleteOrder => Admin,
    }
}

/// Central enforcement point. A missing or insufficient role claim is a 403,
/// distinct from the 401 an invalid token produces upstream.
pub fn enforce(op: Operation, user: &AuthenticatedUser) -> Result<(), AuthError> {
    if required(op).allows(user.role) {
        Ok(())
    } else {
        tracing::warn!(
            subject = %user.subject,
            role = user.role.map(|r| r.as_str()).unwrap_or("<none>"),
            operation = ?op,
            "access denied"
        );
        Err(AuthError::InsufficientRole)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with(role: Option<Role>) -> AuthenticatedUser {
        AuthenticatedUser {
            subject: "tester".to_string(),
            role,
        }
    }

    #[test]
    fn test_role_parse_round_trip() {
        assert_eq!(Role::parse("ROLE_ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse("ROLE_USER"), Some(Role::User));
        assert_eq!(Role::parse("ROLE_SUPERVISOR"), None);
        assert_eq!(Role::parse(""), None);
        assert_eq!(Role::Admin.as_str(), "ROLE_ADMIN");
    }

    #[test]
    fn test_requirement_allows() {
        assert!(RoleRequirement::Admin.allows(Some(Role::Admin)));
        assert!(!RoleRequirement::Admin.allows(Some(Role::User)));
        assert!(!RoleRequirement::Admin.allows(None));

        assert!(RoleRequirement::User.allows(Some(Role::User)));
        assert!(!RoleRequirement::User.allows(Some(Role::Admin)));

        assert!(RoleRequirement::AdminOrUser.allows(Some(Role::Admin)));
        assert!(RoleRequirement::AdminOrUser.allows(Some(Role::User)));
        assert!(!RoleRequirement::AdminOrUser.allows(None));

        assert!(RoleRequirement::Authenticated.allows(None));
        assert!(RoleRequirement::Authenticated.allows(Some(Role::User)));
    }

    #[test]
    fn test_policy_table() {
        assert_eq!(required(Operation::ListAccounts), RoleRequirement::Admin);
        assert_eq!(required(Operation::CreateRole), RoleRequirement::Admin);
        assert_eq!(
            required(Operation::ListCategories),
            RoleRequirement::Authenticated
        );
        assert_eq!(required(Operation::CreateCategory), RoleRequirement::Admin);
        assert_eq!(
            required(Operation::ListOrchids),
            RoleRequirement::AdminOrUser
        );
        assert_eq!(
            required(Operation::ListOrchidsByCategory),
            RoleRequirement::Authenticated
        );
        assert_eq!(required(Operation::DeleteOrchid), RoleRequirement::Admin);
        assert_eq!(required(Operation::CreateOrder), RoleRequirement::User);
        assert_eq!(required(Operation::ListMyOrders), RoleRequirement::User);
        assert_eq!(required(Operation::GetOrder), RoleRequirement::AdminOrUser);
        assert_eq!(required(Operation::ListOrders), RoleRequirement::Admin);
    }

    #[test]
    fn test_enforce_admin_only_operation() {
        let admin = user_with(Some(Role::Admin));
        let user = user_with(Some(Role::User));
        let anonymous_role = user_with(None);

        assert!(enforce(Operation::CreateCategory, &admin).is_ok());
        assert!(matches!(
            enforce(Operation::CreateCategory, &user),
            Err(AuthError::InsufficientRole)
        ));
        assert!(matches!(
            enforce(Operation::CreateCategory, &anonymous_role),
            Err(AuthError::InsufficientRole)
        ));
    }

    #[test]
    fn test_admin_token_denied_on_user_only_operation() {
        // A valid admin token is still denied where the table demands User
        let admin = user_with(Some(Role::Admin));
        assert!(enforce(Operation::ListAccounts, &admin).is_ok());
        assert!(matches!(
            enforce(Operation::CreateOrder, &admin),
            Err(AuthError::InsufficientRole)
        ));
    }

    #[test]
    fn test_absent_role_passes_authenticated_only() {
        let no_role = user_with(None);
        assert!(enforce(Operation::ListCategories, &no_role).is_ok());
        assert!(enforce(Operation::ListOrchids, &no_role).is_err());
        assert!(enforce(Operation::CreateOrder, &no_role).is_err());
    }
}
