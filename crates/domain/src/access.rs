//! Roles, capability flags, per-table sharing and the pure access policy.
//!
//! Precedence is fixed: the admin role short-circuits every check, then the
//! global capability flags apply, and per-table share roles only ever add
//! access for non-owners of that table.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tabula_core::{AppError, UserId};
use uuid::Uuid;

use crate::{DynamicTable, TableId};

/// Coarse global role of a user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular user; capability flags decide.
    #[default]
    User,
    /// Administrator; passes every check.
    Admin,
    /// Manager; capability flags decide.
    Manager,
}

impl Role {
    /// Returns a stable storage value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
            Self::Manager => "manager",
        }
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            _ => Err(AppError::Validation(format!("unknown role '{value}'"))),
        }
    }
}

/// Named capability guarded by a boolean flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Create dynamic tables.
    CreateTables,
    /// Edit every dynamic table's schema and rows.
    EditTables,
    /// Delete dynamic tables.
    DeleteTables,
    /// Read the audit trail.
    ViewAuditLogs,
    /// List and administer users.
    ManageUsers,
}

impl Capability {
    /// Returns the flag name used in storage and transport.
    #[must_use]
    pub fn flag_name(&self) -> &'static str {
        match self {
            Self::CreateTables => "can_create_tables",
            Self::EditTables => "can_edit_tables",
            Self::DeleteTables => "can_delete_tables",
            Self::ViewAuditLogs => "can_view_audit_logs",
            Self::ManageUsers => "can_manage_users",
        }
    }

    /// Returns all capabilities.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Capability] = &[
            Capability::CreateTables,
            Capability::EditTables,
            Capability::DeleteTables,
            Capability::ViewAuditLogs,
            Capability::ManageUsers,
        ];

        ALL
    }
}

/// Per-user capability grants; absent flags are false.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapabilityFlags {
    /// Grants [`Capability::CreateTables`].
    pub can_create_tables: bool,
    /// Grants [`Capability::EditTables`].
    pub can_edit_tables: bool,
    /// Grants [`Capability::DeleteTables`].
    pub can_delete_tables: bool,
    /// Grants [`Capability::ViewAuditLogs`].
    pub can_view_audit_logs: bool,
    /// Grants [`Capability::ManageUsers`].
    pub can_manage_users: bool,
}

impl CapabilityFlags {
    /// Returns whether the flag for a capability is set.
    #[must_use]
    pub fn grants(&self, capability: Capability) -> bool {
        match capability {
            Capability::CreateTables => self.can_create_tables,
            Capability::EditTables => self.can_edit_tables,
            Capability::DeleteTables => self.can_delete_tables,
            Capability::ViewAuditLogs => self.can_view_audit_logs,
            Capability::ManageUsers => self.can_manage_users,
        }
    }
}

/// Profile of a user as seen by the permission evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Stable user id shared with the auth provider.
    pub id: UserId,
    /// Full name, if set.
    pub full_name: Option<String>,
    /// Email, if known.
    pub email: Option<String>,
    /// Department used by the task board.
    pub department: Option<String>,
    /// Global role.
    pub role: Role,
    /// Optional capability grants.
    pub permissions: Option<CapabilityFlags>,
}

impl UserProfile {
    /// Returns the best available display label.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .or(self.email.as_deref())
            .unwrap_or("Unknown user")
    }

    /// Returns the JSON snapshot recorded in audit entries.
    #[must_use]
    pub fn snapshot(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "full_name": self.full_name,
            "email": self.email,
            "department": self.department,
            "role": self.role.as_str(),
            "permissions": self.permissions,
        })
    }
}

/// Role granted on one shared table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableShareRole {
    /// Read-only access.
    Viewer,
    /// Read and write access to rows and schema.
    Editor,
}

impl TableShareRole {
    /// Returns a stable storage value for this share role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Editor => "editor",
        }
    }
}

impl FromStr for TableShareRole {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "viewer" => Ok(Self::Viewer),
            "editor" => Ok(Self::Editor),
            _ => Err(AppError::Validation(format!(
                "unknown table share role '{value}'"
            ))),
        }
    }
}

/// Explicit share of a table with a non-owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TablePermission {
    /// Share id.
    pub id: Uuid,
    /// Shared table.
    pub table_id: TableId,
    /// Grantee.
    pub user_id: UserId,
    /// Granted role.
    pub role: TableShareRole,
    /// Grant timestamp.
    pub created_at: DateTime<Utc>,
}

impl TablePermission {
    /// Returns the JSON snapshot recorded in audit entries.
    #[must_use]
    pub fn snapshot(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "table_id": self.table_id,
            "user_id": self.user_id,
            "role": self.role.as_str(),
        })
    }
}

/// Effective access of an actor on one table, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TableAccess {
    /// No access.
    None,
    /// Read rows and schema.
    View,
    /// Mutate rows and schema.
    Edit,
    /// Edit plus sharing management.
    Full,
}

impl TableAccess {
    /// Returns whether rows and schema can be read.
    #[must_use]
    pub fn can_view(self) -> bool {
        self >= Self::View
    }

    /// Returns whether rows and schema can be mutated.
    #[must_use]
    pub fn can_edit(self) -> bool {
        self >= Self::Edit
    }

    /// Returns whether sharing can be managed.
    #[must_use]
    pub fn can_share(self) -> bool {
        self == Self::Full
    }
}

/// Returns whether the actor holds a capability.
#[must_use]
pub fn has_capability(actor: &UserProfile, capability: Capability) -> bool {
    actor.role == Role::Admin
        || actor
            .permissions
            .map(|flags| flags.grants(capability))
            .unwrap_or(false)
}

/// Returns whether the actor may change roles and capability flags.
#[must_use]
pub fn can_manage_permissions(actor: &UserProfile) -> bool {
    actor.role == Role::Admin
}

/// Resolves the actor's access on a table from role, flags and share.
#[must_use]
pub fn table_access(
    actor: &UserProfile,
    table: &DynamicTable,
    share: Option<&TablePermission>,
) -> TableAccess {
    if actor.role == Role::Admin || table.owner_id() == actor.id {
        return TableAccess::Full;
    }

    let from_flags = if has_capability(actor, Capability::EditTables) {
        TableAccess::Edit
    } else {
        TableAccess::None
    };

    let from_share = share
        .filter(|share| share.table_id == table.id() && share.user_id == actor.id)
        .map(|share| match share.role {
            TableShareRole::Editor => TableAccess::Edit,
            TableShareRole::Viewer => TableAccess::View,
        })
        .unwrap_or(TableAccess::None);

    from_flags.max(from_share)
}
