//! Permission and role models.

use super::errors::{PermissionError, PermissionResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A single grantable capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ManageBoxers,
    ManageFightCards,
    DeclareResults,
    ManageBetting,
    PlaceBets,
    SettleBets,
    ManageTournaments,
    ManageSettings,
}

impl Permission {
    /// Every permission, in declaration order
    pub const ALL: [Permission; 8] = [
        Permission::ManageBoxers,
        Permission::ManageFightCards,
        Permission::DeclareResults,
        Permission::ManageBetting,
        Permission::PlaceBets,
        Permission::SettleBets,
        Permission::ManageTournaments,
        Permission::ManageSettings,
    ];
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Permission::ManageBoxers => write!(f, "manage_boxers"),
            Permission::ManageFightCards => write!(f, "manage_fight_cards"),
            Permission::DeclareResults => write!(f, "declare_results"),
            Permission::ManageBetting => write!(f, "manage_betting"),
            Permission::PlaceBets => write!(f, "place_bets"),
            Permission::SettleBets => write!(f, "settle_bets"),
            Permission::ManageTournaments => write!(f, "manage_tournaments"),
            Permission::ManageSettings => write!(f, "manage_settings"),
        }
    }
}

/// Association staff role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Everything
    Admin,
    /// Runs events: cards, results, tournaments
    Commissioner,
    /// Betting desk: takes and settles bets
    Cashier,
    /// Read-only
    Viewer,
}

impl Role {
    /// Default grants for this role
    pub fn grants(self) -> &'static [Permission] {
        match self {
            Role::Admin => &Permission::ALL,
            Role::Commissioner => &[
                Permission::ManageBoxers,
                Permission::ManageFightCards,
                Permission::DeclareResults,
                Permission::ManageTournaments,
            ],
            Role::Cashier => &[
                Permission::ManageBetting,
                Permission::PlaceBets,
                Permission::SettleBets,
            ],
            Role::Viewer => &[],
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Commissioner => write!(f, "commissioner"),
            Role::Cashier => write!(f, "cashier"),
            Role::Viewer => write!(f, "viewer"),
        }
    }
}

impl FromStr for Role {
    type Err = PermissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "commissioner" => Ok(Role::Commissioner),
            "cashier" => Ok(Role::Cashier),
            "viewer" => Ok(Role::Viewer),
            other => Err(PermissionError::UnknownRole(other.to_string())),
        }
    }
}

/// Capability set passed into operations that need authorization
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    granted: BTreeSet<Permission>,
}

impl Permissions {
    /// Empty capability set
    pub fn none() -> Self {
        Self::default()
    }

    /// Every capability
    pub fn all() -> Self {
        Self::for_role(Role::Admin)
    }

    /// Default capabilities of a role
    pub fn for_role(role: Role) -> Self {
        role.grants().iter().copied().collect()
    }

    /// Add a single grant
    pub fn with(mut self, permission: Permission) -> Self {
        self.granted.insert(permission);
        self
    }

    pub fn has(&self, permission: Permission) -> bool {
        self.granted.contains(&permission)
    }

    /// Fail with [`PermissionError::Missing`] unless the grant is present
    pub fn require(&self, permission: Permission) -> PermissionResult<()> {
        if self.has(permission) {
            Ok(())
        } else {
            Err(PermissionError::Missing(permission))
        }
    }
}

impl FromIterator<Permission> for Permissions {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self {
            granted: iter.into_iter().collect(),
        }
    }
}
