use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tessera_core::AppError;

/// Permission tags recognized by the catalog.
///
/// The catalog is a process-wide constant, identical across tenants. Roles
/// carry subsets of it; membership is checked by exact match during role
/// validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Access to the dashboard surface.
    Dashboard,
    /// Access to accounting features.
    Accounting,
    /// Access to sales features.
    Sales,
    /// Access to customer records.
    Customers,
    /// Access to vendor records.
    Vendors,
    /// Access to banking features.
    Banking,
    /// Access to reporting features.
    Reports,
    /// Access to payroll features.
    Payroll,
    /// Access to inventory features.
    Inventory,
    /// Access to company-wide settings.
    CompanySettings,
    /// Access to user and role administration.
    UserManagement,
}

impl Permission {
    /// Returns a stable storage value for this permission.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Accounting => "accounting",
            Self::Sales => "sales",
            Self::Customers => "customers",
            Self::Vendors => "vendors",
            Self::Banking => "banking",
            Self::Reports => "reports",
            Self::Payroll => "payroll",
            Self::Inventory => "inventory",
            Self::CompanySettings => "company_settings",
            Self::UserManagement => "user_management",
        }
    }

    /// Returns the full permission catalog.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Permission] = &[
            Permission::Dashboard,
            Permission::Accounting,
            Permission::Sales,
            Permission::Customers,
            Permission::Vendors,
            Permission::Banking,
            Permission::Reports,
            Permission::Payroll,
            Permission::Inventory,
            Permission::CompanySettings,
            Permission::UserManagement,
        ];

        ALL
    }

    /// Parses a transport value into a permission. Unknown tags are
    /// rejected, never silently dropped.
    pub fn from_transport(value: &str) -> Result<Self, AppError> {
        Self::from_str(value)
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "dashboard" => Ok(Self::Dashboard),
            "accounting" => Ok(Self::Accounting),
            "sales" => Ok(Self::Sales),
            "customers" => Ok(Self::Customers),
            "vendors" => Ok(Self::Vendors),
            "banking" => Ok(Self::Banking),
            "reports" => Ok(Self::Reports),
            "payroll" => Ok(Self::Payroll),
            "inventory" => Ok(Self::Inventory),
            "company_settings" => Ok(Self::CompanySettings),
            "user_management" => Ok(Self::UserManagement),
            _ => Err(AppError::Validation(format!(
                "unknown permission value '{value}'"
            ))),
        }
    }
}
