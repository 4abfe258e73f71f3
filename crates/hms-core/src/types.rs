//! Closed identifier sets used by the access-control layer.
//!
//! Roles, resources, and actions arrive from callers as plain strings. Roles
//! must match their canonical identifier exactly. Resource and action parsing
//! is ASCII case-insensitive, so `"settings"` and `"SETTINGS"` name the same
//! [`Resource`]. Anything outside the enumeration is rejected with
//! [`HmsError::UnknownIdentifier`].

use crate::errors::HmsError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Class of system user, assigned externally at login time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Hospital administrator.
    Admin,
    /// Attending physician.
    Doctor,
    /// Ward or clinic nurse.
    Nurse,
    /// Registered patient.
    Patient,
    /// Front-desk staff handling registration and check-in.
    Receptionist,
    /// Dispensary staff.
    Pharmacist,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Role; 6] = [
        Role::Admin,
        Role::Doctor,
        Role::Nurse,
        Role::Patient,
        Role::Receptionist,
        Role::Pharmacist,
    ];

    /// Canonical identifier, e.g. `"RECEPTIONIST"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Doctor => "DOCTOR",
            Role::Nurse => "NURSE",
            Role::Patient => "PATIENT",
            Role::Receptionist => "RECEPTIONIST",
            Role::Pharmacist => "PHARMACIST",
        }
    }

    /// Parses a role identifier, returning `None` when it is not recognised.
    ///
    /// Matching is exact: `"admin"` is not a role.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.as_str() == value)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = HmsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| HmsError::unknown("role", s))
    }
}

/// A protected entity class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Resource {
    /// User accounts.
    Users,
    /// Patient records and registration.
    Patients,
    /// Doctor directory and profiles.
    Doctors,
    /// Nursing staff.
    Nurses,
    /// Appointment bookings.
    Appointments,
    /// Prescriptions and dispensing.
    Prescriptions,
    /// Bills, payments, and insurance claims.
    Billing,
    /// Hospital departments.
    Departments,
    /// Pharmacy and supply inventory.
    Inventory,
    /// Clinical and financial reports.
    Reports,
    /// System and personal settings.
    Settings,
    /// In-app notifications.
    Notifications,
    /// Medical history, vitals, and notes.
    MedicalRecords,
    /// Staff administration.
    Staff,
    /// Security audit trail.
    AuditLogs,
}

impl Resource {
    /// Every resource, in declaration order.
    pub const ALL: [Resource; 15] = [
        Resource::Users,
        Resource::Patients,
        Resource::Doctors,
        Resource::Nurses,
        Resource::Appointments,
        Resource::Prescriptions,
        Resource::Billing,
        Resource::Departments,
        Resource::Inventory,
        Resource::Reports,
        Resource::Settings,
        Resource::Notifications,
        Resource::MedicalRecords,
        Resource::Staff,
        Resource::AuditLogs,
    ];

    /// Canonical identifier, e.g. `"MEDICAL_RECORDS"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Users => "USERS",
            Resource::Patients => "PATIENTS",
            Resource::Doctors => "DOCTORS",
            Resource::Nurses => "NURSES",
            Resource::Appointments => "APPOINTMENTS",
            Resource::Prescriptions => "PRESCRIPTIONS",
            Resource::Billing => "BILLING",
            Resource::Departments => "DEPARTMENTS",
            Resource::Inventory => "INVENTORY",
            Resource::Reports => "REPORTS",
            Resource::Settings => "SETTINGS",
            Resource::Notifications => "NOTIFICATIONS",
            Resource::MedicalRecords => "MEDICAL_RECORDS",
            Resource::Staff => "STAFF",
            Resource::AuditLogs => "AUDIT_LOGS",
        }
    }

    /// Parses a resource identifier, returning `None` when it is not recognised.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|resource| value.eq_ignore_ascii_case(resource.as_str()))
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = HmsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| HmsError::unknown("resource", s))
    }
}

/// An operation on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// Create new entries.
    Create,
    /// Read entries.
    Read,
    /// Modify existing entries.
    Update,
    /// Remove entries.
    Delete,
    /// Full control; implies every other action on the same resource.
    Manage,
    /// Read-only view.
    View,
    /// Export data out of the system.
    Export,
    /// Import data into the system.
    Import,
}

impl Action {
    /// Every action, in declaration order.
    pub const ALL: [Action; 8] = [
        Action::Create,
        Action::Read,
        Action::Update,
        Action::Delete,
        Action::Manage,
        Action::View,
        Action::Export,
        Action::Import,
    ];

    /// Canonical identifier, e.g. `"UPDATE"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "CREATE",
            Action::Read => "READ",
            Action::Update => "UPDATE",
            Action::Delete => "DELETE",
            Action::Manage => "MANAGE",
            Action::View => "VIEW",
            Action::Export => "EXPORT",
            Action::Import => "IMPORT",
        }
    }

    /// Parses an action identifier, returning `None` when it is not recognised.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|action| value.eq_ignore_ascii_case(action.as_str()))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = HmsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| HmsError::unknown("action", s))
    }
}

/// A single `(resource, action)` grant.
///
/// The textual form is dotted and lowercase, e.g. `patients.read` or
/// `medical_records.update`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Permission {
    /// The protected entity class.
    pub resource: Resource,
    /// The operation on it.
    pub action: Action,
}

impl Permission {
    /// Creates a new permission.
    pub fn new(resource: Resource, action: Action) -> Self {
        Self { resource, action }
    }

    /// Human-readable label used on permission-management screens,
    /// e.g. `"Update Medical Records"`.
    pub fn label(&self) -> String {
        format!(
            "{} {}",
            title_case(self.action.as_str()),
            title_case(self.resource.as_str())
        )
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}.{}",
            self.resource.as_str().to_ascii_lowercase(),
            self.action.as_str().to_ascii_lowercase()
        )
    }
}

impl FromStr for Permission {
    type Err = HmsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (resource, action) = s
            .split_once('.')
            .ok_or_else(|| HmsError::unknown("permission", s))?;
        let resource = Resource::parse(resource).ok_or_else(|| HmsError::unknown("permission", s))?;
        let action = Action::parse(action).ok_or_else(|| HmsError::unknown("permission", s))?;
        Ok(Self { resource, action })
    }
}

/// Named permission groups for permission-management screens, in display
/// order.
pub fn permission_groups() -> Vec<(&'static str, Vec<Permission>)> {
    use Action::{Create, Delete, Export, Update, View};

    let crud = |resource: Resource| -> Vec<Permission> {
        [View, Create, Update, Delete]
            .into_iter()
            .map(|action| Permission::new(resource, action))
            .collect()
    };

    vec![
        ("User Management", crud(Resource::Users)),
        ("Patient Management", crud(Resource::Patients)),
        ("Appointments", crud(Resource::Appointments)),
        ("Billing", crud(Resource::Billing)),
        ("Prescriptions", crud(Resource::Prescriptions)),
        ("Inventory", crud(Resource::Inventory)),
        (
            "Reports",
            vec![
                Permission::new(Resource::Reports, View),
                Permission::new(Resource::Reports, Create),
                Permission::new(Resource::Reports, Export),
            ],
        ),
        (
            "System",
            vec![
                Permission::new(Resource::Settings, View),
                Permission::new(Resource::Settings, Update),
            ],
        ),
    ]
}

fn title_case(identifier: &str) -> String {
    identifier
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let lower = word.to_ascii_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_is_exact() {
        assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse("RECEPTIONIST"), Some(Role::Receptionist));
        assert_eq!(Role::parse("admin"), None);
        assert_eq!(Role::parse("aDmIn"), None);
        assert_eq!(Role::parse("Pharmacist"), None);
        assert!("admin".parse::<Role>().unwrap_err().is_unknown_identifier());
        assert_eq!(Role::parse("JANITOR"), None);
        assert_eq!(Role::parse(""), None);
        assert_eq!(Role::parse(" ADMIN"), None);
    }

    #[test]
    fn test_role_from_str_error() {
        let err = "SURGEON".parse::<Role>().unwrap_err();
        match err {
            HmsError::UnknownIdentifier { kind, value } => {
                assert_eq!(kind, "role");
                assert_eq!(value, "SURGEON");
            }
            e => panic!("Unexpected error type: {:?}", e),
        }
    }

    #[test]
    fn test_resource_parse_accepts_snake_case() {
        assert_eq!(Resource::parse("MEDICAL_RECORDS"), Some(Resource::MedicalRecords));
        assert_eq!(Resource::parse("medical_records"), Some(Resource::MedicalRecords));
        assert_eq!(Resource::parse("audit_logs"), Some(Resource::AuditLogs));
        assert_eq!(Resource::parse("medicalRecords"), None);
    }

    #[test]
    fn test_action_parse() {
        for action in Action::ALL {
            assert_eq!(Action::parse(action.as_str()), Some(action));
            assert_eq!(Action::parse(&action.as_str().to_lowercase()), Some(action));
        }
        assert_eq!(Action::parse("edit"), None);
    }

    #[test]
    fn test_serde_uses_canonical_identifiers() {
        assert_eq!(serde_json::to_string(&Role::Receptionist).unwrap(), "\"RECEPTIONIST\"");
        assert_eq!(
            serde_json::to_string(&Resource::MedicalRecords).unwrap(),
            "\"MEDICAL_RECORDS\""
        );
        let action: Action = serde_json::from_str("\"MANAGE\"").unwrap();
        assert_eq!(action, Action::Manage);
    }

    #[test]
    fn test_display_matches_as_str() {
        assert_eq!(Role::Doctor.to_string(), "DOCTOR");
        assert_eq!(Resource::AuditLogs.to_string(), "AUDIT_LOGS");
        assert_eq!(Action::Export.to_string(), "EXPORT");
    }

    #[test]
    fn test_permission_dotted_form() {
        let permission: Permission = "patients.read".parse().unwrap();
        assert_eq!(permission, Permission::new(Resource::Patients, Action::Read));
        assert_eq!(permission.to_string(), "patients.read");

        let permission: Permission = "MEDICAL_RECORDS.UPDATE".parse().unwrap();
        assert_eq!(permission.to_string(), "medical_records.update");
    }

    #[test]
    fn test_permission_rejects_malformed_input() {
        for input in ["patients", "patients.", ".read", "patients.edit", "wards.read", "a.b.c"] {
            let err = input.parse::<Permission>().unwrap_err();
            assert!(err.is_unknown_identifier(), "{} should be rejected", input);
        }
    }

    #[test]
    fn test_permission_label() {
        assert_eq!(
            Permission::new(Resource::MedicalRecords, Action::Update).label(),
            "Update Medical Records"
        );
        assert_eq!(Permission::new(Resource::Patients, Action::View).label(), "View Patients");
    }

    #[test]
    fn test_permission_groups_order() {
        let labels: Vec<_> = permission_groups().into_iter().map(|(label, _)| label).collect();
        assert_eq!(
            labels,
            vec![
                "User Management",
                "Patient Management",
                "Appointments",
                "Billing",
                "Prescriptions",
                "Inventory",
                "Reports",
                "System",
            ]
        );
    }

    #[test]
    fn test_permission_groups_contents() {
        let groups = permission_groups();
        let dotted = |index: usize| -> Vec<String> {
            groups[index].1.iter().map(|p| p.to_string()).collect()
        };
        assert_eq!(
            dotted(1),
            vec!["patients.view", "patients.create", "patients.update", "patients.delete"]
        );
        assert_eq!(dotted(6), vec!["reports.view", "reports.create", "reports.export"]);
        assert_eq!(dotted(7), vec!["settings.view", "settings.update"]);
        assert_eq!(groups[7].1[1].label(), "Update Settings");
    }
}
