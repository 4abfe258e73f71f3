// Copyright 2024 Helix Platform
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The static policy tables: role hierarchy, permission matrix, route access,
//! and feature flags.
//!
//! Tables are built once (from the compiled hospital defaults or a JSON file),
//! validated, and then shared read-only behind an `Arc`. There is no mutation
//! API; changing policy means shipping new tables.

use crate::errors::SecurityError;
use crate::routes::{RouteAccessMap, RouteRule};
use hms_core::{Action, Resource, Role, RolePermissions};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;

/// Role to rank; higher ranks dominate lower ones in explicit comparisons only.
pub type RoleHierarchy = BTreeMap<Role, u32>;

/// Role to its resource/action grants.
pub type PermissionMatrix = BTreeMap<Role, RolePermissions>;

/// Role to feature-flag name to enabled.
pub type FeatureAccessMap = BTreeMap<Role, BTreeMap<String, bool>>;

/// Compiled hospital defaults, built on first use.
pub static DEFAULT_TABLES: Lazy<Arc<PolicyTables>> =
    Lazy::new(|| Arc::new(PolicyTables::hospital_defaults()));

/// All four policy tables as one immutable value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyTables {
    /// Rank per role.
    pub hierarchy: RoleHierarchy,
    /// Resource/action grants per role.
    pub permissions: PermissionMatrix,
    /// Route patterns and the roles allowed through them, in declaration order.
    pub routes: RouteAccessMap,
    /// UI feature flags per role.
    #[serde(default)]
    pub features: FeatureAccessMap,
}

impl PolicyTables {
    /// Parses and validates tables from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, SecurityError> {
        let tables: PolicyTables = serde_json::from_str(json)?;
        tables.validate()?;
        Ok(tables)
    }

    /// Reads, parses, and validates tables from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SecurityError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let tables = Self::from_json_str(&raw)?;
        tracing::info!(
            path = %path.display(),
            roles = tables.hierarchy.len(),
            routes = tables.routes.len(),
            "Loaded policy tables"
        );
        Ok(tables)
    }

    /// Serializes the tables as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, SecurityError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks the cross-table invariants.
    ///
    /// Every role named by the permission matrix, the feature table, or a
    /// route rule must have a rank; route patterns must be well formed and
    /// unique.
    pub fn validate(&self) -> Result<(), SecurityError> {
        let referenced = self
            .permissions
            .keys()
            .chain(self.features.keys())
            .chain(self.routes.rules().iter().flat_map(|rule| rule.roles.iter()));
        for role in referenced {
            if !self.hierarchy.contains_key(role) {
                return Err(SecurityError::InvalidTable(format!(
                    "role {} is used but has no rank in the hierarchy",
                    role
                )));
            }
        }
        self.routes.validate()
    }

    /// The hospital's standard tables.
    pub fn hospital_defaults() -> Self {
        Self {
            hierarchy: default_hierarchy(),
            permissions: default_permissions(),
            routes: default_routes(),
            features: default_features(),
        }
    }
}

fn grants(entries: &[(Resource, &[Action])]) -> RolePermissions {
    entries
        .iter()
        .map(|(resource, actions)| (*resource, actions.iter().copied().collect::<BTreeSet<_>>()))
        .collect()
}

fn flags(names: &[&str]) -> BTreeMap<String, bool> {
    names.iter().map(|name| (name.to_string(), true)).collect()
}

fn default_hierarchy() -> RoleHierarchy {
    BTreeMap::from([
        (Role::Admin, 100),
        (Role::Doctor, 80),
        (Role::Nurse, 60),
        (Role::Receptionist, 50),
        (Role::Pharmacist, 50),
        (Role::Patient, 20),
    ])
}

fn default_permissions() -> PermissionMatrix {
    use Action::*;
    use Resource::*;

    // Settings grants below are for the user's own settings only.
    BTreeMap::from([
        (
            Role::Admin,
            grants(&[
                (Users, &[Manage]),
                (Patients, &[Manage]),
                (Doctors, &[Manage]),
                (Nurses, &[Manage]),
                (Appointments, &[Manage]),
                (Prescriptions, &[Manage]),
                (Billing, &[Manage]),
                (Departments, &[Manage]),
                (Inventory, &[Manage]),
                (Reports, &[Manage, Export]),
                (Settings, &[Manage]),
                (Staff, &[Manage]),
                (AuditLogs, &[Read]),
                (Notifications, &[Manage]),
                (MedicalRecords, &[Manage]),
            ]),
        ),
        (
            Role::Doctor,
            grants(&[
                (Patients, &[Read, Update]),
                (Appointments, &[Read, Update]),
                (Prescriptions, &[Create, Read, Update]),
                (MedicalRecords, &[Create, Read, Update]),
                (Reports, &[Read, Export]),
                (Departments, &[Read]),
                (Notifications, &[Read]),
                (Settings, &[Read, Update]),
            ]),
        ),
        (
            Role::Nurse,
            grants(&[
                (Patients, &[Read, Update]),
                (Appointments, &[Read]),
                (Prescriptions, &[Read]),
                (MedicalRecords, &[Read, Update]),
                (Departments, &[Read]),
                (Notifications, &[Read]),
                (Settings, &[Read, Update]),
            ]),
        ),
        (
            Role::Patient,
            grants(&[
                (Appointments, &[Create, Read]),
                (Prescriptions, &[Read]),
                (Billing, &[Read]),
                (MedicalRecords, &[Read]),
                (Doctors, &[Read]),
                (Departments, &[Read]),
                (Notifications, &[Read]),
                (Settings, &[Read, Update]),
            ]),
        ),
        (
            Role::Receptionist,
            grants(&[
                (Patients, &[Create, Read, Update]),
                (Appointments, &[Create, Read, Update]),
                (Doctors, &[Read]),
                (Departments, &[Read]),
                (Billing, &[Read]),
                (Notifications, &[Read]),
                (Settings, &[Read, Update]),
            ]),
        ),
        (
            Role::Pharmacist,
            grants(&[
                (Prescriptions, &[Read, Update]),
                (Inventory, &[Create, Read, Update]),
                (Patients, &[Read]),
                (Reports, &[Read]),
                (Notifications, &[Read]),
                (Settings, &[Read, Update]),
            ]),
        ),
    ])
}

fn default_routes() -> RouteAccessMap {
    use Role::*;

    RouteAccessMap::new(vec![
        RouteRule::new("/admin", &[Admin]),
        RouteRule::new("/admin/*", &[Admin]),
        RouteRule::new("/doctor", &[Doctor, Admin]),
        RouteRule::new("/doctor/*", &[Doctor, Admin]),
        RouteRule::new("/nurse", &[Nurse, Admin]),
        RouteRule::new("/nurse/*", &[Nurse, Admin]),
        RouteRule::new("/patient", &[Patient, Admin]),
        RouteRule::new("/patient/*", &[Patient, Admin]),
        RouteRule::new("/receptionist", &[Receptionist, Admin]),
        RouteRule::new("/receptionist/*", &[Receptionist, Admin]),
        RouteRule::new("/pharmacist", &[Pharmacist, Admin]),
        RouteRule::new("/pharmacist/*", &[Pharmacist, Admin]),
        RouteRule::new("/patients", &[Admin, Doctor, Nurse, Receptionist]),
        RouteRule::new("/doctors", &[Admin, Patient, Receptionist]),
        RouteRule::new("/appointments", &[Admin, Doctor, Nurse, Patient, Receptionist]),
        RouteRule::new("/billing", &[Admin, Patient, Receptionist]),
        RouteRule::new("/prescriptions", &[Admin, Doctor, Patient, Pharmacist]),
        RouteRule::new("/inventory", &[Admin, Pharmacist]),
        RouteRule::new("/reports", &[Admin, Doctor]),
        RouteRule::new("/settings", &[Admin]),
    ])
}

fn default_features() -> FeatureAccessMap {
    BTreeMap::from([
        (
            Role::Admin,
            flags(&[
                "dashboard",
                "userManagement",
                "staffManagement",
                "patientManagement",
                "doctorManagement",
                "nurseManagement",
                "appointmentManagement",
                "prescriptionManagement",
                "billingManagement",
                "departmentManagement",
                "inventoryManagement",
                "reports",
                "systemSettings",
                "auditLogs",
                "notifications",
            ]),
        ),
        (
            Role::Doctor,
            flags(&[
                "dashboard",
                "patientManagement",
                "appointmentManagement",
                "prescriptionManagement",
                "medicalRecords",
                "schedule",
                "reports",
                "notifications",
                "profile",
            ]),
        ),
        (
            Role::Nurse,
            flags(&[
                "dashboard",
                "patientCare",
                "taskManagement",
                "wardManagement",
                "schedule",
                "handoverNotes",
                "medicalRecords",
                "notifications",
                "profile",
            ]),
        ),
        (
            Role::Patient,
            flags(&[
                "dashboard",
                "bookAppointment",
                "viewAppointments",
                "medicalRecords",
                "prescriptions",
                "billing",
                "findDoctors",
                "notifications",
                "profile",
            ]),
        ),
        (
            Role::Receptionist,
            flags(&[
                "dashboard",
                "patientRegistration",
                "appointmentManagement",
                "checkIn",
                "patientSearch",
                "notifications",
                "profile",
            ]),
        ),
        (
            Role::Pharmacist,
            flags(&[
                "dashboard",
                "prescriptionQueue",
                "dispenseMedication",
                "inventoryManagement",
                "stockManagement",
                "reports",
                "notifications",
                "profile",
            ]),
        ),
    ])
}
