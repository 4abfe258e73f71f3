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

#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Core identifiers, errors, and policy traits shared by the hospital
//! management access-control crates.

pub mod errors;
pub mod policy;
pub mod types;

pub use errors::HmsError;
pub use policy::{AccessPolicy, RolePermissions};
pub use types::{permission_groups, Action, Permission, Resource, Role};
