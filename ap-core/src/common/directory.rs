/*
 * Copyright (c) 2024. Govcraft
 *
 * Licensed under either of
 *   * Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at http://www.apache.org/licenses/LICENSE-2.0
 *   * MIT license: http://opensource.org/licenses/MIT
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the applicable License for the specific language governing permissions and
 * limitations under that License.
 */

use std::collections::HashMap;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::identity::AgentIdentity;

/// A service offering registered with a Directory Facilitator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDescription {
    /// The agent offering the service.
    pub aid: AgentIdentity,
    /// The kind of service offered.
    pub service_type: String,
    /// Free-form service properties.
    pub properties: HashMap<String, String>,
}

impl ServiceDescription {
    /// Describes a service of the given type offered by `aid`.
    pub fn new(aid: AgentIdentity, service_type: impl Into<String>) -> Self {
        ServiceDescription {
            aid,
            service_type: service_type.into(),
            properties: HashMap::new(),
        }
    }

    /// Attaches a property to the description.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// What a directory search matches on; empty criteria match everything.
#[derive(Debug, Clone, Default)]
pub struct SearchCriteria {
    /// Match descriptions of this service type.
    pub service_type: Option<String>,
    /// Match descriptions carrying this property key/value pair.
    pub property: Option<(String, String)>,
}

/// Errors surfaced by directory operations.
#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    /// No service description is registered for the AID.
    #[error("no service registered for {0}")]
    NotRegistered(AgentIdentity),
}

/// The yellow-pages service registry of a platform.
///
/// A keyed store, nothing more; several facilitators may exist on one
/// platform. Federation between facilitators is out of scope.
#[derive(Debug, Default)]
pub struct DirectoryFacilitator {
    services: DashMap<AgentIdentity, ServiceDescription>,
}

impl DirectoryFacilitator {
    /// Registers a service description, replacing any previous one for the
    /// same agent.
    pub fn register(&self, description: ServiceDescription) {
        debug!(agent = %description.aid, service = %description.service_type, "service registered");
        self.services.insert(description.aid.clone(), description);
    }

    /// Removes an agent's service description.
    pub fn deregister(&self, aid: &AgentIdentity) -> Result<(), DirectoryError> {
        self.services
            .remove(aid)
            .map(|_| debug!(agent = %aid, "service deregistered"))
            .ok_or_else(|| DirectoryError::NotRegistered(aid.clone()))
    }

    /// Replaces an existing service description.
    pub fn modify(&self, description: ServiceDescription) -> Result<(), DirectoryError> {
        if !self.services.contains_key(&description.aid) {
            return Err(DirectoryError::NotRegistered(description.aid));
        }
        self.services.insert(description.aid.clone(), description);
        Ok(())
    }

    /// Returns every registered description matching the criteria.
    pub fn search(&self, criteria: &SearchCriteria) -> Vec<ServiceDescription> {
        self.services
            .iter()
            .filter(|entry| {
                let description = entry.value();
                if let Some(service_type) = &criteria.service_type {
                    if &description.service_type != service_type {
                        return false;
                    }
                }
                if let Some((key, value)) = &criteria.property {
                    if description.properties.get(key) != Some(value) {
                        return false;
                    }
                }
                true
            })
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Number of registered service descriptions.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Whether no service is registered.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}
