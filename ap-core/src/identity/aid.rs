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

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::identity::PlatformId;

/// Uniquely identifies an agent within and across platforms (an AID).
///
/// An identity combines a random token, an optional logical name, an
/// optional module qualifier, and the identifier of the hosting platform.
/// It is immutable once constructed. The string form is
/// `<name-or-token>[#<qualifier>]@<platform-id>`; the AMS of a platform is
/// always `ams@<platform-id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentIdentity {
    token: Uuid,
    name: Option<String>,
    qualifier: Option<String>,
    platform: PlatformId,
}

impl AgentIdentity {
    /// Mints an anonymous identity; its token stands in for a name.
    pub fn new(platform: PlatformId) -> Self {
        AgentIdentity {
            token: Uuid::new_v4(),
            name: None,
            qualifier: None,
            platform,
        }
    }

    /// Mints an identity with a logical name.
    pub fn named(name: impl Into<String>, platform: PlatformId) -> Self {
        AgentIdentity {
            token: Uuid::new_v4(),
            name: Some(name.into()),
            qualifier: None,
            platform,
        }
    }

    /// Attaches a module qualifier, rendered after `#` in the string form.
    #[must_use]
    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }

    /// The random token backing global uniqueness.
    pub fn token(&self) -> Uuid {
        self.token
    }

    /// The logical name, if one was assigned.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The module qualifier, if one was assigned.
    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    /// The identifier of the hosting platform.
    pub fn platform(&self) -> PlatformId {
        self.platform
    }
}

impl fmt::Display for AgentIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name}")?,
            None => write!(f, "{}", self.token)?,
        }
        if let Some(qualifier) = &self.qualifier {
            write!(f, "#{qualifier}")?;
        }
        write!(f, "@{}", self.platform)
    }
}
