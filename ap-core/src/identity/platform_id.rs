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
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use tracing::warn;

/// Identifies the platform hosting a set of agents.
///
/// Derived from the machine's hardware network identifier and rendered as
/// 12 lowercase hex characters (six byte pairs, no separators). Machines
/// without a usable network interface get a random identifier instead, so
/// a platform always has one.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlatformId([u8; 6]);

/// Error returned when parsing a platform identifier from its string form.
#[derive(Debug, Clone, Error)]
#[error("platform id must be exactly 12 hex characters")]
pub struct PlatformIdParseError;

impl PlatformId {
    /// Reads the hardware network identifier of the local machine.
    pub fn detect() -> Self {
        match mac_address::get_mac_address() {
            Ok(Some(mac)) => PlatformId(mac.bytes()),
            Ok(None) => {
                warn!("no hardware address available, using a random platform id");
                Self::random()
            }
            Err(error) => {
                warn!(%error, "hardware address lookup failed, using a random platform id");
                Self::random()
            }
        }
    }

    fn random() -> Self {
        PlatformId(rand::random())
    }

    /// Builds a platform identifier from raw bytes.
    pub const fn from_bytes(bytes: [u8; 6]) -> Self {
        PlatformId(bytes)
    }

    /// The raw identifier bytes.
    pub const fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }
}

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlatformId({self})")
    }
}

impl FromStr for PlatformId {
    type Err = PlatformIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 12 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(PlatformIdParseError);
        }
        let mut bytes = [0u8; 6];
        for (index, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&s[index * 2..index * 2 + 2], 16)
                .map_err(|_| PlatformIdParseError)?;
        }
        Ok(PlatformId(bytes))
    }
}

impl Serialize for PlatformId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PlatformId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rendered = String::deserialize(deserializer)?;
        rendered.parse().map_err(de::Error::custom)
    }
}
