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

use derive_new::new;
use serde::{Deserialize, Serialize};
use static_assertions::assert_impl_all;

use crate::identity::{AgentIdentity, PlatformId};

/// Describes one transport an envelope may travel over: a transport type
/// tag, a transport-specific address, and free-form properties.
#[derive(new, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportDescription {
    /// Transport type tag, e.g. `local`.
    pub transport_type: String,
    /// Transport-specific address string.
    pub address: String,
    /// Additional transport properties.
    pub properties: HashMap<String, String>,
}

impl TransportDescription {
    /// The intra-platform transport description, addressed by platform id.
    pub(crate) fn local(platform: PlatformId) -> Self {
        TransportDescription::new("local".to_string(), platform.to_string(), HashMap::new())
    }
}

/// An envelope carrying an opaque payload between two agents.
///
/// The transport service guarantees at least one transport description is
/// present once platform-level addressing has been resolved; byte-level
/// payload encoding is outside this crate's scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageEnvelope {
    /// The identity of the sending agent.
    pub sender: AgentIdentity,
    /// The identity of the receiving agent; rewritten when forwarded.
    pub receiver: AgentIdentity,
    /// Ordered transport descriptions for this envelope.
    pub transports: Vec<TransportDescription>,
    /// Opaque payload bytes.
    pub payload: Vec<u8>,
}

impl MessageEnvelope {
    /// Creates an envelope with no transport descriptions yet; the transport
    /// service adds the local description during addressing resolution.
    pub fn new(sender: AgentIdentity, receiver: AgentIdentity, payload: Vec<u8>) -> Self {
        MessageEnvelope {
            sender,
            receiver,
            transports: Vec::new(),
            payload,
        }
    }

    /// Appends a transport description.
    #[must_use]
    pub fn via(mut self, transport: TransportDescription) -> Self {
        self.transports.push(transport);
        self
    }
}

assert_impl_all!(MessageEnvelope: Send, Sync);
