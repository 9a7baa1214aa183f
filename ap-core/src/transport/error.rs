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

use thiserror::Error;

use crate::identity::AgentIdentity;

/// Errors surfaced by the message transport service.
///
/// All of them are recoverable, returned to the sender; none affects the
/// state or mailbox of any other agent.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The receiver AID has no route on this platform, or is destroyed.
    #[error("unknown recipient: {0}")]
    UnknownRecipient(AgentIdentity),
    /// Forwarding-entry resolution exceeded the configured chain depth.
    #[error("forwarding loop resolving {aid} after {depth} hops")]
    ForwardingLoop {
        /// The receiver whose resolution looped.
        aid: AgentIdentity,
        /// Number of hops taken before giving up.
        depth: usize,
    },
    /// Backpressure: the recipient's mailbox reached its configured capacity.
    #[error("mailbox full for {aid} (capacity {capacity})")]
    MailboxFull {
        /// The recipient whose mailbox is full.
        aid: AgentIdentity,
        /// The configured capacity.
        capacity: usize,
    },
}
