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

//! The Message Transport Service: delivery, buffering, and forwarding.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{instrument, trace, warn};

use crate::agent::AgentState;
use crate::common::{InboundSender, SharedStateMachine};
use crate::identity::{AgentIdentity, PlatformId};
use crate::message::{MessageEnvelope, TransportDescription};

pub use error::TransportError;
pub use mailbox::Mailbox;

mod error;
mod mailbox;

/// Outcome of a successful hand-off to the transport service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Pushed straight onto the recipient's task-visible inbound channel.
    Delivered,
    /// Appended to the recipient's mailbox, to be drained when it activates.
    Buffered,
}

/// One registered recipient: its inbound channel, its state machine view,
/// and the mailbox the service keeps on its behalf.
#[derive(Debug)]
struct Route {
    inbound: InboundSender,
    state: SharedStateMachine,
    mailbox: Arc<Mailbox>,
}

/// Routes envelopes to agent mailboxes and inbound channels.
///
/// The service owns every mailbox and forwarding entry; it never owns agent
/// state. Routing decisions are taken under the recipient's state lock, so
/// a delivery and a concurrent wake-up drain of the same agent serialize
/// while different recipients proceed in parallel. FIFO order is preserved
/// per (sender, recipient) pair.
#[derive(Debug)]
pub struct MessageTransportService {
    platform: PlatformId,
    routes: DashMap<AgentIdentity, Route>,
    forwards: DashMap<AgentIdentity, AgentIdentity>,
    mailbox_capacity: usize,
    max_forward_depth: usize,
}

impl MessageTransportService {
    pub(crate) fn new(
        platform: PlatformId,
        mailbox_capacity: usize,
        max_forward_depth: usize,
    ) -> Self {
        MessageTransportService {
            platform,
            routes: DashMap::new(),
            forwards: DashMap::new(),
            mailbox_capacity,
            max_forward_depth,
        }
    }

    /// Registers a recipient with the service, handing back the mailbox the
    /// service keeps for it so the agent's runner can drain it on wake-up.
    pub(crate) fn open_route(
        &self,
        aid: AgentIdentity,
        inbound: InboundSender,
        state: SharedStateMachine,
    ) -> Arc<Mailbox> {
        trace!(agent = %aid, "route opened");
        let mailbox = Arc::new(Mailbox::new(self.mailbox_capacity));
        self.routes.insert(
            aid,
            Route {
                inbound,
                state,
                mailbox: Arc::clone(&mailbox),
            },
        );
        mailbox
    }

    /// Removes a destroyed recipient; its buffered mail is discarded.
    /// Forwarding entries naming the recipient stay in place.
    pub(crate) fn close_route(&self, aid: &AgentIdentity) {
        if self.routes.remove(aid).is_some() {
            trace!(agent = %aid, "route closed");
        }
    }

    /// Installs a forwarding entry for a relocated agent.
    pub fn set_forwarding(&self, from: AgentIdentity, to: AgentIdentity) {
        trace!(%from, %to, "forwarding entry installed");
        self.forwards.insert(from, to);
    }

    /// Removes a forwarding entry.
    pub fn clear_forwarding(&self, from: &AgentIdentity) {
        if self.forwards.remove(from).is_some() {
            trace!(%from, "forwarding entry removed");
        }
    }

    /// Number of envelopes buffered for a recipient.
    pub fn buffered_count(&self, aid: &AgentIdentity) -> usize {
        self.routes
            .get(aid)
            .map(|route| route.mailbox.len())
            .unwrap_or(0)
    }

    /// Hands an envelope to the service for delivery.
    ///
    /// Forwarding entries are resolved first, bounded by the configured
    /// chain depth. The remaining decision follows the recipient's state:
    /// `ACTIVE` delivers, `INITIATED`/`WAITING`/`SUSPENDED` buffer (as does
    /// `TRANSIT` while no forwarding entry exists yet), and `UNKNOWN` or an
    /// unrouted AID fails with [`TransportError::UnknownRecipient`].
    #[instrument(skip(self, envelope), fields(sender = %envelope.sender, receiver = %envelope.receiver))]
    pub fn deliver(&self, mut envelope: MessageEnvelope) -> Result<Delivery, TransportError> {
        // Platform-level addressing resolution: every routed envelope
        // carries at least one transport description.
        if envelope.transports.is_empty() {
            envelope
                .transports
                .push(TransportDescription::local(self.platform));
        }

        let mut depth = 0usize;
        loop {
            let forward = self
                .forwards
                .get(&envelope.receiver)
                .map(|entry| entry.value().clone());
            if let Some(target) = forward {
                depth += 1;
                if depth > self.max_forward_depth {
                    warn!(receiver = %envelope.receiver, depth, "forwarding chain exceeded bound");
                    return Err(TransportError::ForwardingLoop {
                        aid: envelope.receiver,
                        depth,
                    });
                }
                trace!(from = %envelope.receiver, to = %target, "forwarding envelope");
                envelope.receiver = target;
                continue;
            }

            // Clone the route out of the map before taking the state lock;
            // no shard guard is held while waiting on a recipient.
            let Some((inbound, state, mailbox)) = self.routes.get(&envelope.receiver).map(|route| {
                (
                    route.inbound.clone(),
                    Arc::clone(&route.state),
                    Arc::clone(&route.mailbox),
                )
            }) else {
                return Err(TransportError::UnknownRecipient(envelope.receiver));
            };

            // Hold the recipient's state lock across the decision and the
            // hand-off so a concurrent wake-up drain cannot interleave.
            let machine = state.lock();
            return match machine.current() {
                AgentState::Active => match inbound.send(envelope) {
                    Ok(()) => Ok(Delivery::Delivered),
                    Err(failed) => Err(TransportError::UnknownRecipient(failed.0.receiver)),
                },
                AgentState::Initiated
                | AgentState::Waiting
                | AgentState::Suspended
                | AgentState::Transit => {
                    let aid = envelope.receiver.clone();
                    if mailbox.push(envelope) {
                        trace!(agent = %aid, "envelope buffered");
                        Ok(Delivery::Buffered)
                    } else {
                        Err(TransportError::MailboxFull {
                            aid,
                            capacity: self.mailbox_capacity,
                        })
                    }
                }
                AgentState::Unknown => Err(TransportError::UnknownRecipient(envelope.receiver)),
            };
        }
    }
}
