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

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use crate::identity::AgentIdentity;
use crate::message::MessageEnvelope;
use crate::transport::{Delivery, MessageTransportService, TransportError};

/// What an agent's behavior sees while it runs: its own identity and the
/// platform's transport service for sending envelopes.
#[derive(Debug, Clone)]
pub struct TaskContext {
    identity: AgentIdentity,
    transport: Arc<MessageTransportService>,
}

impl TaskContext {
    pub(crate) fn new(identity: AgentIdentity, transport: Arc<MessageTransportService>) -> Self {
        TaskContext { identity, transport }
    }

    /// The identity of the agent this task belongs to.
    pub fn identity(&self) -> &AgentIdentity {
        &self.identity
    }

    /// Sends an opaque payload to another agent via the transport service.
    pub fn send_to(
        &self,
        receiver: &AgentIdentity,
        payload: impl Into<Vec<u8>>,
    ) -> Result<Delivery, TransportError> {
        let envelope =
            MessageEnvelope::new(self.identity.clone(), receiver.clone(), payload.into());
        self.transport.deliver(envelope)
    }

    /// Hands a fully formed envelope to the transport service.
    pub fn deliver(&self, envelope: MessageEnvelope) -> Result<Delivery, TransportError> {
        self.transport.deliver(envelope)
    }
}

/// The executable behavior an agent is composed with.
///
/// The agent's runner calls [`run_unit`](AgentTask::run_unit) repeatedly
/// while the agent is `ACTIVE`, and between units applies pending control
/// signals and hands pending envelopes to
/// [`on_envelope`](AgentTask::on_envelope). A unit of work is therefore
/// never interrupted by a life-cycle command.
#[async_trait]
pub trait AgentTask: Send + 'static {
    /// One unit of work. Errors are logged and do not stop the agent.
    async fn run_unit(&mut self, ctx: &mut TaskContext) -> anyhow::Result<()>;

    /// Called for each envelope arriving on the inbound channel.
    async fn on_envelope(
        &mut self,
        _envelope: MessageEnvelope,
        _ctx: &mut TaskContext,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    /// Whether the task honors a graceful quit. Forced destruction by the
    /// AMS does not consult this.
    fn accept_quit(&self) -> bool {
        true
    }
}

/// A behavior that does nothing but yield; backs the AMS's own agent and
/// is handy for agents that only receive.
#[derive(Debug, Default)]
pub struct IdleTask;

#[async_trait]
impl AgentTask for IdleTask {
    async fn run_unit(&mut self, _ctx: &mut TaskContext) -> anyhow::Result<()> {
        sleep(Duration::from_millis(25)).await;
        Ok(())
    }
}
