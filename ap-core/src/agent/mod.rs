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

//! The executing agent: its state machine, runner, and specification.

use std::process;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::trace;

use crate::common::{AgentHandle, ControlReceiver, InboundReceiver, InboundSender, SharedStateMachine};
use crate::identity::AgentIdentity;
use crate::traits::AgentTask;
use crate::transport::{Mailbox, MessageTransportService};

pub use lifecycle::{AgentState, AgentStateMachine, LifecycleError};

pub mod lifecycle;
mod runner;

/// An opaque reference to executable agent logic, handed to the AMS when
/// creating an agent. The source string is a path or handle the platform
/// does not interpret; packaging and installation stay out of scope.
#[derive(Debug, Clone)]
pub struct AgentSpecification {
    name: Option<String>,
    qualifier: Option<String>,
    source: String,
}

impl AgentSpecification {
    /// A specification pointing at the given agent-logic source.
    pub fn new(source: impl Into<String>) -> Self {
        AgentSpecification {
            name: None,
            qualifier: None,
            source: source.into(),
        }
    }

    /// Requests a logical name; unnamed agents get a token-form AID.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attaches a module qualifier to the minted AID.
    #[must_use]
    pub fn qualified(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }

    /// The requested logical name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The requested module qualifier, if any.
    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    /// The opaque source reference.
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// The executing unit of the platform.
///
/// An agent exclusively owns its state machine and its task; everything
/// else holds non-owning [`AgentHandle`]s. Construction leaves the agent
/// `INITIATED`; the runner task applies every later transition at its
/// checkpoint, between units of work.
pub struct Agent {
    identity: AgentIdentity,
    state: SharedStateMachine,
    running: Arc<AtomicBool>,
    pid: u32,
    task: Box<dyn AgentTask>,
    control_rx: ControlReceiver,
    inbound_rx: InboundReceiver,
    inbound_tx: InboundSender,
    mailbox: Arc<Mailbox>,
    transport: Arc<MessageTransportService>,
}

impl Agent {
    /// Constructs an agent, registers it with the transport service, and
    /// spawns its runner. Must be called within a tokio runtime.
    pub(crate) fn spawn(
        identity: AgentIdentity,
        task: Box<dyn AgentTask>,
        transport: Arc<MessageTransportService>,
    ) -> AgentHandle {
        let (control_tx, control_rx) = mpsc::unbounded_channel();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let state: SharedStateMachine =
            Arc::new(Mutex::new(AgentStateMachine::new(identity.to_string())));
        let running = Arc::new(AtomicBool::new(false));
        let pid = process::id();

        let mailbox = transport.open_route(identity.clone(), inbound_tx.clone(), Arc::clone(&state));

        let handle = AgentHandle::new(
            identity.clone(),
            Arc::clone(&state),
            Arc::clone(&running),
            pid,
            control_tx,
        );
        let agent = Agent {
            identity,
            state,
            running,
            pid,
            task,
            control_rx,
            inbound_rx,
            inbound_tx,
            mailbox,
            transport,
        };
        handle.tracker().spawn(agent.run());
        handle.tracker().close();
        trace!(agent = %handle.id(), "agent spawned");
        handle
    }
}
