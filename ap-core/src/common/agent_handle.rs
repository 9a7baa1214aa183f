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

use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use static_assertions::assert_impl_all;
use tokio::sync::oneshot;
use tokio_util::task::TaskTracker;
use tracing::instrument;

use crate::agent::{AgentState, LifecycleError};
use crate::common::{ControlSender, SharedStateMachine};
use crate::identity::AgentIdentity;
use crate::message::{ControlCommand, ControlSignal};

/// A non-owning, cloneable reference to a live agent.
///
/// Handles are what the AMS registry stores and what callers use to issue
/// life-cycle operations. Every operation is carried to the agent as a
/// typed control signal and applied by the agent's own runner at its
/// checkpoint; the returned future resolves once the runner has
/// acknowledged the outcome. Concurrent operations against the same agent
/// therefore serialize, while different agents proceed in parallel.
///
/// The forced and resumptive operations (`destroy`, `resume`, `wakeup`)
/// are deliberately not public: only the AMS reaches them for an agent it
/// does not own outright.
#[derive(Debug, Clone)]
pub struct AgentHandle {
    identity: AgentIdentity,
    state: SharedStateMachine,
    running: Arc<AtomicBool>,
    pid: u32,
    control: ControlSender,
    tracker: TaskTracker,
}

assert_impl_all!(AgentHandle: Send, Sync);

impl PartialEq for AgentHandle {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
    }
}

impl Eq for AgentHandle {}

impl Hash for AgentHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity.hash(state);
    }
}

impl AgentHandle {
    pub(crate) fn new(
        identity: AgentIdentity,
        state: SharedStateMachine,
        running: Arc<AtomicBool>,
        pid: u32,
        control: ControlSender,
    ) -> Self {
        AgentHandle {
            identity,
            state,
            running,
            pid,
            control,
            tracker: TaskTracker::new(),
        }
    }

    /// The identity of the agent this handle refers to.
    pub fn id(&self) -> &AgentIdentity {
        &self.identity
    }

    /// A snapshot of the agent's life-cycle state.
    pub fn state(&self) -> AgentState {
        self.state.lock().current()
    }

    /// Whether the agent is actively executing its task loop.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// The process identifier recorded at agent construction.
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// The task tracker owning the agent's runner task.
    pub(crate) fn tracker(&self) -> TaskTracker {
        self.tracker.clone()
    }

    /// Whether the transition table allows moving to `target` right now.
    pub(crate) fn can_transition(&self, target: AgentState) -> bool {
        self.state.lock().can_transition(target)
    }

    /// Starts the agent: `INITIATED → ACTIVE`. Buffered mail is drained
    /// into the inbound channel before the task runs its first unit.
    #[instrument(skip(self), fields(agent = %self.identity))]
    pub async fn invoke(&self) -> Result<AgentState, LifecycleError> {
        self.control(ControlSignal::Invoke).await
    }

    /// Suspends the agent: `ACTIVE → SUSPENDED`.
    #[instrument(skip(self), fields(agent = %self.identity))]
    pub async fn suspend(&self) -> Result<AgentState, LifecycleError> {
        self.control(ControlSignal::Pause).await
    }

    /// Parks the agent: `ACTIVE → WAITING`, clearing the running flag.
    #[instrument(skip(self), fields(agent = %self.identity))]
    pub async fn wait(&self) -> Result<AgentState, LifecycleError> {
        self.control(ControlSignal::Wait).await
    }

    /// Begins a migration: `ACTIVE → TRANSIT` (the FIPA *move* operation).
    #[instrument(skip(self), fields(agent = %self.identity))]
    pub async fn depart(&self) -> Result<AgentState, LifecycleError> {
        self.control(ControlSignal::Depart).await
    }

    /// Completes a migration: `TRANSIT → ACTIVE`.
    #[instrument(skip(self), fields(agent = %self.identity))]
    pub async fn execute(&self) -> Result<AgentState, LifecycleError> {
        self.control(ControlSignal::Execute).await
    }

    /// Asks the agent to terminate gracefully. The agent's task may decline,
    /// in which case the state is returned unchanged.
    #[instrument(skip(self), fields(agent = %self.identity))]
    pub async fn quit(&self) -> Result<AgentState, LifecycleError> {
        self.control(ControlSignal::Terminate).await
    }

    /// Wakes the agent from `WAITING`. AMS-only for foreign agents.
    #[instrument(skip(self), fields(agent = %self.identity))]
    pub(crate) async fn wakeup(&self) -> Result<AgentState, LifecycleError> {
        self.control(ControlSignal::Wake).await
    }

    /// Resumes the agent from `SUSPENDED`. AMS-only for foreign agents.
    #[instrument(skip(self), fields(agent = %self.identity))]
    pub(crate) async fn resume(&self) -> Result<AgentState, LifecycleError> {
        self.control(ControlSignal::Continue).await
    }

    /// Forces the agent to `UNKNOWN`, releasing its resources. Cannot be
    /// refused. AMS-only for foreign agents.
    #[instrument(skip(self), fields(agent = %self.identity))]
    pub(crate) async fn destroy(&self) -> Result<AgentState, LifecycleError> {
        self.control(ControlSignal::ForceKill).await
    }

    async fn control(&self, signal: ControlSignal) -> Result<AgentState, LifecycleError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        let command = ControlCommand {
            signal,
            ack: Some(ack_tx),
        };
        if self.control.send(command).is_err() {
            return Err(LifecycleError::UnknownAgent(self.identity.clone()));
        }
        ack_rx
            .await
            .map_err(|_| LifecycleError::UnknownAgent(self.identity.clone()))?
    }
}
