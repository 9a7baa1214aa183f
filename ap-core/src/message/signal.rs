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

use tokio::sync::oneshot;

use crate::agent::{AgentState, LifecycleError};

/// Typed control signals sent to an agent's control channel.
///
/// Signals replace OS-level process signals: they are queued on a per-agent
/// channel and applied only at the agent's checkpoint, between units of
/// work. The supervisory signals the AMS sends are `Pause`, `Continue`,
/// `Wake`, `Terminate`, and `ForceKill`; the remainder back the agent's own
/// life-cycle operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ControlSignal {
    /// Start executing (the `invoke` operation).
    Invoke,
    /// Suspend execution (the `suspend` operation).
    Pause,
    /// Enter the waiting state and clear the running flag.
    Wait,
    /// Wake from the waiting state.
    Wake,
    /// Resume from suspension.
    Continue,
    /// Begin migration (the FIPA *move* operation).
    Depart,
    /// Complete a migration and resume execution.
    Execute,
    /// Graceful termination; the agent's task may decline it.
    Terminate,
    /// Forced termination; cannot be refused.
    ForceKill,
}

impl ControlSignal {
    /// The life-cycle state this signal asks for.
    pub(crate) fn target_state(self) -> AgentState {
        match self {
            ControlSignal::Invoke
            | ControlSignal::Wake
            | ControlSignal::Continue
            | ControlSignal::Execute => AgentState::Active,
            ControlSignal::Pause => AgentState::Suspended,
            ControlSignal::Wait => AgentState::Waiting,
            ControlSignal::Depart => AgentState::Transit,
            ControlSignal::Terminate | ControlSignal::ForceKill => AgentState::Unknown,
        }
    }
}

/// A control signal paired with the channel that acknowledges its outcome.
#[derive(Debug)]
pub(crate) struct ControlCommand {
    pub(crate) signal: ControlSignal,
    pub(crate) ack: Option<oneshot::Sender<Result<AgentState, LifecycleError>>>,
}
