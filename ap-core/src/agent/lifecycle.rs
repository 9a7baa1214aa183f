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

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::identity::AgentIdentity;

/// Life-cycle states of an agent, following the FIPA agent-management model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentState {
    /// Destroyed or not yet constructed.
    Unknown,
    /// Constructed but not yet invoked.
    Initiated,
    /// Executing its task loop and accepting deliveries.
    Active,
    /// Suspended by itself or the AMS.
    Suspended,
    /// Waiting for an external event; the running flag is cleared.
    Waiting,
    /// Migrating to another location.
    Transit,
}

impl fmt::Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = match self {
            AgentState::Unknown => "UNKNOWN",
            AgentState::Initiated => "INITIATED",
            AgentState::Active => "ACTIVE",
            AgentState::Suspended => "SUSPENDED",
            AgentState::Waiting => "WAITING",
            AgentState::Transit => "TRANSIT",
        };
        f.write_str(rendered)
    }
}

/// Errors surfaced by life-cycle operations.
///
/// None of these are fatal: a rejected operation leaves the agent's state
/// untouched and never affects any other agent.
#[derive(Debug, Clone, Error)]
pub enum LifecycleError {
    /// The requested transition is not in the transition table.
    #[error("invalid transition from {current} to {requested}")]
    InvalidTransition {
        /// State the agent was in when the request arrived.
        current: AgentState,
        /// State the request asked for.
        requested: AgentState,
    },
    /// The AID does not resolve to a live agent on this platform.
    #[error("unknown agent: {0}")]
    UnknownAgent(AgentIdentity),
}

/// Per-agent life-cycle state and transition rules.
///
/// The transition table is the sole authority on whether a life-cycle
/// operation proceeds; every operation consults it before mutating state.
/// Requesting the current state again is an idempotent no-op, and a
/// transition to [`AgentState::Unknown`] (destroy or quit) is always legal.
#[derive(Debug)]
pub struct AgentStateMachine {
    current: AgentState,
    subject: String,
}

impl AgentStateMachine {
    /// Builds the state machine for a freshly constructed agent.
    ///
    /// Construction is the one place the `UNKNOWN → INITIATED` hop happens;
    /// no public operation targets `INITIATED` afterwards.
    pub(crate) fn new(subject: String) -> Self {
        debug!(agent = %subject, "agent initiated");
        AgentStateMachine {
            current: AgentState::Initiated,
            subject,
        }
    }

    /// The state the agent is currently in.
    pub fn current(&self) -> AgentState {
        self.current
    }

    /// Whether the table allows moving from the current state to `target`.
    pub fn can_transition(&self, target: AgentState) -> bool {
        Self::allowed(self.current, target)
    }

    fn allowed(current: AgentState, target: AgentState) -> bool {
        if current == target {
            return true;
        }
        if target == AgentState::Unknown {
            return true;
        }
        matches!(
            (current, target),
            (
                AgentState::Active,
                AgentState::Suspended | AgentState::Waiting | AgentState::Transit
            ) | (
                AgentState::Waiting
                    | AgentState::Suspended
                    | AgentState::Initiated
                    | AgentState::Transit,
                AgentState::Active
            )
        )
    }

    /// Applies a transition, or rejects it leaving the state untouched.
    ///
    /// Every attempt produces an observability record, legal or not.
    pub fn apply(&mut self, target: AgentState) -> Result<AgentState, LifecycleError> {
        if !Self::allowed(self.current, target) {
            warn!(
                agent = %self.subject,
                current = %self.current,
                requested = %target,
                "transition rejected"
            );
            return Err(LifecycleError::InvalidTransition {
                current: self.current,
                requested: target,
            });
        }
        if self.current == target {
            debug!(agent = %self.subject, state = %self.current, "already in state");
            return Ok(self.current);
        }
        info!(agent = %self.subject, from = %self.current, to = %target, "transition applied");
        self.current = target;
        Ok(self.current)
    }
}
