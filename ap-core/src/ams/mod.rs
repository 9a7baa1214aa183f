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

//! The Agent Management System: the supervisory component of a platform.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use futures::future::join_all;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{error, info, instrument, trace, warn};

use crate::agent::{Agent, AgentSpecification, AgentState, LifecycleError};
use crate::common::AgentHandle;
use crate::identity::{AgentIdentity, PlatformId};
use crate::traits::{AgentTask, IdleTask};
use crate::transport::MessageTransportService;

/// The reserved name of the AMS on every platform.
const AMS_NAME: &str = "ams";

/// Errors surfaced by AMS bookkeeping operations.
#[derive(Debug, Clone, Error)]
pub enum AmsError {
    /// The requested logical name is reserved or already registered.
    #[error("agent name not available: {0}")]
    NameTaken(String),
    /// A life-cycle operation failed.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

/// Registry view of one agent, returned by [`AgentManagementSystem::search`].
#[derive(Debug, Clone)]
pub struct AmsAgentDescription {
    /// The agent's identity.
    pub aid: AgentIdentity,
    /// Snapshot of its life-cycle state.
    pub state: AgentState,
    /// Whether its task loop is running.
    pub running: bool,
    /// Process identifier recorded at construction.
    pub pid: u32,
    /// The opaque source reference the agent was created from.
    pub source: String,
}

/// What a registry search matches on; empty criteria match everything.
#[derive(Debug, Clone, Default)]
pub struct AmsSearch {
    /// Match AIDs whose logical name contains this fragment.
    pub name: Option<String>,
    /// Match agents currently in this state.
    pub state: Option<AgentState>,
}

/// Description of the platform itself, from
/// [`AgentManagementSystem::get_description`].
#[derive(Debug, Clone)]
pub struct PlatformDescription {
    /// The platform identifier.
    pub platform: PlatformId,
    /// The AID of the platform's AMS (`ams@<platform-id>`).
    pub ams: AgentIdentity,
    /// Number of agents currently registered.
    pub agent_count: usize,
}

struct RegisteredAgent {
    handle: AgentHandle,
    specification: AgentSpecification,
}

/// Supervises the life cycle of every agent on the platform.
///
/// The AMS is itself an agent — it holds a private [`AgentHandle`] for its
/// own life cycle — composed with a privileged supervisory surface over the
/// platform's registry. It is the only component that can force terminal
/// transitions (`terminate`) or resumption (`resume`, `wakeup`) of an agent
/// it does not own: those handle operations are crate-private and only
/// reachable through here.
///
/// The registry holds non-owning handles keyed by AID; agent resources are
/// owned by the agents themselves.
pub struct AgentManagementSystem {
    handle: AgentHandle,
    platform: PlatformId,
    transport: Arc<MessageTransportService>,
    registry: DashMap<AgentIdentity, RegisteredAgent>,
}

impl AgentManagementSystem {
    /// Starts the AMS: spawns its own agent under the fixed AID
    /// `ams@<platform-id>` and activates it.
    pub(crate) async fn start(
        platform: PlatformId,
        transport: Arc<MessageTransportService>,
    ) -> Self {
        let identity = AgentIdentity::named(AMS_NAME, platform);
        let handle = Agent::spawn(identity, Box::new(IdleTask), Arc::clone(&transport));
        handle
            .invoke()
            .await
            .expect("the AMS agent always activates from INITIATED");
        info!(ams = %handle.id(), "agent management system started");
        AgentManagementSystem {
            handle,
            platform,
            transport,
            registry: DashMap::new(),
        }
    }

    /// The AID of the AMS itself.
    pub fn aid(&self) -> &AgentIdentity {
        self.handle.id()
    }

    /// Describes the platform this AMS supervises.
    pub fn get_description(&self) -> PlatformDescription {
        PlatformDescription {
            platform: self.platform,
            ams: self.handle.id().clone(),
            agent_count: self.registry.len(),
        }
    }

    /// Instantiates a new agent from a specification and registers it.
    ///
    /// The agent starts in `INITIATED`; callers activate it with
    /// [`invoke`](Self::invoke). Logical names must be unique on the
    /// platform and `ams` is reserved.
    #[instrument(skip(self, task), fields(source = specification.source()))]
    pub async fn create(
        &self,
        specification: AgentSpecification,
        task: Box<dyn AgentTask>,
    ) -> Result<AgentHandle, AmsError> {
        if let Some(name) = specification.name() {
            if !self.is_name_available(name) {
                return Err(AmsError::NameTaken(name.to_string()));
            }
        }
        let mut identity = match specification.name() {
            Some(name) => AgentIdentity::named(name, self.platform),
            None => AgentIdentity::new(self.platform),
        };
        if let Some(qualifier) = specification.qualifier() {
            identity = identity.with_qualifier(qualifier);
        }

        let handle = Agent::spawn(identity, task, Arc::clone(&self.transport));
        self.register(handle.clone(), specification);
        info!(agent = %handle.id(), "agent created");
        Ok(handle)
    }

    /// Whether a logical name is free for a new agent.
    pub fn is_name_available(&self, name: &str) -> bool {
        name != AMS_NAME
            && !self
                .registry
                .iter()
                .any(|entry| entry.key().name() == Some(name))
    }

    /// Adds an agent to the registry.
    pub fn register(&self, handle: AgentHandle, specification: AgentSpecification) {
        trace!(agent = %handle.id(), "agent registered");
        self.registry.insert(
            handle.id().clone(),
            RegisteredAgent {
                handle,
                specification,
            },
        );
    }

    /// Removes an agent from the registry without touching its life cycle.
    pub fn deregister(&self, aid: &AgentIdentity) -> Result<(), LifecycleError> {
        self.registry
            .remove(aid)
            .map(|_| trace!(agent = %aid, "agent deregistered"))
            .ok_or_else(|| LifecycleError::UnknownAgent(aid.clone()))
    }

    /// Replaces the stored specification of a registered agent.
    pub fn modify(
        &self,
        aid: &AgentIdentity,
        specification: AgentSpecification,
    ) -> Result<(), LifecycleError> {
        let mut entry = self
            .registry
            .get_mut(aid)
            .ok_or_else(|| LifecycleError::UnknownAgent(aid.clone()))?;
        entry.specification = specification;
        Ok(())
    }

    /// Returns registry descriptions matching the search.
    pub fn search(&self, query: &AmsSearch) -> Vec<AmsAgentDescription> {
        self.registry
            .iter()
            .filter(|entry| {
                if let Some(fragment) = &query.name {
                    let matches = entry
                        .key()
                        .name()
                        .is_some_and(|name| name.contains(fragment.as_str()));
                    if !matches {
                        return false;
                    }
                }
                if let Some(state) = query.state {
                    if entry.value().handle.state() != state {
                        return false;
                    }
                }
                true
            })
            .map(|entry| {
                let registered = entry.value();
                AmsAgentDescription {
                    aid: registered.handle.id().clone(),
                    state: registered.handle.state(),
                    running: registered.handle.is_running(),
                    pid: registered.handle.pid(),
                    source: registered.specification.source().to_string(),
                }
            })
            .collect()
    }

    /// Resolves an AID to the registered handle.
    pub fn find(&self, aid: &AgentIdentity) -> Option<AgentHandle> {
        self.registry.get(aid).map(|entry| entry.value().handle.clone())
    }

    fn resolve(&self, aid: &AgentIdentity) -> Result<AgentHandle, LifecycleError> {
        self.find(aid)
            .ok_or_else(|| LifecycleError::UnknownAgent(aid.clone()))
    }

    /// Validates a supervisory command against the target's state machine
    /// before the signal is sent; illegal requests are logged and returned,
    /// never applied.
    fn guard(&self, handle: &AgentHandle, target: AgentState) -> Result<(), LifecycleError> {
        if handle.can_transition(target) {
            return Ok(());
        }
        let current = handle.state();
        warn!(
            agent = %handle.id(),
            %current,
            requested = %target,
            "supervisory command rejected"
        );
        Err(LifecycleError::InvalidTransition {
            current,
            requested: target,
        })
    }

    /// Activates an agent: `INITIATED → ACTIVE`.
    #[instrument(skip(self))]
    pub async fn invoke(&self, aid: &AgentIdentity) -> Result<AgentState, LifecycleError> {
        let handle = self.resolve(aid)?;
        self.guard(&handle, AgentState::Active)?;
        handle.invoke().await
    }

    /// Suspends an agent, when legal for its current state.
    #[instrument(skip(self))]
    pub async fn suspend(&self, aid: &AgentIdentity) -> Result<AgentState, LifecycleError> {
        let handle = self.resolve(aid)?;
        self.guard(&handle, AgentState::Suspended)?;
        handle.suspend().await
    }

    /// Resumes a suspended agent.
    #[instrument(skip(self))]
    pub async fn resume(&self, aid: &AgentIdentity) -> Result<AgentState, LifecycleError> {
        let handle = self.resolve(aid)?;
        self.guard(&handle, AgentState::Active)?;
        handle.resume().await
    }

    /// Wakes a waiting agent.
    #[instrument(skip(self))]
    pub async fn wakeup(&self, aid: &AgentIdentity) -> Result<AgentState, LifecycleError> {
        let handle = self.resolve(aid)?;
        self.guard(&handle, AgentState::Active)?;
        handle.wakeup().await
    }

    /// Completes an agent's migration: `TRANSIT → ACTIVE`.
    #[instrument(skip(self))]
    pub async fn execute(&self, aid: &AgentIdentity) -> Result<AgentState, LifecycleError> {
        let handle = self.resolve(aid)?;
        self.guard(&handle, AgentState::Active)?;
        handle.execute().await
    }

    /// Destroys an agent and drops it from the registry. Unlike a graceful
    /// quit, this cannot be refused.
    #[instrument(skip(self))]
    pub async fn terminate(&self, aid: &AgentIdentity) -> Result<AgentState, LifecycleError> {
        let handle = self.resolve(aid)?;
        let state = handle.destroy().await?;
        self.registry.remove(aid);
        info!(agent = %aid, "agent terminated");
        Ok(state)
    }

    /// Destroys every registered agent, then stops the AMS's own agent.
    pub(crate) async fn shutdown(&self, agent_timeout: Duration) {
        let handles: Vec<AgentHandle> = self
            .registry
            .iter()
            .map(|entry| entry.value().handle.clone())
            .collect();
        let stops = handles.iter().map(|handle| async move {
            let stopped = timeout(agent_timeout, async {
                let _ = handle.destroy().await;
                handle.tracker().wait().await;
            })
            .await;
            if stopped.is_err() {
                error!(
                    agent = %handle.id(),
                    timeout_ms = agent_timeout.as_millis() as u64,
                    "shutdown timeout"
                );
            }
        });
        join_all(stops).await;
        self.registry.clear();

        let _ = self.handle.destroy().await;
        self.handle.tracker().wait().await;
        info!(ams = %self.handle.id(), "agent management system stopped");
    }
}
