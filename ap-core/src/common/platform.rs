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

use tracing::{info, instrument};

use crate::agent::AgentSpecification;
use crate::ams::{AgentManagementSystem, AmsError};
use crate::common::{AgentHandle, DirectoryFacilitator, PlatformConfig, CONFIG};
use crate::identity::PlatformId;
use crate::traits::AgentTask;
use crate::transport::MessageTransportService;

/// The runtime container of one platform: one AMS, one message transport
/// service, one or more directory facilitators, and the agents living on
/// the platform, all under one platform identity.
pub struct AgentPlatform {
    id: PlatformId,
    config: PlatformConfig,
    transport: Arc<MessageTransportService>,
    ams: AgentManagementSystem,
    directories: Vec<DirectoryFacilitator>,
}

impl AgentPlatform {
    /// Launches a platform with the globally loaded configuration.
    pub async fn launch() -> Self {
        Self::launch_with_config(CONFIG.clone()).await
    }

    /// Launches a platform with an explicit configuration.
    ///
    /// Detects the platform identifier, builds the transport service,
    /// starts the AMS (whose own agent comes up `ACTIVE`), and opens one
    /// default directory facilitator.
    #[instrument(skip(config))]
    pub async fn launch_with_config(config: PlatformConfig) -> Self {
        let id = PlatformId::detect();
        let transport = Arc::new(MessageTransportService::new(
            id,
            config.limits.mailbox_capacity,
            config.limits.max_forward_depth,
        ));
        let ams = AgentManagementSystem::start(id, Arc::clone(&transport)).await;
        info!(platform = %id, "agent platform launched");
        AgentPlatform {
            id,
            config,
            transport,
            ams,
            directories: vec![DirectoryFacilitator::default()],
        }
    }

    /// The platform identifier.
    pub fn id(&self) -> PlatformId {
        self.id
    }

    /// The platform's supervisory component.
    pub fn ams(&self) -> &AgentManagementSystem {
        &self.ams
    }

    /// The platform's message transport service.
    pub fn transport(&self) -> &Arc<MessageTransportService> {
        &self.transport
    }

    /// The default directory facilitator.
    pub fn directory(&self) -> &DirectoryFacilitator {
        &self.directories[0]
    }

    /// All directory facilitators on this platform.
    pub fn directories(&self) -> &[DirectoryFacilitator] {
        &self.directories
    }

    /// Opens an additional directory facilitator.
    pub fn add_directory(&mut self) -> &DirectoryFacilitator {
        self.directories.push(DirectoryFacilitator::default());
        self.directories.last().expect("just pushed")
    }

    /// Creates and registers a new agent; shorthand for
    /// [`AgentManagementSystem::create`].
    pub async fn spawn_agent(
        &self,
        specification: AgentSpecification,
        task: Box<dyn AgentTask>,
    ) -> Result<AgentHandle, AmsError> {
        self.ams.create(specification, task).await
    }

    /// Shuts the platform down, destroying every agent and stopping the
    /// AMS. Waits for all runner tasks to finish, bounded per agent by the
    /// configured shutdown timeout.
    #[instrument(skip(self), fields(platform = %self.id))]
    pub async fn shutdown_all(&self) {
        self.ams.shutdown(self.config.agent_shutdown_timeout()).await;
        info!("agent platform stopped");
    }
}
